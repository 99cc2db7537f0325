use chrono::{NaiveDate, NaiveTime, Timelike};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A bookable salon service, e.g. "Haircut & Styling"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    /// Service ID in format: "service::<uuid>"
    pub id: String,
    /// Category key used by bookings and appointment filters (e.g. "haircut")
    pub tag: String,
    pub name: String,
    pub description: String,
    /// Price in dollars
    pub price: f64,
    pub duration_minutes: u32,
    /// Plain CDN URL, no validation beyond scheme
    pub image_url: Option<String>,
}

/// A salon client. Visit aggregates are derived from appointments, see `ClientSummary`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    pub id: String,
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
}

/// Read-only projection of a client's appointment history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientSummary {
    pub client: Client,
    /// Non-cancelled appointments
    pub total_appointments: usize,
    /// Sum of completed appointment prices
    pub total_spent: f64,
    /// Date of the latest completed appointment
    pub last_visit: Option<NaiveDate>,
    /// Most booked service tags, most frequent first
    pub preferred_services: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Upcoming,
    Completed,
    Cancelled,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Upcoming => "upcoming",
            AppointmentStatus::Completed => "completed",
            AppointmentStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppointmentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "upcoming" => Ok(AppointmentStatus::Upcoming),
            "completed" => Ok(AppointmentStatus::Completed),
            "cancelled" => Ok(AppointmentStatus::Cancelled),
            _ => Err(format!("Invalid appointment status: {}", s)),
        }
    }
}

/// One of the fixed half-hour booking slots between 9:00 AM and 5:30 PM.
///
/// Serialized as its display label ("9:00 AM"); parsing also accepts 24h "13:30".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimeSlot(NaiveTime);

impl TimeSlot {
    const FIRST_HOUR: u32 = 9;
    const SLOT_COUNT: u32 = 18;

    /// All bookable slots in chronological order
    pub fn all() -> Vec<TimeSlot> {
        (0..Self::SLOT_COUNT)
            .filter_map(|i| NaiveTime::from_hms_opt(Self::FIRST_HOUR + i / 2, (i % 2) * 30, 0))
            .map(TimeSlot)
            .collect()
    }

    /// Accepts a time only if it is one of the bookable slots
    pub fn from_time(time: NaiveTime) -> Option<TimeSlot> {
        let slot = TimeSlot(time.with_second(0)?.with_nanosecond(0)?);
        if Self::all().contains(&slot) {
            Some(slot)
        } else {
            None
        }
    }

    pub fn time(&self) -> NaiveTime {
        self.0
    }

    pub fn label(&self) -> String {
        self.0.format("%-I:%M %p").to_string()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TimeSlotError {
    Unparseable(String),
    OutsideBookingHours(String),
}

impl fmt::Display for TimeSlotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeSlotError::Unparseable(s) => write!(f, "Invalid time slot: {}", s),
            TimeSlotError::OutsideBookingHours(s) => write!(f, "Time slot {} is not a bookable slot", s),
        }
    }
}

impl std::error::Error for TimeSlotError {}

impl FromStr for TimeSlot {
    type Err = TimeSlotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let time = NaiveTime::parse_from_str(&trimmed.to_uppercase(), "%I:%M %p")
            .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M"))
            .map_err(|_| TimeSlotError::Unparseable(s.to_string()))?;
        TimeSlot::from_time(time).ok_or_else(|| TimeSlotError::OutsideBookingHours(s.to_string()))
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

impl Serialize for TimeSlot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.label())
    }
}

impl<'de> Deserialize<'de> for TimeSlot {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// A booked appointment. Service name, tag and price are snapshots taken at booking time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: String,
    pub client_id: String,
    pub service_id: String,
    pub service_tag: String,
    pub service_name: String,
    pub date: NaiveDate,
    pub time_slot: TimeSlot,
    pub status: AppointmentStatus,
    pub price: f64,
    pub notes: Option<String>,
}

/// Appointments of one client, in filtered order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientGroup {
    pub client: Client,
    pub appointments: Vec<Appointment>,
}

/// A promotional offer. Discount and validity are free-form labels ("20% OFF", "Ongoing").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Offer {
    pub id: String,
    pub title: String,
    pub description: String,
    pub discount_label: String,
    pub validity_label: String,
    pub terms: String,
    pub is_active: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewStatus {
    Pending,
    Approved,
    Rejected,
}

impl ReviewStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReviewStatus::Pending => "pending",
            ReviewStatus::Approved => "approved",
            ReviewStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for ReviewStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReviewStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(ReviewStatus::Pending),
            "approved" => Ok(ReviewStatus::Approved),
            "rejected" => Ok(ReviewStatus::Rejected),
            _ => Err(format!("Invalid review status: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: String,
    pub author_name: String,
    pub service_name: Option<String>,
    /// 0.0 - 5.0 in half steps
    pub rating: f64,
    pub comment: String,
    /// At most two image URLs
    pub images: Vec<String>,
    /// Relative label such as "2 weeks ago"
    pub date_label: String,
    pub status: ReviewStatus,
}

/// Which reviews the admin grid shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewView {
    /// Everything except rejected reviews
    #[default]
    All,
    Approved,
    Pending,
    Rejected,
}

/// Admin-editable salon settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalonSettings {
    /// WhatsApp contact number shown to clients
    pub contact_number: String,
    /// Minutes before an appointment the reminder goes out
    pub reminder_minutes: u32,
    pub whatsapp_notifications: bool,
    pub email_notifications: bool,
    pub auto_approve_reviews: bool,
}

impl Default for SalonSettings {
    fn default() -> Self {
        Self {
            contact_number: "+1 (123) 456-7890".to_string(),
            reminder_minutes: 60,
            whatsapp_notifications: true,
            email_notifications: true,
            auto_approve_reviews: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaImage {
    pub id: String,
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaCategory {
    pub id: String,
    pub name: String,
    pub description: String,
    pub images: Vec<MediaImage>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceCount {
    pub tag: String,
    pub name: String,
    pub count: usize,
}

/// Numbers shown on the admin dashboard cards
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardOverview {
    pub date: NaiveDate,
    pub todays_appointments: usize,
    pub total_clients: usize,
    /// Average rating of approved reviews, one decimal
    pub average_rating: Option<f64>,
    pub approved_reviews: usize,
    /// Sum of completed appointment prices
    pub revenue: f64,
    pub appointments_by_service: Vec<ServiceCount>,
    pub upcoming_today: Vec<Appointment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotAvailability {
    pub slot: TimeSlot,
    pub available: bool,
}

/// A composed messaging deep link waiting to be opened by the admin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationLink {
    pub kind: String,
    pub recipient: String,
    pub url: String,
    /// RFC 3339
    pub created_at: String,
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// Create/edit form for a service (update is a full replace)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceForm {
    /// Derived from the name when absent
    pub tag: Option<String>,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub duration_minutes: u32,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OfferForm {
    pub title: String,
    pub description: String,
    pub discount_label: String,
    pub validity_label: String,
    #[serde(default)]
    pub terms: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewForm {
    pub author_name: String,
    pub service_name: Option<String>,
    pub rating: f64,
    pub comment: String,
    #[serde(default)]
    pub images: Vec<String>,
    pub date_label: Option<String>,
    /// Ignored for public submissions
    pub status: Option<ReviewStatus>,
}

/// Admin create/edit form for an appointment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppointmentForm {
    pub client_id: String,
    pub service_id: String,
    pub date: NaiveDate,
    pub time_slot: TimeSlot,
    pub status: Option<AppointmentStatus>,
    /// Defaults to the service's current price on create
    pub price: Option<f64>,
    pub notes: Option<String>,
}

/// Public booking form submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingRequest {
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub service: String,
    pub date: NaiveDate,
    pub time_slot: String,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppointmentStatusRequest {
    pub status: AppointmentStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewStatusRequest {
    pub status: ReviewStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppointmentQuery {
    pub date: Option<NaiveDate>,
    pub service: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReviewListQuery {
    pub view: Option<ReviewView>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotQuery {
    pub date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaUpdateRequest {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    /// RFC 3339
    pub expires_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionResponse {
    pub username: String,
    pub expires_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceListResponse {
    pub services: Vec<Service>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceResponse {
    pub service: Service,
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppointmentListResponse {
    pub appointments: Vec<Appointment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupedAppointmentsResponse {
    pub groups: Vec<ClientGroup>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppointmentResponse {
    pub appointment: Appointment,
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingResponse {
    pub appointment: Appointment,
    pub client: Client,
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotListResponse {
    pub date: NaiveDate,
    pub slots: Vec<SlotAvailability>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientListResponse {
    pub clients: Vec<ClientSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OfferListResponse {
    pub offers: Vec<Offer>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OfferResponse {
    pub offer: Offer,
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewListResponse {
    pub reviews: Vec<Review>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewResponse {
    pub review: Review,
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaLibraryResponse {
    pub categories: Vec<MediaCategory>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationListResponse {
    pub notifications: Vec<NotificationLink>,
}

/// Returned when the confirmation gate opens for a destructive operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteRequestResponse {
    pub pending_id: String,
    pub confirmation_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteResultResponse {
    /// None when nothing was pending or the target was already gone
    pub deleted_id: Option<String>,
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldErrorDto {
    pub field: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldErrorDto>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_slots_cover_opening_hours() {
        let slots = TimeSlot::all();
        assert_eq!(slots.len(), 18);
        assert_eq!(slots[0].label(), "9:00 AM");
        assert_eq!(slots[6].label(), "12:00 PM");
        assert_eq!(slots[17].label(), "5:30 PM");
    }

    #[test]
    fn test_time_slot_parsing() {
        let slot: TimeSlot = "1:30 PM".parse().unwrap();
        assert_eq!(slot.time(), NaiveTime::from_hms_opt(13, 30, 0).unwrap());

        let same: TimeSlot = "13:30".parse().unwrap();
        assert_eq!(slot, same);

        let lower: TimeSlot = "9:00 am".parse().unwrap();
        assert_eq!(lower.label(), "9:00 AM");

        assert!(matches!(
            "6:00 PM".parse::<TimeSlot>(),
            Err(TimeSlotError::OutsideBookingHours(_))
        ));
        assert!(matches!(
            "9:15 AM".parse::<TimeSlot>(),
            Err(TimeSlotError::OutsideBookingHours(_))
        ));
        assert!(matches!(
            "teatime".parse::<TimeSlot>(),
            Err(TimeSlotError::Unparseable(_))
        ));
    }

    #[test]
    fn test_time_slot_serializes_as_label() {
        let slot: TimeSlot = "10:00".parse().unwrap();
        assert_eq!(serde_json::to_string(&slot).unwrap(), "\"10:00 AM\"");
        let back: TimeSlot = serde_json::from_str("\"10:00 AM\"").unwrap();
        assert_eq!(back, slot);
    }

    #[test]
    fn test_status_strings() {
        assert_eq!("Completed".parse::<AppointmentStatus>().unwrap(), AppointmentStatus::Completed);
        assert!("done".parse::<AppointmentStatus>().is_err());
        assert_eq!(ReviewStatus::Approved.to_string(), "approved");
        assert_eq!(
            serde_json::to_string(&AppointmentStatus::Cancelled).unwrap(),
            "\"cancelled\""
        );
    }

    #[test]
    fn test_offer_form_defaults() {
        let form: OfferForm = serde_json::from_str(
            r#"{"title":"Spa","description":"d","discount_label":"10% OFF","validity_label":"Ongoing"}"#,
        )
        .unwrap();
        assert!(form.is_active);
        assert_eq!(form.terms, "");
    }

    #[test]
    fn test_error_response_omits_empty_fields() {
        let body = ErrorResponse {
            error: "Not found".to_string(),
            fields: Vec::new(),
        };
        assert_eq!(serde_json::to_string(&body).unwrap(), r#"{"error":"Not found"}"#);
    }
}
