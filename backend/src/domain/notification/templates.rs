//! Message wording. Every client-facing message carries the client name,
//! service, date, time slot and price.

use chrono::NaiveDate;
use shared::{Appointment, Client, Review, ReviewStatus};

const SALON_NAME: &str = "Beauty Palace";

/// Values interpolated into appointment messages
#[derive(Debug, Clone, PartialEq)]
pub struct MessageContext {
    pub client_name: String,
    pub client_phone: String,
    pub service_name: String,
    pub date: NaiveDate,
    pub time_slot: String,
    pub price: f64,
}

impl MessageContext {
    pub fn new(appointment: &Appointment, client: &Client) -> Self {
        Self {
            client_name: client.name.clone(),
            client_phone: client.phone.clone(),
            service_name: appointment.service_name.clone(),
            date: appointment.date,
            time_slot: appointment.time_slot.label(),
            price: appointment.price,
        }
    }
}

/// "June 1, 2024"
pub fn format_date(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

/// "$60", or "$62.50" when there are cents
pub fn format_price(price: f64) -> String {
    if price.fract() == 0.0 {
        format!("${:.0}", price)
    } else {
        format!("${:.2}", price)
    }
}

pub fn confirmation(ctx: &MessageContext) -> String {
    format!(
        "Hello {}! Your {} appointment is confirmed for {} at {}. Price: {}. We look forward to seeing you at {}.",
        ctx.client_name,
        ctx.service_name,
        format_date(ctx.date),
        ctx.time_slot,
        format_price(ctx.price),
        SALON_NAME
    )
}

pub fn reminder(ctx: &MessageContext) -> String {
    format!(
        "Hi {}, this is a reminder of your {} appointment on {} at {}. Price: {}. Please arrive 10 minutes early. - {}",
        ctx.client_name,
        ctx.service_name,
        format_date(ctx.date),
        ctx.time_slot,
        format_price(ctx.price),
        SALON_NAME
    )
}

pub fn cancellation(ctx: &MessageContext) -> String {
    format!(
        "Hello {}, your {} appointment on {} at {} ({}) has been cancelled. Reply to this message to book a new time. - {}",
        ctx.client_name,
        ctx.service_name,
        format_date(ctx.date),
        ctx.time_slot,
        format_price(ctx.price),
        SALON_NAME
    )
}

pub fn owner_booking_alert(ctx: &MessageContext) -> String {
    format!(
        "New booking: {} ({}) booked {} on {} at {}. Price: {}.",
        ctx.client_name,
        ctx.client_phone,
        ctx.service_name,
        format_date(ctx.date),
        ctx.time_slot,
        format_price(ctx.price)
    )
}

pub fn owner_review_alert(review: &Review) -> String {
    let service = review
        .service_name
        .as_deref()
        .map(|s| format!(" for {}", s))
        .unwrap_or_default();
    let state = match review.status {
        ReviewStatus::Pending => "is waiting for approval",
        ReviewStatus::Approved => "is live on the site",
        ReviewStatus::Rejected => "was rejected",
    };
    format!(
        "New review{} from {} ({} stars) {}: \"{}\"",
        service, review.author_name, review.rating, state, review.comment
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> MessageContext {
        MessageContext {
            client_name: "Sarah Johnson".to_string(),
            client_phone: "+1234567890".to_string(),
            service_name: "Haircut & Styling".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            time_slot: "10:00 AM".to_string(),
            price: 60.0,
        }
    }

    #[test]
    fn test_formatting_helpers() {
        assert_eq!(format_date(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()), "June 1, 2024");
        assert_eq!(format_price(60.0), "$60");
        assert_eq!(format_price(62.5), "$62.50");
    }

    #[test]
    fn test_client_messages_carry_required_fields() {
        let ctx = ctx();
        for message in [confirmation(&ctx), reminder(&ctx), cancellation(&ctx)] {
            assert!(message.contains("Sarah Johnson"), "{}", message);
            assert!(message.contains("Haircut & Styling"), "{}", message);
            assert!(message.contains("June 1, 2024"), "{}", message);
            assert!(message.contains("10:00 AM"), "{}", message);
            assert!(message.contains("$60"), "{}", message);
        }
    }

    #[test]
    fn test_owner_alerts() {
        assert!(owner_booking_alert(&ctx()).contains("+1234567890"));

        let review = Review {
            id: "review::1".to_string(),
            author_name: "Rachel Green".to_string(),
            service_name: Some("Hair Smoothing".to_string()),
            rating: 4.5,
            comment: "Transformed my hair".to_string(),
            images: vec![],
            date_label: "Just now".to_string(),
            status: ReviewStatus::Pending,
        };
        let alert = owner_review_alert(&review);
        assert!(alert.contains("Rachel Green"));
        assert!(alert.contains("Hair Smoothing"));
        assert!(alert.contains("4.5 stars"));
        assert!(alert.contains("waiting for approval"));
    }
}
