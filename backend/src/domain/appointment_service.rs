//! Appointment management: the admin appointment table, status changes, the
//! public booking flow and on-demand client messages.

use chrono::{Local, NaiveDate};
use log::{info, warn};
use shared::{
    Appointment, AppointmentForm, AppointmentResponse, AppointmentStatus, BookingRequest, BookingResponse, Client,
    ClientGroup, DeleteRequestResponse, DeleteResultResponse, NotificationLink, Service, SlotAvailability, TimeSlot,
};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::domain::catalog_service::CatalogService;
use crate::domain::client_service::ClientService;
use crate::domain::collection::{CollectionManager, FilterSet};
use crate::domain::delete_flow;
use crate::domain::models::validation::{is_valid_phone, require_text};
use crate::domain::models::{CollectionError, CollectionResult, TransitionPolicy, ValidationErrors};
use crate::domain::notification::{DomainEvent, EventBus, MessageKind, Notifier};
use crate::domain::projections;

#[derive(Clone)]
pub struct AppointmentService {
    appointments: CollectionManager<Appointment>,
    clients: ClientService,
    catalog: CatalogService,
    events: EventBus,
    notifier: Notifier,
    policy: TransitionPolicy,
    /// Held across the slot check and the write so two bookings cannot take one slot
    booking_lock: Arc<Mutex<()>>,
}

impl AppointmentService {
    pub fn new(
        appointments: CollectionManager<Appointment>,
        clients: ClientService,
        catalog: CatalogService,
        events: EventBus,
        notifier: Notifier,
        policy: TransitionPolicy,
    ) -> Self {
        Self {
            appointments,
            clients,
            catalog,
            events,
            notifier,
            policy,
            booking_lock: Arc::new(Mutex::new(())),
        }
    }

    pub async fn list(&self, filters: &FilterSet) -> CollectionResult<Vec<Appointment>> {
        self.appointments.list_filtered(filters).await
    }

    /// Filtered appointments grouped by client, first-seen client first
    pub async fn grouped(&self, filters: &FilterSet) -> CollectionResult<Vec<ClientGroup>> {
        let filtered = self.appointments.list_filtered(filters).await?;
        let clients = self.clients.list().await?;
        Ok(projections::group_by_client(&filtered, &clients))
    }

    pub async fn get(&self, id: &str) -> CollectionResult<Appointment> {
        self.appointments.get(id).await
    }

    async fn ensure_slot_free(
        &self,
        date: NaiveDate,
        slot: TimeSlot,
        ignore_id: Option<&str>,
    ) -> CollectionResult<()> {
        let taken = self.appointments.list().await?.into_iter().any(|a| {
            a.date == date
                && a.time_slot == slot
                && a.status != AppointmentStatus::Cancelled
                && Some(a.id.as_str()) != ignore_id
        });
        if taken {
            warn!("Slot {} on {} already booked", slot, date);
            return Err(CollectionError::SlotUnavailable {
                date,
                slot: slot.label(),
            });
        }
        Ok(())
    }

    /// Every bookable slot on `date` with its availability
    pub async fn available_slots(&self, date: NaiveDate) -> CollectionResult<Vec<SlotAvailability>> {
        let taken: HashSet<TimeSlot> = self
            .appointments
            .list()
            .await?
            .into_iter()
            .filter(|a| a.date == date && a.status != AppointmentStatus::Cancelled)
            .map(|a| a.time_slot)
            .collect();
        Ok(TimeSlot::all()
            .into_iter()
            .map(|slot| SlotAvailability {
                slot,
                available: !taken.contains(&slot),
            })
            .collect())
    }

    /// Resolve the service and client referenced by an admin form, reporting
    /// unknown references as field errors
    async fn resolve_references(&self, form: &AppointmentForm) -> CollectionResult<(Service, Client)> {
        let service = self.catalog.find(&form.service_id).await?;
        let client = self.clients.find(&form.client_id).await?;

        let mut errors = ValidationErrors::new();
        if service.is_none() {
            errors.add("service_id", format!("unknown service {}", form.service_id));
        }
        if client.is_none() {
            errors.add("client_id", format!("unknown client {}", form.client_id));
        }
        match (service, client) {
            (Some(service), Some(client)) => Ok((service, client)),
            _ => Err(CollectionError::Validation(errors)),
        }
    }

    /// Admin create. Price defaults to the service's current price.
    pub async fn create(&self, form: AppointmentForm) -> CollectionResult<AppointmentResponse> {
        info!("Creating appointment: client={} service={} date={}", form.client_id, form.service_id, form.date);
        let (service, client) = self.resolve_references(&form).await?;
        let status = form.status.unwrap_or(AppointmentStatus::Upcoming);

        let appointment = Appointment {
            id: String::new(),
            client_id: client.id.clone(),
            service_id: service.id.clone(),
            service_tag: service.tag.clone(),
            service_name: service.name.clone(),
            date: form.date,
            time_slot: form.time_slot,
            status,
            price: form.price.unwrap_or(service.price),
            notes: clean_notes(form.notes),
        };

        let appointment = {
            let _guard = self.booking_lock.lock().await;
            if status != AppointmentStatus::Cancelled {
                self.ensure_slot_free(appointment.date, appointment.time_slot, None).await?;
            }
            self.appointments.create(appointment).await?
        };

        if appointment.status == AppointmentStatus::Upcoming {
            self.events.publish(DomainEvent::AppointmentBooked {
                appointment: appointment.clone(),
                client,
            });
        }

        Ok(AppointmentResponse {
            success_message: format!("Appointment for {} has been created.", appointment.service_name),
            appointment,
        })
    }

    /// Admin full replace. The price snapshot is kept unless the form sets one
    /// or the service changes. Status defaulting, the transition check and
    /// the price choice read the stored record inside the locked write, so a
    /// status change committed meanwhile is never overwritten.
    pub async fn update(&self, id: &str, form: AppointmentForm) -> CollectionResult<AppointmentResponse> {
        info!("Updating appointment: {}", id);
        let existing = self.appointments.get(id).await?;
        let (service, client) = self.resolve_references(&form).await?;
        let policy = self.policy;

        let (before, updated) = {
            let _guard = self.booking_lock.lock().await;
            if form.status.unwrap_or(existing.status) != AppointmentStatus::Cancelled {
                self.ensure_slot_free(form.date, form.time_slot, Some(id)).await?;
            }
            self.appointments
                .modify(id, |current| {
                    let status = form.status.unwrap_or(current.status);
                    policy.check(current.status, status)?;
                    let price = match form.price {
                        Some(price) => price,
                        None if service.id == current.service_id => current.price,
                        None => service.price,
                    };
                    Ok(Appointment {
                        id: current.id.clone(),
                        client_id: client.id.clone(),
                        service_id: service.id.clone(),
                        service_tag: service.tag.clone(),
                        service_name: service.name.clone(),
                        date: form.date,
                        time_slot: form.time_slot,
                        status,
                        price,
                        notes: clean_notes(form.notes.clone()),
                    })
                })
                .await?
        };

        if updated.status != before.status || updated.date != before.date || updated.time_slot != before.time_slot {
            self.events.publish(DomainEvent::AppointmentStatusChanged {
                appointment: updated.clone(),
                client: Some(client),
                previous: before.status,
            });
        }

        Ok(AppointmentResponse {
            success_message: "Appointment has been updated.".to_string(),
            appointment: updated,
        })
    }

    /// Set exactly the status field
    pub async fn set_status(&self, id: &str, status: AppointmentStatus) -> CollectionResult<AppointmentResponse> {
        info!("Setting appointment {} status to {}", id, status);
        let policy = self.policy;
        let (before, after) = self
            .appointments
            .transition(id, |current| {
                policy.check(current.status, status)?;
                Ok(Appointment {
                    status,
                    ..current.clone()
                })
            })
            .await?;

        if before.status != after.status {
            let client = self.clients.find(&after.client_id).await?;
            self.events.publish(DomainEvent::AppointmentStatusChanged {
                appointment: after.clone(),
                client,
                previous: before.status,
            });
        }

        Ok(AppointmentResponse {
            success_message: format!("Appointment marked as {}.", after.status),
            appointment: after,
        })
    }

    /// Public booking form
    pub async fn book(&self, request: BookingRequest) -> CollectionResult<BookingResponse> {
        info!("Booking request: service={} date={} slot={}", request.service, request.date, request.time_slot);
        let today = Local::now().date_naive();

        let mut errors = ValidationErrors::new();
        require_text(&mut errors, "name", &request.name);
        if !is_valid_phone(&request.phone) {
            errors.add("phone", "must be a valid phone number");
        }
        let service = self.catalog.find_by_tag(&request.service).await?;
        if service.is_none() {
            errors.add("service", format!("unknown service '{}'", request.service));
        }
        if request.date < today {
            errors.add("date", "must not be in the past");
        }
        let slot = match request.time_slot.parse::<TimeSlot>() {
            Ok(slot) => Some(slot),
            Err(e) => {
                errors.add("time_slot", e.to_string());
                None
            }
        };
        let (Some(service), Some(slot)) = (service, slot) else {
            warn!("Rejected booking: {}", errors);
            return Err(CollectionError::Validation(errors));
        };
        if !errors.is_empty() {
            warn!("Rejected booking: {}", errors);
            return Err(CollectionError::Validation(errors));
        }

        let (appointment, client) = {
            let _guard = self.booking_lock.lock().await;
            self.ensure_slot_free(request.date, slot, None).await?;

            let client = self
                .clients
                .find_or_create(&request.name, &request.phone, request.email.clone())
                .await?;
            let appointment = self
                .appointments
                .create(Appointment {
                    id: String::new(),
                    client_id: client.id.clone(),
                    service_id: service.id.clone(),
                    service_tag: service.tag.clone(),
                    service_name: service.name.clone(),
                    date: request.date,
                    time_slot: slot,
                    status: AppointmentStatus::Upcoming,
                    price: service.price,
                    notes: clean_notes(request.notes),
                })
                .await?;
            (appointment, client)
        };

        self.events.publish(DomainEvent::AppointmentBooked {
            appointment: appointment.clone(),
            client: client.clone(),
        });

        Ok(BookingResponse {
            success_message: format!(
                "Thank you {}! Your {} appointment on {} at {} is booked.",
                client.name,
                appointment.service_name,
                appointment.date.format("%B %-d, %Y"),
                appointment.time_slot
            ),
            appointment,
            client,
        })
    }

    async fn compose_and_send(&self, id: &str, kind: MessageKind) -> CollectionResult<NotificationLink> {
        let appointment = self.appointments.get(id).await?;
        let client = self.clients.get(&appointment.client_id).await?;
        let message = self.notifier.appointment_message(kind, &appointment, &client)?;
        self.notifier.send(&message).await;
        Ok(message.to_link())
    }

    /// Admin "send reminder" action
    pub async fn reminder_link(&self, id: &str) -> CollectionResult<NotificationLink> {
        self.compose_and_send(id, MessageKind::Reminder).await
    }

    /// Admin "send confirmation" action
    pub async fn confirmation_link(&self, id: &str) -> CollectionResult<NotificationLink> {
        self.compose_and_send(id, MessageKind::Confirmation).await
    }

    pub async fn request_delete(&self, id: &str) -> CollectionResult<DeleteRequestResponse> {
        delete_flow::request(&self.appointments, id).await
    }

    pub async fn confirm_delete(&self) -> CollectionResult<DeleteResultResponse> {
        let deleted = self.appointments.confirm_delete().await?;
        if let Some(appointment) = &deleted {
            self.events.publish(DomainEvent::AppointmentDeleted {
                appointment: appointment.clone(),
            });
        }
        Ok(delete_flow::confirmed(deleted.as_ref()))
    }

    pub fn cancel_delete(&self) -> DeleteResultResponse {
        delete_flow::cancelled(&self.appointments)
    }
}

fn clean_notes(notes: Option<String>) -> Option<String> {
    notes.map(|n| n.trim().to_string()).filter(|n| !n.is_empty())
}
