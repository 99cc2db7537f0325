//! Seed data for a fresh salon: the catalogue, a handful of regular clients,
//! a deterministic week of appointments around the start-up date, the current
//! offers, testimonials and the media library.

use chrono::{Duration, NaiveDate};
use shared::{
    Appointment, AppointmentStatus, Client, MediaCategory, MediaImage, Offer, Review, ReviewStatus, Service,
    TimeSlot,
};

const CDN: &str = "https://ik.imagekit.io/beautypalace";

#[derive(Debug, Clone)]
pub struct Fixtures {
    pub services: Vec<Service>,
    pub clients: Vec<Client>,
    pub appointments: Vec<Appointment>,
    pub offers: Vec<Offer>,
    pub reviews: Vec<Review>,
    pub media: Vec<MediaCategory>,
}

impl Fixtures {
    /// Seed data with appointments placed relative to `today`
    pub fn build(today: NaiveDate) -> Self {
        let services = services();
        let clients = clients();
        let appointments = appointments(today, &services, &clients);
        Self {
            services,
            clients,
            appointments,
            offers: offers(),
            reviews: reviews(),
            media: media_library(),
        }
    }

    /// No seed records; documents still fall back to their defaults
    pub fn empty() -> Self {
        Self {
            services: Vec::new(),
            clients: Vec::new(),
            appointments: Vec::new(),
            offers: Vec::new(),
            reviews: Vec::new(),
            media: Vec::new(),
        }
    }
}

fn service(tag: &str, name: &str, description: &str, price: f64, duration_minutes: u32) -> Service {
    Service {
        id: format!("service::{}", tag),
        tag: tag.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        price,
        duration_minutes,
        image_url: Some(format!("{}/services/{}.jpg", CDN, tag)),
    }
}

pub fn services() -> Vec<Service> {
    vec![
        service(
            "haircut",
            "Haircut & Styling",
            "Professional haircut and styling tailored to your face shape and preferences.",
            60.0,
            60,
        ),
        service(
            "facial",
            "Facial Treatment",
            "Rejuvenating facial treatment to cleanse, exfoliate, and hydrate your skin.",
            85.0,
            75,
        ),
        service(
            "smoothing",
            "Hair Smoothing",
            "Smooth and silky hair treatment to eliminate frizz and add shine.",
            120.0,
            120,
        ),
        service(
            "keratin",
            "Keratin Treatment",
            "Long-lasting keratin treatment to strengthen and repair damaged hair.",
            150.0,
            150,
        ),
        service(
            "waxing",
            "Waxing Services",
            "Professional waxing services for smooth and hair-free skin.",
            40.0,
            30,
        ),
        service(
            "makeup",
            "Professional Makeup",
            "Expert makeup application for special occasions or everyday glamour.",
            75.0,
            60,
        ),
    ]
}

fn client(slug: &str, name: &str, phone: &str, email: Option<&str>) -> Client {
    Client {
        id: format!("client::{}", slug),
        name: name.to_string(),
        phone: phone.to_string(),
        email: email.map(str::to_string),
    }
}

pub fn clients() -> Vec<Client> {
    vec![
        client("sarah-johnson", "Sarah Johnson", "+1234567890", Some("sarah@email.com")),
        client("emily-davis", "Emily Davis", "+1234567891", Some("emily@email.com")),
        client("michelle-wong", "Michelle Wong", "+1234567892", None),
        client("jessica-smith", "Jessica Smith", "+1234567893", None),
        client("amanda-lee", "Amanda Lee", "+1234567894", None),
    ]
}

/// (client index, service index, day offset, slot, status, note)
type AppointmentPlan = (usize, usize, i64, &'static str, AppointmentStatus, Option<&'static str>);

const APPOINTMENT_PLAN: [AppointmentPlan; 12] = [
    (0, 0, -6, "10:00 AM", AppointmentStatus::Completed, None),
    (2, 3, -5, "1:00 PM", AppointmentStatus::Completed, None),
    (1, 1, -4, "11:30 AM", AppointmentStatus::Completed, None),
    (3, 4, -3, "2:30 PM", AppointmentStatus::Cancelled, None),
    (4, 5, -2, "4:00 PM", AppointmentStatus::Completed, Some("Evening event look")),
    (0, 1, -1, "9:00 AM", AppointmentStatus::Completed, None),
    (0, 0, 0, "10:00 AM", AppointmentStatus::Upcoming, None),
    (1, 1, 0, "11:30 AM", AppointmentStatus::Upcoming, Some("First time client")),
    (2, 3, 0, "1:00 PM", AppointmentStatus::Upcoming, None),
    (3, 4, 1, "2:30 PM", AppointmentStatus::Upcoming, None),
    (4, 5, 2, "4:00 PM", AppointmentStatus::Upcoming, None),
    (2, 2, 4, "9:30 AM", AppointmentStatus::Upcoming, Some("First time client")),
];

pub fn appointments(today: NaiveDate, services: &[Service], clients: &[Client]) -> Vec<Appointment> {
    APPOINTMENT_PLAN
        .iter()
        .enumerate()
        .filter_map(|(i, (client_index, service_index, offset, slot, status, note))| {
            let client = clients.get(*client_index)?;
            let service = services.get(*service_index)?;
            let time_slot: TimeSlot = slot.parse().ok()?;
            Some(Appointment {
                id: format!("appointment::seed-{:02}", i + 1),
                client_id: client.id.clone(),
                service_id: service.id.clone(),
                service_tag: service.tag.clone(),
                service_name: service.name.clone(),
                date: today + Duration::days(*offset),
                time_slot,
                status: *status,
                price: service.price,
                notes: (*note).map(str::to_string),
            })
        })
        .collect()
}

fn offer(slug: &str, title: &str, description: &str, discount: &str, validity: &str, terms: &str, active: bool) -> Offer {
    Offer {
        id: format!("offer::{}", slug),
        title: title.to_string(),
        description: description.to_string(),
        discount_label: discount.to_string(),
        validity_label: validity.to_string(),
        terms: terms.to_string(),
        is_active: active,
    }
}

pub fn offers() -> Vec<Offer> {
    vec![
        offer(
            "new-client-special",
            "New Client Special",
            "Get 20% off your first visit to Beauty Palace",
            "20% OFF",
            "Dec 31, 2024",
            "Valid for first-time clients only",
            true,
        ),
        offer(
            "bridal-package",
            "Bridal Package",
            "Complete bridal makeover including hair, makeup, and skincare",
            "30% OFF",
            "Jan 15, 2025",
            "Book 2 weeks in advance",
            true,
        ),
        offer(
            "weekend-wellness",
            "Weekend Wellness",
            "Facial + Hair treatment combo every Saturday & Sunday",
            "25% OFF",
            "Ongoing",
            "Weekends only",
            false,
        ),
    ]
}

fn review(
    n: usize,
    author: &str,
    service: &str,
    rating: f64,
    comment: &str,
    date_label: &str,
    status: ReviewStatus,
) -> Review {
    Review {
        id: format!("review::seed-{}", n),
        author_name: author.to_string(),
        service_name: Some(service.to_string()),
        rating,
        comment: comment.to_string(),
        images: vec![format!("{}/reviews/client-{}.jpg", CDN, n)],
        date_label: date_label.to_string(),
        status,
    }
}

pub fn reviews() -> Vec<Review> {
    vec![
        review(
            1,
            "Sarah Johnson",
            "Haircut & Styling",
            5.0,
            "Absolutely loved my haircut and styling! The staff was professional and friendly. Will definitely be coming back.",
            "2 weeks ago",
            ReviewStatus::Approved,
        ),
        review(
            2,
            "Emily Davis",
            "Facial Treatment",
            4.5,
            "The facial treatment was so relaxing and my skin feels amazing. Highly recommend their skincare services.",
            "1 month ago",
            ReviewStatus::Approved,
        ),
        review(
            3,
            "Michelle Wong",
            "Keratin Treatment",
            5.0,
            "I got the keratin treatment and my hair has never looked better. Worth every penny!",
            "3 weeks ago",
            ReviewStatus::Pending,
        ),
        review(
            4,
            "Jessica Smith",
            "Waxing Services",
            4.0,
            "Great waxing service, quick and relatively painless. The salon is clean and well-maintained.",
            "2 months ago",
            ReviewStatus::Pending,
        ),
        review(
            5,
            "Amanda Lee",
            "Professional Makeup",
            5.0,
            "Had my makeup done for a special event and received so many compliments. The makeup artist was talented and listened to what I wanted.",
            "1 week ago",
            ReviewStatus::Approved,
        ),
        review(
            6,
            "Rachel Green",
            "Hair Smoothing",
            4.5,
            "The hair smoothing treatment transformed my frizzy hair. The staff was knowledgeable and gave me great tips for maintenance.",
            "1 month ago",
            ReviewStatus::Pending,
        ),
    ]
}

fn image(id: &str, name: &str, path: &str) -> MediaImage {
    MediaImage {
        id: id.to_string(),
        name: name.to_string(),
        url: format!("{}/{}", CDN, path),
    }
}

pub fn media_library() -> Vec<MediaCategory> {
    vec![
        MediaCategory {
            id: "hero".to_string(),
            name: "Hero Section".to_string(),
            description: "Background images for the hero section slider".to_string(),
            images: (1..=4)
                .map(|n| {
                    let name = if n == 1 {
                        "Main Background".to_string()
                    } else {
                        format!("Hero Image {}", n)
                    };
                    image(&format!("hero-{}", n), &name, &format!("hero/salon-bg-{}.jpg", n))
                })
                .collect(),
        },
        MediaCategory {
            id: "services".to_string(),
            name: "Services".to_string(),
            description: "Images for service cards".to_string(),
            images: [
                ("Haircut", "haircut"),
                ("Facial", "facial"),
                ("Hair Smoothing", "smoothing"),
                ("Keratin Treatment", "keratin"),
                ("Waxing", "waxing"),
                ("Makeup", "makeup"),
            ]
            .iter()
            .enumerate()
            .map(|(i, (name, file))| image(&format!("service-{}", i + 1), name, &format!("services/{}.jpg", file)))
            .collect(),
        },
        MediaCategory {
            id: "reviews".to_string(),
            name: "Client Reviews".to_string(),
            description: "Profile images for client testimonials".to_string(),
            images: reviews()
                .iter()
                .enumerate()
                .map(|(i, r)| {
                    image(
                        &format!("review-{}", i + 1),
                        &r.author_name,
                        &format!("reviews/client-{}.jpg", i + 1),
                    )
                })
                .collect(),
        },
    ]
}
