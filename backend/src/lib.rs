//! # Beauty Palace Backend
//!
//! Back-office for a beauty salon: the public booking site's API and the
//! admin dashboard's collections (appointments, services, clients, offers,
//! reviews, settings and the media library).
//!
//! ## Architecture
//!
//! ```text
//! IO Layer (REST API, handlers, auth middleware)
//!     ↓
//! Domain Layer (services, collection manager, notifier)
//!     ↓
//! Storage Layer (in-memory or CSV/YAML files)
//! ```

pub mod config;
pub mod domain;
pub mod io;
pub mod storage;

use anyhow::Result;
use axum::{
    http::{HeaderValue, Method},
    middleware, Router,
};
use chrono::{Duration as ChronoDuration, Local};
use log::{info, warn};
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::{AppConfig, ServerConfig, StorageBackend, StorageConfig};
use crate::domain::appointment_service::AppointmentService;
use crate::domain::auth::{self, AdminAuthenticator, AuthGate, JwtAuthGate};
use crate::domain::catalog_service::CatalogService;
use crate::domain::client_service::ClientService;
use crate::domain::collection::CollectionManager;
use crate::domain::dashboard_service::DashboardService;
use crate::domain::fixtures::Fixtures;
use crate::domain::media_service::MediaService;
use crate::domain::models::Validate;
use crate::domain::notification::{
    EventBus, FanOutChannel, LoggingChannel, MessageChannel, NotificationDispatcher, NotificationOutbox, Notifier,
};
use crate::domain::offer_service::OfferService;
use crate::domain::reminder_scheduler::ReminderScheduler;
use crate::domain::review_service::ReviewService;
use crate::domain::settings_service::SettingsService;
use crate::storage::{
    CsvConnection, CsvEntity, CsvRepository, DocumentStorage, InMemoryDocument, InMemoryRepository, Repository,
    YamlDocument,
};
use shared::{MediaCategory, SalonSettings};

/// Main application state that holds all services
#[derive(Clone)]
pub struct AppState {
    pub catalog: CatalogService,
    pub appointments: AppointmentService,
    pub clients: ClientService,
    pub offers: OfferService,
    pub reviews: ReviewService,
    pub settings: SettingsService,
    pub media: MediaService,
    pub dashboard: DashboardService,
    pub outbox: NotificationOutbox,
    pub reminders: ReminderScheduler,
    pub auth_gate: Arc<dyn AuthGate>,
    pub authenticator: AdminAuthenticator,
}

/// Where collections and documents live
enum StorageLayout {
    Memory,
    Csv(CsvConnection),
}

impl StorageLayout {
    fn open(config: &StorageConfig) -> Result<Self> {
        match config.backend {
            StorageBackend::Memory => Ok(StorageLayout::Memory),
            StorageBackend::Csv => Ok(StorageLayout::Csv(CsvConnection::new(&config.data_directory)?)),
        }
    }

    fn collection<T: CsvEntity + Validate>(&self, seed: &[T], latency: Option<Duration>) -> Result<CollectionManager<T>> {
        let repository: Arc<dyn Repository<T>> = match self {
            StorageLayout::Memory => Arc::new(InMemoryRepository::with_seed(seed)),
            StorageLayout::Csv(connection) => Arc::new(CsvRepository::with_seed(connection.clone(), seed)?),
        };
        Ok(CollectionManager::new(repository).with_latency(latency))
    }

    fn document<D>(&self, file_name: &'static str) -> Arc<dyn DocumentStorage<D>>
    where
        D: serde::Serialize + serde::de::DeserializeOwned + Clone + Send + Sync + 'static,
    {
        match self {
            StorageLayout::Memory => Arc::new(InMemoryDocument::new(None)),
            StorageLayout::Csv(connection) => Arc::new(YamlDocument::new(connection.clone(), file_name)),
        }
    }
}

/// Initialize the backend with all required services and start the
/// notification and reminder listeners
pub async fn initialize_backend(config: &AppConfig) -> Result<AppState> {
    info!("Setting up storage ({:?})", config.storage.backend);
    let layout = StorageLayout::open(&config.storage)?;
    let latency = config.storage.simulated_latency_ms.map(Duration::from_millis);

    let fixtures = if config.storage.seed_fixtures {
        Fixtures::build(Local::now().date_naive())
    } else {
        Fixtures::empty()
    };

    let services = layout.collection(&fixtures.services, latency)?;
    let clients = layout.collection(&fixtures.clients, latency)?;
    let appointments = layout.collection(&fixtures.appointments, latency)?;
    let offers = layout.collection(&fixtures.offers, latency)?;
    let reviews = layout.collection(&fixtures.reviews, latency)?;
    let settings = SettingsService::new(layout.document::<SalonSettings>("settings.yaml"));
    let media = MediaService::new(layout.document::<Vec<MediaCategory>>("media.yaml"));

    info!("Setting up notifications");
    let outbox = NotificationOutbox::new(config.notifications.outbox_capacity);
    let channels: Vec<Arc<dyn MessageChannel>> = vec![Arc::new(outbox.clone()), Arc::new(LoggingChannel)];
    let notifier = Notifier::new(
        config.notifications.domain.clone(),
        config.notifications.owner_phone.clone(),
        Arc::new(FanOutChannel::new(channels)),
    );
    let events = EventBus::default();

    NotificationDispatcher::new(notifier.clone(), settings.clone()).spawn(events.subscribe());
    let reminders = ReminderScheduler::new(notifier.clone(), settings.clone());
    reminders.clone().spawn(events.subscribe());
    reminders
        .schedule_existing(&appointments.list().await?, &clients.list().await?)
        .await;

    info!("Setting up domain model");
    let policy = config.policy.status_transitions;
    let catalog = CatalogService::new(services);
    let client_service = ClientService::new(clients.clone(), appointments.clone());
    let appointment_service = AppointmentService::new(
        appointments.clone(),
        client_service.clone(),
        catalog.clone(),
        events.clone(),
        notifier,
        policy,
    );
    let dashboard = DashboardService::new(appointments, clients, reviews.clone());

    info!("Setting up authentication");
    let secret = match &config.auth.jwt_secret {
        Some(secret) => secret.clone(),
        None => {
            warn!("No JWT secret configured, sessions will not survive a restart");
            auth::random_secret()
        }
    };
    if config.auth.admin_password_hash.is_none() {
        warn!("No admin password configured, admin login is disabled");
    }
    let gate = Arc::new(JwtAuthGate::new(
        &secret,
        ChronoDuration::hours(config.auth.token_lifetime_hours),
    ));
    let authenticator = AdminAuthenticator::new(
        config.auth.admin_username.clone(),
        config.auth.admin_password_hash.clone(),
        Arc::clone(&gate),
    );

    info!("Setting up application state");
    Ok(AppState {
        catalog,
        appointments: appointment_service,
        clients: client_service,
        offers: OfferService::new(offers),
        reviews: ReviewService::new(reviews, settings.clone(), events, policy),
        settings,
        media,
        dashboard,
        outbox,
        reminders,
        auth_gate: gate,
        authenticator,
    })
}

fn cors_layer(server: &ServerConfig) -> CorsLayer {
    let origin = match server.allowed_origin.as_deref().map(str::parse::<HeaderValue>) {
        Some(Ok(origin)) => AllowOrigin::exact(origin),
        Some(Err(e)) => {
            warn!("Ignoring invalid CORS origin: {}", e);
            AllowOrigin::any()
        }
        None => AllowOrigin::any(),
    };
    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any)
}

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState, server: &ServerConfig) -> Router {
    let admin_routes = io::rest::admin_router()
        .route_layer(middleware::from_fn_with_state(app_state.clone(), io::rest::middleware::require_admin));

    let api_routes = io::rest::public_router().nest("/admin", admin_routes);

    Router::new()
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(server))
        .with_state(app_state)
}
