//! # Domain Module
//!
//! Business logic for the salon back-office. Services sit between the REST
//! layer and storage and own validation, status policy and event publishing.
//!
//! - [`collection`]: the generic collection manager every admin screen uses
//! - [`models`]: entity trait, validation and domain errors
//! - [`notification`]: event bus, deep-link composition and message channels
//! - one service per admin screen (appointments, catalogue, clients, offers,
//!   reviews, settings, media, dashboard)

pub mod appointment_service;
pub mod auth;
pub mod catalog_service;
pub mod client_service;
pub mod collection;
pub mod dashboard_service;
pub mod delete_flow;
pub mod fixtures;
pub mod media_service;
pub mod models;
pub mod notification;
pub mod offer_service;
pub mod projections;
pub mod reminder_scheduler;
pub mod review_service;
pub mod settings_service;
