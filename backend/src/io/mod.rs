//! # IO Module
//!
//! Interface layer between HTTP clients (the public site and the admin
//! dashboard) and the domain services. Handlers translate JSON requests into
//! service calls and domain errors into status codes; no business rules live
//! here.

pub mod rest;
