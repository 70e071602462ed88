//! Backend library for the Atelier fine-arts academy back office.
//!
//! Layout follows a hexagonal boundary: `domain` holds entities, services
//! (schema evolution, notification fan-out), and ports; `inbound` adapts
//! HTTP onto the domain; `outbound` adapts the domain onto PostgreSQL,
//! SMTP, FCM, and the in-process notification queue.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

pub use middleware::Trace;
