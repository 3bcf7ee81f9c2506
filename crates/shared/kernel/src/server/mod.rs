//! HTTP surface of the service: the liveness handler, its route registration and the
//! API description publisher.

pub mod docs;
mod health;
pub mod router;

pub use docs::{ApiDescription, Endpoint};
