//! # GatherBot Gateway
//! Inbound HTTP surface: the Twilio WhatsApp webhook and a health endpoint.

pub mod routes;
pub mod server;

pub use server::{AppState, build_router, start};
