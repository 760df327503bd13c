//! # GatherBot Channels
//! Outbound channel implementations for the group broadcast.

pub mod console;
pub mod whatsapp;

pub use console::ConsoleChannel;
pub use whatsapp::TwilioWhatsAppChannel;
