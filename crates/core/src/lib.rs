//! Core data types for checkbot.
//!
//! Readings scraped from the vendors, the transaction model of the toll
//! account, and the chat messages built from them.

pub mod amount;
pub mod message;
pub mod points;
pub mod toll;

pub use amount::*;
pub use message::*;
pub use points::*;
pub use toll::*;
