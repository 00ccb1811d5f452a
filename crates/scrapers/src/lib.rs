//! Vendor scrapers.
//!
//! HTTP clients for the loyalty points inquiry and the E-ZPass account
//! site, plus the pure parsing functions they are built from.
//!
//! ## Layout
//!
//! - `source` - `PointsSource` / `TollSource` traits the checks consume
//! - `hmart` - JSON points inquiry
//! - `ezpass` - login and transaction scraping
//! - `form` - form templates and anti-forgery token harvesting

pub mod error;
pub mod ezpass;
pub mod form;
pub mod hmart;
pub mod source;

#[cfg(test)]
mod stub;

pub use error::*;
pub use ezpass::{EzPassClient, EzPassCredentials};
pub use form::{AntiForgeryTokens, Form, FormTemplate};
pub use hmart::{HmartClient, HmartCredentials};
pub use source::{PointsSource, TollSource};
