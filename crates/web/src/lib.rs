//! Calculadora Web
//!
//! Serves the calculator form, renders each submission's outcome into the
//! page's result heading, and exposes the same calculation as a JSON API.

pub mod config;
pub mod form;
pub mod page;
pub mod server;
pub mod static_files;

pub use config::WebConfig;
pub use form::{CalculationForm, Calculation, FormError, Outcome};
pub use server::WebServer;
