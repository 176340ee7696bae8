pub mod config;
pub mod errors;
pub mod lang;

pub use config::{AppConfig, ImportDefaults, LoggingConfig, OdooConfig};
pub use errors::{ImportError, Result};
pub use lang::LangCode;

/// Escapes text for use in XML element content or attribute values.
pub fn escape_xml(value: &str) -> String {
    quick_xml::escape::escape(value).into_owned()
}
