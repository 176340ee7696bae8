use crate::utils::errors::{ImportError, Result};
use std::fmt;

/// An Odoo language code such as `ar_001`, `en_US` or `sr@latin`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LangCode(String);

impl LangCode {
    /// Normalizes the common spellings of a locale (`ar-SA`, `AR_sa`,
    /// `sr-rs@latin`) to Odoo's `lang_REGION[@variant]` form. Codes of any
    /// other shape are kept as given; only an empty code is rejected.
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ImportError::ConfigError(
                "language code must not be empty".to_string(),
            ));
        }

        let (base, variant) = match trimmed.split_once('@') {
            Some((base, variant)) => (base, Some(variant)),
            None => (trimmed, None),
        };

        let code = match normalize_locale(base) {
            Some(base) => match variant {
                Some(variant) => format!("{}@{}", base, variant),
                None => base,
            },
            None => trimmed.to_string(),
        };

        Ok(Self(code))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// `language[_-]region` with an alphabetic language and an alphanumeric
/// region; `None` for anything else.
fn normalize_locale(base: &str) -> Option<String> {
    let unified = base.replace('-', "_");
    let (language, region) = match unified.split_once('_') {
        Some((language, region)) => (language, Some(region)),
        None => (unified.as_str(), None),
    };

    if language.is_empty() || !language.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    let language = language.to_ascii_lowercase();

    match region {
        None => Some(language),
        Some(region) if region.is_empty() || !region.chars().all(|c| c.is_ascii_alphanumeric()) => {
            None
        }
        Some(region) if region.chars().all(|c| c.is_ascii_digit()) => {
            Some(format!("{}_{}", language, region))
        }
        Some(region) => Some(format!("{}_{}", language, region.to_ascii_uppercase())),
    }
}

impl fmt::Display for LangCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
