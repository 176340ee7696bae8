use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub odoo: OdooConfig,
    pub import: ImportDefaults,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OdooConfig {
    pub url: String,
    pub model: String,
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportDefaults {
    pub lang: String,
    pub encoding: String,
    pub xml_output: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for OdooConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:8069".to_string(),
            model: "product.template".to_string(),
            timeout_seconds: 60,
        }
    }
}

impl Default for ImportDefaults {
    fn default() -> Self {
        Self {
            lang: "ar_001".to_string(),
            encoding: "utf-8".to_string(),
            xml_output: PathBuf::from("product_data.xml"),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl LoggingConfig {
    /// `RUST_LOG`, when set and non-empty, takes precedence over the
    /// configured level.
    pub fn env_filter(&self, rust_log: Option<&str>) -> crate::utils::errors::Result<EnvFilter> {
        let directives = match rust_log.map(str::trim).filter(|d| !d.is_empty()) {
            Some(directives) => directives.to_string(),
            None => format!("bilingual_product_import={}", self.level),
        };
        EnvFilter::try_new(&directives).map_err(|e| {
            crate::utils::errors::ImportError::ConfigError(format!(
                "invalid log filter '{}': {}",
                directives, e
            ))
        })
    }
}

impl AppConfig {
    pub fn load_from_file(path: &str) -> crate::utils::errors::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| crate::utils::errors::ImportError::ConfigError(e.to_string()))?;
        toml::from_str(&content)
            .map_err(|e| crate::utils::errors::ImportError::ConfigError(e.to_string()))
    }

    /// A missing file yields the defaults; a file that exists but does not
    /// parse is reported.
    pub fn load_or_default(path: Option<&str>) -> crate::utils::errors::Result<Self> {
        match path {
            Some(p) if std::path::Path::new(p).exists() => Self::load_from_file(p),
            _ => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [odoo]
            url = "https://erp.example.com"

            [import]
            lang = "ar_SA"
            "#,
        )
        .unwrap();

        assert_eq!(config.odoo.url, "https://erp.example.com");
        assert_eq!(config.odoo.model, "product.template");
        assert_eq!(config.odoo.timeout_seconds, 60);
        assert_eq!(config.import.lang, "ar_SA");
        assert_eq!(config.import.encoding, "utf-8");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config = AppConfig::load_or_default(Some("does/not/exist.toml")).unwrap();
        assert_eq!(config.odoo.url, "http://localhost:8069");
        assert_eq!(config.import.lang, "ar_001");
    }

    #[test]
    fn rust_log_overrides_configured_level() {
        let logging = LoggingConfig::default();

        let filter = logging
            .env_filter(Some("bilingual_product_import=debug"))
            .unwrap();
        assert_eq!(filter.to_string(), "bilingual_product_import=debug");

        let filter = logging.env_filter(None).unwrap();
        assert_eq!(filter.to_string(), "bilingual_product_import=info");

        let filter = logging.env_filter(Some("  ")).unwrap();
        assert_eq!(filter.to_string(), "bilingual_product_import=info");
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[odoo\nurl = 1").unwrap();

        let result = AppConfig::load_or_default(path.to_str());
        assert!(matches!(
            result,
            Err(crate::utils::errors::ImportError::ConfigError(_))
        ));
    }
}
