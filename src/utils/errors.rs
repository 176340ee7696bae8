use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Encoding error in {path}: {reason}")]
    EncodingError { path: String, reason: String },

    #[error("Missing column '{column}' in {path}")]
    MissingColumn { path: String, column: String },

    #[error("Invalid number '{value}' in column '{column}' (External ID {external_id})")]
    InvalidNumber {
        column: String,
        value: String,
        external_id: String,
    },

    #[error("Authentication failed for user '{user}' on database '{db}'")]
    AuthenticationFailed { db: String, user: String },

    #[error("Missing argument: {0}")]
    MissingArgument(String),

    #[error("HTTP request error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("XML error: {0}")]
    XmlError(#[from] quick_xml::Error),

    #[error("XML-RPC fault {code}: {message}")]
    Fault { code: i64, message: String },

    #[error("Unexpected XML-RPC response: {0}")]
    ProtocolError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

pub type Result<T> = std::result::Result<T, ImportError>;
