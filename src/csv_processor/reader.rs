use crate::csv_processor::row::{ProductRow, ProductRows};
use crate::utils::{ImportError, Result};
use encoding_rs::Encoding;
use std::path::Path;
use tracing::{debug, warn};

pub struct CsvStreamReader {
    path: String,
    encoding: &'static Encoding,
}

impl CsvStreamReader {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            encoding: encoding_rs::UTF_8,
        }
    }

    /// Selects the text encoding by WHATWG label (`utf-8`, `windows-1256`, ...).
    pub fn with_encoding(mut self, label: &str) -> Result<Self> {
        self.encoding = Encoding::for_label(label.trim().as_bytes()).ok_or_else(|| {
            ImportError::EncodingError {
                path: self.path.clone(),
                reason: format!("unknown encoding label '{}'", label),
            }
        })?;
        Ok(self)
    }

    /// Loads every record keyed by External ID. Fails before reading any
    /// record when one of `required_columns` is missing from the header.
    pub fn load_rows(&self, required_columns: &[&str]) -> Result<ProductRows> {
        let mut reader = self.open()?;
        let headers = reader.headers()?.clone();

        if let Some(missing) = required_columns
            .iter()
            .find(|column| !headers.iter().any(|h| h == **column))
        {
            return Err(ImportError::MissingColumn {
                path: self.path.clone(),
                column: missing.to_string(),
            });
        }

        let mut rows = ProductRows::new();
        for result in reader.records() {
            let record = result?;
            let row = ProductRow::from_pairs(headers.iter().zip(record.iter()));
            if let Some(previous) = rows.insert(row) {
                warn!(
                    path = %self.path,
                    external_id = %previous.external_id(),
                    "Duplicate External ID, later row replaces earlier one"
                );
            }
        }

        debug!(path = %self.path, rows = rows.len(), "Loaded CSV rows");
        Ok(rows)
    }

    fn open(&self) -> Result<csv::Reader<std::io::Cursor<Vec<u8>>>> {
        let text = self.decode()?;
        Ok(csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(std::io::Cursor::new(text.into_bytes())))
    }

    fn decode(&self) -> Result<String> {
        if !file_exists(&self.path) {
            return Err(ImportError::FileNotFound(self.path.clone()));
        }
        let bytes = std::fs::read(&self.path)?;

        let (encoding, body) = match Encoding::for_bom(&bytes) {
            Some((bom_encoding, bom_len)) => (bom_encoding, &bytes[bom_len..]),
            None => (self.encoding, &bytes[..]),
        };

        encoding
            .decode_without_bom_handling_and_without_replacement(body)
            .map(|text| text.into_owned())
            .ok_or_else(|| ImportError::EncodingError {
                path: self.path.clone(),
                reason: format!("malformed {} byte sequence", encoding.name()),
            })
    }
}

pub fn file_exists(path: &str) -> bool {
    Path::new(path).exists()
}

/// Shorthand for loading a file with the given encoding label.
pub fn load_product_rows(
    path: &str,
    encoding: &str,
    required_columns: &[&str],
) -> Result<ProductRows> {
    CsvStreamReader::new(path)
        .with_encoding(encoding)?
        .load_rows(required_columns)
}
