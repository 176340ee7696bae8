pub mod csv_processor;
pub mod odoo;
pub mod product;
pub mod sync;
pub mod utils;
pub mod xml_export;

pub use csv_processor::{load_product_rows, CsvStreamReader, ProductRow, ProductRows};
pub use odoo::{Credentials, OdooClient, RecordStore};
pub use product::{ProductType, ProductValues};
pub use sync::{ProductSynchronizer, SyncReport, UpsertOutcome};
pub use utils::{AppConfig, ImportError, LangCode, Result};
pub use xml_export::{record_id, XmlEmitter};
