pub mod reader;
pub mod row;

pub use reader::{file_exists, load_product_rows, CsvStreamReader};
pub use row::{ProductRow, ProductRows, ENGLISH_COLUMNS, TRANSLATION_COLUMNS};
