pub mod fields;
pub mod values;

pub use fields::{is_translatable, translatable_fields, FieldSpec, PRODUCT_FIELDS};
pub use values::{parse_amount, ProductType, ProductValues};

pub const PRODUCT_MODEL: &str = "product.template";
