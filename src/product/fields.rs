use crate::csv_processor::row;

pub const NAME: &str = "name";
pub const DEFAULT_CODE: &str = "default_code";
pub const BARCODE: &str = "barcode";
pub const LIST_PRICE: &str = "list_price";
pub const STANDARD_PRICE: &str = "standard_price";
pub const WEIGHT: &str = "weight";
pub const DESCRIPTION_SALE: &str = "description_sale";
pub const TYPE: &str = "type";

/// How a product field is fed from the CSV and whether the ORM keeps one
/// value per language for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub column: &'static str,
    pub translatable: bool,
}

pub const PRODUCT_FIELDS: &[FieldSpec] = &[
    FieldSpec { name: NAME, column: row::NAME, translatable: true },
    FieldSpec { name: TYPE, column: row::PRODUCT_TYPE, translatable: false },
    FieldSpec { name: DEFAULT_CODE, column: row::INTERNAL_REFERENCE, translatable: false },
    FieldSpec { name: BARCODE, column: row::BARCODE, translatable: false },
    FieldSpec { name: LIST_PRICE, column: row::SALES_PRICE, translatable: false },
    FieldSpec { name: STANDARD_PRICE, column: row::COST, translatable: false },
    FieldSpec { name: WEIGHT, column: row::WEIGHT, translatable: false },
    FieldSpec { name: DESCRIPTION_SALE, column: row::SALES_DESCRIPTION, translatable: true },
];

pub fn field(name: &str) -> Option<&'static FieldSpec> {
    PRODUCT_FIELDS.iter().find(|f| f.name == name)
}

/// Unknown fields are treated as not translatable.
pub fn is_translatable(name: &str) -> bool {
    field(name).map(|f| f.translatable).unwrap_or(false)
}

pub fn translatable_fields() -> impl Iterator<Item = &'static FieldSpec> {
    PRODUCT_FIELDS.iter().filter(|f| f.translatable)
}
