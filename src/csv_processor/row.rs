use std::collections::HashMap;

pub const EXTERNAL_ID: &str = "External ID";
pub const NAME: &str = "Name";
pub const INTERNAL_REFERENCE: &str = "Internal Reference";
pub const BARCODE: &str = "Barcode";
pub const SALES_PRICE: &str = "Sales Price";
pub const COST: &str = "Cost";
pub const WEIGHT: &str = "Weight";
pub const SALES_DESCRIPTION: &str = "Sales Description";
pub const PRODUCT_TYPE: &str = "Product Type";

/// Columns every English catalog file must carry.
pub const ENGLISH_COLUMNS: &[&str] = &[
    EXTERNAL_ID,
    NAME,
    INTERNAL_REFERENCE,
    BARCODE,
    SALES_PRICE,
    COST,
    WEIGHT,
    SALES_DESCRIPTION,
    PRODUCT_TYPE,
];

/// Columns a translation file must carry.
pub const TRANSLATION_COLUMNS: &[&str] = &[EXTERNAL_ID, NAME, SALES_DESCRIPTION];

/// One CSV record: column name to cell value, in header order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductRow {
    fields: Vec<(String, String)>,
}

impl ProductRow {
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            fields: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value.as_str())
    }

    /// Cell value, or the empty string when the column is absent.
    pub fn value(&self, column: &str) -> &str {
        self.get(column).unwrap_or("")
    }

    pub fn external_id(&self) -> &str {
        self.value(EXTERNAL_ID)
    }
}

/// Rows keyed by External ID, iterated in the order the IDs first appeared.
#[derive(Debug, Clone, Default)]
pub struct ProductRows {
    rows: Vec<ProductRow>,
    index: HashMap<String, usize>,
}

impl ProductRows {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a row. A row with an already-seen External ID replaces the
    /// earlier one in place and the replaced row is returned.
    pub fn insert(&mut self, row: ProductRow) -> Option<ProductRow> {
        let key = row.external_id().to_string();
        match self.index.get(&key) {
            Some(&position) => Some(std::mem::replace(&mut self.rows[position], row)),
            None => {
                self.index.insert(key, self.rows.len());
                self.rows.push(row);
                None
            }
        }
    }

    pub fn get(&self, external_id: &str) -> Option<&ProductRow> {
        self.index.get(external_id).map(|&i| &self.rows[i])
    }

    pub fn contains(&self, external_id: &str) -> bool {
        self.index.contains_key(external_id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ProductRow> {
        self.rows.iter()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl<'a> IntoIterator for &'a ProductRows {
    type Item = &'a ProductRow;
    type IntoIter = std::slice::Iter<'a, ProductRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl FromIterator<ProductRow> for ProductRows {
    fn from_iter<I: IntoIterator<Item = ProductRow>>(iter: I) -> Self {
        let mut rows = Self::new();
        for row in iter {
            rows.insert(row);
        }
        rows
    }
}
