use crate::csv_processor::{row, ProductRow};
use crate::odoo::{Vals, Value};
use crate::product::fields;
use crate::utils::{ImportError, Result};
use std::fmt;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductType {
    Product,
    Service,
}

impl ProductType {
    /// `"Goods"` is a stockable product; every other label, blank included,
    /// is a service. Labels are not validated.
    pub fn from_label(label: &str) -> Self {
        if label == "Goods" {
            ProductType::Product
        } else {
            ProductType::Service
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProductType::Product => "product",
            ProductType::Service => "service",
        }
    }
}

impl fmt::Display for ProductType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Base-language field values of a product, as derived from an English row.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductValues {
    pub name: String,
    pub default_code: String,
    pub barcode: Option<String>,
    pub list_price: f64,
    pub standard_price: f64,
    pub weight: f64,
    pub description_sale: String,
    pub product_type: ProductType,
}

impl ProductValues {
    pub fn from_row(row: &ProductRow) -> Result<Self> {
        let type_label = row.value(row::PRODUCT_TYPE);
        let product_type = ProductType::from_label(type_label);
        if !type_label.is_empty() && type_label != "Goods" && type_label != "Service" {
            debug!(
                external_id = %row.external_id(),
                label = %type_label,
                "Unrecognized product type, importing as service"
            );
        }

        let barcode = row.value(row::BARCODE);

        Ok(Self {
            name: row.value(row::NAME).to_string(),
            default_code: row.value(row::INTERNAL_REFERENCE).to_string(),
            barcode: (!barcode.is_empty()).then(|| barcode.to_string()),
            list_price: parse_amount(row, row::SALES_PRICE)?,
            standard_price: parse_amount(row, row::COST)?,
            weight: parse_amount(row, row::WEIGHT)?,
            description_sale: row.value(row::SALES_DESCRIPTION).to_string(),
            product_type,
        })
    }

    /// Values for `create` and for the base-language `write`.
    pub fn to_vals(&self) -> Vals {
        let mut vals = Vals::new();
        vals.insert(fields::NAME.to_string(), Value::from(self.name.as_str()));
        vals.insert(
            fields::DEFAULT_CODE.to_string(),
            Value::from(self.default_code.as_str()),
        );
        vals.insert(
            fields::BARCODE.to_string(),
            match &self.barcode {
                Some(barcode) => Value::from(barcode.as_str()),
                None => Value::Bool(false),
            },
        );
        vals.insert(fields::LIST_PRICE.to_string(), Value::Double(self.list_price));
        vals.insert(
            fields::STANDARD_PRICE.to_string(),
            Value::Double(self.standard_price),
        );
        vals.insert(fields::WEIGHT.to_string(), Value::Double(self.weight));
        vals.insert(
            fields::DESCRIPTION_SALE.to_string(),
            Value::from(self.description_sale.as_str()),
        );
        vals.insert(
            fields::TYPE.to_string(),
            Value::from(self.product_type.as_str()),
        );
        vals
    }
}

/// Parses a numeric cell; blank (after trimming) is `0.0`.
pub fn parse_amount(row: &ProductRow, column: &str) -> Result<f64> {
    let raw = row.value(column).trim();
    if raw.is_empty() {
        return Ok(0.0);
    }
    raw.parse::<f64>().map_err(|_| ImportError::InvalidNumber {
        column: column.to_string(),
        value: raw.to_string(),
        external_id: row.external_id().to_string(),
    })
}
