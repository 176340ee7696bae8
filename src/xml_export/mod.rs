//! Renders English rows as an Odoo XML data file for a fresh database load.

use crate::csv_processor::{ProductRow, ProductRows};
use crate::product::{fields, ProductValues, PRODUCT_MODEL};
use crate::utils::{escape_xml, Result};
use std::path::Path;
use tracing::info;

/// Record id for the data file: the part of the External ID after the last
/// `.`, or the whole External ID when it has no module prefix.
pub fn record_id(external_id: &str) -> &str {
    match external_id.rfind('.') {
        Some(pos) => &external_id[pos + 1..],
        None => external_id,
    }
}

pub struct XmlEmitter {
    model: String,
}

impl Default for XmlEmitter {
    fn default() -> Self {
        Self {
            model: PRODUCT_MODEL.to_string(),
        }
    }
}

impl XmlEmitter {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
        }
    }

    pub fn render(&self, rows: &ProductRows) -> Result<String> {
        let mut xml = String::from(
            "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<odoo>\n    <data noupdate=\"0\">\n",
        );
        for row in rows {
            self.write_record(&mut xml, row)?;
        }
        xml.push_str("\n    </data>\n</odoo>\n");
        Ok(xml)
    }

    fn write_record(&self, xml: &mut String, row: &ProductRow) -> Result<()> {
        let values = ProductValues::from_row(row)?;

        xml.push_str(&format!(
            "\n        <record id=\"{}\" model=\"{}\">\n",
            escape_xml(record_id(row.external_id())),
            escape_xml(&self.model)
        ));
        push_field(xml, fields::NAME, &values.name);
        push_field(xml, fields::TYPE, values.product_type.as_str());
        push_field(xml, fields::DEFAULT_CODE, &values.default_code);
        match &values.barcode {
            Some(barcode) => push_field(xml, fields::BARCODE, barcode),
            None => xml.push_str(&format!(
                "            <field name=\"{}\" eval=\"False\"/>\n",
                fields::BARCODE
            )),
        }
        push_field(xml, fields::LIST_PRICE, &format!("{:?}", values.list_price));
        push_field(xml, fields::STANDARD_PRICE, &format!("{:?}", values.standard_price));
        push_field(xml, fields::WEIGHT, &format!("{:?}", values.weight));
        push_field(xml, fields::DESCRIPTION_SALE, &values.description_sale);
        xml.push_str("        </record>\n");
        Ok(())
    }

    /// Renders `rows` and writes them to `output`, returning the record count.
    pub async fn write_file(&self, rows: &ProductRows, output: &Path) -> Result<usize> {
        let xml = self.render(rows)?;
        tokio::fs::write(output, xml).await?;
        info!(path = %output.display(), records = rows.len(), "Generated XML file");
        Ok(rows.len())
    }
}

fn push_field(xml: &mut String, name: &str, text: &str) {
    xml.push_str(&format!(
        "            <field name=\"{}\">{}</field>\n",
        name,
        escape_xml(text)
    ));
}
