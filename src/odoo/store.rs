use crate::odoo::value::Value;
use crate::utils::{LangCode, Result};
use async_trait::async_trait;
use std::collections::BTreeMap;

/// Field name to value, as sent to `create` and `write`.
pub type Vals = BTreeMap<String, Value>;

/// One `(field, operator, value)` search criterion.
#[derive(Debug, Clone, PartialEq)]
pub struct DomainTerm {
    pub field: String,
    pub operator: String,
    pub value: Value,
}

impl DomainTerm {
    pub fn eq(field: &str, value: impl Into<Value>) -> Self {
        Self {
            field: field.to_string(),
            operator: "=".to_string(),
            value: value.into(),
        }
    }

    pub fn to_value(&self) -> Value {
        Value::Array(vec![
            Value::from(self.field.as_str()),
            Value::from(self.operator.as_str()),
            self.value.clone(),
        ])
    }
}

/// The record operations the importer needs from the ORM backend.
///
/// `lang` selects which translation of translatable fields a write targets;
/// `None` writes the base language.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn search(&self, model: &str, domain: &[DomainTerm]) -> Result<Vec<i64>>;

    async fn create(&self, model: &str, vals: &Vals) -> Result<i64>;

    async fn write(
        &self,
        model: &str,
        ids: &[i64],
        vals: &Vals,
        lang: Option<&LangCode>,
    ) -> Result<bool>;
}
