//! Upserts English rows into the ORM and layers translations on top.
//!
//! Each row goes through two phases: the base create/update, then one write
//! per translatable field under the target language context. The second
//! phase needs the id resolved by the first.

use crate::csv_processor::{ProductRow, ProductRows};
use crate::odoo::{DomainTerm, RecordStore, Vals, Value};
use crate::product::{fields, translatable_fields, ProductValues, PRODUCT_MODEL};
use crate::utils::{LangCode, Result};
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Created(i64),
    Updated(i64),
}

impl UpsertOutcome {
    pub fn id(&self) -> i64 {
        match self {
            UpsertOutcome::Created(id) | UpsertOutcome::Updated(id) => *id,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub created: usize,
    pub updated: usize,
    pub translated: usize,
    pub unmatched_translations: usize,
}

pub struct ProductSynchronizer<'a, S: RecordStore> {
    store: &'a S,
    model: String,
}

impl<'a, S: RecordStore> ProductSynchronizer<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            model: PRODUCT_MODEL.to_string(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Finds the product by Internal Reference and overwrites its base
    /// fields, or creates it when no record matches.
    pub async fn resolve_or_create(&self, row: &ProductRow) -> Result<UpsertOutcome> {
        let values = ProductValues::from_row(row)?;
        let vals = values.to_vals();

        let domain = [DomainTerm::eq(
            fields::DEFAULT_CODE,
            values.default_code.as_str(),
        )];
        let existing = self.store.search(&self.model, &domain).await?;

        match existing.first() {
            Some(&id) => {
                self.store.write(&self.model, &existing, &vals, None).await?;
                Ok(UpsertOutcome::Updated(id))
            }
            None => {
                let id = self.store.create(&self.model, &vals).await?;
                Ok(UpsertOutcome::Created(id))
            }
        }
    }

    /// Writes each non-empty translatable value of `translation` to record
    /// `id` under `lang`, one field per write. Returns the fields written.
    pub async fn apply_translation(
        &self,
        id: i64,
        translation: Option<&ProductRow>,
        lang: &LangCode,
    ) -> Result<Vec<&'static str>> {
        let Some(translation) = translation else {
            return Ok(Vec::new());
        };

        let mut written = Vec::new();
        for spec in translatable_fields() {
            let value = translation.value(spec.column);
            if value.is_empty() {
                continue;
            }

            let mut vals = Vals::new();
            vals.insert(spec.name.to_string(), Value::from(value));
            self.store.write(&self.model, &[id], &vals, Some(lang)).await?;
            written.push(spec.name);
        }
        Ok(written)
    }

    /// Processes every English row in file order. The first failing call
    /// stops the run; rows already processed stay written.
    pub async fn run(
        &self,
        english: &ProductRows,
        translations: &ProductRows,
        lang: &LangCode,
    ) -> Result<SyncReport> {
        let mut report = SyncReport::default();

        for row in english {
            let outcome = self.resolve_or_create(row).await?;
            let name = row.value(crate::csv_processor::row::NAME);
            match outcome {
                UpsertOutcome::Created(id) => {
                    report.created += 1;
                    info!(external_id = %row.external_id(), id = id, "Created product: {}", name);
                }
                UpsertOutcome::Updated(id) => {
                    report.updated += 1;
                    info!(external_id = %row.external_id(), id = id, "Updated product: {}", name);
                }
            }

            let written = self
                .apply_translation(outcome.id(), translations.get(row.external_id()), lang)
                .await?;
            if !written.is_empty() {
                report.translated += 1;
                info!(
                    external_id = %row.external_id(),
                    fields = ?written,
                    "Added {} translation",
                    lang
                );
            }
        }

        for translation in translations {
            if !english.contains(translation.external_id()) {
                report.unmatched_translations += 1;
            }
        }
        if report.unmatched_translations > 0 {
            warn!(
                count = report.unmatched_translations,
                "Translation rows without a matching English row were ignored"
            );
        }

        info!(
            created = report.created,
            updated = report.updated,
            translated = report.translated,
            "Import finished"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::csv_processor::row::*;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Search(String),
        Create,
        Write {
            ids: Vec<i64>,
            fields: Vec<String>,
            lang: Option<String>,
        },
    }

    /// Keeps base values per record and translated values per
    /// (record, language, field), the way the ORM stores them.
    #[derive(Default)]
    struct MemoryStore {
        records: Mutex<Vec<Vals>>,
        translations: Mutex<HashMap<(i64, String, String), Value>>,
        calls: Mutex<Vec<Call>>,
    }

    impl MemoryStore {
        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }

        fn record(&self, id: i64) -> Vals {
            self.records.lock().unwrap()[(id - 1) as usize].clone()
        }

        fn translation(&self, id: i64, lang: &str, field: &str) -> Option<Value> {
            self.translations
                .lock()
                .unwrap()
                .get(&(id, lang.to_string(), field.to_string()))
                .cloned()
        }
    }

    #[async_trait]
    impl RecordStore for MemoryStore {
        async fn search(&self, _model: &str, domain: &[DomainTerm]) -> Result<Vec<i64>> {
            let term = &domain[0];
            self.calls
                .lock()
                .unwrap()
                .push(Call::Search(term.value.as_str().unwrap_or_default().to_string()));
            Ok(self
                .records
                .lock()
                .unwrap()
                .iter()
                .enumerate()
                .filter(|(_, r)| r.get(&term.field) == Some(&term.value))
                .map(|(i, _)| i as i64 + 1)
                .collect())
        }

        async fn create(&self, _model: &str, vals: &Vals) -> Result<i64> {
            self.calls.lock().unwrap().push(Call::Create);
            let mut records = self.records.lock().unwrap();
            records.push(vals.clone());
            Ok(records.len() as i64)
        }

        async fn write(
            &self,
            _model: &str,
            ids: &[i64],
            vals: &Vals,
            lang: Option<&LangCode>,
        ) -> Result<bool> {
            self.calls.lock().unwrap().push(Call::Write {
                ids: ids.to_vec(),
                fields: vals.keys().cloned().collect(),
                lang: lang.map(|l| l.to_string()),
            });
            for &id in ids {
                for (field, value) in vals {
                    match lang {
                        Some(lang) if fields::is_translatable(field) => {
                            self.translations.lock().unwrap().insert(
                                (id, lang.to_string(), field.clone()),
                                value.clone(),
                            );
                        }
                        _ => {
                            self.records.lock().unwrap()[(id - 1) as usize]
                                .insert(field.clone(), value.clone());
                        }
                    }
                }
            }
            Ok(true)
        }
    }

    fn english(id: &str, name: &str, reference: &str, price: &str, kind: &str) -> ProductRow {
        ProductRow::from_pairs([
            (EXTERNAL_ID, id),
            (NAME, name),
            (INTERNAL_REFERENCE, reference),
            (BARCODE, ""),
            (SALES_PRICE, price),
            (COST, ""),
            (WEIGHT, ""),
            (SALES_DESCRIPTION, "Solid wood"),
            (PRODUCT_TYPE, kind),
        ])
    }

    fn arabic(id: &str, name: &str, description: &str) -> ProductRow {
        ProductRow::from_pairs([
            (EXTERNAL_ID, id),
            (NAME, name),
            (SALES_DESCRIPTION, description),
        ])
    }

    fn lang() -> LangCode {
        LangCode::parse("ar_001").unwrap()
    }

    #[tokio::test]
    async fn creates_missing_product() {
        let store = MemoryStore::default();
        let sync = ProductSynchronizer::new(&store);

        let outcome = sync
            .resolve_or_create(&english("m.p1", "Chair", "REF1", "", "Goods"))
            .await
            .unwrap();

        assert_eq!(outcome, UpsertOutcome::Created(1));
        let record = store.record(1);
        assert_eq!(record["list_price"], Value::Double(0.0));
        assert_eq!(record["type"], Value::from("product"));
        assert_eq!(
            store.calls(),
            vec![Call::Search("REF1".to_string()), Call::Create]
        );
    }

    #[tokio::test]
    async fn updates_existing_product_in_base_language() {
        let store = MemoryStore::default();
        let sync = ProductSynchronizer::new(&store);
        sync.resolve_or_create(&english("m.p1", "Chair", "REF1", "5", "Goods"))
            .await
            .unwrap();

        let outcome = sync
            .resolve_or_create(&english("m.p1", "Armchair", "REF1", "7.5", "Service"))
            .await
            .unwrap();

        assert_eq!(outcome, UpsertOutcome::Updated(1));
        let record = store.record(1);
        assert_eq!(record["name"], Value::from("Armchair"));
        assert_eq!(record["list_price"], Value::Double(7.5));
        assert_eq!(record["type"], Value::from("service"));
        match store.calls().last().unwrap() {
            Call::Write { ids, lang, .. } => {
                assert_eq!(ids, &vec![1]);
                assert_eq!(lang, &None);
            }
            other => panic!("unexpected call {other:?}"),
        }
    }

    #[tokio::test]
    async fn name_only_translation_writes_once() {
        let store = MemoryStore::default();
        let sync = ProductSynchronizer::new(&store);
        let id = sync
            .resolve_or_create(&english("m.p1", "Chair", "REF1", "", "Goods"))
            .await
            .unwrap()
            .id();
        let before = store.calls().len();

        let written = sync
            .apply_translation(id, Some(&arabic("m.p1", "كرسي", "")), &lang())
            .await
            .unwrap();

        assert_eq!(written, vec!["name"]);
        let calls = store.calls();
        assert_eq!(calls.len(), before + 1);
        assert_eq!(
            calls[before],
            Call::Write {
                ids: vec![id],
                fields: vec!["name".to_string()],
                lang: Some("ar_001".to_string()),
            }
        );
        assert_eq!(
            store.translation(id, "ar_001", "name"),
            Some(Value::from("كرسي"))
        );
        assert_eq!(store.translation(id, "ar_001", "description_sale"), None);
        assert_eq!(store.record(id)["name"], Value::from("Chair"));
    }

    #[tokio::test]
    async fn absent_translation_is_a_no_op() {
        let store = MemoryStore::default();
        let sync = ProductSynchronizer::new(&store);

        let written = sync.apply_translation(1, None, &lang()).await.unwrap();

        assert!(written.is_empty());
        assert!(store.calls().is_empty());
    }

    #[tokio::test]
    async fn full_translation_writes_each_field_separately() {
        let store = MemoryStore::default();
        let sync = ProductSynchronizer::new(&store);
        let id = sync
            .resolve_or_create(&english("m.p1", "Chair", "REF1", "", "Goods"))
            .await
            .unwrap()
            .id();

        let written = sync
            .apply_translation(id, Some(&arabic("m.p1", "كرسي", "خشب صلب")), &lang())
            .await
            .unwrap();

        assert_eq!(written, vec!["name", "description_sale"]);
        let translation_writes = store
            .calls()
            .into_iter()
            .filter(|c| matches!(c, Call::Write { lang: Some(_), .. }))
            .count();
        assert_eq!(translation_writes, 2);
    }

    #[tokio::test]
    async fn second_run_updates_instead_of_duplicating() {
        let store = MemoryStore::default();
        let sync = ProductSynchronizer::new(&store);
        let english_rows: ProductRows = [
            english("m.p1", "Chair", "REF1", "10", "Goods"),
            english("m.p2", "Consulting", "REF2", "", "Service"),
        ]
        .into_iter()
        .collect();
        let arabic_rows: ProductRows = [
            arabic("m.p1", "كرسي", ""),
            arabic("m.p9", "طاولة", ""),
        ]
        .into_iter()
        .collect();

        let first = sync.run(&english_rows, &arabic_rows, &lang()).await.unwrap();
        let second = sync.run(&english_rows, &arabic_rows, &lang()).await.unwrap();

        assert_eq!(
            first,
            SyncReport {
                created: 2,
                updated: 0,
                translated: 1,
                unmatched_translations: 1,
            }
        );
        assert_eq!(second.created, 0);
        assert_eq!(second.updated, 2);
        assert_eq!(store.records.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn invalid_number_stops_before_any_call() {
        let store = MemoryStore::default();
        let sync = ProductSynchronizer::new(&store);

        let result = sync
            .resolve_or_create(&english("m.p1", "Chair", "REF1", "ten", "Goods"))
            .await;

        assert!(result.is_err());
        assert!(store.calls().is_empty());
    }
}
