use crate::odoo::codec::{decode_response, encode_call};
use crate::odoo::store::{DomainTerm, RecordStore, Vals};
use crate::odoo::value::Value;
use crate::utils::{ImportError, LangCode, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::debug;

const COMMON_ENDPOINT: &str = "/xmlrpc/2/common";
const OBJECT_ENDPOINT: &str = "/xmlrpc/2/object";

#[derive(Debug, Clone)]
pub struct Credentials {
    pub db: String,
    pub user: String,
    pub password: String,
}

impl Credentials {
    /// All three values must be present and non-empty.
    pub fn from_parts(
        db: Option<String>,
        user: Option<String>,
        password: Option<String>,
    ) -> Result<Self> {
        let non_empty = |value: Option<String>| value.filter(|v| !v.is_empty());
        match (non_empty(db), non_empty(user), non_empty(password)) {
            (Some(db), Some(user), Some(password)) => Ok(Self { db, user, password }),
            _ => Err(ImportError::MissingArgument(
                "--db, --user, and --password are required for XML-RPC import".to_string(),
            )),
        }
    }
}

/// An authenticated Odoo session over XML-RPC.
pub struct OdooClient {
    client: Client,
    base_url: String,
    db: String,
    uid: i64,
    password: String,
}

impl OdooClient {
    /// Logs in through the `common` endpoint. Odoo answers `false` instead of
    /// a fault on bad credentials, which maps to `AuthenticationFailed`.
    pub async fn authenticate(
        url: &str,
        credentials: &Credentials,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        let base_url = url.trim_end_matches('/').to_string();

        let response = call(
            &client,
            &format!("{}{}", base_url, COMMON_ENDPOINT),
            "authenticate",
            &[
                Value::from(credentials.db.as_str()),
                Value::from(credentials.user.as_str()),
                Value::from(credentials.password.as_str()),
                Value::Struct(BTreeMap::new()),
            ],
        )
        .await?;

        let uid = match response {
            Value::Int(uid) if uid > 0 => uid,
            _ => {
                return Err(ImportError::AuthenticationFailed {
                    db: credentials.db.clone(),
                    user: credentials.user.clone(),
                })
            }
        };

        debug!(uid = uid, db = %credentials.db, "Authenticated");

        Ok(Self {
            client,
            base_url,
            db: credentials.db.clone(),
            uid,
            password: credentials.password.clone(),
        })
    }

    pub fn uid(&self) -> i64 {
        self.uid
    }

    pub async fn execute_kw(
        &self,
        model: &str,
        method: &str,
        args: Vec<Value>,
        kwargs: Option<BTreeMap<String, Value>>,
    ) -> Result<Value> {
        let mut params = vec![
            Value::from(self.db.as_str()),
            Value::Int(self.uid),
            Value::from(self.password.as_str()),
            Value::from(model),
            Value::from(method),
            Value::Array(args),
        ];
        if let Some(kwargs) = kwargs {
            params.push(Value::Struct(kwargs));
        }

        call(
            &self.client,
            &format!("{}{}", self.base_url, OBJECT_ENDPOINT),
            "execute_kw",
            &params,
        )
        .await
    }
}

async fn call(client: &Client, url: &str, method: &str, params: &[Value]) -> Result<Value> {
    let response = client
        .post(url)
        .header("Content-Type", "text/xml")
        .body(encode_call(method, params))
        .send()
        .await?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(ImportError::ProtocolError(format!(
            "{} returned {}: {}",
            url, status, body
        )));
    }

    let body = response.text().await?;
    decode_response(&body)
}

fn vals_to_value(vals: &Vals) -> Value {
    Value::Struct(vals.clone())
}

fn lang_context(lang: &LangCode) -> BTreeMap<String, Value> {
    let mut context = BTreeMap::new();
    context.insert("lang".to_string(), Value::from(lang.as_str()));
    let mut kwargs = BTreeMap::new();
    kwargs.insert("context".to_string(), Value::Struct(context));
    kwargs
}

#[async_trait]
impl RecordStore for OdooClient {
    async fn search(&self, model: &str, domain: &[DomainTerm]) -> Result<Vec<i64>> {
        let domain = Value::Array(domain.iter().map(DomainTerm::to_value).collect());
        let response = self.execute_kw(model, "search", vec![domain], None).await?;

        response
            .as_array()
            .ok_or_else(|| ImportError::ProtocolError(format!("search returned {:?}", response)))?
            .iter()
            .map(|id| {
                id.as_i64().ok_or_else(|| {
                    ImportError::ProtocolError(format!("search returned non-integer id {:?}", id))
                })
            })
            .collect()
    }

    async fn create(&self, model: &str, vals: &Vals) -> Result<i64> {
        let response = self
            .execute_kw(model, "create", vec![vals_to_value(vals)], None)
            .await?;

        response
            .as_i64()
            .ok_or_else(|| ImportError::ProtocolError(format!("create returned {:?}", response)))
    }

    async fn write(
        &self,
        model: &str,
        ids: &[i64],
        vals: &Vals,
        lang: Option<&LangCode>,
    ) -> Result<bool> {
        let ids = Value::Array(ids.iter().copied().map(Value::Int).collect());
        let response = self
            .execute_kw(model, "write", vec![ids, vals_to_value(vals)], lang.map(lang_context))
            .await?;

        Ok(response.is_truthy())
    }
}
