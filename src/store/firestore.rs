use std::time::Duration;

use anyhow::Context as _;
use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde_json::{json, Number, Value as JsonValue};

use super::{Document, DocumentStore, JsonMap, StoreError};

const FIRESTORE_BASE_URL: &str = "https://firestore.googleapis.com/v1";

/// Document store talking to Cloud Firestore over its REST API.
///
/// Firestore wraps every value in a type tag (`stringValue`, `mapValue`,
/// ...). Reads are flattened to plain JSON and writes are wrapped again, so
/// the rest of the crate never sees the tagged form. Timestamps come back
/// as RFC 3339 strings.
#[derive(Clone)]
pub struct FirestoreDocumentStore {
    client: Client,
    documents_url: Url,
    api_key: Option<String>,
    bearer_token: Option<String>,
}

impl FirestoreDocumentStore {
    pub fn new(
        project_id: &str,
        api_key: Option<String>,
        bearer_token: Option<String>,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build Firestore HTTP client")?;
        let mut documents_url = Url::parse(FIRESTORE_BASE_URL)?;
        documents_url
            .path_segments_mut()
            .map_err(|_| anyhow::anyhow!("Firestore base URL cannot hold a path"))?
            .extend(["projects", project_id, "databases", "(default)", "documents"]);
        Self::with_client(client, documents_url.as_str(), api_key, bearer_token)
    }

    /// `documents_url` is the `.../databases/{db}/documents` root.
    pub fn with_client(
        client: Client,
        documents_url: &str,
        api_key: Option<String>,
        bearer_token: Option<String>,
    ) -> anyhow::Result<Self> {
        let documents_url = Url::parse(documents_url)
            .with_context(|| format!("invalid Firestore documents URL '{}'", documents_url))?;
        if documents_url.cannot_be_a_base() {
            anyhow::bail!("Firestore documents URL '{}' cannot hold a path", documents_url);
        }
        Ok(Self {
            client,
            documents_url,
            api_key,
            bearer_token,
        })
    }

    /// Collection and id are each encoded as exactly one path segment, so
    /// `/`, `?` and `#` inside an id never reach another document. `None`
    /// for names Firestore cannot store (empty, `.` or `..`).
    fn document_url(&self, collection: &str, id: &str) -> Option<Url> {
        if [collection, id]
            .iter()
            .any(|name| matches!(name.trim(), "" | "." | ".."))
        {
            return None;
        }
        let mut url = self.documents_url.clone();
        url.path_segments_mut()
            .ok()?
            .pop_if_empty()
            .push(collection)
            .push(id);
        Some(url)
    }

    fn authorize(&self, mut req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        if let Some(key) = &self.api_key {
            req = req.query(&[("key", key.as_str())]);
        }
        if let Some(token) = &self.bearer_token {
            req = req.bearer_auth(token);
        }
        req
    }
}

#[async_trait]
impl DocumentStore for FirestoreDocumentStore {
    async fn get_document(
        &self,
        collection: &str,
        id: &str,
    ) -> Result<Option<Document>, StoreError> {
        let Some(url) = self.document_url(collection, id) else {
            return Ok(None);
        };
        let resp = self.authorize(self.client.get(url)).send().await?;

        let status = resp.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            let txt = resp.text().await.unwrap_or_default();
            return Err(StoreError::Transport(format!(
                "firestore status {}: {}",
                status.as_u16(),
                txt
            )));
        }
        let txt = resp.text().await?;

        let body: JsonValue = serde_json::from_str(&txt).map_err(|e| StoreError::Malformed {
            collection: collection.to_string(),
            id: id.to_string(),
            reason: e.to_string(),
        })?;
        let fields = match body.get("fields") {
            Some(JsonValue::Object(fields)) => decode_fields(fields),
            _ => JsonMap::new(),
        };
        Ok(Some(Document::new(collection, id, fields)))
    }

    async fn update_fields(
        &self,
        collection: &str,
        id: &str,
        fields: JsonMap,
    ) -> Result<(), StoreError> {
        let mut query: Vec<(&str, String)> = fields
            .keys()
            .map(|k| ("updateMask.fieldPaths", quote_field_path(k)))
            .collect();
        query.push(("currentDocument.exists", "true".to_string()));

        let url = self
            .document_url(collection, id)
            .ok_or_else(|| StoreError::NotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            })?;
        let body = json!({ "fields": encode_fields(&fields) });
        let resp = self
            .authorize(self.client.patch(url))
            .query(&query)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if status == StatusCode::NOT_FOUND {
            return Err(StoreError::NotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            });
        }
        if !status.is_success() {
            let txt = resp.text().await.unwrap_or_default();
            return Err(StoreError::Transport(format!(
                "firestore status {}: {}",
                status.as_u16(),
                txt
            )));
        }
        Ok(())
    }
}

fn quote_field_path(key: &str) -> String {
    let simple = !key.is_empty()
        && !key.starts_with(|c: char| c.is_ascii_digit())
        && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if simple {
        key.to_string()
    } else {
        format!("`{}`", key.replace('\\', "\\\\").replace('`', "\\`"))
    }
}

pub fn decode_fields(fields: &JsonMap) -> JsonMap {
    fields
        .iter()
        .map(|(k, v)| (k.clone(), decode_value(v)))
        .collect()
}

/// Flattens one typed Firestore value into plain JSON.
pub fn decode_value(value: &JsonValue) -> JsonValue {
    let Some(obj) = value.as_object() else {
        return JsonValue::Null;
    };
    let Some((tag, inner)) = obj.iter().next() else {
        return JsonValue::Null;
    };
    match tag.as_str() {
        "nullValue" => JsonValue::Null,
        "booleanValue" | "doubleValue" | "stringValue" | "timestampValue" | "bytesValue"
        | "referenceValue" => inner.clone(),
        // int64 travels as a decimal string
        "integerValue" => match inner {
            JsonValue::String(s) => s
                .parse::<i64>()
                .map(|n| JsonValue::Number(Number::from(n)))
                .unwrap_or_else(|_| inner.clone()),
            other => other.clone(),
        },
        "geoPointValue" => inner.clone(),
        "arrayValue" => JsonValue::Array(
            inner
                .get("values")
                .and_then(|v| v.as_array())
                .map(|values| values.iter().map(decode_value).collect())
                .unwrap_or_default(),
        ),
        "mapValue" => JsonValue::Object(
            inner
                .get("fields")
                .and_then(|f| f.as_object())
                .map(decode_fields)
                .unwrap_or_default(),
        ),
        _ => JsonValue::Null,
    }
}

pub fn encode_fields(fields: &JsonMap) -> JsonMap {
    fields
        .iter()
        .map(|(k, v)| (k.clone(), encode_value(v)))
        .collect()
}

pub fn encode_value(value: &JsonValue) -> JsonValue {
    match value {
        JsonValue::Null => json!({ "nullValue": null }),
        JsonValue::Bool(b) => json!({ "booleanValue": b }),
        JsonValue::Number(n) => match n.as_i64() {
            Some(i) => json!({ "integerValue": i.to_string() }),
            None => json!({ "doubleValue": n }),
        },
        JsonValue::String(s) => json!({ "stringValue": s }),
        JsonValue::Array(items) => {
            json!({ "arrayValue": { "values": items.iter().map(encode_value).collect::<Vec<_>>() } })
        }
        JsonValue::Object(map) => json!({ "mapValue": { "fields": encode_fields(map) } }),
    }
}
