// src/integrations/firebase/firestore.rs
//
// Cloud Firestore Integration (REST)
//
// ARCHITECTURE:
// - documents:* REST endpoints, authenticated with the signed-in user's token
// - Merge writes are PATCH requests with an update mask of the written fields
// - Deletes carry an exists precondition so a missing document reports 404
// - The REST surface has no push channel, so a live subscription is a
//   per-subscription polling task that publishes a snapshot only when it
//   differs from the last one delivered. Local writes wake every poller.
//   A failed poll is delivered once per failure streak; the next good read
//   is always published.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::{Map, Value};
use tokio::sync::Notify;

use crate::error::{AppError, AppResult};
use crate::events::Subscription;
use crate::integrations::firebase::values::{decode_fields, encode_fields};
use crate::integrations::identity_gateway::AccessTokenSource;
use crate::repositories::{
    CollectionPath, Document, DocumentPath, DocumentStore, Fields, SnapshotCallback,
    TIMESTAMP_FIELDS,
};

pub const FIRESTORE_BASE_URL: &str = "https://firestore.googleapis.com/v1";
const PAGE_SIZE: &str = "300";
const REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Deserialize)]
struct FirestoreDocument {
    name: String,
    #[serde(default)]
    fields: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListResponse {
    #[serde(default)]
    documents: Vec<FirestoreDocument>,
    #[serde(default)]
    next_page_token: Option<String>,
}

impl FirestoreDocument {
    fn into_document(self) -> Document {
        let id = self
            .name
            .rsplit('/')
            .next()
            .unwrap_or_default()
            .to_string();
        Document::new(id, decode_fields(&self.fields))
    }
}

struct FirestoreInner {
    documents_url: String,
    http_client: Client,
    tokens: Arc<dyn AccessTokenSource>,
    poll_interval: Duration,
    changed: Notify,
}

/// Document Store backed by Cloud Firestore
pub struct FirestoreDocumentStore {
    inner: Arc<FirestoreInner>,
}

impl FirestoreDocumentStore {
    pub fn new(
        project_id: &str,
        tokens: Arc<dyn AccessTokenSource>,
        poll_interval: Duration,
    ) -> AppResult<Self> {
        Self::with_base_url(FIRESTORE_BASE_URL, project_id, tokens, poll_interval)
    }

    pub fn with_base_url(
        base_url: &str,
        project_id: &str,
        tokens: Arc<dyn AccessTokenSource>,
        poll_interval: Duration,
    ) -> AppResult<Self> {
        if project_id.trim().is_empty() {
            return Err(AppError::Config("Firestore project id cannot be empty".to_string()));
        }

        let http_client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            inner: Arc::new(FirestoreInner {
                documents_url: format!(
                    "{}/projects/{}/databases/(default)/documents",
                    base_url.trim_end_matches('/'),
                    project_id
                ),
                http_client,
                tokens,
                poll_interval,
                changed: Notify::new(),
            }),
        })
    }
}

impl FirestoreInner {
    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.documents_url, path)
    }

    async fn list(&self, collection: &CollectionPath) -> AppResult<Vec<Document>> {
        let token = self.tokens.access_token().await?;
        let url = self.url(collection.as_str());
        let mut documents = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut request = self
                .http_client
                .get(&url)
                .bearer_auth(&token)
                .query(&[("pageSize", PAGE_SIZE)]);
            if let Some(page) = &page_token {
                request = request.query(&[("pageToken", page.as_str())]);
            }

            let response = request.send().await?;
            let response = check_status(response, "list", collection.as_str()).await?;
            let page: ListResponse = response.json().await?;

            documents.extend(page.documents.into_iter().map(FirestoreDocument::into_document));

            match page.next_page_token.filter(|t| !t.is_empty()) {
                Some(next) => page_token = Some(next),
                None => break,
            }
        }

        documents.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(documents)
    }
}

async fn check_status(
    response: reqwest::Response,
    operation: &str,
    path: &str,
) -> AppResult<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    if status == StatusCode::UNAUTHORIZED {
        return Err(AppError::ReauthRequired);
    }

    let body = response.text().await.unwrap_or_default();
    log::warn!("Firestore {} {} returned {}: {}", operation, path, status, body);
    Err(AppError::Store(format!(
        "Firestore {} of {} failed with status {}",
        operation,
        path,
        status.as_u16()
    )))
}

#[async_trait]
impl DocumentStore for FirestoreDocumentStore {
    async fn write_merge(&self, path: &DocumentPath, fields: Fields) -> AppResult<()> {
        let token = self.inner.tokens.access_token().await?;

        let mask: Vec<(&str, &str)> = fields
            .keys()
            .map(|key| ("updateMask.fieldPaths", key.as_str()))
            .collect();

        let body = serde_json::json!({ "fields": encode_fields(&fields, TIMESTAMP_FIELDS) });

        let response = self
            .inner
            .http_client
            .patch(self.inner.url(&path.to_string()))
            .bearer_auth(&token)
            .query(&mask)
            .json(&body)
            .send()
            .await?;
        check_status(response, "write", &path.to_string()).await?;

        self.inner.changed.notify_waiters();
        Ok(())
    }

    async fn get(&self, path: &DocumentPath) -> AppResult<Option<Document>> {
        let token = self.inner.tokens.access_token().await?;

        let response = self
            .inner
            .http_client
            .get(self.inner.url(&path.to_string()))
            .bearer_auth(&token)
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let response = check_status(response, "get", &path.to_string()).await?;
        let document: FirestoreDocument = response.json().await?;
        Ok(Some(document.into_document()))
    }

    async fn delete(&self, path: &DocumentPath) -> AppResult<bool> {
        let token = self.inner.tokens.access_token().await?;

        let response = self
            .inner
            .http_client
            .delete(self.inner.url(&path.to_string()))
            .bearer_auth(&token)
            .query(&[("currentDocument.exists", "true")])
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(false);
        }
        check_status(response, "delete", &path.to_string()).await?;

        self.inner.changed.notify_waiters();
        Ok(true)
    }

    async fn list_children(&self, collection: &CollectionPath) -> AppResult<Vec<Document>> {
        self.inner.list(collection).await
    }

    fn subscribe_collection(
        &self,
        collection: &CollectionPath,
        callback: SnapshotCallback,
    ) -> Subscription {
        let runtime = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(e) => {
                log::error!("Cannot subscribe to {} outside a runtime: {}", collection, e);
                return Subscription::inert();
            }
        };

        let inner = Arc::clone(&self.inner);
        let collection = collection.clone();

        let task = runtime.spawn(async move {
            let mut last: Option<Vec<Document>> = None;
            let mut failing = false;

            loop {
                // Register for wake-ups before listing so a write that lands
                // mid-list still triggers another pass.
                let changed = inner.changed.notified();
                tokio::pin!(changed);
                changed.as_mut().enable();

                match inner.list(&collection).await {
                    Ok(documents) => {
                        failing = false;
                        if last.as_ref() != Some(&documents) {
                            callback(Ok(documents.clone()));
                            last = Some(documents);
                        }
                    }
                    Err(e) => {
                        log::warn!("Polling {} failed: {:?}", collection, e);
                        if !failing {
                            failing = true;
                            last = None;
                            callback(Err(e));
                        }
                    }
                }

                tokio::select! {
                    _ = tokio::time::sleep(inner.poll_interval) => {}
                    _ = &mut changed => {}
                }
            }
        });

        Subscription::new(move || task.abort())
    }
}
