//! Content fetcher: read-only retrieval from the content backend with an
//! ordered fallback and graceful degradation.
//!
//! Nothing in here returns an error to the caller. Backend failures, timeouts,
//! malformed payloads and plain misses all collapse to `None` or an empty list
//! after being logged, so pages only ever deal with "content" or "no content".

use std::{num::NonZeroU32, sync::Arc, time::Duration};

use metrics::counter;
use serde_json::Value;
use tracing::{debug, error, warn};

use crate::application::backend::{BackendError, ContentBackend, GraphqlQuery};
use crate::application::queries::{self, ListRequest, LookupStrategy};
use crate::config::Settings;
use crate::domain::documents::{ContentDocument, ContentKind, LookupKey};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_LIST_LIMIT: u32 = 100;
pub const DEFAULT_NEWS_LIMIT: u32 = 50;

const FAILURE_COUNTER: &str = "edgesite_fetch_failure_total";
const FALLBACK_COUNTER: &str = "edgesite_fetch_fallback_total";
const NOT_FOUND_COUNTER: &str = "edgesite_fetch_not_found_total";

/// Bounds applied to every fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchPolicy {
    pub timeout: Duration,
    pub list_limit: NonZeroU32,
    pub news_limit: NonZeroU32,
}

impl Default for FetchPolicy {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            list_limit: NonZeroU32::new(DEFAULT_LIST_LIMIT).unwrap_or(NonZeroU32::MIN),
            news_limit: NonZeroU32::new(DEFAULT_NEWS_LIMIT).unwrap_or(NonZeroU32::MIN),
        }
    }
}

impl From<&Settings> for FetchPolicy {
    fn from(settings: &Settings) -> Self {
        Self {
            timeout: settings.backend.timeout,
            list_limit: settings.fetch.list_limit,
            news_limit: settings.fetch.news_limit,
        }
    }
}

/// Profiles and locations shown together on the company profile page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfilePage {
    pub profiles: Vec<ContentDocument>,
    pub locations: Vec<ContentDocument>,
}

#[derive(Clone)]
pub struct ContentFetcher {
    backend: Arc<dyn ContentBackend>,
    policy: FetchPolicy,
}

impl ContentFetcher {
    pub fn new(backend: Arc<dyn ContentBackend>, policy: FetchPolicy) -> Self {
        Self { backend, policy }
    }

    pub fn is_configured(&self) -> bool {
        self.backend.is_configured()
    }

    /// Retrieve one document by identifier.
    ///
    /// The document identifier is tried first. When that misses or fails and
    /// the identifier consists only of ASCII digits, the legacy numeric
    /// identifier is tried next. Anything else is "not found".
    pub async fn document(&self, kind: ContentKind, identifier: &str) -> Option<ContentDocument> {
        let key = match LookupKey::parse(identifier) {
            Ok(key) => key,
            Err(err) => {
                warn!(
                    target = "application::fetcher",
                    kind = %kind,
                    error = %err,
                    "Rejected document lookup"
                );
                return None;
            }
        };

        if let Some(document) = self.lookup(kind, &key, LookupStrategy::DocumentId).await {
            return Some(document);
        }

        if key.is_legacy_numeric() {
            debug!(
                target = "application::fetcher",
                kind = %kind,
                identifier = %key,
                "Primary lookup missed; retrying by legacy numeric id"
            );
            counter!(FALLBACK_COUNTER, "kind" => kind.as_str()).increment(1);
            if let Some(document) = self
                .lookup(kind, &key, LookupStrategy::LegacyNumericId)
                .await
            {
                return Some(document);
            }
        }

        counter!(NOT_FOUND_COUNTER, "kind" => kind.as_str()).increment(1);
        None
    }

    /// Visible documents of one collection, in the request's order, at most
    /// `request.limit` of them.
    pub async fn list(&self, request: &ListRequest) -> Vec<ContentDocument> {
        let kind = request.kind;
        let query = queries::collection(request);
        let Some(data) = self.execute(kind, "list", None, &query).await else {
            return Vec::new();
        };

        let items = match data.get(kind.collection_field()) {
            Some(Value::Array(items)) => items,
            Some(Value::Null) | None => return Vec::new(),
            Some(_) => {
                warn!(
                    target = "application::fetcher",
                    kind = %kind,
                    field = kind.collection_field(),
                    "Collection field is not an array"
                );
                return Vec::new();
            }
        };

        let limit = usize::try_from(request.limit.get()).unwrap_or(usize::MAX);
        items
            .iter()
            .filter_map(|raw| match ContentDocument::from_value(kind, raw) {
                Ok(document) => Some(document),
                Err(err) => {
                    warn!(
                        target = "application::fetcher",
                        kind = %kind,
                        error = %err,
                        "Skipping malformed document"
                    );
                    None
                }
            })
            .filter(|document| !document.is_hidden())
            .take(limit)
            .collect()
    }

    /// Visible documents of `kind` with the default ordering and list cap.
    pub async fn collection(&self, kind: ContentKind) -> Vec<ContentDocument> {
        self.list(&ListRequest::new(kind, self.policy.list_limit))
            .await
    }

    /// Latest visible events for the home page news section.
    pub async fn news(&self) -> Vec<ContentDocument> {
        self.list(&ListRequest::new(ContentKind::Event, self.policy.news_limit))
            .await
    }

    /// Profiles and locations, fetched concurrently. Each side degrades on
    /// its own.
    pub async fn profile_page(&self) -> ProfilePage {
        let (profiles, locations) = tokio::join!(
            self.collection(ContentKind::Profile),
            self.collection(ContentKind::Location)
        );
        ProfilePage {
            profiles,
            locations,
        }
    }

    async fn lookup(
        &self,
        kind: ContentKind,
        key: &LookupKey,
        strategy: LookupStrategy,
    ) -> Option<ContentDocument> {
        let query = queries::single_document(kind, key, strategy);
        let data = self
            .execute(kind, strategy.as_str(), Some(key), &query)
            .await?;

        let raw = data.get(kind.single_field())?;
        if raw.is_null() {
            return None;
        }

        match ContentDocument::from_value(kind, raw) {
            Ok(document) => Some(document),
            Err(err) => {
                warn!(
                    target = "application::fetcher",
                    kind = %kind,
                    operation = strategy.as_str(),
                    identifier = %key,
                    error = %err,
                    "Discarding malformed document"
                );
                None
            }
        }
    }

    async fn execute(
        &self,
        kind: ContentKind,
        operation: &'static str,
        key: Option<&LookupKey>,
        query: &GraphqlQuery,
    ) -> Option<Value> {
        let outcome = match tokio::time::timeout(self.policy.timeout, self.backend.execute(query))
            .await
        {
            Ok(outcome) => outcome,
            Err(_) => Err(BackendError::Timeout {
                seconds: self.policy.timeout.as_secs(),
            }),
        };

        match outcome {
            Ok(data) => Some(data),
            Err(err) => {
                record_failure(kind, operation, key, &err);
                None
            }
        }
    }
}

fn record_failure(
    kind: ContentKind,
    operation: &'static str,
    key: Option<&LookupKey>,
    err: &BackendError,
) {
    counter!(
        FAILURE_COUNTER,
        "kind" => kind.as_str(),
        "operation" => operation,
        "reason" => err.reason()
    )
    .increment(1);

    let identifier = key.map(LookupKey::as_str).unwrap_or_default();
    if matches!(err, BackendError::NotConfigured) {
        error!(
            target = "application::fetcher",
            kind = %kind,
            operation,
            identifier,
            "Content backend endpoint is not configured"
        );
    } else {
        warn!(
            target = "application::fetcher",
            kind = %kind,
            operation,
            identifier,
            error = %err,
            "Content fetch failed"
        );
    }
}
