//! The narrow interface between the dashboard and its backend.
//!
//! Two implementations exist: [`super::http::HttpApi`] talks to the REST
//! backend, [`super::memory::InMemoryApi`] serves seeded data for tests and
//! demo mode.

use std::time::SystemTime;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{
    DateRange, NdrAction, NdrRecord, RecordSet, RequestGeneration, RequestTicket, Role, TableSchema,
};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("http request error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("api error: {0}")]
    Api(String),
    #[error("unexpected payload: {0}")]
    Payload(#[from] serde_json::Error),
    #[error("{0} not found")]
    NotFound(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CacheStatus {
    Fresh,
    Cached,
    Stale,
}

impl CacheStatus {
    pub fn label(&self) -> &'static str {
        match self {
            CacheStatus::Fresh => "live",
            CacheStatus::Cached => "cached",
            CacheStatus::Stale => "stale",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct CachedPayload<T> {
    pub data: T,
    pub fetched_at: SystemTime,
    pub status: CacheStatus,
}

impl<T> CachedPayload<T> {
    pub fn new(data: T, fetched_at: SystemTime, status: CacheStatus) -> Self {
        Self {
            data,
            fetched_at,
            status,
        }
    }

    pub fn fresh(data: T) -> Self {
        Self::new(data, SystemTime::now(), CacheStatus::Fresh)
    }
}

/// Fetch-by-filter request for one table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordQuery {
    pub role: Role,
    pub schema: TableSchema,
    /// Scopes the seller surface; ignored on the admin surface.
    pub seller_id: String,
    pub range: DateRange,
}

impl RecordQuery {
    pub fn new(role: Role, schema: TableSchema, seller_id: impl Into<String>) -> Self {
        Self {
            role,
            schema,
            seller_id: seller_id.into(),
            range: DateRange::default(),
        }
    }

    pub fn with_range(mut self, range: DateRange) -> Self {
        self.range = range;
        self
    }

    /// Resource path relative to the API base, e.g. `api/v1/seller/orders`.
    pub fn path(&self) -> String {
        format!("{}{}", self.role.api_prefix(), self.schema.endpoint())
    }

    /// Cache key; different ranges are different payloads.
    pub fn cache_key(&self) -> String {
        format!(
            "{}?{}&seller={}",
            self.path(),
            self.range
                .query_pairs()
                .iter()
                .map(|(key, value)| format!("{key}={value}"))
                .collect::<Vec<_>>()
                .join("&"),
            self.seller_id
        )
    }
}

#[async_trait]
pub trait DashboardApi: Send + Sync {
    /// `GET <resource>?from&to` for the query's table.
    async fn fetch_records(&self, query: &RecordQuery) -> Result<CachedPayload<RecordSet>, ApiError>;

    /// `POST ndr/{awb}/action`; returns the updated NDR record.
    ///
    /// On the seller surface only NDRs of `seller_id` may be acted on.
    async fn apply_ndr_action(
        &self,
        role: Role,
        seller_id: &str,
        awb: &str,
        action: NdrAction,
    ) -> Result<NdrRecord, ApiError>;

    /// Drops cached payloads so the next fetch hits the backend.
    async fn clear_cache(&self) {}

    /// Short label for the settings page.
    fn describe(&self) -> String;
}

/// Runs `query` for the request holding `ticket`.
///
/// Returns `None` when a newer request was issued on `requests` while this
/// one was in flight; its result, success or failure, must not be applied.
pub async fn fetch_current(
    api: &dyn DashboardApi,
    requests: &RequestGeneration,
    ticket: RequestTicket,
    query: &RecordQuery,
) -> Option<Result<CachedPayload<RecordSet>, ApiError>> {
    tracing::debug!(table = ?query.schema, generation = ticket.generation(), "loading table");
    let result = api.fetch_records(query).await;

    if !requests.is_current(ticket) {
        tracing::debug!(
            table = ?query.schema,
            generation = ticket.generation(),
            latest = requests.current(),
            "dropping superseded response"
        );
        return None;
    }
    Some(result)
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use super::*;

    #[test]
    fn query_paths_follow_the_role_prefix() {
        let seller = RecordQuery::new(Role::Seller, TableSchema::Ledger, "SLR-1");
        let admin = RecordQuery::new(Role::Admin, TableSchema::Wallet, "");

        assert_eq!(seller.path(), "api/v1/seller/billing/ledger");
        assert_eq!(admin.path(), "api/v2/admin/wallet/transactions");
    }

    #[test]
    fn cache_keys_differ_by_range() {
        let base = RecordQuery::new(Role::Seller, TableSchema::Orders, "SLR-1");
        let ranged = base
            .clone()
            .with_range(DateRange::between(date!(2024 - 03 - 01), date!(2024 - 03 - 31)));

        assert_ne!(base.cache_key(), ranged.cache_key());
        assert!(ranged.cache_key().contains("from=2024-03-01&to=2024-03-31"));
    }
}
