//! REST client for the aggregator backend.
//!
//! - Every response comes wrapped in `{success, data, error}`.
//! - Keeps an in-memory TTL cache per query and falls back to the last good
//!   payload (in memory, then on disk) when a request fails.

use std::{
    collections::HashMap,
    sync::Arc,
    time::{Duration, SystemTime},
};

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tokio::sync::Mutex;
use uuid::Uuid;

use super::api::{ApiError, CacheStatus, CachedPayload, DashboardApi, RecordQuery};
use super::cache::{Snapshot, SnapshotStore};
use crate::domain::{
    decode_ledger_rows, LedgerTransactionDto, NdrAction, NdrRecord, Order, RecordSet, Role,
    Shipment, TableRecord, TableSchema, WalletTransaction,
};

pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);
const USER_AGENT: &str = concat!("parcel-desk/", env!("CARGO_PKG_VERSION"));
const REQUEST_ID_HEADER: &str = "X-Request-Id";

#[derive(Debug, Deserialize)]
struct ApiEnvelope<T> {
    success: bool,
    data: Option<T>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Serialize)]
struct NdrActionBody {
    action: NdrAction,
}

#[derive(Clone)]
pub struct HttpApi {
    http: Client,
    base_url: Url,
    cache: Arc<Mutex<HashMap<String, Cached<RecordSet>>>>,
    snapshots: Option<SnapshotStore>,
    ttl: Duration,
}

impl HttpApi {
    pub fn new(base: &str) -> Result<Self, ApiError> {
        let mut base_url = Url::parse(base)?;
        // `join` replaces the last segment unless the base ends with a slash.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self {
            http,
            base_url,
            cache: Arc::new(Mutex::new(HashMap::new())),
            snapshots: None,
            ttl: DEFAULT_TTL,
        })
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn with_snapshots(mut self, store: SnapshotStore) -> Self {
        self.snapshots = Some(store);
        self
    }

    fn url(&self, path: &str) -> Result<Url, url::ParseError> {
        self.base_url.join(path)
    }

    fn records_url(&self, query: &RecordQuery) -> Result<Url, ApiError> {
        let mut url = self.url(&query.path())?;
        let range = query.range.query_pairs();
        if !range.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in &range {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }

    async fn fetch_table(&self, url: Url, schema: TableSchema) -> Result<RecordSet, ApiError> {
        let builder = self.http.get(url);
        match schema {
            TableSchema::Shipments => self.fetch_rows::<Shipment>(builder).await,
            TableSchema::Orders => self.fetch_rows::<Order>(builder).await,
            TableSchema::Ndr => self.fetch_rows::<NdrRecord>(builder).await,
            TableSchema::Ledger => {
                let rows = self.fetch_data::<Vec<LedgerTransactionDto>>(builder).await?;
                Ok(RecordSet::Ledger(decode_ledger_rows(rows).rows))
            }
            TableSchema::Wallet => self.fetch_rows::<WalletTransaction>(builder).await,
        }
    }

    async fn fetch_rows<R>(&self, builder: reqwest::RequestBuilder) -> Result<RecordSet, ApiError>
    where
        R: TableRecord + DeserializeOwned,
    {
        Ok(R::wrap(self.fetch_data::<Vec<R>>(builder).await?))
    }

    async fn cached(&self, key: &str) -> Option<CachedPayload<RecordSet>> {
        let cache = self.cache.lock().await;
        cache.get(key).and_then(|entry| entry.if_fresh(self.ttl))
    }

    async fn cached_stale(
        &self,
        key: &str,
        schema: TableSchema,
    ) -> Option<CachedPayload<RecordSet>> {
        {
            let cache = self.cache.lock().await;
            if let Some(entry) = cache.get(key) {
                return Some(entry.stale());
            }
        }

        let snapshot = self.snapshots.as_ref()?.load(key)?;
        if snapshot.records.schema() != schema {
            tracing::warn!(key, "snapshot holds a different table; ignoring it");
            return None;
        }
        Some(CachedPayload::new(
            snapshot.records.clone(),
            snapshot.fetched_at(),
            CacheStatus::Stale,
        ))
    }

    async fn store(&self, key: &str, data: RecordSet) -> CachedPayload<RecordSet> {
        let fetched_at = SystemTime::now();
        let payload = CachedPayload::new(data.clone(), fetched_at, CacheStatus::Fresh);
        if let Some(store) = &self.snapshots {
            if let Err(err) = store.save(key, Snapshot::new(data.clone(), fetched_at)) {
                tracing::warn!(key, error = %err, "failed to persist snapshot");
            }
        }
        self.cache
            .lock()
            .await
            .insert(key.to_string(), Cached::new(data, fetched_at));
        payload
    }

    async fn fetch_data<T>(&self, builder: reqwest::RequestBuilder) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
    {
        let request_id = Uuid::new_v4().to_string();
        let response = builder
            .header(REQUEST_ID_HEADER, &request_id)
            .send()
            .await?
            .error_for_status()?;
        let body = response.text().await?;
        let envelope: ApiEnvelope<T> = serde_json::from_str(&body)?;
        let ApiEnvelope {
            success,
            data,
            error,
        } = envelope;

        if success {
            data.ok_or_else(|| ApiError::Api("response missing data".into()))
        } else {
            tracing::debug!(%request_id, ?error, "backend rejected request");
            Err(ApiError::Api(
                error.unwrap_or_else(|| "request failed".to_string()),
            ))
        }
    }
}

#[async_trait]
impl DashboardApi for HttpApi {
    async fn fetch_records(&self, query: &RecordQuery) -> Result<CachedPayload<RecordSet>, ApiError> {
        let key = query.cache_key();
        if let Some(payload) = self.cached(&key).await {
            tracing::debug!(%key, "serving cached records");
            return Ok(payload);
        }

        let url = self.records_url(query)?;
        tracing::debug!(%url, "requesting records");
        match self.fetch_table(url, query.schema).await {
            Ok(records) => {
                tracing::info!(table = ?query.schema, rows = records.len(), "loaded records");
                Ok(self.store(&key, records).await)
            }
            Err(error) => {
                if let Some(stale) = self.cached_stale(&key, query.schema).await {
                    tracing::warn!(%key, %error, "request failed; serving stale records");
                    return Ok(stale);
                }
                Err(error)
            }
        }
    }

    async fn apply_ndr_action(
        &self,
        role: Role,
        seller_id: &str,
        awb: &str,
        action: NdrAction,
    ) -> Result<NdrRecord, ApiError> {
        // Seller routes are scoped by the backend session; the id only goes into logs.
        let url = self.url(&format!("{}ndr/{awb}/action", role.api_prefix()))?;
        tracing::info!(%awb, seller = seller_id, ?action, "submitting NDR action");
        let updated: NdrRecord = self
            .fetch_data(self.http.post(url).json(&NdrActionBody { action }))
            .await?;

        // Cached NDR lists no longer reflect the backend.
        self.cache
            .lock()
            .await
            .retain(|key, _| !key.contains(TableSchema::Ndr.endpoint()));
        Ok(updated)
    }

    async fn clear_cache(&self) {
        self.cache.lock().await.clear();
        tracing::debug!("cleared in-memory record cache");
    }

    fn describe(&self) -> String {
        format!("REST backend at {}", self.base_url)
    }
}

struct Cached<T> {
    value: T,
    fetched_at: SystemTime,
}

impl<T: Clone> Cached<T> {
    fn new(value: T, fetched_at: SystemTime) -> Self {
        Self { value, fetched_at }
    }

    fn if_fresh(&self, ttl: Duration) -> Option<CachedPayload<T>> {
        if self
            .fetched_at
            .elapsed()
            .map(|elapsed| elapsed <= ttl)
            .unwrap_or(false)
        {
            Some(CachedPayload::new(
                self.value.clone(),
                self.fetched_at,
                CacheStatus::Cached,
            ))
        } else {
            None
        }
    }

    fn stale(&self) -> CachedPayload<T> {
        CachedPayload::new(self.value.clone(), self.fetched_at, CacheStatus::Stale)
    }
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use super::*;
    use crate::domain::DateRange;

    #[test]
    fn record_urls_carry_the_range_and_role_prefix() {
        let api = HttpApi::new("https://api.example.test/base").expect("client");
        let query = RecordQuery::new(Role::Seller, TableSchema::Wallet, "SLR-1")
            .with_range(DateRange::between(date!(2024 - 03 - 31), date!(2024 - 03 - 01)));

        let url = api.records_url(&query).expect("url");

        assert_eq!(
            url.as_str(),
            "https://api.example.test/base/api/v1/seller/wallet/transactions?from=2024-03-01&to=2024-03-31"
        );
    }

    #[test]
    fn envelope_errors_are_decoded() {
        let envelope: ApiEnvelope<Vec<Order>> =
            serde_json::from_str(r#"{"success":false,"error":"seller suspended"}"#).expect("json");
        assert!(!envelope.success);
        assert_eq!(envelope.error.as_deref(), Some("seller suspended"));
        assert!(envelope.data.is_none());
    }

    #[test]
    fn ledger_envelopes_keep_valid_rows_around_a_bad_one() {
        let body = r#"{"success":true,"data":[
            {"transactionId":"L1","date":"2024-03-01","credit":500.0,"closingBalance":500.0},
            {"transactionId":"L2","date":"2024-03-02","credit":5.0,"debit":5.0,"closingBalance":500.0},
            {"transactionId":"L3","date":"2024-03-03","debit":118.0,"closingBalance":382.0}
        ]}"#;
        let envelope: ApiEnvelope<Vec<LedgerTransactionDto>> =
            serde_json::from_str(body).expect("envelope decodes");

        let page = decode_ledger_rows(envelope.data.expect("data"));

        assert_eq!(page.rows.len(), 2);
        assert_eq!(page.rejected, ["L2"]);
    }

    #[tokio::test]
    async fn unreachable_backend_serves_the_disk_snapshot_as_stale() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = SnapshotStore::at(dir.path().join("snapshots.json"));
        let query = RecordQuery::new(Role::Admin, TableSchema::Orders, "");
        store
            .save(
                &query.cache_key(),
                Snapshot::new(RecordSet::Orders(Vec::new()), SystemTime::now()),
            )
            .expect("seed snapshot");

        // Port 9 (discard) on loopback refuses connections.
        let api = HttpApi::new("http://127.0.0.1:9/")
            .expect("client")
            .with_snapshots(store);
        let payload = api.fetch_records(&query).await.expect("stale payload");

        assert_eq!(payload.status, CacheStatus::Stale);
        assert_eq!(payload.data, RecordSet::Orders(Vec::new()));
    }

    #[tokio::test]
    async fn unreachable_backend_without_fallback_is_an_error() {
        let api = HttpApi::new("http://127.0.0.1:9/").expect("client");
        let query = RecordQuery::new(Role::Seller, TableSchema::Shipments, "SLR-1");

        let result = api.fetch_records(&query).await;
        assert!(matches!(result, Err(ApiError::Http(_))));
    }
}
