//! In-process backend used by demo mode and tests.
//!
//! Applies the same role scoping and date filtering the REST backend does,
//! and mutates NDR records on actions. Failures and latency can be injected
//! for error and out-of-order response tests.

use std::{
    sync::{
        atomic::{AtomicBool, AtomicU64, Ordering},
        Arc,
    },
    time::Duration,
};

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::api::{ApiError, CachedPayload, DashboardApi, RecordQuery};
use super::demo::{demo_dataset, DemoDataset};
use crate::domain::{
    filter_by_date_range, NdrAction, NdrRecord, RecordSet, Role, TableRecord, TableSchema,
};

#[derive(Clone, Default)]
pub struct InMemoryApi {
    data: Arc<Mutex<DemoDataset>>,
    failing: Arc<AtomicBool>,
    latency_ms: Arc<AtomicU64>,
    calls: Arc<AtomicU64>,
}

impl InMemoryApi {
    pub fn new(data: DemoDataset) -> Self {
        Self {
            data: Arc::new(Mutex::new(data)),
            ..Self::default()
        }
    }

    pub fn demo() -> Self {
        Self::new(demo_dataset())
    }

    /// While set, every call fails like an unreachable backend.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Delay applied to every call from now on.
    pub fn set_latency(&self, latency: Duration) {
        self.latency_ms
            .store(latency.as_millis() as u64, Ordering::SeqCst);
    }

    pub fn calls(&self) -> u64 {
        self.calls.load(Ordering::SeqCst)
    }

    async fn simulate_network(&self) -> Result<(), ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let latency = self.latency_ms.load(Ordering::SeqCst);
        if latency > 0 {
            tokio::time::sleep(Duration::from_millis(latency)).await;
        }
        if self.failing.load(Ordering::SeqCst) {
            return Err(ApiError::Api("backend unavailable".to_string()));
        }
        Ok(())
    }
}

/// Admins reach every record; a seller only their own.
fn visible_to<R: TableRecord>(row: &R, role: Role, seller_id: &str) -> bool {
    role == Role::Admin || row.seller_id() == seller_id
}

fn select<R: TableRecord>(rows: &[R], query: &RecordQuery) -> RecordSet {
    let scoped: Vec<R> = rows
        .iter()
        .filter(|row| visible_to(*row, query.role, &query.seller_id))
        .cloned()
        .collect();
    R::wrap(filter_by_date_range(&scoped, &query.range).matched)
}

#[async_trait]
impl DashboardApi for InMemoryApi {
    async fn fetch_records(&self, query: &RecordQuery) -> Result<CachedPayload<RecordSet>, ApiError> {
        self.simulate_network().await?;
        let data = self.data.lock().await;
        let records = match query.schema {
            TableSchema::Shipments => select(&data.shipments, query),
            TableSchema::Orders => select(&data.orders, query),
            TableSchema::Ndr => select(&data.ndr, query),
            TableSchema::Ledger => select(&data.ledger, query),
            TableSchema::Wallet => select(&data.wallet, query),
        };
        tracing::debug!(table = ?query.schema, role = ?query.role, rows = records.len(), "served demo records");
        Ok(CachedPayload::fresh(records))
    }

    async fn apply_ndr_action(
        &self,
        role: Role,
        seller_id: &str,
        awb: &str,
        action: NdrAction,
    ) -> Result<NdrRecord, ApiError> {
        self.simulate_network().await?;
        let mut data = self.data.lock().await;
        // Another seller's NDR looks exactly like a missing one.
        let record = data
            .ndr
            .iter_mut()
            .find(|record| record.awb == awb && visible_to(&**record, role, seller_id))
            .ok_or_else(|| ApiError::NotFound(format!("NDR for AWB {awb}")))?;

        if !record.status.is_open() {
            return Err(ApiError::Api(format!(
                "NDR for AWB {awb} is already closed ({})",
                record.status.label()
            )));
        }
        record.status = action.resulting_status();
        if action == NdrAction::Reattempt {
            record.attempts += 1;
        }
        Ok(record.clone())
    }

    fn describe(&self) -> String {
        "In-memory demo data".to_string()
    }
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use super::*;
    use crate::domain::{DateRange, NdrStatus, Order, RequestGeneration};
    use crate::infra::api::fetch_current;
    use crate::infra::demo::DEMO_SELLERS;

    #[tokio::test]
    async fn seller_queries_are_scoped_to_the_seller() {
        let api = InMemoryApi::demo();
        let query = RecordQuery::new(Role::Seller, TableSchema::Orders, DEMO_SELLERS[1]);

        let payload = api.fetch_records(&query).await.expect("orders");
        let rows = Order::extract(payload.data).expect("orders payload");

        assert!(!rows.is_empty());
        assert!(rows.iter().all(|row| row.seller_id == DEMO_SELLERS[1]));
    }

    #[tokio::test]
    async fn admin_queries_honour_the_date_range() {
        let api = InMemoryApi::demo();
        let query = RecordQuery::new(Role::Admin, TableSchema::Shipments, "")
            .with_range(DateRange::between(date!(2024 - 03 - 01), date!(2024 - 03 - 31)));

        let payload = api.fetch_records(&query).await.expect("shipments");

        assert_eq!(payload.data.len(), 6);
    }

    #[tokio::test]
    async fn ndr_actions_update_the_record() {
        let api = InMemoryApi::demo();
        let seller = DEMO_SELLERS[0];

        let updated = api
            .apply_ndr_action(Role::Seller, seller, "EK55012009", NdrAction::Reattempt)
            .await
            .expect("action");
        assert_eq!(updated.status, NdrStatus::ReattemptRequested);
        assert_eq!(updated.attempts, 2);

        let closed = api
            .apply_ndr_action(Role::Admin, "", "XB1400300045", NdrAction::Rto)
            .await;
        assert!(matches!(closed, Err(ApiError::Api(_))));

        let missing = api
            .apply_ndr_action(Role::Seller, seller, "NOPE", NdrAction::Rto)
            .await;
        assert!(matches!(missing, Err(ApiError::NotFound(_))));
    }

    #[tokio::test]
    async fn sellers_cannot_act_on_another_sellers_ndr() {
        let api = InMemoryApi::demo();
        let [own, other] = DEMO_SELLERS;

        let foreign = api
            .apply_ndr_action(Role::Seller, own, "EK55012190", NdrAction::Rto)
            .await;
        assert!(matches!(foreign, Err(ApiError::NotFound(_))));

        // Untouched, so its owner can still decide.
        let updated = api
            .apply_ndr_action(Role::Seller, other, "EK55012190", NdrAction::Rto)
            .await
            .expect("owner action");
        assert_eq!(updated.seller_id, other);
        assert_eq!(updated.status, NdrStatus::RtoRequested);
    }

    #[tokio::test]
    async fn slow_response_of_an_older_request_is_dropped() {
        let api = InMemoryApi::demo();
        let requests = RequestGeneration::new();
        let march = RecordQuery::new(Role::Admin, TableSchema::Shipments, "")
            .with_range(DateRange::between(date!(2024 - 03 - 01), date!(2024 - 03 - 31)));
        let everything = RecordQuery::new(Role::Admin, TableSchema::Shipments, "");

        api.set_latency(Duration::from_millis(80));
        let slow = {
            let api = api.clone();
            let requests = requests.clone();
            let ticket = requests.issue();
            tokio::spawn(async move { fetch_current(&api, &requests, ticket, &march).await.is_some() })
        };
        // Let the first request start sleeping before the fast one goes out.
        tokio::time::sleep(Duration::from_millis(10)).await;
        api.set_latency(Duration::ZERO);

        let fast = fetch_current(&api, &requests, requests.issue(), &everything)
            .await
            .expect("latest request is applied")
            .expect("records");
        assert_eq!(fast.data.len(), 8);

        let slow_applied = slow.await.expect("slow task");
        assert!(!slow_applied);
        assert_eq!(api.calls(), 2);
    }

    #[tokio::test]
    async fn injected_failures_surface_as_errors() {
        let api = InMemoryApi::demo();
        api.set_failing(true);
        let query = RecordQuery::new(Role::Admin, TableSchema::Ledger, "");

        assert!(api.fetch_records(&query).await.is_err());
        api.set_failing(false);
        assert!(api.fetch_records(&query).await.is_ok());
        assert_eq!(api.calls(), 2);
    }
}
