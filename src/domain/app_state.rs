use std::{
    collections::HashMap,
    time::{Duration, SystemTime},
};

use serde::{Deserialize, Serialize};

use super::date_filter::DateRange;
use super::entities::{NdrRecord, Order, Shipment, WalletTransaction};
use super::ledger::LedgerTransaction;
use super::request_guard::RequestGeneration;
use super::schema::{RecordSet, TableSchema};
use super::sort::SortConfig;
use super::table::{TableSnapshot, TableView};

/// Which dashboard surface is active.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    #[default]
    Seller,
    Admin,
}

impl Role {
    pub fn name(&self) -> &'static str {
        match self {
            Role::Seller => "Seller",
            Role::Admin => "Admin",
        }
    }

    /// API path prefix of the role's surface.
    pub fn api_prefix(&self) -> &'static str {
        match self {
            Role::Seller => "api/v1/seller/",
            Role::Admin => "api/v2/admin/",
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct AppState {
    pub role: Role,
    /// Seller the seller surface is scoped to.
    pub seller_id: String,
    pub shipments: TableView<Shipment>,
    pub orders: TableView<Order>,
    pub ndr: TableView<NdrRecord>,
    pub ledger: TableView<LedgerTransaction>,
    pub wallet: TableView<WalletTransaction>,
    pub cache: CacheTimestamps,
}

impl AppState {
    pub fn new(role: Role, seller_id: impl Into<String>) -> Self {
        Self {
            role,
            seller_id: seller_id.into(),
            ..Self::default()
        }
    }

    pub fn is_stale(&self, schema: TableSchema, ttl: Duration) -> bool {
        self.cache.is_stale(&schema, ttl)
    }

    pub fn date_range(&self, schema: TableSchema) -> DateRange {
        match schema {
            TableSchema::Shipments => self.shipments.date_range,
            TableSchema::Orders => self.orders.date_range,
            TableSchema::Ndr => self.ndr.date_range,
            TableSchema::Ledger => self.ledger.date_range,
            TableSchema::Wallet => self.wallet.date_range,
        }
    }

    pub fn set_date_range(&mut self, schema: TableSchema, range: DateRange) {
        match schema {
            TableSchema::Shipments => self.shipments.set_date_range(range),
            TableSchema::Orders => self.orders.set_date_range(range),
            TableSchema::Ndr => self.ndr.set_date_range(range),
            TableSchema::Ledger => self.ledger.set_date_range(range),
            TableSchema::Wallet => self.wallet.set_date_range(range),
        }
    }

    pub fn sort(&self, schema: TableSchema) -> &SortConfig {
        match schema {
            TableSchema::Shipments => &self.shipments.sort,
            TableSchema::Orders => &self.orders.sort,
            TableSchema::Ndr => &self.ndr.sort,
            TableSchema::Ledger => &self.ledger.sort,
            TableSchema::Wallet => &self.wallet.sort,
        }
    }

    pub fn toggle_sort(&mut self, schema: TableSchema, column: &str) {
        match schema {
            TableSchema::Shipments => self.shipments.toggle_sort(column),
            TableSchema::Orders => self.orders.toggle_sort(column),
            TableSchema::Ndr => self.ndr.toggle_sort(column),
            TableSchema::Ledger => self.ledger.toggle_sort(column),
            TableSchema::Wallet => self.wallet.toggle_sort(column),
        }
    }

    pub fn clear_sort(&mut self, schema: TableSchema) {
        let sort = match schema {
            TableSchema::Shipments => &mut self.shipments.sort,
            TableSchema::Orders => &mut self.orders.sort,
            TableSchema::Ndr => &mut self.ndr.sort,
            TableSchema::Ledger => &mut self.ledger.sort,
            TableSchema::Wallet => &mut self.wallet.sort,
        };
        *sort = SortConfig::default();
    }

    pub fn requests(&self, schema: TableSchema) -> &RequestGeneration {
        match schema {
            TableSchema::Shipments => &self.shipments.requests,
            TableSchema::Orders => &self.orders.requests,
            TableSchema::Ndr => &self.ndr.requests,
            TableSchema::Ledger => &self.ledger.requests,
            TableSchema::Wallet => &self.wallet.requests,
        }
    }

    /// Replaces the rows of the table the record set belongs to.
    pub fn apply_records(&mut self, records: RecordSet, fetched_at: SystemTime) {
        let schema = records.schema();
        match records {
            RecordSet::Shipments(rows) => self.shipments.replace_records(rows),
            RecordSet::Orders(rows) => self.orders.replace_records(rows),
            RecordSet::Ndr(rows) => self.ndr.replace_records(rows),
            RecordSet::Ledger(rows) => self.ledger.replace_records(rows),
            RecordSet::Wallet(rows) => self.wallet.replace_records(rows),
        }
        self.cache.record_fetch(schema, fetched_at);
    }

    pub fn snapshot(&self, schema: TableSchema) -> TableSnapshot {
        let (role, seller) = (self.role, self.seller_id.as_str());
        match schema {
            TableSchema::Shipments => self.shipments.snapshot(role, seller),
            TableSchema::Orders => self.orders.snapshot(role, seller),
            TableSchema::Ndr => self.ndr.snapshot(role, seller),
            TableSchema::Ledger => self.ledger.snapshot(role, seller),
            TableSchema::Wallet => self.wallet.snapshot(role, seller),
        }
    }

    /// Switching surface drops every loaded table; rows of one role must not
    /// leak into the other.
    pub fn switch_role(&mut self, role: Role) {
        if self.role == role {
            return;
        }
        self.role = role;
        self.reset_tables();
    }

    /// Scopes the seller surface to another seller. Returns whether anything
    /// changed; loaded rows of the previous seller are dropped.
    pub fn set_seller(&mut self, seller_id: &str) -> bool {
        let seller_id = seller_id.trim();
        if seller_id.is_empty() || seller_id == self.seller_id {
            return false;
        }
        self.seller_id = seller_id.to_string();
        self.reset_tables();
        true
    }

    fn reset_tables(&mut self) {
        for schema in TableSchema::ALL {
            self.requests(schema).invalidate();
        }
        self.shipments.replace_records(Vec::new());
        self.orders.replace_records(Vec::new());
        self.ndr.replace_records(Vec::new());
        self.ledger.replace_records(Vec::new());
        self.wallet.replace_records(Vec::new());
        self.cache.clear();
    }

    pub fn apply_persisted(&mut self, persisted: PersistedState) {
        self.role = persisted.role;
        if !persisted.seller_id.is_empty() {
            self.seller_id = persisted.seller_id;
        }
        for schema in TableSchema::ALL {
            let Some(prefs) = persisted.tables.get(&schema) else {
                continue;
            };
            let range = DateRange::parse_input(&prefs.from, &prefs.to).unwrap_or_default();
            self.set_date_range(schema, range);
            match schema {
                TableSchema::Shipments => self.shipments.sort = prefs.sort.clone(),
                TableSchema::Orders => self.orders.sort = prefs.sort.clone(),
                TableSchema::Ndr => self.ndr.sort = prefs.sort.clone(),
                TableSchema::Ledger => self.ledger.sort = prefs.sort.clone(),
                TableSchema::Wallet => self.wallet.sort = prefs.sort.clone(),
            }
        }
    }

    pub fn to_persisted(&self) -> PersistedState {
        let tables = TableSchema::ALL
            .into_iter()
            .map(|schema| {
                let range = self.date_range(schema);
                let prefs = TablePrefs {
                    sort: self.sort(schema).clone(),
                    from: range.from_input(),
                    to: range.to_input(),
                };
                (schema, prefs)
            })
            .collect();

        PersistedState {
            role: self.role,
            seller_id: self.seller_id.clone(),
            tables,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct CacheTimestamps {
    entries: HashMap<TableSchema, SystemTime>,
}

impl CacheTimestamps {
    pub fn record_fetch(&mut self, schema: TableSchema, fetched_at: SystemTime) {
        self.entries.insert(schema, fetched_at);
    }

    pub fn fetched_at(&self, schema: &TableSchema) -> Option<SystemTime> {
        self.entries.get(schema).copied()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn is_stale(&self, schema: &TableSchema, ttl: Duration) -> bool {
        self.fetched_at(schema)
            .map(|time| time.elapsed().map(|elapsed| elapsed > ttl).unwrap_or(true))
            .unwrap_or(true)
    }
}

/// Per-table UI preferences kept across sessions.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TablePrefs {
    #[serde(default)]
    pub sort: SortConfig,
    /// Date inputs as typed, `YYYY-MM-DD` or empty.
    #[serde(default)]
    pub from: String,
    #[serde(default)]
    pub to: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PersistedState {
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub seller_id: String,
    #[serde(default)]
    pub tables: HashMap<TableSchema, TablePrefs>,
}
