//! Dashboard domain: records, table schemas and the per-table pipeline.

pub mod app_state;
pub mod date_filter;
pub mod entities;
pub mod ledger;
pub mod rate_card;
pub mod request_guard;
pub mod schema;
pub mod sort;
pub mod table;
pub mod weight;

#[allow(unused_imports)]
pub use app_state::{AppState, CacheTimestamps, PersistedState, Role, TablePrefs};
#[allow(unused_imports)]
pub use date_filter::{filter_by_date_range, DateFilterOutcome, DateInputError, DateRange};
#[allow(unused_imports)]
pub use entities::{
    NdrAction, NdrRecord, NdrStatus, Order, OrderStatus, PaymentType, Shipment, ShipmentStatus,
    WalletTransaction, WalletTxnKind, WalletTxnStatus,
};
#[allow(unused_imports)]
pub use ledger::{
    decode_ledger_rows, summarize_ledger, LedgerEntry, LedgerError, LedgerPage, LedgerSummary,
    LedgerTransaction, LedgerTransactionDto,
};
#[allow(unused_imports)]
pub use rate_card::{default_rate_cards, quote_all, RateCard, RateQuote, RateRequest, Zone};
#[allow(unused_imports)]
pub use request_guard::{RequestGeneration, RequestTicket};
#[allow(unused_imports)]
pub use schema::{Column, ColumnKind, FieldValue, RecordSet, TableRecord, TableSchema};
#[allow(unused_imports)]
pub use sort::{sort_records, SortConfig, SortDirection};
#[allow(unused_imports)]
pub use table::{TableSnapshot, TableView, Totals, VisibleRows};
#[allow(unused_imports)]
pub use weight::{chargeable_weight, ShippingDimension, WeightBreakdown, WeightField, WeightForm};
