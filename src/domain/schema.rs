//! Table schemas shared by every dashboard page.
//!
//! - Each page renders exactly one [`TableSchema`] variant.
//! - Records expose their cells through [`TableRecord::field`] so filtering,
//!   sorting, totals and export never need to know the concrete record type.

use serde::{Deserialize, Serialize};

use super::app_state::Role;
use super::ledger::LedgerTransaction;
use super::entities::{NdrRecord, Order, Shipment, WalletTransaction};

/// Column key that only the admin surface shows.
pub const SELLER_COLUMN: &str = "sellerId";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TableSchema {
    Shipments,
    Orders,
    Ndr,
    Ledger,
    Wallet,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColumnKind {
    Text,
    Date,
    Number,
    /// Display strings such as `"₹1,250.00"` that sort numerically.
    Currency,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Column {
    pub key: &'static str,
    pub label: &'static str,
    pub kind: ColumnKind,
    /// Character width used by the XLSX export.
    pub width: f64,
    /// Included in the totals row.
    pub summable: bool,
}

const fn col(key: &'static str, label: &'static str, kind: ColumnKind, width: f64) -> Column {
    Column {
        key,
        label,
        kind,
        width,
        summable: false,
    }
}

const fn sum(key: &'static str, label: &'static str, kind: ColumnKind, width: f64) -> Column {
    Column {
        key,
        label,
        kind,
        width,
        summable: true,
    }
}

const SHIPMENT_COLUMNS: &[Column] = &[
    col("awb", "AWB", ColumnKind::Text, 20.0),
    col("orderId", "Order ID", ColumnKind::Text, 16.0),
    col(SELLER_COLUMN, "Seller", ColumnKind::Text, 12.0),
    col("courier", "Courier", ColumnKind::Text, 18.0),
    col("status", "Status", ColumnKind::Text, 18.0),
    col("paymentType", "Payment", ColumnKind::Text, 10.0),
    sum("weight", "Weight (kg)", ColumnKind::Number, 12.0),
    sum("shippingCharge", "Shipping Charge", ColumnKind::Currency, 16.0),
    col("createdAt", "Created", ColumnKind::Date, 22.0),
    col("deliveredAt", "Delivered", ColumnKind::Date, 22.0),
];

const ORDER_COLUMNS: &[Column] = &[
    col("orderId", "Order ID", ColumnKind::Text, 16.0),
    col(SELLER_COLUMN, "Seller", ColumnKind::Text, 12.0),
    col("customerName", "Customer", ColumnKind::Text, 22.0),
    col("orderDate", "Order Date", ColumnKind::Date, 14.0),
    col("status", "Status", ColumnKind::Text, 16.0),
    col("paymentType", "Payment", ColumnKind::Text, 10.0),
    sum("items", "Items", ColumnKind::Number, 8.0),
    sum("orderAmount", "Amount", ColumnKind::Currency, 14.0),
];

const NDR_COLUMNS: &[Column] = &[
    col("awb", "AWB", ColumnKind::Text, 20.0),
    col("orderId", "Order ID", ColumnKind::Text, 16.0),
    col(SELLER_COLUMN, "Seller", ColumnKind::Text, 12.0),
    col("customerName", "Customer", ColumnKind::Text, 22.0),
    col("reason", "Reason", ColumnKind::Text, 32.0),
    col("attempts", "Attempts", ColumnKind::Number, 10.0),
    col("lastAttempt", "Last Attempt", ColumnKind::Date, 22.0),
    col("status", "Status", ColumnKind::Text, 20.0),
];

const LEDGER_COLUMNS: &[Column] = &[
    col("transactionId", "Transaction", ColumnKind::Text, 18.0),
    col(SELLER_COLUMN, "Seller", ColumnKind::Text, 12.0),
    col("date", "Date", ColumnKind::Date, 14.0),
    col("description", "Description", ColumnKind::Text, 34.0),
    sum("credit", "Credit", ColumnKind::Number, 12.0),
    sum("debit", "Debit", ColumnKind::Number, 12.0),
    sum("taxableAmount", "Taxable", ColumnKind::Number, 12.0),
    sum("igst", "IGST", ColumnKind::Number, 10.0),
    sum("cgst", "CGST", ColumnKind::Number, 10.0),
    sum("sgst", "SGST", ColumnKind::Number, 10.0),
    sum("totalAmount", "Total", ColumnKind::Number, 12.0),
    col("closingBalance", "Closing Balance", ColumnKind::Number, 16.0),
];

const WALLET_COLUMNS: &[Column] = &[
    col("transactionId", "Transaction", ColumnKind::Text, 18.0),
    col(SELLER_COLUMN, "Seller", ColumnKind::Text, 12.0),
    col("date", "Date", ColumnKind::Date, 22.0),
    col("kind", "Type", ColumnKind::Text, 18.0),
    sum("transactionAmount", "Amount", ColumnKind::Currency, 14.0),
    col("status", "Status", ColumnKind::Text, 10.0),
    col("reference", "Reference", ColumnKind::Text, 22.0),
];

impl TableSchema {
    pub const ALL: [TableSchema; 5] = [
        TableSchema::Shipments,
        TableSchema::Orders,
        TableSchema::Ndr,
        TableSchema::Ledger,
        TableSchema::Wallet,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Self::Shipments => "Shipments",
            Self::Orders => "Orders",
            Self::Ndr => "NDR",
            Self::Ledger => "Billing Ledger",
            Self::Wallet => "Wallet Transactions",
        }
    }

    /// Prefix used for export file names.
    pub fn entity(&self) -> &'static str {
        match self {
            Self::Shipments => "shipments",
            Self::Orders => "orders",
            Self::Ndr => "ndr",
            Self::Ledger => "ledger",
            Self::Wallet => "wallet",
        }
    }

    /// Resource path below the role prefix (`api/v1/seller/`, `api/v2/admin/`).
    pub fn endpoint(&self) -> &'static str {
        match self {
            Self::Shipments => "shipments",
            Self::Orders => "orders",
            Self::Ndr => "ndr",
            Self::Ledger => "billing/ledger",
            Self::Wallet => "wallet/transactions",
        }
    }

    /// The date-like column the date-range filter applies to.
    pub fn date_column(&self) -> &'static str {
        match self {
            Self::Shipments => "createdAt",
            Self::Orders => "orderDate",
            Self::Ndr => "lastAttempt",
            Self::Ledger | Self::Wallet => "date",
        }
    }

    pub fn columns(&self) -> &'static [Column] {
        match self {
            Self::Shipments => SHIPMENT_COLUMNS,
            Self::Orders => ORDER_COLUMNS,
            Self::Ndr => NDR_COLUMNS,
            Self::Ledger => LEDGER_COLUMNS,
            Self::Wallet => WALLET_COLUMNS,
        }
    }

    /// Columns shown to `role`; sellers never see the seller column.
    pub fn visible_columns(&self, role: Role) -> Vec<Column> {
        self.columns()
            .iter()
            .copied()
            .filter(|column| role == Role::Admin || column.key != SELLER_COLUMN)
            .collect()
    }

    pub fn column(&self, key: &str) -> Option<&'static Column> {
        self.columns().iter().find(|column| column.key == key)
    }

    pub fn is_currency_column(&self, key: &str) -> bool {
        self.column(key)
            .map(|column| column.kind == ColumnKind::Currency)
            .unwrap_or(false)
    }
}

/// A single cell value read off a record.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldValue {
    Text(String),
    Number(f64),
    Missing,
}

impl FieldValue {
    pub fn text(value: impl Into<String>) -> Self {
        FieldValue::Text(value.into())
    }

    /// Lexicographic form used by the string comparator; missing is empty.
    pub fn as_text(&self) -> String {
        match self {
            FieldValue::Text(value) => value.clone(),
            FieldValue::Number(value) => value.to_string(),
            FieldValue::Missing => String::new(),
        }
    }

    /// Human-readable cell text for the on-screen table.
    pub fn display(&self) -> String {
        match self {
            FieldValue::Text(value) => value.clone(),
            FieldValue::Number(value) if value.fract() == 0.0 => format!("{value:.0}"),
            FieldValue::Number(value) => format!("{value:.2}"),
            FieldValue::Missing => String::new(),
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(value) if value.is_finite() => Some(*value),
            _ => None,
        }
    }
}

impl From<Option<f64>> for FieldValue {
    fn from(value: Option<f64>) -> Self {
        value.map(FieldValue::Number).unwrap_or(FieldValue::Missing)
    }
}

/// Payload of a fetch, tagged with the table it belongs to.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "table", content = "rows")]
pub enum RecordSet {
    Shipments(Vec<Shipment>),
    Orders(Vec<Order>),
    Ndr(Vec<NdrRecord>),
    Ledger(Vec<LedgerTransaction>),
    Wallet(Vec<WalletTransaction>),
}

impl RecordSet {
    pub fn schema(&self) -> TableSchema {
        match self {
            RecordSet::Shipments(_) => TableSchema::Shipments,
            RecordSet::Orders(_) => TableSchema::Orders,
            RecordSet::Ndr(_) => TableSchema::Ndr,
            RecordSet::Ledger(_) => TableSchema::Ledger,
            RecordSet::Wallet(_) => TableSchema::Wallet,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            RecordSet::Shipments(rows) => rows.len(),
            RecordSet::Orders(rows) => rows.len(),
            RecordSet::Ndr(rows) => rows.len(),
            RecordSet::Ledger(rows) => rows.len(),
            RecordSet::Wallet(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A read-only API record that can be shown in a dashboard table.
pub trait TableRecord: Clone + PartialEq + 'static {
    const SCHEMA: TableSchema;

    /// Identifying key (AWB, order id, transaction id).
    fn key(&self) -> &str;

    fn seller_id(&self) -> &str;

    /// Raw value of the schema's date column.
    fn date_value(&self) -> String {
        self.field(Self::SCHEMA.date_column()).as_text()
    }

    fn field(&self, column: &str) -> FieldValue;

    fn wrap(rows: Vec<Self>) -> RecordSet;

    /// Pulls this record type back out of a fetch payload.
    fn extract(set: RecordSet) -> Option<Vec<Self>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sellers_do_not_see_the_seller_column() {
        let seller = TableSchema::Shipments.visible_columns(Role::Seller);
        let admin = TableSchema::Shipments.visible_columns(Role::Admin);

        assert!(seller.iter().all(|column| column.key != SELLER_COLUMN));
        assert!(admin.iter().any(|column| column.key == SELLER_COLUMN));
        assert_eq!(admin.len(), seller.len() + 1);
    }

    #[test]
    fn every_schema_declares_its_date_column() {
        for schema in TableSchema::ALL {
            let column = schema
                .column(schema.date_column())
                .expect("date column must exist");
            assert_eq!(column.kind, ColumnKind::Date, "{schema:?}");
        }
    }

    #[test]
    fn currency_columns_are_detected_by_name() {
        assert!(TableSchema::Wallet.is_currency_column("transactionAmount"));
        assert!(TableSchema::Shipments.is_currency_column("shippingCharge"));
        assert!(!TableSchema::Shipments.is_currency_column("weight"));
        assert!(!TableSchema::Orders.is_currency_column("unknown"));
    }

    #[test]
    fn number_cells_display_without_noise() {
        assert_eq!(FieldValue::Number(3.0).display(), "3");
        assert_eq!(FieldValue::Number(2.456).display(), "2.46");
        assert_eq!(FieldValue::Missing.display(), "");
        assert_eq!(FieldValue::Number(0.5).as_text(), "0.5");
    }
}
