//! Records served by the dashboard API.

use serde::{Deserialize, Serialize};

use super::schema::{FieldValue, RecordSet, TableRecord, TableSchema};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentType {
    #[serde(rename = "COD", alias = "cod")]
    Cod,
    #[serde(rename = "Prepaid", alias = "prepaid", alias = "PREPAID")]
    Prepaid,
}

impl PaymentType {
    pub fn label(&self) -> &'static str {
        match self {
            PaymentType::Cod => "COD",
            PaymentType::Prepaid => "Prepaid",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShipmentStatus {
    Booked,
    PickedUp,
    InTransit,
    OutForDelivery,
    Delivered,
    Ndr,
    Rto,
    Cancelled,
}

impl ShipmentStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Booked => "Booked",
            Self::PickedUp => "Picked Up",
            Self::InTransit => "In Transit",
            Self::OutForDelivery => "Out for Delivery",
            Self::Delivered => "Delivered",
            Self::Ndr => "NDR",
            Self::Rto => "RTO",
            Self::Cancelled => "Cancelled",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    New,
    ReadyToShip,
    Shipped,
    Delivered,
    Cancelled,
    Returned,
}

impl OrderStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::New => "New",
            Self::ReadyToShip => "Ready to Ship",
            Self::Shipped => "Shipped",
            Self::Delivered => "Delivered",
            Self::Cancelled => "Cancelled",
            Self::Returned => "Returned",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NdrStatus {
    ActionRequired,
    ReattemptRequested,
    RtoRequested,
    Delivered,
}

impl NdrStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::ActionRequired => "Action Required",
            Self::ReattemptRequested => "Re-attempt Requested",
            Self::RtoRequested => "RTO Requested",
            Self::Delivered => "Delivered",
        }
    }

    /// Whether the seller can still act on the NDR.
    pub fn is_open(&self) -> bool {
        matches!(self, Self::ActionRequired | Self::ReattemptRequested)
    }
}

/// Seller decision on a failed delivery.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NdrAction {
    Reattempt,
    Rto,
}

impl NdrAction {
    pub fn label(&self) -> &'static str {
        match self {
            NdrAction::Reattempt => "Re-attempt",
            NdrAction::Rto => "Return to Origin",
        }
    }

    pub fn resulting_status(&self) -> NdrStatus {
        match self {
            NdrAction::Reattempt => NdrStatus::ReattemptRequested,
            NdrAction::Rto => NdrStatus::RtoRequested,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WalletTxnKind {
    Recharge,
    ShippingDeduction,
    CodRemittance,
    Refund,
}

impl WalletTxnKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Recharge => "Recharge",
            Self::ShippingDeduction => "Shipping Deduction",
            Self::CodRemittance => "COD Remittance",
            Self::Refund => "Refund",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WalletTxnStatus {
    Success,
    Pending,
    Failed,
}

impl WalletTxnStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Success => "Success",
            Self::Pending => "Pending",
            Self::Failed => "Failed",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shipment {
    pub awb: String,
    pub order_id: String,
    #[serde(default)]
    pub seller_id: String,
    pub courier: String,
    pub status: ShipmentStatus,
    pub payment_type: PaymentType,
    /// Chargeable weight in kg.
    #[serde(default)]
    pub weight: Option<f64>,
    /// Formatted by the backend, e.g. `"₹1,250.00"`.
    #[serde(default)]
    pub shipping_charge: String,
    pub created_at: String,
    /// `"Never"` until the parcel is delivered.
    #[serde(default = "never")]
    pub delivered_at: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub order_id: String,
    #[serde(default)]
    pub seller_id: String,
    pub customer_name: String,
    pub order_date: String,
    pub status: OrderStatus,
    pub payment_type: PaymentType,
    #[serde(default)]
    pub items: u32,
    #[serde(default)]
    pub order_amount: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NdrRecord {
    pub awb: String,
    pub order_id: String,
    #[serde(default)]
    pub seller_id: String,
    pub customer_name: String,
    pub reason: String,
    #[serde(default)]
    pub attempts: u32,
    pub last_attempt: String,
    pub status: NdrStatus,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletTransaction {
    pub transaction_id: String,
    #[serde(default)]
    pub seller_id: String,
    pub date: String,
    pub kind: WalletTxnKind,
    /// Formatted by the backend, e.g. `"₹5,000"`.
    pub transaction_amount: String,
    pub status: WalletTxnStatus,
    #[serde(default)]
    pub reference: Option<String>,
}

fn never() -> String {
    "Never".to_string()
}

impl TableRecord for Shipment {
    const SCHEMA: TableSchema = TableSchema::Shipments;

    fn key(&self) -> &str {
        &self.awb
    }

    fn seller_id(&self) -> &str {
        &self.seller_id
    }

    fn field(&self, column: &str) -> FieldValue {
        match column {
            "awb" => FieldValue::text(&self.awb),
            "orderId" => FieldValue::text(&self.order_id),
            "sellerId" => FieldValue::text(&self.seller_id),
            "courier" => FieldValue::text(&self.courier),
            "status" => FieldValue::text(self.status.label()),
            "paymentType" => FieldValue::text(self.payment_type.label()),
            "weight" => self.weight.into(),
            "shippingCharge" => FieldValue::text(&self.shipping_charge),
            "createdAt" => FieldValue::text(&self.created_at),
            "deliveredAt" => FieldValue::text(&self.delivered_at),
            _ => FieldValue::Missing,
        }
    }

    fn wrap(rows: Vec<Self>) -> RecordSet {
        RecordSet::Shipments(rows)
    }

    fn extract(set: RecordSet) -> Option<Vec<Self>> {
        match set {
            RecordSet::Shipments(rows) => Some(rows),
            _ => None,
        }
    }
}

impl TableRecord for Order {
    const SCHEMA: TableSchema = TableSchema::Orders;

    fn key(&self) -> &str {
        &self.order_id
    }

    fn seller_id(&self) -> &str {
        &self.seller_id
    }

    fn field(&self, column: &str) -> FieldValue {
        match column {
            "orderId" => FieldValue::text(&self.order_id),
            "sellerId" => FieldValue::text(&self.seller_id),
            "customerName" => FieldValue::text(&self.customer_name),
            "orderDate" => FieldValue::text(&self.order_date),
            "status" => FieldValue::text(self.status.label()),
            "paymentType" => FieldValue::text(self.payment_type.label()),
            "items" => FieldValue::Number(self.items as f64),
            "orderAmount" => FieldValue::text(&self.order_amount),
            _ => FieldValue::Missing,
        }
    }

    fn wrap(rows: Vec<Self>) -> RecordSet {
        RecordSet::Orders(rows)
    }

    fn extract(set: RecordSet) -> Option<Vec<Self>> {
        match set {
            RecordSet::Orders(rows) => Some(rows),
            _ => None,
        }
    }
}

impl TableRecord for NdrRecord {
    const SCHEMA: TableSchema = TableSchema::Ndr;

    fn key(&self) -> &str {
        &self.awb
    }

    fn seller_id(&self) -> &str {
        &self.seller_id
    }

    fn field(&self, column: &str) -> FieldValue {
        match column {
            "awb" => FieldValue::text(&self.awb),
            "orderId" => FieldValue::text(&self.order_id),
            "sellerId" => FieldValue::text(&self.seller_id),
            "customerName" => FieldValue::text(&self.customer_name),
            "reason" => FieldValue::text(&self.reason),
            "attempts" => FieldValue::Number(self.attempts as f64),
            "lastAttempt" => FieldValue::text(&self.last_attempt),
            "status" => FieldValue::text(self.status.label()),
            _ => FieldValue::Missing,
        }
    }

    fn wrap(rows: Vec<Self>) -> RecordSet {
        RecordSet::Ndr(rows)
    }

    fn extract(set: RecordSet) -> Option<Vec<Self>> {
        match set {
            RecordSet::Ndr(rows) => Some(rows),
            _ => None,
        }
    }
}

impl TableRecord for WalletTransaction {
    const SCHEMA: TableSchema = TableSchema::Wallet;

    fn key(&self) -> &str {
        &self.transaction_id
    }

    fn seller_id(&self) -> &str {
        &self.seller_id
    }

    fn field(&self, column: &str) -> FieldValue {
        match column {
            "transactionId" => FieldValue::text(&self.transaction_id),
            "sellerId" => FieldValue::text(&self.seller_id),
            "date" => FieldValue::text(&self.date),
            "kind" => FieldValue::text(self.kind.label()),
            "transactionAmount" => FieldValue::text(&self.transaction_amount),
            "status" => FieldValue::text(self.status.label()),
            "reference" => self
                .reference
                .as_ref()
                .map(FieldValue::text)
                .unwrap_or(FieldValue::Missing),
            _ => FieldValue::Missing,
        }
    }

    fn wrap(rows: Vec<Self>) -> RecordSet {
        RecordSet::Wallet(rows)
    }

    fn extract(set: RecordSet) -> Option<Vec<Self>> {
        match set {
            RecordSet::Wallet(rows) => Some(rows),
            _ => None,
        }
    }
}
