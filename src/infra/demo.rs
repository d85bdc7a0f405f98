//! Seeded records for demo mode and tests.

use crate::domain::{
    LedgerEntry, LedgerTransaction, NdrRecord, NdrStatus, Order, OrderStatus, PaymentType,
    Shipment, ShipmentStatus, WalletTransaction, WalletTxnKind, WalletTxnStatus,
};

pub const DEMO_SELLERS: [&str; 2] = ["SLR-1001", "SLR-1002"];

#[derive(Clone, Debug, Default, PartialEq)]
pub struct DemoDataset {
    pub shipments: Vec<Shipment>,
    pub orders: Vec<Order>,
    pub ndr: Vec<NdrRecord>,
    pub ledger: Vec<LedgerTransaction>,
    pub wallet: Vec<WalletTransaction>,
}

#[allow(clippy::too_many_arguments)]
fn shipment(
    awb: &str,
    order_id: &str,
    seller_id: &str,
    courier: &str,
    status: ShipmentStatus,
    payment_type: PaymentType,
    weight: Option<f64>,
    shipping_charge: &str,
    created_at: &str,
    delivered_at: &str,
) -> Shipment {
    Shipment {
        awb: awb.into(),
        order_id: order_id.into(),
        seller_id: seller_id.into(),
        courier: courier.into(),
        status,
        payment_type,
        weight,
        shipping_charge: shipping_charge.into(),
        created_at: created_at.into(),
        delivered_at: delivered_at.into(),
    }
}

#[allow(clippy::too_many_arguments)]
fn order(
    order_id: &str,
    seller_id: &str,
    customer_name: &str,
    order_date: &str,
    status: OrderStatus,
    payment_type: PaymentType,
    items: u32,
    order_amount: &str,
) -> Order {
    Order {
        order_id: order_id.into(),
        seller_id: seller_id.into(),
        customer_name: customer_name.into(),
        order_date: order_date.into(),
        status,
        payment_type,
        items,
        order_amount: order_amount.into(),
    }
}

#[allow(clippy::too_many_arguments)]
fn ndr(
    awb: &str,
    order_id: &str,
    seller_id: &str,
    customer_name: &str,
    reason: &str,
    attempts: u32,
    last_attempt: &str,
    status: NdrStatus,
) -> NdrRecord {
    NdrRecord {
        awb: awb.into(),
        order_id: order_id.into(),
        seller_id: seller_id.into(),
        customer_name: customer_name.into(),
        reason: reason.into(),
        attempts,
        last_attempt: last_attempt.into(),
        status,
    }
}

/// Freight debit with 18% IGST, or a plain credit.
fn ledger(
    id: &str,
    seller_id: &str,
    date: &str,
    description: &str,
    entry: LedgerEntry,
    closing_balance: f64,
) -> LedgerTransaction {
    let (taxable, igst) = match entry {
        LedgerEntry::Debit(total) => {
            let taxable = (total / 1.18 * 100.0).round() / 100.0;
            (taxable, ((total - taxable) * 100.0).round() / 100.0)
        }
        LedgerEntry::Credit(_) => (0.0, 0.0),
    };
    LedgerTransaction {
        transaction_id: id.into(),
        seller_id: seller_id.into(),
        date: date.into(),
        description: description.into(),
        entry,
        taxable_amount: taxable,
        igst,
        cgst: 0.0,
        sgst: 0.0,
        total_amount: match entry {
            LedgerEntry::Credit(amount) | LedgerEntry::Debit(amount) => amount,
        },
        closing_balance,
    }
}

fn wallet(
    id: &str,
    seller_id: &str,
    date: &str,
    kind: WalletTxnKind,
    amount: &str,
    status: WalletTxnStatus,
    reference: Option<&str>,
) -> WalletTransaction {
    WalletTransaction {
        transaction_id: id.into(),
        seller_id: seller_id.into(),
        date: date.into(),
        kind,
        transaction_amount: amount.into(),
        status,
        reference: reference.map(str::to_string),
    }
}

pub fn demo_dataset() -> DemoDataset {
    use PaymentType::{Cod, Prepaid};
    let [a, b] = DEMO_SELLERS;

    DemoDataset {
        shipments: vec![
            shipment("DLV7781200011", "ORD-5001", a, "Delhivery Surface", ShipmentStatus::Delivered, Prepaid, Some(0.5), "₹54.28", "2024-03-02T09:14:00Z", "2024-03-05T16:40:00Z"),
            shipment("XB1400298812", "ORD-5002", a, "Xpressbees", ShipmentStatus::InTransit, Cod, Some(1.5), "₹118.00", "2024-03-11T11:02:00Z", "Never"),
            shipment("EK55012009", "ORD-5003", a, "Ekart", ShipmentStatus::Ndr, Cod, Some(2.0), "₹143.96", "2024-03-18T08:30:00Z", "Never"),
            shipment("BD90041177", "ORD-5004", a, "Blue Dart Air", ShipmentStatus::Delivered, Prepaid, Some(0.5), "₹80.24", "2024-03-28T17:45:00Z", "2024-03-29T13:05:00Z"),
            shipment("DLV7781200099", "ORD-5005", a, "Delhivery Surface", ShipmentStatus::Booked, Prepaid, None, "₹0.00", "2024-04-03T10:00:00Z", "Never"),
            shipment("XB1400300045", "ORD-6001", b, "Xpressbees", ShipmentStatus::Rto, Cod, Some(1.0), "₹1,040.50", "2024-03-07T12:20:00Z", "-"),
            shipment("EK55012144", "ORD-6002", b, "Ekart", ShipmentStatus::OutForDelivery, Prepaid, Some(3.5), "₹321.02", "2024-03-21T07:55:00Z", "Never"),
            shipment("BD90041290", "ORD-6003", b, "Blue Dart Air", ShipmentStatus::Delivered, Cod, Some(0.75), "₹160.48", "2024-02-26T15:10:00Z", "2024-02-28T11:00:00Z"),
        ],
        orders: vec![
            order("ORD-5001", a, "Asha Verma", "2024-03-01", OrderStatus::Delivered, Prepaid, 1, "₹499.00"),
            order("ORD-5002", a, "Rohit Nair", "2024-03-10", OrderStatus::Shipped, Cod, 3, "₹1,797.00"),
            order("ORD-5003", a, "Meera Iyer", "2024-03-17", OrderStatus::Shipped, Cod, 2, "₹2,350.00"),
            order("ORD-5004", a, "Kabir Shah", "2024-03-28", OrderStatus::Delivered, Prepaid, 1, "₹899.00"),
            order("ORD-5005", a, "Divya Rao", "2024-04-03", OrderStatus::ReadyToShip, Prepaid, 4, "₹3,196.00"),
            order("ORD-5006", a, "Imran Qureshi", "2024-04-05", OrderStatus::New, Cod, 1, "₹649.00"),
            order("ORD-6001", b, "Neha Gupta", "2024-03-06", OrderStatus::Returned, Cod, 2, "₹12,400.00"),
            order("ORD-6002", b, "Arjun Menon", "2024-03-20", OrderStatus::Shipped, Prepaid, 5, "₹4,150.00"),
            order("ORD-6003", b, "Sara Thomas", "2024-02-25", OrderStatus::Delivered, Cod, 1, "₹1,299.00"),
        ],
        ndr: vec![
            ndr("EK55012009", "ORD-5003", a, "Meera Iyer", "Customer not available", 1, "2024-03-20T18:05:00Z", NdrStatus::ActionRequired),
            ndr("DLV7781200140", "ORD-4990", a, "Farah Khan", "Incomplete address", 2, "2024-03-14T12:30:00Z", NdrStatus::ReattemptRequested),
            ndr("XB1400300045", "ORD-6001", b, "Neha Gupta", "Customer refused delivery", 3, "2024-03-10T16:45:00Z", NdrStatus::RtoRequested),
            ndr("EK55012190", "ORD-6010", b, "Vikram Das", "Premises closed", 1, "Never", NdrStatus::ActionRequired),
        ],
        ledger: vec![
            ledger("LED-0001", a, "2024-03-01", "Wallet recharge", LedgerEntry::Credit(2000.0), 2000.0),
            ledger("LED-0002", a, "2024-03-02", "Freight DLV7781200011", LedgerEntry::Debit(54.28), 1945.72),
            ledger("LED-0003", a, "2024-03-11", "Freight XB1400298812", LedgerEntry::Debit(118.0), 1827.72),
            ledger("LED-0004", a, "2024-03-18", "Freight EK55012009", LedgerEntry::Debit(143.96), 1683.76),
            ledger("LED-0005", a, "2024-03-28", "Freight BD90041177", LedgerEntry::Debit(80.24), 1603.52),
            ledger("LED-0101", b, "2024-02-20", "Wallet recharge", LedgerEntry::Credit(5000.0), 5000.0),
            ledger("LED-0102", b, "2024-03-07", "Freight XB1400300045", LedgerEntry::Debit(1040.5), 3959.5),
            ledger("LED-0103", b, "2024-03-15", "RTO freight reversal", LedgerEntry::Credit(120.0), 4079.5),
        ],
        wallet: vec![
            wallet("WTX-9001", a, "2024-03-01T10:15:00Z", WalletTxnKind::Recharge, "₹2,000.00", WalletTxnStatus::Success, Some("UTR4471120")),
            wallet("WTX-9002", a, "2024-03-02T09:14:00Z", WalletTxnKind::ShippingDeduction, "₹54.28", WalletTxnStatus::Success, None),
            wallet("WTX-9003", a, "2024-03-12T00:00:00Z", WalletTxnKind::CodRemittance, "₹1,797.00", WalletTxnStatus::Pending, Some("REM-2024-031")),
            wallet("WTX-9004", a, "not recorded", WalletTxnKind::Refund, "₹80.24", WalletTxnStatus::Failed, None),
            wallet("WTX-9101", b, "2024-02-20T08:00:00Z", WalletTxnKind::Recharge, "₹5,000.00", WalletTxnStatus::Success, Some("UTR9910021")),
            wallet("WTX-9102", b, "2024-03-07T12:20:00Z", WalletTxnKind::ShippingDeduction, "₹1,040.50", WalletTxnStatus::Success, None),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::summarize_ledger;

    #[test]
    fn every_record_belongs_to_a_demo_seller() {
        let data = demo_dataset();
        assert!(data.shipments.iter().all(|s| DEMO_SELLERS.contains(&s.seller_id.as_str())));
        assert!(data.orders.iter().all(|o| DEMO_SELLERS.contains(&o.seller_id.as_str())));
        assert!(data.wallet.iter().all(|w| DEMO_SELLERS.contains(&w.seller_id.as_str())));
    }

    #[test]
    fn demo_ledger_balances_match_the_entries() {
        let data = demo_dataset();
        for seller in DEMO_SELLERS {
            let rows: Vec<_> = data
                .ledger
                .iter()
                .filter(|row| row.seller_id == seller)
                .cloned()
                .collect();
            let summary = summarize_ledger(&rows);
            let closing = summary.closing_balance.expect("dated rows");
            assert!((closing - summary.net()).abs() < 0.01, "{seller}");
        }
    }
}
