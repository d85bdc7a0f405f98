//! Per-table view model: raw records plus the local filter and sort state.
//!
//! Everything the page shows is derived on demand:
//! `records → filter (date range) → sort → totals`.

use std::collections::BTreeMap;

use super::app_state::Role;
use super::date_filter::{filter_by_date_range, DateRange};
use super::request_guard::RequestGeneration;
use super::schema::{Column, FieldValue, TableRecord, TableSchema};
use super::sort::{parse_currency, sort_records, SortConfig};

#[derive(Clone, Debug)]
pub struct TableView<R: TableRecord> {
    records: Vec<R>,
    pub date_range: DateRange,
    pub sort: SortConfig,
    pub requests: RequestGeneration,
}

impl<R: TableRecord> Default for TableView<R> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            date_range: DateRange::default(),
            sort: SortConfig::default(),
            requests: RequestGeneration::new(),
        }
    }
}

impl<R: TableRecord> PartialEq for TableView<R> {
    fn eq(&self, other: &Self) -> bool {
        self.records == other.records
            && self.date_range == other.date_range
            && self.sort == other.sort
    }
}

/// Rows after filtering and sorting, with their aggregates.
#[derive(Clone, Debug, PartialEq)]
pub struct VisibleRows<R> {
    pub rows: Vec<R>,
    pub malformed: Vec<String>,
    pub totals: Totals,
}

/// Row count plus per-column sums of the summable columns.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Totals {
    pub count: usize,
    pub sums: BTreeMap<&'static str, f64>,
}

impl Totals {
    pub fn compute<R: TableRecord>(rows: &[R]) -> Self {
        let mut sums = BTreeMap::new();
        for column in R::SCHEMA.columns().iter().filter(|column| column.summable) {
            let currency = R::SCHEMA.is_currency_column(column.key);
            let total: f64 = rows
                .iter()
                .filter_map(|row| numeric_value(&row.field(column.key), currency))
                .sum();
            sums.insert(column.key, total);
        }
        Self {
            count: rows.len(),
            sums,
        }
    }

    pub fn sum(&self, column: &str) -> Option<f64> {
        self.sums.get(column).copied()
    }
}

fn numeric_value(value: &FieldValue, currency: bool) -> Option<f64> {
    if currency {
        parse_currency(&value.as_text())
    } else {
        value.as_number()
    }
}

impl<R: TableRecord> TableView<R> {
    pub fn with_records(records: Vec<R>) -> Self {
        Self {
            records,
            ..Self::default()
        }
    }

    pub fn records(&self) -> &[R] {
        &self.records
    }

    pub fn replace_records(&mut self, records: Vec<R>) {
        self.records = records;
    }

    /// Updates a single record in place, matched by key.
    pub fn upsert(&mut self, record: R) {
        match self.records.iter_mut().find(|row| row.key() == record.key()) {
            Some(existing) => *existing = record,
            None => self.records.push(record),
        }
    }

    pub fn set_date_range(&mut self, range: DateRange) {
        self.date_range = range;
    }

    pub fn toggle_sort(&mut self, column: &str) {
        self.sort.toggle(column);
    }

    /// Filtered and sorted rows. Sellers only ever see their own records.
    pub fn visible(&self, role: Role, seller_id: &str) -> VisibleRows<R> {
        let scoped: Vec<R> = match role {
            Role::Admin => self.records.clone(),
            Role::Seller => self
                .records
                .iter()
                .filter(|row| row.seller_id().is_empty() || row.seller_id() == seller_id)
                .cloned()
                .collect(),
        };
        let filtered = filter_by_date_range(&scoped, &self.date_range);
        let rows = sort_records(&filtered.matched, &self.sort);
        let totals = Totals::compute(&rows);
        VisibleRows {
            rows,
            malformed: filtered.malformed,
            totals,
        }
    }

    pub fn snapshot(&self, role: Role, seller_id: &str) -> TableSnapshot {
        let visible = self.visible(role, seller_id);
        TableSnapshot::from_rows(R::SCHEMA, role, &visible)
    }
}

/// Type-erased rendering of the visible rows, ready for the table component.
#[derive(Clone, Debug, PartialEq)]
pub struct TableSnapshot {
    pub schema: TableSchema,
    pub columns: Vec<Column>,
    pub rows: Vec<SnapshotRow>,
    pub totals: Totals,
    pub malformed: Vec<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SnapshotRow {
    pub key: String,
    pub cells: Vec<String>,
}

impl TableSnapshot {
    pub fn from_rows<R: TableRecord>(schema: TableSchema, role: Role, visible: &VisibleRows<R>) -> Self {
        let columns = schema.visible_columns(role);
        let rows = visible
            .rows
            .iter()
            .map(|row| SnapshotRow {
                key: row.key().to_string(),
                cells: columns
                    .iter()
                    .map(|column| row.field(column.key).display())
                    .collect(),
            })
            .collect();

        Self {
            schema,
            columns,
            rows,
            totals: visible.totals.clone(),
            malformed: visible.malformed.clone(),
        }
    }

    /// Totals row cells aligned with `columns`; blank for non-summable columns.
    pub fn totals_row(&self) -> Vec<String> {
        self.columns
            .iter()
            .enumerate()
            .map(|(index, column)| match self.totals.sum(column.key) {
                Some(total) => format!("{total:.2}"),
                None if index == 0 => format!("Total ({})", self.totals.count),
                None => String::new(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use super::*;
    use crate::domain::entities::{PaymentType, Shipment, ShipmentStatus};
    use crate::domain::sort::SortDirection;

    fn shipment(awb: &str, seller: &str, created: &str, charge: &str, weight: f64) -> Shipment {
        Shipment {
            awb: awb.into(),
            order_id: format!("ORD-{awb}"),
            seller_id: seller.into(),
            courier: "Delhivery".into(),
            status: ShipmentStatus::InTransit,
            payment_type: PaymentType::Prepaid,
            weight: Some(weight),
            shipping_charge: charge.into(),
            created_at: created.into(),
            delivered_at: "Never".into(),
        }
    }

    fn view() -> TableView<Shipment> {
        TableView::with_records(vec![
            shipment("A1", "SLR-1", "2024-03-10", "₹120.00", 1.0),
            shipment("A2", "SLR-2", "2024-03-12", "₹80.50", 0.5),
            shipment("A3", "SLR-1", "2024-04-02", "₹1,050.00", 4.0),
            shipment("A4", "SLR-1", "Never", "₹60.00", 0.5),
        ])
    }

    fn keys(rows: &[Shipment]) -> Vec<&str> {
        rows.iter().map(|row| row.awb.as_str()).collect()
    }

    #[test]
    fn sellers_only_see_their_own_rows() {
        let view = view();
        let seller = view.visible(Role::Seller, "SLR-1");
        let admin = view.visible(Role::Admin, "SLR-1");

        assert_eq!(keys(&seller.rows), vec!["A1", "A3", "A4"]);
        assert_eq!(admin.rows.len(), 4);
    }

    #[test]
    fn pipeline_filters_before_sorting_and_totals() {
        let mut view = view();
        view.set_date_range(DateRange::between(date!(2024 - 03 - 01), date!(2024 - 03 - 31)));
        view.sort = SortConfig::by("shippingCharge", SortDirection::Desc);

        let visible = view.visible(Role::Admin, "");

        assert_eq!(keys(&visible.rows), vec!["A1", "A2"]);
        assert_eq!(visible.totals.count, 2);
        assert_eq!(visible.totals.sum("shippingCharge"), Some(200.5));
        assert_eq!(visible.totals.sum("weight"), Some(1.5));
        assert_eq!(visible.totals.sum("awb"), None);
        assert_eq!(view.records().len(), 4);
    }

    #[test]
    fn upsert_replaces_by_key() {
        let mut view = view();
        let mut changed = shipment("A2", "SLR-2", "2024-03-12", "₹99.00", 0.5);
        changed.status = ShipmentStatus::Delivered;
        view.upsert(changed.clone());

        assert_eq!(view.records().len(), 4);
        assert_eq!(view.records()[1], changed);
    }

    #[test]
    fn snapshot_hides_seller_column_and_builds_totals_row() {
        let snapshot = view().snapshot(Role::Seller, "SLR-1");

        assert!(snapshot.columns.iter().all(|column| column.key != "sellerId"));
        assert_eq!(snapshot.rows.len(), 3);
        assert_eq!(snapshot.rows[0].cells[0], "A1");

        let totals = snapshot.totals_row();
        assert_eq!(totals.len(), snapshot.columns.len());
        assert_eq!(totals[0], "Total (3)");
        assert!(totals.contains(&"1230.00".to_string()));
    }
}
