//! Column sorting for dashboard tables.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::schema::{FieldValue, TableRecord};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDirection {
    Asc,
    Desc,
}

/// Header-click sort state. Both fields are `None` while unsorted.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortConfig {
    pub key: Option<String>,
    pub direction: Option<SortDirection>,
}

impl SortConfig {
    pub fn by(key: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            key: Some(key.into()),
            direction: Some(direction),
        }
    }

    /// Advances asc → desc → unsorted on the same column; a new column starts at asc.
    pub fn toggle(&mut self, column: &str) {
        let same_column = self.key.as_deref() == Some(column);
        let next = match (same_column, self.direction) {
            (true, Some(SortDirection::Asc)) => Some(SortDirection::Desc),
            (true, Some(SortDirection::Desc)) => None,
            _ => Some(SortDirection::Asc),
        };

        match next {
            Some(direction) => {
                self.key = Some(column.to_string());
                self.direction = Some(direction);
            }
            None => *self = Self::default(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.key.is_some() && self.direction.is_some()
    }

    pub fn direction_for(&self, column: &str) -> Option<SortDirection> {
        if self.key.as_deref() == Some(column) {
            self.direction
        } else {
            None
        }
    }

    pub fn indicator(&self, column: &str) -> &'static str {
        match self.direction_for(column) {
            Some(SortDirection::Asc) => "▲",
            Some(SortDirection::Desc) => "▼",
            None => "⇅",
        }
    }
}

/// Returns a sorted copy; unsorted config keeps the input order.
///
/// The sort is stable in both directions, so equal keys keep their
/// relative input order.
pub fn sort_records<R: TableRecord>(records: &[R], config: &SortConfig) -> Vec<R> {
    let mut sorted = records.to_vec();
    let (Some(key), Some(direction)) = (config.key.as_deref(), config.direction) else {
        return sorted;
    };

    let currency = R::SCHEMA.is_currency_column(key);
    sorted.sort_by(|a, b| {
        let ord = compare_fields(&a.field(key), &b.field(key), currency);
        match direction {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        }
    });
    sorted
}

pub fn compare_fields(a: &FieldValue, b: &FieldValue, currency: bool) -> Ordering {
    if currency {
        return compare_amounts(
            parse_currency(&a.as_text()),
            parse_currency(&b.as_text()),
        );
    }

    match (a, b) {
        (FieldValue::Number(x), FieldValue::Number(y)) => {
            x.partial_cmp(y).unwrap_or(Ordering::Equal)
        }
        _ => a.as_text().cmp(&b.as_text()),
    }
}

/// Unparseable amounts order before every parsed one.
fn compare_amounts(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Parses display amounts such as `"₹1,250.50"` or `"Rs. 950"`.
///
/// Everything except digits, the decimal point and a leading minus is
/// dropped. A point before the first digit belongs to a prefix like `Rs.`
/// and is ignored too.
pub fn parse_currency(raw: &str) -> Option<f64> {
    let mut cleaned = String::with_capacity(raw.len());
    let mut seen_digit = false;
    for ch in raw.chars() {
        if ch.is_ascii_digit() {
            seen_digit = true;
            cleaned.push(ch);
        } else if ch == '.' && seen_digit {
            cleaned.push(ch);
        } else if ch == '-' && !seen_digit && cleaned.is_empty() {
            cleaned.push(ch);
        }
    }
    if !seen_digit {
        return None;
    }
    cleaned.parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{WalletTransaction, WalletTxnKind, WalletTxnStatus};

    fn txn(id: &str, amount: &str, date: &str) -> WalletTransaction {
        WalletTransaction {
            transaction_id: id.to_string(),
            seller_id: "SLR-1".to_string(),
            date: date.to_string(),
            kind: WalletTxnKind::Recharge,
            transaction_amount: amount.to_string(),
            status: WalletTxnStatus::Success,
            reference: None,
        }
    }

    fn ids(rows: &[WalletTransaction]) -> Vec<&str> {
        rows.iter().map(|row| row.transaction_id.as_str()).collect()
    }

    #[test]
    fn toggle_cycles_through_three_states() {
        let mut config = SortConfig::default();

        config.toggle("date");
        assert_eq!(config, SortConfig::by("date", SortDirection::Asc));
        config.toggle("date");
        assert_eq!(config, SortConfig::by("date", SortDirection::Desc));
        config.toggle("date");
        assert_eq!(config, SortConfig::default());
        assert!(!config.is_active());
    }

    #[test]
    fn new_column_resets_to_ascending() {
        let mut config = SortConfig::by("date", SortDirection::Desc);
        config.toggle("status");
        assert_eq!(config, SortConfig::by("status", SortDirection::Asc));
    }

    #[test]
    fn three_clicks_restore_insertion_order() {
        let rows = vec![
            txn("t1", "₹950", "2024-03-02"),
            txn("t2", "₹1,000", "2024-03-01"),
            txn("t3", "₹20", "2024-03-03"),
        ];
        let mut config = SortConfig::default();

        config.toggle("transactionAmount");
        assert_eq!(ids(&sort_records(&rows, &config)), vec!["t3", "t1", "t2"]);
        config.toggle("transactionAmount");
        assert_eq!(ids(&sort_records(&rows, &config)), vec!["t2", "t1", "t3"]);
        config.toggle("transactionAmount");
        assert_eq!(ids(&sort_records(&rows, &config)), vec!["t1", "t2", "t3"]);
    }

    #[test]
    fn currency_columns_sort_numerically_not_lexically() {
        let rows = vec![txn("big", "₹1,000", "d"), txn("small", "₹950", "d")];
        let sorted = sort_records(&rows, &SortConfig::by("transactionAmount", SortDirection::Asc));
        assert_eq!(ids(&sorted), vec!["small", "big"]);
    }

    #[test]
    fn equal_keys_keep_input_order_in_both_directions() {
        let rows = vec![
            txn("a", "₹10", "2024-03-01"),
            txn("b", "₹10", "2024-03-01"),
            txn("c", "₹5", "2024-03-01"),
        ];

        let asc = sort_records(&rows, &SortConfig::by("transactionAmount", SortDirection::Asc));
        assert_eq!(ids(&asc), vec!["c", "a", "b"]);
        let desc = sort_records(&rows, &SortConfig::by("transactionAmount", SortDirection::Desc));
        assert_eq!(ids(&desc), vec!["a", "b", "c"]);
    }

    #[test]
    fn missing_text_sorts_as_empty_string() {
        let mut with_ref = txn("with", "₹1", "d");
        with_ref.reference = Some("UTR-1".to_string());
        let rows = vec![with_ref, txn("without", "₹1", "d")];

        let sorted = sort_records(&rows, &SortConfig::by("reference", SortDirection::Asc));
        assert_eq!(ids(&sorted), vec!["without", "with"]);
    }

    #[test]
    fn currency_parsing_strips_symbols_and_separators() {
        assert_eq!(parse_currency("₹1,250.50"), Some(1250.5));
        assert_eq!(parse_currency("Rs. 950"), Some(950.0));
        assert_eq!(parse_currency("-₹40"), Some(-40.0));
        assert_eq!(parse_currency("₹"), None);
        assert_eq!(parse_currency(""), None);
    }

    #[test]
    fn numbers_compare_numerically() {
        assert_eq!(
            compare_fields(&FieldValue::Number(9.0), &FieldValue::Number(10.0), false),
            Ordering::Less
        );
        assert_eq!(
            compare_fields(&FieldValue::Missing, &FieldValue::text("a"), false),
            Ordering::Less
        );
    }
}
