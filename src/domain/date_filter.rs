//! Date-range filtering over dashboard records.
//!
//! Records carry their date as a raw API string. Comparison happens on
//! millisecond epoch values; the `to` bound covers its whole day (UTC).

use thiserror::Error;
use time::{
    format_description::well_known::Rfc3339, macros::format_description, Date, OffsetDateTime,
    PrimitiveDateTime,
};

use super::schema::TableRecord;

/// Values the backend sends when an event never happened.
pub const NO_DATE_SENTINELS: [&str; 2] = ["Never", "-"];

const MS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DateRange {
    pub from: Option<Date>,
    pub to: Option<Date>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DateInputError {
    #[error("'{0}' is not a date (expected YYYY-MM-DD)")]
    Invalid(String),
}

impl DateRange {
    pub fn new(from: Option<Date>, to: Option<Date>) -> Self {
        Self { from, to }
    }

    pub fn between(from: Date, to: Date) -> Self {
        Self {
            from: Some(from),
            to: Some(to),
        }
    }

    /// Parses the two `YYYY-MM-DD` inputs of the filter bar; blank means unset.
    pub fn parse_input(from: &str, to: &str) -> Result<Self, DateInputError> {
        Ok(Self {
            from: parse_input_date(from)?,
            to: parse_input_date(to)?,
        })
    }

    /// Filtering only applies when both bounds are set.
    pub fn is_active(&self) -> bool {
        self.from.is_some() && self.to.is_some()
    }

    pub fn is_inverted(&self) -> bool {
        matches!((self.from, self.to), (Some(from), Some(to)) if from > to)
    }

    /// Ordered bounds; swapped bounds are put back in order.
    pub fn normalized(&self) -> Option<(Date, Date)> {
        let (from, to) = (self.from?, self.to?);
        if from > to {
            tracing::warn!(%from, %to, "date range bounds out of order; swapping them");
            Some((to, from))
        } else {
            Some((from, to))
        }
    }

    /// Inclusive millisecond bounds: start of `from` to end of `to`.
    pub fn bounds_ms(&self) -> Option<(i64, i64)> {
        let (from, to) = self.normalized()?;
        Some((day_start_ms(from), day_start_ms(to) + MS_PER_DAY - 1))
    }

    /// `from`/`to` query parameters for the backend, when active.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        match self.normalized() {
            Some((from, to)) => vec![("from", format_input(from)), ("to", format_input(to))],
            None => Vec::new(),
        }
    }

    pub fn from_input(&self) -> String {
        self.from.map(format_input).unwrap_or_default()
    }

    pub fn to_input(&self) -> String {
        self.to.map(format_input).unwrap_or_default()
    }
}

/// What a record's raw date string turned out to be.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecordDate {
    At(i64),
    NoDate,
    Malformed,
}

pub fn parse_record_date(raw: &str) -> RecordDate {
    let trimmed = raw.trim();
    if trimmed.is_empty()
        || NO_DATE_SENTINELS
            .iter()
            .any(|sentinel| trimmed.eq_ignore_ascii_case(sentinel))
    {
        return RecordDate::NoDate;
    }

    if let Ok(datetime) = OffsetDateTime::parse(trimmed, &Rfc3339) {
        return RecordDate::At(epoch_ms(datetime));
    }
    if let Ok(datetime) = PrimitiveDateTime::parse(
        trimmed,
        format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]"),
    ) {
        return RecordDate::At(epoch_ms(datetime.assume_utc()));
    }
    if let Ok(datetime) = PrimitiveDateTime::parse(
        trimmed,
        format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"),
    ) {
        return RecordDate::At(epoch_ms(datetime.assume_utc()));
    }
    if let Ok(date) = Date::parse(trimmed, format_description!("[year]-[month]-[day]")) {
        return RecordDate::At(day_start_ms(date));
    }

    RecordDate::Malformed
}

/// Result of a date-range pass.
#[derive(Clone, Debug, PartialEq)]
pub struct DateFilterOutcome<R> {
    pub matched: Vec<R>,
    /// Keys of records whose date could not be parsed.
    pub malformed: Vec<String>,
}

/// Keeps the records whose date falls inside `range`.
///
/// An inactive range returns every record. With an active range, sentinel
/// dates never match and unparseable dates are reported in `malformed`.
pub fn filter_by_date_range<R: TableRecord>(records: &[R], range: &DateRange) -> DateFilterOutcome<R> {
    let Some((start, end)) = range.bounds_ms() else {
        return DateFilterOutcome {
            matched: records.to_vec(),
            malformed: Vec::new(),
        };
    };

    let mut matched = Vec::new();
    let mut malformed = Vec::new();
    for record in records {
        match parse_record_date(&record.date_value()) {
            RecordDate::At(ms) if (start..=end).contains(&ms) => matched.push(record.clone()),
            RecordDate::At(_) | RecordDate::NoDate => {}
            RecordDate::Malformed => malformed.push(record.key().to_string()),
        }
    }

    if !malformed.is_empty() {
        tracing::warn!(
            table = ?R::SCHEMA,
            count = malformed.len(),
            keys = ?malformed,
            "records with unparseable dates excluded from range"
        );
    }

    DateFilterOutcome { matched, malformed }
}

fn parse_input_date(raw: &str) -> Result<Option<Date>, DateInputError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    Date::parse(trimmed, format_description!("[year]-[month]-[day]"))
        .map(Some)
        .map_err(|_| DateInputError::Invalid(trimmed.to_string()))
}

fn format_input(date: Date) -> String {
    date.format(format_description!("[year]-[month]-[day]"))
        .unwrap_or_else(|_| date.to_string())
}

fn day_start_ms(date: Date) -> i64 {
    date.midnight().assume_utc().unix_timestamp() * 1000
}

fn epoch_ms(datetime: OffsetDateTime) -> i64 {
    (datetime.unix_timestamp_nanos() / 1_000_000) as i64
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use super::*;
    use crate::domain::entities::{Order, OrderStatus, PaymentType};

    fn order(id: &str, date: &str) -> Order {
        Order {
            order_id: id.to_string(),
            seller_id: "SLR-1".to_string(),
            customer_name: "Asha".to_string(),
            order_date: date.to_string(),
            status: OrderStatus::New,
            payment_type: PaymentType::Prepaid,
            items: 1,
            order_amount: "₹499".to_string(),
        }
    }

    fn march() -> DateRange {
        DateRange::between(date!(2024 - 03 - 01), date!(2024 - 03 - 31))
    }

    #[test]
    fn never_sentinel_is_excluded_from_an_active_range() {
        let records = vec![order("A", "2024-03-15"), order("B", "Never")];

        let outcome = filter_by_date_range(&records, &march());

        assert_eq!(outcome.matched.len(), 1);
        assert_eq!(outcome.matched[0].order_id, "A");
        assert!(outcome.malformed.is_empty());
    }

    #[test]
    fn missing_bound_is_identity() {
        let records = vec![order("A", "2024-03-15"), order("B", "-"), order("C", "garbage")];
        let half_open = DateRange::new(Some(date!(2024 - 03 - 01)), None);

        let outcome = filter_by_date_range(&records, &half_open);

        assert_eq!(outcome.matched, records);
        assert!(outcome.malformed.is_empty());
    }

    #[test]
    fn bounds_are_inclusive_and_cover_the_last_day() {
        let records = vec![
            order("first", "2024-03-01"),
            order("last-evening", "2024-03-31T23:15:00Z"),
            order("after", "2024-04-01T00:00:00Z"),
            order("before", "2024-02-29 23:59:59"),
        ];

        let outcome = filter_by_date_range(&records, &march());
        let keys: Vec<_> = outcome.matched.iter().map(|o| o.order_id.as_str()).collect();

        assert_eq!(keys, vec!["first", "last-evening"]);
    }

    #[test]
    fn malformed_dates_are_reported_not_silently_dropped() {
        let records = vec![order("ok", "2024-03-02"), order("bad", "31/03/2024")];

        let outcome = filter_by_date_range(&records, &march());

        assert_eq!(outcome.matched.len(), 1);
        assert_eq!(outcome.malformed, vec!["bad".to_string()]);
    }

    #[test]
    fn swapped_bounds_are_normalized_instead_of_inverted() {
        let swapped = DateRange::between(date!(2024 - 03 - 31), date!(2024 - 03 - 01));
        let records = vec![order("A", "2024-03-15"), order("B", "2024-05-01")];

        assert!(swapped.is_inverted());
        let outcome = filter_by_date_range(&records, &swapped);

        assert_eq!(outcome.matched.len(), 1);
        assert_eq!(swapped.bounds_ms(), march().bounds_ms());
        assert_eq!(
            swapped.query_pairs(),
            vec![
                ("from", "2024-03-01".to_string()),
                ("to", "2024-03-31".to_string())
            ]
        );
    }

    #[test]
    fn input_fields_parse_blank_as_unset() {
        let range = DateRange::parse_input("2024-03-01", " ").expect("valid input");
        assert_eq!(range.from, Some(date!(2024 - 03 - 01)));
        assert_eq!(range.to, None);
        assert!(!range.is_active());

        assert_eq!(
            DateRange::parse_input("03/01/2024", ""),
            Err(DateInputError::Invalid("03/01/2024".to_string()))
        );
    }

    #[test]
    fn record_dates_understand_sentinels_and_formats() {
        assert_eq!(parse_record_date("Never"), RecordDate::NoDate);
        assert_eq!(parse_record_date(" - "), RecordDate::NoDate);
        assert_eq!(parse_record_date(""), RecordDate::NoDate);
        assert_eq!(parse_record_date("not a date"), RecordDate::Malformed);
        assert_eq!(
            parse_record_date("2024-03-15"),
            parse_record_date("2024-03-15T00:00:00Z")
        );
    }
}
