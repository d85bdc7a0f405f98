//! Billing ledger rows and their summary.
//!
//! The backend sends `credit` and `debit` as two nullable columns. Exactly
//! one of them must be set. A page is converted row by row so a violating
//! row is dropped and reported without losing the rest.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::date_filter::{parse_record_date, RecordDate};
use super::schema::{FieldValue, RecordSet, TableRecord, TableSchema};

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LedgerEntry {
    Credit(f64),
    Debit(f64),
}

impl LedgerEntry {
    pub fn credit(&self) -> Option<f64> {
        match self {
            LedgerEntry::Credit(amount) => Some(*amount),
            LedgerEntry::Debit(_) => None,
        }
    }

    pub fn debit(&self) -> Option<f64> {
        match self {
            LedgerEntry::Debit(amount) => Some(*amount),
            LedgerEntry::Credit(_) => None,
        }
    }

    /// Effect on the wallet balance.
    pub fn signed(&self) -> f64 {
        match self {
            LedgerEntry::Credit(amount) => *amount,
            LedgerEntry::Debit(amount) => -amount,
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum LedgerError {
    #[error("ledger row {0} has both a credit and a debit")]
    BothSides(String),
    #[error("ledger row {0} has neither a credit nor a debit")]
    NoSide(String),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerTransactionDto {
    transaction_id: String,
    #[serde(default)]
    seller_id: String,
    date: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    credit: Option<f64>,
    #[serde(default)]
    debit: Option<f64>,
    #[serde(default)]
    taxable_amount: f64,
    #[serde(default)]
    igst: f64,
    #[serde(default)]
    cgst: f64,
    #[serde(default)]
    sgst: f64,
    #[serde(default)]
    total_amount: f64,
    closing_balance: f64,
}

/// Append-only ledger row. The closing balance comes from the backend.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "LedgerTransactionDto", into = "LedgerTransactionDto")]
pub struct LedgerTransaction {
    pub transaction_id: String,
    pub seller_id: String,
    pub date: String,
    pub description: String,
    pub entry: LedgerEntry,
    pub taxable_amount: f64,
    pub igst: f64,
    pub cgst: f64,
    pub sgst: f64,
    pub total_amount: f64,
    pub closing_balance: f64,
}

impl TryFrom<LedgerTransactionDto> for LedgerTransaction {
    type Error = LedgerError;

    fn try_from(dto: LedgerTransactionDto) -> Result<Self, Self::Error> {
        let entry = match (dto.credit, dto.debit) {
            (Some(credit), None) => LedgerEntry::Credit(credit),
            (None, Some(debit)) => LedgerEntry::Debit(debit),
            (Some(_), Some(_)) => return Err(LedgerError::BothSides(dto.transaction_id)),
            (None, None) => return Err(LedgerError::NoSide(dto.transaction_id)),
        };

        Ok(Self {
            transaction_id: dto.transaction_id,
            seller_id: dto.seller_id,
            date: dto.date,
            description: dto.description,
            entry,
            taxable_amount: dto.taxable_amount,
            igst: dto.igst,
            cgst: dto.cgst,
            sgst: dto.sgst,
            total_amount: dto.total_amount,
            closing_balance: dto.closing_balance,
        })
    }
}

impl From<LedgerTransaction> for LedgerTransactionDto {
    fn from(txn: LedgerTransaction) -> Self {
        Self {
            credit: txn.entry.credit(),
            debit: txn.entry.debit(),
            transaction_id: txn.transaction_id,
            seller_id: txn.seller_id,
            date: txn.date,
            description: txn.description,
            taxable_amount: txn.taxable_amount,
            igst: txn.igst,
            cgst: txn.cgst,
            sgst: txn.sgst,
            total_amount: txn.total_amount,
            closing_balance: txn.closing_balance,
        }
    }
}

/// A decoded ledger page.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LedgerPage {
    pub rows: Vec<LedgerTransaction>,
    /// Ids of rows that broke the one-side rule.
    pub rejected: Vec<String>,
}

pub fn decode_ledger_rows(rows: Vec<LedgerTransactionDto>) -> LedgerPage {
    let mut page = LedgerPage::default();
    for dto in rows {
        let id = dto.transaction_id.clone();
        match LedgerTransaction::try_from(dto) {
            Ok(row) => page.rows.push(row),
            Err(err) => {
                tracing::debug!(error = %err, "rejected ledger row");
                page.rejected.push(id);
            }
        }
    }

    if !page.rejected.is_empty() {
        tracing::warn!(
            count = page.rejected.len(),
            keys = ?page.rejected,
            "ledger rows without exactly one of credit and debit were dropped"
        );
    }
    page
}

impl LedgerTransaction {
    pub fn total_tax(&self) -> f64 {
        self.igst + self.cgst + self.sgst
    }
}

impl TableRecord for LedgerTransaction {
    const SCHEMA: TableSchema = TableSchema::Ledger;

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
            "description" => FieldValue::text(&self.description),
            "credit" => self.entry.credit().into(),
            "debit" => self.entry.debit().into(),
            "taxableAmount" => FieldValue::Number(self.taxable_amount),
            "igst" => FieldValue::Number(self.igst),
            "cgst" => FieldValue::Number(self.cgst),
            "sgst" => FieldValue::Number(self.sgst),
            "totalAmount" => FieldValue::Number(self.total_amount),
            "closingBalance" => FieldValue::Number(self.closing_balance),
            _ => FieldValue::Missing,
        }
    }

    fn wrap(rows: Vec<Self>) -> RecordSet {
        RecordSet::Ledger(rows)
    }

    fn extract(set: RecordSet) -> Option<Vec<Self>> {
        match set {
            RecordSet::Ledger(rows) => Some(rows),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct LedgerSummary {
    pub entries: usize,
    pub total_credit: f64,
    pub total_debit: f64,
    pub total_tax: f64,
    /// Backend-supplied balance of the latest row, if any row has a date.
    pub closing_balance: Option<f64>,
}

impl LedgerSummary {
    pub fn net(&self) -> f64 {
        self.total_credit - self.total_debit
    }
}

/// Totals over `rows`. The closing balance is read, never recomputed.
pub fn summarize_ledger(rows: &[LedgerTransaction]) -> LedgerSummary {
    let mut summary = LedgerSummary {
        entries: rows.len(),
        ..LedgerSummary::default()
    };
    let mut latest: Option<i64> = None;

    for row in rows {
        match row.entry {
            LedgerEntry::Credit(amount) => summary.total_credit += amount,
            LedgerEntry::Debit(amount) => summary.total_debit += amount,
        }
        summary.total_tax += row.total_tax();

        // Later rows win ties; the backend appends in posting order.
        if let RecordDate::At(ms) = parse_record_date(&row.date) {
            if latest.map_or(true, |seen| ms >= seen) {
                latest = Some(ms);
                summary.closing_balance = Some(row.closing_balance);
            }
        }
    }

    summary
}
