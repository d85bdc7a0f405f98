//! CSV and XLSX export of the visible table rows.
//!
//! - The header row holds the column keys, in the order given.
//! - Missing values become empty cells; CSV quotes every field.
//! - The XLSX writer emits a minimal single-sheet workbook with column widths
//!   taken from the table schema.

use std::{
    fs,
    io::{self, Cursor, Write},
    path::{Path, PathBuf},
};

use csv::{QuoteStyle, Terminator, WriterBuilder};
use thiserror::Error;
use time::{macros::format_description, OffsetDateTime};
use zip::{write::SimpleFileOptions, CompressionMethod, ZipWriter};

use crate::domain::{AppState, FieldValue, Role, TableRecord, TableSchema, TableView};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Xlsx,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Xlsx => "xlsx",
        }
    }

    pub fn mime(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv",
            ExportFormat::Xlsx => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "CSV",
            ExportFormat::Xlsx => "Excel",
        }
    }
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("unknown column '{column}' for {table:?}")]
    UnknownColumn { table: TableSchema, column: String },
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("no export directory available")]
    NoExportDir,
}

/// A finished file, ready to be saved or offered for download.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportDocument {
    pub filename: String,
    pub mime: &'static str,
    pub bytes: Vec<u8>,
}

fn check_columns<R: TableRecord>(columns: &[&str]) -> Result<(), ExportError> {
    match columns.iter().find(|key| R::SCHEMA.column(key).is_none()) {
        Some(unknown) => Err(ExportError::UnknownColumn {
            table: R::SCHEMA,
            column: unknown.to_string(),
        }),
        None => Ok(()),
    }
}

pub fn csv_bytes<R: TableRecord>(rows: &[R], columns: &[&str]) -> Result<Vec<u8>, ExportError> {
    check_columns::<R>(columns)?;

    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::CRLF)
        .from_writer(Vec::new());
    writer.write_record(columns)?;
    for row in rows {
        writer.write_record(columns.iter().map(|key| row.field(key).as_text()))?;
    }
    writer.flush()?;
    writer.into_inner().map_err(|err| ExportError::Io(err.into_error()))
}

pub fn xlsx_bytes<R: TableRecord>(rows: &[R], columns: &[&str]) -> Result<Vec<u8>, ExportError> {
    check_columns::<R>(columns)?;
    let sheet = worksheet_xml(rows, columns);
    let workbook = format!(
        concat!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
            r#"<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" "#,
            r#"xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">"#,
            r#"<sheets><sheet name="{}" sheetId="1" r:id="rId1"/></sheets></workbook>"#
        ),
        xml_escape(R::SCHEMA.title())
    );

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let parts: [(&str, &str); 5] = [
        ("[Content_Types].xml", CONTENT_TYPES_XML),
        ("_rels/.rels", ROOT_RELS_XML),
        ("xl/workbook.xml", &workbook),
        ("xl/_rels/workbook.xml.rels", WORKBOOK_RELS_XML),
        ("xl/worksheets/sheet1.xml", &sheet),
    ];
    for (name, content) in parts {
        zip.start_file(name, options)?;
        zip.write_all(content.as_bytes())?;
    }
    Ok(zip.finish()?.into_inner())
}

const CONTENT_TYPES_XML: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#,
    r#"<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#,
    r#"<Default Extension="xml" ContentType="application/xml"/>"#,
    r#"<Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>"#,
    r#"<Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>"#,
    r#"</Types>"#
);

const ROOT_RELS_XML: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    r#"<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>"#,
    r#"</Relationships>"#
);

const WORKBOOK_RELS_XML: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    r#"<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/>"#,
    r#"</Relationships>"#
);

fn worksheet_xml<R: TableRecord>(rows: &[R], columns: &[&str]) -> String {
    let mut xml = String::from(concat!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
        r#"<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><cols>"#
    ));
    for (index, key) in columns.iter().enumerate() {
        let width = R::SCHEMA.column(key).map(|column| column.width).unwrap_or(12.0);
        let n = index + 1;
        xml.push_str(&format!(
            r#"<col min="{n}" max="{n}" width="{width}" customWidth="1"/>"#
        ));
    }
    xml.push_str("</cols><sheetData>");

    let header = columns.iter().map(|key| FieldValue::text(*key));
    push_row(&mut xml, 1, header);
    for (index, row) in rows.iter().enumerate() {
        push_row(&mut xml, index + 2, columns.iter().map(|key| row.field(key)));
    }

    xml.push_str("</sheetData></worksheet>");
    xml
}

fn push_row(xml: &mut String, row_number: usize, cells: impl Iterator<Item = FieldValue>) {
    xml.push_str(&format!(r#"<row r="{row_number}">"#));
    for (index, cell) in cells.enumerate() {
        let reference = format!("{}{row_number}", column_letter(index));
        match cell {
            FieldValue::Number(value) if value.is_finite() => {
                xml.push_str(&format!(r#"<c r="{reference}"><v>{value}</v></c>"#));
            }
            other => {
                xml.push_str(&format!(
                    r#"<c r="{reference}" t="inlineStr"><is><t xml:space="preserve">{}</t></is></c>"#,
                    xml_escape(&other.as_text())
                ));
            }
        }
    }
    xml.push_str("</row>");
}

/// Zero-based column index to a spreadsheet letter (`0 → A`, `26 → AA`).
pub fn column_letter(index: usize) -> String {
    let mut n = index + 1;
    let mut letters = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push(b'A' + rem as u8);
        n = (n - 1) / 26;
    }
    letters.iter().rev().map(|b| *b as char).collect()
}

/// Escapes XML markup and drops control characters XML 1.0 cannot carry.
fn xml_escape(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            '\t' | '\n' | '\r' => escaped.push(ch),
            c if (c as u32) < 0x20 => {}
            c => escaped.push(c),
        }
    }
    escaped
}

/// `<entity>-<identifier or timestamp>.<ext>`.
pub fn export_filename(
    schema: TableSchema,
    identifier: Option<&str>,
    format: ExportFormat,
    now: OffsetDateTime,
) -> String {
    let suffix = identifier
        .map(sanitize)
        .filter(|id| !id.is_empty())
        .unwrap_or_else(|| {
            now.format(format_description!(
                "[year][month][day]-[hour][minute][second]"
            ))
            .unwrap_or_else(|_| now.unix_timestamp().to_string())
        });
    format!("{}-{suffix}.{}", schema.entity(), format.extension())
}

fn sanitize(raw: &str) -> String {
    raw.trim()
        .chars()
        .map(|ch| {
            if ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' {
                ch
            } else {
                '_'
            }
        })
        .collect()
}

/// Exports what the table currently shows: filtered, sorted, role columns.
pub fn export_view<R: TableRecord>(
    view: &TableView<R>,
    role: Role,
    seller_id: &str,
    format: ExportFormat,
    identifier: Option<&str>,
) -> Result<ExportDocument, ExportError> {
    let visible = view.visible(role, seller_id);
    let columns: Vec<&str> = R::SCHEMA
        .visible_columns(role)
        .iter()
        .map(|column| column.key)
        .collect();

    let bytes = match format {
        ExportFormat::Csv => csv_bytes(&visible.rows, &columns)?,
        ExportFormat::Xlsx => xlsx_bytes(&visible.rows, &columns)?,
    };
    let filename = export_filename(R::SCHEMA, identifier, format, OffsetDateTime::now_utc());
    tracing::info!(%filename, rows = visible.rows.len(), "exported table");

    Ok(ExportDocument {
        filename,
        mime: format.mime(),
        bytes,
    })
}

/// Exports the named table as the current surface shows it.
///
/// Seller exports are named after the seller; admin exports get a timestamp.
pub fn export_table(
    state: &AppState,
    schema: TableSchema,
    format: ExportFormat,
) -> Result<ExportDocument, ExportError> {
    let (role, seller) = (state.role, state.seller_id.as_str());
    let identifier = match role {
        Role::Seller => Some(seller),
        Role::Admin => None,
    };
    match schema {
        TableSchema::Shipments => export_view(&state.shipments, role, seller, format, identifier),
        TableSchema::Orders => export_view(&state.orders, role, seller, format, identifier),
        TableSchema::Ndr => export_view(&state.ndr, role, seller, format, identifier),
        TableSchema::Ledger => export_view(&state.ledger, role, seller, format, identifier),
        TableSchema::Wallet => export_view(&state.wallet, role, seller, format, identifier),
    }
}

/// Configured directory, else the user's Downloads folder, else home.
pub fn default_export_dir(configured: Option<&Path>) -> Option<PathBuf> {
    configured
        .map(Path::to_path_buf)
        .or_else(dirs::download_dir)
        .or_else(dirs::home_dir)
}

/// Writes `document` into `dir` without overwriting an existing file.
pub fn save_document(document: &ExportDocument, dir: &Path) -> Result<PathBuf, ExportError> {
    fs::create_dir_all(dir)?;
    let mut path = dir.join(&document.filename);
    let (stem, ext) = match document.filename.rsplit_once('.') {
        Some((stem, ext)) => (stem.to_string(), format!(".{ext}")),
        None => (document.filename.clone(), String::new()),
    };
    let mut attempt = 1;
    while path.exists() {
        path = dir.join(format!("{stem}-{attempt}{ext}"));
        attempt += 1;
    }
    fs::write(&path, &document.bytes)?;
    tracing::info!(path = %path.display(), bytes = document.bytes.len(), "saved export");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use std::io::Read;

    use time::macros::{date, datetime};

    use super::*;
    use crate::domain::{
        DateRange, SortConfig, SortDirection, WalletTransaction, WalletTxnKind, WalletTxnStatus,
    };

    fn txn(id: &str, date: &str, amount: &str, reference: Option<&str>) -> WalletTransaction {
        WalletTransaction {
            transaction_id: id.into(),
            seller_id: "SLR-1".into(),
            date: date.into(),
            kind: WalletTxnKind::Recharge,
            transaction_amount: amount.into(),
            status: WalletTxnStatus::Success,
            reference: reference.map(str::to_string),
        }
    }

    fn rows() -> Vec<WalletTransaction> {
        vec![
            txn("W1", "2024-03-02", "₹1,250.00", Some("UTR \"7\", <A&B>")),
            txn("W2", "2024-03-05", "₹40", None),
            txn("W3", "2024-04-09", "₹999", Some("UTR9")),
        ]
    }

    const COLUMNS: [&str; 4] = ["transactionId", "date", "transactionAmount", "reference"];

    #[test]
    fn csv_has_a_header_plus_one_line_per_row_and_reparses() {
        let bytes = csv_bytes(&rows(), &COLUMNS).expect("csv");
        let text = String::from_utf8(bytes.clone()).expect("utf8");

        assert_eq!(text.lines().count(), rows().len() + 1);
        assert!(text.starts_with("\"transactionId\",\"date\""));

        let mut reader = csv::Reader::from_reader(bytes.as_slice());
        let header: Vec<String> = reader
            .headers()
            .expect("header")
            .iter()
            .map(str::to_string)
            .collect();
        assert_eq!(header, COLUMNS);

        let parsed: Vec<Vec<String>> = reader
            .records()
            .map(|record| record.expect("row").iter().map(str::to_string).collect())
            .collect();
        for (row, source) in parsed.iter().zip(rows()) {
            let expected: Vec<String> = COLUMNS
                .iter()
                .map(|key| source.field(key).as_text())
                .collect();
            assert_eq!(row, &expected);
        }
        assert_eq!(parsed[1][3], "");
    }

    #[test]
    fn unknown_columns_are_rejected() {
        let err = csv_bytes(&rows(), &["transactionId", "bogus"]).expect_err("unknown column");
        assert!(matches!(err, ExportError::UnknownColumn { ref column, .. } if column == "bogus"));
    }

    #[test]
    fn xlsx_is_a_zip_with_an_escaped_sheet_and_widths() {
        let bytes = xlsx_bytes(&rows(), &COLUMNS).expect("xlsx");
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).expect("zip");

        for part in [
            "[Content_Types].xml",
            "_rels/.rels",
            "xl/workbook.xml",
            "xl/_rels/workbook.xml.rels",
        ] {
            assert!(archive.by_name(part).is_ok(), "{part}");
        }

        let mut sheet = String::new();
        archive
            .by_name("xl/worksheets/sheet1.xml")
            .expect("sheet")
            .read_to_string(&mut sheet)
            .expect("read sheet");

        assert!(sheet.contains(r#"<col min="1" max="1" width="18" customWidth="1"/>"#));
        assert!(sheet.contains("UTR &quot;7&quot;, &lt;A&amp;B&gt;"));
        assert!(sheet.contains(r#"<row r="4">"#));
        assert!(!sheet.contains(r#"<row r="5">"#));
    }

    #[test]
    fn export_uses_the_filtered_and_sorted_view() {
        let mut view = TableView::with_records(rows());
        view.set_date_range(DateRange::between(date!(2024 - 03 - 01), date!(2024 - 03 - 31)));
        view.sort = SortConfig::by("transactionAmount", SortDirection::Asc);

        let document =
            export_view(&view, Role::Seller, "SLR-1", ExportFormat::Csv, Some("march")).expect("export");
        let text = String::from_utf8(document.bytes).expect("utf8");
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(document.filename, "wallet-march.csv");
        assert_eq!(document.mime, "text/csv");
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("\"W2\""));
        assert!(lines[2].starts_with("\"W1\""));
        assert!(!lines[0].contains("sellerId"));
    }

    #[test]
    fn table_exports_are_named_after_the_seller() {
        let mut state = AppState::new(Role::Seller, "SLR-1");
        state.wallet.replace_records(rows());

        let document = export_table(&state, TableSchema::Wallet, ExportFormat::Xlsx).expect("export");
        assert_eq!(document.filename, "wallet-SLR-1.xlsx");

        state.switch_role(Role::Admin);
        let document = export_table(&state, TableSchema::Wallet, ExportFormat::Csv).expect("export");
        assert!(document.filename.starts_with("wallet-2"));
        assert_eq!(String::from_utf8(document.bytes).expect("utf8").lines().count(), 1);
    }

    #[test]
    fn filenames_fall_back_to_a_timestamp() {
        let now = datetime!(2024-03-15 09:05:07 UTC);

        assert_eq!(
            export_filename(TableSchema::Shipments, None, ExportFormat::Xlsx, now),
            "shipments-20240315-090507.xlsx"
        );
        assert_eq!(
            export_filename(TableSchema::Ledger, Some("SLR 1001/03"), ExportFormat::Csv, now),
            "ledger-SLR_1001_03.csv"
        );
    }

    #[test]
    fn saving_never_overwrites() {
        let dir = tempfile::tempdir().expect("tempdir");
        let document = ExportDocument {
            filename: "orders-x.csv".into(),
            mime: ExportFormat::Csv.mime(),
            bytes: b"\"a\"\r\n".to_vec(),
        };

        let first = save_document(&document, dir.path()).expect("first");
        let second = save_document(&document, dir.path()).expect("second");

        assert_eq!(first.file_name().and_then(|n| n.to_str()), Some("orders-x.csv"));
        assert_eq!(second.file_name().and_then(|n| n.to_str()), Some("orders-x-1.csv"));
    }

    #[test]
    fn column_letters_roll_over() {
        assert_eq!(column_letter(0), "A");
        assert_eq!(column_letter(25), "Z");
        assert_eq!(column_letter(26), "AA");
        assert_eq!(column_letter(27), "AB");
    }
}
