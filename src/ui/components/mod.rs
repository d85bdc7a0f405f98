pub mod date_range_filter;
pub mod kpi_card;
pub mod record_table;
pub mod toast;

pub use date_range_filter::DateRangeFilter;
pub use kpi_card::KpiCard;
pub use record_table::RecordTable;
