pub mod billing;
pub mod ndr;
pub mod rate_calculator;
pub mod settings;
pub mod table_page;

pub use billing::BillingPage;
pub use ndr::NdrPage;
pub use rate_calculator::RateCalculatorPage;
pub use settings::SettingsPage;
pub use table_page::TablePage;
