use dioxus::prelude::*;

use crate::{
    domain::{summarize_ledger, AppState, TableSchema},
    ui::{
        components::KpiCard,
        format::format_amount,
        pages::table_page::TableSection,
        theme,
    },
};

/// Ledger summary on top of the ledger and wallet tables.
#[component]
pub fn BillingPage() -> Element {
    let state = use_context::<Signal<AppState>>();
    let role = state.with(|st| st.role);
    let summary = state.with(|st| summarize_ledger(&st.ledger.visible(st.role, &st.seller_id).rows));

    let closing = summary
        .closing_balance
        .map(format_amount)
        .unwrap_or_else(|| "n/a".to_string());

    rsx! {
        div { class: "pd-main",
            h2 { class: "{theme::title_class(role)}", "Billing" }
            div { class: "pd-kpis",
                KpiCard {
                    title: "Credits".to_string(),
                    value: format_amount(summary.total_credit),
                    description: Some(format!("{} ledger entries", summary.entries)),
                    role,
                }
                KpiCard {
                    title: "Debits".to_string(),
                    value: format_amount(summary.total_debit),
                    role,
                }
                KpiCard {
                    title: "GST charged".to_string(),
                    value: format_amount(summary.total_tax),
                    description: Some("IGST + CGST + SGST".to_string()),
                    role,
                }
                KpiCard {
                    title: "Closing balance".to_string(),
                    value: closing,
                    description: Some(format!("net movement {}", format_amount(summary.net()))),
                    role,
                }
            }

            h3 { class: "{theme::label_class(role)}", "{TableSchema::Ledger.title()}" }
            TableSection { schema: TableSchema::Ledger }

            h3 { class: "{theme::label_class(role)}", "{TableSchema::Wallet.title()}" }
            TableSection { schema: TableSchema::Wallet }
        }
    }
}
