use dioxus::prelude::*;

use crate::domain::{Role, SortConfig, TableSnapshot};
use crate::ui::theme;

/// Sortable table over a [`TableSnapshot`], with a totals footer.
///
/// Clicking a header cycles that column through ascending, descending and
/// unsorted; `on_sort` receives the column key.
#[component]
pub fn RecordTable(
    snapshot: TableSnapshot,
    sort: SortConfig,
    role: Role,
    on_sort: EventHandler<String>,
    #[props(default)] loading: bool,
) -> Element {
    let totals = snapshot.totals_row();
    let column_count = snapshot.columns.len();
    let malformed = snapshot.malformed.len();

    rsx! {
        div { class: "{theme::table_container(role)}",
            table { class: "pd-table",
                thead { class: "{theme::table_header(role)}",
                    tr {
                        for column in snapshot.columns.iter().cloned() {
                            th {
                                key: "{column.key}",
                                style: "min-width: {column.width}ch;",
                                title: "Sort by {column.label}",
                                onclick: move |_| on_sort.call(column.key.to_string()),
                                "{column.label}"
                                span { class: "pd-sort", "{sort.indicator(column.key)}" }
                            }
                        }
                    }
                }
                tbody {
                    if snapshot.rows.is_empty() {
                        tr {
                            td { colspan: "{column_count}", class: "{theme::text_muted()}",
                                if loading { "Loading…" } else { "No records for the current filters." }
                            }
                        }
                    }
                    for row in snapshot.rows.iter() {
                        tr { key: "{row.key}",
                            for (index, cell) in row.cells.iter().enumerate() {
                                td { key: "{index}", "{cell}" }
                            }
                        }
                    }
                }
                if !snapshot.rows.is_empty() {
                    tfoot {
                        tr {
                            for (index, cell) in totals.iter().enumerate() {
                                td { key: "{index}", class: "{theme::accent_text(role)}", "{cell}" }
                            }
                        }
                    }
                }
            }
        }
        if malformed > 0 {
            p { class: "{theme::text_warning()}",
                "{malformed} record(s) hidden by the date filter because their date could not be read."
            }
        }
    }
}
