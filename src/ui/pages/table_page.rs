use dioxus::prelude::*;

use crate::{
    app::{load_table, persist_user_state, ApiHandle, RefreshEpoch},
    domain::{AppState, DateRange, TableSchema, TableSnapshot},
    infra::export::{default_export_dir, export_table, save_document, ExportError, ExportFormat},
    ui::{
        components::{
            toast::{push_toast, ToastKind, ToastMessage},
            DateRangeFilter, KpiCard, RecordTable,
        },
        format::{format_amount, humanize_age},
        theme,
    },
    util::config::AppConfig,
};

/// Page for a single table: KPI cards over the visible rows, then the table.
#[component]
pub fn TablePage(schema: TableSchema) -> Element {
    let state = use_context::<Signal<AppState>>();
    let role = state.with(|st| st.role);
    let snapshot = state.with(|st| st.snapshot(schema));

    rsx! {
        div { class: "pd-main",
            h2 { class: "{theme::title_class(role)}", "{schema.title()}" }
            TotalsCards { snapshot }
            TableSection { schema }
        }
    }
}

/// One KPI card for the row count plus one per summable visible column.
#[component]
pub fn TotalsCards(snapshot: TableSnapshot) -> Element {
    let state = use_context::<Signal<AppState>>();
    let role = state.with(|st| st.role);
    let schema = snapshot.schema;

    let cards: Vec<(String, String)> = snapshot
        .columns
        .iter()
        .filter_map(|column| {
            let total = snapshot.totals.sum(column.key)?;
            let value = if schema.is_currency_column(column.key) {
                format_amount(total)
            } else {
                format!("{total:.2}")
            };
            Some((format!("Total {}", column.label), value))
        })
        .collect();

    rsx! {
        div { class: "pd-kpis",
            KpiCard {
                title: "Rows".to_string(),
                value: snapshot.totals.count.to_string(),
                description: Some("after date filter".to_string()),
                role,
            }
            for (title, value) in cards {
                KpiCard { key: "{title}", title: title.clone(), value, role }
            }
        }
    }
}

/// Date filter, export buttons and the sortable table for `schema`.
///
/// Loads the table on mount, whenever the date range changes and whenever
/// the app-wide [`RefreshEpoch`] is bumped.
#[component]
pub fn TableSection(schema: TableSchema) -> Element {
    let mut state = use_context::<Signal<AppState>>();
    let toasts = use_context::<Signal<Vec<ToastMessage>>>();
    let api = use_context::<ApiHandle>();
    let config = use_context::<AppConfig>();
    let export_dir = use_signal(|| config.export_dir.clone());
    let epoch = use_context::<Signal<RefreshEpoch>>();
    let mut reload = use_signal(|| 0u64);

    let loader = use_resource(move || {
        let api = api.clone();
        async move {
            // Subscribe to both triggers before the first await.
            let _ = (epoch(), reload());
            load_table(state, api, toasts, schema).await
        }
    });
    let loading = !loader.finished();

    let role = state.with(|st| st.role);
    let snapshot = state.with(|st| st.snapshot(schema));
    let sort = state.with(|st| st.sort(schema).clone());
    let range = state.with(|st| st.date_range(schema));
    let fetched_at = state.with(|st| st.cache.fetched_at(&schema));

    let on_sort = move |column: String| {
        state.with_mut(|st| st.toggle_sort(schema, &column));
        persist_user_state(&state);
    };

    let on_range = move |range: DateRange| {
        state.with_mut(|st| st.set_date_range(schema, range));
        persist_user_state(&state);
        reload.with_mut(|n| *n += 1);
    };

    let on_export = move |format: ExportFormat| {
        let configured = export_dir();
        let result = state
            .with(|st| export_table(st, schema, format))
            .and_then(|document| {
                let dir = default_export_dir(configured.as_deref()).ok_or(ExportError::NoExportDir)?;
                save_document(&document, &dir)
            });
        match result {
            Ok(path) => push_toast(
                toasts,
                ToastKind::Success,
                format!("Saved {} export to {}", format.label(), path.display()),
            ),
            Err(err) => {
                tracing::error!(table = ?schema, error = %err, "export failed");
                push_toast(toasts, ToastKind::Error, format!("Export failed: {err}"));
            }
        }
    };

    let status = match fetched_at {
        Some(time) => format!("Updated {}", humanize_age(time)),
        None if loading => "Loading…".to_string(),
        None => "Not loaded".to_string(),
    };
    let empty = snapshot.rows.is_empty();

    rsx! {
        section { class: "{theme::panel_border(role)}",
            div { class: "pd-toolbar", style: "justify-content: space-between;",
                DateRangeFilter { range, role, on_change: on_range }
                div { class: "pd-toolbar",
                    span { class: "{theme::text_muted()}", "{status}" }
                    if sort.is_active() {
                        button {
                            class: "{theme::btn_secondary(role)}",
                            onclick: move |_| {
                                state.with_mut(|st| st.clear_sort(schema));
                                persist_user_state(&state);
                            },
                            "Clear sort"
                        }
                    }
                    button {
                        class: "{theme::btn_secondary(role)}",
                        disabled: loading,
                        onclick: move |_| reload.with_mut(|n| *n += 1),
                        "Refresh"
                    }
                    for format in [ExportFormat::Csv, ExportFormat::Xlsx] {
                        button {
                            key: "{format.extension()}",
                            class: "{theme::btn_primary(role)}",
                            disabled: empty,
                            onclick: move |_| on_export(format),
                            "Export {format.label()}"
                        }
                    }
                }
            }
            RecordTable { snapshot, sort, role, on_sort, loading }
        }
    }
}
