use std::sync::Arc;

use dioxus::{prelude::*, signals::Signal};

use crate::{
    domain::{AppState, TableSchema},
    infra::api::{fetch_current, CacheStatus, DashboardApi, RecordQuery},
    ui::{
        components::toast::{push_toast, Toast, ToastKind, ToastMessage},
        pages::{BillingPage, NdrPage, RateCalculatorPage, SettingsPage, TablePage},
        shell::Shell,
    },
    util::{
        assets,
        config::AppConfig,
        persistence::{load_persisted_state, save_persisted_state},
    },
};

#[derive(Routable, Clone, PartialEq)]
pub enum Route {
    #[route("/")]
    #[route("/shipments")]
    Shipments {},
    #[route("/orders")]
    Orders {},
    #[route("/ndr")]
    Ndr {},
    #[route("/billing")]
    Billing {},
    #[route("/rates")]
    Rates {},
    #[route("/settings")]
    Settings {},
}

/// Backend shared through context.
#[derive(Clone)]
pub struct ApiHandle(pub Arc<dyn DashboardApi>);

/// Bumped to make every mounted table refetch, e.g. after a role switch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RefreshEpoch(pub u64);

#[component]
pub fn App() -> Element {
    let config = use_hook(|| match AppConfig::load() {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(error = %err, "failed to load config; using defaults");
            AppConfig::default()
        }
    });
    use_context_provider(|| config.clone());

    let api = use_hook(|| ApiHandle(config.build_api()));
    use_context_provider(|| api.clone());

    let state = use_signal(|| AppState::new(config.default_role, config.seller_id.clone()));
    use_hook({
        let mut state = state.clone();
        move || {
            if let Some(saved) = load_persisted_state() {
                state.with_mut(|st| st.apply_persisted(saved));
            }
        }
    });
    use_context_provider(|| state.clone());

    let toasts = use_signal(Vec::<ToastMessage>::new);
    use_context_provider(|| toasts.clone());

    let epoch = use_signal(RefreshEpoch::default);
    use_context_provider(|| epoch.clone());

    rsx! {
        document::Link { rel: "icon", href: assets::favicon_data_uri() }
        document::Style { "{assets::main_css()}" }
        Router::<Route> {}
        Toast {}
    }
}

pub fn persist_user_state(state: &Signal<AppState>) {
    let snapshot = state.with(|st| st.to_persisted());
    if let Err(err) = save_persisted_state(&snapshot) {
        tracing::warn!(error = %err, "failed to persist user state");
    }
}

/// Fetches one table for the current role, seller and date range.
///
/// Only the latest request per table may write its rows: a response that
/// arrives after a newer request was issued is dropped. On failure the
/// previously loaded rows stay in place.
pub async fn load_table(
    mut state: Signal<AppState>,
    api: ApiHandle,
    toasts: Signal<Vec<ToastMessage>>,
    schema: TableSchema,
) -> Option<CacheStatus> {
    let (guard, ticket, query) = {
        let st = state.peek();
        let guard = st.requests(schema).clone();
        let ticket = guard.issue();
        let query = RecordQuery::new(st.role, schema, st.seller_id.clone())
            .with_range(st.date_range(schema));
        (guard, ticket, query)
    };

    let result = fetch_current(api.0.as_ref(), &guard, ticket, &query).await?;

    match result {
        Ok(payload) => {
            let status = payload.status;
            state.with_mut(|st| st.apply_records(payload.data, payload.fetched_at));
            if status == CacheStatus::Stale {
                push_toast(
                    toasts,
                    ToastKind::Warning,
                    format!(
                        "Backend unreachable; showing saved {} data.",
                        schema.title().to_lowercase()
                    ),
                );
            }
            Some(status)
        }
        Err(err) => {
            tracing::error!(table = ?schema, error = %err, "failed to load table");
            push_toast(
                toasts,
                ToastKind::Error,
                format!("Failed to load {}: {err}", schema.title().to_lowercase()),
            );
            None
        }
    }
}

#[component]
pub fn Shipments() -> Element {
    rsx! { Shell { TablePage { schema: TableSchema::Shipments } } }
}

#[component]
pub fn Orders() -> Element {
    rsx! { Shell { TablePage { schema: TableSchema::Orders } } }
}

#[component]
pub fn Ndr() -> Element {
    rsx! { Shell { NdrPage {} } }
}

#[component]
pub fn Billing() -> Element {
    rsx! { Shell { BillingPage {} } }
}

#[component]
pub fn Rates() -> Element {
    rsx! { Shell { RateCalculatorPage {} } }
}

#[component]
pub fn Settings() -> Element {
    rsx! { Shell { SettingsPage {} } }
}
