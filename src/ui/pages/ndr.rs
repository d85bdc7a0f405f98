use dioxus::prelude::*;

use crate::{
    app::ApiHandle,
    domain::{AppState, NdrAction, TableSchema},
    ui::{
        components::toast::{push_toast, ToastKind, ToastMessage},
        pages::table_page::{TableSection, TotalsCards},
        theme,
    },
};

const ACTIONS: [NdrAction; 2] = [NdrAction::Reattempt, NdrAction::Rto];

#[component]
pub fn NdrPage() -> Element {
    let mut state = use_context::<Signal<AppState>>();
    let toasts = use_context::<Signal<Vec<ToastMessage>>>();
    let api = use_context::<ApiHandle>();

    let mut selected_awb = use_signal(String::new);
    let mut selected_action = use_signal(|| NdrAction::Reattempt);
    let mut submitting = use_signal(|| false);

    let role = state.with(|st| st.role);
    let seller = state.with(|st| st.seller_id.clone());
    let snapshot = state.with(|st| st.snapshot(TableSchema::Ndr));
    // Only open NDRs accept a new instruction.
    let open_awbs: Vec<String> = state.with(|st| {
        st.ndr
            .visible(st.role, &st.seller_id)
            .rows
            .into_iter()
            .filter(|record| record.status.is_open())
            .map(|record| record.awb)
            .collect()
    });

    let awb = selected_awb();
    let awb_is_open = open_awbs.contains(&awb);

    let on_submit = move |_| {
        let awb = selected_awb();
        let action = selected_action();
        let api = api.clone();
        let seller = seller.clone();
        submitting.set(true);
        spawn(async move {
            match api.0.apply_ndr_action(role, &seller, &awb, action).await {
                Ok(updated) => {
                    let status = updated.status.label();
                    state.with_mut(|st| st.ndr.upsert(updated));
                    selected_awb.set(String::new());
                    push_toast(
                        toasts,
                        ToastKind::Success,
                        format!("{} requested for {awb} ({status}).", action.label()),
                    );
                }
                Err(err) => {
                    tracing::error!(%awb, ?action, error = %err, "NDR action failed");
                    push_toast(toasts, ToastKind::Error, format!("NDR action failed: {err}"));
                }
            }
            submitting.set(false);
        });
    };

    rsx! {
        div { class: "pd-main",
            h2 { class: "{theme::title_class(role)}", "{TableSchema::Ndr.title()}" }
            TotalsCards { snapshot }

            section { class: "{theme::panel_border(role)}",
                h3 { class: "{theme::label_class(role)}", "Take action" }
                if open_awbs.is_empty() {
                    p { class: "{theme::text_muted()}", "No open NDRs need an instruction." }
                } else {
                    div { class: "pd-toolbar",
                        div {
                            label { class: "{theme::label_class(role)}", "AWB" }
                            select {
                                class: "{theme::input_class(role)}",
                                value: "{awb}",
                                onchange: move |evt| selected_awb.set(evt.value()),
                                option { value: "", "Select a shipment" }
                                for open in open_awbs.iter() {
                                    option { key: "{open}", value: "{open}", "{open}" }
                                }
                            }
                        }
                        div {
                            label { class: "{theme::label_class(role)}", "Action" }
                            select {
                                class: "{theme::input_class(role)}",
                                onchange: move |evt| {
                                    let chosen = ACTIONS
                                        .into_iter()
                                        .find(|action| action.label() == evt.value());
                                    if let Some(action) = chosen {
                                        selected_action.set(action);
                                    }
                                },
                                for action in ACTIONS {
                                    option {
                                        key: "{action.label()}",
                                        value: "{action.label()}",
                                        selected: action == selected_action(),
                                        "{action.label()}"
                                    }
                                }
                            }
                        }
                        button {
                            class: "{theme::btn_primary(role)}",
                            disabled: !awb_is_open || submitting(),
                            onclick: on_submit,
                            if submitting() { "Submitting…" } else { "Submit" }
                        }
                    }
                }
            }

            TableSection { schema: TableSchema::Ndr }
        }
    }
}
