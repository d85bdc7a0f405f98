use dioxus::prelude::*;

use crate::{
    app::{persist_user_state, ApiHandle, RefreshEpoch},
    domain::{AppState, Role, TableSchema},
    infra::export::default_export_dir,
    ui::{
        components::toast::{push_toast, ToastKind, ToastMessage},
        format::humanize_age,
        theme,
    },
    util::{config::AppConfig, version::version_label},
};

#[component]
pub fn SettingsPage() -> Element {
    let mut state = use_context::<Signal<AppState>>();
    let toasts = use_context::<Signal<Vec<ToastMessage>>>();
    let api = use_context::<ApiHandle>();
    let config = use_context::<AppConfig>();
    let mut epoch = use_context::<Signal<RefreshEpoch>>();

    let role = state.with(|st| st.role);
    let mut seller_input = use_signal(|| state.with(|st| st.seller_id.clone()));

    let ttl = config.cache_ttl();
    let cache_entries = state.with(|st| {
        TableSchema::ALL
            .into_iter()
            .map(|schema| {
                let age = match st.cache.fetched_at(&schema) {
                    Some(time) if st.is_stale(schema, ttl) => format!("{} (stale)", humanize_age(time)),
                    Some(time) => humanize_age(time),
                    None => "never".to_string(),
                };
                (schema.title(), age)
            })
            .collect::<Vec<_>>()
    });

    let backend = api.0.describe();
    let export_dir = default_export_dir(config.export_dir.as_deref())
        .map(|path| path.display().to_string())
        .unwrap_or_else(|| "unavailable".to_string());

    let on_apply_seller = move |_| {
        let seller = seller_input().trim().to_string();
        if seller.is_empty() {
            push_toast(toasts, ToastKind::Error, "Seller ID cannot be empty.");
            return;
        }
        if !state.with_mut(|st| st.set_seller(&seller)) {
            return;
        }
        persist_user_state(&state);
        epoch.with_mut(|e| e.0 += 1);
        push_toast(toasts, ToastKind::Success, format!("Now viewing seller {seller}."));
    };

    let on_clear_cache = {
        let api = api.clone();
        move |_| {
            let api = api.clone();
            state.with_mut(|st| st.cache.clear());
            spawn(async move {
                api.0.clear_cache().await;
                epoch.with_mut(|e| e.0 += 1);
                push_toast(
                    toasts,
                    ToastKind::Info,
                    "Cleared cached data. Tables are reloading.",
                );
            });
        }
    };

    rsx! {
        div { class: "pd-main",
            h2 { class: "{theme::title_class(role)}", "Settings" }

            section { class: "{theme::panel_border(role)}",
                h3 { class: "{theme::label_class(role)}", "Seller" }
                p { class: "{theme::text_muted()}",
                    "The seller surface only shows records of this seller."
                }
                div { class: "pd-toolbar",
                    input {
                        class: "{theme::input_class(role)}",
                        value: seller_input(),
                        disabled: role == Role::Admin,
                        oninput: move |evt| seller_input.set(evt.value()),
                    }
                    button {
                        class: "{theme::btn_primary(role)}",
                        disabled: role == Role::Admin,
                        onclick: on_apply_seller,
                        "Apply"
                    }
                }
            }

            section { class: "{theme::panel_border(role)}",
                h3 { class: "{theme::label_class(role)}", "Cache Status" }
                ul { style: "list-style: none; padding: 0;",
                    for (label, age) in cache_entries {
                        li { key: "{label}", class: "pd-toolbar", style: "justify-content: space-between;",
                            span { "{label}" }
                            span { class: "{theme::text_muted()}", "{age}" }
                        }
                    }
                }
                button { class: "{theme::btn_danger()}", onclick: on_clear_cache, "Clear Cache" }
            }

            section { class: "{theme::panel_border(role)}",
                h3 { class: "{theme::label_class(role)}", "Environment" }
                dl {
                    dt { class: "{theme::label_class(role)}", "Backend" }
                    dd { "{backend}" }
                    dt { class: "{theme::label_class(role)}", "Exports" }
                    dd { "{export_dir}" }
                    dt { class: "{theme::label_class(role)}", "Cache TTL" }
                    dd { "{config.cache_ttl_secs} s" }
                    dt { class: "{theme::label_class(role)}", "Version" }
                    dd { "{version_label()}" }
                }
            }
        }
    }
}
