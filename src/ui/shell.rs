use dioxus::prelude::*;

use crate::app::{persist_user_state, RefreshEpoch, Route};
use crate::domain::{AppState, Role};
use crate::ui::theme;
use crate::util::version::{version_label, APP_NAME};

#[component]
pub fn Shell(children: Element) -> Element {
    let state = use_context::<Signal<AppState>>();
    let epoch = use_context::<Signal<RefreshEpoch>>();
    let current_route = use_route::<Route>();
    let nav = use_navigator();

    let role = state.with(|s| s.role);
    let seller = state.with(|s| s.seller_id.clone());

    let tagline = match role {
        Role::Seller => format!("Seller {seller}"),
        Role::Admin => "All sellers".to_string(),
    };

    let switch_to = move |target: Role| {
        let mut state = state;
        let mut epoch = epoch;
        if state.with(|s| s.role) == target {
            return;
        }
        tracing::info!(role = target.name(), "switching surface");
        state.with_mut(|s| s.switch_role(target));
        persist_user_state(&state);
        epoch.with_mut(|e| e.0 += 1);
    };

    rsx! {
        div { class: "{theme::surface_class(role)}",
            header { class: "pd-header",
                // Left: app name + scope
                div {
                    h1 { class: "{theme::title_class(role)}", "{APP_NAME}" }
                    p { class: "{theme::text_muted()}", "{tagline} · {version_label()}" }
                }

                // Center: role switcher
                div { class: "pd-toolbar",
                    NavButton {
                        active: role == Role::Seller,
                        onclick: move |_| switch_to(Role::Seller),
                        label: "Seller",
                        role: Role::Seller,
                    }
                    NavButton {
                        active: role == Role::Admin,
                        onclick: move |_| switch_to(Role::Admin),
                        label: "Admin",
                        role: Role::Admin,
                    }
                }

                // Right: navigation
                nav { class: "pd-navbar",
                    NavButton { active: matches!(current_route, Route::Shipments {}), onclick: move |_| { nav.push(Route::Shipments {}); }, label: "Shipments", role }
                    NavButton { active: matches!(current_route, Route::Orders {}), onclick: move |_| { nav.push(Route::Orders {}); }, label: "Orders", role }
                    NavButton { active: matches!(current_route, Route::Ndr {}), onclick: move |_| { nav.push(Route::Ndr {}); }, label: "NDR", role }
                    NavButton { active: matches!(current_route, Route::Billing {}), onclick: move |_| { nav.push(Route::Billing {}); }, label: "Billing", role }
                    NavButton { active: matches!(current_route, Route::Rates {}), onclick: move |_| { nav.push(Route::Rates {}); }, label: "Rates", role }
                    NavButton { active: matches!(current_route, Route::Settings {}), onclick: move |_| { nav.push(Route::Settings {}); }, label: "Settings", role }
                }
            }
            main { {children} }
        }
    }
}

#[component]
fn NavButton(active: bool, onclick: EventHandler<()>, label: &'static str, role: Role) -> Element {
    rsx! {
        button {
            class: "{theme::btn_nav(role, active)}",
            onclick: move |_| onclick.call(()),
            "{label}"
        }
    }
}
