use dioxus::prelude::*;

use crate::domain::Role;
use crate::ui::theme;

#[component]
pub fn KpiCard(title: String, value: String, description: Option<String>, role: Role) -> Element {
    rsx! {
        div {
            class: "{theme::panel_border(role)}",
            h3 { class: "{theme::label_class(role)}", "{title}" }
            p { class: "pd-kpi-value", "{value}" }
            if let Some(desc) = description {
                p { class: "{theme::text_muted()}", "{desc}" }
            }
        }
    }
}
