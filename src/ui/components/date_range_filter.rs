use dioxus::prelude::*;

use crate::domain::{DateRange, Role};
use crate::ui::theme;

/// `from`/`to` date inputs. Both bounds must be set for the filter to apply.
#[component]
pub fn DateRangeFilter(range: DateRange, role: Role, on_change: EventHandler<DateRange>) -> Element {
    let mut from_input = use_signal(|| range.from_input());
    let mut to_input = use_signal(|| range.to_input());
    let mut error = use_signal(|| None::<String>);

    let apply = move |_| match DateRange::parse_input(&from_input(), &to_input()) {
        Ok(parsed) => {
            error.set(None);
            on_change.call(parsed);
        }
        Err(err) => error.set(Some(err.to_string())),
    };

    let clear = move |_| {
        from_input.set(String::new());
        to_input.set(String::new());
        error.set(None);
        on_change.call(DateRange::default());
    };

    let hint = if range.is_inverted() {
        Some("From is after To; the bounds are swapped when filtering.")
    } else if range.from.is_some() != range.to.is_some() {
        Some("Set both dates to filter.")
    } else {
        None
    };

    rsx! {
        div { class: "pd-toolbar",
            div {
                label { class: "{theme::label_class(role)}", "From" }
                input {
                    class: "{theme::input_class(role)}",
                    r#type: "date",
                    value: from_input(),
                    oninput: move |evt| from_input.set(evt.value()),
                }
            }
            div {
                label { class: "{theme::label_class(role)}", "To" }
                input {
                    class: "{theme::input_class(role)}",
                    r#type: "date",
                    value: to_input(),
                    oninput: move |evt| to_input.set(evt.value()),
                }
            }
            button { class: "{theme::btn_primary(role)}", onclick: apply, "Apply" }
            button { class: "{theme::btn_secondary(role)}", onclick: clear, "Clear" }
            if let Some(message) = error() {
                span { class: "pd-field-error", "{message}" }
            } else if let Some(message) = hint {
                span { class: "{theme::text_muted()}", "{message}" }
            }
        }
    }
}
