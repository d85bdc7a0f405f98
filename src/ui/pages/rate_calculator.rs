use dioxus::prelude::*;

use crate::{
    domain::{
        chargeable_weight, default_rate_cards, quote_all, AppState, PaymentType, RateQuote, RateRequest, Role,
        WeightField, WeightForm, Zone,
    },
    ui::{
        components::KpiCard,
        format::{format_amount, format_weight},
        theme,
    },
};

#[component]
pub fn RateCalculatorPage() -> Element {
    let state = use_context::<Signal<AppState>>();
    let role = state.with(|st| st.role);

    let mut form = use_signal(WeightForm::default);
    let mut zone = use_signal(|| Zone::C);
    let mut payment = use_signal(|| PaymentType::Prepaid);
    let mut declared_value = use_signal(String::new);
    let mut quotes = use_signal(Vec::<RateQuote>::new);
    let mut show_errors = use_signal(|| false);

    let breakdown = form.with(|f| f.breakdown());
    let errors = if show_errors() {
        form.with(|f| f.parse().err().unwrap_or_default())
    } else {
        Vec::new()
    };
    let declared_error = parse_declared_value(&declared_value())
        .err()
        .filter(|_| show_errors());

    let on_quote = move |_| {
        show_errors.set(true);
        let parsed = form.with(|f| f.parse());
        let declared = parse_declared_value(&declared_value());
        match (parsed, declared) {
            (Ok(dimension), Ok(declared)) => {
                let request = RateRequest {
                    zone: zone(),
                    chargeable_weight: chargeable_weight(&dimension),
                    payment_type: payment(),
                    declared_value: declared,
                };
                tracing::debug!(?request, "quoting couriers");
                quotes.set(quote_all(&default_rate_cards(), &request));
            }
            _ => quotes.set(Vec::new()),
        }
    };

    let on_reset = move |_| {
        form.set(WeightForm::default());
        declared_value.set(String::new());
        quotes.set(Vec::new());
        show_errors.set(false);
    };

    let fields = [
        (WeightField::Length, "Length (cm)", form.with(|f| f.length.clone())),
        (WeightField::Width, "Width (cm)", form.with(|f| f.width.clone())),
        (WeightField::Height, "Height (cm)", form.with(|f| f.height.clone())),
        (WeightField::Quantity, "Quantity", form.with(|f| f.quantity.clone())),
        (WeightField::ItemWeight, "Weight per item (kg)", form.with(|f| f.item_weight.clone())),
    ];

    rsx! {
        div { class: "pd-main",
            h2 { class: "{theme::title_class(role)}", "Rate Calculator" }

            section { class: "{theme::panel_border(role)}",
                h3 { class: "{theme::label_class(role)}", "Parcel" }
                div { class: "pd-grid",
                    for (field, label, value) in fields {
                        FormField {
                            key: "{field}",
                            label,
                            value,
                            error: WeightForm::error_for(&errors, field),
                            role,
                            oninput: move |raw: String| form.with_mut(|f| set_field(f, field, raw)),
                        }
                    }
                }

                h3 { class: "{theme::label_class(role)}", style: "margin-top: 1.25rem;", "Delivery" }
                div { class: "pd-grid",
                    div {
                        label { class: "{theme::label_class(role)}", "Zone" }
                        select {
                            class: "{theme::input_class(role)}",
                            onchange: move |evt| {
                                if let Some(chosen) = Zone::ALL.into_iter().find(|z| z.label() == evt.value()) {
                                    zone.set(chosen);
                                }
                            },
                            for z in Zone::ALL {
                                option { key: "{z.label()}", value: "{z.label()}", selected: z == zone(), "{z.label()}" }
                            }
                        }
                    }
                    div {
                        label { class: "{theme::label_class(role)}", "Payment" }
                        select {
                            class: "{theme::input_class(role)}",
                            onchange: move |evt| {
                                payment.set(if evt.value() == PaymentType::Cod.label() {
                                    PaymentType::Cod
                                } else {
                                    PaymentType::Prepaid
                                });
                            },
                            for kind in [PaymentType::Prepaid, PaymentType::Cod] {
                                option { key: "{kind.label()}", value: "{kind.label()}", selected: kind == payment(), "{kind.label()}" }
                            }
                        }
                    }
                    FormField {
                        label: "Declared value (₹)",
                        value: declared_value(),
                        error: declared_error,
                        role,
                        oninput: move |raw: String| declared_value.set(raw),
                    }
                }

                div { class: "pd-toolbar", style: "margin-top: 1.25rem;",
                    button { class: "{theme::btn_primary(role)}", onclick: on_quote, "Get quotes" }
                    button { class: "{theme::btn_secondary(role)}", onclick: on_reset, "Reset" }
                }
            }

            div { class: "pd-kpis",
                KpiCard { title: "Volumetric weight".to_string(), value: format_weight(breakdown.volumetric), description: Some("L × W × H ÷ 5000 per item".to_string()), role }
                KpiCard { title: "Actual weight".to_string(), value: format_weight(breakdown.actual), role }
                KpiCard { title: "Chargeable weight".to_string(), value: format_weight(breakdown.chargeable), description: Some("higher of the two".to_string()), role }
            }

            if !quotes().is_empty() {
                QuoteTable { quotes: quotes(), role }
            }
        }
    }
}

#[component]
fn FormField(
    label: &'static str,
    value: String,
    error: Option<String>,
    role: Role,
    oninput: EventHandler<String>,
) -> Element {
    let class = if error.is_some() {
        theme::input_error()
    } else {
        theme::input_class(role)
    };
    rsx! {
        div {
            label { class: "{theme::label_class(role)}", "{label}" }
            input {
                class: "{class}",
                inputmode: "decimal",
                value: "{value}",
                oninput: move |evt| oninput.call(evt.value()),
            }
            if let Some(message) = error {
                p { class: "pd-field-error", "{message}" }
            }
        }
    }
}

#[component]
fn QuoteTable(quotes: Vec<RateQuote>, role: Role) -> Element {
    rsx! {
        div { class: "{theme::table_container(role)}",
            table { class: "pd-table",
                thead { class: "{theme::table_header(role)}",
                    tr {
                        th { "Courier" }
                        th { "Slabs" }
                        th { "Freight" }
                        th { "COD" }
                        th { "GST" }
                        th { "Total" }
                    }
                }
                tbody {
                    for (rank, quote) in quotes.iter().enumerate() {
                        tr { key: "{quote.courier}",
                            td {
                                "{quote.courier}"
                                if rank == 0 {
                                    span { class: "{theme::accent_text(role)}", " · cheapest" }
                                }
                            }
                            td { "{quote.slabs}" }
                            td { "{format_amount(quote.freight)}" }
                            td { "{format_amount(quote.cod_charge)}" }
                            td { "{format_amount(quote.gst)}" }
                            td { class: "{theme::accent_text(role)}", "{format_amount(quote.total)}" }
                        }
                    }
                }
            }
        }
    }
}

fn set_field(form: &mut WeightForm, field: WeightField, raw: String) {
    match field {
        WeightField::Length => form.length = raw,
        WeightField::Width => form.width = raw,
        WeightField::Height => form.height = raw,
        WeightField::Quantity => form.quantity = raw,
        WeightField::ItemWeight => form.item_weight = raw,
    }
}

/// Blank means no declared value; COD charges then fall back to the flat fee.
fn parse_declared_value(raw: &str) -> Result<f64, String> {
    let trimmed = raw.trim().trim_start_matches('₹').replace(',', "");
    if trimmed.is_empty() {
        return Ok(0.0);
    }
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => Ok(value),
        _ => Err(format!("'{}' is not a valid amount", raw.trim())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declared_values_accept_rupee_formatting() {
        assert_eq!(parse_declared_value(""), Ok(0.0));
        assert_eq!(parse_declared_value("₹1,250.50"), Ok(1250.5));
        assert!(parse_declared_value("-5").is_err());
        assert!(parse_declared_value("abc").is_err());
    }

    #[test]
    fn fields_are_routed_to_the_form() {
        let mut form = WeightForm::default();
        set_field(&mut form, WeightField::Height, "25".into());
        set_field(&mut form, WeightField::ItemWeight, "1.2".into());
        assert_eq!(form.height, "25");
        assert_eq!(form.item_weight, "1.2");
    }
}
