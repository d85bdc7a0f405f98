//! Chargeable-weight calculation for parcels.
//!
//! Couriers bill whichever is larger: the dead weight of the parcel or its
//! volumetric weight (`l × w × h / 5000` per item, dimensions in cm).

use thiserror::Error;

/// Cubic centimetres per volumetric kilogram.
pub const VOLUMETRIC_DIVISOR: f64 = 5000.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShippingDimension {
    pub length: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub quantity: u32,
    /// Dead weight of one item in kg.
    pub item_weight: Option<f64>,
}

impl Default for ShippingDimension {
    fn default() -> Self {
        Self {
            length: None,
            width: None,
            height: None,
            quantity: 1,
            item_weight: None,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct WeightBreakdown {
    pub volumetric: f64,
    pub actual: f64,
    pub chargeable: f64,
}

impl ShippingDimension {
    /// Zero unless every dimension is present and positive.
    pub fn volumetric_weight(&self) -> f64 {
        match (self.length, self.width, self.height) {
            (Some(l), Some(w), Some(h)) if l > 0.0 && w > 0.0 && h > 0.0 => {
                (l * w * h / VOLUMETRIC_DIVISOR) * self.quantity as f64
            }
            _ => 0.0,
        }
    }

    pub fn actual_weight(&self) -> f64 {
        self.item_weight.unwrap_or(0.0) * self.quantity as f64
    }

    pub fn breakdown(&self) -> WeightBreakdown {
        let volumetric = self.volumetric_weight();
        let actual = self.actual_weight();
        WeightBreakdown {
            volumetric,
            actual,
            chargeable: volumetric.max(actual),
        }
    }
}

pub fn chargeable_weight(dimension: &ShippingDimension) -> f64 {
    dimension.breakdown().chargeable
}

/// Field-scoped validation errors of the weight form.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum WeightInputError {
    #[error("{field}: '{value}' is not a number")]
    NotANumber { field: WeightField, value: String },
    #[error("{field} must be greater than zero")]
    NotPositive { field: WeightField },
    #[error("{field} is required")]
    Required { field: WeightField },
}

impl WeightInputError {
    pub fn field(&self) -> WeightField {
        match self {
            Self::NotANumber { field, .. }
            | Self::NotPositive { field }
            | Self::Required { field } => *field,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WeightField {
    Length,
    Width,
    Height,
    Quantity,
    ItemWeight,
}

impl std::fmt::Display for WeightField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            WeightField::Length => "Length",
            WeightField::Width => "Width",
            WeightField::Height => "Height",
            WeightField::Quantity => "Quantity",
            WeightField::ItemWeight => "Item weight",
        };
        f.write_str(label)
    }
}

/// Raw text inputs of the rate calculator's parcel form.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WeightForm {
    pub length: String,
    pub width: String,
    pub height: String,
    pub quantity: String,
    pub item_weight: String,
}

impl WeightForm {
    /// Strict parse used before submitting a quote request.
    ///
    /// Dimensions may be left blank, but the item weight is required so a
    /// quote always has a billable weight.
    pub fn parse(&self) -> Result<ShippingDimension, Vec<WeightInputError>> {
        let mut errors = Vec::new();

        let mut dimension = |raw: &str, field: WeightField| match parse_optional(raw, field) {
            Ok(value) => value,
            Err(err) => {
                errors.push(err);
                None
            }
        };
        let length = dimension(&self.length, WeightField::Length);
        let width = dimension(&self.width, WeightField::Width);
        let height = dimension(&self.height, WeightField::Height);
        let item_weight = dimension(&self.item_weight, WeightField::ItemWeight);

        if item_weight.is_none() && self.item_weight.trim().is_empty() {
            errors.push(WeightInputError::Required {
                field: WeightField::ItemWeight,
            });
        }

        let quantity = match parse_quantity(&self.quantity) {
            Ok(quantity) => quantity,
            Err(err) => {
                errors.push(err);
                1
            }
        };

        if errors.is_empty() {
            Ok(ShippingDimension {
                length,
                width,
                height,
                quantity,
                item_weight,
            })
        } else {
            Err(errors)
        }
    }

    /// Live preview while typing; invalid fields count as blank.
    pub fn breakdown(&self) -> WeightBreakdown {
        let lenient = |raw: &str| parse_optional(raw, WeightField::Length).ok().flatten();
        ShippingDimension {
            length: lenient(&self.length),
            width: lenient(&self.width),
            height: lenient(&self.height),
            quantity: parse_quantity(&self.quantity).unwrap_or(1),
            item_weight: lenient(&self.item_weight),
        }
        .breakdown()
    }

    pub fn error_for(errors: &[WeightInputError], field: WeightField) -> Option<String> {
        errors
            .iter()
            .find(|err| err.field() == field)
            .map(ToString::to_string)
    }
}

fn parse_optional(raw: &str, field: WeightField) -> Result<Option<f64>, WeightInputError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let value: f64 = trimmed.parse().map_err(|_| WeightInputError::NotANumber {
        field,
        value: trimmed.to_string(),
    })?;
    if !value.is_finite() || value <= 0.0 {
        return Err(WeightInputError::NotPositive { field });
    }
    Ok(Some(value))
}

/// Blank quantity means one parcel.
fn parse_quantity(raw: &str) -> Result<u32, WeightInputError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(1);
    }
    match trimmed.parse::<u32>() {
        Ok(0) => Err(WeightInputError::NotPositive {
            field: WeightField::Quantity,
        }),
        Ok(quantity) => Ok(quantity),
        Err(_) => Err(WeightInputError::NotANumber {
            field: WeightField::Quantity,
            value: trimmed.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn volumetric_weight_wins_for_bulky_parcels() {
        let parcel = ShippingDimension {
            length: Some(20.0),
            width: Some(20.0),
            height: Some(25.0),
            quantity: 1,
            item_weight: Some(0.5),
        };
        let breakdown = parcel.breakdown();

        assert!(approx(breakdown.volumetric, 2.0));
        assert!(approx(breakdown.actual, 0.5));
        assert!(approx(breakdown.chargeable, 2.0));
    }

    #[test]
    fn ten_centimetre_cube_bills_its_dead_weight() {
        let parcel = ShippingDimension {
            length: Some(10.0),
            width: Some(10.0),
            height: Some(10.0),
            quantity: 1,
            item_weight: Some(0.5),
        };
        let breakdown = parcel.breakdown();

        // 1000 cm³ / 5000 = 0.2 kg
        assert!(approx(breakdown.volumetric, 0.2));
        assert!(approx(breakdown.chargeable, 0.5));
    }

    #[test]
    fn dense_parcels_bill_dead_weight() {
        let parcel = ShippingDimension {
            length: Some(10.0),
            width: Some(10.0),
            height: Some(10.0),
            quantity: 2,
            item_weight: Some(1.5),
        };
        let breakdown = parcel.breakdown();

        assert!(approx(breakdown.volumetric, 0.4));
        assert!(approx(breakdown.chargeable, 3.0));
    }

    #[test]
    fn missing_or_zero_dimension_falls_back_to_actual_weight() {
        for height in [None, Some(0.0)] {
            let parcel = ShippingDimension {
                length: Some(40.0),
                width: Some(40.0),
                height,
                quantity: 3,
                item_weight: Some(0.75),
            };
            assert_eq!(parcel.volumetric_weight(), 0.0);
            assert!(approx(chargeable_weight(&parcel), 2.25));
        }
    }

    #[test]
    fn chargeable_is_never_below_either_component() {
        let parcel = ShippingDimension {
            length: Some(33.0),
            width: Some(21.0),
            height: Some(9.0),
            quantity: 4,
            item_weight: Some(0.6),
        };
        let breakdown = parcel.breakdown();
        let expected = ((33.0 * 21.0 * 9.0 / 5000.0) * 4.0_f64).max(0.6 * 4.0);

        assert!(approx(breakdown.chargeable, expected));
        assert!(breakdown.chargeable >= breakdown.volumetric);
        assert!(breakdown.chargeable >= breakdown.actual);
    }

    #[test]
    fn form_errors_are_scoped_to_their_field() {
        let form = WeightForm {
            length: "abc".into(),
            width: "10".into(),
            height: "-2".into(),
            quantity: "0".into(),
            item_weight: String::new(),
        };
        let errors = form.parse().expect_err("form is invalid");

        assert!(WeightForm::error_for(&errors, WeightField::Length).is_some());
        assert!(WeightForm::error_for(&errors, WeightField::Width).is_none());
        assert_eq!(
            WeightForm::error_for(&errors, WeightField::Height).as_deref(),
            Some("Height must be greater than zero")
        );
        assert!(WeightForm::error_for(&errors, WeightField::Quantity).is_some());
        assert_eq!(
            WeightForm::error_for(&errors, WeightField::ItemWeight).as_deref(),
            Some("Item weight is required")
        );
    }

    #[test]
    fn live_breakdown_ignores_fields_still_being_typed() {
        let form = WeightForm {
            length: "20".into(),
            width: "20".into(),
            height: "2.".into(),
            quantity: String::new(),
            item_weight: "1".into(),
        };
        // "2." parses as 2.0
        assert!(approx(form.breakdown().volumetric, 0.16));

        let typing = WeightForm {
            height: "".into(),
            ..form
        };
        assert!(approx(typing.breakdown().chargeable, 1.0));
    }

    #[test]
    fn valid_form_parses_with_default_quantity() {
        let form = WeightForm {
            item_weight: "0.5".into(),
            ..WeightForm::default()
        };
        let parcel = form.parse().expect("valid form");
        assert_eq!(parcel.quantity, 1);
        assert_eq!(parcel.item_weight, Some(0.5));
        assert_eq!(parcel.length, None);
    }
}
