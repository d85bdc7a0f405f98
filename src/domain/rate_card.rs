//! Courier rate cards and shipping quotes.
//!
//! Pricing is slab based: the first 0.5 kg slab costs `first_slab`, every
//! further started 0.5 kg costs `additional_slab`. COD parcels add the larger
//! of a flat fee and a percentage of the declared value, and GST is charged on
//! the whole.

use serde::{Deserialize, Serialize};

use super::entities::PaymentType;

pub const SLAB_KG: f64 = 0.5;
pub const GST_RATE: f64 = 0.18;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Zone {
    /// Within city.
    A,
    /// Within state.
    B,
    /// Metro to metro.
    C,
    /// Rest of India.
    D,
    /// North-east and special regions.
    E,
}

impl Zone {
    pub const ALL: [Zone; 5] = [Zone::A, Zone::B, Zone::C, Zone::D, Zone::E];

    pub fn label(&self) -> &'static str {
        match self {
            Zone::A => "Zone A · Local",
            Zone::B => "Zone B · Regional",
            Zone::C => "Zone C · Metro",
            Zone::D => "Zone D · National",
            Zone::E => "Zone E · Special",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ZoneRate {
    pub first_slab: f64,
    pub additional_slab: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RateCard {
    pub courier: String,
    /// Indexed in [`Zone::ALL`] order.
    pub zones: [ZoneRate; 5],
    pub cod_flat: f64,
    /// Fraction of the declared value, e.g. `0.015`.
    pub cod_percent: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RateRequest {
    pub zone: Zone,
    pub chargeable_weight: f64,
    pub payment_type: PaymentType,
    pub declared_value: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RateQuote {
    pub courier: String,
    pub slabs: u32,
    pub freight: f64,
    pub cod_charge: f64,
    pub gst: f64,
    pub total: f64,
}

/// Number of started 0.5 kg slabs; anything up to the first slab bills as one.
pub fn billable_slabs(weight: f64) -> u32 {
    if !weight.is_finite() || weight <= SLAB_KG {
        return 1;
    }
    // Round first so 1.0000000001 from float noise stays two slabs.
    let slabs = (weight / SLAB_KG * 1e6).round() / 1e6;
    slabs.ceil() as u32
}

impl RateCard {
    pub fn zone_rate(&self, zone: Zone) -> ZoneRate {
        let index = Zone::ALL.iter().position(|z| *z == zone).unwrap_or(0);
        self.zones[index]
    }

    pub fn quote(&self, request: &RateRequest) -> RateQuote {
        let rate = self.zone_rate(request.zone);
        let slabs = billable_slabs(request.chargeable_weight);
        let freight = rate.first_slab + rate.additional_slab * slabs.saturating_sub(1) as f64;
        let cod_charge = match request.payment_type {
            PaymentType::Cod => self
                .cod_flat
                .max(self.cod_percent * request.declared_value.max(0.0)),
            PaymentType::Prepaid => 0.0,
        };
        let gst = round2((freight + cod_charge) * GST_RATE);
        let total = round2(freight + cod_charge + gst);

        RateQuote {
            courier: self.courier.clone(),
            slabs,
            freight: round2(freight),
            cod_charge: round2(cod_charge),
            gst,
            total,
        }
    }
}

/// Quotes from every card, cheapest first. Ties keep card order.
pub fn quote_all(cards: &[RateCard], request: &RateRequest) -> Vec<RateQuote> {
    let mut quotes: Vec<RateQuote> = cards.iter().map(|card| card.quote(request)).collect();
    quotes.sort_by(|a, b| a.total.total_cmp(&b.total));
    quotes
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

const fn zone(first_slab: f64, additional_slab: f64) -> ZoneRate {
    ZoneRate {
        first_slab,
        additional_slab,
    }
}

/// Built-in cards used by the rate calculator and demo mode.
pub fn default_rate_cards() -> Vec<RateCard> {
    vec![
        RateCard {
            courier: "Delhivery Surface".to_string(),
            zones: [
                zone(29.0, 26.0),
                zone(33.0, 29.0),
                zone(42.0, 38.0),
                zone(46.0, 42.0),
                zone(58.0, 52.0),
            ],
            cod_flat: 35.0,
            cod_percent: 0.0175,
        },
        RateCard {
            courier: "Xpressbees".to_string(),
            zones: [
                zone(27.0, 25.0),
                zone(31.0, 28.0),
                zone(40.0, 37.0),
                zone(48.0, 44.0),
                zone(61.0, 55.0),
            ],
            cod_flat: 30.0,
            cod_percent: 0.02,
        },
        RateCard {
            courier: "Ekart".to_string(),
            zones: [
                zone(31.0, 27.0),
                zone(34.0, 30.0),
                zone(41.0, 36.0),
                zone(45.0, 40.0),
                zone(56.0, 50.0),
            ],
            cod_flat: 32.0,
            cod_percent: 0.015,
        },
        RateCard {
            courier: "Blue Dart Air".to_string(),
            zones: [
                zone(48.0, 44.0),
                zone(55.0, 50.0),
                zone(68.0, 62.0),
                zone(74.0, 68.0),
                zone(92.0, 85.0),
            ],
            cod_flat: 45.0,
            cod_percent: 0.02,
        },
    ]
}
