use serde::{Deserialize, Serialize};

/// Monetary amount in major units of the configured currency.
pub type Money = f64;

/// Two minor units cover every currency the back office bills in today.
pub const DEFAULT_MINOR_UNITS: u8 = 2;

/// Scaled values closer than this to a whole minor unit are float noise.
const MINOR_UNIT_NOISE: f64 = 1e-6;

/// ISO 4217 currency representation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct CurrencyCode(pub String);

impl CurrencyCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into().to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn minor_units(&self) -> u8 {
        minor_units_for(self.as_str())
    }
}

impl Default for CurrencyCode {
    fn default() -> Self {
        Self::new("USD")
    }
}

pub fn minor_units_for(code: &str) -> u8 {
    match code {
        "JPY" | "KRW" => 0,
        "KWD" | "BHD" | "OMR" => 3,
        _ => DEFAULT_MINOR_UNITS,
    }
}

fn scale(precision: u8) -> f64 {
    10f64.powi(i32::from(precision))
}

/// Rounds `amount` half away from zero to `precision` decimal places.
pub fn round_to_minor(amount: Money, precision: u8) -> Money {
    let factor = scale(precision);
    (amount * factor).round() / factor
}

/// `amount` in minor units, rounded half away from zero.
pub fn to_minor_units(amount: Money, precision: u8) -> i64 {
    (amount * scale(precision)).round() as i64
}

/// `amount` in minor units, rounded toward negative infinity. Values that sit on
/// a minor unit up to float noise (0.29 * 100 = 28.999999999999996) keep it.
pub fn floor_to_minor_units(amount: Money, precision: u8) -> i64 {
    let scaled = amount * scale(precision);
    let nearest = scaled.round();
    if (scaled - nearest).abs() < MINOR_UNIT_NOISE {
        nearest as i64
    } else {
        scaled.floor() as i64
    }
}

pub fn from_minor_units(units: i64, precision: u8) -> Money {
    units as f64 / scale(precision)
}
