use std::{
    fmt::Display,
    ops::{Add, Sub},
};

use crate::types::Error;

const DECIMALS: usize = 2;

// Kilograms and reais are plain f64: the book is small and the report only
// needs two decimals.
pub fn parse_quantity(field: &'static str, raw: &str) -> Result<f64, Error> {
    let trimmed = raw.trim();
    let trimmed = trimmed.strip_prefix("R$").unwrap_or(trimmed).trim();
    if trimmed.is_empty() {
        return Ok(0.0);
    }

    // "2,5" is the local way of writing 2.5. With both separators present
    // the dot is a thousands separator ("1.250,00").
    let normalized = if trimmed.contains(',') {
        trimmed.replace('.', "").replace(',', ".")
    } else {
        trimmed.to_string()
    };

    match normalized.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(Error::InvalidNumber(field, raw.to_string())),
    }
}

pub fn format_quantity(value: f64) -> String {
    format!("{:.*}", DECIMALS, value)
}

/// Sums of the three numeric columns over some set of orders.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Totals {
    pub caruru_kg: f64,
    pub bobo_kg: f64,
    pub value: f64,
}

impl Totals {
    pub fn new(caruru_kg: f64, bobo_kg: f64, value: f64) -> Totals {
        Totals {
            caruru_kg,
            bobo_kg,
            value,
        }
    }
}

impl Display for Totals {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "caruru {} kg | bobó {} kg | R$ {}",
            format_quantity(self.caruru_kg),
            format_quantity(self.bobo_kg),
            format_quantity(self.value)
        )
    }
}

impl Add for Totals {
    type Output = Totals;

    fn add(self, rhs: Self) -> Self::Output {
        Totals {
            caruru_kg: self.caruru_kg + rhs.caruru_kg,
            bobo_kg: self.bobo_kg + rhs.bobo_kg,
            value: self.value + rhs.value,
        }
    }
}

impl Sub for Totals {
    type Output = Totals;

    fn sub(self, rhs: Self) -> Self::Output {
        Totals {
            caruru_kg: self.caruru_kg - rhs.caruru_kg,
            bobo_kg: self.bobo_kg - rhs.bobo_kg,
            value: self.value - rhs.value,
        }
    }
}
