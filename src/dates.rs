use std::fmt::Display;

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use log::warn;

use crate::types::{Order, OrderId};

const MIN_YEAR: i32 = 1000;

const DATE_FORMATS: [&str; 6] = [
    "%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y", "%d/%m/%y", "%Y/%m/%d", "%d.%m.%Y",
];

const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%d/%m/%Y %H:%M"];

pub const ISO_FORMAT: &str = "%Y-%m-%d";

#[derive(Clone, Debug, PartialEq)]
pub enum NormalizedDate {
    Valid(NaiveDate),
    Missing,
    Invalid(String),
}

impl NormalizedDate {
    pub fn valid(&self) -> Option<NaiveDate> {
        match self {
            NormalizedDate::Valid(d) => Some(*d),
            _ => None,
        }
    }
}

pub fn normalize(raw: &str) -> NormalizedDate {
    let text = raw.trim();
    if text.is_empty() {
        return NormalizedDate::Missing;
    }

    // %Y accepts any digit count, so "24/12/25" would come out as year 25.
    let dates = DATE_FORMATS
        .iter()
        .filter_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok());
    let datetimes = DATETIME_FORMATS
        .iter()
        .filter_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .map(|dt| dt.date());
    if let Some(d) = dates.chain(datetimes).find(|d| d.year() >= MIN_YEAR) {
        return NormalizedDate::Valid(d);
    }

    NormalizedDate::Invalid(raw.to_string())
}

/// Parses a date the operator typed, for places where an invalid date is
/// a hard error rather than a report line.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    normalize(raw).valid()
}

#[derive(Clone, Debug, PartialEq)]
pub struct DateIssue {
    pub id: OrderId,
    pub client: String,
    pub raw: String,
    pub missing: bool,
}

impl Display for DateIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.missing {
            write!(f, "#{} {}: date is missing", self.id, self.client)
        } else {
            write!(f, "#{} {}: cannot read date `{}`", self.id, self.client, self.raw)
        }
    }
}

/// Normalizes every order's date. Orders keep their position; the ones
/// whose date could not be read are also collected as issues.
pub fn normalize_store(orders: &[Order]) -> (Vec<(&Order, NormalizedDate)>, Vec<DateIssue>) {
    let mut issues = Vec::new();
    let normalized = orders
        .iter()
        .map(|o| {
            let n = normalize(&o.date);
            let failed = match &n {
                NormalizedDate::Valid(_) => None,
                NormalizedDate::Missing => Some((o.date.clone(), true)),
                NormalizedDate::Invalid(raw) => Some((raw.clone(), false)),
            };
            if let Some((raw, missing)) = failed {
                let issue = DateIssue {
                    id: o.id,
                    client: o.client.clone(),
                    raw,
                    missing,
                };
                warn!("{}", issue);
                issues.push(issue);
            }
            (o, n)
        })
        .collect();
    (normalized, issues)
}
