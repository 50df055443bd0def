use std::{env, path::PathBuf};

use chrono::NaiveDate;

use crate::dates::parse_date;
use crate::types::Error;

pub const DEFAULT_ORDERS_FILE: &str = "pedidos.csv";
pub const DEFAULT_REPORT_DATE: &str = "2025-12-24";

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub orders_file: PathBuf,
    /// Kept as text: only the default report reads it.
    pub report_date: String,
}

impl Config {
    pub fn from_env() -> Self {
        // A .env next to the book is optional.
        let _ = dotenvy::dotenv();

        Self::from_vars(
            env::var("CARURU_ORDERS_FILE").ok(),
            env::var("CARURU_REPORT_DATE").ok(),
        )
    }

    fn from_vars(orders_file: Option<String>, report_date: Option<String>) -> Self {
        Self {
            orders_file: orders_file
                .unwrap_or_else(|| DEFAULT_ORDERS_FILE.to_string())
                .into(),
            report_date: report_date.unwrap_or_else(|| DEFAULT_REPORT_DATE.to_string()),
        }
    }

    pub fn report_date(&self) -> Result<NaiveDate, Error> {
        parse_date(&self.report_date).ok_or_else(|| {
            Error::Config(format!(
                "CARURU_REPORT_DATE is not a date: `{}`",
                self.report_date
            ))
        })
    }
}
