// Fixed ruble conversion table for the currencies that appear in vacancy
// exports.
use crate::error::ReportError;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Currency {
    Azn,
    Byr,
    Eur,
    Gel,
    Kgs,
    Kzt,
    Rur,
    Uah,
    Usd,
    Uzs,
}

impl Currency {
    pub const ALL: [Currency; 10] = [
        Currency::Azn,
        Currency::Byr,
        Currency::Eur,
        Currency::Gel,
        Currency::Kgs,
        Currency::Kzt,
        Currency::Rur,
        Currency::Uah,
        Currency::Usd,
        Currency::Uzs,
    ];

    /// Rubles per one unit of this currency.
    pub fn rate(self) -> f64 {
        match self {
            Currency::Azn => 35.68,
            Currency::Byr => 23.91,
            Currency::Eur => 59.90,
            Currency::Gel => 21.74,
            Currency::Kgs => 0.76,
            Currency::Kzt => 0.13,
            Currency::Rur => 1.0,
            Currency::Uah => 1.64,
            Currency::Usd => 60.66,
            Currency::Uzs => 0.0055,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Currency::Azn => "AZN",
            Currency::Byr => "BYR",
            Currency::Eur => "EUR",
            Currency::Gel => "GEL",
            Currency::Kgs => "KGS",
            Currency::Kzt => "KZT",
            Currency::Rur => "RUR",
            Currency::Uah => "UAH",
            Currency::Usd => "USD",
            Currency::Uzs => "UZS",
        }
    }
}

impl FromStr for Currency {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Currency::ALL
            .into_iter()
            .find(|c| c.code() == s)
            .ok_or_else(|| ReportError::UnknownCurrency(s.to_string()))
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
