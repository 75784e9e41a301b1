// Turns one raw CSV row into a `VacancyRecord`.
//
// Rows reach this module only after the loader has checked arity and empty
// fields, so every failure here is a real data error and is propagated.
use crate::currency::Currency;
use crate::error::{ReportError, Result};
use crate::types::VacancyRecord;
use std::collections::HashMap;

pub const FIELD_NAME: &str = "name";
pub const FIELD_AREA_NAME: &str = "area_name";
pub const FIELD_PUBLISHED_AT: &str = "published_at";
pub const FIELD_SALARY_CURRENCY: &str = "salary_currency";
pub const FIELD_SALARY_FROM: &str = "salary_from";
pub const FIELD_SALARY_TO: &str = "salary_to";

pub const RECOGNIZED_FIELDS: [&str; 6] = [
    FIELD_NAME,
    FIELD_AREA_NAME,
    FIELD_PUBLISHED_AT,
    FIELD_SALARY_CURRENCY,
    FIELD_SALARY_FROM,
    FIELD_SALARY_TO,
];

impl VacancyRecord {
    /// Build a record from a `field name -> raw value` mapping.
    ///
    /// Every recognized field must be present. Columns outside
    /// [`RECOGNIZED_FIELDS`] are ignored.
    pub fn from_fields(fields: &HashMap<&str, &str>) -> Result<Self> {
        let get = |name: &str| -> Result<&str> {
            fields
                .get(name)
                .copied()
                .ok_or_else(|| ReportError::MissingField(name.to_string()))
        };

        let salary_currency: Currency = get(FIELD_SALARY_CURRENCY)?.parse()?;
        Ok(VacancyRecord {
            title: get(FIELD_NAME)?.to_string(),
            area_name: get(FIELD_AREA_NAME)?.to_string(),
            year: parse_year(get(FIELD_PUBLISHED_AT)?)?,
            salary_currency,
            salary: parse_salary(get(FIELD_SALARY_FROM)?, get(FIELD_SALARY_TO)?, salary_currency)?,
        })
    }
}

/// Year component of a timestamp like `2022-07-05T18:19:30+0300`.
pub fn parse_year(published_at: &str) -> Result<i32> {
    let date = published_at.split('T').next().unwrap_or_default();
    let year = date.split('-').next().unwrap_or_default();
    year.trim()
        .parse::<i32>()
        .map_err(|_| ReportError::InvalidDate(published_at.to_string()))
}

/// Ruble salary: the floored midpoint of the bounds times the currency rate,
/// truncated to an integer.
pub fn parse_salary(from: &str, to: &str, currency: Currency) -> Result<i64> {
    let from = parse_bound(from)?;
    let to = parse_bound(to)?;
    let midpoint = ((from + to) / 2.0).floor();
    Ok((midpoint * currency.rate()).trunc() as i64)
}

fn parse_bound(s: &str) -> Result<f64> {
    match s.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(ReportError::InvalidSalary(s.to_string())),
    }
}
