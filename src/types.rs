use crate::currency::Currency;
use serde::Serialize;
use tabled::Tabled;

/// One normalized vacancy, salary already converted to rubles.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VacancyRecord {
    pub title: String,
    pub area_name: String,
    pub year: i32,
    pub salary_currency: Currency,
    pub salary: i64,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct YearStatRow {
    #[serde(rename = "Year")]
    #[tabled(rename = "Year")]
    pub year: i32,
    #[serde(rename = "AvgSalary")]
    #[tabled(rename = "AvgSalary")]
    pub avg_salary: String,
    #[serde(rename = "AvgSalarySelected")]
    #[tabled(rename = "AvgSalarySelected")]
    pub avg_salary_selected: String,
    #[serde(rename = "Count")]
    #[tabled(rename = "Count")]
    pub count: String,
    #[serde(rename = "CountSelected")]
    #[tabled(rename = "CountSelected")]
    pub count_selected: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct CitySalaryRow {
    #[serde(rename = "City")]
    #[tabled(rename = "City")]
    pub city: String,
    #[serde(rename = "AvgSalary")]
    #[tabled(rename = "AvgSalary")]
    pub avg_salary: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct CityShareRow {
    #[serde(rename = "City")]
    #[tabled(rename = "City")]
    pub city: String,
    #[serde(rename = "Share")]
    #[tabled(rename = "Share")]
    pub share: String,
}
