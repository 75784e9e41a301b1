use crate::error::Result;
use crate::stats::AggregationResult;
use crate::types::{CitySalaryRow, CityShareRow, YearStatRow};
use crate::util::{format_int, format_percent};
use serde::Serialize;
use std::path::Path;
use tabled::{settings::Style, Table, Tabled};
use tracing::info;

pub fn write_json<T: Serialize>(path: impl AsRef<Path>, value: &T) -> Result<()> {
    let s = serde_json::to_string_pretty(value)?;
    std::fs::write(path.as_ref(), s)?;
    info!(path = %path.as_ref().display(), "summary written");
    Ok(())
}

pub fn year_rows(stats: &AggregationResult) -> Vec<YearStatRow> {
    let at = |series: &crate::stats::YearSeries, year: &i32| {
        format_int(series.get(year).copied().unwrap_or(0))
    };
    stats
        .yearly_salary
        .iter()
        .map(|(year, salary)| YearStatRow {
            year: *year,
            avg_salary: format_int(*salary),
            avg_salary_selected: at(&stats.yearly_selected_salary, year),
            count: at(&stats.yearly_count, year),
            count_selected: at(&stats.yearly_selected_count, year),
        })
        .collect()
}

pub fn city_salary_rows(stats: &AggregationResult) -> Vec<CitySalaryRow> {
    stats
        .city_salary
        .iter()
        .map(|(city, salary)| CitySalaryRow {
            city: city.clone(),
            avg_salary: format_int(*salary),
        })
        .collect()
}

pub fn city_share_rows(stats: &AggregationResult) -> Vec<CityShareRow> {
    stats
        .city_shares
        .iter()
        .map(|(city, share)| CityShareRow {
            city: city.clone(),
            share: format_percent(*share),
        })
        .collect()
}

pub fn render_table<T>(rows: &[T]) -> Option<String>
where
    T: Tabled + Clone,
{
    if rows.is_empty() {
        return None;
    }
    let slice: Vec<T> = rows.to_vec();
    Some(Table::new(slice).with(Style::markdown()).to_string())
}

pub fn preview_table_rows<T>(rows: &[T])
where
    T: Tabled + Clone,
{
    match render_table(rows) {
        Some(table) => println!("{}\n", table),
        None => println!("(no rows)\n"),
    }
}

/// Print every series the way they end up in the report files.
pub fn preview_stats(stats: &AggregationResult) {
    println!("Salary and vacancy dynamics by year");
    println!("(Selected: titles containing {:?})\n", stats.vacancy_name);
    preview_table_rows(&year_rows(stats));

    println!("Salary level by city (descending)\n");
    preview_table_rows(&city_salary_rows(stats));

    println!("Vacancy share by city (descending)\n");
    preview_table_rows(&city_share_rows(stats));
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn sample() -> AggregationResult {
        AggregationResult {
            vacancy_name: "Dev".to_string(),
            total_records: 3,
            yearly_salary: BTreeMap::from([(2020, 150000), (2021, 300)]),
            yearly_selected_salary: BTreeMap::from([(2020, 0), (2021, 300)]),
            yearly_count: BTreeMap::from([(2020, 2), (2021, 1)]),
            yearly_selected_count: BTreeMap::from([(2020, 0), (2021, 1)]),
            city_salary: vec![("Moscow".to_string(), 200)],
            city_shares: vec![("Moscow".to_string(), 1.0)],
            other_cities_share: 0.0,
        }
    }

    #[test]
    fn year_rows_join_all_series() {
        let rows = year_rows(&sample());
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].year, 2020);
        assert_eq!(rows[0].avg_salary, "150,000");
        assert_eq!(rows[0].avg_salary_selected, "0");
        assert_eq!(rows[1].count_selected, "1");
    }

    #[test]
    fn share_rows_are_percentages() {
        let rows = city_share_rows(&sample());
        assert_eq!(rows[0].share, "100.00%");
    }

    #[test]
    fn markdown_table_has_headers() {
        let table = render_table(&city_salary_rows(&sample())).unwrap();
        assert!(table.contains("City"));
        assert!(table.contains("Moscow"));
        assert!(render_table::<CitySalaryRow>(&[]).is_none());
    }

    #[test]
    fn json_summary_is_written() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.json");
        write_json(&path, &sample()).unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["total_records"], 3);
        assert_eq!(value["yearly_salary"]["2020"], 150000);
        assert_eq!(value["city_shares"][0][0], "Moscow");
    }
}
