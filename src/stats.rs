// Salary and vacancy-count statistics by year and by city.
//
// Aggregation is one pass that fills per-year and per-city accumulators,
// followed by a handful of pure steps over those (small) maps.
use crate::error::{ReportError, Result};
use crate::types::VacancyRecord;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::{debug, info};

/// How many cities the city series expose.
pub const CITY_LIMIT: usize = 10;

pub type YearSeries = BTreeMap<i32, i64>;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregationResult {
    pub vacancy_name: String,
    pub total_records: usize,
    pub yearly_salary: YearSeries,
    pub yearly_selected_salary: YearSeries,
    pub yearly_count: YearSeries,
    pub yearly_selected_count: YearSeries,
    /// Top cities by average salary, highest first.
    pub city_salary: Vec<(String, i64)>,
    /// Top cities by share of all vacancies, highest first.
    pub city_shares: Vec<(String, f64)>,
    /// Combined share of the retained cities that did not make the top list.
    pub other_cities_share: f64,
}

#[derive(Debug, Default, Clone, Copy)]
struct SumCount {
    sum: i64,
    count: i64,
}

impl SumCount {
    fn add(&mut self, salary: i64) {
        self.sum += salary;
        self.count += 1;
    }

    fn average(self) -> i64 {
        if self.count == 0 {
            0
        } else {
            self.sum.div_euclid(self.count)
        }
    }
}

#[derive(Debug, Default)]
struct YearAcc {
    all: SumCount,
    selected: SumCount,
}

#[derive(Debug)]
struct CityAcc {
    name: String,
    salary: SumCount,
}

#[derive(Debug, Default)]
struct Accumulators {
    total: usize,
    years: BTreeMap<i32, YearAcc>,
    /// Cities in encounter order.
    cities: Vec<CityAcc>,
}

fn accumulate(records: &[VacancyRecord], vacancy_name: &str) -> Accumulators {
    let mut acc = Accumulators::default();
    let mut city_index: HashMap<&str, usize> = HashMap::new();

    for r in records {
        acc.total += 1;

        let idx = *city_index.entry(r.area_name.as_str()).or_insert_with(|| {
            acc.cities.push(CityAcc {
                name: r.area_name.clone(),
                salary: SumCount::default(),
            });
            acc.cities.len() - 1
        });
        acc.cities[idx].salary.add(r.salary);

        let year = acc.years.entry(r.year).or_default();
        year.all.add(r.salary);
        if r.title.contains(vacancy_name) {
            year.selected.add(r.salary);
        }
    }
    acc
}

/// Share of each city that holds at least one percent (floored) of all
/// vacancies, rounded to four decimals, highest first.
fn city_shares(cities: &[CityAcc], total: usize) -> Vec<(String, f64)> {
    let threshold = (total / 100) as i64;
    let mut kept: Vec<(&CityAcc, f64)> = cities
        .iter()
        .filter(|c| c.salary.count >= threshold)
        .map(|c| (c, c.salary.count as f64 / total as f64))
        .collect();
    kept.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
    kept.into_iter()
        .map(|(c, share)| (c.name.clone(), round4(share)))
        .collect()
}

fn yearly_average(years: &BTreeMap<i32, YearAcc>) -> YearSeries {
    years.iter().map(|(y, acc)| (*y, acc.all.average())).collect()
}

fn selected_average(years: &BTreeMap<i32, YearAcc>) -> YearSeries {
    years.iter().map(|(y, acc)| (*y, acc.selected.average())).collect()
}

fn yearly_count(years: &BTreeMap<i32, YearAcc>) -> YearSeries {
    years.iter().map(|(y, acc)| (*y, acc.all.count)).collect()
}

fn selected_count(years: &BTreeMap<i32, YearAcc>) -> YearSeries {
    years.iter().map(|(y, acc)| (*y, acc.selected.count)).collect()
}

/// Average salary of the cities that passed the share threshold, highest
/// first; ties keep encounter order.
fn city_salaries(cities: &[CityAcc], shares: &[(String, f64)]) -> Vec<(String, i64)> {
    let retained: HashSet<&str> = shares.iter().map(|(c, _)| c.as_str()).collect();
    let mut rows: Vec<(String, i64)> = cities
        .iter()
        .filter(|c| retained.contains(c.name.as_str()))
        .map(|c| (c.name.clone(), c.salary.average()))
        .collect();
    rows.sort_by(|a, b| b.1.cmp(&a.1));
    rows
}

/// Four decimal places, ties to even on the exact binary value
/// (`1/32 = 0.03125` becomes `0.0312`).
fn round4(v: f64) -> f64 {
    // Formatting a finite f64 always yields a parseable literal.
    format!("{v:.4}").parse().unwrap_or(v)
}

pub fn aggregate(records: &[VacancyRecord], vacancy_name: &str) -> Result<AggregationResult> {
    if records.is_empty() {
        return Err(ReportError::EmptyDataset);
    }
    let acc = accumulate(records, vacancy_name);

    let mut shares = city_shares(&acc.cities, acc.total);
    let mut salaries = city_salaries(&acc.cities, &shares);
    debug!(
        years = acc.years.len(),
        cities = acc.cities.len(),
        retained_cities = shares.len(),
        "accumulated"
    );

    let other_cities_share = round4(shares.iter().skip(CITY_LIMIT).map(|(_, s)| s).sum());
    shares.truncate(CITY_LIMIT);
    salaries.truncate(CITY_LIMIT);

    let result = AggregationResult {
        vacancy_name: vacancy_name.to_string(),
        total_records: acc.total,
        yearly_salary: yearly_average(&acc.years),
        yearly_selected_salary: selected_average(&acc.years),
        yearly_count: yearly_count(&acc.years),
        yearly_selected_count: selected_count(&acc.years),
        city_salary: salaries,
        city_shares: shares,
        other_cities_share,
    };
    info!(
        records = result.total_records,
        selected = result.yearly_selected_count.values().sum::<i64>(),
        "statistics computed"
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::currency::Currency;

    fn rec(title: &str, city: &str, year: i32, salary: i64) -> VacancyRecord {
        VacancyRecord {
            title: title.to_string(),
            area_name: city.to_string(),
            year,
            salary_currency: Currency::Rur,
            salary,
        }
    }

    #[test]
    fn single_city_scenario() {
        let records = vec![
            rec("Analyst", "Moscow", 2020, 100),
            rec("Analyst", "Moscow", 2020, 200),
            rec("Manager", "Moscow", 2021, 300),
        ];
        let r = aggregate(&records, "Dev").unwrap();
        assert_eq!(r.yearly_salary, BTreeMap::from([(2020, 150), (2021, 300)]));
        assert_eq!(r.yearly_selected_salary, BTreeMap::from([(2020, 0), (2021, 0)]));
        assert_eq!(r.yearly_count, BTreeMap::from([(2020, 2), (2021, 1)]));
        assert_eq!(r.yearly_selected_count, BTreeMap::from([(2020, 0), (2021, 0)]));
        assert_eq!(r.city_shares, vec![("Moscow".to_string(), 1.0)]);
        assert_eq!(r.city_salary, vec![("Moscow".to_string(), 200)]);
        assert_eq!(r.other_cities_share, 0.0);
    }

    #[test]
    fn empty_input_is_an_error() {
        assert!(matches!(aggregate(&[], "Dev"), Err(ReportError::EmptyDataset)));
    }

    #[test]
    fn selected_stats_follow_title_substring() {
        let records = vec![
            rec("Senior Dev", "A", 2020, 100),
            rec("Dev lead", "A", 2020, 301),
            rec("QA", "A", 2020, 1000),
            rec("QA", "A", 2021, 10),
        ];
        let r = aggregate(&records, "Dev").unwrap();
        assert_eq!(r.yearly_selected_salary, BTreeMap::from([(2020, 200), (2021, 0)]));
        assert_eq!(r.yearly_selected_count, BTreeMap::from([(2020, 2), (2021, 0)]));
        assert_eq!(r.yearly_salary[&2020], 467);
    }

    #[test]
    fn empty_filter_selects_everything() {
        let records = vec![rec("QA", "A", 2020, 100), rec("Dev", "A", 2020, 200)];
        let r = aggregate(&records, "").unwrap();
        assert_eq!(r.yearly_selected_salary, r.yearly_salary);
        assert_eq!(r.yearly_selected_count, r.yearly_count);
    }

    #[test]
    fn cities_below_one_percent_are_dropped() {
        // 200 records: threshold is 2 vacancies.
        let mut records = Vec::new();
        for _ in 0..197 {
            records.push(rec("x", "Big", 2020, 100));
        }
        records.push(rec("x", "Pair", 2020, 500));
        records.push(rec("x", "Pair", 2020, 500));
        records.push(rec("x", "Lonely", 2020, 9000));

        let r = aggregate(&records, "x").unwrap();
        let cities: Vec<&str> = r.city_shares.iter().map(|(c, _)| c.as_str()).collect();
        assert_eq!(cities, vec!["Big", "Pair"]);
        assert_eq!(r.city_shares[0].1, 0.985);
        assert_eq!(r.city_shares[1].1, 0.01);

        let salary_cities: Vec<&str> = r.city_salary.iter().map(|(c, _)| c.as_str()).collect();
        assert_eq!(salary_cities, vec!["Pair", "Big"]);
    }

    #[test]
    fn shares_are_rounded_to_four_places() {
        let records = vec![
            rec("x", "A", 2020, 1),
            rec("x", "B", 2020, 1),
            rec("x", "B", 2020, 1),
        ];
        let r = aggregate(&records, "x").unwrap();
        assert_eq!(
            r.city_shares,
            vec![("B".to_string(), 0.6667), ("A".to_string(), 0.3333)]
        );
    }

    #[test]
    fn exact_halfway_shares_round_to_even() {
        let mut records: Vec<VacancyRecord> =
            (0..31).map(|_| rec("x", "Big", 2020, 100)).collect();
        records.push(rec("x", "Small", 2020, 100));
        let r = aggregate(&records, "x").unwrap();
        // 31/32 = 0.96875 and 1/32 = 0.03125, both exact ties.
        assert_eq!(
            r.city_shares,
            vec![("Big".to_string(), 0.9688), ("Small".to_string(), 0.0312)]
        );
        assert_eq!(round4(100.0 / 3200.0), 0.0312);
        assert_eq!(round4(5.0 / 32.0), 0.1562);
        assert_eq!(round4(2.0 / 3.0), 0.6667);
    }

    #[test]
    fn ties_keep_encounter_order() {
        let records = vec![
            rec("x", "C", 2020, 100),
            rec("x", "A", 2020, 100),
            rec("x", "B", 2020, 100),
        ];
        let r = aggregate(&records, "x").unwrap();
        let shares: Vec<&str> = r.city_shares.iter().map(|(c, _)| c.as_str()).collect();
        let salaries: Vec<&str> = r.city_salary.iter().map(|(c, _)| c.as_str()).collect();
        assert_eq!(shares, vec!["C", "A", "B"]);
        assert_eq!(salaries, vec!["C", "A", "B"]);
    }

    #[test]
    fn city_series_are_capped_at_ten() {
        let records: Vec<VacancyRecord> = (0..12)
            .map(|i| rec("x", &format!("City {i}"), 2020, 100 + i))
            .collect();
        let r = aggregate(&records, "x").unwrap();
        assert_eq!(r.city_salary.len(), CITY_LIMIT);
        assert_eq!(r.city_shares.len(), CITY_LIMIT);
        assert_eq!(r.city_salary[0], ("City 11".to_string(), 111));
        // Two cities of 1/12 each fall outside the top ten.
        assert_eq!(r.other_cities_share, round4(0.0833 * 2.0));
        let total: f64 = r.city_shares.iter().map(|(_, s)| s).sum();
        assert!(total <= 1.0);
    }

    #[test]
    fn fewer_than_ten_cities_are_not_padded() {
        let records = vec![rec("x", "A", 2020, 1), rec("x", "B", 2021, 2)];
        let r = aggregate(&records, "x").unwrap();
        assert_eq!(r.city_salary.len(), 2);
        assert_eq!(r.city_shares.len(), 2);
    }

    #[test]
    fn averages_use_floor_division() {
        let records = vec![rec("x", "A", 2020, -3), rec("x", "A", 2020, 0)];
        let r = aggregate(&records, "x").unwrap();
        assert_eq!(r.yearly_salary[&2020], -2);
    }

    #[test]
    fn repeated_runs_are_identical() {
        let records = vec![
            rec("Dev", "A", 2019, 10),
            rec("QA", "B", 2020, 20),
            rec("Dev", "B", 2021, 30),
        ];
        assert_eq!(
            aggregate(&records, "Dev").unwrap(),
            aggregate(&records, "Dev").unwrap()
        );
    }
}
