// Two-sheet workbook: yearly dynamics on the first sheet, the two city tables
// side by side on the second.
use crate::error::Result;
use crate::stats::AggregationResult;
use crate::util::{column_width, format_percent};
use rust_xlsxwriter::{Format, FormatBorder, Workbook, Worksheet};
use std::path::Path;
use tracing::info;

pub const YEAR_SHEET: &str = "Statistics by year";
pub const CITY_SHEET: &str = "Statistics by city";

/// Column headers of the year sheet for a given vacancy filter.
pub fn year_columns(vacancy_name: &str) -> [String; 5] {
    [
        "Year".to_string(),
        "Average salary".to_string(),
        format!("Average salary - {vacancy_name}"),
        "Vacancy count".to_string(),
        format!("Vacancy count - {vacancy_name}"),
    ]
}

pub fn write_xlsx(path: impl AsRef<Path>, stats: &AggregationResult) -> Result<()> {
    let header = Format::new().set_bold().set_border(FormatBorder::Thin);
    let cell = Format::new().set_border(FormatBorder::Thin);
    let percent = Format::new()
        .set_border(FormatBorder::Thin)
        .set_num_format("0.00%");

    let mut workbook = Workbook::new();
    workbook.push_worksheet(year_sheet(stats, &header, &cell)?);
    workbook.push_worksheet(city_sheet(stats, &header, &cell, &percent)?);
    workbook.save(path.as_ref())?;
    info!(path = %path.as_ref().display(), "spreadsheet written");
    Ok(())
}

fn year_sheet(stats: &AggregationResult, header: &Format, cell: &Format) -> Result<Worksheet> {
    let mut ws = Worksheet::new();
    ws.set_name(YEAR_SHEET)?;

    let columns = year_columns(&stats.vacancy_name);
    for (col, title) in columns.iter().enumerate() {
        ws.write_string_with_format(0, col as u16, title, header)?;
        ws.set_column_width(col as u16, column_width(title, []).max(6.0))?;
    }

    let series = [
        &stats.yearly_salary,
        &stats.yearly_selected_salary,
        &stats.yearly_count,
        &stats.yearly_selected_count,
    ];
    for (i, year) in stats.yearly_salary.keys().enumerate() {
        let row = i as u32 + 1;
        ws.write_number_with_format(row, 0, *year, cell)?;
        for (col, values) in series.iter().enumerate() {
            let value = values.get(year).copied().unwrap_or_default();
            ws.write_number_with_format(row, col as u16 + 1, value as f64, cell)?;
        }
    }
    Ok(ws)
}

fn city_sheet(
    stats: &AggregationResult,
    header: &Format,
    cell: &Format,
    percent: &Format,
) -> Result<Worksheet> {
    let mut ws = Worksheet::new();
    ws.set_name(CITY_SHEET)?;

    ws.write_string_with_format(0, 0, "City", header)?;
    ws.write_string_with_format(0, 1, "Salary level", header)?;
    for (i, (city, salary)) in stats.city_salary.iter().enumerate() {
        let row = i as u32 + 1;
        ws.write_string_with_format(row, 0, city, cell)?;
        ws.write_number_with_format(row, 1, *salary as f64, cell)?;
    }
    let salaries: Vec<String> = stats.city_salary.iter().map(|(_, s)| s.to_string()).collect();
    ws.set_column_width(0, column_width("City", stats.city_salary.iter().map(|(c, _)| c.as_str())))?;
    ws.set_column_width(1, column_width("Salary level", salaries.iter().map(String::as_str)))?;

    ws.set_column_width(2, 2)?;

    ws.write_string_with_format(0, 3, "City", header)?;
    ws.write_string_with_format(0, 4, "Vacancy share", header)?;
    for (i, (city, share)) in stats.city_shares.iter().enumerate() {
        let row = i as u32 + 1;
        ws.write_string_with_format(row, 3, city, cell)?;
        ws.write_number_with_format(row, 4, *share, percent)?;
    }
    let shares: Vec<String> = stats.city_shares.iter().map(|(_, s)| format_percent(*s)).collect();
    ws.set_column_width(3, column_width("City", stats.city_shares.iter().map(|(c, _)| c.as_str())))?;
    ws.set_column_width(4, column_width("Vacancy share", shares.iter().map(String::as_str)))?;
    Ok(ws)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn year_columns_mention_the_filter() {
        let cols = year_columns("Программист");
        assert_eq!(cols[0], "Year");
        assert_eq!(cols[2], "Average salary - Программист");
        assert_eq!(cols[4], "Vacancy count - Программист");
    }
}
