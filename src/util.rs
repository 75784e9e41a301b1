// Formatting helpers shared by the console, spreadsheet and PDF renderers.
use num_format::{Locale, ToFormattedString};

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    // Counts and salaries in console messages (e.g., `9,855 rows loaded`).
    n.to_formatted_string(&Locale::en)
}

/// Share in `0..=1` as a percentage with two decimals, e.g. `12.34%`.
pub fn format_percent(share: f64) -> String {
    format!("{:.2}%", share * 100.0)
}

/// Display width of a cell value, in characters rather than bytes so
/// Cyrillic city names are measured correctly.
pub fn text_width(s: &str) -> usize {
    s.chars().count()
}

/// Column width for a header plus its values: the widest entry plus two.
pub fn column_width<'a>(header: &str, values: impl IntoIterator<Item = &'a str>) -> f64 {
    let widest = values
        .into_iter()
        .map(text_width)
        .fold(text_width(header), usize::max);
    (widest + 2) as f64
}
