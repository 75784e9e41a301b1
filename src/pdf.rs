// One-page PDF report: four charts drawn as vector shapes followed by the
// year table and the two city tables.
//
// Coordinates are millimetres from the bottom-left corner of an A4 page.
use crate::error::Result;
use crate::spreadsheet::year_columns;
use crate::stats::{AggregationResult, YearSeries};
use crate::util::{format_int, format_percent};
use chrono::Local;
use printpdf::path::{PaintMode, WindingOrder};
use printpdf::{
    Color, IndirectFontRef, Line, Mm, PdfDocument, PdfLayerReference, Point, Polygon, Rect, Rgb,
};
use std::f32::consts::PI;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use tracing::{debug, info};

const PAGE_W: f32 = 210.0;
const PAGE_H: f32 = 297.0;
const MARGIN: f32 = 12.0;
const PT_TO_MM: f32 = 0.3528;

// City names and vacancy titles are mostly Cyrillic, which the PDF base-14
// fonts cannot encode.
const REGULAR_FONT: &[u8] = include_bytes!("../assets/fonts/DejaVuSans.ttf");
const BOLD_FONT: &[u8] = include_bytes!("../assets/fonts/DejaVuSans-Bold.ttf");

const ALL_COLOR: (f32, f32, f32) = (0.12, 0.47, 0.71);
const SELECTED_COLOR: (f32, f32, f32) = (1.0, 0.50, 0.05);
const GRID_COLOR: (f32, f32, f32) = (0.85, 0.85, 0.85);
const TEXT_COLOR: (f32, f32, f32) = (0.0, 0.0, 0.0);
const PIE_COLORS: [(f32, f32, f32); 11] = [
    (0.12, 0.47, 0.71),
    (1.0, 0.50, 0.05),
    (0.17, 0.63, 0.17),
    (0.84, 0.15, 0.16),
    (0.58, 0.40, 0.74),
    (0.55, 0.34, 0.29),
    (0.89, 0.47, 0.76),
    (0.50, 0.50, 0.50),
    (0.74, 0.74, 0.13),
    (0.09, 0.75, 0.81),
    (0.78, 0.78, 0.78),
];

#[derive(Debug, Clone, Copy)]
struct Frame {
    x: f32,
    y: f32,
    w: f32,
    h: f32,
}

struct Canvas {
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

impl Canvas {
    fn fill(&self, (r, g, b): (f32, f32, f32)) {
        self.layer.set_fill_color(Color::Rgb(Rgb::new(r, g, b, None)));
    }

    fn stroke(&self, (r, g, b): (f32, f32, f32), thickness: f32) {
        self.layer.set_outline_color(Color::Rgb(Rgb::new(r, g, b, None)));
        self.layer.set_outline_thickness(thickness);
    }

    fn text(&self, s: &str, size: f32, x: f32, y: f32) {
        self.fill(TEXT_COLOR);
        self.layer.use_text(s, size, Mm(x), Mm(y), &self.regular);
    }

    fn bold_text(&self, s: &str, size: f32, x: f32, y: f32) {
        self.fill(TEXT_COLOR);
        self.layer.use_text(s, size, Mm(x), Mm(y), &self.bold);
    }

    fn centered_text(&self, s: &str, size: f32, cx: f32, y: f32) {
        self.text(s, size, cx - text_len(s, size) / 2.0, y);
    }

    fn rect(&self, x: f32, y: f32, w: f32, h: f32, mode: PaintMode) {
        self.layer
            .add_rect(Rect::new(Mm(x), Mm(y), Mm(x + w), Mm(y + h)).with_mode(mode));
    }

    fn line(&self, x1: f32, y1: f32, x2: f32, y2: f32) {
        self.layer.add_line(Line {
            points: vec![
                (Point::new(Mm(x1), Mm(y1)), false),
                (Point::new(Mm(x2), Mm(y2)), false),
            ],
            is_closed: false,
        });
    }

    fn polygon(&self, points: Vec<(f32, f32)>) {
        let ring = points
            .into_iter()
            .map(|(x, y)| (Point::new(Mm(x), Mm(y)), false))
            .collect();
        self.layer.add_polygon(Polygon {
            rings: vec![ring],
            mode: PaintMode::FillStroke,
            winding_order: WindingOrder::NonZero,
        });
    }
}

/// Rough width of DejaVu Sans text; good enough for centring labels.
fn text_len(s: &str, size: f32) -> f32 {
    s.chars().count() as f32 * size * PT_TO_MM * 0.5
}

/// Length of a bar for `value` on an axis where `top` spans `span` mm.
/// Negative values draw nothing rather than extending below the axis.
fn bar_len(value: i64, top: f32, span: f32) -> f32 {
    (span * value as f32 / top).max(0.0)
}

fn truncate_label(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_chars.saturating_sub(1)).collect();
        format!("{head}.")
    }
}

pub fn write_pdf(path: impl AsRef<Path>, stats: &AggregationResult) -> Result<()> {
    let title = format!("Salary and city analytics for \"{}\"", stats.vacancy_name);
    let (doc, page, layer) = PdfDocument::new(&title, Mm(PAGE_W), Mm(PAGE_H), "Report");
    let canvas = Canvas {
        layer: doc.get_page(page).get_layer(layer),
        regular: doc.add_external_font(REGULAR_FONT)?,
        bold: doc.add_external_font(BOLD_FONT)?,
    };

    canvas.bold_text(&title, 14.0, MARGIN, PAGE_H - MARGIN - 4.0);

    let half = (PAGE_W - 2.0 * MARGIN) / 2.0;
    let chart_h = 62.0;
    let top_row = PAGE_H - MARGIN - 12.0 - chart_h;
    let bottom_row = top_row - chart_h - 6.0;
    let left = Frame { x: MARGIN, y: top_row, w: half - 4.0, h: chart_h };
    let right = Frame { x: MARGIN + half + 4.0, y: top_row, w: half - 4.0, h: chart_h };

    let name = stats.vacancy_name.to_lowercase();
    let selected_salary = format!("salary: {name}");
    let selected_count = format!("count: {name}");
    grouped_bars(
        &canvas,
        left,
        "Salary level by year",
        &stats.yearly_salary,
        &stats.yearly_selected_salary,
        ("average salary", selected_salary.as_str()),
    );
    grouped_bars(
        &canvas,
        right,
        "Vacancy count by year",
        &stats.yearly_count,
        &stats.yearly_selected_count,
        ("vacancy count", selected_count.as_str()),
    );
    horizontal_bars(
        &canvas,
        Frame { y: bottom_row, ..left },
        "Salary level by city",
        &stats.city_salary,
    );
    share_pie(
        &canvas,
        Frame { y: bottom_row, ..right },
        "Vacancy share by city",
        &stats.city_shares,
        stats.other_cities_share,
    );

    let tables_top = bottom_row - 8.0;
    tables(&canvas, stats, tables_top);

    let generated = format!("Generated {}", Local::now().format("%Y-%m-%d %H:%M"));
    canvas.text(&generated, 6.0, MARGIN, MARGIN / 2.0);

    doc.save(&mut BufWriter::new(File::create(path.as_ref())?))?;
    info!(path = %path.as_ref().display(), "pdf report written");
    Ok(())
}

/// Value axis: draws grid lines with labels and returns the scale top.
fn value_axis(canvas: &Canvas, plot: Frame, max: i64) -> f32 {
    let top = (max.max(1) as f32) * 1.1;
    canvas.stroke(GRID_COLOR, 0.3);
    for step in 0..=4 {
        let v = top * step as f32 / 4.0;
        let y = plot.y + plot.h * step as f32 / 4.0;
        canvas.line(plot.x, y, plot.x + plot.w, y);
        let label = format_int(v as i64);
        canvas.text(&label, 4.5, plot.x - text_len(&label, 4.5) - 1.0, y - 0.6);
    }
    top
}

fn legend(canvas: &Canvas, x: f32, y: f32, entries: &[((f32, f32, f32), &str)]) {
    for (i, (color, label)) in entries.iter().enumerate() {
        let ly = y - i as f32 * 3.2;
        canvas.fill(*color);
        canvas.rect(x, ly, 2.2, 2.2, PaintMode::Fill);
        canvas.text(label, 5.0, x + 3.0, ly + 0.3);
    }
}

fn grouped_bars(
    canvas: &Canvas,
    frame: Frame,
    title: &str,
    all: &YearSeries,
    selected: &YearSeries,
    labels: (&str, &str),
) {
    canvas.centered_text(title, 8.0, frame.x + frame.w / 2.0, frame.y + frame.h - 3.0);
    let plot = Frame {
        x: frame.x + 12.0,
        y: frame.y + 8.0,
        w: frame.w - 14.0,
        h: frame.h - 16.0,
    };
    let max = all.values().chain(selected.values()).copied().max().unwrap_or(0);
    let top = value_axis(canvas, plot, max);

    let slot = plot.w / all.len().max(1) as f32;
    let bar = slot * 0.35;
    for (i, (year, value)) in all.iter().enumerate() {
        let x = plot.x + slot * i as f32 + slot / 2.0;
        let sel = selected.get(year).copied().unwrap_or(0);
        canvas.fill(ALL_COLOR);
        canvas.rect(x - bar, plot.y, bar, bar_len(*value, top, plot.h), PaintMode::Fill);
        canvas.fill(SELECTED_COLOR);
        canvas.rect(x, plot.y, bar, bar_len(sel, top, plot.h), PaintMode::Fill);
        canvas.centered_text(&year.to_string(), 4.5, x, plot.y - 3.5);
    }
    legend(
        canvas,
        plot.x + 2.0,
        plot.y + plot.h - 3.0,
        &[(ALL_COLOR, labels.0), (SELECTED_COLOR, labels.1)],
    );
}

fn horizontal_bars(canvas: &Canvas, frame: Frame, title: &str, rows: &[(String, i64)]) {
    canvas.centered_text(title, 8.0, frame.x + frame.w / 2.0, frame.y + frame.h - 3.0);
    let plot = Frame {
        x: frame.x + 24.0,
        y: frame.y + 4.0,
        w: frame.w - 26.0,
        h: frame.h - 12.0,
    };
    let max = rows.iter().map(|(_, v)| *v).max().unwrap_or(0).max(1) as f32 * 1.1;

    canvas.stroke(GRID_COLOR, 0.3);
    for step in 0..=4 {
        let x = plot.x + plot.w * step as f32 / 4.0;
        canvas.line(x, plot.y, x, plot.y + plot.h);
    }

    let slot = plot.h / rows.len().max(1) as f32;
    for (i, (city, value)) in rows.iter().enumerate() {
        // Highest salary at the top.
        let y = plot.y + plot.h - slot * (i as f32 + 1.0);
        canvas.fill(ALL_COLOR);
        canvas.rect(plot.x, y + slot * 0.15, bar_len(*value, max, plot.w), slot * 0.7, PaintMode::Fill);
        let label = truncate_label(city, 22);
        canvas.text(&label, 4.5, plot.x - text_len(&label, 4.5) - 1.0, y + slot / 2.0 - 0.6);
    }
}

fn share_pie(canvas: &Canvas, frame: Frame, title: &str, shares: &[(String, f64)], other: f64) {
    canvas.centered_text(title, 8.0, frame.x + frame.w / 2.0, frame.y + frame.h - 3.0);

    let mut slices: Vec<(String, f64)> = shares.to_vec();
    if other > 0.0 {
        slices.push(("Other".to_string(), other));
    }
    let total: f64 = slices.iter().map(|(_, s)| s).sum();
    if total <= 0.0 {
        return;
    }

    let radius = (frame.h - 12.0) / 2.0;
    let (cx, cy) = (frame.x + radius + 4.0, frame.y + frame.h / 2.0 - 3.0);
    canvas.stroke((1.0, 1.0, 1.0), 0.3);

    let mut start = PI / 2.0;
    for (i, (city, share)) in slices.iter().enumerate() {
        let sweep = 2.0 * PI * (*share / total) as f32;
        let steps = ((sweep / (PI / 90.0)).ceil() as usize).max(1);
        let mut points = vec![(cx, cy)];
        for s in 0..=steps {
            let a = start - sweep * s as f32 / steps as f32;
            points.push((cx + radius * a.cos(), cy + radius * a.sin()));
        }
        let color = PIE_COLORS[i % PIE_COLORS.len()];
        canvas.fill(color);
        canvas.polygon(points);
        start -= sweep;

        let ly = frame.y + frame.h - 10.0 - i as f32 * 4.0;
        let lx = cx + radius + 6.0;
        canvas.fill(color);
        canvas.rect(lx, ly, 2.2, 2.2, PaintMode::Fill);
        let label = format!("{} {}", truncate_label(city, 18), format_percent(*share));
        canvas.text(&label, 4.5, lx + 3.0, ly + 0.3);
    }
}

fn table(
    canvas: &Canvas,
    x: f32,
    top: f32,
    row_h: f32,
    widths: &[f32],
    header: &[String],
    rows: &[Vec<String>],
) -> f32 {
    canvas.stroke(TEXT_COLOR, 0.2);
    let mut y = top;
    for (r, cells) in std::iter::once(header).chain(rows.iter().map(Vec::as_slice)).enumerate() {
        y -= row_h;
        let mut cx = x;
        for (cell, w) in cells.iter().zip(widths) {
            canvas.rect(cx, y, *w, row_h, PaintMode::Stroke);
            let size = (row_h * 1.6).min(7.0);
            let label = truncate_label(cell, (*w / (size * PT_TO_MM * 0.5)) as usize);
            if r == 0 {
                canvas.bold_text(&label, size, cx + 1.0, y + row_h * 0.3);
            } else {
                canvas.text(&label, size, cx + (w - text_len(&label, size)) / 2.0, y + row_h * 0.3);
            }
            cx += w;
        }
    }
    y
}

fn tables(canvas: &Canvas, stats: &AggregationResult, top: f32) {
    let year_rows: Vec<Vec<String>> = stats
        .yearly_salary
        .iter()
        .map(|(year, salary)| {
            vec![
                year.to_string(),
                salary.to_string(),
                value_at(&stats.yearly_selected_salary, *year),
                value_at(&stats.yearly_count, *year),
                value_at(&stats.yearly_selected_count, *year),
            ]
        })
        .collect();
    let city_salary_rows: Vec<Vec<String>> = stats
        .city_salary
        .iter()
        .map(|(c, s)| vec![c.clone(), s.to_string()])
        .collect();
    let city_share_rows: Vec<Vec<String>> = stats
        .city_shares
        .iter()
        .map(|(c, s)| vec![c.clone(), format_percent(*s)])
        .collect();

    // Header rows and the two section titles share the remaining height.
    let city_len = city_salary_rows.len().max(city_share_rows.len());
    let lines = year_rows.len() + city_len + 2 + 4;
    let row_h = ((top - MARGIN) / lines as f32).clamp(2.5, 5.0);
    debug!(row_h, lines, "table layout");

    let width = PAGE_W - 2.0 * MARGIN;
    canvas.bold_text("Statistics by year", 9.0, MARGIN, top - row_h);
    let header = year_columns(&stats.vacancy_name);
    let widths = [width * 0.12, width * 0.2, width * 0.24, width * 0.2, width * 0.24];
    let y = table(canvas, MARGIN, top - row_h * 1.5, row_h, &widths, &header, &year_rows);

    let city_top = y - row_h * 0.5;
    canvas.bold_text("Statistics by city", 9.0, MARGIN, city_top - row_h);
    let half = width / 2.0;
    let widths = [half * 0.6, half * 0.35];
    table(
        canvas,
        MARGIN,
        city_top - row_h * 1.5,
        row_h,
        &widths,
        &["City".to_string(), "Salary level".to_string()],
        &city_salary_rows,
    );
    table(
        canvas,
        MARGIN + half,
        city_top - row_h * 1.5,
        row_h,
        &widths,
        &["City".to_string(), "Vacancy share".to_string()],
        &city_share_rows,
    );
}

fn value_at(series: &YearSeries, year: i32) -> String {
    series.get(&year).copied().unwrap_or(0).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_labels_are_shortened() {
        assert_eq!(truncate_label("Moscow", 10), "Moscow");
        assert_eq!(truncate_label("Санкт-Петербург", 6), "Санкт.");
    }

    #[test]
    fn negative_values_draw_empty_bars() {
        assert_eq!(bar_len(-500, 1000.0, 50.0), 0.0);
        assert_eq!(bar_len(0, 1000.0, 50.0), 0.0);
        assert_eq!(bar_len(500, 1000.0, 50.0), 25.0);
    }

    #[test]
    fn cyrillic_labels_use_embedded_font() {
        let stats = AggregationResult {
            vacancy_name: "Программист".to_string(),
            total_records: 1,
            yearly_salary: YearSeries::from([(2022, 100)]),
            yearly_selected_salary: YearSeries::from([(2022, 100)]),
            yearly_count: YearSeries::from([(2022, 1)]),
            yearly_selected_count: YearSeries::from([(2022, 1)]),
            city_salary: vec![("Москва".to_string(), 100)],
            city_shares: vec![("Москва".to_string(), 1.0)],
            other_cities_share: 0.0,
        };
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.pdf");
        write_pdf(&path, &stats).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        let has = |needle: &[u8]| bytes.windows(needle.len()).any(|w| w == needle);
        assert!(has(b"DejaVuSans"));
        assert!(!has(b"Helvetica"));
    }

    #[test]
    fn text_length_grows_with_size() {
        assert!(text_len("2020", 8.0) > text_len("2020", 4.0));
        assert_eq!(text_len("", 8.0), 0.0);
    }
}
