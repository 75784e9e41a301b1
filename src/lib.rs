//! Vacancy statistics: loads a CSV export of vacancies, aggregates salary
//! and count series by year and by city, and renders them as a spreadsheet
//! or a one-page PDF report.

pub mod config;
pub mod currency;
pub mod error;
pub mod loader;
pub mod logging;
pub mod normalizer;
pub mod output;
pub mod pdf;
pub mod spreadsheet;
pub mod stats;
pub mod types;
pub mod util;

pub use error::{ReportError, Result};
pub use stats::{aggregate, AggregationResult};
pub use types::VacancyRecord;
