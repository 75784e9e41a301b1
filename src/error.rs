#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Spreadsheet error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("PDF error: {0}")]
    Pdf(#[from] printpdf::Error),

    #[error("Input file has no header row")]
    MissingHeader,

    #[error("Missing field: {0}")]
    MissingField(String),

    #[error("Invalid publication date: {0:?}")]
    InvalidDate(String),

    #[error("Invalid salary bound: {0:?}")]
    InvalidSalary(String),

    #[error("Unknown currency code: {0:?}")]
    UnknownCurrency(String),

    #[error("No vacancies to aggregate")]
    EmptyDataset,
}

pub type Result<T> = std::result::Result<T, ReportError>;
