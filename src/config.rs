// Run configuration: command-line flags, with interactive prompts for
// whatever the flags leave out.
use clap::Parser;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "vacancy_report",
    version,
    about = "Salary and city statistics for vacancy exports"
)]
pub struct Cli {
    /// CSV file with vacancies.
    #[arg(long, short = 'i', value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Substring of the vacancy title to report separately.
    #[arg(long, value_name = "NAME")]
    pub vacancy: Option<String>,

    /// Output choice: "Вакансии" for the spreadsheet, anything else for the PDF.
    #[arg(long, value_name = "CHOICE")]
    pub mode: Option<String>,

    /// Directory for the generated files.
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub out_dir: PathBuf,

    /// More logging (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Errors only.
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Spreadsheet,
    Pdf,
}

impl OutputMode {
    pub fn from_choice(choice: &str) -> Self {
        let choice = choice.trim();
        if choice == "Вакансии" || choice.eq_ignore_ascii_case("vacancies") {
            OutputMode::Spreadsheet
        } else {
            OutputMode::Pdf
        }
    }

    pub fn file_name(self) -> &'static str {
        match self {
            OutputMode::Spreadsheet => "report.xlsx",
            OutputMode::Pdf => "report.pdf",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub input: PathBuf,
    pub vacancy_name: String,
    pub mode: OutputMode,
    pub out_dir: PathBuf,
}

impl RunConfig {
    pub fn report_path(&self) -> PathBuf {
        self.out_dir.join(self.mode.file_name())
    }

    pub fn summary_path(&self) -> PathBuf {
        self.out_dir.join("summary.json")
    }
}

/// Print `label` and read one trimmed line.
fn prompt(input: &mut impl BufRead, label: &str) -> io::Result<String> {
    print!("{label}: ");
    io::stdout().flush()?;
    let mut buf = String::new();
    input.read_line(&mut buf)?;
    Ok(buf.trim_end_matches(['\r', '\n']).to_string())
}

impl Cli {
    /// Fill the missing settings from `input`, asking in the order file,
    /// vacancy name, output choice.
    pub fn resolve(self, input: &mut impl BufRead) -> io::Result<RunConfig> {
        let path = match self.input {
            Some(p) => p,
            None => PathBuf::from(prompt(input, "Enter the file name")?.trim()),
        };
        let vacancy_name = match self.vacancy {
            Some(v) => v,
            None => prompt(input, "Enter the vacancy name")?,
        };
        let choice = match self.mode {
            Some(m) => m,
            None => prompt(input, "Vacancies or Statistics?")?,
        };
        Ok(RunConfig {
            input: path,
            vacancy_name,
            mode: OutputMode::from_choice(&choice),
            out_dir: self.out_dir,
        })
    }
}
