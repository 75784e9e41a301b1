// Entry point and high-level CLI flow.
//
// - Ask for (or take from flags) the input file, the vacancy name and the
//   output choice.
// - Load and clean the CSV, printing row diagnostics.
// - Aggregate, preview the tables, and write either the spreadsheet or the
//   PDF report together with a JSON summary.
use clap::Parser;
use std::io;
use vacancy_report::config::{Cli, OutputMode, RunConfig};
use vacancy_report::logging::{init_logging, level_from_flags};
use vacancy_report::util::format_int;
use vacancy_report::{aggregate, loader, output, pdf, spreadsheet, Result};

fn run(cfg: &RunConfig) -> Result<()> {
    let (records, load_report) = loader::load_records(&cfg.input)?;
    println!(
        "Processing dataset... ({} rows read, {} vacancies loaded)",
        format_int(load_report.total_rows),
        format_int(load_report.loaded_rows)
    );
    if load_report.dropped_rows > 0 {
        println!(
            "Note: {} incomplete rows skipped.",
            format_int(load_report.dropped_rows)
        );
    }
    println!();

    let stats = aggregate(&records, &cfg.vacancy_name)?;
    output::preview_stats(&stats);

    std::fs::create_dir_all(&cfg.out_dir)?;
    let report_path = cfg.report_path();
    match cfg.mode {
        OutputMode::Spreadsheet => spreadsheet::write_xlsx(&report_path, &stats)?,
        OutputMode::Pdf => pdf::write_pdf(&report_path, &stats)?,
    }
    output::write_json(cfg.summary_path(), &stats)?;

    println!("Report saved to {}", report_path.display());
    println!("Summary saved to {}", cfg.summary_path().display());
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = init_logging(level_from_flags(cli.verbose, cli.quiet)) {
        eprintln!("error: failed to initialize logging: {e}");
        std::process::exit(1);
    }

    let cfg = match cli.resolve(&mut io::stdin().lock()) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("error: failed to read input: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = run(&cfg) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
