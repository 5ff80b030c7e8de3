//! Build the movie index and write a per-term report.

use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use env_logger::Builder;
use log::LevelFilter;

use cinedex::index::IndexField;
use cinedex::report;
use cinedex::server::ServerContext;

/// Build the movie index and report one field index term by term.
#[derive(Parser, Debug)]
#[command(name = "indexreport")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Args {
    /// Directory of movie data files to crawl and index
    directory_to_index: PathBuf,

    /// Report destination; stdout if omitted. A `.json` path gets JSON.
    output_file: Option<PathBuf>,

    /// Which field index to report on
    #[arg(short, long, default_value = "genre")]
    field: ReportField,

    /// Verbosity level (repeat for more detail)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum ReportField {
    Title,
    Genre,
    Year,
    Type,
    Id,
}

impl From<ReportField> for IndexField {
    fn from(field: ReportField) -> IndexField {
        match field {
            ReportField::Title => IndexField::Title,
            ReportField::Genre => IndexField::Genre,
            ReportField::Year => IndexField::Year,
            ReportField::Type => IndexField::Type,
            ReportField::Id => IndexField::Id,
        }
    }
}

fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    Builder::new()
        .filter_level(log_level)
        .format(|buf, record| writeln!(buf, "[{}] {}", record.level(), record.args()))
        .init();
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let context = ServerContext::build(&args.directory_to_index)?;
    let report = report::collect(&context.index, args.field.into());

    match &args.output_file {
        None => report::write_text(&report, &mut std::io::stdout())?,
        Some(path) if path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("json")) => {
            let mut file = File::create(path)?;
            writeln!(file, "{}", report::to_json(&report)?)?;
        }
        Some(path) => {
            let mut file = File::create(path)?;
            report::write_text(&report, &mut file)?;
        }
    }
    Ok(())
}
