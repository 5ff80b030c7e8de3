//! Concurrent movie query server: one worker task per client connection.

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use clap::error::ErrorKind;
use env_logger::Builder;
use log::LevelFilter;

use cinedex::server::{self, DispatchMode, ServerContext};

/// Serve movie queries over TCP with one worker per connection.
#[derive(Parser, Debug)]
#[command(name = "multiserver")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Args {
    /// Directory of movie data files to crawl and index
    directory_to_index: PathBuf,

    /// TCP port to listen on
    port_number: u16,

    /// Verbosity level (repeat for more detail)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    Builder::new()
        .filter_level(log_level)
        .format(|buf, record| writeln!(buf, "[{}] {}", record.level(), record.args()))
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(error) => {
            if matches!(error.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) {
                let _ = error.print();
            } else {
                println!("Incorrect number of arguments.");
                println!("Please use the following format when running the program:");
                println!("multiserver <directory_to_index> <port_number>");
            }
            // Usage problems exit cleanly, not as errors.
            return Ok(());
        }
    };
    init_logging(args.verbose);

    let context = ServerContext::build(&args.directory_to_index)?;
    let listener = server::bind(args.port_number).await?;
    server::serve(listener, Arc::new(context), DispatchMode::Concurrent).await?;
    Ok(())
}
