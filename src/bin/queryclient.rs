//! Interactive movie query client.

use std::io::Write;

use clap::Parser;
use clap::error::ErrorKind;
use env_logger::Builder;
use log::LevelFilter;

use cinedex::client;

/// Query a movie server interactively.
#[derive(Parser, Debug)]
#[command(name = "queryclient")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Args {
    /// IP address of the movie query server
    ip_address: String,

    /// TCP port the server listens on
    port_number: u16,

    /// Verbosity level (repeat for more detail)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbosity: u8) {
    // Keep the prompt quiet by default.
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

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(error) => {
            if matches!(error.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) {
                let _ = error.print();
            } else {
                println!("The number of arguments is invalid.");
                println!("Please run the program again using the following format:");
                println!("queryclient <ip_address> <port_number>");
            }
            // Usage problems exit cleanly, not as errors.
            return Ok(());
        }
    };
    init_logging(args.verbose);

    let addr = format!("{}:{}", args.ip_address, args.port_number);
    client::run_prompt(&addr).await?;
    Ok(())
}
