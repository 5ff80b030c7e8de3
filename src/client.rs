//! The movie query client.
//!
//! Drives one query per connection: consume the server's handshake,
//! acknowledge it, submit the term, read the count, then buy each result
//! row with an acknowledgement until the server says goodbye.

use std::io::Write;

use log::info;
use tokio::net::TcpStream;

use crate::error::{CinedexError, Result};
use crate::protocol;

/// Run a single query against the server at `addr`, writing the count and
/// each result row to `out`.
pub async fn run_query<W>(addr: &str, term: &str, out: &mut W) -> Result<()>
where
    W: Write,
{
    let mut stream = TcpStream::connect(addr)
        .await
        .map_err(|error| CinedexError::network(format!("failed to connect to {addr}: {error}")))?;
    info!("connected to movie query server at {addr}");

    let greeting = protocol::recv_message(&mut stream).await?;
    if greeting != protocol::ACK {
        return Err(CinedexError::protocol(format!(
            "unexpected greeting {greeting:?}"
        )));
    }
    protocol::send_ack(&mut stream).await?;
    protocol::send_message(&mut stream, term).await?;

    let reply = protocol::recv_message(&mut stream).await?;
    let count = leading_count(&reply);
    writeln!(out, "Number of results: {count}")?;
    if count == 0 {
        writeln!(out, "There are no results for this query")?;
        // The zero count is followed by the termination message; it may
        // already sit in the same segment.
        if !reply.ends_with(protocol::GOODBYE) {
            let _ = protocol::recv_message(&mut stream).await;
        }
        return Ok(());
    }

    loop {
        protocol::send_ack(&mut stream).await?;
        let message = protocol::recv_message(&mut stream).await?;
        match message.strip_suffix(protocol::GOODBYE) {
            Some(rest) => {
                if !rest.is_empty() {
                    writeln!(out, "{rest}")?;
                }
                break;
            }
            None => writeln!(out, "{message}")?,
        }
    }
    Ok(())
}

/// Interactive prompt: read terms from stdin and run one query per term
/// until `q` (or end of input).
pub async fn run_prompt(addr: &str) -> Result<()> {
    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    loop {
        write!(stdout, "Enter a term to search for, or q to quit: ")?;
        stdout.flush()?;

        let mut input = String::new();
        if stdin.read_line(&mut input)? == 0 {
            break;
        }
        let term = input.trim();
        if term.is_empty() {
            continue;
        }
        if term == "q" {
            writeln!(stdout, "Thanks for playing!")?;
            break;
        }
        if let Err(error) = run_query(addr, term, &mut stdout).await {
            writeln!(stdout, "query failed: {error}")?;
        }
        writeln!(stdout)?;
    }
    Ok(())
}

/// Parse the decimal count at the start of a reply, `atoi`-style: leading
/// digits only, zero when there are none.
fn leading_count(message: &str) -> usize {
    let digits: String = message
        .chars()
        .take_while(|character| character.is_ascii_digit())
        .collect();
    digits.parse().unwrap_or(0)
}
