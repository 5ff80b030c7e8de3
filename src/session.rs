//! The per-connection query session.
//!
//! One session drives one client through the protocol state machine:
//! Handshake → AwaitingTerm → SendingCount → StreamingResults → Closed.
//! The session layer owns no index state; it borrows the shared
//! [`ServerContext`] and resolves each posting to its raw corpus row just
//! before sending it.
//!
//! A malformed acknowledgement aborts the session immediately: no further
//! data is written and the connection is simply dropped by the caller.

use log::{debug, info, warn};
use tokio::io::{AsyncRead, AsyncWrite};

use crate::error::{CinedexError, Result};
use crate::protocol;
use crate::server::ServerContext;

/// Drive one connection through the full query protocol.
///
/// Generic over the stream so sessions run identically over TCP and over
/// in-memory pipes in tests.
pub async fn run_session<S>(stream: &mut S, context: &ServerContext) -> Result<()>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    // Handshake
    protocol::send_ack(stream).await?;

    // AwaitingTerm: the client acknowledges the handshake, then submits
    // the query term. The two are separate sends and may arrive in a
    // single segment.
    let payload = protocol::recv_message(stream).await?;
    let term = match payload.strip_prefix(protocol::ACK) {
        Some("") => protocol::recv_message(stream).await?,
        Some(rest) => rest.to_string(),
        None => {
            return Err(CinedexError::protocol(format!(
                "expected {:?} before the query term, got {payload:?}",
                protocol::ACK
            )));
        }
    };
    info!("query received: {term}");

    // SendingCount
    let Some(results) = context.index.find(&term) else {
        protocol::send_message(stream, "0").await?;
        info!("no results for {term:?}; closing client connection");
        return protocol::send_goodbye(stream).await;
    };
    let count = results.num_results();
    protocol::send_message(stream, &count.to_string()).await?;
    debug!("number of results: {count}");

    // StreamingResults: strictly one row per client acknowledgement.
    for posting in results {
        protocol::expect_ack(stream).await?;
        match context.docs.row_text(posting.doc_id, posting.offset) {
            Ok(row) => protocol::send_message(stream, &row).await?,
            Err(error) => {
                warn!("error retrieving result: {error}");
                break;
            }
        }
    }

    info!("closing client connection");
    protocol::send_goodbye(stream).await
}
