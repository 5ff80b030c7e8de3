//! The wire protocol: message constants and fixed-buffer framing.
//!
//! Messages are raw text with no length prefix; one send is one message,
//! and message boundaries are transport-level (a single read on a
//! [`BUFFER_SIZE`] buffer). The helpers are generic over any async byte
//! stream so that sessions run identically over TCP and over in-memory
//! pipes in tests.
//!
//! Protocol sequence for one session:
//!
//! 1. server sends [`ACK`]
//! 2. client sends [`ACK`]
//! 3. client sends the query term
//! 4. server sends the decimal result count (`"0"` if none)
//! 5. client sends [`ACK`]
//! 6. server sends one result row (repeat 5-6 until exhausted)
//! 7. server sends [`GOODBYE`]
//!
//! The server never sends two result rows without an intervening client
//! acknowledgement; that is the backpressure mechanism, not an
//! optimization opportunity.

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::error::{CinedexError, Result};

/// The acknowledgement token.
pub const ACK: &str = "ACK";

/// The termination message.
pub const GOODBYE: &str = "GOODBYE";

/// Receive buffer size; no single message exceeds it.
pub const BUFFER_SIZE: usize = 1024;

/// Send one message.
pub async fn send_message<W>(writer: &mut W, message: &str) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    writer
        .write_all(message.as_bytes())
        .await
        .map_err(|error| CinedexError::network(format!("send failed: {error}")))?;
    writer
        .flush()
        .await
        .map_err(|error| CinedexError::network(format!("flush failed: {error}")))?;
    Ok(())
}

/// Receive one message.
///
/// Fails with `Network` when the peer has closed the connection.
pub async fn recv_message<R>(reader: &mut R) -> Result<String>
where
    R: AsyncRead + Unpin,
{
    let mut buffer = [0u8; BUFFER_SIZE];
    let received = reader
        .read(&mut buffer)
        .await
        .map_err(|error| CinedexError::network(format!("receive failed: {error}")))?;
    if received == 0 {
        return Err(CinedexError::network("connection closed by peer"));
    }
    Ok(String::from_utf8_lossy(&buffer[..received]).into_owned())
}

/// Send the acknowledgement token.
pub async fn send_ack<W>(writer: &mut W) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    send_message(writer, ACK).await
}

/// Receive a message and require it to be exactly the acknowledgement
/// token; anything else is a protocol violation.
pub async fn expect_ack<R>(reader: &mut R) -> Result<()>
where
    R: AsyncRead + Unpin,
{
    let message = recv_message(reader).await?;
    if message != ACK {
        return Err(CinedexError::protocol(format!(
            "expected {ACK:?}, got {message:?}"
        )));
    }
    Ok(())
}

/// Send the termination message.
pub async fn send_goodbye<W>(writer: &mut W) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    send_message(writer, GOODBYE).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_message_round_trip() {
        let (mut client, mut server) = tokio::io::duplex(BUFFER_SIZE);

        send_message(&mut client, "the matrix").await.unwrap();
        let message = recv_message(&mut server).await.unwrap();
        assert_eq!(message, "the matrix");
    }

    #[tokio::test]
    async fn test_ack_round_trip() {
        let (mut client, mut server) = tokio::io::duplex(BUFFER_SIZE);

        send_ack(&mut client).await.unwrap();
        expect_ack(&mut server).await.unwrap();
    }

    #[tokio::test]
    async fn test_expect_ack_rejects_other_payloads() {
        let (mut client, mut server) = tokio::io::duplex(BUFFER_SIZE);

        send_message(&mut client, "BOGUS").await.unwrap();
        let result = expect_ack(&mut server).await;
        assert!(matches!(result, Err(CinedexError::Protocol(_))));
    }

    #[tokio::test]
    async fn test_recv_on_closed_connection() {
        let (client, mut server) = tokio::io::duplex(BUFFER_SIZE);
        drop(client);

        let result = recv_message(&mut server).await;
        assert!(matches!(result, Err(CinedexError::Network(_))));
    }
}
