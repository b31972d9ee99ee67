// taskd: wire framing and the Command Parser

#![allow(clippy::expect_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::error::ParseError;

/// Maximum request payload length.
pub const MAX_REQUEST_LEN: usize = 49;
/// Maximum reply payload length.
pub const MAX_REPLY_LEN: usize = 255;

/// Reads one length-prefixed frame. `Ok(None)` signals a clean EOF or short
/// read at a frame boundary — the connection is simply closed, no reply is
/// attempted, and this is not treated as an error.
pub async fn read_frame(
    stream: &mut (impl AsyncRead + Unpin),
    max_len: usize,
) -> std::io::Result<Option<Vec<u8>>> {
    let mut len_buf = [0u8; 4];
    match stream.read_exact(&mut len_buf).await {
        Ok(_) => {}
        Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => return Ok(None),
        Err(e) => return Err(e),
    }
    let len = u32::from_be_bytes(len_buf) as usize;
    if len > max_len {
        return Ok(None);
    }

    let mut payload = vec![0u8; len];
    match stream.read_exact(&mut payload).await {
        Ok(_) => Ok(Some(payload)),
        Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => Ok(None),
        Err(e) => Err(e),
    }
}

/// Writes one length-prefixed frame.
pub async fn write_frame(stream: &mut (impl AsyncWrite + Unpin), payload: &[u8]) -> std::io::Result<()> {
    let len = u32::try_from(payload.len()).expect("reply payloads are bounded by MAX_REPLY_LEN");
    stream.write_all(&len.to_be_bytes()).await?;
    stream.write_all(payload).await?;
    Ok(())
}

/// A parsed request: `<action> <task_name>`. `action` is kept as a plain
/// integer rather than an enum — values outside `{0, 1}` are not a parse
/// failure, they are a valid-but-unrecognized action (the connection handler
/// replies with "Invalid action").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub action: i64,
    pub name: String,
}

/// Tokenizes `<action> <name>`. Exactly two whitespace-separated tokens are
/// required.
pub fn parse_command(payload: &[u8]) -> Result<Command, ParseError> {
    let text = std::str::from_utf8(payload).map_err(|_| ParseError::NotAscii)?;
    if !text.is_ascii() {
        return Err(ParseError::NotAscii);
    }

    let mut tokens = text.split_whitespace();
    let action_token = tokens.next().ok_or(ParseError::WrongTokenCount)?;
    let name_token = tokens.next().ok_or(ParseError::WrongTokenCount)?;
    if tokens.next().is_some() {
        return Err(ParseError::WrongTokenCount);
    }

    let action: i64 = action_token.parse().map_err(|_| ParseError::ActionNotInteger)?;
    if name_token.len() > crate::catalog::MAX_NAME_LEN {
        return Err(ParseError::NameTooLong);
    }

    Ok(Command { action, name: name_token.to_string() })
}
