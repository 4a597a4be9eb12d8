// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Loopback Contributors

//! Length-prefixed JSON framing for the supervisor/worker control socket.

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

/// Messages larger than this are rejected rather than buffered unbounded.
const MAX_MESSAGE_BYTES: u32 = 64 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum WireError {
    #[error("message of {0} bytes exceeds the {MAX_MESSAGE_BYTES} byte limit")]
    TooLarge(u32),
    #[error("connection closed mid-message")]
    Truncated,
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed json payload: {0}")]
    Json(#[from] serde_json::Error),
}

/// Write `value` as a length-prefixed JSON frame.
pub async fn write_message<W, T>(writer: &mut W, value: &T) -> Result<(), WireError>
where
    W: tokio::io::AsyncWrite + Unpin,
    T: Serialize,
{
    let payload = serde_json::to_vec(value)?;
    let len: u32 = payload
        .len()
        .try_into()
        .map_err(|_| WireError::TooLarge(u32::MAX))?;
    if len > MAX_MESSAGE_BYTES {
        return Err(WireError::TooLarge(len));
    }
    writer.write_all(&len.to_be_bytes()).await?;
    writer.write_all(&payload).await?;
    writer.flush().await?;
    Ok(())
}

/// Read one length-prefixed JSON frame and deserialize it as `T`.
pub async fn read_message<R, T>(reader: &mut R) -> Result<T, WireError>
where
    R: tokio::io::AsyncRead + Unpin,
    T: DeserializeOwned,
{
    let mut len_buf = [0u8; 4];
    match reader.read_exact(&mut len_buf).await {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => return Err(WireError::Truncated),
        Err(e) => return Err(WireError::Io(e)),
    }
    let len = u32::from_be_bytes(len_buf);
    if len > MAX_MESSAGE_BYTES {
        return Err(WireError::TooLarge(len));
    }
    let mut payload = vec![0u8; len as usize];
    reader
        .read_exact(&mut payload)
        .await
        .map_err(|e| match e.kind() {
            std::io::ErrorKind::UnexpectedEof => WireError::Truncated,
            _ => WireError::Io(e),
        })?;
    Ok(serde_json::from_slice(&payload)?)
}

#[cfg(test)]
#[path = "envelope_tests.rs"]
mod tests;
