// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Loopback Contributors

//! Plugin-local errors: a status code, a status text, and a message, all of
//! which the loopback server renders verbatim as the response (spec.md §7
//! "Plugin-local... Converted to HTTP errors with a plugin-chosen status").

use thiserror::Error;

#[derive(Debug, Error, Clone)]
#[error("{status} {status_text}: {message}")]
pub struct HttpError {
    pub status: u16,
    pub status_text: String,
    pub message: String,
}

impl HttpError {
    pub fn new(status: u16, status_text: impl Into<String>, message: impl Into<String>) -> Self {
        Self { status, status_text: status_text.into(), message: message.into() }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(400, "Bad Request", message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(404, "Not Found", message)
    }

    pub fn precondition_failed(message: impl Into<String>) -> Self {
        Self::new(412, "Precondition Failed", message)
    }

    pub fn payload_too_large(message: impl Into<String>) -> Self {
        Self::new(413, "Payload Too Large", message)
    }

    pub fn range_not_satisfiable(message: impl Into<String>) -> Self {
        Self::new(416, "Range Not Satisfiable", message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(500, "Internal Server Error", message)
    }
}
