// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Loopback Contributors

//! Wire format shared between the supervisor and the worker-runtime child
//! process it controls, plus the reserved HTTP header names used at the
//! loopback boundary.
//!
//! Wire format: 4-byte length prefix (big-endian) + JSON payload, same
//! framing the control socket uses end to end in both directions.

pub mod envelope;
pub mod headers;
pub mod message;
pub mod query;
pub mod request;
pub mod service_graph;

pub use envelope::{read_message, write_message, WireError};
pub use message::{ControlRequest, ControlResponse};
pub use query::parse_query;
pub use request::{MultiHeaderMap, ResponseBody, UniversalRequest, UniversalResponse};
pub use service_graph::{ServiceGraphError, ServiceNodeId, WireServiceGraph};
