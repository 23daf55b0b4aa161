//! Minimal JSON-over-HTTP client layer.
//!
//! # Overview
//! `HttpConnection` issues GET/POST/PUT/DELETE requests through an injected
//! [`Transport`], attaching JSON defaults, an optional bearer token and
//! custom headers, and classifies every reply into exactly one
//! [`ResponseOutcome`].
//!
//! # Design
//! - The connection never does I/O itself. It builds a `RequestDescriptor`
//!   and hands it to the transport together with a one-shot callback.
//! - Failures before dispatch (bad URL, body that will not encode) arrive
//!   through the same completion as transport and HTTP failures.
//! - `UreqSession` is the default transport; tests swap in a double.
//! - Each operation has an `*_async` twin that awaits the completion.

pub mod builder;
pub mod classifier;
pub mod config;
pub mod connection;
pub mod error;
pub mod header;
pub mod http;
pub mod session;
pub mod transport;

pub use builder::build_request;
pub use classifier::{classify, ResponseOutcome};
pub use config::{ConnectionConfig, SessionConfig, TokenHeader};
pub use connection::HttpConnection;
pub use error::{NetworkError, SessionError, TransportError};
pub use header::{CustomHeaders, HeaderName};
pub use http::{HttpMethod, RequestDescriptor, ResponseMeta};
pub use session::UreqSession;
pub use transport::{SessionTask, TaskState, Transport, TransportCallback};
