//! The I/O boundary.
//!
//! # Design
//! `HttpConnection` never performs network I/O. It hands a
//! `RequestDescriptor` to a `Transport`, which runs the request wherever it
//! likes and reports back through a one-shot callback. Tests substitute a
//! double that replies deterministically; production code uses
//! [`UreqSession`](crate::session::UreqSession) or a host-provided stack.

use std::sync::Arc;

use crate::error::TransportError;
use crate::http::{RequestDescriptor, ResponseMeta};

/// Invoked at most once with whatever the transport got: response bytes,
/// response metadata, or an error.
pub type TransportCallback =
    Box<dyn FnOnce(Option<Vec<u8>>, Option<ResponseMeta>, Option<TransportError>) + Send + 'static>;

/// Lifecycle state of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    Running,
    Suspended,
    Canceling,
    Completed,
}

/// Handle to one in-flight request.
pub trait SessionTask: Send + Sync {
    fn cancel(&self);
    fn suspend(&self);
    fn resume(&self);
    fn state(&self) -> TaskState;
}

/// Something that can issue a request.
///
/// Returned tasks start out suspended; the caller starts them with
/// [`SessionTask::resume`].
pub trait Transport: Send + Sync {
    fn data_task(&self, request: RequestDescriptor, completion: TransportCallback)
        -> Arc<dyn SessionTask>;
}
