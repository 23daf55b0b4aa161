//! The public entry point.
//!
//! # Design
//! `HttpConnection` owns nothing but a transport, its configuration and a
//! snapshot of custom headers. Each call builds a fresh `RequestDescriptor`,
//! hands it to the transport with a callback that classifies the reply, and
//! starts the task right away. Pre-flight failures (bad URL, body that will
//! not encode) are reported through the same completion, synchronously, and
//! no task is returned.
//!
//! Custom headers sit behind an `ArcSwap`: request construction loads the
//! current snapshot without locking and `set_custom_headers` swaps in a new
//! map wholesale, so concurrent readers never see a half-written set.

use std::sync::Arc;

use arc_swap::ArcSwap;
use serde::Serialize;
use tokio::sync::oneshot;
use tracing::{debug, warn};

use crate::builder::build_request;
use crate::classifier::{classify, ResponseOutcome};
use crate::config::ConnectionConfig;
use crate::error::NetworkError;
use crate::header::CustomHeaders;
use crate::http::HttpMethod;
use crate::session::UreqSession;
use crate::transport::{SessionTask, TaskState, Transport};

/// Issues JSON requests through a [`Transport`] and classifies the replies.
pub struct HttpConnection {
    transport: Arc<dyn Transport>,
    custom_headers: ArcSwap<CustomHeaders>,
    config: ConnectionConfig,
}

impl HttpConnection {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self::with_config(transport, ConnectionConfig::default())
    }

    pub fn with_config(transport: Arc<dyn Transport>, config: ConnectionConfig) -> Self {
        Self {
            transport,
            custom_headers: ArcSwap::from_pointee(CustomHeaders::new()),
            config,
        }
    }

    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    /// Current custom header set.
    pub fn custom_headers(&self) -> Arc<CustomHeaders> {
        self.custom_headers.load_full()
    }

    /// Replace the custom header set. Requests already handed to the
    /// transport keep the headers they were built with.
    pub fn set_custom_headers(&self, headers: CustomHeaders) {
        debug!(count = headers.len(), "replacing custom headers");
        self.custom_headers.store(Arc::new(headers));
    }

    pub fn get<F>(&self, url: &str, token: Option<&str>, completion: F) -> Option<Arc<dyn SessionTask>>
    where
        F: FnOnce(ResponseOutcome) + Send + 'static,
    {
        self.execute(HttpMethod::Get, url, token, None::<&()>, completion)
    }

    pub fn post<B, F>(
        &self,
        url: &str,
        token: Option<&str>,
        body: &B,
        completion: F,
    ) -> Option<Arc<dyn SessionTask>>
    where
        B: Serialize + ?Sized,
        F: FnOnce(ResponseOutcome) + Send + 'static,
    {
        self.execute(HttpMethod::Post, url, token, Some(body), completion)
    }

    pub fn put<B, F>(
        &self,
        url: &str,
        token: Option<&str>,
        body: &B,
        completion: F,
    ) -> Option<Arc<dyn SessionTask>>
    where
        B: Serialize + ?Sized,
        F: FnOnce(ResponseOutcome) + Send + 'static,
    {
        self.execute(HttpMethod::Put, url, token, Some(body), completion)
    }

    pub fn delete<F>(&self, url: &str, token: Option<&str>, completion: F) -> Option<Arc<dyn SessionTask>>
    where
        F: FnOnce(ResponseOutcome) + Send + 'static,
    {
        self.execute(HttpMethod::Delete, url, token, None::<&()>, completion)
    }

    fn execute<B, F>(
        &self,
        method: HttpMethod,
        url: &str,
        token: Option<&str>,
        body: Option<&B>,
        completion: F,
    ) -> Option<Arc<dyn SessionTask>>
    where
        B: Serialize + ?Sized,
        F: FnOnce(ResponseOutcome) + Send + 'static,
    {
        let built = {
            let headers = self.custom_headers.load();
            build_request(url, method, token, &headers, body, &self.config)
        };
        let request = match built {
            Ok(request) => request,
            Err(err) => {
                // URLs can carry credentials in the query string; keep them out of logs.
                match &err {
                    NetworkError::InvalidUrl { .. } => {
                        warn!(%method, error = "invalid URL", "request rejected before dispatch")
                    }
                    _ => warn!(%method, error = %err, "request rejected before dispatch"),
                }
                completion(ResponseOutcome::Failure(err));
                return None;
            }
        };

        debug!(
            %method,
            origin = %request.url.origin().ascii_serialization(),
            path = request.url.path(),
            "dispatching request"
        );
        let task = self.transport.data_task(
            request,
            Box::new(move |data, response, error| {
                let outcome = classify(data, response, error);
                debug!(%method, success = outcome.is_success(), "request finished");
                completion(outcome);
            }),
        );
        task.resume();
        Some(task)
    }
}

/// Async variants. Each resolves once the completion has fired.
impl HttpConnection {
    pub async fn get_async(&self, url: &str, token: Option<&str>) -> Result<Vec<u8>, NetworkError> {
        await_outcome(|tx| self.get(url, token, send_to(tx))).await
    }

    pub async fn post_async<B>(&self, url: &str, token: Option<&str>, body: &B) -> Result<Vec<u8>, NetworkError>
    where
        B: Serialize + ?Sized,
    {
        await_outcome(|tx| self.post(url, token, body, send_to(tx))).await
    }

    pub async fn put_async<B>(&self, url: &str, token: Option<&str>, body: &B) -> Result<Vec<u8>, NetworkError>
    where
        B: Serialize + ?Sized,
    {
        await_outcome(|tx| self.put(url, token, body, send_to(tx))).await
    }

    pub async fn delete_async(&self, url: &str, token: Option<&str>) -> Result<Vec<u8>, NetworkError> {
        await_outcome(|tx| self.delete(url, token, send_to(tx))).await
    }
}

impl Default for HttpConnection {
    /// A connection over a [`UreqSession`] with default settings.
    fn default() -> Self {
        Self::new(Arc::new(UreqSession::default()))
    }
}

fn send_to(tx: oneshot::Sender<ResponseOutcome>) -> impl FnOnce(ResponseOutcome) + Send + 'static {
    move |outcome| {
        // The receiver is gone only when the awaiting future was dropped.
        let _ = tx.send(outcome);
    }
}

async fn await_outcome<S>(start: S) -> Result<Vec<u8>, NetworkError>
where
    S: FnOnce(oneshot::Sender<ResponseOutcome>) -> Option<Arc<dyn SessionTask>>,
{
    let (tx, rx) = oneshot::channel();
    let guard = CancelOnDrop(start(tx));
    let received = rx.await;
    guard.disarm();
    match received {
        Ok(outcome) => outcome.into_result(),
        Err(_) => {
            warn!("transport dropped the completion without calling it");
            Err(NetworkError::Unknown)
        }
    }
}

/// Cancels the task if the awaiting future is dropped early.
struct CancelOnDrop(Option<Arc<dyn SessionTask>>);

impl CancelOnDrop {
    fn disarm(mut self) {
        self.0 = None;
    }
}

impl Drop for CancelOnDrop {
    fn drop(&mut self) {
        if let Some(task) = self.0.take() {
            if task.state() != TaskState::Completed {
                debug!("async request dropped, cancelling task");
                task.cancel();
            }
        }
    }
}
