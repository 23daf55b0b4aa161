//! Default transport built on a blocking `ureq` agent.
//!
//! # Design
//! Each task runs its request on its own worker thread once resumed. The
//! blocking call itself cannot be paused or interrupted, so suspension and
//! cancellation act on delivery instead:
//!
//! - a reply that arrives while the task is suspended is parked and handed
//!   to the completion on the next `resume`;
//! - cancelling a task that is not on the wire completes it immediately
//!   with [`SessionError::Cancelled`]; cancelling one that is on the wire
//!   moves it to `Canceling` and the worker reports `Cancelled` when the
//!   call returns.
//!
//! The completion always runs outside the task lock.

use std::sync::Arc;
use std::thread;

use parking_lot::Mutex;
use tracing::debug;
use ureq::Agent;

use crate::config::SessionConfig;
use crate::error::{SessionError, TransportError};
use crate::header::HeaderName;
use crate::http::{HttpMethod, RequestDescriptor, ResponseMeta};
use crate::transport::{SessionTask, TaskState, Transport, TransportCallback};

type Reply = (Option<Vec<u8>>, Option<ResponseMeta>, Option<TransportError>);

/// A [`Transport`] that performs requests with `ureq`.
#[derive(Clone)]
pub struct UreqSession {
    agent: Agent,
    config: SessionConfig,
}

impl UreqSession {
    pub fn new(config: SessionConfig) -> Self {
        // Status codes are classified by the connection, not by ureq.
        let agent = Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(config.timeout())
            .build()
            .new_agent();
        Self { agent, config }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    fn prepare(&self, mut request: RequestDescriptor) -> RequestDescriptor {
        let user_agent = HeaderName::UserAgent;
        if let Some(ua) = &self.config.user_agent {
            if request.header(user_agent.as_str()).is_none() {
                request.set_header(user_agent.as_str(), ua.as_str());
            }
        }
        request
    }
}

impl Default for UreqSession {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

impl Transport for UreqSession {
    fn data_task(&self, request: RequestDescriptor, completion: TransportCallback) -> Arc<dyn SessionTask> {
        let request = self.prepare(request);
        Arc::new(UreqTask {
            agent: self.agent.clone(),
            body_limit: self.config.body_limit(),
            inner: Arc::new(Mutex::new(TaskInner {
                state: TaskState::Suspended,
                request: Some(request),
                completion: Some(completion),
                parked: None,
            })),
        })
    }
}

struct TaskInner {
    state: TaskState,
    /// Present until the worker thread is started.
    request: Option<RequestDescriptor>,
    completion: Option<TransportCallback>,
    /// A reply that arrived while suspended.
    parked: Option<Reply>,
}

impl TaskInner {
    fn finish(&mut self) -> Option<TransportCallback> {
        self.state = TaskState::Completed;
        self.request = None;
        self.parked = None;
        self.completion.take()
    }

    fn on_the_wire(&self) -> bool {
        self.request.is_none() && self.parked.is_none()
    }
}

struct UreqTask {
    agent: Agent,
    body_limit: u64,
    inner: Arc<Mutex<TaskInner>>,
}

impl UreqTask {
    fn start(&self, request: RequestDescriptor) {
        let inner = Arc::clone(&self.inner);
        let agent = self.agent.clone();
        let body_limit = self.body_limit;
        let spawned = thread::Builder::new()
            .name("basic-network-task".to_string())
            .spawn(move || {
                let reply = execute(&agent, body_limit, request);
                on_reply(&inner, reply);
            });

        if let Err(err) = spawned {
            let completion = self.inner.lock().finish();
            deliver(completion, (None, None, Some(Box::new(SessionError::Spawn(err)) as TransportError)));
        }
    }
}

impl SessionTask for UreqTask {
    fn cancel(&self) {
        let mut inner = self.inner.lock();
        if matches!(inner.state, TaskState::Completed | TaskState::Canceling) {
            return;
        }
        if inner.on_the_wire() {
            debug!("cancelling in-flight request");
            inner.state = TaskState::Canceling;
            return;
        }
        let completion = inner.finish();
        drop(inner);
        deliver(completion, cancelled());
    }

    fn suspend(&self) {
        let mut inner = self.inner.lock();
        if inner.state == TaskState::Running {
            inner.state = TaskState::Suspended;
        }
    }

    fn resume(&self) {
        let mut inner = self.inner.lock();
        if inner.state != TaskState::Suspended {
            return;
        }
        inner.state = TaskState::Running;
        if let Some(request) = inner.request.take() {
            drop(inner);
            self.start(request);
        } else if let Some(reply) = inner.parked.take() {
            let completion = inner.finish();
            drop(inner);
            deliver(completion, reply);
        }
    }

    fn state(&self) -> TaskState {
        self.inner.lock().state
    }
}

fn on_reply(inner: &Mutex<TaskInner>, reply: Reply) {
    let mut guard = inner.lock();
    match guard.state {
        TaskState::Suspended => {
            debug!("reply arrived while suspended, parking it");
            guard.parked = Some(reply);
        }
        TaskState::Canceling => {
            let completion = guard.finish();
            drop(guard);
            deliver(completion, cancelled());
        }
        TaskState::Running => {
            let completion = guard.finish();
            drop(guard);
            deliver(completion, reply);
        }
        TaskState::Completed => {}
    }
}

fn deliver(completion: Option<TransportCallback>, (data, response, error): Reply) {
    if let Some(completion) = completion {
        completion(data, response, error);
    }
}

fn cancelled() -> Reply {
    (None, None, Some(Box::new(SessionError::Cancelled) as TransportError))
}

fn execute(agent: &Agent, body_limit: u64, request: RequestDescriptor) -> Reply {
    debug!(
        method = %request.method,
        origin = %request.url.origin().ascii_serialization(),
        path = request.url.path(),
        "sending request"
    );
    match send(agent, body_limit, &request) {
        Ok((meta, data)) => {
            debug!(status = meta.status, bytes = data.len(), "response received");
            (Some(data), Some(meta), None)
        }
        Err(err) => {
            debug!(error = %err, "request failed");
            (None, None, Some(Box::new(err) as TransportError))
        }
    }
}

fn send(agent: &Agent, body_limit: u64, request: &RequestDescriptor) -> Result<(ResponseMeta, Vec<u8>), SessionError> {
    let url = request.url.as_str();
    let body = request.body.as_deref().unwrap_or_default();
    let mut response = match request.method {
        HttpMethod::Get => with_headers(agent.get(url), &request.headers).call()?,
        HttpMethod::Delete => with_headers(agent.delete(url), &request.headers).call()?,
        HttpMethod::Post => with_headers(agent.post(url), &request.headers).send(body)?,
        HttpMethod::Put => with_headers(agent.put(url), &request.headers).send(body)?,
    };

    let meta = ResponseMeta {
        status: response.status().as_u16(),
        headers: response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_string(), value.to_string()))
            })
            .collect(),
    };
    // ureq caps read_to_vec at 10 MiB unless told otherwise.
    let data = response.body_mut().with_config().limit(body_limit).read_to_vec()?;
    Ok((meta, data))
}

fn with_headers<B>(mut builder: ureq::RequestBuilder<B>, headers: &[(String, String)]) -> ureq::RequestBuilder<B> {
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}
