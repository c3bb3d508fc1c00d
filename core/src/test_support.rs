//! In-memory `Transport` for unit tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use crate::error::TransportError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, Transport};

enum Reply {
    Response(u16, String),
    Timeout(Duration),
    Connection(String),
}

/// Answers requests from a table keyed by method and absolute URL and
/// records every request it sees.
#[derive(Default)]
pub struct ScriptedTransport {
    replies: Mutex<HashMap<(HttpMethod, String), Reply>>,
    requests: Mutex<Vec<HttpRequest>>,
    calls: AtomicUsize,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, method: HttpMethod, url: &str, status: u16, body: &str) {
        self.replies
            .lock()
            .unwrap()
            .insert((method, url.to_string()), Reply::Response(status, body.to_string()));
    }

    pub fn fail(&self, method: HttpMethod, url: &str, error: TransportError) {
        let reply = match error {
            TransportError::Timeout(d) => Reply::Timeout(d),
            TransportError::Connection(msg) => Reply::Connection(msg),
        };
        self.replies.lock().unwrap().insert((method, url.to_string()), reply);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl Transport for ScriptedTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());
        let replies = self.replies.lock().unwrap();
        match replies.get(&(request.method, request.url.clone())) {
            Some(Reply::Response(status, body)) => Ok(HttpResponse {
                status: *status,
                headers: Vec::new(),
                body: body.clone(),
            }),
            Some(Reply::Timeout(d)) => Err(TransportError::Timeout(*d)),
            Some(Reply::Connection(msg)) => Err(TransportError::Connection(msg.clone())),
            None => Err(TransportError::Connection(format!(
                "no scripted reply for {} {}",
                request.method.as_str(),
                request.url
            ))),
        }
    }
}
