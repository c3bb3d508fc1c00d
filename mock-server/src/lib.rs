//! In-process stand-in for the Open Forms API.
//!
//! Serves `GET`/`HEAD /api/v2/forms` and `GET /api/v2/forms/{uuid_or_slug}`
//! behind `Authorization: Token <token>`. Tests can switch the list to the
//! paginated shape, force every request to fail with a fixed status and body,
//! and read how many requests were served.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::net::TcpListener;
use uuid::Uuid;

pub use axum::http::StatusCode;

/// Path prefix of the emulated API.
pub const API_PREFIX: &str = "/api/v2";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Form {
    pub uuid: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    pub name: String,
    #[serde(default)]
    pub active: bool,
}

impl Form {
    pub fn new(slug: &str, name: &str) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            slug: Some(slug.to_string()),
            name: name.to_string(),
            active: true,
        }
    }
}

struct Inner {
    token: String,
    forms: RwLock<Vec<Form>>,
    paginated: AtomicBool,
    failure: RwLock<Option<(StatusCode, String)>>,
    hits: AtomicUsize,
}

/// Shared, mutable server state. Cloning yields a handle to the same state.
#[derive(Clone)]
pub struct MockState {
    inner: Arc<Inner>,
}

impl MockState {
    pub fn new(token: &str) -> Self {
        Self {
            inner: Arc::new(Inner {
                token: token.to_string(),
                forms: RwLock::new(Vec::new()),
                paginated: AtomicBool::new(false),
                failure: RwLock::new(None),
                hits: AtomicUsize::new(0),
            }),
        }
    }

    pub fn with_forms(self, forms: Vec<Form>) -> Self {
        *write(&self.inner.forms) = forms;
        self
    }

    pub fn add_form(&self, form: Form) {
        write(&self.inner.forms).push(form);
    }

    /// Answer the list endpoint with `{"count", "next", "previous", "results"}`.
    pub fn set_paginated(&self, paginated: bool) {
        self.inner.paginated.store(paginated, Ordering::SeqCst);
    }

    /// Answer every request with `status` and the raw `body`.
    pub fn fail_with(&self, status: StatusCode, body: &str) {
        *write(&self.inner.failure) = Some((status, body.to_string()));
    }

    pub fn clear_failure(&self) {
        *write(&self.inner.failure) = None;
    }

    /// Requests served so far, `HEAD` included.
    pub fn hits(&self) -> usize {
        self.inner.hits.load(Ordering::SeqCst)
    }

    fn forms(&self) -> Vec<Form> {
        self.inner
            .forms
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn failure(&self) -> Option<(StatusCode, String)> {
        self.inner
            .failure
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Count the request, then apply forced failures and token auth.
    fn admit(&self, headers: &HeaderMap) -> Result<(), Response> {
        self.inner.hits.fetch_add(1, Ordering::SeqCst);

        if let Some((status, body)) = self.failure() {
            return Err((status, body).into_response());
        }

        let expected = format!("Token {}", self.inner.token);
        let provided = headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok());
        if provided != Some(expected.as_str()) {
            tracing::debug!("rejecting request with invalid token");
            return Err(problem(
                StatusCode::UNAUTHORIZED,
                "authentication_failed",
                "Ongeldige authenticatiegegevens.",
                "Ongeldige token.",
            ));
        }
        Ok(())
    }
}

fn write<T>(lock: &RwLock<T>) -> std::sync::RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Problem-details body in the shape Open Forms uses for errors.
fn problem(status: StatusCode, code: &str, title: &str, detail: &str) -> Response {
    let body = json!({
        "type": format!("https://example.com/fouten/{code}/"),
        "code": code,
        "title": title,
        "status": status.as_u16(),
        "detail": detail,
        "instance": format!("urn:uuid:{}", Uuid::new_v4()),
    });
    (status, Json(body)).into_response()
}

pub fn app(state: MockState) -> Router {
    Router::new()
        .route(&format!("{API_PREFIX}/forms"), get(list_forms))
        .route(&format!("{API_PREFIX}/forms/{{uuid_or_slug}}"), get(get_form))
        .with_state(state)
}

pub async fn run(listener: TcpListener, state: MockState) -> Result<(), std::io::Error> {
    axum::serve(listener, app(state)).await
}

async fn list_forms(State(state): State<MockState>, headers: HeaderMap) -> Response {
    if let Err(rejection) = state.admit(&headers) {
        return rejection;
    }
    let forms = state.forms();
    if state.inner.paginated.load(Ordering::SeqCst) {
        Json(json!({
            "count": forms.len(),
            "next": null,
            "previous": null,
            "results": forms,
        }))
        .into_response()
    } else {
        Json(forms).into_response()
    }
}

async fn get_form(
    State(state): State<MockState>,
    Path(uuid_or_slug): Path<String>,
    headers: HeaderMap,
) -> Response {
    if let Err(rejection) = state.admit(&headers) {
        return rejection;
    }
    let found = state.forms().into_iter().find(|form| {
        form.uuid.to_string() == uuid_or_slug || form.slug.as_deref() == Some(uuid_or_slug.as_str())
    });
    match found {
        Some(form) => Json(form).into_response(),
        None => problem(StatusCode::NOT_FOUND, "not_found", "Niet gevonden.", "Niet gevonden."),
    }
}
