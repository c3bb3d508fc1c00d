//! Blocking HTTP client for the Open Forms API.
//!
//! # Design
//! `OpenFormsClient` holds an immutable `ClientConfig` and a shared
//! `Transport`. Every operation is split into a pure part (`build_request`,
//! `parse_*`) and the round-trip in between, so request construction and
//! status interpretation are testable without I/O. Each call makes exactly
//! one attempt; retry policy belongs to the caller.

use std::fmt;
use std::sync::Arc;

use url::Url;

use crate::config::{ClientConfig, Configuration};
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, Transport, UreqTransport};
use crate::types::{Form, FormList};

/// Client for a single Open Forms API root.
#[derive(Clone)]
pub struct OpenFormsClient {
    config: ClientConfig,
    transport: Arc<dyn Transport>,
}

impl fmt::Debug for OpenFormsClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenFormsClient")
            .field("api_root", &self.config.api_root())
            .field("timeout", &self.config.timeout())
            .finish_non_exhaustive()
    }
}

impl OpenFormsClient {
    /// Build a client that talks HTTP through `ureq` with the configured timeout.
    pub fn new(config: ClientConfig) -> Self {
        let transport = Arc::new(UreqTransport::new(config.timeout()));
        Self { config, transport }
    }

    pub fn with_transport(config: ClientConfig, transport: Arc<dyn Transport>) -> Self {
        Self { config, transport }
    }

    pub fn from_configuration(configuration: &Configuration) -> Self {
        Self::new(configuration.client_config())
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// False for a null client (empty API root); callers skip remote calls.
    pub fn has_config(&self) -> bool {
        !self.config.api_root().is_empty()
    }

    /// Resolve `relative_path` against the API root and attach credentials.
    pub fn build_request(
        &self,
        method: HttpMethod,
        relative_path: &str,
    ) -> Result<HttpRequest, ApiError> {
        let root = Url::parse(self.config.api_root())
            .map_err(|e| ApiError::InvalidUrl(format!("{:?}: {e}", self.config.api_root())))?;
        let url = root
            .join(relative_path)
            .map_err(|e| ApiError::InvalidUrl(format!("{relative_path:?}: {e}")))?;
        Ok(HttpRequest {
            method,
            url: url.into(),
            headers: vec![(
                "Authorization".to_string(),
                format!("Token {}", self.config.api_token()),
            )],
        })
    }

    /// Perform a single request. The status code is not interpreted.
    pub fn request(
        &self,
        method: HttpMethod,
        relative_path: &str,
    ) -> Result<HttpResponse, ApiError> {
        let request = self.build_request(method, relative_path)?;
        tracing::debug!(method = method.as_str(), url = %request.url, "open forms request");
        let response = self.transport.execute(&request)?;
        tracing::debug!(
            method = method.as_str(),
            url = %request.url,
            status = response.status,
            "open forms response"
        );
        Ok(response)
    }

    /// Retrieve all forms available to the configured token.
    pub fn get_forms(&self) -> Result<Vec<Form>, ApiError> {
        let response = self.request(HttpMethod::Get, "forms")?;
        self.parse_forms(response)
    }

    /// Retrieve a single form by UUID or slug.
    pub fn get_form(&self, uuid_or_slug: &str) -> Result<Form, ApiError> {
        let response = self.request(HttpMethod::Get, &format!("forms/{uuid_or_slug}"))?;
        self.parse_form(response)
    }

    pub fn parse_forms(&self, response: HttpResponse) -> Result<Vec<Form>, ApiError> {
        check_status(&response)?;
        let list: FormList = serde_json::from_str(&response.body)
            .map_err(|e| ApiError::Deserialization(e.to_string()))?;
        Ok(list.into_forms())
    }

    pub fn parse_form(&self, response: HttpResponse) -> Result<Form, ApiError> {
        check_status(&response)?;
        serde_json::from_str(&response.body).map_err(|e| ApiError::Deserialization(e.to_string()))
    }
}

/// Map non-2xx status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    if response.status == 404 {
        return Err(ApiError::NotFound);
    }
    Err(ApiError::Http {
        status: response.status,
        body: response.body.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransportError;
    use crate::test_support::ScriptedTransport;
    use std::time::Duration;

    const API_ROOT: &str = "https://example.com/api/v1/";

    fn client() -> OpenFormsClient {
        OpenFormsClient::new(ClientConfig::new(API_ROOT, "token", Duration::from_secs(5)))
    }

    fn scripted(transport: &Arc<ScriptedTransport>) -> OpenFormsClient {
        OpenFormsClient::with_transport(
            ClientConfig::new(API_ROOT, "token", Duration::from_secs(5)),
            transport.clone(),
        )
    }

    fn response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            headers: Vec::new(),
            body: body.to_string(),
        }
    }

    #[test]
    fn null_client_has_no_config() {
        let client = OpenFormsClient::new(ClientConfig::new("", "token", Duration::from_secs(5)));
        assert!(!client.has_config());
        assert!(client.has_config() == !client.config().api_root().is_empty());
    }

    #[test]
    fn configured_client_has_config() {
        assert!(client().has_config());
    }

    #[test]
    fn build_request_resolves_relative_path_and_sets_token() {
        let req = client().build_request(HttpMethod::Get, "forms").unwrap();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.url, "https://example.com/api/v1/forms");
        assert_eq!(req.header("Authorization"), Some("Token token"));
    }

    #[test]
    fn build_request_normalizes_missing_trailing_slash() {
        let client = OpenFormsClient::new(ClientConfig::new(
            "https://example.com/api/v1",
            "",
            Duration::from_secs(5),
        ));
        let req = client.build_request(HttpMethod::Head, "forms/myform").unwrap();
        assert_eq!(req.url, "https://example.com/api/v1/forms/myform");
        assert_eq!(req.header("authorization"), Some("Token "));
    }

    #[test]
    fn null_client_cannot_build_requests() {
        let client = OpenFormsClient::new(ClientConfig::default());
        let err = client.build_request(HttpMethod::Get, "forms").unwrap_err();
        assert!(matches!(err, ApiError::InvalidUrl(_)));
    }

    #[test]
    fn get_forms_returns_empty_list() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.respond(HttpMethod::Get, &format!("{API_ROOT}forms"), 200, "[]");
        assert!(scripted(&transport).get_forms().unwrap().is_empty());
    }

    #[test]
    fn get_forms_with_error_status() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.respond(HttpMethod::Get, &format!("{API_ROOT}forms"), 401, "");
        let err = scripted(&transport).get_forms().unwrap_err();
        assert!(matches!(err, ApiError::Http { status: 401, .. }));
        assert_eq!(err.status(), Some(401));
    }

    #[test]
    fn get_form_by_slug() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.respond(
            HttpMethod::Get,
            &format!("{API_ROOT}forms/myform"),
            200,
            r#"{"uuid":"f4423c99-6341-442e-aedc-b47779579f4d","slug":"myform","name":"My form"}"#,
        );
        let form = scripted(&transport).get_form("myform").unwrap();
        assert_eq!(form.slug.as_deref(), Some("myform"));
        assert_eq!(form.name, "My form");
    }

    #[test]
    fn get_form_with_error_status() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.respond(HttpMethod::Get, &format!("{API_ROOT}forms/myform"), 401, "");
        let err = scripted(&transport).get_form("myform").unwrap_err();
        assert!(matches!(err, ApiError::Http { status: 401, .. }));
    }

    #[test]
    fn get_form_not_found() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.respond(HttpMethod::Get, &format!("{API_ROOT}forms/missing"), 404, "{}");
        let err = scripted(&transport).get_form("missing").unwrap_err();
        assert!(matches!(err, ApiError::NotFound));
    }

    #[test]
    fn transport_errors_propagate() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.fail(
            HttpMethod::Get,
            &format!("{API_ROOT}forms"),
            TransportError::Timeout(Duration::from_secs(5)),
        );
        let err = scripted(&transport).get_forms().unwrap_err();
        assert!(matches!(err, ApiError::Transport(TransportError::Timeout(_))));
        assert_eq!(transport.calls(), 1);
    }

    #[test]
    fn request_does_not_interpret_status() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.respond(HttpMethod::Head, &format!("{API_ROOT}forms"), 503, "");
        let resp = scripted(&transport).request(HttpMethod::Head, "forms").unwrap();
        assert_eq!(resp.status, 503);
    }

    #[test]
    fn parse_forms_bad_json() {
        let err = client().parse_forms(response(200, "not json")).unwrap_err();
        assert!(matches!(err, ApiError::Deserialization(_)));
    }

    #[test]
    fn parse_forms_paginated() {
        let forms = client()
            .parse_forms(response(
                200,
                r#"{"count":1,"results":[{"uuid":"1b0d0675-2caf-48e8-beda-c32c6732b63c","slug":"test-2","name":"Test 2"}]}"#,
            ))
            .unwrap();
        assert_eq!(forms.len(), 1);
        assert_eq!(forms[0].slug.as_deref(), Some("test-2"));
    }

    #[test]
    fn parse_form_accepts_any_2xx() {
        let form = client()
            .parse_form(response(
                203,
                r#"{"uuid":"1b0d0675-2caf-48e8-beda-c32c6732b63c","name":"Test 2"}"#,
            ))
            .unwrap();
        assert_eq!(form.name, "Test 2");
    }
}
