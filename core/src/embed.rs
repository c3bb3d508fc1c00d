//! Values a host template needs to embed the Open Forms SDK.
//!
//! # Design
//! Rendering is left to the host. This module only assembles the context:
//! element id, API base URL, SDK asset URLs and, when enabled, the host's
//! error-tracking settings. Error tracking is an optional capability passed
//! in by the host at startup (`ErrorTracker`), not discovered at call time.

use serde::Serialize;

use crate::config::Configuration;

/// Default id of the element the SDK mounts into.
pub const DEFAULT_HTML_ID: &str = "openforms-root";

/// Error-tracking settings the SDK can report to.
pub trait ErrorTracker: Send + Sync {
    fn dsn(&self) -> Option<String>;
    fn environment(&self) -> Option<String>;
}

/// Fixed error-tracking settings, typically read from host configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticErrorTracker {
    pub dsn: Option<String>,
    pub environment: Option<String>,
}

impl ErrorTracker for StaticErrorTracker {
    fn dsn(&self) -> Option<String> {
        self.dsn.clone()
    }

    fn environment(&self) -> Option<String> {
        self.environment.clone()
    }
}

/// Request to embed one form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormEmbed {
    pub form_id: String,
    pub csp_nonce: Option<String>,
    pub base_path: Option<String>,
    pub lang: Option<String>,
    pub html_id: Option<String>,
}

impl FormEmbed {
    pub fn new(form_id: &str) -> Self {
        Self {
            form_id: form_id.to_string(),
            ..Self::default()
        }
    }

    pub fn csp_nonce(mut self, nonce: &str) -> Self {
        self.csp_nonce = Some(nonce.to_string());
        self
    }

    pub fn base_path(mut self, path: &str) -> Self {
        self.base_path = Some(path.to_string());
        self
    }

    pub fn lang(mut self, lang: &str) -> Self {
        self.lang = Some(lang.to_string());
        self
    }

    pub fn html_id(mut self, id: &str) -> Self {
        self.html_id = Some(id.to_string());
        self
    }

    pub fn context(
        &self,
        config: &Configuration,
        tracker: Option<&dyn ErrorTracker>,
    ) -> EmbedContext {
        let (sentry_dsn, sentry_env) = match (config.use_sentry, tracker) {
            (true, Some(tracker)) => (tracker.dsn(), tracker.environment()),
            (true, None) => {
                tracing::error!("error tracking is enabled but no tracker is configured");
                (None, None)
            }
            (false, _) => (None, None),
        };

        EmbedContext {
            html_id: self
                .html_id
                .clone()
                .filter(|id| !id.is_empty())
                .unwrap_or_else(|| DEFAULT_HTML_ID.to_string()),
            base_url: config.api_root.clone(),
            form_id: self.form_id.clone(),
            base_path: self.base_path.clone(),
            csp_nonce: self.csp_nonce.clone(),
            lang: self.lang.clone(),
            sdk_css_url: config.sdk_css_url.clone(),
            sdk_js_url: config.sdk_js_url.clone(),
            sentry_dsn,
            sentry_env,
        }
    }
}

/// Everything needed to render the SDK mount point for one form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmbedContext {
    pub html_id: String,
    pub base_url: String,
    pub form_id: String,
    pub base_path: Option<String>,
    pub csp_nonce: Option<String>,
    pub lang: Option<String>,
    pub sdk_css_url: String,
    pub sdk_js_url: String,
    pub sentry_dsn: Option<String>,
    pub sentry_env: Option<String>,
}

impl EmbedContext {
    /// `data-*` attributes for the mount element; unset values are omitted.
    pub fn data_attributes(&self) -> Vec<(&'static str, &str)> {
        let mut attrs = vec![
            ("data-base-url", self.base_url.as_str()),
            ("data-form-id", self.form_id.as_str()),
        ];
        let optional = [
            ("data-base-path", &self.base_path),
            ("data-csp-nonce", &self.csp_nonce),
            ("data-lang", &self.lang),
            ("data-sentry-dsn", &self.sentry_dsn),
            ("data-sentry-env", &self.sentry_env),
        ];
        for (name, value) in optional {
            if let Some(value) = value.as_deref().filter(|v| !v.is_empty()) {
                attrs.push((name, value));
            }
        }
        attrs
    }
}

/// Context for the SDK stylesheet and script tags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SdkMedia {
    pub csp_nonce: Option<String>,
    pub sdk_css_url: String,
    pub sdk_js_url: String,
}

impl SdkMedia {
    pub fn new(config: &Configuration, csp_nonce: Option<&str>) -> Self {
        Self {
            csp_nonce: csp_nonce.map(str::to_string),
            sdk_css_url: config.sdk_css_url.clone(),
            sdk_js_url: config.sdk_js_url.clone(),
        }
    }
}
