//! Client for the Open Forms API, meant to be embedded by a host site.
//!
//! # Overview
//! - `OpenFormsClient` performs authenticated, single-attempt requests
//!   against a configured API root with a bounded timeout.
//! - `OpenFormsClient::is_healthy` turns every failure into a
//!   `(false, message)` pair for operator-facing status pages.
//! - `get_form_choices` builds the sorted `(identifier, label)` list for a
//!   select box and caches it for a minute in an injected `Cache`.
//! - `FormField` validates a submitted form reference; `FormEmbed` assembles
//!   what a template needs to mount the forms SDK.
//!
//! # Design
//! - No global state: configuration, cache and error tracking are values
//!   handed to constructors or functions.
//! - Request building and response parsing are pure; the `Transport` trait
//!   is the only I/O seam, so tests script responses without a network.
//! - Library-facing fetches (`get_forms`, `get_form`) propagate errors. The
//!   health check and choice list never fail.

pub mod cache;
pub mod choices;
pub mod client;
pub mod config;
pub mod embed;
pub mod error;
pub mod field;
mod health;
pub mod http;
pub mod types;

#[cfg(test)]
mod test_support;

pub use cache::{Cache, CacheEntry, Clock, ManualClock, MemoryCache, SystemClock};
pub use choices::{
    cache_key, fetch_form_choices, get_form_choices, ChoiceOptions, BLANK_CHOICE_LABEL,
    CHOICES_CACHE_TTL,
};
pub use client::OpenFormsClient;
pub use config::{ClientConfig, Configuration, DEFAULT_CLIENT_TIMEOUT};
pub use embed::{EmbedContext, ErrorTracker, FormEmbed, SdkMedia, StaticErrorTracker};
pub use error::{ApiError, ConfigError, TransportError};
pub use field::{FieldError, FormField};
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport, UreqTransport};
pub use types::{Choice, Form, FormSummary, IdentifierMode};
