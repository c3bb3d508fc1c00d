//! Choice lists of remote forms for selection controls.
//!
//! `fetch_form_choices` is the plain projection and propagates errors.
//! `get_form_choices` wraps it with the cache and never fails: a fetch error
//! yields an empty list that is not cached, so the next call retries.

use std::time::Duration;

use crate::cache::Cache;
use crate::client::OpenFormsClient;
use crate::error::ApiError;
use crate::types::{Choice, IdentifierMode};

/// How long a fetched choice list is served from the cache.
pub const CHOICES_CACHE_TTL: Duration = Duration::from_secs(60);

/// Label of the empty choice prepended for optional fields.
pub const BLANK_CHOICE_LABEL: &str = "---------";

const CACHE_KEY_PREFIX: &str = "openforms.form_choices";

/// Options for `get_form_choices`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceOptions {
    pub mode: IdentifierMode,
    pub include_blank: bool,
    pub blank_label: String,
}

impl Default for ChoiceOptions {
    fn default() -> Self {
        Self {
            mode: IdentifierMode::Slug,
            include_blank: false,
            blank_label: BLANK_CHOICE_LABEL.to_string(),
        }
    }
}

impl ChoiceOptions {
    pub fn new(use_uuids: bool, include_blank: bool) -> Self {
        Self {
            mode: IdentifierMode::from_use_uuids(use_uuids),
            include_blank,
            ..Self::default()
        }
    }

    pub fn blank_label(mut self, label: &str) -> Self {
        self.blank_label = label.to_string();
        self
    }
}

/// Cache key for a choice list; one per identifier mode.
pub fn cache_key(mode: IdentifierMode) -> String {
    format!("{CACHE_KEY_PREFIX}.{}", mode.as_str())
}

/// Fetch all forms and project them to `(identifier, name)` sorted by name.
///
/// In slug mode, forms without a slug are left out.
pub fn fetch_form_choices(
    client: &OpenFormsClient,
    mode: IdentifierMode,
) -> Result<Vec<Choice>, ApiError> {
    let forms = client.get_forms()?;
    let total = forms.len();
    let mut choices: Vec<Choice> = forms
        .iter()
        .filter_map(|form| form.summary(mode))
        .map(Choice::from)
        .collect();
    if choices.len() < total {
        tracing::debug!(
            skipped = total - choices.len(),
            mode = mode.as_str(),
            "forms without identifier left out of choices"
        );
    }
    choices.sort_by(|a, b| a.1.cmp(&b.1));
    Ok(choices)
}

/// Cached choice list for a selection control.
///
/// A null client short-circuits to an empty list without touching the
/// network or the cache.
pub fn get_form_choices(
    client: &OpenFormsClient,
    cache: &dyn Cache<Vec<Choice>>,
    options: &ChoiceOptions,
) -> Vec<Choice> {
    if !client.has_config() {
        return Vec::new();
    }

    let key = cache_key(options.mode);
    let choices = match cache.get(&key) {
        Some(cached) => cached,
        None => match fetch_form_choices(client, options.mode) {
            Ok(fetched) => {
                cache.set(&key, fetched.clone(), CHOICES_CACHE_TTL);
                fetched
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to fetch open forms choices");
                Vec::new()
            }
        },
    };

    with_blank(choices, options)
}

fn with_blank(mut choices: Vec<Choice>, options: &ChoiceOptions) -> Vec<Choice> {
    if choices.is_empty() || !options.include_blank {
        return choices;
    }
    if choices.iter().any(|(value, _)| value.is_empty()) {
        return choices;
    }
    choices.insert(0, (String::new(), options.blank_label.clone()));
    choices
}
