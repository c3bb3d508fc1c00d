//! Domain DTOs for the Open Forms API.
//!
//! # Design
//! Only the fields this crate reads are typed. Everything else the API sends
//! is preserved in `Form::extra` so callers still get the raw object.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A form definition as returned by `GET forms` and `GET forms/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Form {
    pub uuid: Uuid,
    #[serde(default)]
    pub slug: Option<String>,
    pub name: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Form {
    /// Project the form into an identifier/label pair for the given mode.
    ///
    /// Returns `None` in slug mode when the slug is missing or empty.
    pub fn summary(&self, mode: IdentifierMode) -> Option<FormSummary> {
        let identifier = match mode {
            IdentifierMode::Uuid => self.uuid.to_string(),
            IdentifierMode::Slug => self.slug.clone().filter(|slug| !slug.is_empty())?,
        };
        Some(FormSummary {
            identifier,
            display_name: self.name.clone(),
        })
    }
}

/// The list endpoint answers either with a bare array or a paginated page.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum FormList {
    Plain(Vec<Form>),
    Paginated { results: Vec<Form> },
}

impl FormList {
    pub(crate) fn into_forms(self) -> Vec<Form> {
        match self {
            FormList::Plain(forms) => forms,
            FormList::Paginated { results } => results,
        }
    }
}

/// Which form attribute identifies a form in a choice list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdentifierMode {
    Uuid,
    Slug,
}

impl IdentifierMode {
    pub fn from_use_uuids(use_uuids: bool) -> Self {
        if use_uuids {
            IdentifierMode::Uuid
        } else {
            IdentifierMode::Slug
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            IdentifierMode::Uuid => "uuid",
            IdentifierMode::Slug => "slug",
        }
    }
}

/// Identifier and display name of a single form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormSummary {
    pub identifier: String,
    pub display_name: String,
}

/// `(identifier, label)` pair for a selection control.
pub type Choice = (String, String);

impl From<FormSummary> for Choice {
    fn from(summary: FormSummary) -> Self {
        (summary.identifier, summary.display_name)
    }
}
