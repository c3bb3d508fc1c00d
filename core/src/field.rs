//! Form-selection field: the choice list a host renders as a select box,
//! plus validation of the submitted value.

use thiserror::Error;
use uuid::Uuid;

use crate::cache::Cache;
use crate::choices::{get_form_choices, ChoiceOptions};
use crate::client::OpenFormsClient;
use crate::types::{Choice, IdentifierMode};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FieldError {
    #[error("this field is required")]
    Required,

    #[error("select a valid choice; {0:?} is not one of the available forms")]
    InvalidChoice(String),

    #[error("{0:?} is not a valid UUID")]
    InvalidUuid(String),
}

/// A field referencing one remote form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormField {
    /// An empty value is allowed.
    pub blank: bool,
    pub mode: IdentifierMode,
}

impl FormField {
    pub fn new(mode: IdentifierMode) -> Self {
        Self { blank: false, mode }
    }

    pub fn optional(mut self) -> Self {
        self.blank = true;
        self
    }

    pub fn required(&self) -> bool {
        !self.blank
    }

    /// Choices for the select widget; optional fields get a blank entry.
    pub fn choices(&self, client: &OpenFormsClient, cache: &dyn Cache<Vec<Choice>>) -> Vec<Choice> {
        let options = ChoiceOptions {
            mode: self.mode,
            include_blank: self.blank,
            ..ChoiceOptions::default()
        };
        get_form_choices(client, cache, &options)
    }

    /// Validate a submitted value against `choices`.
    ///
    /// Returns `Ok(None)` for an accepted empty value. UUIDs are returned in
    /// their canonical hyphenated lowercase form.
    pub fn clean(&self, value: &str, choices: &[Choice]) -> Result<Option<String>, FieldError> {
        let value = value.trim();
        if value.is_empty() {
            return if self.blank {
                Ok(None)
            } else {
                Err(FieldError::Required)
            };
        }

        let value = match self.mode {
            IdentifierMode::Uuid => Uuid::parse_str(value)
                .map_err(|_| FieldError::InvalidUuid(value.to_string()))?
                .to_string(),
            IdentifierMode::Slug => value.to_string(),
        };

        if choices.iter().any(|(identifier, _)| *identifier == value) {
            Ok(Some(value))
        } else {
            Err(FieldError::InvalidChoice(value))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryCache;
    use crate::config::ClientConfig;
    use crate::http::HttpMethod;
    use crate::test_support::ScriptedTransport;
    use std::sync::Arc;
    use std::time::Duration;

    const FORMS: &str = "https://example.com/api/v1/forms";

    fn client(transport: &Arc<ScriptedTransport>) -> OpenFormsClient {
        transport.respond(
            HttpMethod::Get,
            FORMS,
            200,
            r#"[
                {"uuid":"1b0d0675-2caf-48e8-beda-c32c6732b63c","slug":"test-2","name":"Test 2"},
                {"uuid":"f4423c99-6341-442e-aedc-b47779579f4d","slug":"test-1","name":"Test 1"}
            ]"#,
        );
        OpenFormsClient::with_transport(
            ClientConfig::new("https://example.com/api/v1/", "token", Duration::from_secs(5)),
            transport.clone(),
        )
    }

    #[test]
    fn required_field_has_no_blank_choice() {
        let transport = Arc::new(ScriptedTransport::new());
        let cache: MemoryCache<Vec<Choice>> = MemoryCache::new();
        let field = FormField::new(IdentifierMode::Uuid);

        assert!(field.required());
        let choices = field.choices(&client(&transport), &cache);
        assert_eq!(
            choices,
            vec![
                ("f4423c99-6341-442e-aedc-b47779579f4d".to_string(), "Test 1".to_string()),
                ("1b0d0675-2caf-48e8-beda-c32c6732b63c".to_string(), "Test 2".to_string()),
            ]
        );
    }

    #[test]
    fn optional_field_gets_blank_choice() {
        let transport = Arc::new(ScriptedTransport::new());
        let cache: MemoryCache<Vec<Choice>> = MemoryCache::new();
        let field = FormField::new(IdentifierMode::Slug).optional();

        let choices = field.choices(&client(&transport), &cache);
        assert_eq!(choices.len(), 3);
        assert_eq!(choices[0].0, "");
    }

    #[test]
    fn valid_uuid_is_accepted() {
        let transport = Arc::new(ScriptedTransport::new());
        let cache: MemoryCache<Vec<Choice>> = MemoryCache::new();
        let field = FormField::new(IdentifierMode::Uuid);
        let choices = field.choices(&client(&transport), &cache);

        let cleaned = field
            .clean("F4423C99-6341-442E-AEDC-B47779579F4D", &choices)
            .unwrap();
        assert_eq!(cleaned.as_deref(), Some("f4423c99-6341-442e-aedc-b47779579f4d"));
    }

    #[test]
    fn unknown_uuid_is_rejected() {
        let transport = Arc::new(ScriptedTransport::new());
        let cache: MemoryCache<Vec<Choice>> = MemoryCache::new();
        let field = FormField::new(IdentifierMode::Uuid);
        let choices = field.choices(&client(&transport), &cache);

        let err = field
            .clean("3285e94f-adae-4a5c-a467-30690a279364", &choices)
            .unwrap_err();
        assert!(matches!(err, FieldError::InvalidChoice(_)));
    }

    #[test]
    fn malformed_uuid_is_rejected() {
        let field = FormField::new(IdentifierMode::Uuid);
        let err = field.clean("not-a-uuid", &[]).unwrap_err();
        assert_eq!(err, FieldError::InvalidUuid("not-a-uuid".to_string()));
    }

    #[test]
    fn empty_value() {
        assert_eq!(FormField::new(IdentifierMode::Slug).clean("", &[]), Err(FieldError::Required));
        assert_eq!(FormField::new(IdentifierMode::Slug).optional().clean("  ", &[]), Ok(None));
    }

    #[test]
    fn slug_is_matched_verbatim() {
        let choices = vec![("test-1".to_string(), "Test 1".to_string())];
        let field = FormField::new(IdentifierMode::Slug);
        assert_eq!(field.clean("test-1", &choices), Ok(Some("test-1".to_string())));
        assert!(field.clean("Test-1", &choices).is_err());
    }
}
