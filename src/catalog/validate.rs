use std::collections::BTreeMap;
use std::fmt;

use super::model::{AppDraft, Field};
use crate::util::{validate_url, UrlValidationError};

pub const NAME_REQUIRED: &str = "App name is required";
pub const DESCRIPTION_REQUIRED: &str = "App description is required";
pub const CATEGORY_REQUIRED: &str = "Please choose a category";
pub const URL_REQUIRED: &str = "App URL is required";
pub const URL_INVALID: &str = "Please enter a valid URL";

// ============================================================================
// Validation Errors
// ============================================================================

/// Field-level validation failures, one message per offending field.
///
/// Every rule is checked independently, so a draft with several problems
/// reports all of them at once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: BTreeMap<Field, &'static str>,
}

impl ValidationErrors {
    pub fn get(&self, field: Field) -> Option<&'static str> {
        self.errors.get(&field).copied()
    }

    pub fn contains(&self, field: Field) -> bool {
        self.errors.contains_key(&field)
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Offending fields with their messages, in form order.
    pub fn iter(&self) -> impl Iterator<Item = (Field, &'static str)> + '_ {
        self.errors.iter().map(|(field, msg)| (*field, *msg))
    }

    fn insert(&mut self, field: Field, message: &'static str) {
        self.errors.insert(field, message);
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in self.iter() {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", field, message)?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

// ============================================================================
// Validated Draft
// ============================================================================

/// A draft that passed [`validate`]. Only obtainable through validation, so
/// collection operations that take one never see unchecked input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedDraft(AppDraft);

impl ValidatedDraft {
    pub fn as_draft(&self) -> &AppDraft {
        &self.0
    }

    pub fn into_inner(self) -> AppDraft {
        self.0
    }
}

// ============================================================================
// Validation
// ============================================================================

/// Validate a draft before it is added or saved.
///
/// - `name`, `description`: non-empty after trimming
/// - `category`: non-empty (membership in the offered list is the caller's concern)
/// - `url`: non-empty after trimming and a well-formed absolute URL
///
/// No network access is performed.
pub fn validate(draft: AppDraft) -> Result<ValidatedDraft, ValidationErrors> {
    let errors = check(&draft);
    if errors.is_empty() {
        Ok(ValidatedDraft(draft))
    } else {
        Err(errors)
    }
}

/// Run every rule and collect failures without consuming the draft.
pub fn check(draft: &AppDraft) -> ValidationErrors {
    let mut errors = ValidationErrors::default();

    if draft.name.trim().is_empty() {
        errors.insert(Field::Name, NAME_REQUIRED);
    }
    if draft.description.trim().is_empty() {
        errors.insert(Field::Description, DESCRIPTION_REQUIRED);
    }
    if draft.category.is_empty() {
        errors.insert(Field::Category, CATEGORY_REQUIRED);
    }
    match validate_url(&draft.url) {
        Ok(_) => {}
        Err(UrlValidationError::Empty) => errors.insert(Field::Url, URL_REQUIRED),
        Err(_) => errors.insert(Field::Url, URL_INVALID),
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn valid_draft() -> AppDraft {
        AppDraft {
            name: "mii maker online".to_string(),
            description: "Create your perfect Mii avatar".to_string(),
            category: "开发".to_string(),
            url: "https://miimaker.online/".to_string(),
            ..AppDraft::default()
        }
    }

    #[test]
    fn test_valid_draft_passes() {
        let validated = validate(valid_draft()).unwrap();
        assert_eq!(validated.as_draft(), &valid_draft());
    }

    #[test]
    fn test_collects_all_failures() {
        let draft = AppDraft {
            name: String::new(),
            description: "x".to_string(),
            category: "工具".to_string(),
            url: "not-a-url".to_string(),
            ..AppDraft::default()
        };
        let errors = validate(draft).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors.get(Field::Name), Some(NAME_REQUIRED));
        assert_eq!(errors.get(Field::Url), Some(URL_INVALID));
        assert!(!errors.contains(Field::Description));
    }

    #[test]
    fn test_whitespace_only_is_empty() {
        let draft = AppDraft {
            name: "   ".to_string(),
            description: "\t\n".to_string(),
            url: "  ".to_string(),
            category: String::new(),
            ..AppDraft::default()
        };
        let errors = check(&draft);
        let fields: Vec<Field> = errors.iter().map(|(f, _)| f).collect();
        assert_eq!(
            fields,
            vec![Field::Name, Field::Description, Field::Category, Field::Url]
        );
        assert_eq!(errors.get(Field::Url), Some(URL_REQUIRED));
    }

    #[test]
    fn test_display_lists_fields_in_order() {
        let draft = AppDraft {
            url: "nope".to_string(),
            name: String::new(),
            ..valid_draft()
        };
        let errors = check(&draft);
        assert_eq!(
            errors.to_string(),
            "name: App name is required; url: Please enter a valid URL"
        );
    }
}
