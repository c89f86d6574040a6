use regex::Regex;
use thiserror::Error;

use crate::contact::Contact;
use crate::search::find_by_name;
use crate::store::{ContactStore, StoreError};

/// Form-level failures. These accumulate per request and re-render the
/// originating form; they never become HTTP error statuses.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Not a valid e-mail address")]
    InvalidEmail,

    #[error("Not a valid phone num")]
    InvalidPhone,

    #[error("Contact already exists")]
    DuplicateContact,

    #[error("Contact not found")]
    ContactNotFound,
}

/// Submitted contact fields, shared by the add and update forms.
#[derive(Debug, Default, Clone)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub num: String,
}

pub fn is_valid_email(email: &str) -> bool {
    let syntax = Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").unwrap();
    syntax.is_match(email)
}

pub fn is_valid_phone(num: &str) -> bool {
    let syntax = Regex::new(r"^\+?[0-9]{8,15}$").unwrap();
    syntax.is_match(num)
}

/// Rewrites a local trunk prefix to the international form: "08..." becomes
/// "+628...". Anything else is stored as given.
pub fn normalize_phone(num: &str) -> String {
    match num.strip_prefix("08") {
        Some(rest) => format!("+628{rest}"),
        None => num.to_string(),
    }
}

fn check_syntax(form: &ContactForm, errors: &mut Vec<ValidationError>) {
    if !is_valid_phone(&form.num) {
        errors.push(ValidationError::InvalidPhone);
    }
    if !is_valid_email(&form.email) {
        errors.push(ValidationError::InvalidEmail);
    }
}

/// All add-form failures at once: duplicate name (whole-word, any case),
/// phone syntax, email syntax.
pub async fn validate_new(
    store: &dyn ContactStore,
    form: &ContactForm,
) -> Result<Vec<ValidationError>, StoreError> {
    let mut errors = Vec::new();
    if !find_by_name(store, &form.name).await?.is_empty() {
        errors.push(ValidationError::DuplicateContact);
    }
    check_syntax(form, &mut errors);
    Ok(errors)
}

/// Update-form failures plus the contacts matching `old_name`. The duplicate
/// check is skipped only when the name is unchanged case-insensitively.
pub async fn validate_update(
    store: &dyn ContactStore,
    old_name: &str,
    form: &ContactForm,
) -> Result<(Vec<ValidationError>, Vec<Contact>), StoreError> {
    let existing = find_by_name(store, old_name).await?;
    let mut errors = Vec::new();
    if existing.is_empty() {
        errors.push(ValidationError::ContactNotFound);
    }
    if old_name.to_lowercase() != form.name.to_lowercase()
        && !find_by_name(store, &form.name).await?.is_empty()
    {
        errors.push(ValidationError::DuplicateContact);
    }
    check_syntax(form, &mut errors);
    Ok((errors, existing))
}
