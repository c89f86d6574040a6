//! Listing order and the two name-matching policies.
//!
//! Substring and whole-word matching are distinct on purpose: general search
//! uses the substring form, duplicate detection and favourite lookup use the
//! whole-word form. "ann" substring-matches "Anna" but whole-word-matches
//! only a contact literally named "ann".

use crate::contact::Contact;
use crate::store::{ContactStore, StoreError};

/// Stable sort by lowercase name. Contacts whose names only differ in case
/// keep their insertion order.
pub fn sort_by_name(contacts: &mut [Contact]) {
    contacts.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
}

/// Case-insensitive substring match; the term is a literal, not a regex.
pub fn substring_pattern(term: &str) -> String {
    regex::escape(term)
}

/// Case-insensitive delimited-word match.
pub fn whole_word_pattern(term: &str) -> String {
    format!(r"\b{}\b", regex::escape(term))
}

pub async fn search_by_name(
    store: &dyn ContactStore,
    term: &str,
) -> Result<Vec<Contact>, StoreError> {
    store.find_by_name_regex(&substring_pattern(term)).await
}

pub async fn find_by_name(
    store: &dyn ContactStore,
    term: &str,
) -> Result<Vec<Contact>, StoreError> {
    store.find_by_name_regex(&whole_word_pattern(term)).await
}
