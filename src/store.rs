use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use regex::RegexBuilder;
use thiserror::Error;
use tokio::sync::Mutex;

use crate::contact::{Contact, ContactUpdate};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("contact name already taken")]
    Duplicate,

    #[error("invalid name pattern: {0}")]
    BadPattern(#[from] regex::Error),

    #[error("store unavailable: {0}")]
    Backend(String),
}

/// Contract of the contact collection. Every operation is a single-document
/// commit; name uniqueness (case-insensitive) is the store's responsibility
/// and surfaces as [`StoreError::Duplicate`].
#[async_trait]
pub trait ContactStore: Send + Sync {
    async fn find_all(&self) -> Result<Vec<Contact>, StoreError>;

    /// Exact-name lookup. 0 or 1 hits expected, the contract returns a list.
    async fn find_by_name_exact(&self, name: &str) -> Result<Vec<Contact>, StoreError>;

    /// Case-insensitive regex filter on the name field, executed by the store.
    async fn find_by_name_regex(&self, pattern: &str) -> Result<Vec<Contact>, StoreError>;

    async fn insert(&self, contact: Contact) -> Result<Contact, StoreError>;

    /// Returns whether a document matched the name.
    async fn update_by_name(&self, name: &str, fields: ContactUpdate)
        -> Result<bool, StoreError>;

    async fn delete_by_name(&self, name: &str) -> Result<bool, StoreError>;
}

/// In-memory store with the same uniqueness semantics as the database-backed
/// one. Backs the test suite; `fail` injects a backend failure into every
/// operation.
#[derive(Default)]
pub struct MemoryStore {
    contacts: Mutex<Vec<Contact>>,
    pub fail: AtomicBool,
}

impl MemoryStore {
    pub async fn seed(&self, contacts: Vec<Contact>) {
        *self.contacts.lock().await = contacts;
    }

    pub async fn dump(&self) -> Vec<Contact> {
        self.contacts.lock().await.clone()
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.fail.load(Ordering::Relaxed) {
            return Err(StoreError::Backend("injected failure".to_string()));
        }
        Ok(())
    }
}

fn same_name(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

#[async_trait]
impl ContactStore for MemoryStore {
    async fn find_all(&self) -> Result<Vec<Contact>, StoreError> {
        self.check()?;
        Ok(self.contacts.lock().await.clone())
    }

    async fn find_by_name_exact(&self, name: &str) -> Result<Vec<Contact>, StoreError> {
        self.check()?;
        Ok(self
            .contacts
            .lock()
            .await
            .iter()
            .filter(|contact| contact.name == name)
            .cloned()
            .collect())
    }

    async fn find_by_name_regex(&self, pattern: &str) -> Result<Vec<Contact>, StoreError> {
        self.check()?;
        let matcher = RegexBuilder::new(pattern).case_insensitive(true).build()?;
        Ok(self
            .contacts
            .lock()
            .await
            .iter()
            .filter(|contact| matcher.is_match(&contact.name))
            .cloned()
            .collect())
    }

    async fn insert(&self, contact: Contact) -> Result<Contact, StoreError> {
        self.check()?;
        let mut contacts = self.contacts.lock().await;
        if contacts.iter().any(|c| same_name(&c.name, &contact.name)) {
            return Err(StoreError::Duplicate);
        }
        contacts.push(contact.clone());
        Ok(contact)
    }

    async fn update_by_name(
        &self,
        name: &str,
        fields: ContactUpdate,
    ) -> Result<bool, StoreError> {
        self.check()?;
        let mut contacts = self.contacts.lock().await;
        let Some(index) = contacts.iter().position(|c| c.name == name) else {
            return Ok(false);
        };
        if let Some(new_name) = &fields.name {
            let taken = contacts
                .iter()
                .enumerate()
                .any(|(i, c)| i != index && same_name(&c.name, new_name));
            if taken {
                return Err(StoreError::Duplicate);
            }
        }
        let contact = &mut contacts[index];
        if let Some(name) = fields.name {
            contact.name = name;
        }
        if let Some(email) = fields.email {
            contact.email = email;
        }
        if let Some(num) = fields.num {
            contact.num = num;
        }
        if let Some(is_favourite) = fields.is_favourite {
            contact.is_favourite = is_favourite;
        }
        if let Some(img) = fields.img {
            contact.img = img;
        }
        Ok(true)
    }

    async fn delete_by_name(&self, name: &str) -> Result<bool, StoreError> {
        self.check()?;
        let mut contacts = self.contacts.lock().await;
        let before = contacts.len();
        contacts.retain(|c| c.name != name);
        Ok(contacts.len() < before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contact::DEFAULT_IMG;

    fn contact(name: &str) -> Contact {
        Contact {
            name: name.to_string(),
            email: format!("{name}@example.com"),
            num: "+628123456789".to_string(),
            is_favourite: false,
            img: DEFAULT_IMG.to_string(),
        }
    }

    #[tokio::test]
    async fn test_insert_rejects_case_insensitive_duplicate() {
        let store = MemoryStore::default();
        store.insert(contact("Ann")).await.unwrap();

        let err = store.insert(contact("ANN")).await.unwrap_err();
        assert!(matches!(err, StoreError::Duplicate));
        assert_eq!(store.dump().await.len(), 1);
    }

    #[tokio::test]
    async fn test_rename_onto_taken_name_is_duplicate() {
        let store = MemoryStore::default();
        store.insert(contact("ann")).await.unwrap();
        store.insert(contact("bob")).await.unwrap();

        let update = ContactUpdate {
            name: Some("Ann".to_string()),
            ..Default::default()
        };
        let err = store.update_by_name("bob", update).await.unwrap_err();
        assert!(matches!(err, StoreError::Duplicate));
    }

    #[tokio::test]
    async fn test_rename_to_own_name_in_new_case_is_allowed() {
        let store = MemoryStore::default();
        store.insert(contact("ann")).await.unwrap();

        let update = ContactUpdate {
            name: Some("Ann".to_string()),
            ..Default::default()
        };
        assert!(store.update_by_name("ann", update).await.unwrap());
        assert_eq!(store.dump().await[0].name, "Ann");
    }

    #[tokio::test]
    async fn test_update_missing_name_matches_nothing() {
        let store = MemoryStore::default();
        assert!(!store
            .update_by_name("ghost", ContactUpdate::default())
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_regex_filter_is_case_insensitive() {
        let store = MemoryStore::default();
        store.insert(contact("Anna")).await.unwrap();
        store.insert(contact("bob")).await.unwrap();

        let hits = store.find_by_name_regex("ann").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Anna");
    }

    #[tokio::test]
    async fn test_injected_failure_hits_every_operation() {
        let store = MemoryStore::default();
        store.fail.store(true, Ordering::Relaxed);

        assert!(matches!(
            store.find_all().await.unwrap_err(),
            StoreError::Backend(_)
        ));
        assert!(matches!(
            store.insert(contact("ann")).await.unwrap_err(),
            StoreError::Backend(_)
        ));
    }
}
