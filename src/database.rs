//! # MongoDB
//!
//! Document store for contact records.
//!
//! ## Collection
//!
//! - `contacts`, created with a `$jsonSchema` validator: `name`, `email` and
//!   `num` are required strings, `isFavourite` a bool, `img` a string.
//! - Unique index on `name` with case-insensitive collation (strength 2).
//!   The index is what actually enforces the no-duplicate-names invariant;
//!   the form-level pre-check only exists for friendlier error lists, so two
//!   racing inserts cannot both land.
//!
//! ## Operations
//!
//! Single-document reads and writes only, committed immediately. Regex name
//! filters run server-side with the `i` option. Duplicate-key write failures
//! (code 11000) surface as [`StoreError::Duplicate`].

use std::sync::Arc;

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, to_document, Bson, Regex as BsonRegex},
    error::{ErrorKind, WriteFailure},
    options::{Collation, CollationStrength, CreateCollectionOptions, IndexOptions},
    Client, Collection, IndexModel,
};
use tracing::debug;

use crate::contact::{Contact, ContactUpdate};
use crate::store::{ContactStore, StoreError};

pub const CONTACTS_COLLECTION: &str = "contacts";

pub struct MongoStore {
    contacts: Collection<Contact>,
}

pub async fn init_mongo(mongo_url: &str, mongo_db: &str) -> Arc<MongoStore> {
    let client = Client::with_uri_str(mongo_url)
        .await
        .expect("Mongo misconfigured!");
    let db = client.database(mongo_db);

    let validator = doc! {
        "$jsonSchema": {
            "bsonType": "object",
            "required": ["name", "email", "num"],
            "properties": {
                "name": { "bsonType": "string" },
                "email": { "bsonType": "string" },
                "num": { "bsonType": "string" },
                "isFavourite": { "bsonType": "bool" },
                "img": { "bsonType": "string" },
            },
        },
    };
    let options = CreateCollectionOptions::builder()
        .validator(validator)
        .build();
    if let Err(err) = db.create_collection(CONTACTS_COLLECTION, options).await {
        // NamespaceExists on every start after the first
        debug!("create_collection: {err}");
    }

    let contacts = db.collection::<Contact>(CONTACTS_COLLECTION);
    let index = IndexModel::builder()
        .keys(doc! { "name": 1 })
        .options(
            IndexOptions::builder()
                .unique(true)
                .collation(
                    Collation::builder()
                        .locale("en")
                        .strength(CollationStrength::Secondary)
                        .build(),
                )
                .build(),
        )
        .build();
    contacts
        .create_index(index, None)
        .await
        .expect("Contact name index misconfigured!");

    Arc::new(MongoStore { contacts })
}

fn map_err(err: mongodb::error::Error) -> StoreError {
    if is_duplicate_key(&err) {
        StoreError::Duplicate
    } else {
        StoreError::Backend(err.to_string())
    }
}

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(write_error)) => write_error.code == 11000,
        ErrorKind::Command(command_error) => command_error.code == 11000,
        _ => false,
    }
}

fn name_regex(pattern: &str) -> Bson {
    Bson::RegularExpression(BsonRegex {
        pattern: pattern.to_string(),
        options: "i".to_string(),
    })
}

#[async_trait]
impl ContactStore for MongoStore {
    async fn find_all(&self) -> Result<Vec<Contact>, StoreError> {
        let cursor = self.contacts.find(None, None).await.map_err(map_err)?;
        cursor.try_collect().await.map_err(map_err)
    }

    async fn find_by_name_exact(&self, name: &str) -> Result<Vec<Contact>, StoreError> {
        let cursor = self
            .contacts
            .find(doc! { "name": name }, None)
            .await
            .map_err(map_err)?;
        cursor.try_collect().await.map_err(map_err)
    }

    async fn find_by_name_regex(&self, pattern: &str) -> Result<Vec<Contact>, StoreError> {
        let cursor = self
            .contacts
            .find(doc! { "name": name_regex(pattern) }, None)
            .await
            .map_err(map_err)?;
        cursor.try_collect().await.map_err(map_err)
    }

    async fn insert(&self, contact: Contact) -> Result<Contact, StoreError> {
        self.contacts
            .insert_one(&contact, None)
            .await
            .map_err(map_err)?;
        Ok(contact)
    }

    async fn update_by_name(
        &self,
        name: &str,
        fields: ContactUpdate,
    ) -> Result<bool, StoreError> {
        let changes = to_document(&fields).map_err(|e| StoreError::Backend(e.to_string()))?;
        let result = self
            .contacts
            .update_one(doc! { "name": name }, doc! { "$set": changes }, None)
            .await
            .map_err(map_err)?;
        Ok(result.matched_count > 0)
    }

    async fn delete_by_name(&self, name: &str) -> Result<bool, StoreError> {
        let result = self
            .contacts
            .delete_one(doc! { "name": name }, None)
            .await
            .map_err(map_err)?;
        Ok(result.deleted_count > 0)
    }
}
