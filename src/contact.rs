use serde::{Deserialize, Serialize};

/// Image path stored when a contact is created without an upload.
pub const DEFAULT_IMG: &str = "img/Default.jpg";

/// A single contact document. Field names follow the collection's
/// camelCase convention.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub name: String,
    pub email: String,
    pub num: String,
    #[serde(default)]
    pub is_favourite: bool,
    #[serde(default = "default_img")]
    pub img: String,
}

fn default_img() -> String {
    DEFAULT_IMG.to_string()
}

/// Partial update payload. Only set fields reach the store, so a
/// favourite toggle never touches the rest of the document.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_favourite: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub img: Option<String>,
}

pub fn all_non_favourite(contacts: &[Contact]) -> bool {
    contacts.iter().all(|contact| !contact.is_favourite)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contact(name: &str, favourite: bool) -> Contact {
        Contact {
            name: name.to_string(),
            email: format!("{name}@example.com"),
            num: "+628123456789".to_string(),
            is_favourite: favourite,
            img: DEFAULT_IMG.to_string(),
        }
    }

    #[test]
    fn test_all_non_favourite() {
        assert!(all_non_favourite(&[]));
        assert!(all_non_favourite(&[contact("ann", false), contact("bob", false)]));
        assert!(!all_non_favourite(&[contact("ann", true), contact("bob", false)]));
    }

    #[test]
    fn test_update_serializes_only_set_fields() {
        let update = ContactUpdate {
            is_favourite: Some(true),
            ..Default::default()
        };
        let doc = serde_json::to_value(&update).unwrap();
        assert_eq!(doc, serde_json::json!({ "isFavourite": true }));
    }
}
