//! Book model

use bson::{oid::ObjectId, Bson};
use serde::{de, Deserialize, Deserializer, Serialize};
use serde_with::{serde_as, NoneAsEmptyString, PickFirst};
use utoipa::ToSchema;

/// Book as returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Book {
    /// Store-assigned identifier (24 hex characters)
    #[schema(example = "65a1f0c2e4b0a1b2c3d4e5f6")]
    pub id: String,
    #[schema(example = "Dune")]
    pub title: Option<String>,
    #[schema(example = "Herbert")]
    pub author: Option<String>,
    #[schema(example = 1965)]
    pub year: Option<i32>,
}

/// Create/update book request.
///
/// Every field is optional. `year` accepts a number or a numeric string,
/// an empty string means no year.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BookInput {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    #[serde_as(as = "PickFirst<(Option<_>, NoneAsEmptyString)>")]
    #[schema(value_type = Option<i32>)]
    pub year: Option<i32>,
}

/// Book document as stored in the `books` collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookDocument {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub title: Option<String>,
    pub author: Option<String>,
    #[serde(default, deserialize_with = "deserialize_stored_year")]
    pub year: Option<i32>,
}

/// Stored years may be any BSON number; documents written by other clients
/// keep them as doubles. Fractional parts are dropped.
fn deserialize_stored_year<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Bson>::deserialize(deserializer)? {
        None | Some(Bson::Null) => Ok(None),
        Some(Bson::Int32(v)) => Ok(Some(v)),
        Some(Bson::Int64(v)) => i32::try_from(v)
            .map(Some)
            .map_err(|_| de::Error::custom(format!("year out of range: {}", v))),
        Some(Bson::Double(v)) if v.is_finite() && v.abs() <= i32::MAX as f64 => {
            Ok(Some(v.trunc() as i32))
        }
        Some(other) => Err(de::Error::custom(format!("invalid year: {}", other))),
    }
}

impl BookDocument {
    /// New document with a freshly generated id
    pub fn new(input: BookInput) -> Self {
        Self {
            id: ObjectId::new(),
            title: input.title,
            author: input.author,
            year: input.year,
        }
    }

    /// Replace all mutable fields, keeping the id
    pub fn replace_fields(&mut self, input: BookInput) {
        self.title = input.title;
        self.author = input.author;
        self.year = input.year;
    }
}

impl From<BookDocument> for Book {
    fn from(doc: BookDocument) -> Self {
        Self {
            id: doc.id.to_hex(),
            title: doc.title,
            author: doc.author,
            year: doc.year,
        }
    }
}

/// Confirmation returned by state-changing endpoints
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
    /// Id of the created book, only set on creation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            id: None,
        }
    }

    pub fn with_id(message: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            id: Some(id.into()),
        }
    }
}
