//! Cart item documents.
//!
//! A cart item is an open-schema document: `_id` is assigned by the store,
//! `product` and `quantity` are checked for presence, and every other field is
//! stored as supplied.

use mongodb::bson::{self, oid::ObjectId, Document};
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use service_core::error::AppError;

pub const ID_FIELD: &str = "_id";
pub const PRODUCT_FIELD: &str = "product";
pub const QUANTITY_FIELD: &str = "quantity";

pub const INVALID_ID_MESSAGE: &str = "Invalid cart item ID.";
pub const REQUIRED_FIELDS_MESSAGE: &str = "Product and quantity are required fields.";
pub const UPDATE_FIELDS_MESSAGE: &str =
    "At least one of product or quantity must be provided for update.";
pub const UNSTORABLE_VALUE_MESSAGE: &str = "Request body contains values that cannot be stored.";

/// A persisted cart item.
#[derive(Debug, Clone, PartialEq)]
pub struct CartItem {
    pub id: ObjectId,
    /// Every field except `_id`.
    pub fields: Document,
}

impl CartItem {
    pub fn new(id: ObjectId, mut fields: Document) -> Self {
        fields.remove(ID_FIELD);
        Self { id, fields }
    }

    /// Splits a raw store document into its identifier and fields.
    pub fn from_document(mut document: Document) -> Result<Self, bson::document::ValueAccessError> {
        let id = document.get_object_id(ID_FIELD)?;
        document.remove(ID_FIELD);
        Ok(Self {
            id,
            fields: document,
        })
    }

    pub fn into_document(self) -> Document {
        let mut document = Document::new();
        document.insert(ID_FIELD, self.id);
        for (key, value) in self.fields {
            document.insert(key, value);
        }
        document
    }

    /// JSON view: `_id` as a hex string, other fields as relaxed extended JSON.
    pub fn to_json(&self) -> Value {
        let mut map = Map::new();
        map.insert(ID_FIELD.to_string(), Value::String(self.id.to_hex()));
        for (key, value) in &self.fields {
            map.insert(key.clone(), value.clone().into_relaxed_extjson());
        }
        Value::Object(map)
    }
}

impl Serialize for CartItem {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

/// Validated body of a create request.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCartItem {
    fields: Document,
}

impl NewCartItem {
    pub fn into_fields(self) -> Document {
        self.fields
    }
}

impl TryFrom<Map<String, Value>> for NewCartItem {
    type Error = AppError;

    fn try_from(mut body: Map<String, Value>) -> Result<Self, Self::Error> {
        if !is_truthy(body.get(PRODUCT_FIELD)) || !is_truthy(body.get(QUANTITY_FIELD)) {
            return Err(AppError::ValidationError(REQUIRED_FIELDS_MESSAGE.to_string()));
        }

        // Identifiers are store-assigned.
        body.remove(ID_FIELD);

        Ok(Self {
            fields: to_fields(&body)?,
        })
    }
}

/// Validated body of an update request: a shallow set of top-level fields.
#[derive(Debug, Clone, PartialEq)]
pub struct CartItemPatch {
    fields: Document,
}

impl CartItemPatch {
    pub fn fields(&self) -> &Document {
        &self.fields
    }

    pub fn into_fields(self) -> Document {
        self.fields
    }
}

impl TryFrom<Map<String, Value>> for CartItemPatch {
    type Error = AppError;

    fn try_from(mut body: Map<String, Value>) -> Result<Self, Self::Error> {
        if !is_truthy(body.get(PRODUCT_FIELD)) && !is_truthy(body.get(QUANTITY_FIELD)) {
            return Err(AppError::ValidationError(UPDATE_FIELDS_MESSAGE.to_string()));
        }

        // `_id` is immutable once assigned.
        body.remove(ID_FIELD);

        Ok(Self {
            fields: to_fields(&body)?,
        })
    }
}

/// Parses a path identifier. Only 24-character hex ObjectIds are accepted.
pub fn parse_id(id: &str) -> Result<ObjectId, AppError> {
    ObjectId::parse_str(id).map_err(|_| AppError::ValidationError(INVALID_ID_MESSAGE.to_string()))
}

/// JSON truthiness: missing, null, false, zero and the empty string are falsy.
pub fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().map_or(true, |f| f != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}

fn to_fields(body: &Map<String, Value>) -> Result<Document, AppError> {
    bson::to_document(body).map_err(|e| {
        tracing::debug!(error = %e, "Request body could not be converted to BSON");
        AppError::ValidationError(UNSTORABLE_VALUE_MESSAGE.to_string())
    })
}
