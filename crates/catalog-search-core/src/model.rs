use crate::query::ID_FIELD;
use bson::{Bson, Document};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SearchResponse {
    pub results: Vec<JsonValue>,
}

impl SearchResponse {
    pub fn from_documents(docs: Vec<Document>) -> Self {
        Self {
            results: docs.into_iter().map(document_to_json).collect(),
        }
    }
}

// Products are stored by an external writer; pass every field through except the id.
pub fn document_to_json(mut doc: Document) -> JsonValue {
    doc.remove(ID_FIELD);
    Bson::Document(doc).into_relaxed_extjson()
}
