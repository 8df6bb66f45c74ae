use bson::{doc, Document};
use serde::{Deserialize, Serialize};

pub const ID_FIELD: &str = "_id";
pub const NAME_FIELD: &str = "name";
pub const PRICE_FIELD: &str = "price";

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct SearchRequest {
    // free text, matched as a case-insensitive substring of `name`; required in the body
    pub query: String,
    #[serde(default)]
    pub max_price: Option<f64>,
}

/// Builds the collection filter for a search request.
///
/// A zero `max_price` means "no ceiling". The query is escaped before it is
/// handed to `$regex`, so the match stays a literal substring.
pub fn build_filter(req: &SearchRequest) -> Document {
    let mut filter = Document::new();
    if let Some(max) = req.max_price.filter(|p| *p != 0.0) {
        filter.insert(PRICE_FIELD, doc! { "$lte": max });
    }
    if !req.query.is_empty() {
        filter.insert(
            NAME_FIELD,
            doc! { "$regex": regex::escape(&req.query), "$options": "i" },
        );
    }
    filter
}

pub fn id_projection() -> Document {
    doc! { "_id": 0 }
}
