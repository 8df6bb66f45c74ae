use crate::traits::{Catalog, CATALOG_FIND_SECONDS};
use bson::{Bson, Document};
use catalog_search_core::{Result, SearchError};
use parking_lot::RwLock;
use regex::RegexBuilder;
use std::cmp::Ordering;
use std::sync::Arc;

/// Process-local catalog that evaluates filter documents itself.
///
/// Supports the operators the search endpoint emits (`$lte`, `$regex` with
/// `$options`) plus `$lt`, `$gt`, `$gte`, `$eq` and plain equality. Projections
/// are exclusion-only.
#[derive(Clone, Default)]
pub struct InMemoryCatalog {
    docs: Arc<RwLock<Vec<Document>>>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_documents(docs: Vec<Document>) -> Self {
        Self {
            docs: Arc::new(RwLock::new(docs)),
        }
    }

    pub fn insert(&self, doc: Document) {
        self.docs.write().push(doc);
    }

    pub fn len(&self) -> usize {
        self.docs.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.read().is_empty()
    }
}

#[async_trait::async_trait]
impl Catalog for InMemoryCatalog {
    async fn find(&self, filter: Document, projection: Document) -> Result<Vec<Document>> {
        let _timer = CATALOG_FIND_SECONDS
            .with_label_values(&[self.backend()])
            .start_timer();
        let docs = self.docs.read();
        let mut out = Vec::new();
        for d in docs.iter() {
            if matches(d, &filter)? {
                out.push(project(d, &projection)?);
            }
        }
        Ok(out)
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

fn matches(doc: &Document, filter: &Document) -> Result<bool> {
    for (field, cond) in filter.iter() {
        let value = doc.get(field);
        let ok = match cond {
            Bson::Document(ops) if is_operator_doc(ops) => eval_ops(value, ops)?,
            other => value == Some(other),
        };
        if !ok {
            return Ok(false);
        }
    }
    Ok(true)
}

fn is_operator_doc(d: &Document) -> bool {
    !d.is_empty() && d.keys().all(|k| k.starts_with('$'))
}

fn eval_ops(value: Option<&Bson>, ops: &Document) -> Result<bool> {
    for (op, arg) in ops.iter() {
        let ok = match op.as_str() {
            "$regex" => eval_regex(value, arg, ops)?,
            // consumed by $regex
            "$options" => true,
            "$eq" => value == Some(arg),
            "$lt" => compare(value, arg) == Some(Ordering::Less),
            "$lte" => matches!(compare(value, arg), Some(Ordering::Less | Ordering::Equal)),
            "$gt" => compare(value, arg) == Some(Ordering::Greater),
            "$gte" => matches!(
                compare(value, arg),
                Some(Ordering::Greater | Ordering::Equal)
            ),
            other => {
                return Err(SearchError::InvalidFilter(format!(
                    "unsupported operator {}",
                    other
                )))
            }
        };
        if !ok {
            return Ok(false);
        }
    }
    Ok(true)
}

fn eval_regex(value: Option<&Bson>, pattern: &Bson, ops: &Document) -> Result<bool> {
    let Bson::String(pattern) = pattern else {
        return Err(SearchError::InvalidFilter("$regex expects a string".into()));
    };
    let options = ops.get_str("$options").unwrap_or("");
    let re = RegexBuilder::new(pattern)
        .case_insensitive(options.contains('i'))
        .multi_line(options.contains('m'))
        .dot_matches_new_line(options.contains('s'))
        .build()
        .map_err(|e| SearchError::InvalidFilter(e.to_string()))?;
    Ok(matches!(value, Some(Bson::String(s)) if re.is_match(s)))
}

fn as_number(b: &Bson) -> Option<f64> {
    match b {
        Bson::Double(f) => Some(*f),
        Bson::Int32(i) => Some(f64::from(*i)),
        Bson::Int64(i) => Some(*i as f64),
        _ => None,
    }
}

// Numbers compare across int/double; strings lexically; anything else never matches.
fn compare(value: Option<&Bson>, arg: &Bson) -> Option<Ordering> {
    let value = value?;
    if let (Some(a), Some(b)) = (as_number(value), as_number(arg)) {
        return a.partial_cmp(&b);
    }
    match (value, arg) {
        (Bson::String(a), Bson::String(b)) => Some(a.cmp(b)),
        _ => None,
    }
}

fn project(doc: &Document, projection: &Document) -> Result<Document> {
    let mut out = doc.clone();
    for (field, flag) in projection.iter() {
        let exclude = match flag {
            Bson::Boolean(b) => !b,
            other => as_number(other) == Some(0.0),
        };
        if !exclude {
            return Err(SearchError::InvalidFilter(format!(
                "inclusion projection on {} is not supported",
                field
            )));
        }
        out.remove(field);
    }
    Ok(out)
}
