use bson::Document;
use catalog_search_core::Result;
use once_cell::sync::Lazy;
use prometheus::{register_histogram_vec, HistogramVec};

pub static CATALOG_FIND_SECONDS: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!("catalog_find_seconds", "Catalog find latency", &["backend"]).unwrap()
});

/// Read access to the product collection.
#[async_trait::async_trait]
pub trait Catalog: Send + Sync + 'static {
    /// Runs `filter` against the collection and applies `projection` to every match.
    async fn find(&self, filter: Document, projection: Document) -> Result<Vec<Document>>;

    async fn ping(&self) -> Result<()>;

    fn backend(&self) -> &'static str;
}
