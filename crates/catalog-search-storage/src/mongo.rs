use crate::traits::{Catalog, CATALOG_FIND_SECONDS};
use bson::{doc, Document};
use catalog_search_core::{Config, Result, SearchError};
use futures::TryStreamExt;
use mongodb::options::{ClientOptions, FindOptions};
use mongodb::{Client, Collection, Database};
use tracing::info;

#[derive(Clone)]
pub struct MongoCatalog {
    db: Database,
    products: Collection<Document>,
}

fn db_err(e: mongodb::error::Error) -> SearchError {
    SearchError::Database(e.to_string())
}

impl MongoCatalog {
    /// Builds the driver client. The driver connects lazily, so an unreachable
    /// server only shows up on the first `find` or `ping`.
    pub async fn connect(cfg: &Config) -> Result<Self> {
        let mut opts = ClientOptions::parse(&cfg.mongo_uri).await.map_err(db_err)?;
        opts.app_name = Some("catalog-search".to_string());
        let client = Client::with_options(opts).map_err(db_err)?;
        let db = client.database(&cfg.db_name);
        let products = db.collection::<Document>(&cfg.collection);
        info!("catalog bound to {}.{}", cfg.db_name, cfg.collection);
        Ok(Self { db, products })
    }
}

#[async_trait::async_trait]
impl Catalog for MongoCatalog {
    async fn find(&self, filter: Document, projection: Document) -> Result<Vec<Document>> {
        let _timer = CATALOG_FIND_SECONDS
            .with_label_values(&[self.backend()])
            .start_timer();
        let opts = FindOptions::builder().projection(projection).build();
        let cursor = self.products.find(filter, opts).await.map_err(db_err)?;
        cursor.try_collect::<Vec<Document>>().await.map_err(db_err)
    }

    async fn ping(&self) -> Result<()> {
        self.db
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map(|_| ())
            .map_err(db_err)
    }

    fn backend(&self) -> &'static str {
        "mongo"
    }
}
