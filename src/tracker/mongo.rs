//! MongoDB tracker store
//!
//! Records live in the `sync` collection of the database named in the
//! connection URI path, e.g. `mongodb://localhost/cloudinary`.

use crate::error::{CldsyncError, Result};
use crate::tracker::record::UploadRecord;
use crate::tracker::store::TrackerStore;
use async_trait::async_trait;
use mongodb::bson::{doc, Bson};
use mongodb::{Client, Collection};
use tracing::{debug, info};

pub const TRACKER_COLLECTION: &str = "sync";

pub struct MongoTrackerStore {
    collection: Collection<UploadRecord>,
}

impl MongoTrackerStore {
    /// Connect and ping the server so an unreachable store fails here rather
    /// than halfway through an upload walk.
    pub async fn connect(uri: &str) -> Result<Self> {
        let parsed = url::Url::parse(uri)?;
        if parsed.scheme() != "mongodb" {
            return Err(CldsyncError::config("Missing mongodb:// scheme in URI"));
        }

        let client = Client::with_uri_str(uri).await?;
        let database = client.default_database().ok_or_else(|| {
            CldsyncError::config("No database name in tracker URI, e.g. mongodb://localhost/cloudinary")
        })?;

        debug!(
            "Connecting to tracker database {}/{}",
            parsed.host_str().unwrap_or_default(),
            database.name()
        );
        database.run_command(doc! { "ping": 1 }).await?;
        info!("Connected to tracker database {}", database.name());

        Ok(Self {
            collection: database.collection(TRACKER_COLLECTION),
        })
    }
}

#[async_trait]
impl TrackerStore for MongoTrackerStore {
    async fn find_one(&self, public_ids: &[String]) -> Result<Option<UploadRecord>> {
        let alternatives: Vec<_> = public_ids.iter().map(|id| doc! { "_id": id }).collect();
        let record = self
            .collection
            .find_one(doc! { "$or": alternatives })
            .await?;
        Ok(record)
    }

    async fn insert(&self, record: &UploadRecord) -> Result<()> {
        self.collection.insert_one(record).await?;
        Ok(())
    }

    async fn update(&self, record: &UploadRecord) -> Result<()> {
        let mut fields = mongodb::bson::to_document(record)
            .map_err(|e| CldsyncError::storage(format!("Failed to encode record: {e}")))?;
        fields.remove("_id");

        let result = self
            .collection
            .update_one(doc! { "_id": &record.public_id }, doc! { "$set": Bson::Document(fields) })
            .await?;
        if result.matched_count == 0 {
            return Err(CldsyncError::storage(format!(
                "no record to update: {}",
                record.public_id
            )));
        }
        Ok(())
    }

    async fn remove(&self, public_id: &str) -> Result<bool> {
        let result = self.collection.delete_one(doc! { "_id": public_id }).await?;
        Ok(result.deleted_count > 0)
    }

    async fn remove_all_forms(&self, public_id: &str) -> Result<u64> {
        let extension_form = format!(r"^{}\.[^./]+$", regex::escape(public_id));
        let result = self
            .collection
            .delete_many(doc! {
                "$or": [
                    { "_id": public_id },
                    { "_id": { "$regex": extension_form } },
                ]
            })
            .await?;
        Ok(result.deleted_count)
    }
}
