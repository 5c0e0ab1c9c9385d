use async_trait::async_trait;
use futures_util::stream::TryStreamExt;
use mongodb::bson::doc;
use mongodb::{Collection, bson::Document, error::Result};
use serde::{Serialize, de::DeserializeOwned};

#[async_trait]
pub trait Repository<T> {
    async fn find_by_id(&self, id: &str) -> Result<Option<T>>;
    async fn find_one(&self, filter: Document) -> Result<Option<T>>;
    async fn find_many(&self, filter: Document) -> Result<Vec<T>>;
    async fn insert(&self, entity: &T) -> Result<()>;
    async fn update_one(&self, filter: Document, update: Document) -> Result<u64>;
    async fn update(&self, filter: Document, update: Document) -> Result<u64>;
    async fn delete(&self, filter: Document) -> Result<u64>;
}

pub struct BaseRepository<T: Send + Sync> {
    pub collection: Collection<T>,
}

impl<T: Send + Sync> BaseRepository<T> {
    pub fn new(collection: Collection<T>) -> Self {
        Self { collection }
    }
}

#[async_trait]
impl<T: Send + Sync> Repository<T> for BaseRepository<T>
where
    T: Serialize + DeserializeOwned + Unpin + Send + Sync,
{
    /// 按业务 id 查询（非 Mongo 自身的 _id）
    async fn find_by_id(&self, id: &str) -> Result<Option<T>> {
        self.find_one(doc! { "id": id }).await
    }

    async fn find_one(&self, filter: Document) -> Result<Option<T>> {
        let result = self.collection.find_one(filter).await?;
        Ok(result)
    }

    async fn find_many(&self, filter: Document) -> Result<Vec<T>> {
        let mut cursor = self.collection.find(filter).await?;
        let mut result = vec![];
        while let Some(doc) = cursor.try_next().await? {
            result.push(doc);
        }
        Ok(result)
    }

    async fn insert(&self, entity: &T) -> Result<()> {
        self.collection.insert_one(entity).await?;
        Ok(())
    }

    async fn update_one(&self, filter: Document, update: Document) -> Result<u64> {
        let result = self.collection.update_one(filter, update).await?;
        Ok(result.modified_count)
    }

    async fn update(&self, filter: Document, update: Document) -> Result<u64> {
        let result = self.collection.update_many(filter, update).await?;
        Ok(result.modified_count)
    }

    async fn delete(&self, filter: Document) -> Result<u64> {
        let result = self.collection.delete_many(filter).await?;
        Ok(result.deleted_count)
    }
}
