use crate::entitys::announcement_entity::AnnouncementEntity;
use common::errors::AppError;
use common::repository_util::{BaseRepository, Repository};
use mongodb::bson::doc;
use mongodb::options::IndexOptions;
use mongodb::{Database, IndexModel};

pub struct AnnouncementService {
    pub dao: BaseRepository<AnnouncementEntity>,
}

impl AnnouncementService {
    pub fn new(db: &Database) -> Self {
        Self { dao: BaseRepository::new(db.collection("announcement")) }
    }

    pub async fn ensure_indexes(&self) -> Result<(), AppError> {
        let unique = IndexOptions::builder().unique(true).build();
        let id_idx = IndexModel::builder().keys(doc! {"id": 1}).options(unique).build();
        self.dao.collection.create_index(id_idx).await?;
        Ok(())
    }

    /// 创建公告，目标群组不能为空
    pub async fn create(&self, announcement: &AnnouncementEntity) -> Result<String, AppError> {
        if announcement.group_ids.is_empty() {
            return Err(AppError::Validation("announcement.group_ids is empty".to_string()));
        }
        self.dao.insert(announcement).await?;
        Ok(announcement.id.clone())
    }

    pub async fn find_by_id(&self, announcement_id: &str) -> Result<Option<AnnouncementEntity>, AppError> {
        let result = self.dao.find_by_id(announcement_id).await?;
        Ok(result)
    }

    /// 记录浏览。viewed_by 是集合语义，重复浏览不改变任何字段；
    /// 守卫过滤 + 单语句更新保证 viewed_by 与 view_count 原子一致。
    /// 返回本次是否计入新浏览。
    pub async fn mark_viewed(&self, announcement_id: &str, user_id: &str) -> Result<bool, AppError> {
        let modified = self
            .dao
            .update_one(
                doc! {"id": announcement_id, "viewed_by": {"$ne": user_id}},
                doc! {"$addToSet": {"viewed_by": user_id}, "$inc": {"view_count": 1}},
            )
            .await?;
        Ok(modified > 0)
    }
}
