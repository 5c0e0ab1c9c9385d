use crate::entitys::user_entity::UserEntity;
use async_trait::async_trait;
use common::errors::AppError;
use common::repository_util::{BaseRepository, Repository};
use common::util::date_util::now;
use mongodb::bson::doc;
use mongodb::options::IndexOptions;
use mongodb::{Database, IndexModel};
use std::collections::HashSet;

/// 用户目录契约（§数据存取），测试时可用内存实现替换
#[async_trait]
pub trait UserStoreTrait: Send + Sync {
    /// 命中任一群组的用户并集（按 id 去重）
    async fn find_by_groups(&self, group_ids: &[String]) -> Result<Vec<UserEntity>, AppError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<UserEntity>, AppError>;
    async fn find_by_id(&self, user_id: &str) -> Result<Option<UserEntity>, AppError>;
    /// 新建用户记录，返回业务 id
    async fn create_user(&self, user: &UserEntity) -> Result<String, AppError>;
    async fn set_password(&self, user_id: &str, password_hash: &str) -> Result<(), AppError>;
}

pub struct UserService {
    pub dao: BaseRepository<UserEntity>,
    /// 单次 in 过滤的取值上限，超限分片查询
    max_filter_values: usize,
}

impl UserService {
    pub fn new(db: &Database, max_filter_values: usize) -> Self {
        Self {
            dao: BaseRepository::new(db.collection("user_info")),
            max_filter_values,
        }
    }

    /// 启动时建立唯一索引：业务 id、邮箱（小写存储）
    pub async fn ensure_indexes(&self) -> Result<(), AppError> {
        let unique = IndexOptions::builder().unique(true).build();
        let id_idx = IndexModel::builder().keys(doc! {"id": 1}).options(unique.clone()).build();
        let email_idx = IndexModel::builder().keys(doc! {"email": 1}).options(unique).build();
        self.dao.collection.create_index(id_idx).await?;
        self.dao.collection.create_index(email_idx).await?;
        Ok(())
    }

    /// 公告已读计数 +1
    pub async fn inc_announcements_viewed(&self, user_id: &str) -> Result<(), AppError> {
        self.dao
            .update_one(doc! {"id": user_id}, doc! {"$inc": {"total_announcements_viewed": 1}})
            .await?;
        Ok(())
    }
}

/// 按用户 id 去重，保留首次出现的顺序
pub fn dedup_users(users: Vec<UserEntity>) -> Vec<UserEntity> {
    let mut seen = HashSet::new();
    users.into_iter().filter(|u| seen.insert(u.id.clone())).collect()
}

#[async_trait]
impl UserStoreTrait for UserService {
    async fn find_by_groups(&self, group_ids: &[String]) -> Result<Vec<UserEntity>, AppError> {
        if group_ids.is_empty() {
            return Err(AppError::Validation("group_ids is empty".to_string()));
        }
        let mut merged: Vec<UserEntity> = Vec::new();
        // 文档库限制 in 过滤的取值个数，超限分片查询后合并
        for chunk in group_ids.chunks(self.max_filter_values.max(1)) {
            let filter = doc! {"assigned_groups": {"$in": chunk.to_vec()}};
            let users = self.dao.find_many(filter).await?;
            merged.extend(users);
        }
        Ok(dedup_users(merged))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserEntity>, AppError> {
        let result = self.dao.find_one(doc! {"email": email.trim().to_lowercase()}).await?;
        Ok(result)
    }

    async fn find_by_id(&self, user_id: &str) -> Result<Option<UserEntity>, AppError> {
        let result = self.dao.find_by_id(user_id).await?;
        Ok(result)
    }

    async fn create_user(&self, user: &UserEntity) -> Result<String, AppError> {
        let email = user.email.trim().to_lowercase();
        if self.find_by_email(&email).await?.is_some() {
            return Err(AppError::BizError(format!("user.email.exists: {}", email)));
        }
        let mut record = user.clone();
        record.email = email;
        self.dao.insert(&record).await?;
        Ok(record.id)
    }

    async fn set_password(&self, user_id: &str, password_hash: &str) -> Result<(), AppError> {
        let modified = self
            .dao
            .update_one(
                doc! {"id": user_id},
                doc! {"$set": {"password": password_hash, "force_password_change": true, "update_time": now()}},
            )
            .await?;
        if modified == 0 {
            return Err(AppError::NotFound);
        }
        Ok(())
    }
}
