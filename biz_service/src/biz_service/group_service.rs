use crate::entitys::group_entity::GroupEntity;
use crate::entitys::user_entity::UserEntity;
use async_trait::async_trait;
use common::errors::AppError;
use common::repository_util::{BaseRepository, Repository};
use common::util::date_util::now;
use mongodb::bson::doc;
use mongodb::options::IndexOptions;
use mongodb::{Collection, Database, IndexModel};
use std::collections::HashSet;

/// 群组目录契约，通知扇出只依赖群名解析
#[async_trait]
pub trait GroupStoreTrait: Send + Sync {
    /// 按 id 取群名，缺失的 id 静默忽略
    async fn names_of(&self, group_ids: &[String]) -> Result<Vec<String>, AppError>;
}

pub struct GroupService {
    pub dao: BaseRepository<GroupEntity>,
    db: Database,
    max_filter_values: usize,
}

impl GroupService {
    pub fn new(db: &Database, max_filter_values: usize) -> Self {
        Self {
            dao: BaseRepository::new(db.collection("group_info")),
            db: db.clone(),
            max_filter_values,
        }
    }

    pub async fn ensure_indexes(&self) -> Result<(), AppError> {
        let unique = IndexOptions::builder().unique(true).build();
        let id_idx = IndexModel::builder().keys(doc! {"id": 1}).options(unique).build();
        self.dao.collection.create_index(id_idx).await?;
        Ok(())
    }

    pub async fn create_group(&self, group: &GroupEntity) -> Result<String, AppError> {
        if group.name.trim().is_empty() {
            return Err(AppError::Validation("group.name is empty".to_string()));
        }
        self.dao.insert(group).await?;
        Ok(group.id.clone())
    }

    pub async fn find_by_id(&self, group_id: &str) -> Result<Option<GroupEntity>, AppError> {
        let result = self.dao.find_by_id(group_id).await?;
        Ok(result)
    }

    /// 调整用户的群组归属（替换语义）。
    /// user.assigned_groups 与各群的 members/member_count 在同一事务内
    /// 更新，双向引用不允许漂移；members 与 member_count 永远同一语句变更。
    pub async fn assign_user_to_groups(&self, user_id: &str, group_ids: &[String]) -> Result<(), AppError> {
        let users: Collection<UserEntity> = self.db.collection("user_info");
        let user = users
            .find_one(doc! {"id": user_id})
            .await?
            .ok_or(AppError::NotFound)?;

        let prev: HashSet<&str> = user.assigned_groups.iter().map(|s| s.as_str()).collect();
        let next: HashSet<&str> = group_ids.iter().map(|s| s.as_str()).collect();
        let added: Vec<&str> = next.difference(&prev).copied().collect();
        let removed: Vec<&str> = prev.difference(&next).copied().collect();

        let ts = now();
        let mut session = self.db.client().start_session().await?;
        session.start_transaction().await?;

        users
            .update_one(
                doc! {"id": user_id},
                doc! {"$set": {"assigned_groups": group_ids.to_vec(), "update_time": ts}},
            )
            .session(&mut session)
            .await?;
        for gid in added {
            // 守卫过滤：已在 members 里的不重复累加计数
            self.dao
                .collection
                .update_one(
                    doc! {"id": gid, "members": {"$ne": user_id}},
                    doc! {"$addToSet": {"members": user_id}, "$inc": {"member_count": 1}, "$set": {"update_time": ts}},
                )
                .session(&mut session)
                .await?;
        }
        for gid in removed {
            self.dao
                .collection
                .update_one(
                    doc! {"id": gid, "members": user_id},
                    doc! {"$pull": {"members": user_id}, "$inc": {"member_count": -1}, "$set": {"update_time": ts}},
                )
                .session(&mut session)
                .await?;
        }

        session.commit_transaction().await?;
        Ok(())
    }

    /// 把用户移出单个群组，两侧引用同一事务内更新
    pub async fn remove_user_from_group(&self, user_id: &str, group_id: &str) -> Result<(), AppError> {
        let users: Collection<UserEntity> = self.db.collection("user_info");
        let ts = now();
        let mut session = self.db.client().start_session().await?;
        session.start_transaction().await?;

        users
            .update_one(
                doc! {"id": user_id},
                doc! {"$pull": {"assigned_groups": group_id}, "$set": {"update_time": ts}},
            )
            .session(&mut session)
            .await?;
        self.dao
            .collection
            .update_one(
                doc! {"id": group_id, "members": user_id},
                doc! {"$pull": {"members": user_id}, "$inc": {"member_count": -1}, "$set": {"update_time": ts}},
            )
            .session(&mut session)
            .await?;

        session.commit_transaction().await?;
        Ok(())
    }
}

#[async_trait]
impl GroupStoreTrait for GroupService {
    async fn names_of(&self, group_ids: &[String]) -> Result<Vec<String>, AppError> {
        let mut names = Vec::new();
        for chunk in group_ids.chunks(self.max_filter_values.max(1)) {
            let groups = self.dao.find_many(doc! {"id": {"$in": chunk.to_vec()}}).await?;
            names.extend(groups.into_iter().map(|g| g.name));
        }
        Ok(names)
    }
}
