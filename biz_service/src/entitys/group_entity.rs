use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, Default, ToSchema)]
pub struct GroupEntity {
    pub id: String,                         // 群组唯一 ID
    pub name: String,                       // 群名称（展示给用户、拼进通知邮件）
    pub description: String,                // 群描述
    pub created_by: String,                 // 创建者用户 ID
    /// 成员用户 ID 列表
    pub members: Vec<String>,
    /// 成员数缓存，必须与 members 在同一语句内更新，禁止漂移
    pub member_count: i64,
    /// 创建时间（Unix 秒时间戳）
    pub create_time: i64,
    /// 最后更新时间（Unix 秒时间戳）
    pub update_time: i64,
}
