use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// 公告附件，is_downloadable 与文件类型无关
#[derive(Debug, Clone, Serialize, Deserialize, Default, ToSchema)]
pub struct AnnouncementFile {
    pub id: String,
    pub name: String,
    pub url: String,
    pub file_type: String,
    pub size: i64,
    /// 是否允许下载（false = 仅在线查看）
    pub is_downloadable: bool,
}

/// 公告，面向一个或多个群组广播
#[derive(Debug, Clone, Serialize, Deserialize, Default, ToSchema)]
pub struct AnnouncementEntity {
    pub id: String,
    pub title: String,
    pub content: String,
    /// 目标群组 ID 列表，至少一个
    pub group_ids: Vec<String>,
    pub created_by: String,
    pub files: Vec<AnnouncementFile>,
    /// 浏览计数，与 viewed_by 同步变更
    pub view_count: i64,
    /// 浏览者 ID 集合，重复浏览不重复记录
    pub viewed_by: Vec<String>,
    /// 创建时间（Unix 秒时间戳）
    pub create_time: i64,
    /// 最后更新时间（Unix 秒时间戳）
    pub update_time: i64,
}
