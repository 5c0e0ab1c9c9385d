use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

/// 平台角色，权限从高到低
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, Display, EnumString, ToSchema)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RoleType {
    SuperAdmin,
    Admin,
    GroupAdmin,
    /// 默认角色，权限最低
    #[default]
    Student,
}

/// 通知偏好开关
#[derive(Debug, Clone, Serialize, Deserialize, Default, ToSchema)]
pub struct NotificationPreferences {
    pub email_notifications: bool,
    pub announcement_emails: bool,
    pub group_activity_emails: bool,
}

/// 用户信息结构，存储账号、角色与分组归属
#[derive(Debug, Clone, Serialize, Deserialize, Default, ToSchema)]
pub struct UserEntity {
    /// 用户唯一 ID（字符串形式）
    pub id: String,
    /// 登录邮箱，统一小写存储，比较时大小写不敏感
    pub email: String,
    /// 显示名
    pub name: String,
    /// 平台角色
    pub role: RoleType,
    /// 加密后的口令（带盐 MD5）
    pub password: String,
    /// 审核通过标记
    pub is_approved: bool,
    /// 首次登录强制改密
    pub force_password_change: bool,
    /// 手机号（可选）
    pub mobile_number: Option<String>,
    /// 所属群组 ID 列表，与 group.members 双向一致
    pub assigned_groups: Vec<String>,
    /// 通知偏好（可选）
    pub notification_preferences: Option<NotificationPreferences>,
    /// 已读公告计数
    pub total_announcements_viewed: i64,
    /// 创建时间（Unix 秒时间戳）
    pub create_time: i64,
    /// 最后更新时间（Unix 秒时间戳）
    pub update_time: i64,
}
