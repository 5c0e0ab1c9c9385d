use crate::state::AppState;
use actix_web::{Responder, post, web};
use biz_service::entitys::announcement_entity::{AnnouncementEntity, AnnouncementFile};
use common::errors::AppError;
use common::util::common_utils::build_uuid;
use common::util::date_util::now;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(notify_send);
}

/// 公告通知触发体：携带公告内容与目标群组
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NotifySendDto {
    pub announcement: AnnouncementPayload,
    pub group_ids: Vec<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnnouncementPayload {
    /// 已落库的公告 id；缺省时生成新 id
    pub id: Option<String>,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub files: Vec<FilePayload>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FilePayload {
    pub name: String,
    pub url: String,
    pub is_downloadable: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct NotifySendResp {
    /// 扇出任务句柄，投递异步执行，拿它查结果
    pub ticket: String,
    /// 解析出的收件人数
    pub total: usize,
}

#[utoipa::path(
    post,
    path = "/send-announcement-notification",
    summary = "触发公告邮件扇出",
    tag = "公告通知",
    request_body = NotifySendDto,
    responses(
        (status = 200, description = "任务句柄", body = NotifySendResp),
        (status = 502, description = "邮件传输不可用，未进入投递")
    )
)]
#[post("/send-announcement-notification")]
pub async fn notify_send(dto: web::Json<NotifySendDto>, state: web::Data<AppState>) -> Result<impl Responder, AppError> {
    let dto = dto.into_inner();
    let announcement = to_entity(dto.announcement, &dto.group_ids);
    let (ticket, total) = state.notify_service.send_announcement(announcement, dto.group_ids).await?;
    Ok(web::Json(NotifySendResp { ticket, total }))
}

fn to_entity(payload: AnnouncementPayload, group_ids: &[String]) -> AnnouncementEntity {
    let files = payload
        .files
        .into_iter()
        .map(|f| AnnouncementFile {
            id: build_uuid(),
            name: f.name,
            url: f.url,
            is_downloadable: f.is_downloadable,
            ..Default::default()
        })
        .collect();
    AnnouncementEntity {
        id: payload.id.unwrap_or_else(build_uuid),
        title: payload.title,
        content: payload.content,
        group_ids: group_ids.to_vec(),
        files,
        create_time: now(),
        ..Default::default()
    }
}
