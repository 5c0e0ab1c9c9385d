use crate::state::AppState;
use actix_web::{Responder, post, web};
use biz_service::biz_service::notify_service::NotifyJobState;
use common::errors::AppError;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(notify_status);
}

/// 结果查询体：ticket 优先，老调用方可用公告 id
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NotifyStatusDto {
    pub ticket: Option<String>,
    pub announcement_id: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct NotifyStatusResp {
    /// running | completed
    pub status: String,
    pub notified: usize,
    pub failed: usize,
    pub total: usize,
}

#[utoipa::path(
    post,
    path = "/check-notification-status",
    summary = "查询公告扇出结果",
    tag = "公告通知",
    request_body = NotifyStatusDto,
    responses(
        (status = 200, description = "扇出进度/结果", body = NotifyStatusResp),
        (status = 404, description = "任务不存在")
    )
)]
#[post("/check-notification-status")]
pub async fn notify_status(dto: web::Json<NotifyStatusDto>, state: web::Data<AppState>) -> Result<impl Responder, AppError> {
    let job = state
        .notify_service
        .check_status(dto.ticket.as_deref(), dto.announcement_id.as_deref())?;
    let resp = match job {
        NotifyJobState::Running { total } => {
            NotifyStatusResp { status: "running".to_string(), notified: 0, failed: 0, total }
        }
        NotifyJobState::Completed { summary, .. } => NotifyStatusResp {
            status: "completed".to_string(),
            notified: summary.notified,
            failed: summary.failed,
            total: summary.total,
        },
    };
    Ok(web::Json(resp))
}
