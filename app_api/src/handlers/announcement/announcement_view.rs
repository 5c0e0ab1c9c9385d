use crate::state::AppState;
use actix_web::{Responder, post, web};
use common::errors::AppError;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(announcement_view);
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ViewAnnouncementDto {
    pub announcement_id: String,
    pub user_id: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ViewAnnouncementResp {
    /// 是否计入新浏览（重复浏览为 false）
    pub counted: bool,
}

#[utoipa::path(
    post,
    path = "/announcement/view",
    summary = "记录公告浏览",
    tag = "公告管理",
    request_body = ViewAnnouncementDto,
    responses(
        (status = 200, description = "浏览记录结果", body = ViewAnnouncementResp)
    )
)]
#[post("/announcement/view")]
pub async fn announcement_view(
    dto: web::Json<ViewAnnouncementDto>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let counted = state.announcement_service.mark_viewed(&dto.announcement_id, &dto.user_id).await?;
    if counted {
        state.user_service.inc_announcements_viewed(&dto.user_id).await?;
    }
    Ok(web::Json(ViewAnnouncementResp { counted }))
}
