use crate::handlers::announcement::notify_send::FilePayload;
use crate::state::AppState;
use actix_web::{Responder, post, web};
use biz_service::entitys::announcement_entity::{AnnouncementEntity, AnnouncementFile};
use common::errors::AppError;
use common::util::common_utils::build_uuid;
use common::util::date_util::now;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(announcement_create);
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateAnnouncementDto {
    pub title: String,
    pub content: String,
    /// 目标群组，至少一个
    pub group_ids: Vec<String>,
    pub created_by: String,
    #[serde(default)]
    pub files: Vec<FilePayload>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CreateAnnouncementResp {
    pub id: String,
}

#[utoipa::path(
    post,
    path = "/announcement/create",
    summary = "创建公告",
    tag = "公告管理",
    request_body = CreateAnnouncementDto,
    responses(
        (status = 200, description = "新公告 id", body = CreateAnnouncementResp),
        (status = 400, description = "目标群组为空")
    )
)]
#[post("/announcement/create")]
pub async fn announcement_create(
    dto: web::Json<CreateAnnouncementDto>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let dto = dto.into_inner();
    let ts = now();
    let announcement = AnnouncementEntity {
        id: build_uuid(),
        title: dto.title,
        content: dto.content,
        group_ids: dto.group_ids,
        created_by: dto.created_by,
        files: dto
            .files
            .into_iter()
            .map(|f| AnnouncementFile {
                id: build_uuid(),
                name: f.name,
                url: f.url,
                is_downloadable: f.is_downloadable,
                ..Default::default()
            })
            .collect(),
        view_count: 0,
        viewed_by: Vec::new(),
        create_time: ts,
        update_time: ts,
    };
    let id = state.announcement_service.create(&announcement).await?;
    Ok(web::Json(CreateAnnouncementResp { id }))
}
