use crate::handlers::announcement::announcement_create::*;
use crate::handlers::announcement::announcement_view::*;
use crate::handlers::announcement::notify_send::*;
use crate::handlers::announcement::notify_status::*;
use crate::handlers::group::group_assign::*;
use crate::handlers::group::group_create::*;
use crate::handlers::group::group_member_remove::*;
use crate::handlers::user::bulk_create::*;
use crate::handlers::user::forgot_password::*;
use crate::handlers::user::regenerate_password::*;
use crate::handlers::user::send_otp::*;

use crate::result::ApiResponse;
use actix_web::{HttpResponse, Responder, get, web};
use biz_service::entitys::user_entity::RoleType;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        //用户-管理
        bulk_create,
        regenerate_password,
        forgot_password,
        send_otp,

        //群组-管理
        group_create,
        group_assign,
        group_member_remove,

        //公告-管理
        announcement_create,
        announcement_view,
        notify_send,
        notify_status,
    ),
    components(schemas(
        ApiResponse<String>,
        RoleType,
        BulkCreateResp,
        NotifySendResp,
        NotifyStatusResp,
    )),
    tags(
        (name = "edu-cloud-api", description = "Learning community admin endpoints")
    )
)]
struct ApiDoc;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(openapi_json);
}

#[get("/openapi.json")]
pub async fn openapi_json() -> impl Responder {
    HttpResponse::Ok().content_type("application/json").body(ApiDoc::openapi().to_json().unwrap())
}
