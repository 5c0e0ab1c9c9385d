use actix_web::{Responder, get, web};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(health);
}

#[get("/health")]
pub async fn health() -> impl Responder {
    web::Json(serde_json::json!({"status":"ok"}))
}
