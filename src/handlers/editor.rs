use super::operator_from_request;
use crate::config::Config;
use crate::models::*;
use crate::services::ActivityService;
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;
use std::str::FromStr;

#[utoipa::path(
    post,
    path = "/editors",
    tag = "editor",
    request_body = CreateActivityRequest,
    responses(
        (status = 200, description = "新建活动草稿", body = EditorView),
        (status = 404, description = "模板活动不存在")
    )
)]
/// 新建活动，可选模板（复制转盘与规则，清空时间）
pub async fn create_editor(
    service: web::Data<ActivityService>,
    body: web::Json<CreateActivityRequest>,
) -> Result<HttpResponse> {
    match service.create_editor(body.template_id.as_deref()).await {
        Ok(view) => Ok(HttpResponse::Ok().json(ApiResponse::success(view))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/editors/{id}/open",
    tag = "editor",
    params(("id" = String, Path, description = "活动ID")),
    responses(
        (status = 200, description = "打开编辑会话（已结束的活动为只读）", body = EditorView),
        (status = 404, description = "活动不存在")
    )
)]
pub async fn open_editor(
    service: web::Data<ActivityService>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    match service.open_editor(&path.into_inner()).await {
        Ok(view) => Ok(HttpResponse::Ok().json(ApiResponse::success(view))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/editors/{id}",
    tag = "editor",
    params(("id" = String, Path, description = "活动ID")),
    responses(
        (status = 200, description = "当前编辑快照", body = EditorView),
        (status = 404, description = "没有打开的会话")
    )
)]
pub async fn get_editor(
    service: web::Data<ActivityService>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    match service.editor_view(&path.into_inner()).await {
        Ok(view) => Ok(HttpResponse::Ok().json(ApiResponse::success(view))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/editors/{id}",
    tag = "editor",
    params(("id" = String, Path, description = "活动ID")),
    responses(
        (status = 200, description = "已放弃修改并关闭会话"),
        (status = 404, description = "没有打开的会话")
    )
)]
pub async fn discard_editor(
    service: web::Data<ActivityService>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    match service.discard_editor(&path.into_inner()).await {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": "Editor discarded"
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/editors/{id}/wheels/{wheel_type}/commands",
    tag = "editor",
    params(
        ("id" = String, Path, description = "活动ID"),
        ("wheel_type" = String, Path, description = "转盘档位 (beginner / intermediate / advanced)")
    ),
    request_body = WheelCommand,
    responses(
        (status = 200, description = "命令结果，applied=false 表示被忽略", body = EditorResponse),
        (status = 400, description = "参数错误"),
        (status = 404, description = "会话或奖励不存在")
    )
)]
/// 对某个转盘执行编辑命令
pub async fn apply_command(
    service: web::Data<ActivityService>,
    path: web::Path<(String, String)>,
    body: web::Json<WheelCommand>,
) -> Result<HttpResponse> {
    let (id, wheel_type) = path.into_inner();
    let wheel_type = match WheelType::from_str(&wheel_type) {
        Ok(t) => t,
        Err(e) => return Ok(e.error_response()),
    };
    match service.apply_command(&id, wheel_type, &body.into_inner()).await {
        Ok(resp) => Ok(HttpResponse::Ok().json(ApiResponse::success(resp))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    patch,
    path = "/editors/{id}/fields",
    tag = "editor",
    params(("id" = String, Path, description = "活动ID")),
    request_body = ActivityFieldsUpdate,
    responses(
        (status = 200, description = "修改基础字段", body = EditorResponse),
        (status = 404, description = "没有打开的会话")
    )
)]
pub async fn update_fields(
    service: web::Data<ActivityService>,
    path: web::Path<String>,
    body: web::Json<ActivityFieldsUpdate>,
) -> Result<HttpResponse> {
    match service.update_fields(&path.into_inner(), &body.into_inner()).await {
        Ok(resp) => Ok(HttpResponse::Ok().json(ApiResponse::success(resp))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/editors/{id}/import",
    tag = "editor",
    params(("id" = String, Path, description = "活动ID")),
    request_body = ImportRequest,
    responses(
        (status = 200, description = "导入到编辑快照（不落库）", body = EditorResponse),
        (status = 400, description = "文件格式错误")
    )
)]
pub async fn import_activity(
    service: web::Data<ActivityService>,
    path: web::Path<String>,
    body: web::Json<ImportRequest>,
) -> Result<HttpResponse> {
    match service.import(&path.into_inner(), &body.content).await {
        Ok(resp) => Ok(HttpResponse::Ok().json(ApiResponse::success(resp))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/editors/{id}/export",
    tag = "editor",
    params(("id" = String, Path, description = "活动ID")),
    responses(
        (status = 200, description = "导出编辑快照", body = ExportFile),
        (status = 404, description = "没有打开的会话")
    )
)]
pub async fn export_activity(
    service: web::Data<ActivityService>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    match service.export(&path.into_inner()).await {
        Ok(file) => Ok(HttpResponse::Ok().json(ApiResponse::success(file))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/editors/{id}/save",
    tag = "editor",
    params(
        ("id" = String, Path, description = "活动ID"),
        ("X-Operator" = Option<String>, Header, description = "操作人")
    ),
    responses(
        (status = 200, description = "保存成功并关闭会话", body = Activity),
        (status = 400, description = "校验失败或只读"),
        (status = 503, description = "存储不可用，会话保留")
    )
)]
/// 校验并保存编辑快照
pub async fn save_editor(
    service: web::Data<ActivityService>,
    config: web::Data<Config>,
    req: HttpRequest,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let operator = operator_from_request(&req, &config);
    match service.save_editor(&path.into_inner(), &operator).await {
        Ok(activity) => Ok(HttpResponse::Ok().json(ApiResponse::success_with_message(
            activity,
            "Activity saved",
        ))),
        Err(e) => Ok(e.error_response()),
    }
}

/// 路由配置
pub fn editor_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/editors")
            .route("", web::post().to(create_editor))
            .route("/{id}", web::get().to(get_editor))
            .route("/{id}", web::delete().to(discard_editor))
            .route("/{id}/open", web::post().to(open_editor))
            .route("/{id}/fields", web::patch().to(update_fields))
            .route("/{id}/import", web::post().to(import_activity))
            .route("/{id}/export", web::get().to(export_activity))
            .route("/{id}/save", web::post().to(save_editor))
            .route("/{id}/wheels/{wheel_type}/commands", web::post().to(apply_command)),
    );
}
