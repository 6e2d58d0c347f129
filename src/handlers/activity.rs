use super::operator_from_request;
use crate::config::Config;
use crate::models::*;
use crate::services::ActivityService;
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    get,
    path = "/activities",
    tag = "activity",
    params(
        ("status" = Option<ActivityStatus>, Query, description = "按状态筛选 (notStarted / active / ended)"),
        ("sort" = Option<SortOrder>, Query, description = "按开始时间排序 (默认 desc)")
    ),
    responses(
        (status = 200, description = "获取活动列表成功", body = [ActivityListItem]),
        (status = 503, description = "存储不可用")
    )
)]
/// 活动列表，含未提交的行内备注修改
pub async fn list_activities(
    service: web::Data<ActivityService>,
    query: web::Query<ActivityListQuery>,
) -> Result<HttpResponse> {
    match service.list(&query.into_inner()).await {
        Ok(list) => Ok(HttpResponse::Ok().json(ApiResponse::success(list))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/activities/{id}",
    tag = "activity",
    params(("id" = String, Path, description = "活动ID")),
    responses(
        (status = 200, description = "获取活动成功", body = Activity),
        (status = 404, description = "活动不存在")
    )
)]
pub async fn get_activity(
    service: web::Data<ActivityService>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    match service.get(&path.into_inner()).await {
        Ok(activity) => Ok(HttpResponse::Ok().json(ApiResponse::success(activity))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/activities/{id}/remarks",
    tag = "activity",
    params(("id" = String, Path, description = "活动ID")),
    request_body = RemarkEditRequest,
    responses(
        (status = 200, description = "修改已暂存", body = ActivityListItem),
        (status = 404, description = "活动不存在")
    )
)]
/// 行内修改备注，仅暂存，需调用提交接口才写入存储
pub async fn edit_remarks(
    service: web::Data<ActivityService>,
    path: web::Path<String>,
    body: web::Json<RemarkEditRequest>,
) -> Result<HttpResponse> {
    match service
        .stage_remark(&path.into_inner(), body.into_inner().remarks)
        .await
    {
        Ok(item) => Ok(HttpResponse::Ok().json(ApiResponse::success(item))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/activities/remarks/pending",
    tag = "activity",
    responses(
        (status = 200, description = "未提交的修改", body = PendingEditsResponse)
    )
)]
pub async fn pending_remarks(service: web::Data<ActivityService>) -> Result<HttpResponse> {
    let pending = service.pending_remarks().await;
    Ok(HttpResponse::Ok().json(ApiResponse::success(pending)))
}

#[utoipa::path(
    post,
    path = "/activities/remarks/commit",
    tag = "activity",
    params(("X-Operator" = Option<String>, Header, description = "操作人")),
    responses(
        (status = 200, description = "提交成功，返回写入条数"),
        (status = 503, description = "存储不可用，修改保留")
    )
)]
/// 批量提交所有暂存的备注修改
pub async fn commit_remarks(
    service: web::Data<ActivityService>,
    config: web::Data<Config>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let operator = operator_from_request(&req, &config);
    match service.commit_remarks(&operator).await {
        Ok(count) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": { "committed": count }
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/activities/remarks/pending",
    tag = "activity",
    responses(
        (status = 200, description = "已撤销全部暂存修改")
    )
)]
pub async fn discard_remarks(service: web::Data<ActivityService>) -> Result<HttpResponse> {
    let count = service.discard_remarks().await;
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "data": { "discarded": count }
    })))
}

/// 路由配置
pub fn activity_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/activities")
            .route("", web::get().to(list_activities))
            .route("/remarks/pending", web::get().to(pending_remarks))
            .route("/remarks/pending", web::delete().to(discard_remarks))
            .route("/remarks/commit", web::post().to(commit_remarks))
            .route("/{id}", web::get().to(get_activity))
            .route("/{id}/remarks", web::put().to(edit_remarks)),
    );
}
