use crate::models::*;
use crate::services::StatisticsService;
use actix_web::{HttpResponse, ResponseError, Result, web};

#[utoipa::path(
    get,
    path = "/statistics/draw-records",
    tag = "statistics",
    params(
        ("page" = Option<u32>, Query, description = "页码 (默认1)"),
        ("per_page" = Option<u32>, Query, description = "每页数量 (默认20)"),
        ("user_id" = Option<String>, Query, description = "玩家ID"),
        ("draw_type" = Option<DrawType>, Query, description = "single / ten"),
        ("from" = Option<String>, Query, description = "起始时间 (YYYY-MM-DD HH:MM:SS)"),
        ("to" = Option<String>, Query, description = "截止时间 (YYYY-MM-DD HH:MM:SS)")
    ),
    responses(
        (status = 200, description = "抽奖记录（新的在前）", body = DrawRecordPage),
        (status = 400, description = "时间格式错误")
    )
)]
/// 分页查询抽奖记录
pub async fn list_draw_records(
    service: web::Data<StatisticsService>,
    query: web::Query<DrawRecordQuery>,
) -> Result<HttpResponse> {
    match service.list_draw_records(&query.into_inner()).await {
        Ok(page) => Ok(HttpResponse::Ok().json(ApiResponse::success(page))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/statistics/users/{user_id}",
    tag = "statistics",
    params(("user_id" = String, Path, description = "玩家ID")),
    responses(
        (status = 200, description = "玩家抽奖统计", body = UserDrawStats),
        (status = 404, description = "该玩家没有抽奖记录")
    )
)]
pub async fn user_stats(
    service: web::Data<StatisticsService>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    match service.user_stats(&path.into_inner()).await {
        Ok(stats) => Ok(HttpResponse::Ok().json(ApiResponse::success(stats))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/statistics/outputs/overview",
    tag = "statistics",
    params(("activity_id" = Option<String>, Query, description = "活动ID，缺省为全部")),
    responses(
        (status = 200, description = "发放总览", body = OutputOverview)
    )
)]
pub async fn output_overview(
    service: web::Data<StatisticsService>,
    query: web::Query<RewardOutputQuery>,
) -> Result<HttpResponse> {
    match service.overview(query.activity_id.as_deref()).await {
        Ok(data) => Ok(HttpResponse::Ok().json(ApiResponse::success(data))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/statistics/outputs/by-activity",
    tag = "statistics",
    params(("activity_id" = Option<String>, Query, description = "活动ID，缺省为全部")),
    responses(
        (status = 200, description = "按活动与奖励类型统计", body = [ActivityOutputSummary])
    )
)]
pub async fn outputs_by_activity(
    service: web::Data<StatisticsService>,
    query: web::Query<RewardOutputQuery>,
) -> Result<HttpResponse> {
    match service.by_activity(query.activity_id.as_deref()).await {
        Ok(data) => Ok(HttpResponse::Ok().json(ApiResponse::success(data))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/statistics/outputs/by-reward-name",
    tag = "statistics",
    params(("activity_id" = Option<String>, Query, description = "活动ID，缺省为全部")),
    responses(
        (status = 200, description = "按奖励名称合并", body = [RewardNameSummary])
    )
)]
pub async fn outputs_by_reward_name(
    service: web::Data<StatisticsService>,
    query: web::Query<RewardOutputQuery>,
) -> Result<HttpResponse> {
    match service.by_reward_name(query.activity_id.as_deref()).await {
        Ok(data) => Ok(HttpResponse::Ok().json(ApiResponse::success(data))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/statistics/outputs/by-tier",
    tag = "statistics",
    params(("activity_id" = Option<String>, Query, description = "活动ID，缺省为全部")),
    responses(
        (status = 200, description = "转盘档位占比", body = [TierShare])
    )
)]
pub async fn outputs_by_tier(
    service: web::Data<StatisticsService>,
    query: web::Query<RewardOutputQuery>,
) -> Result<HttpResponse> {
    match service.by_tier(query.activity_id.as_deref()).await {
        Ok(data) => Ok(HttpResponse::Ok().json(ApiResponse::success(data))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/statistics/outputs/detail",
    tag = "statistics",
    params(
        ("activity_id" = String, Query, description = "活动ID"),
        ("reward_type" = RewardType, Query, description = "奖励类型")
    ),
    responses(
        (status = 200, description = "某活动某类型的发放明细", body = [RewardOutput])
    )
)]
pub async fn output_detail(
    service: web::Data<StatisticsService>,
    query: web::Query<OutputDetailQuery>,
) -> Result<HttpResponse> {
    let OutputDetailQuery {
        activity_id,
        reward_type,
    } = query.into_inner();
    match service.type_detail(&activity_id, reward_type).await {
        Ok(data) => Ok(HttpResponse::Ok().json(ApiResponse::success(data))),
        Err(e) => Ok(e.error_response()),
    }
}

/// 路由配置
pub fn statistics_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/statistics")
            .route("/draw-records", web::get().to(list_draw_records))
            .route("/users/{user_id}", web::get().to(user_stats))
            .route("/outputs/overview", web::get().to(output_overview))
            .route("/outputs/by-activity", web::get().to(outputs_by_activity))
            .route("/outputs/by-reward-name", web::get().to(outputs_by_reward_name))
            .route("/outputs/by-tier", web::get().to(outputs_by_tier))
            .route("/outputs/detail", web::get().to(output_detail)),
    );
}
