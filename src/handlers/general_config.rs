use crate::models::*;
use crate::services::GeneralConfigService;
use actix_web::{HttpResponse, ResponseError, Result, web};

#[utoipa::path(
    get,
    path = "/general-config",
    tag = "general_config",
    responses(
        (status = 200, description = "获取通用配置成功", body = GeneralConfig),
        (status = 503, description = "存储不可用")
    )
)]
pub async fn get_general_config(service: web::Data<GeneralConfigService>) -> Result<HttpResponse> {
    match service.get().await {
        Ok(config) => Ok(HttpResponse::Ok().json(ApiResponse::success(config))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/general-config",
    tag = "general_config",
    request_body = GeneralConfig,
    responses(
        (status = 200, description = "保存成功", body = GeneralConfig),
        (status = 400, description = "配置校验失败"),
        (status = 409, description = "有进行中的活动，禁止修改")
    )
)]
/// 保存通用配置（有进行中的活动时拒绝）
pub async fn save_general_config(
    service: web::Data<GeneralConfigService>,
    body: web::Json<GeneralConfig>,
) -> Result<HttpResponse> {
    match service.save(body.into_inner()).await {
        Ok(config) => Ok(HttpResponse::Ok().json(ApiResponse::success_with_message(
            config,
            "General config saved",
        ))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/general-config/purchase-items",
    tag = "general_config",
    responses(
        (status = 200, description = "新增购买道具成功", body = GeneralConfig)
    )
)]
pub async fn add_purchase_item(service: web::Data<GeneralConfigService>) -> Result<HttpResponse> {
    match service.add_purchase_item().await {
        Ok(config) => Ok(HttpResponse::Ok().json(ApiResponse::success(config))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/general-config/purchase-items/{index}",
    tag = "general_config",
    params(("index" = usize, Path, description = "购买道具下标（从0开始）")),
    request_body = PurchaseItemUpdateRequest,
    responses(
        (status = 200, description = "修改成功", body = GeneralConfig),
        (status = 404, description = "下标不存在")
    )
)]
pub async fn update_purchase_item(
    service: web::Data<GeneralConfigService>,
    path: web::Path<usize>,
    body: web::Json<PurchaseItemUpdateRequest>,
) -> Result<HttpResponse> {
    match service
        .update_purchase_item(path.into_inner(), body.into_inner())
        .await
    {
        Ok(config) => Ok(HttpResponse::Ok().json(ApiResponse::success(config))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/general-config/purchase-items/{index}",
    tag = "general_config",
    params(("index" = usize, Path, description = "购买道具下标（从0开始）")),
    responses(
        (status = 200, description = "删除成功", body = GeneralConfig),
        (status = 400, description = "至少保留一项购买道具")
    )
)]
pub async fn remove_purchase_item(
    service: web::Data<GeneralConfigService>,
    path: web::Path<usize>,
) -> Result<HttpResponse> {
    match service.remove_purchase_item(path.into_inner()).await {
        Ok(config) => Ok(HttpResponse::Ok().json(ApiResponse::success(config))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/general-config/import",
    tag = "general_config",
    request_body = ImportRequest,
    responses(
        (status = 200, description = "导入并保存成功", body = GeneralConfig),
        (status = 400, description = "文件格式错误")
    )
)]
pub async fn import_general_config(
    service: web::Data<GeneralConfigService>,
    body: web::Json<ImportRequest>,
) -> Result<HttpResponse> {
    match service.import(&body.content).await {
        Ok(config) => Ok(HttpResponse::Ok().json(ApiResponse::success(config))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/general-config/export",
    tag = "general_config",
    responses(
        (status = 200, description = "导出文件", body = ExportFile)
    )
)]
pub async fn export_general_config(service: web::Data<GeneralConfigService>) -> Result<HttpResponse> {
    match service.export().await {
        Ok(file) => Ok(HttpResponse::Ok().json(ApiResponse::success(file))),
        Err(e) => Ok(e.error_response()),
    }
}

/// 路由配置
pub fn general_config_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/general-config")
            .route("", web::get().to(get_general_config))
            .route("", web::put().to(save_general_config))
            .route("/purchase-items", web::post().to(add_purchase_item))
            .route("/purchase-items/{index}", web::put().to(update_purchase_item))
            .route("/purchase-items/{index}", web::delete().to(remove_purchase_item))
            .route("/import", web::post().to(import_general_config))
            .route("/export", web::get().to(export_general_config)),
    );
}
