use actix_cors::Cors;

use crate::config::CorsConfig;

/// allowed_origins 为空时放开所有来源（本地开发）
pub fn create_cors(config: &CorsConfig) -> Cors {
    let cors = if config.allowed_origins.is_empty() {
        Cors::default().allowed_origin_fn(|_, _req_head| true)
    } else {
        config
            .allowed_origins
            .iter()
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
    };

    cors.allowed_methods(vec!["GET", "POST", "PUT", "PATCH", "DELETE", "OPTIONS"])
        // X-Operator 等自定义 Header 需要通过预检
        .allow_any_header()
        .max_age(3600)
}
