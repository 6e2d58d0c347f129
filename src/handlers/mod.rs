pub mod activity;
pub mod editor;
pub mod general_config;
pub mod statistics;

pub use activity::activity_config;
pub use editor::editor_config;
pub use general_config::general_config_config;
pub use statistics::statistics_config;

use actix_web::{HttpRequest, web};

use crate::config::Config;

/// 记录 lastOperator 时使用的操作人请求头
pub const OPERATOR_HEADER: &str = "X-Operator";

/// 从请求头读取操作人，缺省时使用配置中的默认操作人
pub fn operator_from_request(req: &HttpRequest, config: &Config) -> String {
    req.headers()
        .get(OPERATOR_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| config.operator.default_name.clone())
}

/// `/api/v1` 下的全部路由
pub fn api_config(cfg: &mut web::ServiceConfig) {
    cfg.configure(general_config_config)
        .configure(activity_config)
        .configure(editor_config)
        .configure(statistics_config);
}
