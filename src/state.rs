use actix_web::web;
use std::sync::Arc;

use crate::config::Config;
use crate::services::{ActivityService, GeneralConfigService, StatisticsService};
use crate::store::MemoryStore;
use crate::utils::Clock;

/// 所有 handler 共享的服务实例
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub activity_service: ActivityService,
    pub general_config_service: GeneralConfigService,
    pub statistics_service: StatisticsService,
}

impl AppState {
    pub fn new(config: Config, store: Arc<MemoryStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            activity_service: ActivityService::new(
                store.clone(),
                clock.clone(),
                config.wheel.clone(),
            ),
            general_config_service: GeneralConfigService::new(store.clone(), clock),
            statistics_service: StatisticsService::new(store.clone(), store),
            config,
        }
    }

    /// 注册为 actix 的 app_data
    pub fn register(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(web::Data::new(self.config.clone()))
            .app_data(web::Data::new(self.activity_service.clone()))
            .app_data(web::Data::new(self.general_config_service.clone()))
            .app_data(web::Data::new(self.statistics_service.clone()));
    }
}
