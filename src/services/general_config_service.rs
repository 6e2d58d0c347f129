use std::sync::Arc;

use crate::error::{AppError, AppResult};
use crate::models::{ActivityStatus, ExportFile, GeneralConfig, PurchaseItemUpdateRequest};
use crate::store::ConfigStore;
use crate::utils::Clock;

#[derive(Clone)]
pub struct GeneralConfigService {
    store: Arc<dyn ConfigStore>,
    clock: Arc<dyn Clock>,
}

impl GeneralConfigService {
    pub fn new(store: Arc<dyn ConfigStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    pub async fn get(&self) -> AppResult<GeneralConfig> {
        self.store.load_general_config().await
    }

    /// 保存通用配置
    ///
    /// 1. 校验字段
    /// 2. 有进行中的活动时拒绝修改，避免影响正在抽奖的玩家
    /// 3. 写入存储
    pub async fn save(&self, config: GeneralConfig) -> AppResult<GeneralConfig> {
        config.validate()?;

        let now = self.clock.now();
        let activities = self.store.list_activities().await?;
        if let Some(active) = activities
            .iter()
            .find(|a| a.status_at(now) == ActivityStatus::Active)
        {
            return Err(AppError::Conflict(format!(
                "Activity {} is running; general config cannot be changed",
                active.id
            )));
        }

        self.store.save_general_config(&config).await?;
        log::info!(
            "General config saved: enabled={}, purchase_items={}",
            config.global_enabled,
            config.purchase_items.len()
        );
        Ok(config)
    }

    pub async fn add_purchase_item(&self) -> AppResult<GeneralConfig> {
        let mut config = self.get().await?;
        config.add_purchase_item();
        self.save(config).await
    }

    pub async fn update_purchase_item(
        &self,
        index: usize,
        change: PurchaseItemUpdateRequest,
    ) -> AppResult<GeneralConfig> {
        let mut config = self.get().await?;
        config.update_purchase_item(index, change.item_id, change.count)?;
        self.save(config).await
    }

    /// 删除最后一项会被拒绝，存储中的配置保持不变
    pub async fn remove_purchase_item(&self, index: usize) -> AppResult<GeneralConfig> {
        let mut config = self.get().await?;
        config.remove_purchase_item(index)?;
        self.save(config).await
    }

    /// 导入 JSON 文件，解析与校验都通过后走正常保存流程
    pub async fn import(&self, content: &str) -> AppResult<GeneralConfig> {
        let config: GeneralConfig = serde_json::from_str(content)
            .map_err(|e| AppError::ValidationError(format!("Invalid general config file: {e}")))?;
        self.save(config).await
    }

    /// `general-config-<日期>.json`
    pub async fn export(&self) -> AppResult<ExportFile> {
        let config = self.get().await?;
        Ok(ExportFile {
            filename: format!(
                "general-config-{}.json",
                self.clock.now().date().format("%Y-%m-%d")
            ),
            content: serde_json::to_string_pretty(&config)?,
        })
    }
}
