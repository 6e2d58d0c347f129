//! 持久化协作方
//!
//! 核心只通过这两个窄接口读写数据：配置类实体可保存，账本类记录只读。
//! 任何失败都以 `AppError::StoreError` 返回，调用方保留现有状态以便重试。

pub mod fixtures;
pub mod memory;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::models::{Activity, DrawRecord, GeneralConfig, RewardOutput};

pub use memory::MemoryStore;

/// 通用配置与活动配置的存取接口
#[async_trait]
pub trait ConfigStore: Send + Sync {
    async fn load_general_config(&self) -> AppResult<GeneralConfig>;

    async fn save_general_config(&self, config: &GeneralConfig) -> AppResult<()>;

    /// 按存储顺序列出所有活动
    async fn list_activities(&self) -> AppResult<Vec<Activity>>;

    async fn get_activity(&self, id: &str) -> AppResult<Option<Activity>>;

    /// 新增或覆盖一个活动
    async fn save_activity(&self, activity: &Activity) -> AppResult<()>;

    /// 批量保存：要么全部写入，要么一个都不写
    async fn save_activities(&self, activities: &[Activity]) -> AppResult<()>;
}

/// 抽奖记录与奖励发放流水（只读账本）
#[async_trait]
pub trait RecordLedger: Send + Sync {
    async fn list_draw_records(&self) -> AppResult<Vec<DrawRecord>>;

    async fn list_reward_outputs(&self) -> AppResult<Vec<RewardOutput>>;
}

/// 种子文件格式
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedData {
    #[serde(default)]
    pub general_config: GeneralConfig,
    #[serde(default)]
    pub activities: Vec<Activity>,
    #[serde(default)]
    pub draw_records: Vec<DrawRecord>,
    #[serde(default)]
    pub reward_outputs: Vec<RewardOutput>,
}
