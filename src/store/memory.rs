//! 内存存储实现
//!
//! 用作持久化协作方的本地替身，可从种子文件或内置样例数据初始化，
//! 也可切换为不可用以模拟外部故障。

use async_trait::async_trait;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;

use super::{fixtures, ConfigStore, RecordLedger, SeedData};
use crate::config::StoreConfig;
use crate::error::{AppError, AppResult};
use crate::models::{Activity, DrawRecord, GeneralConfig, RewardOutput};

#[derive(Debug)]
pub struct MemoryStore {
    general_config: RwLock<GeneralConfig>,
    /// 保持插入顺序
    activities: RwLock<Vec<Activity>>,
    draw_records: RwLock<Vec<DrawRecord>>,
    reward_outputs: RwLock<Vec<RewardOutput>>,
    unavailable: AtomicBool,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new(SeedData::default())
    }
}

impl MemoryStore {
    pub fn new(seed: SeedData) -> Self {
        Self {
            general_config: RwLock::new(seed.general_config),
            activities: RwLock::new(seed.activities),
            draw_records: RwLock::new(seed.draw_records),
            reward_outputs: RwLock::new(seed.reward_outputs),
            unavailable: AtomicBool::new(false),
        }
    }

    /// 从 JSON 种子文件加载
    pub fn from_seed_file(path: impl AsRef<Path>) -> AppResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let seed: SeedData = serde_json::from_str(&content)?;
        for activity in &seed.activities {
            activity.check_structure()?;
        }
        log::info!(
            "Loaded seed file {}: {} activities, {} draw records, {} reward outputs",
            path.as_ref().display(),
            seed.activities.len(),
            seed.draw_records.len(),
            seed.reward_outputs.len()
        );
        Ok(Self::new(seed))
    }

    /// 按配置初始化：种子文件优先，其次内置样例数据，否则为空
    pub fn from_config(config: &StoreConfig) -> AppResult<Self> {
        match &config.seed_path {
            Some(path) => Self::from_seed_file(path),
            None if config.load_fixtures => Ok(Self::new(fixtures::seed())),
            None => Ok(Self::default()),
        }
    }

    /// 切换可用状态；不可用时所有读写都返回 StoreError
    pub fn set_available(&self, available: bool) {
        self.unavailable.store(!available, Ordering::SeqCst);
    }

    fn ensure_available(&self) -> AppResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(AppError::StoreError("store is unavailable".into()));
        }
        Ok(())
    }
}

fn upsert(activities: &mut Vec<Activity>, activity: &Activity) {
    match activities.iter_mut().find(|a| a.id == activity.id) {
        Some(existing) => *existing = activity.clone(),
        None => activities.push(activity.clone()),
    }
}

#[async_trait]
impl ConfigStore for MemoryStore {
    async fn load_general_config(&self) -> AppResult<GeneralConfig> {
        self.ensure_available()?;
        Ok(self.general_config.read().await.clone())
    }

    async fn save_general_config(&self, config: &GeneralConfig) -> AppResult<()> {
        self.ensure_available()?;
        *self.general_config.write().await = config.clone();
        Ok(())
    }

    async fn list_activities(&self) -> AppResult<Vec<Activity>> {
        self.ensure_available()?;
        Ok(self.activities.read().await.clone())
    }

    async fn get_activity(&self, id: &str) -> AppResult<Option<Activity>> {
        self.ensure_available()?;
        let activities = self.activities.read().await;
        Ok(activities.iter().find(|a| a.id == id).cloned())
    }

    async fn save_activity(&self, activity: &Activity) -> AppResult<()> {
        self.ensure_available()?;
        let mut activities = self.activities.write().await;
        upsert(&mut activities, activity);
        Ok(())
    }

    async fn save_activities(&self, batch: &[Activity]) -> AppResult<()> {
        self.ensure_available()?;
        // 持有写锁期间完成整批写入，外部看不到中间状态
        let mut activities = self.activities.write().await;
        for activity in batch {
            upsert(&mut activities, activity);
        }
        Ok(())
    }
}

#[async_trait]
impl RecordLedger for MemoryStore {
    async fn list_draw_records(&self) -> AppResult<Vec<DrawRecord>> {
        self.ensure_available()?;
        Ok(self.draw_records.read().await.clone())
    }

    async fn list_reward_outputs(&self) -> AppResult<Vec<RewardOutput>> {
        self.ensure_available()?;
        Ok(self.reward_outputs.read().await.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_save_activity_upserts_in_place() {
        let store = MemoryStore::new(fixtures::seed());
        let before = store.list_activities().await.unwrap();
        assert_eq!(before.len(), 2);

        let mut changed = before[0].clone();
        changed.remarks = "updated".into();
        store.save_activity(&changed).await.unwrap();

        let after = store.list_activities().await.unwrap();
        assert_eq!(after.len(), 2);
        assert_eq!(after[0].remarks, "updated");
        assert_eq!(after[1], before[1]);
    }

    #[tokio::test]
    async fn test_unavailable_store_fails_every_call() {
        let store = MemoryStore::new(fixtures::seed());
        store.set_available(false);
        assert!(matches!(store.list_activities().await, Err(AppError::StoreError(_))));
        assert!(store.load_general_config().await.is_err());
        assert!(store.list_draw_records().await.is_err());

        store.set_available(true);
        assert_eq!(store.list_draw_records().await.unwrap().len(), 20);
    }

    #[tokio::test]
    async fn test_failed_batch_writes_nothing() {
        let store = MemoryStore::new(fixtures::seed());
        let mut batch = store.list_activities().await.unwrap();
        for activity in &mut batch {
            activity.remarks = "batch".into();
        }

        store.set_available(false);
        assert!(store.save_activities(&batch).await.is_err());
        store.set_available(true);
        let stored = store.list_activities().await.unwrap();
        assert!(stored.iter().all(|a| a.remarks != "batch"));

        store.save_activities(&batch).await.unwrap();
        let stored = store.list_activities().await.unwrap();
        assert!(stored.iter().all(|a| a.remarks == "batch"));
    }

    #[tokio::test]
    async fn test_from_config() {
        let empty = MemoryStore::from_config(&StoreConfig {
            seed_path: None,
            load_fixtures: false,
        })
        .unwrap();
        assert!(empty.list_activities().await.unwrap().is_empty());

        let sample = MemoryStore::from_config(&StoreConfig::default()).unwrap();
        assert_eq!(sample.list_reward_outputs().await.unwrap().len(), 16);
    }

    #[test]
    fn test_missing_seed_file() {
        let result = MemoryStore::from_seed_file("/nonexistent/seed.json");
        assert!(matches!(result, Err(AppError::IoError(_))));
    }
}
