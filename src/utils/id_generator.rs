use chrono::{Datelike, NaiveDateTime};
use rand::Rng;
use uuid::Uuid;

/// 生成活动ID: ACT_ + 年份 + 4位随机数字
pub fn generate_activity_id(now: NaiveDateTime) -> String {
    let mut rng = rand::thread_rng();
    format!("ACT_{}{:04}", now.year(), rng.gen_range(0..10_000))
}

/// 普通奖励行ID
pub fn generate_reward_id() -> String {
    format!("new_{}", Uuid::new_v4().simple())
}

/// 升级道具奖励行ID
pub fn generate_upgrade_reward_id() -> String {
    format!("upgrade_{}", Uuid::new_v4().simple())
}
