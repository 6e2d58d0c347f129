use serde::Serialize;
use utoipa::ToSchema;

use super::{DrawRecord, RewardType, WheelType};

/// 玩家抽奖聚合
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserDrawStats {
    pub user_id: String,
    pub total_draws: u64,
    pub total_cost: u64,
    pub total_rewards: u64,
    pub ten_draw_count: u64,
    pub single_draw_count: u64,
    /// 最近的抽奖记录（最多10条，新的在前）
    pub recent_records: Vec<DrawRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TypeQuantity {
    pub reward_type: RewardType,
    pub quantity: u64,
}

/// 按活动聚合的发放量
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActivityOutputSummary {
    pub activity_id: String,
    pub name: String,
    pub total: u64,
    /// 固定四种类型的顺序，数量可为0
    pub by_type: Vec<TypeQuantity>,
}

impl ActivityOutputSummary {
    pub fn quantity_of(&self, reward_type: RewardType) -> u64 {
        self.by_type
            .iter()
            .find(|t| t.reward_type == reward_type)
            .map(|t| t.quantity)
            .unwrap_or(0)
    }
}

/// 按奖励名称合并的发放量
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RewardNameSummary {
    pub name: String,
    pub reward_type: RewardType,
    pub total: u64,
    /// 发放次数（流水条数）
    pub times: u64,
}

/// 转盘档位占比
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TierShare {
    pub wheel: WheelType,
    pub total: u64,
    /// 百分比，分母为0时为0
    pub share: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OutputOverview {
    pub total_quantity: u64,
    pub record_count: u64,
    pub activity_count: u64,
}
