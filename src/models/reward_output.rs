use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

use super::WheelType;
use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum RewardType {
    Currency,
    Skin,
    Clothing,
    Consumable,
}

impl RewardType {
    pub const ALL: [RewardType; 4] = [
        RewardType::Currency,
        RewardType::Skin,
        RewardType::Clothing,
        RewardType::Consumable,
    ];
}

impl fmt::Display for RewardType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RewardType::Currency => write!(f, "currency"),
            RewardType::Skin => write!(f, "skin"),
            RewardType::Clothing => write!(f, "clothing"),
            RewardType::Consumable => write!(f, "consumable"),
        }
    }
}

impl FromStr for RewardType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "currency" => Ok(RewardType::Currency),
            "skin" => Ok(RewardType::Skin),
            "clothing" => Ok(RewardType::Clothing),
            "consumable" => Ok(RewardType::Consumable),
            other => Err(AppError::ValidationError(format!(
                "Unknown reward type: {other}"
            ))),
        }
    }
}

/// 奖励发放流水（只读账本行）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RewardOutput {
    pub id: String,
    pub activity_id: String,
    pub wheel: WheelType,
    pub reward_name: String,
    pub reward_type: RewardType,
    pub quantity: u64,
    #[schema(value_type = String, example = "2026-01-01")]
    pub date: NaiveDate,
}

/// 发放统计筛选
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
pub struct RewardOutputQuery {
    pub activity_id: Option<String>,
}

/// 某活动某奖励类型的明细筛选
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct OutputDetailQuery {
    pub activity_id: String,
    pub reward_type: RewardType,
}
