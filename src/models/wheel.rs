use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

use crate::error::{AppError, AppResult};

/// 转盘档位
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum WheelType {
    Beginner,
    Intermediate,
    Advanced,
}

impl WheelType {
    pub const ALL: [WheelType; 3] = [
        WheelType::Beginner,
        WheelType::Intermediate,
        WheelType::Advanced,
    ];

    /// 抽中升级道具后进入的下一档转盘；高级转盘没有更高档
    pub fn next_tier(self) -> Option<WheelType> {
        match self {
            WheelType::Beginner => Some(WheelType::Intermediate),
            WheelType::Intermediate => Some(WheelType::Advanced),
            WheelType::Advanced => None,
        }
    }

    pub fn default_name(self) -> &'static str {
        match self {
            WheelType::Beginner => "初级转盘",
            WheelType::Intermediate => "中级转盘",
            WheelType::Advanced => "高级转盘",
        }
    }
}

impl fmt::Display for WheelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WheelType::Beginner => write!(f, "beginner"),
            WheelType::Intermediate => write!(f, "intermediate"),
            WheelType::Advanced => write!(f, "advanced"),
        }
    }
}

impl FromStr for WheelType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "beginner" => Ok(WheelType::Beginner),
            "intermediate" => Ok(WheelType::Intermediate),
            "advanced" => Ok(WheelType::Advanced),
            other => Err(AppError::ValidationError(format!(
                "Unknown wheel type: {other}"
            ))),
        }
    }
}

/// 转盘中的一行奖励
///
/// - weight: 相对权重，展示概率 = weight / 总权重
/// - item_name: 由道具目录解析后冗余存储，操作员可手动修改，不会自动重新解析
/// - is_grand_prize: 与所属转盘的 grand_prize_id 保持一致的冗余标记
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Reward {
    pub id: String,
    pub item_id: String,
    pub item_name: String,
    pub count: u32,
    pub weight: u32,
    #[serde(default)]
    pub is_grand_prize: bool,
}

/// 单个转盘配置
///
/// rewards 保持插入(存储)顺序；展示顺序(大奖置顶)只在读取时投影，从不落库。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Wheel {
    #[serde(rename = "type")]
    pub wheel_type: WheelType,
    pub name: String,
    pub max_rewards: usize,
    #[serde(default)]
    pub rewards: Vec<Reward>,
    #[serde(default)]
    pub grand_prize_id: Option<String>,
}

impl Wheel {
    pub fn new(wheel_type: WheelType, name: impl Into<String>, max_rewards: usize) -> Self {
        Self {
            wheel_type,
            name: name.into(),
            max_rewards,
            rewards: Vec::new(),
            grand_prize_id: None,
        }
    }

    pub fn reward(&self, id: &str) -> Option<&Reward> {
        self.rewards.iter().find(|r| r.id == id)
    }

    /// 存储顺序中的位置
    pub fn position(&self, id: &str) -> Option<usize> {
        self.rewards.iter().position(|r| r.id == id)
    }

    pub fn is_grand_prize(&self, id: &str) -> bool {
        self.grand_prize_id.as_deref() == Some(id)
    }

    pub fn is_full(&self) -> bool {
        self.rewards.len() >= self.max_rewards
    }

    pub fn total_weight(&self) -> u64 {
        self.rewards.iter().map(|r| r.weight as u64).sum()
    }

    /// 按 grand_prize_id 重写每行的 is_grand_prize 标记
    pub fn sync_grand_prize_flags(&mut self) {
        let grand = self.grand_prize_id.clone();
        for reward in &mut self.rewards {
            reward.is_grand_prize = grand.as_deref() == Some(reward.id.as_str());
        }
    }

    /// 结构性不变量（不含“必须已选大奖”，那是保存时的校验）
    pub fn check_invariants(&self) -> AppResult<()> {
        if self.rewards.len() > self.max_rewards {
            return Err(AppError::ValidationError(format!(
                "{} holds {} rewards but allows at most {}",
                self.wheel_type,
                self.rewards.len(),
                self.max_rewards
            )));
        }
        for (i, reward) in self.rewards.iter().enumerate() {
            if reward.count < 1 {
                return Err(AppError::ValidationError(format!(
                    "Reward {} in {} must have count >= 1",
                    reward.id, self.wheel_type
                )));
            }
            if self.rewards[..i].iter().any(|r| r.id == reward.id) {
                return Err(AppError::ValidationError(format!(
                    "Duplicate reward id {} in {}",
                    reward.id, self.wheel_type
                )));
            }
        }
        if let Some(grand) = &self.grand_prize_id
            && self.reward(grand).is_none()
        {
            return Err(AppError::ValidationError(format!(
                "Grand prize {grand} is not a reward of {}",
                self.wheel_type
            )));
        }
        Ok(())
    }
}
