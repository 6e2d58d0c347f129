use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

use super::{Wheel, WheelType};
use crate::error::{AppError, AppResult};
use crate::utils::datetime;

/// 活动状态（不落库，每次读取由当前时间与起止时间推导）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum ActivityStatus {
    NotStarted,
    Active,
    Ended,
}

impl ActivityStatus {
    /// 已结束的活动只读
    pub fn is_read_only(self) -> bool {
        self == ActivityStatus::Ended
    }
}

impl fmt::Display for ActivityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActivityStatus::NotStarted => write!(f, "notStarted"),
            ActivityStatus::Active => write!(f, "active"),
            ActivityStatus::Ended => write!(f, "ended"),
        }
    }
}

impl FromStr for ActivityStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "notStarted" => Ok(ActivityStatus::NotStarted),
            "active" => Ok(ActivityStatus::Active),
            "ended" => Ok(ActivityStatus::Ended),
            other => Err(AppError::ValidationError(format!(
                "Unknown activity status: {other}"
            ))),
        }
    }
}

/// now < start → 未开始；now > end → 已结束；其余（含边界时刻）→ 进行中
pub fn status(now: NaiveDateTime, start: NaiveDateTime, end: NaiveDateTime) -> ActivityStatus {
    if now < start {
        ActivityStatus::NotStarted
    } else if now > end {
        ActivityStatus::Ended
    } else {
        ActivityStatus::Active
    }
}

/// 多语言活动规则
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct LocalizedRules {
    #[serde(rename = "rulesZhCN", default)]
    pub zh_cn: String,
    #[serde(rename = "rulesZhTW", default)]
    pub zh_tw: String,
    #[serde(rename = "rulesJA", default)]
    pub ja: String,
}

/// 活动独占的三个转盘
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ActivityWheels {
    pub beginner: Wheel,
    pub intermediate: Wheel,
    pub advanced: Wheel,
}

impl ActivityWheels {
    pub fn get(&self, wheel_type: WheelType) -> &Wheel {
        match wheel_type {
            WheelType::Beginner => &self.beginner,
            WheelType::Intermediate => &self.intermediate,
            WheelType::Advanced => &self.advanced,
        }
    }

    pub fn get_mut(&mut self, wheel_type: WheelType) -> &mut Wheel {
        match wheel_type {
            WheelType::Beginner => &mut self.beginner,
            WheelType::Intermediate => &mut self.intermediate,
            WheelType::Advanced => &mut self.advanced,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Wheel> {
        [&self.beginner, &self.intermediate, &self.advanced].into_iter()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: String,
    #[serde(with = "datetime::optional", default)]
    #[schema(value_type = String, example = "2026-01-01 00:00:00")]
    pub start_time: Option<NaiveDateTime>,
    #[serde(with = "datetime::optional", default)]
    #[schema(value_type = String, example = "2026-01-31 23:59:59")]
    pub end_time: Option<NaiveDateTime>,
    #[serde(default)]
    pub remarks: String,
    #[serde(flatten)]
    pub rules: LocalizedRules,
    pub wheels: ActivityWheels,
    #[serde(default)]
    pub last_operator: String,
    #[serde(with = "datetime::optional", default)]
    #[schema(value_type = String)]
    pub last_update_time: Option<NaiveDateTime>,
}

impl Activity {
    /// 起止时间任一未设置时视为未开始
    pub fn status_at(&self, now: NaiveDateTime) -> ActivityStatus {
        match (self.start_time, self.end_time) {
            (Some(start), Some(end)) => status(now, start, end),
            _ => ActivityStatus::NotStarted,
        }
    }

    /// 列表展示名: 备注优先，空时退回ID
    pub fn display_name(&self) -> &str {
        if self.remarks.trim().is_empty() {
            &self.id
        } else {
            &self.remarks
        }
    }

    /// 尚未选定大奖的转盘档位
    pub fn wheels_missing_grand_prize(&self) -> Vec<WheelType> {
        WheelType::ALL
            .into_iter()
            .filter(|t| self.wheels.get(*t).grand_prize_id.is_none())
            .collect()
    }

    /// 导入等场景下的结构校验：键与档位一致、转盘不变量成立
    pub fn check_structure(&self) -> AppResult<()> {
        for wheel_type in WheelType::ALL {
            let wheel = self.wheels.get(wheel_type);
            if wheel.wheel_type != wheel_type {
                return Err(AppError::ValidationError(format!(
                    "Wheel under key {wheel_type} declares type {}",
                    wheel.wheel_type
                )));
            }
            wheel.check_invariants()?;
        }
        Ok(())
    }

    /// 保存前校验（用户可修正的错误）
    pub fn validate_for_save(&self) -> AppResult<()> {
        let (start, end) = match (self.start_time, self.end_time) {
            (Some(start), Some(end)) => (start, end),
            _ => {
                return Err(AppError::ValidationError(
                    "Start time and end time are required".into(),
                ));
            }
        };
        if start >= end {
            return Err(AppError::ValidationError(
                "Start time must be earlier than end time".into(),
            ));
        }
        self.check_structure()?;
        let missing = self.wheels_missing_grand_prize();
        if !missing.is_empty() {
            let names: Vec<String> = missing.iter().map(ToString::to_string).collect();
            return Err(AppError::ValidationError(format!(
                "Every wheel must have a grand prize (missing: {})",
                names.join(", ")
            )));
        }
        Ok(())
    }
}
