use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::utils::datetime;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DrawType {
    Single,
    Ten,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DrawStatus {
    Success,
    Fail,
}

/// 十连抽中的单条奖励
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompositeReward {
    pub reward_name: String,
    pub reward_count: u64,
}

/// 抽奖记录（由外部抽奖服务追加写入，只读）
///
/// 十连抽记录顶层的 reward_* 字段仅作展示摘要，真实产出以 rewards 列表为准。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DrawRecord {
    pub id: String,
    pub user_id: String,
    #[serde(with = "datetime::required")]
    #[schema(value_type = String, example = "2026-01-01 10:10:00")]
    pub draw_time: NaiveDateTime,
    pub draw_type: DrawType,
    pub cost: u64,
    pub reward_id: String,
    pub reward_name: String,
    pub reward_count: u64,
    pub status: DrawStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rewards: Option<Vec<CompositeReward>>,
}

impl DrawRecord {
    /// 本条记录实际发放的奖励数量
    ///
    /// 单抽取自身 reward_count；十连抽只累加组合列表，不再计入摘要字段。
    /// 缺少组合列表的十连抽记录退回摘要字段。
    pub fn reward_quantity(&self) -> u64 {
        match (self.draw_type, &self.rewards) {
            (DrawType::Ten, Some(rewards)) => rewards.iter().map(|r| r.reward_count).sum(),
            _ => self.reward_count,
        }
    }
}

/// 抽奖记录查询参数
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
pub struct DrawRecordQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub user_id: Option<String>,
    pub draw_type: Option<DrawType>,
    /// 起始时间 (YYYY-MM-DD HH:MM:SS)
    pub from: Option<String>,
    /// 截止时间 (YYYY-MM-DD HH:MM:SS)
    pub to: Option<String>,
}
