//! 活动编辑相关的请求与视图

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{Activity, ActivityStatus, LocalizedRules, WheelType};
use crate::utils::datetime;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum MoveDirection {
    Up,
    Down,
}

/// 转盘编辑命令，所有针对奖励行的操作都按ID定位（不用展示下标）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum WheelCommand {
    AddReward,
    AddUpgradeReward,
    RemoveReward {
        id: String,
    },
    MoveReward {
        id: String,
        direction: MoveDirection,
    },
    SetGrandPrize {
        id: Option<String>,
    },
    UpdateReward {
        id: String,
        #[serde(rename = "itemId", default)]
        item_id: Option<String>,
        #[serde(rename = "itemName", default)]
        item_name: Option<String>,
        #[serde(default)]
        count: Option<u32>,
        #[serde(default)]
        weight: Option<u32>,
    },
}

/// 活动基础字段修改；未给出的字段保持不变
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActivityFieldsUpdate {
    #[serde(default, with = "datetime::optional", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub start_time: Option<NaiveDateTime>,
    #[serde(default, with = "datetime::optional", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub end_time: Option<NaiveDateTime>,
    pub remarks: Option<String>,
    #[serde(rename = "rulesZhCN")]
    pub rules_zh_cn: Option<String>,
    #[serde(rename = "rulesZhTW")]
    pub rules_zh_tw: Option<String>,
    #[serde(rename = "rulesJA")]
    pub rules_ja: Option<String>,
}

/// 展示用奖励行（含概率）
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RewardView {
    pub id: String,
    pub item_id: String,
    pub item_name: String,
    pub count: u32,
    pub weight: u32,
    pub is_grand_prize: bool,
    /// 百分比，保留两位小数
    pub probability: f64,
    pub can_move_up: bool,
    pub can_move_down: bool,
}

/// 展示用转盘：大奖置顶的投影，不落库
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WheelView {
    #[serde(rename = "type")]
    pub wheel_type: WheelType,
    pub name: String,
    pub max_rewards: usize,
    pub grand_prize_id: Option<String>,
    pub total_weight: u64,
    pub rewards: Vec<RewardView>,
    pub can_add_reward: bool,
    pub can_add_upgrade_reward: bool,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EditorView {
    pub session_id: String,
    pub status: ActivityStatus,
    pub read_only: bool,
    pub is_new: bool,
    pub is_dirty: bool,
    pub activity: Activity,
    pub wheels: Vec<WheelView>,
    pub missing_grand_prizes: Vec<WheelType>,
}

/// 编辑命令结果；applied=false 表示被静默拒绝（只读或禁用操作）
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EditorResponse {
    pub applied: bool,
    pub editor: EditorView,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateActivityRequest {
    /// 复制该活动作为模板
    pub template_id: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
pub struct ActivityListQuery {
    pub status: Option<ActivityStatus>,
    pub sort: Option<SortOrder>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActivityListItem {
    pub id: String,
    pub remarks: String,
    #[serde(with = "datetime::optional")]
    #[schema(value_type = String)]
    pub start_time: Option<NaiveDateTime>,
    #[serde(with = "datetime::optional")]
    #[schema(value_type = String)]
    pub end_time: Option<NaiveDateTime>,
    pub status: ActivityStatus,
    pub read_only: bool,
    /// 有未提交的行内修改
    pub is_edited: bool,
    pub last_operator: String,
    #[serde(with = "datetime::optional")]
    #[schema(value_type = String)]
    pub last_update_time: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct RemarkEditRequest {
    pub remarks: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PendingEditsResponse {
    pub is_dirty: bool,
    pub count: usize,
    pub activities: Vec<Activity>,
}

/// 导入文件内容（原始 JSON 文本）
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct ImportRequest {
    pub content: String,
}

/// 导出文件
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ExportFile {
    pub filename: String,
    pub content: String,
}

impl ActivityFieldsUpdate {
    pub fn apply_to(&self, activity: &mut Activity) {
        if let Some(start) = self.start_time {
            activity.start_time = Some(start);
        }
        if let Some(end) = self.end_time {
            activity.end_time = Some(end);
        }
        if let Some(remarks) = &self.remarks {
            activity.remarks = remarks.clone();
        }
        let LocalizedRules { zh_cn, zh_tw, ja } = &mut activity.rules;
        if let Some(v) = &self.rules_zh_cn {
            *zh_cn = v.clone();
        }
        if let Some(v) = &self.rules_zh_tw {
            *zh_tw = v.clone();
        }
        if let Some(v) = &self.rules_ja {
            *ja = v.clone();
        }
    }

    pub fn is_empty(&self) -> bool {
        self.start_time.is_none()
            && self.end_time.is_none()
            && self.remarks.is_none()
            && self.rules_zh_cn.is_none()
            && self.rules_zh_tw.is_none()
            && self.rules_ja.is_none()
    }
}
