//! 转盘编辑器
//!
//! 每条命令都是 `(&Wheel, 命令) -> 新 Wheel` 的纯函数，原转盘不被修改（写时复制）。
//! 存储顺序与展示顺序分离：展示时把大奖固定在第一位，其余保持存储相对顺序；
//! 所有改动存储顺序的操作都按奖励ID定位，避免展示下标与存储下标错位。

use crate::error::{AppError, AppResult};
use crate::models::{MoveDirection, Reward, RewardView, Wheel, WheelCommand, WheelView};
use crate::utils::{generate_reward_id, generate_upgrade_reward_id};

/// 新增奖励行的默认名称（道具尚未配置）
pub const UNRESOLVED_ITEM_NAME: &str = "未配置";

/// 命令执行时需要的外部配置
#[derive(Debug, Clone)]
pub struct EditContext {
    /// 通用配置中的升级道具ID
    pub upgrade_item_id: String,
    pub upgrade_item_name: String,
    pub upgrade_reward_weight: u32,
}

/// 命令结果；Ignored 表示被禁用的操作（例如移动大奖行），调用方保留原转盘
#[derive(Debug, Clone, PartialEq)]
pub enum EditOutcome {
    Applied(Wheel),
    Ignored,
}

/// 展示顺序：大奖置顶，其余保持存储顺序（稳定）
pub fn display_order(wheel: &Wheel) -> Vec<&Reward> {
    let mut ordered: Vec<&Reward> = Vec::with_capacity(wheel.rewards.len());
    ordered.extend(wheel.rewards.iter().filter(|r| wheel.is_grand_prize(&r.id)));
    ordered.extend(wheel.rewards.iter().filter(|r| !wheel.is_grand_prize(&r.id)));
    ordered
}

/// weight / 总权重 × 100；总权重为0时为0
pub fn probability(wheel: &Wheel, reward: &Reward) -> f64 {
    let total = wheel.total_weight();
    if total == 0 {
        return 0.0;
    }
    reward.weight as f64 / total as f64 * 100.0
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub fn view(wheel: &Wheel) -> WheelView {
    let ordered = display_order(wheel);
    let last = ordered.len().saturating_sub(1);
    let rewards = ordered
        .iter()
        .enumerate()
        .map(|(idx, reward)| {
            let is_grand = wheel.is_grand_prize(&reward.id);
            let above_is_grand = idx > 0 && wheel.is_grand_prize(&ordered[idx - 1].id);
            RewardView {
                id: reward.id.clone(),
                item_id: reward.item_id.clone(),
                item_name: reward.item_name.clone(),
                count: reward.count,
                weight: reward.weight,
                is_grand_prize: is_grand,
                probability: round2(probability(wheel, reward)),
                can_move_up: !is_grand && idx > 0 && !above_is_grand,
                can_move_down: !is_grand && idx < last,
            }
        })
        .collect();

    WheelView {
        wheel_type: wheel.wheel_type,
        name: wheel.name.clone(),
        max_rewards: wheel.max_rewards,
        grand_prize_id: wheel.grand_prize_id.clone(),
        total_weight: wheel.total_weight(),
        rewards,
        can_add_reward: !wheel.is_full(),
        can_add_upgrade_reward: !wheel.is_full() && wheel.wheel_type.next_tier().is_some(),
    }
}

pub fn apply(wheel: &Wheel, command: &WheelCommand, ctx: &EditContext) -> AppResult<EditOutcome> {
    let mut next = wheel.clone();

    match command {
        WheelCommand::AddReward => {
            ensure_capacity(wheel)?;
            next.rewards.push(Reward {
                id: generate_reward_id(),
                item_id: String::new(),
                item_name: UNRESOLVED_ITEM_NAME.to_string(),
                count: 1,
                weight: 0,
                is_grand_prize: false,
            });
        }
        WheelCommand::AddUpgradeReward => {
            if wheel.wheel_type.next_tier().is_none() {
                return Err(AppError::ValidationError(format!(
                    "The {} wheel has no higher tier to upgrade to",
                    wheel.wheel_type
                )));
            }
            ensure_capacity(wheel)?;
            if ctx.upgrade_item_id.trim().is_empty() {
                return Err(AppError::ValidationError(
                    "Upgrade item id is not configured in the general config".into(),
                ));
            }
            next.rewards.push(Reward {
                id: generate_upgrade_reward_id(),
                item_id: ctx.upgrade_item_id.clone(),
                item_name: ctx.upgrade_item_name.clone(),
                count: 1,
                weight: ctx.upgrade_reward_weight,
                is_grand_prize: false,
            });
        }
        WheelCommand::RemoveReward { id } => {
            let pos = locate(wheel, id)?;
            next.rewards.remove(pos);
            if wheel.is_grand_prize(id) {
                // 需要重新选择大奖后才能保存
                next.grand_prize_id = None;
            }
        }
        WheelCommand::MoveReward { id, direction } => {
            locate(wheel, id)?;
            let Some((from, to)) = move_target(wheel, id, *direction) else {
                return Ok(EditOutcome::Ignored);
            };
            next.rewards.swap(from, to);
        }
        WheelCommand::SetGrandPrize { id } => {
            if let Some(id) = id {
                locate(wheel, id)?;
            }
            next.grand_prize_id = id.clone();
        }
        WheelCommand::UpdateReward {
            id,
            item_id,
            item_name,
            count,
            weight,
        } => {
            let pos = locate(wheel, id)?;
            if count == &Some(0) {
                return Err(AppError::ValidationError(
                    "Reward count must be at least 1".into(),
                ));
            }
            let reward = &mut next.rewards[pos];
            if let Some(v) = item_id {
                reward.item_id = v.clone();
            }
            if let Some(v) = item_name {
                reward.item_name = v.clone();
            }
            if let Some(v) = count {
                reward.count = *v;
            }
            if let Some(v) = weight {
                reward.weight = *v;
            }
        }
    }

    next.sync_grand_prize_flags();
    Ok(EditOutcome::Applied(next))
}

fn ensure_capacity(wheel: &Wheel) -> AppResult<()> {
    if wheel.is_full() {
        return Err(AppError::ValidationError(format!(
            "The {} wheel already holds the maximum of {} rewards",
            wheel.wheel_type, wheel.max_rewards
        )));
    }
    Ok(())
}

fn locate(wheel: &Wheel, id: &str) -> AppResult<usize> {
    wheel.position(id).ok_or_else(|| {
        AppError::NotFound(format!("Reward {id} not found in {} wheel", wheel.wheel_type))
    })
}

/// 根据展示顺序找到相邻行，返回两者在存储顺序中的下标
///
/// 大奖行不可移动，也不能与大奖行交换。
fn move_target(wheel: &Wheel, id: &str, direction: MoveDirection) -> Option<(usize, usize)> {
    if wheel.is_grand_prize(id) {
        return None;
    }
    let ordered = display_order(wheel);
    let idx = ordered.iter().position(|r| r.id == id)?;
    let neighbor = match direction {
        MoveDirection::Up => idx.checked_sub(1)?,
        MoveDirection::Down => idx + 1,
    };
    let neighbor = ordered.get(neighbor)?;
    if wheel.is_grand_prize(&neighbor.id) {
        return None;
    }
    Some((wheel.position(id)?, wheel.position(&neighbor.id)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::WheelType;

    fn ctx() -> EditContext {
        EditContext {
            upgrade_item_id: "item_9999".into(),
            upgrade_item_name: "转盘升级券".into(),
            upgrade_reward_weight: 50,
        }
    }

    fn reward(id: &str, weight: u32) -> Reward {
        Reward {
            id: id.to_string(),
            item_id: format!("item_{id}"),
            item_name: id.to_string(),
            count: 1,
            weight,
            is_grand_prize: false,
        }
    }

    fn wheel(ids: &[(&str, u32)], grand: Option<&str>, max: usize) -> Wheel {
        let mut wheel = Wheel::new(WheelType::Beginner, "初级转盘", max);
        wheel.rewards = ids.iter().map(|(id, w)| reward(id, *w)).collect();
        wheel.grand_prize_id = grand.map(str::to_string);
        wheel.sync_grand_prize_flags();
        wheel
    }

    fn applied(outcome: EditOutcome) -> Wheel {
        match outcome {
            EditOutcome::Applied(w) => w,
            EditOutcome::Ignored => panic!("command was ignored"),
        }
    }

    fn ids(wheel: &Wheel) -> Vec<&str> {
        wheel.rewards.iter().map(|r| r.id.as_str()).collect()
    }

    fn display_ids(wheel: &Wheel) -> Vec<&str> {
        display_order(wheel).iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn test_display_order_and_probability_scenario() {
        let w = wheel(&[("A", 500), ("B", 10)], Some("B"), 15);
        assert_eq!(display_ids(&w), vec!["B", "A"]);
        // 存储顺序不受影响
        assert_eq!(ids(&w), vec!["A", "B"]);

        let v = view(&w);
        assert_eq!(v.rewards[0].id, "B");
        assert_eq!(v.rewards[0].probability, 1.96);
        assert_eq!(v.rewards[1].probability, 98.04);
        assert_eq!(v.total_weight, 510);
    }

    #[test]
    fn test_probabilities_sum_to_hundred() {
        let w = wheel(&[("A", 3), ("B", 7), ("C", 11), ("D", 0)], None, 15);
        let sum: f64 = w.rewards.iter().map(|r| probability(&w, r)).sum();
        assert!((sum - 100.0).abs() < 1e-9);

        let zero = wheel(&[("A", 0), ("B", 0)], None, 15);
        assert!(zero.rewards.iter().all(|r| probability(&zero, r) == 0.0));
        assert!(view(&zero).rewards.iter().all(|r| r.probability == 0.0));
    }

    #[test]
    fn test_add_reward_defaults_and_capacity() {
        let w = wheel(&[("A", 1)], None, 2);
        let w = applied(apply(&w, &WheelCommand::AddReward, &ctx()).unwrap());
        let added = &w.rewards[1];
        assert_eq!(added.weight, 0);
        assert_eq!(added.count, 1);
        assert!(!added.is_grand_prize);
        assert_eq!(added.item_name, UNRESOLVED_ITEM_NAME);

        let err = apply(&w, &WheelCommand::AddReward, &ctx()).unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
        assert_eq!(w.rewards.len(), 2);
        assert!(!view(&w).can_add_reward);
    }

    #[test]
    fn test_remove_at_capacity_frees_exactly_one_slot() {
        let w = wheel(&[("A", 1), ("B", 1), ("C", 1)], Some("A"), 3);
        let w = applied(apply(&w, &WheelCommand::RemoveReward { id: "B".into() }, &ctx()).unwrap());
        let w = applied(apply(&w, &WheelCommand::AddReward, &ctx()).unwrap());
        assert_eq!(w.rewards.len(), 3);
        assert!(apply(&w, &WheelCommand::AddReward, &ctx()).is_err());
    }

    #[test]
    fn test_add_upgrade_reward() {
        let w = wheel(&[], None, 5);
        let w = applied(apply(&w, &WheelCommand::AddUpgradeReward, &ctx()).unwrap());
        assert_eq!(w.rewards[0].item_id, "item_9999");
        assert_eq!(w.rewards[0].weight, 50);
        assert!(w.rewards[0].id.starts_with("upgrade_"));

        let mut advanced = wheel(&[], None, 5);
        advanced.wheel_type = WheelType::Advanced;
        assert!(apply(&advanced, &WheelCommand::AddUpgradeReward, &ctx()).is_err());
        assert!(!view(&advanced).can_add_upgrade_reward);

        let full = wheel(&[("A", 1)], None, 1);
        assert!(apply(&full, &WheelCommand::AddUpgradeReward, &ctx()).is_err());
    }

    #[test]
    fn test_remove_grand_prize_resets_selection() {
        let w = wheel(&[("A", 500), ("B", 10)], Some("B"), 15);
        let w2 = applied(apply(&w, &WheelCommand::RemoveReward { id: "B".into() }, &ctx()).unwrap());
        assert_eq!(w2.grand_prize_id, None);
        assert_eq!(ids(&w2), vec!["A"]);
        // 原转盘不变
        assert_eq!(ids(&w), vec!["A", "B"]);

        let missing = apply(&w, &WheelCommand::RemoveReward { id: "Z".into() }, &ctx());
        assert!(matches!(missing, Err(AppError::NotFound(_))));
    }

    #[test]
    fn test_move_uses_storage_positions() {
        // 存储 [A, B, C, D]，大奖 C → 展示 [C, A, B, D]
        let w = wheel(&[("A", 1), ("B", 1), ("C", 1), ("D", 1)], Some("C"), 15);
        assert_eq!(display_ids(&w), vec!["C", "A", "B", "D"]);

        let moved = applied(
            apply(
                &w,
                &WheelCommand::MoveReward { id: "D".into(), direction: MoveDirection::Up },
                &ctx(),
            )
            .unwrap(),
        );
        assert_eq!(ids(&moved), vec!["A", "D", "C", "B"]);
        assert_eq!(display_ids(&moved), vec!["C", "A", "D", "B"]);

        let down = applied(
            apply(
                &w,
                &WheelCommand::MoveReward { id: "A".into(), direction: MoveDirection::Down },
                &ctx(),
            )
            .unwrap(),
        );
        assert_eq!(display_ids(&down), vec!["C", "B", "A", "D"]);
    }

    #[test]
    fn test_move_guards() {
        let w = wheel(&[("A", 1), ("B", 1), ("C", 1)], Some("B"), 15);
        let cmd = |id: &str, direction| WheelCommand::MoveReward { id: id.into(), direction };

        // 大奖行不可移动
        assert_eq!(apply(&w, &cmd("B", MoveDirection::Down), &ctx()).unwrap(), EditOutcome::Ignored);
        // 不能越过置顶的大奖
        assert_eq!(apply(&w, &cmd("A", MoveDirection::Up), &ctx()).unwrap(), EditOutcome::Ignored);
        // 末行不能下移
        assert_eq!(apply(&w, &cmd("C", MoveDirection::Down), &ctx()).unwrap(), EditOutcome::Ignored);

        let v = view(&w);
        assert!(!v.rewards[0].can_move_up && !v.rewards[0].can_move_down);
        assert!(!v.rewards[1].can_move_up && v.rewards[1].can_move_down);
        assert!(v.rewards[2].can_move_up && !v.rewards[2].can_move_down);
    }

    #[test]
    fn test_set_grand_prize() {
        let w = wheel(&[("A", 1), ("B", 1)], None, 15);
        let w = applied(apply(&w, &WheelCommand::SetGrandPrize { id: Some("B".into()) }, &ctx()).unwrap());
        assert_eq!(w.grand_prize_id.as_deref(), Some("B"));
        assert!(w.rewards[1].is_grand_prize);
        assert_eq!(display_ids(&w), vec!["B", "A"]);

        let w = applied(apply(&w, &WheelCommand::SetGrandPrize { id: None }, &ctx()).unwrap());
        assert!(w.rewards.iter().all(|r| !r.is_grand_prize));

        assert!(apply(&w, &WheelCommand::SetGrandPrize { id: Some("Z".into()) }, &ctx()).is_err());
    }

    #[test]
    fn test_update_reward() {
        let w = wheel(&[("A", 1)], None, 15);
        let cmd = WheelCommand::UpdateReward {
            id: "A".into(),
            item_id: Some("gold".into()),
            item_name: Some("金币".into()),
            count: Some(1000),
            weight: Some(500),
        };
        let w = applied(apply(&w, &cmd, &ctx()).unwrap());
        assert_eq!(w.rewards[0].item_name, "金币");
        assert_eq!(w.rewards[0].count, 1000);
        assert_eq!(w.rewards[0].weight, 500);

        let zero = WheelCommand::UpdateReward {
            id: "A".into(),
            item_id: None,
            item_name: None,
            count: Some(0),
            weight: None,
        };
        assert!(apply(&w, &zero, &ctx()).is_err());
    }

    #[test]
    fn test_command_json_shape() {
        let cmd: WheelCommand =
            serde_json::from_str(r#"{"action":"moveReward","id":"rw_01","direction":"up"}"#).unwrap();
        assert_eq!(cmd, WheelCommand::MoveReward { id: "rw_01".into(), direction: MoveDirection::Up });
        let cmd: WheelCommand =
            serde_json::from_str(r#"{"action":"updateReward","id":"rw_01","itemName":"星豆"}"#).unwrap();
        assert!(matches!(cmd, WheelCommand::UpdateReward { item_name: Some(_), count: None, .. }));
        let cmd: WheelCommand = serde_json::from_str(r#"{"action":"addReward"}"#).unwrap();
        assert_eq!(cmd, WheelCommand::AddReward);
    }
}
