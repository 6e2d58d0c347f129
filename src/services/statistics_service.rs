use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{AppError, AppResult};
use crate::models::{
    ActivityOutputSummary, DrawRecord, DrawRecordQuery, DrawType, OutputOverview,
    PaginatedResponse, PaginationParams, RewardNameSummary, RewardOutput, RewardType, TierShare,
    TypeQuantity, UserDrawStats, WheelType,
};
use crate::store::{ConfigStore, RecordLedger};
use crate::utils::parse_datetime;

/// 玩家统计中附带的最近记录条数
pub const RECENT_RECORD_LIMIT: usize = 10;

/// 按抽奖时间倒序
fn newest_first(records: &mut [DrawRecord]) {
    records.sort_by(|a, b| b.draw_time.cmp(&a.draw_time).then_with(|| b.id.cmp(&a.id)));
}

/// 单个玩家的抽奖聚合
///
/// 十连抽只累加组合奖励列表，记录顶层的 reward_count 不重复计入。
pub fn user_draw_stats(records: &[DrawRecord], user_id: &str) -> UserDrawStats {
    let mut mine: Vec<DrawRecord> = records
        .iter()
        .filter(|r| r.user_id == user_id)
        .cloned()
        .collect();

    let mut stats = UserDrawStats {
        user_id: user_id.to_string(),
        total_draws: mine.len() as u64,
        total_cost: 0,
        total_rewards: 0,
        ten_draw_count: 0,
        single_draw_count: 0,
        recent_records: Vec::new(),
    };
    for record in &mine {
        stats.total_cost += record.cost;
        stats.total_rewards += record.reward_quantity();
        match record.draw_type {
            DrawType::Ten => stats.ten_draw_count += 1,
            DrawType::Single => stats.single_draw_count += 1,
        }
    }

    newest_first(&mut mine);
    mine.truncate(RECENT_RECORD_LIMIT);
    stats.recent_records = mine;
    stats
}

/// 抽奖记录筛选 + 分页，新的在前
pub fn query_draw_records(
    records: &[DrawRecord],
    query: &DrawRecordQuery,
) -> AppResult<PaginatedResponse<DrawRecord>> {
    let from = parse_bound(query.from.as_deref(), "from")?;
    let to = parse_bound(query.to.as_deref(), "to")?;
    let user_id = query.user_id.as_deref().map(str::trim).filter(|u| !u.is_empty());

    let mut matched: Vec<DrawRecord> = records
        .iter()
        .filter(|r| user_id.is_none_or(|u| r.user_id == u))
        .filter(|r| query.draw_type.is_none_or(|t| r.draw_type == t))
        .filter(|r| from.is_none_or(|f| r.draw_time >= f))
        .filter(|r| to.is_none_or(|t| r.draw_time <= t))
        .cloned()
        .collect();
    newest_first(&mut matched);

    let params = PaginationParams::new(query.page, query.per_page);
    Ok(PaginatedResponse::paginate(matched, &params))
}

fn parse_bound(value: Option<&str>, name: &str) -> AppResult<Option<chrono::NaiveDateTime>> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(v) => parse_datetime(v).map(Some).ok_or_else(|| {
            AppError::ValidationError(format!("Invalid {name} time: {v}"))
        }),
    }
}

pub fn filter_outputs<'a>(outputs: &'a [RewardOutput], activity_id: Option<&str>) -> Vec<&'a RewardOutput> {
    outputs
        .iter()
        .filter(|o| activity_id.is_none_or(|id| o.activity_id == id))
        .collect()
}

/// 按活动汇总，活动按首次出现的顺序排列
pub fn outputs_by_activity(
    outputs: &[&RewardOutput],
    names: &HashMap<String, String>,
) -> Vec<ActivityOutputSummary> {
    let mut summaries: Vec<ActivityOutputSummary> = Vec::new();
    for output in outputs {
        let idx = match summaries.iter().position(|s| s.activity_id == output.activity_id) {
            Some(idx) => idx,
            None => {
                summaries.push(ActivityOutputSummary {
                    activity_id: output.activity_id.clone(),
                    name: names
                        .get(&output.activity_id)
                        .cloned()
                        .unwrap_or_else(|| output.activity_id.clone()),
                    total: 0,
                    by_type: RewardType::ALL
                        .into_iter()
                        .map(|reward_type| TypeQuantity {
                            reward_type,
                            quantity: 0,
                        })
                        .collect(),
                });
                summaries.len() - 1
            }
        };
        let summary = &mut summaries[idx];
        summary.total += output.quantity;
        if let Some(slot) = summary
            .by_type
            .iter_mut()
            .find(|t| t.reward_type == output.reward_type)
        {
            slot.quantity += output.quantity;
        }
    }
    summaries
}

/// 某活动某类型的明细行
pub fn type_detail(
    outputs: &[RewardOutput],
    activity_id: &str,
    reward_type: RewardType,
) -> Vec<RewardOutput> {
    outputs
        .iter()
        .filter(|o| o.activity_id == activity_id && o.reward_type == reward_type)
        .cloned()
        .collect()
}

/// 同名奖励合并，不区分活动与转盘；按首次出现的顺序排列
pub fn outputs_by_reward_name(outputs: &[&RewardOutput]) -> Vec<RewardNameSummary> {
    let mut summaries: Vec<RewardNameSummary> = Vec::new();
    for output in outputs {
        match summaries.iter_mut().find(|s| s.name == output.reward_name) {
            Some(summary) => {
                summary.total += output.quantity;
                summary.times += 1;
            }
            None => summaries.push(RewardNameSummary {
                name: output.reward_name.clone(),
                reward_type: output.reward_type,
                total: output.quantity,
                times: 1,
            }),
        }
    }
    summaries
}

/// 三档转盘的发放量与占比（百分比，保留两位小数）
pub fn outputs_by_tier(outputs: &[&RewardOutput]) -> Vec<TierShare> {
    let totals: Vec<(WheelType, u64)> = WheelType::ALL
        .into_iter()
        .map(|wheel| {
            let total = outputs
                .iter()
                .filter(|o| o.wheel == wheel)
                .map(|o| o.quantity)
                .sum();
            (wheel, total)
        })
        .collect();
    let grand_total: u64 = totals.iter().map(|(_, t)| t).sum();

    totals
        .into_iter()
        .map(|(wheel, total)| TierShare {
            wheel,
            total,
            share: if grand_total == 0 {
                0.0
            } else {
                (total as f64 / grand_total as f64 * 10_000.0).round() / 100.0
            },
        })
        .collect()
}

pub fn overview(outputs: &[&RewardOutput]) -> OutputOverview {
    let mut activities: Vec<&str> = outputs.iter().map(|o| o.activity_id.as_str()).collect();
    activities.sort_unstable();
    activities.dedup();
    OutputOverview {
        total_quantity: outputs.iter().map(|o| o.quantity).sum(),
        record_count: outputs.len() as u64,
        activity_count: activities.len() as u64,
    }
}

/// 统计查询服务：从只读账本取数，再交给上面的纯函数聚合
#[derive(Clone)]
pub struct StatisticsService {
    ledger: Arc<dyn RecordLedger>,
    store: Arc<dyn ConfigStore>,
}

impl StatisticsService {
    pub fn new(ledger: Arc<dyn RecordLedger>, store: Arc<dyn ConfigStore>) -> Self {
        Self { ledger, store }
    }

    pub async fn list_draw_records(
        &self,
        query: &DrawRecordQuery,
    ) -> AppResult<PaginatedResponse<DrawRecord>> {
        let records = self.ledger.list_draw_records().await?;
        query_draw_records(&records, query)
    }

    pub async fn user_stats(&self, user_id: &str) -> AppResult<UserDrawStats> {
        let records = self.ledger.list_draw_records().await?;
        if !records.iter().any(|r| r.user_id == user_id) {
            return Err(AppError::NotFound(format!("No draw records for user {user_id}")));
        }
        Ok(user_draw_stats(&records, user_id))
    }

    pub async fn overview(&self, activity_id: Option<&str>) -> AppResult<OutputOverview> {
        let outputs = self.ledger.list_reward_outputs().await?;
        Ok(overview(&filter_outputs(&outputs, activity_id)))
    }

    pub async fn by_activity(&self, activity_id: Option<&str>) -> AppResult<Vec<ActivityOutputSummary>> {
        let outputs = self.ledger.list_reward_outputs().await?;
        let names = self.activity_names().await?;
        Ok(outputs_by_activity(&filter_outputs(&outputs, activity_id), &names))
    }

    pub async fn by_reward_name(&self, activity_id: Option<&str>) -> AppResult<Vec<RewardNameSummary>> {
        let outputs = self.ledger.list_reward_outputs().await?;
        Ok(outputs_by_reward_name(&filter_outputs(&outputs, activity_id)))
    }

    pub async fn by_tier(&self, activity_id: Option<&str>) -> AppResult<Vec<TierShare>> {
        let outputs = self.ledger.list_reward_outputs().await?;
        Ok(outputs_by_tier(&filter_outputs(&outputs, activity_id)))
    }

    pub async fn type_detail(
        &self,
        activity_id: &str,
        reward_type: RewardType,
    ) -> AppResult<Vec<RewardOutput>> {
        let outputs = self.ledger.list_reward_outputs().await?;
        Ok(type_detail(&outputs, activity_id, reward_type))
    }

    /// 活动ID → 展示名（备注优先）
    async fn activity_names(&self) -> AppResult<HashMap<String, String>> {
        let activities = self.store.list_activities().await?;
        Ok(activities
            .into_iter()
            .map(|a| {
                let name = a.display_name().to_string();
                (a.id, name)
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CompositeReward, DrawStatus};
    use crate::store::{fixtures, MemoryStore};
    use chrono::NaiveDate;

    fn record(id: &str, user: &str, day: u32, draw_type: DrawType) -> DrawRecord {
        DrawRecord {
            id: id.into(),
            user_id: user.into(),
            draw_time: NaiveDate::from_ymd_opt(2026, 1, day)
                .unwrap()
                .and_hms_opt(10, 0, 0)
                .unwrap(),
            draw_type,
            cost: if draw_type == DrawType::Ten { 10 } else { 1 },
            reward_id: "item_1001".into(),
            reward_name: "星豆".into(),
            reward_count: 100,
            status: DrawStatus::Success,
            rewards: None,
        }
    }

    #[test]
    fn test_ten_draw_counts_only_composite_rewards() {
        let mut ten = record("D1", "U", 1, DrawType::Ten);
        ten.rewards = Some(fixtures::ten_draw_rewards());
        let other = record("D2", "V", 2, DrawType::Single);

        let stats = user_draw_stats(&[ten, other], "U");
        assert_eq!(stats.total_draws, 1);
        assert_eq!(stats.total_rewards, 1004);
        assert_eq!(stats.total_cost, 10);
        assert_eq!(stats.ten_draw_count, 1);
        assert_eq!(stats.single_draw_count, 0);
    }

    #[test]
    fn test_user_stats_mixed_and_recent_limit() {
        let mut records: Vec<DrawRecord> = (1..=12)
            .map(|day| record(&format!("S{day}"), "U", day, DrawType::Single))
            .collect();
        let mut ten = record("T1", "U", 20, DrawType::Ten);
        ten.rewards = Some(vec![CompositeReward {
            reward_name: "星豆".into(),
            reward_count: 7,
        }]);
        records.push(ten);

        let stats = user_draw_stats(&records, "U");
        assert_eq!(stats.total_draws, 13);
        assert_eq!(stats.total_cost, 12 + 10);
        assert_eq!(stats.total_rewards, 12 * 100 + 7);
        assert_eq!(stats.single_draw_count, 12);
        assert_eq!(stats.recent_records.len(), RECENT_RECORD_LIMIT);
        assert_eq!(stats.recent_records[0].id, "T1");
        assert_eq!(stats.recent_records[1].id, "S12");
    }

    #[test]
    fn test_query_draw_records_filters() {
        let records = fixtures::draw_records();
        let query = DrawRecordQuery {
            user_id: Some("USER_100".into()),
            ..Default::default()
        };
        let page = query_draw_records(&records, &query).unwrap();
        // i = 0, 5, 10, 15
        assert_eq!(page.total, 4);
        assert!(page.items.windows(2).all(|w| w[0].draw_time >= w[1].draw_time));

        let query = DrawRecordQuery {
            draw_type: Some(DrawType::Ten),
            from: Some("2026-01-04 00:00:00".into()),
            to: Some("2026-01-07".into()),
            ..Default::default()
        };
        assert!(query_draw_records(&records, &query).is_err());

        let query = DrawRecordQuery {
            draw_type: Some(DrawType::Ten),
            from: Some("2026-01-04 00:00:00".into()),
            to: Some("2026-01-07 23:59:59".into()),
            per_page: Some(2),
            ..Default::default()
        };
        let page = query_draw_records(&records, &query).unwrap();
        // 十连抽 i = 3, 6, 12, 15 → 日期 4, 7, 4, 7
        assert_eq!(page.total, 4);
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.total_pages, 2);
    }

    #[test]
    fn test_output_groupings() {
        let outputs = fixtures::reward_outputs();
        let all = filter_outputs(&outputs, None);
        let names = HashMap::from([("ACT_20231001".to_string(), "十一国庆节活动".to_string())]);

        let by_activity = outputs_by_activity(&all, &names);
        assert_eq!(by_activity.len(), 2);
        assert_eq!(by_activity[0].name, "十一国庆节活动");
        assert_eq!(by_activity[1].name, "ACT_20240101");
        assert_eq!(by_activity[0].total, 3200 + 120 + 540 + 7500 + 28 + 310 + 4350 + 42);
        assert_eq!(by_activity[0].quantity_of(RewardType::Skin), 148);
        assert_eq!(by_activity[1].quantity_of(RewardType::Clothing), 88);

        let detail = type_detail(&outputs, "ACT_20231001", RewardType::Skin);
        assert_eq!(detail.iter().map(|o| o.id.as_str()).collect::<Vec<_>>(), vec!["rp_002", "rp_010"]);

        let by_name = outputs_by_reward_name(&all);
        assert_eq!(by_name[0].name, "星豆");
        assert_eq!(by_name[0].times, 7);
        assert_eq!(by_name[0].total, 3200 + 6800 + 4200 + 5200 + 7500 + 6100 + 4350);

        let overview = overview(&all);
        assert_eq!(overview.record_count, 16);
        assert_eq!(overview.activity_count, 2);
        assert_eq!(overview.total_quantity, by_activity.iter().map(|s| s.total).sum::<u64>());
    }

    #[test]
    fn test_tier_share() {
        let outputs = fixtures::reward_outputs();
        let filtered = filter_outputs(&outputs, Some("ACT_20231001"));
        let tiers = outputs_by_tier(&filtered);
        assert_eq!(tiers.len(), 3);
        let sum: f64 = tiers.iter().map(|t| t.share).sum();
        assert!((sum - 100.0).abs() < 0.05);

        let none = filter_outputs(&outputs, Some("ACT_MISSING"));
        let tiers = outputs_by_tier(&none);
        assert!(tiers.iter().all(|t| t.total == 0 && t.share == 0.0));
        assert_eq!(overview(&none).activity_count, 0);
    }

    #[tokio::test]
    async fn test_service_resolves_names_from_remarks() {
        let store = Arc::new(MemoryStore::new(fixtures::seed()));
        let service = StatisticsService::new(store.clone(), store);

        let summaries = service.by_activity(None).await.unwrap();
        assert_eq!(summaries[0].name, "十一国庆节活动");
        assert_eq!(summaries[1].name, "2026年1月春节活动");

        let stats = service.user_stats("USER_100").await.unwrap();
        assert_eq!(stats.total_draws, 4);
        assert!(matches!(service.user_stats("NOBODY").await, Err(AppError::NotFound(_))));
    }
}
