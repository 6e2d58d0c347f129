//! 内置样例数据，未提供种子文件时使用

use chrono::NaiveDate;

use super::SeedData;
use crate::models::{
    Activity, ActivityWheels, CompositeReward, DrawRecord, DrawStatus, DrawType, GeneralConfig,
    LocalizedRules, PurchaseItem, Reward, RewardOutput, RewardType, Wheel, WheelType,
};
use crate::utils::parse_datetime;

pub fn seed() -> SeedData {
    SeedData {
        general_config: general_config(),
        activities: activities(),
        draw_records: draw_records(),
        reward_outputs: reward_outputs(),
    }
}

pub fn general_config() -> GeneralConfig {
    GeneralConfig {
        global_enabled: true,
        ticket_item_id: "item_1001".into(),
        upgrade_item_id: "item_9999".into(),
        single_draw_cost: 1,
        ten_draw_cost: 10,
        daily_exchange_limit: 1000,
        purchase_items: vec![
            PurchaseItem {
                item_id: "item_1001".into(),
                count: 1,
            },
            PurchaseItem {
                item_id: "item_2002".into(),
                count: 5,
            },
        ],
        purchase_price: 100,
    }
}

fn empty_wheel(wheel_type: WheelType) -> Wheel {
    let max = match wheel_type {
        WheelType::Beginner => 15,
        WheelType::Intermediate => 12,
        WheelType::Advanced => 10,
    };
    Wheel::new(wheel_type, wheel_type.default_name(), max)
}

pub fn activities() -> Vec<Activity> {
    let mut national_day_beginner = empty_wheel(WheelType::Beginner);
    national_day_beginner.rewards = vec![
        Reward {
            id: "rw_01".into(),
            item_id: "gold".into(),
            item_name: "金币".into(),
            count: 1000,
            weight: 500,
            is_grand_prize: false,
        },
        Reward {
            id: "rw_02".into(),
            item_id: "skin_01".into(),
            item_name: "普通皮肤".into(),
            count: 1,
            weight: 10,
            is_grand_prize: true,
        },
    ];
    national_day_beginner.grand_prize_id = Some("rw_02".into());

    vec![
        Activity {
            id: "ACT_20231001".into(),
            start_time: parse_datetime("2025-10-01 00:00:00"),
            end_time: parse_datetime("2025-10-07 23:59:59"),
            remarks: "十一国庆节活动".into(),
            rules: LocalizedRules {
                zh_cn: "1. 每个玩家每天最多可以参与1000次\n2. 转盘中的所有奖项均有概率获得\n3. 需要使用星盘券参与抽奖".into(),
                zh_tw: "1. 每個玩家每天最多可以參與1000次\n2. 轉盤中的所有獎項均有機率獲得\n3. 需要使用星盤券參與抽獎".into(),
                ja: "1. 各プレイヤーは1日最大1000回参加できます\n2. ルーレットのすべての賞品に当選確率があります\n3. 抽選には星盤チケットが必要です".into(),
            },
            wheels: ActivityWheels {
                beginner: national_day_beginner,
                intermediate: empty_wheel(WheelType::Intermediate),
                advanced: empty_wheel(WheelType::Advanced),
            },
            last_operator: "admin_01".into(),
            last_update_time: parse_datetime("2025-09-25 14:30:00"),
        },
        Activity {
            id: "ACT_20240101".into(),
            start_time: parse_datetime("2026-01-01 00:00:00"),
            end_time: parse_datetime("2026-01-31 23:59:59"),
            remarks: "2026年1月春节活动".into(),
            rules: LocalizedRules {
                zh_cn: "请在此配置简体中文活动规则".into(),
                zh_tw: "請在此配置繁體中文活動規則".into(),
                ja: "日本語のイベントルールをここに設定してください".into(),
            },
            wheels: ActivityWheels {
                beginner: empty_wheel(WheelType::Beginner),
                intermediate: empty_wheel(WheelType::Intermediate),
                advanced: empty_wheel(WheelType::Advanced),
            },
            last_operator: "admin_02".into(),
            last_update_time: parse_datetime("2025-12-20 09:15:00"),
        },
    ]
}

/// 十连抽的十条组合奖励，合计 1004
pub fn ten_draw_rewards() -> Vec<CompositeReward> {
    [
        ("星豆", 100),
        ("星豆", 150),
        ("普通皮肤", 1),
        ("星豆", 200),
        ("星豆", 120),
        ("活动道具", 2),
        ("星豆", 180),
        ("星豆", 100),
        ("稀有装扮", 1),
        ("星豆", 150),
    ]
    .into_iter()
    .map(|(name, count)| CompositeReward {
        reward_name: name.to_string(),
        reward_count: count,
    })
    .collect()
}

pub fn draw_records() -> Vec<DrawRecord> {
    (0..20u32)
        .filter_map(|i| {
            let draw_type = if i % 3 == 0 { DrawType::Ten } else { DrawType::Single };
            let rare = i % 5 == 0;
            let draw_time = NaiveDate::from_ymd_opt(2026, 1, i % 9 + 1)?.and_hms_opt(10, 10 + i, 0)?;
            Some(DrawRecord {
                id: format!("DRAW_{}", 10000 + i),
                user_id: format!("USER_{}", 100 + i % 5),
                draw_time,
                draw_type,
                cost: if draw_type == DrawType::Ten { 10 } else { 1 },
                reward_id: "item_1001".into(),
                reward_name: (if rare { "稀有装扮" } else { "星豆" }).to_string(),
                reward_count: if rare { 1 } else { 100 },
                status: DrawStatus::Success,
                rewards: (draw_type == DrawType::Ten).then(ten_draw_rewards),
            })
        })
        .collect()
}

pub fn reward_outputs() -> Vec<RewardOutput> {
    use RewardType::*;
    use WheelType::*;

    let rows = [
        ("ACT_20231001", Beginner, "星豆", Currency, 3200, 1),
        ("ACT_20231001", Beginner, "普通皮肤", Skin, 120, 1),
        ("ACT_20231001", Intermediate, "活动道具", Consumable, 540, 2),
        ("ACT_20240101", Advanced, "稀有装扮", Skin, 35, 2),
        ("ACT_20240101", Advanced, "星豆", Currency, 6800, 3),
        ("ACT_20240101", Beginner, "星豆", Currency, 4200, 3),
        ("ACT_20240101", Intermediate, "兑换券", Consumable, 260, 4),
        ("ACT_20240101", Intermediate, "星豆", Currency, 5200, 4),
        ("ACT_20231001", Advanced, "星豆", Currency, 7500, 5),
        ("ACT_20231001", Advanced, "稀有装扮", Skin, 28, 5),
        ("ACT_20231001", Beginner, "活动道具", Consumable, 310, 6),
        ("ACT_20240101", Advanced, "星豆", Currency, 6100, 6),
        ("ACT_20240101", Beginner, "普通服饰", Clothing, 88, 6),
        ("ACT_20231001", Intermediate, "星豆", Currency, 4350, 6),
        ("ACT_20231001", Intermediate, "纪念服饰", Clothing, 42, 6),
        ("ACT_20240101", Advanced, "能量饮料", Consumable, 180, 7),
    ];

    rows.into_iter()
        .enumerate()
        .filter_map(|(i, (activity_id, wheel, name, reward_type, quantity, day))| {
            Some(RewardOutput {
                id: format!("rp_{:03}", i + 1),
                activity_id: activity_id.into(),
                wheel,
                reward_name: name.into(),
                reward_type,
                quantity,
                date: NaiveDate::from_ymd_opt(2026, 1, day)?,
            })
        })
        .collect()
}
