use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::{AppError, AppResult};

/// 购买星盘券时一次获得的道具
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseItem {
    pub item_id: String,
    pub count: u32,
}

/// 所有转盘活动共用的通用配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GeneralConfig {
    /// 总闸: 关闭后所有入口隐藏
    pub global_enabled: bool,
    /// 星盘券道具ID
    pub ticket_item_id: String,
    /// 转盘升级道具ID（抽中后进入更高一级转盘）
    pub upgrade_item_id: String,
    pub single_draw_cost: u32,
    pub ten_draw_cost: u32,
    pub daily_exchange_limit: u32,
    pub purchase_items: Vec<PurchaseItem>,
    pub purchase_price: u32,
}

/// 修改某一项购买道具；未给出的字段保持不变
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseItemUpdateRequest {
    pub item_id: Option<String>,
    pub count: Option<u32>,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            global_enabled: false,
            ticket_item_id: String::new(),
            upgrade_item_id: String::new(),
            single_draw_cost: 1,
            ten_draw_cost: 10,
            daily_exchange_limit: 1000,
            purchase_items: vec![PurchaseItem {
                item_id: String::new(),
                count: 1,
            }],
            purchase_price: 0,
        }
    }
}

impl GeneralConfig {
    pub fn add_purchase_item(&mut self) {
        self.purchase_items.push(PurchaseItem {
            item_id: String::new(),
            count: 1,
        });
    }

    /// 数量最少为 1
    pub fn update_purchase_item(&mut self, index: usize, item_id: Option<String>, count: Option<u32>) -> AppResult<()> {
        let item = self.purchase_items.get_mut(index).ok_or_else(|| {
            AppError::NotFound(format!("Purchase item #{index} does not exist"))
        })?;
        if let Some(item_id) = item_id {
            item.item_id = item_id;
        }
        if let Some(count) = count {
            item.count = count.max(1);
        }
        Ok(())
    }

    /// 至少保留一项购买道具
    pub fn remove_purchase_item(&mut self, index: usize) -> AppResult<()> {
        if index >= self.purchase_items.len() {
            return Err(AppError::NotFound(format!(
                "Purchase item #{index} does not exist"
            )));
        }
        if self.purchase_items.len() <= 1 {
            return Err(AppError::ValidationError(
                "At least one purchase item must be kept".into(),
            ));
        }
        self.purchase_items.remove(index);
        Ok(())
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.purchase_items.is_empty() {
            return Err(AppError::ValidationError(
                "At least one purchase item must be kept".into(),
            ));
        }
        if let Some(pos) = self.purchase_items.iter().position(|i| i.count < 1) {
            return Err(AppError::ValidationError(format!(
                "Purchase item #{pos} must have count >= 1"
            )));
        }
        if self.single_draw_cost < 1 || self.ten_draw_cost < 1 {
            return Err(AppError::ValidationError(
                "Draw costs must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> GeneralConfig {
        GeneralConfig {
            global_enabled: true,
            ticket_item_id: "item_1001".into(),
            upgrade_item_id: "item_9999".into(),
            single_draw_cost: 1,
            ten_draw_cost: 10,
            daily_exchange_limit: 1000,
            purchase_items: vec![
                PurchaseItem { item_id: "item_1001".into(), count: 1 },
                PurchaseItem { item_id: "item_2002".into(), count: 5 },
            ],
            purchase_price: 100,
        }
    }

    #[test]
    fn test_remove_last_purchase_item_is_rejected() {
        let mut cfg = config();
        cfg.remove_purchase_item(0).unwrap();
        assert_eq!(cfg.purchase_items.len(), 1);

        let before = cfg.clone();
        assert!(matches!(cfg.remove_purchase_item(0), Err(AppError::ValidationError(_))));
        assert_eq!(cfg, before);
        assert!(matches!(cfg.remove_purchase_item(5), Err(AppError::NotFound(_))));
    }

    #[test]
    fn test_update_purchase_item_clamps_count() {
        let mut cfg = config();
        cfg.update_purchase_item(1, Some("item_3003".into()), Some(0)).unwrap();
        assert_eq!(cfg.purchase_items[1], PurchaseItem { item_id: "item_3003".into(), count: 1 });
        cfg.add_purchase_item();
        assert_eq!(cfg.purchase_items.len(), 3);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_validate() {
        let mut cfg = config();
        cfg.purchase_items.clear();
        assert!(cfg.validate().is_err());

        let mut cfg = config();
        cfg.ten_draw_cost = 0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_json_shape() {
        let value = serde_json::to_value(config()).unwrap();
        assert_eq!(value["upgradeItemId"], "item_9999");
        assert_eq!(value["purchaseItems"][1]["count"], 5);
    }
}
