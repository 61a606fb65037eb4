use serde::{Deserialize, Serialize};
use ts_rs::TS;

pub const DEFAULT_MAX_STOCK_LEVEL: i64 = 1000;
pub const DEFAULT_UNIT: &str = "pcs";

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct InventoryItem {
    pub id: String,
    pub sku: String,
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub brand: Option<String>,
    #[serde(default)]
    pub cost_price: f64,
    #[serde(default)]
    pub sell_price: f64,
    #[serde(default)]
    pub current_stock: i64,
    #[serde(default)]
    pub min_stock_level: i64,
    #[serde(default = "default_max_stock_level")]
    pub max_stock_level: i64,
    pub unit: Option<String>,
    pub location: Option<String>,
    pub supplier: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

fn default_max_stock_level() -> i64 {
    DEFAULT_MAX_STOCK_LEVEL
}

impl InventoryItem {
    pub fn stock_status(&self) -> StockStatus {
        StockStatus::derive(self.current_stock, self.min_stock_level, self.max_stock_level)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "kebab-case")]
pub enum StockStatus {
    Low,
    Normal,
    High,
}

impl StockStatus {
    /// Low takes precedence when the min and max thresholds overlap.
    pub fn derive(current_stock: i64, min_stock_level: i64, max_stock_level: i64) -> Self {
        if current_stock <= min_stock_level {
            Self::Low
        } else if current_stock >= max_stock_level {
            Self::High
        } else {
            Self::Normal
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Normal => "normal",
            Self::High => "high",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct InventoryItemDraft {
    pub sku: String,
    pub name: String,
    pub description: String,
    pub category: String,
    pub brand: String,
    pub cost_price: String,
    pub sell_price: String,
    pub current_stock: String,
    pub min_stock_level: String,
    pub max_stock_level: String,
    pub unit: String,
    pub location: String,
    pub supplier: String,
}

impl Default for InventoryItemDraft {
    fn default() -> Self {
        Self {
            sku: String::new(),
            name: String::new(),
            description: String::new(),
            category: String::new(),
            brand: String::new(),
            cost_price: "0".to_string(),
            sell_price: "0".to_string(),
            current_stock: "0".to_string(),
            min_stock_level: "0".to_string(),
            max_stock_level: DEFAULT_MAX_STOCK_LEVEL.to_string(),
            unit: DEFAULT_UNIT.to_string(),
            location: String::new(),
            supplier: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct InventoryItemPayload {
    pub sku: String,
    pub name: String,
    pub description: String,
    pub category: String,
    pub brand: String,
    pub cost_price: f64,
    pub sell_price: f64,
    pub current_stock: i64,
    pub min_stock_level: i64,
    pub max_stock_level: i64,
    pub unit: String,
    pub location: String,
    pub supplier: String,
}
