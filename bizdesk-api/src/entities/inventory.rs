use chrono::{DateTime, Utc};
use shared_types::inventory::DEFAULT_MAX_STOCK_LEVEL;
use shared_types::{InventoryItem, InventoryItemDraft, InventoryItemPayload};
use std::borrow::Cow;

use super::{
    or_empty, parse_amount, parse_count, require, require_non_negative, Entity,
};
use crate::error::ValidationError;

pub struct InventoryItems;

impl Entity for InventoryItems {
    type Record = InventoryItem;
    type Draft = InventoryItemDraft;
    type Payload = InventoryItemPayload;

    const TABLE: &'static str = "inventory_items";
    const SLUG: &'static str = "inventory";
    const NOUN: &'static str = "item";

    fn id(record: &InventoryItem) -> &str {
        &record.id
    }

    fn search_fields(record: &InventoryItem) -> Vec<Cow<'_, str>> {
        vec![
            Cow::Borrowed(record.name.as_str()),
            Cow::Borrowed(record.sku.as_str()),
            Cow::Borrowed(record.category.as_deref().unwrap_or_default()),
            Cow::Borrowed(record.brand.as_deref().unwrap_or_default()),
        ]
    }

    fn draft_from(record: &InventoryItem) -> InventoryItemDraft {
        InventoryItemDraft {
            sku: record.sku.clone(),
            name: record.name.clone(),
            description: or_empty(&record.description),
            category: or_empty(&record.category),
            brand: or_empty(&record.brand),
            cost_price: record.cost_price.to_string(),
            sell_price: record.sell_price.to_string(),
            current_stock: record.current_stock.to_string(),
            min_stock_level: record.min_stock_level.to_string(),
            max_stock_level: record.max_stock_level.to_string(),
            unit: or_empty(&record.unit),
            location: or_empty(&record.location),
            supplier: or_empty(&record.supplier),
        }
    }

    fn normalize(draft: &InventoryItemDraft, _now: DateTime<Utc>) -> InventoryItemPayload {
        InventoryItemPayload {
            sku: draft.sku.clone(),
            name: draft.name.clone(),
            description: draft.description.clone(),
            category: draft.category.clone(),
            brand: draft.brand.clone(),
            cost_price: parse_amount(&draft.cost_price),
            sell_price: parse_amount(&draft.sell_price),
            current_stock: parse_count(&draft.current_stock, 0),
            min_stock_level: parse_count(&draft.min_stock_level, 0),
            max_stock_level: parse_count(&draft.max_stock_level, DEFAULT_MAX_STOCK_LEVEL),
            unit: draft.unit.clone(),
            location: draft.location.clone(),
            supplier: draft.supplier.clone(),
        }
    }

    fn validate(draft: &InventoryItemDraft) -> Result<(), ValidationError> {
        require("sku", &draft.sku)?;
        require("name", &draft.name)?;
        require_non_negative("cost_price", &draft.cost_price)?;
        require_non_negative("sell_price", &draft.sell_price)?;
        require_non_negative("current_stock", &draft.current_stock)?;
        let min = require_non_negative("min_stock_level", &draft.min_stock_level)?;
        let max = require_non_negative("max_stock_level", &draft.max_stock_level)?;
        if min > max {
            return Err(ValidationError::new(
                "min_stock_level",
                "must not exceed max_stock_level",
            ));
        }
        Ok(())
    }
}
