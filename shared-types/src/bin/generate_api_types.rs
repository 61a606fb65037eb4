use shared_types::*;
use std::fs;
use std::path::Path;
use ts_rs::TS;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Generate TypeScript definitions for API types
    let mut types = Vec::new();

    // Company types
    types.push(clean_type(Company::export_to_string()?));
    types.push(clean_type(RelationshipStrength::export_to_string()?));
    types.push(clean_type(CompanyDraft::export_to_string()?));
    types.push(clean_type(CompanyPayload::export_to_string()?));
    types.push(clean_type(CompanyRef::export_to_string()?));

    // Contact types
    types.push(clean_type(Contact::export_to_string()?));
    types.push(clean_type(ContactDraft::export_to_string()?));
    types.push(clean_type(ContactPayload::export_to_string()?));
    types.push(clean_type(ContactRef::export_to_string()?));

    // Deal types
    types.push(clean_type(Deal::export_to_string()?));
    types.push(clean_type(DealStage::export_to_string()?));
    types.push(clean_type(DealStatus::export_to_string()?));
    types.push(clean_type(DealDraft::export_to_string()?));
    types.push(clean_type(DealPayload::export_to_string()?));
    types.push(clean_type(DealRef::export_to_string()?));

    // Inventory types
    types.push(clean_type(InventoryItem::export_to_string()?));
    types.push(clean_type(StockStatus::export_to_string()?));
    types.push(clean_type(InventoryItemDraft::export_to_string()?));
    types.push(clean_type(InventoryItemPayload::export_to_string()?));

    // Task types
    types.push(clean_type(Task::export_to_string()?));
    types.push(clean_type(TaskStatus::export_to_string()?));
    types.push(clean_type(TaskPriority::export_to_string()?));
    types.push(clean_type(TaskStatusChange::export_to_string()?));
    types.push(clean_type(TaskDraft::export_to_string()?));
    types.push(clean_type(TaskPayload::export_to_string()?));

    // Communication types
    types.push(clean_type(Communication::export_to_string()?));
    types.push(clean_type(CommunicationType::export_to_string()?));
    types.push(clean_type(Direction::export_to_string()?));
    types.push(clean_type(CommunicationDraft::export_to_string()?));
    types.push(clean_type(CommunicationPayload::export_to_string()?));

    // Lookup lists
    types.push(clean_type(ReferenceLists::export_to_string()?));

    // Dashboard types
    types.push(clean_type(DashboardStats::export_to_string()?));
    types.push(clean_type(StageCount::export_to_string()?));
    types.push(clean_type(Activity::export_to_string()?));
    types.push(clean_type(DashboardSummary::export_to_string()?));
    types.push(clean_type(DashboardView::export_to_string()?));

    // Shell types
    types.push(clean_type(UserSession::export_to_string()?));
    types.push(clean_type(Tab::export_to_string()?));
    types.push(clean_type(ShellStatus::export_to_string()?));
    types.push(clean_type(ShellView::export_to_string()?));
    types.push(clean_type(SelectTabRequest::export_to_string()?));

    // Request/response envelopes
    types.push(clean_type(SearchRequest::export_to_string()?));
    types.push(clean_type(ErrorResponse::export_to_string()?));

    let output_dir = Path::new("../web/src/api-types");
    fs::create_dir_all(output_dir)?;

    let output_path = output_dir.join("types.ts");
    let output = types.join("\n\n");

    fs::write(&output_path, output)?;
    println!("Generated TypeScript types in {}", output_path.display());

    Ok(())
}

/// Drops the per-file banner and the cross-file imports, since every
/// definition lands in one module.
fn clean_type(mut type_def: String) -> String {
    type_def.retain(|c| c != '\r');

    let filtered: Vec<&str> = type_def
        .lines()
        .filter(|line| {
            let trimmed = line.trim();
            !trimmed.starts_with("import type")
                && !trimmed.starts_with("// This file was generated")
                && !trimmed.starts_with("/* This file was generated")
        })
        .collect();

    let result = filtered.join("\n").trim().to_string();
    if result.is_empty() {
        result
    } else {
        format!("{}\n", result)
    }
}
