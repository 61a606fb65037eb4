mod common;

use bizdesk_api::config::ValidationMode;
use bizdesk_api::controller::{DeleteOutcome, LoadOutcome, SubmitOutcome};
use bizdesk_api::entities::{
    Communications, Companies, Contacts, Deals, Entity, InventoryItems, Tasks,
};
use bizdesk_api::error::{ControllerError, GatewayError};
use bizdesk_api::gateway::Gateway;
use bizdesk_api::{Controller, SessionContext};
use common::{local_gateway, signed_in, FlakyGateway, GatedGateway};
use serde_json::json;
use shared_types::{CommunicationType, DealStage, StockStatus, TaskStatus};
use std::sync::atomic::Ordering;
use std::sync::Arc;

async fn local_session() -> (tempfile::TempDir, SessionContext) {
    let (dir, gateway) = local_gateway();
    let session = signed_in(Arc::new(gateway), ValidationMode::Lenient).await;
    (dir, session)
}

async fn create<E: Entity>(controller: &Controller<E>, fill: impl FnOnce(&mut E::Draft)) -> String {
    controller.open_for_create();
    controller.edit_draft(fill).unwrap();
    match controller.submit().await.unwrap() {
        SubmitOutcome::Created { id } => id,
        other => panic!("expected a created row, got {other:?}"),
    }
}

/// Create, edit and delete one row next to an existing one.
async fn crud_cycle<E: Entity>(
    controller: &Controller<E>,
    fill: impl Fn(&mut E::Draft),
    edit: impl Fn(&mut E::Draft),
    edited: impl Fn(&E::Record) -> bool,
) {
    create(controller, &fill).await;
    controller.load().await.unwrap();
    let before = controller.records().len();
    assert_eq!(before, 1);

    let id = create(controller, &fill).await;
    let records = controller.records();
    assert_eq!(records.len(), before + 1);
    assert_eq!(records.iter().filter(|r| E::id(r) == id).count(), 1);
    assert!(!controller.view().form.is_open);

    controller.open_for_edit(&id).unwrap();
    controller.edit_draft(&edit).unwrap();
    assert_eq!(
        controller.submit().await.unwrap(),
        SubmitOutcome::Updated { id: id.clone() }
    );
    let records = controller.records();
    assert_eq!(records.len(), before + 1);
    let record = records.iter().find(|r| E::id(r) == id).unwrap();
    assert!(edited(record), "edit not visible on {} {}", E::NOUN, id);

    assert_eq!(
        controller.delete(&id, |_| true).await.unwrap(),
        DeleteOutcome::Deleted
    );
    let records = controller.records();
    assert_eq!(records.len(), before);
    assert!(records.iter().all(|r| E::id(r) != id));
}

#[tokio::test]
async fn test_crud_cycle_for_every_entity() {
    let (_dir, session) = local_session().await;

    crud_cycle(
        &Controller::<Companies>::new(session.clone()),
        |d| d.name = "Acme".to_string(),
        |d| d.industry = "Rockets".to_string(),
        |r| r.industry.as_deref() == Some("Rockets"),
    )
    .await;

    crud_cycle(
        &Controller::<Contacts>::new(session.clone()),
        |d| {
            d.first_name = "Wile".to_string();
            d.last_name = "Coyote".to_string();
        },
        |d| d.is_primary = true,
        |r| r.is_primary,
    )
    .await;

    crud_cycle(
        &Controller::<Deals>::new(session.clone()),
        |d| d.title = "Anvils".to_string(),
        |d| d.stage = DealStage::Negotiation,
        |r| r.stage == DealStage::Negotiation,
    )
    .await;

    crud_cycle(
        &Controller::<InventoryItems>::new(session.clone()),
        |d| {
            d.sku = "ANV-1".to_string();
            d.name = "Anvil".to_string();
        },
        |d| d.current_stock = "5000".to_string(),
        |r| r.current_stock == 5000 && r.stock_status() == StockStatus::High,
    )
    .await;

    crud_cycle(
        &Controller::<Tasks>::new(session.clone()),
        |d| d.title = "Order more anvils".to_string(),
        |d| d.status = TaskStatus::Completed,
        |r| r.status == TaskStatus::Completed && r.completed_at.is_some(),
    )
    .await;

    crud_cycle(
        &Controller::<Communications>::new(session.clone()),
        |d| d.subject = "Delivery".to_string(),
        |d| d.kind = CommunicationType::Meeting,
        |r| r.kind == CommunicationType::Meeting,
    )
    .await;
}

#[tokio::test]
async fn test_contact_embeds_company_name() {
    let (_dir, session) = local_session().await;
    let companies = Controller::<Companies>::new(session.clone());
    let contacts = Controller::<Contacts>::new(session.clone());

    let acme_id = create(&companies, |d| d.name = "Acme".to_string()).await;

    contacts.load().await.unwrap();
    let references = contacts.view().references;
    assert_eq!(references.companies.len(), 1);
    assert_eq!(references.companies[0].name, "Acme");

    create(&contacts, |d| {
        d.first_name = "Wile".to_string();
        d.last_name = "Coyote".to_string();
        d.company_id = acme_id.clone();
    })
    .await;

    contacts.load().await.unwrap();
    let records = contacts.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].company_id.as_deref(), Some(acme_id.as_str()));
    assert_eq!(records[0].company_name(), Some("Acme"));
}

#[tokio::test]
async fn test_deal_probability_is_stored_unclamped() {
    let (_dir, session) = local_session().await;
    let deals = Controller::<Deals>::new(session);

    create(&deals, |d| {
        d.title = "Oversized".to_string();
        d.value = "1500.5".to_string();
        d.probability = "150".to_string();
    })
    .await;

    let deal = &deals.records()[0];
    assert_eq!(deal.value, 1500.5);
    assert_eq!(deal.probability, 150);
}

#[tokio::test]
async fn test_task_toggle_is_an_involution() {
    let (_dir, session) = local_session().await;
    let tasks = Controller::<Tasks>::new(session);
    let id = create(&tasks, |d| d.title = "Call Acme".to_string()).await;

    let pending = tasks.records()[0].clone();
    assert_eq!(pending.status, TaskStatus::Pending);
    assert_eq!(pending.completed_at, None);

    let change = tasks.toggle_status(&id).await.unwrap();
    assert_eq!(change.status, TaskStatus::Completed);
    let completed = tasks.records()[0].clone();
    assert_eq!(completed.status, TaskStatus::Completed);
    assert!(completed.completed_at.is_some());

    tasks.toggle_status(&id).await.unwrap();
    let reopened = tasks.records()[0].clone();
    assert_eq!(reopened.status, pending.status);
    assert_eq!(reopened.completed_at, None);

    assert!(matches!(
        tasks.toggle_status("missing").await,
        Err(ControllerError::NotFound { noun: "task", .. })
    ));
}

#[tokio::test]
async fn test_search_filters_visible_rows() {
    let (_dir, session) = local_session().await;
    let companies = Controller::<Companies>::new(session);
    create(&companies, |d| {
        d.name = "Acme".to_string();
        d.industry = "Manufacturing".to_string();
    })
    .await;
    create(&companies, |d| d.name = "Globex".to_string()).await;

    companies.set_search("MANUF");
    let visible = companies.visible();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].name, "Acme");

    let view = companies.view();
    assert_eq!(view.rows.len(), 1);
    assert_eq!(view.total, 2);

    companies.set_search("");
    assert_eq!(companies.visible().len(), 2);
}

#[tokio::test]
async fn test_lookup_lists_follow_the_entity() {
    let (_dir, session) = local_session().await;
    let companies = Controller::<Companies>::new(session.clone());
    let deals = Controller::<Deals>::new(session.clone());
    let tasks = Controller::<Tasks>::new(session.clone());

    let acme = create(&companies, |d| d.name = "Acme".to_string()).await;
    create(&deals, |d| {
        d.title = "Anvils".to_string();
        d.company_id = acme.clone();
    })
    .await;

    let references = deals.view().references;
    assert_eq!(references.companies.len(), 1);
    assert!(references.deals.is_empty());

    tasks.load().await.unwrap();
    let references = tasks.view().references;
    assert_eq!(references.deals.len(), 1);
    assert_eq!(references.deals_for(&acme).count(), 1);
    assert_eq!(references.deals_for("other").count(), 0);
}

#[tokio::test]
async fn test_stale_load_is_discarded() {
    let (_dir, inner) = local_gateway();
    let gated = Arc::new(GatedGateway::new(inner));
    let session = signed_in(gated.clone(), ValidationMode::Lenient).await;
    let companies = Controller::<Companies>::new(session);

    create(&companies, |d| d.name = "First".to_string()).await;
    gated
        .insert("companies", json!({"name": "Second"}))
        .await
        .unwrap();

    gated.arm();
    let (outcome, ()) = tokio::join!(companies.load(), async {
        gated.entered.notified().await;
        companies.deactivate();
        gated.release.notify_one();
    });

    assert_eq!(outcome.unwrap(), LoadOutcome::Discarded);
    assert_eq!(companies.records().len(), 1);
    assert!(!companies.view().is_loading);

    assert_eq!(companies.load().await.unwrap(), LoadOutcome::Applied);
    assert_eq!(companies.records().len(), 2);
}

#[tokio::test]
async fn test_older_overlapping_load_is_discarded() {
    let (_dir, inner) = local_gateway();
    let gated = Arc::new(GatedGateway::new(inner));
    let session = signed_in(gated.clone(), ValidationMode::Lenient).await;
    let companies = Controller::<Companies>::new(session);
    gated
        .insert("companies", json!({"name": "Acme"}))
        .await
        .unwrap();

    gated.arm();
    let (older, newer) = tokio::join!(companies.load(), async {
        gated.entered.notified().await;
        let outcome = companies.load().await;
        gated.release.notify_one();
        outcome
    });

    assert_eq!(older.unwrap(), LoadOutcome::Discarded);
    assert_eq!(newer.unwrap(), LoadOutcome::Applied);
    assert_eq!(companies.records().len(), 1);
    assert!(!companies.view().is_loading);
}

#[tokio::test]
async fn test_delete_across_reset_skips_reload() {
    let (_dir, inner) = local_gateway();
    let gated = Arc::new(GatedGateway::new(inner));
    let session = signed_in(gated.clone(), ValidationMode::Lenient).await;
    let companies = Controller::<Companies>::new(session);
    let acme = create(&companies, |d| d.name = "Acme".to_string()).await;
    create(&companies, |d| d.name = "Globex".to_string()).await;

    gated.arm();
    let (deleted, ()) = tokio::join!(companies.delete(&acme, |_| true), async {
        gated.entered.notified().await;
        companies.reset();
        gated.release.notify_one();
    });

    assert_eq!(deleted.unwrap(), DeleteOutcome::Deleted);
    assert!(companies.records().is_empty());
    assert_eq!(companies.load().await.unwrap(), LoadOutcome::Applied);
    assert_eq!(companies.records().len(), 1);
}

#[tokio::test]
async fn test_second_submit_while_in_flight_is_busy() {
    let (_dir, inner) = local_gateway();
    let gated = Arc::new(GatedGateway::new(inner));
    let session = signed_in(gated.clone(), ValidationMode::Lenient).await;
    let companies = Controller::<Companies>::new(session);

    companies.open_for_create();
    companies.edit_draft(|d| d.name = "Acme".to_string()).unwrap();

    gated.arm();
    let (first, ()) = tokio::join!(companies.submit(), async {
        gated.entered.notified().await;
        assert!(companies.view().is_submitting);
        assert!(matches!(companies.submit().await, Err(ControllerError::Busy)));
        gated.release.notify_one();
    });

    assert!(matches!(first.unwrap(), SubmitOutcome::Created { .. }));
    assert_eq!(companies.records().len(), 1);
}

#[tokio::test]
async fn test_failures_leave_state_untouched() {
    let (_dir, inner) = local_gateway();
    let flaky = Arc::new(FlakyGateway::new(inner));
    let session = signed_in(flaky.clone(), ValidationMode::Lenient).await;
    let companies = Controller::<Companies>::new(session);
    let acme = create(&companies, |d| d.name = "Acme".to_string()).await;

    flaky.fail_reads.store(true, Ordering::SeqCst);
    let err = companies.load().await.unwrap_err();
    assert!(matches!(
        err,
        ControllerError::Gateway(GatewayError::Backend { status: 503, .. })
    ));
    assert_eq!(companies.records().len(), 1);
    assert!(!companies.view().is_loading);
    flaky.fail_reads.store(false, Ordering::SeqCst);

    flaky.fail_writes.store(true, Ordering::SeqCst);
    companies.open_for_create();
    companies.edit_draft(|d| d.name = "Beta".to_string()).unwrap();
    assert!(companies.submit().await.is_err());
    let view = companies.view();
    assert!(view.form.is_open);
    assert!(!view.is_submitting);
    assert_eq!(view.form.draft.name, "Beta");
    assert_eq!(view.total, 1);

    assert!(companies.delete(&acme, |_| true).await.is_err());
    assert_eq!(companies.records().len(), 1);

    flaky.fail_writes.store(false, Ordering::SeqCst);
    assert!(matches!(
        companies.submit().await.unwrap(),
        SubmitOutcome::Created { .. }
    ));
    assert_eq!(companies.records().len(), 2);
}

#[tokio::test]
async fn test_update_of_vanished_row_keeps_form_open() {
    let (_dir, gateway) = local_gateway();
    let gateway = Arc::new(gateway);
    let session = signed_in(gateway.clone(), ValidationMode::Lenient).await;
    let companies = Controller::<Companies>::new(session);
    let id = create(&companies, |d| d.name = "Acme".to_string()).await;

    companies.open_for_edit(&id).unwrap();
    gateway.delete("companies", &id).await.unwrap();

    let err = companies.submit().await.unwrap_err();
    assert!(matches!(
        err,
        ControllerError::Gateway(GatewayError::NotFound { .. })
    ));
    assert!(companies.view().form.is_open);
}
