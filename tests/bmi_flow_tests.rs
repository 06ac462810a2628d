// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! BMI screen flows against the in-memory store.

use fittrack::bmi::BmiCategory;
use fittrack::db::{collections, CollectionPath, StoreOp};
use fittrack::error::AppError;
use fittrack::models::Gender;

mod common;
use common::TestApp;

fn records_path() -> String {
    CollectionPath::root(collections::BMI_RECORDS).to_string()
}

#[tokio::test]
async fn test_signed_out_calculation_never_touches_store() {
    let app = TestApp::new();
    let mut screen = app.ctx.bmi_screen();

    screen.set_weight("70");
    screen.set_age("30");
    let result = screen.calculate().await.unwrap();

    assert_eq!(result.bmi, 24.2);
    assert_eq!(result.category, BmiCategory::Normal);
    assert!(screen.history().is_empty());
    assert!(app.store.ops().await.is_empty());
}

#[tokio::test]
async fn test_signed_in_calculation_saves_then_reloads() {
    let app = TestApp::new();
    let uid = app.sign_in("jane@example.com");
    let mut screen = app.ctx.bmi_screen();

    screen.set_gender(Some(Gender::Female));
    screen.set_height(165.0);
    screen.set_weight("58.5");
    screen.set_age("28");
    let result = screen.calculate().await.unwrap();

    assert_eq!(
        app.store.ops().await,
        vec![StoreOp::Create(records_path()), StoreOp::Read(records_path())]
    );

    let history = screen.history();
    assert_eq!(history.len(), 1);
    let record = &history[0];
    assert!(record.id.is_some());
    assert_eq!(record.user_id.as_deref(), Some(uid.as_str()));
    assert_eq!(record.gender, Some(Gender::Female));
    assert_eq!(record.height, 165.0);
    assert_eq!(record.weight, 58.5);
    assert_eq!(record.age, 28);
    assert_eq!(record.bmi, result.bmi);
    assert!(record.date.ends_with('Z'));
}

#[tokio::test]
async fn test_history_is_scoped_to_user_and_newest_first() {
    let app = TestApp::new();
    app.sign_in("other@example.com");
    let mut other = app.ctx.bmi_screen();
    other.set_weight("90");
    other.set_age("40");
    other.calculate().await.unwrap();

    app.sign_in("jane@example.com");
    let mut screen = app.ctx.bmi_screen();
    screen.set_age("30");
    screen.set_weight("60");
    screen.calculate().await.unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    screen.set_weight("62");
    screen.calculate().await.unwrap();

    let history = screen.load_history().await.unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].weight, 62.0);
    assert_eq!(history[1].weight, 60.0);
    assert!(history[0].date >= history[1].date);
}

#[tokio::test]
async fn test_invalid_input_aborts_without_store_calls() {
    let app = TestApp::new();
    app.sign_in("jane@example.com");
    let mut screen = app.ctx.bmi_screen();

    screen.set_weight("15");
    screen.set_age("30");
    let err = screen.calculate().await.unwrap_err();

    assert!(matches!(err, AppError::Validation(_)));
    assert_eq!(
        screen.alert(),
        Some("Please enter a valid weight between 20 and 200 kg.")
    );
    assert!(screen.result().is_none());
    assert!(app.store.ops().await.is_empty());

    screen.dismiss_alert();
    screen.set_weight("70");
    screen.set_age("101");
    screen.calculate().await.unwrap_err();
    assert_eq!(screen.alert(), Some("Please enter a valid age between 10 and 100."));
    assert!(app.store.ops().await.is_empty());
}

#[tokio::test]
async fn test_delete_then_reload() {
    let app = TestApp::new();
    app.sign_in("jane@example.com");
    let mut screen = app.ctx.bmi_screen();

    screen.set_weight("80");
    screen.set_age("35");
    screen.calculate().await.unwrap();
    let id = screen.history()[0].id.clone().unwrap();
    app.store.clear_ops().await;

    screen.delete_record(&id).await.unwrap();

    assert_eq!(
        app.store.ops().await,
        vec![
            StoreOp::Delete(records_path(), id),
            StoreOp::Read(records_path())
        ]
    );
    assert!(screen.history().is_empty());
}

#[tokio::test]
async fn test_delete_requires_sign_in() {
    let app = TestApp::new();
    let mut screen = app.ctx.bmi_screen();
    let err = screen.delete_record("doc-000001").await.unwrap_err();
    assert!(matches!(err, AppError::Unauthorized));
    assert!(app.store.ops().await.is_empty());
}

#[tokio::test]
async fn test_store_failure_keeps_result_and_raises_alert() {
    let app = TestApp::new();
    app.sign_in("jane@example.com");
    app.store.set_offline(true).await;
    let mut screen = app.ctx.bmi_screen();

    screen.set_weight("70");
    screen.set_age("30");
    let err = screen.calculate().await.unwrap_err();

    assert!(matches!(err, AppError::Database(_)));
    assert_eq!(screen.result().map(|r| r.bmi), Some(24.2));
    assert_eq!(screen.alert(), Some(fittrack::error::GENERIC_ERROR_MESSAGE));
}

#[tokio::test]
async fn test_recalculate_clears_result_only() {
    let app = TestApp::new();
    app.sign_in("jane@example.com");
    let mut screen = app.ctx.bmi_screen();

    screen.set_weight("70");
    screen.set_age("30");
    screen.calculate().await.unwrap();
    app.store.clear_ops().await;

    screen.recalculate();
    assert!(screen.result().is_none());
    assert_eq!(screen.history().len(), 1);
    assert_eq!(screen.weight(), "70");
    assert!(app.store.ops().await.is_empty());
}

#[tokio::test]
async fn test_sanitized_inputs_and_height_clamp() {
    let app = TestApp::new();
    let mut screen = app.ctx.bmi_screen();

    screen.set_weight("7a0.5.2");
    screen.set_age("3x0");
    screen.set_height(500.0);

    assert_eq!(screen.weight(), "70.52");
    assert_eq!(screen.age(), "30");
    assert_eq!(screen.height(), 220.0);
}
