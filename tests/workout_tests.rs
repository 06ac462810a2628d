// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Workout seeding and persistence.

use fittrack::db::{collections, CollectionPath, StoreOp};
use fittrack::error::AppError;
use fittrack::db::DocumentStore;
use fittrack::services::workouts::{default_workouts, resolve_image, WorkoutForm};

mod common;
use common::TestApp;

#[tokio::test]
async fn test_signed_out_gets_catalog_without_persisting() {
    let app = TestApp::new();

    let workouts = app.ctx.workouts().load().await.unwrap();

    assert_eq!(workouts, default_workouts());
    assert!(app.store.ops().await.is_empty());
}

#[tokio::test]
async fn test_first_load_seeds_exactly_once() {
    let app = TestApp::new();
    let uid = app.sign_in("jane@example.com");
    let path = CollectionPath::user_scoped(&uid, collections::WORKOUTS);
    let service = app.ctx.workouts();

    let first = service.load().await.unwrap();
    assert_eq!(first.len(), 6);
    assert_eq!(app.store.len(&path).await, 6);

    // Catalog order, one write per workout
    let seeded: Vec<String> = app
        .store
        .ops()
        .await
        .into_iter()
        .filter_map(|op| match op {
            StoreOp::Set(_, id) => Some(id),
            _ => None,
        })
        .collect();
    assert_eq!(
        seeded,
        ["default-1", "default-2", "default-3", "default-4", "default-5", "default-6"]
    );

    app.store.clear_ops().await;
    let mut second = service.load().await.unwrap();
    second.sort_by(|a, b| a.id.cmp(&b.id));
    assert_eq!(second, first);
    assert_eq!(app.store.ops().await, vec![StoreOp::Read(path.to_string())]);
}

#[tokio::test]
async fn test_concurrent_first_loads_do_not_duplicate() {
    let app = TestApp::new();
    let uid = app.sign_in("jane@example.com");
    let path = CollectionPath::user_scoped(&uid, collections::WORKOUTS);
    let a = app.ctx.workouts();
    let b = app.ctx.workouts();

    let (first, second) = tokio::join!(a.load(), b.load());
    first.unwrap();
    second.unwrap();

    assert_eq!(app.store.len(&path).await, 6);
}

#[tokio::test]
async fn test_save_edit_and_delete() {
    let app = TestApp::new();
    let uid = app.sign_in("jane@example.com");
    let path = CollectionPath::user_scoped(&uid, collections::WORKOUTS);
    let service = app.ctx.workouts();
    service.load().await.unwrap();

    let form = WorkoutForm {
        title: "Morning Run".to_string(),
        routine_text: "Warm-up\nIntervals\nCool-down".to_string(),
        ..WorkoutForm::default()
    };
    let workout = form.to_workout().unwrap();
    service.save(&workout).await.unwrap();
    assert_eq!(app.store.len(&path).await, 7);

    let mut edit = WorkoutForm::edit(&workout);
    edit.duration = "50 min".to_string();
    service.save(&edit.to_workout().unwrap()).await.unwrap();

    let stored = service
        .load()
        .await
        .unwrap()
        .into_iter()
        .find(|w| w.id == workout.id)
        .unwrap();
    assert_eq!(stored.duration, "50 min");
    assert_eq!(stored.routine, vec!["Warm-up", "Intervals", "Cool-down"]);

    service.delete(&workout.id).await.unwrap();
    assert_eq!(app.store.len(&path).await, 6);
}

#[tokio::test]
async fn test_removing_photo_clears_stored_image() {
    let app = TestApp::new();
    let uid = app.sign_in("jane@example.com");
    let path = CollectionPath::user_scoped(&uid, collections::WORKOUTS);
    let service = app.ctx.workouts();
    service.load().await.unwrap();

    let form = WorkoutForm {
        title: "Evening Ride".to_string(),
        image: Some("https://example.com/ride.png".to_string()),
        image_base64: Some("/9j/".to_string()),
        ..WorkoutForm::default()
    };
    let workout = form.to_workout().unwrap();
    service.save(&workout).await.unwrap();

    let mut edit = WorkoutForm::edit(&workout);
    edit.image_base64 = None;
    service.save(&edit.to_workout().unwrap()).await.unwrap();

    let stored = service
        .load()
        .await
        .unwrap()
        .into_iter()
        .find(|w| w.id == workout.id)
        .unwrap();
    assert_eq!(stored.image_base64, None);
    assert_eq!(
        resolve_image(&stored),
        Some(fittrack::services::workouts::ImageSource::Remote(
            "https://example.com/ride.png".to_string()
        ))
    );

    let raw = app.store.get_record(&path, &workout.id).await.unwrap().unwrap();
    assert!(raw.data["imageBase64"].is_null());
}

#[tokio::test]
async fn test_mutations_require_sign_in() {
    let app = TestApp::new();
    let service = app.ctx.workouts();

    let workout = default_workouts().remove(0);
    assert!(matches!(
        service.save(&workout).await,
        Err(AppError::Unauthorized)
    ));
    assert!(matches!(
        service.delete(&workout.id).await,
        Err(AppError::Unauthorized)
    ));
    assert!(app.store.ops().await.is_empty());
}
