#![forbid(unsafe_code)]

use sg_core::model::{EffectiveStatus, GoalStatus};
use sg_storage::{CreateGoalRequest, GoalFilter, SqliteStore, StoreError, UpdateGoalRequest};
use std::collections::BTreeSet;
use std::path::PathBuf;
use time::OffsetDateTime;

fn temp_dir(test_name: &str) -> PathBuf {
    let base = std::env::temp_dir();
    let pid = std::process::id();
    let nonce = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis();
    let dir = base.join(format!("sg_storage_{test_name}_{pid}_{nonce}"));
    std::fs::create_dir_all(&dir).expect("create temp dir");
    dir
}

fn goal_request(title: &str, goal_type: &str, time_bound: &str) -> CreateGoalRequest {
    CreateGoalRequest {
        title: title.to_string(),
        goal_type: goal_type.to_string(),
        specific: "specific".to_string(),
        measurable: "measurable".to_string(),
        achievable: "achievable".to_string(),
        relevant: "relevant".to_string(),
        time_bound: time_bound.to_string(),
    }
}

#[test]
fn create_and_get_round_trip() {
    let storage_dir = temp_dir("create_and_get_round_trip");
    let mut store = SqliteStore::open(&storage_dir).expect("open store");

    let created = store
        .create_goal(goal_request("Learn Rust", "education", "2030-06-15"))
        .expect("create goal");
    assert_eq!(created.id, 1);
    assert_eq!(created.title, "Learn Rust");
    assert_eq!(created.goal_type, "education");
    assert_eq!(created.status, GoalStatus::Active);
    assert_eq!(created.progress, 0);
    assert!(!created.created_at.is_empty(), "created_at should be set");

    let fetched = store.get_goal(created.id).expect("get goal");
    assert_eq!(fetched, created);
}

#[test]
fn create_rejects_blank_fields() {
    let storage_dir = temp_dir("create_rejects_blank_fields");
    let mut store = SqliteStore::open(&storage_dir).expect("open store");

    let err = store
        .create_goal(goal_request("   ", "education", "2030-06-15"))
        .expect_err("blank title should fail");
    match err {
        StoreError::Validation(msg) => assert_eq!(msg, "title must not be empty"),
        other => panic!("expected Validation error, got {other:?}"),
    }

    let err = store
        .create_goal(goal_request("Learn Rust", "", "2030-06-15"))
        .expect_err("blank type should fail");
    match err {
        StoreError::Validation(msg) => assert_eq!(msg, "type must not be empty"),
        other => panic!("expected Validation error, got {other:?}"),
    }

    let err = store
        .create_goal(goal_request("Learn Rust", "education", " "))
        .expect_err("blank deadline should fail");
    match err {
        StoreError::Validation(msg) => assert_eq!(msg, "timeBound must not be empty"),
        other => panic!("expected Validation error, got {other:?}"),
    }

    let err = store
        .create_goal(goal_request("Learn Rust", "education", "someday"))
        .expect_err("unreadable deadline should fail");
    match err {
        StoreError::Validation(msg) => {
            assert_eq!(msg, "timeBound must be an ISO date or date-time");
        }
        other => panic!("expected Validation error, got {other:?}"),
    }

    let listed = store.list_goals(GoalFilter::All).expect("list goals");
    assert!(listed.is_empty(), "no goal should have been created");
}

#[test]
fn update_replaces_descriptive_fields_only() {
    let storage_dir = temp_dir("update_replaces_descriptive_fields_only");
    let mut store = SqliteStore::open(&storage_dir).expect("open store");

    let created = store
        .create_goal(goal_request("Learn Rust", "education", "2030-06-15"))
        .expect("create goal");
    store
        .set_goal_status(created.id, GoalStatus::Completed)
        .expect("set status");
    store
        .set_goal_progress(created.id, 40)
        .expect("set progress");

    let updated = store
        .update_goal(
            created.id,
            UpdateGoalRequest {
                title: "Master Rust".to_string(),
                goal_type: "career".to_string(),
                specific: "new specific".to_string(),
                measurable: "new measurable".to_string(),
                achievable: "new achievable".to_string(),
                relevant: "new relevant".to_string(),
                time_bound: "2031-01-01".to_string(),
            },
        )
        .expect("update goal");

    assert_eq!(updated.id, created.id);
    assert_eq!(updated.title, "Master Rust");
    assert_eq!(updated.goal_type, "career");
    assert_eq!(updated.time_bound, "2031-01-01");
    assert_eq!(updated.status, GoalStatus::Completed);
    assert_eq!(updated.progress, 40);
    assert_eq!(updated.created_at, created.created_at);

    let fetched = store.get_goal(created.id).expect("get goal");
    assert_eq!(fetched, updated);
}

#[test]
fn update_unknown_goal_fails() {
    let storage_dir = temp_dir("update_unknown_goal_fails");
    let mut store = SqliteStore::open(&storage_dir).expect("open store");

    let err = store
        .update_goal(
            42,
            UpdateGoalRequest {
                title: "Ghost".to_string(),
                goal_type: "none".to_string(),
                specific: String::new(),
                measurable: String::new(),
                achievable: String::new(),
                relevant: String::new(),
                time_bound: "2030-01-01".to_string(),
            },
        )
        .expect_err("unknown goal should fail");
    match err {
        StoreError::GoalNotFound(id) => assert_eq!(id, 42),
        other => panic!("expected GoalNotFound, got {other:?}"),
    }
}

#[test]
fn list_filters_partition_goals() {
    let storage_dir = temp_dir("list_filters_partition_goals");
    let mut store = SqliteStore::open(&storage_dir).expect("open store");

    let first = store
        .create_goal(goal_request("First", "personal", "2030-01-01"))
        .expect("create first");
    // Past deadline: overdue at read time, but stored status stays active.
    let second = store
        .create_goal(goal_request("Second", "personal", "2020-01-01"))
        .expect("create second");
    let third = store
        .create_goal(goal_request("Third", "personal", "2030-01-01"))
        .expect("create third");
    store
        .set_goal_status(third.id, GoalStatus::Completed)
        .expect("complete third");

    let all = store.list_goals(GoalFilter::All).expect("list all");
    let active = store.list_goals(GoalFilter::Active).expect("list active");
    let completed = store
        .list_goals(GoalFilter::Completed)
        .expect("list completed");

    assert_eq!(
        all.iter().map(|goal| goal.id).collect::<Vec<_>>(),
        vec![first.id, second.id, third.id]
    );
    assert_eq!(
        active.iter().map(|goal| goal.id).collect::<Vec<_>>(),
        vec![first.id, second.id]
    );
    assert_eq!(
        completed.iter().map(|goal| goal.id).collect::<Vec<_>>(),
        vec![third.id]
    );

    let mut union = BTreeSet::new();
    union.extend(active.iter().map(|goal| goal.id));
    union.extend(completed.iter().map(|goal| goal.id));
    assert_eq!(
        union,
        all.iter().map(|goal| goal.id).collect::<BTreeSet<_>>(),
        "active and completed goals should partition the full list"
    );
}

#[test]
fn delete_unknown_goal_fails() {
    let storage_dir = temp_dir("delete_unknown_goal_fails");
    let mut store = SqliteStore::open(&storage_dir).expect("open store");

    let err = store.delete_goal(7).expect_err("unknown goal should fail");
    match err {
        StoreError::GoalNotFound(id) => assert_eq!(id, 7),
        other => panic!("expected GoalNotFound, got {other:?}"),
    }
}

#[test]
fn ids_are_not_reused_after_delete() {
    let storage_dir = temp_dir("ids_are_not_reused_after_delete");
    let mut store = SqliteStore::open(&storage_dir).expect("open store");

    let first = store
        .create_goal(goal_request("First", "personal", "2030-01-01"))
        .expect("create first");
    let second = store
        .create_goal(goal_request("Second", "personal", "2030-01-01"))
        .expect("create second");
    store.delete_goal(second.id).expect("delete second");

    let third = store
        .create_goal(goal_request("Third", "personal", "2030-01-01"))
        .expect("create third");
    assert!(
        third.id > second.id,
        "id {} of the new goal should never reuse deleted id {}",
        third.id,
        second.id
    );
    assert_eq!(first.id, 1);
    assert_eq!(third.id, 3);
}

#[test]
fn set_progress_clamps_to_100() {
    let storage_dir = temp_dir("set_progress_clamps_to_100");
    let mut store = SqliteStore::open(&storage_dir).expect("open store");

    let goal = store
        .create_goal(goal_request("Clamp", "personal", "2030-01-01"))
        .expect("create goal");
    store.set_goal_progress(goal.id, 150).expect("set progress");
    assert_eq!(store.get_goal(goal.id).expect("get goal").progress, 100);

    store.set_goal_progress(goal.id, 42).expect("set progress");
    assert_eq!(store.get_goal(goal.id).expect("get goal").progress, 42);

    let err = store
        .set_goal_progress(99, 10)
        .expect_err("unknown goal should fail");
    match err {
        StoreError::GoalNotFound(id) => assert_eq!(id, 99),
        other => panic!("expected GoalNotFound, got {other:?}"),
    }
}

#[test]
fn overdue_is_derived_not_stored() {
    let storage_dir = temp_dir("overdue_is_derived_not_stored");
    let mut store = SqliteStore::open(&storage_dir).expect("open store");

    let goal = store
        .create_goal(goal_request("Late", "personal", "2020-01-01"))
        .expect("create goal");

    let now = OffsetDateTime::now_utc();
    let fetched = store.get_goal(goal.id).expect("get goal");
    assert_eq!(fetched.status, GoalStatus::Active, "stored status");
    assert_eq!(fetched.effective_status(now), EffectiveStatus::Overdue);

    store
        .set_goal_status(goal.id, GoalStatus::Completed)
        .expect("complete goal");
    let fetched = store.get_goal(goal.id).expect("get goal");
    assert_eq!(fetched.effective_status(now), EffectiveStatus::Completed);
}
