//! Integration tests for the scan request approval workflow.
//!
//! Exercises the repository layer against a real database:
//! - Pending listing joined with the owner's email and plan
//! - Approve / reject transitions and their terminal nature
//! - Transactional approval writing request status and findings together
//! - Scan result array ordering
//! - Plan-limited creation

use assert_matches::assert_matches;
use guardian_db::models::quota::QuotaInsert;
use guardian_db::models::scan_request::CreateScanRequest;
use guardian_db::models::scan_result::CreateScanResult;
use guardian_db::models::user::CreateUser;
use guardian_db::repositories::{ScanRequestRepo, ScanResultRepo, UserRepo};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_user(email: &str, plan: &str) -> CreateUser {
    CreateUser {
        email: email.to_string(),
        first_name: "Test".to_string(),
        last_name: "User".to_string(),
        avatar: None,
        plan: plan.to_string(),
    }
}

fn new_request(user_id: i64, platform: &str) -> CreateScanRequest {
    CreateScanRequest {
        user_id,
        url: format!("https://example.com/{platform}/original"),
        content_type: "Video".to_string(),
        description: Some("My channel intro".to_string()),
        platforms: vec![platform.to_string()],
        purposes: vec!["Monitoring".to_string()],
        priority: "High".to_string(),
    }
}

fn findings(scan_request_id: i64, result: &str) -> CreateScanResult {
    CreateScanResult {
        scan_request_id,
        result: result.to_string(),
        score: Some("85/100".to_string()),
        detection_type: Some("Exact copy".to_string()),
        platform: Some("YouTube".to_string()),
        source_url: Some("https://youtube.com/watch?v=copy".to_string()),
        multiple_sources: vec![],
        image_urls: vec![],
    }
}

async fn result_count(pool: &PgPool, scan_request_id: i64) -> i64 {
    let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM scan_results WHERE scan_request_id = $1")
        .bind(scan_request_id)
        .fetch_one(pool)
        .await
        .unwrap();
    row.0
}

// ---------------------------------------------------------------------------
// Listing
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_new_request_defaults_to_pending(pool: PgPool) {
    let user = UserRepo::create(&pool, &new_user("a@x.com", "Free")).await.unwrap();
    let req = ScanRequestRepo::create(&pool, &new_request(user.id, "YouTube"))
        .await
        .unwrap();

    assert_eq!(req.status, "pending");
    assert_eq!(req.notes, None);
    assert_eq!(req.platforms, vec!["YouTube"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_pending_joins_owner_email_and_plan(pool: PgPool) {
    let alice = UserRepo::create(&pool, &new_user("alice@x.com", "Pro")).await.unwrap();
    let bob = UserRepo::create(&pool, &new_user("bob@x.com", "Enterprise")).await.unwrap();

    let a = ScanRequestRepo::create(&pool, &new_request(alice.id, "YouTube")).await.unwrap();
    let b = ScanRequestRepo::create(&pool, &new_request(bob.id, "TikTok")).await.unwrap();

    let pending = ScanRequestRepo::list_pending(&pool).await.unwrap();
    assert_eq!(pending.len(), 2);

    assert_eq!(pending[0].id, a.id);
    assert_eq!(pending[0].user_email, "alice@x.com");
    assert_eq!(pending[0].plan, "Pro");

    assert_eq!(pending[1].id, b.id);
    assert_eq!(pending[1].user_email, "bob@x.com");
    assert_eq!(pending[1].plan, "Enterprise");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_pending_excludes_decided_requests(pool: PgPool) {
    let user = UserRepo::create(&pool, &new_user("a@x.com", "Free")).await.unwrap();
    let approved = ScanRequestRepo::create(&pool, &new_request(user.id, "YouTube")).await.unwrap();
    let rejected = ScanRequestRepo::create(&pool, &new_request(user.id, "Instagram")).await.unwrap();
    let open = ScanRequestRepo::create(&pool, &new_request(user.id, "Reddit")).await.unwrap();

    ScanRequestRepo::update_status(&pool, approved.id, "approved", None).await.unwrap();
    ScanRequestRepo::update_status(&pool, rejected.id, "rejected", None).await.unwrap();

    let pending = ScanRequestRepo::list_pending(&pool).await.unwrap();
    let ids: Vec<i64> = pending.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![open.id]);
}

// ---------------------------------------------------------------------------
// Transitions
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_status_sets_notes_for_target_only(pool: PgPool) {
    let user = UserRepo::create(&pool, &new_user("a@x.com", "Free")).await.unwrap();
    let target = ScanRequestRepo::create(&pool, &new_request(user.id, "YouTube")).await.unwrap();
    let other = ScanRequestRepo::create(&pool, &new_request(user.id, "TikTok")).await.unwrap();

    let updated = ScanRequestRepo::update_status(&pool, target.id, "approved", Some("verified"))
        .await
        .unwrap()
        .expect("pending request should be updated");
    assert_eq!(updated.status, "approved");
    assert_eq!(updated.notes.as_deref(), Some("verified"));
    assert!(
        updated.updated_at > target.updated_at,
        "set_updated_at trigger should refresh updated_at"
    );

    let untouched = ScanRequestRepo::find_by_id(&pool, other.id).await.unwrap().unwrap();
    assert_eq!(untouched.status, "pending");
    assert_eq!(untouched.notes, None);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_decided_request_cannot_transition_again(pool: PgPool) {
    let user = UserRepo::create(&pool, &new_user("a@x.com", "Free")).await.unwrap();
    let req = ScanRequestRepo::create(&pool, &new_request(user.id, "YouTube")).await.unwrap();

    ScanRequestRepo::update_status(&pool, req.id, "rejected", Some("not ours"))
        .await
        .unwrap()
        .unwrap();

    let second = ScanRequestRepo::update_status(&pool, req.id, "approved", None)
        .await
        .unwrap();
    assert!(second.is_none(), "rejected is terminal");

    let back = ScanRequestRepo::update_status(&pool, req.id, "pending", None)
        .await
        .unwrap();
    assert!(back.is_none(), "no transition back to pending");

    let row = ScanRequestRepo::find_by_id(&pool, req.id).await.unwrap().unwrap();
    assert_eq!(row.status, "rejected");
    assert_eq!(row.notes.as_deref(), Some("not ours"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_status_unknown_id_returns_none(pool: PgPool) {
    let result = ScanRequestRepo::update_status(&pool, 999_999, "approved", None)
        .await
        .unwrap();
    assert!(result.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_reject_never_inserts_result(pool: PgPool) {
    let user = UserRepo::create(&pool, &new_user("a@x.com", "Free")).await.unwrap();
    let req = ScanRequestRepo::create(&pool, &new_request(user.id, "YouTube")).await.unwrap();

    ScanRequestRepo::update_status(&pool, req.id, "rejected", None).await.unwrap();

    assert_eq!(result_count(&pool, req.id).await, 0);
}

// ---------------------------------------------------------------------------
// Transactional approval
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_approve_with_result_writes_both(pool: PgPool) {
    let user = UserRepo::create(&pool, &new_user("a@x.com", "Pro")).await.unwrap();
    let req = ScanRequestRepo::create(&pool, &new_request(user.id, "YouTube")).await.unwrap();

    let approval = ScanRequestRepo::approve_with_result(
        &pool,
        req.id,
        Some("confirmed"),
        &findings(req.id, "match found"),
    )
    .await
    .unwrap()
    .expect("pending request should be approved");

    assert_eq!(approval.request.status, "approved");
    assert_eq!(approval.request.notes.as_deref(), Some("confirmed"));
    assert_eq!(approval.result.scan_request_id, req.id);
    assert_eq!(approval.result.result, "match found");
    assert_eq!(approval.result.score.as_deref(), Some("85/100"));

    assert_eq!(result_count(&pool, req.id).await, 1);
    assert!(ScanRequestRepo::list_pending(&pool).await.unwrap().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_approve_uses_path_id_over_payload_id(pool: PgPool) {
    let user = UserRepo::create(&pool, &new_user("a@x.com", "Pro")).await.unwrap();
    let req = ScanRequestRepo::create(&pool, &new_request(user.id, "YouTube")).await.unwrap();

    let approval = ScanRequestRepo::approve_with_result(&pool, req.id, None, &findings(0, "hit"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(approval.result.scan_request_id, req.id);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_approve_decided_request_writes_nothing(pool: PgPool) {
    let user = UserRepo::create(&pool, &new_user("a@x.com", "Pro")).await.unwrap();
    let req = ScanRequestRepo::create(&pool, &new_request(user.id, "YouTube")).await.unwrap();
    ScanRequestRepo::update_status(&pool, req.id, "rejected", None).await.unwrap();

    let outcome =
        ScanRequestRepo::approve_with_result(&pool, req.id, None, &findings(req.id, "late"))
            .await
            .unwrap();

    assert!(outcome.is_none());
    assert_eq!(result_count(&pool, req.id).await, 0);
    let row = ScanRequestRepo::find_by_id(&pool, req.id).await.unwrap().unwrap();
    assert_eq!(row.status, "rejected");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_failed_result_insert_rolls_back_approval(pool: PgPool) {
    let user = UserRepo::create(&pool, &new_user("a@x.com", "Pro")).await.unwrap();
    let req = ScanRequestRepo::create(&pool, &new_request(user.id, "YouTube")).await.unwrap();

    // PostgreSQL rejects NUL bytes in TEXT, so the insert fails after the
    // status update has already run inside the transaction.
    let outcome = ScanRequestRepo::approve_with_result(
        &pool,
        req.id,
        Some("confirmed"),
        &findings(req.id, "match\0found"),
    )
    .await;
    assert!(outcome.is_err(), "insert with a NUL byte should fail");

    let row = ScanRequestRepo::find_by_id(&pool, req.id).await.unwrap().unwrap();
    assert_eq!(row.status, "pending");
    assert_eq!(row.notes, None);
    assert_eq!(result_count(&pool, req.id).await, 0);
}

// ---------------------------------------------------------------------------
// Scan results
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_submit_result_preserves_array_order(pool: PgPool) {
    let user = UserRepo::create(&pool, &new_user("a@x.com", "Pro")).await.unwrap();
    let req = ScanRequestRepo::create(&pool, &new_request(user.id, "YouTube")).await.unwrap();

    let sources = vec![
        "https://yt/3".to_string(),
        "https://yt/1".to_string(),
        "https://yt/2".to_string(),
    ];
    let images = vec!["https://img/3.png".to_string(), "https://img/1.png".to_string()];

    let mut input = findings(req.id, "three copies");
    input.multiple_sources = sources.clone();
    input.image_urls = images.clone();

    let created = ScanResultRepo::create(&pool, &input).await.unwrap();
    assert_eq!(created.multiple_sources, sources);
    assert_eq!(created.image_urls, images);

    let listed = ScanResultRepo::list_for_request(&pool, req.id).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].multiple_sources.len(), 3);
    assert_eq!(listed[0].image_urls.len(), 2);
    assert_eq!(listed[0].multiple_sources, sources);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_submit_result_accepts_empty_fields(pool: PgPool) {
    let user = UserRepo::create(&pool, &new_user("a@x.com", "Pro")).await.unwrap();
    let req = ScanRequestRepo::create(&pool, &new_request(user.id, "YouTube")).await.unwrap();

    let input = CreateScanResult {
        scan_request_id: req.id,
        result: String::new(),
        score: None,
        detection_type: None,
        platform: None,
        source_url: None,
        multiple_sources: vec![],
        image_urls: vec![],
    };
    let created = ScanResultRepo::create(&pool, &input).await.unwrap();
    assert_eq!(created.result, "");
    assert!(created.multiple_sources.is_empty());
    assert!(created.image_urls.is_empty());

    // Submitting findings alone does not decide the request.
    let row = ScanRequestRepo::find_by_id(&pool, req.id).await.unwrap().unwrap();
    assert_eq!(row.status, "pending");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_result_for_unknown_request_is_fk_violation(pool: PgPool) {
    let err = ScanResultRepo::create(&pool, &findings(424_242, "orphan"))
        .await
        .unwrap_err();
    let db_err = err.as_database_error().expect("database error");
    assert_eq!(db_err.code().as_deref(), Some("23503"));
}

// ---------------------------------------------------------------------------
// Plan-limited creation
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_within_plan_stops_at_limit(pool: PgPool) {
    let user = UserRepo::create(&pool, &new_user("cap@example.com", "Free")).await.unwrap();

    for _ in 0..5 {
        let outcome = ScanRequestRepo::create_within_plan(&pool, &new_request(user.id, "YouTube"))
            .await
            .unwrap();
        assert_matches!(outcome, QuotaInsert::Created(req) if req.user_id == user.id);
    }

    let outcome = ScanRequestRepo::create_within_plan(&pool, &new_request(user.id, "YouTube"))
        .await
        .unwrap();
    assert_matches!(outcome, QuotaInsert::LimitReached { used: 5, limit: 5 });
    assert_eq!(ScanRequestRepo::count_for_user(&pool, user.id).await.unwrap(), 5);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_within_plan_unlimited_and_unknown_owner(pool: PgPool) {
    let user = UserRepo::create(&pool, &new_user("ent@example.com", "Enterprise"))
        .await
        .unwrap();
    for _ in 0..60 {
        let outcome = ScanRequestRepo::create_within_plan(&pool, &new_request(user.id, "TikTok"))
            .await
            .unwrap();
        assert_matches!(outcome, QuotaInsert::Created(_));
    }

    let outcome = ScanRequestRepo::create_within_plan(&pool, &new_request(999_999, "TikTok"))
        .await
        .unwrap();
    assert_matches!(outcome, QuotaInsert::OwnerNotFound);
}
