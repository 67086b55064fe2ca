//! 积分累积端到端测试

use std::sync::Arc;

use chrono::{Duration, Utc};
use criteria_engine::AchievementDefinition;
use gamification::lock::AccountLockManager;
use gamification::service::{AccrualService, CompletionEvent};
use gamification::store::GamificationStore;
use gamification::{Account, MemoryStore, Tier};

fn definition(json: &str) -> AchievementDefinition {
    serde_json::from_str(json).unwrap()
}

fn setup() -> (Arc<MemoryStore>, AccrualService<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let locks = Arc::new(AccountLockManager::with_defaults());
    let service = AccrualService::new(store.clone(), locks);
    (store, service)
}

#[tokio::test]
async fn test_first_completion_of_new_account() {
    let (store, service) = setup();
    store.seed_account(Account::new("user-1"));

    let mut event = CompletionEvent::new("user-1", 80);
    event.is_first_time_completion = true;

    let outcome = service.record_completion(&event).await.unwrap();

    // 10 基础 + 3 首次，首次活动连续计数为 1，无连续加成
    assert_eq!(outcome.points_earned, 13);
    assert_eq!(outcome.new_total_points, 13);
    assert_eq!(outcome.new_tier, Tier::Bronze);
    assert_eq!(outcome.streak_count, 1);
}

#[tokio::test]
async fn test_full_bonus_stack_worth_twenty_eight_points() {
    let (store, service) = setup();
    let mut account = Account::new("user-1");
    account.streak_count = 2;
    account.last_activity_date = Some(Utc::now() - Duration::hours(25));
    store.seed_account(account);

    let mut event = CompletionEvent::new("user-1", 100);
    event.is_first_time_completion = true;
    event.is_new_category = true;

    let outcome = service.record_completion(&event).await.unwrap();

    // 10 基础 + 5 满分 + 3 首次 + 5 新类别 + 5 短连续（计数推进到 3）
    assert_eq!(outcome.points_earned, 28);
    assert_eq!(outcome.streak_count, 3);
}

#[tokio::test]
async fn test_streak_progression_and_reset() {
    let (store, service) = setup();
    store.seed_account(Account::new("user-1"));

    let start = Utc::now() - Duration::days(30);
    let mut streaks = Vec::new();

    // 间隔 [首次, 同日, 次日, 次日, 隔两日]
    for offset_hours in [0i64, 12, 36, 60, 120] {
        let mut event = CompletionEvent::new("user-1", 70);
        event.occurred_at = start + Duration::hours(offset_hours);
        let outcome = service.record_completion(&event).await.unwrap();
        streaks.push(outcome.streak_count);
    }

    assert_eq!(streaks, vec![1, 1, 2, 3, 1]);
}

#[tokio::test]
async fn test_tier_promotion_from_accumulated_points() {
    let (store, service) = setup();
    let mut account = Account::new("user-1");
    account.credit(95);
    store.seed_account(account);

    let outcome = service
        .record_completion(&CompletionEvent::new("user-1", 50))
        .await
        .unwrap();

    assert_eq!(outcome.new_total_points, 105);
    assert_eq!(outcome.new_tier, Tier::Silver);
}

#[tokio::test]
async fn test_achievement_awarded_with_fixed_reward() {
    let (store, service) = setup();
    store.seed_account(Account::new("user-1"));
    store.seed_definition(definition(
        r#"{
            "id": "first-steps",
            "name": "First Steps",
            "thresholdScore": 100.0,
            "conditions": [
                { "field": "account.totalPoints", "operator": "gte", "value": 10.0 }
            ],
            "pointsReward": 20
        }"#,
    ));

    let outcome = service
        .record_completion(&CompletionEvent::new("user-1", 60))
        .await
        .unwrap();

    // 10 完成积分 + 20 成就奖励
    assert_eq!(outcome.newly_earned_achievement_ids, vec!["first-steps"]);
    assert_eq!(outcome.points_earned, 30);
    assert_eq!(outcome.new_total_points, 30);

    let account = store.load_account("user-1").await.unwrap().unwrap();
    assert!(account.has_achievement("first-steps"));
}

#[tokio::test]
async fn test_achievement_award_is_idempotent_across_events() {
    let (store, service) = setup();
    store.seed_account(Account::new("user-1"));
    store.seed_definition(definition(
        r#"{
            "id": "first-steps",
            "name": "First Steps",
            "thresholdScore": 100.0,
            "conditions": [
                { "field": "account.totalPoints", "operator": "gte", "value": 10.0 }
            ],
            "pointsReward": 20
        }"#,
    ));

    let first = service
        .record_completion(&CompletionEvent::new("user-1", 60))
        .await
        .unwrap();
    let second = service
        .record_completion(&CompletionEvent::new("user-1", 60))
        .await
        .unwrap();

    assert_eq!(first.newly_earned_achievement_ids.len(), 1);
    // 第二次事件不重复发放成就及其奖励
    assert!(second.newly_earned_achievement_ids.is_empty());
    assert_eq!(second.points_earned, 10);
}

#[tokio::test]
async fn test_multi_level_achievement_pays_matched_level() {
    let (store, service) = setup();
    let mut account = Account::new("user-1");
    account.progress = serde_json::json!({ "activitiesCompleted": 8 });
    store.seed_account(account);
    store.seed_definition(definition(
        r#"{
            "id": "explorer",
            "name": "Explorer",
            "thresholdScore": 50.0,
            "conditions": [
                { "field": "progress.activitiesCompleted", "operator": "gte", "value": 10.0 }
            ],
            "levels": [
                { "name": "bronze", "threshold": 50.0, "rewardPoints": 5 },
                { "name": "silver", "threshold": 80.0, "rewardPoints": 15 }
            ]
        }"#,
    ));

    let outcome = service
        .record_completion(&CompletionEvent::new("user-1", 60))
        .await
        .unwrap();

    // 8/10 的部分学分给出 80 分进度，命中 silver 档的 15 分奖励
    assert_eq!(outcome.newly_earned_achievement_ids, vec!["explorer"]);
    assert_eq!(outcome.points_earned, 10 + 15);
}

#[tokio::test]
async fn test_inactive_definitions_are_skipped() {
    let (store, service) = setup();
    store.seed_account(Account::new("user-1"));
    store.seed_definition(definition(
        r#"{
            "id": "retired",
            "name": "Retired",
            "thresholdScore": 0.0,
            "conditions": [],
            "pointsReward": 999,
            "isActive": false
        }"#,
    ));

    let outcome = service
        .record_completion(&CompletionEvent::new("user-1", 60))
        .await
        .unwrap();

    assert!(outcome.newly_earned_achievement_ids.is_empty());
    assert_eq!(outcome.points_earned, 10);
}

#[tokio::test]
async fn test_prerequisite_gates_until_held() {
    let (store, service) = setup();
    store.seed_account(Account::new("user-1"));
    store.seed_definition(definition(
        r#"{
            "id": "advanced",
            "name": "Advanced",
            "thresholdScore": 0.0,
            "conditions": [],
            "prerequisites": ["basic"],
            "pointsReward": 50
        }"#,
    ));

    let outcome = service
        .record_completion(&CompletionEvent::new("user-1", 60))
        .await
        .unwrap();
    assert!(outcome.newly_earned_achievement_ids.is_empty());

    // 持有前置成就后解锁
    let mut account = store.load_account("user-1").await.unwrap().unwrap();
    account.award_achievement("basic");
    store.save_account(&account).await.unwrap();

    let outcome = service
        .record_completion(&CompletionEvent::new("user-1", 60))
        .await
        .unwrap();
    assert_eq!(outcome.newly_earned_achievement_ids, vec!["advanced"]);
}

#[tokio::test]
async fn test_awards_use_snapshot_taken_before_the_pass() {
    let (store, service) = setup();
    store.seed_account(Account::new("user-1"));
    // beta 的条件依赖 alpha 的奖励积分才能满足；同一轮内
    // 评估基于通过前快照，beta 要到下一个事件才解锁
    store.seed_definition(definition(
        r#"{
            "id": "a-alpha",
            "name": "Alpha",
            "thresholdScore": 100.0,
            "conditions": [
                { "field": "account.totalPoints", "operator": "gte", "value": 10.0 }
            ],
            "pointsReward": 100
        }"#,
    ));
    store.seed_definition(definition(
        r#"{
            "id": "b-beta",
            "name": "Beta",
            "thresholdScore": 100.0,
            "conditions": [
                { "field": "account.totalPoints", "operator": "gte", "value": 50.0 }
            ],
            "pointsReward": 5
        }"#,
    ));

    let first = service
        .record_completion(&CompletionEvent::new("user-1", 60))
        .await
        .unwrap();
    assert_eq!(first.newly_earned_achievement_ids, vec!["a-alpha"]);

    let second = service
        .record_completion(&CompletionEvent::new("user-1", 60))
        .await
        .unwrap();
    assert_eq!(second.newly_earned_achievement_ids, vec!["b-beta"]);
}
