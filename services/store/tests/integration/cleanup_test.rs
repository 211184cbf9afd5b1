use std::sync::atomic::Ordering;

use chrono::Utc;
use uuid::Uuid;

use frostline_store::domain::types::{DelayedTask, OrderStatus};
use frostline_store::usecase::cleanup::ProcessDueTasksUseCase;

use crate::helpers::{MockOrderRepo, MockTaskRepo, test_order};

fn usecase(
    tasks: &MockTaskRepo,
    orders: &MockOrderRepo,
) -> ProcessDueTasksUseCase<MockTaskRepo, MockOrderRepo> {
    ProcessDueTasksUseCase {
        tasks: tasks.clone(),
        orders: orders.clone(),
        retry_delay: chrono::Duration::seconds(60),
        max_attempts: 3,
    }
}

#[tokio::test]
async fn should_purge_due_order_and_complete_task() {
    let order = test_order(Uuid::now_v7(), OrderStatus::Success);
    let orders = MockOrderRepo::with(vec![order.clone()]);
    let tasks = MockTaskRepo::with(vec![DelayedTask::purge_order(
        order.id,
        Utc::now() - chrono::Duration::seconds(1),
    )]);

    let completed = usecase(&tasks, &orders).execute(Utc::now()).await.unwrap();

    assert_eq!(completed, 1);
    assert!(orders.orders.lock().unwrap().is_empty());
    assert_eq!(orders.purged.lock().unwrap().as_slice(), &[order.id]);
    assert!(tasks.tasks.lock().unwrap()[0].completed_at.is_some());
}

#[tokio::test]
async fn should_not_touch_tasks_that_are_not_due_yet() {
    let order = test_order(Uuid::now_v7(), OrderStatus::Success);
    let orders = MockOrderRepo::with(vec![order.clone()]);
    let tasks = MockTaskRepo::with(vec![DelayedTask::purge_order(
        order.id,
        Utc::now() + chrono::Duration::minutes(10),
    )]);

    let completed = usecase(&tasks, &orders).execute(Utc::now()).await.unwrap();

    assert_eq!(completed, 0);
    assert_eq!(orders.orders.lock().unwrap().len(), 1);
    assert!(tasks.tasks.lock().unwrap()[0].claimed_at.is_none());
}

#[tokio::test]
async fn should_purge_exactly_once_with_two_racing_consumers() {
    let order = test_order(Uuid::now_v7(), OrderStatus::Success);
    let orders = MockOrderRepo::with(vec![order.clone()]);
    let tasks = MockTaskRepo::with(vec![DelayedTask::purge_order(
        order.id,
        Utc::now() - chrono::Duration::seconds(1),
    )]);

    // Two consumers over the same queue, as when both legacy cleanup paths
    // were deployed at once. The claim must let exactly one of them run.
    let first = usecase(&tasks, &orders);
    let second = usecase(&tasks, &orders);
    let now = Utc::now();
    let (a, b) = tokio::join!(first.execute(now), second.execute(now));

    assert_eq!(a.unwrap() + b.unwrap(), 1);
    assert_eq!(
        orders.purged.lock().unwrap().len(),
        1,
        "order must be purged exactly once"
    );
}

#[tokio::test]
async fn should_retry_failed_purge_and_rearm_the_task() {
    let order = test_order(Uuid::now_v7(), OrderStatus::Success);
    let orders = MockOrderRepo::with(vec![order.clone()]);
    orders.fail_purge.store(true, Ordering::SeqCst);
    let tasks = MockTaskRepo::with(vec![DelayedTask::purge_order(
        order.id,
        Utc::now() - chrono::Duration::seconds(1),
    )]);

    let now = Utc::now();
    let completed = usecase(&tasks, &orders).execute(now).await.unwrap();
    assert_eq!(completed, 0);

    {
        let queued = tasks.tasks.lock().unwrap();
        assert_eq!(queued[0].attempts, 1);
        assert!(queued[0].claimed_at.is_none(), "claim must be released");
        assert!(queued[0].failed_at.is_none());
        assert_eq!(queued[0].due_at, now + chrono::Duration::seconds(60));
        assert!(queued[0].last_error.is_some());
    }

    // Recovery: the purge works on the re-armed attempt.
    orders.fail_purge.store(false, Ordering::SeqCst);
    let later = now + chrono::Duration::seconds(120);
    let completed = usecase(&tasks, &orders).execute(later).await.unwrap();
    assert_eq!(completed, 1);
    assert_eq!(orders.purged.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn should_mark_task_failed_after_max_attempts() {
    let order = test_order(Uuid::now_v7(), OrderStatus::Success);
    let orders = MockOrderRepo::with(vec![order.clone()]);
    orders.fail_purge.store(true, Ordering::SeqCst);
    let tasks = MockTaskRepo::with(vec![DelayedTask::purge_order(
        order.id,
        Utc::now() - chrono::Duration::seconds(1),
    )]);

    let mut now = Utc::now();
    for _ in 0..3 {
        usecase(&tasks, &orders).execute(now).await.unwrap();
        now += chrono::Duration::seconds(120);
    }

    let queued = tasks.tasks.lock().unwrap();
    assert_eq!(queued[0].attempts, 3);
    assert!(queued[0].failed_at.is_some(), "task must be failed for good");
}

#[tokio::test]
async fn should_fail_task_of_unknown_kind_without_touching_orders() {
    let orders = MockOrderRepo::default();
    let mut task = DelayedTask::purge_order(Uuid::now_v7(), Utc::now() - chrono::Duration::seconds(1));
    task.kind = "defrost_warehouse".into();
    let tasks = MockTaskRepo::with(vec![task]);

    let mut now = Utc::now();
    for _ in 0..3 {
        usecase(&tasks, &orders).execute(now).await.unwrap();
        now += chrono::Duration::seconds(120);
    }

    assert!(tasks.tasks.lock().unwrap()[0].failed_at.is_some());
    assert!(orders.purged.lock().unwrap().is_empty());
}
