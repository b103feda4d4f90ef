//! Integration tests for the full `SafeList` operation set.
//!
//! Covers sequential semantics, the tolerant out-of-range policy,
//! concurrent appends, the terminal close path, use-after-close errors,
//! and the updater reentrancy guard.

use safelist::{ListError, SafeList};

#[tokio::test]
async fn appends_read_back_in_order() {
    let list = SafeList::new();
    for i in 0..10i32 {
        list.append(i).await.unwrap();
    }

    assert_eq!(list.len().await.unwrap(), 10);
    for i in 0..10usize {
        assert_eq!(list.at(i).await.unwrap(), Some(i as i32));
    }
}

#[tokio::test]
async fn out_of_range_at_returns_none() {
    let list = SafeList::new();
    list.append("only").await.unwrap();

    assert_eq!(list.at(1).await.unwrap(), None);
    assert_eq!(list.at(usize::MAX).await.unwrap(), None);
}

#[tokio::test]
async fn out_of_range_delete_and_update_are_noops() {
    let list = SafeList::new();
    list.append(1u64).await.unwrap();

    list.delete(3).await.unwrap();
    list.update(3, |v| v + 100).await.unwrap();

    assert_eq!(list.len().await.unwrap(), 1);
    assert_eq!(list.at(0).await.unwrap(), Some(1));
}

#[tokio::test]
async fn update_with_identity_changes_nothing() {
    let list = SafeList::new();
    for i in 0..5i32 {
        list.append(i).await.unwrap();
    }

    for i in 0..5usize {
        list.update(i, |v| v).await.unwrap();
    }
    for i in 0..5usize {
        assert_eq!(list.at(i).await.unwrap(), Some(i as i32));
    }
}

#[tokio::test]
async fn close_returns_net_effect_of_all_commands() {
    let list = SafeList::new();
    list.append(1i32).await.unwrap();
    list.append(2).await.unwrap();
    list.append(3).await.unwrap();
    list.update(1, |v| v * 10).await.unwrap();
    list.delete(0).await.unwrap();

    assert_eq!(list.close().await.unwrap(), vec![20, 3]);
}

#[tokio::test]
async fn delete_shifts_later_elements_down() {
    let list = SafeList::new();
    list.append("a").await.unwrap();
    list.append("b").await.unwrap();
    list.delete(0).await.unwrap();

    assert_eq!(list.at(0).await.unwrap(), Some("b"));
    assert_eq!(list.len().await.unwrap(), 1);
    assert_eq!(list.close().await.unwrap(), vec!["b"]);
}

#[tokio::test]
async fn empty_list_behaves() {
    let list = SafeList::<u8>::new();

    assert_eq!(list.at(0).await.unwrap(), None);
    assert_eq!(list.len().await.unwrap(), 0);
    assert_eq!(list.close().await.unwrap(), Vec::<u8>::new());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_appends_preserve_every_item() {
    let list = SafeList::new();

    let mut appenders = Vec::new();
    for i in 0..32usize {
        let handle = list.clone();
        appenders.push(tokio::spawn(async move { handle.append(i).await }));
    }
    for appender in appenders {
        appender.await.unwrap().unwrap();
    }

    assert_eq!(list.len().await.unwrap(), 32);

    let mut items = list.close().await.unwrap();
    items.sort_unstable();
    assert_eq!(items, (0..32).collect::<Vec<_>>());
}

#[tokio::test]
async fn every_operation_after_close_fails() {
    let list = SafeList::new();
    let survivor = list.clone();
    list.append("x").await.unwrap();

    assert_eq!(list.close().await.unwrap(), vec!["x"]);

    assert_eq!(survivor.append("y").await, Err(ListError::Closed));
    assert_eq!(survivor.delete(0).await, Err(ListError::Closed));
    assert_eq!(survivor.at(0).await, Err(ListError::Closed));
    assert_eq!(survivor.update(0, |v| v).await, Err(ListError::Closed));
    assert_eq!(survivor.len().await, Err(ListError::Closed));
    assert_eq!(survivor.clone().close().await, Err(ListError::Closed));
}

/// An updater that touches its own list must not corrupt state. The guard
/// turns the would-be deadlock into a fast `Reentrancy` error, and the
/// element keeps its original value.
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn reentrant_call_from_updater_fails_fast() {
    let list = SafeList::new();
    list.append(1i64).await.unwrap();

    let inner = list.clone();
    list.update(0, move |v| {
        match futures::executor::block_on(inner.at(0)) {
            Err(ListError::Reentrancy) => v,
            // Would mark corruption: the guard did not fire.
            _ => v + 100,
        }
    })
    .await
    .unwrap();

    assert_eq!(list.at(0).await.unwrap(), Some(1));
    assert_eq!(list.close().await.unwrap(), vec![1]);
}

/// The guard is per instance: an updater may talk to a different list.
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn updater_may_operate_on_another_list() {
    let list = SafeList::new();
    let other = SafeList::new();
    list.append(0u32).await.unwrap();
    other.append(7u32).await.unwrap();

    let other_handle = other.clone();
    list.update(0, move |v| {
        let seen = futures::executor::block_on(other_handle.at(0));
        match seen {
            Ok(Some(value)) => v + value,
            _ => v,
        }
    })
    .await
    .unwrap();

    assert_eq!(list.at(0).await.unwrap(), Some(7));
    assert_eq!(other.close().await.unwrap(), vec![7]);
    assert_eq!(list.close().await.unwrap(), vec![7]);
}

#[tokio::test]
async fn synchronous_reads_act_as_visibility_barrier() {
    let list = SafeList::new();

    // Fire-and-forget commands queued back to back; the len() reply proves
    // everything accepted before it has been applied.
    for i in 0..8i32 {
        list.append(i).await.unwrap();
    }
    list.delete(0).await.unwrap();
    list.update(0, |v| v - 1).await.unwrap();

    assert_eq!(list.len().await.unwrap(), 7);
    assert_eq!(list.at(0).await.unwrap(), Some(0));
}
