//! 内存存储后端 / In-memory storage backend
//!
//! 整个状态挂在同一把锁下：`reply_and_update` 的消息追加与状态变更
//! 在一个锁作用域内完成，原子性由锁保证。
//! The whole state sits behind one lock: message append and status
//! change in `reply_and_update` happen in a single lock scope, which is
//! what gives the atomicity guarantee.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use kefu::http::Page;
use kefu::HealthStatus;
use parking_lot::Mutex;

use crate::domain::{ChatLog, GroupStatus, SenderRole, SupportGroup};

use super::{GroupFilter, Result, StoreError, SupportStore};

#[derive(Default)]
struct State {
    groups: HashMap<i64, SupportGroup>,
    messages: HashMap<i64, Vec<ChatLog>>,
    next_group_id: i64,
    next_message_id: i64,
}

pub struct MemStore {
    state: Mutex<State>,
    #[cfg(test)]
    fail_between_writes: std::sync::atomic::AtomicBool,
}

impl MemStore {
    pub fn new() -> Self {
        MemStore {
            state: Mutex::new(State::default()),
            #[cfg(test)]
            fail_between_writes: std::sync::atomic::AtomicBool::new(false),
        }
    }
}

impl Default for MemStore {
    fn default() -> Self {
        Self::new()
    }
}

fn matches(filter: &GroupFilter, g: &SupportGroup) -> bool {
    if let Some(s) = filter.status {
        if g.status != s {
            return false;
        }
    }
    if let Some(app) = filter.app_id {
        if g.app_id != app {
            return false;
        }
    }
    if let Some(user) = filter.user_id {
        if g.user_id != user {
            return false;
        }
    }
    true
}

fn page_slice<T: Clone>(items: &[T], page: Page) -> Vec<T> {
    items
        .iter()
        .skip(page.offset() as usize)
        .take(page.size as usize)
        .cloned()
        .collect()
}

#[async_trait]
impl SupportStore for MemStore {
    async fn create_group(&self, app_id: i64, user_id: i64) -> Result<SupportGroup> {
        let mut st = self.state.lock();
        st.next_group_id += 1;
        let now = Utc::now();
        let group = SupportGroup {
            id: st.next_group_id,
            app_id,
            user_id,
            status: GroupStatus::Open,
            created_at: now,
            updated_at: now,
        };
        st.groups.insert(group.id, group.clone());
        st.messages.insert(group.id, Vec::new());
        Ok(group)
    }

    async fn get_group(&self, group_id: i64) -> Result<Option<SupportGroup>> {
        Ok(self.state.lock().groups.get(&group_id).cloned())
    }

    async fn list_groups(
        &self,
        filter: GroupFilter,
        page: Page,
    ) -> Result<(Vec<SupportGroup>, u64)> {
        let st = self.state.lock();
        let mut all: Vec<SupportGroup> = st
            .groups
            .values()
            .filter(|g| matches(&filter, g))
            .cloned()
            .collect();
        // created_at DESC, id DESC：与 Postgres 后端保持同一分页顺序
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        let total = all.len() as u64;
        Ok((page_slice(&all, page), total))
    }

    async fn latest_open_group(&self, user_id: i64) -> Result<Option<SupportGroup>> {
        let st = self.state.lock();
        let mut open: Vec<&SupportGroup> = st
            .groups
            .values()
            .filter(|g| g.user_id == user_id && g.status == GroupStatus::Open)
            .collect();
        open.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(open.first().map(|g| (*g).clone()))
    }

    async fn append_message(
        &self,
        group_id: i64,
        role: SenderRole,
        content: &str,
    ) -> Result<ChatLog> {
        let mut st = self.state.lock();
        if !st.groups.contains_key(&group_id) {
            return Err(StoreError::GroupNotFound(group_id));
        }
        st.next_message_id += 1;
        let log = ChatLog {
            id: st.next_message_id,
            group_id,
            role,
            content: content.to_string(),
            created_at: Utc::now(),
        };
        st.messages.entry(group_id).or_default().push(log.clone());
        Ok(log)
    }

    async fn list_messages(&self, group_id: i64, page: Page) -> Result<(Vec<ChatLog>, u64)> {
        let st = self.state.lock();
        let logs = st
            .messages
            .get(&group_id)
            .ok_or(StoreError::GroupNotFound(group_id))?;
        // 插入顺序即时间顺序，id 升序
        let total = logs.len() as u64;
        Ok((page_slice(logs, page), total))
    }

    async fn reply_and_update(
        &self,
        group_id: i64,
        content: &str,
        status: Option<GroupStatus>,
    ) -> Result<ChatLog> {
        let mut st = self.state.lock();
        if !st.groups.contains_key(&group_id) {
            return Err(StoreError::GroupNotFound(group_id));
        }

        #[cfg(test)]
        if self
            .fail_between_writes
            .load(std::sync::atomic::Ordering::SeqCst)
        {
            // 注入失败：两个写入都不能落地
            // Injected failure: neither write may land
            return Err(StoreError::Db(kefu::DbError::Tx("injected failure".into())));
        }

        st.next_message_id += 1;
        let log = ChatLog {
            id: st.next_message_id,
            group_id,
            role: SenderRole::Agent,
            content: content.to_string(),
            created_at: Utc::now(),
        };
        st.messages.entry(group_id).or_default().push(log.clone());
        if let Some(s) = status {
            let group = st.groups.get_mut(&group_id).expect("checked above");
            if group.status != s {
                group.status = s;
                group.updated_at = Utc::now();
            }
        }
        Ok(log)
    }

    async fn update_status(&self, group_id: i64, status: GroupStatus) -> Result<SupportGroup> {
        let mut st = self.state.lock();
        let group = st
            .groups
            .get_mut(&group_id)
            .ok_or(StoreError::GroupNotFound(group_id))?;
        // 幂等：设置为当前值不产生可观察变化
        if group.status != status {
            group.status = status;
            group.updated_at = Utc::now();
        }
        Ok(group.clone())
    }

    async fn health(&self) -> HealthStatus {
        let st = self.state.lock();
        HealthStatus {
            component: "memory_store".to_string(),
            healthy: true,
            message: Some(format!("{} groups", st.groups.len())),
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::Ordering;
    use std::sync::Arc;

    fn page(n: u32, size: u32) -> Page {
        Page { page: n, size }
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let store = MemStore::new();
        let g = store.create_group(1, 42).await.unwrap();
        assert_eq!(g.status, GroupStatus::Open);
        let fetched = store.get_group(g.id).await.unwrap().unwrap();
        assert_eq!(fetched.user_id, 42);
    }

    #[tokio::test]
    async fn test_append_preserves_order() {
        let store = MemStore::new();
        let g = store.create_group(1, 42).await.unwrap();
        for i in 0..5 {
            store
                .append_message(g.id, SenderRole::Customer, &format!("msg-{}", i))
                .await
                .unwrap();
        }
        let (first_read, total) = store.list_messages(g.id, page(1, 10)).await.unwrap();
        assert_eq!(total, 5);
        store
            .append_message(g.id, SenderRole::Agent, "later")
            .await
            .unwrap();
        let (second_read, _) = store.list_messages(g.id, page(1, 10)).await.unwrap();
        // 先前返回的顺序不因追加而改变
        for (a, b) in first_read.iter().zip(second_read.iter()) {
            assert_eq!(a.id, b.id);
            assert_eq!(a.content, b.content);
        }
        assert!(second_read.windows(2).all(|w| w[0].id < w[1].id));
    }

    #[tokio::test]
    async fn test_append_missing_group() {
        let store = MemStore::new();
        let err = store
            .append_message(999, SenderRole::Customer, "hello")
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::GroupNotFound(999)));
    }

    #[tokio::test]
    async fn test_reply_updates_status_atomically() {
        let store = MemStore::new();
        let g = store.create_group(1, 42).await.unwrap();
        store
            .reply_and_update(g.id, "we're on it", Some(GroupStatus::Closed))
            .await
            .unwrap();
        let g2 = store.get_group(g.id).await.unwrap().unwrap();
        assert_eq!(g2.status, GroupStatus::Closed);
        let (_, total) = store.list_messages(g.id, page(1, 10)).await.unwrap();
        assert_eq!(total, 1);
    }

    #[tokio::test]
    async fn test_reply_failure_leaves_no_partial_write() {
        let store = MemStore::new();
        let g = store.create_group(1, 42).await.unwrap();
        store.fail_between_writes.store(true, Ordering::SeqCst);
        let err = store
            .reply_and_update(g.id, "dropped", Some(GroupStatus::Closed))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Db(_)));
        store.fail_between_writes.store(false, Ordering::SeqCst);
        // 两个写入都不可见：消息数为 0，状态仍为 open
        let (_, total) = store.list_messages(g.id, page(1, 10)).await.unwrap();
        assert_eq!(total, 0);
        let g2 = store.get_group(g.id).await.unwrap().unwrap();
        assert_eq!(g2.status, GroupStatus::Open);
    }

    #[tokio::test]
    async fn test_update_status_idempotent() {
        let store = MemStore::new();
        let g = store.create_group(1, 42).await.unwrap();
        let first = store
            .update_status(g.id, GroupStatus::Closed)
            .await
            .unwrap();
        let second = store
            .update_status(g.id, GroupStatus::Closed)
            .await
            .unwrap();
        assert_eq!(first.status, GroupStatus::Closed);
        assert_eq!(second.status, GroupStatus::Closed);
        assert_eq!(first.updated_at, second.updated_at);
    }

    #[tokio::test]
    async fn test_reopen_allowed() {
        let store = MemStore::new();
        let g = store.create_group(1, 42).await.unwrap();
        store
            .update_status(g.id, GroupStatus::Closed)
            .await
            .unwrap();
        let reopened = store.update_status(g.id, GroupStatus::Open).await.unwrap();
        assert_eq!(reopened.status, GroupStatus::Open);
    }

    #[tokio::test]
    async fn test_concurrent_appends_lose_nothing() {
        let store = Arc::new(MemStore::new());
        let g = store.create_group(1, 42).await.unwrap();
        let mut handles = Vec::new();
        for i in 0..20 {
            let store = Arc::clone(&store);
            let role = if i % 2 == 0 {
                SenderRole::Customer
            } else {
                SenderRole::Agent
            };
            handles.push(tokio::spawn(async move {
                store
                    .append_message(g.id, role, &format!("c-{}", i))
                    .await
                    .unwrap();
            }));
        }
        for h in handles {
            h.await.unwrap();
        }
        let (_, total) = store.list_messages(g.id, page(1, 100)).await.unwrap();
        assert_eq!(total, 20);
    }

    #[tokio::test]
    async fn test_latest_open_group() {
        let store = MemStore::new();
        let g1 = store.create_group(1, 42).await.unwrap();
        let g2 = store.create_group(1, 42).await.unwrap();
        let latest = store.latest_open_group(42).await.unwrap().unwrap();
        assert_eq!(latest.id, g2.id);
        store
            .update_status(g2.id, GroupStatus::Closed)
            .await
            .unwrap();
        let latest = store.latest_open_group(42).await.unwrap().unwrap();
        assert_eq!(latest.id, g1.id);
        assert!(store.latest_open_group(7).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_groups_filter_and_order() {
        let store = MemStore::new();
        let g1 = store.create_group(1, 10).await.unwrap();
        let g2 = store.create_group(2, 11).await.unwrap();
        store
            .update_status(g1.id, GroupStatus::Closed)
            .await
            .unwrap();

        let (all, total) = store
            .list_groups(GroupFilter::default(), page(1, 10))
            .await
            .unwrap();
        assert_eq!(total, 2);
        // 最新创建的排在最前
        assert_eq!(all[0].id, g2.id);

        let (open_only, total_open) = store
            .list_groups(
                GroupFilter {
                    status: Some(GroupStatus::Open),
                    ..Default::default()
                },
                page(1, 10),
            )
            .await
            .unwrap();
        assert_eq!(total_open, 1);
        assert_eq!(open_only[0].id, g2.id);
    }
}
