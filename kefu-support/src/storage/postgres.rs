//! PostgreSQL 存储后端 / PostgreSQL storage backend
//!
//! 连接池来自 kefu 的分组连接管理；`reply_and_update` 使用事务包住
//! 消息插入与状态更新两个写入。
//! Pools come from kefu's grouped connection manager; `reply_and_update`
//! wraps the message insert and the status update in one transaction.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use kefu::db::connection::{begin_tx, check_health as pg_check_health};
use kefu::db::model::{pool_for, DbModel};
use kefu::http::Page;
use kefu::{DbError, HealthStatus};
use sqlx::{Pool, Postgres, QueryBuilder};

use crate::domain::{ChatLog, GroupStatus, SenderRole, SupportGroup};

use super::{GroupFilter, Result, StoreError, SupportStore};

pub struct PgStore {
    pool: Pool<Postgres>,
}

impl PgStore {
    /// 按实体的分库组建立连接 / Connect via the entities' database group
    pub async fn connect() -> Result<Self> {
        let pool = pool_for::<SupportGroup>().await?;
        Ok(PgStore { pool })
    }

    pub fn pool(&self) -> &Pool<Postgres> {
        &self.pool
    }
}

#[derive(sqlx::FromRow)]
struct GroupRow {
    id: i64,
    app_id: i64,
    user_id: i64,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl GroupRow {
    fn into_group(self) -> Result<SupportGroup> {
        let status = GroupStatus::parse(&self.status).ok_or_else(|| {
            StoreError::Db(DbError::Config(format!(
                "非法状态值 / illegal status tag: {}",
                self.status
            )))
        })?;
        Ok(SupportGroup {
            id: self.id,
            app_id: self.app_id,
            user_id: self.user_id,
            status,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct ChatLogRow {
    id: i64,
    group_id: i64,
    role: String,
    content: String,
    created_at: DateTime<Utc>,
}

impl ChatLogRow {
    fn into_log(self) -> Result<ChatLog> {
        let role = SenderRole::parse(&self.role).ok_or_else(|| {
            StoreError::Db(DbError::Config(format!(
                "非法角色值 / illegal role tag: {}",
                self.role
            )))
        })?;
        Ok(ChatLog {
            id: self.id,
            group_id: self.group_id,
            role,
            content: self.content,
            created_at: self.created_at,
        })
    }
}

const GROUP_COLS: &str = "id, app_id, user_id, status, created_at, updated_at";
const LOG_COLS: &str = "id, group_id, role, content, created_at";

fn push_group_filters(qb: &mut QueryBuilder<'_, Postgres>, filter: &GroupFilter) {
    let mut has_where = false;
    fn sep(qb: &mut QueryBuilder<'_, Postgres>, has_where: &mut bool) {
        if *has_where {
            qb.push(" AND ");
        } else {
            qb.push(" WHERE ");
            *has_where = true;
        }
    }
    if let Some(status) = filter.status {
        sep(qb, &mut has_where);
        qb.push("status = ").push_bind(status.as_str());
    }
    if let Some(app_id) = filter.app_id {
        sep(qb, &mut has_where);
        qb.push("app_id = ").push_bind(app_id);
    }
    if let Some(user_id) = filter.user_id {
        sep(qb, &mut has_where);
        qb.push("user_id = ").push_bind(user_id);
    }
}

impl PgStore {
    async fn group_exists(&self, group_id: i64) -> Result<bool> {
        let found: Option<i64> = sqlx::query_scalar(&format!(
            "SELECT id FROM \"{}\" WHERE id = $1",
            SupportGroup::table_name()
        ))
        .bind(group_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(DbError::from)?;
        Ok(found.is_some())
    }
}

#[async_trait]
impl SupportStore for PgStore {
    async fn create_group(&self, app_id: i64, user_id: i64) -> Result<SupportGroup> {
        let row: GroupRow = sqlx::query_as(&format!(
            "INSERT INTO \"{}\" (app_id, user_id, status) VALUES ($1, $2, 'open') RETURNING {}",
            SupportGroup::table_name(),
            GROUP_COLS
        ))
        .bind(app_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(DbError::from)?;
        row.into_group()
    }

    async fn get_group(&self, group_id: i64) -> Result<Option<SupportGroup>> {
        let row: Option<GroupRow> = sqlx::query_as(&format!(
            "SELECT {} FROM \"{}\" WHERE id = $1",
            GROUP_COLS,
            SupportGroup::table_name()
        ))
        .bind(group_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(DbError::from)?;
        row.map(GroupRow::into_group).transpose()
    }

    async fn list_groups(
        &self,
        filter: GroupFilter,
        page: Page,
    ) -> Result<(Vec<SupportGroup>, u64)> {
        let mut count_qb = QueryBuilder::<Postgres>::new(format!(
            "SELECT COUNT(*) FROM \"{}\"",
            SupportGroup::table_name()
        ));
        push_group_filters(&mut count_qb, &filter);
        let total: i64 = count_qb
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(DbError::from)?;

        let mut qb = QueryBuilder::<Postgres>::new(format!(
            "SELECT {} FROM \"{}\"",
            GROUP_COLS,
            SupportGroup::table_name()
        ));
        push_group_filters(&mut qb, &filter);
        qb.push(" ORDER BY created_at DESC, id DESC");
        qb.push(" LIMIT ").push_bind(page.limit());
        qb.push(" OFFSET ").push_bind(page.offset());
        let rows: Vec<GroupRow> = qb
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(DbError::from)?;
        let groups = rows
            .into_iter()
            .map(GroupRow::into_group)
            .collect::<Result<Vec<_>>>()?;
        Ok((groups, total as u64))
    }

    async fn latest_open_group(&self, user_id: i64) -> Result<Option<SupportGroup>> {
        let row: Option<GroupRow> = sqlx::query_as(&format!(
            "SELECT {} FROM \"{}\" WHERE user_id = $1 AND status = 'open' \
             ORDER BY created_at DESC, id DESC LIMIT 1",
            GROUP_COLS,
            SupportGroup::table_name()
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(DbError::from)?;
        row.map(GroupRow::into_group).transpose()
    }

    async fn append_message(
        &self,
        group_id: i64,
        role: SenderRole,
        content: &str,
    ) -> Result<ChatLog> {
        if !self.group_exists(group_id).await? {
            return Err(StoreError::GroupNotFound(group_id));
        }
        // 纯插入，无读改写；并发追加互不覆盖
        // Insert-only, no read-modify-write; concurrent appends never clash
        let row: ChatLogRow = sqlx::query_as(&format!(
            "INSERT INTO \"{}\" (group_id, role, content) VALUES ($1, $2, $3) RETURNING {}",
            ChatLog::table_name(),
            LOG_COLS
        ))
        .bind(group_id)
        .bind(role.as_str())
        .bind(content)
        .fetch_one(&self.pool)
        .await
        .map_err(DbError::from)?;
        row.into_log()
    }

    async fn list_messages(&self, group_id: i64, page: Page) -> Result<(Vec<ChatLog>, u64)> {
        if !self.group_exists(group_id).await? {
            return Err(StoreError::GroupNotFound(group_id));
        }
        let total: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(*) FROM \"{}\" WHERE group_id = $1",
            ChatLog::table_name()
        ))
        .bind(group_id)
        .fetch_one(&self.pool)
        .await
        .map_err(DbError::from)?;
        let rows: Vec<ChatLogRow> = sqlx::query_as(&format!(
            "SELECT {} FROM \"{}\" WHERE group_id = $1 ORDER BY id ASC LIMIT $2 OFFSET $3",
            LOG_COLS,
            ChatLog::table_name()
        ))
        .bind(group_id)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(DbError::from)?;
        let logs = rows
            .into_iter()
            .map(ChatLogRow::into_log)
            .collect::<Result<Vec<_>>>()?;
        Ok((logs, total as u64))
    }

    async fn reply_and_update(
        &self,
        group_id: i64,
        content: &str,
        status: Option<GroupStatus>,
    ) -> Result<ChatLog> {
        let mut tx = begin_tx(&self.pool).await?;
        // 行锁避免与并发状态更新交错 / Row lock against concurrent status writes
        let locked: Option<i64> = sqlx::query_scalar(&format!(
            "SELECT id FROM \"{}\" WHERE id = $1 FOR UPDATE",
            SupportGroup::table_name()
        ))
        .bind(group_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(DbError::from)?;
        if locked.is_none() {
            return Err(StoreError::GroupNotFound(group_id));
        }
        let row: ChatLogRow = sqlx::query_as(&format!(
            "INSERT INTO \"{}\" (group_id, role, content) VALUES ($1, 'agent', $2) RETURNING {}",
            ChatLog::table_name(),
            LOG_COLS
        ))
        .bind(group_id)
        .bind(content)
        .fetch_one(&mut *tx)
        .await
        .map_err(DbError::from)?;
        if let Some(status) = status {
            sqlx::query(&format!(
                "UPDATE \"{}\" SET status = $2, \
                 updated_at = CASE WHEN status = $2 THEN updated_at ELSE now() END \
                 WHERE id = $1",
                SupportGroup::table_name()
            ))
            .bind(group_id)
            .bind(status.as_str())
            .execute(&mut *tx)
            .await
            .map_err(DbError::from)?;
        }
        tx.commit().await.map_err(DbError::from)?;
        row.into_log()
    }

    async fn update_status(&self, group_id: i64, status: GroupStatus) -> Result<SupportGroup> {
        // 后写覆盖；设置为当前值时 updated_at 不变（幂等）
        // Last writer wins; updated_at untouched when the value is unchanged
        let row: Option<GroupRow> = sqlx::query_as(&format!(
            "UPDATE \"{}\" SET status = $2, \
             updated_at = CASE WHEN status = $2 THEN updated_at ELSE now() END \
             WHERE id = $1 RETURNING {}",
            SupportGroup::table_name(),
            GROUP_COLS
        ))
        .bind(group_id)
        .bind(status.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(DbError::from)?;
        row.ok_or(StoreError::GroupNotFound(group_id))?.into_group()
    }

    async fn health(&self) -> HealthStatus {
        match pg_check_health(&self.pool).await {
            Ok(()) => HealthStatus {
                component: "postgres_store".to_string(),
                healthy: true,
                message: Some("OK".to_string()),
                timestamp: Utc::now(),
            },
            Err(e) => HealthStatus {
                component: "postgres_store".to_string(),
                healthy: false,
                message: Some(e.to_string()),
                timestamp: Utc::now(),
            },
        }
    }
}
