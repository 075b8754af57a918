// ==========================================
// 多渠道对账台账系统 - SQLite 文档库后端
// ==========================================
// 职责: 以单表 JSON 文档的形式实现 DocumentStore
// 红线: 不含业务逻辑，只负责数据访问
// 说明: rowid 保证 list_all 的插入序稳定
// ==========================================

use crate::db::open_sqlite_connection;
use crate::store::{Document, DocumentStore, StoreError, StoreResult};
use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::Value;
use std::sync::{Arc, Mutex, MutexGuard};
use uuid::Uuid;

// ==========================================
// SqliteStore - SQLite 文档库
// ==========================================
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// 打开（或创建）数据库文件并初始化表结构
    pub fn new(db_path: &str) -> StoreResult<Self> {
        let conn = open_sqlite_connection(db_path)
            .map_err(|e| StoreError::Transport(e.to_string()))?;
        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        store.init_schema()?;
        Ok(store)
    }

    /// 内存数据库（测试用）
    pub fn in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| StoreError::Transport(e.to_string()))?;
        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> StoreResult<()> {
        let conn = self.get_conn()?;
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS documents (
                collection  TEXT NOT NULL,
                id          TEXT NOT NULL,
                body        TEXT NOT NULL,
                created_at  TEXT NOT NULL,
                updated_at  TEXT NOT NULL,
                PRIMARY KEY (collection, id)
            );
            CREATE INDEX IF NOT EXISTS idx_documents_collection
                ON documents (collection);
            "#,
        )
        .map_err(|e| StoreError::Transport(e.to_string()))?;
        Ok(())
    }

    fn get_conn(&self) -> StoreResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| StoreError::LockError(e.to_string()))
    }
}

#[async_trait]
impl DocumentStore for SqliteStore {
    async fn list_all(&self, collection: &str) -> StoreResult<Vec<Document>> {
        let conn = self.get_conn()?;
        let mut stmt = conn
            .prepare(
                "SELECT id, body FROM documents WHERE collection = ?1 ORDER BY rowid",
            )
            .map_err(|e| StoreError::Transport(e.to_string()))?;

        let rows = stmt
            .query_map(params![collection], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })
            .map_err(|e| StoreError::Transport(e.to_string()))?;

        let mut docs = Vec::new();
        for row in rows {
            let (id, body) = row.map_err(|e| StoreError::Transport(e.to_string()))?;
            let body: Value =
                serde_json::from_str(&body).map_err(|e| StoreError::Codec(e.to_string()))?;
            docs.push(Document { id, body });
        }
        Ok(docs)
    }

    async fn add(&self, collection: &str, body: Value) -> StoreResult<String> {
        let conn = self.get_conn()?;
        let id = Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();
        conn.execute(
            "INSERT INTO documents (collection, id, body, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?4)",
            params![collection, id, body.to_string(), now],
        )
        .map_err(|e| StoreError::Transport(e.to_string()))?;
        Ok(id)
    }

    async fn update(&self, collection: &str, id: &str, patch: Value) -> StoreResult<()> {
        let conn = self.get_conn()?;

        let existing: Option<String> = conn
            .query_row(
                "SELECT body FROM documents WHERE collection = ?1 AND id = ?2",
                params![collection, id],
                |row| row.get(0),
            )
            .optional()
            .map_err(|e| StoreError::Transport(e.to_string()))?;

        let existing = existing.ok_or_else(|| StoreError::NotFound {
            collection: collection.to_string(),
            id: id.to_string(),
        })?;

        let mut body: Value =
            serde_json::from_str(&existing).map_err(|e| StoreError::Codec(e.to_string()))?;

        // 浅合并: 仅覆盖补丁中的顶层字段
        if let (Value::Object(map), Value::Object(patch)) = (&mut body, patch) {
            for (key, value) in patch {
                map.insert(key, value);
            }
        }

        let now = Utc::now().to_rfc3339();
        conn.execute(
            "UPDATE documents SET body = ?3, updated_at = ?4
             WHERE collection = ?1 AND id = ?2",
            params![collection, id, body.to_string(), now],
        )
        .map_err(|e| StoreError::Transport(e.to_string()))?;
        Ok(())
    }

    async fn remove(&self, collection: &str, id: &str) -> StoreResult<()> {
        let conn = self.get_conn()?;
        let affected = conn
            .execute(
                "DELETE FROM documents WHERE collection = ?1 AND id = ?2",
                params![collection, id],
            )
            .map_err(|e| StoreError::Transport(e.to_string()))?;
        if affected == 0 {
            return Err(StoreError::NotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            });
        }
        Ok(())
    }
}
