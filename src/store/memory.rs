// ==========================================
// 多渠道对账台账系统 - 内存文档库后端
// ==========================================
// 用途: 单元/集成测试与离线演示
// 说明: 支持按序号注入写失败，用于批量容错路径的测试
// ==========================================

use crate::store::{Document, DocumentStore, StoreError, StoreResult};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use uuid::Uuid;

#[derive(Default)]
struct MemoryState {
    // 集合 → 文档列表（保持插入序）
    collections: HashMap<String, Vec<Document>>,
    // 集合 → 每集合累计 add 计数（用于失败注入定位）
    add_counters: HashMap<String, u64>,
    // 集合 → 应失败的 add 序号（1 起）
    failing_adds: HashMap<String, HashSet<u64>>,
    // 应失败的 update 目标 (collection, id)
    failing_updates: HashSet<(String, String)>,
}

// ==========================================
// InMemoryStore - 内存文档库
// ==========================================
#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<MemoryState>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> StoreResult<std::sync::MutexGuard<'_, MemoryState>> {
        self.state
            .lock()
            .map_err(|e| StoreError::LockError(e.to_string()))
    }

    /// 测试辅助: 使某集合的第 nth 次 add（1 起，自创建以来累计）失败
    pub fn fail_add_at(&self, collection: &str, nth: u64) {
        let mut state = self.state.lock().unwrap();
        state
            .failing_adds
            .entry(collection.to_string())
            .or_default()
            .insert(nth);
    }

    /// 测试辅助: 使指定文档的 update 失败
    pub fn fail_update_for(&self, collection: &str, id: &str) {
        let mut state = self.state.lock().unwrap();
        state
            .failing_updates
            .insert((collection.to_string(), id.to_string()));
    }

    /// 测试辅助: 直接按指定 ID 写入文档（构造既有数据）
    pub fn seed(&self, collection: &str, id: &str, body: Value) {
        let mut state = self.state.lock().unwrap();
        state
            .collections
            .entry(collection.to_string())
            .or_default()
            .push(Document {
                id: id.to_string(),
                body,
            });
    }

    /// 测试辅助: 读取单个文档
    pub fn get(&self, collection: &str, id: &str) -> Option<Document> {
        let state = self.state.lock().unwrap();
        state
            .collections
            .get(collection)
            .and_then(|docs| docs.iter().find(|d| d.id == id).cloned())
    }
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn list_all(&self, collection: &str) -> StoreResult<Vec<Document>> {
        let state = self.lock()?;
        Ok(state
            .collections
            .get(collection)
            .cloned()
            .unwrap_or_default())
    }

    async fn add(&self, collection: &str, body: Value) -> StoreResult<String> {
        let mut state = self.lock()?;

        let counter = state
            .add_counters
            .entry(collection.to_string())
            .or_insert(0);
        *counter += 1;
        let ordinal = *counter;

        if state
            .failing_adds
            .get(collection)
            .is_some_and(|set| set.contains(&ordinal))
        {
            return Err(StoreError::Transport(format!(
                "注入的写失败: {} add #{}",
                collection, ordinal
            )));
        }

        let id = Uuid::new_v4().to_string();
        state
            .collections
            .entry(collection.to_string())
            .or_default()
            .push(Document {
                id: id.clone(),
                body,
            });
        Ok(id)
    }

    async fn update(&self, collection: &str, id: &str, patch: Value) -> StoreResult<()> {
        let mut state = self.lock()?;

        if state
            .failing_updates
            .contains(&(collection.to_string(), id.to_string()))
        {
            return Err(StoreError::Transport(format!(
                "注入的写失败: {}/{} update",
                collection, id
            )));
        }

        let docs = state
            .collections
            .get_mut(collection)
            .ok_or_else(|| StoreError::NotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            })?;
        let doc = docs
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or_else(|| StoreError::NotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            })?;

        // 浅合并: 仅覆盖补丁中的顶层字段
        if let (Value::Object(body), Value::Object(patch)) = (&mut doc.body, patch) {
            for (key, value) in patch {
                body.insert(key, value);
            }
        }
        Ok(())
    }

    async fn remove(&self, collection: &str, id: &str) -> StoreResult<()> {
        let mut state = self.lock()?;
        let docs = state
            .collections
            .get_mut(collection)
            .ok_or_else(|| StoreError::NotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            })?;
        let before = docs.len();
        docs.retain(|d| d.id != id);
        if docs.len() == before {
            return Err(StoreError::NotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            });
        }
        Ok(())
    }
}
