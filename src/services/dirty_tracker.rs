//! 行内批量编辑的脏数据跟踪
//!
//! 每行保留加载时的基线值；编辑后与基线相同则移出编辑表，否则写入编辑表。
//! 提交时把编辑表中的全部行一次性交给持久化回调：成功则成为新的基线并清空编辑表，
//! 失败则编辑表原样保留，方便操作员重试。

use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;

use crate::error::{AppError, AppResult};
use crate::models::Activity;

/// 可被跟踪的列表行
pub trait TrackedRow: Clone + PartialEq {
    type Key: Clone + Eq + Hash + std::fmt::Display;

    fn key(&self) -> Self::Key;
}

impl TrackedRow for Activity {
    type Key = String;

    fn key(&self) -> String {
        self.id.clone()
    }
}

#[derive(Debug, Clone)]
pub struct DirtyTracker<R: TrackedRow> {
    /// 行的加载顺序
    order: Vec<R::Key>,
    baseline: HashMap<R::Key, R>,
    edited: HashMap<R::Key, R>,
}

impl<R: TrackedRow> Default for DirtyTracker<R> {
    fn default() -> Self {
        Self {
            order: Vec::new(),
            baseline: HashMap::new(),
            edited: HashMap::new(),
        }
    }
}

impl<R: TrackedRow> DirtyTracker<R> {
    pub fn new(rows: impl IntoIterator<Item = R>) -> Self {
        let mut tracker = Self::default();
        for row in rows {
            tracker.rebase(row);
        }
        tracker
    }

    /// 对某行应用一次字段修改，返回修改后该行是否为脏
    pub fn edit(&mut self, key: &R::Key, change: impl FnOnce(&mut R)) -> AppResult<bool> {
        let baseline = self
            .baseline
            .get(key)
            .ok_or_else(|| AppError::NotFound(format!("Row {key} not found")))?;
        let mut updated = self.edited.get(key).unwrap_or(baseline).clone();
        change(&mut updated);

        if &updated == baseline {
            self.edited.remove(key);
            Ok(false)
        } else {
            self.edited.insert(key.clone(), updated);
            Ok(true)
        }
    }

    pub fn is_dirty(&self) -> bool {
        !self.edited.is_empty()
    }

    pub fn is_row_dirty(&self, key: &R::Key) -> bool {
        self.edited.contains_key(key)
    }

    pub fn dirty_count(&self) -> usize {
        self.edited.len()
    }

    /// 当前值：有编辑取编辑值，否则取基线
    pub fn current(&self, key: &R::Key) -> Option<&R> {
        self.edited.get(key).or_else(|| self.baseline.get(key))
    }

    pub fn baseline(&self, key: &R::Key) -> Option<&R> {
        self.baseline.get(key)
    }

    /// 按加载顺序返回所有行的当前值
    pub fn rows(&self) -> Vec<&R> {
        self.order.iter().filter_map(|k| self.current(k)).collect()
    }

    /// 按加载顺序返回待提交的行
    pub fn dirty_rows(&self) -> Vec<&R> {
        self.order.iter().filter_map(|k| self.edited.get(k)).collect()
    }

    /// 用新值替换某行基线（新行则追加），并丢弃该行未提交的编辑
    pub fn rebase(&mut self, row: R) {
        let key = row.key();
        if !self.baseline.contains_key(&key) {
            self.order.push(key.clone());
        }
        self.edited.remove(&key);
        self.baseline.insert(key, row);
    }

    pub fn discard(&mut self) {
        self.edited.clear();
    }

    /// 全有或全无地提交所有脏行
    ///
    /// `persist` 收到脏行副本并返回实际保存后的行（可能带有操作人/时间戳）。
    /// 返回提交的行数；没有脏行时不调用 `persist`。
    pub async fn commit<F, Fut>(&mut self, persist: F) -> AppResult<usize>
    where
        F: FnOnce(Vec<R>) -> Fut,
        Fut: Future<Output = AppResult<Vec<R>>>,
    {
        if self.edited.is_empty() {
            return Ok(0);
        }
        let pending: Vec<R> = self.dirty_rows().into_iter().cloned().collect();
        let saved = persist(pending).await?;

        let count = self.edited.len();
        self.edited.clear();
        for row in saved {
            self.rebase(row);
        }
        Ok(count)
    }
}
