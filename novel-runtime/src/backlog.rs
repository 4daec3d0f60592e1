//! # Backlog 模块
//!
//! 对话回看日志。
//!
//! ## 设计原则
//!
//! - 只追加：条目只在**向前**到达（线性推进或选择跳转）携带对话的
//!   页面时记录，回退重看已记录的页面不会追加
//! - 同一页再次向前到达时会再次追加（日志反映阅读轨迹，不去重）
//! - 不设上限：长度单调不减是对外可观测的不变量

use serde::{Deserialize, Serialize};

/// 回看条目
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BacklogEntry {
    /// 说话者
    pub speaker: String,
    /// 展示文本（已清洗）
    pub text: String,
}

/// 回看日志容器
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Backlog {
    entries: Vec<BacklogEntry>,
}

impl Backlog {
    /// 创建空日志
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加一条对话
    pub fn push(&mut self, speaker: impl Into<String>, text: impl Into<String>) {
        self.entries.push(BacklogEntry {
            speaker: speaker.into(),
            text: text.into(),
        });
    }

    /// 全部条目（从旧到新）
    pub fn entries(&self) -> &[BacklogEntry] {
        &self.entries
    }

    /// 从最新一条往回数第 `offset` 条（offset 0 = 最新）
    pub fn from_newest(&self, offset: usize) -> Option<&BacklogEntry> {
        let len = self.entries.len();
        if offset < len {
            Some(&self.entries[len - 1 - offset])
        } else {
            None
        }
    }

    /// 条目总数
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
