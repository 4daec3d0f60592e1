//! # Frame 模块
//!
//! 每帧输出契约：呈现层在 `tick()` / `advance()` 返回后读取的
//! 纯快照，无副作用。呈现层只拿到语义化的绘制意图
//! （标识、列表、混合比），从不在这里做像素操作。

use crate::backlog::BacklogEntry;
use crate::script::{ChoiceInfo, DialogueInfo};
use crate::stage::{BackgroundBlend, SpriteBlend};

/// 选择列表视图
#[derive(Debug, Clone, Copy)]
pub struct ChoiceView<'a> {
    /// 当前页的全部选项
    pub options: &'a [ChoiceInfo],
    /// 待确认的选项索引（始终在 `0..options.len()` 内）
    pub selected: usize,
}

/// 回看视图
#[derive(Debug, Clone, Copy)]
pub struct BacklogView<'a> {
    /// 全部条目（从旧到新）
    pub entries: &'a [BacklogEntry],
    /// 滚动偏移（0 = 最新条目，递增 = 更早）
    pub offset: usize,
}

/// 每帧输出快照
///
/// - 回看模式：只有 `backlog`，对话与选择被遮蔽
/// - 选择模式：`dialogue`（若有）+ `choices`
/// - 阅读模式：只有 `dialogue`（若有）
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    /// 背景混合
    pub background: BackgroundBlend<'a>,
    /// 立绘混合
    pub sprites: SpriteBlend<'a>,
    /// 当前页对话
    pub dialogue: Option<&'a DialogueInfo>,
    /// 选择列表（仅选择模式）
    pub choices: Option<ChoiceView<'a>>,
    /// 回看视图（仅回看模式）
    pub backlog: Option<BacklogView<'a>>,
}
