//! # Input 模块
//!
//! 定义 Host 向会话传递的语义化输入事件。
//!
//! ## 设计说明
//!
//! - 会话不直接处理鼠标/键盘/手柄事件，只处理语义化的输入
//! - 同一帧内多个物理来源触发的"推进"由 Host 层去重，
//!   一次物理按下只产生一个逻辑事件
//! - 每个事件最多引起一次状态转换

use serde::{Deserialize, Serialize};

/// 语义化输入事件
///
/// 会话通过 `advance(event)` 接收这些事件，并根据当前模式决定如何处理。
/// 在不适用的模式下收到的事件会被吞掉（防御性 no-op），不会报错。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputEvent {
    /// 打开/关闭对话回看（任何模式下优先处理）
    ToggleBacklog,

    /// 回看中向更早的条目滚动
    ScrollOlder,

    /// 回看中向更新的条目滚动
    ScrollNewer,

    /// 后退：回到上一页（阅读中），或取消选择（选择中）
    Back,

    /// 主推进：翻页或进入选择模式
    Advance,

    /// 选择光标上移
    ChoiceUp,

    /// 选择光标下移
    ChoiceDown,

    /// 确认当前选项
    ChoiceConfirm,
}
