//! # Input 模块
//!
//! 输入采集层：把物理触发（鼠标/按键/触摸/手柄）汇聚成
//! [`InputEvent`]，并对"主推进"做同帧去重——多个物理来源同时
//! 触发也只产生一个逻辑推进事件。
//!
//! 会话本身对设备一无所知，只消费这里产出的语义化事件。

use novel_runtime::InputEvent;

/// 单帧输入收集器
///
/// 每帧开始时为空；物理层把识别到的触发逐个汇入，
/// 帧末 [`FrameInput::drain`] 取走事件并复位。
#[derive(Debug, Default)]
pub struct FrameInput {
    events: Vec<InputEvent>,
    /// 推进闩锁：同帧内第二个及之后的推进触发被吞掉
    advance_latched: bool,
}

impl FrameInput {
    /// 创建空收集器
    pub fn new() -> Self {
        Self::default()
    }

    /// 汇入一个物理推进触发（鼠标左键 / 空格 / 回车 / 触摸 / 手柄确认）
    ///
    /// 同一帧内重复触发只记一次。
    pub fn trigger_advance(&mut self) {
        if !self.advance_latched {
            self.advance_latched = true;
            self.events.push(InputEvent::Advance);
        }
    }

    /// 汇入一个非推进事件
    ///
    /// 推进事件请走 [`FrameInput::trigger_advance`] 以获得去重；
    /// 误传的 `Advance` 也会被按闩锁规则处理。
    pub fn push(&mut self, event: InputEvent) {
        if event == InputEvent::Advance {
            self.trigger_advance();
        } else {
            self.events.push(event);
        }
    }

    /// 取走本帧全部事件并复位闩锁
    pub fn drain(&mut self) -> Vec<InputEvent> {
        self.advance_latched = false;
        std::mem::take(&mut self.events)
    }

    /// 本帧是否尚无事件
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
