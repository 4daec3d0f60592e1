//! # Novel Runtime
//!
//! 页式视觉小说引擎的纯逻辑核心。
//!
//! ## 架构概述
//!
//! `novel-runtime` 不依赖任何 IO、音频或渲染引擎。宿主层（Host）
//! 采集输入、播放音频、绘制画面；核心只负责"现在该展示什么、
//! 如何从上一状态混合过来"：
//!
//! ```text
//! Host                              Session
//!   │                                  │
//!   │──── advance(InputEvent) ───────►│  导航状态机
//!   │◄─── Option<AudioCue> ───────────│  （唯一的外部副作用）
//!   │                                  │
//!   │──── tick()（每帧） ────────────►│  舞台过渡推进
//!   │◄─── frame()（纯读快照） ────────│
//! ```
//!
//! ## 核心类型
//!
//! - [`Script`]：装载后不可变的有序页面序列
//! - [`Session`]：导航状态机 + 舞台过渡 + 回看日志，会话独占持有
//! - [`InputEvent`]：Host 传入的语义化输入
//! - [`Frame`]：每帧输出契约，呈现层消费的纯快照
//!
//! ## 模块结构
//!
//! - [`script`]：脚本数据模型、装载与标记清洗
//! - [`stage`]：帧计数的双通道交叉淡入引擎
//! - [`session`]：导航状态机
//! - [`backlog`]：只追加的对话回看日志
//! - [`input`]：输入事件定义
//! - [`frame`]：每帧输出契约
//! - [`error`]：错误类型定义

pub mod backlog;
pub mod error;
pub mod frame;
pub mod input;
pub mod script;
pub mod session;
pub mod stage;

// 重导出核心类型
pub use backlog::{Backlog, BacklogEntry};
pub use error::{ScriptError, ScriptResult};
pub use frame::{BacklogView, ChoiceView, Frame};
pub use input::InputEvent;
pub use script::{
    AudioCue, ChoiceInfo, DialogueInfo, Page, Position, Script, SpriteInfo, StageDirective,
    strip_markup,
};
pub use session::{Mode, Session};
pub use stage::{BackgroundBlend, BackgroundLayer, SpriteBlend, StageTransition};
