//! # Host 层
//!
//! 页式视觉小说引擎的宿主层实现。
//!
//! ## 架构说明
//!
//! Host 层负责：
//! - 脚本文件装载
//! - 音频播放（rodio）
//! - 输入采集与同帧去重
//! - 驱动会话的 `advance` / `tick` / `frame` 循环
//!
//! Host 层不包含导航逻辑，只执行会话返回的音频提示并消费
//! 每帧快照；呈现方式（此处为 headless 文本输出）可以整体替换
//! 而不触碰核心。

pub mod audio;
pub mod input;
pub mod loader;

pub use audio::CueManager;
pub use input::FrameInput;
pub use loader::{LoadError, load_script};
