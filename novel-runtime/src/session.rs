//! # Session 模块
//!
//! 页面导航状态机：会话独占持有全部可变状态（当前页索引、模式、
//! 选择光标、回看日志、舞台过渡），由外部驱动器单线程驱动。
//!
//! ## 执行模型
//!
//! ```text
//! advance(event) -> Option<AudioCue>   // 每个离散输入调用一次
//! tick()                               // 每渲染帧调用一次
//! frame() -> Frame                     // 纯读快照
//! ```
//!
//! 音频是会话唯一的外部副作用，以返回值的形式交给 Host 执行；
//! 会话本身从不接触设备，因此全部逻辑可以脱离音频/渲染后端测试。

use crate::backlog::Backlog;
use crate::frame::{BacklogView, ChoiceView, Frame};
use crate::input::InputEvent;
use crate::script::{AudioCue, Script};
use crate::stage::StageTransition;

/// 导航模式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// 线性阅读（初始模式）
    Reading,
    /// 分支选择
    Choosing,
    /// 对话回看
    Backlog,
}

/// 会话：一次完整阅读过程的全部运行时状态
///
/// 终止条件不存在——到达末页后推进事件永远是 no-op，
/// 会话存活到宿主进程结束。
pub struct Session {
    script: Script,
    index: usize,
    mode: Mode,
    /// 关闭回看后要恢复的模式（Reading 或 Choosing）
    resume_mode: Mode,
    choice_index: usize,
    backlog: Backlog,
    /// 回看滚动偏移；跨回看开关保留，方便继续上次的位置
    backlog_offset: usize,
    stage: StageTransition,
    started: bool,
}

impl Session {
    /// 创建绑定到第 0 页的会话
    ///
    /// `script` 必须至少包含一页（`Script::from_json` 已保证）。
    pub fn new(script: Script) -> Self {
        Self {
            script,
            index: 0,
            mode: Mode::Reading,
            resume_mode: Mode::Reading,
            choice_index: 0,
            backlog: Backlog::new(),
            backlog_offset: 0,
            stage: StageTransition::new(),
            started: false,
        }
    }

    /// 启动会话：使第 0 页生效
    ///
    /// 应用其舞台指令、记录其对话、返回其音频提示。
    /// 在第一帧之前调用一次即可，重复调用是 no-op。
    pub fn begin(&mut self) -> Option<AudioCue> {
        if self.started {
            return None;
        }
        self.started = true;
        self.enter_page(0, true)
    }

    /// 处理一个离散输入事件
    ///
    /// 每个事件最多引起一次状态转换；返回需要 Host 触发的音频提示
    /// （目标页携带的 cue），没有则为 `None`。在不适用模式下收到的
    /// 事件被吞掉，从不报错。
    pub fn advance(&mut self, event: InputEvent) -> Option<AudioCue> {
        // 回看开关优先于一切模式分派
        if event == InputEvent::ToggleBacklog {
            if self.mode == Mode::Backlog {
                self.mode = self.resume_mode;
            } else {
                self.resume_mode = self.mode;
                self.mode = Mode::Backlog;
            }
            return None;
        }

        match self.mode {
            Mode::Backlog => {
                self.advance_backlog(event);
                None
            }
            Mode::Choosing => self.advance_choosing(event),
            Mode::Reading => self.advance_reading(event),
        }
    }

    /// 推进舞台过渡一帧
    pub fn tick(&mut self) {
        self.stage.tick();
    }

    /// 舞台过渡是否已定格
    pub fn is_transitioning(&self) -> bool {
        !self.stage.is_settled()
    }

    /// 当前帧快照
    pub fn frame(&self) -> Frame<'_> {
        let page = self.script.page(self.index);
        Frame {
            background: self.stage.background_blend(),
            sprites: self.stage.sprite_blend(),
            dialogue: match self.mode {
                Mode::Backlog => None,
                _ => page.dialogue.as_ref(),
            },
            choices: match self.mode {
                Mode::Choosing => Some(ChoiceView {
                    options: &page.choices,
                    selected: self.choice_index,
                }),
                _ => None,
            },
            backlog: match self.mode {
                Mode::Backlog => Some(BacklogView {
                    entries: self.backlog.entries(),
                    offset: self.backlog_offset,
                }),
                _ => None,
            },
        }
    }

    /// 当前页索引
    pub fn page_index(&self) -> usize {
        self.index
    }

    /// 当前导航模式
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// 回看日志
    pub fn backlog(&self) -> &Backlog {
        &self.backlog
    }

    /// 脚本仓库
    pub fn script(&self) -> &Script {
        &self.script
    }

    fn advance_backlog(&mut self, event: InputEvent) {
        match event {
            InputEvent::ScrollOlder => {
                if self.backlog_offset + 1 < self.backlog.len() {
                    self.backlog_offset += 1;
                }
            }
            InputEvent::ScrollNewer => {
                self.backlog_offset = self.backlog_offset.saturating_sub(1);
            }
            // 回看遮蔽其余全部事件
            _ => {}
        }
    }

    fn advance_choosing(&mut self, event: InputEvent) -> Option<AudioCue> {
        let choice_count = self.script.page(self.index).choices.len();
        if choice_count == 0 {
            // 防御：只有带选项的页面才会进入选择模式
            self.mode = Mode::Reading;
            return None;
        }

        match event {
            InputEvent::Back => {
                // 取消选择并回到上一页，不跟随任何选项
                self.mode = Mode::Reading;
                self.previous_page()
            }
            InputEvent::ChoiceUp => {
                self.choice_index = self.choice_index.saturating_sub(1);
                None
            }
            InputEvent::ChoiceDown => {
                if self.choice_index + 1 < choice_count {
                    self.choice_index += 1;
                }
                None
            }
            InputEvent::ChoiceConfirm => {
                let dest = self.script.page(self.index).choices[self.choice_index].page;
                // 无论目标是否有效都回到阅读模式
                self.mode = Mode::Reading;
                if dest < self.script.len() {
                    self.enter_page(dest, true)
                } else {
                    None
                }
            }
            _ => None,
        }
    }

    fn advance_reading(&mut self, event: InputEvent) -> Option<AudioCue> {
        match event {
            InputEvent::Back => self.previous_page(),
            InputEvent::Advance => {
                if !self.script.page(self.index).choices.is_empty() {
                    self.mode = Mode::Choosing;
                    self.choice_index = 0;
                    None
                } else if self.index + 1 < self.script.len() {
                    self.enter_page(self.index + 1, true)
                } else {
                    // 末页：推进永远是 no-op
                    None
                }
            }
            _ => None,
        }
    }

    /// 回到上一页
    ///
    /// 重看已记录的页面：触发其音频提示，但**不**追加回看条目。
    /// 已在第 0 页时是 no-op。
    fn previous_page(&mut self) -> Option<AudioCue> {
        if self.index > 0 {
            self.enter_page(self.index - 1, false)
        } else {
            None
        }
    }

    /// 使目标页成为当前页
    ///
    /// 应用其舞台指令（幂等），`log_dialogue` 为真且页面携带对话时
    /// 追加回看条目，返回页面的音频提示。前进与后退共用此入口，
    /// 因此音频切换在两个方向上对称。
    fn enter_page(&mut self, index: usize, log_dialogue: bool) -> Option<AudioCue> {
        self.index = index;
        let page = self.script.page(index);
        if let Some(stage) = &page.stage {
            self.stage.apply(stage);
        }
        if log_dialogue {
            if let Some(dialogue) = &page.dialogue {
                self.backlog
                    .push(dialogue.speaker.clone(), dialogue.text.clone());
            }
        }
        page.audio.clone()
    }
}
