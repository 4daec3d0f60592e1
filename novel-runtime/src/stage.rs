//! # Stage 模块
//!
//! 舞台过渡引擎：按帧计数驱动背景与立绘集合的交叉淡入。
//!
//! ## 执行模型
//!
//! - [`StageTransition::apply`]：页面进入时提交舞台指令，与当前展示内容
//!   比较后决定是否开启新过渡（相同内容为 no-op）
//! - [`StageTransition::tick`]：每渲染帧调用一次，两个通道各自推进
//!   至多 1 帧并在各自总帧数处钳制
//! - [`StageTransition::background_blend`] / [`StageTransition::sprite_blend`]：
//!   纯读，供呈现层取当前混合结果
//!
//! ## 不变量
//!
//! - 每通道恒有 `elapsed <= total`；`total == 0` 表示已定格（无混合）
//! - 每通道同时在途的过渡至多一个；中途到达的新指令直接以被打断
//!   过渡的目标内容作为新的 "previous" 重新开始（接受的简化，
//!   不追求中断瞬间的逐位混合还原）
//! - 没有背景时不跳过图层，而是用一块纯黑图层参与混合：
//!   "从无到有" 表现为从黑场淡入而非硬切

use crate::script::{SpriteInfo, StageDirective};

/// 背景图层
///
/// `Black` 表示"尚无背景"的隐式黑场图层。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackgroundLayer<'a> {
    /// 纯黑图层
    Black,
    /// 背景图像标识
    Image(&'a str),
}

/// 背景混合快照
///
/// 呈现层以 `1 - ratio` 的不透明度画 `previous`、以 `ratio` 画
/// `current`。定格状态下 `ratio == 1`，即只有 `current` 完全不透明。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackgroundBlend<'a> {
    /// 前一背景图层
    pub previous: BackgroundLayer<'a>,
    /// 当前背景图层
    pub current: BackgroundLayer<'a>,
    /// 混合比（0.0 ..= 1.0）
    pub ratio: f32,
}

/// 立绘混合快照
///
/// 两份完整的有序立绘列表，互补不透明度 `1 - ratio` / `ratio`。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpriteBlend<'a> {
    /// 前一立绘集合
    pub previous: &'a [SpriteInfo],
    /// 当前立绘集合
    pub current: &'a [SpriteInfo],
    /// 混合比（0.0 ..= 1.0）
    pub ratio: f32,
}

/// 舞台过渡引擎
#[derive(Debug, Clone, Default)]
pub struct StageTransition {
    current_bg: Option<String>,
    previous_bg: Option<String>,
    bg_total: u32,
    bg_elapsed: u32,

    current_sprites: Vec<SpriteInfo>,
    previous_sprites: Vec<SpriteInfo>,
    sprite_total: u32,
    sprite_elapsed: u32,
}

impl StageTransition {
    /// 创建初始引擎：黑场、无立绘、两通道均已定格
    pub fn new() -> Self {
        Self::default()
    }

    /// 提交舞台指令
    ///
    /// 背景标识与立绘集合内容分别和当前展示值比较，不同的通道才开启
    /// 新过渡；淡入帧数为 0 的变化立即生效（previous 清空，无混合）。
    /// 与当前内容相同的指令是幂等 no-op，不会重启已定格的过渡。
    /// 立绘集合的内容相等定义为 `(file, pos)` 对的有序列表相等，
    /// `id` 不参与比较。
    pub fn apply(&mut self, stage: &StageDirective) {
        if !stage.bg.is_empty() && self.current_bg.as_deref() != Some(stage.bg.as_str()) {
            if stage.bg_fade > 0 {
                self.previous_bg = self.current_bg.take();
                self.bg_total = stage.bg_fade;
            } else {
                self.previous_bg = None;
                self.bg_total = 0;
            }
            self.bg_elapsed = 0;
            self.current_bg = Some(stage.bg.clone());
        }

        if !sprites_equal(&stage.sprites, &self.current_sprites) {
            if stage.sprite_fade > 0 {
                self.previous_sprites =
                    std::mem::replace(&mut self.current_sprites, stage.sprites.clone());
                self.sprite_total = stage.sprite_fade;
            } else {
                self.previous_sprites.clear();
                self.current_sprites = stage.sprites.clone();
                self.sprite_total = 0;
            }
            self.sprite_elapsed = 0;
        }
    }

    /// 推进一帧
    ///
    /// 两通道独立推进，各自在总帧数处钳制，不会回退或越界。
    pub fn tick(&mut self) {
        if self.bg_elapsed < self.bg_total {
            self.bg_elapsed += 1;
        }
        if self.sprite_elapsed < self.sprite_total {
            self.sprite_elapsed += 1;
        }
    }

    /// 两通道是否都已定格
    pub fn is_settled(&self) -> bool {
        self.bg_elapsed >= self.bg_total && self.sprite_elapsed >= self.sprite_total
    }

    /// 当前背景混合快照
    pub fn background_blend(&self) -> BackgroundBlend<'_> {
        BackgroundBlend {
            previous: layer(&self.previous_bg),
            current: layer(&self.current_bg),
            ratio: ratio(self.bg_elapsed, self.bg_total),
        }
    }

    /// 当前立绘混合快照
    pub fn sprite_blend(&self) -> SpriteBlend<'_> {
        SpriteBlend {
            previous: &self.previous_sprites,
            current: &self.current_sprites,
            ratio: ratio(self.sprite_elapsed, self.sprite_total),
        }
    }
}

fn layer(bg: &Option<String>) -> BackgroundLayer<'_> {
    match bg {
        Some(id) => BackgroundLayer::Image(id),
        None => BackgroundLayer::Black,
    }
}

fn ratio(elapsed: u32, total: u32) -> f32 {
    if total == 0 {
        1.0
    } else {
        elapsed as f32 / total as f32
    }
}

/// 立绘集合内容相等：有序的 (file, pos) 对逐一相同
fn sprites_equal(a: &[SpriteInfo], b: &[SpriteInfo]) -> bool {
    a.len() == b.len()
        && a.iter()
            .zip(b)
            .all(|(x, y)| x.file == y.file && x.pos == y.pos)
}
