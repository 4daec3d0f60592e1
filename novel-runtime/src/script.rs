//! # Script 模块
//!
//! 脚本数据模型与装载。
//!
//! 脚本是一个有序的"页"列表，每页可选地包含舞台指令、对话、
//! 音频提示和分支选项。页面在装载时解析一次，之后不可变，
//! 页索引在会话生命周期内保持稳定。
//!
//! 对话文本在装载时经过标记清洗（见 [`strip_markup`]），
//! 存入页面的已经是展示用文本。

use serde::{Deserialize, Serialize};

use crate::error::{ScriptError, ScriptResult};

/// 立绘位置
///
/// 脚本中的 `pos` 字段，未知取值一律落到 [`Position::Origin`]
/// （画面最左侧的绝对位置）。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Position {
    /// 左侧（屏宽 20% 处居中）
    Left,
    /// 中央
    Center,
    /// 右侧（屏宽 80% 处居中）
    Right,
    /// 绝对左端（默认 / 未知取值的回落）
    #[default]
    Origin,
}

impl From<String> for Position {
    fn from(value: String) -> Self {
        match value.as_str() {
            "left" => Self::Left,
            "center" => Self::Center,
            "right" => Self::Right,
            _ => Self::Origin,
        }
    }
}

/// 立绘描述
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpriteInfo {
    /// 逻辑标识（不参与舞台内容比较）
    #[serde(default)]
    pub id: String,
    /// 图像文件名
    pub file: String,
    /// 摆放位置
    #[serde(default)]
    pub pos: Position,
}

/// 舞台指令：背景与立绘集合，以及各自的淡入帧数
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageDirective {
    /// 背景标识（空字符串 = 不改变当前背景）
    #[serde(default)]
    pub bg: String,
    /// 有序立绘列表
    #[serde(default)]
    pub sprites: Vec<SpriteInfo>,
    /// 背景淡入总帧数（0 = 立即切换）
    #[serde(default, rename = "bgFade")]
    pub bg_fade: u32,
    /// 立绘淡入总帧数（0 = 立即切换）
    #[serde(default, rename = "spriteFade")]
    pub sprite_fade: u32,
}

/// 对话：说话者与清洗后的展示文本
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogueInfo {
    /// 说话者名（可为空字符串，表示旁白）
    #[serde(default)]
    pub speaker: String,
    /// 展示文本（装载后已经过 [`strip_markup`]）
    pub text: String,
}

/// 音频提示
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioCue {
    /// 音频文件名（空 = 无效提示，播放时 no-op）
    pub file: String,
    /// 是否作为循环背景音乐
    #[serde(default, rename = "loop")]
    pub looping: bool,
}

/// 分支选项
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceInfo {
    /// 展示文本
    pub text: String,
    /// 目标页索引（越界时确认为防御性 no-op）
    pub page: usize,
}

/// 脚本的单页
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    /// 舞台指令
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stage: Option<StageDirective>,
    /// 对话
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dialogue: Option<DialogueInfo>,
    /// 音频提示
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio: Option<AudioCue>,
    /// 分支选项（非空时推进事件进入选择模式）
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<ChoiceInfo>,
}

/// 脚本仓库：装载后不可变的有序页面序列
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Script {
    pages: Vec<Page>,
}

impl Script {
    /// 直接用页面列表构造脚本
    ///
    /// 调用方保证对话文本已清洗。主要用于测试与程序化构造。
    pub fn new(pages: Vec<Page>) -> Self {
        Self { pages }
    }

    /// 从 JSON 文本装载脚本
    ///
    /// 解析失败或页面列表为空返回错误；对话文本在此处统一清洗。
    pub fn from_json(text: &str) -> ScriptResult<Self> {
        let mut pages: Vec<Page> = serde_json::from_str(text)?;
        if pages.is_empty() {
            return Err(ScriptError::Empty);
        }
        for page in &mut pages {
            if let Some(dialogue) = &mut page.dialogue {
                dialogue.text = strip_markup(&dialogue.text);
            }
        }
        Ok(Self { pages })
    }

    /// 页面数量
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// 按索引取页
    pub fn get(&self, index: usize) -> Option<&Page> {
        self.pages.get(index)
    }

    /// 按索引取页（索引越界即 bug，脚本装载时已保证非空）
    pub fn page(&self, index: usize) -> &Page {
        &self.pages[index]
    }
}

/// 清洗对话文本中的标记
///
/// - 内嵌换行替换为单个空格
/// - 移除完整的尖括号标签（`<...>`，括号间至少一个字符）；
///   未配对的 `<` 与字面的 `<>` 按原文保留
/// - 去掉首尾空白
///
/// 该清洗是幂等的：`strip_markup(strip_markup(x)) == strip_markup(x)`。
pub fn strip_markup(src: &str) -> String {
    let flattened = src.replace('\n', " ");
    strip_tags(&flattened).trim().to_string()
}

/// 移除完整的尖括号标签
fn strip_tags(src: &str) -> String {
    let mut out = String::with_capacity(src.len());
    let mut rest = src;
    while let Some(open) = rest.find('<') {
        out.push_str(&rest[..open]);
        let tail = &rest[open + 1..];
        match tail.find('>') {
            // 完整标签，括号间非空：整体丢弃
            Some(close) if close > 0 => rest = &tail[close + 1..],
            // 未配对的 '<' 或 '<>'：按字面保留，继续扫描余下文本
            _ => {
                out.push('<');
                rest = tail;
            }
        }
    }
    out.push_str(rest);
    out
}
