//! # Error 模块
//!
//! 定义 novel-runtime 中使用的错误类型。
//!
//! 注意：导航与过渡操作本身**不产生错误**——越界索引、末页推进等
//! 都是防御性 no-op。错误只出现在脚本装载阶段。

use thiserror::Error;

/// 脚本装载错误
#[derive(Error, Debug)]
pub enum ScriptError {
    /// JSON 解析失败
    #[error("脚本 JSON 解析失败: {0}")]
    Parse(#[from] serde_json::Error),

    /// 脚本为空
    ///
    /// 会话必须绑定到第 0 页，空脚本在启动时即为致命错误。
    #[error("脚本为空：没有可作为起点的页面")]
    Empty,
}

/// Result 类型别名
pub type ScriptResult<T> = Result<T, ScriptError>;
