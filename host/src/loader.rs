//! # Loader 模块
//!
//! 脚本文件装载：读文件 + 交给 `novel-runtime` 解析。
//! 装载失败在启动阶段是致命的（没有可开始的页面），
//! 由二进制入口决定如何呈现错误。

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

use novel_runtime::{Script, ScriptError};

/// 脚本装载错误
#[derive(Error, Debug)]
pub enum LoadError {
    /// 文件读取失败
    #[error("无法读取脚本文件 {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// 脚本内容无效
    #[error(transparent)]
    Script(#[from] ScriptError),
}

/// 从路径装载脚本
pub fn load_script(path: &Path) -> Result<Script, LoadError> {
    let text = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let script = Script::from_json(&text)?;
    info!(path = %path.display(), pages = script.len(), "脚本装载完成");
    Ok(script)
}
