//! # Audio 模块
//!
//! 音频提示管理器，使用 rodio 库实现。
//! 支持 MP3, WAV, FLAC, OGG 格式。
//!
//! ## 功能特性
//!
//! - 提示句柄缓存：同一 cue 重访时回绕重放，不重新解码
//! - 循环背景音乐：任意时刻至多一个循环句柄处于活动状态
//! - 资源回收：被顶替的活动循环句柄完整释放，恰好一次
//! - 解码/打开失败记录日志并降级为静音，从不中断会话

use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use rodio::source::Buffered;
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};
use tracing::{debug, warn};

use novel_runtime::AudioCue;

/// 单个提示的播放句柄
///
/// 解码结果以可克隆的缓冲源保存，回绕重放只需重建 Sink 并
/// 重新挂上源的克隆，不触碰文件系统。
struct CueHandle {
    sink: Sink,
    source: Buffered<Decoder<BufReader<File>>>,
    looping: bool,
}

/// 音频提示管理器
///
/// 会话每次换页返回的 [`AudioCue`] 交由此处执行；
/// 管理器独占持有全部播放句柄，单线程访问。
pub struct CueManager {
    /// 音频输出流（必须保持存活）
    _stream: OutputStream,
    /// 音频输出句柄
    stream_handle: OutputStreamHandle,
    /// cue 文件名 → 播放句柄
    handles: HashMap<String, CueHandle>,
    /// 当前活动的循环 cue
    active_loop: Option<String>,
    /// 主音量 (0.0 - 1.0)
    volume: f32,
    /// 是否静音
    muted: bool,
    /// 资源基础路径
    base_path: PathBuf,
}

impl CueManager {
    /// 创建音频提示管理器
    ///
    /// 没有可用输出设备时返回错误；调用方可以降级为无声运行。
    pub fn new(base_path: impl Into<PathBuf>) -> Result<Self, rodio::StreamError> {
        let (stream, stream_handle) = OutputStream::try_default()?;
        Ok(Self {
            _stream: stream,
            stream_handle,
            handles: HashMap::new(),
            active_loop: None,
            volume: 1.0,
            muted: false,
            base_path: base_path.into(),
        })
    }

    /// 执行一条音频提示
    ///
    /// 空文件名是 no-op。已缓存的 cue 回绕重放；未缓存的同步
    /// 打开并解码，失败时记录日志并静音降级。
    pub fn play(&mut self, cue: &AudioCue) {
        if cue.file.is_empty() {
            return;
        }
        if self.handles.contains_key(&cue.file) {
            self.replay(cue);
        } else {
            self.open_and_play(cue);
        }
    }

    /// 回绕已缓存的 cue 并重新触发
    ///
    /// 循环标志以本次提示为准，缓存句柄随之更新。
    fn replay(&mut self, cue: &AudioCue) {
        // 先建新 Sink 再动缓存：失败时解码结果仍在缓存里
        let sink = match Sink::try_new(&self.stream_handle) {
            Ok(sink) => sink,
            Err(e) => {
                warn!(cue = %cue.file, error = %e, "重建播放器失败，本次提示静音");
                if let Some(handle) = self.handles.get(&cue.file) {
                    handle.sink.stop();
                }
                if self.active_loop.as_deref() == Some(cue.file.as_str()) {
                    self.active_loop = None;
                }
                return;
            }
        };

        let Some(mut handle) = self.handles.remove(&cue.file) else {
            return;
        };
        handle.sink.stop();
        handle.looping = cue.looping;

        sink.set_volume(self.effective_volume());
        if cue.looping {
            sink.append(handle.source.clone().repeat_infinite());
        } else {
            sink.append(handle.source.clone());
        }

        if cue.looping {
            // 顶替其他活动循环：重访的句柄还会再用，只暂停不释放
            if let Some(old) = self.active_loop.take() {
                if old != cue.file {
                    if let Some(displaced) = self.handles.get(&old) {
                        displaced.sink.pause();
                        debug!(cue = %old, "循环曲目被顶替，暂停保留");
                    }
                }
            }
            self.active_loop = Some(cue.file.clone());
        } else if self.active_loop.as_deref() == Some(cue.file.as_str()) {
            // 同一 cue 这次不循环：让出活动循环位
            self.active_loop = None;
        }

        sink.play();
        handle.sink = sink;
        self.handles.insert(cue.file.clone(), handle);
        debug!(cue = %cue.file, "回绕重放");
    }

    /// 打开、解码并播放一个新 cue
    fn open_and_play(&mut self, cue: &AudioCue) {
        let path = self.base_path.join(&cue.file);
        let file = match File::open(&path) {
            Ok(file) => file,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "音频文件打开失败，静音降级");
                return;
            }
        };
        let decoder = match Decoder::new(BufReader::new(file)) {
            Ok(decoder) => decoder,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "音频解码失败，静音降级");
                return;
            }
        };
        let source = decoder.buffered();

        let sink = match Sink::try_new(&self.stream_handle) {
            Ok(sink) => sink,
            Err(e) => {
                warn!(cue = %cue.file, error = %e, "创建播放器失败，静音降级");
                return;
            }
        };
        sink.set_volume(self.effective_volume());
        if cue.looping {
            sink.append(source.clone().repeat_infinite());
        } else {
            sink.append(source.clone());
        }

        if cue.looping {
            // 新循环曲目顶替活动循环：旧句柄完整释放，限制长会话的内存
            if let Some(old) = self.active_loop.take() {
                if old != cue.file {
                    self.discard(&old);
                }
            }
            self.active_loop = Some(cue.file.clone());
        }

        sink.play();
        self.handles.insert(
            cue.file.clone(),
            CueHandle {
                sink,
                source,
                looping: cue.looping,
            },
        );
        debug!(cue = %cue.file, looping = cue.looping, "开始播放");
    }

    /// 释放一个 cue 的句柄与解码资源
    ///
    /// 从缓存移除保证只释放一次；句柄 drop 即停止播放并归还资源，
    /// 释放不会失败，也不会阻塞导航。
    fn discard(&mut self, id: &str) {
        if let Some(handle) = self.handles.remove(id) {
            handle.sink.stop();
            debug!(cue = id, "释放被顶替的循环曲目");
        }
    }

    /// 设置主音量
    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
        self.apply_volume();
    }

    /// 主音量
    pub fn volume(&self) -> f32 {
        self.volume
    }

    /// 设置静音状态
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
        self.apply_volume();
    }

    /// 切换静音状态
    pub fn toggle_mute(&mut self) {
        self.set_muted(!self.muted);
    }

    /// 是否静音
    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// 当前活动的循环 cue
    pub fn active_loop(&self) -> Option<&str> {
        self.active_loop.as_deref()
    }

    /// cue 是否已缓存
    pub fn is_cached(&self, id: &str) -> bool {
        self.handles.contains_key(id)
    }

    /// 已缓存句柄数量
    pub fn cached_count(&self) -> usize {
        self.handles.len()
    }

    fn effective_volume(&self) -> f32 {
        if self.muted { 0.0 } else { self.volume }
    }

    fn apply_volume(&self) {
        let volume = self.effective_volume();
        for handle in self.handles.values() {
            handle.sink.set_volume(volume);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;

    fn cue(file: &str, looping: bool) -> AudioCue {
        AudioCue {
            file: file.to_string(),
            looping,
        }
    }

    /// 最小的合法 WAV：PCM 16-bit 单声道 8000 Hz，8 个静音采样
    fn write_wav(path: &Path) {
        let data_len: u32 = 16;
        let mut bytes = Vec::with_capacity(44 + data_len as usize);
        bytes.extend_from_slice(b"RIFF");
        bytes.extend_from_slice(&(36 + data_len).to_le_bytes());
        bytes.extend_from_slice(b"WAVE");
        bytes.extend_from_slice(b"fmt ");
        bytes.extend_from_slice(&16u32.to_le_bytes());
        bytes.extend_from_slice(&1u16.to_le_bytes());
        bytes.extend_from_slice(&1u16.to_le_bytes());
        bytes.extend_from_slice(&8000u32.to_le_bytes());
        bytes.extend_from_slice(&16000u32.to_le_bytes());
        bytes.extend_from_slice(&2u16.to_le_bytes());
        bytes.extend_from_slice(&16u16.to_le_bytes());
        bytes.extend_from_slice(b"data");
        bytes.extend_from_slice(&data_len.to_le_bytes());
        bytes.extend_from_slice(&[0u8; 16]);
        std::fs::write(path, bytes).unwrap();
    }

    // 注意：这些测试在没有音频设备的环境下会静默跳过

    #[test]
    fn test_empty_cue_is_noop() {
        if let Ok(mut manager) = CueManager::new("assets") {
            manager.play(&cue("", true));
            assert_eq!(manager.cached_count(), 0);
            assert!(manager.active_loop().is_none());
        }
    }

    #[test]
    fn test_missing_file_degrades_to_silence() {
        if let Ok(mut manager) = CueManager::new("assets") {
            manager.play(&cue("does-not-exist.mp3", true));
            // 打开失败：没有句柄缓存，也没有活动循环
            assert_eq!(manager.cached_count(), 0);
            assert!(manager.active_loop().is_none());
        }
    }

    #[test]
    fn test_volume_settings() {
        if let Ok(mut manager) = CueManager::new("assets") {
            manager.set_volume(0.5);
            assert_eq!(manager.volume(), 0.5);

            // 测试音量限制
            manager.set_volume(1.5);
            assert_eq!(manager.volume(), 1.0);
            manager.set_volume(-0.5);
            assert_eq!(manager.volume(), 0.0);
        }
    }

    #[test]
    fn test_new_loop_releases_displaced_loop_once() {
        let dir = tempfile::tempdir().unwrap();
        write_wav(&dir.path().join("a.wav"));
        write_wav(&dir.path().join("b.wav"));

        if let Ok(mut manager) = CueManager::new(dir.path()) {
            manager.play(&cue("a.wav", true));
            assert_eq!(manager.active_loop(), Some("a.wav"));
            assert_eq!(manager.cached_count(), 1);

            // 新的循环曲目顶替：旧句柄被完整释放，任意时刻至多一个循环
            manager.play(&cue("b.wav", true));
            assert_eq!(manager.active_loop(), Some("b.wav"));
            assert!(!manager.is_cached("a.wav"));
            assert_eq!(manager.cached_count(), 1);
        }
    }

    #[test]
    fn test_replaying_same_loop_keeps_single_handle() {
        let dir = tempfile::tempdir().unwrap();
        write_wav(&dir.path().join("bgm.wav"));

        if let Ok(mut manager) = CueManager::new(dir.path()) {
            manager.play(&cue("bgm.wav", true));
            manager.play(&cue("bgm.wav", true));

            assert_eq!(manager.active_loop(), Some("bgm.wav"));
            assert_eq!(manager.cached_count(), 1);
        }
    }

    #[test]
    fn test_replay_honors_current_loop_flag() {
        let dir = tempfile::tempdir().unwrap();
        write_wav(&dir.path().join("theme.wav"));

        if let Ok(mut manager) = CueManager::new(dir.path()) {
            manager.play(&cue("theme.wav", true));
            assert_eq!(manager.active_loop(), Some("theme.wav"));

            // 同一 cue 以非循环方式重访：让出活动循环位，句柄保留
            manager.play(&cue("theme.wav", false));
            assert!(manager.active_loop().is_none());
            assert_eq!(manager.cached_count(), 1);

            // 再以循环方式重访：重新占据活动循环位
            manager.play(&cue("theme.wav", true));
            assert_eq!(manager.active_loop(), Some("theme.wav"));
        }
    }

    #[test]
    fn test_mute_toggle() {
        if let Ok(mut manager) = CueManager::new("assets") {
            assert!(!manager.is_muted());
            manager.toggle_mute();
            assert!(manager.is_muted());
            manager.toggle_mute();
            assert!(!manager.is_muted());
        }
    }
}
