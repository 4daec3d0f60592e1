//! 页式视觉小说引擎 - headless 驱动器
//!
//! 逐行读取命令，映射为语义化输入事件驱动会话，音频经 rodio 播放，
//! 画面以文本形式打印每帧快照（语义化绘制意图，不做像素操作）。

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing::warn;

use host::{CueManager, FrameInput, load_script};
use novel_runtime::{BackgroundLayer, Frame, InputEvent, Session};

/// 命令行参数
#[derive(Parser, Debug)]
#[command(name = "novel-host", about = "页式视觉小说 headless 驱动器")]
struct Args {
    /// 脚本 JSON 路径
    #[arg(default_value = "assets/scripts/demo.json")]
    script: PathBuf,

    /// 资源根目录（音频文件相对此目录解析）
    #[arg(long, default_value = "assets")]
    assets: PathBuf,

    /// 过渡推进帧率
    #[arg(long, default_value_t = 60)]
    fps: u32,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_target(false).init();
    let args = Args::parse();

    let script = load_script(&args.script)
        .with_context(|| format!("启动失败：{}", args.script.display()))?;

    // 无音频设备时降级为无声运行
    let mut audio = match CueManager::new(&args.assets) {
        Ok(manager) => Some(manager),
        Err(e) => {
            warn!(error = %e, "音频输出不可用，无声运行");
            None
        }
    };

    let mut session = Session::new(script);
    if let Some(cue) = session.begin() {
        if let Some(audio) = &mut audio {
            audio.play(&cue);
        }
    }

    let frame_duration = Duration::from_secs(1) / args.fps.max(1);
    let mut input = FrameInput::new();
    let stdin = io::stdin();

    settle(&mut session, frame_duration);
    print_frame(&session.frame());
    print_help();

    for line in stdin.lock().lines() {
        let line = line.context("读取输入失败")?;
        let command = line.trim();
        if command == "q" || command == "quit" {
            break;
        }
        if command == "m" {
            if let Some(audio) = &mut audio {
                audio.toggle_mute();
            }
            continue;
        }
        collect_events(command, &mut input);

        for event in input.drain() {
            if let Some(cue) = session.advance(event) {
                if let Some(audio) = &mut audio {
                    audio.play(&cue);
                }
            }
        }

        settle(&mut session, frame_duration);
        print_frame(&session.frame());
    }

    Ok(())
}

/// 把一行命令映射为输入事件
///
/// 推进的多个别名都走闩锁入口，同一行里写多个推进别名
/// 也只产生一个逻辑推进。
fn collect_events(command: &str, input: &mut FrameInput) {
    for word in command.split_whitespace() {
        match word {
            // 主推进的各个"物理"别名
            "n" | "next" | "enter" | "space" | "click" => input.trigger_advance(),
            "b" | "back" => input.push(InputEvent::Back),
            "l" | "log" => input.push(InputEvent::ToggleBacklog),
            "k" | "older" => input.push(InputEvent::ScrollOlder),
            "j" | "newer" => input.push(InputEvent::ScrollNewer),
            "u" | "up" => input.push(InputEvent::ChoiceUp),
            "d" | "down" => input.push(InputEvent::ChoiceDown),
            "c" | "confirm" => input.push(InputEvent::ChoiceConfirm),
            other => println!("  ? 未知命令: {other}"),
        }
    }
    if command.is_empty() {
        input.trigger_advance();
    }
}

/// 逐帧推进舞台过渡直至定格
fn settle(session: &mut Session, frame_duration: Duration) {
    while session.is_transitioning() {
        session.tick();
        thread::sleep(frame_duration);
    }
}

/// 打印一帧快照
fn print_frame(frame: &Frame<'_>) {
    println!("──────────────────────────────");
    println!(
        "背景: {} (混合比 {:.2}, 前景层 {})",
        layer_name(frame.background.current),
        frame.background.ratio,
        layer_name(frame.background.previous),
    );
    for sprite in frame.sprites.current {
        println!("立绘: {} @ {:?}", sprite.file, sprite.pos);
    }

    if let Some(backlog) = frame.backlog {
        println!("── 回看 (offset {}) ──", backlog.offset);
        if backlog.entries.is_empty() {
            println!("  (尚无对话)");
            return;
        }
        let newest = backlog.entries.len() - 1 - backlog.offset.min(backlog.entries.len() - 1);
        for entry in backlog.entries[..=newest].iter().rev().take(5) {
            println!("  {}: {}", entry.speaker, entry.text);
        }
        return;
    }

    if let Some(dialogue) = frame.dialogue {
        println!("{}: {}", dialogue.speaker, dialogue.text);
    }
    if let Some(choices) = frame.choices {
        for (i, option) in choices.options.iter().enumerate() {
            let cursor = if i == choices.selected { ">" } else { " " };
            println!(" {cursor} {}. {}", i + 1, option.text);
        }
    }
    let _ = io::stdout().flush();
}

fn layer_name(layer: BackgroundLayer<'_>) -> &str {
    match layer {
        BackgroundLayer::Black => "<黑场>",
        BackgroundLayer::Image(id) => id,
    }
}

fn print_help() {
    println!("[回车/n]推进 [b]后退 [l]回看 [k/j]滚动 [u/d/c]选择 [m]静音 [q]退出");
}
