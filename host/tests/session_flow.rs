//! # 会话流程集成测试
//!
//! 从脚本文件装载到分支导航的完整链路。
//! 这些测试不依赖真实的音频设备。

use std::io::Write;

use host::load_script;
use novel_runtime::{InputEvent, Mode, Session};

/// 三页分支脚本：第 1 页的两个选项分别指向第 0 页和第 2 页
const BRANCHING_SCRIPT: &str = r#"[
    {
        "stage": { "bg": "street.png", "bgFade": 2 },
        "dialogue": { "speaker": "A", "text": "<b>第一页</b>" },
        "audio": { "file": "bgm/town.mp3", "loop": true }
    },
    {
        "dialogue": { "speaker": "B", "text": "往哪边走？" },
        "choices": [
            { "text": "回去", "page": 0 },
            { "text": "继续", "page": 2 }
        ]
    },
    {
        "stage": { "bg": "forest.png", "bgFade": 3 },
        "dialogue": { "speaker": "C", "text": "第三页" }
    }
]"#;

fn load_branching() -> Session {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(BRANCHING_SCRIPT.as_bytes()).unwrap();
    let script = load_script(file.path()).unwrap();
    let mut session = Session::new(script);
    session.begin();
    session
}

#[test]
fn test_full_branching_walkthrough() {
    let mut session = load_branching();

    // 开场：第 0 页，标记已清洗
    assert_eq!(session.page_index(), 0);
    assert_eq!(session.frame().dialogue.unwrap().text, "第一页");
    assert_eq!(session.backlog().len(), 1);

    // 推进到分支页并进入选择模式
    session.advance(InputEvent::Advance);
    assert_eq!(session.page_index(), 1);
    session.advance(InputEvent::Advance);
    assert_eq!(session.mode(), Mode::Choosing);

    // 选第二个选项 → 第 2 页，回到阅读模式
    session.advance(InputEvent::ChoiceDown);
    session.advance(InputEvent::ChoiceConfirm);
    assert_eq!(session.page_index(), 2);
    assert_eq!(session.mode(), Mode::Reading);
    assert_eq!(session.backlog().len(), 3);

    // 后退回到分支页：阅读模式，不重复记录
    session.advance(InputEvent::Back);
    assert_eq!(session.page_index(), 1);
    assert_eq!(session.mode(), Mode::Reading);
    assert_eq!(session.backlog().len(), 3);
}

#[test]
fn test_transitions_settle_after_total_frames() {
    let mut session = load_branching();

    // 第 0 页的背景淡入共 2 帧
    assert!(session.is_transitioning());
    session.tick();
    session.tick();
    assert!(!session.is_transitioning());
    assert_eq!(session.frame().background.ratio, 1.0);

    // 跳到第 2 页：新背景开启 3 帧淡入
    session.advance(InputEvent::Advance);
    session.advance(InputEvent::Advance);
    session.advance(InputEvent::ChoiceDown);
    session.advance(InputEvent::ChoiceConfirm);
    assert!(session.is_transitioning());
    for _ in 0..3 {
        session.tick();
    }
    assert!(!session.is_transitioning());
}

#[test]
fn test_cue_emitted_for_navigation_both_directions() {
    let mut session = load_branching();

    session.advance(InputEvent::Advance);
    // 第 1 页没有 cue
    // 后退回到第 0 页：对称地触发其循环 bgm
    let cue = session.advance(InputEvent::Back).unwrap();
    assert_eq!(cue.file, "bgm/town.mp3");
    assert!(cue.looping);
}

#[test]
fn test_backlog_view_through_public_api() {
    let mut session = load_branching();
    session.advance(InputEvent::Advance);

    session.advance(InputEvent::ToggleBacklog);
    let frame = session.frame();
    let view = frame.backlog.unwrap();
    assert_eq!(view.entries.len(), 2);
    assert_eq!(view.offset, 0);
    assert!(frame.dialogue.is_none());

    session.advance(InputEvent::ToggleBacklog);
    assert_eq!(session.mode(), Mode::Reading);
}
