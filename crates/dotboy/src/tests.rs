use dotboy_common::key::Key;

use super::*;

const SCREEN_BYTES: usize = SCREEN_WIDTH * SCREEN_HEIGHT * 3;

/// JR -2 at the entry point. The LCD is on after reset, so the blank
/// background is drawn in the lightest shade.
fn spinning_rom() -> Vec<u8> {
    let mut rom = vec![0u8; 0x8000];
    rom[0x0100] = 0x18;
    rom[0x0101] = 0xFE;
    rom
}

#[derive(Default)]
struct CountingApp {
    updates: u32,
    exit_after: u32,
    exited: bool,
}

impl App for CountingApp {
    fn init(&mut self) {}

    fn update(&mut self, screen: &mut [u8]) {
        self.updates += 1;
        screen.fill(self.updates as u8);
    }

    fn handle_key_event(&mut self, _key: Key, _is_down: bool) {}

    fn should_exit(&self) -> bool {
        self.exit_after != 0 && self.updates >= self.exit_after
    }

    fn exit(&mut self) {
        self.exited = true;
    }

    fn width(&self) -> u32 {
        2
    }

    fn height(&self) -> u32 {
        2
    }

    fn scale(&self) -> u32 {
        1
    }

    fn title(&self) -> String {
        "counting".to_string()
    }
}

fn info(frames: u64) -> HeadlessInitInfo {
    HeadlessInitInfo::builder()
        .width(2)
        .height(2)
        .title("counting".to_string())
        .frames(frames)
        .build()
}

#[test]
fn headless_runs_requested_frames() {
    let screen = HeadlessContext::run(info(5), CountingApp::default()).unwrap();
    assert_eq!(screen, vec![5u8; 12]);
}

#[test]
fn headless_honours_exit_request() {
    let app = CountingApp {
        exit_after: 3,
        ..CountingApp::default()
    };
    let screen = HeadlessContext::run(info(100), app).unwrap();
    assert_eq!(screen, vec![3u8; 12]);
}

#[test]
fn upscale_repeats_pixels() {
    // 2x1: red, blue
    let src = [255, 0, 0, 0, 0, 255];
    let out = upscale_rgb24(&src, 2, 1, 2);
    let red = [255, 0, 0];
    let blue = [0, 0, 255];
    let row = [red, red, blue, blue].concat();
    assert_eq!(out, [row.clone(), row].concat());
    assert_eq!(upscale_rgb24(&src, 2, 1, 1), src.to_vec());
    assert_eq!(upscale_rgb24(&src, 2, 1, 0), src.to_vec());
}

#[test]
fn gameboy_run_draws_blank_background() {
    let screen = run_gameboy(&spinning_rom(), 2, 1, None).unwrap();
    assert_eq!(screen.len(), SCREEN_BYTES);
    assert!(screen.iter().all(|&byte| byte == 0xDD));
}

#[test]
fn gameboy_run_writes_scaled_dump() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("frame.rgb");
    let screen = run_gameboy(&spinning_rom(), 1, 2, Some(&path)).unwrap();
    let written = std::fs::read(&path).unwrap();
    assert_eq!(written.len(), SCREEN_BYTES * 4);
    assert_eq!(written, screen);
}

#[test]
fn threaded_run_matches_inline_run() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("threaded.rgb");
    let threaded = run_threaded(&spinning_rom(), 3, 1, Some(&path)).unwrap();
    let inline = run_gameboy(&spinning_rom(), 3, 1, None).unwrap();
    assert_eq!(threaded, inline);
    assert_eq!(std::fs::read(&path).unwrap(), threaded);
}

#[test]
fn empty_rom_is_rejected() {
    let err = run_gameboy(&[], 1, 1, None).unwrap_err();
    assert!(err.to_string().contains("failed to load"));
}

#[test]
fn dump_to_missing_directory_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("frame.rgb");
    let err = run_gameboy(&spinning_rom(), 1, 1, Some(&path)).unwrap_err();
    assert!(err.to_string().contains("frame dump"));
}
