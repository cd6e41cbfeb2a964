use super::*;
use crate::gpu::SHADES;
use crate::machine::{Button, ROM_SIZE};

fn app_with(program: &[u8]) -> GameBoyApp {
    let mut rom = vec![0; ROM_SIZE];
    rom[0x0100..0x0100 + program.len()].copy_from_slice(program);
    let mut gb = GameBoy::new();
    gb.load_rom(&rom).expect("load ROM");
    GameBoyApp::new(gb)
}

fn screen() -> Vec<u8> {
    vec![0u8; SCREEN_WIDTH * SCREEN_HEIGHT * 3]
}

#[test]
fn update_draws_frame() {
    let mut app = app_with(&[0x18, 0xFE]);
    let mut screen = screen();
    app.init();
    app.update(&mut screen);
    assert_eq!(app.frames_shown(), 1);
    let [_, r, g, b] = SHADES[0].to_be_bytes();
    assert_eq!(&screen[..3], &[r, g, b]);
}

#[test]
fn locked_cpu_keeps_last_picture() {
    let mut app = app_with(&[0xDD]);
    let mut screen = vec![0x42u8; SCREEN_WIDTH * SCREEN_HEIGHT * 3];
    app.update(&mut screen);
    app.update(&mut screen);
    assert_eq!(app.frames_shown(), 0);
    assert!(screen.iter().all(|&byte| byte == 0x42));
}

#[test]
fn escape_requests_exit() {
    let mut app = app_with(&[0x18, 0xFE]);
    app.handle_key_event(Key::Escape, false);
    assert!(!app.should_exit());
    app.handle_key_event(Key::Escape, true);
    assert!(app.should_exit());
}

#[test]
fn keys_reach_joypad() {
    let mut app = app_with(&[0x18, 0xFE]);
    app.handle_key_event(Key::Z, true);
    assert!(app.gb.bus().joypad.is_pressed(Button::A));
    app.handle_key_event(Key::Z, false);
    assert!(!app.gb.bus().joypad.is_pressed(Button::A));
}

#[test]
fn reports_screen_geometry() {
    let app = GameBoyApp::default();
    assert_eq!((app.width(), app.height()), (160, 144));
    assert_eq!(app.scale(), SCREEN_SCALE);
    assert_eq!(app.title(), "dotboy");
}
