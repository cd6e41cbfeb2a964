use std::time::Duration;

use super::*;
use crate::machine::ROM_SIZE;

const TIMEOUT: Duration = Duration::from_secs(5);

fn machine_with(program: &[u8]) -> GameBoy {
    let mut rom = vec![0; ROM_SIZE];
    rom[0x0100..0x0100 + program.len()].copy_from_slice(program);
    let mut gb = GameBoy::new();
    gb.load_rom(&rom).expect("load ROM");
    gb
}

/// JR -2 forever.
fn spinning() -> GameBoy {
    machine_with(&[0x18, 0xFE])
}

#[test]
fn config_defaults() {
    let config = RunConfig::default();
    assert_eq!(config.max_frames, None);
    assert_eq!(config.frame_capacity, 2);
    assert_eq!(config.log_every, 60);
}

#[test]
fn stops_at_frame_limit() {
    let config = RunConfig::builder()
        .max_frames(Some(3))
        .frame_capacity(8)
        .build();
    let handle = Runner::spawn(spinning(), config).unwrap();
    let gb = handle.wait().unwrap();
    assert_eq!(gb.gpu().frame_count(), 3);
}

#[test]
fn frames_arrive_in_order() {
    let config = RunConfig::builder()
        .max_frames(Some(4))
        .frame_capacity(8)
        .build();
    let handle = Runner::spawn(spinning(), config).unwrap();
    let numbers: Vec<u64> = handle.frames().map(|frame| frame.number()).collect();
    assert_eq!(numbers, vec![1, 2, 3, 4]);
    handle.wait().unwrap();
}

#[test]
fn slow_observer_loses_frames() {
    let config = RunConfig::builder()
        .max_frames(Some(5))
        .frame_capacity(1)
        .build();
    let handle = Runner::spawn(spinning(), config).unwrap();
    // Nothing is read until the worker is done, so only the first frame fits.
    while !handle.is_finished() {
        std::thread::sleep(Duration::from_millis(1));
    }
    let numbers: Vec<u64> = handle.frames().map(|frame| frame.number()).collect();
    assert_eq!(numbers, vec![1]);
    let gb = handle.wait().unwrap();
    assert_eq!(gb.gpu().frame_count(), 5);
}

#[test]
fn stop_returns_machine() {
    let handle = Runner::spawn(spinning(), RunConfig::default()).unwrap();
    assert!(handle.recv_timeout(TIMEOUT).is_some());
    let gb = handle.join().unwrap();
    assert!(gb.gpu().frame_count() >= 1);
    assert_eq!(gb.cpu.regs.pc, 0x0100);
}

#[test]
fn input_reaches_machine() {
    let handle = Runner::spawn(spinning(), RunConfig::default()).unwrap();
    handle.press(Button::Start, true);
    handle.press(Button::Left, true);
    handle.press(Button::Left, false);
    let gb = handle.join().unwrap();
    assert!(gb.bus().joypad.is_pressed(Button::Start));
    assert!(!gb.bus().joypad.is_pressed(Button::Left));
}

#[test]
fn locked_cpu_ends_run() {
    let handle = Runner::spawn(machine_with(&[0xDD]), RunConfig::default()).unwrap();
    let gb = handle.wait().unwrap();
    assert!(gb.cpu.is_locked());
    assert_eq!(gb.gpu().frame_count(), 0);
}

#[test]
fn button_wakes_stopped_worker() {
    // STOP; JR -2
    let config = RunConfig::builder().max_frames(Some(1)).build();
    let handle = Runner::spawn(machine_with(&[0x10, 0x00, 0x18, 0xFE]), config).unwrap();

    // A press that lands before STOP executes does not wake it, so keep
    // toggling until a frame shows up.
    let mut frame = None;
    for _ in 0..100 {
        handle.press(Button::A, true);
        handle.press(Button::A, false);
        frame = handle.recv_timeout(Duration::from_millis(50));
        if frame.is_some() {
            break;
        }
    }
    assert_eq!(frame.map(|frame| frame.number()), Some(1));

    let gb = handle.wait().unwrap();
    assert!(!gb.cpu.is_stopped());
}
