use std::path::PathBuf;

use anyhow::Context;

const USAGE: &str = "usage: dotboy <rom.gb> [frames] [out.rgb] [--threaded] [--scale=N]";

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut threaded = false;
    let mut scale = 1;
    let mut positional = Vec::new();
    for arg in std::env::args().skip(1) {
        if arg == "--threaded" {
            threaded = true;
        } else if let Some(value) = arg.strip_prefix("--scale=") {
            scale = value.parse().unwrap_or_else(|_| {
                eprintln!("Invalid scale '{}'.\n{}", value, USAGE);
                std::process::exit(1);
            });
        } else {
            positional.push(arg);
        }
    }

    let mut positional = positional.into_iter();
    let Some(rom_path) = positional.next() else {
        eprintln!(
            "No ROM path provided.\n\
             Please specify a path, for example:\n\
             dotboy path/to/your.gb 120 frame.rgb"
        );
        std::process::exit(1);
    };
    let frames = match positional.next() {
        Some(frames) => frames.parse().unwrap_or_else(|_| {
            eprintln!("Invalid frame count '{}'.\n{}", frames, USAGE);
            std::process::exit(1);
        }),
        None => 60,
    };
    let out = positional.next().map(PathBuf::from);

    log::info!("Playing ROM path: '{}'", rom_path);
    let rom = std::fs::read(&rom_path)
        .with_context(|| format!("failed to read ROM file '{}'", rom_path))?;

    if threaded {
        dotboy::run_threaded(&rom, frames, scale, out.as_deref())?;
    } else {
        dotboy::run_gameboy(&rom, frames, scale, out.as_deref())?;
    }
    Ok(())
}
