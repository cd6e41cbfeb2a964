use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use typed_builder::TypedBuilder;

use dotboy_common::app::App;
use dotboy_gb::runner::{RunConfig, Runner};
use dotboy_gb::{GameBoy, GameBoyApp, SCREEN_HEIGHT, SCREEN_WIDTH};

#[derive(Debug, Clone, TypedBuilder)]
pub struct HeadlessInitInfo {
    pub width: u32,
    pub height: u32,
    /// Integer upscale applied to the returned picture.
    #[builder(default = 1)]
    pub scale: u32,
    pub title: String,
    #[builder(default = 60)]
    pub frames: u64,
}

/// Drives an [`App`] without a window, for dumps and smoke runs.
pub struct HeadlessContext;

impl HeadlessContext {
    /// Run `info.frames` updates (or until the app asks to exit) and return
    /// the last screen as RGB24, scaled by `info.scale`.
    pub fn run(info: HeadlessInitInfo, mut app: impl App) -> Result<Vec<u8>> {
        let HeadlessInitInfo {
            width,
            height,
            scale,
            title,
            frames,
        } = info;
        log::info!("{title}: running {frames} frames headless");

        let mut screen = vec![0u8; (width * height * 3) as usize];
        app.init();
        for _ in 0..frames {
            if app.should_exit() {
                break;
            }
            app.update(&mut screen);
        }
        app.exit();

        Ok(upscale_rgb24(&screen, width as usize, height as usize, scale))
    }
}

/// Nearest-neighbour integer upscale of an RGB24 picture.
pub fn upscale_rgb24(src: &[u8], width: usize, height: usize, scale: u32) -> Vec<u8> {
    let scale = scale.max(1) as usize;
    if scale == 1 {
        return src.to_vec();
    }
    let mut out = Vec::with_capacity(src.len() * scale * scale);
    for row in src.chunks_exact(width * 3).take(height) {
        let mut scaled = Vec::with_capacity(row.len() * scale);
        for pixel in row.chunks_exact(3) {
            for _ in 0..scale {
                scaled.extend_from_slice(pixel);
            }
        }
        for _ in 0..scale {
            out.extend_from_slice(&scaled);
        }
    }
    out
}

fn write_dump(out: &Path, screen: &[u8]) -> Result<()> {
    std::fs::write(out, screen)
        .with_context(|| format!("failed to write frame dump to {}", out.display()))?;
    log::info!("wrote {} bytes to {}", screen.len(), out.display());
    Ok(())
}

fn load(rom_data: &[u8]) -> Result<GameBoy> {
    let mut gb = GameBoy::new();
    gb.load_rom(rom_data).context("failed to load Game Boy ROM")?;
    Ok(gb)
}

/// Run the ROM on the calling thread through [`GameBoyApp`].
pub fn run_gameboy(
    rom_data: &[u8],
    frames: u64,
    scale: u32,
    out: Option<&Path>,
) -> Result<Vec<u8>> {
    let app = GameBoyApp::new(load(rom_data)?);
    let init_info = HeadlessInitInfo::builder()
        .width(app.width())
        .height(app.height())
        .scale(scale)
        .title(app.title())
        .frames(frames)
        .build();
    let screen = HeadlessContext::run(init_info, app)?;
    if let Some(out) = out {
        write_dump(out, &screen)?;
    }
    Ok(screen)
}

/// Run the ROM on a worker thread and keep the last frame it delivers.
pub fn run_threaded(
    rom_data: &[u8],
    frames: u64,
    scale: u32,
    out: Option<&Path>,
) -> Result<Vec<u8>> {
    let config = RunConfig::builder().max_frames(Some(frames)).build();
    let handle = Runner::spawn(load(rom_data)?, config)?;

    let mut last = None;
    while let Some(frame) = handle.recv_timeout(Duration::from_secs(1)) {
        last = Some(frame);
    }
    let gb = handle.join()?;
    log::info!(
        "threaded run finished at frame {} pc=0x{:04X}",
        gb.gpu().frame_count(),
        gb.cpu.regs.pc
    );

    let screen = match last {
        Some(frame) => frame.to_rgb24(),
        None => {
            log::warn!("no frame was delivered");
            vec![0u8; SCREEN_WIDTH * SCREEN_HEIGHT * 3]
        }
    };
    let screen = upscale_rgb24(&screen, SCREEN_WIDTH, SCREEN_HEIGHT, scale);
    if let Some(out) = out {
        write_dump(out, &screen)?;
    }
    Ok(screen)
}

#[cfg(test)]
mod tests;
