use super::*;

const OAM_SIZE: usize = 0xA0;

/// Cycles from power-on until VBlank starts: the opening HBlank, then 142
/// full lines.
const CYCLES_TO_VBLANK: u64 = 204 + 142 * 456;

fn run(gpu: &mut Gpu, cycles: u64, oam: &[u8]) {
    let now = gpu.last_cycles + cycles;
    gpu.update(now, oam);
}

fn idle(gpu: &mut Gpu, cycles: u64) {
    run(gpu, cycles, &[0; OAM_SIZE]);
}

/// Write a tile whose every pixel has palette index `index`.
fn fill_tile(gpu: &mut Gpu, base: u16, index: u8) {
    let low = if index & 1 != 0 { 0xFF } else { 0x00 };
    let high = if index & 2 != 0 { 0xFF } else { 0x00 };
    for row in 0..8 {
        gpu.write_vram(base + row * 2, low);
        gpu.write_vram(base + row * 2 + 1, high);
    }
}

/// LCD on, unsigned tile data, BG and sprites on, identity palettes.
fn display_on(gpu: &mut Gpu) {
    gpu.write_register(io::LCDC, 0x93);
    gpu.write_register(io::BGP, 0xE4);
    gpu.write_register(io::OBP0, 0xE4);
    gpu.write_register(io::OBP1, 0x1B);
}

fn sprite(oam: &mut [u8], index: usize, y: u8, x: u8, tile: u8, flags: u8) {
    oam[index * 4..index * 4 + 4].copy_from_slice(&[y, x, tile, flags]);
}

#[test]
fn palette_decodes_two_bits_per_index() {
    let identity = Palette::new(0xE4);
    for index in 0..4 {
        assert_eq!(identity.color(index), SHADES[index as usize]);
    }
    let reversed = Palette::new(0x1B);
    assert_eq!(reversed.color(0), SHADES[3]);
    assert_eq!(reversed.color(3), SHADES[0]);
    assert_eq!(reversed.register(), 0x1B);
}

#[test]
fn shades_are_argb() {
    assert_eq!(SHADES, [0xFFDDDDDD, 0xFFAAAAAA, 0xFF555555, 0xFF000000]);
}

#[test]
fn mode_sequence_within_a_line() {
    let mut gpu = Gpu::new();
    assert_eq!(gpu.mode(), Mode::HorizontalBlank);

    idle(&mut gpu, 203);
    assert_eq!(gpu.mode(), Mode::HorizontalBlank);
    assert_eq!(gpu.ly(), 0);

    idle(&mut gpu, 1);
    assert_eq!(gpu.mode(), Mode::ObjectAttributeMemory);
    assert_eq!(gpu.ly(), 1);

    idle(&mut gpu, 80);
    assert_eq!(gpu.mode(), Mode::VideoRam);

    idle(&mut gpu, 172);
    assert_eq!(gpu.mode(), Mode::HorizontalBlank);
    assert_eq!(gpu.ly(), 1);
}

#[test]
fn leftover_cycles_carry_across_modes() {
    let mut gpu = Gpu::new();
    // One call covers HBlank, OAM and 10 cycles of VRAM.
    idle(&mut gpu, 204 + 80 + 10);
    assert_eq!(gpu.mode(), Mode::VideoRam);
    idle(&mut gpu, 161);
    assert_eq!(gpu.mode(), Mode::VideoRam);
    idle(&mut gpu, 1);
    assert_eq!(gpu.mode(), Mode::HorizontalBlank);
}

#[test]
fn vblank_starts_on_line_143() {
    let mut gpu = Gpu::new();
    idle(&mut gpu, CYCLES_TO_VBLANK - 1);
    assert_eq!(gpu.ly(), 142);
    assert!(gpu.take_frame().is_none());
    assert!(!gpu.take_interrupts().contains(Interrupt::VBLANK));

    idle(&mut gpu, 1);
    assert_eq!(gpu.ly(), VBLANK_LINE);
    assert_eq!(gpu.mode(), Mode::VerticalBlank);
    assert!(gpu.take_interrupts().contains(Interrupt::VBLANK));

    let frame = gpu.take_frame().expect("frame at vblank");
    assert_eq!(frame.number(), 1);
    assert_eq!(frame.pixels().len(), Frame::WIDTH * Frame::HEIGHT);
    assert!(gpu.take_frame().is_none());
    assert_eq!(gpu.take_interrupts(), Interrupt::empty());
}

#[test]
fn vblank_lasts_until_line_153_then_wraps() {
    let mut gpu = Gpu::new();
    idle(&mut gpu, CYCLES_TO_VBLANK);

    idle(&mut gpu, 10 * 456);
    assert_eq!(gpu.ly(), LAST_LINE);
    assert_eq!(gpu.mode(), Mode::VerticalBlank);

    idle(&mut gpu, 456);
    assert_eq!(gpu.ly(), 0);
    assert_eq!(gpu.mode(), Mode::ObjectAttributeMemory);
}

#[test]
fn full_frame_is_70224_cycles() {
    let mut gpu = Gpu::new();
    idle(&mut gpu, CYCLES_TO_VBLANK);
    assert_eq!(gpu.take_frame().map(|f| f.number()), Some(1));

    idle(&mut gpu, 70224 - 1);
    assert!(gpu.take_frame().is_none());
    idle(&mut gpu, 1);
    assert_eq!(gpu.take_frame().map(|f| f.number()), Some(2));
    assert_eq!(gpu.frame_count(), 2);
}

#[test]
fn stat_interrupt_on_mode_entry() {
    let mut gpu = Gpu::new();
    gpu.write_register(io::STAT, StatFlags::OAM_INTERRUPT.bits());
    idle(&mut gpu, 204);
    assert_eq!(gpu.take_interrupts(), Interrupt::LCD_STAT);

    // Entering VRAM mode never raises STAT.
    idle(&mut gpu, 80);
    assert_eq!(gpu.take_interrupts(), Interrupt::empty());

    gpu.write_register(io::STAT, StatFlags::HBLANK_INTERRUPT.bits());
    idle(&mut gpu, 172);
    assert_eq!(gpu.take_interrupts(), Interrupt::LCD_STAT);
}

#[test]
fn stat_interrupt_on_vblank_entry() {
    let mut gpu = Gpu::new();
    gpu.write_register(io::STAT, StatFlags::VBLANK_INTERRUPT.bits());
    idle(&mut gpu, CYCLES_TO_VBLANK);
    assert_eq!(
        gpu.take_interrupts(),
        Interrupt::VBLANK | Interrupt::LCD_STAT
    );
}

#[test]
fn coincidence_tracks_ly_and_lyc() {
    let mut gpu = Gpu::new();
    // LY == LYC == 0 at power-on.
    assert_ne!(gpu.read_register(io::STAT) & 0x04, 0);

    gpu.write_register(io::STAT, StatFlags::COINCIDENCE_INTERRUPT.bits());
    gpu.write_register(io::LYC, 2);
    assert_eq!(gpu.read_register(io::STAT) & 0x04, 0);
    assert_eq!(gpu.take_interrupts(), Interrupt::empty());

    idle(&mut gpu, 204 + 456);
    assert_eq!(gpu.ly(), 2);
    assert_ne!(gpu.read_register(io::STAT) & 0x04, 0);
    assert_eq!(gpu.take_interrupts(), Interrupt::LCD_STAT);

    // Changing LYC to match re-checks immediately.
    gpu.write_register(io::LYC, 5);
    assert_eq!(gpu.read_register(io::STAT) & 0x04, 0);
    gpu.write_register(io::LYC, 2);
    assert_eq!(gpu.take_interrupts(), Interrupt::LCD_STAT);
}

#[test]
fn stat_register_layout() {
    let mut gpu = Gpu::new();
    gpu.write_register(io::LYC, 1);
    gpu.write_register(io::STAT, 0xFF);
    // Bit 7 reads high, bits 3-6 writable, mode and coincidence untouched.
    assert_eq!(gpu.read_register(io::STAT), 0xF8);

    idle(&mut gpu, 204);
    assert_eq!(gpu.read_register(io::STAT), 0xF8 | 0x04 | 0x02);
}

#[test]
fn ly_write_resets_line() {
    let mut gpu = Gpu::new();
    idle(&mut gpu, 204 + 456 * 5);
    assert_eq!(gpu.ly(), 6);
    gpu.write_register(io::LY, 0x99);
    assert_eq!(gpu.read_register(io::LY), 0);
}

#[test]
fn registers_read_back() {
    let mut gpu = Gpu::new();
    gpu.write_register(io::LCDC, 0x91);
    gpu.write_register(io::SCY, 0x12);
    gpu.write_register(io::SCX, 0x34);
    gpu.write_register(io::BGP, 0xFC);
    gpu.write_register(io::OBP1, 0x1B);
    assert_eq!(gpu.read_register(io::LCDC), 0x91);
    assert_eq!(gpu.scy(), 0x12);
    assert_eq!(gpu.scx(), 0x34);
    assert_eq!(gpu.read_register(io::BGP), 0xFC);
    assert_eq!(gpu.read_register(io::OBP1), 0x1B);
    assert!(gpu.lcdc().contains(LcdControl::LCD_ENABLE | LcdControl::BG_ENABLE));
}

#[test]
fn tile_cache_follows_vram_writes() {
    let mut gpu = Gpu::new();
    // Row 3 of tile 1.
    gpu.write_vram(0x8016, 0b1000_0001);
    gpu.write_vram(0x8017, 0b1000_0010);
    assert_eq!(gpu.tiles().tile(1)[3], [3, 0, 0, 0, 0, 0, 2, 1]);
    assert_eq!(gpu.read_vram(0x8016), 0b1000_0001);

    // Last tile in the cache.
    gpu.write_vram(0x97FE, 0xFF);
    assert_eq!(gpu.tiles().pixel(TILE_COUNT - 1, 7, 0), 1);

    // Tile maps are not tile data.
    gpu.write_vram(0x9800, 0xFF);
    assert_eq!(gpu.read_vram(0x9800), 0xFF);
}

#[test]
fn background_uses_map_and_palette() {
    let mut gpu = Gpu::new();
    display_on(&mut gpu);
    fill_tile(&mut gpu, 0x8010, 3);
    gpu.write_vram(0x9800, 1);

    gpu.render_scanline(&[0; OAM_SIZE]);
    let line = &gpu.framebuffer()[..SCREEN_WIDTH];
    assert!(line[..8].iter().all(|&p| p == SHADES[3]));
    assert!(line[8..].iter().all(|&p| p == SHADES[0]));
}

#[test]
fn background_scrolls() {
    let mut gpu = Gpu::new();
    display_on(&mut gpu);
    fill_tile(&mut gpu, 0x8010, 2);
    gpu.write_vram(0x9800, 1);
    gpu.write_register(io::SCX, 4);

    gpu.render_scanline(&[0; OAM_SIZE]);
    let line = &gpu.framebuffer()[..SCREEN_WIDTH];
    assert!(line[..4].iter().all(|&p| p == SHADES[2]));
    assert_eq!(line[4], SHADES[0]);

    // SCY moves to the next map row.
    gpu.write_register(io::SCX, 0);
    gpu.write_register(io::SCY, 8);
    gpu.render_scanline(&[0; OAM_SIZE]);
    assert_eq!(gpu.framebuffer()[0], SHADES[0]);
    gpu.write_vram(0x9820, 1);
    gpu.render_scanline(&[0; OAM_SIZE]);
    assert_eq!(gpu.framebuffer()[0], SHADES[2]);
}

#[test]
fn signed_tile_data_rebiases_low_ids() {
    let mut gpu = Gpu::new();
    display_on(&mut gpu);
    gpu.write_register(io::LCDC, 0x81);
    // Id 0 resolves to the tile at 0x9000.
    fill_tile(&mut gpu, 0x9000, 1);
    gpu.render_scanline(&[0; OAM_SIZE]);
    assert_eq!(gpu.framebuffer()[0], SHADES[1]);

    // Id 0x80 stays at 0x8800.
    fill_tile(&mut gpu, 0x8800, 3);
    gpu.write_vram(0x9800, 0x80);
    gpu.render_scanline(&[0; OAM_SIZE]);
    assert_eq!(gpu.framebuffer()[0], SHADES[3]);
}

#[test]
fn nothing_drawn_while_lcd_off() {
    let mut gpu = Gpu::new();
    gpu.write_register(io::LCDC, 0x11);
    gpu.write_register(io::BGP, 0xFF);
    gpu.render_scanline(&[0; OAM_SIZE]);
    assert!(gpu.framebuffer().iter().all(|&p| p == SHADES[0]));
}

#[test]
fn sprite_drawn_with_its_palette() {
    let mut gpu = Gpu::new();
    display_on(&mut gpu);
    fill_tile(&mut gpu, 0x8020, 1);
    let mut oam = [0; OAM_SIZE];
    sprite(&mut oam, 0, 16, 8 + 10, 2, 0);
    sprite(&mut oam, 1, 16, 8 + 20, 2, SpriteFlags::PALETTE.bits());

    gpu.render_scanline(&oam);
    let line = gpu.framebuffer();
    assert_eq!(line[9], SHADES[0]);
    assert!(line[10..18].iter().all(|&p| p == SHADES[1]));
    // OBP1 is reversed.
    assert!(line[20..28].iter().all(|&p| p == SHADES[2]));
}

#[test]
fn sprite_index_zero_is_transparent() {
    let mut gpu = Gpu::new();
    display_on(&mut gpu);
    fill_tile(&mut gpu, 0x8010, 2);
    gpu.write_vram(0x9800, 1);
    let mut oam = [0; OAM_SIZE];
    // Tile 0 is blank.
    sprite(&mut oam, 0, 16, 8, 0, 0);

    gpu.render_scanline(&oam);
    assert_eq!(gpu.framebuffer()[0], SHADES[2]);
}

#[test]
fn sprite_behind_background() {
    let mut gpu = Gpu::new();
    display_on(&mut gpu);
    fill_tile(&mut gpu, 0x8010, 2);
    fill_tile(&mut gpu, 0x8020, 3);
    gpu.write_vram(0x9800, 1);
    let mut oam = [0; OAM_SIZE];
    sprite(&mut oam, 0, 16, 8 + 4, 2, SpriteFlags::BEHIND_BG.bits());

    gpu.render_scanline(&oam);
    let line = gpu.framebuffer();
    // Over background index 2: hidden.
    assert_eq!(line[4], SHADES[2]);
    // Over background index 0: shown.
    assert_eq!(line[8], SHADES[3]);
}

#[test]
fn lower_oam_index_on_top() {
    let mut gpu = Gpu::new();
    display_on(&mut gpu);
    fill_tile(&mut gpu, 0x8010, 1);
    fill_tile(&mut gpu, 0x8020, 3);
    let mut oam = [0; OAM_SIZE];
    sprite(&mut oam, 0, 16, 8, 1, 0);
    sprite(&mut oam, 1, 16, 8 + 4, 2, 0);

    gpu.render_scanline(&oam);
    let line = gpu.framebuffer();
    assert_eq!(line[4], SHADES[1]);
    assert_eq!(line[8], SHADES[3]);
}

#[test]
fn at_most_ten_sprites_per_line() {
    let mut gpu = Gpu::new();
    display_on(&mut gpu);
    fill_tile(&mut gpu, 0x8010, 3);
    let mut oam = [0; OAM_SIZE];
    for i in 0..11 {
        sprite(&mut oam, i, 16, 8 + 10 * i as u8, 1, 0);
    }

    gpu.render_scanline(&oam);
    let line = gpu.framebuffer();
    assert_eq!(line[90], SHADES[3]);
    assert_eq!(line[100], SHADES[0]);
}

#[test]
fn sprite_flips() {
    let mut gpu = Gpu::new();
    display_on(&mut gpu);
    // Tile 1: only the top-left pixel set.
    gpu.write_vram(0x8010, 0x80);
    gpu.write_vram(0x8011, 0x80);
    let mut oam = [0; OAM_SIZE];
    sprite(&mut oam, 0, 16, 8, 1, SpriteFlags::FLIP_X.bits());
    gpu.render_scanline(&oam);
    assert_eq!(gpu.framebuffer()[0], SHADES[0]);
    assert_eq!(gpu.framebuffer()[7], SHADES[3]);

    // Flipped vertically, row 0 of the tile lands on the sprite's last line.
    let mut oam = [0; OAM_SIZE];
    sprite(&mut oam, 0, 16 - 7, 8, 1, SpriteFlags::FLIP_Y.bits());
    gpu.framebuffer.fill(SHADES[0]);
    gpu.render_scanline(&oam);
    assert_eq!(gpu.framebuffer()[0], SHADES[3]);
}

#[test]
fn tall_sprites_span_two_tiles() {
    let mut gpu = Gpu::new();
    display_on(&mut gpu);
    gpu.write_register(io::LCDC, 0x97);
    fill_tile(&mut gpu, 0x8020, 1);
    fill_tile(&mut gpu, 0x8030, 2);
    let mut oam = [0; OAM_SIZE];
    // Low bit of the tile number is ignored.
    sprite(&mut oam, 0, 16 - 8, 8, 3, 0);

    // LY 0 is row 8 of the sprite: the second tile.
    gpu.render_scanline(&oam);
    assert_eq!(gpu.framebuffer()[0], SHADES[2]);
}

#[test]
fn frame_converts_to_rgb24() {
    let mut gpu = Gpu::new();
    idle(&mut gpu, CYCLES_TO_VBLANK);
    let frame = gpu.take_frame().expect("frame");
    let rgb = frame.to_rgb24();
    assert_eq!(rgb.len(), Frame::WIDTH * Frame::HEIGHT * 3);
    assert_eq!(&rgb[..3], &[0xDD, 0xDD, 0xDD]);
    assert_eq!(frame.pixel(159, 143), SHADES[0]);
}

#[test]
fn reset_restores_power_on_state() {
    let mut gpu = Gpu::new();
    display_on(&mut gpu);
    fill_tile(&mut gpu, 0x8010, 3);
    idle(&mut gpu, CYCLES_TO_VBLANK);
    gpu.reset();

    assert_eq!(gpu.ly(), 0);
    assert_eq!(gpu.mode(), Mode::HorizontalBlank);
    assert_eq!(gpu.lcdc(), LcdControl::empty());
    assert_eq!(gpu.read_vram(0x8010), 0);
    assert_eq!(gpu.tiles().pixel(1, 0, 0), 0);
    assert!(gpu.take_frame().is_none());
    assert_eq!(gpu.frame_count(), 0);
    assert_eq!(gpu.take_interrupts(), Interrupt::empty());

    // Timing restarts from cycle 0.
    gpu.update(204, &[0; OAM_SIZE]);
    assert_eq!(gpu.ly(), 1);
}
