use bitflags::bitflags;

use super::{Gpu, LcdControl, SHADES};
use crate::SCREEN_WIDTH;

const SPRITE_COUNT: usize = 40;
const MAX_SPRITES_PER_LINE: usize = 10;

bitflags! {
    /// Byte 3 of an OAM entry.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct SpriteFlags: u8 {
        /// Hidden behind non-zero background pixels.
        const BEHIND_BG = 1 << 7;
        const FLIP_Y = 1 << 6;
        const FLIP_X = 1 << 5;
        /// OBP1 instead of OBP0.
        const PALETTE = 1 << 4;
    }
}

#[derive(Clone, Copy, Debug)]
struct Sprite {
    y: i16,
    x: i16,
    tile: u8,
    flags: SpriteFlags,
}

impl Sprite {
    fn from_oam(entry: &[u8]) -> Self {
        Self {
            y: entry[0] as i16 - 16,
            x: entry[1] as i16 - 8,
            tile: entry[2],
            flags: SpriteFlags::from_bits_truncate(entry[3]),
        }
    }
}

impl Gpu {
    /// Draw line LY into the framebuffer.
    pub(super) fn render_scanline(&mut self, oam: &[u8]) {
        if !self.lcdc.contains(LcdControl::LCD_ENABLE) {
            return;
        }
        let ly = self.ly as usize;
        if ly >= self.framebuffer.len() / SCREEN_WIDTH {
            return;
        }

        // Background palette indices, consulted for sprite priority.
        let mut line = [0u8; SCREEN_WIDTH];
        if self.lcdc.contains(LcdControl::BG_ENABLE) {
            self.render_background(ly, &mut line);
        } else {
            self.framebuffer[ly * SCREEN_WIDTH..(ly + 1) * SCREEN_WIDTH].fill(SHADES[0]);
        }

        if self.lcdc.contains(LcdControl::OBJ_ENABLE) {
            self.render_sprites(ly, &line, oam);
        }
    }

    fn render_background(&mut self, ly: usize, line: &mut [u8; SCREEN_WIDTH]) {
        let y = self.ly.wrapping_add(self.scy);
        let map_row = self.lcdc.bg_tile_map() + ((y as u16 >> 3) << 5);
        let row = (y & 0b111) as usize;
        let out = &mut self.framebuffer[ly * SCREEN_WIDTH..(ly + 1) * SCREEN_WIDTH];

        for (i, (pixel, index)) in out.iter_mut().zip(line.iter_mut()).enumerate() {
            let x = self.scx.wrapping_add(i as u8);
            let id = self.vram.get(map_row + (x as u16 >> 3));
            let tile = self.lcdc.tile_index(id);
            *index = self.tiles.pixel(tile, row, (x & 0b111) as usize);
            *pixel = self.bg_palette.color(*index);
        }
    }

    fn render_sprites(&mut self, ly: usize, line: &[u8; SCREEN_WIDTH], oam: &[u8]) {
        let height = self.lcdc.sprite_height();
        let ly = ly as i16;
        let visible: Vec<Sprite> = oam
            .chunks_exact(4)
            .take(SPRITE_COUNT)
            .map(Sprite::from_oam)
            .filter(|sprite| sprite.y <= ly && ly < sprite.y + height)
            .take(MAX_SPRITES_PER_LINE)
            .collect();

        // Lower OAM index wins, so it is drawn last.
        for sprite in visible.iter().rev() {
            let mut row = ly - sprite.y;
            if sprite.flags.contains(SpriteFlags::FLIP_Y) {
                row = height - 1 - row;
            }
            let mut tile = sprite.tile as usize;
            if height == 16 {
                tile &= 0xFE;
            }
            let tile = tile + (row / 8) as usize;
            let row = (row % 8) as usize;

            let palette = if sprite.flags.contains(SpriteFlags::PALETTE) {
                self.sprite_palettes[1]
            } else {
                self.sprite_palettes[0]
            };

            for col in 0..8i16 {
                let x = sprite.x + col;
                if !(0..SCREEN_WIDTH as i16).contains(&x) {
                    continue;
                }
                let x = x as usize;
                if sprite.flags.contains(SpriteFlags::BEHIND_BG) && line[x] != 0 {
                    continue;
                }
                let src = if sprite.flags.contains(SpriteFlags::FLIP_X) {
                    7 - col
                } else {
                    col
                };
                let index = self.tiles.pixel(tile, row, src as usize);
                if index == 0 {
                    continue;
                }
                self.framebuffer[ly as usize * SCREEN_WIDTH + x] = palette.color(index);
            }
        }
    }
}
