use crate::memory::MemoryRegion;

/// Tiles addressable from 0x8000-0x97FF.
pub const TILE_COUNT: usize = 384;

/// Rows of 8 two-bit palette indices.
pub type Tile = [[u8; 8]; 8];

/// Decoded copy of VRAM tile data, kept in sync on every write.
#[derive(Clone, Debug)]
pub struct TileCache {
    tiles: Box<[Tile]>,
}

impl Default for TileCache {
    fn default() -> Self {
        Self {
            tiles: vec![[[0; 8]; 8]; TILE_COUNT].into_boxed_slice(),
        }
    }
}

impl TileCache {
    pub fn reset(&mut self) {
        self.tiles.fill([[0; 8]; 8]);
    }

    /// Re-decode the row containing `addr` after a VRAM write.
    ///
    /// Each row is two bytes: bit planes low then high, leftmost pixel in
    /// bit 7.
    pub fn update(&mut self, vram: &MemoryRegion, addr: u16) {
        let offset = addr - vram.base();
        let tile = (offset >> 4) as usize;
        let row = ((offset >> 1) & 0b111) as usize;
        let base = addr & 0xFFFE;
        let low = vram.get(base);
        let high = vram.get(base + 1);

        for (x, pixel) in self.tiles[tile][row].iter_mut().enumerate() {
            let bit = 7 - x;
            *pixel = (((high >> bit) & 1) << 1) | ((low >> bit) & 1);
        }
    }

    #[inline]
    pub fn pixel(&self, tile: usize, row: usize, col: usize) -> u8 {
        self.tiles[tile][row][col]
    }

    pub fn tile(&self, tile: usize) -> &Tile {
        &self.tiles[tile]
    }
}
