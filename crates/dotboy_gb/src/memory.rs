/// A fixed-capacity block of bytes mapped at `base` in the address space.
///
/// Accessors take absolute addresses. Capacity never changes after
/// construction; `reset` and `load` rewrite contents in place.
#[derive(Clone, Debug)]
pub struct MemoryRegion {
    base: u16,
    data: Box<[u8]>,
}

impl MemoryRegion {
    pub fn new(base: u16, capacity: usize) -> Self {
        debug_assert!(base as usize + capacity <= 0x10000);
        Self {
            base,
            data: vec![0; capacity].into_boxed_slice(),
        }
    }

    #[inline]
    pub fn base(&self) -> u16 {
        self.base
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn contains(&self, addr: u16) -> bool {
        addr >= self.base && ((addr - self.base) as usize) < self.data.len()
    }

    #[inline]
    pub fn get(&self, addr: u16) -> u8 {
        self.data[self.index(addr)]
    }

    #[inline]
    pub fn set(&mut self, addr: u16, value: u8) {
        let index = self.index(addr);
        self.data[index] = value;
    }

    /// Borrow `len` bytes starting at absolute address `addr`.
    pub fn slice(&self, addr: u16, len: usize) -> &[u8] {
        let start = self.index(addr);
        &self.data[start..start + len]
    }

    pub fn reset(&mut self) {
        self.data.fill(0);
    }

    /// Zero the region, then copy `bytes` in from the start. Extra bytes are
    /// dropped.
    pub fn load(&mut self, bytes: &[u8]) {
        self.reset();
        let len = bytes.len().min(self.data.len());
        self.data[..len].copy_from_slice(&bytes[..len]);
    }

    #[inline]
    fn index(&self, addr: u16) -> usize {
        debug_assert!(
            self.contains(addr),
            "address {addr:04X} outside region at {:04X}",
            self.base
        );
        (addr - self.base) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::MemoryRegion;

    #[test]
    fn absolute_addressing() {
        let mut region = MemoryRegion::new(0xC000, 0x2000);
        assert!(region.contains(0xC000));
        assert!(region.contains(0xDFFF));
        assert!(!region.contains(0xE000));
        assert!(!region.contains(0xBFFF));

        region.set(0xC123, 0x42);
        assert_eq!(region.get(0xC123), 0x42);

        region.reset();
        assert_eq!(region.get(0xC123), 0x00);
    }

    #[test]
    fn load_truncates_and_zero_fills() {
        let mut region = MemoryRegion::new(0x0000, 4);
        region.load(&[1, 2, 3, 4, 5, 6]);
        assert_eq!(region.slice(0, 4), &[1, 2, 3, 4]);
        region.load(&[9]);
        assert_eq!(region.slice(0, 4), &[9, 0, 0, 0]);
    }
}
