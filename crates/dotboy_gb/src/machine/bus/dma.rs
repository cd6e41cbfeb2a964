use super::{MemoryBus, OAM_BASE, OAM_USED};
use crate::cpu::Bus;

impl MemoryBus {
    /// Copy 160 bytes from `value << 8` into OAM.
    ///
    /// The transfer completes immediately; the 160 M-cycle bus lockout is
    /// not modelled.
    pub(super) fn oam_dma(&mut self, value: u8) {
        let source = u16::from(value) << 8;
        log::debug!("OAM DMA from 0x{source:04X}");
        for i in 0..OAM_USED as u16 {
            let byte = self.read8(source.wrapping_add(i));
            self.oam.set(OAM_BASE + i, byte);
        }
    }
}
