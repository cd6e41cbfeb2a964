use crate::io;

/// SB/SC with transfers completing instantly.
///
/// Starting a transfer (SC bit 7) appends SB to `output`; no link partner
/// exists, so nothing is shifted in. Completed text lines are logged.
#[derive(Clone, Debug, Default)]
pub struct Serial {
    sb: u8,
    sc: u8,
    output: Vec<u8>,
    line: Vec<u8>,
}

impl Serial {
    pub fn reset(&mut self) {
        self.sb = 0;
        self.sc = 0;
        self.output.clear();
        self.line.clear();
    }

    pub fn read(&self, addr: u16) -> u8 {
        match addr {
            io::SB => self.sb,
            // Bits 1-6 are unused.
            _ => self.sc | 0x7E,
        }
    }

    pub fn write(&mut self, addr: u16, value: u8) {
        match addr {
            io::SB => self.sb = value,
            _ => {
                self.sc = value;
                if value & 0x80 != 0 {
                    self.transfer();
                }
            }
        }
    }

    fn transfer(&mut self) {
        let byte = self.sb;
        self.output.push(byte);
        if byte == b'\n' {
            log::info!("serial: {}", String::from_utf8_lossy(&self.line));
            self.line.clear();
        } else {
            self.line.push(byte);
        }
        // Transfer complete.
        self.sc &= !0x80;
    }

    /// Every byte sent since reset.
    pub fn output(&self) -> &[u8] {
        &self.output
    }
}
