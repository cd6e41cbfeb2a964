/// The eight DMG inputs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Button {
    Right,
    Left,
    Up,
    Down,
    A,
    B,
    Select,
    Start,
}

impl Button {
    /// Bit within its group's low nibble.
    fn bit(self) -> u8 {
        match self {
            Button::Right | Button::A => 0,
            Button::Left | Button::B => 1,
            Button::Up | Button::Select => 2,
            Button::Down | Button::Start => 3,
        }
    }

    fn is_direction(self) -> bool {
        matches!(
            self,
            Button::Right | Button::Left | Button::Up | Button::Down
        )
    }
}

/// P1 (0xFF00).
///
/// The pressed masks use 1 for pressed; the register itself reports a
/// pressed button as 0.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Joypad {
    /// Bits 4 (directions) and 5 (buttons); 0 selects the group.
    select: u8,
    directions: u8,
    buttons: u8,
}

impl Default for Joypad {
    fn default() -> Self {
        Self {
            select: 0x30,
            directions: 0,
            buttons: 0,
        }
    }
}

impl Joypad {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn read(&self) -> u8 {
        // Bits 7-6 always read as 1.
        let mut low = 0x0F;
        if self.select & 0x10 == 0 {
            low &= !self.directions;
        }
        if self.select & 0x20 == 0 {
            low &= !self.buttons;
        }
        0xC0 | self.select | (low & 0x0F)
    }

    /// Only the selection bits are writable.
    pub fn write(&mut self, value: u8) {
        self.select = value & 0x30;
    }

    /// Update a button. Returns true on a release-to-press transition.
    pub fn set(&mut self, button: Button, pressed: bool) -> bool {
        let mask = 1 << button.bit();
        let group = if button.is_direction() {
            &mut self.directions
        } else {
            &mut self.buttons
        };
        let was_pressed = *group & mask != 0;
        if pressed {
            *group |= mask;
        } else {
            *group &= !mask;
        }
        pressed && !was_pressed
    }

    pub fn is_pressed(&self, button: Button) -> bool {
        let group = if button.is_direction() {
            self.directions
        } else {
            self.buttons
        };
        group & (1 << button.bit()) != 0
    }
}
