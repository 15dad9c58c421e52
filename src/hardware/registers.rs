/// The LC-3 register file: 8 general purpose registers, the program counter and the
/// condition register.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registers {
    general_purpose: [u16; 8],
    pc: u16,
    /// `None` until the first flag-affecting instruction.
    cond: Option<ConditionFlag>,
}

impl Default for Registers {
    fn default() -> Self {
        Self::new()
    }
}

impl Registers {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            general_purpose: [0u16; 8],
            pc: 0,
            cond: None,
        }
    }
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// # Panics
    /// - `r` is not a general purpose register index `0..=7`
    #[must_use]
    pub fn get(&self, r: u8) -> u16 {
        assert!(r <= 7, "Invalid general purpose register get: {r}");
        self.general_purpose[usize::from(r)]
    }
    /// # Panics
    /// - `r` is not a general purpose register index `0..=7`
    pub fn set(&mut self, r: u8, value: u16) {
        assert!(r <= 7, "Invalid general purpose register set: {r}");
        self.general_purpose[usize::from(r)] = value;
    }

    #[must_use]
    pub const fn pc(&self) -> u16 {
        self.pc
    }
    pub const fn set_pc(&mut self, value: u16) {
        self.pc = value;
    }

    #[must_use]
    pub const fn get_conditional_register(&self) -> Option<ConditionFlag> {
        self.cond
    }
    /// Raw bits of COND as an LC-3 program would see them, `0` before any flag was set.
    #[must_use]
    pub fn conditional_register_bits(&self) -> u16 {
        self.cond.map_or(0, ConditionFlag::bits)
    }
    /// Sets COND from the sign of the value just written to register `r`.
    pub fn update_conditional_register(&mut self, r: u8) {
        let val = self.get(r);
        self.cond = Some(ConditionFlag::from(val));
    }
}

#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConditionFlag {
    Pos = 1 << 0, // Positive
    Zero = 1 << 1,
    Neg = 1 << 2, // Negative
}

impl ConditionFlag {
    #[must_use]
    pub const fn bits(self) -> u16 {
        self as u16
    }
}

impl From<u16> for ConditionFlag {
    fn from(value: u16) -> Self {
        if value == 0 {
            Self::Zero
        } else if value >> 15 == 1 {
            // leftmost bit is 1 for negative numbers
            Self::Neg
        } else {
            Self::Pos
        }
    }
}
