//! CPU status register (P) flags.
//!
//! ```text
//! 7  6  5  4  3  2  1  0
//! N  V  U  B  D  I  Z  C
//! ```
//!
//! Bit 5 (U) always reads back as 1. Bit 4 (B) is transient: it exists only
//! in bytes pushed to the stack (set by PHP/BRK, clear for NMI/IRQ) and is
//! discarded when status is pulled back via PLP/RTI.

use bitflags::bitflags;

bitflags! {
    /// Processor status flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Status: u8 {
        /// Carry.
        const C = 1 << 0;
        /// Zero.
        const Z = 1 << 1;
        /// IRQ disable. NMI is unaffected.
        const I = 1 << 2;
        /// Decimal mode. The 2A03 ignores it for arithmetic.
        const D = 1 << 3;
        /// Break, only meaningful in stack bytes.
        const B = 1 << 4;
        /// Unused, always 1.
        const U = 1 << 5;
        /// Signed overflow.
        const V = 1 << 6;
        /// Negative (bit 7 of the last result).
        const N = 1 << 7;
    }
}

impl Status {
    /// State after reset: IRQs disabled, unused bit high ($24).
    pub const RESET: Self = Self::I.union(Self::U);

    /// Set or clear a single flag.
    #[inline]
    pub fn assign(&mut self, flag: Self, value: bool) {
        if value {
            self.insert(flag);
        } else {
            self.remove(flag);
        }
    }

    /// Update Z and N from a result byte.
    #[inline]
    pub fn set_zn(&mut self, value: u8) {
        self.assign(Self::Z, value == 0);
        self.assign(Self::N, value & 0x80 != 0);
    }

    /// Byte to push for an interrupt or PHP/BRK. U is always set; B is set
    /// only for software pushes (PHP, BRK).
    #[inline]
    #[must_use]
    pub const fn to_stack_byte(self, software: bool) -> u8 {
        let bits = self.bits() | Self::U.bits();
        if software {
            bits | Self::B.bits()
        } else {
            bits
        }
    }

    /// Rebuild status from a byte pulled off the stack: B is discarded and U
    /// forced high.
    #[inline]
    #[must_use]
    pub fn from_stack_byte(value: u8) -> Self {
        Self::from_bits_truncate((value & !Self::B.bits()) | Self::U.bits())
    }
}
