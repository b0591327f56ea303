//! PPUCTRL ($2000).
//!
//! ```text
//! 7  6  5  4  3  2  1  0
//! V  P  H  B  S  I  N  N
//! |  |  |  |  |  |  +--+-- base nametable (0=$2000, 1=$2400, 2=$2800, 3=$2C00)
//! |  |  |  |  |  +-------- VRAM increment (0: +1 across, 1: +32 down)
//! |  |  |  |  +----------- sprite pattern table for 8x8 sprites
//! |  |  |  +-------------- background pattern table (0: $0000, 1: $1000)
//! |  |  +----------------- sprite size (0: 8x8, 1: 8x16)
//! |  +-------------------- master/slave select
//! +----------------------- generate NMI at start of vblank
//! ```

use bitflags::bitflags;

bitflags! {
    /// PPU control register.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Ctrl: u8 {
        /// Base nametable select, bit 0.
        const NAMETABLE_LO = 1 << 0;
        /// Base nametable select, bit 1.
        const NAMETABLE_HI = 1 << 1;
        /// VRAM address increment after PPUDATA access.
        const VRAM_INCREMENT = 1 << 2;
        /// Sprite pattern table for 8x8 sprites.
        const SPRITE_PATTERN = 1 << 3;
        /// Background pattern table.
        const BG_PATTERN = 1 << 4;
        /// Sprite size select.
        const SPRITE_SIZE = 1 << 5;
        /// Master/slave select.
        const MASTER_SLAVE = 1 << 6;
        /// NMI on vblank.
        const NMI_ENABLE = 1 << 7;
    }
}

impl Ctrl {
    /// Base nametable select bits (0-3).
    #[must_use]
    #[inline]
    pub const fn nametable_select(self) -> u8 {
        self.bits() & 0x03
    }

    /// PPUDATA post-increment: 1 across, 32 down.
    #[must_use]
    #[inline]
    pub const fn vram_increment(self) -> u16 {
        if self.contains(Self::VRAM_INCREMENT) {
            32
        } else {
            1
        }
    }

    /// Background pattern table base ($0000 or $1000).
    #[must_use]
    #[inline]
    pub const fn bg_pattern_base(self) -> u16 {
        if self.contains(Self::BG_PATTERN) {
            0x1000
        } else {
            0x0000
        }
    }

    /// True when a vblank NMI should be generated.
    #[must_use]
    #[inline]
    pub const fn nmi_enabled(self) -> bool {
        self.contains(Self::NMI_ENABLE)
    }
}
