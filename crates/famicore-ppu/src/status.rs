//! PPUSTATUS ($2002).

use bitflags::bitflags;

bitflags! {
    /// PPU status register. Only the top three bits are driven; the rest
    /// read back as open bus.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Status: u8 {
        /// Sprite overflow (reserved; sprites do not render in this core).
        const SPRITE_OVERFLOW = 1 << 5;
        /// Sprite 0 hit (reserved).
        const SPRITE_ZERO_HIT = 1 << 6;
        /// Currently in vertical blank.
        const VBLANK = 1 << 7;
    }
}

impl Status {
    /// True while the vblank flag is raised.
    #[must_use]
    #[inline]
    pub const fn in_vblank(self) -> bool {
        self.contains(Self::VBLANK)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vblank_bit() {
        let mut status = Status::empty();
        assert!(!status.in_vblank());
        status.insert(Status::VBLANK);
        assert!(status.in_vblank());
        assert_eq!(status.bits(), 0x80);
    }
}
