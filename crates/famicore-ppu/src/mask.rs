//! PPUMASK ($2001).

use bitflags::bitflags;

bitflags! {
    /// PPU mask (render-enable) register.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Mask: u8 {
        /// Grayscale output.
        const GRAYSCALE = 1 << 0;
        /// Show background in the leftmost 8 pixels.
        const BG_LEFT = 1 << 1;
        /// Show sprites in the leftmost 8 pixels.
        const SPRITE_LEFT = 1 << 2;
        /// Enable background rendering.
        const SHOW_BG = 1 << 3;
        /// Enable sprite rendering (inert in this background-only core).
        const SHOW_SPRITES = 1 << 4;
        /// Emphasize red.
        const EMPHASIZE_RED = 1 << 5;
        /// Emphasize green.
        const EMPHASIZE_GREEN = 1 << 6;
        /// Emphasize blue.
        const EMPHASIZE_BLUE = 1 << 7;
    }
}

impl Mask {
    /// True when the background plane renders.
    #[must_use]
    #[inline]
    pub const fn show_background(self) -> bool {
        self.contains(Self::SHOW_BG)
    }

    /// True when either render-enable bit is set; gates the loopy register
    /// reloads on the pre-render scanline.
    #[must_use]
    #[inline]
    pub const fn rendering_enabled(self) -> bool {
        self.intersects(Self::SHOW_BG.union(Self::SHOW_SPRITES))
    }
}
