//! Ricoh 2C02 PPU emulation for the famicore NES emulator.
//!
//! Renders the background plane of a 256x240 frame with the loopy v/t
//! scroll machinery, exposes the CPU-visible register file with its exact
//! read/write side effects, and signals vblank NMIs back to the caller.
//! Sprites, sprite-0 hit and per-dot fetch timing are out of scope; the PPU
//! advances in whole scanlines, which matches what a background-only core
//! can observe.
//!
//! # Usage
//!
//! ```
//! use famicore_cart::Mirroring;
//! use famicore_ppu::{Ppu, DOTS_PER_SCANLINE};
//!
//! let mut ppu = Ppu::new(vec![0; 0x2000], Mirroring::Vertical);
//!
//! // CPU-side register traffic
//! ppu.write_register(0x2000, 0x80); // enable vblank NMI
//! let status = ppu.read_register(0x2002, 0);
//!
//! // Advance three dots per CPU cycle; `true` means an NMI was raised
//! let nmi = ppu.tick(u32::from(DOTS_PER_SCANLINE));
//! # let _ = (status, nmi);
//! ```

mod background;
mod ctrl;
mod frame;
mod mask;
mod palette;
mod ppu;
mod scroll;
mod status;
mod vram;

pub use ctrl::Ctrl;
pub use frame::{Frame, HEIGHT, WIDTH};
pub use mask::Mask;
pub use palette::NES_PALETTE;
pub use ppu::{
    Ppu, DOTS_PER_SCANLINE, PRE_RENDER_SCANLINE, SCANLINES_PER_FRAME, VBLANK_SCANLINE,
};
pub use scroll::Scroll;
pub use status::Status;
