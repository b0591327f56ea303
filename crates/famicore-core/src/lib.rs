//! famicore-core - the assembled NES emulation core.
//!
//! Wires the famicore CPU, PPU and cartridge loader into a console:
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │                   Console                    │
//! │  ┌────────────────────────────────────────┐  │
//! │  │                 NesBus                 │  │
//! │  │  ┌──────┐  ┌─────┐  ┌──────────────┐  │  │
//! │  │  │ WRAM │  │ PPU │  │ PRG ROM view │  │  │
//! │  │  └──────┘  └─────┘  └──────────────┘  │  │
//! │  └────────────────────────────────────────┘  │
//! │                      ▲                       │
//! │                 ┌────┴────┐                  │
//! │                 │   CPU   │                  │
//! │                 └─────────┘                  │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! One CPU cycle advances the PPU by three dots; the PPU raises an NMI at
//! the start of vblank which the bus relays to the CPU before its next
//! fetch. The [`Control`] handle carries the `halted`/`paused`/`frame_ready`
//! flags across threads so a worker can drive [`Console::run`] while a UI
//! thread observes frames.
//!
//! # Usage
//!
//! ```no_run
//! use famicore_core::Console;
//!
//! let rom = std::fs::read("game.nes").expect("failed to read ROM");
//! let mut console = Console::new();
//! console.load(&rom).expect("failed to load ROM");
//!
//! let control = console.control();
//! while !control.halted() {
//!     console.step().expect("step failed");
//!     if control.frame_ready() {
//!         let _pixels = console.last_frame().unwrap();
//!         control.acknowledge_frame();
//!     }
//! }
//! ```

mod bus;
mod console;
mod control;

pub use bus::NesBus;
pub use console::{Console, EmuError};
pub use control::Control;

// Re-export the component crates' main types for front-end convenience.
pub use famicore_cart::{Cartridge, Mirroring, RomError};
pub use famicore_cpu::{trace_line, Cpu, Status};
pub use famicore_ppu::{Frame, Ppu, NES_PALETTE};

/// NES screen dimensions.
pub mod screen {
    /// Screen width in pixels.
    pub const WIDTH: usize = famicore_ppu::WIDTH;
    /// Screen height in pixels.
    pub const HEIGHT: usize = famicore_ppu::HEIGHT;
    /// Pixels per frame.
    pub const PIXELS: usize = WIDTH * HEIGHT;
}
