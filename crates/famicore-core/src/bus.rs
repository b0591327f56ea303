//! The CPU-side system bus.
//!
//! Address map:
//!
//! ```text
//! $0000-$1FFF: 2 KiB work RAM, mirrored every 2 KiB
//! $2000-$3FFF: PPU register file, mirrored every 8 bytes
//! $4000-$4017: APU and I/O stubs (read 0, writes dropped)
//! $4018-$5FFF: unmapped (read 0)
//! $6000-$7FFF: cartridge RAM stub (read 0)
//! $8000-$FFFF: PRG ROM, 16 KiB images mirrored across the window
//! ```
//!
//! The bus carries the open-bus shadow: the last value a read produced,
//! which answers reads of the PPU's write-only registers. `tick` is the
//! CPU-to-PPU clock bridge, advancing the PPU three dots per CPU cycle and
//! relaying its NMI signal.

use famicore_cart::{Cartridge, PRG_BANK_SIZE};
use famicore_cpu::Bus;
use famicore_ppu::Ppu;

/// Work RAM size.
const WRAM_SIZE: usize = 0x0800;

/// System bus: WRAM, PRG ROM and the PPU with its register window.
pub struct NesBus {
    wram: [u8; WRAM_SIZE],
    prg: Vec<u8>,
    /// `$3FFF` for a 16 KiB image, `$7FFF` otherwise.
    prg_mask: u16,
    /// The PPU, owned here so register dispatch stays a direct call.
    pub ppu: Ppu,
    /// Open-bus shadow: last value successfully read.
    last_read: u8,
    /// NMI relayed out of the PPU, consumed by the driver.
    nmi_pending: bool,
}

impl NesBus {
    /// Build the bus from a parsed cartridge, handing the CHR image and
    /// mirroring mode to the PPU and keeping the PRG image here.
    #[must_use]
    pub fn new(cart: Cartridge) -> Self {
        let mirroring = cart.mirroring();
        let (prg, chr) = cart.into_parts();
        let prg_mask: u16 = if prg.len() <= PRG_BANK_SIZE { 0x3FFF } else { 0x7FFF };
        Self {
            wram: [0; WRAM_SIZE],
            prg,
            prg_mask,
            ppu: Ppu::new(chr, mirroring),
            last_read: 0,
            nmi_pending: false,
        }
    }

    /// Reset bus-side latches and the PPU. WRAM survives, as on hardware.
    pub fn reset(&mut self) {
        self.ppu.reset();
        self.last_read = 0;
        self.nmi_pending = false;
    }

    /// Advance the PPU by `3 * cycles` dots and latch any NMI it raises.
    pub fn tick(&mut self, cycles: u8) {
        if self.ppu.tick(3 * u32::from(cycles)) {
            self.nmi_pending = true;
        }
    }

    /// Consume the relayed NMI edge.
    pub fn take_nmi(&mut self) -> bool {
        core::mem::take(&mut self.nmi_pending)
    }

    /// Work RAM contents, for debugger views.
    #[must_use]
    pub fn wram(&self) -> &[u8] {
        &self.wram
    }

    fn read_prg(&self, addr: u16) -> u8 {
        if self.prg.is_empty() {
            return 0;
        }
        self.prg[usize::from((addr - 0x8000) & self.prg_mask)]
    }
}

impl Bus for NesBus {
    fn read(&mut self, addr: u16) -> u8 {
        let value = match addr {
            0x0000..=0x1FFF => self.wram[usize::from(addr & 0x07FF)],
            0x2000..=0x3FFF => self.ppu.read_register(addr, self.last_read),
            // APU/IO stubs, unmapped space, cartridge RAM stub
            0x4000..=0x7FFF => 0,
            0x8000..=0xFFFF => self.read_prg(addr),
        };
        self.last_read = value;
        value
    }

    fn write(&mut self, addr: u16, value: u8) {
        match addr {
            0x0000..=0x1FFF => self.wram[usize::from(addr & 0x07FF)] = value,
            0x2000..=0x3FFF => self.ppu.write_register(addr, value),
            // APU/IO stubs and unmapped space swallow writes
            0x4000..=0x7FFF => {}
            // Writes to ROM are silently dropped
            0x8000..=0xFFFF => {}
        }
    }

    fn peek(&self, addr: u16) -> u8 {
        match addr {
            0x0000..=0x1FFF => self.wram[usize::from(addr & 0x07FF)],
            0x2000..=0x3FFF => self.ppu.peek_register(addr, self.last_read),
            0x4000..=0x7FFF => 0,
            0x8000..=0xFFFF => self.read_prg(addr),
        }
    }
}
