//! The emulator driver.
//!
//! [`Console`] owns the CPU and the bus (which in turn owns the PPU and the
//! cartridge images), wires the PPU's vblank NMI back into the CPU, and
//! exposes the host-facing surface: load, reset, step, run, pause/resume,
//! halt, the last completed frame and the nestest trace.

use crate::bus::NesBus;
use crate::control::Control;

use famicore_cart::{Cartridge, RomError};
use famicore_cpu::{trace_line, Cpu};
use famicore_ppu::Ppu;

/// Driver-level errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EmuError {
    /// `step`/`run` called before a successful `load`.
    #[error("no ROM loaded")]
    NoRomLoaded,

    /// Cartridge parsing failed; any previously loaded ROM stays intact.
    #[error(transparent)]
    Rom(#[from] RomError),
}

/// The assembled NES core.
pub struct Console {
    cpu: Cpu,
    bus: Option<NesBus>,
    control: Control,
}

impl Console {
    /// An empty console; [`Console::load`] brings it to life.
    #[must_use]
    pub fn new() -> Self {
        Self {
            cpu: Cpu::new(),
            bus: None,
            control: Control::new(),
        }
    }

    /// Parse an iNES image and swap it in, then reset. On error the
    /// previously loaded cartridge (if any) is untouched.
    ///
    /// # Errors
    ///
    /// Returns [`EmuError::Rom`] when the image fails to parse.
    pub fn load(&mut self, rom: &[u8]) -> Result<(), EmuError> {
        let cart = Cartridge::parse(rom)?;
        log::info!(
            "loaded cartridge: mapper {}, {} mirroring, {} KiB PRG, {} KiB CHR",
            cart.mapper(),
            cart.mirroring(),
            cart.prg_rom().len() / 1024,
            cart.chr_rom().len() / 1024,
        );
        self.bus = Some(NesBus::new(cart));
        self.reset()
    }

    /// Reset CPU and PPU together: PC from the reset vector, SP to $FD,
    /// P to I|U, PPU back to the pre-render line, halt cleared.
    ///
    /// # Errors
    ///
    /// Returns [`EmuError::NoRomLoaded`] before the first successful load.
    pub fn reset(&mut self) -> Result<(), EmuError> {
        let bus = self.bus.as_mut().ok_or(EmuError::NoRomLoaded)?;
        bus.reset();
        self.cpu.reset(bus);
        self.control.clear_run_flags();
        Ok(())
    }

    /// Execute one instruction plus its cycle-proportional PPU advance.
    /// Returns the CPU cycles consumed (0 once halted).
    ///
    /// # Errors
    ///
    /// Returns [`EmuError::NoRomLoaded`] before the first successful load.
    pub fn step(&mut self) -> Result<u8, EmuError> {
        let bus = self.bus.as_mut().ok_or(EmuError::NoRomLoaded)?;

        let cycles = self.cpu.step(bus);
        bus.tick(cycles);

        // An NMI raised during this instruction's dots is observed before
        // the next fetch.
        if bus.take_nmi() {
            self.cpu.trigger_nmi();
        }

        if self.cpu.halted() {
            self.control.halt();
        }
        if bus.ppu.take_frame_ready() {
            self.control.publish_frame();
        }

        Ok(cycles)
    }

    /// Run until halted or `stop` returns true, parking while paused.
    /// Stop conditions are checked once per instruction.
    ///
    /// # Errors
    ///
    /// Returns [`EmuError::NoRomLoaded`] before the first successful load.
    pub fn run_until(&mut self, mut stop: impl FnMut(&Cpu) -> bool) -> Result<(), EmuError> {
        if self.bus.is_none() {
            return Err(EmuError::NoRomLoaded);
        }
        while !self.control.halted() {
            self.control.wait_while_paused();
            if self.control.halted() {
                break;
            }
            self.step()?;
            if stop(&self.cpu) {
                break;
            }
        }
        Ok(())
    }

    /// Run until halted (STP) or externally stopped through the control
    /// handle.
    ///
    /// # Errors
    ///
    /// Returns [`EmuError::NoRomLoaded`] before the first successful load.
    pub fn run(&mut self) -> Result<(), EmuError> {
        self.run_until(|_| false)
    }

    /// Shared run-state handle for a UI or supervisor thread.
    #[must_use]
    pub fn control(&self) -> Control {
        self.control.clone()
    }

    /// Park the run loop before its next instruction.
    pub fn pause(&self) {
        self.control.pause();
    }

    /// Wake a parked run loop.
    pub fn resume(&self) {
        self.control.resume();
    }

    /// Stop the run loop for good (until the next reset).
    pub fn halt(&self) {
        self.control.halt();
    }

    /// True once a ROM has been loaded successfully.
    #[must_use]
    pub fn loaded(&self) -> bool {
        self.bus.is_some()
    }

    /// The last completed 256x240 frame, row-major packed RGBA. Stable
    /// until the next vblank swap.
    #[must_use]
    pub fn last_frame(&self) -> Option<&[u32]> {
        self.bus.as_ref().map(|bus| bus.ppu.frame().as_pixels())
    }

    /// nestest-format trace of the instruction the CPU is about to run.
    ///
    /// # Errors
    ///
    /// Returns [`EmuError::NoRomLoaded`] before the first successful load.
    pub fn trace_line(&self) -> Result<String, EmuError> {
        let bus = self.bus.as_ref().ok_or(EmuError::NoRomLoaded)?;
        Ok(trace_line(&self.cpu, bus))
    }

    /// CPU registers, for introspection while paused.
    #[must_use]
    pub fn cpu(&self) -> &Cpu {
        &self.cpu
    }

    /// Mutable CPU access, e.g. to force PC for nestest automation.
    pub fn cpu_mut(&mut self) -> &mut Cpu {
        &mut self.cpu
    }

    /// PPU state, for introspection while paused.
    #[must_use]
    pub fn ppu(&self) -> Option<&Ppu> {
        self.bus.as_ref().map(|bus| &bus.ppu)
    }

    /// Read a byte from the CPU address space without side effects.
    #[must_use]
    pub fn peek(&self, addr: u16) -> u8 {
        use famicore_cpu::Bus;
        self.bus.as_ref().map_or(0, |bus| bus.peek(addr))
    }

    /// Work RAM contents, for a hex-dump panel.
    #[must_use]
    pub fn wram(&self) -> Option<&[u8]> {
        self.bus.as_ref().map(NesBus::wram)
    }

    /// The system bus, when a ROM is loaded.
    #[must_use]
    pub fn bus(&self) -> Option<&NesBus> {
        self.bus.as_ref()
    }

    /// Mutable bus access, for tests and debugger pokes while paused.
    pub fn bus_mut(&mut self) -> Option<&mut NesBus> {
        self.bus.as_mut()
    }
}

impl Default for Console {
    fn default() -> Self {
        Self::new()
    }
}
