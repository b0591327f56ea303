//! iNES cartridge loading for the famicore NES emulator.
//!
//! Parses iNES v1 images into a [`Cartridge`] holding the PRG and CHR byte
//! arrays plus the two header facts the rest of the core needs: the mapper id
//! and the nametable [`Mirroring`] mode. Only the unbanked mapper-0 class is
//! supported; bank-switching mappers are out of scope for this core.
//!
//! # Example
//!
//! ```
//! use famicore_cart::Cartridge;
//!
//! let mut image = vec![0u8; 16 + 16 * 1024 + 8 * 1024];
//! image[0..4].copy_from_slice(b"NES\x1a");
//! image[4] = 1; // one 16 KiB PRG bank
//! image[5] = 1; // one 8 KiB CHR bank
//!
//! let cart = Cartridge::parse(&image).unwrap();
//! assert_eq!(cart.prg_rom().len(), 16 * 1024);
//! assert_eq!(cart.chr_rom().len(), 8 * 1024);
//! ```

mod mirroring;
mod rom;

pub use mirroring::Mirroring;
pub use rom::{Cartridge, RomError, CHR_BANK_SIZE, PRG_BANK_SIZE};
