//! iNES v1 image parsing.
//!
//! Layout of an iNES file:
//!
//! ```text
//! Byte 0-3:   "NES" followed by MS-DOS EOF (0x4E 0x45 0x53 0x1A)
//! Byte 4:     PRG-ROM size in 16 KiB units
//! Byte 5:     CHR-ROM size in 8 KiB units (0 means CHR-RAM)
//! Byte 6:     Flags 6 (mirroring, battery, trainer, four-screen, mapper low nibble)
//! Byte 7:     Flags 7 (mapper high nibble; bits 2-3 identify NES 2.0)
//! Byte 8-15:  Reserved (ignored by this loader)
//! ```
//!
//! An optional 512-byte trainer sits between the header and PRG when flags6
//! bit 2 is set. PRG follows, then CHR.

use crate::Mirroring;

/// Size of one PRG-ROM bank (16 KiB).
pub const PRG_BANK_SIZE: usize = 16 * 1024;

/// Size of one CHR-ROM bank (8 KiB).
pub const CHR_BANK_SIZE: usize = 8 * 1024;

/// Length of the iNES header.
const HEADER_SIZE: usize = 16;

/// Length of the optional trainer block.
const TRAINER_SIZE: usize = 512;

/// iNES magic number: "NES" followed by MS-DOS EOF.
const MAGIC: [u8; 4] = [0x4E, 0x45, 0x53, 0x1A];

/// Errors that can occur when parsing an iNES image.
///
/// A failed parse never produces a partially-initialized cartridge; callers
/// keep whatever cartridge was previously loaded.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RomError {
    /// Image is smaller than the 16-byte header.
    #[error("ROM image too small: expected at least 16 bytes, got {0}")]
    FileTooSmall(usize),

    /// The 4-byte iNES tag did not match.
    #[error("invalid iNES magic number: expected [4E 45 53 1A], got {0:02X?}")]
    InvalidMagic([u8; 4]),

    /// Bits 2-3 of flags byte 7 are set, marking an NES 2.0 image.
    #[error("NES 2.0 images are not supported")]
    UnsupportedVersion,

    /// The header declares more PRG/CHR data than the image contains.
    #[error("ROM image truncated: header declares {expected} bytes, image holds {actual}")]
    TruncatedImage {
        /// Bytes the header claims follow it.
        expected: usize,
        /// Bytes actually present after the header.
        actual: usize,
    },
}

/// A parsed iNES cartridge.
///
/// Immutable after construction. CHR may be empty, in which case the PPU
/// treats the pattern-table region as 8 KiB of writable CHR-RAM.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cartridge {
    prg_rom: Vec<u8>,
    chr_rom: Vec<u8>,
    mapper: u8,
    mirroring: Mirroring,
}

impl Cartridge {
    /// Parse a raw iNES v1 image.
    ///
    /// # Errors
    ///
    /// Returns [`RomError`] when the tag is wrong, the image is NES 2.0, or
    /// the declared PRG/CHR sizes overrun the buffer.
    pub fn parse(raw: &[u8]) -> Result<Self, RomError> {
        if raw.len() < HEADER_SIZE {
            return Err(RomError::FileTooSmall(raw.len()));
        }

        if raw[0..4] != MAGIC {
            let mut tag = [0u8; 4];
            tag.copy_from_slice(&raw[0..4]);
            return Err(RomError::InvalidMagic(tag));
        }

        let flags6 = raw[6];
        let flags7 = raw[7];
        if (flags7 >> 2) & 0x03 != 0 {
            return Err(RomError::UnsupportedVersion);
        }

        let mapper = (flags7 & 0xF0) | (flags6 >> 4);
        let mirroring = Mirroring::from_flags(flags6);

        let prg_size = usize::from(raw[4]) * PRG_BANK_SIZE;
        let chr_size = usize::from(raw[5]) * CHR_BANK_SIZE;
        let has_trainer = flags6 & 0x04 != 0;

        let prg_start = HEADER_SIZE + if has_trainer { TRAINER_SIZE } else { 0 };
        let chr_start = prg_start + prg_size;

        let expected = chr_start + chr_size - HEADER_SIZE;
        if raw.len() < chr_start + chr_size {
            return Err(RomError::TruncatedImage {
                expected,
                actual: raw.len() - HEADER_SIZE,
            });
        }

        if mapper != 0 {
            log::warn!("mapper {mapper} requested; famicore only banks like mapper 0");
        }

        Ok(Self {
            prg_rom: raw[prg_start..prg_start + prg_size].to_vec(),
            chr_rom: raw[chr_start..chr_start + chr_size].to_vec(),
            mapper,
            mirroring,
        })
    }

    /// PRG-ROM bytes (a multiple of 16 KiB).
    #[must_use]
    pub fn prg_rom(&self) -> &[u8] {
        &self.prg_rom
    }

    /// CHR-ROM bytes (a multiple of 8 KiB, or empty for CHR-RAM carts).
    #[must_use]
    pub fn chr_rom(&self) -> &[u8] {
        &self.chr_rom
    }

    /// True when the image carries no CHR and the PPU should provide CHR-RAM.
    #[must_use]
    pub fn has_chr_ram(&self) -> bool {
        self.chr_rom.is_empty()
    }

    /// Mapper id from the header nibbles.
    #[must_use]
    pub fn mapper(&self) -> u8 {
        self.mapper
    }

    /// Nametable mirroring mode.
    #[must_use]
    pub fn mirroring(&self) -> Mirroring {
        self.mirroring
    }

    /// Consume the cartridge, yielding the PRG and CHR images.
    ///
    /// The bus takes the PRG, the PPU takes the CHR; reloading a ROM rebuilds
    /// both from a fresh parse.
    #[must_use]
    pub fn into_parts(self) -> (Vec<u8>, Vec<u8>) {
        (self.prg_rom, self.chr_rom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build_image(prg_banks: u8, chr_banks: u8, flags6: u8, flags7: u8) -> Vec<u8> {
        let trainer = if flags6 & 0x04 != 0 { TRAINER_SIZE } else { 0 };
        let len = HEADER_SIZE
            + trainer
            + usize::from(prg_banks) * PRG_BANK_SIZE
            + usize::from(chr_banks) * CHR_BANK_SIZE;
        let mut raw = vec![0u8; len];
        raw[0..4].copy_from_slice(&MAGIC);
        raw[4] = prg_banks;
        raw[5] = chr_banks;
        raw[6] = flags6;
        raw[7] = flags7;
        raw
    }

    #[test]
    fn test_parse_minimal() {
        let raw = build_image(1, 1, 0x00, 0x00);
        let cart = Cartridge::parse(&raw).unwrap();
        assert_eq!(cart.prg_rom().len(), PRG_BANK_SIZE);
        assert_eq!(cart.chr_rom().len(), CHR_BANK_SIZE);
        assert_eq!(cart.mapper(), 0);
        assert_eq!(cart.mirroring(), Mirroring::Horizontal);
        assert!(!cart.has_chr_ram());
    }

    #[test]
    fn test_parse_sizes_follow_header() {
        let raw = build_image(2, 1, 0x01, 0x00);
        let cart = Cartridge::parse(&raw).unwrap();
        assert_eq!(cart.prg_rom().len(), 2 * PRG_BANK_SIZE);
        assert_eq!(cart.chr_rom().len(), CHR_BANK_SIZE);
        assert_eq!(cart.mirroring(), Mirroring::Vertical);
    }

    #[test]
    fn test_parse_chr_ram_cart() {
        let raw = build_image(1, 0, 0x00, 0x00);
        let cart = Cartridge::parse(&raw).unwrap();
        assert!(cart.has_chr_ram());
        assert!(cart.chr_rom().is_empty());
    }

    #[test]
    fn test_parse_trainer_offsets() {
        let mut raw = build_image(1, 1, 0x04, 0x00);
        // First PRG byte sits after header + trainer
        raw[HEADER_SIZE + TRAINER_SIZE] = 0xAB;
        let cart = Cartridge::parse(&raw).unwrap();
        assert_eq!(cart.prg_rom()[0], 0xAB);
    }

    #[test]
    fn test_parse_mapper_nibbles() {
        let raw = build_image(1, 1, 0x40, 0x20);
        let cart = Cartridge::parse(&raw).unwrap();
        assert_eq!(cart.mapper(), 0x24);
    }

    #[test]
    fn test_reject_bad_magic() {
        let mut raw = build_image(1, 1, 0x00, 0x00);
        raw[2] = b'X';
        assert!(matches!(
            Cartridge::parse(&raw),
            Err(RomError::InvalidMagic(_))
        ));
    }

    #[test]
    fn test_reject_nes2() {
        let raw = build_image(1, 1, 0x00, 0x08);
        assert_eq!(Cartridge::parse(&raw), Err(RomError::UnsupportedVersion));
    }

    #[test]
    fn test_reject_truncated() {
        let mut raw = build_image(2, 1, 0x00, 0x00);
        raw.truncate(HEADER_SIZE + PRG_BANK_SIZE);
        assert!(matches!(
            Cartridge::parse(&raw),
            Err(RomError::TruncatedImage { .. })
        ));
    }

    #[test]
    fn test_reject_tiny_buffer() {
        assert_eq!(Cartridge::parse(&[0x4E, 0x45]), Err(RomError::FileTooSmall(2)));
    }
}
