//! 6502 addressing modes.

/// The thirteen addressing modes of the NMOS 6502.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddrMode {
    /// No operand; the operation is implied (CLC, INX, RTS...).
    Imp,
    /// Operates on the accumulator (ASL A, ROR A...).
    Acc,
    /// 8-bit constant follows the opcode (LDA #$42).
    Imm,
    /// 8-bit address into the zero page (LDA $42).
    Zp0,
    /// Zero-page address plus X, wrapping within the zero page.
    Zpx,
    /// Zero-page address plus Y, wrapping within the zero page.
    Zpy,
    /// Signed 8-bit branch offset (BEQ label).
    Rel,
    /// Full 16-bit address (LDA $1234).
    Abs,
    /// 16-bit address plus X.
    Abx,
    /// 16-bit address plus Y.
    Aby,
    /// 16-bit pointer to the target, JMP only; wraps within the pointer's
    /// page when its low byte is $FF.
    Ind,
    /// (zp,X): pointer in zero page indexed by X before the fetch.
    Idx,
    /// (zp),Y: pointer in zero page, Y added after the fetch.
    Idy,
}

impl AddrMode {
    /// Operand bytes following the opcode (instruction length minus one).
    #[must_use]
    pub const fn operand_size(self) -> u8 {
        match self {
            Self::Imp | Self::Acc => 0,
            Self::Imm | Self::Zp0 | Self::Zpx | Self::Zpy | Self::Rel | Self::Idx | Self::Idy => 1,
            Self::Abs | Self::Abx | Self::Aby | Self::Ind => 2,
        }
    }

    /// True for the indexed modes that charge one extra cycle on read-like
    /// instructions when indexing crosses a page boundary.
    #[must_use]
    pub const fn can_cross_page(self) -> bool {
        matches!(self, Self::Abx | Self::Aby | Self::Idy)
    }
}
