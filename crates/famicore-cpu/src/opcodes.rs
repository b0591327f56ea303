//! The 256-entry opcode table.
//!
//! Every opcode slot is populated: the 151 official NMOS 6502 instructions
//! plus the documented illegal set (SLO, RLA, SRE, RRA, SAX, LAX, DCP, ISC,
//! ANC, ALR, ARR, AXS, LAS, XAA, AHX, SHX, SHY, TAS, STP and the wide NOPs).
//! Mnemonics are spelled the way the published nestest log spells them, so
//! the trace module can reuse them verbatim ($E7-family prints as `ISB`).
//!
//! Cycle counts are the base costs; the page-cross penalty for read-like
//! indexed instructions and the taken-branch penalties are charged by the
//! executor on top of these.

use crate::addressing::AddrMode;
use crate::addressing::AddrMode::{
    Abs, Abx, Aby, Acc, Idx, Idy, Imm, Imp, Ind, Rel, Zp0, Zpx, Zpy,
};

/// Static description of one opcode slot.
#[derive(Debug, Clone, Copy)]
pub struct OpcodeInfo {
    /// Three-letter mnemonic, nestest spelling.
    pub mnemonic: &'static str,
    /// Addressing mode.
    pub mode: AddrMode,
    /// Base cycle count.
    pub cycles: u8,
    /// Charge +1 cycle when indexing crosses a page (read-like only).
    pub page_penalty: bool,
    /// Documented-illegal opcode; the trace prefixes these with `*`.
    pub unofficial: bool,
}

/// Official opcode.
const fn of(mnemonic: &'static str, mode: AddrMode, cycles: u8) -> OpcodeInfo {
    OpcodeInfo { mnemonic, mode, cycles, page_penalty: false, unofficial: false }
}

/// Official opcode with a page-cross penalty.
const fn of_p(mnemonic: &'static str, mode: AddrMode, cycles: u8) -> OpcodeInfo {
    OpcodeInfo { mnemonic, mode, cycles, page_penalty: true, unofficial: false }
}

/// Documented illegal opcode.
const fn un(mnemonic: &'static str, mode: AddrMode, cycles: u8) -> OpcodeInfo {
    OpcodeInfo { mnemonic, mode, cycles, page_penalty: false, unofficial: true }
}

/// Documented illegal opcode with a page-cross penalty.
const fn un_p(mnemonic: &'static str, mode: AddrMode, cycles: u8) -> OpcodeInfo {
    OpcodeInfo { mnemonic, mode, cycles, page_penalty: true, unofficial: true }
}

/// Complete opcode lookup table, indexed by opcode byte.
#[rustfmt::skip]
pub static OPCODE_TABLE: [OpcodeInfo; 256] = [
    // 0x00
    of("BRK", Imp, 7), of("ORA", Idx, 6), un("STP", Imp, 2), un("SLO", Idx, 8),
    un("NOP", Zp0, 3), of("ORA", Zp0, 3), of("ASL", Zp0, 5), un("SLO", Zp0, 5),
    of("PHP", Imp, 3), of("ORA", Imm, 2), of("ASL", Acc, 2), un("ANC", Imm, 2),
    un("NOP", Abs, 4), of("ORA", Abs, 4), of("ASL", Abs, 6), un("SLO", Abs, 6),
    // 0x10
    of("BPL", Rel, 2), of_p("ORA", Idy, 5), un("STP", Imp, 2), un("SLO", Idy, 8),
    un("NOP", Zpx, 4), of("ORA", Zpx, 4), of("ASL", Zpx, 6), un("SLO", Zpx, 6),
    of("CLC", Imp, 2), of_p("ORA", Aby, 4), un("NOP", Imp, 2), un("SLO", Aby, 7),
    un_p("NOP", Abx, 4), of_p("ORA", Abx, 4), of("ASL", Abx, 7), un("SLO", Abx, 7),
    // 0x20
    of("JSR", Abs, 6), of("AND", Idx, 6), un("STP", Imp, 2), un("RLA", Idx, 8),
    of("BIT", Zp0, 3), of("AND", Zp0, 3), of("ROL", Zp0, 5), un("RLA", Zp0, 5),
    of("PLP", Imp, 4), of("AND", Imm, 2), of("ROL", Acc, 2), un("ANC", Imm, 2),
    of("BIT", Abs, 4), of("AND", Abs, 4), of("ROL", Abs, 6), un("RLA", Abs, 6),
    // 0x30
    of("BMI", Rel, 2), of_p("AND", Idy, 5), un("STP", Imp, 2), un("RLA", Idy, 8),
    un("NOP", Zpx, 4), of("AND", Zpx, 4), of("ROL", Zpx, 6), un("RLA", Zpx, 6),
    of("SEC", Imp, 2), of_p("AND", Aby, 4), un("NOP", Imp, 2), un("RLA", Aby, 7),
    un_p("NOP", Abx, 4), of_p("AND", Abx, 4), of("ROL", Abx, 7), un("RLA", Abx, 7),
    // 0x40
    of("RTI", Imp, 6), of("EOR", Idx, 6), un("STP", Imp, 2), un("SRE", Idx, 8),
    un("NOP", Zp0, 3), of("EOR", Zp0, 3), of("LSR", Zp0, 5), un("SRE", Zp0, 5),
    of("PHA", Imp, 3), of("EOR", Imm, 2), of("LSR", Acc, 2), un("ALR", Imm, 2),
    of("JMP", Abs, 3), of("EOR", Abs, 4), of("LSR", Abs, 6), un("SRE", Abs, 6),
    // 0x50
    of("BVC", Rel, 2), of_p("EOR", Idy, 5), un("STP", Imp, 2), un("SRE", Idy, 8),
    un("NOP", Zpx, 4), of("EOR", Zpx, 4), of("LSR", Zpx, 6), un("SRE", Zpx, 6),
    of("CLI", Imp, 2), of_p("EOR", Aby, 4), un("NOP", Imp, 2), un("SRE", Aby, 7),
    un_p("NOP", Abx, 4), of_p("EOR", Abx, 4), of("LSR", Abx, 7), un("SRE", Abx, 7),
    // 0x60
    of("RTS", Imp, 6), of("ADC", Idx, 6), un("STP", Imp, 2), un("RRA", Idx, 8),
    un("NOP", Zp0, 3), of("ADC", Zp0, 3), of("ROR", Zp0, 5), un("RRA", Zp0, 5),
    of("PLA", Imp, 4), of("ADC", Imm, 2), of("ROR", Acc, 2), un("ARR", Imm, 2),
    of("JMP", Ind, 5), of("ADC", Abs, 4), of("ROR", Abs, 6), un("RRA", Abs, 6),
    // 0x70
    of("BVS", Rel, 2), of_p("ADC", Idy, 5), un("STP", Imp, 2), un("RRA", Idy, 8),
    un("NOP", Zpx, 4), of("ADC", Zpx, 4), of("ROR", Zpx, 6), un("RRA", Zpx, 6),
    of("SEI", Imp, 2), of_p("ADC", Aby, 4), un("NOP", Imp, 2), un("RRA", Aby, 7),
    un_p("NOP", Abx, 4), of_p("ADC", Abx, 4), of("ROR", Abx, 7), un("RRA", Abx, 7),
    // 0x80
    un("NOP", Imm, 2), of("STA", Idx, 6), un("NOP", Imm, 2), un("SAX", Idx, 6),
    of("STY", Zp0, 3), of("STA", Zp0, 3), of("STX", Zp0, 3), un("SAX", Zp0, 3),
    of("DEY", Imp, 2), un("NOP", Imm, 2), of("TXA", Imp, 2), un("XAA", Imm, 2),
    of("STY", Abs, 4), of("STA", Abs, 4), of("STX", Abs, 4), un("SAX", Abs, 4),
    // 0x90
    of("BCC", Rel, 2), of("STA", Idy, 6), un("STP", Imp, 2), un("AHX", Idy, 6),
    of("STY", Zpx, 4), of("STA", Zpx, 4), of("STX", Zpy, 4), un("SAX", Zpy, 4),
    of("TYA", Imp, 2), of("STA", Aby, 5), of("TXS", Imp, 2), un("TAS", Aby, 5),
    un("SHY", Abx, 5), of("STA", Abx, 5), un("SHX", Aby, 5), un("AHX", Aby, 5),
    // 0xA0
    of("LDY", Imm, 2), of("LDA", Idx, 6), of("LDX", Imm, 2), un("LAX", Idx, 6),
    of("LDY", Zp0, 3), of("LDA", Zp0, 3), of("LDX", Zp0, 3), un("LAX", Zp0, 3),
    of("TAY", Imp, 2), of("LDA", Imm, 2), of("TAX", Imp, 2), un("LAX", Imm, 2),
    of("LDY", Abs, 4), of("LDA", Abs, 4), of("LDX", Abs, 4), un("LAX", Abs, 4),
    // 0xB0
    of("BCS", Rel, 2), of_p("LDA", Idy, 5), un("STP", Imp, 2), un_p("LAX", Idy, 5),
    of("LDY", Zpx, 4), of("LDA", Zpx, 4), of("LDX", Zpy, 4), un("LAX", Zpy, 4),
    of("CLV", Imp, 2), of_p("LDA", Aby, 4), of("TSX", Imp, 2), un_p("LAS", Aby, 4),
    of_p("LDY", Abx, 4), of_p("LDA", Abx, 4), of_p("LDX", Aby, 4), un_p("LAX", Aby, 4),
    // 0xC0
    of("CPY", Imm, 2), of("CMP", Idx, 6), un("NOP", Imm, 2), un("DCP", Idx, 8),
    of("CPY", Zp0, 3), of("CMP", Zp0, 3), of("DEC", Zp0, 5), un("DCP", Zp0, 5),
    of("INY", Imp, 2), of("CMP", Imm, 2), of("DEX", Imp, 2), un("AXS", Imm, 2),
    of("CPY", Abs, 4), of("CMP", Abs, 4), of("DEC", Abs, 6), un("DCP", Abs, 6),
    // 0xD0
    of("BNE", Rel, 2), of_p("CMP", Idy, 5), un("STP", Imp, 2), un("DCP", Idy, 8),
    un("NOP", Zpx, 4), of("CMP", Zpx, 4), of("DEC", Zpx, 6), un("DCP", Zpx, 6),
    of("CLD", Imp, 2), of_p("CMP", Aby, 4), un("NOP", Imp, 2), un("DCP", Aby, 7),
    un_p("NOP", Abx, 4), of_p("CMP", Abx, 4), of("DEC", Abx, 7), un("DCP", Abx, 7),
    // 0xE0
    of("CPX", Imm, 2), of("SBC", Idx, 6), un("NOP", Imm, 2), un("ISB", Idx, 8),
    of("CPX", Zp0, 3), of("SBC", Zp0, 3), of("INC", Zp0, 5), un("ISB", Zp0, 5),
    of("INX", Imp, 2), of("SBC", Imm, 2), of("NOP", Imp, 2), un("SBC", Imm, 2),
    of("CPX", Abs, 4), of("SBC", Abs, 4), of("INC", Abs, 6), un("ISB", Abs, 6),
    // 0xF0
    of("BEQ", Rel, 2), of_p("SBC", Idy, 5), un("STP", Imp, 2), un("ISB", Idy, 8),
    un("NOP", Zpx, 4), of("SBC", Zpx, 4), of("INC", Zpx, 6), un("ISB", Zpx, 6),
    of("SED", Imp, 2), of_p("SBC", Aby, 4), un("NOP", Imp, 2), un("ISB", Aby, 7),
    un_p("NOP", Abx, 4), of_p("SBC", Abx, 4), of("INC", Abx, 7), un("ISB", Abx, 7),
];
