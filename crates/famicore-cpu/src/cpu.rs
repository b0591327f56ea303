//! 6502 CPU core: registers, the fetch/decode/execute loop, addressing-mode
//! resolution, interrupts and the halt latch.
//!
//! The execution model is instruction-level: one [`Cpu::step`] fetches,
//! decodes and fully executes a single instruction, returning the cycles it
//! consumed so the caller can advance the PPU by three dots per cycle.
//! Handlers run with PC pointing at the first operand byte; when a handler
//! does not redirect control flow, PC then advances by the operand size.

use crate::addressing::AddrMode;
use crate::bus::Bus;
use crate::opcodes::{OpcodeInfo, OPCODE_TABLE};
use crate::status::Status;

/// Interrupt vector addresses.
pub mod vectors {
    /// NMI (non-maskable interrupt) vector.
    pub const NMI: u16 = 0xFFFA;
    /// Reset vector.
    pub const RESET: u16 = 0xFFFC;
    /// IRQ/BRK vector.
    pub const IRQ: u16 = 0xFFFE;
}

/// Descriptor for one hardware interrupt sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interrupt {
    /// Address the 16-bit handler pointer is fetched from.
    pub vector: u16,
    /// Whether the pushed status byte carries the B flag.
    pub push_break: bool,
    /// Cycles charged for the sequence.
    pub cycles: u8,
}

impl Interrupt {
    /// Non-maskable interrupt, raised by the PPU at vblank.
    pub const NMI: Self = Self { vector: vectors::NMI, push_break: false, cycles: 7 };
    /// Maskable interrupt request.
    pub const IRQ: Self = Self { vector: vectors::IRQ, push_break: false, cycles: 7 };
}

/// Base of the stack page ($0100-$01FF).
const STACK_BASE: u16 = 0x0100;

/// Stack pointer value after reset.
const STACK_RESET: u8 = 0xFD;

/// NES 6502 CPU (the 2A03 core: no decimal arithmetic).
#[derive(Debug)]
pub struct Cpu {
    /// Accumulator.
    pub a: u8,
    /// X index register.
    pub x: u8,
    /// Y index register.
    pub y: u8,
    /// Program counter.
    pub pc: u16,
    /// Stack pointer into $0100-$01FF.
    pub sp: u8,
    /// Processor status flags.
    pub status: Status,
    /// Total cycles executed, monotonic.
    pub cycles: u64,
    /// Opcode byte of the instruction currently executing.
    opcode: u8,
    /// Halt latch, set by any STP opcode.
    halted: bool,
    /// Edge-triggered NMI latch, checked between instructions.
    nmi_pending: bool,
    /// Level-triggered IRQ line.
    irq_line: bool,
    /// Set when the current handler assigned PC itself.
    jumped: bool,
}

impl Cpu {
    /// Create a CPU in its post-reset state; PC is loaded on [`Cpu::reset`].
    #[must_use]
    pub fn new() -> Self {
        Self {
            a: 0,
            x: 0,
            y: 0,
            pc: 0,
            sp: STACK_RESET,
            status: Status::RESET,
            cycles: 7,
            opcode: 0,
            halted: false,
            nmi_pending: false,
            irq_line: false,
            jumped: false,
        }
    }

    /// Reset the CPU: SP to $FD, P to I|U, PC from the reset vector, the
    /// cycle counter to the 7 cycles the reset sequence consumes.
    pub fn reset(&mut self, bus: &mut impl Bus) {
        self.a = 0;
        self.x = 0;
        self.y = 0;
        self.sp = STACK_RESET;
        self.status = Status::RESET;
        self.cycles = 7;
        self.opcode = 0;
        self.halted = false;
        self.nmi_pending = false;
        self.irq_line = false;
        self.pc = bus.read_u16(vectors::RESET);
    }

    /// Latch a pending NMI; serviced before the next instruction fetch.
    pub fn trigger_nmi(&mut self) {
        self.nmi_pending = true;
    }

    /// Drive the level-triggered IRQ line.
    pub fn set_irq(&mut self, active: bool) {
        self.irq_line = active;
    }

    /// True once an STP opcode has latched the halt state.
    #[must_use]
    pub fn halted(&self) -> bool {
        self.halted
    }

    /// Opcode byte of the most recently fetched instruction.
    #[must_use]
    pub fn opcode(&self) -> u8 {
        self.opcode
    }

    /// Execute one instruction (or service one interrupt) and return the
    /// cycles consumed. Returns 0 when halted.
    pub fn step(&mut self, bus: &mut impl Bus) -> u8 {
        if self.halted {
            return 0;
        }

        // NMI first: edge-triggered, immune to the I flag.
        if self.nmi_pending {
            self.nmi_pending = false;
            return self.service_interrupt(bus, Interrupt::NMI);
        }

        if self.irq_line && !self.status.contains(Status::I) {
            return self.service_interrupt(bus, Interrupt::IRQ);
        }

        self.opcode = bus.read(self.pc);
        self.pc = self.pc.wrapping_add(1);
        self.jumped = false;

        let info = &OPCODE_TABLE[usize::from(self.opcode)];
        let extra = self.execute(info, bus);

        if !self.jumped {
            self.pc = self.pc.wrapping_add(u16::from(info.mode.operand_size()));
        }

        let total = info.cycles + extra;
        self.cycles += u64::from(total);
        total
    }

    /// Push PC and status, set I, jump through the vector.
    fn service_interrupt(&mut self, bus: &mut impl Bus, interrupt: Interrupt) -> u8 {
        self.push_u16(bus, self.pc);
        self.push_u8(bus, self.status.to_stack_byte(interrupt.push_break));
        self.status.insert(Status::I);
        self.pc = bus.read_u16(interrupt.vector);
        self.cycles += u64::from(interrupt.cycles);
        interrupt.cycles
    }

    // =========================================================================
    // Stack
    // =========================================================================

    fn push_u8(&mut self, bus: &mut impl Bus, value: u8) {
        bus.write(STACK_BASE | u16::from(self.sp), value);
        self.sp = self.sp.wrapping_sub(1);
    }

    fn push_u16(&mut self, bus: &mut impl Bus, value: u16) {
        self.push_u8(bus, (value >> 8) as u8);
        self.push_u8(bus, (value & 0x00FF) as u8);
    }

    fn pop_u8(&mut self, bus: &mut impl Bus) -> u8 {
        self.sp = self.sp.wrapping_add(1);
        bus.read(STACK_BASE | u16::from(self.sp))
    }

    fn pop_u16(&mut self, bus: &mut impl Bus) -> u16 {
        let lo = u16::from(self.pop_u8(bus));
        let hi = u16::from(self.pop_u8(bus));
        (hi << 8) | lo
    }

    // =========================================================================
    // Addressing
    // =========================================================================

    /// Resolve the operand at PC for the given mode, returning the effective
    /// address and whether indexing crossed a page boundary.
    fn operand_addr(&mut self, bus: &mut impl Bus, mode: AddrMode) -> (u16, bool) {
        match mode {
            AddrMode::Imm => (self.pc, false),
            AddrMode::Zp0 => (u16::from(bus.read(self.pc)), false),
            AddrMode::Zpx => (u16::from(bus.read(self.pc).wrapping_add(self.x)), false),
            AddrMode::Zpy => (u16::from(bus.read(self.pc).wrapping_add(self.y)), false),
            AddrMode::Abs => (bus.read_u16(self.pc), false),
            AddrMode::Abx => {
                let base = bus.read_u16(self.pc);
                let addr = base.wrapping_add(u16::from(self.x));
                (addr, page_crossed(base, addr))
            }
            AddrMode::Aby => {
                let base = bus.read_u16(self.pc);
                let addr = base.wrapping_add(u16::from(self.y));
                (addr, page_crossed(base, addr))
            }
            AddrMode::Idx => {
                let ptr = bus.read(self.pc).wrapping_add(self.x);
                let lo = u16::from(bus.read(u16::from(ptr)));
                let hi = u16::from(bus.read(u16::from(ptr.wrapping_add(1))));
                ((hi << 8) | lo, false)
            }
            AddrMode::Idy => {
                let ptr = bus.read(self.pc);
                let lo = u16::from(bus.read(u16::from(ptr)));
                let hi = u16::from(bus.read(u16::from(ptr.wrapping_add(1))));
                let base = (hi << 8) | lo;
                let addr = base.wrapping_add(u16::from(self.y));
                (addr, page_crossed(base, addr))
            }
            // Implied/Accumulator have no operand; Indirect and Relative are
            // resolved inside JMP and the branches.
            AddrMode::Imp | AddrMode::Acc | AddrMode::Ind | AddrMode::Rel => (self.pc, false),
        }
    }

    /// Read the operand value for a read-like instruction, returning the
    /// page-cross penalty cycles alongside it.
    fn read_operand(&mut self, bus: &mut impl Bus, info: &OpcodeInfo) -> (u8, u8) {
        let (addr, crossed) = self.operand_addr(bus, info.mode);
        let value = bus.read(addr);
        (value, u8::from(crossed && info.page_penalty))
    }

    /// Redirect control flow; suppresses the automatic PC advance.
    fn goto(&mut self, target: u16) {
        self.pc = target;
        self.jumped = true;
    }

    // =========================================================================
    // Dispatch
    // =========================================================================

    /// Execute the decoded instruction, returning extra cycles beyond the
    /// table's base count (page-cross and branch penalties).
    #[allow(clippy::too_many_lines)]
    fn execute(&mut self, info: &OpcodeInfo, bus: &mut impl Bus) -> u8 {
        match self.opcode {
            // Loads
            0xA9 | 0xA5 | 0xB5 | 0xAD | 0xBD | 0xB9 | 0xA1 | 0xB1 => self.lda(bus, info),
            0xA2 | 0xA6 | 0xB6 | 0xAE | 0xBE => self.ldx(bus, info),
            0xA0 | 0xA4 | 0xB4 | 0xAC | 0xBC => self.ldy(bus, info),

            // Stores
            0x85 | 0x95 | 0x8D | 0x9D | 0x99 | 0x81 | 0x91 => self.store(bus, info, self.a),
            0x86 | 0x96 | 0x8E => self.store(bus, info, self.x),
            0x84 | 0x94 | 0x8C => self.store(bus, info, self.y),

            // Transfers
            0xAA => self.set_x(self.a),
            0xA8 => self.set_y(self.a),
            0x8A => self.set_a(self.x),
            0x98 => self.set_a(self.y),
            0xBA => self.set_x(self.sp),
            0x9A => {
                self.sp = self.x;
                0
            }

            // Stack
            0x48 => {
                self.push_u8(bus, self.a);
                0
            }
            0x08 => {
                let byte = self.status.to_stack_byte(true);
                self.push_u8(bus, byte);
                0
            }
            0x68 => {
                let value = self.pop_u8(bus);
                self.set_a(value)
            }
            0x28 => {
                self.status = Status::from_stack_byte(self.pop_u8(bus));
                0
            }

            // Arithmetic
            0x69 | 0x65 | 0x75 | 0x6D | 0x7D | 0x79 | 0x61 | 0x71 => self.adc(bus, info),
            0xE9 | 0xE5 | 0xF5 | 0xED | 0xFD | 0xF9 | 0xE1 | 0xF1 | 0xEB => self.sbc(bus, info),

            // Logic
            0x29 | 0x25 | 0x35 | 0x2D | 0x3D | 0x39 | 0x21 | 0x31 => self.and(bus, info),
            0x09 | 0x05 | 0x15 | 0x0D | 0x1D | 0x19 | 0x01 | 0x11 => self.ora(bus, info),
            0x49 | 0x45 | 0x55 | 0x4D | 0x5D | 0x59 | 0x41 | 0x51 => self.eor(bus, info),
            0x24 | 0x2C => self.bit(bus, info),

            // Compares
            0xC9 | 0xC5 | 0xD5 | 0xCD | 0xDD | 0xD9 | 0xC1 | 0xD1 => self.compare(bus, info, self.a),
            0xE0 | 0xE4 | 0xEC => self.compare(bus, info, self.x),
            0xC0 | 0xC4 | 0xCC => self.compare(bus, info, self.y),

            // Increments / decrements
            0xE6 | 0xF6 | 0xEE | 0xFE => self.rmw(bus, info, |_, v| v.wrapping_add(1)),
            0xC6 | 0xD6 | 0xCE | 0xDE => self.rmw(bus, info, |_, v| v.wrapping_sub(1)),
            0xE8 => self.set_x(self.x.wrapping_add(1)),
            0xC8 => self.set_y(self.y.wrapping_add(1)),
            0xCA => self.set_x(self.x.wrapping_sub(1)),
            0x88 => self.set_y(self.y.wrapping_sub(1)),

            // Shifts and rotates
            0x0A => self.asl_acc(),
            0x06 | 0x16 | 0x0E | 0x1E => self.rmw(bus, info, Self::asl_value),
            0x4A => self.lsr_acc(),
            0x46 | 0x56 | 0x4E | 0x5E => self.rmw(bus, info, Self::lsr_value),
            0x2A => self.rol_acc(),
            0x26 | 0x36 | 0x2E | 0x3E => self.rmw(bus, info, Self::rol_value),
            0x6A => self.ror_acc(),
            0x66 | 0x76 | 0x6E | 0x7E => self.rmw(bus, info, Self::ror_value),

            // Flag operations
            0x18 => self.flag(Status::C, false),
            0x38 => self.flag(Status::C, true),
            0x58 => self.flag(Status::I, false),
            0x78 => self.flag(Status::I, true),
            0xD8 => self.flag(Status::D, false),
            0xF8 => self.flag(Status::D, true),
            0xB8 => self.flag(Status::V, false),

            // Branches
            0x10 => self.branch(bus, !self.status.contains(Status::N)),
            0x30 => self.branch(bus, self.status.contains(Status::N)),
            0x50 => self.branch(bus, !self.status.contains(Status::V)),
            0x70 => self.branch(bus, self.status.contains(Status::V)),
            0x90 => self.branch(bus, !self.status.contains(Status::C)),
            0xB0 => self.branch(bus, self.status.contains(Status::C)),
            0xD0 => self.branch(bus, !self.status.contains(Status::Z)),
            0xF0 => self.branch(bus, self.status.contains(Status::Z)),

            // Jumps, subroutines, interrupts
            0x4C => {
                let target = bus.read_u16(self.pc);
                self.goto(target);
                0
            }
            0x6C => {
                let ptr = bus.read_u16(self.pc);
                let target = bus.read_u16_wrapped(ptr);
                self.goto(target);
                0
            }
            0x20 => self.jsr(bus),
            0x60 => {
                let target = self.pop_u16(bus).wrapping_add(1);
                self.goto(target);
                0
            }
            0x40 => self.rti(bus),
            0x00 => self.brk(bus),

            // Official NOP
            0xEA => 0,

            // Documented illegal opcodes
            0x1A | 0x3A | 0x5A | 0x7A | 0xDA | 0xFA => 0,
            0x80 | 0x82 | 0x89 | 0xC2 | 0xE2 | 0x04 | 0x44 | 0x64 | 0x14 | 0x34 | 0x54 | 0x74
            | 0xD4 | 0xF4 | 0x0C | 0x1C | 0x3C | 0x5C | 0x7C | 0xDC | 0xFC => {
                // Wide NOPs still perform the read (and pay the penalty).
                let (_, penalty) = self.read_operand(bus, info);
                penalty
            }
            0xA7 | 0xB7 | 0xAF | 0xBF | 0xA3 | 0xB3 | 0xAB => self.lax(bus, info),
            0x87 | 0x97 | 0x8F | 0x83 => self.store(bus, info, self.a & self.x),
            0x07 | 0x17 | 0x0F | 0x1F | 0x1B | 0x03 | 0x13 => self.slo(bus, info),
            0x27 | 0x37 | 0x2F | 0x3F | 0x3B | 0x23 | 0x33 => self.rla(bus, info),
            0x47 | 0x57 | 0x4F | 0x5F | 0x5B | 0x43 | 0x53 => self.sre(bus, info),
            0x67 | 0x77 | 0x6F | 0x7F | 0x7B | 0x63 | 0x73 => self.rra(bus, info),
            0xC7 | 0xD7 | 0xCF | 0xDF | 0xDB | 0xC3 | 0xD3 => self.dcp(bus, info),
            0xE7 | 0xF7 | 0xEF | 0xFF | 0xFB | 0xE3 | 0xF3 => self.isc(bus, info),
            0x0B | 0x2B => self.anc(bus, info),
            0x4B => self.alr(bus, info),
            0x6B => self.arr(bus, info),
            0xCB => self.axs(bus, info),
            0xBB => self.las(bus, info),
            0x8B => self.xaa(bus, info),
            0x93 | 0x9F => self.high_byte_store(bus, info, self.a & self.x),
            0x9E => self.high_byte_store(bus, info, self.x),
            0x9C => self.high_byte_store(bus, info, self.y),
            0x9B => {
                self.sp = self.a & self.x;
                self.high_byte_store(bus, info, self.sp)
            }
            0x02 | 0x12 | 0x22 | 0x32 | 0x42 | 0x52 | 0x62 | 0x72 | 0x92 | 0xB2 | 0xD2 | 0xF2 => {
                self.halted = true;
                log::warn!("STP ({:#04X}) halted the CPU at {:#06X}", self.opcode, self.pc);
                0
            }
        }
    }

    // =========================================================================
    // Instruction helpers
    // =========================================================================

    /// Write to A and refresh Z/N. Returns 0 extra cycles for dispatch arms.
    fn set_a(&mut self, value: u8) -> u8 {
        self.a = value;
        self.status.set_zn(value);
        0
    }

    fn set_x(&mut self, value: u8) -> u8 {
        self.x = value;
        self.status.set_zn(value);
        0
    }

    fn set_y(&mut self, value: u8) -> u8 {
        self.y = value;
        self.status.set_zn(value);
        0
    }

    fn flag(&mut self, flag: Status, value: bool) -> u8 {
        self.status.assign(flag, value);
        0
    }

    fn lda(&mut self, bus: &mut impl Bus, info: &OpcodeInfo) -> u8 {
        let (value, penalty) = self.read_operand(bus, info);
        self.set_a(value);
        penalty
    }

    fn ldx(&mut self, bus: &mut impl Bus, info: &OpcodeInfo) -> u8 {
        let (value, penalty) = self.read_operand(bus, info);
        self.set_x(value);
        penalty
    }

    fn ldy(&mut self, bus: &mut impl Bus, info: &OpcodeInfo) -> u8 {
        let (value, penalty) = self.read_operand(bus, info);
        self.set_y(value);
        penalty
    }

    /// Store a register; stores always run their worst-case cycle count.
    fn store(&mut self, bus: &mut impl Bus, info: &OpcodeInfo, value: u8) -> u8 {
        let (addr, _) = self.operand_addr(bus, info.mode);
        bus.write(addr, value);
        0
    }

    /// Shared ADC/SBC core: A + value + C with carry and signed overflow.
    fn add_to_a(&mut self, value: u8) {
        let carry = u16::from(self.status.contains(Status::C));
        let sum = u16::from(self.a) + u16::from(value) + carry;
        let result = (sum & 0x00FF) as u8;

        self.status.assign(Status::C, sum > 0x00FF);
        self.status
            .assign(Status::V, (value ^ result) & (result ^ self.a) & 0x80 != 0);
        self.set_a(result);
    }

    fn adc(&mut self, bus: &mut impl Bus, info: &OpcodeInfo) -> u8 {
        let (value, penalty) = self.read_operand(bus, info);
        self.add_to_a(value);
        penalty
    }

    /// SBC is ADC of the one's complement; the D flag is ignored (2A03).
    fn sbc(&mut self, bus: &mut impl Bus, info: &OpcodeInfo) -> u8 {
        let (value, penalty) = self.read_operand(bus, info);
        self.add_to_a(!value);
        penalty
    }

    fn and(&mut self, bus: &mut impl Bus, info: &OpcodeInfo) -> u8 {
        let (value, penalty) = self.read_operand(bus, info);
        self.set_a(self.a & value);
        penalty
    }

    fn ora(&mut self, bus: &mut impl Bus, info: &OpcodeInfo) -> u8 {
        let (value, penalty) = self.read_operand(bus, info);
        self.set_a(self.a | value);
        penalty
    }

    fn eor(&mut self, bus: &mut impl Bus, info: &OpcodeInfo) -> u8 {
        let (value, penalty) = self.read_operand(bus, info);
        self.set_a(self.a ^ value);
        penalty
    }

    fn bit(&mut self, bus: &mut impl Bus, info: &OpcodeInfo) -> u8 {
        let (value, _) = self.read_operand(bus, info);
        self.status.assign(Status::Z, self.a & value == 0);
        self.status.assign(Status::V, value & 0x40 != 0);
        self.status.assign(Status::N, value & 0x80 != 0);
        0
    }

    /// CMP/CPX/CPY: C = reg >= M, Z/N from reg - M.
    fn compare(&mut self, bus: &mut impl Bus, info: &OpcodeInfo, register: u8) -> u8 {
        let (value, penalty) = self.read_operand(bus, info);
        self.status.assign(Status::C, register >= value);
        self.status.set_zn(register.wrapping_sub(value));
        penalty
    }

    /// Read-modify-write on memory; the closure computes the new value and
    /// may update flags. Z/N follow the written byte.
    fn rmw(&mut self, bus: &mut impl Bus, info: &OpcodeInfo, op: fn(&mut Self, u8) -> u8) -> u8 {
        let (addr, _) = self.operand_addr(bus, info.mode);
        let value = bus.read(addr);
        let result = op(self, value);
        bus.write(addr, result);
        self.status.set_zn(result);
        0
    }

    /// RMW that returns the written value for combination illegals.
    fn rmw_value(&mut self, bus: &mut impl Bus, info: &OpcodeInfo, op: fn(&mut Self, u8) -> u8) -> u8 {
        let (addr, _) = self.operand_addr(bus, info.mode);
        let value = bus.read(addr);
        let result = op(self, value);
        bus.write(addr, result);
        result
    }

    fn asl_value(&mut self, value: u8) -> u8 {
        self.status.assign(Status::C, value & 0x80 != 0);
        value << 1
    }

    fn lsr_value(&mut self, value: u8) -> u8 {
        self.status.assign(Status::C, value & 0x01 != 0);
        value >> 1
    }

    fn rol_value(&mut self, value: u8) -> u8 {
        let carry_in = u8::from(self.status.contains(Status::C));
        self.status.assign(Status::C, value & 0x80 != 0);
        (value << 1) | carry_in
    }

    fn ror_value(&mut self, value: u8) -> u8 {
        let carry_in = u8::from(self.status.contains(Status::C)) << 7;
        self.status.assign(Status::C, value & 0x01 != 0);
        (value >> 1) | carry_in
    }

    fn asl_acc(&mut self) -> u8 {
        let result = self.asl_value(self.a);
        self.set_a(result)
    }

    fn lsr_acc(&mut self) -> u8 {
        let result = self.lsr_value(self.a);
        self.set_a(result)
    }

    fn rol_acc(&mut self) -> u8 {
        let result = self.rol_value(self.a);
        self.set_a(result)
    }

    fn ror_acc(&mut self) -> u8 {
        let result = self.ror_value(self.a);
        self.set_a(result)
    }

    /// Conditional branch. Taken: +1 cycle, +1 more when the target is on a
    /// different page than the instruction-following address.
    fn branch(&mut self, bus: &mut impl Bus, condition: bool) -> u8 {
        if !condition {
            return 0;
        }
        let offset = bus.read(self.pc) as i8;
        let base = self.pc.wrapping_add(1);
        let target = base.wrapping_add(offset as u16);
        let penalty = 1 + u8::from(page_crossed(base, target));
        self.goto(target);
        penalty
    }

    /// JSR pushes the address of its last operand byte (PC + 1 here, with PC
    /// at the first operand byte), then jumps.
    fn jsr(&mut self, bus: &mut impl Bus) -> u8 {
        let target = bus.read_u16(self.pc);
        let return_addr = self.pc.wrapping_add(1);
        self.push_u16(bus, return_addr);
        self.goto(target);
        0
    }

    fn rti(&mut self, bus: &mut impl Bus) -> u8 {
        self.status = Status::from_stack_byte(self.pop_u8(bus));
        let target = self.pop_u16(bus);
        self.goto(target);
        0
    }

    /// BRK: push PC past the padding byte, push P with B set, enter the IRQ
    /// vector. The base cycle cost (7) comes from the opcode table.
    fn brk(&mut self, bus: &mut impl Bus) -> u8 {
        let return_addr = self.pc.wrapping_add(1);
        self.push_u16(bus, return_addr);
        self.push_u8(bus, self.status.to_stack_byte(true));
        self.status.insert(Status::I);
        let target = bus.read_u16(vectors::IRQ);
        self.goto(target);
        0
    }

    // ----- documented illegal opcodes -----

    /// LAX: load A and X together.
    fn lax(&mut self, bus: &mut impl Bus, info: &OpcodeInfo) -> u8 {
        let (value, penalty) = self.read_operand(bus, info);
        self.a = value;
        self.x = value;
        self.status.set_zn(value);
        penalty
    }

    /// SLO: ASL memory, then ORA the result into A.
    fn slo(&mut self, bus: &mut impl Bus, info: &OpcodeInfo) -> u8 {
        let result = self.rmw_value(bus, info, Self::asl_value);
        self.set_a(self.a | result)
    }

    /// RLA: ROL memory, then AND the result into A.
    fn rla(&mut self, bus: &mut impl Bus, info: &OpcodeInfo) -> u8 {
        let result = self.rmw_value(bus, info, Self::rol_value);
        self.set_a(self.a & result)
    }

    /// SRE: LSR memory, then EOR the result into A.
    fn sre(&mut self, bus: &mut impl Bus, info: &OpcodeInfo) -> u8 {
        let result = self.rmw_value(bus, info, Self::lsr_value);
        self.set_a(self.a ^ result)
    }

    /// RRA: ROR memory, then ADC the result.
    fn rra(&mut self, bus: &mut impl Bus, info: &OpcodeInfo) -> u8 {
        let result = self.rmw_value(bus, info, Self::ror_value);
        self.add_to_a(result);
        0
    }

    /// DCP: DEC memory, then CMP with A.
    fn dcp(&mut self, bus: &mut impl Bus, info: &OpcodeInfo) -> u8 {
        let (addr, _) = self.operand_addr(bus, info.mode);
        let result = bus.read(addr).wrapping_sub(1);
        bus.write(addr, result);
        self.status.assign(Status::C, self.a >= result);
        self.status.set_zn(self.a.wrapping_sub(result));
        0
    }

    /// ISC/ISB: INC memory, then SBC the result.
    fn isc(&mut self, bus: &mut impl Bus, info: &OpcodeInfo) -> u8 {
        let (addr, _) = self.operand_addr(bus, info.mode);
        let result = bus.read(addr).wrapping_add(1);
        bus.write(addr, result);
        self.add_to_a(!result);
        0
    }

    /// ANC: AND immediate, then copy N into C.
    fn anc(&mut self, bus: &mut impl Bus, info: &OpcodeInfo) -> u8 {
        let (value, _) = self.read_operand(bus, info);
        self.set_a(self.a & value);
        let negative = self.status.contains(Status::N);
        self.status.assign(Status::C, negative);
        0
    }

    /// ALR: AND immediate, then LSR A.
    fn alr(&mut self, bus: &mut impl Bus, info: &OpcodeInfo) -> u8 {
        let (value, _) = self.read_operand(bus, info);
        let and = self.a & value;
        self.status.assign(Status::C, and & 0x01 != 0);
        self.set_a(and >> 1)
    }

    /// ARR: AND immediate, ROR A, with C from bit 6 and V from bit 6 ^ bit 5.
    fn arr(&mut self, bus: &mut impl Bus, info: &OpcodeInfo) -> u8 {
        let (value, _) = self.read_operand(bus, info);
        let carry_in = u8::from(self.status.contains(Status::C)) << 7;
        let result = ((self.a & value) >> 1) | carry_in;
        self.set_a(result);
        self.status.assign(Status::C, result & 0x40 != 0);
        self.status
            .assign(Status::V, ((result >> 6) ^ (result >> 5)) & 0x01 != 0);
        0
    }

    /// AXS/SBX: X = (A & X) - immediate, borrowless compare semantics.
    fn axs(&mut self, bus: &mut impl Bus, info: &OpcodeInfo) -> u8 {
        let (value, _) = self.read_operand(bus, info);
        let and = self.a & self.x;
        self.status.assign(Status::C, and >= value);
        self.set_x(and.wrapping_sub(value))
    }

    /// LAS: memory AND SP into A, X and SP.
    fn las(&mut self, bus: &mut impl Bus, info: &OpcodeInfo) -> u8 {
        let (value, penalty) = self.read_operand(bus, info);
        let result = value & self.sp;
        self.a = result;
        self.x = result;
        self.sp = result;
        self.status.set_zn(result);
        penalty
    }

    /// XAA: unstable on hardware; modelled as A = X AND immediate.
    fn xaa(&mut self, bus: &mut impl Bus, info: &OpcodeInfo) -> u8 {
        let (value, _) = self.read_operand(bus, info);
        self.set_a(self.x & value)
    }

    /// AHX/SHX/SHY/TAS family: store `value & (high byte of address + 1)`.
    fn high_byte_store(&mut self, bus: &mut impl Bus, info: &OpcodeInfo, value: u8) -> u8 {
        let (addr, _) = self.operand_addr(bus, info.mode);
        let mask = ((addr >> 8) as u8).wrapping_add(1);
        bus.write(addr, value & mask);
        0
    }
}

impl Default for Cpu {
    fn default() -> Self {
        Self::new()
    }
}

/// True when two addresses fall on different 256-byte pages.
#[inline]
const fn page_crossed(a: u16, b: u16) -> bool {
    a & 0xFF00 != b & 0xFF00
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FlatBus {
        ram: Vec<u8>,
    }

    impl FlatBus {
        fn new() -> Self {
            Self { ram: vec![0; 0x10000] }
        }

        fn load(&mut self, addr: u16, program: &[u8]) {
            let start = addr as usize;
            self.ram[start..start + program.len()].copy_from_slice(program);
        }

        fn with_program(program: &[u8]) -> Self {
            let mut bus = Self::new();
            bus.load(0x8000, program);
            bus.ram[0xFFFC] = 0x00;
            bus.ram[0xFFFD] = 0x80;
            bus
        }
    }

    impl Bus for FlatBus {
        fn read(&mut self, addr: u16) -> u8 {
            self.ram[addr as usize]
        }
        fn write(&mut self, addr: u16, value: u8) {
            self.ram[addr as usize] = value;
        }
        fn peek(&self, addr: u16) -> u8 {
            self.ram[addr as usize]
        }
    }

    fn boot(program: &[u8]) -> (Cpu, FlatBus) {
        let mut bus = FlatBus::with_program(program);
        let mut cpu = Cpu::new();
        cpu.reset(&mut bus);
        (cpu, bus)
    }

    #[test]
    fn test_reset_state() {
        let (cpu, _) = boot(&[0xEA]);
        assert_eq!(cpu.pc, 0x8000);
        assert_eq!(cpu.sp, 0xFD);
        assert_eq!(cpu.status.bits(), 0x24);
        assert_eq!(cpu.cycles, 7);
    }

    #[test]
    fn test_lda_immediate_flags() {
        let (mut cpu, mut bus) = boot(&[0xA9, 0x00, 0xA9, 0x80, 0xA9, 0x42]);
        cpu.step(&mut bus);
        assert!(cpu.status.contains(Status::Z));
        cpu.step(&mut bus);
        assert!(cpu.status.contains(Status::N));
        cpu.step(&mut bus);
        assert_eq!(cpu.a, 0x42);
        assert!(!cpu.status.contains(Status::Z | Status::N));
        assert_eq!(cpu.pc, 0x8006);
    }

    #[test]
    fn test_unused_bit_always_high() {
        let (mut cpu, mut bus) = boot(&[0xA9, 0xFF, 0x48, 0x28, 0xEA]);
        for _ in 0..4 {
            cpu.step(&mut bus);
            assert_eq!(cpu.status.bits() & 0x20, 0x20);
            assert_eq!(cpu.status.bits() & 0x10, 0);
        }
    }

    #[test]
    fn test_adc_carry_and_overflow() {
        // 0x50 + 0x50 = 0xA0: no carry, signed overflow
        let (mut cpu, mut bus) = boot(&[0xA9, 0x50, 0x69, 0x50]);
        cpu.step(&mut bus);
        cpu.step(&mut bus);
        assert_eq!(cpu.a, 0xA0);
        assert!(!cpu.status.contains(Status::C));
        assert!(cpu.status.contains(Status::V));
        assert!(cpu.status.contains(Status::N));
    }

    #[test]
    fn test_sbc_uses_operand_complement() {
        // A=0x40, SEC, SBC #$10 -> 0x30, carry stays set
        let (mut cpu, mut bus) = boot(&[0xA9, 0x40, 0x38, 0xE9, 0x10]);
        cpu.step(&mut bus);
        cpu.step(&mut bus);
        cpu.step(&mut bus);
        assert_eq!(cpu.a, 0x30);
        assert!(cpu.status.contains(Status::C));
        assert!(!cpu.status.contains(Status::V));
    }

    #[test]
    fn test_compare_carry_is_a_ge_m() {
        let (mut cpu, mut bus) = boot(&[0xA9, 0x40, 0xC9, 0x40, 0xC9, 0x41]);
        cpu.step(&mut bus);
        cpu.step(&mut bus);
        assert!(cpu.status.contains(Status::C));
        assert!(cpu.status.contains(Status::Z));
        cpu.step(&mut bus);
        assert!(!cpu.status.contains(Status::C));
        assert!(cpu.status.contains(Status::N));
    }

    #[test]
    fn test_page_cross_penalty_lda_abx() {
        // LDA $00FF,X with X=1 -> 5 cycles; with X=0 -> 4 cycles
        let (mut cpu, mut bus) = boot(&[0xA2, 0x01, 0xBD, 0xFF, 0x00, 0xBD, 0xFF, 0x00]);
        cpu.step(&mut bus); // LDX #$01
        assert_eq!(cpu.step(&mut bus), 5);
        cpu.x = 0;
        assert_eq!(cpu.step(&mut bus), 4);
    }

    #[test]
    fn test_store_never_pays_penalty() {
        let (mut cpu, mut bus) = boot(&[0xA2, 0x01, 0x9D, 0xFF, 0x00]);
        cpu.step(&mut bus);
        assert_eq!(cpu.step(&mut bus), 5); // STA abs,X is always 5
        assert_eq!(bus.ram[0x0100], 0x00);
    }

    #[test]
    fn test_branch_cycle_penalties() {
        // BEQ not taken: 2 cycles
        let (mut cpu, mut bus) = boot(&[0xA9, 0x01, 0xF0, 0x10]);
        cpu.step(&mut bus);
        assert_eq!(cpu.step(&mut bus), 2);

        // BEQ taken, same page: 3 cycles
        let (mut cpu, mut bus) = boot(&[0xA9, 0x00, 0xF0, 0x10]);
        cpu.step(&mut bus);
        assert_eq!(cpu.step(&mut bus), 3);
        assert_eq!(cpu.pc, 0x8014);

        // BEQ taken, crossing a page: 4 cycles
        let mut bus = FlatBus::with_program(&[]);
        bus.load(0x80F0, &[0xA9, 0x00, 0xF0, 0x20]);
        let mut cpu = Cpu::new();
        cpu.reset(&mut bus);
        cpu.pc = 0x80F0;
        cpu.step(&mut bus);
        assert_eq!(cpu.step(&mut bus), 4);
        assert_eq!(cpu.pc, 0x8114);
    }

    #[test]
    fn test_jmp_indirect_page_wrap_bug() {
        let mut bus = FlatBus::with_program(&[0x6C, 0xFF, 0x30]);
        bus.ram[0x30FF] = 0x80;
        bus.ram[0x3000] = 0x50;
        bus.ram[0x3100] = 0x40; // would be used by a correct 16-bit read
        let mut cpu = Cpu::new();
        cpu.reset(&mut bus);
        cpu.step(&mut bus);
        assert_eq!(cpu.pc, 0x5080);
    }

    #[test]
    fn test_jsr_rts_round_trip() {
        let mut bus = FlatBus::with_program(&[0x20, 0x10, 0x80]);
        bus.ram[0x8010] = 0x60; // RTS
        let mut cpu = Cpu::new();
        cpu.reset(&mut bus);

        let sp = cpu.sp;
        cpu.step(&mut bus);
        assert_eq!(cpu.pc, 0x8010);
        assert_eq!(cpu.sp, sp.wrapping_sub(2));
        cpu.step(&mut bus);
        assert_eq!(cpu.pc, 0x8003);
        assert_eq!(cpu.sp, sp);
    }

    #[test]
    fn test_brk_rti_round_trip() {
        let mut bus = FlatBus::with_program(&[0x00, 0xEA]);
        // IRQ vector -> $9000: NOP, NOP, RTI
        bus.ram[0xFFFE] = 0x00;
        bus.ram[0xFFFF] = 0x90;
        bus.load(0x9000, &[0xEA, 0xEA, 0x40]);
        let mut cpu = Cpu::new();
        cpu.reset(&mut bus);

        let p_before = cpu.status;
        let sp_before = cpu.sp;
        assert_eq!(cpu.step(&mut bus), 7); // BRK
        assert_eq!(cpu.pc, 0x9000);
        assert_eq!(cpu.sp, sp_before.wrapping_sub(3));
        assert!(cpu.status.contains(Status::I));

        cpu.step(&mut bus); // NOP
        cpu.step(&mut bus); // NOP
        cpu.step(&mut bus); // RTI
        assert_eq!(cpu.pc, 0x8002); // BRK address + 2
        assert_eq!(cpu.sp, sp_before);
        assert_eq!(cpu.status, p_before); // B discarded, I restored
    }

    #[test]
    fn test_nmi_service() {
        let mut bus = FlatBus::with_program(&[0xEA, 0xEA]);
        bus.ram[0xFFFA] = 0x00;
        bus.ram[0xFFFB] = 0x90;
        let mut cpu = Cpu::new();
        cpu.reset(&mut bus);

        let sp_before = cpu.sp;
        cpu.trigger_nmi();
        assert_eq!(cpu.step(&mut bus), 7);
        assert_eq!(cpu.pc, 0x9000);
        assert_eq!(cpu.sp, sp_before.wrapping_sub(3));
        // Pushed status must not carry B
        let pushed = bus.ram[0x0100 + usize::from(sp_before.wrapping_sub(2))];
        assert_eq!(pushed & 0x10, 0);

        // Latch is cleared; next step runs the handler's first instruction
        cpu.step(&mut bus);
        assert_eq!(cpu.pc, 0x9001);
    }

    #[test]
    fn test_irq_masked_by_i_flag() {
        let mut bus = FlatBus::with_program(&[0x58, 0xEA, 0xEA]);
        bus.ram[0xFFFE] = 0x00;
        bus.ram[0xFFFF] = 0x90;
        let mut cpu = Cpu::new();
        cpu.reset(&mut bus);

        cpu.set_irq(true);
        cpu.step(&mut bus); // CLI; I was set, IRQ masked for this step
        cpu.step(&mut bus); // IRQ now taken
        assert_eq!(cpu.pc, 0x9000);
        assert!(cpu.status.contains(Status::I));
    }

    #[test]
    fn test_pha_pla_restores_a() {
        let (mut cpu, mut bus) = boot(&[0xA9, 0x42, 0x48, 0xA9, 0x00, 0x68]);
        cpu.step(&mut bus);
        cpu.step(&mut bus);
        cpu.step(&mut bus);
        assert_eq!(cpu.a, 0x00);
        cpu.step(&mut bus);
        assert_eq!(cpu.a, 0x42);
        assert!(!cpu.status.contains(Status::Z));
    }

    #[test]
    fn test_stack_wraps_modulo_256() {
        let (mut cpu, mut bus) = boot(&[0x48, 0x48, 0x48]);
        cpu.sp = 0x01;
        cpu.step(&mut bus);
        cpu.step(&mut bus);
        cpu.step(&mut bus);
        assert_eq!(cpu.sp, 0xFE);
    }

    #[test]
    fn test_rmw_asl_memory() {
        let mut bus = FlatBus::with_program(&[0x06, 0x10]);
        bus.ram[0x0010] = 0x81;
        let mut cpu = Cpu::new();
        cpu.reset(&mut bus);
        cpu.step(&mut bus);
        assert_eq!(bus.ram[0x0010], 0x02);
        assert!(cpu.status.contains(Status::C));
        assert!(!cpu.status.contains(Status::N));
    }

    #[test]
    fn test_ror_folds_carry() {
        let (mut cpu, mut bus) = boot(&[0xA9, 0x01, 0x38, 0x6A]);
        cpu.step(&mut bus);
        cpu.step(&mut bus);
        cpu.step(&mut bus);
        assert_eq!(cpu.a, 0x80);
        assert!(cpu.status.contains(Status::C));
        assert!(cpu.status.contains(Status::N));
    }

    #[test]
    fn test_indirect_x_zero_page_wrap() {
        let mut bus = FlatBus::with_program(&[0xA2, 0x05, 0xA1, 0xFF]);
        // pointer at ($FF + $05) & $FF = $04/$05
        bus.ram[0x0004] = 0x00;
        bus.ram[0x0005] = 0x90;
        bus.ram[0x9000] = 0x5A;
        let mut cpu = Cpu::new();
        cpu.reset(&mut bus);
        cpu.step(&mut bus);
        cpu.step(&mut bus);
        assert_eq!(cpu.a, 0x5A);
    }

    #[test]
    fn test_stp_latches_halt() {
        let (mut cpu, mut bus) = boot(&[0x02, 0xEA]);
        assert!(!cpu.halted());
        cpu.step(&mut bus);
        assert!(cpu.halted());
        // Further steps are inert
        assert_eq!(cpu.step(&mut bus), 0);
        assert_eq!(cpu.pc, 0x8001);
    }

    #[test]
    fn test_lax_loads_both() {
        let mut bus = FlatBus::with_program(&[0xA7, 0x10]);
        bus.ram[0x0010] = 0x99;
        let mut cpu = Cpu::new();
        cpu.reset(&mut bus);
        cpu.step(&mut bus);
        assert_eq!(cpu.a, 0x99);
        assert_eq!(cpu.x, 0x99);
        assert!(cpu.status.contains(Status::N));
    }

    #[test]
    fn test_dcp_compares_after_decrement() {
        let mut bus = FlatBus::with_program(&[0xA9, 0x40, 0xC7, 0x10]);
        bus.ram[0x0010] = 0x41;
        let mut cpu = Cpu::new();
        cpu.reset(&mut bus);
        cpu.step(&mut bus);
        cpu.step(&mut bus);
        assert_eq!(bus.ram[0x0010], 0x40);
        assert!(cpu.status.contains(Status::Z));
        assert!(cpu.status.contains(Status::C));
    }

    #[test]
    fn test_decimal_flag_toggles_but_is_ignored() {
        let (mut cpu, mut bus) = boot(&[0xF8, 0xA9, 0x09, 0x69, 0x01]);
        cpu.step(&mut bus);
        assert!(cpu.status.contains(Status::D));
        cpu.step(&mut bus);
        cpu.step(&mut bus);
        // Binary result, not BCD 0x10
        assert_eq!(cpu.a, 0x0A);
    }
}
