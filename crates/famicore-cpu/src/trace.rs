//! nestest-format execution trace.
//!
//! One line per instruction, emitted *before* the instruction executes, in
//! the layout the published nestest golden log uses:
//!
//! ```text
//! C000  4C F5 C5  JMP $C5F5                       A:00 X:00 Y:00 P:24 SP:FD CYC:7
//! ```
//!
//! Undocumented opcodes get a `*` prefix that borrows one space from the
//! byte column. All memory reads go through [`Bus::peek`] so tracing never
//! disturbs PPU registers or the open-bus shadow.

use crate::addressing::AddrMode;
use crate::bus::Bus;
use crate::cpu::Cpu;
use crate::opcodes::OPCODE_TABLE;
use std::fmt::Write;

/// Side-effect-free page-wrapped pointer read, mirroring the JMP bug.
fn peek_u16_wrapped(bus: &impl Bus, addr: u16) -> u16 {
    let lo = u16::from(bus.peek(addr));
    let hi_addr = if addr & 0x00FF == 0x00FF {
        addr & 0xFF00
    } else {
        addr.wrapping_add(1)
    };
    (u16::from(bus.peek(hi_addr)) << 8) | lo
}

/// Format the instruction at PC plus the register file as one log line.
#[must_use]
pub fn trace_line(cpu: &Cpu, bus: &impl Bus) -> String {
    let pc = cpu.pc;
    let opcode = bus.peek(pc);
    let info = &OPCODE_TABLE[usize::from(opcode)];

    let op1 = bus.peek(pc.wrapping_add(1));
    let op2 = bus.peek(pc.wrapping_add(2));

    let mut bytes = String::with_capacity(8);
    write!(bytes, "{opcode:02X}").unwrap();
    match info.mode.operand_size() {
        1 => write!(bytes, " {op1:02X}").unwrap(),
        2 => write!(bytes, " {op1:02X} {op2:02X}").unwrap(),
        _ => {}
    }

    let disasm = disassemble(cpu, bus, info.mnemonic, info.mode, pc, op1, op2);
    let prefix = if info.unofficial { "*" } else { " " };

    format!(
        "{pc:04X}  {bytes:<8} {prefix}{disasm:<32}A:{:02X} X:{:02X} Y:{:02X} P:{:02X} SP:{:02X} CYC:{}",
        cpu.a,
        cpu.x,
        cpu.y,
        cpu.status.bits(),
        cpu.sp,
        cpu.cycles
    )
}

/// Render the operand column for one addressing mode.
fn disassemble(
    cpu: &Cpu,
    bus: &impl Bus,
    mnemonic: &str,
    mode: AddrMode,
    pc: u16,
    op1: u8,
    op2: u8,
) -> String {
    let abs = (u16::from(op2) << 8) | u16::from(op1);

    match mode {
        AddrMode::Imp => mnemonic.to_string(),

        AddrMode::Acc => format!("{mnemonic} A"),

        AddrMode::Imm => format!("{mnemonic} #${op1:02X}"),

        AddrMode::Zp0 => {
            let value = bus.peek(u16::from(op1));
            format!("{mnemonic} ${op1:02X} = {value:02X}")
        }

        AddrMode::Zpx => {
            let addr = op1.wrapping_add(cpu.x);
            let value = bus.peek(u16::from(addr));
            format!("{mnemonic} ${op1:02X},X @ {addr:02X} = {value:02X}")
        }

        AddrMode::Zpy => {
            let addr = op1.wrapping_add(cpu.y);
            let value = bus.peek(u16::from(addr));
            format!("{mnemonic} ${op1:02X},Y @ {addr:02X} = {value:02X}")
        }

        AddrMode::Abs => {
            // Control transfers show only the target address.
            if mnemonic == "JMP" || mnemonic == "JSR" {
                format!("{mnemonic} ${abs:04X}")
            } else {
                let value = bus.peek(abs);
                format!("{mnemonic} ${abs:04X} = {value:02X}")
            }
        }

        AddrMode::Abx => {
            let addr = abs.wrapping_add(u16::from(cpu.x));
            let value = bus.peek(addr);
            format!("{mnemonic} ${abs:04X},X @ {addr:04X} = {value:02X}")
        }

        AddrMode::Aby => {
            let addr = abs.wrapping_add(u16::from(cpu.y));
            let value = bus.peek(addr);
            format!("{mnemonic} ${abs:04X},Y @ {addr:04X} = {value:02X}")
        }

        AddrMode::Ind => {
            let target = peek_u16_wrapped(bus, abs);
            format!("{mnemonic} (${abs:04X}) = {target:04X}")
        }

        AddrMode::Idx => {
            let ptr = op1.wrapping_add(cpu.x);
            let lo = u16::from(bus.peek(u16::from(ptr)));
            let hi = u16::from(bus.peek(u16::from(ptr.wrapping_add(1))));
            let addr = (hi << 8) | lo;
            let value = bus.peek(addr);
            format!("{mnemonic} (${op1:02X},X) @ {ptr:02X} = {addr:04X} = {value:02X}")
        }

        AddrMode::Idy => {
            let lo = u16::from(bus.peek(u16::from(op1)));
            let hi = u16::from(bus.peek(u16::from(op1.wrapping_add(1))));
            let base = (hi << 8) | lo;
            let addr = base.wrapping_add(u16::from(cpu.y));
            let value = bus.peek(addr);
            format!("{mnemonic} (${op1:02X}),Y = {base:04X} @ {addr:04X} = {value:02X}")
        }

        AddrMode::Rel => {
            let target = pc.wrapping_add(2).wrapping_add(op1 as i8 as u16);
            format!("{mnemonic} ${target:04X}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FlatBus {
        ram: Vec<u8>,
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

    fn setup(program: &[u8]) -> (Cpu, FlatBus) {
        let mut bus = FlatBus { ram: vec![0; 0x10000] };
        bus.ram[0x8000..0x8000 + program.len()].copy_from_slice(program);
        bus.ram[0xFFFC] = 0x00;
        bus.ram[0xFFFD] = 0x80;
        let mut cpu = Cpu::new();
        cpu.reset(&mut bus);
        (cpu, bus)
    }

    #[test]
    fn test_trace_jmp_absolute() {
        let (cpu, bus) = setup(&[0x4C, 0xF5, 0xC5]);
        assert_eq!(
            trace_line(&cpu, &bus),
            "8000  4C F5 C5  JMP $C5F5                       A:00 X:00 Y:00 P:24 SP:FD CYC:7"
        );
    }

    #[test]
    fn test_trace_immediate() {
        let (cpu, bus) = setup(&[0xA9, 0x42]);
        assert_eq!(
            trace_line(&cpu, &bus),
            "8000  A9 42     LDA #$42                        A:00 X:00 Y:00 P:24 SP:FD CYC:7"
        );
    }

    #[test]
    fn test_trace_implied() {
        let (cpu, bus) = setup(&[0xEA]);
        assert_eq!(
            trace_line(&cpu, &bus),
            "8000  EA        NOP                             A:00 X:00 Y:00 P:24 SP:FD CYC:7"
        );
    }

    #[test]
    fn test_trace_unofficial_star_prefix() {
        let (cpu, mut bus) = setup(&[0x04, 0xA9]);
        bus.ram[0x00A9] = 0x00;
        assert_eq!(
            trace_line(&cpu, &bus),
            "8000  04 A9    *NOP $A9 = 00                    A:00 X:00 Y:00 P:24 SP:FD CYC:7"
        );
    }

    #[test]
    fn test_trace_zero_page_x() {
        let (mut cpu, mut bus) = setup(&[0xB4, 0x10]);
        cpu.x = 0x02;
        bus.ram[0x0012] = 0x34;
        let line = trace_line(&cpu, &bus);
        assert!(line.contains("LDY $10,X @ 12 = 34"), "{line}");
    }

    #[test]
    fn test_trace_indirect_y() {
        let (mut cpu, mut bus) = setup(&[0xB1, 0x89]);
        cpu.y = 0x10;
        bus.ram[0x0089] = 0x00;
        bus.ram[0x008A] = 0x03;
        bus.ram[0x0310] = 0x89;
        let line = trace_line(&cpu, &bus);
        assert!(line.contains("LDA ($89),Y = 0300 @ 0310 = 89"), "{line}");
    }

    #[test]
    fn test_trace_indirect_jmp_shows_wrapped_target() {
        let (cpu, mut bus) = setup(&[0x6C, 0xFF, 0x30]);
        bus.ram[0x30FF] = 0x80;
        bus.ram[0x3000] = 0x50;
        let line = trace_line(&cpu, &bus);
        assert!(line.contains("JMP ($30FF) = 5080"), "{line}");
    }

    #[test]
    fn test_trace_relative_target() {
        let (cpu, bus) = setup(&[0xF0, 0x05]);
        let line = trace_line(&cpu, &bus);
        assert!(line.contains("BEQ $8007"), "{line}");
    }

    #[test]
    fn test_register_column_positions_are_stable() {
        let (cpu, bus) = setup(&[0xEA]);
        let line = trace_line(&cpu, &bus);
        assert_eq!(line.find("A:"), Some(48));
        assert_eq!(line.find("CYC:"), Some(74));
    }
}
