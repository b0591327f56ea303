//! nestest golden-log validation.
//!
//! Drops into the nestest ROM's automation mode (PC forced to $C000) and
//! compares the emitted trace against the published golden log line by
//! line. Both files live under `test-roms/` at the workspace root; the test
//! skips quietly when they are absent so CI without ROMs stays green.

use famicore_core::Console;
use std::fs;
use std::path::PathBuf;

/// Instructions covered by the golden log.
const NESTEST_INSTRUCTIONS: usize = 8991;

/// CPU cycle count after the full automation run.
const NESTEST_FINAL_CYCLES: u64 = 26554;

fn workspace_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .to_path_buf()
}

#[test]
fn test_nestest_golden_log() {
    let rom_path = workspace_root().join("test-roms/nestest.nes");
    let log_path = workspace_root().join("test-roms/nestest.log");

    let Ok(rom) = fs::read(&rom_path) else {
        println!("skipping nestest: ROM not found at {rom_path:?}");
        return;
    };
    let Ok(golden) = fs::read_to_string(&log_path) else {
        println!("skipping nestest: golden log not found at {log_path:?}");
        return;
    };

    let mut console = Console::new();
    console.load(&rom).expect("nestest.nes failed to parse");
    // Automation mode starts at $C000 instead of the reset vector
    console.cpu_mut().pc = 0xC000;

    for (index, golden_line) in golden.lines().take(NESTEST_INSTRUCTIONS).enumerate() {
        let line = console.trace_line().expect("trace failed");

        // Compare everything through the SP field; the golden log may carry
        // an extra PPU column between SP and CYC that we do not emit.
        let prefix = golden_line.len().min(line.len()).min(73);
        assert_eq!(
            &line[..prefix],
            &golden_line[..prefix],
            "mismatch at instruction {index}\n ours:  {line}\n golden: {golden_line}"
        );

        // Old-format logs repurpose CYC for the PPU dot; only compare when
        // the column is the CPU cycle counter.
        if !golden_line.contains("SL:") {
            let golden_cyc = golden_line
                .rsplit("CYC:")
                .next()
                .and_then(|tail| tail.trim().parse::<u64>().ok());
            if let Some(golden_cyc) = golden_cyc {
                assert_eq!(
                    console.cpu().cycles,
                    golden_cyc,
                    "cycle mismatch at instruction {index}"
                );
            }
        }

        console.step().expect("step failed");
    }

    assert_eq!(console.cpu().cycles, NESTEST_FINAL_CYCLES);
}

#[test]
fn test_nestest_runs_without_golden_log() {
    let rom_path = workspace_root().join("test-roms/nestest.nes");
    let Ok(rom) = fs::read(&rom_path) else {
        println!("skipping nestest: ROM not found at {rom_path:?}");
        return;
    };

    let mut console = Console::new();
    console.load(&rom).expect("nestest.nes failed to parse");
    console.cpu_mut().pc = 0xC000;

    for _ in 0..NESTEST_INSTRUCTIONS {
        console.step().expect("step failed");
    }

    assert_eq!(console.cpu().cycles, NESTEST_FINAL_CYCLES);
    // nestest reports failure codes in $02/$03; zero means all passed
    assert_eq!(console.peek(0x0002), 0x00, "official opcode failures");
    assert_eq!(console.peek(0x0003), 0x00, "illegal opcode failures");
}
