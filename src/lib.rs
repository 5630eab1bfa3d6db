pub mod chip8_emulator;

pub use chip8_emulator::app::{dump_display, run_emulator_headless, run_frame};
pub use chip8_emulator::config::{load_variant, load_variant_from_env, Chip8Config};
pub use chip8_emulator::cpu::{
    execute_cycle, execute_instruction, execute_opcode, tick_timers, CycleOutcome,
};
pub use chip8_emulator::devices::{Event, EventSink, KeyState, Keyboard, LoggingEvents};
pub use chip8_emulator::disasm::Disassembly;
pub use chip8_emulator::display::Display;
pub use chip8_emulator::error::Chip8Error;
pub use chip8_emulator::instruction::{decode, DecodeError, Instruction};
pub use chip8_emulator::memory::Memory;
pub use chip8_emulator::quirks::{
    load_quirks_profile, load_quirks_profile_from_env, Chip8Quirks, Variant, HP48_QUIRKS,
    VIP_QUIRKS, XO_CHIP_QUIRKS,
};
pub use chip8_emulator::state::{
    create_state, load_rom, load_rom_file, reset_state, EmulatorState,
};
