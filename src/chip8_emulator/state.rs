use std::fs;
use std::path::{Path, PathBuf};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::chip8_emulator::config::{
    Chip8Config, AUDIO_PATTERN_SIZE, FLAG_REGISTER_COUNT, FONT_BYTES, FONT_OFFSET,
    HIGH_FONT_BYTES, HIGH_FONT_OFFSET, HP48_HEADER_MAGIC, HP48_HEADER_SIZE, REGISTER_COUNT,
    STACK_SIZE,
};
use crate::chip8_emulator::display::Display;
use crate::chip8_emulator::error::Chip8Error;
use crate::chip8_emulator::memory::Memory;

/// Complete machine state. One instance per emulated program; nothing is shared
/// between instances.
#[derive(Debug, Clone)]
pub struct EmulatorState {
    pub config: Chip8Config,
    pub memory: Memory,
    pub display: Display,
    pub registers: [u8; REGISTER_COUNT],
    /// SuperChip `R` registers, saved and restored by `FX75`/`FX85`.
    pub flag_registers: [u8; FLAG_REGISTER_COUNT],
    pub stack: [u16; STACK_SIZE],
    /// Wraps modulo the stack size on overflow and underflow.
    pub sp: usize,
    pub pc: u16,
    pub index: u16,
    pub delay_timer: u8,
    pub sound_timer: u8,
    pub sound_playing: bool,
    pub waiting_for_key: bool,
    pub key_register: usize,
    pub compatibility_mode: bool,
    pub audio_pattern: [u8; AUDIO_PATTERN_SIZE],
    pub should_draw: bool,
    pub finished: bool,
    pub rom_path: Option<PathBuf>,
    rng: StdRng,
}

fn seeded_rng(config: &Chip8Config) -> StdRng {
    match config.rng_seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

fn validate_config(config: &Chip8Config) -> Result<(), Chip8Error> {
    if config.memory_size < HIGH_FONT_OFFSET as usize + HIGH_FONT_BYTES.len()
        || config.memory_size < FONT_OFFSET as usize + FONT_BYTES.len()
    {
        return Err(Chip8Error::InvalidArgument(
            "memory size must hold both font tables",
        ));
    }
    if config.memory_size > 0x10000 {
        return Err(Chip8Error::InvalidArgument(
            "memory size must fit a 16-bit address space",
        ));
    }
    if !(1..=8).contains(&config.graphic_planes) {
        return Err(Chip8Error::InvalidArgument("graphic planes must be 1..=8"));
    }
    if config.cycles_per_frame == 0 {
        return Err(Chip8Error::InvalidArgument("cycles per frame must be > 0"));
    }

    Ok(())
}

pub fn create_state(config: Chip8Config) -> Result<EmulatorState, Chip8Error> {
    validate_config(&config)?;

    let mut state = EmulatorState {
        config,
        memory: Memory::new(config.memory_size)?,
        display: Display::new(config.graphic_planes),
        registers: [0; REGISTER_COUNT],
        flag_registers: [0; FLAG_REGISTER_COUNT],
        stack: [0; STACK_SIZE],
        sp: 0,
        pc: config.start_address,
        index: 0,
        delay_timer: 0,
        sound_timer: 0,
        sound_playing: false,
        waiting_for_key: false,
        key_register: 0,
        compatibility_mode: false,
        audio_pattern: [0; AUDIO_PATTERN_SIZE],
        should_draw: false,
        finished: false,
        rom_path: None,
        rng: seeded_rng(&config),
    };
    reset_state(&mut state)?;
    Ok(state)
}

/// Powers the machine back on: registers, timers, stack, memory and display are
/// cleared, fonts are reloaded and the last ROM file (if any) is loaded again.
pub fn reset_state(state: &mut EmulatorState) -> Result<(), Chip8Error> {
    state.memory.clear();
    state.display.initialise();

    state.registers = [0; REGISTER_COUNT];
    state.flag_registers = [0; FLAG_REGISTER_COUNT];
    state.stack = [0; STACK_SIZE];
    state.sp = 0;
    state.pc = state.config.start_address;
    state.index = 0;
    state.delay_timer = 0;
    state.sound_timer = 0;
    state.sound_playing = false;
    state.waiting_for_key = false;
    state.key_register = 0;
    state.compatibility_mode = false;
    state.audio_pattern = [0; AUDIO_PATTERN_SIZE];
    state.should_draw = false;
    state.finished = false;
    state.rng = seeded_rng(&state.config);

    load_fonts(state);

    if let Some(path) = state.rom_path.clone() {
        load_rom_file(state, &path)?;
    }

    Ok(())
}

pub fn load_fonts(state: &mut EmulatorState) {
    state
        .memory
        .load(HIGH_FONT_OFFSET as usize, &HIGH_FONT_BYTES);
    state.memory.load(FONT_OFFSET as usize, &FONT_BYTES);
}

/// Strips an HP48 transfer header, if present.
pub fn strip_rom_header(rom_bytes: &[u8]) -> &[u8] {
    if rom_bytes.len() >= HP48_HEADER_SIZE && rom_bytes.starts_with(HP48_HEADER_MAGIC) {
        log::debug!("skipping {HP48_HEADER_SIZE} byte HP48 header");
        &rom_bytes[HP48_HEADER_SIZE..]
    } else {
        rom_bytes
    }
}

/// Copies a program image to the configured load address.
pub fn load_rom(state: &mut EmulatorState, rom_bytes: &[u8]) -> Result<(), Chip8Error> {
    let program = strip_rom_header(rom_bytes);
    let load_address = state.config.load_address as usize;
    let max_size = state.memory.len().saturating_sub(load_address);

    if program.len() > max_size {
        return Err(Chip8Error::RomTooLarge {
            size: program.len(),
            max: max_size,
        });
    }

    state.memory.load(load_address, program);
    state.rom_path = None;
    log::debug!(
        "loaded {} byte program at 0x{load_address:04x}",
        program.len()
    );

    Ok(())
}

pub fn load_rom_file(state: &mut EmulatorState, path: &Path) -> Result<(), Chip8Error> {
    let rom_bytes = fs::read(path)?;
    load_rom(state, &rom_bytes)?;
    state.rom_path = Some(path.to_path_buf());

    Ok(())
}

pub fn push_stack(state: &mut EmulatorState, address: u16) {
    state.stack[state.sp % STACK_SIZE] = address;
    state.sp = (state.sp + 1) % STACK_SIZE;
}

pub fn pop_stack(state: &mut EmulatorState) -> u16 {
    state.sp = (state.sp + STACK_SIZE - 1) % STACK_SIZE;
    state.stack[state.sp]
}

pub fn random_byte(state: &mut EmulatorState) -> u8 {
    state.rng.gen()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chip8_emulator::config::{PROGRAM_START, XO_CHIP_MEMORY_SIZE};

    #[test]
    fn fonts_are_loaded_at_their_offsets() {
        let state = create_state(Chip8Config::chip8()).unwrap();

        assert_eq!(state.memory.get(FONT_OFFSET as usize), 0xF0);
        assert_eq!(state.memory.get(HIGH_FONT_OFFSET as usize), 0x7C);
        assert_eq!(state.pc, PROGRAM_START);
    }

    #[test]
    fn hp48_header_is_skipped() {
        let mut state = create_state(Chip8Config::super_chip()).unwrap();
        let mut rom = b"HPHP48-A\x00\x00\x00\x00\x00".to_vec();
        rom.extend_from_slice(&[0x00, 0xFF]);

        load_rom(&mut state, &rom).unwrap();

        assert_eq!(state.memory.get_word(0x200), 0x00FF);
    }

    #[test]
    fn oversized_rom_is_rejected() {
        let mut state = create_state(Chip8Config::chip8()).unwrap();
        let rom = vec![0; 0x1000 - 0x200 + 1];

        let error = load_rom(&mut state, &rom).unwrap_err();
        assert!(matches!(
            error,
            Chip8Error::RomTooLarge { size: 3585, max: 3584 }
        ));
    }

    #[test]
    fn xo_chip_accepts_large_roms() {
        let mut state = create_state(Chip8Config::xo_chip()).unwrap();
        let rom = vec![0xAA; XO_CHIP_MEMORY_SIZE - 0x200];

        load_rom(&mut state, &rom).unwrap();
        assert_eq!(state.memory.get(0xFFFF), 0xAA);
    }

    #[test]
    fn stack_pointer_wraps() {
        let mut state = create_state(Chip8Config::chip8()).unwrap();

        for offset in 0..=STACK_SIZE as u16 {
            push_stack(&mut state, 0x200 + offset);
        }
        assert_eq!(state.sp, 1);
        assert_eq!(state.stack[0], 0x200 + STACK_SIZE as u16);

        let mut empty = create_state(Chip8Config::chip8()).unwrap();
        assert_eq!(pop_stack(&mut empty), 0);
        assert_eq!(empty.sp, STACK_SIZE - 1);
    }

    #[test]
    fn seeded_machines_draw_the_same_bytes() {
        let config = Chip8Config::chip8().with_seed(7);
        let mut first = create_state(config).unwrap();
        let mut second = create_state(config).unwrap();

        let a: Vec<u8> = (0..8).map(|_| random_byte(&mut first)).collect();
        let b: Vec<u8> = (0..8).map(|_| random_byte(&mut second)).collect();
        assert_eq!(a, b);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = Chip8Config {
            graphic_planes: 0,
            ..Chip8Config::chip8()
        };

        assert!(matches!(
            create_state(config),
            Err(Chip8Error::InvalidArgument(_))
        ));
    }
}
