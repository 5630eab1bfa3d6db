use std::env;

use crate::chip8_emulator::quirks::{Chip8Quirks, Variant};

pub const REGISTER_COUNT: usize = 16;
pub const FLAG_REGISTER_COUNT: usize = 8;
pub const STACK_SIZE: usize = 16;
pub const KEY_COUNT: usize = 16;
pub const AUDIO_PATTERN_SIZE: usize = 16;

pub const MEMORY_SIZE: usize = 0x1000;
pub const XO_CHIP_MEMORY_SIZE: usize = 0x10000;

pub const PROGRAM_START: u16 = 0x200;

pub const SCREEN_WIDTH_LOW: usize = 64;
pub const SCREEN_HEIGHT_LOW: usize = 32;
pub const SCREEN_WIDTH_HIGH: usize = 128;
pub const SCREEN_HEIGHT_HIGH: usize = 64;

/// Plane mask selected after `Initialise()`: only the lowest plane.
pub const DEFAULT_PLANE_MASK: u8 = 0x1;

/// Horizontal scroll distance of `00FB`/`00FC`, in pixels.
pub const HORIZONTAL_SCROLL: usize = 4;

pub const FONT_OFFSET: u16 = 0x1B0;
pub const FONT_GLYPH_SIZE: u16 = 5;
pub const HIGH_FONT_OFFSET: u16 = 0x110;
pub const HIGH_FONT_GLYPH_SIZE: u16 = 10;

/// Marker of HP48 transfer headers that some SuperChip ROMs still carry.
pub const HP48_HEADER_MAGIC: &[u8; 8] = b"HPHP48-A";
pub const HP48_HEADER_SIZE: usize = 13;

pub const CHIP8_CYCLES_PER_FRAME: usize = 13;
pub const SUPER_CHIP_CYCLES_PER_FRAME: usize = 22;

#[rustfmt::skip]
pub const FONT_BYTES: [u8; 80] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];

#[rustfmt::skip]
pub const HIGH_FONT_BYTES: [u8; 160] = [
    0x7C, 0x82, 0x82, 0x82, 0x82, 0x82, 0x82, 0x82, 0x7C, 0x00, // 0
    0x08, 0x18, 0x38, 0x08, 0x08, 0x08, 0x08, 0x08, 0x3C, 0x00, // 1
    0x7C, 0x82, 0x02, 0x02, 0x04, 0x18, 0x20, 0x40, 0xFE, 0x00, // 2
    0x7C, 0x82, 0x02, 0x02, 0x3C, 0x02, 0x02, 0x82, 0x7C, 0x00, // 3
    0x84, 0x84, 0x84, 0x84, 0xFE, 0x04, 0x04, 0x04, 0x04, 0x00, // 4
    0xFE, 0x80, 0x80, 0x80, 0xFC, 0x02, 0x02, 0x82, 0x7C, 0x00, // 5
    0x7C, 0x82, 0x80, 0x80, 0xFC, 0x82, 0x82, 0x82, 0x7C, 0x00, // 6
    0xFE, 0x02, 0x04, 0x08, 0x10, 0x20, 0x20, 0x20, 0x20, 0x00, // 7
    0x7C, 0x82, 0x82, 0x82, 0x7C, 0x82, 0x82, 0x82, 0x7C, 0x00, // 8
    0x7C, 0x82, 0x82, 0x82, 0x7E, 0x02, 0x02, 0x82, 0x7C, 0x00, // 9
    0x10, 0x28, 0x44, 0x82, 0x82, 0xFE, 0x82, 0x82, 0x82, 0x00, // A
    0xFC, 0x82, 0x82, 0x82, 0xFC, 0x82, 0x82, 0x82, 0xFC, 0x00, // B
    0x7C, 0x82, 0x80, 0x80, 0x80, 0x80, 0x80, 0x82, 0x7C, 0x00, // C
    0xFC, 0x82, 0x82, 0x82, 0x82, 0x82, 0x82, 0x82, 0xFC, 0x00, // D
    0xFE, 0x80, 0x80, 0x80, 0xF8, 0x80, 0x80, 0x80, 0xFE, 0x00, // E
    0xFE, 0x80, 0x80, 0x80, 0xF8, 0x80, 0x80, 0x80, 0x80, 0x00, // F
];

/// Everything a host decides before a machine is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chip8Config {
    pub variant: Variant,
    pub quirks: Chip8Quirks,
    pub memory_size: usize,
    pub graphic_planes: usize,
    pub load_address: u16,
    pub start_address: u16,
    pub allow_misaligned_opcodes: bool,
    pub cycles_per_frame: usize,
    pub rng_seed: Option<u64>,
}

impl Chip8Config {
    pub fn chip8() -> Self {
        Self {
            variant: Variant::Chip8,
            quirks: Variant::Chip8.default_quirks(),
            memory_size: MEMORY_SIZE,
            graphic_planes: 1,
            load_address: PROGRAM_START,
            start_address: PROGRAM_START,
            allow_misaligned_opcodes: false,
            cycles_per_frame: CHIP8_CYCLES_PER_FRAME,
            rng_seed: None,
        }
    }

    pub fn super_chip() -> Self {
        Self {
            variant: Variant::SuperChip,
            quirks: Variant::SuperChip.default_quirks(),
            cycles_per_frame: SUPER_CHIP_CYCLES_PER_FRAME,
            ..Self::chip8()
        }
    }

    pub fn xo_chip() -> Self {
        Self {
            variant: Variant::XoChip,
            quirks: Variant::XoChip.default_quirks(),
            memory_size: XO_CHIP_MEMORY_SIZE,
            graphic_planes: 2,
            ..Self::super_chip()
        }
    }

    pub fn for_variant(variant: Variant) -> Self {
        match variant {
            Variant::Chip8 => Self::chip8(),
            Variant::SuperChip => Self::super_chip(),
            Variant::XoChip => Self::xo_chip(),
        }
    }

    pub fn with_quirks(mut self, quirks: Chip8Quirks) -> Self {
        self.quirks = quirks;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }

    pub fn with_misaligned_opcodes(mut self, allow: bool) -> Self {
        self.allow_misaligned_opcodes = allow;
        self
    }
}

impl Default for Chip8Config {
    fn default() -> Self {
        Self::chip8()
    }
}

pub fn load_variant(name: &str) -> Result<Variant, String> {
    match name.trim().to_ascii_lowercase().as_str() {
        "chip8" | "chip-8" | "vip" => Ok(Variant::Chip8),
        "schip" | "superchip" | "super-chip" | "hp48" => Ok(Variant::SuperChip),
        "xochip" | "xo-chip" => Ok(Variant::XoChip),
        other => Err(format!(
            "invalid CHIP8_VARIANT '{other}', expected one of: chip8, schip, xochip"
        )),
    }
}

pub fn load_variant_from_env() -> Result<Variant, String> {
    let name = env::var("CHIP8_VARIANT").unwrap_or_else(|_| "chip8".to_owned());
    load_variant(&name)
}
