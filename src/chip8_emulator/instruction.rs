use std::fmt::{Display, Formatter};

use crate::chip8_emulator::quirks::Variant;

/// A decoded instruction. Register operands are indices `0..16`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Instruction {
    // CHIP-8
    ClearScreen,
    Return,
    Jump(u16),
    Call(u16),
    SkipEqImmediate { x: usize, nn: u8 },
    SkipNotEqImmediate { x: usize, nn: u8 },
    SkipEqRegister { x: usize, y: usize },
    LoadImmediate { x: usize, nn: u8 },
    AddImmediate { x: usize, nn: u8 },
    Move { x: usize, y: usize },
    Or { x: usize, y: usize },
    And { x: usize, y: usize },
    Xor { x: usize, y: usize },
    Add { x: usize, y: usize },
    Sub { x: usize, y: usize },
    ShiftRight { x: usize, y: usize },
    SubN { x: usize, y: usize },
    ShiftLeft { x: usize, y: usize },
    SkipNotEqRegister { x: usize, y: usize },
    LoadIndex(u16),
    JumpOffset { x: usize, nnn: u16 },
    Random { x: usize, nn: u8 },
    Draw { x: usize, y: usize, n: u8 },
    SkipKeyPressed { x: usize },
    SkipKeyNotPressed { x: usize },
    LoadDelay { x: usize },
    WaitKey { x: usize },
    SetDelay { x: usize },
    SetSound { x: usize },
    AddIndex { x: usize },
    LoadFont { x: usize },
    StoreBcd { x: usize },
    StoreRegisters { x: usize },
    LoadRegisters { x: usize },

    // SuperChip
    ScrollDown(u8),
    ScrollRight,
    ScrollLeft,
    Exit,
    LowResolution,
    HighResolution,
    Compatibility,
    DrawExtended { x: usize, y: usize },
    LoadHighFont { x: usize },
    SaveFlags { x: usize },
    LoadFlags { x: usize },

    // XO-Chip
    ScrollUp(u8),
    SaveRange { x: usize, y: usize },
    LoadRange { x: usize, y: usize },
    LoadIndexLong(u16),
    LoadAudioPattern,
    SelectPlanes(u8),
}

impl Instruction {
    /// Bytes the instruction occupies in memory.
    pub fn size(&self) -> u16 {
        match self {
            Instruction::LoadIndexLong(_) => 4,
            _ => 2,
        }
    }

    /// Lowest variant whose opcode table defines this instruction.
    pub fn required_variant(&self) -> Variant {
        use Instruction::*;

        match self {
            ScrollDown(_) | ScrollRight | ScrollLeft | Exit | LowResolution | HighResolution
            | Compatibility | DrawExtended { .. } | LoadHighFont { .. } | SaveFlags { .. }
            | LoadFlags { .. } => Variant::SuperChip,
            ScrollUp(_) | SaveRange { .. } | LoadRange { .. } | LoadIndexLong(_)
            | LoadAudioPattern | SelectPlanes(_) => Variant::XoChip,
            _ => Variant::Chip8,
        }
    }
}

/// Why an opcode could not be decoded under the active variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    /// No variant defines the opcode.
    Illegal,
    /// The opcode exists, but only from the given variant upwards.
    RequiresVariant(Variant),
}

fn nibbles(opcode: u16) -> (u8, u8, u8, u8) {
    (
        ((opcode & 0xF000) >> 12) as u8,
        ((opcode & 0x0F00) >> 8) as u8,
        ((opcode & 0x00F0) >> 4) as u8,
        (opcode & 0x000F) as u8,
    )
}

fn address_nnn(opcode: u16) -> u16 {
    opcode & 0x0FFF
}

fn byte_nn(opcode: u16) -> u8 {
    (opcode & 0x00FF) as u8
}

/// Decodes `opcode` for `variant`. `next_word` is the word following the opcode
/// and is only consumed by `F000 NNNN`.
///
/// Variant tables are tried from the most specific down to CHIP-8, so an
/// extension only shadows the opcodes it redefines.
pub fn decode(opcode: u16, next_word: u16, variant: Variant) -> Result<Instruction, DecodeError> {
    if variant >= Variant::XoChip {
        if let Some(instruction) = decode_xo_chip(opcode, next_word) {
            return Ok(instruction);
        }
    }

    if variant >= Variant::SuperChip {
        if let Some(instruction) = decode_super_chip(opcode) {
            return Ok(instruction);
        }
    }

    if let Some(instruction) = decode_chip8(opcode) {
        return Ok(instruction);
    }

    match decode_super_chip(opcode).or_else(|| decode_xo_chip(opcode, next_word)) {
        Some(instruction) if instruction.required_variant() > variant => {
            Err(DecodeError::RequiresVariant(instruction.required_variant()))
        }
        _ => Err(DecodeError::Illegal),
    }
}

fn decode_chip8(opcode: u16) -> Option<Instruction> {
    use Instruction::*;

    let (family, x, y, n) = nibbles(opcode);
    let (x, y) = (x as usize, y as usize);
    let nnn = address_nnn(opcode);
    let nn = byte_nn(opcode);

    let instruction = match (family, nn, n) {
        (0x0, 0xE0, _) => ClearScreen,
        (0x0, 0xEE, _) => Return,
        (0x1, _, _) => Jump(nnn),
        (0x2, _, _) => Call(nnn),
        (0x3, _, _) => SkipEqImmediate { x, nn },
        (0x4, _, _) => SkipNotEqImmediate { x, nn },
        (0x5, _, 0x0) => SkipEqRegister { x, y },
        (0x6, _, _) => LoadImmediate { x, nn },
        (0x7, _, _) => AddImmediate { x, nn },
        (0x8, _, 0x0) => Move { x, y },
        (0x8, _, 0x1) => Or { x, y },
        (0x8, _, 0x2) => And { x, y },
        (0x8, _, 0x3) => Xor { x, y },
        (0x8, _, 0x4) => Add { x, y },
        (0x8, _, 0x5) => Sub { x, y },
        (0x8, _, 0x6) => ShiftRight { x, y },
        (0x8, _, 0x7) => SubN { x, y },
        (0x8, _, 0xE) => ShiftLeft { x, y },
        (0x9, _, 0x0) => SkipNotEqRegister { x, y },
        (0xA, _, _) => LoadIndex(nnn),
        (0xB, _, _) => JumpOffset { x, nnn },
        (0xC, _, _) => Random { x, nn },
        (0xD, _, _) => Draw { x, y, n },
        (0xE, 0x9E, _) => SkipKeyPressed { x },
        (0xE, 0xA1, _) => SkipKeyNotPressed { x },
        (0xF, 0x07, _) => LoadDelay { x },
        (0xF, 0x0A, _) => WaitKey { x },
        (0xF, 0x15, _) => SetDelay { x },
        (0xF, 0x18, _) => SetSound { x },
        (0xF, 0x1E, _) => AddIndex { x },
        (0xF, 0x29, _) => LoadFont { x },
        (0xF, 0x33, _) => StoreBcd { x },
        (0xF, 0x55, _) => StoreRegisters { x },
        (0xF, 0x65, _) => LoadRegisters { x },
        _ => return None,
    };

    Some(instruction)
}

fn decode_super_chip(opcode: u16) -> Option<Instruction> {
    use Instruction::*;

    let (family, x, y, n) = nibbles(opcode);
    let (x, y) = (x as usize, y as usize);

    let instruction = match (family, byte_nn(opcode)) {
        (0x0, 0xFA) => Compatibility,
        (0x0, 0xFB) => ScrollRight,
        (0x0, 0xFC) => ScrollLeft,
        (0x0, 0xFD) => Exit,
        (0x0, 0xFE) => LowResolution,
        (0x0, 0xFF) => HighResolution,
        (0x0, _) if y == 0xC => ScrollDown(n),
        (0xD, _) if n == 0 => DrawExtended { x, y },
        (0xF, 0x30) => LoadHighFont { x },
        (0xF, 0x75) => SaveFlags { x },
        (0xF, 0x85) => LoadFlags { x },
        _ => return None,
    };

    Some(instruction)
}

fn decode_xo_chip(opcode: u16, next_word: u16) -> Option<Instruction> {
    use Instruction::*;

    let (family, x, y, n) = nibbles(opcode);
    let (x, y) = (x as usize, y as usize);

    let instruction = match (family, x, y, n) {
        (0x0, _, 0xD, _) => ScrollUp(n),
        (0x5, _, _, 0x2) => SaveRange { x, y },
        (0x5, _, _, 0x3) => LoadRange { x, y },
        (0xF, 0x0, 0x0, 0x0) => LoadIndexLong(next_word),
        (0xF, 0x0, 0x0, 0x2) => LoadAudioPattern,
        (0xF, _, 0x0, 0x1) => SelectPlanes(x as u8),
        _ => return None,
    };

    Some(instruction)
}

impl Display for Instruction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        use Instruction::*;

        match *self {
            ClearScreen => write!(f, "CLS"),
            Return => write!(f, "RET"),
            Jump(nnn) => write!(f, "JP\t{nnn:03X}"),
            Call(nnn) => write!(f, "CALL\t{nnn:03X}"),
            SkipEqImmediate { x, nn } => write!(f, "SE\tV{x:X},#{nn:02X}"),
            SkipNotEqImmediate { x, nn } => write!(f, "SNE\tV{x:X},#{nn:02X}"),
            SkipEqRegister { x, y } => write!(f, "SE\tV{x:X},V{y:X}"),
            LoadImmediate { x, nn } => write!(f, "LD\tV{x:X},#{nn:02X}"),
            AddImmediate { x, nn } => write!(f, "ADD\tV{x:X},#{nn:02X}"),
            Move { x, y } => write!(f, "LD\tV{x:X},V{y:X}"),
            Or { x, y } => write!(f, "OR\tV{x:X},V{y:X}"),
            And { x, y } => write!(f, "AND\tV{x:X},V{y:X}"),
            Xor { x, y } => write!(f, "XOR\tV{x:X},V{y:X}"),
            Add { x, y } => write!(f, "ADD\tV{x:X},V{y:X}"),
            Sub { x, y } => write!(f, "SUB\tV{x:X},V{y:X}"),
            ShiftRight { x, y } => write!(f, "SHR\tV{x:X},V{y:X}"),
            SubN { x, y } => write!(f, "SUBN\tV{x:X},V{y:X}"),
            ShiftLeft { x, y } => write!(f, "SHL\tV{x:X},V{y:X}"),
            SkipNotEqRegister { x, y } => write!(f, "SNE\tV{x:X},V{y:X}"),
            LoadIndex(nnn) => write!(f, "LD\tI,#{nnn:03X}"),
            JumpOffset { nnn, .. } => write!(f, "JP\t[V0],#{nnn:03X}"),
            Random { x, nn } => write!(f, "RND\tV{x:X},#{nn:02X}"),
            Draw { x, y, n } => write!(f, "DRW\tV{x:X},V{y:X},#{n:X}"),
            SkipKeyPressed { x } => write!(f, "SKP\tV{x:X}"),
            SkipKeyNotPressed { x } => write!(f, "SKNP\tV{x:X}"),
            LoadDelay { x } => write!(f, "LD\tV{x:X},DT"),
            WaitKey { x } => write!(f, "LD\tV{x:X},K"),
            SetDelay { x } => write!(f, "LD\tDT,V{x:X}"),
            SetSound { x } => write!(f, "LD\tST,V{x:X}"),
            AddIndex { x } => write!(f, "ADD\tI,V{x:X}"),
            LoadFont { x } => write!(f, "LD\tF,V{x:X}"),
            StoreBcd { x } => write!(f, "LD\tB,V{x:X}"),
            StoreRegisters { x } => write!(f, "LD\t[I],V{x:X}"),
            LoadRegisters { x } => write!(f, "LD\tV{x:X},[I]"),
            ScrollDown(n) => write!(f, "SCDOWN\t{n:X}"),
            ScrollRight => write!(f, "SCRIGHT"),
            ScrollLeft => write!(f, "SCLEFT"),
            Exit => write!(f, "EXIT"),
            LowResolution => write!(f, "LOW"),
            HighResolution => write!(f, "HIGH"),
            Compatibility => write!(f, "COMPATIBILITY"),
            DrawExtended { x, y } => write!(f, "XDRW\tV{x:X},V{y:X}"),
            LoadHighFont { x } => write!(f, "LD\tHF,V{x:X}"),
            SaveFlags { x } => write!(f, "LD\tR,V{x:X}"),
            LoadFlags { x } => write!(f, "LD\tV{x:X},R"),
            ScrollUp(n) => write!(f, "SCUP\t{n:X}"),
            SaveRange { x, y } => write!(f, "LD\t[I],V{x:X}-V{y:X}"),
            LoadRange { x, y } => write!(f, "LD\tV{x:X}-V{y:X},[I]"),
            LoadIndexLong(nnnn) => write!(f, "LD\tI,#{nnnn:04X}L"),
            LoadAudioPattern => write!(f, "AUDIO"),
            SelectPlanes(mask) => write!(f, "PLANE\t#{mask:X}"),
        }
    }
}
