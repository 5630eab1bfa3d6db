use std::fmt::{Display, Formatter};

use crate::chip8_emulator::quirks::Variant;

#[derive(Debug)]
pub enum Chip8Error {
    Io(std::io::Error),
    RomTooLarge { size: usize, max: usize },
    IllegalInstruction { opcode: u16, pc: u16 },
    VariantViolation { opcode: u16, pc: u16, required: Variant },
    MisalignedInstructionFetch { pc: u16 },
    InvalidArgument(&'static str),
}

impl Chip8Error {
    /// Opcode that stopped execution, for the instruction faults.
    pub fn opcode(&self) -> Option<u16> {
        match self {
            Self::IllegalInstruction { opcode, .. } | Self::VariantViolation { opcode, .. } => {
                Some(*opcode)
            }
            _ => None,
        }
    }
}

impl Display for Chip8Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(error) => write!(f, "io error: {error}"),
            Self::RomTooLarge { size, max } => {
                write!(f, "ROM too large: {size} bytes (max {max})")
            }
            Self::IllegalInstruction { opcode, pc } => {
                write!(f, "illegal instruction 0x{opcode:04x} at 0x{pc:04x}")
            }
            Self::VariantViolation {
                opcode,
                pc,
                required,
            } => write!(
                f,
                "instruction 0x{opcode:04x} at 0x{pc:04x} requires {required}"
            ),
            Self::MisalignedInstructionFetch { pc } => {
                write!(f, "misaligned instruction fetch at 0x{pc:04x}")
            }
            Self::InvalidArgument(argument) => write!(f, "invalid argument: {argument}"),
        }
    }
}

impl std::error::Error for Chip8Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(error) => Some(error),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Chip8Error {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}
