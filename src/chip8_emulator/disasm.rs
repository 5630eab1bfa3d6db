//! Disassembly records for tracing executed instructions.
use std::fmt::{self, Display, Formatter};

use crate::chip8_emulator::instruction::Instruction;

/// The instruction a cycle just executed, with the address it was fetched from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Disassembly {
    pub pc: u16,
    pub opcode: u16,
    pub instruction: Instruction,
}

impl Disassembly {
    pub fn mnemonic(&self) -> String {
        self.instruction.to_string()
    }
}

impl Display for Disassembly {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "PC={:04x}\t{:04x}\t{}", self.pc, self.opcode, self.instruction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_address_opcode_and_mnemonic() {
        let record = Disassembly {
            pc: 0x200,
            opcode: 0x00E0,
            instruction: Instruction::ClearScreen,
        };

        assert_eq!(record.to_string(), "PC=0200\t00e0\tCLS");
        assert_eq!(record.mnemonic(), "CLS");
    }

    #[test]
    fn long_load_shows_full_address() {
        let record = Disassembly {
            pc: 0x20A,
            opcode: 0xF000,
            instruction: Instruction::LoadIndexLong(0x8000),
        };

        assert_eq!(record.to_string(), "PC=020a\tf000\tLD\tI,#8000L");
    }
}
