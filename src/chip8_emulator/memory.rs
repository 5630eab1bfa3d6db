use crate::chip8_emulator::error::Chip8Error;

/// Flat byte-addressable store. Addresses wrap at the configured size, the
/// emulated hardware never faulted on an out-of-range access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Memory {
    bytes: Box<[u8]>,
}

impl Memory {
    pub fn new(size: usize) -> Result<Self, Chip8Error> {
        if size == 0 {
            return Err(Chip8Error::InvalidArgument("memory size must be > 0"));
        }

        Ok(Self {
            bytes: vec![0; size].into_boxed_slice(),
        })
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    #[inline]
    fn wrap(&self, address: usize) -> usize {
        address % self.bytes.len()
    }

    pub fn get(&self, address: usize) -> u8 {
        self.bytes[self.wrap(address)]
    }

    /// Big-endian word at `address`, `address + 1`.
    pub fn get_word(&self, address: usize) -> u16 {
        let high = self.get(address) as u16;
        let low = self.get(address.wrapping_add(1)) as u16;
        (high << 8) | low
    }

    pub fn set(&mut self, address: usize, value: u8) {
        let address = self.wrap(address);
        self.bytes[address] = value;
    }

    pub fn clear(&mut self) {
        self.bytes.fill(0);
    }

    /// Copies `data` starting at `address`, wrapping past the end.
    pub fn load(&mut self, address: usize, data: &[u8]) {
        for (offset, &byte) in data.iter().enumerate() {
            self.set(address + offset, byte);
        }
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }
}
