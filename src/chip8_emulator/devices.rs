use crate::chip8_emulator::config::KEY_COUNT;
use crate::chip8_emulator::disasm::Disassembly;

/// Hexadecimal keypad as seen by the machine.
pub trait Keyboard {
    /// Checks immediately whether `key` (`0..16`) is held down.
    fn is_key_pressed(&self, key: u8) -> bool;

    /// Polled once per cycle while the machine waits for a key. Returns the key
    /// that satisfies the wait, if any.
    fn check_key_press(&mut self) -> Option<u8>;
}

/// Keypad state driven directly by the host.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyState {
    keys: [bool; KEY_COUNT],
}

impl KeyState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Out-of-range keys are ignored.
    pub fn set_key_state(&mut self, key_index: usize, is_pressed: bool) {
        if key_index >= KEY_COUNT {
            return;
        }

        self.keys[key_index] = is_pressed;
    }

    pub fn release_all(&mut self) {
        self.keys = [false; KEY_COUNT];
    }

    pub fn first_pressed_key(&self) -> Option<u8> {
        self.keys
            .iter()
            .position(|pressed| *pressed)
            .map(|index| index as u8)
    }
}

impl Keyboard for KeyState {
    fn is_key_pressed(&self, key: u8) -> bool {
        self.keys[(key & 0x0F) as usize]
    }

    fn check_key_press(&mut self) -> Option<u8> {
        self.first_pressed_key()
    }
}

/// Notifications a machine raises while running. Every method defaults to a
/// no-op so hosts only implement what they present.
pub trait EventSink {
    fn beep_started(&mut self) {}

    fn beep_stopped(&mut self) {}

    fn high_resolution_configured(&mut self) {}

    fn low_resolution_configured(&mut self) {}

    fn instruction_executed(&mut self, _disassembly: &Disassembly) {}
}

/// Discards every notification.
impl EventSink for () {}

/// Forwards notifications to the `log` facade; instruction traces go to `trace!`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingEvents;

impl EventSink for LoggingEvents {
    fn beep_started(&mut self) {
        log::debug!("beep started");
    }

    fn beep_stopped(&mut self) {
        log::debug!("beep stopped");
    }

    fn high_resolution_configured(&mut self) {
        log::debug!("high resolution configured");
    }

    fn low_resolution_configured(&mut self) {
        log::debug!("low resolution configured");
    }

    fn instruction_executed(&mut self, disassembly: &Disassembly) {
        log::trace!("{disassembly}");
    }
}

/// A notification captured by the recording sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    BeepStarted,
    BeepStopped,
    HighResolution,
    LowResolution,
    Executed(Disassembly),
}

/// Records every notification in order.
impl EventSink for Vec<Event> {
    fn beep_started(&mut self) {
        self.push(Event::BeepStarted);
    }

    fn beep_stopped(&mut self) {
        self.push(Event::BeepStopped);
    }

    fn high_resolution_configured(&mut self) {
        self.push(Event::HighResolution);
    }

    fn low_resolution_configured(&mut self) {
        self.push(Event::LowResolution);
    }

    fn instruction_executed(&mut self, disassembly: &Disassembly) {
        self.push(Event::Executed(*disassembly));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_pressed_key_is_lowest_index() {
        let mut keys = KeyState::new();
        assert_eq!(keys.check_key_press(), None);

        keys.set_key_state(0xB, true);
        keys.set_key_state(0x4, true);
        assert_eq!(keys.check_key_press(), Some(0x4));

        keys.release_all();
        assert_eq!(keys.first_pressed_key(), None);
    }

    #[test]
    fn out_of_range_keys_are_ignored() {
        let mut keys = KeyState::new();
        keys.set_key_state(KEY_COUNT, true);

        assert_eq!(keys, KeyState::new());
    }

    #[test]
    fn key_lookups_use_low_nibble() {
        let mut keys = KeyState::new();
        keys.set_key_state(0x3, true);

        assert!(keys.is_key_pressed(0x13));
        assert!(!keys.is_key_pressed(0x2));
    }
}
