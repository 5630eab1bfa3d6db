use crate::chip8_emulator::config::{
    FLAG_REGISTER_COUNT, FONT_GLYPH_SIZE, FONT_OFFSET, HIGH_FONT_GLYPH_SIZE, HIGH_FONT_OFFSET,
};
use crate::chip8_emulator::devices::{EventSink, Keyboard};
use crate::chip8_emulator::disasm::Disassembly;
use crate::chip8_emulator::error::Chip8Error;
use crate::chip8_emulator::instruction::{decode, DecodeError, Instruction};
use crate::chip8_emulator::state::{pop_stack, push_stack, random_byte, EmulatorState};

/// What a single `execute_cycle` call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    Executed(Disassembly),
    /// A key wait is pending and no key is down; nothing was fetched.
    AwaitingKey,
    /// A pending key wait was satisfied with this key.
    KeyReceived(u8),
}

fn decode_error(error: DecodeError, opcode: u16, pc: u16) -> Chip8Error {
    match error {
        DecodeError::Illegal => Chip8Error::IllegalInstruction { opcode, pc },
        DecodeError::RequiresVariant(required) => Chip8Error::VariantViolation {
            opcode,
            pc,
            required,
        },
    }
}

/// Runs one machine cycle: either polls the keyboard for a pending key wait or
/// fetches, decodes and executes the instruction at `pc`.
///
/// A faulting cycle leaves the machine untouched.
pub fn execute_cycle(
    state: &mut EmulatorState,
    keyboard: &mut dyn Keyboard,
    events: &mut dyn EventSink,
) -> Result<CycleOutcome, Chip8Error> {
    if state.waiting_for_key {
        return Ok(poll_key_wait(state, keyboard));
    }

    let pc = state.pc;
    if !state.config.allow_misaligned_opcodes && pc % 2 != 0 {
        return Err(Chip8Error::MisalignedInstructionFetch { pc });
    }

    let opcode = state.memory.get_word(pc as usize);
    let next_word = state.memory.get_word(pc as usize + 2);
    let instruction = decode(opcode, next_word, state.config.variant)
        .map_err(|error| decode_error(error, opcode, pc))?;

    state.pc = pc.wrapping_add(instruction.size());
    execute_instruction(state, instruction, keyboard, events);

    let disassembly = Disassembly {
        pc,
        opcode,
        instruction,
    };
    events.instruction_executed(&disassembly);

    Ok(CycleOutcome::Executed(disassembly))
}

fn poll_key_wait(state: &mut EmulatorState, keyboard: &mut dyn Keyboard) -> CycleOutcome {
    match keyboard.check_key_press() {
        Some(key) => {
            state.waiting_for_key = false;
            state.registers[state.key_register] = key;
            CycleOutcome::KeyReceived(key)
        }
        None => CycleOutcome::AwaitingKey,
    }
}

/// Executes `opcode` as if it had just been fetched: `pc` is expected to point
/// past it already.
pub fn execute_opcode(
    state: &mut EmulatorState,
    opcode: u16,
    keyboard: &mut dyn Keyboard,
    events: &mut dyn EventSink,
) -> Result<Instruction, Chip8Error> {
    let next_word = state.memory.get_word(state.pc as usize);
    let instruction = decode(opcode, next_word, state.config.variant)
        .map_err(|error| decode_error(error, opcode, state.pc.wrapping_sub(2)))?;

    // The caller only stepped over the first word.
    state.pc = state.pc.wrapping_add(instruction.size() - 2);
    execute_instruction(state, instruction, keyboard, events);

    Ok(instruction)
}

/// Once per 60 Hz tick. Beep notifications fire on the edges of the sound timer.
pub fn tick_timers(state: &mut EmulatorState, events: &mut dyn EventSink) {
    state.delay_timer = state.delay_timer.saturating_sub(1);

    if state.sound_timer > 0 {
        if !state.sound_playing {
            state.sound_playing = true;
            events.beep_started();
        }
        state.sound_timer -= 1;
    } else if state.sound_playing {
        state.sound_playing = false;
        events.beep_stopped();
    }
}

fn skip_next(pc: &mut u16, condition: bool) {
    if condition {
        *pc = pc.wrapping_add(2);
    }
}

fn shift_source(state: &EmulatorState, x: usize, y: usize) -> u8 {
    if state.config.quirks.shift_uses_vy {
        state.registers[y]
    } else {
        state.registers[x]
    }
}

fn register_range(x: usize, y: usize) -> Vec<usize> {
    if x <= y {
        (x..=y).collect()
    } else {
        (y..=x).rev().collect()
    }
}

fn advance_index_after_transfer(state: &mut EmulatorState, x: usize) {
    if state.config.quirks.load_store_increment_i || state.compatibility_mode {
        state.index = state.index.wrapping_add(x as u16 + 1);
    }
}

/// Applies a decoded instruction. Every instruction is total over machine state.
pub fn execute_instruction(
    state: &mut EmulatorState,
    instruction: Instruction,
    keyboard: &mut dyn Keyboard,
    events: &mut dyn EventSink,
) {
    use Instruction::*;

    match instruction {
        ClearScreen => {
            state.display.clear();
            state.should_draw = true;
        }
        Return => state.pc = pop_stack(state),
        Jump(nnn) => state.pc = nnn,
        Call(nnn) => {
            let return_address = state.pc;
            push_stack(state, return_address);
            state.pc = nnn;
        }
        SkipEqImmediate { x, nn } => skip_next(&mut state.pc, state.registers[x] == nn),
        SkipNotEqImmediate { x, nn } => skip_next(&mut state.pc, state.registers[x] != nn),
        SkipEqRegister { x, y } => {
            skip_next(&mut state.pc, state.registers[x] == state.registers[y])
        }
        SkipNotEqRegister { x, y } => {
            skip_next(&mut state.pc, state.registers[x] != state.registers[y])
        }
        LoadImmediate { x, nn } => state.registers[x] = nn,
        AddImmediate { x, nn } => state.registers[x] = state.registers[x].wrapping_add(nn),

        Move { x, y } => state.registers[x] = state.registers[y],
        Or { x, y } => state.registers[x] |= state.registers[y],
        And { x, y } => state.registers[x] &= state.registers[y],
        Xor { x, y } => state.registers[x] ^= state.registers[y],
        Add { x, y } => {
            let (vx, vy) = (state.registers[x], state.registers[y]);
            state.registers[0xF] = u8::from(vy > 0xFF - vx);
            state.registers[x] = vx.wrapping_add(vy);
        }
        Sub { x, y } => {
            let (vx, vy) = (state.registers[x], state.registers[y]);
            state.registers[0xF] = u8::from(vx >= vy);
            state.registers[x] = vx.wrapping_sub(vy);
        }
        SubN { x, y } => {
            let (vx, vy) = (state.registers[x], state.registers[y]);
            state.registers[0xF] = u8::from(vx <= vy);
            state.registers[x] = vy.wrapping_sub(vx);
        }
        ShiftRight { x, y } => {
            let value = shift_source(state, x, y);
            state.registers[x] = value >> 1;
            state.registers[0xF] = value & 0x1;
        }
        ShiftLeft { x, y } => {
            let value = shift_source(state, x, y);
            state.registers[x] = value << 1;
            state.registers[0xF] = (value & 0x80) >> 7;
        }

        LoadIndex(nnn) => state.index = nnn,
        JumpOffset { x, nnn } => {
            let jump_register = if state.config.quirks.jump_with_vx { x } else { 0 };
            state.pc = nnn.wrapping_add(state.registers[jump_register] as u16);
        }
        Random { x, nn } => state.registers[x] = random_byte(state) & nn,
        Draw { x, y, n } => draw_sprite(state, x, y, 8, n as usize),
        DrawExtended { x, y } => draw_sprite(state, x, y, 16, 16),
        SkipKeyPressed { x } => {
            let pressed = keyboard.is_key_pressed(state.registers[x] & 0x0F);
            skip_next(&mut state.pc, pressed);
        }
        SkipKeyNotPressed { x } => {
            let pressed = keyboard.is_key_pressed(state.registers[x] & 0x0F);
            skip_next(&mut state.pc, !pressed);
        }
        LoadDelay { x } => state.registers[x] = state.delay_timer,
        WaitKey { x } => {
            state.waiting_for_key = true;
            state.key_register = x;
        }
        SetDelay { x } => state.delay_timer = state.registers[x],
        SetSound { x } => state.sound_timer = state.registers[x],
        AddIndex { x } => {
            let value = state.registers[x] as u16;
            state.registers[0xF] = u8::from(state.index as u32 + value as u32 > 0xFFF);
            state.index = state.index.wrapping_add(value);
        }
        LoadFont { x } => {
            state.index = FONT_OFFSET + FONT_GLYPH_SIZE * state.registers[x] as u16;
        }
        LoadHighFont { x } => {
            state.index = HIGH_FONT_OFFSET + HIGH_FONT_GLYPH_SIZE * state.registers[x] as u16;
        }
        StoreBcd { x } => {
            let value = state.registers[x];
            let index = state.index as usize;
            state.memory.set(index, value / 100);
            state.memory.set(index + 1, (value % 100) / 10);
            state.memory.set(index + 2, value % 10);
        }
        StoreRegisters { x } => {
            let index = state.index as usize;
            for register in 0..=x {
                state.memory.set(index + register, state.registers[register]);
            }
            advance_index_after_transfer(state, x);
        }
        LoadRegisters { x } => {
            let index = state.index as usize;
            for register in 0..=x {
                state.registers[register] = state.memory.get(index + register);
            }
            advance_index_after_transfer(state, x);
        }
        SaveRange { x, y } => {
            let index = state.index as usize;
            for (offset, register) in register_range(x, y).into_iter().enumerate() {
                state.memory.set(index + offset, state.registers[register]);
            }
        }
        LoadRange { x, y } => {
            let index = state.index as usize;
            for (offset, register) in register_range(x, y).into_iter().enumerate() {
                state.registers[register] = state.memory.get(index + offset);
            }
        }
        SaveFlags { x } => {
            let count = (x + 1).min(FLAG_REGISTER_COUNT);
            state.flag_registers[..count].copy_from_slice(&state.registers[..count]);
        }
        LoadFlags { x } => {
            let count = (x + 1).min(FLAG_REGISTER_COUNT);
            state.registers[..count].copy_from_slice(&state.flag_registers[..count]);
        }

        ScrollDown(n) => {
            state.display.scroll_down(n as usize);
            state.should_draw = true;
        }
        ScrollUp(n) => {
            state.display.scroll_up(n as usize);
            state.should_draw = true;
        }
        ScrollRight => {
            state.display.scroll_right();
            state.should_draw = true;
        }
        ScrollLeft => {
            state.display.scroll_left();
            state.should_draw = true;
        }
        LowResolution => {
            log::debug!("switching to low resolution");
            state.display.set_high_resolution(false);
            state.should_draw = true;
            events.low_resolution_configured();
        }
        HighResolution => {
            log::debug!("switching to high resolution");
            state.display.set_high_resolution(true);
            state.should_draw = true;
            events.high_resolution_configured();
        }
        Exit => {
            log::debug!("program exited at 0x{:04x}", state.pc.wrapping_sub(2));
            state.finished = true;
        }
        Compatibility => state.compatibility_mode = true,
        LoadIndexLong(nnnn) => state.index = nnnn,
        LoadAudioPattern => {
            let index = state.index as usize;
            for (offset, byte) in state.audio_pattern.iter_mut().enumerate() {
                *byte = state.memory.get(index + offset);
            }
        }
        SelectPlanes(mask) => {
            log::debug!("plane mask 0x{mask:x}");
            state.display.set_plane_mask(mask);
        }
    }
}

fn draw_sprite(state: &mut EmulatorState, x: usize, y: usize, width: usize, height: usize) {
    let draw_x = state.registers[x] as usize;
    let draw_y = state.registers[y] as usize;

    let hits = state.display.draw(
        &state.memory,
        state.index as usize,
        draw_x,
        draw_y,
        width,
        height,
    );

    state.registers[0xF] = hits as u8;
    state.should_draw = true;
}
