use std::fmt::Write as FmtWrite;
use std::path::Path;

use crate::chip8_emulator::config::Chip8Config;
use crate::chip8_emulator::cpu::{execute_cycle, tick_timers};
use crate::chip8_emulator::devices::{EventSink, KeyState, Keyboard};
use crate::chip8_emulator::display::Display;
use crate::chip8_emulator::error::Chip8Error;
use crate::chip8_emulator::state::{create_state, load_rom_file, EmulatorState};

/// Runs one 60 Hz frame: up to `cycles_per_frame` cycles, then one timer tick.
///
/// In low resolution the frame ends early once a display update is pending, so
/// a low resolution program draws at most once per frame. Returns the number of
/// cycles run.
pub fn run_frame(
    state: &mut EmulatorState,
    keyboard: &mut dyn Keyboard,
    events: &mut dyn EventSink,
) -> Result<usize, Chip8Error> {
    let mut cycles = 0;

    for _ in 0..state.config.cycles_per_frame {
        if state.finished {
            break;
        }
        if state.display.low_resolution() && state.should_draw {
            break;
        }

        execute_cycle(state, keyboard, events)?;
        cycles += 1;
    }

    tick_timers(state, events);

    Ok(cycles)
}

/// Loads `rom_path` and runs it without presentation or input for at most
/// `max_frames` frames, or until the program exits.
pub fn run_emulator_headless(
    config: Chip8Config,
    rom_path: &Path,
    max_frames: usize,
    events: &mut dyn EventSink,
) -> Result<EmulatorState, Chip8Error> {
    if max_frames == 0 {
        return Err(Chip8Error::InvalidArgument("max_frames must be > 0"));
    }

    let mut state = create_state(config)?;
    load_rom_file(&mut state, rom_path)?;
    let mut keyboard = KeyState::new();

    log::info!(
        "running {} as {} for up to {max_frames} frames",
        rom_path.display(),
        config.variant
    );

    let mut frames = 0;
    while frames < max_frames && !state.finished {
        if let Err(error) = run_frame(&mut state, &mut keyboard, events) {
            log::warn!("stopped after {frames} frames: {error}");
            return Err(error);
        }
        // Nothing presents the display, so the pending update is consumed here.
        state.should_draw = false;
        frames += 1;
    }

    log::info!(
        "headless run finished after {frames} frames: finished={} pc=0x{:04x}",
        state.finished,
        state.pc
    );

    Ok(state)
}

/// Renders the display as text, one line per row. Unlit cells are `.`; lit cells
/// show `#` on single plane displays and their colour index otherwise.
pub fn dump_display(display: &Display) -> Result<String, std::fmt::Error> {
    let mut buf = String::new();
    let monochrome = display.number_of_colours() == 2;

    for y in 0..display.height() {
        for x in 0..display.width() {
            match display.colour_index(x, y) {
                0 => write!(buf, ".")?,
                _ if monochrome => write!(buf, "#")?,
                colour => write!(buf, "{colour:X}")?,
            }
        }
        writeln!(buf)?;
    }

    Ok(buf)
}
