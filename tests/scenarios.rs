use pretty_assertions::assert_eq;
use test_case::test_case;

use xochip_emulator_rs::{
    create_state, dump_display, execute_cycle, load_rom, Chip8Config, Chip8Error, EmulatorState,
    KeyState, Variant,
};

fn step(state: &mut EmulatorState) -> Result<(), Chip8Error> {
    execute_cycle(state, &mut KeyState::new(), &mut ()).map(|_| ())
}

fn row_text(state: &EmulatorState, y: usize, columns: std::ops::Range<usize>) -> String {
    columns
        .map(|x| if state.display.pixel(0, x, y) { '#' } else { '.' })
        .collect()
}

#[test_case(Variant::Chip8 ; "chip8")]
#[test_case(Variant::SuperChip ; "superchip")]
#[test_case(Variant::XoChip ; "xochip")]
fn draws_font_glyph_a(variant: Variant) {
    let mut state = create_state(Chip8Config::for_variant(variant)).unwrap();
    // CLS; LD V0,#0A; LD F,V0; DRW V0,V0,#5
    load_rom(&mut state, &[0x00, 0xE0, 0x60, 0x0A, 0xF0, 0x29, 0xD0, 0x05]).unwrap();

    for _ in 0..4 {
        step(&mut state).unwrap();
    }

    // Both coordinates come from V0, so the glyph lands at (10, 10).
    let glyph = ["####", "#..#", "####", "#..#", "#..#"];
    for (row, expected) in glyph.iter().enumerate() {
        assert_eq!(row_text(&state, 10 + row, 10..14), *expected);
    }
    let lit = state.display.plane(0).iter().filter(|lit| **lit).count();
    assert_eq!(lit, 14);
    assert_eq!(state.registers[0xF], 0);
    assert_eq!(state.pc, 0x208);
}

#[test]
fn add_index_flags_the_call_that_crosses_fff() {
    let mut state = create_state(Chip8Config::chip8()).unwrap();
    // LD I,#FFE; LD V1,#01; ADD I,V1; ADD I,V1
    load_rom(&mut state, &[0xAF, 0xFE, 0x61, 0x01, 0xF1, 0x1E, 0xF1, 0x1E]).unwrap();

    step(&mut state).unwrap();
    step(&mut state).unwrap();

    step(&mut state).unwrap();
    assert_eq!(state.index, 0xFFF);
    assert_eq!(state.registers[0xF], 0);

    step(&mut state).unwrap();
    assert_eq!(state.index, 0x1000);
    assert_eq!(state.registers[0xF], 1);
}

#[test]
fn scroll_down_four_in_high_resolution() {
    let mut state = create_state(Chip8Config::super_chip()).unwrap();
    // HIGH; SCDOWN 4
    load_rom(&mut state, &[0x00, 0xFF, 0x00, 0xC4]).unwrap();
    step(&mut state).unwrap();
    state.display.set_pixel(0, 42, 0, true);

    step(&mut state).unwrap();

    assert!(state.display.pixel(0, 42, 4));
    for y in 0..4 {
        assert!(!state.display.plane(0)[y * 128..(y + 1) * 128].contains(&true));
    }
}

#[test]
fn scroll_down_four_moves_every_selected_plane() {
    let mut state = create_state(Chip8Config::xo_chip()).unwrap();
    // HIGH; PLANE 3; SCDOWN 4
    load_rom(&mut state, &[0x00, 0xFF, 0xF3, 0x01, 0x00, 0xC4]).unwrap();
    step(&mut state).unwrap();
    step(&mut state).unwrap();
    state.display.set_pixel(0, 1, 0, true);
    state.display.set_pixel(1, 2, 0, true);

    step(&mut state).unwrap();

    assert_eq!(state.display.colour_index(1, 4), 0b01);
    assert_eq!(state.display.colour_index(2, 4), 0b10);
    assert_eq!(state.display.colour_index(1, 0), 0);
    assert_eq!(state.display.colour_index(2, 0), 0);
}

#[test_case(Variant::Chip8 ; "chip8")]
#[test_case(Variant::SuperChip ; "superchip")]
#[test_case(Variant::XoChip ; "xochip")]
fn all_ones_opcode_is_illegal(variant: Variant) {
    let mut state = create_state(Chip8Config::for_variant(variant)).unwrap();
    load_rom(&mut state, &[0xFF, 0xFF]).unwrap();
    let before = state.registers;

    let error = step(&mut state).unwrap_err();

    assert!(matches!(
        error,
        Chip8Error::IllegalInstruction {
            opcode: 0xFFFF,
            pc: 0x200
        }
    ));
    assert_eq!(error.opcode(), Some(0xFFFF));
    assert_eq!(state.pc, 0x200);
    assert_eq!(state.registers, before);
}

#[test]
fn glyph_dump_matches_display() {
    let mut state = create_state(Chip8Config::chip8()).unwrap();
    load_rom(&mut state, &[0x00, 0xE0, 0x60, 0x0A, 0xF0, 0x29, 0xD0, 0x05]).unwrap();
    for _ in 0..4 {
        step(&mut state).unwrap();
    }

    let dump = dump_display(&state.display).unwrap();
    let rows: Vec<&str> = dump.lines().collect();

    assert_eq!(rows.len(), 32);
    assert_eq!(&rows[12][8..16], "..####..");
    assert_eq!(&rows[13][8..16], "..#..#..");
}

#[test]
fn machines_do_not_share_state() {
    let mut first = create_state(Chip8Config::chip8()).unwrap();
    let second = create_state(Chip8Config::chip8()).unwrap();
    load_rom(&mut first, &[0x00, 0xE0, 0x60, 0x0A, 0xF0, 0x29, 0xD0, 0x05]).unwrap();

    for _ in 0..4 {
        step(&mut first).unwrap();
    }

    assert!(first.display.plane(0).contains(&true));
    assert!(!second.display.plane(0).contains(&true));
    assert_eq!(second.memory.get(0x200), 0);
}
