use std::env;
use std::fmt::{Display, Formatter};

/// Interpreter family a machine emulates. Ordered: every variant accepts the
/// opcode tables of the variants before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Variant {
    /// COSMAC VIP CHIP-8.
    Chip8,
    /// HP-48 SuperChip 1.1.
    SuperChip,
    XoChip,
}

impl Variant {
    pub const ALL: [Variant; 3] = [Variant::Chip8, Variant::SuperChip, Variant::XoChip];

    pub fn default_quirks(self) -> Chip8Quirks {
        match self {
            Variant::Chip8 => VIP_QUIRKS,
            Variant::SuperChip => HP48_QUIRKS,
            Variant::XoChip => XO_CHIP_QUIRKS,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Variant::Chip8 => "CHIP-8",
            Variant::SuperChip => "SuperChip",
            Variant::XoChip => "XO-Chip",
        }
    }
}

impl Display for Variant {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Behaviour at the opcodes where the historical interpreters disagree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chip8Quirks {
    /// `8XY6`/`8XYE` shift `Vy` into `Vx` instead of shifting `Vx` in place.
    pub shift_uses_vy: bool,
    /// `FX55`/`FX65` leave `I` pointing past the last register copied.
    pub load_store_increment_i: bool,
    /// `BNNN` adds `Vx` (high nibble of the address) instead of `V0`.
    pub jump_with_vx: bool,
}

pub const VIP_QUIRKS: Chip8Quirks = Chip8Quirks {
    shift_uses_vy: true,
    load_store_increment_i: true,
    jump_with_vx: false,
};

pub const HP48_QUIRKS: Chip8Quirks = Chip8Quirks {
    shift_uses_vy: false,
    load_store_increment_i: false,
    jump_with_vx: true,
};

/// XO-Chip inherits the HP-48 interpreter's behaviour.
pub const XO_CHIP_QUIRKS: Chip8Quirks = HP48_QUIRKS;

pub fn load_quirks_profile(profile: &str) -> Result<Chip8Quirks, String> {
    match profile.trim().to_ascii_lowercase().as_str() {
        "vip" | "original" => Ok(VIP_QUIRKS),
        "hp48" | "schip" | "modern" => Ok(HP48_QUIRKS),
        "xochip" => Ok(XO_CHIP_QUIRKS),
        other => Err(format!(
            "invalid CHIP8_QUIRKS '{other}', expected one of: vip, hp48, xochip"
        )),
    }
}

/// Reads an explicit quirk override from `CHIP8_QUIRKS`; `None` when unset so the
/// variant's own profile applies.
pub fn load_quirks_profile_from_env() -> Result<Option<(String, Chip8Quirks)>, String> {
    let Ok(profile) = env::var("CHIP8_QUIRKS") else {
        return Ok(None);
    };
    let normalized = profile.trim().to_ascii_lowercase();
    let quirks = load_quirks_profile(&normalized)?;
    Ok(Some((normalized, quirks)))
}
