use std::path::PathBuf;

use clap::Parser;

use xochip_emulator_rs::{
    dump_display, load_quirks_profile, load_quirks_profile_from_env, load_variant,
    load_variant_from_env, run_emulator_headless, Chip8Config, Chip8Error, EventSink,
    LoggingEvents,
};

#[derive(Debug, Parser)]
#[command(name = "xochip-emulator-rs")]
#[command(about = "Run a CHIP-8, SuperChip or XO-Chip program headless")]
struct Args {
    #[arg(long)]
    rom: PathBuf,

    /// chip8, schip or xochip; defaults to CHIP8_VARIANT, then chip8.
    #[arg(long)]
    variant: Option<String>,

    /// vip, hp48 or xochip; defaults to CHIP8_QUIRKS, then the variant's own profile.
    #[arg(long)]
    quirks: Option<String>,

    #[arg(long, default_value_t = 600)]
    frames: usize,

    #[arg(long)]
    allow_misaligned: bool,

    #[arg(long)]
    seed: Option<u64>,

    /// Log every executed instruction at trace level.
    #[arg(long)]
    trace: bool,

    /// Print the final display contents.
    #[arg(long)]
    dump: bool,
}

fn build_config(args: &Args) -> Result<Chip8Config, Chip8Error> {
    let variant = match &args.variant {
        Some(name) => load_variant(name),
        None => load_variant_from_env(),
    }
    .map_err(|_| Chip8Error::InvalidArgument("variant must be chip8, schip or xochip"))?;

    let mut config = Chip8Config::for_variant(variant)
        .with_misaligned_opcodes(args.allow_misaligned);

    let quirks = match &args.quirks {
        Some(profile) => Some(load_quirks_profile(profile)),
        None => load_quirks_profile_from_env()
            .transpose()
            .map(|result| result.map(|(_, quirks)| quirks)),
    };
    if let Some(quirks) = quirks {
        let quirks = quirks
            .map_err(|_| Chip8Error::InvalidArgument("quirks must be vip, hp48 or xochip"))?;
        config = config.with_quirks(quirks);
    }

    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }

    Ok(config)
}

fn main() -> Result<(), Chip8Error> {
    env_logger::init();

    let args = Args::parse();
    let config = build_config(&args)?;

    let mut logging = LoggingEvents;
    let mut silent = ();
    let events: &mut dyn EventSink = if args.trace { &mut logging } else { &mut silent };

    let state = run_emulator_headless(config, &args.rom, args.frames, events)?;
    println!(
        "headless finished: variant={} finished={} pc=0x{:04x}",
        config.variant, state.finished, state.pc
    );

    if args.dump {
        let dump = dump_display(&state.display)
            .map_err(|_| Chip8Error::InvalidArgument("display could not be rendered"))?;
        print!("{dump}");
    }

    Ok(())
}
