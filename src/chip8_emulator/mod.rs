pub mod app;
pub mod config;
pub mod cpu;
pub mod devices;
pub mod disasm;
pub mod display;
pub mod error;
pub mod instruction;
pub mod memory;
pub mod quirks;
pub mod state;
