// src/commands/mod.rs
//! Command handlers for the config-distro CLI

mod register;

pub use register::cmd_register;
