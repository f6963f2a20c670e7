//! CLI module for Modelforge
//!
//! Provides subcommands for running the code generator in different modes:
//! - `serve`: HTTP API server (default)
//! - `generate`: one-shot script generation from a model description file

pub mod generate;
pub mod serve;

use clap::{Parser, Subcommand};

/// Modelforge - Keras training-script generation from visual model descriptions
#[derive(Parser)]
#[command(name = "modelforge")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP API server
    Serve,

    /// Generate a training script from a model description JSON file
    Generate(generate::GenerateArgs),
}
