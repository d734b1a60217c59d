//! Launch parameter parsing for the sandbox.
//!
//! On native, parameters are parsed from command-line arguments using clap.
//! On WASM, defaults are used (CLI argument parsing is not available).

use std::path::PathBuf;

use bevy::prelude::*;

/// Launch parameters for the sandbox.
#[derive(Resource, Debug, Default)]
pub struct LaunchParams {
    /// Controller tuning file (JSON). Defaults are used when absent.
    pub config: Option<PathBuf>,
    /// Draw the grounded probe and aim target with gizmos.
    pub debug_draw: bool,
    /// Leave the cursor free at startup.
    pub no_cursor_lock: bool,
}

#[cfg(not(target_family = "wasm"))]
mod native {
    use clap::Parser;

    use super::*;

    #[derive(Parser)]
    #[command(about = "Third-person character sandbox")]
    struct CliArgs {
        /// Controller tuning file (JSON).
        #[arg(long)]
        config: Option<PathBuf>,

        /// Draw the grounded probe and aim target.
        #[arg(long)]
        debug_draw: bool,

        /// Do not grab the cursor at startup.
        #[arg(long)]
        no_cursor_lock: bool,
    }

    pub fn parse() -> LaunchParams {
        let args = CliArgs::parse();
        LaunchParams {
            config: args.config,
            debug_draw: args.debug_draw,
            no_cursor_lock: args.no_cursor_lock,
        }
    }
}

/// Parse launch parameters from CLI args (native) or use defaults (WASM).
pub fn parse() -> LaunchParams {
    #[cfg(not(target_family = "wasm"))]
    {
        native::parse()
    }
    #[cfg(target_family = "wasm")]
    {
        LaunchParams::default()
    }
}
