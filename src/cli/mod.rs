//! # CLI Module
//!
//! Command-line interface of the `restscaffold-gen` binary.
//!
//! ## Commands
//!
//! ### `generate`
//!
//! Generate one service file per root service in the catalog:
//!
//! ```bash
//! restscaffold-gen generate --catalog services.yaml --docs docs.yaml --output src/generated
//! ```
//!
//! Options:
//! - `--catalog <FILE>` - Type catalog (required)
//! - `--docs <FILE>` - Documentation model
//! - `--config <FILE>` - `restscaffold.toml`; auto-detected next to the catalog
//! - `--output <DIR>` - Output directory
//! - `--force` - Overwrite files whose contents differ
//! - `--dry-run` - Report SHA-256 digests of what would change, write nothing
//!
//! ### `inspect`
//!
//! Print the generated routes, their invocation chains and the registered
//! resource descriptors:
//!
//! ```bash
//! restscaffold-gen inspect --catalog services.yaml
//! ```
//!
//! ## Usage from Code
//!
//! ```rust,ignore
//! use restscaffold::cli::{run_cli, Cli};
//! use clap::Parser;
//!
//! let cli = Cli::parse();
//! run_cli(&cli)?;
//! ```

mod commands;

#[cfg(test)]
mod tests;

pub use commands::{run_cli, run_with_output, Cli, Commands};
