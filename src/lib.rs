//! vk Music Sync Library
//!
//! Mirrors a user's vk music collection into a local folder: authorizes via
//! the implicit-grant flow, fetches the track list, downloads what is missing,
//! removes what was deleted remotely and writes ID3 tags into new files.
//!
//! # Modules
//!
//! - `cli` - Command implementations used by the binary
//! - `config` - Configuration from flags, environment and `.env`
//! - `management` - Credential cache and local inventory
//! - `sync` - Sync planning, worker pools, downloader and tagger
//! - `types` - Data structures shared across modules
//! - `utils` - File naming convention and text helpers
//! - `vk` - Authorization and catalog client
//!
//! # Example
//!
//! ```
//! use vksync::{cli, config};
//!
//! #[tokio::main]
//! async fn main() {
//!     config::load_env().ok();
//!     cli::sync(&config::Config::from_env()).await;
//! }
//! ```

pub mod cli;
pub mod config;
pub mod management;
pub mod sync;
pub mod types;
pub mod utils;
pub mod vk;

/// Prints a status line with a blue `o` marker.
///
/// Takes the same arguments as `println!`.
///
/// # Example
///
/// ```
/// info!("Found {} songs in your collection.", count);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a line with a green `✓` marker for a completed item.
///
/// # Example
///
/// ```
/// success!("{} - {} --> {}", artist, title, path.display());
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a line with a red `!` marker and exits the process with code 1.
///
/// Only for failures that leave nothing sensible to do, such as a rejected
/// authorization or an unreachable catalog. Code after it never runs.
///
/// # Example
///
/// ```
/// error!("Authorization failed: {}", e);
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a line with a yellow `!` marker for a recoverable problem, like a
/// single track that failed to download.
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
