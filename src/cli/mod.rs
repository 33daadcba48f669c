//! # CLI Module
//!
//! User-facing commands. Each one takes the resolved [`crate::config::Config`],
//! wires the components together and reports progress and failures with the
//! crate's output macros.
//!
//! - [`auth`] - run the authorization dialog and cache the credential
//! - [`sync`] - authorize (cached credential first), fetch the catalog, scan
//!   the output directory, then delete, download and tag
//!
//! Fatal errors (authorization, catalog, unreadable output directory) end the
//! process through [`crate::error!`]. Per-track failures are listed in the
//! final summary and do not change the exit code.

mod auth;
mod sync;

pub use auth::auth;
pub use sync::sync;
