//! # VK Integration Module
//!
//! Talks to the social network on behalf of the user:
//!
//! - [`auth`] - implicit-grant authorization. The user approves access in the
//!   browser, then pastes the redirected URL back into the terminal; the token
//!   is read from its fragment and cached through
//!   [`crate::management::CredentialStore`].
//! - [`catalog`] - one `audio.get` request returning the user's track list.
//!
//! ```text
//! CLI
//!  ├── Authorizer ── CredentialStore (.auth_data)
//!  └── CatalogClient ── GET {api}/method/audio.get.json?uid=..&access_token=..
//! ```
//!
//! Neither component retries. Failures are returned as [`auth::AuthError`] and
//! [`catalog::CatalogError`] and end the run before any file is touched.

pub mod auth;
pub mod catalog;

pub use auth::{AuthError, Authorizer, BrowserPrompt, RedirectPrompt, parse_redirect_url};
pub use catalog::{CatalogClient, CatalogError, parse_catalog};
