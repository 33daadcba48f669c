use std::{collections::HashMap, fmt, future::Future};

use chrono::Utc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use url::Url;

use crate::{
    config::Config,
    management::{CredentialError, CredentialStore},
    types::Credential,
    warning,
};

#[derive(Debug)]
pub enum AuthError {
    /// The provider answered the redirect with `error`/`error_description`.
    Rejected { error: String, description: String },
    MalformedRedirect(String),
    Cancelled,
    InvalidAuthUrl(url::ParseError),
    IoError(std::io::Error),
    Store(CredentialError),
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::Rejected { error, description } => {
                write!(f, "authorization rejected ({}): {}", error, description)
            }
            AuthError::MalformedRedirect(reason) => {
                write!(f, "malformed redirect URL: {}", reason)
            }
            AuthError::Cancelled => write!(f, "authorization cancelled"),
            AuthError::InvalidAuthUrl(e) => write!(f, "invalid authorization endpoint: {}", e),
            AuthError::IoError(e) => write!(f, "cannot read redirect URL: {}", e),
            AuthError::Store(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for AuthError {}

impl From<CredentialError> for AuthError {
    fn from(err: CredentialError) -> Self {
        AuthError::Store(err)
    }
}

impl From<std::io::Error> for AuthError {
    fn from(err: std::io::Error) -> Self {
        AuthError::IoError(err)
    }
}

/// Source of the URL the provider redirected the user to after the
/// authorization dialog.
pub trait RedirectPrompt {
    fn redirected_url(&self, auth_url: &Url)
    -> impl Future<Output = Result<String, AuthError>> + Send;
}

/// Opens the authorization dialog in the default browser and reads the
/// redirected URL from the terminal. Ctrl-C cancels the wait.
pub struct BrowserPrompt;

impl RedirectPrompt for BrowserPrompt {
    async fn redirected_url(&self, auth_url: &Url) -> Result<String, AuthError> {
        if webbrowser::open(auth_url.as_str()).is_err() {
            warning!(
                "Failed to open browser. Please navigate to the following URL manually:\n{}",
                auth_url
            );
        }

        let mut stdout = tokio::io::stdout();
        stdout.write_all(b"Enter redirected URL: ").await?;
        stdout.flush().await?;

        let mut line = String::new();
        let mut reader = BufReader::new(tokio::io::stdin());
        tokio::select! {
            read = reader.read_line(&mut line) => {
                if read? == 0 {
                    return Err(AuthError::Cancelled);
                }
            }
            _ = tokio::signal::ctrl_c() => return Err(AuthError::Cancelled),
        }

        Ok(line.trim().to_string())
    }
}

/// Drives the implicit-grant flow and caches its outcome.
pub struct Authorizer<'a> {
    config: &'a Config,
    store: CredentialStore,
}

impl<'a> Authorizer<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self {
            config,
            store: CredentialStore::new(config.credentials_path.clone()),
        }
    }

    /// Returns the cached credential unchanged when there is one, otherwise
    /// runs the interactive flow through `prompt` and caches the result.
    ///
    /// No freshness check is done on a cached token. A cache file that is not
    /// valid UTF-8 or cannot be parsed is treated like a missing one and
    /// overwritten.
    ///
    /// # Errors
    ///
    /// - [`AuthError::Rejected`] when the user denied access, carrying the
    ///   provider's description. Nothing is written to the store.
    /// - [`AuthError::MalformedRedirect`] when the pasted URL has no token.
    /// - [`AuthError::Cancelled`] when input was aborted.
    pub async fn authorize<P: RedirectPrompt>(&self, prompt: &P) -> Result<Credential, AuthError> {
        match self.store.load().await {
            Ok(credential) => Ok(credential),
            Err(CredentialError::NotFound) => self.acquire(prompt).await,
            Err(e @ (CredentialError::SerdeError(_) | CredentialError::Corrupt(_))) => {
                warning!("Ignoring unreadable credential cache: {}", e);
                self.acquire(prompt).await
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Always runs the interactive flow and replaces the cached credential.
    pub async fn acquire<P: RedirectPrompt>(&self, prompt: &P) -> Result<Credential, AuthError> {
        let auth_url = self.authorization_url()?;
        let redirected = prompt.redirected_url(&auth_url).await?;
        let credential = parse_redirect_url(&redirected)?;
        self.store.save(&credential).await?;
        Ok(credential)
    }

    pub fn authorization_url(&self) -> Result<Url, AuthError> {
        Url::parse_with_params(
            &self.config.auth_url,
            &[
                ("client_id", self.config.app_id.as_str()),
                ("scope", self.config.app_scope.as_str()),
                ("redirect_uri", self.config.redirect_uri.as_str()),
                ("display", "page"),
                ("response_type", "token"),
            ],
        )
        .map_err(AuthError::InvalidAuthUrl)
    }
}

/// Extracts the credential from the fragment of a redirected URL such as
/// `http://oauth.vk.com/blank.html#access_token=..&expires_in=0&user_id=..`.
///
/// A bare fragment (with or without the leading `#`) is accepted as well.
///
/// # Example
///
/// ```
/// let credential = parse_redirect_url(
///     "http://oauth.vk.com/blank.html#access_token=abc&expires_in=0&user_id=42",
/// )?;
/// assert_eq!(credential.user_id, "42");
/// ```
pub fn parse_redirect_url(redirected: &str) -> Result<Credential, AuthError> {
    let redirected = redirected.trim();
    let fragment = match Url::parse(redirected) {
        Ok(url) => url.fragment().unwrap_or_default().to_string(),
        Err(_) => redirected
            .split_once('#')
            .map_or(redirected, |(_, fragment)| fragment)
            .to_string(),
    };

    let params: HashMap<String, String> = url::form_urlencoded::parse(fragment.as_bytes())
        .into_owned()
        .collect();

    if let Some(error) = params.get("error") {
        return Err(AuthError::Rejected {
            error: error.clone(),
            description: params
                .get("error_description")
                .cloned()
                .unwrap_or_default(),
        });
    }

    let access_token = non_empty(&params, "access_token")?;
    let user_id = non_empty(&params, "user_id")?;
    let expires_in = params
        .get("expires_in")
        .cloned()
        .unwrap_or_else(|| "0".to_string());

    Ok(Credential {
        access_token,
        user_id,
        expires_in,
        obtained_at: Utc::now().timestamp().max(0) as u64,
    })
}

fn non_empty(params: &HashMap<String, String>, key: &str) -> Result<String, AuthError> {
    params
        .get(key)
        .filter(|v| !v.is_empty())
        .cloned()
        .ok_or_else(|| AuthError::MalformedRedirect(format!("missing {}", key)))
}
