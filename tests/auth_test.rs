use std::sync::atomic::{AtomicUsize, Ordering};

use url::Url;
use vksync::config::Config;
use vksync::management::{CredentialError, CredentialStore};
use vksync::types::Credential;
use vksync::vk::{AuthError, Authorizer, RedirectPrompt, parse_redirect_url};

// Stands in for the browser and terminal, answering with a fixed URL
struct FakePrompt {
    redirected: String,
    calls: AtomicUsize,
}

impl FakePrompt {
    fn new(redirected: &str) -> Self {
        Self {
            redirected: redirected.to_string(),
            calls: AtomicUsize::new(0),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl RedirectPrompt for FakePrompt {
    async fn redirected_url(&self, _auth_url: &Url) -> Result<String, AuthError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.redirected.clone())
    }
}

fn test_config(dir: &tempfile::TempDir) -> Config {
    Config::default().with_credentials_path(dir.path().join(".auth_data"))
}

const GOOD_REDIRECT: &str =
    "http://oauth.vk.com/blank.html#access_token=533bacf01e1165b57531ad114461ae8736d6506a3&expires_in=0&user_id=8492";
const DENIED_REDIRECT: &str = "http://oauth.vk.com/blank.html#error=access_denied&error_description=The+user+or+authorization+server+denied+the+request.";

#[test]
fn test_parse_redirect_url() {
    let credential = parse_redirect_url(GOOD_REDIRECT).unwrap();
    assert_eq!(
        credential.access_token,
        "533bacf01e1165b57531ad114461ae8736d6506a3"
    );
    assert_eq!(credential.user_id, "8492");
    assert_eq!(credential.expires_in, "0");
    assert!(credential.obtained_at > 0);

    // bare fragments are accepted too
    let credential = parse_redirect_url("#access_token=t&user_id=1&expires_in=86400").unwrap();
    assert_eq!(credential.access_token, "t");
    assert_eq!(credential.expires_in, "86400");
}

#[test]
fn test_parse_redirect_url_error_fragment() {
    match parse_redirect_url(DENIED_REDIRECT) {
        Err(AuthError::Rejected { error, description }) => {
            assert_eq!(error, "access_denied");
            assert_eq!(
                description,
                "The user or authorization server denied the request."
            );
        }
        other => panic!("expected rejection, got {:?}", other),
    }

    let message = parse_redirect_url(DENIED_REDIRECT).unwrap_err().to_string();
    assert!(message.contains("denied the request"));
}

#[test]
fn test_parse_redirect_url_malformed() {
    assert!(matches!(
        parse_redirect_url("http://oauth.vk.com/blank.html"),
        Err(AuthError::MalformedRedirect(_))
    ));
    assert!(matches!(
        parse_redirect_url("http://oauth.vk.com/blank.html#user_id=1"),
        Err(AuthError::MalformedRedirect(_))
    ));
    assert!(matches!(
        parse_redirect_url(""),
        Err(AuthError::MalformedRedirect(_))
    ));
}

#[test]
fn test_authorization_url() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(&dir);
    let url = Authorizer::new(&config).authorization_url().unwrap();

    assert_eq!(url.host_str(), Some("oauth.vk.com"));
    assert_eq!(url.path(), "/authorize");
    let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
    assert!(pairs.contains(&("client_id".to_string(), "3889070".to_string())));
    assert!(pairs.contains(&("scope".to_string(), "audio,offline".to_string())));
    assert!(pairs.contains(&("response_type".to_string(), "token".to_string())));
    assert!(pairs.contains(&(
        "redirect_uri".to_string(),
        "http://oauth.vk.com/blank.html".to_string()
    )));
}

#[tokio::test]
async fn test_authorize_saves_new_credential() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(&dir);
    let prompt = FakePrompt::new(GOOD_REDIRECT);

    let credential = Authorizer::new(&config).authorize(&prompt).await.unwrap();
    assert_eq!(credential.user_id, "8492");
    assert_eq!(prompt.calls(), 1);

    let stored = CredentialStore::new(&config.credentials_path)
        .load()
        .await
        .unwrap();
    assert_eq!(stored, credential);
}

#[tokio::test]
async fn test_authorize_returns_cached_credential_unchanged() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(&dir);
    let cached = Credential {
        access_token: "cached".to_string(),
        user_id: "1".to_string(),
        expires_in: "86400".to_string(),
        obtained_at: 1,
    };
    CredentialStore::new(&config.credentials_path)
        .save(&cached)
        .await
        .unwrap();

    let prompt = FakePrompt::new(GOOD_REDIRECT);
    let credential = Authorizer::new(&config).authorize(&prompt).await.unwrap();

    assert_eq!(credential, cached);
    assert_eq!(prompt.calls(), 0);
}

#[tokio::test]
async fn test_authorize_rejected_does_not_write_store() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(&dir);
    let prompt = FakePrompt::new(DENIED_REDIRECT);

    let result = Authorizer::new(&config).authorize(&prompt).await;

    match result {
        Err(AuthError::Rejected { description, .. }) => {
            assert!(description.contains("denied the request"))
        }
        other => panic!("expected rejection, got {:?}", other),
    }
    assert!(!config.credentials_path.exists());
    assert!(matches!(
        CredentialStore::new(&config.credentials_path).load().await,
        Err(CredentialError::NotFound)
    ));
}

#[tokio::test]
async fn test_authorize_replaces_corrupt_cache() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(&dir);
    std::fs::write(&config.credentials_path, "not json").unwrap();

    let prompt = FakePrompt::new(GOOD_REDIRECT);
    let credential = Authorizer::new(&config).authorize(&prompt).await.unwrap();

    assert_eq!(prompt.calls(), 1);
    let stored = CredentialStore::new(&config.credentials_path)
        .load()
        .await
        .unwrap();
    assert_eq!(stored, credential);
}

#[tokio::test]
async fn test_authorize_replaces_binary_cache() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(&dir);
    std::fs::write(
        &config.credentials_path,
        [0x13, 0x57, 0x9a, 0xce, 0xff, 0xfe, 0x00],
    )
    .unwrap();

    let prompt = FakePrompt::new(GOOD_REDIRECT);
    let credential = Authorizer::new(&config).authorize(&prompt).await.unwrap();

    assert_eq!(credential.user_id, "8492");
    assert_eq!(prompt.calls(), 1);
    let stored = CredentialStore::new(&config.credentials_path)
        .load()
        .await
        .unwrap();
    assert_eq!(stored, credential);
}
