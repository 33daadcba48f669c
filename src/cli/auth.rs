use crate::{
    config::Config,
    error, success,
    vk::{Authorizer, BrowserPrompt},
};

pub async fn auth(config: &Config) {
    let authorizer = Authorizer::new(config);
    match authorizer.acquire(&BrowserPrompt).await {
        Ok(credential) => success!(
            "Authorized user {}. Credential saved to {}.",
            credential.user_id,
            config.credentials_path.display()
        ),
        Err(e) => error!("Authorization failed: {}", e),
    }
}
