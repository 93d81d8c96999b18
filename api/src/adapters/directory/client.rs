//! User directory HTTP client implementation

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use urlencoding::encode;

use crate::domain::entities::User;
use crate::domain::ports::UserDirectory;
use crate::error::DirectoryError;

/// Implementation of the user directory client
pub struct HttpUserDirectory {
    http: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpUserDirectory {
    pub fn new(base_url: String, token: Option<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        }
    }

    fn user_url(&self, identifier: &str) -> String {
        format!("{}/users/{}", self.base_url, encode(identifier))
    }
}

#[async_trait]
impl UserDirectory for HttpUserDirectory {
    async fn resolve_user(&self, identifier: &str) -> Result<Option<User>, DirectoryError> {
        let mut request = self.http.get(self.user_url(identifier));
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        let response = request.send().await?;

        match response.status() {
            status if status.is_success() => response
                .json::<User>()
                .await
                .map(Some)
                .map_err(|e| DirectoryError::Deserialization(e.to_string())),
            StatusCode::NOT_FOUND => Ok(None),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(DirectoryError::Unauthorized),
            status => {
                let message = response.text().await.unwrap_or_default();
                Err(DirectoryError::Api {
                    status: status.as_u16(),
                    message,
                })
            }
        }
    }
}
