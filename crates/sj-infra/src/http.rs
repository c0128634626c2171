//! HTTP client for the account REST API.
//!
//! Every request carries `Authorization: Bearer <token>` when a token is
//! stored; the token is read from the flags store per request so a refresh or
//! sign-in is picked up immediately.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};

use sj_core::ports::{AccountApiPort, ApiError, FlagsStorePort, LoginGrant};
use sj_core::{
    AccessToken, AppConfig, FlagKey, MasterPasswordState, MasterPin, TransactionPage, UserSnapshot,
};

type ApiResult<T> = std::result::Result<T, ApiError>;

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TokenBody {
    token: String,
}

#[derive(Debug, Deserialize)]
struct LoginBody {
    token: String,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MasterPasswordBody {
    #[serde(default)]
    is_set: Option<bool>,
}

pub struct HttpAccountApi {
    client: reqwest::Client,
    base_url: String,
    flags: Arc<dyn FlagsStorePort>,
}

impl HttpAccountApi {
    pub fn new(
        base_url: impl Into<String>,
        timeout: Duration,
        flags: Arc<dyn FlagsStorePort>,
    ) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build HTTP client: {}", e))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            flags,
        })
    }

    pub fn from_config(config: &AppConfig, flags: Arc<dyn FlagsStorePort>) -> anyhow::Result<Self> {
        Self::new(config.api_base_url.clone(), config.api_timeout(), flags)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.flags.get(FlagKey::Token).await {
            Ok(Some(token)) => match AccessToken::from_stored(token) {
                Some(token) => request.bearer_auth(token.expose()),
                None => request,
            },
            Ok(None) => request,
            Err(err) => {
                warn!(error = %err, "token unreadable, sending request without it");
                request
            }
        }
    }

    /// Send and turn every non-success status into an [`ApiError`].
    async fn send(&self, request: RequestBuilder) -> ApiResult<Response> {
        let response = self
            .authorize(request)
            .await
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let status = response.status();
        debug!(status = status.as_u16(), url = %response.url(), "api response");
        if status.is_success() {
            Ok(response)
        } else {
            Err(rejection(status, response).await)
        }
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        let response = self.send(self.client.get(self.url(path))).await?;
        decode(response).await
    }

    async fn post(&self, path: &str, body: serde_json::Value) -> ApiResult<Response> {
        self.send(self.client.post(self.url(path)).json(&body)).await
    }
}

async fn rejection(status: StatusCode, response: Response) -> ApiError {
    if status == StatusCode::UNAUTHORIZED {
        return ApiError::Unauthorized;
    }
    let message = response
        .json::<ErrorBody>()
        .await
        .ok()
        .and_then(|body| body.message);
    ApiError::Rejected {
        status: status.as_u16(),
        message,
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> ApiResult<T> {
    let bytes = response.bytes().await.map_err(map_reqwest_error)?;
    serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode(e.to_string()))
}

fn map_reqwest_error(error: reqwest::Error) -> ApiError {
    if error.is_timeout() {
        ApiError::Timeout
    } else if error.is_decode() {
        ApiError::Decode(error.to_string())
    } else {
        ApiError::Network(error.to_string())
    }
}

#[async_trait]
impl AccountApiPort for HttpAccountApi {
    async fn get_user_details(&self) -> ApiResult<UserSnapshot> {
        self.get("/user/details").await
    }

    async fn is_master_password_set(&self) -> ApiResult<MasterPasswordState> {
        let response = match self.send(self.client.get(self.url("/auth/is-Master-Pass"))).await {
            Ok(response) => response,
            Err(ApiError::Rejected { status, message }) => {
                debug!(status, message = ?message, "master password reported as not set");
                return Ok(MasterPasswordState::NotSet);
            }
            Err(err) => return Err(err),
        };
        let body: MasterPasswordBody = response.json().await.unwrap_or_default();
        Ok(match body.is_set {
            Some(false) => MasterPasswordState::NotSet,
            _ => MasterPasswordState::Set,
        })
    }

    async fn refresh_token(&self) -> ApiResult<AccessToken> {
        let body: TokenBody = self.get("/user/refreshToken").await?;
        AccessToken::from_stored(body.token)
            .ok_or_else(|| ApiError::Decode("refresh returned an empty token".to_string()))
    }

    async fn request_login_otp(&self, email: &str) -> ApiResult<()> {
        self.post("/auth/login", json!({ "email": email })).await?;
        Ok(())
    }

    async fn verify_login_otp(&self, email: &str, otp: &str) -> ApiResult<LoginGrant> {
        let response = self
            .post("/auth/verify-login-otp", json!({ "email": email, "otp": otp }))
            .await?;
        let body: LoginBody = decode(response).await?;
        let token = AccessToken::from_stored(body.token)
            .ok_or_else(|| ApiError::Decode("login returned an empty token".to_string()))?;
        Ok(LoginGrant {
            token,
            message: body.message,
        })
    }

    async fn validate_master_password(&self, pin: &MasterPin) -> ApiResult<()> {
        self.post(
            "/auth/validate-master-password",
            json!({ "masterPass": pin.as_number() }),
        )
        .await?;
        Ok(())
    }

    async fn set_master_password(&self, pin: &MasterPin) -> ApiResult<()> {
        self.post(
            "/auth/set-master-password",
            json!({ "masterPass": pin.as_digits() }),
        )
        .await?;
        Ok(())
    }

    async fn list_transactions(&self, profile_id: &str) -> ApiResult<TransactionPage> {
        let response = self
            .post("/transaction/transactions", json!({ "profileId": profile_id }))
            .await?;
        decode(response).await
    }
}
