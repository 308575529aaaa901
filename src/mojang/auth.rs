use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::error::AuthError;
use crate::logger::Logger;

const AUTH_SERVER_URL: &str = "https://authserver.mojang.com";
const AUTHENTICATE_ENDPOINT: &str = "/authenticate";
const VALIDATE_ENDPOINT: &str = "/validate";
const INVALIDATE_ENDPOINT: &str = "/invalidate";
const REFRESH_ENDPOINT: &str = "/refresh";
const SIGNOUT_ENDPOINT: &str = "/signout";

/// A client for the Mojang account authentication API.
///
/// Each operation builds one JSON request, sends it to the authentication
/// server and reports the outcome twice: the response payload or error is
/// written through the bound [`Logger`], and the same outcome is returned
/// to the caller. Calls are independent of each other and share nothing
/// but the underlying connection pool.
pub struct AuthClient {
    http: reqwest::Client,
    base_url: String,
    logger: Logger,
}

impl AuthClient {
    /// Returns a client for the Mojang authentication server.
    ///
    /// # Arguments
    ///
    /// * `logger` logger that every request outcome is written to.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use mojang_auth::{AuthClient, Logger};
    ///
    /// let client = AuthClient::new(Logger::new("[Mojang]", "\x1b[31m"));
    /// ```
    pub fn new(logger: Logger) -> Self {
        Self::with_base_url(AUTH_SERVER_URL, logger)
    }

    /// Returns a client that talks to `base_url` instead of the Mojang
    /// authentication server.
    pub fn with_base_url(base_url: &str, logger: Logger) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.to_string(),
            logger,
        }
    }

    /// Get the status of the authentication service.
    ///
    /// Logs the HTTP status code of the response and returns it. A request
    /// that never reaches the server is logged and returned as an error.
    pub async fn status(&self) -> Result<reqwest::StatusCode, AuthError> {
        debug!("[Mojang] GET {}", self.base_url);
        match self.http.get(&self.base_url).send().await {
            Ok(response) => {
                let status = response.status();
                self.logger
                    .log(format!("Api status responded with code {}", status.as_u16()));
                Ok(status)
            }
            Err(err) => {
                self.logger.error(&err);
                Err(AuthError::Request(err))
            }
        }
    }

    /// Authenticate a user with their credentials.
    ///
    /// A fresh client token is generated for the request and the default
    /// agent is sent; use [`AuthClient::authenticate_with`] to control
    /// either.
    ///
    /// # Arguments
    ///
    /// * `username` username of the account to sign in to, for a Mojang account this is an email address.
    /// * `password` password of the account.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use mojang_auth::{AuthClient, Logger};
    ///
    /// #[tokio::main]
    /// async fn main() {
    ///     let client = AuthClient::new(Logger::new("[Mojang]", ""));
    ///     if let Ok(payload) = client.authenticate("example@example.com", "super_secret").await {
    ///         println!("signed in: {}", payload);
    ///     }
    /// }
    /// ```
    pub async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Value, AuthError> {
        self.authenticate_with(username, password, None, true, Agent::default())
            .await
    }

    /// Authenticate a user with their credentials and explicit request
    /// options.
    ///
    /// # Arguments
    ///
    /// * `username` username of the account to sign in to.
    /// * `password` password of the account.
    /// * `client_token` launcher token to bind the session to, a fresh one is generated when `None`.
    /// * `request_user` whether the response should carry the user object.
    /// * `agent` application identity sent to the server.
    pub async fn authenticate_with(
        &self,
        username: &str,
        password: &str,
        client_token: Option<&str>,
        request_user: bool,
        agent: Agent,
    ) -> Result<Value, AuthError> {
        let payload = authenticate_payload(username, password, client_token, request_user, agent);
        self.post(AUTHENTICATE_ENDPOINT, &payload).await
    }

    /// Asks Mojang if an access token is valid, should be run before every
    /// launch.
    ///
    /// # Arguments
    ///
    /// * `access_token` token to check.
    /// * `client_token` launcher token the access token was created with, omitted from the request when `None`.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use futures::executor::block_on;
    /// use mojang_auth::{AuthClient, Logger};
    ///
    /// let client = AuthClient::new(Logger::new("[Mojang]", ""));
    ///
    /// let valid = block_on(client.validate("access_token_here", None)).is_ok();
    /// ```
    pub async fn validate(
        &self,
        access_token: &str,
        client_token: Option<&str>,
    ) -> Result<Value, AuthError> {
        let payload = ValidatePayload {
            accessToken: access_token.to_string(),
            clientToken: client_token.map(str::to_string),
        };
        self.post(VALIDATE_ENDPOINT, &payload).await
    }

    /// Asks Mojang to invalidate an access token.
    ///
    /// # Arguments
    ///
    /// * `access_token` token to invalidate.
    /// * `client_token` launcher token, must match the one used to create `access_token`.
    pub async fn invalidate(
        &self,
        access_token: &str,
        client_token: &str,
    ) -> Result<Value, AuthError> {
        let payload = ClientAccessTokenPayload {
            accessToken: access_token.to_string(),
            clientToken: client_token.to_string(),
        };
        self.post(INVALIDATE_ENDPOINT, &payload).await
    }

    /// Asks Mojang for a new access token based on the current access token
    /// and client token, keeping a user logged in without asking for their
    /// credentials again.
    ///
    /// The user object is requested with the response; use
    /// [`AuthClient::refresh_with`] to leave it out.
    ///
    /// # Arguments
    ///
    /// * `access_token` recent, possibly expired token to trade in.
    /// * `client_token` launcher token the access token was created with.
    pub async fn refresh(
        &self,
        access_token: &str,
        client_token: &str,
    ) -> Result<Value, AuthError> {
        self.refresh_with(access_token, client_token, true).await
    }

    /// Asks Mojang for a new access token, controlling whether the response
    /// carries the user object.
    pub async fn refresh_with(
        &self,
        access_token: &str,
        client_token: &str,
        request_user: bool,
    ) -> Result<Value, AuthError> {
        let payload = RefreshRequest {
            accessToken: access_token.to_string(),
            clientToken: client_token.to_string(),
            requestUser: request_user,
        };
        self.post(REFRESH_ENDPOINT, &payload).await
    }

    /// Asks Mojang to invalidate every access token that has been given to
    /// the account.
    ///
    /// # Arguments
    ///
    /// * `username` username of the account, for a Mojang account this is an email address.
    /// * `password` password of the account.
    pub async fn signout(&self, username: &str, password: &str) -> Result<Value, AuthError> {
        let payload = SignoutPayload {
            username: username.to_string(),
            password: password.to_string(),
        };
        self.post(SIGNOUT_ENDPOINT, &payload).await
    }

    /// Serialize `payload`, post it to `endpoint` and route the outcome to
    /// the bound logger before handing it to the caller.
    async fn post<T: Serialize>(&self, endpoint: &str, payload: &T) -> Result<Value, AuthError> {
        let outcome = self.exchange(endpoint, payload).await;
        match &outcome {
            Ok(response) => self.logger.log(response),
            Err(err) => self.logger.error(err),
        }
        outcome
    }

    async fn exchange<T: Serialize>(
        &self,
        endpoint: &str,
        payload: &T,
    ) -> Result<Value, AuthError> {
        let json = serde_json::to_string(payload)?;
        let url = format!("{}{}", self.base_url, endpoint);
        debug!("[Mojang] POST {}", url);
        let response = super::http_post_json(&self.http, &url, json).await?;
        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(AuthError::Api { status, body: text });
        }
        // Validate and invalidate answer 204 No Content on success.
        if text.is_empty() {
            Ok(Value::Null)
        } else {
            Ok(serde_json::from_str(&text)?)
        }
    }
}

/// Application identity sent with an authenticate request.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Agent {
    pub name: String,
    pub version: i8,
}

impl Default for Agent {
    fn default() -> Self {
        Self {
            name: "Minecraft".to_string(),
            version: 1,
        }
    }
}

fn authenticate_payload(
    username: &str,
    password: &str,
    client_token: Option<&str>,
    request_user: bool,
    agent: Agent,
) -> AuthenticateRequest {
    AuthenticateRequest {
        agent,
        username: username.to_string(),
        password: password.to_string(),
        requestUser: request_user,
        clientToken: client_token
            .map(str::to_string)
            .unwrap_or_else(|| Uuid::new_v4().to_string()),
    }
}

#[allow(non_snake_case)]
#[derive(Serialize, Deserialize, Clone)]
struct AuthenticateRequest {
    agent: Agent,
    username: String,
    password: String,
    requestUser: bool,
    clientToken: String,
}

#[allow(non_snake_case)]
#[derive(Serialize, Deserialize, Clone)]
struct ValidatePayload {
    accessToken: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    clientToken: Option<String>,
}

#[allow(non_snake_case)]
#[derive(Serialize, Deserialize, Clone)]
struct ClientAccessTokenPayload {
    accessToken: String,
    clientToken: String,
}

#[allow(non_snake_case)]
#[derive(Serialize, Deserialize, Clone)]
struct RefreshRequest {
    accessToken: String,
    clientToken: String,
    requestUser: bool,
}

#[allow(non_snake_case)]
#[derive(Serialize, Deserialize, Clone)]
struct SignoutPayload {
    username: String,
    password: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn object_keys(value: &Value) -> Vec<String> {
        let mut keys: Vec<String> = value
            .as_object()
            .expect("payload is a json object")
            .keys()
            .cloned()
            .collect();
        keys.sort();
        keys
    }

    #[test]
    fn authenticate_payload_defaults() {
        let payload = authenticate_payload("a@b.com", "pw", None, true, Agent::default());
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["agent"]["name"], "Minecraft");
        assert_eq!(value["agent"]["version"], 1);
        assert_eq!(value["username"], "a@b.com");
        assert_eq!(value["password"], "pw");
        assert_eq!(value["requestUser"], true);
        assert!(Uuid::parse_str(value["clientToken"].as_str().unwrap()).is_ok());
    }

    #[test]
    fn authenticate_payload_field_set() {
        let payload = authenticate_payload("a@b.com", "pw", None, true, Agent::default());
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(
            object_keys(&value),
            vec!["agent", "clientToken", "password", "requestUser", "username"]
        );
    }

    #[test]
    fn generated_client_tokens_are_unique() {
        let first = authenticate_payload("a@b.com", "pw", None, true, Agent::default());
        let second = authenticate_payload("a@b.com", "pw", None, true, Agent::default());
        assert_ne!(first.clientToken, second.clientToken);
    }

    #[test]
    fn explicit_client_token_is_kept() {
        let payload =
            authenticate_payload("a@b.com", "pw", Some("launcher-token"), true, Agent::default());
        assert_eq!(payload.clientToken, "launcher-token");
    }

    #[test]
    fn validate_payload_omits_missing_client_token() {
        let payload = ValidatePayload {
            accessToken: "tok".to_string(),
            clientToken: None,
        };
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(object_keys(&value), vec!["accessToken"]);
    }

    #[test]
    fn validate_payload_keeps_client_token() {
        let payload = ValidatePayload {
            accessToken: "tok".to_string(),
            clientToken: Some("launcher".to_string()),
        };
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(object_keys(&value), vec!["accessToken", "clientToken"]);
        assert_eq!(value["clientToken"], "launcher");
    }

    #[test]
    fn invalidate_payload_field_set() {
        let payload = ClientAccessTokenPayload {
            accessToken: "tok".to_string(),
            clientToken: "launcher".to_string(),
        };
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(object_keys(&value), vec!["accessToken", "clientToken"]);
    }

    #[test]
    fn refresh_payload_field_set() {
        let payload = RefreshRequest {
            accessToken: "tok".to_string(),
            clientToken: "launcher".to_string(),
            requestUser: true,
        };
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(
            object_keys(&value),
            vec!["accessToken", "clientToken", "requestUser"]
        );
    }
}
