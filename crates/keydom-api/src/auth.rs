// Login exchange
//
// `POST /authentication/login` with `{username, passwordHash}`; the token
// comes back nested as `data.token` and is stored on the session. The
// server expects the password as a bare MD5 digest, which is kept in
// `legacy_password_hash` and used for nothing else.

use md5::{Digest, Md5};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::Error;
use crate::session::AuthSession;

const LOGIN_PATH: &str = "/authentication/login";

/// Username and password for the login exchange. Never persisted.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: SecretString,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: SecretString) -> Self {
        Self {
            username: username.into(),
            password,
        }
    }
}

/// Uppercase hex MD5 of the plaintext password.
///
/// This is the credential format the login endpoint accepts. It is unsalted
/// and cryptographically broken; do not use it for anything but building
/// the login request.
pub fn legacy_password_hash(password: &SecretString) -> String {
    let digest = Md5::digest(password.expose_secret().as_bytes());
    format!("{digest:X}")
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LoginRequest<'a> {
    username: &'a str,
    password_hash: String,
}

#[derive(Deserialize)]
struct LoginResponse {
    data: Option<LoginData>,
}

#[derive(Deserialize)]
struct LoginData {
    token: Option<String>,
}

impl AuthSession {
    /// Log in and store the returned token.
    ///
    /// On failure the stored token is left as it was.
    pub async fn login(
        &self,
        username: &str,
        password: &SecretString,
    ) -> Result<SecretString, Error> {
        let url = self.url(LOGIN_PATH)?;
        debug!("logging in at {url}");

        let body = LoginRequest {
            username,
            password_hash: legacy_password_hash(password),
        };

        let resp = self.http().post(url).json(&body).send().await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let preview: String = body.chars().take(200).collect();
            // 401/403 refuse the credentials; other statuses are server failures.
            if matches!(status.as_u16(), 401 | 403) {
                return Err(Error::Authentication {
                    message: format!("login failed (HTTP {status}): {preview}"),
                });
            }
            return Err(Error::Http {
                status: status.as_u16(),
                body: preview,
            });
        }

        let raw = resp.text().await?;
        let parsed: LoginResponse =
            serde_json::from_str(&raw).map_err(|e| Error::deserialization(&e, &raw))?;

        let token = parsed
            .data
            .and_then(|data| data.token)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| Error::Authentication {
                message: "login response did not contain data.token".into(),
            })?;

        let token = SecretString::from(token);
        self.set_token(token.clone());

        debug!("login successful");
        Ok(token)
    }

    /// Log in with a [`Credentials`] pair.
    pub async fn login_with(&self, credentials: &Credentials) -> Result<SecretString, Error> {
        self.login(&credentials.username, &credentials.password)
            .await
    }

    /// Log in, returning the token or `None`.
    ///
    /// Same exchange as [`login`](Self::login) with the failure cause
    /// dropped after being logged.
    pub async fn authenticate(&self, username: &str, password: &SecretString) -> Option<SecretString> {
        match self.login(username, password).await {
            Ok(token) => Some(token),
            Err(e) => {
                warn!(error = %e, "authentication failed");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secret(s: &str) -> SecretString {
        SecretString::from(s.to_owned())
    }

    #[test]
    fn password_hash_is_uppercase_md5_hex() {
        assert_eq!(
            legacy_password_hash(&secret("password")),
            "5F4DCC3B5AA765D61D8327DEB882CF99"
        );
        assert_eq!(
            legacy_password_hash(&secret("")),
            "D41D8CD98F00B204E9800998ECF8427E"
        );
    }

    #[test]
    fn login_body_uses_camel_case() {
        let body = LoginRequest {
            username: "operator",
            password_hash: legacy_password_hash(&secret("password")),
        };
        let value = serde_json::to_value(&body).expect("serialize");
        assert_eq!(
            value,
            serde_json::json!({
                "username": "operator",
                "passwordHash": "5F4DCC3B5AA765D61D8327DEB882CF99",
            })
        );
    }

    #[test]
    fn credentials_debug_redacts_password() {
        let creds = Credentials::new("operator", secret("hunter2"));
        let dbg = format!("{creds:?}");
        assert!(!dbg.contains("hunter2"), "{dbg}");
    }
}
