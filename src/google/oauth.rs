use oauth2::{
    basic::{
        BasicClient, BasicErrorResponse, BasicRevocationErrorResponse,
        BasicTokenIntrospectionResponse, BasicTokenResponse,
    },
    AuthUrl, AuthorizationCode, ClientId, ClientSecret, CsrfToken, EndpointNotSet, EndpointSet,
    PkceCodeChallenge, RedirectUrl, Scope, StandardRevocableToken, TokenResponse, TokenUrl,
};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader as AsyncBufReader};
use tracing::{info, warn};

const AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const TOKEN_URL: &str = "https://www.googleapis.com/oauth2/v3/token";

#[derive(Debug, thiserror::Error)]
pub enum OAuthError {
    #[error("Invalid OAuth endpoint url: {0}")]
    InvalidUrl(#[from] oauth2::url::ParseError),

    #[error("The authorization redirect did not carry a request path")]
    MalformedRedirect,

    #[error("The authorization redirect did not carry a code")]
    MissingCode,

    #[error("Authorization was denied: {0}")]
    Denied(String),

    #[error("The authorization redirect state does not match the request")]
    StateMismatch,
}

pub struct OAuth2Client {
    client: oauth2::Client<
        BasicErrorResponse,
        BasicTokenResponse,
        BasicTokenIntrospectionResponse,
        StandardRevocableToken,
        BasicRevocationErrorResponse,
        EndpointSet,    // Auth URL
        EndpointNotSet, // Device auth
        EndpointNotSet, // Introspection
        EndpointNotSet, // Revocation
        EndpointSet,    // Token URL
    >,
    redirect_url: String,
    scopes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_at: Option<i64>,
}

fn unix_now() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::SystemTime::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64
}

impl Token {
    pub fn from_token_response(response: &BasicTokenResponse) -> Self {
        let expires_at = response
            .expires_in()
            .map(|duration| unix_now() + duration.as_secs() as i64);

        Token {
            access_token: response.access_token().secret().clone(),
            refresh_token: response.refresh_token().map(|r| r.secret().clone()),
            expires_at,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|exp| exp <= unix_now())
    }

    /// Reads a cached token. A missing or unparsable file yields `None` so the
    /// caller falls back to the authorization flow.
    pub fn load(path: &Path) -> anyhow::Result<Option<Token>> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        match serde_json::from_str(&content) {
            Ok(token) => Ok(Some(token)),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "ignoring unreadable OAuth token cache");
                Ok(None)
            }
        }
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let text = serde_json::to_string_pretty(self)?;
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        fs::write(path, text)?;
        info!(path = %path.display(), "saved OAuth token");
        Ok(())
    }
}

impl OAuth2Client {
    pub fn new(
        client_id: &str,
        client_secret: &str,
        redirect_url: &str,
        scopes: &[String],
    ) -> Result<Self, OAuthError> {
        let client = BasicClient::new(ClientId::new(client_id.to_string()))
            .set_client_secret(ClientSecret::new(client_secret.to_string()))
            .set_auth_uri(AuthUrl::new(AUTH_URL.to_string())?)
            .set_token_uri(TokenUrl::new(TOKEN_URL.to_string())?)
            .set_redirect_uri(RedirectUrl::new(redirect_url.to_string())?);

        Ok(Self {
            client,
            redirect_url: redirect_url.to_string(),
            scopes: scopes.to_vec(),
        })
    }

    /// Runs the authorization-code flow with PKCE, catching the redirect on a
    /// local listener bound to the redirect url's host and port.
    pub async fn oauth_flow(&self) -> anyhow::Result<Token> {
        let http_client = reqwest::Client::new();

        let (pkce_code_challenge, pkce_code_verifier) = PkceCodeChallenge::new_random_sha256();

        let (authorize_url, csrf_state) = self
            .client
            .authorize_url(CsrfToken::new_random)
            .add_scopes(self.scopes.iter().cloned().map(Scope::new))
            .add_extra_param("access_type", "offline")
            .set_pkce_challenge(pkce_code_challenge)
            .url();

        let redirect_url_host = self
            .redirect_url
            .strip_prefix("http://")
            .unwrap_or(&self.redirect_url)
            .trim_end_matches('/');

        let listener = tokio::net::TcpListener::bind(redirect_url_host).await?;

        eprintln!(
            "Open the following link in your browser to authorize access:\n{}",
            authorize_url
        );
        if let Err(e) = webbrowser::open(authorize_url.as_ref()) {
            warn!(error = %e, "could not open a browser");
        }

        let (mut stream, _) = listener.accept().await?;

        let mut reader = AsyncBufReader::new(&mut stream);
        let mut redirect_request_line = String::new();

        reader.read_line(&mut redirect_request_line).await?;

        let code = parse_redirect(&redirect_request_line, csrf_state.secret())?;

        let message = "Go back to your terminal :)";
        let response = format!(
            "HTTP/1.1 200 OK\r\ncontent-length: {}\r\n\r\n{}",
            message.len(),
            message
        );
        stream.write_all(response.as_bytes()).await?;

        let token_response = self
            .client
            .exchange_code(code)
            .set_pkce_verifier(pkce_code_verifier)
            .request_async(&http_client)
            .await?;

        Ok(Token::from_token_response(&token_response))
    }

    pub async fn refresh_token(&self, refresh_token: String) -> anyhow::Result<Token> {
        let refresh_token = oauth2::RefreshToken::new(refresh_token);
        let http_client = reqwest::Client::new();
        let token_response = self
            .client
            .exchange_refresh_token(&refresh_token)
            .request_async(&http_client)
            .await?;

        let mut token = Token::from_token_response(&token_response);
        // Google omits the refresh token on refresh responses
        if token.refresh_token.is_none() {
            token.refresh_token = Some(refresh_token.secret().clone());
        }
        Ok(token)
    }
}

/// Extracts the authorization code from the redirect's request line, e.g.
/// `GET /?state=...&code=... HTTP/1.1`.
fn parse_redirect(request_line: &str, expected_state: &str) -> Result<AuthorizationCode, OAuthError> {
    let path = request_line
        .split_whitespace()
        .nth(1)
        .ok_or(OAuthError::MalformedRedirect)?;
    let url = Url::parse(&format!("http://localhost{}", path))
        .map_err(|_| OAuthError::MalformedRedirect)?;

    let param = |name: &str| {
        url.query_pairs()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.into_owned())
    };

    if let Some(error) = param("error") {
        return Err(OAuthError::Denied(error));
    }
    if param("state").as_deref() != Some(expected_state) {
        return Err(OAuthError::StateMismatch);
    }

    param("code")
        .map(AuthorizationCode::new)
        .ok_or(OAuthError::MissingCode)
}
