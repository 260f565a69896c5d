use super::token::Credential;
use crate::error::{auth_error, Error, MigrateResult};
use reqwest::Client;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tiny_http::{Response, Server};
use tracing::{debug, info, warn};
use url::Url;

pub const DEFAULT_AUTH_URI: &str = "https://accounts.google.com/o/oauth2/v2/auth";
pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// OAuth client registration of this application
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ApplicationSecret {
    pub client_id: String,
    pub client_secret: String,
    #[serde(default = "default_auth_uri")]
    pub auth_uri: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_auth_uri() -> String {
    DEFAULT_AUTH_URI.to_string()
}

pub(crate) fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

/// Client secret file as downloaded from the Google Cloud Console
#[derive(Debug, Deserialize)]
struct ClientSecretFile {
    installed: Option<ApplicationSecret>,
    web: Option<ApplicationSecret>,
}

/// Token endpoint response for both code exchange and refresh
#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    pub access_token: String,
    pub expires_in: Option<i64>,
    pub refresh_token: Option<String>,
    pub scope: Option<String>,
}

/// Parse the contents of a client secret file
pub fn parse_application_secret(content: &str) -> MigrateResult<ApplicationSecret> {
    let file: ClientSecretFile = serde_json::from_str(content)
        .map_err(|e| Error::ClientSecret(format!("Malformed client secret: {}", e)))?;

    file.installed
        .or(file.web)
        .ok_or_else(|| Error::ClientSecret("Expected an 'installed' or 'web' client".to_string()))
}

/// Load the application secret from `path`, falling back to an ID/secret pair
/// from the environment when the file does not exist
pub fn load_application_secret(
    path: &Path,
    client_id: Option<&str>,
    client_secret: Option<&str>,
) -> MigrateResult<ApplicationSecret> {
    match fs::read_to_string(path) {
        Ok(content) => parse_application_secret(&content),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => match (client_id, client_secret) {
            (Some(id), Some(secret)) => {
                debug!("Using OAuth client from environment");
                Ok(ApplicationSecret {
                    client_id: id.to_string(),
                    client_secret: secret.to_string(),
                    auth_uri: default_auth_uri(),
                    token_uri: default_token_uri(),
                })
            }
            _ => Err(Error::ClientSecret(format!(
                "{} not found and GOOGLE_CLIENT_ID/GOOGLE_CLIENT_SECRET are not set",
                path.display()
            ))),
        },
        Err(e) => Err(Error::ClientSecret(format!(
            "Failed to read {}: {}",
            path.display(),
            e
        ))),
    }
}

/// Build the consent page URL
pub fn authorization_url(
    secret: &ApplicationSecret,
    redirect_uri: &str,
    scopes: &[String],
    state: &str,
) -> MigrateResult<Url> {
    let mut url = Url::parse(&secret.auth_uri)
        .map_err(|e| auth_error(&format!("Invalid authorization URI: {}", e)))?;

    url.query_pairs_mut()
        .append_pair("client_id", &secret.client_id)
        .append_pair("redirect_uri", redirect_uri)
        .append_pair("response_type", "code")
        .append_pair("access_type", "offline")
        .append_pair("prompt", "consent")
        .append_pair("scope", &scopes.join(" "))
        .append_pair("state", state);

    Ok(url)
}

/// Whether a request to the callback listener carries an authorization result
pub fn is_callback(request_url: &str) -> bool {
    callback_url(request_url)
        .map(|url| {
            url.query_pairs()
                .any(|(key, _)| key == "code" || key == "error")
        })
        .unwrap_or(false)
}

/// Extract the authorization code from the redirect request
pub fn parse_callback(request_url: &str, expected_state: &str) -> MigrateResult<String> {
    let url = callback_url(request_url)?;

    let mut code = None;
    let mut state = None;
    let mut error = None;
    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "code" => code = Some(value.into_owned()),
            "state" => state = Some(value.into_owned()),
            "error" => error = Some(value.into_owned()),
            _ => {}
        }
    }

    if let Some(error) = error {
        return Err(auth_error(&format!("Authorization was not granted: {}", error)));
    }

    if state.as_deref() != Some(expected_state) {
        return Err(auth_error("Authorization callback state does not match"));
    }

    code.ok_or_else(|| auth_error("No authorization code found in callback"))
}

fn callback_url(request_url: &str) -> MigrateResult<Url> {
    Url::parse("http://127.0.0.1")
        .and_then(|base| base.join(request_url))
        .map_err(|e| auth_error(&format!("Malformed callback URL: {}", e)))
}

/// POST a form to the token endpoint
pub(crate) async fn request_token(
    client: &Client,
    token_uri: &str,
    form: &[(&str, &str)],
) -> Result<TokenResponse, String> {
    let response = client
        .post(token_uri)
        .form(form)
        .send()
        .await
        .map_err(|e| format!("Token request failed: {}", e))?;

    if !response.status().is_success() {
        let status = response.status();
        let error_body = response
            .text()
            .await
            .unwrap_or_else(|_| "Could not read error response".to_string());
        return Err(format!("HTTP {} - {}", status, error_body));
    }

    response
        .json::<TokenResponse>()
        .await
        .map_err(|e| format!("Failed to parse token response: {}", e))
}

/// Run the installed-application flow: consent in the browser, receive the
/// code on a loopback listener, and exchange it for a credential
pub async fn run_installed_flow(
    client: &Client,
    secret: &ApplicationSecret,
    scopes: &[String],
) -> MigrateResult<Credential> {
    let server = Server::http("127.0.0.1:0")
        .map_err(|e| auth_error(&format!("Failed to start callback listener: {}", e)))?;
    let port = server
        .server_addr()
        .to_ip()
        .map(|addr| addr.port())
        .ok_or_else(|| auth_error("Callback listener is not bound to a TCP port"))?;
    let redirect_uri = format!("http://127.0.0.1:{}/", port);

    // Random state ties the callback to this request
    let state = uuid::Uuid::new_v4().to_string();
    let auth_url = authorization_url(secret, &redirect_uri, scopes, &state)?;

    println!("Please visit this URL to authorize this application:\n{}", auth_url);
    if let Err(e) = webbrowser::open(auth_url.as_str()) {
        warn!("Could not open a browser: {}", e);
    }

    info!("Waiting for authorization callback on port {}", port);
    let code = tokio::task::spawn_blocking(move || wait_for_callback(&server, &state))
        .await
        .map_err(|e| auth_error(&format!("Callback listener stopped: {}", e)))??;

    let token = request_token(
        client,
        &secret.token_uri,
        &[
            ("client_id", secret.client_id.as_str()),
            ("client_secret", secret.client_secret.as_str()),
            ("code", code.as_str()),
            ("redirect_uri", redirect_uri.as_str()),
            ("grant_type", "authorization_code"),
        ],
    )
    .await
    .map_err(|e| auth_error(&format!("Failed to exchange authorization code: {}", e)))?;

    info!("Authorization completed");
    Ok(Credential::from_token_response(token, secret, scopes))
}

fn wait_for_callback(server: &Server, state: &str) -> MigrateResult<String> {
    loop {
        let request = server.recv()?;
        let request_url = request.url().to_string();

        // Browsers also ask for things like /favicon.ico
        if !is_callback(&request_url) {
            debug!("Ignoring request to {}", request_url);
            request.respond(Response::from_string("Not found").with_status_code(404))?;
            continue;
        }

        let result = parse_callback(&request_url, state);
        let message = match &result {
            Ok(_) => "Authorization successful! You can close this window.",
            Err(_) => "Authorization failed. Check the terminal for details.",
        };
        request.respond(Response::from_string(message))?;

        return result;
    }
}
