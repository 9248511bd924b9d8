//! Google sign-in and the per-run session
//!
//! The access token is obtained through the OAuth implicit grant with a
//! loopback redirect. Google returns the token in the URL fragment, which the
//! browser never sends to a server, so the landing page relays the fragment
//! back to `/token` as a query string.

use std::fmt;

use anyhow::{Result, anyhow, bail};
use reqwest::Url;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};

use crate::config::Config;

const AUTHORIZE_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const SCOPES: &str = "openid email profile";

const RELAY_PAGE: &str = r#"<!doctype html>
<html>
<head><title>Signing in...</title></head>
<body><script>
window.location.replace("/token?" + window.location.hash.substring(1));
</script></body>
</html>
"#;

const SUCCESS_PAGE: &str = r#"<!doctype html>
<html>
<head><title>Success</title></head>
<body><h1>Authentication Successful!</h1><p>You can return to the terminal.</p><script>window.close();</script></body>
</html>
"#;

const FAILURE_PAGE: &str = r#"<!doctype html>
<html>
<head><title>Sign-in failed</title></head>
<body><h1>Sign-in failed</h1><p>Check the terminal for details.</p></body>
</html>
"#;

/// Bearer token for the current run; never persisted
#[derive(Clone)]
pub struct Session {
    access_token: String,
}

impl Session {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
        }
    }

    pub fn access_token(&self) -> &str {
        &self.access_token
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("access_token", &"<redacted>")
            .finish()
    }
}

fn redirect_uri(port: u16) -> String {
    format!("http://127.0.0.1:{port}/")
}

pub fn authorization_url(config: &Config) -> Result<Url> {
    Ok(Url::parse_with_params(
        AUTHORIZE_URL,
        &[
            ("client_id", config.client_id.as_str()),
            ("redirect_uri", redirect_uri(config.redirect_port).as_str()),
            ("response_type", "token"),
            ("scope", SCOPES),
            ("include_granted_scopes", "true"),
            ("prompt", "select_account"),
        ],
    )?)
}

/// Outcome of one loopback request
#[derive(Debug, PartialEq, Eq)]
enum Callback {
    /// Landing page hit; the fragment still needs relaying
    Relay,
    Token(String),
    Denied(String),
    Ignored,
}

fn parse_callback(path: &str) -> Callback {
    let Ok(url) = Url::parse(&format!("http://127.0.0.1{path}")) else {
        return Callback::Ignored;
    };

    match url.path() {
        "/" => Callback::Relay,
        "/token" => {
            let mut token = None;
            let mut error = None;
            for (key, value) in url.query_pairs() {
                match key.as_ref() {
                    "access_token" => token = Some(value.into_owned()),
                    "error" => error = Some(value.into_owned()),
                    _ => {}
                }
            }
            match (token, error) {
                (_, Some(error)) => Callback::Denied(error),
                (Some(token), None) if !token.is_empty() => Callback::Token(token),
                _ => Callback::Denied("no access token in redirect".to_string()),
            }
        }
        _ => Callback::Ignored,
    }
}

async fn respond(stream: &mut TcpStream, status: &str, body: &str) -> Result<()> {
    let response = format!(
        "HTTP/1.1 {status}\r\nContent-Type: text/html; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );
    stream.write_all(response.as_bytes()).await?;
    stream.shutdown().await.ok();
    Ok(())
}

async fn read_request_path(stream: &mut TcpStream) -> Result<String> {
    let mut reader = BufReader::new(stream);
    let mut request_line = String::new();
    reader.read_line(&mut request_line).await?;

    // Drain headers so the browser sees a clean response
    loop {
        let mut line = String::new();
        let n = reader.read_line(&mut line).await?;
        if n == 0 || line == "\r\n" || line == "\n" {
            break;
        }
    }

    request_line
        .split_whitespace()
        .nth(1)
        .map(str::to_string)
        .ok_or_else(|| anyhow!("malformed request line '{}'", request_line.trim()))
}

async fn wait_for_token(listener: TcpListener) -> Result<String> {
    loop {
        let (mut stream, peer) = listener.accept().await?;
        let path = match read_request_path(&mut stream).await {
            Ok(path) => path,
            Err(e) => {
                tracing::debug!(%peer, error = %e, "Ignoring unreadable loopback request");
                continue;
            }
        };

        match parse_callback(&path) {
            Callback::Relay => respond(&mut stream, "200 OK", RELAY_PAGE).await?,
            Callback::Token(token) => {
                respond(&mut stream, "200 OK", SUCCESS_PAGE).await?;
                return Ok(token);
            }
            Callback::Denied(reason) => {
                respond(&mut stream, "200 OK", FAILURE_PAGE).await?;
                bail!("Sign-in was not completed: {reason}");
            }
            Callback::Ignored => respond(&mut stream, "404 Not Found", "").await?,
        }
    }
}

async fn perform_browser_auth(config: &Config) -> Result<String> {
    tracing::info!("Starting browser-based OAuth flow");

    let listener = TcpListener::bind(("127.0.0.1", config.redirect_port)).await?;
    let url = authorization_url(config)?;

    if let Err(e) = webbrowser::open(url.as_str()) {
        tracing::warn!(error = %e, "Could not open a browser");
    }
    println!("Sign in with your school Google account to continue.");
    println!("If no browser opened, visit:\n\n  {url}\n");

    let token = wait_for_token(listener).await?;
    tracing::info!("Browser authentication completed successfully");
    Ok(token)
}

pub async fn perform_oauth_flow(config: &Config) -> Result<Session> {
    if let Some(token) = &config.access_token {
        tracing::info!("Using access token from configuration");
        return Ok(Session::new(token.clone()));
    }

    let token = perform_browser_auth(config).await?;
    Ok(Session::new(token))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_callback_routes() {
        assert_eq!(parse_callback("/"), Callback::Relay);
        assert_eq!(parse_callback("/favicon.ico"), Callback::Ignored);
        assert_eq!(
            parse_callback("/token?access_token=ya29.abc&token_type=Bearer&expires_in=3599"),
            Callback::Token("ya29.abc".to_string())
        );
        assert_eq!(
            parse_callback("/token?error=access_denied"),
            Callback::Denied("access_denied".to_string())
        );
        assert!(matches!(parse_callback("/token?"), Callback::Denied(_)));
    }

    #[test]
    fn test_authorization_url_requests_implicit_grant() {
        let config = Config {
            redirect_port: 9123,
            ..Config::default()
        };
        let url = authorization_url(&config).unwrap();
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert!(pairs.contains(&("response_type".to_string(), "token".to_string())));
        assert!(pairs.contains(&(
            "redirect_uri".to_string(),
            "http://127.0.0.1:9123/".to_string()
        )));
        assert!(pairs.contains(&("client_id".to_string(), config.client_id.clone())));
    }

    #[test]
    fn test_session_debug_hides_token() {
        let session = Session::new("secret");
        assert!(!format!("{session:?}").contains("secret"));
        assert_eq!(session.access_token(), "secret");
    }

    #[tokio::test]
    async fn test_preset_token_skips_browser() {
        let config = Config {
            access_token: Some("preset".to_string()),
            ..Config::default()
        };
        let session = perform_oauth_flow(&config).await.unwrap();
        assert_eq!(session.access_token(), "preset");
    }

    #[tokio::test]
    async fn test_loopback_relay_then_token() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(wait_for_token(listener));

        for path in ["/", "/token?access_token=tok-1&expires_in=3599"] {
            let mut stream = TcpStream::connect(addr).await.unwrap();
            stream
                .write_all(format!("GET {path} HTTP/1.1\r\nHost: localhost\r\n\r\n").as_bytes())
                .await
                .unwrap();
            let mut response = String::new();
            tokio::io::AsyncReadExt::read_to_string(&mut stream, &mut response)
                .await
                .unwrap();
            assert!(response.starts_with("HTTP/1.1 200 OK"));
        }

        assert_eq!(server.await.unwrap().unwrap(), "tok-1");
    }
}
