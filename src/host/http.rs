//! Blocking HTTP client for the ranked API

use std::time::Duration;

use reqwest::blocking::{Client, ClientBuilder};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use serde_json::Value;
use tracing::{debug, error};

use crate::core::constants::BROWSER_USER_AGENT;
use crate::core::io_traits::{FetchError, JsonFetcher};

/// `JsonFetcher` over a shared reqwest client
///
/// Every request carries `Accept: application/json` and a browser-like
/// user agent; the API rejects the default reqwest one.
pub struct HttpJsonClient {
    client: Client,
}

impl HttpJsonClient {
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        Self::from_builder(Client::builder(), user_agent, timeout)
    }

    fn from_builder(
        builder: ClientBuilder,
        user_agent: &str,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = builder
            .default_headers(request_headers(user_agent))
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }
}

/// Headers sent with every request
fn request_headers(user_agent: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    let agent = HeaderValue::from_str(user_agent).unwrap_or_else(|_| {
        error!(user_agent, "[api] Invalid user agent, using the browser default");
        HeaderValue::from_static(BROWSER_USER_AGENT)
    });
    headers.insert(USER_AGENT, agent);
    headers
}

impl JsonFetcher for HttpJsonClient {
    fn fetch_json(&self, url: &str) -> Result<Value, FetchError> {
        debug!(url, "[api] GET");

        let response = self.client.get(url).send().map_err(|e| {
            let err = FetchError::Transport {
                url: url.to_string(),
                message: e.to_string(),
            };
            error!(error = %err, "[api] Request failed");
            err
        })?;

        let status = response.status().as_u16();
        let body = response.bytes().map_err(|e| {
            let err = FetchError::Transport {
                url: url.to_string(),
                message: e.to_string(),
            };
            error!(error = %err, "[api] Failed reading body");
            err
        })?;

        classify_response(url, status, &body).inspect_err(|err| {
            error!(error = %err, "[api] Unusable response");
            debug!(body = %String::from_utf8_lossy(&body), "[api] Response body");
        })
    }
}

/// Turn a raw response into JSON or the matching `FetchError`
///
/// Only 200 is accepted; the body of any other status is not parsed.
pub fn classify_response(url: &str, status: u16, body: &[u8]) -> Result<Value, FetchError> {
    if status != 200 {
        return Err(FetchError::HttpStatus {
            url: url.to_string(),
            status,
        });
    }

    let text = std::str::from_utf8(body).map_err(|e| FetchError::Decode {
        url: url.to_string(),
        message: e.to_string(),
    })?;

    serde_json::from_str(text).map_err(|e| FetchError::Decode {
        url: url.to_string(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread::{self, JoinHandle};

    const URL: &str = "https://api.mcsrranked.com/live";

    #[test]
    fn test_ok_json() {
        let value = classify_response(URL, 200, br#"{"status":"success","data":{}}"#).unwrap();
        assert_eq!(value, json!({"status": "success", "data": {}}));
    }

    #[rstest]
    #[case(404)]
    #[case(429)]
    #[case(500)]
    #[case(204)]
    fn test_non_ok_status(#[case] status: u16) {
        let err = classify_response(URL, status, b"{}").unwrap_err();
        assert_eq!(
            err,
            FetchError::HttpStatus {
                url: URL.to_string(),
                status
            }
        );
    }

    #[test]
    fn test_invalid_json_is_decode_error() {
        let err = classify_response(URL, 200, b"<html>rate limited</html>").unwrap_err();
        assert!(matches!(err, FetchError::Decode { .. }));
    }

    #[test]
    fn test_invalid_utf8_is_decode_error() {
        let err = classify_response(URL, 200, &[0xff, 0xfe, 0x7b]).unwrap_err();
        assert!(matches!(err, FetchError::Decode { .. }));
    }

    /// Serve one canned response on a local port, returning the base URL and
    /// a handle yielding the raw request head
    fn serve_once(status_line: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = stream.read(&mut buf).unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            let response = format!(
                "{}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            stream.write_all(response.as_bytes()).unwrap();
            String::from_utf8_lossy(&request).to_lowercase()
        });
        (base, handle)
    }

    /// Real client, minus any proxy from the environment
    fn client(user_agent: &str) -> HttpJsonClient {
        HttpJsonClient::from_builder(
            Client::builder().no_proxy(),
            user_agent,
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[test]
    fn test_fetch_sends_json_accept_and_browser_agent() {
        let (base, server) = serve_once("HTTP/1.1 200 OK", r#"{"data":[]}"#);
        let value = client(BROWSER_USER_AGENT)
            .fetch_json(&format!("{}/live", base))
            .unwrap();
        assert_eq!(value, json!({"data": []}));

        let request = server.join().unwrap();
        assert!(request.starts_with("get /live "));
        assert!(request.contains("accept: application/json\r\n"));
        assert!(request.contains(&format!(
            "user-agent: {}\r\n",
            BROWSER_USER_AGENT.to_lowercase()
        )));
    }

    #[test]
    fn test_fetch_non_ok_status_end_to_end() {
        let (base, server) = serve_once("HTTP/1.1 429 Too Many Requests", r#"{"status":"error"}"#);
        let url = format!("{}/live", base);
        let err = client(BROWSER_USER_AGENT).fetch_json(&url).unwrap_err();
        assert_eq!(err, FetchError::HttpStatus { url, status: 429 });
        server.join().unwrap();
    }

    #[test]
    fn test_invalid_user_agent_falls_back_to_browser_agent() {
        let (base, server) = serve_once("HTTP/1.1 200 OK", "{}");
        client("bad\nagent")
            .fetch_json(&format!("{}/live", base))
            .unwrap();
        let request = server.join().unwrap();
        assert!(request.contains(&format!(
            "user-agent: {}\r\n",
            BROWSER_USER_AGENT.to_lowercase()
        )));
    }

    #[test]
    fn test_connection_refused_is_transport_error() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}/live", listener.local_addr().unwrap());
        drop(listener);
        let err = client(BROWSER_USER_AGENT).fetch_json(&url).unwrap_err();
        assert!(matches!(err, FetchError::Transport { .. }));
    }
}
