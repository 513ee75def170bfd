//! HTTP adapter for the remote munro collection endpoint.

use std::time::Duration;

use reqwest::blocking::Client;
use tracing::info;

use crate::domain::errors::ApiError;
use crate::domain::model::Munro;
use crate::infra::config::Config;

/// Thin client over the collection endpoint. The endpoint takes no query
/// parameters, no auth, and returns the whole collection as a JSON array.
#[derive(Debug, Clone)]
pub struct MunroApi {
    client: Client,
    url: String,
}

impl MunroApi {
    /// Build a client from the configured endpoint and timeout. A zero
    /// timeout disables the request deadline.
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        let mut builder = Client::builder();
        if config.api.timeout_secs > 0 {
            builder = builder.timeout(Duration::from_secs(config.api.timeout_secs));
        }
        let client = builder.build().map_err(|source| ApiError::Transport {
            url: config.api.url.clone(),
            source,
        })?;
        Ok(Self {
            client,
            url: config.api.url.clone(),
        })
    }

    /// The configured endpoint.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch the whole collection in response order.
    pub fn fetch_munros(&self) -> Result<Vec<Munro>, ApiError> {
        info!(url = %self.url, "fetching munro collection");

        let response =
            self.client
                .get(&self.url)
                .send()
                .map_err(|source| ApiError::Transport {
                    url: self.url.clone(),
                    source,
                })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                url: self.url.clone(),
                status,
            });
        }

        response.json().map_err(|source| ApiError::Decode {
            url: self.url.clone(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;

    /// Serve one canned HTTP response on an ephemeral local port and return
    /// the endpoint URL pointing at it.
    fn serve_once(response: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        thread::spawn(move || {
            if let Ok((mut stream, _)) = listener.accept() {
                let mut request = [0u8; 2048];
                let _ = stream.read(&mut request);
                let _ = stream.write_all(response.as_bytes());
            }
        });
        format!("http://{addr}/munros")
    }

    fn api_for(url: String) -> MunroApi {
        let mut config = Config::default();
        config.api.url = url;
        config.api.timeout_secs = 5;
        MunroApi::new(&config).unwrap()
    }

    #[test]
    fn builds_from_default_config() {
        let api = MunroApi::new(&Config::default()).unwrap();
        assert!(api.url().starts_with("https://"));
    }

    #[test]
    fn zero_timeout_is_accepted() {
        let mut config = Config::default();
        config.api.timeout_secs = 0;
        assert!(MunroApi::new(&config).is_ok());
    }

    #[test]
    fn non_success_status_is_a_status_error() {
        let url = serve_once(
            "HTTP/1.1 500 Internal Server Error\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
        );
        let api = api_for(url);

        match api.fetch_munros() {
            Err(ApiError::Status { status, .. }) => assert_eq!(status.as_u16(), 500),
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[test]
    fn malformed_body_is_a_decode_error() {
        let url = serve_once(
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: 8\r\nConnection: close\r\n\r\nnot json",
        );
        let api = api_for(url);

        assert!(matches!(api.fetch_munros(), Err(ApiError::Decode { .. })));
    }

    #[test]
    fn unreachable_endpoint_is_a_transport_error() {
        // Bind then drop so the port is closed when the request goes out.
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let api = api_for(format!("http://{addr}/munros"));
        assert!(matches!(api.fetch_munros(), Err(ApiError::Transport { .. })));
    }
}
