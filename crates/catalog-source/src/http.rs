use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use catalog_types::Product;

use crate::error::{SourceError, SourceResult};
use crate::source::{parse_base, BaseSource};

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Base collection served over HTTP.
///
/// Each fetch issues one uncached `GET`. The blocking request runs on the
/// tokio blocking pool. There are no retries.
#[derive(Clone, Debug)]
pub struct HttpSource {
    url: String,
    timeout: Duration,
}

impl HttpSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    fn fetch_blocking(url: &str, timeout: Duration) -> SourceResult<String> {
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        let resp = agent
            .get(url)
            .set("Cache-Control", "no-store")
            .set("User-Agent", "cardapio-overlay")
            .call()
            .map_err(|e| match e {
                ureq::Error::Status(status, _) => SourceError::Status {
                    origin: url.to_string(),
                    status,
                },
                ureq::Error::Transport(t) => SourceError::Unreachable {
                    origin: url.to_string(),
                    reason: t.to_string(),
                },
            })?;
        resp.into_string().map_err(|source| SourceError::Io {
            origin: url.to_string(),
            source,
        })
    }
}

#[async_trait]
impl BaseSource for HttpSource {
    async fn fetch(&self) -> SourceResult<Vec<Product>> {
        let url = self.url.clone();
        let timeout = self.timeout;
        let body = tokio::task::spawn_blocking(move || Self::fetch_blocking(&url, timeout))
            .await
            .map_err(|e| SourceError::Task(e.to_string()))??;
        let products = parse_base(&body, &self.url)?;
        debug!(url = %self.url, count = products.len(), "base collection fetched");
        Ok(products)
    }

    fn origin(&self) -> String {
        self.url.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufRead, BufReader, Write};
    use std::net::TcpListener;

    /// Serve exactly one canned HTTP response on a local port.
    fn serve_once(status_line: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        std::thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut line = String::new();
            while reader.read_line(&mut line).unwrap() > 0 {
                if line == "\r\n" {
                    break;
                }
                line.clear();
            }
            let response = format!(
                "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(response.as_bytes()).unwrap();
        });
        format!("http://{addr}/data/produtos.json")
    }

    #[tokio::test]
    async fn fetches_products() {
        let url = serve_once("200 OK", r#"[{"id":"1","nome":"A","estoque":1,"preco":5}]"#);
        let products = HttpSource::new(url).fetch().await.unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].name, "A");
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let url = serve_once("404 Not Found", "missing");
        let err = HttpSource::new(url).fetch().await.unwrap_err();
        assert!(matches!(err, SourceError::Status { status: 404, .. }), "got: {err}");
    }

    #[tokio::test]
    async fn malformed_body_is_an_error() {
        let url = serve_once("200 OK", "{}");
        let err = HttpSource::new(url).fetch().await.unwrap_err();
        assert!(matches!(err, SourceError::Malformed { .. }), "got: {err}");
    }

    #[tokio::test]
    async fn unreachable_host_is_an_error() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let err = HttpSource::new(format!("http://{addr}/x.json"))
            .with_timeout(Duration::from_secs(2))
            .fetch()
            .await
            .unwrap_err();
        assert!(matches!(err, SourceError::Unreachable { .. }), "got: {err}");
    }
}
