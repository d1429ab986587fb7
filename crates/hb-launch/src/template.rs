//! Where a manifest template is read from: a local file or an http(s) URL.
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{debug, warn};

use crate::error::LaunchError;

const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSource {
    File(PathBuf),
    Url(String),
}

impl TemplateSource {
    /// Classify an application's `template` reference.
    ///
    /// `http://` and `https://` references are downloaded; anything else is a path, taken
    /// relative to `config_dir` unless absolute.
    pub fn locate(config_dir: &Path, template: &str) -> Self {
        let scheme = template
            .split_once("://")
            .map(|(s, _)| s.to_ascii_lowercase());
        match scheme.as_deref() {
            Some("http" | "https") => Self::Url(template.to_string()),
            _ => Self::File(config_dir.join(template)),
        }
    }

    pub async fn fetch(&self) -> Result<String, LaunchError> {
        match self {
            Self::File(path) => {
                tokio::fs::read_to_string(path)
                    .await
                    .map_err(|source| LaunchError::Template {
                        path: path.clone(),
                        source,
                    })
            }
            Self::Url(url) => fetch_url(url).await,
        }
    }
}

impl fmt::Display for TemplateSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Url(url) => f.write_str(url),
        }
    }
}

async fn fetch_url(url: &str) -> Result<String, LaunchError> {
    let failed = |source: reqwest::Error| LaunchError::Fetch {
        url: url.to_string(),
        source,
    };

    let client = reqwest::Client::builder()
        .timeout(FETCH_TIMEOUT)
        .build()
        .map_err(failed)?;
    let response = client.get(url).send().await.map_err(|e| {
        warn!(url, error = %e, is_connect = e.is_connect(), "template request failed");
        failed(e)
    })?;
    debug!(url, status = response.status().as_u16(), "template response");

    response
        .error_for_status()
        .map_err(failed)?
        .text()
        .await
        .map_err(failed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Answer one request with `status` and `body`, then hang up.
    async fn serve_once(status: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut conn, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 2048];
            let _ = conn.read(&mut buf).await;
            let reply = format!(
                "HTTP/1.1 {status}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            conn.write_all(reply.as_bytes()).await.unwrap();
            let _ = conn.shutdown().await;
        });
        format!("http://{addr}/templates/pod.yaml")
    }

    #[test]
    fn locates_urls_and_paths() {
        let dir = Path::new("/etc/humpback");
        assert_eq!(
            TemplateSource::locate(dir, "https://example.com/pod.yaml"),
            TemplateSource::Url("https://example.com/pod.yaml".into())
        );
        assert_eq!(
            TemplateSource::locate(dir, "HTTP://example.com/pod.yaml"),
            TemplateSource::Url("HTTP://example.com/pod.yaml".into())
        );
        assert_eq!(
            TemplateSource::locate(dir, "templates/pod.yaml"),
            TemplateSource::File(PathBuf::from("/etc/humpback/templates/pod.yaml"))
        );
        assert_eq!(
            TemplateSource::locate(dir, "/srv/pod.yaml"),
            TemplateSource::File(PathBuf::from("/srv/pod.yaml"))
        );
    }

    #[tokio::test]
    async fn downloads_remote_template() {
        let url = serve_once("200 OK", "kind: Pod\n").await;
        let body = TemplateSource::Url(url).fetch().await.unwrap();
        assert_eq!(body, "kind: Pod\n");
    }

    #[tokio::test]
    async fn error_status_is_fetch_error() {
        let url = serve_once("404 Not Found", "no such template").await;
        match TemplateSource::Url(url.clone()).fetch().await {
            Err(LaunchError::Fetch { url: failed, .. }) => assert_eq!(failed, url),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_file_is_template_error() {
        let dir = tempfile::tempdir().unwrap();
        let source = TemplateSource::locate(dir.path(), "missing.yaml");
        assert!(matches!(
            source.fetch().await,
            Err(LaunchError::Template { .. })
        ));
    }
}
