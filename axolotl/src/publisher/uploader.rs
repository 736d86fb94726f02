//! Archive upload transport.
//!
//! [`PackUploader`] is the seam between the publisher and the network. The
//! production implementation, [`HttpPackUploader`], sends the archive as a
//! multipart `PUT`; tests substitute an in-memory fake.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use reqwest::multipart::{Form, Part};
use reqwest::Client;
use tracing::debug;

use super::{PublishError, PublishResult};

/// A boxed future that is Send and has a specific lifetime.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Connect and request timeout for uploads (120 seconds).
pub const UPLOAD_TIMEOUT: Duration = Duration::from_secs(120);

/// Header carrying the bucket API key.
pub const API_KEY_HEADER: &str = "X-API-Key";

/// Multipart field holding the archive.
pub const UPLOAD_FIELD: &str = "file";

/// File name announced for the archive part.
pub const UPLOAD_FILE_NAME: &str = "pack.zip";

/// Content type of the archive part.
pub const UPLOAD_MIME: &str = "application/zip";

const USER_AGENT: &str = "Axolotl-Publisher/1.0";

/// One archive upload.
#[derive(Clone)]
pub struct UploadRequest {
    pub url: String,
    pub api_key: String,
    pub archive: Vec<u8>,
}

impl std::fmt::Debug for UploadRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadRequest")
            .field("url", &self.url)
            .field("archive_len", &self.archive.len())
            .finish_non_exhaustive()
    }
}

/// Sends an archive to the bucket and returns the raw response body.
pub trait PackUploader: Send + Sync {
    fn upload(&self, request: UploadRequest) -> BoxFuture<'_, PublishResult<String>>;
}

/// Multipart HTTP uploader.
#[derive(Debug, Clone)]
pub struct HttpPackUploader {
    client: Client,
}

impl HttpPackUploader {
    /// Create an uploader with the default timeouts.
    pub fn new() -> PublishResult<Self> {
        Self::with_timeout(UPLOAD_TIMEOUT)
    }

    /// Create an uploader using `timeout` for both connect and request.
    pub fn with_timeout(timeout: Duration) -> PublishResult<Self> {
        let client = Client::builder()
            .connect_timeout(timeout)
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| PublishError::Http(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

impl PackUploader for HttpPackUploader {
    fn upload(&self, request: UploadRequest) -> BoxFuture<'_, PublishResult<String>> {
        Box::pin(async move {
            let size = request.archive.len();
            let part = Part::bytes(request.archive)
                .file_name(UPLOAD_FILE_NAME)
                .mime_str(UPLOAD_MIME)
                .map_err(|e| PublishError::Http(e.to_string()))?;
            let form = Form::new().part(UPLOAD_FIELD, part);

            debug!(url = %request.url, size, "Uploading pack");
            let response = self
                .client
                .put(&request.url)
                .header(API_KEY_HEADER, &request.api_key)
                .multipart(form)
                .send()
                .await
                .map_err(|e| PublishError::Http(e.to_string()))?;

            let status = response.status();
            if !status.is_success() {
                return Err(PublishError::UnexpectedStatus {
                    url: request.url,
                    status: status.as_u16(),
                });
            }

            response
                .text()
                .await
                .map_err(|e| PublishError::Http(e.to_string()))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::sync::oneshot;

    /// Serve one HTTP request on a local port.
    ///
    /// Answers with `status` and `body` and hands back the raw request.
    async fn serve_once(
        status: &'static str,
        body: &'static str,
    ) -> (String, oneshot::Receiver<Vec<u8>>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = oneshot::channel();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut raw = Vec::new();
            let mut chunk = [0u8; 4096];
            loop {
                let n = socket.read(&mut chunk).await.unwrap();
                if n == 0 {
                    break;
                }
                raw.extend_from_slice(&chunk[..n]);
                if request_complete(&raw) {
                    break;
                }
            }

            let response = format!(
                "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
            let _ = tx.send(raw);
        });

        (format!("http://{}/api/pack", addr), rx)
    }

    /// Whether `raw` holds the headers and the whole body.
    fn request_complete(raw: &[u8]) -> bool {
        let text = String::from_utf8_lossy(raw);
        let Some(end) = text.find("\r\n\r\n") else {
            return false;
        };
        let head = text[..end].to_ascii_lowercase();
        let body_len = raw.len() - (end + 4);
        match head
            .lines()
            .find_map(|line| line.strip_prefix("content-length:"))
            .and_then(|value| value.trim().parse::<usize>().ok())
        {
            Some(length) => body_len >= length,
            None => text.ends_with("0\r\n\r\n"),
        }
    }

    #[test]
    fn test_http_uploader_builds() {
        assert!(HttpPackUploader::new().is_ok());
    }

    #[test]
    fn test_request_debug_hides_key() {
        let request = UploadRequest {
            url: "https://bucket.example/api/pack".to_string(),
            api_key: "secret".to_string(),
            archive: vec![0; 16],
        };
        let rendered = format!("{:?}", request);
        assert!(!rendered.contains("secret"));
        assert!(rendered.contains("archive_len: 16"));
    }

    #[tokio::test]
    async fn test_upload_sends_multipart_put() {
        let (url, received) = serve_once("200 OK", "abc123\n").await;
        let uploader = HttpPackUploader::with_timeout(Duration::from_secs(10)).unwrap();

        let body = uploader
            .upload(UploadRequest {
                url,
                api_key: "k3y".to_string(),
                archive: b"PK\x03\x04archive-bytes".to_vec(),
            })
            .await
            .unwrap();
        assert_eq!(body.trim(), "abc123");

        let raw = received.await.unwrap();
        let request = String::from_utf8_lossy(&raw).to_ascii_lowercase();
        assert!(request.starts_with("put /api/pack http/1.1\r\n"), "{}", request);
        assert!(request.contains("\r\nx-api-key: k3y\r\n"));
        assert!(request.contains("content-type: multipart/form-data; boundary="));
        assert!(request
            .contains("content-disposition: form-data; name=\"file\"; filename=\"pack.zip\""));
        assert!(request.contains("content-type: application/zip"));
        assert!(raw
            .windows(b"archive-bytes".len())
            .any(|window| window == b"archive-bytes"));
    }

    #[tokio::test]
    async fn test_rejected_upload_reports_status() {
        let (url, _received) = serve_once("403 Forbidden", "denied").await;
        let uploader = HttpPackUploader::with_timeout(Duration::from_secs(10)).unwrap();

        let result = uploader
            .upload(UploadRequest {
                url: url.clone(),
                api_key: "wrong".to_string(),
                archive: b"zip".to_vec(),
            })
            .await;

        match result {
            Err(PublishError::UnexpectedStatus { url: failed, status }) => {
                assert_eq!(status, 403);
                assert_eq!(failed, url);
            }
            other => panic!("expected status error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unreachable_bucket_is_http_error() {
        let uploader = HttpPackUploader::with_timeout(Duration::from_secs(2)).unwrap();
        let result = uploader
            .upload(UploadRequest {
                url: "http://127.0.0.1:9/pack".to_string(),
                api_key: "key".to_string(),
                archive: b"zip".to_vec(),
            })
            .await;
        assert!(matches!(result, Err(PublishError::Http(_))));
    }
}
