//! `reqwest` implementation of [`PortalApi`].
//!
//! Every call goes through [`send_json`], which treats any non-2xx status
//! as [`PortalError::Network`] and reads the body as text before decoding
//! it, so a malformed body can be logged.

use async_trait::async_trait;
use civic_portal_models::{
    AssistanceCase, AssistanceDraft, BestPractice, Comment, CommentDraft, OfficialLink, Report,
    ReportDraft,
};
use reqwest::{Url, multipart};
use serde::de::DeserializeOwned;

use crate::{ApiConfig, PortalApi, PortalError};

/// Maximum length of the response body preview included in error logs.
const BODY_PREVIEW_LEN: usize = 500;

/// Portal API client backed by a shared [`reqwest::Client`].
#[derive(Debug, Clone)]
pub struct HttpPortalApi {
    base_url: Url,
    client: reqwest::Client,
}

impl HttpPortalApi {
    /// Creates a client for the API described by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`PortalError::Config`] if the base URL is not an absolute
    /// hierarchical URL or the HTTP client cannot be built (e.g. the TLS
    /// backend fails to initialize).
    pub fn new(config: &ApiConfig) -> Result<Self, PortalError> {
        let base_url = Url::parse(&config.base_url).map_err(|e| PortalError::Config {
            message: format!("Invalid API base URL {:?}: {e}", config.base_url),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(PortalError::Config {
                message: format!("API base URL {:?} cannot carry a path", config.base_url),
            });
        }

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| PortalError::Config {
                message: format!("Failed to build HTTP client: {e}"),
            })?;

        Ok(Self { base_url, client })
    }

    /// Returns the base URL every endpoint is appended to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Appends `segments` to the base URL, percent-encoding each one so an
    /// id containing `/`, `?` or `#` stays a single path segment.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}

#[async_trait]
impl PortalApi for HttpPortalApi {
    async fn list_reports(&self) -> Result<Vec<Report>, PortalError> {
        send_json(self.client.get(self.endpoint(&["reports"]))).await
    }

    async fn create_report(&self, draft: &ReportDraft) -> Result<Report, PortalError> {
        let form = report_form(draft)?;
        send_json(self.client.post(self.endpoint(&["reports"])).multipart(form)).await
    }

    async fn like_report(&self, report_id: &str) -> Result<Report, PortalError> {
        send_json(
            self.client
                .post(self.endpoint(&["reports", report_id, "like"])),
        )
        .await
    }

    async fn list_comments(&self, report_id: &str) -> Result<Vec<Comment>, PortalError> {
        send_json(
            self.client
                .get(self.endpoint(&["reports", report_id, "comments"])),
        )
        .await
    }

    async fn create_comment(
        &self,
        report_id: &str,
        draft: &CommentDraft,
    ) -> Result<Comment, PortalError> {
        send_json(
            self.client
                .post(self.endpoint(&["reports", report_id, "comments"]))
                .json(draft),
        )
        .await
    }

    async fn list_official_links(&self) -> Result<Vec<OfficialLink>, PortalError> {
        send_json(self.client.get(self.endpoint(&["official-links"]))).await
    }

    async fn list_best_practices(&self) -> Result<Vec<BestPractice>, PortalError> {
        send_json(self.client.get(self.endpoint(&["best-practices"]))).await
    }

    async fn list_assistance_cases(&self) -> Result<Vec<AssistanceCase>, PortalError> {
        send_json(self.client.get(self.endpoint(&["assistance-cases"]))).await
    }

    async fn create_assistance_case(
        &self,
        draft: &AssistanceDraft,
    ) -> Result<AssistanceCase, PortalError> {
        send_json(self.client.post(self.endpoint(&["assistance-cases"])).json(draft)).await
    }
}

/// Builds the `multipart/form-data` body for `POST /reports`.
///
/// Text fields are always present (an absent location is sent empty);
/// each image becomes one `images` file part.
///
/// # Errors
///
/// Returns [`PortalError::Validation`] if an attachment's MIME type cannot
/// be parsed.
pub fn report_form(draft: &ReportDraft) -> Result<multipart::Form, PortalError> {
    let mut form = multipart::Form::new()
        .text("title", draft.title.clone())
        .text("category", draft.category.to_string())
        .text("location", draft.location.clone().unwrap_or_default())
        .text("description", draft.description.clone())
        .text("isAnonymous", draft.is_anonymous.to_string())
        .text("reporter", draft.reporter_field().to_string());

    for image in &draft.images {
        let part = multipart::Part::bytes(image.bytes.clone())
            .file_name(image.file_name.clone())
            .mime_str(&image.mime_type)
            .map_err(|e| PortalError::Validation {
                message: format!(
                    "Invalid MIME type {:?} for {}: {e}",
                    image.mime_type, image.file_name
                ),
            })?;
        form = form.part("images", part);
    }

    Ok(form)
}

/// Fails with [`PortalError::Network`] unless `status` is 2xx.
///
/// # Errors
///
/// Returns [`PortalError::Network`] carrying the status code.
pub fn check_status(status: reqwest::StatusCode) -> Result<(), PortalError> {
    if status.is_success() {
        Ok(())
    } else {
        Err(PortalError::Network {
            status: status.as_u16(),
        })
    }
}

/// Sends `request` and decodes a successful response body as JSON.
async fn send_json<T: DeserializeOwned>(
    request: reqwest::RequestBuilder,
) -> Result<T, PortalError> {
    let response = request.send().await.map_err(|e| {
        log::debug!("request failed before a response arrived: {e}");
        PortalError::from(e)
    })?;

    let url = response.url().to_string();
    let status = response.status();
    log::debug!("{url} -> {status}");

    check_status(status)?;

    let text = response.text().await?;
    serde_json::from_str(&text).map_err(|e| {
        log::warn!(
            "JSON parse failed\n  \
             url: {url}\n  \
             status: {status}\n  \
             received: {} bytes\n  \
             parse error: {e}\n  \
             body preview: {}",
            text.len(),
            preview(&text),
        );
        PortalError::Json(e)
    })
}

fn preview(text: &str) -> &str {
    if text.len() <= BODY_PREVIEW_LEN {
        return text;
    }
    let mut end = BODY_PREVIEW_LEN;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

#[cfg(test)]
mod tests {
    use civic_portal_models::{ANONYMOUS_REPORTER, ImageAttachment, ReportCategory};
    use reqwest::StatusCode;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};
    use tokio::task::JoinHandle;

    use super::*;

    fn draft() -> ReportDraft {
        ReportDraft {
            title: "Broken light".to_string(),
            category: ReportCategory::Safety,
            location: None,
            description: "Out since Monday".to_string(),
            is_anonymous: true,
            reporter_name: None,
            images: vec![],
        }
    }

    #[test]
    fn success_statuses_pass() {
        assert!(check_status(StatusCode::OK).is_ok());
        assert!(check_status(StatusCode::CREATED).is_ok());
    }

    #[test]
    fn failure_statuses_carry_code() {
        for status in [
            StatusCode::NOT_FOUND,
            StatusCode::INTERNAL_SERVER_ERROR,
            StatusCode::SERVICE_UNAVAILABLE,
            StatusCode::FOUND,
        ] {
            let err = check_status(status).unwrap_err();
            assert_eq!(err.status(), Some(status.as_u16()));
        }
    }

    #[test]
    fn endpoints_share_base() {
        let api = HttpPortalApi::new(&ApiConfig::new("http://localhost:9000/api/")).unwrap();
        assert_eq!(api.base_url(), "http://localhost:9000/api");
        assert_eq!(
            api.endpoint(&["reports", "42", "like"]).as_str(),
            "http://localhost:9000/api/reports/42/like"
        );

        let root = HttpPortalApi::new(&ApiConfig::new("http://localhost:9000")).unwrap();
        assert_eq!(
            root.endpoint(&["reports"]).as_str(),
            "http://localhost:9000/reports"
        );
    }

    #[test]
    fn ids_stay_one_segment() {
        let api = HttpPortalApi::new(&ApiConfig::new("http://localhost:9000/api")).unwrap();
        assert_eq!(
            api.endpoint(&["reports", "a/b?x=1#f", "like"]).as_str(),
            "http://localhost:9000/api/reports/a%2Fb%3Fx=1%23f/like"
        );
    }

    #[test]
    fn unusable_base_is_config_error() {
        for base in ["not a url", "mailto:portal@example.com"] {
            assert!(matches!(
                HttpPortalApi::new(&ApiConfig::new(base)),
                Err(PortalError::Config { .. })
            ));
        }
    }

    #[test]
    fn report_form_accepts_images() {
        let mut draft = draft();
        draft.images.push(ImageAttachment {
            file_name: "light.png".to_string(),
            mime_type: "image/png".to_string(),
            bytes: vec![0x89, b'P', b'N', b'G'],
        });
        assert!(report_form(&draft).is_ok());
    }

    #[test]
    fn report_form_rejects_bad_mime() {
        let mut draft = draft();
        draft.images.push(ImageAttachment {
            file_name: "light.png".to_string(),
            mime_type: "not a mime".to_string(),
            bytes: vec![],
        });
        assert!(matches!(
            report_form(&draft),
            Err(PortalError::Validation { .. })
        ));
    }

    #[test]
    fn preview_truncates_on_char_boundary() {
        let text = "가".repeat(BODY_PREVIEW_LEN);
        let shown = preview(&text);
        assert!(shown.len() <= BODY_PREVIEW_LEN);
        assert!(text.starts_with(shown));
        assert_eq!(preview("short"), "short");
    }

    const REPORT_JSON: &str = r#"{"id":"r-1","title":"Broken light","description":"Out since Monday","category":"safety","status":"pending","likes":3,"liked":true,"createdAt":"2024-05-18T09:00:00Z"}"#;

    /// Accepts one connection, answers it with `status` and `body`, and
    /// hands back the raw request.
    async fn serve_once(
        status: &'static str,
        body: &'static str,
    ) -> (HttpPortalApi, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let request = read_request(&mut socket).await;
            let response = format!(
                "HTTP/1.1 {status}\r\n\
                 Content-Type: application/json\r\n\
                 Content-Length: {}\r\n\
                 Connection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
            request
        });
        let api = HttpPortalApi::new(&ApiConfig::new(&format!("http://{addr}/api"))).unwrap();
        (api, handle)
    }

    async fn read_request(socket: &mut TcpStream) -> String {
        let mut raw = Vec::new();
        let mut buf = [0u8; 4096];
        while !request_complete(&raw) {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            raw.extend_from_slice(&buf[..n]);
        }
        String::from_utf8_lossy(&raw).into_owned()
    }

    fn request_complete(raw: &[u8]) -> bool {
        let Some(header_end) = raw.windows(4).position(|w| w == b"\r\n\r\n") else {
            return false;
        };
        let headers = String::from_utf8_lossy(&raw[..header_end]).to_ascii_lowercase();
        let body = &raw[header_end + 4..];

        if headers.contains("transfer-encoding: chunked") {
            return body.ends_with(b"0\r\n\r\n");
        }
        let content_length = headers
            .lines()
            .find_map(|line| line.strip_prefix("content-length:"))
            .and_then(|v| v.trim().parse::<usize>().ok())
            .unwrap_or(0);
        body.len() >= content_length
    }

    #[tokio::test]
    async fn like_sends_id_as_one_segment() {
        let (api, server) = serve_once("200 OK", REPORT_JSON).await;
        let report = api.like_report("a/b?x=1#f").await.unwrap();
        assert_eq!(report.id, "r-1");
        assert!(report.liked);

        let request = server.await.unwrap();
        assert!(
            request.starts_with("POST /api/reports/a%2Fb%3Fx=1%23f/like HTTP/1.1\r\n"),
            "{request}"
        );
    }

    #[tokio::test]
    async fn comment_paths_escape_id() {
        let (api, server) = serve_once("200 OK", "[]").await;
        assert!(api.list_comments("7#frag").await.unwrap().is_empty());
        let request = server.await.unwrap();
        assert!(
            request.starts_with("GET /api/reports/7%23frag/comments HTTP/1.1\r\n"),
            "{request}"
        );
    }

    #[tokio::test]
    async fn error_status_with_json_body_is_network_error() {
        let (api, server) = serve_once("503 Service Unavailable", r#"{"error":"down"}"#).await;
        let err = api.list_reports().await.unwrap_err();
        assert!(matches!(err, PortalError::Network { status: 503 }), "{err:?}");
        server.await.unwrap();
    }

    #[tokio::test]
    async fn success_with_malformed_body_is_json_error() {
        let (api, server) = serve_once("200 OK", r#"{"unexpected":true}"#).await;
        let err = api.list_official_links().await.unwrap_err();
        assert!(matches!(err, PortalError::Json(_)), "{err:?}");
        server.await.unwrap();
    }

    #[tokio::test]
    async fn refused_connection_is_transport_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let api = HttpPortalApi::new(&ApiConfig::new(&format!("http://{addr}/api"))).unwrap();
        let err = api.list_reports().await.unwrap_err();
        assert!(matches!(err, PortalError::Transport { .. }), "{err:?}");
        assert_eq!(err.status(), None);
    }

    #[tokio::test]
    async fn create_report_sends_multipart_fields() {
        let mut draft = draft();
        for name in ["first.png", "second.png"] {
            draft.images.push(ImageAttachment {
                file_name: name.to_string(),
                mime_type: "image/png".to_string(),
                bytes: b"PNGDATA".to_vec(),
            });
        }

        let (api, server) = serve_once("201 Created", REPORT_JSON).await;
        let created = api.create_report(&draft).await.unwrap();
        assert_eq!(created.id, "r-1");

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /api/reports HTTP/1.1\r\n"), "{request}");
        assert!(request.contains("multipart/form-data; boundary="));
        assert!(request.contains("name=\"title\"\r\n\r\nBroken light\r\n"));
        assert!(request.contains("name=\"category\"\r\n\r\nsafety\r\n"));
        assert!(request.contains("name=\"location\"\r\n\r\n\r\n"));
        assert!(request.contains("name=\"isAnonymous\"\r\n\r\ntrue\r\n"));
        assert!(request.contains(&format!(
            "name=\"reporter\"\r\n\r\n{ANONYMOUS_REPORTER}\r\n"
        )));
        assert_eq!(request.matches("name=\"images\"; filename=").count(), 2);
        assert!(request.contains("filename=\"first.png\""));
        assert!(request.contains("filename=\"second.png\""));
    }

    #[tokio::test]
    async fn comment_is_posted_as_json() {
        let (api, server) = serve_once(
            "201 Created",
            r#"{"author":"anonymous","content":"same here","createdAt":"2024-05-20T00:00:00Z"}"#,
        )
        .await;
        let comment = api
            .create_comment("r-1", &CommentDraft::anonymous("same here"))
            .await
            .unwrap();
        assert_eq!(comment.content, "same here");

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /api/reports/r-1/comments HTTP/1.1\r\n"));
        assert!(request.to_ascii_lowercase().contains("content-type: application/json"));
        assert!(request.contains(r#""content":"same here""#));
    }
}
