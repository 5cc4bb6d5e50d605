use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;

use crate::client::USER_AGENT;
use crate::request::{Method, PreparedRequest, RawResponse};

/// Performs one HTTP exchange. Errors are transport failures only; a non-2xx
/// answer is still a `RawResponse`.
pub trait Backend: Send + Sync {
    fn name(&self) -> &'static str;
    fn send(&self, request: &PreparedRequest) -> Result<RawResponse, String>;
}

pub struct HttpBackend {
    client: Client,
}

impl HttpBackend {
    pub fn new() -> Self {
        Self {
            client: Client::builder()
                .user_agent(USER_AGENT)
                .build()
                .unwrap_or_else(|_| Client::new()),
        }
    }

    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

impl Default for HttpBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl Backend for HttpBackend {
    fn name(&self) -> &'static str {
        "http"
    }

    fn send(&self, request: &PreparedRequest) -> Result<RawResponse, String> {
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
        };

        let mut builder = self.client.request(method, &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let response = builder.send().map_err(|e| e.to_string())?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.text().map_err(|e| e.to_string())?;

        Ok(RawResponse {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
            content_type,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BackendResponse, ClientError, ExportFormat, PostgSailClient, Session};
    use serde_json::json;
    use std::io::{Read, Write};
    use std::net::{TcpListener, TcpStream};
    use std::sync::mpsc;
    use std::thread;

    /// Accepts a single connection, answers it with a canned response and
    /// hands the raw request text back through the channel.
    fn serve_once(status_line: &str, content_type: &str, body: &str) -> (String, mpsc::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status_line,
            content_type,
            body.len(),
            body
        );

        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let request = read_request(&mut stream);
            stream.write_all(response.as_bytes()).unwrap();
            stream.flush().unwrap();
            tx.send(request).unwrap();
        });

        (format!("http://{}/", addr), rx)
    }

    fn read_request(stream: &mut TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];
        loop {
            let n = stream.read(&mut chunk).unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);

            let text = String::from_utf8_lossy(&buf).to_string();
            if let Some(end) = text.find("\r\n\r\n") {
                let head = text[..end].to_ascii_lowercase();
                let length = head
                    .lines()
                    .find_map(|l| l.strip_prefix("content-length:"))
                    .and_then(|v| v.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if buf.len() >= end + 4 + length {
                    break;
                }
            }
        }
        String::from_utf8_lossy(&buf).to_string()
    }

    fn client(base_url: &str, token: Option<&str>) -> PostgSailClient {
        let http = Client::builder().no_proxy().build().unwrap();
        PostgSailClient::with_backend(
            Session::new(base_url, token.map(str::to_string)),
            Box::new(HttpBackend::from_client(http)),
        )
    }

    #[test]
    fn sends_bearer_token_and_decodes_json() {
        let (url, rx) = serve_once("200 OK", "application/json; charset=utf-8", r#"[{"id":1}]"#);
        let client = client(&url, Some("secret-token"));

        let result = client.get_log("1").unwrap();
        assert_eq!(result, BackendResponse::Json(json!([{ "id": 1 }])));

        let request = rx.recv().unwrap();
        let lower = request.to_ascii_lowercase();
        assert!(request.starts_with("GET /log_view?id=eq.1 HTTP/1.1"));
        assert!(lower.contains("authorization: bearer secret-token"));
        assert!(lower.contains("accept: application/json"));
        assert!(lower.contains(&format!("user-agent: {}", USER_AGENT.to_ascii_lowercase())));
    }

    #[test]
    fn omits_authorization_without_token() {
        let (url, rx) = serve_once("200 OK", "application/json", "[]");
        let client = client(&url, None);

        client.get_stays(&Default::default(), None).unwrap();

        let request = rx.recv().unwrap().to_ascii_lowercase();
        assert!(!request.contains("authorization:"));
    }

    #[test]
    fn returns_xml_export_as_raw_text() {
        let gpx = "<?xml version=\"1.0\"?><gpx version=\"1.1\"><trk><name>Trip</name></trk></gpx>";
        let (url, rx) = serve_once("200 OK", "text/xml", gpx);
        let client = client(&url, Some("t"));

        let result = client.export_log("42", ExportFormat::Gpx).unwrap();
        assert_eq!(result, BackendResponse::Text(gpx.to_string()));

        let request = rx.recv().unwrap();
        let lower = request.to_ascii_lowercase();
        assert!(request.starts_with("POST /rpc/export_logbook_gpx_trip_fn HTTP/1.1"));
        assert!(lower.contains("accept: text/xml"));
        assert!(request.ends_with(r#"{"_id":"42"}"#));
    }

    #[test]
    fn non_success_status_is_an_error() {
        let (url, _rx) = serve_once("404 Not Found", "application/json", r#"{"message":"nope"}"#);
        let client = client(&url, Some("t"));

        let err = client.get_moorage("9").unwrap_err();
        assert!(matches!(err, ClientError::Status { status: 404, .. }));
        assert!(err.to_string().contains("404 Not Found"));
    }

    #[test]
    fn unreachable_backend_is_a_transport_error() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}/", listener.local_addr().unwrap());
        drop(listener);

        let err = client(&url, None).get_badges().unwrap_err();
        assert!(matches!(err, ClientError::Transport { .. }));
    }
}
