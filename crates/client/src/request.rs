use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }
}

/// One logical call against the API, relative to the session base URL.
#[derive(Debug, Clone, PartialEq)]
pub struct BackendRequest {
    pub path: String,
    pub method: Method,
    pub headers: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl BackendRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            method: Method::Get,
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            method: Method::Post,
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// A request with its absolute URL and final header set, ready for the wire.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedRequest {
    pub url: String,
    pub method: Method,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl PreparedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub status_text: String,
    pub content_type: Option<String>,
    pub body: String,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn is_json(&self) -> bool {
        self.content_type
            .as_deref()
            .map(|ct| ct.to_ascii_lowercase().contains("application/json"))
            .unwrap_or(false)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum BackendResponse {
    Json(Value),
    Text(String),
}

impl BackendResponse {
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            BackendResponse::Json(v) => Some(v),
            BackendResponse::Text(_) => None,
        }
    }

    pub fn into_json(self) -> Option<Value> {
        match self {
            BackendResponse::Json(v) => Some(v),
            BackendResponse::Text(_) => None,
        }
    }

    /// Pretty JSON for structured bodies, the body unchanged otherwise.
    pub fn to_text(&self) -> String {
        match self {
            BackendResponse::Json(v) => {
                serde_json::to_string_pretty(v).unwrap_or_else(|_| v.to_string())
            }
            BackendResponse::Text(t) => t.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response(content_type: Option<&str>, status: u16) -> RawResponse {
        RawResponse {
            status,
            status_text: String::new(),
            content_type: content_type.map(str::to_string),
            body: String::new(),
        }
    }

    #[test]
    fn json_detection_ignores_charset_and_case() {
        assert!(response(Some("application/json; charset=utf-8"), 200).is_json());
        assert!(response(Some("Application/JSON"), 200).is_json());
        assert!(!response(Some("text/xml"), 200).is_json());
        assert!(!response(Some("application/geo+json"), 200).is_json());
        assert!(!response(None, 200).is_json());
    }

    #[test]
    fn success_range() {
        assert!(response(None, 200).is_success());
        assert!(response(None, 204).is_success());
        assert!(!response(None, 301).is_success());
        assert!(!response(None, 404).is_success());
    }

    #[test]
    fn builder_collects_headers_and_body() {
        let req = BackendRequest::post("rpc/export_logbook_gpx_trip_fn")
            .header("Accept", "text/xml")
            .json(json!({ "_id": "1" }));

        assert_eq!(req.method, Method::Post);
        assert_eq!(req.headers, vec![("Accept".to_string(), "text/xml".to_string())]);
        assert_eq!(req.body, Some(json!({ "_id": "1" })));
    }

    #[test]
    fn text_response_is_returned_unchanged() {
        let xml = "<gpx version=\"1.1\"></gpx>";
        assert_eq!(BackendResponse::Text(xml.to_string()).to_text(), xml);
    }
}
