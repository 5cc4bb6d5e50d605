use log::debug;
use serde_json::{json, Value};

use crate::backend::{Backend, HttpBackend};
use crate::error::ClientError;
use crate::filters::{with_query, DateRange, ExportFormat, StayType, TimelapseFormat};
use crate::request::{BackendRequest, BackendResponse, PreparedRequest};
use crate::session::Session;

pub const USER_AGENT: &str = concat!("postgsail-mcp/", env!("CARGO_PKG_VERSION"));

const DEFAULT_LIMIT: u32 = 5;
const MAP_PAGE_SIZE: u32 = 100;

/// Client for the PostgSail API. Every method issues exactly one request.
pub struct PostgSailClient {
    session: Session,
    backend: Box<dyn Backend>,
}

impl PostgSailClient {
    pub fn new(session: Session) -> Self {
        Self::with_backend(session, Box::new(HttpBackend::new()))
    }

    pub fn with_backend(session: Session, backend: Box<dyn Backend>) -> Self {
        Self { session, backend }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn set_token(&mut self, token: impl Into<String>) {
        self.session.set_token(token);
    }

    fn prepare(&self, request: &BackendRequest) -> PreparedRequest {
        let mut headers: Vec<(String, String)> = vec![
            ("Accept".to_string(), "application/json".to_string()),
            ("Content-Type".to_string(), "application/json".to_string()),
            ("User-Agent".to_string(), USER_AGENT.to_string()),
        ];

        for (name, value) in &request.headers {
            match headers.iter_mut().find(|(k, _)| k.eq_ignore_ascii_case(name)) {
                Some(existing) => existing.1 = value.clone(),
                None => headers.push((name.clone(), value.clone())),
            }
        }

        if let Some(token) = self.session.token() {
            headers.push(("Authorization".to_string(), format!("Bearer {}", token)));
        }

        PreparedRequest {
            url: self.session.url_for(&request.path),
            method: request.method,
            headers,
            body: request.body.as_ref().map(Value::to_string),
        }
    }

    pub fn request(&self, request: BackendRequest) -> Result<BackendResponse, ClientError> {
        let prepared = self.prepare(&request);
        debug!(
            "{} {} via {}",
            prepared.method.as_str(),
            prepared.url,
            self.backend.name()
        );

        let response = self
            .backend
            .send(&prepared)
            .map_err(|message| ClientError::Transport {
                endpoint: request.path.clone(),
                message,
            })?;

        if !response.is_success() {
            return Err(ClientError::Status {
                endpoint: request.path,
                status: response.status,
                status_text: response.status_text,
            });
        }

        if response.is_json() {
            let value = serde_json::from_str(&response.body).map_err(|source| {
                ClientError::Decode {
                    endpoint: request.path,
                    source,
                }
            })?;
            Ok(BackendResponse::Json(value))
        } else {
            Ok(BackendResponse::Text(response.body))
        }
    }

    /// Exchanges credentials for a JWT. The caller decides where to keep it.
    pub fn login(&self, email: &str, password: &str) -> Result<String, ClientError> {
        let response = self.request(
            BackendRequest::post("rpc/login").json(json!({ "email": email, "pass": password })),
        )?;

        response
            .as_json()
            .and_then(|v| v.get("token"))
            .and_then(Value::as_str)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .ok_or(ClientError::MissingToken)
    }

    // Vessel

    pub fn get_vessel(&self) -> Result<BackendResponse, ClientError> {
        self.request(BackendRequest::get("rpc/vessel_fn"))
    }

    pub fn get_vessel_mapping(&self) -> Result<BackendResponse, ClientError> {
        self.request(BackendRequest::get(
            "metadata?select=configuration,available_keys",
        ))
    }

    pub fn get_settings(&self) -> Result<BackendResponse, ClientError> {
        self.request(BackendRequest::get("rpc/settings_fn"))
    }

    // Logs

    pub fn get_logs(
        &self,
        range: &DateRange,
        limit: Option<u32>,
    ) -> Result<BackendResponse, ClientError> {
        let mut params = vec![format!("limit={}", limit.unwrap_or(DEFAULT_LIMIT))];
        params.extend(range.filters("started", "ended"));
        self.request(BackendRequest::get(with_query("logs_view", &params)))
    }

    pub fn get_log(&self, id: &str) -> Result<BackendResponse, ClientError> {
        self.request(BackendRequest::get(by_id("log_view", id)))
    }

    pub fn get_logs_map(&self, page: u32) -> Result<BackendResponse, ClientError> {
        let offset = u64::from(page.saturating_sub(1)) * u64::from(MAP_PAGE_SIZE);
        self.request(
            BackendRequest::get(format!(
                "logs_geojson_view?select=geojson&geojson=not.is.null&order=starttimestamp.desc&limit={}&offset={}",
                MAP_PAGE_SIZE, offset
            ))
            .header("Prefer", "count=exact"),
        )
    }

    pub fn export_log(
        &self,
        log_id: &str,
        format: ExportFormat,
    ) -> Result<BackendResponse, ClientError> {
        let mut request = BackendRequest::post(format!(
            "rpc/export_logbook_{}_trip_fn",
            format.as_str()
        ))
        .json(json!({ "_id": log_id }));

        if format == ExportFormat::Gpx {
            request = request.header("Accept", "text/xml");
        }
        self.request(request)
    }

    pub fn get_timelapse(
        &self,
        start_date: &str,
        end_date: &str,
        format: TimelapseFormat,
    ) -> Result<BackendResponse, ClientError> {
        self.request(BackendRequest::get(format!(
            "rpc/{}?start_date={}&end_date={}",
            format.function_name(),
            urlencoding::encode(start_date),
            urlencoding::encode(end_date)
        )))
    }

    // Moorages and stays

    pub fn get_moorages(
        &self,
        stay_type: Option<StayType>,
        limit: Option<u32>,
    ) -> Result<BackendResponse, ClientError> {
        let mut params = vec![format!("limit={}", limit.unwrap_or(DEFAULT_LIMIT))];
        if let Some(stay_type) = stay_type {
            params.push(format!("default_stay_id=eq.{}", stay_type.code()));
        }
        self.request(BackendRequest::get(with_query("moorages_view", &params)))
    }

    pub fn get_moorage(&self, id: &str) -> Result<BackendResponse, ClientError> {
        self.request(BackendRequest::get(by_id("moorage_view", id)))
    }

    pub fn get_moorage_stays(&self, id: &str) -> Result<BackendResponse, ClientError> {
        self.request(BackendRequest::get(by_id("moorages_stays_view", id)))
    }

    pub fn get_stays(
        &self,
        range: &DateRange,
        limit: Option<u32>,
    ) -> Result<BackendResponse, ClientError> {
        let mut params = vec![format!("limit={}", limit.unwrap_or(DEFAULT_LIMIT))];
        params.extend(range.filters("arrived", "departed"));
        self.request(BackendRequest::get(with_query("stays_view", &params)))
    }

    pub fn get_stay(&self, id: &str) -> Result<BackendResponse, ClientError> {
        self.request(BackendRequest::get(by_id("stay_view", id)))
    }

    // Monitoring

    pub fn get_monitoring_live(&self) -> Result<BackendResponse, ClientError> {
        self.request(BackendRequest::get("monitoring_live"))
    }

    pub fn get_monitoring_history(
        &self,
        start_date: &str,
        end_date: &str,
        sensors: &[String],
    ) -> Result<BackendResponse, ClientError> {
        self.request(BackendRequest::post("rpc/monitoring_history_fn").json(json!({
            "start_date": start_date,
            "end_date": end_date,
            "sensors": sensors,
        })))
    }

    // Stats, events, badges

    pub fn get_stats_logs(&self) -> Result<BackendResponse, ClientError> {
        self.request(BackendRequest::get("stats_logs_view"))
    }

    pub fn get_stats_moorages(&self) -> Result<BackendResponse, ClientError> {
        self.request(BackendRequest::get("stats_moorages_view"))
    }

    pub fn get_stats(&self, timeframe: &str) -> Result<BackendResponse, ClientError> {
        self.request(BackendRequest::post("rpc/stats_fn").json(json!({ "timeframe": timeframe })))
    }

    pub fn get_event_logs(&self) -> Result<BackendResponse, ClientError> {
        self.request(BackendRequest::get("eventlogs_view"))
    }

    pub fn get_badges(&self) -> Result<BackendResponse, ClientError> {
        self.request(BackendRequest::get("badges_view"))
    }
}

fn by_id(view: &str, id: &str) -> String {
    format!("{}?id=eq.{}", view, urlencoding::encode(id))
}
