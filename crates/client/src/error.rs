use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request to {endpoint} failed: API request failed: {status} {status_text}")]
    Status {
        endpoint: String,
        status: u16,
        status_text: String,
    },

    #[error("request to {endpoint} failed: {message}")]
    Transport { endpoint: String, message: String },

    #[error("request to {endpoint} failed: invalid JSON body: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("login response did not contain a token")]
    MissingToken,
}

impl ClientError {
    /// HTTP status of the failed exchange, if the backend answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_mentions_code_and_endpoint() {
        let err = ClientError::Status {
            endpoint: "log_view?id=eq.7".to_string(),
            status: 404,
            status_text: "Not Found".to_string(),
        };

        let message = err.to_string();
        assert!(message.contains("404"));
        assert!(message.contains("Not Found"));
        assert!(message.contains("log_view?id=eq.7"));
        assert_eq!(err.status(), Some(404));
    }

    #[test]
    fn transport_error_has_no_status() {
        let err = ClientError::Transport {
            endpoint: "monitoring_live".to_string(),
            message: "connection refused".to_string(),
        };
        assert_eq!(err.status(), None);
        assert_eq!(
            err.to_string(),
            "request to monitoring_live failed: connection refused"
        );
    }
}
