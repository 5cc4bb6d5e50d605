/// Base URL and bearer token shared by every request of one client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    base_url: String,
    token: Option<String>,
}

impl Session {
    pub fn new(base_url: impl Into<String>, token: Option<String>) -> Self {
        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        Self {
            base_url,
            token: token.filter(|t| !t.is_empty()),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn set_token(&mut self, token: impl Into<String>) {
        let token = token.into();
        self.token = if token.is_empty() { None } else { Some(token) };
    }

    /// Absolute URL for a path relative to the API root.
    pub fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path.trim_start_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_gets_trailing_slash() {
        let session = Session::new("https://api.example.com", None);
        assert_eq!(session.base_url(), "https://api.example.com/");

        let session = Session::new("https://api.example.com/", None);
        assert_eq!(session.base_url(), "https://api.example.com/");
    }

    #[test]
    fn url_for_joins_without_double_slash() {
        let session = Session::new("http://localhost:3000", None);
        assert_eq!(
            session.url_for("logs_view?limit=5"),
            "http://localhost:3000/logs_view?limit=5"
        );
        assert_eq!(
            session.url_for("/rpc/login"),
            "http://localhost:3000/rpc/login"
        );
    }

    #[test]
    fn token_can_be_replaced() {
        let mut session = Session::new("http://localhost:3000", None);
        assert_eq!(session.token(), None);

        session.set_token("abc");
        assert_eq!(session.token(), Some("abc"));

        session.set_token("");
        assert_eq!(session.token(), None);
    }

    #[test]
    fn empty_token_is_no_token() {
        let session = Session::new("http://localhost:3000", Some(String::new()));
        assert_eq!(session.token(), None);
    }
}
