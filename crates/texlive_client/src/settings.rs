use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:9999";

#[derive(Debug, Clone)]
pub struct ServiceSettings {
    /// Base of the service, e.g. `https://host/texlive-api`.
    pub base_url: String,
    pub connect_timeout: Duration,
    pub queue_timeout: Duration,
    /// Overall limit for one compile request. `None` waits for the service
    /// however long the build takes.
    pub compile_timeout: Option<Duration>,
    pub max_response_bytes: u64,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            connect_timeout: Duration::from_secs(10),
            queue_timeout: Duration::from_secs(5),
            compile_timeout: None,
            max_response_bytes: 256 * 1024 * 1024,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid endpoint {url}: {message}")]
pub struct InvalidEndpoint {
    pub url: String,
    pub message: String,
}

impl ServiceSettings {
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// `{base}/{name}`, tolerating a trailing slash on the base.
    pub fn endpoint(&self, name: &str) -> Result<reqwest::Url, InvalidEndpoint> {
        let url = format!("{}/{}", self.base_url.trim_end_matches('/'), name);
        reqwest::Url::parse(&url).map_err(|err| InvalidEndpoint {
            url,
            message: err.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::ServiceSettings;

    #[test]
    fn endpoint_joins_base_path() {
        let settings = ServiceSettings::with_base_url("https://example.com/texlive-api/");
        assert_eq!(
            settings.endpoint("compile").unwrap().as_str(),
            "https://example.com/texlive-api/compile"
        );
    }

    #[test]
    fn compile_has_no_overall_limit_by_default() {
        let settings = ServiceSettings::default();
        assert_eq!(settings.compile_timeout, None);
        assert_eq!(settings.connect_timeout, std::time::Duration::from_secs(10));
    }

    #[test]
    fn relative_base_is_rejected() {
        let settings = ServiceSettings::with_base_url("/texlive-api");
        let err = settings.endpoint("queue").unwrap_err();
        assert_eq!(err.url, "/texlive-api/queue");
    }
}
