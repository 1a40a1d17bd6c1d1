//! Источник данных: один GET к REST API, возвращает тело ответа как есть.

/// Список issues репозитория elastic/beats.
pub const DEFAULT_SOURCE_URL: &str = "https://api.github.com/repos/elastic/beats/issues";

const USER_AGENT: &str = concat!("kafkawrite/", env!("CARGO_PKG_VERSION"));
const ACCEPT: &str = "application/vnd.github+json";

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("http client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("fetch {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("couldn't read {url}: response code {status}")]
    Status { url: String, status: u16 },
}

impl SourceError {
    /// HTTP статус для `Status`, иначе None.
    pub fn status(&self) -> Option<u16> {
        match self {
            SourceError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// HTTP-клиент к списку issues.
pub struct SourceReader {
    http: reqwest::Client,
    url: String,
}

impl SourceReader {
    pub fn new(url: impl Into<String>) -> Result<Self, SourceError> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(SourceError::Client)?;
        Ok(Self { http, url: url.into() })
    }

    /// Выполнить один GET. 2xx → тело ответа, иначе ошибка. Без ретраев.
    ///
    /// Response уходит из scope до возврата на любом пути, соединение
    /// освобождается reqwest'ом.
    pub async fn fetch(&self) -> Result<Vec<u8>, SourceError> {
        let resp = self
            .http
            .get(&self.url)
            .header(reqwest::header::ACCEPT, ACCEPT)
            .send()
            .await
            .map_err(|e| self.transport(e))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                url: self.url.clone(),
                status: status.as_u16(),
            });
        }

        let body = resp.bytes().await.map_err(|e| self.transport(e))?;
        tracing::info!(url = %self.url, bytes = body.len(), "fetched source data");
        Ok(body.to_vec())
    }

    fn transport(&self, source: reqwest::Error) -> SourceError {
        SourceError::Transport {
            url: self.url.clone(),
            source,
        }
    }
}
