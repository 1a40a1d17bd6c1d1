use std::time::Duration;

use crate::publish::PublishReport;

/// Категория ошибки публикации. Позволяет отличить глобальный abort
/// от сбоя одной записи без матча по всем вариантам.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Настройки producer'а, которые backend не поддерживает. Постоянная.
    Config,
    /// Ошибка сети или подключения.
    Io,
    /// Ошибка формата или разбора данных.
    Format,
    /// Отправка не завершилась за заданный таймаут.
    Timeout,
    /// Брокер отклонил запрос (неизвестный topic, ошибка лидера и т.п.).
    Broker,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::Config => f.write_str("config"),
            ErrorKind::Io => f.write_str("io"),
            ErrorKind::Format => f.write_str("format"),
            ErrorKind::Timeout => f.write_str("timeout"),
            ErrorKind::Broker => f.write_str("broker"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("producer config: {0}")]
    Config(String),

    #[error("decode issues: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("encode issue {id}: {source}")]
    Encode {
        id: i64,
        #[source]
        source: serde_json::Error,
    },

    #[error("connect to {address}: {source}")]
    Connect {
        address: String,
        #[source]
        source: Box<PublishError>,
        /// Число декодированных записей, ни одна не отправлена.
        total: usize,
    },

    #[error("send to '{topic}' timed out after {timeout:?}")]
    Timeout { topic: String, timeout: Duration },

    #[error("unknown topic '{0}'")]
    UnknownTopic(String),

    #[error("broker: {0}")]
    Broker(String),
}

impl PublishError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PublishError::Config(_) => ErrorKind::Config,
            PublishError::Decode(_) | PublishError::Encode { .. } => ErrorKind::Format,
            PublishError::Connect { .. } => ErrorKind::Io,
            PublishError::Timeout { .. } => ErrorKind::Timeout,
            PublishError::UnknownTopic(_) | PublishError::Broker(_) => ErrorKind::Broker,
        }
    }

    /// Глобальный abort: прогон не продвинулся и должен остановиться.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            PublishError::Config(_) | PublishError::Decode(_) | PublishError::Connect { .. }
        )
    }

    /// Итог прогона, прерванного этой ошибкой: ничего не отправлено.
    /// Decode → 0 / 0, connect → 0 / число декодированных записей.
    pub fn report(&self) -> PublishReport {
        let total = match self {
            PublishError::Connect { total, .. } => *total,
            _ => 0,
        };
        PublishReport::aborted(total)
    }
}
