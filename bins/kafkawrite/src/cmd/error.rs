#[derive(Debug, thiserror::Error)]
pub enum KafkawriteError {
    #[error("{0}")]
    Config(String),

    #[error(transparent)]
    Source(#[from] issue_source::SourceError),

    #[error(transparent)]
    Publish(#[from] publisher::PublishError),
}

/// Текст ошибки вместе с цепочкой `source()`: `outer: cause: root`.
/// Причина, уже вошедшая в текст внешней ошибки, не повторяется.
pub fn error_chain(err: &dyn std::error::Error) -> String {
    let mut out = err.to_string();
    let mut cause = err.source();
    while let Some(e) = cause {
        let text = e.to_string();
        if !out.contains(&text) {
            out.push_str(": ");
            out.push_str(&text);
        }
        cause = e.source();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, thiserror::Error)]
    #[error("fetch http://x/issues")]
    struct Outer(#[source] std::io::Error);

    #[test]
    fn chain_appends_causes() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "connection refused");
        let err = Outer(io);
        assert_eq!(error_chain(&err), "fetch http://x/issues: connection refused");
    }

    #[test]
    fn chain_skips_cause_already_in_message() {
        let err = KafkawriteError::from(publisher::PublishError::Connect {
            address: "b:9092".into(),
            source: Box::new(publisher::PublishError::Broker("connection refused".into())),
            total: 3,
        });
        assert_eq!(error_chain(&err), "connect to b:9092: broker: connection refused");
    }
}
