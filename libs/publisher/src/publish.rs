use crate::broker::{BrokerConnector, ConnectionGuard};
use crate::config::ProducerConfig;
use crate::error::PublishError;
use crate::record::IssueBatch;

// ═══════════════════════════════════════════════════════════════
//  Outcome / report
// ═══════════════════════════════════════════════════════════════

/// Результат по одной записи.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    Delivered { partition: i32, offset: i64 },
    EncodeFailed(String),
    SendFailed(String),
}

impl DeliveryOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, DeliveryOutcome::Delivered { .. })
    }
}

/// Итог прогона: сколько отправлено из скольких.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublishReport {
    pub sent: usize,
    pub total: usize,
    /// По одному на запись, в порядке батча. Пусто при глобальной ошибке.
    pub outcomes: Vec<DeliveryOutcome>,
}

impl PublishReport {
    pub(crate) fn aborted(total: usize) -> Self {
        Self { sent: 0, total, outcomes: Vec::new() }
    }

    fn record(&mut self, outcome: DeliveryOutcome) {
        self.total += 1;
        if outcome.is_delivered() {
            self.sent += 1;
        }
        self.outcomes.push(outcome);
    }

    pub fn failed(&self) -> usize {
        self.total - self.sent
    }
}

impl std::fmt::Display for PublishReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} / {} messages sent", self.sent, self.total)
    }
}

// ═══════════════════════════════════════════════════════════════
//  Publish
// ═══════════════════════════════════════════════════════════════

/// Декодировать `raw` как JSON-массив issues и отправить каждую в `topic`
/// через одно соединение с брокером `address`.
///
/// Ошибка decode или connect прерывает прогон целиком (ничего не
/// отправлено). Ошибки encode/send по отдельной записи логируются и
/// учитываются в отчёте, цикл продолжается. Повторных попыток нет.
pub async fn publish(
    connector: &dyn BrokerConnector,
    raw: &[u8],
    address: &str,
    topic: &str,
    config: &ProducerConfig,
) -> Result<PublishReport, PublishError> {
    let batch = IssueBatch::decode(raw)?;
    tracing::info!(issues = batch.len(), "decoded issues");

    let conn = connector
        .connect(address, config)
        .await
        .map_err(|e| PublishError::Connect {
            address: address.to_string(),
            source: Box::new(e),
            total: batch.len(),
        })?;
    let mut guard = ConnectionGuard::new(conn);

    let timeout = config.send_timeout();
    let mut report = PublishReport::default();

    for issue in &batch {
        let payload = match issue.encode() {
            Ok(p) => p,
            Err(e) => {
                tracing::warn!(id = issue.id, error = %e, "encode failed, skipping");
                report.record(DeliveryOutcome::EncodeFailed(e.to_string()));
                continue;
            }
        };

        let result = match tokio::time::timeout(timeout, guard.get_mut().send(topic, payload)).await {
            Ok(r) => r,
            Err(_) => Err(PublishError::Timeout { topic: topic.to_string(), timeout }),
        };

        match result {
            Ok(d) => {
                tracing::debug!(id = issue.id, partition = d.partition, offset = d.offset, "delivered");
                report.record(DeliveryOutcome::Delivered { partition: d.partition, offset: d.offset });
            }
            Err(e) => {
                tracing::warn!(id = issue.id, %topic, kind = %e.kind(), error = %e, "send failed");
                report.record(DeliveryOutcome::SendFailed(e.to_string()));
            }
        }
    }

    drop(guard);
    tracing::info!(sent = report.sent, failed = report.failed(), %topic, "publish complete");
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_line() {
        let mut r = PublishReport::default();
        r.record(DeliveryOutcome::Delivered { partition: 0, offset: 1 });
        r.record(DeliveryOutcome::SendFailed("x".into()));
        assert_eq!(r.to_string(), "1 / 2 messages sent");
        assert_eq!(r.failed(), 1);
    }

    #[test]
    fn empty_summary_line() {
        assert_eq!(PublishReport::default().to_string(), "0 / 0 messages sent");
    }

    #[test]
    fn aborted_reports() {
        let decode = IssueBatch::decode(b"not json").unwrap_err();
        assert_eq!(decode.report().to_string(), "0 / 0 messages sent");

        let connect = PublishError::Connect {
            address: "localhost:9092".into(),
            source: Box::new(PublishError::Broker("connection refused".into())),
            total: 4,
        };
        assert_eq!(connect.report().to_string(), "0 / 4 messages sent");
        assert!(connect.is_fatal());
        assert_eq!(
            connect.to_string(),
            "connect to localhost:9092: broker: connection refused"
        );
        let cause = std::error::Error::source(&connect).unwrap();
        assert_eq!(cause.to_string(), "broker: connection refused");
    }
}
