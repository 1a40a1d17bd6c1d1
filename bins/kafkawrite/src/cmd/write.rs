use issue_source::SourceReader;
use publisher::{KafkaConnector, PublishReport, publish};

use super::config::Effective;
use super::error::KafkawriteError;

/// Один прогон: fetch → decode → connect → send по одной → close.
pub async fn run(args: &Effective) -> Result<PublishReport, KafkawriteError> {
    let reader = SourceReader::new(&args.source_url)?;
    let raw = reader.fetch().await?;

    tracing::info!(host = %args.host, topic = %args.topic, "publishing");
    let connector = KafkaConnector::default();
    let report = publish(&connector, &raw, &args.host, &args.topic, &args.producer).await?;
    Ok(report)
}
