pub mod config;
pub mod error;
mod broker;
mod kafka;
mod partitioner;
mod publish;
mod record;

pub use broker::{BrokerConnector, Delivery, ProducerConnection};
pub use config::{KafkaVersion, PartitionerKind, ProducerConfig, RequiredAcks};
pub use error::{ErrorKind, PublishError};
pub use kafka::{KafkaConnector, KafkaProducer};
pub use partitioner::HashPartitioner;
pub use publish::{DeliveryOutcome, PublishReport, publish};
pub use record::{Issue, IssueBatch};
