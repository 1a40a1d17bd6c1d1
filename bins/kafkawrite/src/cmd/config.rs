use std::path::Path;
use std::time::Duration;

use clap::Args;
use serde::Deserialize;

use publisher::ProducerConfig;

use super::error::KafkawriteError;

/// Файл конфигурации по умолчанию; его отсутствие не ошибка.
pub const DEFAULT_CONFIG: &str = "kafkawrite.toml";

pub const USAGE: &str =
    "Host and topic must be provided.\nUsage: kafkawrite --host <host> --topic <topic>";

// ═══════════════════════════════════════════════════════════════
//  Config file (TOML)
// ═══════════════════════════════════════════════════════════════

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub host: Option<String>,
    pub topic: Option<String>,
    pub source_url: Option<String>,
    pub send_timeout_ms: Option<u64>,
    pub connect_timeout_ms: Option<u64>,
}

pub fn load_config(path: &str) -> Result<Config, KafkawriteError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| KafkawriteError::Config(format!("cannot read config {path}: {e}")))?;
    parse_config(path, &content)
}

fn parse_config(path: &str, content: &str) -> Result<Config, KafkawriteError> {
    toml::from_str(content).map_err(|e| KafkawriteError::Config(format!("bad config {path}: {e}")))
}

// ═══════════════════════════════════════════════════════════════
//  CLI args
// ═══════════════════════════════════════════════════════════════

#[derive(Args, Clone, Debug, Default)]
pub struct WriteArgs {
    /// Путь к kafkawrite.toml
    #[arg(long, default_value = DEFAULT_CONFIG, env = "KAFKAWRITE_CONFIG")]
    pub config: String,

    /// Адрес брокера Kafka, host:port
    #[arg(long, env = "KAFKAWRITE_HOST")]
    pub host: Option<String>,

    /// Topic, в который пишутся сообщения
    #[arg(long, env = "KAFKAWRITE_TOPIC")]
    pub topic: Option<String>,

    /// URL источника (по умолчанию issues elastic/beats)
    #[arg(long, env = "KAFKAWRITE_SOURCE_URL")]
    pub source_url: Option<String>,

    /// Таймаут на одну отправку, мс
    #[arg(long, env = "KAFKAWRITE_SEND_TIMEOUT_MS")]
    pub send_timeout_ms: Option<u64>,

    /// Таймаут подключения к брокеру, мс
    #[arg(long, env = "KAFKAWRITE_CONNECT_TIMEOUT_MS")]
    pub connect_timeout_ms: Option<u64>,
}

// ═══════════════════════════════════════════════════════════════
//  Effective: merged config
// ═══════════════════════════════════════════════════════════════

/// Итоговая конфигурация после мержа: kafkawrite.toml < env/CLI
#[derive(Debug)]
pub struct Effective {
    pub host: String,
    pub topic: String,
    pub source_url: String,
    pub producer: ProducerConfig,
}

impl Effective {
    pub fn new(args: &WriteArgs) -> Result<Self, KafkawriteError> {
        let cfg = match load_config(&args.config) {
            Ok(c) => c,
            // явно заданный путь (--config / KAFKAWRITE_CONFIG) обязан существовать
            Err(_) if args.config == DEFAULT_CONFIG && !Path::new(DEFAULT_CONFIG).exists() => {
                Config::default()
            }
            Err(e) => return Err(e),
        };
        Self::merge(args, cfg)
    }

    fn merge(args: &WriteArgs, cfg: Config) -> Result<Self, KafkawriteError> {
        let host = non_empty(args.host.clone().or(cfg.host));
        let topic = non_empty(args.topic.clone().or(cfg.topic));
        let (Some(host), Some(topic)) = (host, topic) else {
            return Err(KafkawriteError::Config(USAGE.into()));
        };

        let mut producer = ProducerConfig::default();
        if let Some(ms) = args.send_timeout_ms.or(cfg.send_timeout_ms) {
            producer = producer.with_send_timeout(Duration::from_millis(ms));
        }
        if let Some(ms) = args.connect_timeout_ms.or(cfg.connect_timeout_ms) {
            producer = producer.with_connect_timeout(Duration::from_millis(ms));
        }

        Ok(Self {
            host,
            topic,
            source_url: args
                .source_url
                .clone()
                .or(cfg.source_url)
                .unwrap_or_else(|| issue_source::DEFAULT_SOURCE_URL.to_string()),
            producer,
        })
    }
}

fn non_empty(v: Option<String>) -> Option<String> {
    v.filter(|s| !s.trim().is_empty())
}
