use std::time::Duration;

/// Уровень подтверждения produce-запросов.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequiredAcks {
    /// Без подтверждения.
    None,
    /// Подтверждает только лидер.
    Leader,
    /// Подтверждают все in-sync реплики.
    All,
}

impl RequiredAcks {
    /// Значение поля `acks` в ProduceRequest.
    pub fn as_i16(self) -> i16 {
        match self {
            RequiredAcks::None => 0,
            RequiredAcks::Leader => 1,
            RequiredAcks::All => -1,
        }
    }
}

/// Стратегия выбора партиции.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartitionerKind {
    /// FNV-1a по ключу; без ключа случайная партиция.
    Hash,
}

/// Версия протокола Kafka, сравнивается покомпонентно.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct KafkaVersion(pub u8, pub u8, pub u8, pub u8);

impl KafkaVersion {
    /// Первый релиз с record batch v2.
    pub const V0_11_0_0: KafkaVersion = KafkaVersion(0, 11, 0, 0);
    pub const V1_0_0_0: KafkaVersion = KafkaVersion(1, 0, 0, 0);
}

impl std::fmt::Display for KafkaVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}.{}", self.0, self.1, self.2, self.3)
    }
}

/// Настройки producer'а. Строится один раз на прогон из литералов
/// `Default`, дальше только читается; `with_*` возвращают копию.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProducerConfig {
    required_acks: RequiredAcks,
    partitioner: PartitionerKind,
    version: KafkaVersion,
    send_timeout: Duration,
    connect_timeout: Duration,
}

pub const DEFAULT_SEND_TIMEOUT: Duration = Duration::from_secs(15);
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

impl Default for ProducerConfig {
    fn default() -> Self {
        Self {
            required_acks: RequiredAcks::All,
            partitioner: PartitionerKind::Hash,
            version: KafkaVersion::V1_0_0_0,
            send_timeout: DEFAULT_SEND_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }
}

impl ProducerConfig {
    pub fn required_acks(&self) -> RequiredAcks {
        self.required_acks
    }

    pub fn partitioner(&self) -> PartitionerKind {
        self.partitioner
    }

    pub fn version(&self) -> KafkaVersion {
        self.version
    }

    pub fn send_timeout(&self) -> Duration {
        self.send_timeout
    }

    pub fn connect_timeout(&self) -> Duration {
        self.connect_timeout
    }

    pub fn with_required_acks(self, required_acks: RequiredAcks) -> Self {
        Self { required_acks, ..self }
    }

    pub fn with_version(self, version: KafkaVersion) -> Self {
        Self { version, ..self }
    }

    pub fn with_send_timeout(self, send_timeout: Duration) -> Self {
        Self { send_timeout, ..self }
    }

    pub fn with_connect_timeout(self, connect_timeout: Duration) -> Self {
        Self { connect_timeout, ..self }
    }
}
