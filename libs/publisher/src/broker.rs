use std::future::Future;
use std::pin::Pin;

use crate::config::ProducerConfig;
use crate::error::PublishError;

// ════════════════════════════════════════════════════════════════
//  Broker Traits
// ════════════════════════════════════════════════════════════════

/// Подтверждённая брокером запись.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delivery {
    pub partition: i32,
    pub offset: i64,
}

/// Фабрика producer-соединений.
///
/// Реализации: `KafkaConnector` (rskafka), фейковые брокеры в тестах.
pub trait BrokerConnector: Send + Sync {
    /// Открыть одно соединение с брокером по адресу `host:port`.
    /// Настройки, которые backend не умеет выполнить, дают ошибку `Config`.
    #[allow(clippy::type_complexity)]
    fn connect<'a>(
        &'a self,
        address: &'a str,
        config: &'a ProducerConfig,
    ) -> Pin<Box<dyn Future<Output = Result<Box<dyn ProducerConnection>, PublishError>> + Send + 'a>>;
}

/// Открытое producer-соединение.
pub trait ProducerConnection: Send {
    /// Синхронно (с ожиданием ack) отправить одно сообщение без ключа и
    /// заголовков. Таймаут накладывает вызывающая сторона.
    fn send<'a>(
        &'a mut self,
        topic: &'a str,
        payload: Vec<u8>,
    ) -> Pin<Box<dyn Future<Output = Result<Delivery, PublishError>> + Send + 'a>>;

    /// Освободить соединение. Вызывается ровно один раз.
    fn close(&mut self);
}

/// Владеет соединением и закрывает его при выходе из scope, на любом пути.
pub(crate) struct ConnectionGuard {
    conn: Box<dyn ProducerConnection>,
}

impl ConnectionGuard {
    pub(crate) fn new(conn: Box<dyn ProducerConnection>) -> Self {
        Self { conn }
    }

    pub(crate) fn get_mut(&mut self) -> &mut dyn ProducerConnection {
        &mut *self.conn
    }
}

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        self.conn.close();
        tracing::debug!("producer connection closed");
    }
}
