use std::ops::Deref;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;

use lapin::{
    BasicProperties, Channel, Connection,
    options::{BasicPublishOptions, QueueDeclareOptions},
    types::FieldTable,
};
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

use super::{QueueError, QueueSystem};

const PERSISTENT: u8 = 2;

/// Hands out one channel per in-flight operation over a single shared,
/// lazily re-established connection.
#[derive(Clone)]
pub struct ChannelPool {
    inner: Arc<Inner>,
}

struct Inner {
    system: QueueSystem,
    connection: tokio::sync::Mutex<Option<Arc<Connection>>>,
    idle: Mutex<Vec<Channel>>,
    last_failure: Mutex<Option<Instant>>,
    permits: Arc<Semaphore>,
}

impl ChannelPool {
    pub fn new(system: QueueSystem, max_channels: usize) -> Self {
        Self {
            inner: Arc::new(Inner {
                system,
                connection: tokio::sync::Mutex::new(None),
                idle: Mutex::new(Vec::new()),
                last_failure: Mutex::new(None),
                permits: Arc::new(Semaphore::new(max_channels.max(1))),
            }),
        }
    }

    pub fn system(&self) -> &QueueSystem {
        &self.inner.system
    }

    /// Waits for a free slot and returns an open channel.
    pub async fn acquire(&self) -> Result<PooledChannel, QueueError> {
        let permit = self
            .inner
            .permits
            .clone()
            .acquire_owned()
            .await
            .map_err(|_| QueueError::Unavailable)?;

        let channel = match self.take_idle() {
            Some(channel) => channel,
            None => self.connection().await?.create_channel().await?,
        };

        Ok(PooledChannel {
            channel,
            inner: self.inner.clone(),
            _permit: permit,
        })
    }

    /// Last known connection state. Never dials the broker.
    pub fn is_connected(&self) -> bool {
        self.inner
            .connection
            .try_lock()
            .ok()
            .and_then(|current| current.as_ref().map(|c| c.status().connected()))
            .unwrap_or(false)
    }

    pub async fn declare_durable(&self, queues: &[&str]) -> Result<(), QueueError> {
        let channel = self.acquire().await?;

        for queue in queues {
            channel
                .queue_declare(
                    queue,
                    QueueDeclareOptions {
                        durable: true,
                        ..QueueDeclareOptions::default()
                    },
                    FieldTable::default(),
                )
                .await?;
            tracing::info!(queue = %queue, "Declared durable queue");
        }

        Ok(())
    }

    /// Publishes a persistent JSON message on the default exchange.
    pub async fn publish_json(
        &self,
        queue: &str,
        payload: &serde_json::Value,
    ) -> Result<(), QueueError> {
        let body = serde_json::to_vec(payload)?;
        let channel = self.acquire().await?;

        channel
            .basic_publish(
                "",
                queue,
                BasicPublishOptions::default(),
                &body,
                BasicProperties::default()
                    .with_content_type("application/json".into())
                    .with_delivery_mode(PERSISTENT),
            )
            .await?
            .await?;

        Ok(())
    }

    pub async fn close(&self) {
        self.inner
            .idle
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();

        if let Some(connection) = self.inner.connection.lock().await.take() {
            if let Err(e) = connection.close(200, "shutdown").await {
                tracing::warn!(error = %e, "Failed to close RabbitMQ connection");
            }
        }
    }

    fn take_idle(&self) -> Option<Channel> {
        let mut idle = self
            .inner
            .idle
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        while let Some(channel) = idle.pop() {
            if channel.status().connected() {
                return Some(channel);
            }
        }

        None
    }

    /// Returns the shared connection, dialing at most once for every waiter
    /// queued behind an attempt. After a failure, callers fail fast until
    /// `retry_delay` has elapsed.
    async fn connection(&self) -> Result<Arc<Connection>, QueueError> {
        let requested_at = Instant::now();

        if self.cooling_down(requested_at) {
            return Err(QueueError::Unavailable);
        }

        let mut current = self.inner.connection.lock().await;

        if let Some(connection) = current.as_ref() {
            if connection.status().connected() {
                return Ok(connection.clone());
            }
            tracing::warn!("RabbitMQ connection lost, reconnecting");
        }

        if self.failed_since(requested_at) {
            return Err(QueueError::Unavailable);
        }

        self.inner
            .idle
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();

        let Some(connection) = self.inner.system.get_connection().await else {
            *self.last_failure() = Some(Instant::now());
            *current = None;
            return Err(QueueError::Unavailable);
        };

        *self.last_failure() = None;
        let connection = Arc::new(connection);
        *current = Some(connection.clone());

        Ok(connection)
    }

    fn last_failure(&self) -> std::sync::MutexGuard<'_, Option<Instant>> {
        self.inner
            .last_failure
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn cooling_down(&self, now: Instant) -> bool {
        let cooldown = self.inner.system.settings().retry_delay;

        self.last_failure()
            .is_some_and(|failed_at| now.duration_since(failed_at) < cooldown)
    }

    /// True when an attempt that ended after `instant` failed.
    fn failed_since(&self, instant: Instant) -> bool {
        self.last_failure()
            .is_some_and(|failed_at| failed_at >= instant)
    }
}

/// A channel borrowed from a [`ChannelPool`]; returned to the pool on drop while still open.
pub struct PooledChannel {
    channel: Channel,
    inner: Arc<Inner>,
    _permit: OwnedSemaphorePermit,
}

impl Deref for PooledChannel {
    type Target = Channel;

    fn deref(&self) -> &Self::Target {
        &self.channel
    }
}

impl Drop for PooledChannel {
    fn drop(&mut self) {
        if self.channel.status().connected() {
            self.inner
                .idle
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(self.channel.clone());
        }
    }
}
