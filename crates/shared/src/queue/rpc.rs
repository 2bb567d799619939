use std::time::Duration;

use futures::StreamExt;
use lapin::{
    BasicProperties, Consumer,
    options::{BasicCancelOptions, BasicConsumeOptions, BasicPublishOptions, QueueDeclareOptions},
    types::FieldTable,
};
use serde_json::Value;
use uuid::Uuid;

use super::{ChannelPool, QueueError};

/// Request/reply over the broker: publish with a correlation id and a private
/// reply queue, then wait for the matching answer.
#[derive(Clone)]
pub struct RpcClient {
    pool: ChannelPool,
    timeout: Duration,
}

impl RpcClient {
    pub fn new(pool: ChannelPool, timeout: Duration) -> Self {
        Self { pool, timeout }
    }

    pub async fn call(&self, queue: &str, request: &Value) -> Result<Value, QueueError> {
        let payload = serde_json::to_vec(request)?;
        let channel = self.pool.acquire().await?;

        let reply_queue = channel
            .queue_declare(
                "",
                QueueDeclareOptions {
                    exclusive: true,
                    auto_delete: true,
                    ..QueueDeclareOptions::default()
                },
                FieldTable::default(),
            )
            .await?;

        let correlation_id = Uuid::new_v4().to_string();
        let consumer_tag = format!("rpc-{correlation_id}");

        let mut consumer = channel
            .basic_consume(
                reply_queue.name().as_str(),
                &consumer_tag,
                BasicConsumeOptions {
                    no_ack: true,
                    ..BasicConsumeOptions::default()
                },
                FieldTable::default(),
            )
            .await?;

        let outcome: Result<Vec<u8>, QueueError> = async {
            channel
                .basic_publish(
                    "",
                    queue,
                    BasicPublishOptions::default(),
                    &payload,
                    BasicProperties::default()
                        .with_content_type("application/json".into())
                        .with_correlation_id(correlation_id.as_str().into())
                        .with_reply_to(reply_queue.name().clone()),
                )
                .await?
                .await?;

            tracing::debug!(queue = %queue, correlation_id = %correlation_id, "RPC request published");

            tokio::time::timeout(self.timeout, wait_for_reply(&mut consumer, &correlation_id))
                .await
                .map_err(|_| QueueError::Timeout)?
        }
        .await;

        if let Err(e) = channel
            .basic_cancel(&consumer_tag, BasicCancelOptions::default())
            .await
        {
            tracing::warn!(error = %e, consumer_tag = %consumer_tag, "Failed to cancel RPC consumer");
        }

        let reply = outcome.inspect_err(|e| {
            tracing::error!(queue = %queue, correlation_id = %correlation_id, error = %e, "RPC call failed");
        })?;

        Ok(parse_reply(&reply))
    }
}

async fn wait_for_reply(consumer: &mut Consumer, correlation_id: &str) -> Result<Vec<u8>, QueueError> {
    while let Some(delivery) = consumer.next().await {
        let delivery = delivery?;

        if is_reply_to(&delivery.properties, correlation_id) {
            return Ok(delivery.data);
        }

        tracing::debug!("Discarding reply with a foreign correlation id");
    }

    Err(QueueError::NoReply)
}

fn is_reply_to(properties: &BasicProperties, correlation_id: &str) -> bool {
    properties
        .correlation_id()
        .as_ref()
        .is_some_and(|id| id.as_str() == correlation_id)
}

/// Worker replies are JSON; anything else is handed back as a JSON string.
pub fn parse_reply(body: &[u8]) -> Value {
    serde_json::from_slice(body)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(body).into_owned()))
}
