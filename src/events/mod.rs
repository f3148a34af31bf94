use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::models::shipment::ShipmentStatus;

/// Domain events emitted after successful state changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    // Shipment events
    ShipmentCreated(Uuid),
    ShipmentUpdated(Uuid),
    ShipmentStatusChanged {
        shipment_id: Uuid,
        old_status: ShipmentStatus,
        new_status: ShipmentStatus,
    },
    ShipmentDelivered(Uuid),
    ShipmentDeleted(Uuid),

    // Back-office events
    BranchCreated(Uuid),
    BranchUpdated(Uuid),
    DriverCreated(Uuid),
    DriverUpdated(Uuid),
    CustomerCreated(Uuid),
    CustomerUpdated(Uuid),
    PricingRuleChanged(Uuid),
}

#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    /// Creates a new EventSender
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Sends an event asynchronously
    pub async fn send(&self, event: Event) -> Result<(), String> {
        self.sender
            .send(event)
            .await
            .map_err(|e| format!("Failed to send event: {}", e))
    }

    /// Sends an event, logging instead of failing when the consumer is
    /// gone. State changes must not be rolled back because nobody is
    /// listening.
    pub async fn send_or_log(&self, event: Event) {
        if let Err(err) = self.send(event.clone()).await {
            warn!(?event, "event dropped: {}", err);
        }
    }
}

/// Background consumer draining the event channel.
pub async fn process_events(mut receiver: mpsc::Receiver<Event>) {
    while let Some(event) = receiver.recv().await {
        match &event {
            Event::ShipmentStatusChanged {
                shipment_id,
                old_status,
                new_status,
            } => {
                info!(
                    %shipment_id,
                    %old_status,
                    %new_status,
                    "shipment status changed"
                );
            }
            other => info!(event = ?other, "domain event"),
        }
    }
    info!("event channel closed; consumer exiting");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn send_delivers_to_the_consumer() {
        let (tx, mut rx) = mpsc::channel(4);
        let sender = EventSender::new(tx);
        sender
            .send(Event::ShipmentCreated(Uuid::nil()))
            .await
            .unwrap();
        assert!(matches!(
            rx.recv().await,
            Some(Event::ShipmentCreated(id)) if id.is_nil()
        ));
    }

    #[tokio::test]
    async fn send_or_log_swallows_a_closed_channel() {
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        let sender = EventSender::new(tx);
        // Must not panic or error out.
        sender.send_or_log(Event::ShipmentDeleted(Uuid::nil())).await;
    }
}
