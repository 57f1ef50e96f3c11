use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{info, warn};
use uuid::Uuid;

/// Domain events published by the services on every mutation. Consumed
/// in-process; downstream integrations subscribe at the channel boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    ItemCreated {
        tenant_id: String,
        item_id: Uuid,
    },
    ItemUpdated {
        tenant_id: String,
        item_id: Uuid,
    },
    ItemDeactivated {
        tenant_id: String,
        item_id: Uuid,
    },
    WarehouseCreated {
        tenant_id: String,
        warehouse_id: Uuid,
    },
    WarehouseUpdated {
        tenant_id: String,
        warehouse_id: Uuid,
    },
    WarehouseDeactivated {
        tenant_id: String,
        warehouse_id: Uuid,
    },
    SetupCreated {
        tenant_id: String,
        setup_id: Uuid,
        item_id: Uuid,
        warehouse_id: Uuid,
    },
    SetupUpdated {
        tenant_id: String,
        setup_id: Uuid,
    },
    SetupDeactivated {
        tenant_id: String,
        setup_id: Uuid,
    },
    SetupsBulkUpdated {
        tenant_id: String,
        setup_ids: Vec<Uuid>,
    },
    SetupDuplicated {
        tenant_id: String,
        source_setup_id: Uuid,
        created_setup_ids: Vec<Uuid>,
    },
}

#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
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
}

/// Builds a connected sender/receiver pair with a bounded buffer.
pub fn channel(buffer: usize) -> (EventSender, mpsc::Receiver<Event>) {
    let (tx, rx) = mpsc::channel(buffer);
    (EventSender::new(tx), rx)
}

/// Drains the event channel, logging each event. Runs until every sender is
/// dropped.
pub async fn process_events(mut receiver: mpsc::Receiver<Event>) {
    while let Some(event) = receiver.recv().await {
        match serde_json::to_string(&event) {
            Ok(payload) => info!(event = %payload, "domain event"),
            Err(e) => warn!(error = %e, "failed to serialize domain event"),
        }
    }
    info!("event channel closed; processor exiting");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn send_and_receive_round_trip() {
        let (sender, mut rx) = channel(4);
        let setup_id = Uuid::new_v4();
        sender
            .send(Event::SetupDeactivated {
                tenant_id: "acme".into(),
                setup_id,
            })
            .await
            .unwrap();

        match rx.recv().await {
            Some(Event::SetupDeactivated {
                tenant_id,
                setup_id: got,
            }) => {
                assert_eq!(tenant_id, "acme");
                assert_eq!(got, setup_id);
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[tokio::test]
    async fn send_fails_after_receiver_dropped() {
        let (sender, rx) = channel(1);
        drop(rx);
        let result = sender
            .send(Event::ItemCreated {
                tenant_id: "acme".into(),
                item_id: Uuid::new_v4(),
            })
            .await;
        assert!(result.is_err());
    }
}
