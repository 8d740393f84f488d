use std::sync::Arc;

use tokio::sync::mpsc;

use crate::action::Action;
use crate::client::{decode_history_page, HistoryClient};
use crate::store::LoadRequest;

#[derive(Debug)]
pub enum CliRequest {
    LoadHistory(LoadRequest),
}

#[derive(Clone)]
pub struct CliHandle {
    tx: mpsc::UnboundedSender<CliRequest>,
}

impl CliHandle {
    pub fn send(&self, request: CliRequest) {
        if self.tx.send(request).is_err() {
            tracing::warn!("history worker is gone, request dropped");
        }
    }
}

/// Runs fetches one at a time off the UI loop and reports each outcome as
/// an [`Action`].
pub struct CliWorker {
    client: Arc<dyn HistoryClient>,
    rx: mpsc::UnboundedReceiver<CliRequest>,
    action_tx: mpsc::UnboundedSender<Action>,
}

impl CliWorker {
    pub fn new(
        client: Arc<dyn HistoryClient>,
        action_tx: mpsc::UnboundedSender<Action>,
    ) -> (Self, CliHandle) {
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = CliHandle { tx };
        let worker = Self {
            client,
            rx,
            action_tx,
        };
        (worker, handle)
    }

    pub async fn run(mut self) {
        while let Some(request) = self.rx.recv().await {
            let action = self.process(request).await;
            if self.action_tx.send(action).is_err() {
                break;
            }
        }
        tracing::debug!("history worker stopped");
    }

    async fn process(&self, request: CliRequest) -> Action {
        match request {
            CliRequest::LoadHistory(LoadRequest { ticket, query }) => {
                tracing::debug!(
                    record = %query.identity,
                    page = ticket.page(),
                    append = ticket.is_append(),
                    "loading history"
                );
                let result = self
                    .client
                    .fetch_history(&query)
                    .await
                    .and_then(decode_history_page);
                match result {
                    Ok(page) => Action::HistoryLoaded(ticket, page),
                    Err(e) => Action::HistoryLoadFailed(ticket, e.to_string()),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{ClientError, ClientResult, HistoryQuery};
    use crate::domain::RecordIdentity;
    use crate::store::HistoryStore;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    struct ScriptedClient {
        responses: Mutex<Vec<ClientResult<serde_json::Value>>>,
        seen: Mutex<Vec<HistoryQuery>>,
    }

    impl ScriptedClient {
        fn new(responses: Vec<ClientResult<serde_json::Value>>) -> Self {
            Self {
                responses: Mutex::new(responses),
                seen: Mutex::new(vec![]),
            }
        }
    }

    #[async_trait]
    impl HistoryClient for ScriptedClient {
        async fn fetch_history(&self, query: &HistoryQuery) -> ClientResult<serde_json::Value> {
            self.seen.lock().expect("lock").push(query.clone());
            self.responses.lock().expect("lock").remove(0)
        }
    }

    async fn roundtrip(client: Arc<ScriptedClient>, request: LoadRequest) -> Action {
        let (action_tx, mut action_rx) = mpsc::unbounded_channel();
        let (worker, handle) = CliWorker::new(client, action_tx);
        tokio::spawn(worker.run());
        handle.send(CliRequest::LoadHistory(request));
        action_rx.recv().await.expect("worker replied")
    }

    #[tokio::test]
    async fn successful_fetch_reports_decoded_page() {
        let client = Arc::new(ScriptedClient::new(vec![Ok(json!({
            "data": {
                "records": [{
                    "id": 1,
                    "recordId": "rec-1",
                    "fieldId": "__all__",
                    "action": "create",
                    "changedAt": "2026-10-18T09:00:00Z"
                }],
                "totalPages": 3
            }
        }))]));
        let mut store = HistoryStore::new();
        let request = store.reset(RecordIdentity::new("b", "t", "rec-1"));

        let action = roundtrip(client.clone(), request).await;
        let Action::HistoryLoaded(ticket, page) = action else {
            panic!("expected HistoryLoaded, got {:?}", action);
        };
        assert_eq!(page.total_pages, Some(3));
        assert_eq!(ticket.page(), 1);
        assert!(!ticket.is_append());
        assert!(store.apply_loaded(ticket, page));
        assert_eq!(store.entries().len(), 1);

        let seen = client.seen.lock().expect("lock");
        assert_eq!(seen[0].page, 1);
        assert_eq!(seen[0].page_size, 50);
    }

    #[tokio::test]
    async fn transport_and_payload_errors_become_failures() {
        let client = Arc::new(ScriptedClient::new(vec![
            Err(ClientError::Timeout),
            Ok(json!({ "unexpected": true })),
        ]));
        let mut store = HistoryStore::new();

        let first = store.reset(RecordIdentity::new("b", "t", "r"));
        let action = roundtrip(client.clone(), first).await;
        assert!(matches!(action, Action::HistoryLoadFailed(_, ref msg) if msg == "timeout"));

        let second = store.reset(RecordIdentity::new("b", "t", "r"));
        let action = roundtrip(client, second).await;
        assert!(matches!(action, Action::HistoryLoadFailed(_, ref msg) if msg.starts_with("parse error")));
    }
}
