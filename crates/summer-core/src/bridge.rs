//! Request/event bridge between the UI peer and the table store
//!
//! Requests are consumed from one channel, one at a time, and each one is
//! answered by exactly one event on the other.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use summer_tables::Table;

use crate::app::App;
use crate::error::CoreError;
use crate::Result;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Request {
    Get { name: String },
    /// `contents` is the JSON encoding of the record to append
    Add { name: String, contents: String },
    Delete { name: String, uuid: String },
    Export,
    /// `contents` is an export body
    Import { contents: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestKind {
    Get,
    Add,
    Delete,
    Export,
    Import,
    Unknown,
}

impl Request {
    pub fn kind(&self) -> RequestKind {
        match self {
            Request::Get { .. } => RequestKind::Get,
            Request::Add { .. } => RequestKind::Add,
            Request::Delete { .. } => RequestKind::Delete,
            Request::Export => RequestKind::Export,
            Request::Import { .. } => RequestKind::Import,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// Current contents of a table, as a JSON string
    Recv { name: String, contents: String },
    Exported { file_name: String, path: PathBuf },
    Imported { tables: Vec<String> },
    Failed { request: RequestKind, error: String },
}

impl Event {
    pub fn recv(table: &Table) -> Result<Self> {
        Ok(Event::Recv {
            name: table.name.clone(),
            contents: table.contents_json()?,
        })
    }

    pub fn failed(request: RequestKind, error: impl ToString) -> Self {
        Event::Failed {
            request,
            error: error.to_string(),
        }
    }
}

/// Running bridge task plus both ends the UI side holds.
pub struct Bridge {
    requests: mpsc::Sender<Request>,
    events: mpsc::Receiver<Event>,
    task: JoinHandle<()>,
}

impl Bridge {
    /// Start serving requests against `app` on the current tokio runtime.
    pub fn spawn(app: App, capacity: usize) -> Self {
        let (request_tx, request_rx) = mpsc::channel(capacity);
        let (event_tx, event_rx) = mpsc::channel(capacity);

        let task = tokio::spawn(serve(app, request_rx, event_tx));

        Self {
            requests: request_tx,
            events: event_rx,
            task,
        }
    }

    pub async fn send(&self, request: Request) -> Result<()> {
        self.requests
            .send(request)
            .await
            .map_err(|_| CoreError::BridgeClosed)
    }

    pub async fn recv(&mut self) -> Option<Event> {
        self.events.recv().await
    }

    /// Send a request and wait for its event.
    pub async fn call(&mut self, request: Request) -> Result<Event> {
        self.send(request).await?;
        self.recv().await.ok_or(CoreError::BridgeClosed)
    }

    pub fn requests(&self) -> mpsc::Sender<Request> {
        self.requests.clone()
    }

    /// Stop accepting requests and wait for in-flight ones to be answered.
    ///
    /// Events not yet received are dropped.
    pub async fn shutdown(self) {
        let Bridge {
            requests,
            events,
            task,
        } = self;
        drop(requests);
        drop(events);
        if let Err(e) = task.await {
            tracing::error!("Bridge task failed: {}", e);
        }
    }
}

async fn serve(app: App, mut requests: mpsc::Receiver<Request>, events: mpsc::Sender<Event>) {
    tracing::info!("Bridge started");

    while let Some(request) = requests.recv().await {
        let kind = request.kind();
        let worker = app.clone();

        // Storage calls block; the next request waits for this one to finish
        let event = match tokio::task::spawn_blocking(move || worker.handle(request)).await {
            Ok(event) => event,
            Err(e) => Event::failed(kind, e),
        };

        if events.send(event).await.is_err() {
            tracing::debug!("Event receiver dropped");
            break;
        }
    }

    tracing::info!("Bridge stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use summer_storage::Database;

    fn test_app(dir: &std::path::Path) -> App {
        let mut config = Config::new(dir.to_path_buf());
        config.export_dir = dir.join("exports");
        App::with_database(config, Database::open_in_memory().unwrap()).unwrap()
    }

    fn recv_contents(event: Event) -> (String, serde_json::Value) {
        match event {
            Event::Recv { name, contents } => (name, serde_json::from_str(&contents).unwrap()),
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn test_request_wire_format() {
        let request: Request =
            serde_json::from_str(r#"{"type":"add","name":"items","contents":"{\"uuid\":\"a1\"}"}"#)
                .unwrap();
        assert_eq!(
            request,
            Request::Add {
                name: "items".to_string(),
                contents: r#"{"uuid":"a1"}"#.to_string(),
            }
        );

        let export: Request = serde_json::from_str(r#"{"type":"export"}"#).unwrap();
        assert_eq!(export.kind(), RequestKind::Export);
    }

    #[test]
    fn test_event_wire_format() {
        let event = Event::failed(RequestKind::Get, "Table not found: nope");
        assert_eq!(
            serde_json::to_string(&event).unwrap(),
            r#"{"type":"failed","request":"get","error":"Table not found: nope"}"#
        );
    }

    #[tokio::test]
    async fn test_bridge_scenario() {
        let dir = tempfile::tempdir().unwrap();
        let mut bridge = Bridge::spawn(test_app(dir.path()), 8);

        let (name, contents) = recv_contents(
            bridge
                .call(Request::Get {
                    name: "items".to_string(),
                })
                .await
                .unwrap(),
        );
        assert_eq!(name, "items");
        assert_eq!(contents, serde_json::json!([]));

        let (_, contents) = recv_contents(
            bridge
                .call(Request::Add {
                    name: "items".to_string(),
                    contents: r#"{"uuid":"a1","name":"Widget"}"#.to_string(),
                })
                .await
                .unwrap(),
        );
        assert_eq!(contents, serde_json::json!([{"uuid": "a1", "name": "Widget"}]));

        let (_, contents) = recv_contents(
            bridge
                .call(Request::Delete {
                    name: "items".to_string(),
                    uuid: "a1".to_string(),
                })
                .await
                .unwrap(),
        );
        assert_eq!(contents, serde_json::json!([]));

        bridge.shutdown().await;
    }

    #[tokio::test]
    async fn test_every_request_gets_an_answer_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let mut bridge = Bridge::spawn(test_app(dir.path()), 8);

        bridge
            .send(Request::Get {
                name: "nope".to_string(),
            })
            .await
            .unwrap();
        bridge
            .send(Request::Add {
                name: "items".to_string(),
                contents: "not json".to_string(),
            })
            .await
            .unwrap();
        bridge
            .send(Request::Add {
                name: "boms".to_string(),
                contents: r#"{"uuid":"b1"}"#.to_string(),
            })
            .await
            .unwrap();

        assert!(matches!(
            bridge.recv().await,
            Some(Event::Failed {
                request: RequestKind::Get,
                ..
            })
        ));
        assert!(matches!(
            bridge.recv().await,
            Some(Event::Failed {
                request: RequestKind::Add,
                ..
            })
        ));
        let (name, contents) = recv_contents(bridge.recv().await.unwrap());
        assert_eq!(name, "boms");
        assert_eq!(contents, serde_json::json!([{"uuid": "b1"}]));

        bridge.shutdown().await;
    }

    #[tokio::test]
    async fn test_concurrent_adds_are_not_lost() {
        let dir = tempfile::tempdir().unwrap();
        let mut bridge = Bridge::spawn(test_app(dir.path()), 64);

        let mut senders = Vec::new();
        for i in 0..20 {
            let requests = bridge.requests();
            senders.push(tokio::spawn(async move {
                requests
                    .send(Request::Add {
                        name: "items".to_string(),
                        contents: format!(r#"{{"uuid":"r{i}"}}"#),
                    })
                    .await
                    .unwrap();
            }));
        }
        for sender in senders {
            sender.await.unwrap();
        }
        for _ in 0..20 {
            bridge.recv().await.unwrap();
        }

        let (_, contents) = recv_contents(
            bridge
                .call(Request::Get {
                    name: "items".to_string(),
                })
                .await
                .unwrap(),
        );
        assert_eq!(contents.as_array().unwrap().len(), 20);

        bridge.shutdown().await;
    }
}
