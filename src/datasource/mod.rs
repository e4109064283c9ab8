//! Push/poll data sources feeding a chart through dispatcher events.
//!
//! Sources do their I/O on a worker thread and report through a
//! [`Dispatcher`]; the chart drains the matching receiver from its owning
//! thread (`Chart::pump_events`).

mod http;
mod websocket;

pub use http::{HttpDatasource, HttpResponse, HttpSourceConfig, HttpTransport, ReqwestTransport, poll_once};
pub use websocket::{MessageGate, WebSocketDatasource, WebSocketSourceConfig};

use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::JoinHandle;

use serde_json::Value;

use crate::error::{ChartError, ChartResult};

/// Normalized data-source notification.
#[derive(Debug, Clone, PartialEq)]
pub enum DatasourceEvent {
    Open,
    /// Decoded JSON payload (one datum or an array of datums).
    Message(Value),
    /// Recoverable failure (bad status, undecodable body, ...).
    Error(String),
    AddLoading,
    RemoveLoading,
    /// Unrecoverable transport failure; the source has stopped.
    Fatal(String),
}

/// Sending half handed to a data source.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    sender: Sender<DatasourceEvent>,
}

impl Dispatcher {
    #[must_use]
    pub fn channel() -> (Self, Receiver<DatasourceEvent>) {
        let (sender, receiver) = mpsc::channel();
        (Self { sender }, receiver)
    }

    /// Sends `event`; returns `false` once the chart side is gone.
    pub fn call(&self, event: DatasourceEvent) -> bool {
        self.sender.send(event).is_ok()
    }
}

/// Contract shared by every data source.
pub trait Datasource: Send {
    fn configure(&mut self, dispatcher: Dispatcher);

    /// Starts the worker. Starting a running source is a no-op.
    fn start(&mut self) -> ChartResult<()>;

    /// Stops the worker and waits for it to finish.
    fn stop(&mut self) -> ChartResult<()>;

    fn is_running(&self) -> bool;
}

/// Worker thread plus the channel used to ask it to stop.
#[derive(Debug)]
pub(crate) struct Worker {
    stop: Sender<()>,
    handle: JoinHandle<()>,
}

impl Worker {
    pub(crate) fn new(stop: Sender<()>, handle: JoinHandle<()>) -> Self {
        Self { stop, handle }
    }

    pub(crate) fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    pub(crate) fn shutdown(self) -> ChartResult<()> {
        // The worker may already be gone, so a failed send is fine.
        let _ = self.stop.send(());
        self.handle
            .join()
            .map_err(|_| ChartError::Datasource("datasource worker panicked".to_owned()))
    }
}

pub(crate) fn missing_dispatcher() -> ChartError {
    ChartError::Datasource("datasource started before being configured".to_owned())
}
