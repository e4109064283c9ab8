use std::sync::Arc;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::datasource::{Datasource, DatasourceEvent, Dispatcher, Worker, missing_dispatcher};
use crate::error::{ChartError, ChartResult};

const DEFAULT_POLLING_MS: u64 = 1000;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(12);

fn default_polling_time() -> u64 {
    DEFAULT_POLLING_MS
}

/// `{url, pollingTime}` source description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpSourceConfig {
    pub url: String,
    /// Milliseconds between polls.
    #[serde(default = "default_polling_time")]
    pub polling_time: u64,
}

impl HttpSourceConfig {
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            polling_time: DEFAULT_POLLING_MS,
        }
    }

    #[must_use]
    pub fn with_polling_time(mut self, millis: u64) -> Self {
        self.polling_time = millis;
        self
    }
}

/// Status and body of one GET.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

/// Blocking GET used by the polling worker.
pub trait HttpTransport: Send + Sync + 'static {
    fn get(&self, url: &str) -> ChartResult<HttpResponse>;
}

/// `reqwest` blocking client.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::blocking::Client,
}

impl ReqwestTransport {
    pub fn new() -> ChartResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self { client })
    }
}

impl HttpTransport for ReqwestTransport {
    fn get(&self, url: &str) -> ChartResult<HttpResponse> {
        let response = self.client.get(url).send()?;
        let status = response.status().as_u16();
        let body = response.text()?;
        Ok(HttpResponse { status, body })
    }
}

/// Performs one poll and dispatches exactly one event for it: `Message` for
/// a 200 response with a JSON body, `Error` otherwise.
pub fn poll_once<T: HttpTransport + ?Sized>(transport: &T, url: &str, dispatcher: &Dispatcher) -> bool {
    let event = match transport.get(url) {
        Ok(HttpResponse { status: 200, body }) => match serde_json::from_str::<Value>(&body) {
            Ok(payload) => DatasourceEvent::Message(payload),
            Err(err) => DatasourceEvent::Error(format!("undecodable response body: {err}")),
        },
        Ok(HttpResponse { status, .. }) => DatasourceEvent::Error(format!("unexpected status {status}")),
        Err(err) => DatasourceEvent::Error(err.to_string()),
    };
    if let DatasourceEvent::Error(reason) = &event {
        warn!(url, reason = reason.as_str(), "http poll failed");
    }
    dispatcher.call(event)
}

/// Polls a URL on a fixed interval from a worker thread.
pub struct HttpDatasource<T: HttpTransport = ReqwestTransport> {
    config: HttpSourceConfig,
    transport: Arc<T>,
    dispatcher: Option<Dispatcher>,
    worker: Option<Worker>,
}

impl HttpDatasource<ReqwestTransport> {
    pub fn new(config: HttpSourceConfig) -> ChartResult<Self> {
        Ok(Self::with_transport(config, ReqwestTransport::new()?))
    }
}

impl<T: HttpTransport> HttpDatasource<T> {
    #[must_use]
    pub fn with_transport(config: HttpSourceConfig, transport: T) -> Self {
        Self {
            config,
            transport: Arc::new(transport),
            dispatcher: None,
            worker: None,
        }
    }

    #[must_use]
    pub fn config(&self) -> &HttpSourceConfig {
        &self.config
    }
}

impl<T: HttpTransport> Datasource for HttpDatasource<T> {
    fn configure(&mut self, dispatcher: Dispatcher) {
        self.dispatcher = Some(dispatcher);
    }

    fn start(&mut self) -> ChartResult<()> {
        if self.is_running() {
            return Ok(());
        }
        let dispatcher = self.dispatcher.clone().ok_or_else(missing_dispatcher)?;
        let transport = Arc::clone(&self.transport);
        let url = self.config.url.clone();
        let interval = Duration::from_millis(self.config.polling_time);
        let (stop_tx, stop_rx) = mpsc::channel::<()>();

        info!(url = url.as_str(), polling_ms = self.config.polling_time, "starting http datasource");
        let handle = thread::Builder::new()
            .name("proteic-http".to_owned())
            .spawn(move || {
                loop {
                    match stop_rx.recv_timeout(interval) {
                        Err(RecvTimeoutError::Timeout) => {
                            if !poll_once(transport.as_ref(), &url, &dispatcher) {
                                break;
                            }
                        }
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                    }
                }
                debug!(url = url.as_str(), "http datasource worker exited");
            })
            .map_err(|err| ChartError::Datasource(format!("failed to spawn http worker: {err}")))?;
        self.worker = Some(Worker::new(stop_tx, handle));
        Ok(())
    }

    fn stop(&mut self) -> ChartResult<()> {
        match self.worker.take() {
            Some(worker) => {
                info!(url = self.config.url.as_str(), "stopping http datasource");
                worker.shutdown()
            }
            None => Ok(()),
        }
    }

    fn is_running(&self) -> bool {
        self.worker.as_ref().is_some_and(|worker| !worker.is_finished())
    }
}

impl<T: HttpTransport> Drop for HttpDatasource<T> {
    fn drop(&mut self) {
        if let Err(err) = self.stop() {
            warn!(error = %err, "http datasource did not stop cleanly");
        }
    }
}
