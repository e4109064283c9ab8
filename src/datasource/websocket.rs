use std::io::ErrorKind;
use std::net::{TcpStream, ToSocketAddrs};
use std::sync::mpsc::{self, TryRecvError};
use std::thread;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};
use tungstenite::client::IntoClientRequest;
use tungstenite::stream::MaybeTlsStream;
use tungstenite::{Message, WebSocket};

use crate::datasource::{Datasource, DatasourceEvent, Dispatcher, Worker, missing_dispatcher};
use crate::error::{ChartError, ChartResult};

const READ_TIMEOUT: Duration = Duration::from_millis(250);
const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 5_000;

type Socket = WebSocket<MaybeTlsStream<TcpStream>>;

fn default_connect_timeout() -> u64 {
    DEFAULT_CONNECT_TIMEOUT_MS
}

/// `{endpoint}` source description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebSocketSourceConfig {
    pub endpoint: String,
    /// Milliseconds allowed for the TCP connect and for the handshake.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout: u64,
}

impl WebSocketSourceConfig {
    #[must_use]
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT_MS,
        }
    }

    #[must_use]
    pub fn with_connect_timeout(mut self, millis: u64) -> Self {
        self.connect_timeout = millis;
        self
    }
}

/// Turns text frames into dispatcher events; the first frame also clears
/// the loading indicator.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MessageGate {
    received: bool,
}

impl MessageGate {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` once the chart side has gone away.
    pub fn handle_text(&mut self, text: &str, dispatcher: &Dispatcher) -> bool {
        if !self.received {
            self.received = true;
            if !dispatcher.call(DatasourceEvent::RemoveLoading) {
                return false;
            }
        }
        let event = match serde_json::from_str::<Value>(text) {
            Ok(payload) => DatasourceEvent::Message(payload),
            Err(err) => {
                warn!(error = %err, "discarding undecodable websocket frame");
                DatasourceEvent::Error(format!("undecodable websocket frame: {err}"))
            }
        };
        dispatcher.call(event)
    }

    #[must_use]
    pub fn has_received(&self) -> bool {
        self.received
    }
}

/// Streams JSON frames from a WebSocket endpoint.
pub struct WebSocketDatasource {
    config: WebSocketSourceConfig,
    dispatcher: Option<Dispatcher>,
    worker: Option<Worker>,
}

impl WebSocketDatasource {
    #[must_use]
    pub fn new(config: WebSocketSourceConfig) -> Self {
        Self {
            config,
            dispatcher: None,
            worker: None,
        }
    }

    #[must_use]
    pub fn config(&self) -> &WebSocketSourceConfig {
        &self.config
    }
}

fn set_read_timeout(socket: &Socket) -> std::io::Result<()> {
    match socket.get_ref() {
        MaybeTlsStream::Plain(stream) => stream.set_read_timeout(Some(READ_TIMEOUT)),
        MaybeTlsStream::Rustls(stream) => stream.get_ref().set_read_timeout(Some(READ_TIMEOUT)),
        _ => Ok(()),
    }
}

fn is_timeout(err: &tungstenite::Error) -> bool {
    matches!(err, tungstenite::Error::Io(io) if matches!(io.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut))
}

/// Opens the TCP stream with a bounded wait, then runs the handshake (TLS
/// for `wss://`) under the same bound.
fn connect(endpoint: &str, timeout: Duration) -> ChartResult<Socket> {
    let request = endpoint.into_client_request()?;
    let uri = request.uri();
    let host = uri
        .host()
        .ok_or_else(|| ChartError::Datasource(format!("websocket endpoint has no host: {endpoint}")))?
        .trim_start_matches('[')
        .trim_end_matches(']')
        .to_owned();
    let port = uri
        .port_u16()
        .unwrap_or(if uri.scheme_str() == Some("wss") { 443 } else { 80 });
    let timeout = timeout.max(Duration::from_millis(1));

    let addresses = (host.as_str(), port)
        .to_socket_addrs()
        .map_err(tungstenite::Error::from)?;
    let mut last_error = None;
    for address in addresses {
        match TcpStream::connect_timeout(&address, timeout) {
            Ok(stream) => {
                stream
                    .set_read_timeout(Some(timeout))
                    .and_then(|()| stream.set_write_timeout(Some(timeout)))
                    .map_err(tungstenite::Error::from)?;
                let (socket, _response) = tungstenite::client_tls(request, stream).map_err(|err| {
                    ChartError::Datasource(format!("websocket handshake with {endpoint} failed: {err}"))
                })?;
                return Ok(socket);
            }
            Err(err) => {
                debug!(endpoint, %address, error = %err, "websocket tcp connect failed");
                last_error = Some(err);
            }
        }
    }
    Err(match last_error {
        Some(err) => tungstenite::Error::from(err).into(),
        None => ChartError::Datasource(format!("websocket endpoint did not resolve: {endpoint}")),
    })
}

fn run_socket(
    config: &WebSocketSourceConfig,
    dispatcher: &Dispatcher,
    stop: &mpsc::Receiver<()>,
) {
    let endpoint = config.endpoint.as_str();
    let timeout = Duration::from_millis(config.connect_timeout);
    let mut socket = match connect(endpoint, timeout) {
        Ok(socket) => socket,
        Err(err) => {
            warn!(endpoint, error = %err, "websocket connect failed");
            dispatcher.call(DatasourceEvent::Fatal(err.to_string()));
            return;
        }
    };
    if let Err(err) = set_read_timeout(&socket) {
        warn!(endpoint, error = %err, "could not set websocket read timeout");
    }
    if !dispatcher.call(DatasourceEvent::Open) {
        return;
    }
    info!(endpoint, "websocket connected");

    let mut gate = MessageGate::new();
    loop {
        match stop.try_recv() {
            Ok(()) | Err(TryRecvError::Disconnected) => {
                let _ = socket.close(None);
                break;
            }
            Err(TryRecvError::Empty) => {}
        }
        match socket.read() {
            Ok(Message::Text(payload)) => {
                if !gate.handle_text(&payload, dispatcher) {
                    break;
                }
            }
            Ok(Message::Close(_)) => {
                debug!(endpoint, "websocket closed by peer");
                break;
            }
            Ok(_) => {}
            Err(err) if is_timeout(&err) => {}
            Err(tungstenite::Error::ConnectionClosed | tungstenite::Error::AlreadyClosed) => break,
            Err(err) => {
                warn!(endpoint, error = %err, "websocket read failed");
                dispatcher.call(DatasourceEvent::Fatal(err.to_string()));
                break;
            }
        }
    }
}

impl Datasource for WebSocketDatasource {
    fn configure(&mut self, dispatcher: Dispatcher) {
        self.dispatcher = Some(dispatcher);
    }

    fn start(&mut self) -> ChartResult<()> {
        if self.is_running() {
            return Ok(());
        }
        let dispatcher = self.dispatcher.clone().ok_or_else(missing_dispatcher)?;
        dispatcher.call(DatasourceEvent::AddLoading);
        let config = self.config.clone();
        let (stop_tx, stop_rx) = mpsc::channel::<()>();

        info!(
            endpoint = config.endpoint.as_str(),
            connect_timeout_ms = config.connect_timeout,
            "starting websocket datasource"
        );
        let handle = thread::Builder::new()
            .name("proteic-websocket".to_owned())
            .spawn(move || {
                run_socket(&config, &dispatcher, &stop_rx);
                debug!(endpoint = config.endpoint.as_str(), "websocket worker exited");
            })
            .map_err(|err| ChartError::Datasource(format!("failed to spawn websocket worker: {err}")))?;
        self.worker = Some(Worker::new(stop_tx, handle));
        Ok(())
    }

    fn stop(&mut self) -> ChartResult<()> {
        match self.worker.take() {
            Some(worker) => worker.shutdown(),
            None => Ok(()),
        }
    }

    fn is_running(&self) -> bool {
        self.worker.as_ref().is_some_and(|worker| !worker.is_finished())
    }
}

impl Drop for WebSocketDatasource {
    fn drop(&mut self) {
        if let Err(err) = self.stop() {
            warn!(error = %err, "websocket datasource did not stop cleanly");
        }
    }
}
