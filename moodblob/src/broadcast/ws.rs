use std::net::{TcpStream, ToSocketAddrs};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, SyncSender, TrySendError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use websocket::OwnedMessage;
use websocket::client::ClientBuilder;
use websocket::sync::{Client, Writer};

use crate::broadcast::channel::Broadcaster;
use crate::foundation::error::{BlobError, BlobResult};

const POLL: Duration = Duration::from_millis(50);

/// Connection tuning for [`WebSocketBroadcaster`].
#[derive(Clone, Copy, Debug)]
pub struct WsOptions {
    /// Outbound messages buffered while a send is in flight; excess is dropped.
    pub queue_capacity: usize,
    /// Delay between reconnect attempts.
    pub retry_delay: Duration,
    /// Bound on the TCP connect and on the upgrade handshake of each attempt.
    pub connect_timeout: Duration,
}

impl Default for WsOptions {
    fn default() -> Self {
        Self {
            queue_capacity: 64,
            retry_delay: Duration::from_secs(1),
            connect_timeout: Duration::from_secs(2),
        }
    }
}

#[derive(Debug, Default)]
struct Shared {
    connected: AtomicBool,
    shutdown: AtomicBool,
    dropped: AtomicU64,
}

/// Emits `{"event": label, "value": v}` text frames over a WebSocket.
///
/// A background thread owns the connection and reconnects on failure. `emit` only enqueues; while
/// the link is down messages are dropped.
pub struct WebSocketBroadcaster {
    url: String,
    tx: Option<SyncSender<String>>,
    shared: Arc<Shared>,
    worker: Option<JoinHandle<()>>,
}

impl std::fmt::Debug for WebSocketBroadcaster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebSocketBroadcaster")
            .field("url", &self.url)
            .field("connected", &self.is_connected())
            .finish()
    }
}

impl WebSocketBroadcaster {
    #[tracing::instrument(skip(opts))]
    pub fn connect(url: &str, opts: WsOptions) -> BlobResult<Self> {
        ClientBuilder::new(url)
            .map_err(|e| BlobError::config(format!("invalid broadcast url '{url}': {e}")))?;
        let host_port = authority(url).ok_or_else(|| {
            BlobError::config(format!("broadcast url '{url}' must be ws://host[:port][/path]"))
        })?;
        if opts.queue_capacity == 0 {
            return Err(BlobError::config("broadcast queue capacity must be >= 1"));
        }
        if opts.connect_timeout.is_zero() {
            return Err(BlobError::config("broadcast connect timeout must be > 0"));
        }

        let (tx, rx) = mpsc::sync_channel(opts.queue_capacity);
        let shared = Arc::new(Shared::default());
        let worker = {
            let url = url.to_owned();
            let shared = Arc::clone(&shared);
            thread::Builder::new()
                .name("moodblob-ws".to_owned())
                .spawn(move || run_transport(&url, &host_port, rx, &shared, opts))
                .map_err(|e| BlobError::resource(format!("spawn broadcast thread: {e}")))?
        };

        Ok(Self {
            url: url.to_owned(),
            tx: Some(tx),
            shared,
            worker: Some(worker),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Messages discarded because the link was down or the queue was full.
    pub fn dropped(&self) -> u64 {
        self.shared.dropped.load(Ordering::Relaxed)
    }

    /// Blocks until the link is up or `timeout` elapses.
    pub fn wait_connected(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        while !self.is_connected() {
            if Instant::now() >= deadline {
                return false;
            }
            thread::sleep(Duration::from_millis(10));
        }
        true
    }
}

impl Broadcaster for WebSocketBroadcaster {
    fn emit(&mut self, label: &str, value: f64) {
        let Some(tx) = &self.tx else { return };
        if !self.is_connected() {
            self.shared.dropped.fetch_add(1, Ordering::Relaxed);
            return;
        }
        let text = serde_json::json!({ "event": label, "value": value }).to_string();
        if let Err(TrySendError::Full(_) | TrySendError::Disconnected(_)) = tx.try_send(text) {
            self.shared.dropped.fetch_add(1, Ordering::Relaxed);
        }
    }

    fn is_connected(&self) -> bool {
        self.shared.connected.load(Ordering::Acquire)
    }
}

impl Drop for WebSocketBroadcaster {
    fn drop(&mut self) {
        self.shared.shutdown.store(true, Ordering::Release);
        self.tx = None;
        if let Some(worker) = self.worker.take()
            && worker.join().is_err()
        {
            tracing::warn!(url = %self.url, "broadcast thread panicked");
        }
    }
}

fn run_transport(
    url: &str,
    authority: &str,
    rx: Receiver<String>,
    shared: &Shared,
    opts: WsOptions,
) {
    while !shared.shutdown.load(Ordering::Acquire) {
        let mut builder = match ClientBuilder::new(url) {
            Ok(builder) => builder,
            Err(e) => {
                tracing::warn!(url, error = %e, "broadcast url rejected");
                break;
            }
        };
        match dial(&mut builder, authority, opts.connect_timeout) {
            Ok(client) => {
                tracing::info!(url, "broadcast connected");
                if serve(client, &rx, shared) == Flow::Exit {
                    break;
                }
                tracing::info!(url, "broadcast disconnected");
            }
            Err(e) => tracing::debug!(url, error = %e, "broadcast connect failed"),
        }
        if idle(&rx, shared, opts.retry_delay) == Flow::Exit {
            break;
        }
    }
    shared.connected.store(false, Ordering::Release);
}

/// `host:port` of a `ws://` url, defaulting the port to 80.
fn authority(url: &str) -> Option<String> {
    let rest = url.strip_prefix("ws://")?;
    let host = rest.split(['/', '?', '#']).next()?;
    let host = host.rsplit('@').next()?;
    if host.is_empty() {
        return None;
    }
    let has_port = match host.strip_prefix('[') {
        Some(v6) => v6.contains("]:"),
        None => host.contains(':'),
    };
    Some(if has_port {
        host.to_owned()
    } else {
        format!("{host}:80")
    })
}

/// TCP connect plus upgrade handshake, each bounded by `timeout`. The live stream blocks again.
fn dial(
    builder: &mut ClientBuilder<'_>,
    authority: &str,
    timeout: Duration,
) -> Result<Client<TcpStream>, String> {
    let mut last = format!("no address for {authority}");
    for addr in authority.to_socket_addrs().map_err(|e| e.to_string())? {
        let stream = match TcpStream::connect_timeout(&addr, timeout) {
            Ok(stream) => stream,
            Err(e) => {
                last = e.to_string();
                continue;
            }
        };
        stream
            .set_read_timeout(Some(timeout))
            .and_then(|()| stream.set_write_timeout(Some(timeout)))
            .map_err(|e| e.to_string())?;
        let client = builder.connect_on(stream).map_err(|e| e.to_string())?;
        let live = client.stream_ref();
        live.set_read_timeout(None)
            .and_then(|()| live.set_write_timeout(None))
            .map_err(|e| e.to_string())?;
        return Ok(client);
    }
    Err(last)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Flow {
    Reconnect,
    Exit,
}

fn serve(client: Client<TcpStream>, rx: &Receiver<String>, shared: &Shared) -> Flow {
    let (mut reader, mut writer) = match client.split() {
        Ok(halves) => halves,
        Err(e) => {
            tracing::debug!(error = %e, "broadcast split failed");
            return Flow::Reconnect;
        }
    };
    let alive = Arc::new(AtomicBool::new(true));
    let reader_alive = Arc::clone(&alive);
    let reader_thread = thread::spawn(move || {
        for message in reader.incoming_messages() {
            match message {
                Ok(OwnedMessage::Text(text)) => tracing::debug!(%text, "broadcast inbound"),
                Ok(OwnedMessage::Close(_)) | Err(_) => break,
                Ok(_) => {}
            }
        }
        reader_alive.store(false, Ordering::Release);
    });
    shared.connected.store(true, Ordering::Release);

    let flow = pump(&mut writer, rx, shared, &alive);

    shared.connected.store(false, Ordering::Release);
    if flow == Flow::Exit {
        let _ = writer.send_message(&OwnedMessage::Close(None));
    }
    let _ = writer.shutdown_all();
    let _ = reader_thread.join();
    flow
}

fn pump(
    writer: &mut Writer<TcpStream>,
    rx: &Receiver<String>,
    shared: &Shared,
    alive: &AtomicBool,
) -> Flow {
    loop {
        if shared.shutdown.load(Ordering::Acquire) {
            return Flow::Exit;
        }
        if !alive.load(Ordering::Acquire) {
            return Flow::Reconnect;
        }
        match rx.recv_timeout(POLL) {
            Ok(text) => {
                if let Err(e) = writer.send_message(&OwnedMessage::Text(text)) {
                    tracing::debug!(error = %e, "broadcast send failed");
                    shared.dropped.fetch_add(1, Ordering::Relaxed);
                    return Flow::Reconnect;
                }
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => return Flow::Exit,
        }
    }
}

fn idle(rx: &Receiver<String>, shared: &Shared, delay: Duration) -> Flow {
    let deadline = Instant::now() + delay;
    while Instant::now() < deadline {
        if shared.shutdown.load(Ordering::Acquire) {
            return Flow::Exit;
        }
        loop {
            match rx.try_recv() {
                Ok(_) => {
                    shared.dropped.fetch_add(1, Ordering::Relaxed);
                }
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => return Flow::Exit,
            }
        }
        thread::sleep(POLL.min(deadline.saturating_duration_since(Instant::now())));
    }
    Flow::Reconnect
}

#[cfg(test)]
#[path = "../../tests/unit/broadcast/ws.rs"]
mod tests;
