//! Application service event loop
//!
//! One [`AppService`] joins the bus, heartbeats per the configured
//! cadence, and routes inbound datagrams to handlers registered by
//! `(message type, schema)`. All protocol state lives on the loop task;
//! the cloneable [`ServiceHandle`] feeds it through a queue.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use bytes::Bytes;
use parking_lot::RwLock;
use socket2::{Domain, Protocol, Socket, Type};
use tokio::net::UdpSocket;
use tokio::sync::{mpsc, Notify};
use tokio::time::{self, Instant};
use tracing::{debug, info, trace};

use peal_proto::{header, message_type, parse_datagram, schema, Message, HOP_LOCAL, TARGET_ALL};

use crate::cadence::Cadence;
use crate::config::ServiceConfig;
use crate::error::{Result, ServiceError};

/// Largest datagram the receive loop will accept
const MAX_DATAGRAM: usize = 2048;

/// Inbound message callback, invoked on the service loop
pub type Handler = Box<dyn FnMut(&Message) + Send>;

/// Bind an IPv4 UDP socket on an ephemeral port with address reuse and
/// broadcast send enabled.
fn bind_broadcast() -> std::io::Result<std::net::UdpSocket> {
    let socket = Socket::new(Domain::IPV4, Type::DGRAM, Some(Protocol::UDP))?;
    socket.set_reuse_address(true)?;
    socket.set_broadcast(true)?;
    socket.set_nonblocking(true)?;
    socket.bind(&SocketAddr::from(([0, 0, 0, 0], 0)).into())?;
    Ok(socket.into())
}

/// The xPL protocol engine.
///
/// Construct, register handlers, then drive [`run`](Self::run). The
/// loop sends an immediate heartbeat, then follows the discovery /
/// lonely / connected cadence while dispatching inbound messages.
pub struct AppService {
    application_id: String,
    version: String,
    config: ServiceConfig,
    socket: Arc<UdpSocket>,
    local_addr: SocketAddr,
    handlers: HashMap<(String, String), Handler>,
    connected: Arc<RwLock<bool>>,
    cadence: Cadence,
    outbox_tx: mpsc::UnboundedSender<Bytes>,
    outbox_rx: mpsc::UnboundedReceiver<Bytes>,
    shutdown: Arc<Notify>,
}

impl AppService {
    /// Bind the broadcast socket and prepare the service.
    ///
    /// `application_id` is the node's bus identity, stamped as `source`
    /// on everything it sends and used to recognize its own heartbeat
    /// echo. A handler answering `hbeat.request` probes is registered
    /// up front.
    pub async fn new(
        application_id: impl Into<String>,
        version: impl Into<String>,
        config: ServiceConfig,
    ) -> Result<Self> {
        let std_socket = bind_broadcast().map_err(ServiceError::Bind)?;
        let socket = UdpSocket::from_std(std_socket).map_err(ServiceError::Bind)?;
        let local_addr = socket.local_addr().map_err(ServiceError::Bind)?;

        let (outbox_tx, outbox_rx) = mpsc::unbounded_channel();
        let cadence = Cadence::new(&config);

        let mut service = Self {
            application_id: application_id.into(),
            version: version.into(),
            config,
            socket: Arc::new(socket),
            local_addr,
            handlers: HashMap::new(),
            connected: Arc::new(RwLock::new(false)),
            cadence,
            outbox_tx,
            outbox_rx,
            shutdown: Arc::new(Notify::new()),
        };

        info!(
            "application service {} bound to {}",
            service.application_id, local_addr
        );

        // Peers may probe the bus with hbeat.request; answer with an
        // immediate beat.
        let handle = service.handle();
        let beat = service.heartbeat_message(schema::HEARTBEAT);
        service.register(message_type::COMMAND, schema::HEARTBEAT_REQUEST, move |_| {
            handle.send(beat.clone());
        });

        Ok(service)
    }

    /// Install or replace the handler for one `(message type, schema)`
    /// pair. Handlers run on the loop task, one at a time.
    pub fn register<F>(&mut self, message_type: &str, schema: &str, handler: F)
    where
        F: FnMut(&Message) + Send + 'static,
    {
        self.handlers
            .insert((message_type.to_string(), schema.to_string()), Box::new(handler));
    }

    /// Cloneable handle for sending messages and probing connectivity
    pub fn handle(&self) -> ServiceHandle {
        ServiceHandle {
            application_id: self.application_id.clone(),
            outbox: self.outbox_tx.clone(),
            connected: self.connected.clone(),
        }
    }

    /// Address of the receive socket (ephemeral port, all interfaces)
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// True once this node has seen a hub relay its own heartbeat
    pub fn is_connected(&self) -> bool {
        *self.connected.read()
    }

    /// Drive the service until shutdown or a transport error.
    ///
    /// Sends one heartbeat immediately, then services the heartbeat
    /// timer, the receive socket, and the outbound queue from a single
    /// loop.
    pub async fn run(&mut self) -> Result<()> {
        info!("application service {} starting", self.application_id);
        self.send_heartbeat(schema::HEARTBEAT).await?;
        let mut next_beat = Instant::now() + self.cadence.after_beat(self.is_connected());
        let mut buf = vec![0u8; MAX_DATAGRAM];

        loop {
            tokio::select! {
                // Heartbeat timer
                _ = time::sleep_until(next_beat) => {
                    self.send_heartbeat(schema::HEARTBEAT).await?;
                    next_beat = Instant::now() + self.cadence.after_beat(self.is_connected());
                }

                // Inbound datagrams
                result = self.socket.recv_from(&mut buf) => {
                    match result {
                        Ok((len, from)) => {
                            let payload = String::from_utf8_lossy(&buf[..len]).into_owned();
                            self.handle_datagram(&payload, from);
                        }
                        Err(e) => return Err(ServiceError::Recv(e)),
                    }
                }

                // Messages queued through a ServiceHandle
                Some(payload) = self.outbox_rx.recv() => {
                    self.socket
                        .send_to(&payload, self.config.hub_addr)
                        .await
                        .map_err(ServiceError::Send)?;
                }

                // Orderly stop
                _ = self.shutdown.notified() => {
                    info!("application service {} stopping", self.application_id);
                    break;
                }
            }
        }

        Ok(())
    }

    /// Stop the run loop and broadcast a final `hbeat.end` sign-off.
    ///
    /// Writes on the socket directly, so it works whether or not the
    /// loop is still running.
    pub async fn send_termination(&self) -> Result<()> {
        self.shutdown.notify_one();
        let beat = self.heartbeat_message(schema::HEARTBEAT_END);
        self.socket
            .send_to(beat.to_string().as_bytes(), self.config.hub_addr)
            .await
            .map_err(ServiceError::Send)?;
        info!("sign-off heartbeat sent");
        Ok(())
    }

    async fn send_heartbeat(&mut self, schema: &str) -> Result<()> {
        let beat = self.heartbeat_message(schema);
        debug!("sending {} ({:?} phase)", schema, self.cadence.phase());
        self.socket
            .send_to(beat.to_string().as_bytes(), self.config.hub_addr)
            .await
            .map_err(ServiceError::Send)?;
        Ok(())
    }

    /// Heartbeat announcing this node: interval in minutes plus the
    /// address peers can reach it on.
    fn heartbeat_message(&self, schema: &str) -> Message {
        Message::new(message_type::STATUS, schema)
            .with_header(header::HOP, HOP_LOCAL)
            .with_header(header::SOURCE, self.application_id.as_str())
            .with_header(header::TARGET, TARGET_ALL)
            .with_body("interval", (self.config.heartbeat_period.as_secs() / 60).to_string())
            .with_body("port", self.local_addr.port().to_string())
            .with_body("remote-ip", self.local_addr.ip().to_string())
            .with_body("version", self.version.as_str())
    }

    fn handle_datagram(&mut self, payload: &str, from: SocketAddr) {
        let msg = match parse_datagram(payload) {
            Some(msg) => msg,
            None => {
                trace!("dropping unparseable datagram from {}", from);
                return;
            }
        };

        self.detect_connection(&msg);

        // Target gate: broadcast or addressed to this node
        match msg.target() {
            Some(target) if target == TARGET_ALL || target == self.application_id => {}
            _ => {
                trace!("ignoring message targeted at {:?}", msg.target());
                return;
            }
        }

        let key = (msg.message_type.clone(), msg.schema.clone());
        if let Some(handler) = self.handlers.get_mut(&key) {
            debug!("dispatching {} / {}", msg.message_type, msg.schema);
            handler(&msg);
        } else {
            trace!("no handler for {} / {}", msg.message_type, msg.schema);
        }
    }

    /// A relayed copy of our own heartbeat proves a hub is listening.
    fn detect_connection(&self, msg: &Message) {
        if *self.connected.read() {
            return;
        }
        if msg.schema == schema::HEARTBEAT && msg.source() == Some(self.application_id.as_str()) {
            *self.connected.write() = true;
            info!("observed own heartbeat echo, hub is relaying");
        }
    }
}

/// Cloneable handle onto a running [`AppService`].
#[derive(Clone)]
pub struct ServiceHandle {
    application_id: String,
    outbox: mpsc::UnboundedSender<Bytes>,
    connected: Arc<RwLock<bool>>,
}

impl ServiceHandle {
    /// Queue a message for transmission.
    ///
    /// The `source` header is stamped with this node's application id.
    /// The write happens on the service loop, so the message is not on
    /// the wire yet when this returns; if the loop is gone the message
    /// is dropped.
    pub fn send(&self, mut msg: Message) {
        msg.set_source(&self.application_id);
        let payload = Bytes::from(msg.to_string().into_bytes());
        if self.outbox.send(payload).is_err() {
            debug!("service loop gone, dropping outbound message");
        }
    }

    /// True once the node has seen a hub relay its own heartbeat
    pub fn is_connected(&self) -> bool {
        *self.connected.read()
    }

    /// The application id messages are stamped with
    pub fn application_id(&self) -> &str {
        &self.application_id
    }
}
