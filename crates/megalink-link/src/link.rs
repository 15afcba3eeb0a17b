use std::fmt;
use std::io::{ErrorKind, Read, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Receiver;
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use megalink_frame::{FrameError, FrameReader, FrameWriter, FramerConfig, Reply, Value};
use megalink_transport::{BoardStream, SerialConfig, TransportError};
use tracing::{debug, info, trace, warn};

use crate::dispatcher::{Dispatcher, ReplyRouting};
use crate::error::{LinkError, Result};
use crate::exchange::Exchange;
use crate::message::Message;

/// Configuration for a board link.
#[derive(Debug, Clone)]
pub struct LinkConfig {
    /// Serial line settings; the serial timeout also bounds each read.
    pub serial: SerialConfig,
    /// Inbound framer settings.
    pub framer: FramerConfig,
    /// Pause before retrying when the channel is closed or not connected.
    pub poll_interval: Duration,
    /// Delivery of replies that match several pending exchanges.
    pub routing: ReplyRouting,
    /// Write timeout for socket channels. Serial ports use `serial.timeout`.
    pub write_timeout: Option<Duration>,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            serial: SerialConfig::default(),
            framer: FramerConfig::default(),
            poll_interval: Duration::from_millis(50),
            routing: ReplyRouting::default(),
            write_timeout: Some(Duration::from_secs(1)),
        }
    }
}

/// A live connection to one board.
///
/// A background thread owns the read half and the [`Framer`](megalink_frame::Framer),
/// feeding every completed payload to the shared [`Dispatcher`]. Any number of
/// threads may call [`send`](Self::send); writes are serialized so frames
/// never interleave on the wire.
pub struct Link<W: Write = BoardStream> {
    writer: Mutex<FrameWriter<W>>,
    dispatcher: Arc<Dispatcher>,
    running: Arc<AtomicBool>,
    reader: Mutex<Option<JoinHandle<()>>>,
}

impl<W: Write> Link<W> {
    /// Start a link over an already-open reader and writer.
    pub fn new<R>(reader: FrameReader<R>, writer: FrameWriter<W>, config: &LinkConfig) -> Result<Self>
    where
        R: Read + Send + 'static,
    {
        let dispatcher = Arc::new(Dispatcher::new(config.routing));
        let running = Arc::new(AtomicBool::new(true));

        let handle = {
            let dispatcher = Arc::clone(&dispatcher);
            let running = Arc::clone(&running);
            let poll_interval = config.poll_interval;
            thread::Builder::new()
                .name("megalink-reader".to_string())
                .spawn(move || read_loop(reader, &dispatcher, &running, poll_interval))
                .map_err(TransportError::from)?
        };

        Ok(Self {
            writer: Mutex::new(writer),
            dispatcher,
            running,
            reader: Mutex::new(Some(handle)),
        })
    }

    /// Register (when a reply is expected), timestamp and write `message`.
    ///
    /// Registration happens before the write so a fast reply cannot be missed.
    /// The returned [`Exchange`] completes when the reply arrives.
    pub fn send(&self, message: &Message) -> Result<Exchange> {
        if !self.is_running() {
            return Err(LinkError::Closed);
        }
        let frame = message.encode()?;
        let exchange = Exchange::new(message);

        self.dispatcher.register(&exchange);
        exchange.mark_sent();
        if let Err(err) = self.write(&frame) {
            self.dispatcher.cancel(&exchange);
            return Err(err);
        }
        debug!(%message, key = ?exchange.key(), "sent message");
        Ok(exchange)
    }

    /// Send `message` and wait up to `timeout` for its reply.
    ///
    /// On timeout the exchange is withdrawn from the dispatcher.
    pub fn request(&self, message: &Message, timeout: Duration) -> Result<Value> {
        let exchange = self.send(message)?;
        let result = exchange.wait_timeout(timeout);
        if matches!(result, Err(LinkError::Timeout(_))) {
            self.dispatcher.cancel(&exchange);
        }
        result
    }

    /// Write a complete, already-framed request.
    pub fn write(&self, frame: &[u8]) -> Result<()> {
        if !self.is_running() {
            return Err(LinkError::Closed);
        }
        trace!(?frame, "writing frame");
        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        writer.write_bytes(frame)?;
        Ok(())
    }

    /// The dispatcher routing replies for this link.
    pub fn dispatcher(&self) -> &Arc<Dispatcher> {
        &self.dispatcher
    }

    /// Receive a copy of every decoded reply.
    pub fn subscribe(&self) -> Receiver<Reply> {
        self.dispatcher.subscribe()
    }

    /// Exchanges still waiting for a reply.
    pub fn pending_count(&self) -> usize {
        self.dispatcher.pending_count()
    }

    /// Whether the link accepts new messages.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Stop the reader thread and wait for it to exit.
    ///
    /// Pending exchanges stay pending. Calling this twice is harmless.
    pub fn shutdown(&self) {
        self.running.store(false, Ordering::Release);
        let handle = self
            .reader
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(handle) = handle {
            if handle.join().is_err() {
                warn!("link reader thread panicked");
            }
            info!("link shut down");
        }
    }
}

impl<W: Write> fmt::Debug for Link<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Link")
            .field("running", &self.is_running())
            .field("routing", &self.dispatcher.routing())
            .field("pending", &self.pending_count())
            .finish()
    }
}

impl<W: Write> Drop for Link<W> {
    fn drop(&mut self) {
        // The reader notices within one read timeout; joining here could
        // block a caller that dropped the link from inside a reply handler.
        self.running.store(false, Ordering::Release);
    }
}

fn read_loop<R: Read>(
    mut reader: FrameReader<R>,
    dispatcher: &Dispatcher,
    running: &AtomicBool,
    poll_interval: Duration,
) {
    debug!("link reader started");
    let mut idle = false;
    while running.load(Ordering::Acquire) {
        match reader.poll_payload() {
            Ok(Some(payload)) => {
                idle = false;
                debug!(?payload, "received frame");
                dispatcher.dispatch(&payload);
            }
            Ok(None) => {}
            Err(err) if is_not_open(&err) => {
                if !idle {
                    info!(error = %err, "board channel not available, retrying");
                    idle = true;
                }
                thread::sleep(poll_interval);
            }
            Err(err) => {
                warn!(error = %err, "board channel read failed");
                thread::sleep(poll_interval);
            }
        }
    }
    debug!("link reader exiting");
}

fn is_not_open(err: &FrameError) -> bool {
    match err {
        FrameError::ConnectionClosed => true,
        FrameError::Io(io) => matches!(
            io.kind(),
            ErrorKind::NotConnected | ErrorKind::BrokenPipe | ErrorKind::UnexpectedEof
        ),
        _ => false,
    }
}
