use bytes::{BufMut, Bytes, BytesMut};
use tracing::{info, warn};

/// Marks the start of every frame.
pub const START_MARKER: [u8; 2] = [0xFF, 0x55];

/// Terminates board-to-host frames ("\r\n").
pub const END_MARKER: [u8; 2] = [0x0D, 0x0A];

/// Default bound on bytes held while waiting for a frame to complete.
pub const DEFAULT_MAX_BUFFER: usize = 4 * 1024;

const INITIAL_BUFFER_CAPACITY: usize = 64;

/// Marker search position of the [`Framer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    SeekStart1,
    SeekStart2,
    SeekEnd1,
    SeekEnd2,
}

/// Outcome of feeding one byte to the [`Framer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scan {
    /// No frame completed yet.
    Incomplete,
    /// An empty frame (`FF 55 0D 0A`); the board sends these as pings.
    Keepalive { leading: Bytes },
    /// A complete payload, plus whatever stray bytes preceded its start marker.
    Frame { payload: Bytes, leading: Bytes },
    /// The buffer grew past its bound without completing a frame and was dropped.
    Overflow { discarded: usize },
}

/// Configuration for the inbound framer.
#[derive(Debug, Clone)]
pub struct FramerConfig {
    /// Maximum bytes buffered before an unterminated frame is discarded.
    pub max_buffer: usize,
}

impl Default for FramerConfig {
    fn default() -> Self {
        Self {
            max_buffer: DEFAULT_MAX_BUFFER,
        }
    }
}

/// Byte-at-a-time reassembly of marker-delimited payloads.
///
/// Every byte lands in a single rolling buffer. The buffer is cleared only
/// when a frame (or keepalive) completes, so bytes after a false start stay
/// put until a real `FF 55 ... 0D 0A` shows up.
#[derive(Debug)]
pub struct Framer {
    buf: BytesMut,
    state: ScanState,
    start: usize,
    end: usize,
    config: FramerConfig,
}

impl Default for Framer {
    fn default() -> Self {
        Self::new()
    }
}

impl Framer {
    /// Create a framer with default configuration.
    pub fn new() -> Self {
        Self::with_config(FramerConfig::default())
    }

    /// Create a framer with explicit configuration.
    pub fn with_config(config: FramerConfig) -> Self {
        Self {
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
            state: ScanState::SeekStart1,
            start: 0,
            end: 0,
            config,
        }
    }

    /// Feed one byte.
    pub fn push(&mut self, byte: u8) -> Scan {
        let index = self.buf.len();
        self.buf.put_u8(byte);

        match self.state {
            ScanState::SeekStart1 => {
                if byte == START_MARKER[0] {
                    self.state = ScanState::SeekStart2;
                }
            }
            ScanState::SeekStart2 => {
                if byte == START_MARKER[1] {
                    self.start = index + 1;
                    self.state = ScanState::SeekEnd1;
                } else {
                    self.state = ScanState::SeekStart1;
                }
            }
            ScanState::SeekEnd1 => {
                if byte == END_MARKER[0] {
                    self.end = index;
                    self.state = ScanState::SeekEnd2;
                }
            }
            ScanState::SeekEnd2 => {
                if byte == END_MARKER[1] {
                    return self.complete();
                }
                // A repeated CR may itself start the end marker.
                if byte == END_MARKER[0] {
                    self.end = index;
                } else {
                    self.state = ScanState::SeekEnd1;
                }
            }
        }

        if self.buf.len() > self.config.max_buffer {
            let discarded = self.buf.len();
            warn!(discarded, "framer buffer overflow, dropping unterminated input");
            self.reset();
            return Scan::Overflow { discarded };
        }

        Scan::Incomplete
    }

    /// Feed a run of bytes, collecting every completed payload in order.
    pub fn extend(&mut self, bytes: &[u8]) -> Vec<Bytes> {
        bytes
            .iter()
            .filter_map(|&byte| match self.push(byte) {
                Scan::Frame { payload, .. } => Some(payload),
                _ => None,
            })
            .collect()
    }

    /// Current marker search position.
    pub fn state(&self) -> ScanState {
        self.state
    }

    /// Number of bytes held in the rolling buffer.
    pub fn buffered(&self) -> usize {
        self.buf.len()
    }

    /// Discard buffered input and restart the marker search.
    pub fn reset(&mut self) {
        self.buf.clear();
        self.state = ScanState::SeekStart1;
        self.start = 0;
        self.end = 0;
    }

    fn complete(&mut self) -> Scan {
        let whole = self.buf.split().freeze();
        let (start, end) = (self.start, self.end);
        self.reset();

        let leading = whole.slice(..start - START_MARKER.len());
        if !leading.is_empty() {
            info!(
                text = %String::from_utf8_lossy(&leading),
                "leading incoming text"
            );
        }

        if start == end {
            return Scan::Keepalive { leading };
        }
        Scan::Frame {
            payload: whole.slice(start..end),
            leading,
        }
    }
}
