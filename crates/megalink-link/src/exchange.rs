use std::fmt;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant, SystemTime};

use megalink_frame::Value;
use tracing::debug;

use crate::error::{LinkError, Result};
use crate::message::Message;

/// Caller-side handle for one sent message.
///
/// Cloning is cheap; every clone observes the same reply. The reply value is
/// written at most once, together with its arrival time, and wakes every
/// thread blocked in [`wait`](Self::wait).
#[derive(Clone)]
pub struct Exchange {
    inner: Arc<Inner>,
}

struct Inner {
    label: String,
    key: Option<u8>,
    state: Mutex<State>,
    returned: Condvar,
}

#[derive(Default)]
struct State {
    sent_at: Option<SystemTime>,
    returned_at: Option<SystemTime>,
    value: Option<Value>,
}

impl Exchange {
    /// Create a pending exchange for `message`.
    pub fn new(message: &Message) -> Self {
        Self {
            inner: Arc::new(Inner {
                label: message.to_string(),
                key: message.correlation_key(),
                state: Mutex::new(State::default()),
                returned: Condvar::new(),
            }),
        }
    }

    /// Correlation key, `None` for fire-and-forget commands.
    pub fn key(&self) -> Option<u8> {
        self.inner.key
    }

    /// Whether a reply is expected at all.
    pub fn expects_reply(&self) -> bool {
        self.inner.key.is_some()
    }

    /// Whether both handles refer to the same exchange.
    pub fn ptr_eq(&self, other: &Exchange) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    pub(crate) fn mark_sent(&self) {
        self.state().sent_at = Some(SystemTime::now());
    }

    /// Store the reply and wake waiters.
    ///
    /// Returns `false` (leaving the first value in place) if the exchange
    /// already completed.
    pub fn complete(&self, value: Value) -> bool {
        let mut state = self.state();
        if state.value.is_some() {
            return false;
        }
        state.returned_at = Some(SystemTime::now());
        state.value = Some(value);
        drop(state);

        self.inner.returned.notify_all();
        debug!(exchange = %self, "reply stored");
        true
    }

    /// Whether the reply has arrived.
    pub fn is_completed(&self) -> bool {
        self.state().value.is_some()
    }

    /// The reply value, or [`LinkError::NotReturned`] while still pending.
    pub fn value(&self) -> Result<Value> {
        self.try_value()
            .ok_or_else(|| LinkError::NotReturned(self.inner.label.clone()))
    }

    /// The reply value if it has arrived.
    pub fn try_value(&self) -> Option<Value> {
        self.state().value.clone()
    }

    /// Block until the reply arrives.
    ///
    /// Returns immediately if it already has. There is no deadline; use
    /// [`wait_timeout`](Self::wait_timeout) when the board may stay silent.
    pub fn wait(&self) -> Result<Value> {
        self.ensure_reply_expected()?;
        let state = self
            .inner
            .returned
            .wait_while(self.state(), |state| state.value.is_none())
            .unwrap_or_else(PoisonError::into_inner);
        state
            .value
            .clone()
            .ok_or_else(|| LinkError::NotReturned(self.inner.label.clone()))
    }

    /// Block until the reply arrives or `timeout` elapses.
    ///
    /// A timeout leaves the exchange pending; a late reply still completes it.
    pub fn wait_timeout(&self, timeout: Duration) -> Result<Value> {
        self.ensure_reply_expected()?;
        let deadline = Instant::now() + timeout;
        let mut state = self.state();
        loop {
            if let Some(value) = &state.value {
                return Ok(value.clone());
            }
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Err(LinkError::Timeout(timeout));
            }
            state = self
                .inner
                .returned
                .wait_timeout(state, remaining)
                .unwrap_or_else(PoisonError::into_inner)
                .0;
        }
    }

    /// When the frame was written.
    pub fn time_sent(&self) -> Option<SystemTime> {
        self.state().sent_at
    }

    /// When the reply arrived.
    pub fn time_returned(&self) -> Option<SystemTime> {
        self.state().returned_at
    }

    /// Time between write and reply, once both happened.
    pub fn round_trip(&self) -> Option<Duration> {
        let state = self.state();
        let (sent, returned) = (state.sent_at?, state.returned_at?);
        returned.duration_since(sent).ok()
    }

    fn ensure_reply_expected(&self) -> Result<()> {
        if self.expects_reply() {
            Ok(())
        } else {
            Err(LinkError::NoReplyExpected(self.inner.label.clone()))
        }
    }

    // A panic while holding the lock cannot leave `State` half-written.
    fn state(&self) -> MutexGuard<'_, State> {
        self.inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Display for Exchange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.inner.label)
    }
}

impl fmt::Debug for Exchange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state();
        f.debug_struct("Exchange")
            .field("message", &self.inner.label)
            .field("key", &self.inner.key)
            .field("sent", &state.sent_at.is_some())
            .field("value", &state.value)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;
    use crate::sensor::Sensor;

    fn pending() -> Exchange {
        Exchange::new(&Message::read(Sensor::Ultrasonic, 10))
    }

    #[test]
    fn value_before_reply_is_an_error() {
        let exchange = pending();
        assert_eq!(exchange.key(), Some(161));
        assert!(matches!(exchange.value(), Err(LinkError::NotReturned(_))));
        assert!(exchange.time_returned().is_none());
    }

    #[test]
    fn complete_is_write_once() {
        let exchange = pending();
        assert!(exchange.complete(Value::Short(44)));
        assert!(!exchange.complete(Value::Short(45)));

        assert_eq!(exchange.value().unwrap(), Value::Short(44));
        assert!(exchange.time_returned().is_some());
    }

    #[test]
    fn wait_returns_immediately_when_complete() {
        let exchange = pending();
        exchange.complete(Value::Byte(1));
        assert_eq!(exchange.wait().unwrap(), Value::Byte(1));
        assert_eq!(exchange.wait().unwrap(), Value::Byte(1));
    }

    #[test]
    fn wait_wakes_on_completion_from_other_thread() {
        let exchange = pending();
        let completer = exchange.clone();
        let handle = thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            completer.complete(Value::Long(7));
        });

        assert_eq!(exchange.wait().unwrap(), Value::Long(7));
        handle.join().unwrap();
    }

    #[test]
    fn wait_timeout_leaves_exchange_pending() {
        let exchange = pending();
        let err = exchange.wait_timeout(Duration::from_millis(10)).unwrap_err();
        assert!(matches!(err, LinkError::Timeout(_)));
        assert!(!exchange.is_completed());

        exchange.complete(Value::Short(3));
        assert_eq!(
            exchange.wait_timeout(Duration::from_millis(10)).unwrap(),
            Value::Short(3)
        );
    }

    #[test]
    fn commands_cannot_be_waited_on() {
        let exchange = Exchange::new(&Message::MotorRun { port: 1, speed: 0 });
        assert!(!exchange.expects_reply());
        assert!(matches!(
            exchange.wait(),
            Err(LinkError::NoReplyExpected(_))
        ));
    }

    #[test]
    fn round_trip_needs_both_timestamps() {
        let exchange = pending();
        assert!(exchange.round_trip().is_none());
        exchange.mark_sent();
        exchange.complete(Value::Short(1));
        assert!(exchange.round_trip().is_some());
    }
}
