use std::collections::HashMap;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Mutex, MutexGuard, PoisonError};

use megalink_frame::{decode_reply, Reply};
use tracing::{debug, info, warn};

use crate::exchange::Exchange;

/// How a reply is delivered when several exchanges wait on its key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReplyRouting {
    /// Every pending exchange under the key receives the same value.
    #[default]
    Broadcast,
    /// Only the earliest-registered exchange receives the value.
    Oldest,
}

/// Routes decoded replies to pending exchanges by correlation key.
///
/// One lock covers registration, lookup, completion and removal, so a reply
/// can never observe a half-registered exchange.
#[derive(Debug)]
pub struct Dispatcher {
    routing: ReplyRouting,
    pending: Mutex<HashMap<u8, Vec<Exchange>>>,
    observers: Mutex<Vec<Sender<Reply>>>,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new(ReplyRouting::default())
    }
}

impl Dispatcher {
    pub fn new(routing: ReplyRouting) -> Self {
        Self {
            routing,
            pending: Mutex::new(HashMap::new()),
            observers: Mutex::new(Vec::new()),
        }
    }

    pub fn routing(&self) -> ReplyRouting {
        self.routing
    }

    /// Queue `exchange` under its key. Commands without a key are ignored.
    pub fn register(&self, exchange: &Exchange) {
        let Some(key) = exchange.key() else {
            return;
        };
        let mut pending = self.pending();
        let queue = pending.entry(key).or_default();
        queue.push(exchange.clone());
        debug!(key, queued = queue.len(), %exchange, "registered exchange");
    }

    /// Remove a pending exchange without completing it.
    ///
    /// Returns `false` if it was not pending.
    pub fn cancel(&self, exchange: &Exchange) -> bool {
        let Some(key) = exchange.key() else {
            return false;
        };
        let mut pending = self.pending();
        let Some(queue) = pending.get_mut(&key) else {
            return false;
        };
        let before = queue.len();
        queue.retain(|queued| !queued.ptr_eq(exchange));
        let removed = queue.len() < before;
        if queue.is_empty() {
            pending.remove(&key);
        }
        removed
    }

    /// Decode one framed payload and complete the exchanges waiting on it.
    ///
    /// Returns the number of exchanges completed. Short payloads, malformed
    /// values and unmatched keys are logged and dropped.
    pub fn dispatch(&self, payload: &[u8]) -> usize {
        let reply = match decode_reply(payload) {
            Ok(Some(reply)) => reply,
            Ok(None) => {
                debug!(len = payload.len(), "ignoring payload without key and type");
                return 0;
            }
            Err(err) => {
                warn!(error = %err, ?payload, "dropping undecodable reply");
                return 0;
            }
        };
        info!(key = reply.key, value = %reply.value, "received reply");

        self.notify_observers(&reply);
        self.deliver(&reply)
    }

    /// Complete exchanges waiting on `reply.key`.
    pub fn deliver(&self, reply: &Reply) -> usize {
        let mut pending = self.pending();
        let Some(queue) = pending.get_mut(&reply.key) else {
            info!(key = reply.key, value = %reply.value, "no exchange waiting for reply");
            return 0;
        };

        let completed: Vec<Exchange> = match self.routing {
            ReplyRouting::Broadcast => std::mem::take(queue),
            ReplyRouting::Oldest => vec![queue.remove(0)],
        };
        if queue.is_empty() {
            pending.remove(&reply.key);
        }
        if completed.len() > 1 {
            info!(
                key = reply.key,
                count = completed.len(),
                "broadcasting reply to several exchanges"
            );
        }

        for exchange in &completed {
            exchange.complete(reply.value.clone());
        }
        completed.len()
    }

    /// Receive a copy of every decoded reply, matched or not.
    ///
    /// Dropping the receiver unsubscribes.
    pub fn subscribe(&self) -> Receiver<Reply> {
        let (tx, rx) = mpsc::channel();
        self.observers().push(tx);
        rx
    }

    /// Number of exchanges still waiting for a reply.
    pub fn pending_count(&self) -> usize {
        self.pending().values().map(Vec::len).sum()
    }

    /// Drop every pending exchange without completing it.
    pub fn clear(&self) -> usize {
        let mut pending = self.pending();
        let dropped = pending.values().map(Vec::len).sum();
        pending.clear();
        dropped
    }

    fn notify_observers(&self, reply: &Reply) {
        self.observers()
            .retain(|observer| observer.send(reply.clone()).is_ok());
    }

    fn pending(&self) -> MutexGuard<'_, HashMap<u8, Vec<Exchange>>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn observers(&self) -> MutexGuard<'_, Vec<Sender<Reply>>> {
        self.observers.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use megalink_frame::{Framer, Value};

    use super::*;
    use crate::message::Message;
    use crate::sensor::Sensor;

    fn ultrasonic() -> Exchange {
        Exchange::new(&Message::read(Sensor::Ultrasonic, 10))
    }

    #[test]
    fn reply_completes_registered_exchange() {
        let dispatcher = Dispatcher::default();
        let exchange = ultrasonic();
        dispatcher.register(&exchange);
        assert_eq!(dispatcher.pending_count(), 1);

        assert_eq!(dispatcher.dispatch(&[0xA1, 0x03, 0x2C, 0x00]), 1);
        assert_eq!(exchange.value().unwrap(), Value::Short(44));
        assert_eq!(dispatcher.pending_count(), 0);
    }

    #[test]
    fn broadcast_completes_every_exchange_under_key() {
        let dispatcher = Dispatcher::default();
        let first = ultrasonic();
        let second = ultrasonic();
        dispatcher.register(&first);
        dispatcher.register(&second);

        assert_eq!(dispatcher.dispatch(&[0xA1, 0x01, 0x05]), 2);
        assert_eq!(first.value().unwrap(), Value::Byte(5));
        assert_eq!(second.value().unwrap(), Value::Byte(5));
        assert_eq!(dispatcher.pending_count(), 0);
    }

    #[test]
    fn oldest_routing_completes_one_at_a_time() {
        let dispatcher = Dispatcher::new(ReplyRouting::Oldest);
        let first = ultrasonic();
        let second = ultrasonic();
        dispatcher.register(&first);
        dispatcher.register(&second);

        assert_eq!(dispatcher.dispatch(&[0xA1, 0x01, 0x01]), 1);
        assert_eq!(first.value().unwrap(), Value::Byte(1));
        assert!(!second.is_completed());

        assert_eq!(dispatcher.dispatch(&[0xA1, 0x01, 0x02]), 1);
        assert_eq!(second.value().unwrap(), Value::Byte(2));
        assert_eq!(dispatcher.pending_count(), 0);
    }

    #[test]
    fn unmatched_reply_is_dropped() {
        let dispatcher = Dispatcher::default();
        let exchange = ultrasonic();
        dispatcher.register(&exchange);

        assert_eq!(dispatcher.dispatch(&[0x07, 0x03, 0x01, 0x00]), 0);
        assert!(!exchange.is_completed());
        assert_eq!(dispatcher.pending_count(), 1);
    }

    #[test]
    fn short_and_malformed_payloads_are_ignored() {
        let dispatcher = Dispatcher::default();
        let exchange = ultrasonic();
        dispatcher.register(&exchange);

        assert_eq!(dispatcher.dispatch(&[]), 0);
        assert_eq!(dispatcher.dispatch(&[0xA1]), 0);
        assert_eq!(dispatcher.dispatch(&[0xA1, 0x02, 0x00]), 0);
        assert_eq!(dispatcher.dispatch(&[0xA1, 0x09, 0x00]), 0);
        assert!(!exchange.is_completed());
    }

    #[test]
    fn commands_are_never_registered() {
        let dispatcher = Dispatcher::default();
        dispatcher.register(&Exchange::new(&Message::PressureBegin));
        assert_eq!(dispatcher.pending_count(), 0);
    }

    #[test]
    fn late_reply_for_abandoned_exchange_is_tolerated() {
        let dispatcher = Dispatcher::default();
        dispatcher.register(&ultrasonic());
        // The caller's handle is gone; the registry still holds a clone.
        assert_eq!(dispatcher.dispatch(&[0xA1, 0x03, 0x2C, 0x00]), 1);
    }

    #[test]
    fn subscribers_see_every_reply() {
        let dispatcher = Dispatcher::default();
        let rx = dispatcher.subscribe();

        dispatcher.dispatch(&[0x07, 0x03, 0x01, 0x00]);
        dispatcher.dispatch(&[0x08, 0x06, 0x02, 0x00, 0x00, 0x00]);

        let first = rx.try_recv().unwrap();
        assert_eq!((first.key, first.value), (0x07, Value::Short(1)));
        let second = rx.try_recv().unwrap();
        assert_eq!((second.key, second.value), (0x08, Value::Long(2)));
    }

    #[test]
    fn dropped_subscribers_are_pruned() {
        let dispatcher = Dispatcher::default();
        drop(dispatcher.subscribe());
        dispatcher.dispatch(&[0x07, 0x01, 0x01]);
        assert!(dispatcher.observers().is_empty());
    }

    #[test]
    fn cancel_removes_only_that_exchange() {
        let dispatcher = Dispatcher::default();
        let kept = ultrasonic();
        let cancelled = ultrasonic();
        dispatcher.register(&kept);
        dispatcher.register(&cancelled);

        assert!(dispatcher.cancel(&cancelled));
        assert!(!dispatcher.cancel(&cancelled));
        assert_eq!(dispatcher.dispatch(&[0xA1, 0x01, 0x09]), 1);
        assert!(kept.is_completed());
        assert!(!cancelled.is_completed());
    }

    #[test]
    fn clear_drops_pending() {
        let dispatcher = Dispatcher::default();
        dispatcher.register(&ultrasonic());
        dispatcher.register(&ultrasonic());
        assert_eq!(dispatcher.clear(), 2);
        assert_eq!(dispatcher.pending_count(), 0);
    }

    #[test]
    fn framed_reply_ending_in_carriage_return_completes() {
        let dispatcher = Dispatcher::default();
        let exchange = ultrasonic();
        dispatcher.register(&exchange);

        let mut framer = Framer::new();
        let payloads = framer.extend(&[0xFF, 0x55, 0xA1, 0x03, 0x00, 0x0D, 0x0D, 0x0A]);
        assert_eq!(payloads.len(), 1);
        assert_eq!(dispatcher.dispatch(&payloads[0]), 1);
        assert_eq!(exchange.try_value(), Some(Value::Short(3328)));
    }
}
