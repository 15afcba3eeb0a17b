//! Request/reply correlation for MegaPi-class boards.
//!
//! This is the layer callers use. Build a [`Message`], hand it to
//! [`Link::send`], and optionally block on the returned [`Exchange`] for
//! the decoded reply. A background thread reads the board channel, frames
//! inbound bytes and lets the [`Dispatcher`] complete pending exchanges by
//! correlation key.

pub mod catalog;
pub mod connector;
pub mod dispatcher;
pub mod error;
pub mod exchange;
pub mod link;
pub mod message;
pub mod sensor;

pub use catalog::{CatalogEntry, Params, CATALOG};
pub use connector::{open, open_with_config};
pub use dispatcher::{Dispatcher, ReplyRouting};
pub use error::{LinkError, Result};
pub use exchange::Exchange;
pub use link::{Link, LinkConfig};
pub use message::{correlation_key, Message, MessageKind};
pub use sensor::Sensor;

pub use megalink_frame::{Reply, Value};
