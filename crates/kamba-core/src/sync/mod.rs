//! Push channel
//!
//! Subscribes to the server's update stream so the client hears about
//! out-of-band task changes. Messages only signal *that* something changed;
//! except for the initial snapshot, the authoritative data is always
//! re-fetched over REST.

mod listener;
mod message;

pub use listener::{
    spawn_update_listener, ConnectionStatus, ListenerCommand, ListenerConfig, ListenerHandle,
    PushEvent,
};
pub use message::{Reconcile, UpdateAction, UpdateMessage};
