//! Session state management
//!
//! This module contains the state containers owned by the session
//! controller:
//! - SessionState: domains, conversations, the current conversation and its messages
//! - SendPhase: where the in-flight send currently is
//! - Notification: transient user-facing messages

mod notifications;
mod session;

pub use notifications::{Notification, NotificationLevel};
pub use session::{InFlightSend, SendPhase, SessionState};
