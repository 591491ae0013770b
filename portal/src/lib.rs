//! Session-side core of the client portal.
//!
//! Everything here runs on behalf of one signed-in user: the session context,
//! the change-feed client, the conversation controller for the open ticket
//! and the notification dispatcher that turns feed events into alerts.

pub mod backend;
pub mod capabilities;
pub mod conversation;
pub mod cue;
pub mod dispatcher;
pub mod feed_client;
pub mod session;
pub mod toast;

pub use capabilities::Capabilities;
pub use conversation::{ConversationError, Phase, StatusTransition, TicketConversation};
pub use dispatcher::{Dispatch, NotificationDispatcher};
pub use feed_client::{FeedClient, FeedHandle};
pub use session::{SessionContext, SessionUser};
