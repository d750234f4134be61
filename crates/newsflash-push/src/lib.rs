//! # newsflash-push
//!
//! Store-and-forward push notification dispatch. Looks up active device
//! tokens for a resolved recipient set, partitions them into
//! gateway-sized batches, and hands them to the push gateway. Dispatch is
//! fire-and-forget: failures are logged and contained, never propagated
//! into the request path that triggered them.

pub mod dispatcher;
pub mod formatter;
pub mod gateway;

pub use dispatcher::NotificationDispatcher;
pub use formatter::NotificationFormatter;
pub use gateway::{PushGateway, PushTicket, TicketStatus};
