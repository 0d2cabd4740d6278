//! Webhook trigger lifecycle
//!
//! The trigger side of the connector: a persisted subscription record, the
//! reconciliation state machine (check-exists → create → delete), and
//! classification of inbound deliveries (verification pings vs events).

mod delivery;
mod lifecycle;
mod store;

pub use delivery::{classify, ping_acknowledgment, Delivery};
pub use lifecycle::{TriggerSettings, WebhookLifecycle};
pub use store::SubscriptionStore;
