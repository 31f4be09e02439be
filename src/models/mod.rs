//! Data models for accounts, purchases, and order correlation ids.

mod account;
mod order;

pub use account::AccountSnapshot;
pub use order::{client_order_id, new_batch_token, PendingPurchases};
