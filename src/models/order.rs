//! Purchase plans and client order id generation.

use rand::Rng;
use rust_decimal::Decimal;
use std::collections::HashMap;

/// Pending purchases keyed by ticker: share quantity and sizing price.
/// Built during sizing, drained during exit attachment. Quantities are
/// always positive; zero-quantity sizings never produce an entry here.
pub type PendingPurchases = HashMap<String, (u64, Decimal)>;

const TOKEN_LEN: usize = 5;
const TOKEN_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Generate the per-invocation batch token: 5 random characters from
/// uppercase ASCII letters and digits.
///
/// Generated exactly once per tweet-processing invocation and reused for
/// every ticker's client order id within it. Collisions across invocations
/// are possible and unmanaged.
pub fn new_batch_token() -> String {
    let mut rng = rand::thread_rng();
    (0..TOKEN_LEN)
        .map(|_| TOKEN_CHARSET[rng.gen_range(0..TOKEN_CHARSET.len())] as char)
        .collect()
}

/// Client-assigned correlation id for an entry order: `{ticker}+{token}`.
pub fn client_order_id(ticker: &str, token: &str) -> String {
    format!("{}+{}", ticker, token)
}
