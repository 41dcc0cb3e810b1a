//! Token Module
//!
//! Recovers the plaintext behind an opaque client token and cleans it up
//! before it is used as a URL or embedded in generated markup.

mod codec;
mod sanitize;

pub use codec::{normalize_key, TokenCodec, BLOCK_SIZE, KEY_LEN};
pub use sanitize::strip_control_chars;
