//! Authentication module for the admin session.
//!
//! This module provides:
//! - `TokenStorage`: persistent key-value storage for the admin token
//! - `SessionStore`: the in-memory token, loaded from storage at startup
//! - `TokenWatch`: change detection so a token change triggers one fetch
//!
//! Tokens are opaque; nothing here validates or expires them.

pub mod session;
pub mod storage;
pub mod watch;

pub use session::{SessionStore, TOKEN_KEY};
pub use storage::{FileStorage, MemoryStorage, TokenStorage};
pub use watch::TokenWatch;
