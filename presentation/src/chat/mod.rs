//! Interactive chat module
//!
//! Provides a readline-based terminal chat against the relay, for use
//! without a browser front-end.

mod repl;

pub use repl::ChatRepl;
