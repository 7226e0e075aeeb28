//! Interactive chat module
//!
//! Provides a line-based interactive chat over stdin.

mod interrupt;
mod repl;

pub use interrupt::submit_interruptible;
pub use repl::ChatRepl;
