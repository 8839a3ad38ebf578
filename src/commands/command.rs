//! Command trait definition for CLI commands.
//!
//! Every `tweetstat` subcommand implements [`Command`]; `main` dispatches to it
//! through `enum_dispatch`.

use anyhow::Result;
use enum_dispatch::enum_dispatch;

/// Trait implemented by all tweetstat CLI commands.
#[enum_dispatch]
pub trait Command {
    #[allow(clippy::missing_errors_doc)]
    fn execute(&self) -> Result<()>;
}
