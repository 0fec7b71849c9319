//! Platform adapters for the terminal frontend
//!
//! - **`FileTokenStore`**: persists the session token between invocations.
//! - **`TerminalNavigator`**: records where the unauthorized hook sends the user.
//! - **`DirectoryExportSink`**: writes exported zone files to disk.

mod export_sink;
mod navigator;
mod token_store;

pub use export_sink::DirectoryExportSink;
pub use navigator::TerminalNavigator;
pub use token_store::FileTokenStore;
