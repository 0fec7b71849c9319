//! Platform seams the controllers depend on.

/// Destination of exported zone files.
///
/// Platform implementations:
/// - CLI: writes `<name>.zone` into an output directory
/// - Tests: records the saved payloads
pub trait ExportSink: Send + Sync {
    /// Persist `contents` under `file_name`. Returns where it ended up, for display.
    fn save(&self, file_name: &str, contents: &[u8]) -> std::io::Result<String>;
}
