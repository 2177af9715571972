//! JSON output formatting.

use crate::types::ScanSession;

/// Render a session as pretty-printed JSON.
pub fn session_json(session: &ScanSession) -> serde_json::Result<String> {
    serde_json::to_string_pretty(session)
}
