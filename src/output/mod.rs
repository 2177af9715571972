//! Output formatting module.
//!
//! Consumers of the result stream: plain styled text and JSON. These only
//! read completed results; none of the scanning logic lives here.

mod json_format;
mod plain;

pub use json_format::session_json;
pub use plain::{format_result_line, print_error, print_info, print_summary, print_sweep_header};
