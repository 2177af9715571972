//! Plain text output formatting.
//!
//! Produces human-readable, color-styled lines for incremental results
//! and a closing summary.

use crate::types::{HostResult, ScanSession};
use console::style;

/// Format one completed host result as a display line.
pub fn format_result_line(result: &HostResult) -> String {
    if result.is_online() {
        let ports = if result.open_ports.is_empty() {
            style("no probed ports open").dim().to_string()
        } else {
            style(result.ports_display()).green().bold().to_string()
        };
        format!(
            "  {:<15}  {}  {}",
            result.addr,
            style("Online ").green().bold(),
            ports
        )
    } else {
        format!(
            "  {:<15}  {}",
            style(result.addr).dim(),
            style("Offline").dim()
        )
    }
}

/// Print a header before the sweep begins.
pub fn print_sweep_header(ranges: &str, total: usize) {
    println!();
    println!(
        "{} {} v{}",
        style("Starting").cyan(),
        style("lansweep").cyan().bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!("{} Ranges: {}", style("•").dim(), style(ranges).white().bold());
    println!(
        "{} Probing {} hosts on ports 22, 80, 443...",
        style("•").dim(),
        style(total).white().bold()
    );
    println!();
}

/// Print the closing summary for a finished sweep.
pub fn print_summary(session: &ScanSession) {
    println!();
    println!(
        "{} {}",
        style("Done:").cyan().bold(),
        session.summary()
    );
}

/// Print an error message.
pub fn print_error(msg: &str) {
    eprintln!("{} {}", style("Error:").red().bold(), msg);
}

/// Print an info message.
pub fn print_info(msg: &str) {
    println!("{} {}", style("ℹ").blue().bold(), msg);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn online_line_contains_ports() {
        let result = HostResult::online("10.0.0.1".parse().unwrap(), vec![22, 80]);
        let line = format_result_line(&result);
        assert!(line.contains("10.0.0.1"));
        assert!(line.contains("22, 80"));
    }

    #[test]
    fn offline_line_has_no_ports() {
        let result = HostResult::offline("10.0.0.2".parse().unwrap());
        let line = format_result_line(&result);
        assert!(line.contains("Offline"));
    }
}
