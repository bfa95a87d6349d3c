//! Terminal rendering for command results and coordinator notifications
//!
//! Results go to stdout; warnings, errors and notifications that report a
//! failure go to stderr so `--json` output on stdout stays parseable.

use sitecheck_core::ports::{Notification, NotificationKind};

/// Output format selector
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputFormat {
    Human,
    Json,
}

/// Trait for formatting CLI output
pub trait OutputFormatter {
    fn success(&self, message: &str);
    fn error(&self, message: &str);
    fn warn(&self, message: &str);
    fn info(&self, message: &str);
    fn print_json(&self, value: &serde_json::Value);
    /// Renders a notification emitted by the assignment coordinator
    fn notification(&self, notification: &Notification);
}

fn kind_marker(kind: NotificationKind) -> &'static str {
    match kind {
        NotificationKind::Success => "\u{2713}",
        NotificationKind::Warning => "\u{26a0}",
        NotificationKind::Error => "\u{2717}",
    }
}

/// One-line human form: marker, kind tag, message
fn human_notification_line(notification: &Notification) -> String {
    format!(
        "{} [{}] {}",
        kind_marker(notification.kind),
        notification.kind,
        notification.message
    )
}

fn json_notification(notification: &Notification) -> serde_json::Value {
    serde_json::json!({ "notification": notification })
}

/// Human-readable output formatter
pub struct HumanFormatter {
    /// Suppress informational lines
    pub quiet: bool,
}

impl OutputFormatter for HumanFormatter {
    fn success(&self, message: &str) {
        println!("{} {}", kind_marker(NotificationKind::Success), message);
    }
    fn error(&self, message: &str) {
        eprintln!("{} Error: {}", kind_marker(NotificationKind::Error), message);
    }
    fn warn(&self, message: &str) {
        eprintln!("{} Warning: {}", kind_marker(NotificationKind::Warning), message);
    }
    fn info(&self, message: &str) {
        if !self.quiet {
            println!("  {}", message);
        }
    }
    fn print_json(&self, _value: &serde_json::Value) {}
    fn notification(&self, notification: &Notification) {
        let line = human_notification_line(notification);
        match notification.kind {
            NotificationKind::Success => println!("{line}"),
            NotificationKind::Warning | NotificationKind::Error => eprintln!("{line}"),
        }
    }
}

/// JSON output formatter
pub struct JsonFormatter;

impl OutputFormatter for JsonFormatter {
    fn success(&self, message: &str) {
        println!("{}", serde_json::json!({"success": true, "message": message}));
    }
    fn error(&self, message: &str) {
        eprintln!("{}", serde_json::json!({"success": false, "error": message}));
    }
    fn warn(&self, message: &str) {
        eprintln!("{}", serde_json::json!({"level": "warning", "message": message}));
    }
    fn info(&self, _message: &str) {}
    fn print_json(&self, value: &serde_json::Value) {
        println!("{}", serde_json::to_string_pretty(value).unwrap_or_default());
    }
    fn notification(&self, notification: &Notification) {
        eprintln!("{}", json_notification(notification));
    }
}

pub fn get_formatter(format: OutputFormat, quiet: bool) -> Box<dyn OutputFormatter> {
    match format {
        OutputFormat::Json => Box::new(JsonFormatter),
        OutputFormat::Human => Box::new(HumanFormatter { quiet }),
    }
}
