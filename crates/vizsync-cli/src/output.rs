use vizsync_core::ports::{INotificationService, Notification, NotificationKind};

/// Output format selector
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputFormat {
    Human,
    Json,
}

/// Trait for formatting CLI output
pub trait OutputFormatter: Send + Sync {
    fn success(&self, message: &str);
    fn error(&self, message: &str);
    fn warn(&self, message: &str);
    fn info(&self, message: &str);
    fn print_json(&self, value: &serde_json::Value);
}

/// Human-readable output formatter with checkmarks and indentation
pub struct HumanFormatter;

impl OutputFormatter for HumanFormatter {
    fn success(&self, message: &str) {
        println!("\u{2713} {}", message);
    }
    fn error(&self, message: &str) {
        eprintln!("\u{2717} Error: {}", message);
    }
    fn warn(&self, message: &str) {
        eprintln!("\u{26a0} Warning: {}", message);
    }
    fn info(&self, message: &str) {
        println!("  {}", message);
    }
    fn print_json(&self, _value: &serde_json::Value) {
        // Human formatter doesn't print JSON
    }
}

/// JSON output formatter
pub struct JsonFormatter;

impl OutputFormatter for JsonFormatter {
    fn success(&self, message: &str) {
        println!(
            "{}",
            serde_json::json!({"success": true, "message": message})
        );
    }
    fn error(&self, message: &str) {
        eprintln!(
            "{}",
            serde_json::json!({"success": false, "error": message})
        );
    }
    fn warn(&self, message: &str) {
        eprintln!(
            "{}",
            serde_json::json!({"level": "warning", "message": message})
        );
    }
    fn info(&self, _message: &str) {}
    fn print_json(&self, value: &serde_json::Value) {
        println!(
            "{}",
            serde_json::to_string_pretty(value).unwrap_or_default()
        );
    }
}

pub fn get_formatter(json: bool) -> Box<dyn OutputFormatter> {
    if json {
        Box::new(JsonFormatter)
    } else {
        Box::new(HumanFormatter)
    }
}

/// Shows use-case notifications on the terminal
pub struct ConsoleNotifier {
    format: OutputFormat,
    quiet: bool,
}

impl ConsoleNotifier {
    pub fn new(format: OutputFormat, quiet: bool) -> Self {
        Self { format, quiet }
    }

    /// Single line shown for a notification in human mode
    fn line(notification: &Notification) -> String {
        if notification.description.is_empty() {
            notification.message.clone()
        } else {
            format!("{}: {}", notification.message, notification.description)
        }
    }
}

#[async_trait::async_trait]
impl INotificationService for ConsoleNotifier {
    async fn notify(&self, notification: &Notification) -> anyhow::Result<()> {
        let visible = !self.quiet
            || matches!(
                notification.kind,
                NotificationKind::Warning | NotificationKind::Error
            );
        if !visible {
            return Ok(());
        }

        if self.format == OutputFormat::Json {
            eprintln!("{}", serde_json::to_string(notification)?);
            return Ok(());
        }

        let formatter = HumanFormatter;
        let line = Self::line(notification);
        match notification.kind {
            NotificationKind::Success => formatter.success(&line),
            NotificationKind::Info => formatter.info(&line),
            NotificationKind::Warning => formatter.warn(&line),
            NotificationKind::Error => formatter.error(&line),
        }
        Ok(())
    }
}
