use todu_shop_core::{Notice, Notifier, Severity};

/// Prints notices for the terminal user: warnings and errors to stderr,
/// everything else to stdout.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notice: Notice) {
        tracing::debug!(severity = %notice.severity, "{}", notice);
        match notice.severity {
            Severity::Warning => eprintln!("Warning: {}", notice),
            Severity::Error => eprintln!("Error: {}", notice),
            Severity::Info | Severity::Success => println!("{}", notice),
        }
    }
}
