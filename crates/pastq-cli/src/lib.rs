pub mod render;

/// Transient status line, the CLI's equivalent of the page toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ok,
    Warn,
    Bad,
}

/// Print a one-line status message. Warnings and failures go to stderr.
pub fn report(status: Status, msg: &str) {
    match status {
        Status::Ok => println!("{} {}", console::style("ok").green().bold(), msg),
        Status::Warn => eprintln!("{} {}", console::style("warn").yellow().bold(), msg),
        Status::Bad => eprintln!("{} {}", console::style("error").red().bold(), msg),
    }
}

/// Blocking confirmation gate for destructive actions. An explicit `--yes`
/// style flag bypasses the prompt; otherwise `ask` must return true before
/// the caller may proceed.
pub fn confirm_or_flag(yes: bool, ask: impl FnOnce() -> bool) -> bool {
    yes || ask()
}

/// Truncate a string to max_len characters, appending "..." if truncated.
/// Counts characters, not bytes: headings routinely carry em-dashes and
/// accented course titles, which must never split mid-character.
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Initialize tracing for the CLI binary.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}
