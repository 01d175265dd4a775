use thiserror::Error;

/// Errors raised while parsing a crontab.
///
/// Any error aborts the whole parse: the tick loop must never start with a
/// partially parsed schedule.
#[derive(Debug, Error)]
pub enum CrontabError {
    /// The line does not follow the five-fields-plus-command grammar.
    #[error("crontab line {line}: {reason}")]
    Malformed { line: usize, reason: String },

    /// An `@name` shortcut other than the supported `@weekly`.
    #[error("crontab line {line}: unsupported shortcut @{name}")]
    UnsupportedShortcut { line: usize, name: String },
}

pub type Result<T> = std::result::Result<T, CrontabError>;
