//! Errors generated by the generators.

/// Convenience wrapper to represent success or a meaningful generator error.
pub type GenResult<T> = std::result::Result<T, Error>;

/// Errors generated by the generators.
///
/// Every error is an authoring mistake (a name missing from a table, a bad
/// override) or an output failure. None of them are recoverable; the driver
/// reports the message and exits.
pub struct Error {
    kind: Box<ErrorKind>,
    post_msg: Option<String>,
}

/// The kinds of errors the generators report.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// A name was looked up in a static table that does not define it.
    #[error("Undefined {kind}: {name}")]
    Undefined { name: String, kind: String },

    /// A port range or port remapping is empty or does not fit.
    #[error("Invalid port range: {0}")]
    InvalidRange(String),

    /// A command line override could not be applied.
    #[error("Invalid option: {0}")]
    InvalidOption(String),

    /// Failure while writing the generated text.
    #[error("{0}")]
    WriteError(String),
}

impl std::fmt::Debug for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.kind)?;
        if let Some(post) = &self.post_msg {
            write!(f, "\n{post}")?;
        }
        Ok(())
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        std::fmt::Debug::fmt(self, f)
    }
}

impl std::error::Error for Error {}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Self {
            kind: Box::new(kind),
            post_msg: None,
        }
    }
}

impl Error {
    /// Attach a message that is printed after the error itself.
    pub fn with_post_msg(mut self, msg: Option<String>) -> Self {
        self.post_msg = msg;
        self
    }

    pub fn undefined<N: ToString, K: ToString>(name: N, kind: K) -> Self {
        ErrorKind::Undefined {
            name: name.to_string(),
            kind: kind.to_string(),
        }
        .into()
    }

    pub fn invalid_range<S: ToString>(msg: S) -> Self {
        ErrorKind::InvalidRange(msg.to_string()).into()
    }

    pub fn invalid_option<S: ToString>(msg: S) -> Self {
        ErrorKind::InvalidOption(msg.to_string()).into()
    }

    pub fn write_error<S: ToString>(msg: S) -> Self {
        ErrorKind::WriteError(msg.to_string()).into()
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub fn message(&self) -> String {
        self.kind.to_string()
    }
}

// Conversions from other error types to our error type so that
// we can use `?` in all the places.
impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::write_error(format!("IO Error: {e}"))
    }
}

impl From<std::fmt::Error> for Error {
    fn from(e: std::fmt::Error) -> Self {
        Error::write_error(format!("Formatting Error: {e}"))
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::write_error(format!("serde_json Error: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn undefined_names_the_key() {
        let err = Error::undefined("ARFOO", "AXI signal");
        assert_eq!(err.message(), "Undefined AXI signal: ARFOO");
        assert!(matches!(err.kind(), ErrorKind::Undefined { name, .. } if name == "ARFOO"));
    }

    #[test]
    fn post_msg_follows_the_message() {
        let err = Error::invalid_option("unknown key `foo`")
            .with_post_msg(Some("Valid keys: bar".to_string()));
        assert_eq!(
            format!("{err:?}"),
            "Invalid option: unknown key `foo`\nValid keys: bar"
        );
    }

    #[test]
    fn io_errors_become_write_errors() {
        let io = std::io::Error::other("disk full");
        let err: Error = io.into();
        assert!(matches!(err.kind(), ErrorKind::WriteError(_)));
        assert!(err.message().contains("disk full"));
    }
}
