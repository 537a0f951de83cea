use core::fmt;
use std::error::Error;
use std::fmt::Display;

/// Category of the failure, decides how the protocol reacts to it.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Display)]
pub enum BullyErrorKind {
    /// Peer unreachable, send or receive failed or timed out.
    Transport,

    /// Malformed or inconsistent request or reply.
    ProtocolViolation,

    /// Local resource cannot be acquired.
    Resource,
}

#[derive(Clone, Debug)]
pub struct BullyError {
    kind: BullyErrorKind,
    text: String,
    cause: String,
}

pub type Result<T> = std::result::Result<T, BullyError>;

pub fn new_err<T>(kind: BullyErrorKind, text: String, cause: String) -> Result<T> {
    Err(BullyError { kind, text, cause })
}

impl BullyError {
    pub fn kind(&self) -> BullyErrorKind {
        self.kind
    }
}

impl Display for BullyError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let cause_word = {
            if !self.cause.is_empty() {
                " Cause: ".to_string()
            } else {
                String::new()
            }
        };
        write!(f, "{} error: {}.{}{}", self.kind, self.text, cause_word, self.cause)
    }
}

impl Error for BullyError {}

pub(crate) fn new_multiple_err<T>(
    kind: BullyErrorKind,
    text: String,
    causes: Vec<BullyError>,
) -> Result<T> {
    let mut error_string = String::new();

    if !causes.is_empty() {
        error_string.push_str("Errors: ");
    }

    for (error_index, err) in causes.iter().enumerate() {
        error_string.push_str(&format!("{}) {} ", error_index + 1, err));
    }
    Err(BullyError {
        kind,
        text,
        cause: error_string.trim_end().to_string(),
    })
}
