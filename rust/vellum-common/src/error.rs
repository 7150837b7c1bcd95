use thiserror::Error;

#[derive(Debug, Error)]
#[error(transparent)]
pub struct Error(Box<ErrorKind>);

impl Error {
    pub fn kind(&self) -> &ErrorKind {
        self.0.as_ref()
    }

    pub fn into_kind(self) -> ErrorKind {
        *self.0
    }

    pub fn invalid_format(element: impl Into<String>, message: impl Into<String>) -> Error {
        Error(
            ErrorKind::InvalidFormat {
                element: element.into(),
                message: message.into(),
            }
            .into(),
        )
    }

    pub fn invalid_arg(name: impl Into<String>, message: impl Into<String>) -> Error {
        Error(
            ErrorKind::InvalidArgument {
                name: name.into(),
                message: message.into(),
            }
            .into(),
        )
    }

    /// Construction-order violation: the builder was driven out of sequence.
    pub fn invalid_operation(name: impl Into<String>) -> Error {
        Error(ErrorKind::InvalidOperation { name: name.into() }.into())
    }

    /// Returns `true` for errors that signal misuse of the builder API
    /// rather than bad input data.
    pub fn is_construction_error(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::InvalidOperation { .. } | ErrorKind::AlreadyFinished
        )
    }
}

#[derive(Debug, Error)]
pub enum ErrorKind {
    #[error("invalid argument {name}: {message}")]
    InvalidArgument { name: String, message: String },

    #[error("invalid operation {name}")]
    InvalidOperation { name: String },

    #[error("buffer is already finished")]
    AlreadyFinished,

    #[error("invalid buffer format for '{element}': {message}")]
    InvalidFormat { element: String, message: String },

    #[error("required field at slot {slot} must be set")]
    RequiredFieldMissing { slot: u16 },

    #[error(
        "file identifier mismatch: expected {}, found {}",
        String::from_utf8_lossy(.expected),
        String::from_utf8_lossy(.actual)
    )]
    IdentifierMismatch { expected: [u8; 4], actual: [u8; 4] },

    #[error("buffer cannot grow to {requested} bytes (maximum is {max})")]
    BufferTooLarge { requested: usize, max: usize },

    #[error("union discriminator {tag} does not agree with its payload")]
    UnionMismatch { tag: u8 },
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Error(kind.into())
    }
}

impl From<std::str::Utf8Error> for Error {
    fn from(e: std::str::Utf8Error) -> Self {
        Error::invalid_format("string", e.to_string())
    }
}
