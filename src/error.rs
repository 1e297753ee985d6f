use std::borrow::Cow;
use std::fmt;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug)]
pub enum Error {
    IO(std::io::Error),
    NotEnoughData {
        want: usize,
        got: usize,
        msg: Option<Cow<'static, str>>,
    },
    InvalidData(Cow<'static, str>),
    /// Rejected at command construction, never sent.
    Validation {
        field: &'static str,
        reason: Cow<'static, str>,
    },
    /// RpbErrorResp returned by the server.
    Server {
        code: u32,
        msg: Cow<'static, str>,
    },
    UnexpectedMessage {
        want: u8,
        got: u8,
    },
    Decode(prost::DecodeError),
    Timeout,
    Closed,
    Other(Cow<'static, str>),
}

impl Error {
    pub(crate) fn validation(field: &'static str, reason: impl Into<Cow<'static, str>>) -> Self {
        Self::Validation {
            field,
            reason: reason.into(),
        }
    }

    /// Whether the failure may go away if the same request is sent again.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::IO(_) | Self::Timeout | Self::Closed)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IO(e) => write!(f, "io: {}", e),
            Self::NotEnoughData { want, got, msg } => {
                write!(f, "not enough data: want {}, got {}", want, got)?;
                if let Some(msg) = msg {
                    write!(f, " ({})", msg)?;
                }
                Ok(())
            }
            Self::InvalidData(msg) => write!(f, "invalid data: {}", msg),
            Self::Validation { field, reason } => write!(f, "invalid {}: {}", field, reason),
            Self::Server { code, msg } => write!(f, "server error {}: {}", code, msg),
            Self::UnexpectedMessage { want, got } => {
                write!(f, "unexpected message code {}, want {}", got, want)
            }
            Self::Decode(e) => write!(f, "decode: {}", e),
            Self::Timeout => f.write_str("request timed out"),
            Self::Closed => f.write_str("connection closed"),
            Self::Other(msg) => f.write_str(msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::IO(e) => Some(e),
            Self::Decode(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::IO(e)
    }
}

impl From<prost::DecodeError> for Error {
    fn from(e: prost::DecodeError) -> Self {
        Self::Decode(e)
    }
}

macro_rules! ensure_buf_size {
    ($buf:expr, $size:expr) => {
        if $buf.len() < $size {
            return Err($crate::Error::NotEnoughData {
                want: $size,
                got: $buf.len(),
                msg: None,
            });
        }
    };

    ($buf:expr, $size:expr, $msg:expr) => {
        if $buf.len() < $size {
            return Err($crate::Error::NotEnoughData {
                want: $size,
                got: $buf.len(),
                msg: Some($msg.into()),
            });
        }
    };
}

pub(crate) use ensure_buf_size;

/// Rejects a required string option that is absent or empty.
macro_rules! ensure_non_empty {
    ($opt:expr, $field:literal) => {
        match $opt {
            Some(v) if !v.is_empty() => v,
            Some(_) => return Err($crate::Error::validation($field, "must not be empty")),
            None => return Err($crate::Error::validation($field, "is required")),
        }
    };
}

pub(crate) use ensure_non_empty;
