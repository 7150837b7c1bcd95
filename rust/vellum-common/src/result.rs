//! Result alias and precondition checks for buffer builders and readers.

pub type Result<T> = std::result::Result<T, crate::error::Error>;

/// Returns early with [`ErrorKind::InvalidArgument`](crate::error::ErrorKind)
/// naming `$name` and the failed condition when `$cond` is false.
#[macro_export]
macro_rules! verify_arg {
    ($name:expr, $cond:expr) => {
        if !($cond) {
            return Err($crate::result::argument_error(
                stringify!($name),
                stringify!($cond),
            )
            .into());
        }
    };
}

/// Like [`verify_arg!`], but for malformed buffer contents
/// ([`ErrorKind::InvalidFormat`](crate::error::ErrorKind)).
#[macro_export]
macro_rules! verify_data {
    ($name:expr, $cond:expr) => {
        if !($cond) {
            return Err($crate::result::format_error(
                stringify!($name),
                stringify!($cond),
            )
            .into());
        }
    };
}

#[cold]
#[inline(never)]
pub fn argument_error(name: &str, condition: &str) -> crate::error::Error {
    crate::error::Error::invalid_arg(name, condition)
}

#[cold]
#[inline(never)]
pub fn format_error(element: &str, condition: &str) -> crate::error::Error {
    crate::error::Error::invalid_format(element, condition)
}
