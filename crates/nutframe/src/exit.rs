use std::fmt;
use std::io;

use nutframe_container::ContainerError;
use nutframe_frame::FrameError;

// Exit code constants aligned with sysexits-style semantics.
pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const PERMISSION_DENIED: i32 = 50;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    let code = match err.kind() {
        io::ErrorKind::PermissionDenied => PERMISSION_DENIED,
        io::ErrorKind::NotFound => FAILURE,
        _ => INTERNAL,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn frame_error(context: &str, err: FrameError) -> CliError {
    match err {
        FrameError::Io(source) => io_error(context, source),
        other @ (FrameError::MalformedFrame(_)
        | FrameError::Truncated { .. }
        | FrameError::PayloadTooLarge { .. }) => {
            CliError::new(DATA_INVALID, format!("{context}: {other}"))
        }
    }
}

pub fn container_error(context: &str, err: ContainerError) -> CliError {
    match err {
        ContainerError::LoadFailed(_) => CliError::new(FAILURE, format!("{context}: {err}")),
        ContainerError::InvalidJson(_) | ContainerError::InvalidDescription(_) => {
            CliError::new(DATA_INVALID, format!("{context}: {err}"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_frames_are_data_invalid() {
        let err = frame_error("decode", FrameError::MalformedFrame("bad".into()));
        assert_eq!(err.code, DATA_INVALID);
        assert_eq!(err.to_string(), "decode: malformed frame: bad");

        let err = frame_error("decode", FrameError::Truncated { needed: 4 });
        assert_eq!(err.code, DATA_INVALID);
    }

    #[test]
    fn io_kinds_map_to_codes() {
        let denied = io::Error::new(io::ErrorKind::PermissionDenied, "nope");
        assert_eq!(frame_error("read", FrameError::Io(denied)).code, PERMISSION_DENIED);

        let other = io::Error::new(io::ErrorKind::Other, "boom");
        assert_eq!(io_error("read", other).code, INTERNAL);
    }

    #[test]
    fn container_errors_map_to_codes() {
        let err = container_error("load", ContainerError::LoadFailed("missing".into()));
        assert_eq!(err.code, FAILURE);
        let err = container_error("load", ContainerError::InvalidDescription("x".into()));
        assert_eq!(err.code, DATA_INVALID);
    }
}
