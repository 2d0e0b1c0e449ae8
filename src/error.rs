use thiserror::Error;

/// Rejections raised by the detection loop controller. All of them are
/// recoverable: the session keeps running and the caller shows a banner.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ControllerError {
    #[error("camera is off; turn it on before starting detection")]
    CameraOff,
    #[error("camera permission not granted")]
    PermissionDenied,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CameraError {
    #[error("camera permission not granted")]
    PermissionDenied,
}

impl From<CameraError> for ControllerError {
    fn from(err: CameraError) -> Self {
        match err {
            CameraError::PermissionDenied => ControllerError::PermissionDenied,
        }
    }
}

/// Failures of the remote sentence-assembly call.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AssemblyError {
    #[error("request failed: {0}")]
    Http(String),
    #[error("server returned status {0}")]
    Status(u16),
    #[error("could not decode response: {0}")]
    Decode(String),
    #[error("response carried no generated text")]
    EmptyCompletion,
}

impl From<reqwest::Error> for AssemblyError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            AssemblyError::Decode(err.to_string())
        } else {
            AssemblyError::Http(err.to_string())
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}
