use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::failure::PolicyFailure;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid content limit configuration: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },

    #[error("can't read configuration {path:?}: {source}")]
    Io { path: PathBuf, source: io::Error },
}

impl ConfigError {
    pub fn io<P: AsRef<Path>>(path: P, source: io::Error) -> Self {
        Self::Io { path: path.as_ref().to_path_buf(), source }
    }
}

/// Error yielded by [`LimitedBody`](crate::body::LimitedBody).
///
/// `TooLarge` is the mid-stream rejection: part of the body may already have been
/// forwarded when it fires, unlike the header phase rejections returned by
/// [`ContentLengthGuard::evaluate_headers`](crate::ContentLengthGuard::evaluate_headers).
#[derive(Error, Debug)]
pub enum BodyError<E> {
    #[error("request content limit exceeded: {0}")]
    TooLarge(PolicyFailure),

    #[error("upstream body error: {0}")]
    Upstream(E),
}

impl<E> BodyError<E> {
    pub fn failure(&self) -> Option<&PolicyFailure> {
        match self {
            BodyError::TooLarge(failure) => Some(failure),
            BodyError::Upstream(_) => None,
        }
    }

    pub fn is_too_large(&self) -> bool {
        matches!(self, BodyError::TooLarge(_))
    }
}
