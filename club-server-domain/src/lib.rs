use thiserror::Error;

pub mod app;
pub mod diagnostics;
pub mod player;
pub mod session;
pub mod statistics;
pub mod user;
pub mod util;

#[cfg(test)]
mod mock;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ServiceError {
    #[error("Username already exists")]
    DuplicateUser,

    #[error("Email already registered")]
    DuplicateEmail,

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    InvalidReference(String),

    #[error("{0}")]
    Validation(String),

    #[error("storage error: {0}")]
    Storage(String),
}

impl ServiceError {
    pub fn validation<T, R>(msg: T) -> ServiceResult<R>
    where
        T: Into<String>,
    {
        Err(ServiceError::Validation(msg.into()))
    }

    pub fn unauthorized<T, R>(msg: T) -> ServiceResult<R>
    where
        T: Into<String>,
    {
        Err(ServiceError::Unauthorized(msg.into()))
    }

    pub fn invalid_reference<T, R>(msg: T) -> ServiceResult<R>
    where
        T: Into<String>,
    {
        Err(ServiceError::InvalidReference(msg.into()))
    }

    pub fn storage<T, R>(msg: T) -> ServiceResult<R>
    where
        T: Into<String>,
    {
        Err(ServiceError::Storage(msg.into()))
    }

    /// Errors the user can fix by correcting the submitted form.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ServiceError::DuplicateUser
                | ServiceError::DuplicateEmail
                | ServiceError::InvalidCredentials
                | ServiceError::InvalidReference(_)
                | ServiceError::Validation(_)
        )
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;
