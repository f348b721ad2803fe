use std::sync::Arc;

use crate::{ServiceError, ServiceResult, user::UserId};

#[derive(Debug, Clone, PartialEq)]
pub struct SessionUser {
    pub user_id: UserId,
    pub username: String,
}

/// Identity attached to a single request. Anonymous unless a valid session
/// token came with it.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    user: Option<SessionUser>,
}

impl RequestContext {
    pub fn anonymous() -> Self {
        Self { user: None }
    }

    pub fn authenticated(user: SessionUser) -> Self {
        Self { user: Some(user) }
    }

    pub fn user(&self) -> Option<&SessionUser> {
        self.user.as_ref()
    }

    pub fn require_user(&self) -> ServiceResult<&SessionUser> {
        match &self.user {
            Some(user) => Ok(user),
            None => ServiceError::unauthorized("Please log in to access this page"),
        }
    }
}

pub type ArcSessionService = Arc<Box<dyn SessionService + Send + Sync>>;

pub trait SessionService {
    fn issue_token(&self, user: &SessionUser) -> ServiceResult<String>;
    fn validate_token(&self, token: &str) -> ServiceResult<SessionUser>;
}
