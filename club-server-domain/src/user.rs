use std::sync::Arc;

use log::{info, warn};

use crate::{
    ServiceError, ServiceResult,
    util::{required_text, validate_email},
};

pub type UserId = i64;

const MAX_USERNAME_LEN: usize = 80;
const MAX_EMAIL_LEN: usize = 120;

#[derive(Clone, Debug)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

#[derive(Clone, Debug)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

pub type ArcUserRepository = Arc<Box<dyn UserRepository + Send + Sync + 'static>>;

#[async_trait::async_trait]
pub trait UserRepository {
    async fn create_user(&self, user: &NewUser) -> ServiceResult<User>;
    async fn get_user_by_username(&self, username: &str) -> ServiceResult<Option<User>>;
    async fn get_user_by_email(&self, email: &str) -> ServiceResult<Option<User>>;
}

pub type ArcUserService = Arc<Box<dyn UserService + Send + Sync + 'static>>;

#[async_trait::async_trait]
pub trait UserService {
    async fn register(&self, username: &str, email: &str, password: &str) -> ServiceResult<User>;
    async fn authenticate(&self, username: &str, password: &str) -> ServiceResult<User>;
}

pub struct UserServiceImpl {
    user_repository: ArcUserRepository,
    hash_cost: u32,
}

impl UserServiceImpl {
    pub fn new(user_repository: ArcUserRepository) -> Self {
        Self::with_hash_cost(user_repository, bcrypt::DEFAULT_COST)
    }

    pub fn with_hash_cost(user_repository: ArcUserRepository, hash_cost: u32) -> Self {
        Self {
            user_repository,
            hash_cost,
        }
    }
}

#[async_trait::async_trait]
impl UserService for UserServiceImpl {
    async fn register(&self, username: &str, email: &str, password: &str) -> ServiceResult<User> {
        let username = required_text("Username", username, MAX_USERNAME_LEN)?;
        let email = required_text("Email", email, MAX_EMAIL_LEN)?;
        let email = validate_email(&email)?;
        if password.is_empty() {
            return ServiceError::validation("Password is required");
        }

        if self
            .user_repository
            .get_user_by_username(&username)
            .await?
            .is_some()
        {
            return Err(ServiceError::DuplicateUser);
        }
        if self
            .user_repository
            .get_user_by_email(&email)
            .await?
            .is_some()
        {
            return Err(ServiceError::DuplicateEmail);
        }

        let password_hash = bcrypt::hash(password, self.hash_cost)
            .map_err(|e| ServiceError::Storage(format!("Failed to hash password: {}", e)))?;
        let user = self
            .user_repository
            .create_user(&NewUser {
                username,
                email,
                password_hash,
            })
            .await?;
        info!("Registered user {} (id {})", user.username, user.id);
        Ok(user)
    }

    async fn authenticate(&self, username: &str, password: &str) -> ServiceResult<User> {
        let Some(user) = self
            .user_repository
            .get_user_by_username(username.trim())
            .await?
        else {
            warn!("Login attempt for unknown user {}", username);
            return Err(ServiceError::InvalidCredentials);
        };
        // A malformed stored hash is treated like a wrong password.
        let valid = bcrypt::verify(password, &user.password_hash).unwrap_or(false);
        if !valid {
            warn!("Failed login for user {}", user.username);
            return Err(ServiceError::InvalidCredentials);
        }
        info!("User {} logged in", user.username);
        Ok(user)
    }
}
