// Service exports
pub mod auth;
pub mod cache;
pub mod github;
pub mod users;

pub use auth::{AuthError, TokenVerifier};
pub use cache::{ActivityCache, CacheError};
pub use github::{GithubClient, GithubError};
pub use users::{UserStore, UserStoreError};
