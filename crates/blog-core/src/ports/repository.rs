use async_trait::async_trait;

use crate::domain::{NewPost, NewUser, Post, PostChanges, User};
use crate::error::RepoError;

/// Generic repository trait for lookups and removal by primary key.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Delete an entity by its ID. Fails with `NotFound` if nothing was removed.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// User repository with domain-specific methods.
#[async_trait]
pub trait UserRepository: BaseRepository<User, i32> {
    /// Insert a new user. Usernames are unique.
    async fn create(&self, user: NewUser) -> Result<User, RepoError>;

    /// Find a user by their username.
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError>;

    async fn get(&self, id: i32) -> Result<User, RepoError> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::not_found("User", id))
    }
}

/// Post repository.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, i32> {
    /// Insert a new post, rejecting blank fields and unknown authors.
    async fn create(&self, post: NewPost) -> Result<Post, RepoError>;

    /// All posts, newest first.
    async fn list(&self) -> Result<Vec<Post>, RepoError>;

    /// Apply a partial update to the post with `id`.
    async fn update(&self, id: i32, changes: PostChanges) -> Result<Post, RepoError>;

    async fn get(&self, id: i32) -> Result<Post, RepoError> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::not_found("Post", id))
    }
}
