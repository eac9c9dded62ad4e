//! In-memory repositories - used as fallback when no database is configured.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use blog_core::domain::{FieldErrors, NewPost, NewUser, Post, PostChanges, User, unknown_author};
use blog_core::error::RepoError;
use blog_core::ports::{BaseRepository, PostRepository, UserRepository};

#[derive(Default)]
struct Tables {
    users: BTreeMap<i32, User>,
    posts: BTreeMap<i32, Post>,
    last_user_id: i32,
    last_post_id: i32,
}

/// Shared tables behind the in-memory user and post repositories.
///
/// Ids are never reused, even after a delete. Data is lost on process restart.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn users(&self) -> InMemoryUserRepository {
        InMemoryUserRepository {
            tables: Arc::clone(&self.tables),
        }
    }

    pub fn posts(&self) -> InMemoryPostRepository {
        InMemoryPostRepository {
            tables: Arc::clone(&self.tables),
        }
    }
}

/// User repository over an [`InMemoryStore`].
#[derive(Clone)]
pub struct InMemoryUserRepository {
    tables: Arc<RwLock<Tables>>,
}

/// Post repository over an [`InMemoryStore`].
#[derive(Clone)]
pub struct InMemoryPostRepository {
    tables: Arc<RwLock<Tables>>,
}

#[async_trait]
impl BaseRepository<User, i32> for InMemoryUserRepository {
    async fn find_by_id(&self, id: i32) -> Result<Option<User>, RepoError> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn delete(&self, id: i32) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        tables
            .users
            .remove(&id)
            .ok_or_else(|| RepoError::not_found("User", id))?;
        // Posts go with their author.
        tables.posts.retain(|_, post| post.author_id != id);
        Ok(())
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, new_user: NewUser) -> Result<User, RepoError> {
        new_user.validate()?;

        let mut tables = self.tables.write().await;
        if tables.users.values().any(|u| u.username == new_user.username) {
            return Err(FieldErrors::single(
                "username",
                "A user with that username already exists.",
            )
            .into());
        }

        tables.last_user_id += 1;
        let user = User {
            id: tables.last_user_id,
            username: new_user.username,
            email: new_user.email,
            password_hash: new_user.password_hash,
            created_at: Utc::now(),
        };
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.username == username).cloned())
    }
}

#[async_trait]
impl BaseRepository<Post, i32> for InMemoryPostRepository {
    async fn find_by_id(&self, id: i32) -> Result<Option<Post>, RepoError> {
        Ok(self.tables.read().await.posts.get(&id).cloned())
    }

    async fn delete(&self, id: i32) -> Result<(), RepoError> {
        self.tables
            .write()
            .await
            .posts
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| RepoError::not_found("Post", id))
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn create(&self, new_post: NewPost) -> Result<Post, RepoError> {
        new_post.validate()?;

        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&new_post.author_id) {
            return Err(unknown_author().into());
        }

        tables.last_post_id += 1;
        let post = Post {
            id: tables.last_post_id,
            title: new_post.title,
            body: new_post.body,
            author_id: new_post.author_id,
            created_at: Utc::now(),
        };
        tables.posts.insert(post.id, post.clone());
        tracing::debug!(post_id = post.id, author_id = post.author_id, "Post created");
        Ok(post)
    }

    async fn list(&self) -> Result<Vec<Post>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.posts.values().rev().cloned().collect())
    }

    async fn update(&self, id: i32, changes: PostChanges) -> Result<Post, RepoError> {
        let mut tables = self.tables.write().await;
        let post = tables
            .posts
            .get_mut(&id)
            .ok_or_else(|| RepoError::not_found("Post", id))?;

        changes.validate()?;
        changes.apply(post);
        Ok(post.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn store_with_author() -> (InMemoryStore, User) {
        let store = InMemoryStore::new();
        let author = store
            .users()
            .create(NewUser::new("testuser", "test@email.com", "hash"))
            .await
            .unwrap();
        (store, author)
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let (store, author) = store_with_author().await;
        let posts = store.posts();

        let post = posts
            .create(NewPost::new("Little Miss Muffet...", "Sweet, warm, curvy", author.id))
            .await
            .unwrap();

        let fetched = posts.get(post.id).await.unwrap();
        assert_eq!(fetched, post);
        assert_eq!(fetched.absolute_url(), "/post/1/");
    }

    #[tokio::test]
    async fn test_unknown_author_rejected() {
        let (store, author) = store_with_author().await;

        let err = store
            .posts()
            .create(NewPost::new("t", "b", author.id + 1))
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::Validation(ref e) if e.has("author")));
    }

    #[tokio::test]
    async fn test_ids_not_reused_after_delete() {
        let (store, author) = store_with_author().await;
        let posts = store.posts();

        let first = posts.create(NewPost::new("a", "a", author.id)).await.unwrap();
        posts.delete(first.id).await.unwrap();
        let second = posts.create(NewPost::new("b", "b", author.id)).await.unwrap();

        assert!(second.id > first.id);
        assert!(posts.delete(first.id).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_list_newest_first() {
        let (store, author) = store_with_author().await;
        let posts = store.posts();
        for title in ["one", "two"] {
            posts.create(NewPost::new(title, "b", author.id)).await.unwrap();
        }

        let titles: Vec<_> = posts.list().await.unwrap().into_iter().map(|p| p.title).collect();
        assert_eq!(titles, vec!["two", "one"]);
    }

    #[tokio::test]
    async fn test_update_rejects_blank_title_without_writing() {
        let (store, author) = store_with_author().await;
        let posts = store.posts();
        let post = posts.create(NewPost::new("t", "b", author.id)).await.unwrap();

        let err = posts.update(post.id, PostChanges::new("", "new")).await.unwrap_err();
        assert!(matches!(err, RepoError::Validation(_)));
        assert_eq!(posts.get(post.id).await.unwrap().body, "b");
    }

    #[tokio::test]
    async fn test_deleting_author_removes_posts() {
        let (store, author) = store_with_author().await;
        let posts = store.posts();
        posts.create(NewPost::new("t", "b", author.id)).await.unwrap();

        store.users().delete(author.id).await.unwrap();
        assert!(posts.list().await.unwrap().is_empty());
    }
}
