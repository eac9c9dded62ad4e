//! SeaORM repository implementations.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, IntoActiveModel, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

use blog_core::domain::{FieldErrors, NewPost, NewUser, Post, PostChanges, User, unknown_author};
use blog_core::error::RepoError;
use blog_core::ports::{PostRepository, UserRepository};

use super::base::{SeaOrmBaseRepository, is_foreign_key_violation, is_unique_violation, map_db_err};
use super::entity::post::{self, Entity as PostEntity};
use super::entity::user::{self, Entity as UserEntity};

/// SeaORM user repository.
pub type SeaOrmUserRepository = SeaOrmBaseRepository<UserEntity>;

/// SeaORM post repository.
pub type SeaOrmPostRepository = SeaOrmBaseRepository<PostEntity>;

const USERNAME_TAKEN: &str = "A user with that username already exists.";

#[async_trait]
impl UserRepository for SeaOrmUserRepository {
    async fn create(&self, new_user: NewUser) -> Result<User, RepoError> {
        new_user.validate()?;

        if self.find_by_username(&new_user.username).await?.is_some() {
            return Err(FieldErrors::single("username", USERNAME_TAKEN).into());
        }

        let active: user::ActiveModel = new_user.into();
        let model = active.insert(&self.db).await.map_err(|e| {
            if is_unique_violation(&e) {
                FieldErrors::single("username", USERNAME_TAKEN).into()
            } else {
                map_db_err(e)
            }
        })?;

        tracing::debug!(user_id = model.id, "User created");
        Ok(model.into())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(username, "Finding user by username");

        let result = UserEntity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }
}

#[async_trait]
impl PostRepository for SeaOrmPostRepository {
    async fn create(&self, new_post: NewPost) -> Result<Post, RepoError> {
        new_post.validate()?;

        let author_id = new_post.author_id;
        let author = UserEntity::find_by_id(author_id)
            .one(&self.db)
            .await
            .map_err(map_db_err)?;
        if author.is_none() {
            return Err(unknown_author().into());
        }

        // The author can still vanish between the check and the insert.
        let active: post::ActiveModel = new_post.into();
        let model = active.insert(&self.db).await.map_err(|e| {
            if is_foreign_key_violation(&e) {
                unknown_author().into()
            } else {
                map_db_err(e)
            }
        })?;

        tracing::debug!(post_id = model.id, author_id, "Post created");
        Ok(model.into())
    }

    async fn list(&self) -> Result<Vec<Post>, RepoError> {
        let result = PostEntity::find()
            .order_by_desc(post::Column::Id)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn update(&self, id: i32, changes: PostChanges) -> Result<Post, RepoError> {
        let txn = self.db.begin().await.map_err(map_db_err)?;

        let model = PostEntity::find_by_id(id)
            .one(&txn)
            .await
            .map_err(map_db_err)?
            .ok_or_else(|| RepoError::not_found("Post", id))?;

        changes.validate()?;
        if changes.is_empty() {
            txn.commit().await.map_err(map_db_err)?;
            return Ok(model.into());
        }

        let mut active = model.into_active_model();
        if let Some(title) = changes.title {
            active.title = Set(title);
        }
        if let Some(body) = changes.body {
            active.body = Set(body);
        }

        let updated = active.update(&txn).await.map_err(map_db_err)?;
        txn.commit().await.map_err(map_db_err)?;

        tracing::debug!(post_id = id, "Post updated");
        Ok(updated.into())
    }
}
