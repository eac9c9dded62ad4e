//! SeaORM entities.

use sea_orm::EntityTrait;

pub mod post;
pub mod user;

/// Ties a table entity to the domain type it loads into.
pub trait DomainEntity: EntityTrait {
    type Domain: From<Self::Model> + Send + Sync + 'static;

    /// Name used in `NotFound` errors.
    const LABEL: &'static str;
}

impl DomainEntity for post::Entity {
    type Domain = blog_core::domain::Post;
    const LABEL: &'static str = "Post";
}

impl DomainEntity for user::Entity {
    type Domain = blog_core::domain::User;
    const LABEL: &'static str = "User";
}
