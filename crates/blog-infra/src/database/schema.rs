//! Table bootstrap from the entity definitions.

use sea_orm::{ConnectionTrait, DbConn, DbErr, EntityName, EntityTrait, Schema};

use super::entity::{post, user};

/// Create the `users` and `posts` tables if they do not exist yet.
///
/// Users come first so the posts foreign key has something to point at.
pub async fn bootstrap(db: &DbConn) -> Result<(), DbErr> {
    create_table(db, user::Entity).await?;
    create_table(db, post::Entity).await?;
    tracing::info!("Database schema ready");
    Ok(())
}

async fn create_table<E: EntityTrait>(db: &DbConn, entity: E) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);
    let mut stmt = schema.create_table_from_entity(entity);
    db.execute(backend.build(stmt.if_not_exists())).await?;
    tracing::debug!(table = entity.table_name(), "Table ensured");
    Ok(())
}
