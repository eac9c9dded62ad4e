//! Domain entities - the core business objects.

mod user;

mod post;
mod validation;

pub use post::{NewPost, Post, PostChanges, TITLE_MAX_CHARS, detail_path, unknown_author};
pub use user::{NewUser, User};
pub use validation::{FieldError, FieldErrors};
