use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::validation::FieldErrors;

/// Longest title a post may carry, in characters.
pub const TITLE_MAX_CHARS: usize = 200;

const UNKNOWN_AUTHOR: &str = "Select a valid choice. That choice is not one of the available choices.";

/// The error reported when `author` names no existing user.
pub fn unknown_author() -> FieldErrors {
    FieldErrors::single("author", UNKNOWN_AUTHOR)
}

/// Canonical detail path for the post with the given id.
pub fn detail_path(id: i32) -> String {
    format!("/post/{id}/")
}

/// Post entity - a titled, authored blog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: i32,
    pub title: String,
    pub body: String,
    pub author_id: i32,
    pub created_at: DateTime<Utc>,
}

impl Post {
    /// URL of this post's detail page.
    pub fn absolute_url(&self) -> String {
        detail_path(self.id)
    }
}

impl fmt::Display for Post {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.title)
    }
}

/// Input for creating a post. The id and timestamp are assigned by storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    pub title: String,
    pub body: String,
    pub author_id: i32,
}

impl NewPost {
    pub fn new(title: impl Into<String>, body: impl Into<String>, author_id: i32) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            author_id,
        }
    }

    /// Check the text fields. Whether the author exists is up to the repository.
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        check_title(&mut errors, &self.title);
        errors.require("body", &self.body);
        errors.into_result()
    }
}

/// A partial update. `None` leaves the stored value alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostChanges {
    pub title: Option<String>,
    pub body: Option<String>,
}

impl PostChanges {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            body: Some(body.into()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.body.is_none()
    }

    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        if let Some(title) = &self.title {
            check_title(&mut errors, title);
        }
        if let Some(body) = &self.body {
            errors.require("body", body);
        }
        errors.into_result()
    }

    /// Write the provided fields onto `post`.
    pub fn apply(self, post: &mut Post) {
        if let Some(title) = self.title {
            post.title = title;
        }
        if let Some(body) = self.body {
            post.body = body;
        }
    }
}

fn check_title(errors: &mut FieldErrors, title: &str) {
    if errors.require("title", title) {
        return;
    }
    let chars = title.chars().count();
    if chars > TITLE_MAX_CHARS {
        errors.add(
            "title",
            format!("Ensure this value has at most {TITLE_MAX_CHARS} characters (it has {chars})."),
        );
    }
}
