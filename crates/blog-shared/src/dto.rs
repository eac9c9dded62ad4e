//! Data Transfer Objects - form bodies posted by the blog pages.

use serde::{Deserialize, Serialize};

/// Body of `POST /post/new`.
///
/// Every field defaults to empty so a missing field surfaces as a
/// validation message instead of a rejected request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PostForm {
    pub title: String,
    pub body: String,
    /// Id of the authoring user, as typed into the form.
    pub author: String,
}

impl PostForm {
    /// The author id, if the field holds an integer.
    pub fn author_id(&self) -> Option<i32> {
        self.author.trim().parse().ok()
    }

    /// Copy with surrounding whitespace stripped from the text fields.
    pub fn trimmed(&self) -> Self {
        Self {
            title: self.title.trim().to_string(),
            body: self.body.trim().to_string(),
            author: self.author.trim().to_string(),
        }
    }
}

/// Body of `POST /post/{id}/edit`. The author cannot be changed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PostEditForm {
    pub title: String,
    pub body: String,
}

impl PostEditForm {
    pub fn trimmed(&self) -> Self {
        Self {
            title: self.title.trim().to_string(),
            body: self.body.trim().to_string(),
        }
    }
}
