//! HTML views rendered with askama.

use actix_web::{HttpResponse, http::StatusCode, http::header::ContentType};
use askama::Template;

use blog_core::domain::{FieldErrors, Post, User};

use crate::middleware::error::{AppError, AppResult};
use crate::router::Route;

/// One entry on the home page.
#[derive(Clone)]
pub struct PostSummaryView {
    pub title: String,
    pub body: String,
    pub url: String,
}

impl From<&Post> for PostSummaryView {
    fn from(post: &Post) -> Self {
        Self {
            title: post.title.clone(),
            body: post.body.clone(),
            url: post.absolute_url(),
        }
    }
}

#[derive(Clone)]
pub struct PostDetailView {
    pub title: String,
    pub body: String,
    pub author: String,
    pub created_at: String,
    pub edit_url: String,
    pub delete_url: String,
}

impl PostDetailView {
    pub fn new(post: &Post, author: &User) -> Self {
        Self {
            title: post.title.clone(),
            body: post.body.clone(),
            author: author.username.clone(),
            created_at: post.created_at.format("%B %-d, %Y").to_string(),
            edit_url: Route::PostEdit { pk: post.id }.path(),
            delete_url: Route::PostDelete { pk: post.id }.path(),
        }
    }
}

/// Error messages grouped by form field.
#[derive(Clone, Default)]
pub struct FormErrorsView {
    pub title: Vec<String>,
    pub body: Vec<String>,
    pub author: Vec<String>,
}

impl From<&FieldErrors> for FormErrorsView {
    fn from(errors: &FieldErrors) -> Self {
        let collect = |field: &str| -> Vec<String> {
            errors.messages_for(field).map(str::to_string).collect()
        };
        Self {
            title: collect("title"),
            body: collect("body"),
            author: collect("author"),
        }
    }
}

/// Values and errors of a post form, as it should be shown again.
#[derive(Clone, Default)]
pub struct PostFormView {
    pub title: String,
    pub body: String,
    pub author: String,
    pub errors: FormErrorsView,
}

#[derive(Template)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub posts: Vec<PostSummaryView>,
    pub new_post_url: String,
}

#[derive(Template)]
#[template(path = "post_detail.html")]
pub struct PostDetailTemplate {
    pub post: PostDetailView,
}

#[derive(Template)]
#[template(path = "post_new.html")]
pub struct PostNewTemplate {
    pub action: String,
    pub form: PostFormView,
}

#[derive(Template)]
#[template(path = "post_edit.html")]
pub struct PostEditTemplate {
    pub action: String,
    pub cancel_url: String,
    pub form: PostFormView,
}

#[derive(Template)]
#[template(path = "post_delete.html")]
pub struct PostDeleteTemplate {
    pub title: String,
    pub action: String,
    pub cancel_url: String,
}

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub status: u16,
    pub title: String,
    pub detail: String,
}

/// Render `template` as a 200 HTML page.
pub fn render<T: Template>(template: &T) -> AppResult<HttpResponse> {
    render_with_status(template, StatusCode::OK)
}

pub fn render_with_status<T: Template>(template: &T, status: StatusCode) -> AppResult<HttpResponse> {
    let html = template
        .render()
        .map_err(|e| AppError::Internal(format!("Template rendering failed: {e}")))?;

    Ok(HttpResponse::build(status)
        .content_type(ContentType::html())
        .body(html))
}
