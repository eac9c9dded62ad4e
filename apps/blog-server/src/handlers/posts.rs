//! Post pages: list, detail, create, edit and delete.

use actix_web::{HttpResponse, error::UrlencodedError, http::header, web};

use blog_core::domain::{FieldErrors, NewPost, PostChanges, unknown_author};
use blog_core::error::RepoError;
use blog_core::ports::BaseRepository;
use blog_shared::dto::{PostEditForm, PostForm};

use crate::middleware::error::{AppError, AppResult};
use crate::router::Route;
use crate::state::AppState;
use crate::views::{
    self, FormErrorsView, HomeTemplate, PostDeleteTemplate, PostDetailTemplate, PostEditTemplate,
    PostFormView, PostNewTemplate, PostSummaryView,
};

/// GET /
pub async fn list(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let posts = state.posts.list().await?;

    views::render(&HomeTemplate {
        posts: posts.iter().map(PostSummaryView::from).collect(),
        new_post_url: Route::PostNew.path(),
    })
}

/// GET /post/{pk}/
pub async fn detail(state: web::Data<AppState>, pk: web::Path<String>) -> AppResult<HttpResponse> {
    let id = parse_pk(&pk)?;
    let post = state.posts.get(id).await?;
    let author = state.users.get(post.author_id).await?;

    views::render(&PostDetailTemplate {
        post: views::PostDetailView::new(&post, &author),
    })
}

/// GET /post/new
pub async fn new_form() -> AppResult<HttpResponse> {
    views::render(&PostNewTemplate {
        action: Route::PostNew.path(),
        form: PostFormView::default(),
    })
}

/// POST /post/new
///
/// Every field is checked in one pass, so all problems are reported together.
pub async fn create(
    state: web::Data<AppState>,
    form: Result<web::Form<PostForm>, actix_web::Error>,
) -> AppResult<HttpResponse> {
    let form = form_or_default(form)?.trimmed();

    let mut errors = FieldErrors::new();
    let author_id = form.author_id();
    let new_post = NewPost::new(form.title.clone(), form.body.clone(), author_id.unwrap_or_default());
    if let Err(e) = new_post.validate() {
        errors.merge(e);
    }
    if !errors.require("author", &form.author) {
        let known = match author_id {
            Some(id) => state.users.find_by_id(id).await?.is_some(),
            None => false,
        };
        if !known {
            errors.merge(unknown_author());
        }
    }
    if !errors.is_empty() {
        return render_new_form(&form, &errors);
    }

    match state.posts.create(new_post).await {
        Ok(post) => {
            tracing::info!(post_id = post.id, author_id = post.author_id, "Post created");
            Ok(redirect(&post.absolute_url()))
        }
        Err(RepoError::Validation(errors)) => render_new_form(&form, &errors),
        Err(e) => Err(e.into()),
    }
}

/// GET /post/{pk}/edit
pub async fn edit_form(
    state: web::Data<AppState>,
    pk: web::Path<String>,
) -> AppResult<HttpResponse> {
    let id = parse_pk(&pk)?;
    let post = state.posts.get(id).await?;

    let form = PostEditForm {
        title: post.title,
        body: post.body,
    };
    render_edit_form(id, &form, &FieldErrors::new())
}

/// POST /post/{pk}/edit
///
/// An unknown id is a 404 even when the submitted fields are invalid.
pub async fn update(
    state: web::Data<AppState>,
    pk: web::Path<String>,
    form: Result<web::Form<PostEditForm>, actix_web::Error>,
) -> AppResult<HttpResponse> {
    let id = parse_pk(&pk)?;
    let form = form_or_default(form)?.trimmed();

    let changes = PostChanges::new(form.title.clone(), form.body.clone());
    match state.posts.update(id, changes).await {
        Ok(post) => {
            tracing::info!(post_id = post.id, "Post updated");
            Ok(redirect(&post.absolute_url()))
        }
        Err(RepoError::Validation(errors)) => render_edit_form(id, &form, &errors),
        Err(e) => Err(e.into()),
    }
}

/// GET /post/{pk}/delete
pub async fn delete_form(
    state: web::Data<AppState>,
    pk: web::Path<String>,
) -> AppResult<HttpResponse> {
    let id = parse_pk(&pk)?;
    let post = state.posts.get(id).await?;

    views::render(&PostDeleteTemplate {
        title: post.title,
        action: Route::PostDelete { pk: id }.path(),
        cancel_url: post_url(id),
    })
}

/// POST /post/{pk}/delete
///
/// Deleting is not idempotent: a post that is already gone is a 404.
pub async fn delete(state: web::Data<AppState>, pk: web::Path<String>) -> AppResult<HttpResponse> {
    let id = parse_pk(&pk)?;
    state.posts.delete(id).await?;

    tracing::info!(post_id = id, "Post deleted");
    Ok(redirect(&Route::Home.path()))
}

/// Path ids must be plain decimal digits; signs and other text cannot name a post.
fn parse_pk(raw: &str) -> AppResult<i32> {
    let not_found = || AppError::NotFound(format!("No post matches id {raw}"));

    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(not_found());
    }
    raw.parse().map_err(|_| not_found())
}

/// A body that is missing or not URL-encoded counts as an empty form, so the
/// page shows which fields are required. Only an oversized body is refused.
fn form_or_default<T: Default>(form: Result<web::Form<T>, actix_web::Error>) -> AppResult<T> {
    match form {
        Ok(form) => Ok(form.into_inner()),
        Err(e) => match e.as_error::<UrlencodedError>() {
            Some(overflow @ UrlencodedError::Overflow { .. }) => {
                Err(AppError::PayloadTooLarge(overflow.to_string()))
            }
            _ => {
                tracing::debug!(error = %e, "Unreadable form body, treating as empty");
                Ok(T::default())
            }
        },
    }
}

fn post_url(id: i32) -> String {
    Route::PostDetail { pk: id }.path()
}

fn redirect(location: &str) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, location))
        .finish()
}

fn render_new_form(form: &PostForm, errors: &FieldErrors) -> AppResult<HttpResponse> {
    tracing::debug!(errors = %errors, "Post form rejected");
    views::render(&PostNewTemplate {
        action: Route::PostNew.path(),
        form: PostFormView {
            title: form.title.clone(),
            body: form.body.clone(),
            author: form.author.clone(),
            errors: FormErrorsView::from(errors),
        },
    })
}

fn render_edit_form(id: i32, form: &PostEditForm, errors: &FieldErrors) -> AppResult<HttpResponse> {
    if !errors.is_empty() {
        tracing::debug!(post_id = id, errors = %errors, "Edit form rejected");
    }
    views::render(&PostEditTemplate {
        action: Route::PostEdit { pk: id }.path(),
        cancel_url: post_url(id),
        form: PostFormView {
            title: form.title.clone(),
            body: form.body.clone(),
            author: String::new(),
            errors: FormErrorsView::from(errors),
        },
    })
}
