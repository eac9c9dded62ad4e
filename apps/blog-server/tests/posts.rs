//! HTTP-level tests for the post pages.

use actix_web::dev::ServiceResponse;
use actix_web::http::{StatusCode, header};
use actix_web::{App, test, web};

use blog_core::domain::{NewPost, NewUser, Post, User};
use blog_core::ports::{PostRepository, UserRepository};
use blog_infra::DatabaseConfig;
use blog_infra::memory::InMemoryStore;
use blog_server::router::reverse;
use blog_server::state::StorageKind;
use blog_server::{AppState, configure_routes};
use blog_shared::dto::{PostEditForm, PostForm};

const U_USERNAME: &str = "testuser";
const U_EMAIL: &str = "test@email.com";

const P_TITLE: &str = "Little Miss Muffet...";
const P_BODY: &str = "Sweet, warm, curvy";
const P_UPD_TITLE: &str = "The meaning of Life";
const P_UPD_BODY: &str = "Endless BS about contemplating my navel.";

const BASE_MARKER: &str = "<!-- templates/base.html -->";
const HOME_MARKER: &str = "<!-- templates/home.html -->";
const DETAIL_MARKER: &str = "<!-- templates/post_detail.html -->";

struct Fixture {
    /// Which store backs `state`, for assertion messages.
    store: &'static str,
    state: AppState,
    author: User,
    post: Post,
}

/// One user and one post by them, on `state`.
async fn seed(store: &'static str, state: AppState) -> Fixture {
    let author = state
        .users
        .create(NewUser::new(U_USERNAME, U_EMAIL, "not-a-real-hash"))
        .await
        .unwrap();
    let post = state
        .posts
        .create(NewPost::new(P_TITLE, P_BODY, author.id))
        .await
        .unwrap();

    Fixture {
        store,
        state,
        author,
        post,
    }
}

/// The same seeded data on the in-memory store and on a fresh SQLite database.
async fn fixtures() -> Vec<Fixture> {
    let sqlite = AppState::new(Some(&DatabaseConfig::new("sqlite::memory:"))).await;
    assert_eq!(sqlite.storage, StorageKind::Database);

    vec![
        seed("memory", AppState::in_memory(&InMemoryStore::new())).await,
        seed("sqlite", sqlite).await,
    ]
}

async fn send(state: &AppState, req: test::TestRequest) -> ServiceResponse {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state.clone()))
            .configure(configure_routes),
    )
    .await;
    test::call_service(&app, req.to_request()).await
}

async fn body_text(resp: ServiceResponse) -> String {
    let bytes = test::read_body(resp).await;
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn location(resp: &ServiceResponse) -> &str {
    resp.headers()
        .get(header::LOCATION)
        .expect("redirect has a location")
        .to_str()
        .unwrap()
}

fn detail_url(pk: i32) -> String {
    let pk = pk.to_string();
    reverse("post_detail", &[("pk", pk.as_str())]).unwrap()
}

#[actix_web::test]
async fn test_post_model() {
    for f in fixtures().await {
        assert_eq!(f.author.username, U_USERNAME);
        assert_eq!(f.post.author_id, f.author.id);
        assert_eq!(f.post.to_string(), P_TITLE);
        assert_eq!(f.post.title, P_TITLE);
        assert_eq!(f.post.body, P_BODY);
        assert_eq!(f.post.absolute_url(), "/post/1/", "{}", f.store);
        assert_eq!(f.post.absolute_url(), detail_url(f.post.id));

        let fetched = f.state.posts.get(f.post.id).await.unwrap();
        assert_eq!(fetched, f.post, "{}", f.store);
    }
}

#[actix_web::test]
async fn test_url_exists_at_correct_location_listview() {
    for f in fixtures().await {
        let resp = send(&f.state, test::TestRequest::get().uri("/")).await;
        assert_eq!(resp.status(), StatusCode::OK, "{}", f.store);
    }
}

#[actix_web::test]
async fn test_url_exists_at_correct_location_detailview() {
    for f in fixtures().await {
        let resp = send(&f.state, test::TestRequest::get().uri("/post/1/")).await;
        assert_eq!(resp.status(), StatusCode::OK, "{}", f.store);
    }
}

#[actix_web::test]
async fn test_post_listview() {
    for f in fixtures().await {
        let uri = reverse("home", &[]).unwrap();
        let resp = send(&f.state, test::TestRequest::get().uri(&uri)).await;

        assert_eq!(resp.status(), StatusCode::OK, "{}", f.store);
        let body = body_text(resp).await;
        assert!(body.contains(BASE_MARKER));
        assert!(body.contains(HOME_MARKER));
        assert!(body.contains(P_TITLE));
        assert!(body.contains(&f.post.absolute_url()));
    }
}

#[actix_web::test]
async fn test_post_detailview() {
    for f in fixtures().await {
        let resp = send(&f.state, test::TestRequest::get().uri(&detail_url(f.post.id))).await;
        let bad = send(&f.state, test::TestRequest::get().uri("/post/99999/")).await;

        assert_eq!(resp.status(), StatusCode::OK, "{}", f.store);
        assert_eq!(bad.status(), StatusCode::NOT_FOUND, "{}", f.store);

        let body = body_text(resp).await;
        assert!(body.contains(DETAIL_MARKER));
        assert!(body.contains(P_BODY));
        assert!(body.contains(U_USERNAME));
    }
}

#[actix_web::test]
async fn test_detail_with_non_integer_id_is_not_found() {
    for f in fixtures().await {
        for uri in ["/post/abc/", "/post/+1/", "/post/-1/", "/post/99999999999/"] {
            let resp = send(&f.state, test::TestRequest::get().uri(uri)).await;
            assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{} {uri}", f.store);
        }
    }
}

#[actix_web::test]
async fn test_detail_with_leading_zeros_names_the_same_post() {
    for f in fixtures().await {
        let resp = send(&f.state, test::TestRequest::get().uri("/post/0001/")).await;
        assert_eq!(resp.status(), StatusCode::OK, "{}", f.store);
    }
}

#[actix_web::test]
async fn test_post_createview() {
    for f in fixtures().await {
        let form = PostForm {
            title: P_TITLE.to_string(),
            body: P_BODY.to_string(),
            author: f.author.id.to_string(),
        };
        let uri = reverse("post_new", &[]).unwrap();
        let resp = send(&f.state, test::TestRequest::post().uri(&uri).set_form(&form)).await;

        assert_eq!(resp.status(), StatusCode::FOUND, "{}", f.store);

        let posts = f.state.posts.list().await.unwrap();
        let latest = posts.first().unwrap();
        assert_eq!(posts.len(), 2);
        assert_eq!(latest.title, P_TITLE);
        assert_eq!(latest.body, P_BODY);
        assert_eq!(latest.author_id, f.author.id);
        assert_eq!(location(&resp), latest.absolute_url());
    }
}

#[actix_web::test]
async fn test_create_and_edit_accept_long_bodies() {
    let long_body = "x".repeat(20_000);

    for f in fixtures().await {
        let form = PostForm {
            title: "Long read".to_string(),
            body: long_body.clone(),
            author: f.author.id.to_string(),
        };
        let resp = send(
            &f.state,
            test::TestRequest::post().uri("/post/new").set_form(&form),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::FOUND, "{}", f.store);

        let created = f.state.posts.list().await.unwrap().remove(0);
        assert_eq!(created.body.len(), long_body.len());

        let edit = PostEditForm {
            title: "Longer read".to_string(),
            body: format!("{long_body}{long_body}"),
        };
        let uri = format!("/post/{}/edit", created.id);
        let resp = send(&f.state, test::TestRequest::post().uri(&uri).set_form(&edit)).await;
        assert_eq!(resp.status(), StatusCode::FOUND, "{}", f.store);

        let updated = f.state.posts.get(created.id).await.unwrap();
        assert_eq!(updated.body.len(), 2 * long_body.len());
    }
}

#[actix_web::test]
async fn test_createview_with_blank_fields_rerenders_form() {
    for f in fixtures().await {
        let form = PostForm {
            title: "   ".to_string(),
            body: String::new(),
            author: f.author.id.to_string(),
        };
        let resp = send(
            &f.state,
            test::TestRequest::post().uri("/post/new").set_form(&form),
        )
        .await;

        assert_eq!(resp.status(), StatusCode::OK, "{}", f.store);
        let body = body_text(resp).await;
        assert!(body.contains("<!-- templates/post_new.html -->"));
        assert_eq!(body.matches("This field is required.").count(), 2);
        assert_eq!(f.state.posts.list().await.unwrap().len(), 1);
    }
}

#[actix_web::test]
async fn test_createview_without_form_body_rerenders_form() {
    for f in fixtures().await {
        let empty = send(&f.state, test::TestRequest::post().uri("/post/new")).await;
        assert_eq!(empty.status(), StatusCode::OK, "{}", f.store);
        assert_eq!(
            body_text(empty).await.matches("This field is required.").count(),
            3
        );

        let multipart = send(
            &f.state,
            test::TestRequest::post()
                .uri("/post/new")
                .insert_header((header::CONTENT_TYPE, "multipart/form-data; boundary=X"))
                .set_payload("--X--\r\n"),
        )
        .await;
        assert_eq!(multipart.status(), StatusCode::OK, "{}", f.store);
        assert!(body_text(multipart).await.contains("This field is required."));

        assert_eq!(f.state.posts.list().await.unwrap().len(), 1);
    }
}

#[actix_web::test]
async fn test_createview_with_unknown_author_rerenders_form() {
    for f in fixtures().await {
        let form = PostForm {
            title: "Orphan".to_string(),
            body: "Nobody wrote this".to_string(),
            author: (f.author.id + 1).to_string(),
        };
        let resp = send(
            &f.state,
            test::TestRequest::post().uri("/post/new").set_form(&form),
        )
        .await;

        assert_eq!(resp.status(), StatusCode::OK, "{}", f.store);
        let body = body_text(resp).await;
        assert!(body.contains("Select a valid choice."));
        assert!(body.contains("Nobody wrote this"));
        assert_eq!(f.state.posts.list().await.unwrap().len(), 1);
    }
}

#[actix_web::test]
async fn test_createview_reports_all_field_errors_together() {
    for f in fixtures().await {
        let form = PostForm {
            title: String::new(),
            body: "Body without a title".to_string(),
            author: (f.author.id + 1).to_string(),
        };
        let resp = send(
            &f.state,
            test::TestRequest::post().uri("/post/new").set_form(&form),
        )
        .await;

        assert_eq!(resp.status(), StatusCode::OK, "{}", f.store);
        let body = body_text(resp).await;
        assert_eq!(body.matches("This field is required.").count(), 1);
        assert!(body.contains("Select a valid choice."));
    }
}

#[actix_web::test]
async fn test_createview_with_missing_author_field() {
    for f in fixtures().await {
        let resp = send(
            &f.state,
            test::TestRequest::post()
                .uri("/post/new")
                .set_form([("title", "t"), ("body", "b")]),
        )
        .await;

        assert_eq!(resp.status(), StatusCode::OK, "{}", f.store);
        assert!(body_text(resp).await.contains("This field is required."));
    }
}

#[actix_web::test]
async fn test_post_updateview() {
    for f in fixtures().await {
        let form = PostEditForm {
            title: P_UPD_TITLE.to_string(),
            body: P_UPD_BODY.to_string(),
        };
        let uri = reverse("post_edit", &[("pk", "1")]).unwrap();
        let resp = send(&f.state, test::TestRequest::post().uri(&uri).set_form(&form)).await;

        assert_eq!(resp.status(), StatusCode::FOUND, "{}", f.store);
        assert_eq!(location(&resp), "/post/1/");

        let updated = f.state.posts.get(f.post.id).await.unwrap();
        assert_eq!(updated.title, P_UPD_TITLE);
        assert_eq!(updated.body, P_UPD_BODY);
        assert_eq!(updated.author_id, f.author.id);
        assert_eq!(updated.created_at, f.post.created_at);
    }
}

#[actix_web::test]
async fn test_updateview_missing_post_is_not_found() {
    for f in fixtures().await {
        let form = PostEditForm {
            title: String::new(),
            body: String::new(),
        };
        let resp = send(
            &f.state,
            test::TestRequest::post().uri("/post/99999/edit").set_form(&form),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{}", f.store);

        let empty = send(&f.state, test::TestRequest::post().uri("/post/99999/edit")).await;
        assert_eq!(empty.status(), StatusCode::NOT_FOUND, "{}", f.store);
    }
}

#[actix_web::test]
async fn test_updateview_without_form_body_rerenders_form() {
    for f in fixtures().await {
        let resp = send(&f.state, test::TestRequest::post().uri("/post/1/edit")).await;

        assert_eq!(resp.status(), StatusCode::OK, "{}", f.store);
        let body = body_text(resp).await;
        assert!(body.contains("<!-- templates/post_edit.html -->"));
        assert_eq!(body.matches("This field is required.").count(), 2);
        assert_eq!(f.state.posts.get(f.post.id).await.unwrap(), f.post);
    }
}

#[actix_web::test]
async fn test_updateview_with_blank_title_keeps_record() {
    for f in fixtures().await {
        let form = PostEditForm {
            title: String::new(),
            body: P_UPD_BODY.to_string(),
        };
        let resp = send(
            &f.state,
            test::TestRequest::post().uri("/post/1/edit").set_form(&form),
        )
        .await;

        assert_eq!(resp.status(), StatusCode::OK, "{}", f.store);
        let body = body_text(resp).await;
        assert!(body.contains("<!-- templates/post_edit.html -->"));
        assert!(body.contains("This field is required."));
        assert_eq!(f.state.posts.get(f.post.id).await.unwrap(), f.post);
    }
}

#[actix_web::test]
async fn test_post_deleteview() {
    for f in fixtures().await {
        let uri = reverse("post_delete", &[("pk", "1")]).unwrap();
        let resp = send(&f.state, test::TestRequest::post().uri(&uri)).await;

        assert_eq!(resp.status(), StatusCode::FOUND, "{}", f.store);
        assert_eq!(location(&resp), reverse("home", &[]).unwrap());

        let gone = send(&f.state, test::TestRequest::get().uri("/post/1/")).await;
        assert_eq!(gone.status(), StatusCode::NOT_FOUND, "{}", f.store);

        let again = send(&f.state, test::TestRequest::post().uri(&uri)).await;
        assert_eq!(again.status(), StatusCode::NOT_FOUND, "{}", f.store);
    }
}

#[actix_web::test]
async fn test_form_pages_render() {
    for f in fixtures().await {
        let new = send(&f.state, test::TestRequest::get().uri("/post/new")).await;
        assert_eq!(new.status(), StatusCode::OK, "{}", f.store);
        assert!(body_text(new).await.contains("<!-- templates/post_new.html -->"));

        let edit = send(&f.state, test::TestRequest::get().uri("/post/1/edit")).await;
        assert_eq!(edit.status(), StatusCode::OK, "{}", f.store);
        let body = body_text(edit).await;
        assert!(body.contains("<!-- templates/post_edit.html -->"));
        assert!(body.contains(P_BODY));

        let delete = send(&f.state, test::TestRequest::get().uri("/post/1/delete")).await;
        assert_eq!(delete.status(), StatusCode::OK, "{}", f.store);
        assert!(body_text(delete).await.contains("<!-- templates/post_delete.html -->"));

        let missing = send(&f.state, test::TestRequest::get().uri("/post/99999/edit")).await;
        assert_eq!(missing.status(), StatusCode::NOT_FOUND, "{}", f.store);
    }
}

#[actix_web::test]
async fn test_missing_trailing_slash_redirects() {
    for f in fixtures().await {
        let resp = send(&f.state, test::TestRequest::get().uri("/post/1?ref=feed")).await;
        assert_eq!(resp.status(), StatusCode::MOVED_PERMANENTLY, "{}", f.store);
        assert_eq!(location(&resp), "/post/1/?ref=feed");
    }
}

#[actix_web::test]
async fn test_unknown_path_is_not_found() {
    for f in fixtures().await {
        let resp = send(&f.state, test::TestRequest::get().uri("/nowhere")).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{}", f.store);
    }
}

#[actix_web::test]
async fn test_wrong_method_is_rejected() {
    for f in fixtures().await {
        let resp = send(&f.state, test::TestRequest::delete().uri("/post/1/")).await;
        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED, "{}", f.store);
    }
}

#[actix_web::test]
async fn test_health_reports_active_store() {
    for f in fixtures().await {
        let resp = send(&f.state, test::TestRequest::get().uri("/health")).await;
        assert_eq!(resp.status(), StatusCode::OK, "{}", f.store);

        let json: serde_json::Value = serde_json::from_str(&body_text(resp).await).unwrap();
        assert_eq!(json["status"], "ok");
        assert_eq!(json["storage"], f.state.storage.as_str());
    }
}
