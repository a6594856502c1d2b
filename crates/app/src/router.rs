// crates/app/src/router.rs

//! HTTP surface.
//!
//! Public routes render resolved content and never expose a raw error:
//! absent documents render defaults, unknown blocks render placeholders,
//! and a store failure becomes a generic 502 body. Admin routes map 1:1 to
//! the server actions and return the editor-facing outcome as JSON.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use serde_json::Value as JsonValue;
use tracing::error;

use domain::doc::{CategoryDocument, NavItem, SiteContentKey};
use serve::{render_page, resolve_page, resolve_site_content};
use store::{Collection, Order, StoreError};

use crate::actions::ActionOutcome;
use crate::generate::{DraftRequest, ImageRequest, TitleRequest};
use crate::state::AppState;
use crate::upload::UploadError;

#[tracing::instrument(skip_all)]
pub fn build(state: AppState) -> Router {
    Router::new()
        // public
        .route("/", get(homepage))
        .route("/blog", get(blog_index))
        .route("/blog/{slug}", get(blog_post))
        .route("/blog/category/{slug}", get(blog_category))
        .route("/blog/tag/{tag}", get(blog_tag))
        .route("/{slug}", get(page))
        // admin: pages
        .route("/admin/pages", post(create_page))
        .route("/admin/pages/{slug}", get(edit_page).post(update_page))
        .route("/admin/pages/{slug}/meta", post(update_page_meta))
        // admin: site content singletons
        .route(
            "/admin/site/{key}",
            get(edit_site_content).post(update_site_content),
        )
        // admin: posts
        .route("/admin/posts", post(create_post))
        .route(
            "/admin/posts/{slug}",
            post(update_post).delete(delete_post),
        )
        .route("/admin/posts/{slug}/image", post(set_post_image))
        // admin: plans
        .route("/admin/plans", post(save_plan))
        .route("/admin/plans/{id}", delete(delete_plan))
        // admin: drafting helpers + uploads
        .route("/admin/generate/draft", post(generate_draft))
        .route("/admin/generate/titles", post(generate_titles))
        .route("/admin/generate/image", post(generate_image))
        .route("/admin/uploads", post(upload_image))
        .with_state(Arc::new(state))
}

// ─────────────────────────────────────────────────────────────────────────────
// Public pages
// ─────────────────────────────────────────────────────────────────────────────

fn shell(title: &str, meta_description: &str, body: &str) -> Html<String> {
    let title = html_escape::encode_text(title);
    let meta = html_escape::encode_double_quoted_attribute(meta_description);
    Html(format!(
        "<!doctype html><html><head><meta charset=\"utf-8\">\
         <title>{title}</title><meta name=\"description\" content=\"{meta}\">\
         </head><body>{body}</body></html>"
    ))
}

/// Public pages never show raw errors.
fn bad_gateway(err: StoreError) -> Response {
    error!(%err, "content store unavailable");
    (
        StatusCode::BAD_GATEWAY,
        Html("<p>Temporarily unavailable. Please try again shortly.</p>".to_string()),
    )
        .into_response()
}

/// Site navigation, rendered into every public page header. Best-effort:
/// a store failure here degrades to an empty nav rather than failing the
/// page.
async fn nav_html(state: &AppState) -> String {
    let items = match state
        .store
        .query(Collection::Navigation, None, Order::Asc("order".into()))
        .await
    {
        Ok(items) => items,
        Err(_) => return String::new(),
    };

    let mut out = String::from("<nav><ul>");
    for doc in items {
        let Ok(item) = serde_json::from_value::<NavItem>(doc) else {
            continue;
        };
        out.push_str(&format!(
            "<li><a href=\"{}\">{}</a></li>",
            html_escape::encode_double_quoted_attribute(&item.href),
            html_escape::encode_text(&item.label),
        ));
    }
    out.push_str("</ul></nav>");
    out
}

async fn homepage(State(state): State<Arc<AppState>>) -> Response {
    match resolve_site_content(state.store.as_ref(), SiteContentKey::Homepage).await {
        Ok(content) => {
            let body = format!("{}{}", nav_html(&state).await, render_page(&content));
            shell("VPS Hosting", "High-performance VPS hosting.", &body).into_response()
        }
        Err(err) => bad_gateway(err),
    }
}

async fn page(State(state): State<Arc<AppState>>, Path(slug): Path<String>) -> Response {
    match resolve_page(state.store.as_ref(), &slug).await {
        Ok(page) => {
            let body = format!("{}{}", nav_html(&state).await, render_page(&page));
            shell(&page.title, &page.meta_description, &body).into_response()
        }
        Err(err) => bad_gateway(err),
    }
}

async fn blog_index(State(state): State<Arc<AppState>>) -> Response {
    let posts = match state
        .store
        .query(Collection::Posts, None, Order::Desc("createdAt".into()))
        .await
    {
        Ok(posts) => posts,
        Err(err) => return bad_gateway(err),
    };

    shell("Blog", "Guides and news.", &post_list_html("Blog", &posts)).into_response()
}

fn post_list_html(heading: &str, posts: &[JsonValue]) -> String {
    let mut body = format!("<main><h1>{}</h1><ul>", html_escape::encode_text(heading));
    for doc in posts {
        let slug = doc.get("id").and_then(JsonValue::as_str).unwrap_or("");
        let title = doc.get("title").and_then(JsonValue::as_str).unwrap_or(slug);
        body.push_str(&format!(
            "<li><a href=\"/blog/{}\">{}</a></li>",
            html_escape::encode_double_quoted_attribute(slug),
            html_escape::encode_text(title),
        ));
    }
    body.push_str("</ul></main>");
    body
}

async fn blog_category(State(state): State<Arc<AppState>>, Path(slug): Path<String>) -> Response {
    // Category rows carry the display name; the slug still works when the
    // row is missing.
    let heading = match state.store.get(Collection::Categories, &slug).await {
        Ok(Some(doc)) => serde_json::from_value::<CategoryDocument>(doc)
            .map(|c| c.name)
            .unwrap_or_else(|_| slug.clone()),
        Ok(None) => slug.clone(),
        Err(err) => return bad_gateway(err),
    };

    let filter_value = serde_json::json!(slug);
    let posts = match state
        .store
        .query(
            Collection::Posts,
            Some(("category", &filter_value)),
            Order::Desc("createdAt".into()),
        )
        .await
    {
        Ok(posts) => posts,
        Err(err) => return bad_gateway(err),
    };
    shell(&heading, "", &post_list_html(&heading, &posts)).into_response()
}

async fn blog_tag(State(state): State<Arc<AppState>>, Path(tag): Path<String>) -> Response {
    // The store filter is top-level equality only; tag membership is
    // checked here.
    let posts = match state
        .store
        .query(Collection::Posts, None, Order::Desc("createdAt".into()))
        .await
    {
        Ok(posts) => posts,
        Err(err) => return bad_gateway(err),
    };
    let tagged: Vec<JsonValue> = posts
        .into_iter()
        .filter(|doc| {
            doc.get("tags")
                .and_then(JsonValue::as_array)
                .is_some_and(|tags| tags.iter().any(|t| t.as_str() == Some(tag.as_str())))
        })
        .collect();
    let heading = format!("Tagged: {tag}");
    shell(&heading, "", &post_list_html(&heading, &tagged)).into_response()
}

async fn blog_post(State(state): State<Arc<AppState>>, Path(slug): Path<String>) -> Response {
    let doc = match state.store.get(Collection::Posts, &slug).await {
        Ok(Some(doc)) => doc,
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                shell("Not found", "", "<p>This post does not exist.</p>"),
            )
                .into_response()
        }
        Err(err) => return bad_gateway(err),
    };

    // Lenient read, same contract as pages: legacy rows still render.
    let title = doc.get("title").and_then(JsonValue::as_str).unwrap_or(&slug);
    let markdown = doc.get("body").and_then(JsonValue::as_str).unwrap_or("");
    let excerpt = doc.get("excerpt").and_then(JsonValue::as_str).unwrap_or("");
    let body = format!(
        "<main><article><h1>{}</h1>{}</article></main>",
        html_escape::encode_text(title),
        serve::markdown::markdown_to_html(markdown),
    );
    shell(title, excerpt, &body).into_response()
}

// ─────────────────────────────────────────────────────────────────────────────
// Admin actions
// ─────────────────────────────────────────────────────────────────────────────

fn outcome_response(outcome: ActionOutcome) -> Response {
    let status = if outcome.ok {
        StatusCode::OK
    } else if outcome.field_errors.is_empty() {
        StatusCode::BAD_GATEWAY
    } else {
        StatusCode::UNPROCESSABLE_ENTITY
    };
    (status, Json(outcome)).into_response()
}

async fn create_page(
    State(state): State<Arc<AppState>>,
    Json(input): Json<JsonValue>,
) -> Response {
    outcome_response(state.actions.create_page(input).await)
}

async fn update_page(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
    Json(input): Json<JsonValue>,
) -> Response {
    outcome_response(state.actions.update_page(&slug, input).await)
}

#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct MetaForm {
    title: Option<String>,
    meta_description: Option<String>,
}

async fn update_page_meta(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
    Json(form): Json<MetaForm>,
) -> Response {
    outcome_response(
        state
            .actions
            .update_page_meta(&slug, form.title, form.meta_description)
            .await,
    )
}

/// Editor read: the stored document with ephemeral card keys attached, or
/// 404 when nothing has been saved yet (the editor then starts from the
/// built-in defaults).
async fn edit_page(State(state): State<Arc<AppState>>, Path(slug): Path<String>) -> Response {
    match state.actions.edit_page(&slug).await {
        Ok(Some(doc)) => Json(doc).into_response(),
        Ok(None) => StatusCode::NOT_FOUND.into_response(),
        Err(err) => bad_gateway(err),
    }
}

fn site_key(key: &str) -> Option<SiteContentKey> {
    match key {
        "homepage" => Some(SiteContentKey::Homepage),
        "footer" => Some(SiteContentKey::Footer),
        "contact_info" => Some(SiteContentKey::ContactInfo),
        "general" => Some(SiteContentKey::General),
        _ => None,
    }
}

async fn edit_site_content(
    State(state): State<Arc<AppState>>,
    Path(key): Path<String>,
) -> Response {
    let Some(key) = site_key(&key) else {
        return StatusCode::NOT_FOUND.into_response();
    };
    match state.actions.edit_site_content(key).await {
        Ok(Some(doc)) => Json(doc).into_response(),
        Ok(None) => StatusCode::NOT_FOUND.into_response(),
        Err(err) => bad_gateway(err),
    }
}

async fn update_site_content(
    State(state): State<Arc<AppState>>,
    Path(key): Path<String>,
    Json(input): Json<JsonValue>,
) -> Response {
    let Some(key) = site_key(&key) else {
        return StatusCode::NOT_FOUND.into_response();
    };
    outcome_response(state.actions.update_site_content(key, input).await)
}

async fn create_post(
    State(state): State<Arc<AppState>>,
    Json(input): Json<JsonValue>,
) -> Response {
    outcome_response(state.actions.create_post(input).await)
}

async fn update_post(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
    Json(input): Json<JsonValue>,
) -> Response {
    outcome_response(state.actions.update_post(&slug, input).await)
}

async fn delete_post(State(state): State<Arc<AppState>>, Path(slug): Path<String>) -> Response {
    outcome_response(state.actions.delete_post(&slug).await)
}

#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImageForm {
    source_url: String,
}

async fn set_post_image(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
    Json(form): Json<ImageForm>,
) -> Response {
    outcome_response(state.actions.set_post_image(&slug, &form.source_url).await)
}

async fn save_plan(State(state): State<Arc<AppState>>, Json(input): Json<JsonValue>) -> Response {
    outcome_response(state.actions.save_plan(input).await)
}

async fn delete_plan(State(state): State<Arc<AppState>>, Path(id): Path<String>) -> Response {
    outcome_response(state.actions.delete_plan(&id).await)
}

// ─────────────────────────────────────────────────────────────────────────────
// Drafting helpers + uploads
// ─────────────────────────────────────────────────────────────────────────────

async fn generate_draft(
    State(state): State<Arc<AppState>>,
    Json(request): Json<DraftRequest>,
) -> Response {
    Json(state.generator.draft_post(request).await).into_response()
}

async fn generate_titles(
    State(state): State<Arc<AppState>>,
    Json(request): Json<TitleRequest>,
) -> Response {
    Json(state.generator.suggest_titles(request).await).into_response()
}

async fn generate_image(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ImageRequest>,
) -> Response {
    Json(state.generator.generate_image(&request.prompt).await).into_response()
}

async fn upload_image(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    bytes: Bytes,
) -> Response {
    let content_type = headers
        .get(http::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("application/octet-stream")
        .to_owned();
    let filename = headers
        .get("x-filename")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("upload.bin")
        .to_owned();

    match state
        .uploader
        .upload(&filename, &content_type, bytes.to_vec())
        .await
    {
        Ok(uploaded) => Json(uploaded).into_response(),
        Err(UploadError::Rejected(reason)) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(serde_json::json!({"error": reason})),
        )
            .into_response(),
        Err(UploadError::Unavailable(reason)) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(serde_json::json!({"error": reason})),
        )
            .into_response(),
    }
}
