//! Form actions behind the menu page's buttons.
//!
//! Every action works on the requesting visitor's app, then redirects back
//! to `/` so a reload never resubmits the form. Admin actions answer 403
//! outside admin mode. When the visitor has no API URL set, catalog writes
//! and uploads go to this server directly and pass the same authenticator
//! as `/api/menu` and `/api/upload`.

use axum::extract::{DefaultBodyLimit, Multipart, Path, State};
use axum::http::HeaderMap;
use axum::response::{Redirect, Response};
use axum::routing::post;
use axum::{Form, Router};
use serde::Deserialize;
use tracing::{debug, info};

use ementa_core::ServiceError;
use ementa_menu::api::{PERM_CATALOG_WRITE, PERM_IMAGE_UPLOAD};
use ementa_menu::ItemPatch;
use ementa_storefront::{ApiError, App, SettingsError};

use crate::local::{catalog_source, image_target};
use crate::routes::AppState;
use crate::visitors::Visitor;

pub fn routes(max_upload: usize) -> Router<AppState> {
    Router::new()
        .route("/cart/clear", post(clear_cart))
        .route("/cart/{id}/{op}", post(cart_line))
        .route("/admin/login", post(login))
        .route("/admin/logout", post(logout))
        .route("/admin/settings", post(settings))
        .route("/admin/save", post(save))
        .route("/admin/items/{id}", post(edit_item))
        .route("/admin/items/{id}/image", post(upload_image))
        .layer(DefaultBodyLimit::max(max_upload))
}

fn back(visitor: &Visitor) -> Response {
    visitor.respond(Redirect::to("/"))
}

fn require_admin(app: &App) -> Result<(), ServiceError> {
    if app.session().is_admin() {
        Ok(())
    } else {
        Err(ServiceError::PermissionDenied("admin mode required".into()))
    }
}

fn require_item(app: &App, id: &str) -> Result<(), ServiceError> {
    match app.menu().catalog().find_item(id) {
        Some(_) => Ok(()),
        None => Err(ServiceError::NotFound(format!("no menu item {:?}", id))),
    }
}

// ── Cart ──

/// POST /cart/{id}/add|inc|dec|remove
async fn cart_line(
    State(state): State<AppState>,
    Path((id, op)): Path<(String, String)>,
    headers: HeaderMap,
) -> Result<Response, ServiceError> {
    let visitor = Visitor::from_headers(&headers);
    let (app, _) = state.visitor_app(&visitor).await?;
    let mut app = app.lock().await;

    match op.as_str() {
        "add" => {
            if !app.add_to_cart(&id) {
                return Err(ServiceError::NotFound(format!("no menu item {:?}", id)));
            }
        }
        "inc" => app.update_cart_quantity(&id, 1),
        "dec" => app.update_cart_quantity(&id, -1),
        "remove" => app.remove_from_cart(&id),
        _ => return Err(ServiceError::NotFound(format!("no cart action {:?}", op))),
    }
    debug!(item = %id, op = %op, count = app.cart().item_count(), "cart updated");
    Ok(back(&visitor))
}

/// POST /cart/clear
async fn clear_cart(State(state): State<AppState>, headers: HeaderMap) -> Result<Response, ServiceError> {
    let visitor = Visitor::from_headers(&headers);
    let (app, _) = state.visitor_app(&visitor).await?;
    app.lock().await.clear_cart();
    Ok(back(&visitor))
}

// ── Admin session ──

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct LoginForm {
    password: String,
}

/// POST /admin/login
async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<LoginForm>,
) -> Result<Response, ServiceError> {
    let visitor = Visitor::from_headers(&headers);
    let (app, _) = state.visitor_app(&visitor).await?;
    let mut app = app.lock().await;
    app.set_password_input(&form.password);
    if !app.login() {
        info!(visitor = %visitor.id, "admin login refused");
    }
    Ok(back(&visitor))
}

/// POST /admin/logout
async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Result<Response, ServiceError> {
    let visitor = Visitor::from_headers(&headers);
    let (app, _) = state.visitor_app(&visitor).await?;
    app.lock().await.logout();
    Ok(back(&visitor))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SettingsForm {
    new_password: String,
    confirm_password: String,
    api_url: String,
}

/// POST /admin/settings
///
/// A password mismatch is shown in the settings panel, not returned.
async fn settings(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<SettingsForm>,
) -> Result<Response, ServiceError> {
    let visitor = Visitor::from_headers(&headers);
    let (app, _) = state.visitor_app(&visitor).await?;
    let mut app = app.lock().await;
    require_admin(&app)?;

    match app.update_settings(&form.new_password, &form.confirm_password, &form.api_url) {
        Ok(()) | Err(SettingsError::Mismatch) => Ok(back(&visitor)),
        Err(SettingsError::Storage(e)) => Err(ServiceError::Storage(e.to_string())),
    }
}

// ── Catalog editing ──

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ItemForm {
    number: Option<String>,
    name: Option<String>,
    price: Option<String>,
    image: Option<String>,
    /// Ingredient text in the visitor's current language.
    ingredients: Option<String>,
}

/// POST /admin/items/{id}
///
/// Changes stay in the visitor's copy until `/admin/save`.
async fn edit_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Form(form): Form<ItemForm>,
) -> Result<Response, ServiceError> {
    let visitor = Visitor::from_headers(&headers);
    let (app, _) = state.visitor_app(&visitor).await?;
    let mut app = app.lock().await;
    require_admin(&app)?;
    require_item(&app, &id)?;

    let patch = ItemPatch {
        number: form.number,
        name: form.name,
        price: form.price,
        image: form.image,
    };
    if !patch.is_empty() {
        app.edit_item(&id, &patch);
    }
    if let Some(text) = &form.ingredients {
        app.edit_ingredients(&id, text);
    }
    Ok(back(&visitor))
}

fn denied(e: ServiceError) -> ApiError {
    ApiError::Server { status: e.status_code().as_u16(), message: e.to_string() }
}

/// POST /admin/save
///
/// The visitor's lock is released while the catalog is in flight, so a
/// second save in the meantime is skipped and the page shows the button
/// disabled. The outcome is shown in the admin bar.
async fn save(State(state): State<AppState>, headers: HeaderMap) -> Result<Response, ServiceError> {
    let visitor = Visitor::from_headers(&headers);
    let (app, _) = state.visitor_app(&visitor).await?;

    let (snapshot, api_url) = {
        let mut app = app.lock().await;
        require_admin(&app)?;
        let api_url = app.session().api_url();
        match app.begin_save() {
            Some(snapshot) => (snapshot, api_url),
            None => {
                info!(visitor = %visitor.id, "save already in flight, skipped");
                return Ok(back(&visitor));
            }
        }
    };

    let result = match api_url {
        None => match state.auth.check(&headers, PERM_CATALOG_WRITE) {
            Ok(()) => catalog_source(&state.catalog, None).store(&snapshot).await,
            Err(e) => Err(denied(e)),
        },
        remote => catalog_source(&state.catalog, remote).store(&snapshot).await,
    };

    let outcome = app.lock().await.finish_save(result);
    info!(visitor = %visitor.id, outcome = ?outcome, "catalog save finished");
    Ok(back(&visitor))
}

struct UploadedFile {
    name: String,
    content_type: String,
    bytes: Vec<u8>,
}

/// The `file` part of the upload form.
async fn read_file(mut multipart: Multipart) -> Result<UploadedFile, ServiceError> {
    let invalid = |e: axum::extract::multipart::MultipartError| ServiceError::Validation(e.to_string());
    while let Some(field) = multipart.next_field().await.map_err(invalid)? {
        if field.name() != Some("file") {
            continue;
        }
        // Browsers send a bare name; keep only the last segment of anything else.
        let name = field
            .file_name()
            .and_then(|n| n.rsplit(['/', '\\']).next())
            .map(str::trim)
            .unwrap_or_default()
            .to_string();
        if name.is_empty() {
            return Err(ServiceError::Validation("uploaded file has no name".into()));
        }
        let content_type = field.content_type().unwrap_or("application/octet-stream").to_string();
        let bytes = field.bytes().await.map_err(invalid)?.to_vec();
        return Ok(UploadedFile { name, content_type, bytes });
    }
    Err(ServiceError::Validation("form has no file field".into()))
}

fn upload_failed(e: ApiError) -> ServiceError {
    match e {
        ApiError::Server { status: 401, message } => ServiceError::Unauthorized(message),
        ApiError::Server { status: 403, message } => ServiceError::PermissionDenied(message),
        ApiError::Server { status: 400..=499, message } => ServiceError::Validation(message),
        ApiError::Network(e) => ServiceError::Unavailable(format!("image host unreachable: {}", e)),
        other => ServiceError::Internal(other.to_string()),
    }
}

/// POST /admin/items/{id}/image (multipart, field `file`)
///
/// On success the item points at the new image; on failure it keeps the
/// old one.
async fn upload_image(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Result<Response, ServiceError> {
    let visitor = Visitor::from_headers(&headers);
    let (app, _) = state.visitor_app(&visitor).await?;
    let api_url = {
        let app = app.lock().await;
        require_admin(&app)?;
        require_item(&app, &id)?;
        app.session().api_url()
    };
    if api_url.is_none() {
        state.auth.check(&headers, PERM_IMAGE_UPLOAD)?;
    }

    let file = read_file(multipart).await?;
    let target = image_target(&state.uploads, api_url);
    let url = app
        .lock()
        .await
        .upload_image(&id, &file.name, file.bytes, &file.content_type, target.as_ref())
        .await
        .map_err(upload_failed)?;
    info!(item = %id, url = %url, "item image replaced");
    Ok(back(&visitor))
}
