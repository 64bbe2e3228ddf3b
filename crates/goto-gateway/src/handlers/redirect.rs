use crate::error::{AppError, Result};
use crate::model::RegisterForm;
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::Form;
use goto_core::{Key, Redirect};
use tracing::info;

/// Longest URL the `url` column holds.
pub const MAX_URL_LENGTH: usize = 255;

/// Keys shadowed by a fixed route in [`App::router`](crate::App::router).
/// `health` is taken by `GET /health`; keep in sync when adding routes.
const RESERVED_KEYS: &[&str] = &["health"];

const REGISTER_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head><title>goto</title></head>
<body>
<form method="POST" action="/">
<label>Key <input type="text" name="key" maxlength="32"></label>
<label>URL <input type="text" name="url" maxlength="255"></label>
<input type="submit" value="Save">
</form>
</body>
</html>
"#;

pub async fn register_form_handler() -> Html<&'static str> {
    Html(REGISTER_PAGE)
}

pub async fn register_handler(
    State(state): State<AppState>,
    Form(form): Form<RegisterForm>,
) -> Result<&'static str> {
    let key = Key::new(form.key)?;
    if RESERVED_KEYS.contains(&key.as_str()) {
        return Err(AppError::InvalidInput(format!("key '{key}' is reserved")));
    }
    if form.url.len() > MAX_URL_LENGTH {
        return Err(AppError::InvalidInput(format!(
            "url must be at most {MAX_URL_LENGTH} bytes, got {}",
            form.url.len()
        )));
    }
    // Resolve answers with the URL as its `Location` header.
    if HeaderValue::from_str(&form.url).is_err() {
        return Err(AppError::InvalidInput(
            "url must not contain control characters".to_string(),
        ));
    }

    state
        .redirector()
        .register(Redirect::new(key.clone(), form.url))
        .await?;
    info!(key = %key, "registered redirect");

    Ok("ok")
}

pub async fn redirect_handler(
    Path(key): Path<String>,
    State(state): State<AppState>,
) -> Result<Response> {
    // A key that fails validation can never have been registered.
    let key = Key::new(key).map_err(|_| AppError::NotFound)?;

    match state.redirector().resolve(&key).await? {
        Some(url) => Ok((StatusCode::FOUND, [(header::LOCATION, url)]).into_response()),
        None => Err(AppError::NotFound),
    }
}
