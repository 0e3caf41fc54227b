use crate::services::identity::Session;
use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use service_core::error::AppError;

/// Session extractor for the records service.
///
/// The trusted front-end resolves authentication and forwards the session
/// user in the X-User-ID header. A missing header means the caller is
/// unauthenticated; the UI owns the redirect to its sign-in flow, this
/// extractor only reports the state.
#[derive(Debug, Clone)]
pub struct SessionUser(pub Session);

#[async_trait]
impl<S> FromRequestParts<S> for SessionUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = parts
            .headers
            .get("X-User-ID")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Unauthenticated(anyhow::anyhow!("Missing X-User-ID header"))
            })?;

        // Add to tracing span for observability
        tracing::Span::current().record("user_id", user_id);

        Ok(SessionUser(Session {
            user_id: user_id.to_string(),
        }))
    }
}
