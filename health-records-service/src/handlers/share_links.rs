use crate::dtos::{CreateShareLinkRequest, ShareLinkResponse};
use crate::middleware::AuthUser;
use crate::models::ShareableLink;
use crate::services::metrics::{record_share_link_created, record_share_notification};
use crate::services::share::{self, NotificationOutcome};
use crate::utils::ValidatedJson;
use crate::AppState;
use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use service_core::error::AppError;
use uuid::Uuid;

/// Create a time-limited share link and optionally email it
#[utoipa::path(
    post,
    path = "/share-links",
    request_body = CreateShareLinkRequest,
    responses(
        (status = 201, description = "Share link created", body = ShareLinkResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Share Links"
)]
pub async fn create_share_link(
    State(state): State<AppState>,
    user: AuthUser,
    headers: HeaderMap,
    ValidatedJson(request): ValidatedJson<CreateShareLinkRequest>,
) -> Result<impl IntoResponse, AppError> {
    let recipient = match (request.send_email, request.recipient_email.as_deref()) {
        (true, None) => {
            return Err(AppError::BadRequest(anyhow::anyhow!(
                "recipient_email is required when send_email is true"
            )))
        }
        (true, Some(email)) => Some(email.to_string()),
        (false, _) => None,
    };

    let now = Utc::now();
    let link = ShareableLink {
        id: Uuid::new_v4().to_string(),
        token: share::generate_token(now),
        profile_id: request.profile_id,
        share_type: request.share_type,
        resource_ids: request.resource_ids,
        access_level: request.access_level,
        expires_at: share::expires_at(now, request.expires_hours),
        recipient_email: request.recipient_email,
        recipient_name: request.recipient_name,
        purpose: request.purpose,
        is_active: true,
        view_count: 0,
        created_by: user.email().to_string(),
        created_date: now,
    };

    state.repo.create(&link).await?;
    record_share_link_created(link.share_type.as_str());

    tracing::info!(
        link_id = %link.id,
        profile_id = %link.profile_id,
        share_type = link.share_type.as_str(),
        expires_at = %link.expires_at,
        "Share link created"
    );

    let origin = headers
        .get(header::ORIGIN)
        .and_then(|value| value.to_str().ok());
    let share_url = share::share_url(origin, &state.config.share.default_base_url, &link.token);

    let locale = state.translator.negotiate(
        headers
            .get(header::ACCEPT_LANGUAGE)
            .and_then(|value| value.to_str().ok()),
    );

    let notification = match recipient {
        Some(recipient) => {
            let message =
                share::compose_email(&state.translator, &locale, &link, &share_url, &recipient);
            share::notify_recipient(state.email.as_ref(), &message, &link.id).await
        }
        None => NotificationOutcome::NotRequested,
    };
    record_share_notification(notification.as_str());

    let message_key = if notification == NotificationOutcome::Sent {
        "share.created_and_emailed"
    } else {
        "share.created"
    };

    Ok((
        StatusCode::CREATED,
        Json(ShareLinkResponse {
            success: true,
            link_id: link.id,
            share_url,
            expires_at: link.expires_at,
            message: state.translator.translate(&locale, message_key).to_string(),
            notification,
        }),
    ))
}
