//! Registration endpoint.
//!
//! `POST /api/registrations` replays the submitted values through the
//! registration form exactly as the browser would (field changes, day
//! toggles, avatar upload, submit) and reports the outcome:
//!
//! - `201 Created`: ticket issued after the notification succeeded
//! - `422 Unprocessable Entity`: field errors, notifier not called
//! - `502 Bad Gateway`: notification failed, entered values echoed back

use super::UnmountGuard;
use crate::export::TicketSnapshotter;
use crate::form::{FormAction, FormPhase, TextField};
use crate::notification::Notifier;
use crate::server::state::AppState;
use crate::ticket::{mailto_link, TicketView};
use crate::validation::FieldErrors;
use crate::widgets::{AvatarFile, FileUploadEvent};
use axum::{extract::State, http::StatusCode, Json};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use codefusion_runtime::wait_for_action;
use codefusion_web::AppError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Avatar as sent by the browser.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvatarUpload {
    /// Original file name
    pub file_name: String,
    /// MIME type
    pub content_type: String,
    /// File contents, base64
    pub data: String,
}

impl AvatarUpload {
    fn into_file(self) -> Result<AvatarFile, AppError> {
        let bytes = STANDARD.decode(self.data.as_bytes()).map_err(|e| {
            AppError::bad_request("Avatar data is not valid base64")
                .with_source(anyhow::Error::new(e))
        })?;
        Ok(AvatarFile::new(self.file_name, self.content_type, bytes))
    }
}

/// Submitted registration form.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RegistrationRequest {
    /// First name
    pub first_name: String,
    /// Last name
    pub last_name: String,
    /// Email
    pub email: String,
    /// GitHub user name
    pub github: Option<String>,
    /// Profession
    pub profession: String,
    /// Selected day identifiers
    pub days: Vec<String>,
    /// Profile photo
    pub avatar: Option<AvatarUpload>,
}

impl RegistrationRequest {
    /// Form actions reproducing the user's input.
    fn into_actions(self, avatar: Option<AvatarFile>) -> Vec<FormAction> {
        let mut actions: Vec<FormAction> = [
            (TextField::FirstName, self.first_name),
            (TextField::LastName, self.last_name),
            (TextField::Email, self.email),
            (TextField::Github, self.github.unwrap_or_default()),
            (TextField::Profession, self.profession),
        ]
        .into_iter()
        .map(|(field, value)| FormAction::TextChanged { field, value })
        .collect();

        actions.extend(self.days.into_iter().map(|day| FormAction::DayToggled { day, checked: true }));
        if let Some(file) = avatar {
            actions.push(FormAction::Upload(FileUploadEvent::Selected(file)));
        }
        actions
    }
}

/// Ticket issued for a registration.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationResponse {
    /// Ticket with display data
    pub ticket: TicketView,
    /// Link to the standalone ticket page
    pub page_url: String,
    /// Email share link
    pub mailto: String,
}

/// Values echoed back after a failed notification.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PreservedValues {
    first_name: String,
    last_name: String,
    email: String,
    github: Option<String>,
    profession: String,
    days: Vec<String>,
}

#[derive(Debug, Serialize)]
struct ValidationDetails {
    errors: FieldErrors,
}

/// Submit a registration.
///
/// # Example
///
/// ```bash
/// curl -X POST http://localhost:8080/api/registrations \
///   -H "Content-Type: application/json" \
///   -d '{"firstName":"Ada","lastName":"Lovelace","email":"ada@example.com",
///        "profession":"Engineer","days":["day1"]}'
/// ```
///
/// # Errors
///
/// - 400 if the avatar payload is not base64
/// - 422 with `details.errors` when validation fails
/// - 502 with `details.values` when the notification fails
/// - 504 if no outcome arrives in time
pub async fn submit_registration<N, S>(
    State(state): State<AppState<N, S>>,
    Json(mut request): Json<RegistrationRequest>,
) -> Result<(StatusCode, Json<RegistrationResponse>), AppError>
where
    N: Notifier + Clone + 'static,
    S: TicketSnapshotter + Clone + 'static,
{
    let avatar = request.avatar.take().map(AvatarUpload::into_file).transpose()?;

    let store = state.registration_store();
    let _guard = UnmountGuard::new({
        let store = store.clone();
        move || store.unmount()
    });

    for action in request.into_actions(avatar) {
        store.send(action).await?;
    }

    let mut rx = store.subscribe_actions();
    store.send(FormAction::Submit).await?;

    let (phase, errors) = store.state(|s| (s.phase, s.visible_errors())).await;
    if phase == FormPhase::Editing {
        tracing::debug!(invalid_fields = errors.len(), "Registration rejected by validation");
        return Err(AppError::validation("Please correct the highlighted fields.")
            .with_details(ValidationDetails { errors }));
    }

    let notification_timeout = Duration::from_secs(state.config.notification.timeout_secs);
    let timeout = notification_timeout + state.config.form.reveal_delay() + Duration::from_secs(5);
    let outcome = wait_for_action(
        &mut rx,
        |a| matches!(a, FormAction::RevealTicket { .. } | FormAction::NotificationFailed { .. }),
        timeout,
    )
    .await
    .map_err(|_| AppError::timeout("Registration did not complete in time"))?;

    if let FormAction::NotificationFailed { .. } = outcome {
        let (banner, values) = store
            .state(|s| {
                let d = &s.draft;
                (
                    s.banner.clone().unwrap_or_default(),
                    PreservedValues {
                        first_name: d.first_name.clone(),
                        last_name: d.last_name.clone(),
                        email: d.email.clone(),
                        github: d.github.clone(),
                        profession: d.profession.clone(),
                        days: d.days.clone(),
                    },
                )
            })
            .await;
        return Err(AppError::bad_gateway(banner).with_details(serde_json::json!({ "values": values })));
    }

    let ticket = store
        .state(|s| s.ticket_revealed.then(|| s.ticket.clone()).flatten())
        .await
        .ok_or_else(|| AppError::internal("Ticket was revealed without being issued"))?;

    let page_url = state.page_url(&ticket)?;
    let response = RegistrationResponse {
        mailto: mailto_link(&ticket, &page_url),
        ticket: state.ticket_view(&ticket),
        page_url,
    };
    Ok((StatusCode::CREATED, Json(response)))
}
