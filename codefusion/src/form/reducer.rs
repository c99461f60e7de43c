//! Registration form reducer.

use super::actions::{FormAction, TextField};
use super::environment::RegistrationEnvironment;
use super::state::{FormPhase, FormState};
use super::SUBMISSION_FAILED_BANNER;
use crate::notification::{Notifier, RegistrationMessage};
use crate::ticket::{Ticket, TICKET_NAMESPACE};
use crate::validation::{self, avatar_size_error, Field};
use crate::widgets::{day_options, read_as_data_uri, toggle, AvatarFile};
use codefusion_core::effect::Effect;
use codefusion_core::reducer::Reducer;
use codefusion_core::{smallvec, SmallVec};
use std::marker::PhantomData;

/// Reducer of the registration form.
///
/// Generic over the notification collaborator so tests can inject a mock.
#[derive(Debug, Clone, Copy)]
pub struct RegistrationReducer<N> {
    _notifier: PhantomData<fn() -> N>,
}

impl<N> RegistrationReducer<N> {
    /// Create the reducer.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            _notifier: PhantomData,
        }
    }
}

impl<N> Default for RegistrationReducer<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N> RegistrationReducer<N>
where
    N: Notifier + Clone + 'static,
{
    fn revalidate(state: &mut FormState, field: Field) {
        let error = validation::validate_field(&state.draft, field);
        state.errors.set(field, error);
    }

    fn submit(state: &mut FormState, env: &RegistrationEnvironment<N>) -> Effect<FormAction> {
        if state.phase != FormPhase::Editing {
            tracing::debug!(phase = ?state.phase, "Ignoring submit outside editing");
            return Effect::None;
        }

        state.errors = validation::validate(&state.draft);
        state.avatar_error = avatar_size_error(state.draft.avatar.as_ref(), env.form.avatar_max_bytes);
        if !state.errors.is_empty() || state.avatar_error.is_some() {
            tracing::debug!(
                invalid_fields = state.errors.len(),
                oversized_avatar = state.avatar_error.is_some(),
                "Submission blocked by validation"
            );
            return Effect::None;
        }

        state.phase = FormPhase::Submitting;
        state.banner = None;

        let notifier = env.notifier.clone();
        let message = RegistrationMessage::from_draft(&state.draft, &env.recipient);
        let generation = state.generation;
        Effect::future(async move {
            match notifier.send(&message).await {
                Ok(()) => Some(FormAction::NotificationSucceeded { generation }),
                Err(e) => Some(FormAction::NotificationFailed {
                    generation,
                    reason: e.to_string(),
                }),
            }
        })
    }

    fn issue_ticket(state: &FormState, env: &RegistrationEnvironment<N>) -> Ticket {
        let draft = &state.draft;
        let avatar = state
            .upload
            .preview
            .clone()
            .or_else(|| draft.avatar.as_ref().map(AvatarFile::to_data_uri));

        Ticket {
            id: format!("{TICKET_NAMESPACE}{}", env.ids.next_id()),
            name: draft.full_name(),
            email: draft.email.trim().to_string(),
            profession: draft.profession.trim().to_string(),
            days: draft.days.clone(),
            avatar,
            issued_date: env.clock.now().date_naive(),
        }
    }
}

impl<N> Reducer for RegistrationReducer<N>
where
    N: Notifier + Clone + 'static,
{
    type State = FormState;
    type Action = FormAction;
    type Environment = RegistrationEnvironment<N>;

    fn reduce(
        &self,
        state: &mut FormState,
        action: FormAction,
        env: &RegistrationEnvironment<N>,
    ) -> SmallVec<[Effect<FormAction>; 4]> {
        match action {
            FormAction::TextChanged { field, value } => {
                if state.phase != FormPhase::Editing {
                    return smallvec![Effect::None];
                }
                let draft = &mut state.draft;
                match field {
                    TextField::FirstName => draft.first_name = value,
                    TextField::LastName => draft.last_name = value,
                    TextField::Email => draft.email = value,
                    TextField::Github => {
                        draft.github = Some(value).filter(|v| !v.trim().is_empty());
                    },
                    TextField::Profession => draft.profession = value,
                }
                Self::revalidate(state, field.field());
                smallvec![Effect::None]
            },

            FormAction::DayToggled { day, checked } => {
                if state.phase != FormPhase::Editing {
                    return smallvec![Effect::None];
                }
                state.draft.days = toggle(&day_options(), &state.draft.days, &day, checked);
                Self::revalidate(state, Field::Days);
                smallvec![Effect::None]
            },

            FormAction::Upload(event) => {
                if state.phase != FormPhase::Editing {
                    return smallvec![Effect::None];
                }
                let Some(file) = state.upload.apply(event) else {
                    return smallvec![Effect::None];
                };

                state.draft.avatar = file.clone();
                state.avatar_error =
                    avatar_size_error(state.draft.avatar.as_ref(), env.form.avatar_max_bytes);
                Self::revalidate(state, Field::Avatar);

                match file {
                    Some(file) => {
                        let selection = state.upload.selection;
                        let generation = state.generation;
                        smallvec![Effect::future(async move {
                            let data_uri = read_as_data_uri(file).await;
                            Some(FormAction::AvatarPreviewRead {
                                selection,
                                generation,
                                data_uri,
                            })
                        })]
                    },
                    None => smallvec![Effect::None],
                }
            },

            FormAction::AvatarPreviewRead {
                selection,
                generation,
                data_uri,
            } => {
                if generation == state.generation {
                    if let Some(uri) = data_uri {
                        if !state.upload.preview_ready(selection, uri) {
                            tracing::trace!(selection, "Discarding preview of a replaced file");
                        }
                    }
                }
                smallvec![Effect::None]
            },

            FormAction::Submit => smallvec![Self::submit(state, env)],

            FormAction::NotificationSucceeded { generation } => {
                if generation != state.generation || state.phase != FormPhase::Submitting {
                    return smallvec![Effect::None];
                }
                let ticket = Self::issue_ticket(state, env);
                tracing::info!(ticket = %ticket.id, days = ticket.days.len(), "Ticket issued");
                metrics::counter!("registration.completed").increment(1);

                state.ticket = Some(ticket);
                state.phase = FormPhase::Success;
                smallvec![Effect::delay(
                    env.form.reveal_delay(),
                    FormAction::RevealTicket { generation }
                )]
            },

            FormAction::NotificationFailed { generation, reason } => {
                if generation != state.generation || state.phase != FormPhase::Submitting {
                    return smallvec![Effect::None];
                }
                tracing::warn!(reason = %reason, "Registration notification failed");
                metrics::counter!("registration.failed").increment(1);

                state.phase = FormPhase::Editing;
                state.banner = Some(SUBMISSION_FAILED_BANNER.to_string());
                smallvec![Effect::None]
            },

            FormAction::RevealTicket { generation } => {
                if generation == state.generation && state.ticket.is_some() {
                    state.ticket_revealed = true;
                }
                smallvec![Effect::None]
            },

            FormAction::DismissBanner => {
                state.banner = None;
                smallvec![Effect::None]
            },

            FormAction::Unmounted => {
                state.generation += 1;
                smallvec![Effect::None]
            },
        }
    }
}
