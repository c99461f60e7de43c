//! Registration form driven through a live store.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use codefusion::config::FormConfig;
use codefusion::form::{
    FormAction, FormPhase, FormState, RegistrationEnvironment, RegistrationReducer, TextField,
    SUBMISSION_FAILED_BANNER,
};
use codefusion::mocks::MockNotifier;
use codefusion::validation::Field;
use codefusion::widgets::{AvatarFile, FileUploadEvent};
use codefusion::NotificationError;
use codefusion_runtime::Store;
use codefusion_testing::{init_test_tracing, test_clock, SequentialIds};
use std::sync::Arc;
use std::time::Duration;

type FormStore = Store<
    FormState,
    FormAction,
    RegistrationEnvironment<MockNotifier>,
    RegistrationReducer<MockNotifier>,
>;

fn store(notifier: MockNotifier) -> FormStore {
    init_test_tracing();
    let env = RegistrationEnvironment::new(
        notifier,
        Arc::new(test_clock()),
        Arc::new(SequentialIds::new()),
        "info@codefusion.dev",
        FormConfig {
            reveal_delay_ms: 20,
            ..FormConfig::default()
        },
    );
    Store::new(FormState::default(), RegistrationReducer::new(), env)
}

async fn type_ada(store: &FormStore) {
    for (field, value) in [
        (TextField::FirstName, "Ada"),
        (TextField::LastName, "Lovelace"),
        (TextField::Email, "ada@example.com"),
        (TextField::Profession, "Engineer"),
    ] {
        store
            .send(FormAction::TextChanged {
                field,
                value: value.into(),
            })
            .await
            .unwrap();
    }
    store
        .send(FormAction::DayToggled {
            day: "day1".into(),
            checked: true,
        })
        .await
        .unwrap();
}

#[tokio::test]
async fn valid_registration_issues_a_ticket() {
    let notifier = MockNotifier::new();
    let store = store(notifier.clone());
    type_ada(&store).await;

    store
        .send_and_wait_for(
            FormAction::Submit,
            |a| matches!(a, FormAction::RevealTicket { .. }),
            Duration::from_secs(2),
        )
        .await
        .unwrap();

    let (phase, revealed, ticket) = store
        .state(|s| (s.phase, s.ticket_revealed, s.ticket.clone()))
        .await;
    assert_eq!(phase, FormPhase::Success);
    assert!(revealed);

    let ticket = ticket.expect("ticket issued");
    assert!(ticket.id.starts_with("DEV-"));
    assert!(ticket.id.len() > "DEV-".len());
    assert_eq!(ticket.name, "Ada Lovelace");
    assert_eq!(ticket.email, "ada@example.com");
    assert_eq!(ticket.profession, "Engineer");
    assert_eq!(ticket.days, vec!["day1".to_string()]);

    let sent = notifier.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].from_email, "ada@example.com");
    assert_eq!(sent[0].to_email, "info@codefusion.dev");
}

#[tokio::test]
async fn missing_fields_never_reach_the_notifier() {
    let notifier = MockNotifier::new();
    let store = store(notifier.clone());
    store
        .send(FormAction::TextChanged {
            field: TextField::FirstName,
            value: "Ada".into(),
        })
        .await
        .unwrap();

    let mut handle = store.send(FormAction::Submit).await.unwrap();
    handle.wait_with_timeout(Duration::from_secs(1)).await.unwrap();

    let (phase, errors) = store.state(|s| (s.phase, s.visible_errors())).await;
    assert_eq!(phase, FormPhase::Editing);
    assert!(errors.get(Field::LastName).is_some());
    assert!(errors.get(Field::Days).is_some());
    assert_eq!(notifier.call_count(), 0);
}

#[tokio::test]
async fn oversized_avatar_blocks_submission() {
    let notifier = MockNotifier::new();
    let store = store(notifier.clone());
    type_ada(&store).await;
    store
        .send(FormAction::Upload(FileUploadEvent::Drop(AvatarFile::new(
            "huge.jpg",
            "image/jpeg",
            vec![0; 700 * 1024],
        ))))
        .await
        .unwrap();

    store.send(FormAction::Submit).await.unwrap();

    let (phase, error) = store
        .state(|s| (s.phase, s.error(Field::Avatar).map(str::to_string)))
        .await;
    assert_eq!(phase, FormPhase::Editing);
    assert_eq!(error.as_deref(), Some("File size must be under 500 KB."));
    assert_eq!(notifier.call_count(), 0);
}

#[tokio::test]
async fn rejected_notification_keeps_values() {
    let notifier = MockNotifier::failing(NotificationError::Rejected {
        status: 400,
        body: "The template ID is invalid".into(),
    });
    let store = store(notifier.clone());
    type_ada(&store).await;

    store
        .send_and_wait_for(
            FormAction::Submit,
            |a| matches!(a, FormAction::NotificationFailed { .. }),
            Duration::from_secs(2),
        )
        .await
        .unwrap();

    let state = store.state(Clone::clone).await;
    assert_eq!(state.phase, FormPhase::Editing);
    assert!(state.submit_enabled());
    assert_eq!(state.banner.as_deref(), Some(SUBMISSION_FAILED_BANNER));
    assert_eq!(state.draft.first_name, "Ada");
    assert_eq!(state.draft.days, vec!["day1".to_string()]);
    assert!(state.ticket.is_none());
    assert_eq!(notifier.call_count(), 1);

    store.send(FormAction::DismissBanner).await.unwrap();
    assert_eq!(store.state(|s| s.banner.clone()).await, None);
}

#[tokio::test]
async fn unmount_during_submission_discards_the_result() {
    let notifier = MockNotifier::new().with_latency(Duration::from_millis(100));
    let store = store(notifier.clone());
    type_ada(&store).await;

    store.send(FormAction::Submit).await.unwrap();
    store.unmount();
    tokio::time::sleep(Duration::from_millis(200)).await;

    let (phase, ticket) = store.state(|s| (s.phase, s.ticket.clone())).await;
    assert_eq!(phase, FormPhase::Submitting);
    assert!(ticket.is_none());
    assert_eq!(store.pending_effects(), 0);
}

#[tokio::test]
async fn avatar_preview_is_read_in_the_background() {
    let store = store(MockNotifier::new());
    let file = AvatarFile::new("me.png", "image/png", vec![1, 2, 3]);

    store
        .send_and_wait_for(
            FormAction::Upload(FileUploadEvent::Selected(file)),
            |a| matches!(a, FormAction::AvatarPreviewRead { .. }),
            Duration::from_secs(1),
        )
        .await
        .unwrap();

    let preview = store.state(|s| s.upload.preview.clone()).await;
    assert_eq!(preview.as_deref(), Some("data:image/png;base64,AQID"));
}
