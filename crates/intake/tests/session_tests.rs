
use intake::record::SessionIdentity;
use intake::session::{SessionBootstrapper, SessionHandle};
use intake::status::StatusKind;
use mock_platform::{MockIdentity, ANONYMOUS_UID, CUSTOM_TOKEN_UID};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

fn mount(identity: &Arc<MockIdentity>, token: Option<&str>) -> SessionHandle {
  SessionBootstrapper::new(identity.clone(), token.map(str::to_string)).mount()
}

async fn settle() {
  tokio::time::sleep(Duration::from_millis(20)).await;
}

#[tokio::test]
async fn test_existing_identity_is_used_without_signing_in() {
  let identity = Arc::new(MockIdentity::signed_in("returning-user"));
  let session = mount(&identity, Some("unused-token"));

  let state = session.wait_until_ready().await.unwrap();
  assert_eq!(state.identity.unwrap().uid, "returning-user");
  assert!(state.status.is_none());
  assert_eq!(identity.anonymous_calls.load(Ordering::SeqCst), 0);
  assert_eq!(identity.custom_token_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_anonymous_sign_in_without_token() {
  let identity = Arc::new(MockIdentity::new());
  let session = mount(&identity, None);

  let state = session.wait_until_ready().await.unwrap();
  assert_eq!(state.identity.unwrap().uid, ANONYMOUS_UID);
  assert_eq!(identity.anonymous_calls.load(Ordering::SeqCst), 1);
  assert_eq!(identity.custom_token_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_empty_token_counts_as_absent() {
  let identity = Arc::new(MockIdentity::new());
  let session = mount(&identity, Some(""));

  session.wait_until_ready().await.unwrap();
  assert_eq!(identity.anonymous_calls.load(Ordering::SeqCst), 1);
  assert_eq!(identity.custom_token_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_custom_token_sign_in() {
  let identity = Arc::new(MockIdentity::new());
  let session = mount(&identity, Some("pre-issued-token"));

  let state = session.wait_until_ready().await.unwrap();
  assert_eq!(state.identity.unwrap().uid, CUSTOM_TOKEN_UID);
  assert_eq!(identity.custom_token_calls.load(Ordering::SeqCst), 1);
  assert_eq!(identity.anonymous_calls.load(Ordering::SeqCst), 0);
  assert_eq!(identity.last_token.lock().unwrap().as_deref(), Some("pre-issued-token"));
}

#[tokio::test]
async fn test_sign_in_failure_still_marks_ready() {
  let identity = Arc::new(MockIdentity::failing());
  let session = mount(&identity, None);

  let state = session.wait_until_ready().await.unwrap();
  assert!(state.ready);
  assert!(state.identity.is_none());

  let status = state.status.unwrap();
  assert_eq!(status.kind, StatusKind::Error);
  assert!(status.message.contains("ADMIN_ONLY_OPERATION"));
}

#[tokio::test]
async fn test_sign_out_after_sign_in_keeps_identity() {
  let identity = Arc::new(MockIdentity::new());
  let session = mount(&identity, None);
  session.wait_until_ready().await.unwrap();

  identity.publish(None);
  settle().await;

  assert_eq!(session.snapshot().identity.unwrap().uid, ANONYMOUS_UID);
  // No second sign-in attempt
  assert_eq!(identity.anonymous_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_later_identity_does_not_replace_the_first() {
  let identity = Arc::new(MockIdentity::new());
  let session = mount(&identity, None);
  session.wait_until_ready().await.unwrap();

  identity.publish(Some(SessionIdentity::new("someone-else", "other-token")));
  settle().await;

  let state = session.snapshot();
  assert!(state.ready);
  assert_eq!(state.identity.unwrap().uid, ANONYMOUS_UID);
}

#[tokio::test]
async fn test_one_subscription_per_mount_released_on_unmount() {
  let identity = Arc::new(MockIdentity::new());
  let session = mount(&identity, None);
  session.wait_until_ready().await.unwrap();

  assert!(session.is_mounted());
  assert_eq!(identity.subscriber_count(), 1);

  session.unmount();
  tokio::time::timeout(Duration::from_secs(1), async {
    while identity.subscriber_count() > 0 {
      tokio::task::yield_now().await;
    }
  })
  .await
  .expect("subscription was not released after unmount");
}
