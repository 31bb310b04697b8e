/// Session tests
///
/// Login, persistence across restarts and logout reset.
/// Run with: cargo test --test session_tests

use impactdesk::api::Credentials;
use impactdesk::model::{NewProject, NewUser};
use impactdesk::session::{
    DashboardView, FileSessionStorage, MemorySessionStorage, SessionStorage,
};
use impactdesk::{
    AuthApi, MemoryApi, Project, RequestLifecycle, ResourceApi, Role, SessionManager, StoreHandle,
    SyncClient, User,
};
use std::sync::Arc;
use tempfile::tempdir;

async fn backend_with_member() -> (Arc<MemoryApi>, User) {
    let api = Arc::new(MemoryApi::new());
    let user = ResourceApi::<User>::create(
        api.as_ref(),
        &NewUser::member("Amina", "amina@example.org", "s3cret"),
    )
    .await
    .unwrap();
    (api, user)
}

fn manager(api: &Arc<MemoryApi>, storage: Arc<dyn SessionStorage>) -> SessionManager {
    let auth: Arc<dyn AuthApi> = api.clone();
    SessionManager::new(auth, storage)
}

#[tokio::test]
async fn test_login_persists_and_restores() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("state").join("session.json");
    let (api, user) = backend_with_member().await;

    let mut sessions = manager(&api, Arc::new(FileSessionStorage::new(&path)));
    sessions
        .login(&Credentials::new("amina@example.org", "s3cret"))
        .await
        .unwrap();
    assert_eq!(sessions.lifecycle(), RequestLifecycle::Fulfilled);
    assert!(path.exists());

    let mut restored = manager(&api, Arc::new(FileSessionStorage::new(&path)));
    assert!(restored.restore().await.unwrap());
    let session = restored.session();
    assert!(session.is_authenticated());
    assert_eq!(session.user().unwrap().id, user.id);
    assert_eq!(session.role(), Some(Role::Member));
    assert_eq!(session.dashboard(), Some(DashboardView::Member));
}

#[tokio::test]
async fn test_rejected_login_records_the_cause() {
    let (api, _) = backend_with_member().await;
    let mut sessions = manager(&api, Arc::new(MemorySessionStorage::new()));

    let result = sessions
        .login(&Credentials::new("amina@example.org", "wrong"))
        .await;

    assert!(result.is_err());
    assert_eq!(sessions.lifecycle(), RequestLifecycle::Rejected);
    assert_eq!(sessions.error().unwrap().status, Some(401));
    assert!(!sessions.session().is_authenticated());

    sessions
        .login(&Credentials::new("amina@example.org", "s3cret"))
        .await
        .unwrap();
    assert!(sessions.error().is_none());
}

#[tokio::test]
async fn test_member_lists_only_owned_projects() {
    let (api, user) = backend_with_member().await;
    let client = SyncClient::new(StoreHandle::default(), Arc::clone(&api));
    let mut sessions = manager(&api, Arc::new(MemorySessionStorage::new()));

    client
        .create::<Project>(NewProject::named("Mine").owned_by(user.id.clone()))
        .await
        .into_result()
        .unwrap();
    client
        .create::<Project>(NewProject::named("Someone else's").owned_by("u-other".into()))
        .await
        .into_result()
        .unwrap();
    client.store().reset().await;

    sessions
        .login(&Credentials::new("amina@example.org", "s3cret"))
        .await
        .unwrap();
    let listing = sessions.session().project_listing().unwrap();
    client.run(listing).await.into_result().unwrap();

    let projects = client.store().snapshot::<Project>().await;
    assert_eq!(projects.len(), 1);
    assert_eq!(projects.items()[0].project_name, "Mine");
}

#[tokio::test]
async fn test_update_user_changes_role_and_persists() {
    let storage = Arc::new(MemorySessionStorage::new());
    let (api, user) = backend_with_member().await;
    let mut sessions = manager(&api, storage.clone());
    sessions
        .login(&Credentials::new("amina@example.org", "s3cret"))
        .await
        .unwrap();
    assert!(!sessions.session().can_manage());

    sessions
        .update_user(User {
            role: Role::Manager,
            ..user
        })
        .await
        .unwrap();

    assert!(sessions.session().can_manage());
    assert_eq!(sessions.session().dashboard(), Some(DashboardView::Admin));
    assert_eq!(storage.load().await.unwrap().unwrap().role, Role::Manager);
}

#[tokio::test]
async fn test_logout_resets_store_and_storage() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("session.json");
    let (api, _) = backend_with_member().await;
    let client = SyncClient::new(StoreHandle::default(), Arc::clone(&api));
    let mut sessions = manager(&api, Arc::new(FileSessionStorage::new(&path)));

    sessions
        .login(&Credentials::new("amina@example.org", "s3cret"))
        .await
        .unwrap();
    client.fetch_all::<User>().await.into_result().unwrap();
    assert_eq!(client.store().snapshot::<User>().await.len(), 1);

    sessions.logout(client.store()).await.unwrap();

    assert!(!sessions.session().is_authenticated());
    assert!(!path.exists());
    let users = client.store().snapshot::<User>().await;
    assert!(users.is_empty());
    assert_eq!(users.lifecycle(), RequestLifecycle::Idle);

    let mut after = manager(&api, Arc::new(FileSessionStorage::new(&path)));
    assert!(!after.restore().await.unwrap());
}

#[tokio::test]
async fn test_unsaved_login_is_not_committed() {
    let dir = tempdir().unwrap();
    let blocker = dir.path().join("not-a-dir");
    std::fs::write(&blocker, b"occupied").unwrap();
    let (api, _) = backend_with_member().await;

    let mut sessions = manager(
        &api,
        Arc::new(FileSessionStorage::new(blocker.join("session.json"))),
    );
    let result = sessions
        .login(&Credentials::new("amina@example.org", "s3cret"))
        .await;

    assert!(result.is_err());
    assert_eq!(sessions.lifecycle(), RequestLifecycle::Rejected);
    assert!(sessions.error().is_some());
    assert!(!sessions.session().is_authenticated());
}
