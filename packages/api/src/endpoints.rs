//! # Typed endpoints built on the call wrapper
//!
//! Auth flows need both halves of this crate: the call wrapper to talk to the
//! API and the identity store to remember the answer. The `sign_*` functions
//! tie them together so the UI does not have to.
//!
//! | Function | Endpoint | Effect on the identity store |
//! |----------|----------|------------------------------|
//! | [`login`] | `POST /auth/login` | none |
//! | [`sign_in`] | `POST /auth/login` | replaces the identity |
//! | [`fetch_profile`] | `GET /auth/me` | none |
//! | [`refresh_session`] | `GET /auth/me` | overwrites profile fields, keeps roles |
//! | [`restore_session`] | `GET /auth/me` | as `refresh_session`; clears everything on 401 |
//! | [`logout`] | `POST /auth/logout` | none |
//! | [`sign_out`] | `POST /auth/logout` | clears identity and active role, even if the call fails |
//! | [`upload_image`] | `POST <path>` multipart | none |

use serde::{Deserialize, Serialize};
use store::{CookieStore, KeyValueStore};

use crate::busy::BusyFlag;
use crate::client::ApiClient;
use crate::error::ApiError;
use crate::identity::IdentityStore;
use crate::models::{Profile, Role, SessionIdentity};
use crate::notify::Notifier;
use crate::request::{ApiRequest, FilePart};
use crate::transport::Transport;

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

/// `data` of a successful login.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub access_token: String,
    pub user: AccountInfo,
}

/// The account as the login endpoint describes it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AccountInfo {
    #[serde(flatten)]
    pub profile: Profile,
    #[serde(default)]
    pub roles: Vec<Role>,
}

impl LoginResponse {
    pub fn into_identity(self) -> SessionIdentity {
        let mut identity = SessionIdentity {
            token: Some(self.access_token),
            roles: self.user.roles,
            ..Default::default()
        };
        identity.apply_profile(self.user.profile);
        identity
    }
}

/// `data` of an image upload.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UploadedImage {
    pub url: String,
}

pub async fn login<T, N, B>(
    client: &ApiClient<T, N>,
    busy: &B,
    email: &str,
    password: &str,
) -> Result<SessionIdentity, ApiError>
where
    T: Transport,
    N: Notifier,
    B: BusyFlag + ?Sized,
{
    let response: LoginResponse = client
        .post(busy, "/auth/login", &LoginRequest { email, password })
        .await?;
    Ok(response.into_identity())
}

/// Log in and persist the resulting identity.
pub async fn sign_in<T, N, B, S, C>(
    client: &ApiClient<T, N>,
    busy: &B,
    identity: &IdentityStore<S, C>,
    email: &str,
    password: &str,
) -> Result<SessionIdentity, ApiError>
where
    T: Transport,
    N: Notifier,
    B: BusyFlag + ?Sized,
    S: KeyValueStore,
    C: CookieStore,
{
    let session = login(client, busy, email, password).await?;
    identity.login(&session);
    Ok(session)
}

pub async fn fetch_profile<T, N, B>(client: &ApiClient<T, N>, busy: &B) -> Result<Profile, ApiError>
where
    T: Transport,
    N: Notifier,
    B: BusyFlag + ?Sized,
{
    client.get(busy, "/auth/me").await
}

/// Re-fetch the profile and store it. Returns the updated identity, or `None`
/// when nobody is logged in locally.
pub async fn refresh_session<T, N, B, S, C>(
    client: &ApiClient<T, N>,
    busy: &B,
    identity: &IdentityStore<S, C>,
) -> Result<Option<SessionIdentity>, ApiError>
where
    T: Transport,
    N: Notifier,
    B: BusyFlag + ?Sized,
    S: KeyValueStore,
    C: CookieStore,
{
    if !identity.is_authenticated() {
        return Ok(None);
    }
    let profile = fetch_profile(client, busy).await?;
    identity.refresh_profile(profile);
    Ok(identity.current())
}

/// Confirm a stored session at startup.
///
/// Like [`refresh_session`], but a 401 means the API no longer accepts the
/// stored token, so the identity and active role are cleared locally. The
/// error is still returned.
pub async fn restore_session<T, N, B, S, C>(
    client: &ApiClient<T, N>,
    busy: &B,
    identity: &IdentityStore<S, C>,
) -> Result<Option<SessionIdentity>, ApiError>
where
    T: Transport,
    N: Notifier,
    B: BusyFlag + ?Sized,
    S: KeyValueStore,
    C: CookieStore,
{
    let result = refresh_session(client, busy, identity).await;
    if let Err(e) = &result {
        if e.is_unauthorized() {
            tracing::info!("Stored session rejected by the API, logging out");
            identity.logout();
        }
    }
    result
}

pub async fn logout<T, N, B>(client: &ApiClient<T, N>, busy: &B) -> Result<(), ApiError>
where
    T: Transport,
    N: Notifier,
    B: BusyFlag + ?Sized,
{
    let _: Option<serde_json::Value> = client.call(busy, ApiRequest::post("/auth/logout")).await?;
    Ok(())
}

/// Tell the API the session is over and forget it locally.
///
/// Local state is cleared even when the call fails: a visitor who clicks
/// "sign out" must end up signed out. The error is still returned.
pub async fn sign_out<T, N, B, S, C>(
    client: &ApiClient<T, N>,
    busy: &B,
    identity: &IdentityStore<S, C>,
) -> Result<(), ApiError>
where
    T: Transport,
    N: Notifier,
    B: BusyFlag + ?Sized,
    S: KeyValueStore,
    C: CookieStore,
{
    let result = logout(client, busy).await;
    identity.logout();
    result
}

/// Upload an image as multipart form data under the `file` field.
pub async fn upload_image<T, N, B>(
    client: &ApiClient<T, N>,
    busy: &B,
    path: &str,
    file: FilePart,
) -> Result<UploadedImage, ApiError>
where
    T: Transport,
    N: Notifier,
    B: BusyFlag + ?Sized,
{
    client
        .call(busy, ApiRequest::post(path).form_file("file", file))
        .await
}

#[cfg(test)]
mod tests {
    use store::{MemoryCookies, MemoryStore};

    use super::*;
    use crate::busy::NotBusy;
    use crate::client::test_support::client;
    use crate::config::SessionConfig;
    use crate::request::{FormField, Method, RequestBody};

    const LOGIN_BODY: &str = r#"{
        "data": {
            "accessToken": "jwt-abc",
            "user": {
                "id": "7",
                "email": "guide@example.com",
                "name": "Long",
                "avatarUrl": null,
                "provider": "local",
                "roles": ["TourGuide", "User"]
            }
        },
        "message": "Welcome back"
    }"#;

    fn identity_store() -> IdentityStore<MemoryStore, MemoryCookies> {
        IdentityStore::new(MemoryStore::new(), MemoryCookies::new(), SessionConfig::default())
    }

    #[tokio::test]
    async fn test_sign_in_persists_identity() {
        let client = client();
        client.transport().respond(200, LOGIN_BODY);
        let ids = identity_store();

        let session = sign_in(&client, &NotBusy, &ids, "guide@example.com", "pw")
            .await
            .unwrap();

        assert_eq!(session.token.as_deref(), Some("jwt-abc"));
        assert_eq!(session.roles, vec![Role::tour_guide(), Role::user()]);
        assert_eq!(ids.current(), Some(session));

        let sent = client.transport().sent.borrow();
        assert_eq!(sent[0].method, Method::Post);
        assert_eq!(sent[0].url.path(), "/api/auth/login");
        assert_eq!(
            sent[0].body,
            Some(RequestBody::Json(serde_json::json!({
                "email": "guide@example.com",
                "password": "pw"
            })))
        );
    }

    #[tokio::test]
    async fn test_failed_sign_in_leaves_store_untouched() {
        let client = client();
        client
            .transport()
            .respond(401, r#"{"message":"Invalid email or password"}"#);
        let ids = identity_store();

        let err = sign_in(&client, &NotBusy, &ids, "guide@example.com", "wrong")
            .await
            .unwrap_err();

        assert!(err.is_unauthorized());
        assert!(!ids.is_authenticated());
        assert_eq!(
            client.notifier().notices.borrow()[0].1,
            "Invalid email or password"
        );
    }

    #[tokio::test]
    async fn test_refresh_session_keeps_roles() {
        let client = client();
        client.transport().respond(200, LOGIN_BODY);
        client.transport().respond(
            200,
            r#"{"data":{"id":"7","email":"guide@example.com","name":"Long Tran","provider":"local"}}"#,
        );
        let ids = identity_store();
        sign_in(&client, &NotBusy, &ids, "guide@example.com", "pw")
            .await
            .unwrap();

        let refreshed = refresh_session(&client, &NotBusy, &ids).await.unwrap().unwrap();

        assert_eq!(refreshed.display_name(), "Long Tran");
        assert_eq!(refreshed.roles, vec![Role::tour_guide(), Role::user()]);
        assert_eq!(refreshed.token.as_deref(), Some("jwt-abc"));
    }

    #[tokio::test]
    async fn test_refresh_without_session_skips_call() {
        let client = client();
        let ids = identity_store();
        assert_eq!(refresh_session(&client, &NotBusy, &ids).await.unwrap(), None);
        assert!(client.transport().sent.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_restore_session_logs_out_on_401() {
        let client = client();
        client.transport().respond(200, LOGIN_BODY);
        client.transport().respond(401, r#"{"message":"Token expired"}"#);
        let cookies = MemoryCookies::new();
        let ids = IdentityStore::new(MemoryStore::new(), cookies.clone(), SessionConfig::default());
        sign_in(&client, &NotBusy, &ids, "guide@example.com", "pw")
            .await
            .unwrap();
        assert!(ids.set_active_role(&Role::tour_guide()));
        assert!(cookies.get_cookie("tourbook.active_role").is_some());

        let err = restore_session(&client, &NotBusy, &ids).await.unwrap_err();

        assert!(err.is_unauthorized());
        assert!(!ids.is_authenticated());
        assert!(ids.get_active_role().is_none());
        assert!(cookies.get_cookie("tourbook.active_role").is_none());
    }

    #[tokio::test]
    async fn test_restore_session_keeps_session_on_other_errors() {
        let client = client();
        client.transport().respond(200, LOGIN_BODY);
        client.transport().respond(503, r#"{"message":"Maintenance"}"#);
        let ids = identity_store();
        sign_in(&client, &NotBusy, &ids, "guide@example.com", "pw")
            .await
            .unwrap();

        let err = restore_session(&client, &NotBusy, &ids).await.unwrap_err();

        assert_eq!(err.status(), Some(503));
        assert!(ids.is_authenticated());
    }

    #[tokio::test]
    async fn test_sign_out_clears_even_on_failure() {
        let client = client();
        client.transport().respond(200, LOGIN_BODY);
        client.transport().respond(500, r#"{"message":"Session store down"}"#);
        let ids = identity_store();
        sign_in(&client, &NotBusy, &ids, "guide@example.com", "pw")
            .await
            .unwrap();
        assert!(ids.set_active_role(&Role::tour_guide()));

        let result = sign_out(&client, &NotBusy, &ids).await;

        assert!(result.is_err());
        assert!(!ids.is_authenticated());
        assert!(ids.get_active_role().is_none());
    }

    #[tokio::test]
    async fn test_upload_image_is_multipart() {
        let client = client();
        client
            .transport()
            .respond(200, r#"{"data":{"url":"https://cdn.example/t/1.jpg"}}"#);

        let uploaded = upload_image(
            &client,
            &NotBusy,
            "/tours/1/images",
            FilePart {
                file_name: "1.jpg".to_string(),
                content_type: "image/jpeg".to_string(),
                bytes: vec![1, 2, 3],
            },
        )
        .await
        .unwrap();

        assert_eq!(uploaded.url, "https://cdn.example/t/1.jpg");
        let sent = client.transport().sent.borrow();
        match &sent[0].body {
            Some(RequestBody::Multipart(fields)) => {
                assert_eq!(fields[0].0, "file");
                assert!(matches!(&fields[0].1, FormField::File(f) if f.bytes == vec![1, 2, 3]));
            }
            other => panic!("expected multipart body, got {other:?}"),
        }
    }
}
