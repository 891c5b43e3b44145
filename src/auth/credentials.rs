use axum::http::{header::AUTHORIZATION, HeaderMap};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use thiserror::Error;

use super::password;
use crate::database::models::User;
use crate::database::{Store, StoreError};

/// Why a credential header was rejected. All three become the same 401 at
/// the boundary; the distinction is kept for logs and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthFailure {
    #[error("missing or malformed credentials")]
    MalformedCredentials,

    #[error("no user with that email address")]
    UnknownIdentity,

    #[error("password does not match")]
    BadSecret,
}

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error(transparent)]
    Rejected(#[from] AuthFailure),

    /// The lookup itself failed; this is not the caller's fault.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// The verified caller for one request. Built only by [`verify`] and never
/// stored anywhere beyond the request it was resolved for.
#[derive(Debug, Clone)]
pub struct AuthenticatedContext {
    user: User,
}

impl AuthenticatedContext {
    pub(crate) fn new(user: User) -> Self {
        Self { user }
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    pub fn user_id(&self) -> i64 {
        self.user.id
    }
}

/// Email and password decoded from a Basic header.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct Credentials {
    pub email: String,
    pub password: String,
}

/// Decode `Authorization: Basic base64(email:password)`. The password may
/// itself contain colons; only the first one separates the fields.
pub(crate) fn parse_basic(headers: &HeaderMap) -> Result<Credentials, AuthFailure> {
    let header = headers
        .get(AUTHORIZATION)
        .ok_or(AuthFailure::MalformedCredentials)?
        .to_str()
        .map_err(|_| AuthFailure::MalformedCredentials)?;

    let (scheme, encoded) = header
        .trim()
        .split_once(' ')
        .ok_or(AuthFailure::MalformedCredentials)?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return Err(AuthFailure::MalformedCredentials);
    }

    let decoded = STANDARD
        .decode(encoded.trim())
        .map_err(|_| AuthFailure::MalformedCredentials)?;
    let decoded = String::from_utf8(decoded).map_err(|_| AuthFailure::MalformedCredentials)?;

    match decoded.split_once(':') {
        Some((email, password)) if !email.is_empty() => Ok(Credentials {
            email: email.to_string(),
            password: password.to_string(),
        }),
        _ => Err(AuthFailure::MalformedCredentials),
    }
}

/// Resolve the caller from the request headers.
pub async fn verify(
    store: &dyn Store,
    headers: &HeaderMap,
) -> Result<AuthenticatedContext, CredentialError> {
    let credentials = parse_basic(headers)?;

    let Some(identity) = store.find_user_by_email(&credentials.email).await? else {
        password::burn_verification(credentials.password).await;
        return Err(AuthFailure::UnknownIdentity.into());
    };

    let matched = password::spawn_verify(credentials.password, identity.password_hash)
        .await
        .map_err(StoreError::from)?;
    if !matched {
        return Err(AuthFailure::BadSecret.into());
    }

    Ok(AuthenticatedContext::new(identity.user))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{basic_auth, TestContext};
    use axum::http::HeaderValue;

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn parses_basic_header() {
        let creds = parse_basic(&headers_with(&basic_auth("joe@smith.com", "pa:ss"))).unwrap();
        assert_eq!(
            creds,
            Credentials {
                email: "joe@smith.com".to_string(),
                password: "pa:ss".to_string(),
            }
        );
    }

    #[test]
    fn rejects_malformed_headers() {
        let no_colon = format!("Basic {}", STANDARD.encode("joe@smith.com"));
        let no_email = format!("Basic {}", STANDARD.encode(":password"));
        let not_utf8 = format!("Basic {}", STANDARD.encode([0xff, 0xfe, b':', b'x']));
        for value in [
            "",
            "Basic",
            "Bearer abc.def.ghi",
            "Basic not*base64",
            no_colon.as_str(),
            no_email.as_str(),
            not_utf8.as_str(),
        ] {
            assert_eq!(
                parse_basic(&headers_with(value)),
                Err(AuthFailure::MalformedCredentials),
                "header {:?}",
                value
            );
        }
        assert_eq!(
            parse_basic(&HeaderMap::new()),
            Err(AuthFailure::MalformedCredentials)
        );
    }

    #[tokio::test]
    async fn verify_distinguishes_failure_reasons() {
        let ctx = TestContext::new().await;
        let joe = ctx.create_user("Joe", "joe@smith.com", "joepassword").await;

        let ok = verify(ctx.store(), &headers_with(&basic_auth("JOE@smith.com", "joepassword")))
            .await
            .unwrap();
        assert_eq!(ok.user(), &joe);

        let unknown = verify(ctx.store(), &headers_with(&basic_auth("ann@smith.com", "x"))).await;
        assert!(matches!(
            unknown,
            Err(CredentialError::Rejected(AuthFailure::UnknownIdentity))
        ));

        let bad = verify(ctx.store(), &headers_with(&basic_auth("joe@smith.com", "wrong"))).await;
        assert!(matches!(
            bad,
            Err(CredentialError::Rejected(AuthFailure::BadSecret))
        ));
    }
}
