//! Credential check issuing session tokens.
//!
//! A login for a name with no stored user still runs one verification
//! against a decoy hash, so the hasher's cost does not reveal which names
//! exist.

use std::sync::{Arc, OnceLock};

use async_trait::async_trait;
use tracing::{error, info, warn};

use crate::domain::ports::{
    CredentialHasher, LoginService, SessionIssuer, UserRepository, UserRepositoryError,
};
use crate::domain::{Error, LoginCredentials, Password, PasswordHash, SessionToken, UserName};

const DECOY_PASSWORD: &str = "decoy-credential";

/// [`LoginService`] backed by the user repository, a hasher and a session
/// issuer.
#[derive(Clone)]
pub struct CredentialLoginService<R, H, S> {
    users: Arc<R>,
    hasher: Arc<H>,
    sessions: Arc<S>,
    decoy: OnceLock<PasswordHash>,
}

impl<R, H, S> CredentialLoginService<R, H, S> {
    pub fn new(users: Arc<R>, hasher: Arc<H>, sessions: Arc<S>) -> Self {
        Self {
            users,
            hasher,
            sessions,
            decoy: OnceLock::new(),
        }
    }
}

impl<R, H, S> CredentialLoginService<R, H, S>
where
    H: CredentialHasher,
{
    /// Verify `password` against the decoy hash and discard the outcome.
    fn verify_against_decoy(&self, password: &Password) {
        let decoy = if let Some(hash) = self.decoy.get() {
            hash
        } else {
            let hashed = Password::new(DECOY_PASSWORD)
                .map_err(|err| err.to_string())
                .and_then(|decoy| self.hasher.hash(&decoy).map_err(|err| err.to_string()));
            match hashed {
                Ok(hash) => self.decoy.get_or_init(|| hash),
                Err(message) => {
                    warn!(%message, "decoy credential unavailable");
                    return;
                }
            }
        };
        let _ = self.hasher.verify(password, decoy);
    }
}

#[async_trait]
impl<R, H, S> LoginService for CredentialLoginService<R, H, S>
where
    R: UserRepository,
    H: CredentialHasher,
    S: SessionIssuer,
{
    async fn login(&self, credentials: &LoginCredentials) -> Result<SessionToken, Error> {
        // A name that could never have been registered cannot match a user.
        let Ok(name) = UserName::new(credentials.username()) else {
            self.verify_against_decoy(credentials.password());
            return Err(Error::incorrect_login_details());
        };
        let found = self
            .users
            .find_by_name(&name)
            .await
            .map_err(|err: UserRepositoryError| {
                error!(error = %err, "user lookup failed during login");
                Error::internal(err.to_string())
            })?;
        let Some(user) = found else {
            self.verify_against_decoy(credentials.password());
            return Err(Error::incorrect_login_details());
        };

        let matches = self
            .hasher
            .verify(credentials.password(), user.password_hash())
            .map_err(|err| {
                error!(error = %err, user_id = %user.id(), "stored credential unusable");
                Error::internal(err.to_string())
            })?;
        if !matches {
            return Err(Error::incorrect_login_details());
        }

        let token = self.sessions.issue(user.id()).map_err(|err| {
            error!(error = %err, "session issuance failed");
            Error::internal(err.to_string())
        })?;
        info!(user_id = %user.id(), expires_at = %token.expires_at(), "session issued");
        Ok(token)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use rstest::{fixture, rstest};

    use super::*;
    use crate::domain::ports::{
        MockCredentialHasher, MockSessionIssuer, MockUserRepository, SessionIssuerError,
    };
    use crate::domain::{ErrorCode, PasswordHash, User, UserId};

    type Service =
        CredentialLoginService<MockUserRepository, MockCredentialHasher, MockSessionIssuer>;

    #[fixture]
    fn alice() -> User {
        User::new(
            UserId::random(),
            UserName::new("alice").expect("name"),
            PasswordHash::new("hash:correct"),
        )
    }

    fn hasher() -> MockCredentialHasher {
        let mut hasher = MockCredentialHasher::new();
        hasher
            .expect_hash()
            .returning(|password| Ok(PasswordHash::new(format!("hash:{}", password.expose()))));
        hasher.expect_verify().returning(|password, stored| {
            Ok(stored.as_str() == format!("hash:{}", password.expose()))
        });
        hasher
    }

    fn issuer() -> MockSessionIssuer {
        let mut issuer = MockSessionIssuer::new();
        issuer.expect_issue().returning(|id| {
            let expires_at = Utc
                .with_ymd_and_hms(2030, 1, 1, 0, 30, 0)
                .single()
                .expect("timestamp");
            Ok(SessionToken::new(format!("token-for-{id}"), expires_at))
        });
        issuer
    }

    fn service_knowing(user: Option<User>, sessions: MockSessionIssuer) -> Service {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_name()
            .returning(move |name| Ok(user.clone().filter(|u| u.name() == name)));
        CredentialLoginService::new(Arc::new(repo), Arc::new(hasher()), Arc::new(sessions))
    }

    fn credentials(username: &str, password: &str) -> LoginCredentials {
        LoginCredentials::try_from_parts(username, password).expect("credentials shape")
    }

    #[rstest]
    #[tokio::test]
    async fn correct_password_issues_token(alice: User) {
        let id = *alice.id();
        let service = service_knowing(Some(alice), issuer());
        let token = service
            .login(&credentials("alice", "correct"))
            .await
            .expect("login succeeds");
        assert_eq!(token.token(), format!("token-for-{id}"));
    }

    #[rstest]
    #[tokio::test]
    async fn wrong_password_and_unknown_user_are_indistinguishable(alice: User) {
        let service = service_knowing(Some(alice), MockSessionIssuer::new());
        let wrong = service
            .login(&credentials("alice", "wrong"))
            .await
            .expect_err("wrong password");
        let unknown = service
            .login(&credentials("nonexistent", "x"))
            .await
            .expect_err("unknown user");
        assert_eq!(wrong, unknown);
        assert_eq!(wrong, Error::incorrect_login_details());
        assert_eq!(wrong.code(), ErrorCode::Validation);
    }

    #[rstest]
    #[case::unknown_name("nobody".to_owned())]
    #[case::unregistrable_name("x".repeat(200))]
    #[tokio::test]
    async fn unknown_user_still_pays_one_verification(#[case] username: String) {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_name().returning(|_| Ok(None));
        let mut hasher = MockCredentialHasher::new();
        hasher
            .expect_hash()
            .times(1)
            .returning(|_| Ok(PasswordHash::new("hash:decoy")));
        hasher
            .expect_verify()
            .withf(|_, stored| stored.as_str() == "hash:decoy")
            .times(2)
            .returning(|_, _| Ok(false));
        let service = CredentialLoginService::new(
            Arc::new(repo),
            Arc::new(hasher),
            Arc::new(MockSessionIssuer::new()),
        );

        for _ in 0..2 {
            let err = service
                .login(&credentials(&username, "guess"))
                .await
                .expect_err("no such user");
            assert_eq!(err, Error::incorrect_login_details());
        }
    }

    #[rstest]
    #[tokio::test]
    async fn overlong_username_is_incorrect_login() {
        let service = service_knowing(None, MockSessionIssuer::new());
        let err = service
            .login(&credentials(&"a".repeat(200), "pw"))
            .await
            .expect_err("cannot exist");
        assert_eq!(err, Error::incorrect_login_details());
    }

    #[rstest]
    #[tokio::test]
    async fn issuer_failure_is_internal(alice: User) {
        let mut sessions = MockSessionIssuer::new();
        sessions
            .expect_issue()
            .returning(|_| Err(SessionIssuerError::signing("no key")));
        let service = service_knowing(Some(alice), sessions);
        let err = service
            .login(&credentials("alice", "correct"))
            .await
            .expect_err("signing failed");
        assert_eq!(err.code(), ErrorCode::Internal);
    }
}
