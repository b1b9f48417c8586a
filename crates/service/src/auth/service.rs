use std::sync::Arc;

use argon2::{
    password_hash::{PasswordHasher, PasswordVerifier, SaltString},
    Argon2, PasswordHash,
};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header as JwtHeader, Validation};
use rand::rngs::OsRng;
use tracing::{debug, info, instrument};

use super::domain::{AuthSession, AuthUser, Claims, LoginInput, SignupInput};
use super::errors::AuthError;
use super::repository::AuthRepository;

/// Auth service configuration
#[derive(Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub password_algorithm: String,
    /// Token lifetime in hours
    pub token_ttl_hours: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self { jwt_secret: "dev-secret-change-me".into(), password_algorithm: "argon2".into(), token_ttl_hours: 24 }
    }
}

/// Auth business service independent of web framework
pub struct AuthService<R: AuthRepository> {
    repo: Arc<R>,
    cfg: AuthConfig,
}

impl<R: AuthRepository> AuthService<R> {
    pub fn new(repo: Arc<R>, cfg: AuthConfig) -> Self { Self { repo, cfg } }

    /// Register a new adopter with a hashed password and their address.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{service::{AuthService, AuthConfig}, repository::mock::MockAuthRepository};
    /// use service::auth::domain::{SignupInput, AddressInput};
    /// use std::sync::Arc;
    /// let repo = Arc::new(MockAuthRepository::default());
    /// let svc = AuthService::new(repo, AuthConfig::default());
    /// let input = SignupInput {
    ///     first_name: "Ana".into(), last_name: "Pop".into(),
    ///     email: "ana@example.com".into(), password: "Secret123".into(), phone: "0700".into(),
    ///     address: AddressInput { street: "Main St 1".into(), city: "Cluj".into(), state: "CJ".into(), zip_code: "400000".into(), country: "RO".into() },
    /// };
    /// let user = tokio_test::block_on(svc.signup(input)).unwrap();
    /// assert_eq!(user.email, "ana@example.com");
    /// ```
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn signup(&self, input: SignupInput) -> Result<AuthUser, AuthError> {
        if input.password.len() < 8 {
            return Err(AuthError::Validation("password too short (>=8)".into()));
        }
        if let Some(existing) = self.repo.find_user_by_email(&input.email).await? {
            debug!("user exists: {}", existing.email);
            return Err(AuthError::Conflict);
        }

        let user = self
            .repo
            .create_user(&input.first_name, &input.last_name, &input.email, &input.phone)
            .await?;
        self.repo.create_address(user.id, &input.address).await?;

        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(input.password.as_bytes(), &salt)
            .map_err(|e| AuthError::HashError(e.to_string()))?
            .to_string();
        let _cred = self
            .repo
            .upsert_password(user.id, hash, self.cfg.password_algorithm.clone())
            .await?;

        info!(user_id = %user.id, email = %user.email, "user_registered");
        Ok(user)
    }

    /// Authenticate an adopter and issue a bearer token.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{service::{AuthService, AuthConfig}, repository::mock::MockAuthRepository};
    /// use service::auth::domain::{SignupInput, AddressInput, LoginInput};
    /// use std::sync::Arc;
    /// let repo = Arc::new(MockAuthRepository::default());
    /// let svc = AuthService::new(repo.clone(), AuthConfig::default());
    /// let address = AddressInput { street: "S".into(), city: "C".into(), state: "ST".into(), zip_code: "Z".into(), country: "RO".into() };
    /// let _ = tokio_test::block_on(svc.signup(SignupInput { first_name: "N".into(), last_name: "P".into(), email: "u@e.com".into(), password: "Passw0rd".into(), phone: "07".into(), address }));
    /// let session = tokio_test::block_on(svc.login(LoginInput { email: "u@e.com".into(), password: "Passw0rd".into() })).unwrap();
    /// assert_eq!(session.user.email, "u@e.com");
    /// assert!(!session.token.is_empty());
    /// ```
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn login(&self, input: LoginInput) -> Result<AuthSession, AuthError> {
        let user = self
            .repo
            .find_user_by_email(&input.email)
            .await?
            .ok_or(AuthError::NotFound)?;

        let cred = self
            .repo
            .get_credentials(user.id)
            .await?
            .ok_or(AuthError::Unauthorized)?;

        verify_password(&input.password, &cred.password_hash)?;

        let token = self.issue_token(&user)?;
        Ok(AuthSession { user, token })
    }

    /// Authenticate an admin; the resulting token carries the admin flag.
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn admin_login(&self, input: LoginInput) -> Result<AuthSession, AuthError> {
        let (admin, password_hash) = self
            .repo
            .find_admin_by_email(&input.email)
            .await?
            .ok_or(AuthError::Unauthorized)?;

        verify_password(&input.password, &password_hash)?;

        let token = self.issue_token(&admin)?;
        info!(admin_id = %admin.id, "admin_login");
        Ok(AuthSession { user: admin, token })
    }

    pub fn issue_token(&self, user: &AuthUser) -> Result<String, AuthError> {
        let exp = (chrono::Utc::now() + chrono::Duration::hours(self.cfg.token_ttl_hours)).timestamp() as usize;
        let claims = Claims {
            sub: user.email.clone(),
            uid: user.id,
            name: format!("{} {}", user.first_name, user.last_name).trim().to_string(),
            admin: user.admin,
            exp,
        };
        encode(
            &JwtHeader::default(),
            &claims,
            &EncodingKey::from_secret(self.cfg.jwt_secret.as_bytes()),
        )
        .map_err(|e| AuthError::TokenError(e.to_string()))
    }
}

fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed = PasswordHash::new(hash).map_err(|e| AuthError::HashError(e.to_string()))?;
    if Argon2::default().verify_password(password.as_bytes(), &parsed).is_err() {
        return Err(AuthError::Unauthorized);
    }
    Ok(())
}

/// Decode and validate a bearer token; expiry is always enforced.
pub fn verify_token(token: &str, secret: &str) -> Result<Claims, AuthError> {
    let key = DecodingKey::from_secret(secret.as_bytes());
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    decode::<Claims>(token, &key, &validation)
        .map(|data| data.claims)
        .map_err(|e| AuthError::TokenError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::domain::{AddressInput, LoginInput, SignupInput};
    use crate::auth::repository::mock::MockAuthRepository;

    fn signup_input(email: &str) -> SignupInput {
        SignupInput {
            first_name: "Test".into(),
            last_name: "User".into(),
            email: email.into(),
            password: "Passw0rd!".into(),
            phone: "0700".into(),
            address: AddressInput {
                street: "Main St 1".into(),
                city: "Cluj".into(),
                state: "CJ".into(),
                zip_code: "400000".into(),
                country: "RO".into(),
            },
        }
    }

    #[tokio::test]
    async fn signup_rejects_short_password() {
        let svc = AuthService::new(Arc::new(MockAuthRepository::default()), AuthConfig::default());
        let mut input = signup_input("short@example.com");
        input.password = "short".into();
        assert!(matches!(svc.signup(input).await, Err(AuthError::Validation(_))));
    }

    #[tokio::test]
    async fn signup_rejects_duplicate_email() {
        let svc = AuthService::new(Arc::new(MockAuthRepository::default()), AuthConfig::default());
        svc.signup(signup_input("dup@example.com")).await.unwrap();
        assert!(matches!(svc.signup(signup_input("dup@example.com")).await, Err(AuthError::Conflict)));
    }

    #[tokio::test]
    async fn login_unknown_user_is_not_found() {
        let svc = AuthService::new(Arc::new(MockAuthRepository::default()), AuthConfig::default());
        let res = svc.login(LoginInput { email: "ghost@example.com".into(), password: "whatever1".into() }).await;
        assert!(matches!(res, Err(AuthError::NotFound)));
    }

    #[tokio::test]
    async fn login_wrong_password_is_unauthorized() {
        let svc = AuthService::new(Arc::new(MockAuthRepository::default()), AuthConfig::default());
        svc.signup(signup_input("wrongpw@example.com")).await.unwrap();
        let res = svc.login(LoginInput { email: "wrongpw@example.com".into(), password: "incorrect".into() }).await;
        assert!(matches!(res, Err(AuthError::Unauthorized)));
    }

    #[tokio::test]
    async fn token_round_trip_carries_claims() {
        let cfg = AuthConfig::default();
        let secret = cfg.jwt_secret.clone();
        let svc = AuthService::new(Arc::new(MockAuthRepository::default()), cfg);
        let user = svc.signup(signup_input("claims@example.com")).await.unwrap();
        let session = svc.login(LoginInput { email: "claims@example.com".into(), password: "Passw0rd!".into() }).await.unwrap();

        let claims = verify_token(&session.token, &secret).unwrap();
        assert_eq!(claims.uid, user.id);
        assert_eq!(claims.sub, "claims@example.com");
        assert!(!claims.admin);
    }

    #[tokio::test]
    async fn expired_token_is_rejected_even_if_well_formed() {
        let cfg = AuthConfig { token_ttl_hours: -1, ..AuthConfig::default() };
        let secret = cfg.jwt_secret.clone();
        let svc = AuthService::new(Arc::new(MockAuthRepository::default()), cfg);
        let user = svc.signup(signup_input("expired@example.com")).await.unwrap();
        let token = svc.issue_token(&user).unwrap();
        assert!(matches!(verify_token(&token, &secret), Err(AuthError::TokenError(_))));
    }

    #[tokio::test]
    async fn tampered_secret_is_rejected() {
        let svc = AuthService::new(Arc::new(MockAuthRepository::default()), AuthConfig::default());
        let user = svc.signup(signup_input("tamper@example.com")).await.unwrap();
        let token = svc.issue_token(&user).unwrap();
        assert!(verify_token(&token, "some-other-secret").is_err());
    }

    #[tokio::test]
    async fn admin_login_sets_admin_claim() {
        let salt = SaltString::generate(&mut rand::rngs::OsRng);
        let hash = argon2::Argon2::default().hash_password(b"AdminPass1", &salt).unwrap().to_string();

        let repo = MockAuthRepository::default().with_admin("root@example.com", &hash);
        let cfg = AuthConfig::default();
        let secret = cfg.jwt_secret.clone();
        let svc = AuthService::new(Arc::new(repo), cfg);

        let session = svc.admin_login(LoginInput { email: "root@example.com".into(), password: "AdminPass1".into() }).await.unwrap();
        let claims = verify_token(&session.token, &secret).unwrap();
        assert!(claims.admin);
    }
}
