use async_trait::async_trait;
use uuid::Uuid;

use super::domain::{AddressInput, AuthUser, Credentials};
use super::errors::AuthError;

/// Repository abstraction for auth-related persistence.
#[async_trait]
pub trait AuthRepository: Send + Sync {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<AuthUser>, AuthError>;
    async fn create_user(
        &self,
        first_name: &str,
        last_name: &str,
        email: &str,
        phone: &str,
    ) -> Result<AuthUser, AuthError>;
    async fn create_address(&self, user_id: Uuid, address: &AddressInput) -> Result<(), AuthError>;

    async fn get_credentials(&self, user_id: Uuid) -> Result<Option<Credentials>, AuthError>;
    async fn upsert_password(
        &self,
        user_id: Uuid,
        password_hash: String,
        password_algorithm: String,
    ) -> Result<Credentials, AuthError>;

    /// Admins live in their own table; the hash comes back with the identity.
    async fn find_admin_by_email(&self, email: &str) -> Result<Option<(AuthUser, String)>, AuthError>;
}

/// Simple in-memory mock repository for tests and doc examples
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MockAuthRepository {
        users: Mutex<HashMap<String, AuthUser>>,        // key: email
        creds: Mutex<HashMap<Uuid, Credentials>>,       // key: user_id
        addresses: Mutex<HashMap<Uuid, AddressInput>>,  // key: user_id
        admins: Mutex<HashMap<String, (AuthUser, String)>>, // key: email
    }

    impl MockAuthRepository {
        pub fn with_admin(self, email: &str, password_hash: &str) -> Self {
            let admin = AuthUser {
                id: Uuid::new_v4(),
                email: email.to_string(),
                first_name: "Admin".into(),
                last_name: "User".into(),
                phone: String::new(),
                admin: true,
            };
            self.admins
                .lock()
                .unwrap()
                .insert(email.to_string(), (admin, password_hash.to_string()));
            self
        }
    }

    #[async_trait]
    impl AuthRepository for MockAuthRepository {
        async fn find_user_by_email(&self, email: &str) -> Result<Option<AuthUser>, AuthError> {
            let users = self.users.lock().unwrap();
            Ok(users.get(email).cloned())
        }

        async fn create_user(
            &self,
            first_name: &str,
            last_name: &str,
            email: &str,
            phone: &str,
        ) -> Result<AuthUser, AuthError> {
            let mut users = self.users.lock().unwrap();
            if users.contains_key(email) {
                return Err(AuthError::Conflict);
            }
            let user = AuthUser {
                id: Uuid::new_v4(),
                email: email.to_string(),
                first_name: first_name.to_string(),
                last_name: last_name.to_string(),
                phone: phone.to_string(),
                admin: false,
            };
            users.insert(email.to_string(), user.clone());
            Ok(user)
        }

        async fn create_address(&self, user_id: Uuid, address: &AddressInput) -> Result<(), AuthError> {
            self.addresses.lock().unwrap().insert(user_id, address.clone());
            Ok(())
        }

        async fn get_credentials(&self, user_id: Uuid) -> Result<Option<Credentials>, AuthError> {
            let creds = self.creds.lock().unwrap();
            Ok(creds.get(&user_id).cloned())
        }

        async fn upsert_password(
            &self,
            user_id: Uuid,
            password_hash: String,
            password_algorithm: String,
        ) -> Result<Credentials, AuthError> {
            let mut creds = self.creds.lock().unwrap();
            let c = Credentials { user_id, password_hash, password_algorithm };
            creds.insert(user_id, c.clone());
            Ok(c)
        }

        async fn find_admin_by_email(&self, email: &str) -> Result<Option<(AuthUser, String)>, AuthError> {
            let admins = self.admins.lock().unwrap();
            Ok(admins.get(email).cloned())
        }
    }
}
