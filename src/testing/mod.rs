use std::sync::Arc;

use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::app::AppState;
use crate::database::models::{NewUser, User};
use crate::database::{MemoryStore, Store};

/// Value for an `Authorization` header carrying Basic credentials.
pub fn basic_auth(email: &str, password: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{}:{}", email, password)))
}

/// In-memory store plus helpers for seeding it.
pub struct TestContext {
    store: Arc<MemoryStore>,
}

impl TestContext {
    pub async fn new() -> Self {
        Self {
            store: Arc::new(MemoryStore::new()),
        }
    }

    pub fn store(&self) -> &dyn Store {
        self.store.as_ref()
    }

    pub fn state(&self) -> AppState {
        AppState::new(self.store.clone())
    }

    pub async fn create_user(&self, first_name: &str, email: &str, password: &str) -> User {
        self.store
            .create_user(NewUser {
                first_name: Some(first_name.to_string()),
                last_name: Some("Tester".to_string()),
                email_address: Some(email.to_string()),
                password: Some(password.to_string()),
            })
            .await
            .expect("seed user")
    }
}
