use anyhow::Result;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::models::user::SessionUser;
use crate::services::storage::{get_json, set_json, SharedStore, TOKEN_KEY, USER_KEY};

#[derive(Debug, Clone)]
struct AuthState {
    token: String,
    user: SessionUser,
}

/// Signed-in state shared by every API group; clones share the same state.
#[derive(Clone)]
pub struct Session {
    store: SharedStore,
    state: Arc<RwLock<Option<AuthState>>>,
}

impl Session {
    pub fn signed_out(store: SharedStore) -> Self {
        Self {
            store,
            state: Arc::new(RwLock::new(None)),
        }
    }

    /// Restores the token and user saved by a previous run.
    pub async fn load(store: SharedStore) -> Self {
        let session = Self::signed_out(store);
        match session.read_persisted() {
            Ok(Some(state)) => {
                log::info!("Restored session for user {}", state.user.id);
                *session.state.write().await = Some(state);
            }
            Ok(None) => log::debug!("No stored session"),
            Err(e) => log::error!("Error loading user data: {:#}", e),
        }
        session
    }

    fn read_persisted(&self) -> Result<Option<AuthState>> {
        let token = self.store.get(TOKEN_KEY)?;
        let user: Option<SessionUser> = get_json(self.store.as_ref(), USER_KEY)?;
        Ok(match (token, user) {
            (Some(token), Some(user)) => Some(AuthState { token, user }),
            _ => None,
        })
    }

    pub async fn establish(&self, token: String, user: SessionUser) -> Result<()> {
        self.store.set(TOKEN_KEY, &token)?;
        set_json(self.store.as_ref(), USER_KEY, &user)?;

        let mut guard = self.state.write().await;
        *guard = Some(AuthState { token, user });
        Ok(())
    }

    /// Applies `update` to the signed-in user and persists the result.
    /// Returns `None` when nobody is signed in.
    pub async fn update_user<F>(&self, update: F) -> Result<Option<SessionUser>>
    where
        F: FnOnce(&mut SessionUser),
    {
        let mut guard = self.state.write().await;
        let Some(state) = guard.as_mut() else {
            return Ok(None);
        };

        let mut user = state.user.clone();
        update(&mut user);
        set_json(self.store.as_ref(), USER_KEY, &user)?;
        state.user = user.clone();
        Ok(Some(user))
    }

    pub async fn clear(&self) -> Result<()> {
        {
            let mut guard = self.state.write().await;
            *guard = None;
        }
        self.store.remove(TOKEN_KEY)?;
        self.store.remove(USER_KEY)?;
        log::info!("Session cleared");
        Ok(())
    }

    pub async fn token(&self) -> Option<String> {
        self.state.read().await.as_ref().map(|s| s.token.clone())
    }

    pub async fn user(&self) -> Option<SessionUser> {
        self.state.read().await.as_ref().map(|s| s.user.clone())
    }

    pub async fn is_authenticated(&self) -> bool {
        self.state.read().await.is_some()
    }

    pub fn store(&self) -> &SharedStore {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::UserRole;
    use crate::services::storage::{KeyValueStore, MemoryStore};

    fn sample_user() -> SessionUser {
        SessionUser {
            id: "u1".to_string(),
            name: "Jane Doe".to_string(),
            email: "jane@example.com".to_string(),
            role: UserRole::Provider,
            profile_pic: None,
            phone: None,
            bio: None,
        }
    }

    #[tokio::test]
    async fn test_establish_then_load_restores_user() {
        let store: SharedStore = Arc::new(MemoryStore::default());
        let session = Session::signed_out(store.clone());
        session.establish("tok-1".to_string(), sample_user()).await.unwrap();

        let restored = Session::load(store).await;
        assert!(restored.is_authenticated().await);
        assert_eq!(restored.token().await.as_deref(), Some("tok-1"));
        assert_eq!(restored.user().await, Some(sample_user()));
    }

    #[tokio::test]
    async fn test_clear_signs_out_everywhere() {
        let store: SharedStore = Arc::new(MemoryStore::default());
        let session = Session::signed_out(store.clone());
        session.establish("tok-1".to_string(), sample_user()).await.unwrap();
        let other_handle = session.clone();

        session.clear().await.unwrap();
        assert!(!other_handle.is_authenticated().await);
        assert!(!Session::load(store).await.is_authenticated().await);
    }

    #[tokio::test]
    async fn test_token_without_user_is_signed_out() {
        let store: SharedStore = Arc::new(MemoryStore::default());
        store.set(TOKEN_KEY, "orphan").unwrap();
        assert!(!Session::load(store).await.is_authenticated().await);
    }

    #[tokio::test]
    async fn test_corrupt_user_record_is_signed_out() {
        let store: SharedStore = Arc::new(MemoryStore::default());
        store.set(TOKEN_KEY, "tok").unwrap();
        store.set(USER_KEY, "{oops").unwrap();
        assert!(!Session::load(store).await.is_authenticated().await);
    }

    #[tokio::test]
    async fn test_update_user_persists() {
        let store: SharedStore = Arc::new(MemoryStore::default());
        let session = Session::signed_out(store.clone());
        assert_eq!(session.update_user(|u| u.name = "x".to_string()).await.unwrap(), None);

        session.establish("tok".to_string(), sample_user()).await.unwrap();
        session
            .update_user(|u| u.profile_pic = Some("https://cdn.example.com/me.png".to_string()))
            .await
            .unwrap();

        let restored = Session::load(store).await;
        let user = restored.user().await.unwrap();
        assert_eq!(user.profile_pic.as_deref(), Some("https://cdn.example.com/me.png"));
    }
}
