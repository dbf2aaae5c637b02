use anyhow::{Context, Result};

use crate::config::Config;
use crate::services::{
    api::ApiClient, auth::AuthApi, bookings::BookingsApi, catalog::CatalogApi, messages::ConversationPoll,
    messages::MessagesApi, notifications::NotificationStore, reviews::ReviewsApi, storage::open_store,
    storage::SharedStore, users::UsersApi,
};
use crate::session::Session;

/// Everything a screen needs, wired against one storage and one session.
#[derive(Clone)]
pub struct ServeHub {
    pub config: Config,
    pub session: Session,
    pub auth: AuthApi,
    pub catalog: CatalogApi,
    pub bookings: BookingsApi,
    pub messages: MessagesApi,
    pub reviews: ReviewsApi,
    pub users: UsersApi,
    pub notifications: NotificationStore,
}

impl ServeHub {
    pub async fn connect(config: Config) -> Result<Self> {
        let store = open_store(&config.storage_url)
            .with_context(|| format!("Failed to open storage at {}", config.storage_url))?;
        Ok(Self::with_store(config, store).await)
    }

    pub async fn with_store(config: Config, store: SharedStore) -> Self {
        let session = Session::load(store.clone()).await;
        let api = ApiClient::new(&config.api, session.clone());

        Self {
            auth: AuthApi::new(api.clone()),
            catalog: CatalogApi::new(api.clone()),
            bookings: BookingsApi::new(api.clone()),
            messages: MessagesApi::new(api.clone()),
            reviews: ReviewsApi::new(api.clone()),
            users: UsersApi::new(api),
            notifications: NotificationStore::new(store),
            session,
            config,
        }
    }

    /// Polls a chat at the configured interval.
    pub fn open_chat(&self, user_id: &str) -> ConversationPoll {
        self.messages.poll(user_id, self.config.app.message_poll_interval())
    }
}
