use anyhow::Result;
use async_trait::async_trait;
use tracing::debug;

use super::client::ApiClient;
use super::types::PublicSystemInfo;
use crate::domain::{Item, ItemId, Session, User};
use crate::repository::UserSource;
use crate::startup::ItemLookup;

impl ApiClient {
    pub async fn public_system_info(&self, server_address: &str) -> Result<PublicSystemInfo> {
        let info: PublicSystemInfo = self
            .get_json(server_address, "System/Info/Public", None)
            .await?;
        debug!(
            "Server {} ({}) version {}",
            info.server_name.as_deref().unwrap_or("unnamed"),
            info.id,
            info.version.as_deref().unwrap_or("unknown")
        );
        Ok(info)
    }

    pub async fn fetch_current_user(&self, session: &Session) -> Result<User> {
        self.get_json(
            &session.server_address,
            "Users/Me",
            Some(&session.access_token),
        )
        .await
    }

    pub async fn item(&self, session: &Session, id: ItemId) -> Result<Item> {
        self.get_json(
            &session.server_address,
            &format!("Items/{}", id),
            Some(&session.access_token),
        )
        .await
    }
}

#[async_trait]
impl ItemLookup for ApiClient {
    async fn get_item(&self, session: &Session, id: ItemId) -> Result<Item> {
        self.item(session, id).await
    }
}

#[async_trait]
impl UserSource for ApiClient {
    async fn current_user(&self, session: &Session) -> Result<User> {
        self.fetch_current_user(session).await
    }
}
