// src/export/users.rs
//! Display names of users, looked up once per run.

use crate::api::NotionGateway;
use crate::constants::UNKNOWN_USER;
use crate::error_recovery::RetryPolicy;
use crate::model::UserRef;
use dashmap::DashMap;

#[derive(Debug, Default)]
pub struct UserNames {
    names: DashMap<String, String>,
}

impl UserNames {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves a user reference to a display name.
    ///
    /// Names embedded in the reference are used directly. Otherwise the user
    /// is fetched with retries; a lookup that still fails yields `Unknown`
    /// instead of failing the page.
    pub async fn name_of(
        &self,
        gateway: &dyn NotionGateway,
        retry: &RetryPolicy,
        user: &UserRef,
    ) -> String {
        if let Some(name) = &user.name {
            return name.clone();
        }
        if user.id.is_empty() {
            return UNKNOWN_USER.to_string();
        }
        if let Some(cached) = self.names.get(&user.id) {
            return cached.value().clone();
        }

        let label = format!("retrieve user {}", user.id);
        let name = match retry
            .execute(&label, || gateway.retrieve_user(&user.id))
            .await
        {
            Ok(found) => found.name.unwrap_or_else(|| UNKNOWN_USER.to_string()),
            Err(e) => {
                log::warn!("Could not resolve user {}: {}", user.id, e);
                UNKNOWN_USER.to_string()
            }
        };

        self.names.insert(user.id.clone(), name.clone());
        name
    }
}
