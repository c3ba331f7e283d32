use super::package::{PackageDefinition, PackageType};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Which session balance a booking draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum SessionPool {
    Individual,
    Group,
}

/// One purchase of a package definition: a ledger of remaining/used
/// sessions per pool. Invariant outside a transaction:
/// `remaining + used == total` for each pool, and neither is negative.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct UserPackage {
    pub id: String,
    pub client_id: String,
    pub package_definition_id: String,
    pub sessions_total: i32,
    pub sessions_remaining: i32,
    pub sessions_used: i32,
    pub group_sessions_total: i32,
    pub group_sessions_remaining: i32,
    pub group_sessions_used: i32,
    pub is_active: bool,
    pub expires_at: Option<DateTime<Utc>>,
    pub purchased_at: DateTime<Utc>,
}

impl UserPackage {
    /// Sizes the pools from the definition: individual packages fill the
    /// individual pool, group packages the group pool, mixed both.
    pub fn purchase(
        client_id: String,
        definition: &PackageDefinition,
        expires_at: Option<DateTime<Utc>>,
    ) -> Self {
        let (individual, group) = match definition.package_type {
            PackageType::Individual => (definition.sessions_count, 0),
            PackageType::Group => (0, definition.sessions_count),
            PackageType::Mixed => (definition.sessions_count, definition.sessions_count),
        };

        Self {
            id: Uuid::new_v4().to_string(),
            client_id,
            package_definition_id: definition.id.clone(),
            sessions_total: individual,
            sessions_remaining: individual,
            sessions_used: 0,
            group_sessions_total: group,
            group_sessions_remaining: group,
            group_sessions_used: 0,
            is_active: true,
            expires_at,
            purchased_at: Utc::now(),
        }
    }

    pub fn remaining(&self, pool: SessionPool) -> i32 {
        match pool {
            SessionPool::Individual => self.sessions_remaining,
            SessionPool::Group => self.group_sessions_remaining,
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|exp| exp <= now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::package::NewPackageParams;

    fn definition(package_type: PackageType, max_group_size: Option<i32>) -> PackageDefinition {
        PackageDefinition::new(NewPackageParams {
            name: "Bundle".to_string(),
            description: None,
            sessions_count: 8,
            session_duration_id: "d1".to_string(),
            package_type,
            max_group_size,
        })
    }

    #[test]
    fn purchase_sizes_pools_by_package_type() {
        let individual = UserPackage::purchase("c1".into(), &definition(PackageType::Individual, None), None);
        assert_eq!((individual.sessions_remaining, individual.group_sessions_remaining), (8, 0));

        let group = UserPackage::purchase("c1".into(), &definition(PackageType::Group, Some(4)), None);
        assert_eq!((group.sessions_remaining, group.group_sessions_remaining), (0, 8));

        let mixed = UserPackage::purchase("c1".into(), &definition(PackageType::Mixed, Some(4)), None);
        assert_eq!((mixed.sessions_remaining, mixed.group_sessions_remaining), (8, 8));
    }
}
