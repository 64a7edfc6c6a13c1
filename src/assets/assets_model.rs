use chrono::{NaiveDateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use super::assets_errors::{AssetError, Result};

/// Domain model for an asset. Identity is the unique name.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub id: String,
    pub name: String,
    pub created_at: NaiveDateTime,
}

/// Database model for assets
#[derive(Queryable, Selectable, Identifiable, Insertable, AsChangeset, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::assets)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct AssetDB {
    pub id: String,
    pub name: String,
    pub created_at: NaiveDateTime,
}

impl From<AssetDB> for Asset {
    fn from(db: AssetDB) -> Self {
        Asset {
            id: db.id,
            name: db.name,
            created_at: db.created_at,
        }
    }
}

/// Input model for creating a new asset
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAsset {
    pub name: String,
}

impl NewAsset {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(AssetError::InvalidData(
                "Asset name cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

impl From<NewAsset> for AssetDB {
    fn from(new: NewAsset) -> Self {
        AssetDB {
            id: uuid::Uuid::new_v4().to_string(),
            name: new.name,
            created_at: Utc::now().naive_utc(),
        }
    }
}
