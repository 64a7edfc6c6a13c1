use diesel::prelude::*;
use std::sync::Arc;

use crate::db::{get_connection, DbPool};
use crate::schema::assets;

use super::assets_errors::{AssetError, Result};
use super::assets_model::{Asset, AssetDB, NewAsset};
use super::assets_traits::AssetRepositoryTrait;

/// Repository for managing asset records in the database
pub struct AssetRepository {
    pool: Arc<DbPool>,
}

impl AssetRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }

    fn conn(&self) -> Result<crate::db::DbConnection> {
        get_connection(&self.pool).map_err(|e| AssetError::DatabaseError(e.to_string()))
    }
}

impl AssetRepositoryTrait for AssetRepository {
    fn create(&self, new_asset: NewAsset) -> Result<Asset> {
        new_asset.validate()?;
        let asset_db: AssetDB = new_asset.into();

        let mut conn = self.conn()?;

        let result = diesel::insert_into(assets::table)
            .values(&asset_db)
            .get_result::<AssetDB>(&mut conn)?;

        Ok(result.into())
    }

    fn get_by_id(&self, asset_id: &str) -> Result<Asset> {
        let mut conn = self.conn()?;

        let result = assets::table.find(asset_id).first::<AssetDB>(&mut conn)?;

        Ok(result.into())
    }

    fn get_by_name(&self, name: &str) -> Result<Asset> {
        let mut conn = self.conn()?;

        let result = assets::table
            .filter(assets::name.eq(name))
            .first::<AssetDB>(&mut conn)?;

        Ok(result.into())
    }

    fn get_or_create(&self, name: &str) -> Result<Asset> {
        match self.get_by_name(name) {
            Ok(asset) => Ok(asset),
            Err(AssetError::NotFound(_)) => self.create(NewAsset {
                name: name.to_string(),
            }),
            Err(e) => Err(e),
        }
    }

    fn list(&self) -> Result<Vec<Asset>> {
        let mut conn = self.conn()?;

        let results = assets::table
            .order(assets::name.asc())
            .load::<AssetDB>(&mut conn)?;

        Ok(results.into_iter().map(Asset::from).collect())
    }
}
