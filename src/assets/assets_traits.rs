use super::assets_errors::Result;
use super::assets_model::{Asset, NewAsset};

/// Trait defining the contract for Asset repository operations.
pub trait AssetRepositoryTrait: Send + Sync {
    fn create(&self, new_asset: NewAsset) -> Result<Asset>;
    fn get_by_id(&self, asset_id: &str) -> Result<Asset>;
    fn get_by_name(&self, name: &str) -> Result<Asset>;
    fn get_or_create(&self, name: &str) -> Result<Asset>;
    fn list(&self) -> Result<Vec<Asset>>;
}
