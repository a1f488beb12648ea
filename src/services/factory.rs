use std::sync::Arc;

use crate::{
    client::ApiClient,
    models::{Mill, Shade},
    services::{
        inventory::InventoryService, master_data::MasterDataService, masters::NamedMasterService,
        paper_master::PaperMasterService, purchases::PurchaseService, reels::ReelService,
    },
};

/// Factory for creating service instances over one shared API client
#[derive(Clone)]
pub struct ServiceFactory {
    client: Arc<ApiClient>,
}

impl ServiceFactory {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    pub fn mills(&self) -> NamedMasterService<Mill> {
        NamedMasterService::new(self.client.clone())
    }

    pub fn shades(&self) -> NamedMasterService<Shade> {
        NamedMasterService::new(self.client.clone())
    }

    pub fn paper_master(&self) -> PaperMasterService {
        PaperMasterService::new(self.client.clone())
    }

    pub fn purchases(&self) -> PurchaseService {
        PurchaseService::new(self.client.clone())
    }

    pub fn master_data(&self) -> MasterDataService {
        MasterDataService::new(self.client.clone())
    }

    pub fn reels(&self) -> ReelService {
        ReelService::new(self.client.clone())
    }

    pub fn inventory(&self) -> InventoryService {
        InventoryService::new(self.client.clone())
    }

    /// Gets a reference to the shared client
    pub fn client(&self) -> &Arc<ApiClient> {
        &self.client
    }
}
