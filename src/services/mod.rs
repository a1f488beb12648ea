// Reference data
pub mod master_data;
pub mod masters;
pub mod paper_master;

// Stock movements
pub mod inventory;
pub mod purchases;
pub mod reels;

// Service factory for dependency injection
pub mod factory;

pub use factory::ServiceFactory;
pub use inventory::InventoryService;
pub use master_data::MasterDataService;
pub use masters::NamedMasterService;
pub use paper_master::PaperMasterService;
pub use purchases::PurchaseService;
pub use reels::ReelService;
