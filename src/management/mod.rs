mod credentials;
mod inventory;

pub use credentials::CredentialError;
pub use credentials::CredentialStore;
pub use inventory::InventoryError;
pub use inventory::LocalInventory;
