pub mod catalog_service;
pub mod mongo_store;
pub mod sheet_sync_service;
pub mod sheets;
pub mod store;
pub mod suggestion_service;
pub mod vote_service;

#[cfg(test)]
pub mod memory_sheet;
#[cfg(test)]
pub mod memory_store;
