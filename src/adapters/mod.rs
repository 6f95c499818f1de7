// Adapters layer: concrete implementations of the domain ports (http services, storage).

pub mod gbif;
pub mod plantnet;
pub mod storage;

pub use gbif::GbifClient;
pub use plantnet::PlantNetClient;
pub use storage::LocalStorage;
