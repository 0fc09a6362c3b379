pub mod store;
pub mod zone;

pub use store::StoreConfig;
pub use zone::ZoneSetting;
