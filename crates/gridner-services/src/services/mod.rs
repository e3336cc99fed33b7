pub mod extraction;
pub mod providers;
pub mod registry;
pub mod transport;
