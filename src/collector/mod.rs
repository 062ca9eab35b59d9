pub mod classifier;
pub mod collector;
pub mod event;
pub mod identity;
