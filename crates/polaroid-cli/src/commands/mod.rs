pub mod defaults;
pub mod export;
