pub mod arena;
pub mod combat;
