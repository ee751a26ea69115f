pub mod slot;
pub mod tick;
