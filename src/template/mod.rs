pub mod fallback;
pub mod provider;
