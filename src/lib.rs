pub mod enhancement;
pub mod logger;
