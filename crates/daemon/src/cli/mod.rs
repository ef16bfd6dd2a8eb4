pub mod args;
pub mod op;
pub mod ops;

pub use ops::{Daemon, Follow, Health, Init, Metadata, Sharing, Storage, User, Version};
