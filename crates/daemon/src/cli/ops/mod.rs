pub mod daemon;
pub mod follow;
pub mod health;
pub mod init;
pub mod metadata;
pub mod sharing;
pub mod storage;
pub mod user;
pub mod version;

pub use daemon::Daemon;
pub use follow::Follow;
pub use health::Health;
pub use init::Init;
pub use metadata::Metadata;
pub use sharing::Sharing;
pub use storage::Storage;
pub use user::User;
pub use version::Version;
