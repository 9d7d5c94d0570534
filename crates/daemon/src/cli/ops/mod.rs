pub mod daemon;
pub mod health;
pub mod init;
pub mod user;
pub mod version;
pub mod wiki;

pub use daemon::Daemon;
pub use health::Health;
pub use init::Init;
pub use user::User;
pub use version::Version;
pub use wiki::Wiki;
