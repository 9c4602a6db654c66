pub mod profile;
pub mod role;
pub mod user;

pub use profile::SqliteProfileReader;
pub use role::SqliteRoleRepository;
pub use user::SqliteUserRepository;
