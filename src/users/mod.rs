pub mod error;
pub mod repo;
pub mod repo_types;

pub use error::RepoError;
pub use repo_types::{NewUser, User, UserChanges};
