//! In-process repositories backed by `tokio::sync::RwLock`.
//!
//! Every check-and-mutate happens under a single write guard, which gives the
//! same uniqueness guarantees the PostgreSQL constraints provide.

pub mod post;
pub mod profile;
pub mod user;

pub use post::InMemoryPostRepository;
pub use profile::InMemoryProfileRepository;
pub use user::InMemoryUserRepository;
