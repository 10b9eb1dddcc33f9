pub mod memory;
pub mod post;
pub mod profile;
pub mod user;

pub use memory::InMemoryPostRepository;
pub use memory::InMemoryProfileRepository;
pub use memory::InMemoryUserRepository;
pub use post::PostgresPostRepository;
pub use profile::PostgresProfileRepository;
pub use user::PostgresUserRepository;
