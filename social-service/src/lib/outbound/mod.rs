pub mod avatar;
pub mod repositories;
