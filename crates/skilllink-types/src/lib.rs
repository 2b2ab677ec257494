pub mod api;
pub mod role;
