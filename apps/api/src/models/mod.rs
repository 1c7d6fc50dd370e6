pub mod cascade;
pub mod draft;
pub mod user;
