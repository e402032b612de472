pub mod application;
pub mod company;
pub mod profile;
pub mod user;
