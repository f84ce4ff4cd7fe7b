pub mod admin;
pub mod project;
pub mod reminder;
pub mod step;
pub mod upload;
