pub mod auth;
pub mod index;
pub mod predict;
pub mod translate;
