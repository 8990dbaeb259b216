pub mod health;
pub mod image;
pub mod query;
pub mod transcribe;
