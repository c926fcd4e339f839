pub mod classifier;
pub mod coach;
pub mod credentials;
pub mod errors;
pub mod models;
pub mod providers;
