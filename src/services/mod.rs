pub mod details;
pub mod discovery;
pub mod metadata;
pub mod providers;
pub mod recommendations;
pub mod search;
