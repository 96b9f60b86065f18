pub mod export;
pub mod review;
pub mod search;
pub mod show;
