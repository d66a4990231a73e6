pub mod activity;
pub mod add;
pub mod audit;
pub mod config;
pub mod export;
pub mod import;
pub mod inprogress;
pub mod list;
pub mod mastered;
pub mod nextup;
pub mod show;
