pub mod activity;
pub mod audit;
pub mod backup;
pub mod clock;
pub mod config;
pub mod mastery;
pub mod problems;
pub mod random;
pub mod review;
pub mod storage;
pub mod tracker;

pub use review::{DueList, DueProblem, OverdueTier};
pub use storage::{DocumentStore, JsonFileStore};
pub use tracker::{
    AttemptRequest, AuditTrigger, NextReview, ProblemView, Recorded, Selector, Tracker,
    TrackerError,
};
