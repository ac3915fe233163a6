pub mod distribution;
pub mod event_categorizer;
pub mod events_config;
pub mod http_client;
pub mod igl_analysis;
pub mod igl_cohort;
pub mod label;
pub mod match_index;
pub mod scoreboard;
pub mod stage_classifier;
pub mod stats;
pub mod store;
