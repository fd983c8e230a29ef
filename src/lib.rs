pub mod aggregate;
pub mod cli;
pub mod config;
pub mod github;
pub mod output;
pub mod repo_ref;
pub mod run;
pub mod storage;
pub mod table;
