//! Read-only collaborators the simulator pulls its inputs from.

pub mod dataset;
pub mod provider;

pub use dataset::{DatasetProvider, KeeperRecord, PlayerRecord, SeasonDataset, TeamRecord};
pub use provider::{NameLookup, StatsProvider};
