#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};

use crate::model::{Goal, Task};

pub const BACKUP_VERSION: &str = "1.0";

/// Portable snapshot of the whole database.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Backup {
    pub version: String,
    pub timestamp: String,
    pub data: BackupData,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupData {
    pub goals: Vec<Goal>,
    #[serde(default)]
    pub tasks: Vec<Task>,
}
