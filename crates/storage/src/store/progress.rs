#![forbid(unsafe_code)]

use super::*;
use sg_core::model::GoalId;

impl SqliteStore {
    /// Re-derives the stored progress of a goal from its task rows. Task
    /// mutations do this on their own; this entry point exists to repair
    /// a goal after out-of-band changes.
    pub fn recompute_goal_progress(&mut self, id: GoalId) -> Result<u8, StoreError> {
        let tx = self.conn.transaction()?;
        let progress = recompute_progress_tx(&tx, id)?;
        tx.commit()?;
        Ok(progress)
    }
}
