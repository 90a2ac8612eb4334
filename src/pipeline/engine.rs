use serde::Serialize;
use crate::error::{CrmError, Entity, Result};
use crate::models::{Shift, Stage};
use crate::pipeline::store::{Atomic, BoardStore, StageStore};
use crate::validate::validate_name;

/// Result of a reorder request
#[derive(Debug, Clone, Serialize)]
pub struct ReorderOutcome {
    pub message: String,
    /// Active stages of the board, ordered by position
    pub stages: Vec<Stage>,
}

pub const MSG_REORDERED: &str = "Stage reordered successfully";
pub const MSG_ALREADY_IN_POSITION: &str = "Stage is already in this position";

/// Keeps the stages of each board in a dense 1..=k ordering.
///
/// Among the active stages of a board, positions are unique and contiguous
/// from 1. Every operation reads the latest persisted state, checks its
/// preconditions before writing anything, and applies its writes inside a
/// single store transaction. Gaps are opened and closed with range shifts
/// rather than by renumbering the whole board.
///
/// Inactive stages keep a stale position outside that sequence; shifts never
/// touch them.
pub struct StageEngine<S> {
    store: S,
}

impl<S> StageEngine<S>
where
    S: StageStore + BoardStore + Atomic,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Insert a new active stage at `position`, pushing the occupant of that
    /// slot and everything after it one step back.
    ///
    /// `position` must lie in `1..=k+1` for a board with `k` active stages.
    pub fn create_stage(&self, name: &str, position: i64, board_id: i64) -> Result<Stage> {
        let name = validate_name(name, "Stage name")?;
        self.store.atomically(|| {
            self.require_board(board_id)?;

            let active = self.store.count_active(board_id)?;
            if position < 1 || position > active + 1 {
                return Err(CrmError::invalid(format!(
                    "Position must be between 1 and {} for board {}",
                    active + 1,
                    board_id
                )));
            }

            if self.store.find_active_at(board_id, position)?.is_some() {
                self.store
                    .shift_positions(board_id, Shift::Increment, position, None)?;
            }

            let stage = self.store.create_stage(&name, position, board_id)?;
            log::info!(
                "Created stage {} '{}' at position {} on board {}",
                stage.id,
                stage.name,
                position,
                board_id
            );
            Ok(stage)
        })
    }

    /// Rename a stage; position and status are untouched
    pub fn update_stage_name(&self, id: i64, name: &str) -> Result<Stage> {
        let name = validate_name(name, "Stage name")?;
        self.store.atomically(|| {
            self.require_stage(id)?;
            self.store.update_name(id, &name)
        })
    }

    /// Soft-delete a stage and close the gap it leaves behind.
    ///
    /// The stage keeps its stored position. Deactivating an inactive stage
    /// changes nothing.
    pub fn deactivate_stage(&self, id: i64) -> Result<Stage> {
        self.store.atomically(|| {
            let stage = self.require_stage(id)?;
            if !stage.is_active {
                log::debug!("Stage {} is already inactive", id);
                return Ok(stage);
            }

            let stage = self.store.set_active(id, false)?;
            self.store
                .shift_positions(stage.board_id, Shift::Decrement, stage.position + 1, None)?;
            log::info!(
                "Deactivated stage {} (was position {} on board {})",
                id,
                stage.position,
                stage.board_id
            );
            Ok(stage)
        })
    }

    /// Mark a stage active again at its stored position.
    ///
    /// The board is not renumbered: if another active stage has since taken
    /// that slot, both now share it. The collision is logged, not repaired.
    pub fn reactivate_stage(&self, id: i64) -> Result<Stage> {
        self.store.atomically(|| {
            let stage = self.require_stage(id)?;
            if stage.is_active {
                log::debug!("Stage {} is already active", id);
                return Ok(stage);
            }

            if let Some(occupant) = self.store.find_active_at(stage.board_id, stage.position)? {
                log::warn!(
                    "Reactivated stage {} shares position {} on board {} with stage {}",
                    id,
                    stage.position,
                    stage.board_id,
                    occupant.id
                );
            }

            let stage = self.store.set_active(id, true)?;
            log::info!("Reactivated stage {} at position {}", id, stage.position);
            Ok(stage)
        })
    }

    /// Every stage of the board, active and inactive, ordered by position
    pub fn list_stages_by_board(&self, board_id: i64) -> Result<Vec<Stage>> {
        self.require_board(board_id)?;
        self.store.list_stages(board_id)
    }

    /// Move an active stage to `new_position` (1..=k), shifting the stages
    /// in between by one to make room.
    pub fn reorder_stage(&self, id: i64, new_position: i64) -> Result<ReorderOutcome> {
        if new_position < 1 {
            return Err(CrmError::invalid("Position must be greater than 0"));
        }

        self.store.atomically(|| {
            let stage = self.require_stage(id)?;
            if !stage.is_active {
                return Err(CrmError::invalid(format!(
                    "Stage {} is inactive and cannot be reordered",
                    id
                )));
            }

            let board_id = stage.board_id;
            let current = stage.position;
            // A reactivated stage may sit above the active count
            if new_position == current {
                return Ok(ReorderOutcome {
                    message: MSG_ALREADY_IN_POSITION.to_string(),
                    stages: self.store.list_active_stages(board_id)?,
                });
            }

            let active = self.store.count_active(board_id)?;
            if new_position > active {
                return Err(CrmError::invalid(format!(
                    "Position must be between 1 and {} for board {}",
                    active, board_id
                )));
            }

            if new_position < current {
                self.store
                    .shift_positions(board_id, Shift::Increment, new_position, Some(current - 1))?;
            } else {
                self.store
                    .shift_positions(board_id, Shift::Decrement, current + 1, Some(new_position))?;
            }
            // Direct write so the moved stage is not caught by its own shift
            self.store.update_position(id, new_position)?;
            log::info!(
                "Moved stage {} on board {} from position {} to {}",
                id,
                board_id,
                current,
                new_position
            );

            Ok(ReorderOutcome {
                message: MSG_REORDERED.to_string(),
                stages: self.store.list_active_stages(board_id)?,
            })
        })
    }

    fn require_board(&self, board_id: i64) -> Result<()> {
        if self.store.board_exists(board_id)? {
            Ok(())
        } else {
            Err(CrmError::not_found(Entity::Board, board_id))
        }
    }

    fn require_stage(&self, id: i64) -> Result<Stage> {
        self.store
            .find_stage(id)?
            .ok_or_else(|| CrmError::not_found(Entity::Stage, id))
    }
}
