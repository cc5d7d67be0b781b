//! Grid store: field records and per-owner accounting.
//!
//! Fields live in one contiguous buffer indexed by `x + y * width`. Owner
//! records are indexed by owner number, where index 0 is the pseudo-owner
//! holding every field without a pawn.

use crate::config::GameConfig;
use crate::error::GameError;

use super::position::Position;

/// Owner number of the pseudo-owner that holds unclaimed fields.
pub const UNOWNED: u32 = 0;

/// One board cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Field {
    /// `UNOWNED` or the number of the player whose pawn stands here.
    pub owner: u32,
}

/// Aggregate statistics for one owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OwnerRecord {
    /// Number of fields currently owned.
    pub busy_fields: u64,
    /// Number of areas formed by the owned fields. Always 0 for `UNOWNED`.
    pub busy_areas: u32,
    pub golden_move_used: bool,
}

/// Read access to field ownership.
///
/// Implemented by the live grid and by hypothetical views that override a
/// single field, so connectivity queries can run against either.
pub trait OwnerLookup {
    /// Returns the owner at `position`, or `None` if it is off the board.
    fn owner_at(&self, position: Position) -> Option<u32>;
}

/// The board and its owner records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: u32,
    height: u32,
    fields: Vec<Field>,
    owners: Vec<OwnerRecord>,
}

impl Grid {
    /// Allocates an empty board for `config`, with every field unowned.
    ///
    /// Allocation failure is reported instead of aborting.
    pub fn new(config: &GameConfig) -> Result<Self, GameError> {
        config.validate()?;
        let field_count = config.field_count()?;
        let owner_count = usize::try_from(config.players)
            .ok()
            .and_then(|p| p.checked_add(1))
            .ok_or(GameError::Allocation(usize::MAX))?;

        let mut fields = Vec::new();
        fields
            .try_reserve_exact(field_count)
            .map_err(|_| GameError::Allocation(field_count))?;
        fields.resize(field_count, Field::default());

        let mut owners = Vec::new();
        owners
            .try_reserve_exact(owner_count)
            .map_err(|_| GameError::Allocation(owner_count))?;
        owners.resize(owner_count, OwnerRecord::default());
        owners[UNOWNED as usize].busy_fields = field_count as u64;

        Ok(Grid {
            width: config.width,
            height: config.height,
            fields,
            owners,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if `position` lies in `[0, width) x [0, height)`.
    pub fn contains(&self, position: Position) -> bool {
        position.x >= 0
            && position.x < i64::from(self.width)
            && position.y >= 0
            && position.y < i64::from(self.height)
    }

    /// Returns the buffer index of `position`, or `None` if it is off the board.
    pub fn index_of(&self, position: Position) -> Option<usize> {
        if !self.contains(position) {
            return None;
        }
        // Both coordinates are bounded by u32 dimensions, so this fits.
        let x = position.x as usize;
        let y = position.y as usize;
        Some(x + y * self.width as usize)
    }

    /// Returns the position stored at buffer index `index`.
    pub fn position_of(&self, index: usize) -> Position {
        let width = self.width as usize;
        Position::new((index % width) as i64, (index / width) as i64)
    }

    /// Bounds-checked field lookup.
    pub fn cell_at(&self, position: Position) -> Option<&Field> {
        self.index_of(position).map(|i| &self.fields[i])
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Returns the record of `owner`, including the pseudo-owner at index 0.
    pub fn owner(&self, owner: u32) -> Option<&OwnerRecord> {
        self.owners.get(owner as usize)
    }

    pub(crate) fn owner_mut(&mut self, owner: u32) -> Option<&mut OwnerRecord> {
        self.owners.get_mut(owner as usize)
    }

    pub fn owners(&self) -> &[OwnerRecord] {
        &self.owners
    }

    /// Overwrites the owner of the field at `index` without touching any
    /// owner record. Callers keep the accounting consistent.
    pub(crate) fn set_owner(&mut self, index: usize, owner: u32) {
        self.fields[index].owner = owner;
    }
}

impl OwnerLookup for Grid {
    fn owner_at(&self, position: Position) -> Option<u32> {
        self.cell_at(position).map(|f| f.owner)
    }
}

/// The grid as it would look with one field handed to another owner.
#[derive(Debug, Clone, Copy)]
pub struct Hypothetical<'a> {
    grid: &'a Grid,
    index: usize,
    owner: u32,
}

impl<'a> Hypothetical<'a> {
    pub fn new(grid: &'a Grid, index: usize, owner: u32) -> Self {
        Hypothetical { grid, index, owner }
    }
}

impl OwnerLookup for Hypothetical<'_> {
    fn owner_at(&self, position: Position) -> Option<u32> {
        let index = self.grid.index_of(position)?;
        if index == self.index {
            Some(self.owner)
        } else {
            Some(self.grid.fields[index].owner)
        }
    }
}
