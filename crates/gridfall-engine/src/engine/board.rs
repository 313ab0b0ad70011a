use crate::{
    HoldAlreadyUsedError, PieceCollisionError,
    config::GameConfig,
    core::{Grid, PieceKind, PieceRotator, matrix},
};

use super::{
    piece_queue::{PieceQueue, PieceSeed},
    snapshot::ViewSnapshot,
};

/// Offsets tried by a rotation, in order: in place, one column left, one
/// column right. The first legal candidate wins.
const KICK_OFFSETS: [i32; 3] = [0, -1, 1];

#[derive(Debug, Clone, Copy)]
struct ActivePiece {
    rotator: PieceRotator,
    x: i32,
    y: i32,
}

/// The stateful core of the rules engine: the grid of locked cells, the
/// active piece, the hold slot, and the piece queue.
///
/// Before the first spawn there is no active piece; calling a piece
/// operation in that state is a programming error and panics. During play,
/// every mutator either fully commits or rejects with an error and leaves
/// all state exactly as it was.
#[derive(Debug, Clone)]
pub struct Board {
    config: GameConfig,
    grid: Grid,
    queue: PieceQueue,
    active: Option<ActivePiece>,
    hold_slot: Option<PieceKind>,
    can_hold: bool,
}

impl Board {
    /// Creates a board with an empty grid and no active piece.
    ///
    /// # Panics
    ///
    /// Panics if the configured dimensions cannot host a piece's 4x4
    /// bounding box or the hidden rows do not fit.
    #[must_use]
    pub fn new(config: GameConfig) -> Self {
        let queue = PieceQueue::new(config.preview_count);
        Self::with_queue(config, queue)
    }

    /// Like [`Self::new`], with a fixed seed for a deterministic piece
    /// sequence.
    #[must_use]
    pub fn with_seed(config: GameConfig, seed: PieceSeed) -> Self {
        let queue = PieceQueue::with_seed(seed, config.preview_count);
        Self::with_queue(config, queue)
    }

    fn with_queue(config: GameConfig, queue: PieceQueue) -> Self {
        assert!(config.cols >= 4, "grid must be at least 4 columns wide");
        assert!(
            config.hidden_rows < config.rows,
            "hidden rows must leave visible rows"
        );
        let grid = Grid::empty(config.rows, config.cols);
        Self {
            config,
            grid,
            queue,
            active: None,
            hold_slot: None,
            can_hold: true,
        }
    }

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// The grid of locked cells. Borrowed read-only; mutation goes through
    /// the board operations.
    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    #[must_use]
    pub fn held_piece(&self) -> Option<PieceKind> {
        self.hold_slot
    }

    /// Kind of the active piece.
    ///
    /// # Panics
    ///
    /// Panics if no piece has been spawned yet.
    #[must_use]
    pub fn active_kind(&self) -> PieceKind {
        self.active().rotator.kind()
    }

    pub fn next_pieces(&self) -> impl Iterator<Item = PieceKind> + '_ {
        self.queue.next_pieces()
    }

    fn active(&self) -> &ActivePiece {
        self.active
            .as_ref()
            .expect("no active piece; spawn one first")
    }

    fn active_mut(&mut self) -> &mut ActivePiece {
        self.active
            .as_mut()
            .expect("no active piece; spawn one first")
    }

    fn try_shift(&mut self, dx: i32, dy: i32) -> Result<(), PieceCollisionError> {
        let active = self.active();
        let nx = active.x + dx;
        let ny = active.y + dy;
        if matrix::intersects(&self.grid, active.rotator.current_shape(), nx, ny) {
            return Err(PieceCollisionError);
        }
        let active = self.active_mut();
        active.x = nx;
        active.y = ny;
        Ok(())
    }

    pub fn try_move_left(&mut self) -> Result<(), PieceCollisionError> {
        self.try_shift(-1, 0)
    }

    pub fn try_move_right(&mut self) -> Result<(), PieceCollisionError> {
        self.try_shift(1, 0)
    }

    pub fn try_move_down(&mut self) -> Result<(), PieceCollisionError> {
        self.try_shift(0, 1)
    }

    /// Advances the active piece to its next rotation state.
    ///
    /// Tries the rotated shape in place first, then kicked one column left,
    /// then one column right; the first legal candidate is committed. With
    /// no legal candidate the rotation is rejected and nothing changes.
    pub fn try_rotate(&mut self) -> Result<(), PieceCollisionError> {
        let active = self.active();
        let (shape, next_state) = active.rotator.peek_next();
        let (x, y) = (active.x, active.y);

        for dx in KICK_OFFSETS {
            if !matrix::intersects(&self.grid, shape, x + dx, y) {
                let active = self.active_mut();
                active.x += dx;
                active.rotator.commit(next_state);
                return Ok(());
            }
        }
        Err(PieceCollisionError)
    }

    /// Moves the active piece down until it would collide and returns the
    /// number of rows travelled. The piece is not locked.
    pub fn hard_drop(&mut self) -> usize {
        let mut dropped = 0;
        while self.try_move_down().is_ok() {
            dropped += 1;
        }
        dropped
    }

    /// Spawns the next queued piece at the configured spawn position.
    ///
    /// The piece becomes active either way; an `Err` means the spawn
    /// position was already occupied, which is the game-over signal for
    /// the caller.
    pub fn spawn_next(&mut self) -> Result<(), PieceCollisionError> {
        let kind = self.queue.pop_next();
        self.spawn_kind(kind)
    }

    /// Spawns a specific kind without consuming the queue, with spawn
    /// semantics otherwise identical to [`Self::spawn_next`]. Used by the
    /// hold swap and by scripted scenarios.
    pub fn spawn_kind(&mut self, kind: PieceKind) -> Result<(), PieceCollisionError> {
        let rotator = PieceRotator::new(kind);
        let x = self.config.spawn_x;
        let y = self.config.spawn_y;
        self.active = Some(ActivePiece { rotator, x, y });
        self.can_hold = true;
        if matrix::intersects(&self.grid, rotator.current_shape(), x, y) {
            return Err(PieceCollisionError);
        }
        Ok(())
    }

    /// Banks the active piece for later, at most once per piece lifetime.
    ///
    /// An empty hold slot banks the active kind and spawns the next queued
    /// piece; an occupied slot swaps, rebinding the swapped-in kind at
    /// rotation state 0 and the spawn position. The swap skips the
    /// intersection check: like a fresh spawn, arriving at the spawn cell
    /// is taken to be legal.
    pub fn try_hold(&mut self) -> Result<(), HoldAlreadyUsedError> {
        if !self.can_hold {
            return Err(HoldAlreadyUsedError);
        }

        let current = self.active().rotator.kind();
        match self.hold_slot.take() {
            None => {
                self.hold_slot = Some(current);
                let _ = self.spawn_next();
            }
            Some(held) => {
                self.hold_slot = Some(current);
                let spawn_x = self.config.spawn_x;
                let spawn_y = self.config.spawn_y;
                let active = self.active_mut();
                active.rotator.bind(held);
                active.x = spawn_x;
                active.y = spawn_y;
            }
        }
        self.can_hold = false;
        Ok(())
    }

    /// Locks the active piece into the grid and compacts full rows,
    /// returning how many were cleared.
    ///
    /// The caller is responsible for spawning the next piece afterwards
    /// and treating a failed spawn as game over.
    pub fn lock_and_clear(&mut self) -> usize {
        let active = *self.active();
        self.grid = matrix::merge(
            &self.grid,
            active.rotator.current_shape(),
            active.x,
            active.y,
        );
        let (cleared, compacted) = matrix::clear_full_rows(&self.grid);
        self.grid = compacted;
        cleared
    }

    /// Row the active piece would come to rest on if dropped now.
    #[must_use]
    pub fn ghost_y(&self) -> i32 {
        let active = self.active();
        let shape = active.rotator.current_shape();
        let mut ghost = active.y;
        while !matrix::intersects(&self.grid, shape, active.x, ghost + 1) {
            ghost += 1;
        }
        ghost
    }

    /// Copied, read-only projection for the presentation layer.
    ///
    /// Nothing in the snapshot aliases live board state.
    #[must_use]
    pub fn snapshot(&self) -> ViewSnapshot {
        let active = self.active();
        ViewSnapshot {
            active_shape: *active.rotator.current_shape(),
            x: active.x,
            y: active.y,
            ghost_y: self.ghost_y(),
            next_shapes: self
                .queue
                .next_pieces()
                .take(self.queue.preview_count())
                .map(|kind| *kind.shape(0))
                .collect(),
            hold_shape: self.hold_slot.map(|kind| *kind.shape(0)),
        }
    }

    /// Clears the grid and hold slot and spawns a fresh first piece.
    pub fn reset(&mut self) {
        self.grid = Grid::empty(self.config.rows, self.config.cols);
        self.hold_slot = None;
        self.spawn_next()
            .expect("spawning on an empty grid cannot collide");
    }

    #[cfg(test)]
    pub(crate) fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Cell;

    fn board_with(kind: PieceKind) -> Board {
        let mut board = Board::new(GameConfig::default());
        board.spawn_kind(kind).unwrap();
        board
    }

    fn fill_row(board: &mut Board, y: usize) {
        for x in 0..board.config().cols {
            board.grid_mut().set_cell(x, y, Cell::Piece(PieceKind::S));
        }
    }

    #[test]
    fn spawn_places_piece_at_configured_position() {
        let board = board_with(PieceKind::T);
        let snapshot = board.snapshot();
        assert_eq!(snapshot.x, 3);
        assert_eq!(snapshot.y, 0);
        assert_eq!(snapshot.active_shape, *PieceKind::T.shape(0));
    }

    #[test]
    fn moves_succeed_in_open_space_and_stop_at_walls() {
        let mut board = board_with(PieceKind::O);
        assert!(board.try_move_left().is_ok());
        assert!(board.try_move_down().is_ok());
        let snapshot = board.snapshot();
        assert_eq!((snapshot.x, snapshot.y), (2, 1));

        // O occupies box columns 0..=1; the left wall stops it at x = 0.
        while board.try_move_left().is_ok() {}
        assert_eq!(board.snapshot().x, 0);
        let before = board.snapshot();
        assert!(board.try_move_left().is_err());
        assert_eq!(board.snapshot(), before);
    }

    #[test]
    fn rejected_moves_leave_state_untouched() {
        let mut board = board_with(PieceKind::I);
        let dropped = board.hard_drop();
        assert!(dropped > 0);
        let before = board.snapshot();
        assert!(board.try_move_down().is_err());
        assert_eq!(board.snapshot(), before);
    }

    #[test]
    fn o_piece_drops_to_the_bottom_row() {
        let mut board = board_with(PieceKind::O);
        let mut steps = 0;
        while board.try_move_down().is_ok() {
            steps += 1;
        }
        // The O occupies box rows 0..=1; its bottom cells rest on row 24.
        assert_eq!(steps, 23);
        assert_eq!(board.snapshot().y, 23);

        assert_eq!(board.lock_and_clear(), 0);
        let grid = board.grid();
        assert_eq!(grid.cell(3, 23), Cell::Piece(PieceKind::O));
        assert_eq!(grid.cell(4, 23), Cell::Piece(PieceKind::O));
        assert_eq!(grid.cell(3, 24), Cell::Piece(PieceKind::O));
        assert_eq!(grid.cell(4, 24), Cell::Piece(PieceKind::O));
    }

    #[test]
    fn hard_drop_counts_rows_without_locking() {
        let mut board = board_with(PieceKind::O);
        assert_eq!(board.hard_drop(), 23);
        assert_eq!(board.hard_drop(), 0);
        // Still active and unlocked: the grid has no cells yet.
        assert!(board.grid().rows_iter().flatten().all(|c| c.is_empty()));
    }

    #[test]
    fn rotation_in_place_wins_over_kicks() {
        let mut board = board_with(PieceKind::T);
        let x_before = board.snapshot().x;
        assert!(board.try_rotate().is_ok());
        assert_eq!(board.snapshot().x, x_before);
    }

    #[test]
    fn vertical_i_at_right_wall_rotates_via_left_kick() {
        let mut board = board_with(PieceKind::I);
        // Stand the I up, then push it flush against the right wall: the
        // vertical state occupies box column 2, so x ends at cols - 3 = 7.
        assert!(board.try_rotate().is_ok());
        while board.try_move_right().is_ok() {}
        assert_eq!(board.snapshot().x, 7);

        // Rotating back to horizontal needs box columns 0..=3; in place
        // that reaches column 10, so only the left kick can host it.
        assert!(board.try_rotate().is_ok());
        let snapshot = board.snapshot();
        assert_eq!(snapshot.x, 6);
        assert_eq!(snapshot.active_shape, *PieceKind::I.shape(2));
    }

    #[test]
    fn blocked_rotation_changes_nothing() {
        let mut board = board_with(PieceKind::I);
        assert!(board.try_rotate().is_ok());
        while board.try_move_right().is_ok() {}
        // Wall on the right, stacked cells blocking the left kick.
        for y in 0..board.config().rows {
            for x in 0..7 {
                board.grid_mut().set_cell(x, y, Cell::Piece(PieceKind::Z));
            }
        }
        let before = board.snapshot();
        assert!(board.try_rotate().is_err());
        assert_eq!(board.snapshot(), before);
    }

    #[test]
    fn spawn_on_occupied_position_signals_game_over() {
        let mut board = board_with(PieceKind::T);
        for y in 0..4 {
            fill_row(&mut board, y);
        }
        assert!(board.spawn_kind(PieceKind::T).is_err());
    }

    #[test]
    fn hold_banks_and_spawns_when_slot_is_empty() {
        let mut board = board_with(PieceKind::J);
        assert_eq!(board.held_piece(), None);
        assert!(board.try_hold().is_ok());
        assert_eq!(board.held_piece(), Some(PieceKind::J));
        // A fresh piece is active at the spawn position.
        let snapshot = board.snapshot();
        assert_eq!((snapshot.x, snapshot.y), (3, 0));
    }

    #[test]
    fn hold_swaps_and_resets_position_when_slot_is_occupied() {
        let mut board = board_with(PieceKind::J);
        assert!(board.try_hold().is_ok());

        // Next piece lifetime: move away from spawn, rotate, then swap.
        board.spawn_kind(PieceKind::L).unwrap();
        board.try_rotate().unwrap();
        board.try_move_down().unwrap();
        assert!(board.try_hold().is_ok());

        assert_eq!(board.held_piece(), Some(PieceKind::L));
        assert_eq!(board.active_kind(), PieceKind::J);
        let snapshot = board.snapshot();
        assert_eq!((snapshot.x, snapshot.y), (3, 0));
        assert_eq!(snapshot.active_shape, *PieceKind::J.shape(0));
    }

    #[test]
    fn second_hold_in_one_piece_lifetime_is_rejected() {
        let mut board = board_with(PieceKind::J);
        assert!(board.try_hold().is_ok());
        let held = board.held_piece();
        let active = board.active_kind();
        let snapshot = board.snapshot();

        assert!(board.try_hold().is_err());
        assert_eq!(board.held_piece(), held);
        assert_eq!(board.active_kind(), active);
        assert_eq!(board.snapshot(), snapshot);
    }

    #[test]
    fn spawn_reenables_hold() {
        let mut board = board_with(PieceKind::J);
        assert!(board.try_hold().is_ok());
        assert!(board.try_hold().is_err());
        board.spawn_kind(PieceKind::T).unwrap();
        assert!(board.try_hold().is_ok());
    }

    #[test]
    fn lock_and_clear_removes_prefilled_bottom_row() {
        let mut board = board_with(PieceKind::O);
        fill_row(&mut board, 24);
        // Land the O on top of the full row, then lock.
        board.hard_drop();
        assert_eq!(board.snapshot().y, 22);
        let cleared = board.lock_and_clear();
        assert_eq!(cleared, 1);

        // Row 24 now holds what used to be row 23: the O's bottom cells.
        let grid = board.grid();
        assert_eq!(grid.cell(3, 24), Cell::Piece(PieceKind::O));
        assert_eq!(grid.cell(4, 24), Cell::Piece(PieceKind::O));
        assert!(grid.cell(0, 24).is_empty());
        assert_eq!(grid.cell(3, 23), Cell::Piece(PieceKind::O));
        assert!(grid.cell(3, 22).is_empty());
    }

    #[test]
    fn ghost_matches_drop_position() {
        let mut board = board_with(PieceKind::L);
        let ghost = board.ghost_y();
        let dropped = board.hard_drop();
        assert_eq!(board.snapshot().y, ghost);
        assert_eq!(ghost, i32::try_from(dropped).unwrap());
        // Probing the ghost does not move the piece.
        let mut probe = board_with(PieceKind::L);
        let _ = probe.ghost_y();
        assert_eq!(probe.snapshot().y, 0);
    }

    #[test]
    fn snapshot_previews_configured_piece_count() {
        let board = board_with(PieceKind::T);
        let snapshot = board.snapshot();
        assert_eq!(snapshot.next_shapes.len(), 3);
        assert_eq!(snapshot.hold_shape, None);
        let upcoming: Vec<_> = board.next_pieces().take(3).collect();
        for (shape, kind) in snapshot.next_shapes.iter().zip(upcoming) {
            assert_eq!(shape, kind.shape(0));
        }
    }

    #[test]
    fn reset_clears_grid_hold_and_respawns() {
        let mut board = board_with(PieceKind::T);
        board.try_hold().unwrap();
        fill_row(&mut board, 20);
        board.reset();

        assert!(board.grid().rows_iter().flatten().all(|c| c.is_empty()));
        assert_eq!(board.held_piece(), None);
        assert_eq!(board.snapshot().y, 0);
        // Hold is usable again after the reset's spawn.
        assert!(board.try_hold().is_ok());
    }

    #[test]
    #[should_panic(expected = "no active piece")]
    fn moving_before_spawn_is_a_defect() {
        let mut board = Board::new(GameConfig::default());
        let _ = board.try_move_down();
    }
}
