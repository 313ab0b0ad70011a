use crate::{config::GameConfig, core::PieceKind};

use super::{
    board::Board,
    piece_queue::PieceSeed,
    score::{Score, line_clear_bonus},
    snapshot::ViewSnapshot,
};

/// Points for one player-initiated soft-drop row.
const SOFT_DROP_POINTS: usize = 1;
/// Points per row travelled by a hard drop.
const HARD_DROP_POINTS_PER_ROW: usize = 2;

/// Who asked for a downward move.
///
/// Only player-initiated soft drops earn points; the external gravity
/// timer moves pieces for free.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveSource {
    /// The player pressed down.
    Player,
    /// The external gravity tick.
    Gravity,
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::IsVariant)]
pub enum SessionState {
    Playing,
    GameOver,
}

/// Result of a downward step or a hard drop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DownOutcome {
    /// Whether the piece travelled at least one row.
    pub moved: bool,
    /// Lines cleared by the lock this step triggered, if any.
    pub cleared_lines: usize,
    /// Whether the follow-up spawn failed, ending the game.
    pub game_over: bool,
}

impl DownOutcome {
    /// Outcome reported for events arriving after the game has ended.
    const GAME_OVER: Self = Self {
        moved: false,
        cleared_lines: 0,
        game_over: true,
    };
}

/// A multi-turn game session: the board plus score progression and the
/// terminal game-over state.
///
/// The session is driven entirely by semantic events from the outside
/// (player input or the external gravity timer) and never schedules
/// anything itself. After every call the caller can pull a fresh
/// [`ViewSnapshot`]; on game over, [`Self::score`] carries the final score
/// for whatever store keeps the rankings.
#[derive(Debug, Clone)]
pub struct GameSession {
    board: Board,
    score: Score,
    session_state: SessionState,
}

impl GameSession {
    /// Starts a session with the first piece already spawned.
    #[must_use]
    pub fn new(config: GameConfig) -> Self {
        let score = Score::new(&config);
        let mut board = Board::new(config);
        board.reset();
        Self {
            board,
            score,
            session_state: SessionState::Playing,
        }
    }

    /// Like [`Self::new`], with a deterministic piece sequence.
    #[must_use]
    pub fn with_seed(config: GameConfig, seed: PieceSeed) -> Self {
        let score = Score::new(&config);
        let mut board = Board::with_seed(config, seed);
        board.reset();
        Self {
            board,
            score,
            session_state: SessionState::Playing,
        }
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn score(&self) -> &Score {
        &self.score
    }

    #[must_use]
    pub fn session_state(&self) -> &SessionState {
        &self.session_state
    }

    #[must_use]
    pub fn snapshot(&self) -> ViewSnapshot {
        self.board.snapshot()
    }

    #[must_use]
    pub fn held_piece(&self) -> Option<PieceKind> {
        self.board.held_piece()
    }

    pub fn move_left(&mut self) -> bool {
        self.session_state.is_playing() && self.board.try_move_left().is_ok()
    }

    pub fn move_right(&mut self) -> bool {
        self.session_state.is_playing() && self.board.try_move_right().is_ok()
    }

    pub fn rotate(&mut self) -> bool {
        self.session_state.is_playing() && self.board.try_rotate().is_ok()
    }

    pub fn hold(&mut self) -> bool {
        self.session_state.is_playing() && self.board.try_hold().is_ok()
    }

    /// One downward step.
    ///
    /// A legal step just moves the piece (and pays the soft-drop point when
    /// the player asked). An illegal step means the piece landed: it is
    /// locked, full rows are cleared and scored, and the next piece spawns.
    /// A failed spawn flips the session to game over.
    pub fn move_down(&mut self, source: MoveSource) -> DownOutcome {
        if self.session_state.is_game_over() {
            return DownOutcome::GAME_OVER;
        }

        if self.board.try_move_down().is_ok() {
            if source == MoveSource::Player {
                self.score.add(SOFT_DROP_POINTS);
            }
            return DownOutcome {
                moved: true,
                cleared_lines: 0,
                game_over: false,
            };
        }

        let (cleared_lines, game_over) = self.lock_and_respawn();
        DownOutcome {
            moved: false,
            cleared_lines,
            game_over,
        }
    }

    /// Drops the piece to the bottom and completes the lock in one call.
    pub fn hard_drop(&mut self) -> DownOutcome {
        if self.session_state.is_game_over() {
            return DownOutcome::GAME_OVER;
        }

        let dropped = self.board.hard_drop();
        self.score.add(HARD_DROP_POINTS_PER_ROW * dropped);
        let (cleared_lines, game_over) = self.lock_and_respawn();
        DownOutcome {
            moved: dropped > 0,
            cleared_lines,
            game_over,
        }
    }

    fn lock_and_respawn(&mut self) -> (usize, bool) {
        let cleared = self.board.lock_and_clear();
        self.score.process_line_clear(cleared, line_clear_bonus(cleared));

        let game_over = self.board.spawn_next().is_err();
        if game_over {
            self.session_state = SessionState::GameOver;
        }
        (cleared, game_over)
    }

    /// Resets everything for a fresh game: empty grid, cleared hold slot,
    /// starting score and level, first piece spawned.
    pub fn new_game(&mut self) {
        self.board.reset();
        self.score.reset();
        self.session_state = SessionState::Playing;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Cell;

    fn session() -> GameSession {
        GameSession::new(GameConfig::default())
    }

    /// Narrow well so pieces stack fast and deterministically.
    fn cramped_session() -> GameSession {
        let config = GameConfig {
            rows: 6,
            cols: 4,
            hidden_rows: 0,
            spawn_x: 0,
            ..GameConfig::default()
        };
        GameSession::with_seed(config, PieceSeed::from_bytes([0x51; 16]))
    }

    #[test]
    fn gravity_down_is_free_player_down_pays() {
        let mut session = session();
        let outcome = session.move_down(MoveSource::Gravity);
        assert!(outcome.moved);
        assert_eq!(session.score().score(), 0);

        let outcome = session.move_down(MoveSource::Player);
        assert!(outcome.moved);
        assert_eq!(session.score().score(), 1);
    }

    #[test]
    fn hard_drop_pays_per_row_and_locks() {
        let mut session = session();
        let ghost = session.board().ghost_y();
        let outcome = session.hard_drop();
        assert!(outcome.moved);
        assert_eq!(outcome.cleared_lines, 0);
        assert!(!outcome.game_over);
        // 2 points per row travelled down to the ghost position.
        assert_eq!(
            session.score().score(),
            2 * usize::try_from(ghost).unwrap()
        );
        // The lock left cells behind and a fresh piece is at the top.
        assert!(
            session
                .board()
                .grid()
                .rows_iter()
                .flatten()
                .any(|c| !c.is_empty())
        );
        assert_eq!(session.snapshot().y, 0);
    }

    #[test]
    fn landing_on_a_non_clearing_lock_respawns() {
        let mut session = session();
        // Gravity all the way down, then one more tick to trigger the lock.
        while session.move_down(MoveSource::Gravity).moved {}
        assert!(session.session_state().is_playing());
        assert_eq!(session.score().score(), 0);
        assert_eq!(session.snapshot().y, 0);
    }

    #[test]
    fn lateral_moves_and_rotation_report_success() {
        let mut session = session();
        assert!(session.move_left());
        assert!(session.move_right());
        assert!(session.rotate());
        assert!(session.hold());
        // Second hold within the same piece lifetime is refused.
        assert!(!session.hold());
    }

    #[test]
    fn stacking_eventually_tops_out() {
        let mut session = cramped_session();
        let mut locks = 0;
        while !session.hard_drop().game_over {
            locks += 1;
            assert!(locks < 1000, "session should have topped out by now");
        }
        assert!(session.session_state().is_game_over());

        // Terminal state: further events are ignored and change nothing.
        let score = session.score().score();
        let outcome = session.move_down(MoveSource::Player);
        assert!(!outcome.moved);
        assert!(outcome.game_over);
        assert!(!session.move_left());
        assert!(!session.rotate());
        assert_eq!(session.score().score(), score);
    }

    #[test]
    fn new_game_recovers_from_game_over() {
        let mut session = cramped_session();
        while !session.hard_drop().game_over {}
        session.new_game();

        assert!(session.session_state().is_playing());
        assert_eq!(session.score().score(), 0);
        assert_eq!(session.held_piece(), None);
        assert!(
            session
                .board()
                .grid()
                .rows_iter()
                .flatten()
                .all(|c| c.is_empty())
        );
        assert!(session.move_down(MoveSource::Gravity).moved);
    }

    #[test]
    fn clearing_a_line_scores_drop_points_plus_bonus() {
        // On the 4-column well an I-piece always fills its whole row, so a
        // clear is guaranteed to show up while stacking; verify the exact
        // points the clearing drop was worth.
        let mut session = cramped_session();
        for _ in 0..500 {
            let before = session.score().score();
            let dropped =
                usize::try_from(session.board().ghost_y() - session.snapshot().y).unwrap();
            let outcome = session.hard_drop();
            if outcome.cleared_lines > 0 {
                let bonus = line_clear_bonus(outcome.cleared_lines);
                assert_eq!(session.score().score(), before + 2 * dropped + bonus);
                assert_eq!(session.score().lines_cleared(), outcome.cleared_lines);
                return;
            }
            if outcome.game_over {
                session.new_game();
            }
        }
        panic!("expected a line clear while stacking the cramped well");
    }
}
