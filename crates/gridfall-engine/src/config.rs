use serde::{Deserialize, Serialize};

/// Game parameters supplied before a session starts.
///
/// The defaults reproduce the classic setup: a 10-column board with 23
/// visible rows plus 2 hidden spawn-buffer rows, pieces spawning at the top
/// center, and a level-up every 10 cleared lines.
///
/// Grid dimensions are fixed for the lifetime of a board; changing them
/// requires starting a new session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Total grid rows, hidden spawn-buffer rows included.
    pub rows: usize,
    /// Grid columns.
    pub cols: usize,
    /// Top rows reserved for spawning, rendered off-screen.
    pub hidden_rows: usize,
    /// Spawn column of the active piece's 4x4 bounding box.
    pub spawn_x: i32,
    /// Spawn row of the active piece's 4x4 bounding box.
    pub spawn_y: i32,
    /// Level at the start of a fresh game.
    pub start_level: usize,
    /// Cleared lines needed per level advance.
    pub lines_per_level: usize,
    /// Streak length at which the combo multiplier kicks in.
    pub combo_threshold: usize,
    /// Multiplier applied to the line-clear bonus once the streak is long
    /// enough. The multiplied bonus is truncated to an integer.
    pub combo_multiplier: f64,
    /// Upcoming pieces the queue keeps available for preview.
    pub preview_count: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            rows: 25,
            cols: 10,
            hidden_rows: 2,
            // cols / 2 - 2, centering the 4x4 bounding box
            spawn_x: 3,
            spawn_y: 0,
            start_level: 1,
            lines_per_level: 10,
            combo_threshold: 5,
            combo_multiplier: 1.5,
            preview_count: 3,
        }
    }
}
