//! Match controller: turns, rebounces, goals and the end of the game.

use tracing::{debug, info};

use crate::board::Path;
use crate::core::{AppConfig, PlayerId, PlayerMap};
use crate::engine::{EngineError, SoccerEngine};
use crate::rules::{is_any_move_allowed, is_goal_scored, is_move_allowed, must_rebounce, scorer};

/// What a played turn led to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The same player moves again.
    Continue,
    /// The other player moves next.
    TurnPassed,
    /// A goal was scored and the ball is back on the center point.
    Goal { scorer: PlayerId },
    /// The game is over; `None` is a draw.
    GameOver { winner: Option<PlayerId> },
}

/// One game between two players on a `SoccerEngine`.
pub struct Match {
    engine: SoccerEngine,
    first_goal_wins: bool,
    current: PlayerId,
    scores: PlayerMap<u32>,
    winner: Option<Option<PlayerId>>,
}

impl Match {
    /// Start a match; `Player1` moves first.
    pub fn new(engine: SoccerEngine, config: &AppConfig) -> Self {
        Self {
            engine,
            first_goal_wins: config.first_goal_wins,
            current: PlayerId::Player1,
            scores: PlayerMap::with_value(0),
            winner: None,
        }
    }

    #[must_use]
    pub fn engine(&self) -> &SoccerEngine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut SoccerEngine {
        &mut self.engine
    }

    /// Player to move.
    #[must_use]
    pub fn current_player(&self) -> PlayerId {
        self.current
    }

    #[must_use]
    pub fn score(&self, player: PlayerId) -> u32 {
        self.scores[player]
    }

    #[must_use]
    pub fn is_over(&self) -> bool {
        self.winner.is_some()
    }

    /// Winner once the game is over; `Some(None)` is a draw.
    #[must_use]
    pub fn winner(&self) -> Option<Option<PlayerId>> {
        self.winner
    }

    /// Start a new game with a clean board and score.
    pub fn restart(&mut self) -> Result<(), EngineError> {
        self.engine.reset_game()?;
        self.current = PlayerId::Player1;
        self.scores.fill(0);
        self.winner = None;
        Ok(())
    }

    /// Play `path` for the current player and resolve what follows.
    ///
    /// A single-move path keeps the turn when the ball rebounces; a longer
    /// path is taken as a whole turn.
    pub fn play(&mut self, path: &Path) -> Result<MoveOutcome, EngineError> {
        if let Some(winner) = self.winner {
            return Ok(MoveOutcome::GameOver { winner });
        }
        if self.engine.is_analysing() {
            return Err(EngineError::AnalysisInProgress);
        }

        let mut rebounce = false;
        if path.len() == 1 {
            if let Some(direction) = path.first().and_then(|e| e.direction()) {
                let board = self.engine.board();
                if is_move_allowed(board, board.current(), direction) {
                    rebounce = must_rebounce(board, board.current(), direction);
                }
            }
        }

        self.engine.apply_path(path)?;
        debug!(player = %self.current, %path, rebounce, "turn applied");

        let board = self.engine.board();
        if is_goal_scored(board) {
            let Some(scorer) = scorer(board) else {
                unreachable!("goal row without a scorer");
            };
            self.scores[scorer] += 1;
            self.engine.next_round()?;
            self.current = scorer.opponent();
            info!(%scorer, p1 = self.scores[PlayerId::Player1], p2 = self.scores[PlayerId::Player2], "goal");

            let board = self.engine.board();
            if self.first_goal_wins || !is_any_move_allowed(board, board.current()) {
                return Ok(self.finish(self.leader()));
            }
            return Ok(MoveOutcome::Goal { scorer });
        }

        if !is_any_move_allowed(board, board.current()) {
            let winner = self.current.opponent();
            info!(stuck = %self.current, "no move left");
            return Ok(self.finish(Some(winner)));
        }

        if rebounce {
            Ok(MoveOutcome::Continue)
        } else {
            self.current = self.current.opponent();
            Ok(MoveOutcome::TurnPassed)
        }
    }

    fn leader(&self) -> Option<PlayerId> {
        let (p1, p2) = (self.scores[PlayerId::Player1], self.scores[PlayerId::Player2]);
        match p1.cmp(&p2) {
            std::cmp::Ordering::Greater => Some(PlayerId::Player1),
            std::cmp::Ordering::Less => Some(PlayerId::Player2),
            std::cmp::Ordering::Equal => None,
        }
    }

    fn finish(&mut self, winner: Option<PlayerId>) -> MoveOutcome {
        info!(winner = ?winner, "game over");
        self.winner = Some(winner);
        MoveOutcome::GameOver { winner }
    }
}
