//! Game engine facade: the board plus the computer player's search.
//!
//! Collaborators feed human moves through [`SoccerEngine::apply_move`] or
//! [`SoccerEngine::apply_path`] and ask for the computer's reply with
//! [`SoccerEngine::start_analysis`]. The analysis runs on a worker thread
//! over a copy of the board; the engine keeps the receiving end of the
//! worker's one-shot channel, and the returned [`AnalysisTicket`] only names
//! which analysis a caller is waiting for.

use std::sync::mpsc::{channel, Receiver, TryRecvError};
use std::thread;
use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::{debug, info};

use crate::board::{Board, Direction, MoveError, Path};
use crate::core::{AppConfig, PlayerId};
use crate::search::{Difficulty, SearchConfig, SearchDriver, SearchStats};

/// Errors raised by the engine facade.
#[derive(Error, Debug)]
pub enum EngineError {
    /// The board rejected a move.
    #[error("illegal move: {0}")]
    Move(#[from] MoveError),

    /// The board is held by a running analysis.
    #[error("an analysis is already running")]
    AnalysisInProgress,

    /// The ticket belongs to an analysis that was already resolved or cancelled.
    #[error("analysis ticket {0} is no longer pending")]
    StaleTicket(u64),

    /// The analysis worker ended without reporting.
    #[error("analysis worker stopped without a result")]
    WorkerDisconnected,
}

/// Message sent by the analysis worker.
struct AnalysisOutcome {
    driver: SearchDriver,
    path: Option<Path>,
}

/// Analysis owned by the engine while the worker runs.
struct PendingAnalysis {
    id: u64,
    receiver: Receiver<AnalysisOutcome>,
    started: Instant,
}

/// Handle on a running analysis.
#[derive(Clone, Copy, Debug)]
pub struct AnalysisTicket {
    id: u64,
    started: Instant,
}

impl AnalysisTicket {
    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Time since the analysis started.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}

/// Result of polling a running analysis.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AnalysisState {
    Running,
    Finished(Option<Path>),
}

/// Board, computer player and the last computed move.
pub struct SoccerEngine {
    board: Board,
    driver: Option<SearchDriver>,
    search: SearchConfig,
    pending: Option<PendingAnalysis>,
    next_ticket: u64,
    ai_player: PlayerId,
    best_path: Option<Path>,
    last_stats: SearchStats,
}

impl SoccerEngine {
    /// Engine on a standard board with the computer playing `ai_player`.
    pub fn new(config: &AppConfig, ai_player: PlayerId) -> Self {
        Self::with_search_config(SearchConfig::for_difficulty(config.difficulty), ai_player)
    }

    /// Engine with explicit search budgets.
    pub fn with_search_config(search: SearchConfig, ai_player: PlayerId) -> Self {
        Self {
            board: Board::standard(),
            driver: Some(SearchDriver::new(search.clone(), ai_player)),
            search,
            pending: None,
            next_ticket: 0,
            ai_player,
            best_path: None,
            last_stats: SearchStats::default(),
        }
    }

    /// Current board. Readable while an analysis runs.
    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    fn board_mut(&mut self) -> Result<&mut Board, EngineError> {
        if self.pending.is_some() {
            return Err(EngineError::AnalysisInProgress);
        }
        Ok(&mut self.board)
    }

    /// Every move played so far.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.board.path()
    }

    #[must_use]
    pub fn ai_player(&self) -> PlayerId {
        self.ai_player
    }

    #[must_use]
    pub fn is_analysing(&self) -> bool {
        self.pending.is_some()
    }

    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.search.difficulty
    }

    /// Change the search budgets; a running analysis keeps its own.
    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.search = SearchConfig::for_difficulty(difficulty).with_seed(self.search.seed);
        if let Some(driver) = &mut self.driver {
            driver.set_difficulty(difficulty);
        }
    }

    /// Path computed by the last finished analysis.
    #[must_use]
    pub fn best_path(&self) -> Option<&Path> {
        self.best_path.as_ref()
    }

    /// Statistics of the last finished analysis.
    #[must_use]
    pub fn last_stats(&self) -> &SearchStats {
        &self.last_stats
    }

    /// Clear the board for a new game, abandoning a running analysis.
    pub fn reset_game(&mut self) -> Result<(), EngineError> {
        self.cancel_analysis();
        self.board_mut()?.reset();
        self.best_path = None;
        Ok(())
    }

    pub fn apply_move(&mut self, direction: Direction, player: PlayerId) -> Result<(), EngineError> {
        self.board_mut()?.apply_move(direction, player)?;
        Ok(())
    }

    /// Apply a whole turn. Moves before a rejected one stay applied.
    pub fn apply_path(&mut self, path: &Path) -> Result<(), EngineError> {
        self.board_mut()?.apply_path(path)?;
        Ok(())
    }

    /// Log a round separator and put the ball back on the center point.
    pub fn next_round(&mut self) -> Result<(), EngineError> {
        self.board_mut()?.start_next_round();
        Ok(())
    }

    /// Start computing the computer's turn on a worker thread.
    ///
    /// The worker searches a copy of the board. The board stays readable
    /// but rejects moves until the ticket is resolved with
    /// [`SoccerEngine::finish_analysis`] or [`SoccerEngine::poll_analysis`],
    /// or the analysis is dropped with [`SoccerEngine::cancel_analysis`].
    pub fn start_analysis(&mut self) -> Result<AnalysisTicket, EngineError> {
        if self.pending.is_some() {
            return Err(EngineError::AnalysisInProgress);
        }
        let mut driver = self.take_driver();
        let mut board = self.board.clone();
        self.best_path = None;

        let id = self.next_ticket;
        self.next_ticket += 1;
        info!(ticket = id, player = %self.ai_player, difficulty = %self.search.difficulty, "analysis started");

        let (tx, rx) = channel();
        thread::spawn(move || {
            let path = driver.best_path(&mut board);
            if tx.send(AnalysisOutcome { driver, path }).is_err() {
                debug!(ticket = id, "analysis result discarded");
            }
        });

        let started = Instant::now();
        self.pending = Some(PendingAnalysis { id, receiver: rx, started });
        Ok(AnalysisTicket { id, started })
    }

    /// Block until the analysis of `ticket` finishes and return its path.
    pub fn finish_analysis(&mut self, ticket: AnalysisTicket) -> Result<Option<Path>, EngineError> {
        let received = self.pending_for(&ticket)?.receiver.recv();
        self.pending = None;
        match received {
            Ok(outcome) => Ok(self.restore(outcome, ticket.started)),
            Err(_) => {
                self.driver = Some(self.fresh_driver());
                Err(EngineError::WorkerDisconnected)
            }
        }
    }

    /// Check the analysis of `ticket` without blocking.
    ///
    /// Once `Finished` has been returned the ticket is spent; polling it
    /// again reports `StaleTicket`.
    pub fn poll_analysis(&mut self, ticket: &AnalysisTicket) -> Result<AnalysisState, EngineError> {
        let received = self.pending_for(ticket)?.receiver.try_recv();
        match received {
            Ok(outcome) => {
                self.pending = None;
                Ok(AnalysisState::Finished(self.restore(outcome, ticket.started)))
            }
            Err(TryRecvError::Empty) => Ok(AnalysisState::Running),
            Err(TryRecvError::Disconnected) => {
                self.pending = None;
                self.driver = Some(self.fresh_driver());
                Err(EngineError::WorkerDisconnected)
            }
        }
    }

    /// Abandon the running analysis, if any. Returns whether one was running.
    ///
    /// The worker finishes in the background and its result is discarded.
    pub fn cancel_analysis(&mut self) -> bool {
        let Some(pending) = self.pending.take() else {
            return false;
        };
        info!(ticket = pending.id, elapsed_ms = pending.started.elapsed().as_millis() as u64, "analysis cancelled");
        self.driver = Some(self.fresh_driver());
        true
    }

    /// Compute the computer's turn on the calling thread.
    pub fn compute_best_path(&mut self) -> Result<Option<Path>, EngineError> {
        if self.pending.is_some() {
            return Err(EngineError::AnalysisInProgress);
        }
        let mut driver = self.take_driver();
        let path = driver.best_path(&mut self.board);
        self.last_stats = driver.stats().clone();
        self.driver = Some(driver);
        self.best_path = path.clone();
        Ok(path)
    }

    fn pending_for(&self, ticket: &AnalysisTicket) -> Result<&PendingAnalysis, EngineError> {
        match &self.pending {
            Some(pending) if pending.id == ticket.id => Ok(pending),
            _ => Err(EngineError::StaleTicket(ticket.id)),
        }
    }

    fn take_driver(&mut self) -> SearchDriver {
        match self.driver.take() {
            Some(driver) => driver,
            None => self.fresh_driver(),
        }
    }

    fn fresh_driver(&self) -> SearchDriver {
        SearchDriver::new(self.search.clone(), self.ai_player)
    }

    fn restore(&mut self, outcome: AnalysisOutcome, started: Instant) -> Option<Path> {
        let AnalysisOutcome { mut driver, path } = outcome;
        if driver.difficulty() != self.search.difficulty {
            driver.set_difficulty(self.search.difficulty);
        }
        debug!(elapsed_ms = started.elapsed().as_millis() as u64, "analysis result received");

        self.last_stats = driver.stats().clone();
        self.driver = Some(driver);
        self.best_path = path.clone();
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn easy_engine() -> SoccerEngine {
        let config = AppConfig::default().with_difficulty(Difficulty::Easy);
        SoccerEngine::new(&config, PlayerId::Player2)
    }

    #[test]
    fn test_new_engine() {
        let engine = easy_engine();
        assert_eq!(engine.difficulty(), Difficulty::Easy);
        assert_eq!(engine.ai_player(), PlayerId::Player2);
        assert!(engine.path().is_empty());
        assert!(engine.best_path().is_none());
        assert!(!engine.is_analysing());
    }

    #[test]
    fn test_apply_move_errors_are_wrapped() {
        let mut engine = easy_engine();
        engine.apply_move(Direction::North, PlayerId::Player1).unwrap();
        let err = engine.apply_move(Direction::South, PlayerId::Player1).unwrap_err();
        assert!(matches!(err, EngineError::Move(MoveError::EdgeBlocked { .. })));
    }

    #[test]
    fn test_second_analysis_rejected() {
        let mut engine = easy_engine();
        let ticket = engine.start_analysis().unwrap();

        assert!(engine.is_analysing());
        assert!(matches!(engine.start_analysis(), Err(EngineError::AnalysisInProgress)));
        assert!(matches!(
            engine.apply_move(Direction::North, PlayerId::Player1),
            Err(EngineError::AnalysisInProgress)
        ));

        let path = engine.finish_analysis(ticket).unwrap();
        assert!(path.is_some());
        assert!(!engine.is_analysing());
    }

    #[test]
    fn test_board_readable_during_analysis() {
        let mut engine = easy_engine();
        engine.apply_move(Direction::West, PlayerId::Player1).unwrap();
        let before = engine.board().render();

        let ticket = engine.start_analysis().unwrap();
        assert_eq!(engine.board().render(), before);
        assert_eq!(engine.path().len(), 1);

        engine.finish_analysis(ticket).unwrap();
        assert_eq!(engine.board().render(), before);
    }

    #[test]
    fn test_dropped_ticket_then_new_game() {
        let mut engine = easy_engine();
        engine.apply_move(Direction::North, PlayerId::Player1).unwrap();
        let ticket = engine.start_analysis().unwrap();
        drop(ticket);
        thread::sleep(Duration::from_millis(50));

        engine.reset_game().unwrap();
        assert!(!engine.is_analysing());
        assert!(engine.path().is_empty());
        assert_eq!(engine.board().render(), Board::standard().render());

        let ticket = engine.start_analysis().unwrap();
        assert!(engine.finish_analysis(ticket).unwrap().is_some());
    }

    #[test]
    fn test_cancel_analysis() {
        let mut engine = easy_engine();
        assert!(!engine.cancel_analysis());

        let ticket = engine.start_analysis().unwrap();
        assert!(engine.cancel_analysis());
        assert!(!engine.is_analysing());
        assert!(matches!(engine.poll_analysis(&ticket), Err(EngineError::StaleTicket(_))));

        engine.apply_move(Direction::East, PlayerId::Player1).unwrap();
        assert!(engine.compute_best_path().unwrap().is_some());
    }

    #[test]
    fn test_old_ticket_cannot_resolve_new_analysis() {
        let mut engine = easy_engine();
        let first = engine.start_analysis().unwrap();
        engine.finish_analysis(first).unwrap();

        let second = engine.start_analysis().unwrap();
        assert_ne!(first.id(), second.id());
        assert!(matches!(engine.finish_analysis(first), Err(EngineError::StaleTicket(_))));
        assert!(engine.is_analysing());
        engine.finish_analysis(second).unwrap();
    }

    #[test]
    fn test_poll_until_finished() {
        let mut engine = easy_engine();
        let ticket = engine.start_analysis().unwrap();

        let path = loop {
            match engine.poll_analysis(&ticket).unwrap() {
                AnalysisState::Running => thread::sleep(Duration::from_millis(5)),
                AnalysisState::Finished(path) => break path,
            }
        };
        assert_eq!(engine.best_path(), path.as_ref());
        assert!(matches!(engine.poll_analysis(&ticket), Err(EngineError::StaleTicket(_))));
    }

    #[test]
    fn test_difficulty_change_during_analysis_applies_after() {
        let mut engine = easy_engine();
        let ticket = engine.start_analysis().unwrap();
        engine.set_difficulty(Difficulty::Hard);
        engine.finish_analysis(ticket).unwrap();

        assert_eq!(engine.difficulty(), Difficulty::Hard);
        assert_eq!(engine.driver.as_ref().unwrap().difficulty(), Difficulty::Hard);
    }

    #[test]
    fn test_next_round_and_reset() {
        let mut engine = easy_engine();
        engine.apply_move(Direction::East, PlayerId::Player1).unwrap();
        engine.next_round().unwrap();
        assert_eq!(engine.board().current(), engine.board().center());
        assert_eq!(engine.path().len(), 2);

        engine.reset_game().unwrap();
        assert!(engine.path().is_empty());
    }
}
