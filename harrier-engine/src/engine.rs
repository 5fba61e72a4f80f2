//! Engine struct acts as a simplified API for the various parts of the harrier engine.
//!
//! An `Engine` owns the current `Game`, a shared transposition table, and the
//! `AtomicBool` flag used to tell an in-progress search to stop early. Only one
//! search may run at a time; `search` spawns it on its own thread and returns
//! immediately, `wait` blocks until it finishes.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread::JoinHandle;

use crate::error::{self, ErrorKind};
use crate::game::Game;
use crate::movegen::magic;
use crate::search::{self, SearchResult};
use crate::timeman::Mode;
use crate::transposition::TranspositionTable;

/// Builds an `Engine` with a chosen starting game, transposition table size, and debug mode.
pub struct EngineBuilder {
    game: Game,
    transpositions_mb: usize,
    threads: usize,
    debug: bool,
}

impl EngineBuilder {
    /// Default Hash size in MB, matches UCI's default `Hash` option.
    const DEFAULT_TRANSPOSITIONS_MB: usize = 32;

    pub fn new() -> Self {
        Self {
            game: Game::start_position(),
            transpositions_mb: Self::DEFAULT_TRANSPOSITIONS_MB,
            threads: 1,
            debug: false,
        }
    }

    pub fn game(mut self, game: Game) -> Self {
        self.game = game;
        self
    }

    pub fn transpositions_mb(mut self, mb: usize) -> Self {
        self.transpositions_mb = mb;
        self
    }

    pub fn threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn build(self) -> Engine {
        // Builds the magic bitboard attack tables now, on this thread, so
        // the spawned search thread only ever reads an already-built table.
        magic::init();
        Engine {
            game: self.game,
            tt: Arc::new(TranspositionTable::with_mb(self.transpositions_mb)),
            _threads: self.threads,
            debug: self.debug,
            stopper: Arc::new(AtomicBool::new(false)),
            search_handle: None,
        }
    }
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Owns the engine's current game and shared search state, and drives searches on their own thread.
pub struct Engine {
    game: Game,
    tt: Arc<TranspositionTable>,
    _threads: usize,
    debug: bool,
    stopper: Arc<AtomicBool>,
    search_handle: Option<JoinHandle<()>>,
}

impl Engine {
    /// Returns true if a search is currently running.
    fn is_searching(&self) -> bool {
        match &self.search_handle {
            Some(handle) => !handle.is_finished(),
            None => false,
        }
    }

    /// Joins a finished search thread's handle, if any is left over from a prior search.
    fn reap_finished(&mut self) {
        if let Some(handle) = &self.search_handle {
            if handle.is_finished() {
                self.search_handle.take().unwrap().join().unwrap();
            }
        }
    }

    /// Begin a new game. Clears the transposition table so no information from
    /// a prior game carries over. Fails if a search is currently using the table.
    pub fn new_game(&mut self) -> error::Result<()> {
        self.try_clear_transpositions()?;
        self.game = Game::start_position();
        Ok(())
    }

    /// Signal any active search to stop as soon as possible.
    pub fn stop(&self) {
        self.stopper.store(true, Ordering::SeqCst);
    }

    /// Sets whether extra `info string` debugging output is produced by searches.
    pub fn set_debug(&mut self, debug: bool) {
        self.debug = debug;
    }

    /// Replaces the transposition table with one sized to `mb` megabytes.
    /// Fails with `EngineTranspositionTableInUse` if a search is still holding a reference.
    pub fn try_set_transpositions_mb(&mut self, mb: usize) -> error::Result<usize> {
        self.reap_finished();
        let tt = Arc::get_mut(&mut self.tt).ok_or(ErrorKind::EngineTranspositionTableInUse)?;
        Ok(tt.set_mb(mb))
    }

    /// Clears all entries from the transposition table.
    /// Fails with `EngineTranspositionTableInUse` if a search is still holding a reference.
    pub fn try_clear_transpositions(&mut self) -> error::Result<()> {
        self.reap_finished();
        let tt = Arc::get_mut(&mut self.tt).ok_or(ErrorKind::EngineTranspositionTableInUse)?;
        tt.clear();
        Ok(())
    }

    /// Sets the game the engine's next search will be run on.
    pub fn set_game(&mut self, game: Game) {
        self.game = game;
    }

    /// Starts a search of the current game on its own thread, under the given `Mode`.
    /// The result is sent over `sender` once the search completes.
    /// Fails with `EngineAlreadySearching` if a search is already running.
    pub fn search<T>(&mut self, mode: Mode, sender: Sender<T>) -> error::Result<()>
    where
        T: 'static + Send + From<SearchResult>,
    {
        if self.is_searching() {
            return Err(ErrorKind::EngineAlreadySearching.into());
        }
        self.reap_finished();

        self.stopper.store(false, Ordering::SeqCst);
        let handle = search::search_nonblocking(
            self.game.clone(),
            mode,
            Arc::clone(&self.tt),
            Arc::clone(&self.stopper),
            self.debug,
            sender,
        );
        self.search_handle = Some(handle);
        Ok(())
    }

    /// Blocks until any active search thread finishes.
    pub fn wait(&mut self) {
        if let Some(handle) = self.search_handle.take() {
            handle.join().unwrap();
        }
    }

    /// Signals any active search to stop and waits for it to finish.
    pub fn shutdown(&mut self) {
        self.stop();
        self.wait();
    }
}
