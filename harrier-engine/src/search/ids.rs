//! Iterative deepening search: repeatedly searches the same position at
//! increasing depth, reusing the transposition table and killer moves
//! accumulated by shallower iterations to order moves better at each new one.

use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Instant;

use crate::coretypes::MAX_DEPTH;
use crate::movelist::{Killers, Line};
use crate::search::history::History;
use crate::search::negamax::{negamax, SearchContext};
use crate::search::SearchResult;
use crate::timeman::Mode;
use crate::transposition::TranspositionTable;
use crate::Position;

/// Runs iterative deepening on `position`, starting at depth 1 and continuing
/// until `mode` signals to stop or `MAX_DEPTH` is reached, returning the
/// result of the last fully-completed iteration.
pub fn ids(
    position: Position,
    mode: Mode,
    history: History,
    tt: &TranspositionTable,
    stopper: Arc<AtomicBool>,
    debug: bool,
) -> SearchResult {
    // Bumps the table's generation so entries left over from a previous `ids`
    // call become unconditionally replaceable, and shrinks the active limit
    // back down if the previous search didn't need much of it.
    tt.start_new_search();

    let root_player = *position.player();
    let mut history = history;
    let mut killers = Killers::new(MAX_DEPTH);

    let mut result = SearchResult {
        player: root_player,
        ..SearchResult::default()
    };

    let start = Instant::now();

    for depth in 1..=MAX_DEPTH as u32 {
        if stopper.load(std::sync::atomic::Ordering::Relaxed) || mode.stop(root_player, depth) {
            result.stopped = true;
            break;
        }

        let mut position = position;
        let mut ctx = SearchContext {
            tt,
            history: &mut history,
            killers: &mut killers,
            stopper: &stopper,
            mode: &mode,
            root_player,
            depth,
            nodes: 0,
            q_nodes: 0,
            tt_hits: 0,
            tt_cuts: 0,
        };

        let hash = tt.generate_hash(&position);
        let mut pv_line = Line::new();
        let iteration_start = Instant::now();
        let search_result = negamax(
            &mut position,
            &mut ctx,
            hash,
            depth as crate::coretypes::PlyKind,
            0,
            crate::coretypes::Cp::MIN,
            crate::coretypes::Cp::MAX,
            &mut pv_line,
        );

        let score = match search_result {
            Ok(score) => score,
            Err(_aborted) => {
                result.stopped = true;
                break;
            }
        };

        if pv_line.is_empty() {
            result.stopped = true;
            break;
        }

        result.best_move = pv_line[0];
        result.score = score * root_player.sign();
        result.pv = pv_line;
        result.depth = depth;
        result.nodes = ctx.nodes;
        result.q_nodes = ctx.q_nodes;
        result.tt_hits = ctx.tt_hits;
        result.tt_cuts = ctx.tt_cuts;
        result.elapsed = start.elapsed();
        // No dedicated quiescence timer is kept; approximate its share of the
        // iteration from its share of visited nodes.
        let q_fraction = if ctx.nodes == 0 {
            0.0
        } else {
            ctx.q_nodes as f64 / ctx.nodes as f64
        };
        result.q_elapsed = iteration_start.elapsed().mul_f64(q_fraction);

        if debug {
            log::info!(
                "info depth {} score cp {} nodes {} nps {:.0} pv {}",
                result.depth,
                result.relative_score().0,
                result.nodes,
                result.nps(),
                crate::arrayvec::display(&result.pv),
            );
        }

        if score.is_mate() {
            break;
        }
    }

    result.elapsed = start.elapsed();
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fen::Fen;
    use crate::Move;

    #[test]
    fn completes_shallow_search_from_start_position() {
        let position = Position::start_position();
        let tt = TranspositionTable::new();
        let history = History::new(&position.into(), tt.zobrist_table());
        let mode = Mode::depth(3, None);
        let stopper = Arc::new(AtomicBool::new(false));

        let result = ids(position, mode, history, &tt, stopper, false);

        assert!(!result.stopped);
        assert_eq!(result.depth, 3);
        assert!(result.nodes > 0);
        assert_ne!(result.best_move, Move::illegal());
    }

    #[test]
    fn finds_mate_in_two_plies() {
        let position = Position::parse_fen("6k1/8/6K1/8/8/8/8/R7 w - - 0 1").unwrap();
        let tt = TranspositionTable::new();
        let history = History::new(&position.into(), tt.zobrist_table());
        let mode = Mode::depth(3, None);
        let stopper = Arc::new(AtomicBool::new(false));

        let result = ids(position, mode, history, &tt, stopper, false);

        assert!(result.absolute_score().is_mate());
    }
}
