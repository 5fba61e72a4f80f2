//! Quiescence search: extends the main search past the horizon along capture
//! sequences only, to avoid misjudging positions where a capture is pending.
//!
//! Statically evaluating a leaf node directly suffers from the horizon effect:
//! a position where White is up a queen because of a pending Queen x Pawn
//! looks winning, when right over the horizon is Pawn x Queen. Quiescence
//! keeps searching captures from a leaf until the position is "quiet".

use crate::coretypes::{Cp, PlyKind, MAX_DEPTH};
use crate::eval;
use crate::movelist::{MoveInfoList, MoveList};
use crate::search::negamax::{Aborted, SearchContext};
use crate::transposition::{Entry, NodeKind};
use crate::zobrist::HashKind;
use crate::Position;

/// How many plies quiescence is allowed to recurse past the main search's
/// horizon, independent of (and always reached well before) `MAX_DEPTH`.
/// Without this, a long forced capture sequence near the absolute ply cap
/// could run quiescence all the way out to `MAX_DEPTH` instead of stopping
/// once the position has had a fair chance to go quiet.
const MAX_QUIESCENCE_DEPTH: PlyKind = 30;

/// Searches `position` along capturing moves only, returning a score relative
/// to the player to move. Stand-pat is always a legal "move": a side is never
/// forced to capture if remaining quiet is better.
///
/// `q_depth` counts plies since quiescence was entered from the main search's
/// horizon, separately from `ply_from_root`, which counts plies from the root
/// of the whole search.
pub(crate) fn quiescence(
    position: &mut Position,
    ctx: &mut SearchContext,
    hash: HashKind,
    ply_from_root: PlyKind,
    q_depth: PlyKind,
    mut alpha: Cp,
    beta: Cp,
) -> Result<Cp, Aborted> {
    ctx.poll(true)?;

    if ctx.history.contains(hash) || *position.halfmoves() >= 100 {
        return Ok(Cp::STALEMATE);
    }

    if let Some(entry) = ctx.tt.get(hash) {
        ctx.tt_hits += 1;
        let usable = match entry.node_kind {
            NodeKind::Pv => true,
            NodeKind::Cut => entry.score >= beta,
            NodeKind::All => entry.score <= alpha,
        };
        if usable {
            ctx.tt_cuts += 1;
            return Ok(entry.score.mate_distance());
        }
    }

    // Checkmate/stalemate must be detected before trusting a static
    // evaluation: an ordinary eval of a mated position is meaningless and
    // could otherwise wrongly cut off on stand-pat.
    let raw_moves = position.get_legal_moves();
    if raw_moves.is_empty() {
        return Ok(eval::terminal(position).mate_distance());
    }

    let stand_pat = eval::evaluate(position);
    if ply_from_root >= MAX_DEPTH || q_depth >= MAX_QUIESCENCE_DEPTH {
        return Ok(stand_pat.mate_distance());
    }
    if stand_pat >= beta {
        return Ok(stand_pat.mate_distance());
    }
    if stand_pat > alpha {
        alpha = stand_pat;
    }

    let legal_moves: MoveInfoList = raw_moves
        .into_iter()
        .map(|move_| position.move_info(move_))
        .collect();
    let move_list = MoveList::generate_captures_only(legal_moves);

    let mut best_score = stand_pat;
    let mut best_move = None;

    for move_info in move_list.iter().copied() {
        let move_ = move_info.move_();
        let cache = position.cache();
        let applied = position.do_move(move_);
        let mut child_hash = hash;
        ctx.tt.update_hash(&mut child_hash, position, applied, cache);
        ctx.history.push(child_hash, applied.is_unrepeatable());

        let score = -quiescence(
            position,
            ctx,
            child_hash,
            ply_from_root + 1,
            q_depth + 1,
            -beta,
            -alpha,
        )?;

        ctx.history.pop();
        position.undo_move(applied);

        if score > best_score {
            best_score = score;
            best_move = Some(move_);
        }

        if score >= beta {
            let generation = ctx.tt.generation();
            ctx.tt.replace_by(
                Entry::new(hash, move_, score, 0, NodeKind::Cut),
                generation,
                |new, new_age, existing, existing_age| {
                    existing.hash != new.hash || existing_age != new_age
                },
            );
            return Ok(score.mate_distance());
        }

        if score > alpha {
            alpha = score;
        }
    }

    if let Some(best_move) = best_move {
        let node_kind = if best_score > stand_pat {
            NodeKind::Pv
        } else {
            NodeKind::All
        };
        let generation = ctx.tt.generation();
        ctx.tt.replace_by(
            Entry::new(hash, best_move, best_score, 0, node_kind),
            generation,
            |new, new_age, existing, existing_age| {
                existing.hash != new.hash || existing_age != new_age
            },
        );
    }

    Ok(best_score.mate_distance())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fen::Fen;
    use crate::movelist::Killers;
    use crate::search::History;
    use crate::timeman::Mode;
    use crate::transposition::TranspositionTable;
    use std::sync::atomic::AtomicBool;
    use std::sync::Arc;

    fn run_quiescence(position: Position) -> Cp {
        let tt = TranspositionTable::new();
        let mut history = History::empty();
        let mut killers = Killers::new(MAX_DEPTH);
        let mode = Mode::depth(1, None);
        let stopper = Arc::new(AtomicBool::new(false));
        let mut ctx = SearchContext {
            tt: &tt,
            history: &mut history,
            killers: &mut killers,
            stopper: &stopper,
            mode: &mode,
            root_player: *position.player(),
            depth: 1,
            nodes: 0,
            q_nodes: 0,
            tt_hits: 0,
            tt_cuts: 0,
        };
        let hash = tt.generate_hash(&position);
        let mut position = position;
        quiescence(&mut position, &mut ctx, hash, 0, 0, Cp::MIN, Cp::MAX)
            .ok()
            .unwrap()
    }

    #[test]
    fn stand_pat_used_when_no_captures_available() {
        let position = Position::parse_fen("4k3/8/8/8/8/8/8/4K3 b - - 0 1").unwrap();
        let score = run_quiescence(position);
        assert_eq!(score, Cp::STALEMATE);
    }

    #[test]
    fn takes_a_free_hanging_queen() {
        let position = Position::parse_fen("4k3/8/8/3q4/4R3/8/8/4K3 w - - 0 1").unwrap();
        let score = run_quiescence(position);
        assert!(score > Cp(0));
    }
}
