//! Negamax search: alpha-beta pruning with principal-variation scouting,
//! null-move reduction, check extension, and transposition-table
//! consultation/storage.

use std::cmp;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::coretypes::{Cp, PlyKind, MAX_DEPTH};
use crate::eval;
use crate::movelist::{is_killer_eligible, Killers, MoveInfoList, MoveList};
use crate::search::history::History;
use crate::search::quiescence::quiescence;
use crate::timeman::Mode;
use crate::transposition::{Entry, NodeKind, TranspositionTable};
use crate::zobrist::HashKind;
use crate::Position;

/// How often, in visited nodes, the search polls the stop flag and clock.
pub(crate) const DEADLINE_CHECK_INTERVAL: u64 = 4096;

/// Null-move reduction amount (`R` in the literature).
const NULL_MOVE_R: PlyKind = 2;
/// Extra reduction applied to the working depth when a null-move search fails high.
const NULL_MOVE_VERIFICATION_REDUCTION: PlyKind = 4;

/// Raised internally when the stop flag or clock fires mid-search, unwinding
/// the recursion back to the iterative-deepening driver without disturbing
/// the position, history, or transposition table along the way.
pub(crate) struct Aborted;

/// Mutable state threaded through every node of a single `ids` call.
/// Lives for the whole iterative-deepening search, not just one iteration,
/// so that node counts and killer moves accumulate across depths.
pub(crate) struct SearchContext<'a> {
    pub tt: &'a TranspositionTable,
    pub history: &'a mut History,
    pub killers: &'a mut Killers,
    pub stopper: &'a Arc<AtomicBool>,
    pub mode: &'a Mode,
    pub root_player: crate::coretypes::Color,
    pub depth: u32,
    pub nodes: u64,
    pub q_nodes: u64,
    pub tt_hits: u64,
    pub tt_cuts: u64,
}

impl<'a> SearchContext<'a> {
    /// Polls the stop flag and the active time/depth mode, returning true if
    /// the in-flight iteration must be abandoned.
    fn should_abort(&self) -> bool {
        self.stopper.load(Ordering::Relaxed) || self.mode.stop(self.root_player, self.depth)
    }

    /// Called once per visited node; returns `Err(Aborted)` every
    /// `DEADLINE_CHECK_INTERVAL` nodes if the search must stop.
    pub(crate) fn poll(&mut self, nodes_is_quiescence: bool) -> Result<(), Aborted> {
        self.nodes += 1;
        if nodes_is_quiescence {
            self.q_nodes += 1;
        }
        if self.nodes % DEADLINE_CHECK_INTERVAL == 0 && self.should_abort() {
            return Err(Aborted);
        }
        Ok(())
    }
}

/// Searches `position` to `ply_remaining` plies, returning a score relative
/// to the player to move, and filling `pv_line` with the best continuation.
///
/// `ply_from_root` counts plies already played from the position `ids` was
/// called with, used for repetition detection and the `MAX_DEPTH` quiescence
/// bound; `hash` is the Zobrist hash of `position`, maintained incrementally.
pub(crate) fn negamax(
    position: &mut Position,
    ctx: &mut SearchContext,
    hash: HashKind,
    ply_remaining: PlyKind,
    ply_from_root: PlyKind,
    mut alpha: Cp,
    beta: Cp,
    pv_line: &mut crate::movelist::Line,
) -> Result<Cp, Aborted> {
    ctx.poll(false)?;

    if ply_remaining == 0 || ply_from_root >= MAX_DEPTH {
        pv_line.clear();
        return quiescence(position, ctx, hash, ply_from_root, 0, alpha, beta);
    }

    if ply_from_root > 0 {
        if ctx.history.contains(hash) || *position.halfmoves() >= 100 {
            pv_line.clear();
            return Ok(Cp::STALEMATE);
        }
    }

    let original_ply_remaining = ply_remaining;
    let mut ply_remaining = ply_remaining;

    let mut tt_move = None;
    if let Some(entry) = ctx.tt.get(hash) {
        ctx.tt_hits += 1;
        tt_move = Some(entry.key_move);
        if entry.ply >= ply_remaining {
            let usable = match entry.node_kind {
                NodeKind::Pv => true,
                NodeKind::Cut => entry.score >= beta,
                NodeKind::All => entry.score <= alpha,
            };
            if usable {
                ctx.tt_cuts += 1;
                pv_line.clear();
                pv_line.push(entry.key_move);
                return Ok(entry.score.mate_distance());
            }
        }
    }

    let in_check = position.is_in_check();
    if in_check {
        ply_remaining = ply_remaining.saturating_add(1);
    }

    // Null-move reduction: skip our move entirely and let the opponent move
    // twice in a row. If they still can't escape beta, this position is so
    // good that a full search would only confirm it; prune it.
    if !in_check && ply_from_root > 0 && ply_remaining >= NULL_MOVE_R + 1 {
        let null_cache = position.do_null_move();
        let null_hash = null_move_hash(ctx.tt, hash, null_cache.en_passant);
        ctx.history.push(null_hash, false);

        let mut unused_pv = crate::movelist::Line::new();
        let null_score = -negamax(
            position,
            ctx,
            null_hash,
            ply_remaining - NULL_MOVE_R - 1,
            ply_from_root + 1,
            -beta,
            -beta + Cp(1),
            &mut unused_pv,
        )?;

        ctx.history.pop();
        position.undo_null_move(null_cache);

        if null_score >= beta {
            let reduced = ply_remaining.saturating_sub(NULL_MOVE_VERIFICATION_REDUCTION);
            ply_remaining = cmp::max(reduced, 1);
        }
    }

    let raw_moves = position.get_legal_moves();
    if raw_moves.is_empty() {
        pv_line.clear();
        return Ok(eval::terminal(position).mate_distance());
    }

    let legal_moves: MoveInfoList = raw_moves
        .into_iter()
        .map(|move_| position.move_info(move_))
        .collect();

    let killer_slots = ctx.killers.get(ply_from_root as usize);
    let move_list = MoveList::generate(legal_moves, killer_slots);

    // Consult the TT move first (validated implicitly: if stale/illegal for
    // this position, `do_move` below would panic on a from-square with no
    // piece, so only trust it when it also appears in the generated list).
    let ordered: Vec<_> = {
        let mut first: Vec<_> = Vec::new();
        let mut rest: Vec<_> = Vec::new();
        for move_info in move_list.iter().copied() {
            if Some(move_info.move_()) == tt_move {
                first.push(move_info);
            } else {
                rest.push(move_info);
            }
        }
        first.extend(rest);
        first
    };

    let mut best_score = Cp::MIN;
    let mut best_move = ordered[0].move_();
    let mut local_pv = crate::movelist::Line::new();
    let mut raised_alpha = false;
    let mut node_kind = NodeKind::All;

    for move_info in ordered {
        let move_ = move_info.move_();
        let cache = position.cache();
        let applied = position.do_move(move_);
        let mut child_hash = hash;
        ctx.tt.update_hash(&mut child_hash, position, applied, cache);
        ctx.history.push(child_hash, applied.is_unrepeatable());

        let score = if !raised_alpha {
            -negamax(
                position,
                ctx,
                child_hash,
                ply_remaining - 1,
                ply_from_root + 1,
                -beta,
                -alpha,
                &mut local_pv,
            )?
        } else {
            let scout = -negamax(
                position,
                ctx,
                child_hash,
                ply_remaining - 1,
                ply_from_root + 1,
                -alpha - Cp(1),
                -alpha,
                &mut local_pv,
            )?;
            if scout > alpha && scout < beta {
                -negamax(
                    position,
                    ctx,
                    child_hash,
                    ply_remaining - 1,
                    ply_from_root + 1,
                    -beta,
                    -alpha,
                    &mut local_pv,
                )?
            } else {
                scout
            }
        };

        ctx.history.pop();
        position.undo_move(applied);

        if score > best_score {
            best_score = score;
            best_move = move_;
        }

        if score >= beta {
            if is_killer_eligible(&move_info) {
                ctx.killers.store(ply_from_root as usize, move_);
            }
            node_kind = NodeKind::Cut;
            best_score = score;
            best_move = move_;
            break;
        }

        if score > alpha {
            alpha = score;
            raised_alpha = true;
            node_kind = NodeKind::Pv;
            pv_line.clear();
            pv_line.push(move_);
            pv_line.try_extend_from_slice(&local_pv).ok();
        }
    }

    let generation = ctx.tt.generation();
    ctx.tt.replace_by(
        Entry::new(hash, best_move, best_score, original_ply_remaining, node_kind),
        generation,
        |new, new_age, existing, existing_age| {
            existing.hash != new.hash || existing_age != new_age || new.ply >= existing.ply
        },
    );

    Ok(best_score.mate_distance())
}

/// Computes the Zobrist hash for the position reached by a null move, by
/// toggling the side-to-move key and the en-passant key of the square that
/// was cleared, without walking a `MoveInfo`.
fn null_move_hash(
    tt: &TranspositionTable,
    hash: HashKind,
    old_ep: Option<crate::coretypes::Square>,
) -> HashKind {
    let ztable = tt.zobrist_table();
    let mut new_hash = hash ^ ztable.player_hash;
    if let Some(ep_square) = old_ep {
        new_hash ^= ztable[ep_square.file()];
    }
    new_hash
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coretypes::Color;
    use crate::fen::Fen;
    use crate::movelist::{Killers, Line};
    use crate::search::History;
    use crate::timeman::Mode;
    use crate::transposition::TranspositionTable;
    use std::sync::atomic::AtomicBool;
    use std::sync::Arc;

    fn search_to_depth(position: Position, ply: PlyKind) -> (Cp, Line) {
        let tt = TranspositionTable::new();
        let mut history = History::empty();
        let mut killers = Killers::new(MAX_DEPTH);
        let mode = Mode::depth(ply as u32, None);
        let stopper = Arc::new(AtomicBool::new(false));
        let mut ctx = SearchContext {
            tt: &tt,
            history: &mut history,
            killers: &mut killers,
            stopper: &stopper,
            mode: &mode,
            root_player: *position.player(),
            depth: ply as u32,
            nodes: 0,
            q_nodes: 0,
            tt_hits: 0,
            tt_cuts: 0,
        };
        let hash = tt.generate_hash(&position);
        let mut position = position;
        let mut pv = Line::new();
        let score = negamax(&mut position, &mut ctx, hash, ply, 0, Cp::MIN, Cp::MAX, &mut pv).ok().unwrap();
        (score, pv)
    }

    #[test]
    fn finds_mate_in_one() {
        // Rook ladder mate: Ra7 seals the 7th rank, Rb6-b8# seals the 8th.
        let position = Position::parse_fen("6k1/R7/1R6/8/8/8/8/4K3 w - - 0 1").unwrap();
        let (score, pv) = search_to_depth(position, 1);
        assert!(score.is_mate());
        assert_eq!(score.leading(), Some(Color::White));
        assert_eq!(
            *pv.get(0).unwrap(),
            crate::coretypes::Move::new(
                crate::coretypes::Square::B6,
                crate::coretypes::Square::B8,
                None,
            )
        );
    }

    #[test]
    fn prefers_king_captures_queen() {
        let position = Position::parse_fen("4K3/4q3/8/8/8/2k5/8/8 w - - 0 1").unwrap();
        let (_, pv) = search_to_depth(position, 3);
        assert_eq!(*pv.get(0).unwrap(), crate::coretypes::Move::new(
            crate::coretypes::Square::E8,
            crate::coretypes::Square::E7,
            None,
        ));
    }
}
