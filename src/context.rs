//! Parse Context (spec §4.B): position, memo table, cut stack, committed
//! window, and the snapshot/restore checkpointing every evaluator relies on.
//!
//! Grounded on `peglib`'s `Context.h` for the shape of `state()`/`reset()`
//! and the `ruleState` memo lookup, generalized to the callback-based
//! (non-vector-capture) revision spec.md §9 calls out as the one to build.

use std::collections::{BTreeMap, HashMap};

use by_address::ByAddress;
use tracing::{debug, trace};

use crate::input::{Element, InputSource, Position};
use crate::rule::{Rule, RuleState};

type RuleKey<E> = ByAddress<Rule<E>>;

/// A checkpoint of everything an evaluator must restore on local failure
/// (spec §3's "Context state snapshot").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Snapshot {
    position: Position,
}

#[derive(Debug, Clone, Copy)]
struct CutFrame {
    marker_pos: Position,
    cut_triggered: bool,
}

/// Owns one parse's worth of mutable state. Not `Sync`/shareable across
/// threads (spec §5) — a fresh `Context` belongs to exactly one parse.
pub struct Context<E: Element> {
    source: Box<dyn InputSource<E>>,
    position: Position,
    memo: BTreeMap<Position, HashMap<RuleKey<E>, RuleState>>,
    cut_stack: Vec<CutFrame>,
    committed_boundary: Position,
}

impl<E: Element> Context<E> {
    pub fn new(source: Box<dyn InputSource<E>>) -> Self {
        Context {
            source,
            position: 0,
            memo: BTreeMap::new(),
            cut_stack: Vec::new(),
            committed_boundary: 0,
        }
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn committed_boundary(&self) -> Position {
        self.committed_boundary
    }

    pub fn at_end(&self) -> bool {
        self.position >= self.source.len()
    }

    pub fn source_len(&self) -> usize {
        self.source.len()
    }

    /// The element at the current position, without consuming it.
    pub fn peek(&mut self) -> Option<E> {
        let pos = self.position;
        self.source.dereference(pos)
    }

    /// Consumes one element. A no-op at end (spec §4.B).
    pub fn advance(&mut self) {
        if self.position < self.source.len() {
            self.position += 1;
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot { position: self.position }
    }

    /// Restores a checkpoint. Panics if `snapshot` is below the committed
    /// window — spec §7 calls this a programmer-error invariant violation,
    /// never a silently-swallowed condition.
    pub fn restore(&mut self, snapshot: Snapshot) {
        assert!(
            snapshot.position >= self.committed_boundary,
            "restore to position {} below committed boundary {}",
            snapshot.position,
            self.committed_boundary
        );
        self.position = snapshot.position;
    }

    /// Looks up (or seeds) the memo cell for `(rule, pos)`. Returns
    /// `fresh = true` when the entry was just created — the caller enters
    /// the grow-seed loop in that case (spec §4.E step 1/3).
    pub fn rule_state(&mut self, rule: &Rule<E>, pos: Position) -> (bool, RuleState) {
        let by_pos = self.memo.entry(pos).or_default();
        let key = ByAddress(rule.clone());
        let mut fresh = false;
        let state = by_pos.entry(key).or_insert_with(|| {
            fresh = true;
            RuleState { last_pos: pos, last_return: false }
        });
        (fresh, *state)
    }

    pub fn update_rule_state(&mut self, rule: &Rule<E>, pos: Position, state: RuleState) {
        self.memo.entry(pos).or_default().insert(ByAddress(rule.clone()), state);
    }

    pub fn enter_cut_frame(&mut self) {
        self.cut_stack.push(CutFrame { marker_pos: self.position, cut_triggered: false });
    }

    /// Pops the current cut frame. If a `cut` fired inside it, advances
    /// the committed-window boundary to the cut's marker and purges every
    /// memo outer-key strictly below it (spec §3's cut-stack invariant,
    /// §4.B's `leave_cut_frame`).
    pub fn leave_cut_frame(&mut self) {
        let frame = self.cut_stack.pop().expect("leave_cut_frame without matching enter");
        if frame.cut_triggered {
            let new_boundary = frame.marker_pos.max(self.committed_boundary);
            if new_boundary > self.committed_boundary {
                self.committed_boundary = new_boundary;
                let retained = self.memo.split_off(&new_boundary);
                let purged = self.memo.len();
                self.memo = retained;
                debug!(boundary = new_boundary, purged_positions = purged, "cut committed");
                self.source.release_before(new_boundary);
            }
        }
    }

    /// Marks the enclosing cut frame committed at the current position
    /// (spec §4.C's `Cut` primitive).
    pub fn set_cut(&mut self) {
        if let Some(frame) = self.cut_stack.last_mut() {
            frame.marker_pos = self.position;
            frame.cut_triggered = true;
            trace!(pos = self.position, "cut point reached");
        }
    }

    pub fn cut_triggered(&self) -> bool {
        self.cut_stack.last().map(|f| f.cut_triggered).unwrap_or(false)
    }

    /// Sets the position directly, without `restore`'s committed-boundary
    /// assertion. Reserved for the grow-seed protocol (`rule.rs`), which
    /// only ever seeks to a `last_pos` recorded from a position that was
    /// itself already valid — never to an arbitrary caller-supplied value.
    pub(crate) fn seek(&mut self, pos: Position) {
        self.position = pos;
    }
}
