// Copyright 2016 Vincent Vigneron. See the COPYRIGHT
// file at the top-level directory of this distribution.
//
// Licensed under the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at.your option.
// This file may not be copied, modified, or distributed
// except according to those terms.

//! Runtime matching: a per-run active-state frontier that consumes symbols
//! one at a time against a [`Nfa`](crate::graph::Nfa).
//!
//! The frontier is a single growable array shared by every nesting level of
//! a match in progress; each level is identified not by its own container
//! but by the index of its head entry, with sibling entries linked through
//! an explicit `next` field (an intrusive list-in-array, mirroring how the
//! graph itself links transitions). This keeps activating a state, closing
//! over its epsilon transitions, and spinning up a nested sub-frontier all
//! O(1) allocations instead of one `Vec` per nesting level.

use itertools::Itertools;
use log::{debug, trace};

use crate::graph::{Nfa, State, StateId, START};
use crate::symbol::Symbol;

#[derive(Copy, Clone)]
struct FrontierEntry {
    state: State,
    next: Option<u32>,
    nested: Option<u32>,
}

/// A single run of matching against an [`Nfa`](crate::graph::Nfa).
///
/// Borrows the graph for the matcher's lifetime; the graph is read-only from
/// here on. Create one with [`start_match`](Matcher::start_match) or
/// [`start_match_at`](Matcher::start_match_at) and drive it with
/// [`process`](Matcher::process).
pub struct Matcher<'a, T: Symbol, D = ()> {
    nfa: &'a Nfa<T, D>,
    frontier: Vec<FrontierEntry>,
    first_active: Option<u32>,
}

impl<'a, T: Symbol, D: Default> Matcher<'a, T, D> {
    /// Starts a match at the graph's implicit `Start` state.
    pub fn start_match(nfa: &'a Nfa<T, D>) -> Self {
        Self::start_match_at(nfa, START)
    }

    /// Starts a match at an arbitrary state, useful for re-entering a
    /// sub-automaton independently of its enclosing graph.
    pub fn start_match_at(nfa: &'a Nfa<T, D>, state: StateId) -> Self {
        trace!("start_match_at S{}", state);
        let mut matcher = Matcher {
            nfa,
            frontier: Vec::new(),
            first_active: None,
        };
        matcher.first_active = matcher.mark_active(None, State::Id(state));
        matcher
    }

    /// True iff the top-level frontier is empty, or `Final` is active there.
    ///
    /// `Final`, whenever active at a level, is kept at that level's head (see
    /// `insert_active`), so a single head check is enough to answer this.
    pub fn in_final(&self) -> bool {
        match self.first_active {
            None => true,
            Some(head) => self.frontier[head as usize].state == State::Final,
        }
    }

    /// Iterates the top-level active states.
    ///
    /// When `ignore_if_nested` is set, a state whose nested frontier exists
    /// and has not reached `Final` is skipped — it hasn't finished its
    /// sub-match yet, so it isn't meaningfully "active" from the caller's
    /// point of view.
    pub fn for_each_active_state<F: FnMut(StateId)>(&self, mut callback: F, ignore_if_nested: bool) {
        let mut cur = self.first_active;
        while let Some(i) = cur {
            let entry = &self.frontier[i as usize];
            cur = entry.next;
            let id = match entry.state {
                State::Id(id) => id,
                State::Final => continue,
            };
            if ignore_if_nested {
                if let Some(nested_head) = entry.nested {
                    if self.frontier[nested_head as usize].state != State::Final {
                        continue;
                    }
                }
            }
            callback(id);
        }
    }

    /// The `|`-joined diagnostic images of the symbols on ordinary
    /// transitions out of the top-level active states.
    pub fn expected(&self) -> String {
        let mut images = Vec::new();
        let mut cur = self.first_active;
        while let Some(i) = cur {
            let entry = &self.frontier[i as usize];
            cur = entry.next;
            if let State::Id(id) = entry.state {
                for t in self.nfa.ordinary_transitions(id) {
                    if let Some(sym) = &t.sym {
                        images.push(sym.image());
                    }
                }
            }
        }
        images.iter().join("|")
    }

    /// Consumes one input symbol.
    ///
    /// Transactional: on failure (no active state anywhere in the frontier
    /// can make progress on `input`), the frontier is left exactly as it was
    /// and `false` is returned. On success the frontier is advanced and
    /// `true` is returned.
    pub fn process(&mut self, input: &T::Input) -> bool {
        let snapshot = self.frontier.clone();
        let snapshot_head = self.first_active;

        let new_head = self.step_level(self.first_active, input);
        let success = new_head.is_some();

        if success {
            self.first_active = new_head;
        } else {
            self.frontier = snapshot;
            self.first_active = snapshot_head;
        }
        trace!("process -> {}", success);
        success
    }

    fn level_contains(&self, head: Option<u32>, target: State) -> bool {
        let mut cur = head;
        while let Some(i) = cur {
            if self.frontier[i as usize].state == target {
                return true;
            }
            cur = self.frontier[i as usize].next;
        }
        false
    }

    /// Inserts a fresh frontier entry for `state` into the level headed by
    /// `head`, returning `(the new entry's index, the level's new head)`.
    ///
    /// Invariant 4 requires `Final`, whenever active at a level, to occupy
    /// that level's head. Plain prepending would only happen to satisfy this
    /// when `Final` is the *last* state activated at a level; to hold it
    /// unconditionally, a non-`Final` insertion that would otherwise become
    /// the new head instead splices in directly behind an already-active
    /// `Final`, leaving it at the head.
    fn insert_active(&mut self, head: Option<u32>, state: State, nested: Option<u32>) -> (u32, Option<u32>) {
        let idx = self.frontier.len() as u32;
        let head_is_final = matches!(head, Some(h) if self.frontier[h as usize].state == State::Final);

        if state != State::Final && head_is_final {
            let final_idx = head.unwrap();
            let after_final = self.frontier[final_idx as usize].next;
            self.frontier.push(FrontierEntry {
                state,
                next: after_final,
                nested,
            });
            self.frontier[final_idx as usize].next = Some(idx);
            (idx, head)
        } else {
            self.frontier.push(FrontierEntry {
                state,
                next: head,
                nested,
            });
            (idx, Some(idx))
        }
    }

    /// Activates `state` in the level headed by `head`, closing over its
    /// epsilon transitions and, if it carries a nested sub-automaton,
    /// activating that sub-automaton's start state in a fresh nested level.
    /// Returns the level's new head.
    fn mark_active(&mut self, head: Option<u32>, state: State) -> Option<u32> {
        if self.level_contains(head, state) {
            return head;
        }
        let (idx, mut new_head) = self.insert_active(head, state, None);

        if let State::Id(id) = state {
            let eps_targets: Vec<State> = self
                .nfa
                .ordinary_transitions(id)
                .filter(|t| t.sym.is_none())
                .map(|t| t.to)
                .collect();
            for target in eps_targets {
                new_head = self.mark_active(new_head, target);
            }
            if let Some(ns) = self.nfa.nested_start(id) {
                let nested_head = self.mark_active(None, State::Id(ns));
                self.frontier[idx as usize].nested = nested_head;
            }
        }
        new_head
    }

    /// Re-inserts an already-active state into the new level, carrying a
    /// freshly stepped nested frontier. Unlike `mark_active`, this never
    /// re-runs epsilon-closure: `state` was already closed over when it was
    /// first activated, and its epsilon siblings are independent entries
    /// walking through this same step.
    fn reactivate_with_nested(&mut self, head: Option<u32>, state: State, nested: u32) -> Option<u32> {
        if self.level_contains(head, state) {
            return head;
        }
        let (_, new_head) = self.insert_active(head, state, Some(nested));
        new_head
    }

    fn step_ordinary(&mut self, head: Option<u32>, id: StateId, input: &T::Input) -> Option<u32> {
        let mut new_head = head;
        let targets: Vec<State> = self
            .nfa
            .ordinary_transitions(id)
            .filter(|t| t.sym.as_ref().map_or(false, |s| s.matches(input)))
            .map(|t| t.to)
            .collect();
        for target in targets {
            new_head = self.mark_active(new_head, target);
        }
        new_head
    }

    fn step_on_nested_exit(&mut self, head: Option<u32>, id: StateId, input: &T::Input) -> Option<u32> {
        let mut new_head = head;
        let targets: Vec<State> = self
            .nfa
            .on_nested_exit_transitions(id)
            .filter(|t| t.sym.as_ref().map_or(false, |s| s.matches(input)))
            .map(|t| t.to)
            .collect();
        for target in targets {
            new_head = self.mark_active(new_head, target);
        }
        new_head
    }

    /// Runs one step of `process` for a single level (top-level or nested).
    ///
    /// For a state with a live nested frontier, the input is offered to the
    /// nested level first. If the nested level consumes it, `on_nested_exit`
    /// is additionally tried for this same input whenever the resulting
    /// nested frontier could stop right here (`Final` active there) — this
    /// is the NFA fork that lets a schema author choose, on the input that
    /// completes a nested content model, whether to stay nested or bubble
    /// out. If the nested level cannot consume the input at all, it is
    /// dropped and the input is offered directly to `on_nested_exit` and to
    /// the state's own ordinary transitions, so an enclosing state never
    /// gets stuck just because its nested sub-automaton ran out of alphabet.
    fn step_level(&mut self, head: Option<u32>, input: &T::Input) -> Option<u32> {
        let mut new_head = None;
        let mut cur = head;
        while let Some(i) = cur {
            let entry = self.frontier[i as usize];
            cur = entry.next;

            let id = match entry.state {
                State::Id(id) => id,
                State::Final => continue,
            };

            match entry.nested {
                Some(nested_head) => {
                    let new_nested = self.step_level(Some(nested_head), input);
                    match new_nested {
                        Some(nh) => {
                            new_head = self.reactivate_with_nested(new_head, entry.state, nh);
                            if self.frontier[nh as usize].state == State::Final {
                                new_head = self.step_on_nested_exit(new_head, id, input);
                            }
                        }
                        None => {
                            debug!("nested frontier dropped for state S{}", id);
                            new_head = self.step_on_nested_exit(new_head, id, input);
                            new_head = self.step_ordinary(new_head, id, input);
                        }
                    }
                }
                None => {
                    new_head = self.step_ordinary(new_head, id, input);
                }
            }
        }
        new_head
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Occurs;

    /// Opt into `trace!`/`debug!` output for a failing test by setting
    /// `RUST_LOG=trace` (or `debug`) before running `cargo test`.
    fn init_logging() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn run(nfa: &Nfa<char>, input: &str) -> (Vec<bool>, bool) {
        let mut matcher = Matcher::start_match(nfa);
        let mut steps = Vec::new();
        for ch in input.chars() {
            steps.push(matcher.process(&ch));
        }
        (steps, matcher.in_final())
    }

    #[test]
    fn simple_sequence() {
        init_logging();
        let mut nfa = Nfa::<char>::new(false);
        let s0 = START;
        let s1 = nfa.add_state(());
        nfa.add_transition(s0, s1, 'a');
        nfa.add_transition(s1, State::Final, 'b');

        let mut matcher = Matcher::start_match(&nfa);
        assert!(matcher.process(&'a'));
        assert!(matcher.process(&'b'));
        assert!(matcher.in_final());
    }

    #[test]
    fn optional() {
        init_logging();
        let mut nfa = Nfa::<char>::new(false);
        let s0 = START;
        let s1 = nfa.add_state(());
        nfa.add_transition(s0, s1, 'a');
        nfa.add_empty_transition(s1, State::Final);
        nfa.repeat(s0, s1, 0, Occurs::Bounded(1));

        assert!(Matcher::start_match(&nfa).in_final());

        let mut matcher = Matcher::start_match(&nfa);
        assert!(matcher.process(&'a'));
        assert!(matcher.in_final());
        assert!(!matcher.process(&'a'));
        assert!(matcher.in_final());
    }

    #[test]
    fn kleene_star() {
        init_logging();
        let mut nfa = Nfa::<char>::new(false);
        let s0 = START;
        let s1 = nfa.add_state(());
        nfa.add_transition(s0, s1, 'a');
        nfa.add_empty_transition(s1, State::Final);
        nfa.repeat(s0, s1, 0, Occurs::Unbounded);

        let (steps, final_state) = run(&nfa, "aaaa");
        assert_eq!(steps, vec![true, true, true, true]);
        assert!(final_state);
    }

    #[test]
    fn bounded_repetition() {
        init_logging();
        let mut nfa = Nfa::<char>::new(false);
        let s0 = START;
        let s1 = nfa.add_state(());
        nfa.add_transition(s0, s1, 'x');
        nfa.add_empty_transition(s1, State::Final);
        nfa.repeat(s0, s1, 2, Occurs::Bounded(3));

        let mut matcher = Matcher::start_match(&nfa);
        assert!(matcher.process(&'x'));
        assert!(!matcher.in_final());
        assert!(matcher.process(&'x'));
        assert!(matcher.in_final());
        assert!(matcher.process(&'x'));
        assert!(matcher.in_final());
        assert!(!matcher.process(&'x'));
    }

    #[test]
    fn nested_with_on_exit() {
        init_logging();
        // Outer O has a nested sub-automaton accepting "a+"; once the nested
        // level reaches Final, on_nested_exit('b') is eligible. Built
        // explicitly as inner_start -a-> inner_mid, inner_mid -a-> inner_mid
        // (loop), inner_mid -> Final.
        let mut nfa = Nfa::<char>::new(false);
        let o = START;
        let inner_start = nfa.add_state(());
        let inner_mid = nfa.add_state(());
        nfa.add_transition(inner_start, inner_mid, 'a');
        nfa.add_transition(inner_mid, inner_mid, 'a');
        nfa.add_empty_transition(inner_mid, State::Final);
        let nested = nfa.create_nested(inner_start);
        nfa.set_nested(o, nested);

        let done = nfa.add_state(());
        nfa.on_nested_exit(o, done, 'b');
        nfa.add_empty_transition(done, State::Final);

        let mut matcher = Matcher::start_match(&nfa);
        assert!(matcher.process(&'a'));
        assert!(matcher.process(&'a'));
        assert!(matcher.process(&'b'));
        assert!(matcher.in_final());
    }

    #[test]
    fn nested_failure_does_not_fail_outer() {
        init_logging();
        // Outer "On" has nested alternation record|play; on_nested_exit
        // fires on 'turn_off' even though neither alternative matches it
        // and the nested sub-automaton dies.
        let mut nfa = Nfa::<char>::new(false);
        let on = START;
        let inner_start = nfa.add_state(());
        let after_record = nfa.add_state(());
        let after_play = nfa.add_state(());
        nfa.add_transition(inner_start, after_record, 'r');
        nfa.add_transition(inner_start, after_play, 'p');
        nfa.add_empty_transition(after_record, State::Final);
        nfa.add_empty_transition(after_play, State::Final);
        let nested = nfa.create_nested(inner_start);
        nfa.set_nested(on, nested);

        let off = nfa.add_state(());
        nfa.on_nested_exit(on, off, 't');
        nfa.add_empty_transition(off, State::Final);

        let mut matcher = Matcher::start_match(&nfa);
        assert!(matcher.process(&'t'));
        assert!(matcher.in_final());
    }

    #[test]
    fn final_occupies_the_head_even_when_activated_first() {
        init_logging();
        let mut nfa = Nfa::<char>::new(false);
        let s0 = START;
        let s1 = nfa.add_state(());
        // A transition list is built by prepending, so the most recently
        // added edge out of s0 is the one mark_active's epsilon closure
        // visits first. Adding the eps edge to Final *after* the eps edge to
        // s1 means Final is closed over first and s1 second -- exactly the
        // order under which a plain prepend would leave s1, not Final, at
        // the head.
        nfa.add_empty_transition(s0, s1);
        nfa.add_empty_transition(s0, State::Final);

        let matcher = Matcher::start_match(&nfa);
        let head = matcher.first_active.expect("frontier is non-empty");
        assert_eq!(matcher.frontier[head as usize].state, State::Final);
    }
}
