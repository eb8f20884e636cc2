// Copyright 2016 Vincent Vigneron. See the COPYRIGHT
// file at the top-level directory of this distribution.
//
// Licensed under the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at.your option.
// This file may not be copied, modified, or distributed
// except according to those terms.

//! Graph store and builder: the arena of states and transitions that a
//! [`Matcher`](crate::matcher::Matcher) later walks.
//!
//! States and transitions live in two append-only arrays addressed by small
//! integer handles (`StateId`, `TransitionId`). Transition lists are singly
//! linked and prepended to, which keeps construction O(1) per edge and makes
//! the "splice `new_to` back onto `to`" step of [`Nfa::repeat`] a pointer
//! rewrite instead of a vector shuffle.

use std::collections::HashMap;
use std::fmt;
use std::mem;

use log::trace;

use crate::error::{NfaError, Result, TransitionKind};

/// Handle to a state allocated by [`Nfa::add_state`]. `1` is always `Start`.
pub type StateId = u32;

/// Handle to a transition record in the arena.
pub(crate) type TransitionId = u32;

/// The handle of the implicitly created starting state.
pub const START: StateId = 1;

/// A destination a transition can lead to: either a real state or the
/// `Final` sentinel, which is never stored in the state array and can never
/// itself originate a transition.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum State {
    /// An ordinary, allocated state.
    Id(StateId),
    /// The distinguished accepting sentinel.
    Final,
}

impl State {
    /// Shorthand for the implicitly created starting state.
    pub const START: State = State::Id(START);

    fn id(self) -> Option<StateId> {
        match self {
            State::Id(id) => Some(id),
            State::Final => None,
        }
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            State::Id(id) => write!(f, "S{}", id),
            State::Final => write!(f, "Final"),
        }
    }
}

impl From<StateId> for State {
    fn from(id: StateId) -> Self {
        State::Id(id)
    }
}

/// A descriptor for a sub-automaton attached to a state, returned by
/// [`Nfa::create_nested`] and consumed by [`Nfa::set_nested`].
#[derive(Copy, Clone, Debug)]
pub struct Nested {
    start: StateId,
}

impl Nested {
    /// The entry state of the nested sub-automaton.
    pub fn start(&self) -> StateId {
        self.start
    }
}

/// The number of times a sub-graph may repeat, per [`Nfa::repeat`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Occurs {
    /// At most this many repetitions.
    Bounded(usize),
    /// No upper bound (the `{m,}` / `*` / `+` case).
    Unbounded,
}

impl Occurs {
    fn exceeded_by(self, min_occurs: usize) -> bool {
        match self {
            Occurs::Bounded(max) => min_occurs > max,
            Occurs::Unbounded => false,
        }
    }
}

#[derive(Clone)]
pub(crate) struct TransitionRecord<T> {
    pub(crate) to: State,
    /// `None` means an epsilon transition; spec's `is_empty` flag is the
    /// negation of `is_some()`.
    pub(crate) sym: Option<T>,
    pub(crate) next: Option<TransitionId>,
}

#[derive(Clone)]
struct StateRecord<T, D> {
    user_data: D,
    nested_start: Option<StateId>,
    first_transition: Option<TransitionId>,
    on_nested_exit: Option<TransitionId>,
    _marker: std::marker::PhantomData<T>,
}

/// A hierarchical NFA: the graph store plus the builder primitives that grow
/// it.
///
/// `T` is the opaque transition symbol type (only ever cloned and handed to a
/// caller-supplied [`Symbol`](crate::symbol::Symbol) impl; the graph never
/// inspects it). `D` is the caller-defined per-state payload; it defaults to
/// `()` for content models that don't need one.
///
/// Once construction is finished, an `Nfa` is logically immutable and may be
/// shared (by `&` reference) across any number of independent
/// [`Matcher`](crate::matcher::Matcher)s.
#[derive(Clone)]
pub struct Nfa<T, D = ()> {
    states_are_stateful: bool,
    states: Vec<StateRecord<T, D>>,
    transitions: Vec<TransitionRecord<T>>,
}

impl<T, D: Default> Nfa<T, D> {
    /// Creates a new graph containing only the `Start` state (handle
    /// [`START`]) with default user data and no transitions.
    ///
    /// `states_are_stateful` should be `true` when `D` carries payload that
    /// must not be silently duplicated by [`repeat`](Nfa::repeat)'s cloning;
    /// set it to `false` for unit-payload graphs (`D = ()`).
    pub fn new(states_are_stateful: bool) -> Self {
        let start = StateRecord {
            user_data: D::default(),
            nested_start: None,
            first_transition: None,
            on_nested_exit: None,
            _marker: std::marker::PhantomData,
        };
        Nfa {
            states_are_stateful,
            states: vec![start],
            transitions: Vec::new(),
        }
    }

    /// Appends a new state and returns its handle.
    pub fn add_state(&mut self, user_data: D) -> StateId {
        self.states.push(StateRecord {
            user_data,
            nested_start: None,
            first_transition: None,
            on_nested_exit: None,
            _marker: std::marker::PhantomData,
        });
        let id = self.states.len() as StateId;
        trace!("add_state -> S{}", id);
        id
    }

    fn index(&self, id: StateId) -> usize {
        (id - 1) as usize
    }

    fn record(&self, id: StateId) -> &StateRecord<T, D> {
        &self.states[self.index(id)]
    }

    fn record_mut(&mut self, id: StateId) -> &mut StateRecord<T, D> {
        let idx = self.index(id);
        &mut self.states[idx]
    }

    /// Mutable access to a state's payload.
    pub fn get_data(&mut self, state: StateId) -> &mut D {
        &mut self.record_mut(state).user_data
    }

    /// Read-only access to a state's payload.
    pub fn data(&self, state: StateId) -> &D {
        &self.record(state).user_data
    }

    /// Creates a descriptor for a nested sub-automaton whose entry is `from`.
    ///
    /// The state at `from` holds no back-reference; the same descriptor (and
    /// hence the same sub-graph) may be installed via [`set_nested`](Nfa::set_nested)
    /// on any number of enclosing states.
    pub fn create_nested(&self, from: StateId) -> Nested {
        Nested { start: from }
    }

    /// Installs `nested` as the nested sub-automaton of `state`.
    pub fn set_nested(&mut self, state: StateId, nested: Nested) {
        self.record_mut(state).nested_start = Some(nested.start);
    }

    /// The entry state of `state`'s nested sub-automaton, if any.
    pub fn get_nested(&self, state: StateId) -> Option<StateId> {
        self.record(state).nested_start
    }

    fn push_transition(&mut self, to: State, sym: Option<T>, head: Option<TransitionId>) -> (TransitionId, Option<TransitionId>) {
        self.transitions.push(TransitionRecord { to, sym, next: head });
        ((self.transitions.len() - 1) as TransitionId, Some((self.transitions.len() - 1) as TransitionId))
    }

    fn prepend_ordinary(&mut self, from: State, to: State, sym: Option<T>) -> Result<()> {
        let from_id = from.id().ok_or(NfaError::TransitionFromFinal {
            kind: TransitionKind::Ordinary,
        })?;
        let head = self.record(from_id).first_transition;
        let (_, new_head) = self.push_transition(to, sym, head);
        self.record_mut(from_id).first_transition = new_head;
        Ok(())
    }

    fn prepend_on_nested_exit(&mut self, from: State, to: State, sym: Option<T>) -> Result<()> {
        let from_id = from.id().ok_or(NfaError::TransitionFromFinal {
            kind: TransitionKind::OnNestedExit,
        })?;
        let head = self.record(from_id).on_nested_exit;
        let (_, new_head) = self.push_transition(to, sym, head);
        self.record_mut(from_id).on_nested_exit = new_head;
        Ok(())
    }

    /// Non-panicking primitive behind [`add_transition`](Nfa::add_transition).
    pub fn try_add_transition(&mut self, from: impl Into<State>, to: impl Into<State>, sym: T) -> Result<()> {
        let (from, to) = (from.into(), to.into());
        trace!("try_add_transition {} -> {}", from, to);
        self.prepend_ordinary(from, to, Some(sym))
    }

    /// Prepends a symbol-consuming transition to `from`'s list.
    ///
    /// # Panics
    ///
    /// Panics if `from` is `Final`; use [`try_add_transition`](Nfa::try_add_transition)
    /// to handle that as a recoverable error instead.
    pub fn add_transition(&mut self, from: impl Into<State>, to: impl Into<State>, sym: T) {
        self.try_add_transition(from, to, sym)
            .expect("add_transition: cannot originate a transition from Final");
    }

    /// Non-panicking primitive behind [`add_empty_transition`](Nfa::add_empty_transition).
    pub fn try_add_empty_transition(&mut self, from: impl Into<State>, to: impl Into<State>) -> Result<()> {
        let (from, to) = (from.into(), to.into());
        trace!("try_add_empty_transition {} -> {}", from, to);
        self.prepend_ordinary(from, to, None)
    }

    /// Prepends an epsilon transition to `from`'s list.
    ///
    /// # Panics
    ///
    /// Panics if `from` is `Final`.
    pub fn add_empty_transition(&mut self, from: impl Into<State>, to: impl Into<State>) {
        self.try_add_empty_transition(from, to)
            .expect("add_empty_transition: cannot originate a transition from Final");
    }

    /// Non-panicking primitive behind [`on_nested_exit`](Nfa::on_nested_exit).
    pub fn try_on_nested_exit(&mut self, from: impl Into<State>, to: impl Into<State>, sym: T) -> Result<()> {
        let (from, to) = (from.into(), to.into());
        trace!("try_on_nested_exit {} -> {}", from, to);
        self.prepend_on_nested_exit(from, to, Some(sym))
    }

    /// Prepends a symbol-consuming on-nested-exit transition: it becomes
    /// eligible only once `from`'s nested frontier reaches `Final`.
    ///
    /// # Panics
    ///
    /// Panics if `from` is `Final`.
    pub fn on_nested_exit(&mut self, from: impl Into<State>, to: impl Into<State>, sym: T) {
        self.try_on_nested_exit(from, to, sym)
            .expect("on_nested_exit: cannot originate a transition from Final");
    }

    /// Non-panicking primitive behind [`on_empty_nested_exit`](Nfa::on_empty_nested_exit).
    pub fn try_on_empty_nested_exit(&mut self, from: impl Into<State>, to: impl Into<State>) -> Result<()> {
        let (from, to) = (from.into(), to.into());
        trace!("try_on_empty_nested_exit {} -> {}", from, to);
        self.prepend_on_nested_exit(from, to, None)
    }

    /// Prepends an epsilon on-nested-exit transition.
    ///
    /// # Panics
    ///
    /// Panics if `from` is `Final`.
    pub fn on_empty_nested_exit(&mut self, from: impl Into<State>, to: impl Into<State>) {
        self.try_on_empty_nested_exit(from, to)
            .expect("on_empty_nested_exit: cannot originate a transition from Final");
    }

    pub(crate) fn ordinary_transitions(&self, state: StateId) -> TransitionIter<'_, T> {
        TransitionIter {
            transitions: &self.transitions,
            next: self.record(state).first_transition,
        }
    }

    pub(crate) fn on_nested_exit_transitions(&self, state: StateId) -> TransitionIter<'_, T> {
        TransitionIter {
            transitions: &self.transitions,
            next: self.record(state).on_nested_exit,
        }
    }

    pub(crate) fn nested_start(&self, state: StateId) -> Option<StateId> {
        self.record(state).nested_start
    }
}

/// Iterator over a state's transition list (invariant 2: finite, non-cyclic).
pub(crate) struct TransitionIter<'a, T> {
    transitions: &'a [TransitionRecord<T>],
    next: Option<TransitionId>,
}

impl<'a, T> Iterator for TransitionIter<'a, T> {
    type Item = &'a TransitionRecord<T>;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next?;
        let record = &self.transitions[id as usize];
        self.next = record.next;
        Some(record)
    }
}

impl<T: Clone, D: Clone + Default> Nfa<T, D> {
    /// Rewrites the sub-graph bounded by `from` and `to` so it matches its
    /// sub-language between `min_occurs` and `max_occurs` times.
    ///
    /// `to` is assumed to have no outbound transitions yet (the usual case:
    /// a quantifier is applied right after building the atomic piece, before
    /// it is chained into anything else). Its handle remains valid and
    /// becomes the rewritten sub-graph's sole external exit; `from` remains
    /// its sole external entry (invariant 6).
    ///
    /// See the crate-level documentation and `DESIGN.md` for the concrete
    /// cloning strategy.
    pub fn repeat(&mut self, from: StateId, to: StateId, min_occurs: usize, max_occurs: Occurs) {
        trace!(
            "repeat S{}..S{} {{{},{:?}}}",
            from, to, min_occurs, max_occurs
        );

        if max_occurs.exceeded_by(min_occurs) {
            return;
        }
        if min_occurs == 1 && max_occurs == Occurs::Bounded(1) {
            return;
        }
        if min_occurs == 0 && max_occurs == Occurs::Bounded(1) {
            self.add_empty_transition(from, to);
            return;
        }
        if min_occurs == 1 && max_occurs == Occurs::Unbounded {
            self.add_empty_transition(to, from);
            return;
        }
        if min_occurs == 0 && max_occurs == Occurs::Unbounded {
            self.add_empty_transition(from, to);
            self.add_empty_transition(to, from);
            return;
        }

        self.repeat_general(from, to, min_occurs, max_occurs);
    }

    fn repeat_general(&mut self, from: StateId, to: StateId, min_occurs: usize, max_occurs: Occurs) {
        // Detach `to`: redirect every transition in the graph that currently
        // targets it onto a fresh interior sink `n`, which inherits `to`'s
        // payload (if any; stateless graphs just get a default). `to` keeps
        // its own (assumed-empty) outbound list and becomes a bare merge
        // point fed by empty transitions from eligible occurrence endpoints,
        // added below by the threshold loop; `n` itself gets no edge to
        // `to` here; it is only a relocation target for `to`'s payload and
        // the first occurrence's endpoint.
        let payload = mem::take(self.get_data(to));
        let n = self.add_state(if self.states_are_stateful { payload } else { D::default() });
        self.redirect_to(to, n);

        let mut endpoints: Vec<(StateId, StateId)> = vec![(from, n)];

        let required = match max_occurs {
            Occurs::Bounded(max) => max,
            Occurs::Unbounded => min_occurs,
        };
        for _ in 1..required {
            let (cfrom, csink) = self.clone_region(from, n);
            let (_, prev_sink) = *endpoints.last().unwrap();
            self.add_empty_transition(prev_sink, cfrom);
            endpoints.push((cfrom, csink));
        }

        // An endpoint is only a legal stopping point if its occurrence count
        // falls both at or above the minimum and at or below what this
        // bounded/unbounded chain actually built (`required`); the latter
        // guards the degenerate `max_occurs == 0` chain, whose single seed
        // endpoint exists structurally but corresponds to zero permitted
        // occurrences, so it must not reach `to`.
        let threshold = min_occurs.max(1);
        for (count, &(_, sink)) in endpoints.iter().enumerate() {
            let occurrence_count = count + 1;
            if occurrence_count >= threshold && occurrence_count <= required {
                self.add_empty_transition(sink, to);
            }
        }
        if min_occurs == 0 && required > 0 {
            self.add_empty_transition(from, to);
        }
        if let Occurs::Unbounded = max_occurs {
            let &(last_from, last_sink) = endpoints.last().unwrap();
            self.add_empty_transition(last_sink, last_from);
        }
    }

    /// Rewrites every transition (ordinary or on-nested-exit, anywhere in the
    /// graph) whose destination is `old` so it targets `new` instead.
    fn redirect_to(&mut self, old: StateId, new: StateId) {
        for t in &mut self.transitions {
            if t.to == State::Id(old) {
                t.to = State::Id(new);
            }
        }
    }

    /// Structurally duplicates the sub-graph reachable from `from` without
    /// following transitions out of `sink` (invariant 6's interior), cloning
    /// each visited state's payload and transition lists, and sharing nested
    /// sub-automata by reference.
    fn clone_region(&mut self, from: StateId, sink: StateId) -> (StateId, StateId) {
        let mut order = Vec::new();
        let mut seen = HashMap::new();
        let mut queue = std::collections::VecDeque::new();
        queue.push_back(from);
        seen.insert(from, ());
        while let Some(v) = queue.pop_front() {
            order.push(v);
            if v == sink {
                continue;
            }
            for list in [self.ordinary_ids(v), self.on_nested_exit_ids(v)] {
                for t in list {
                    if let State::Id(d) = self.transitions[t as usize].to {
                        if seen.insert(d, ()).is_none() {
                            queue.push_back(d);
                        }
                    }
                }
            }
        }

        let mut clone_of: HashMap<StateId, StateId> = HashMap::new();
        for &v in &order {
            let data = if v == sink {
                D::default()
            } else {
                self.data(v).clone()
            };
            let clone = self.add_state(data);
            clone_of.insert(v, clone);
        }
        for &v in &order {
            if let Some(nested) = self.nested_start(v) {
                self.record_mut(clone_of[&v]).nested_start = Some(nested);
            }
        }
        for &v in &order {
            if v == sink {
                // `sink`'s own outbound edges are outside the cloned region
                // (invariant 6); only edges *into* it were rewritten above.
                continue;
            }
            let ordinary: Vec<(State, Option<T>)> = self
                .ordinary_transitions(v)
                .map(|t| (t.to, t.sym.clone()))
                .collect();
            for (to, sym) in ordinary.into_iter().rev() {
                let mapped_to = match to {
                    State::Id(d) => clone_of.get(&d).copied().map(State::Id).unwrap_or(to),
                    State::Final => State::Final,
                };
                match sym {
                    Some(sym) => self.add_transition(clone_of[&v], mapped_to, sym),
                    None => self.add_empty_transition(clone_of[&v], mapped_to),
                }
            }
            let on_exit: Vec<(State, Option<T>)> = self
                .on_nested_exit_transitions(v)
                .map(|t| (t.to, t.sym.clone()))
                .collect();
            for (to, sym) in on_exit.into_iter().rev() {
                let mapped_to = match to {
                    State::Id(d) => clone_of.get(&d).copied().map(State::Id).unwrap_or(to),
                    State::Final => State::Final,
                };
                match sym {
                    Some(sym) => self.on_nested_exit(clone_of[&v], mapped_to, sym),
                    None => self.on_empty_nested_exit(clone_of[&v], mapped_to),
                }
            }
        }

        (clone_of[&from], clone_of[&sink])
    }

    fn ordinary_ids(&self, state: StateId) -> Vec<TransitionId> {
        let mut ids = Vec::new();
        let mut next = self.record(state).first_transition;
        while let Some(id) = next {
            ids.push(id);
            next = self.transitions[id as usize].next;
        }
        ids
    }

    fn on_nested_exit_ids(&self, state: StateId) -> Vec<TransitionId> {
        let mut ids = Vec::new();
        let mut next = self.record(state).on_nested_exit;
        while let Some(id) = next {
            ids.push(id);
            next = self.transitions[id as usize].next;
        }
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbol::Symbol;
    use std::collections::HashSet;

    /// A tiny brute-force simulator used only by these unit tests, so the
    /// repetition transform can be checked for language equivalence before
    /// `Matcher` exists: plain epsilon-closure + subset-construction style
    /// stepping, with no transactional semantics.
    fn accepts(nfa: &Nfa<char>, start: StateId, input: &str) -> bool {
        let mut current: HashSet<State> = HashSet::new();
        current.insert(State::Id(start));
        current = epsilon_closure(nfa, current);

        for ch in input.chars() {
            let mut next: HashSet<State> = HashSet::new();
            for &state in &current {
                if let State::Id(id) = state {
                    for t in nfa.ordinary_transitions(id) {
                        if let Some(sym) = &t.sym {
                            if sym.matches(&ch) {
                                next.insert(t.to);
                            }
                        }
                    }
                }
            }
            current = epsilon_closure(nfa, next);
        }
        current.contains(&State::Final)
    }

    fn epsilon_closure(nfa: &Nfa<char>, mut frontier: HashSet<State>) -> HashSet<State> {
        let mut stack: Vec<State> = frontier.iter().copied().collect();
        while let Some(state) = stack.pop() {
            if let State::Id(id) = state {
                for t in nfa.ordinary_transitions(id) {
                    if t.sym.is_none() && frontier.insert(t.to) {
                        stack.push(t.to);
                    }
                }
            }
        }
        frontier
    }

    fn atomic_a() -> (Nfa<char>, StateId, StateId) {
        let mut nfa = Nfa::<char>::new(false);
        let from = nfa.add_state(());
        let to = nfa.add_state(());
        nfa.add_transition(from, to, 'a');
        (nfa, from, to)
    }

    #[test]
    fn exactly_one_is_a_noop() {
        let (mut nfa, from, to) = atomic_a();
        let states_before = nfa.states.len();
        let transitions_before = nfa.transitions.len();
        nfa.repeat(from, to, 1, Occurs::Bounded(1));
        assert_eq!(nfa.states.len(), states_before);
        assert_eq!(nfa.transitions.len(), transitions_before);
    }

    #[test]
    fn optional_accepts_empty_and_one() {
        let (mut nfa, from, to) = atomic_a();
        nfa.repeat(from, to, 0, Occurs::Bounded(1));
        nfa.add_empty_transition(to, State::Final);
        assert!(accepts(&nfa, from, ""));
        assert!(accepts(&nfa, from, "a"));
        assert!(!accepts(&nfa, from, "aa"));
    }

    #[test]
    fn star_accepts_any_count() {
        let (mut nfa, from, to) = atomic_a();
        nfa.repeat(from, to, 0, Occurs::Unbounded);
        nfa.add_empty_transition(to, State::Final);
        assert!(accepts(&nfa, from, ""));
        assert!(accepts(&nfa, from, "a"));
        assert!(accepts(&nfa, from, "aaaaa"));
    }

    #[test]
    fn plus_requires_at_least_one() {
        let (mut nfa, from, to) = atomic_a();
        nfa.repeat(from, to, 1, Occurs::Unbounded);
        nfa.add_empty_transition(to, State::Final);
        assert!(!accepts(&nfa, from, ""));
        assert!(accepts(&nfa, from, "a"));
        assert!(accepts(&nfa, from, "aaa"));
    }

    #[test]
    fn bounded_range_matches_exactly_that_range() {
        let (mut nfa, from, to) = atomic_a();
        nfa.repeat(from, to, 2, Occurs::Bounded(3));
        nfa.add_empty_transition(to, State::Final);
        assert!(!accepts(&nfa, from, ""));
        assert!(!accepts(&nfa, from, "a"));
        assert!(accepts(&nfa, from, "aa"));
        assert!(accepts(&nfa, from, "aaa"));
        assert!(!accepts(&nfa, from, "aaaa"));
    }

    #[test]
    fn unbounded_with_minimum_matches_at_least_minimum() {
        let (mut nfa, from, to) = atomic_a();
        nfa.repeat(from, to, 2, Occurs::Unbounded);
        nfa.add_empty_transition(to, State::Final);
        assert!(!accepts(&nfa, from, ""));
        assert!(!accepts(&nfa, from, "a"));
        assert!(accepts(&nfa, from, "aa"));
        assert!(accepts(&nfa, from, "aaaaaa"));
    }

    #[test]
    fn zero_zero_leaves_the_body_unreachable() {
        let (mut nfa, from, to) = atomic_a();
        let transitions_before = nfa.transitions.len();
        nfa.repeat(from, to, 0, Occurs::Bounded(0));
        // No new transitions are wired into or out of the detached body; the
        // only change is the fresh interior state that now owns it.
        assert_eq!(nfa.transitions.len(), transitions_before);
        nfa.add_empty_transition(to, State::Final);
        assert!(!accepts(&nfa, from, ""));
        assert!(!accepts(&nfa, from, "a"));
    }

    #[test]
    fn min_greater_than_max_is_rejected_as_a_noop() {
        let (mut nfa, from, to) = atomic_a();
        let transitions_before = nfa.transitions.len();
        nfa.repeat(from, to, 3, Occurs::Bounded(2));
        assert_eq!(nfa.transitions.len(), transitions_before);
    }

    #[test]
    fn add_transition_from_final_is_an_error() {
        let mut nfa = Nfa::<char>::new(false);
        let s = nfa.add_state(());
        assert!(nfa.try_add_transition(State::Final, s, 'a').is_err());
    }

    #[test]
    fn nested_descriptor_round_trips() {
        let mut nfa = Nfa::<char, ()>::new(false);
        let host = nfa.add_state(());
        let inner = nfa.add_state(());
        let nested = nfa.create_nested(inner);
        nfa.set_nested(host, nested);
        assert_eq!(nfa.get_nested(host), Some(inner));
    }
}
