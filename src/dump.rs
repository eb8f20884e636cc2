// Copyright 2016 Vincent Vigneron. See the COPYRIGHT
// file at the top-level directory of this distribution.
//
// Licensed under the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at.your option.
// This file may not be copied, modified, or distributed
// except according to those terms.

//! Textual and Graphviz dumps of a graph, for debugging and tests.
//!
//! No engine behavior depends on anything in this module; it only reads.

use std::collections::{HashSet, VecDeque};
use std::fmt::Write as _;

use itertools::Itertools;

use crate::graph::{Nfa, State, StateId, START};
use crate::symbol::Symbol;

/// Selects the shape of [`dump`]'s output.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Mode {
    /// A single line, states and edges separated by `; `.
    Compact,
    /// One state or edge per line, `START`/`TRANSITIONS`-style, in the
    /// manner of this crate's older flat automaton dumps.
    Multiline,
    /// A full Graphviz `digraph`, one statement per line.
    Dot,
    /// The same graph as `Dot`, collapsed onto a single line; handy for
    /// piping straight into `dot` from a test assertion without worrying
    /// about embedded newlines.
    DotCompact,
}

struct Edge {
    from: StateId,
    to: State,
    label: Option<String>,
    dashed: bool,
    dotted: bool,
}

/// Walks every state reachable from `start` (via ordinary and
/// `on_nested_exit` transitions) and every nested sub-automaton reachable
/// from those states, each rendered once even if multiple states share it.
struct Walk {
    states: Vec<StateId>,
    edges: Vec<Edge>,
    nested_of: Vec<(StateId, StateId)>,
}

fn walk<T: Symbol, D>(nfa: &Nfa<T, D>, start: StateId) -> Walk {
    let mut states = Vec::new();
    let mut edges = Vec::new();
    let mut nested_of = Vec::new();
    let mut seen_states: HashSet<StateId> = HashSet::new();
    let mut seen_nested: HashSet<StateId> = HashSet::new();
    let mut queue = VecDeque::new();

    queue.push_back(start);
    seen_states.insert(start);
    while let Some(id) = queue.pop_front() {
        states.push(id);

        for t in nfa.ordinary_transitions(id) {
            edges.push(Edge {
                from: id,
                to: t.to,
                label: t.sym.as_ref().map(|s| s.image()),
                dashed: t.sym.is_none(),
                dotted: false,
            });
            if let State::Id(to) = t.to {
                if seen_states.insert(to) {
                    queue.push_back(to);
                }
            }
        }
        for t in nfa.on_nested_exit_transitions(id) {
            edges.push(Edge {
                from: id,
                to: t.to,
                label: t.sym.as_ref().map(|s| s.image()),
                dashed: t.sym.is_none(),
                dotted: true,
            });
            if let State::Id(to) = t.to {
                if seen_states.insert(to) {
                    queue.push_back(to);
                }
            }
        }
        if let Some(nested_start) = nfa.nested_start(id) {
            if seen_nested.insert(nested_start) {
                nested_of.push((id, nested_start));
            }
        }
    }

    Walk {
        states,
        edges,
        nested_of,
    }
}

/// Dumps the graph reachable from the implicit `Start` state.
pub fn dump<T: Symbol, D: Default>(nfa: &Nfa<T, D>, mode: Mode) -> String {
    dump_at(nfa, START, mode)
}

/// Dumps the graph reachable from an arbitrary state, typically the entry of
/// a nested sub-automaton, in isolation.
pub fn dump_at<T: Symbol, D: Default>(nfa: &Nfa<T, D>, start: StateId, mode: Mode) -> String {
    match mode {
        Mode::Compact => compact(nfa, start),
        Mode::Multiline => multiline(nfa, start),
        Mode::Dot => dot(nfa, start, false),
        Mode::DotCompact => dot(nfa, start, true),
    }
}

fn state_label(state: State) -> String {
    match state {
        State::Id(id) => format!("S{}", id),
        State::Final => "Final".to_string(),
    }
}

fn edge_arrow(edge: &Edge) -> &'static str {
    match (edge.dotted, edge.dashed) {
        (true, _) => "~>",
        (false, true) => "..>",
        (false, false) => "->",
    }
}

fn compact<T: Symbol, D: Default>(nfa: &Nfa<T, D>, start: StateId) -> String {
    let walk = walk(nfa, start);
    let mut rendered: HashSet<StateId> = HashSet::new();
    let edges = walk.edges.iter().map(|edge| {
        format!(
            "{}{}{} {}",
            state_label(State::Id(edge.from)),
            edge_arrow(edge),
            edge.label.clone().unwrap_or_default(),
            state_label(edge.to)
        )
    });
    let nested = walk.nested_of.iter().filter_map(|&(host, nested_start)| {
        rendered
            .insert(nested_start)
            .then(|| format!("S{}[nested={}]", host, state_label(State::Id(nested_start))))
    });
    edges.chain(nested).join("; ")
}

fn multiline<T: Symbol, D: Default>(nfa: &Nfa<T, D>, start: StateId) -> String {
    let walk = walk(nfa, start);
    let mut out = String::new();
    let _ = writeln!(out, "START: {}", state_label(State::Id(start)));
    let _ = writeln!(out, "STATES:");
    for &id in &walk.states {
        let _ = writeln!(out, "  S{}", id);
    }
    let _ = writeln!(out, "TRANSITIONS:");
    for edge in &walk.edges {
        let label = edge.label.clone().unwrap_or_else(|| "ε".to_string());
        let kind = if edge.dotted { " (on-nested-exit)" } else { "" };
        let _ = writeln!(
            out,
            "  {} {} {}{}",
            state_label(State::Id(edge.from)),
            label,
            state_label(edge.to),
            kind
        );
    }
    let mut rendered: HashSet<StateId> = HashSet::new();
    for &(host, nested_start) in &walk.nested_of {
        if rendered.insert(nested_start) {
            let _ = writeln!(out, "NESTED of S{}:", host);
            let sub = multiline(nfa, nested_start);
            for line in sub.lines() {
                let _ = writeln!(out, "  {}", line);
            }
        }
    }
    out
}

fn dot<T: Symbol, D: Default>(nfa: &Nfa<T, D>, start: StateId, compact: bool) -> String {
    let nl = if compact { " " } else { "\n" };
    let indent = if compact { "" } else { "  " };

    let mut out = String::new();
    let _ = write!(out, "digraph nfa {{{}", nl);
    let _ = write!(out, "{}rankdir=LR;{}", indent, nl);
    let _ = write!(out, "{}node [shape = doublecircle]; \"Final\";{}", indent, nl);
    let _ = write!(out, "{}node [shape = circle];{}", indent, nl);
    dot_body(&mut out, nfa, start, indent, nl, &mut HashSet::new());
    let _ = write!(out, "}}{}", nl);
    out
}

fn dot_body<T: Symbol, D: Default>(
    out: &mut String,
    nfa: &Nfa<T, D>,
    start: StateId,
    indent: &str,
    nl: &str,
    rendered_nested: &mut HashSet<StateId>,
) {
    let walk = walk(nfa, start);
    for edge in &walk.edges {
        let mut attrs = Vec::new();
        if let Some(label) = &edge.label {
            attrs.push(format!("label=\"{}\"", label));
        }
        if edge.dashed {
            attrs.push("style=dashed".to_string());
        }
        if edge.dotted {
            attrs.push("style=dotted".to_string());
        }
        let attr_str = if attrs.is_empty() {
            String::new()
        } else {
            format!(" [{}]", attrs.join(", "))
        };
        let _ = write!(
            out,
            "{}\"{}\" -> \"{}\"{};{}",
            indent,
            state_label(State::Id(edge.from)),
            state_label(edge.to),
            attr_str,
            nl
        );
    }
    for &(host, nested_start) in &walk.nested_of {
        if !rendered_nested.insert(nested_start) {
            continue;
        }
        let _ = write!(out, "{}subgraph cluster_S{} {{{}", indent, host, nl);
        let _ = write!(out, "{}{}label = \"nested of S{}\";{}", indent, indent, host, nl);
        dot_body(out, nfa, nested_start, &format!("{}{}", indent, indent), nl, rendered_nested);
        let _ = write!(out, "{}}}{}", indent, nl);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Nfa;

    fn sample() -> Nfa<char> {
        let mut nfa = Nfa::<char>::new(false);
        let s0 = START;
        let s1 = nfa.add_state(());
        nfa.add_transition(s0, s1, 'a');
        nfa.add_empty_transition(s1, State::Final);
        nfa
    }

    #[test]
    fn compact_dump_lists_every_edge() {
        let nfa = sample();
        let rendered = dump(&nfa, Mode::Compact);
        assert!(rendered.contains("S1->a S2"));
        assert!(rendered.contains("S2..> Final") || rendered.contains("S2.."));
    }

    #[test]
    fn multiline_dump_sections_states_and_transitions() {
        let nfa = sample();
        let rendered = dump(&nfa, Mode::Multiline);
        assert!(rendered.contains("START: S1"));
        assert!(rendered.contains("STATES:"));
        assert!(rendered.contains("TRANSITIONS:"));
    }

    #[test]
    fn dot_dump_is_a_valid_looking_digraph() {
        let nfa = sample();
        let rendered = dump(&nfa, Mode::Dot);
        assert!(rendered.starts_with("digraph nfa {"));
        assert!(rendered.contains("\"S1\" -> \"S2\""));
        assert!(rendered.trim_end().ends_with('}'));
    }

    #[test]
    fn dot_compact_has_no_embedded_newlines() {
        let nfa = sample();
        let rendered = dump(&nfa, Mode::DotCompact);
        assert!(!rendered.contains('\n'));
        assert!(rendered.starts_with("digraph nfa {"));
    }

    #[test]
    fn nested_sub_automaton_rendered_once_even_if_shared() {
        let mut nfa = Nfa::<char>::new(false);
        let host_a = nfa.add_state(());
        let host_b = nfa.add_state(());
        let inner = nfa.add_state(());
        nfa.add_empty_transition(inner, State::Final);
        let nested = nfa.create_nested(inner);
        nfa.set_nested(host_a, nested);
        nfa.set_nested(host_b, nested);
        nfa.add_transition(START, host_a, 'x');
        nfa.add_transition(START, host_b, 'y');

        let rendered = dump(&nfa, Mode::Compact);
        let occurrences = rendered.matches(&format!("nested=S{}", inner)).count();
        assert_eq!(occurrences, 1);
    }
}
