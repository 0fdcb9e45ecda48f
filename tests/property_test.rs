//! Property-based tests for the indexed store

use proptest::prelude::*;
use rdfkb::{Formula, IndexedFormula, ListFormula, Literal, NamedNode, QuadPattern, Statement, Term};

const NODES: usize = 6;

fn node(i: usize) -> Term {
    Term::NamedNode(NamedNode::new(format!("http://example.org/n{}", i)).unwrap())
}

fn predicate(i: usize) -> Term {
    Term::NamedNode(NamedNode::new(format!("http://example.org/p{}", i)).unwrap())
}

fn graph(i: usize) -> Term {
    Term::NamedNode(NamedNode::new(format!("http://example.org/g{}", i)).unwrap())
}

fn object(i: usize) -> Term {
    if i < NODES {
        node(i)
    } else {
        Term::Literal(Literal::new_simple(format!("v{}", i - NODES)))
    }
}

#[derive(Debug, Clone)]
enum Op {
    Add(usize, usize, usize, usize),
    /// Remove the n-th stored statement, modulo the store size
    Remove(usize),
    Equate(usize, usize),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        6 => (0..NODES, 0..3usize, 0..NODES + 3, 0..2usize)
            .prop_map(|(s, p, o, g)| Op::Add(s, p, o, g)),
        2 => any::<usize>().prop_map(Op::Remove),
        1 => (0..NODES, 0..NODES).prop_map(|(a, b)| Op::Equate(a, b)),
    ]
}

/// A pattern over the same universe, each position possibly a wildcard
fn pattern_strategy() -> impl Strategy<Value = QuadPattern> {
    (
        prop::option::of(0..NODES),
        prop::option::of(0..3usize),
        prop::option::of(0..NODES + 3),
        prop::option::of(0..2usize),
    )
        .prop_map(|(s, p, o, g)| {
            QuadPattern::new(s.map(node), p.map(predicate), o.map(object), g.map(graph))
        })
}

fn apply(kb: &mut IndexedFormula, op: &Op) {
    match op {
        Op::Add(s, p, o, g) => {
            kb.add_in(node(*s), predicate(*p), object(*o), graph(*g)).unwrap();
        }
        Op::Remove(n) => {
            if kb.is_empty() {
                return;
            }
            let doomed = kb.statements().nth(n % kb.len()).cloned().unwrap();
            kb.remove(&doomed).unwrap();
        }
        Op::Equate(a, b) => {
            kb.equate(&node(*a), &node(*b)).unwrap();
        }
    }
}

fn sorted_nq(statements: Vec<&Statement>) -> Vec<String> {
    let mut lines: Vec<String> = statements.into_iter().map(Statement::to_nq).collect();
    lines.sort();
    lines
}

/// Linear scan comparing canonical forms
fn naive_match<'a>(kb: &'a IndexedFormula, pattern: &QuadPattern) -> Vec<&'a Statement> {
    kb.statements()
        .filter(|st| {
            pattern
                .given()
                .all(|(position, term)| kb.canon(st.term(position)) == kb.canon(term))
        })
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn prop_indexes_stay_consistent(ops in prop::collection::vec(op_strategy(), 0..60)) {
        let mut kb = IndexedFormula::new();
        for op in &ops {
            apply(&mut kb, op);
            prop_assert!(kb.check().is_ok());
        }
    }

    #[test]
    fn prop_match_agrees_with_scan(
        ops in prop::collection::vec(op_strategy(), 0..60),
        patterns in prop::collection::vec(pattern_strategy(), 1..8),
    ) {
        let mut kb = IndexedFormula::new();
        for op in &ops {
            apply(&mut kb, op);
        }
        for pattern in &patterns {
            let indexed = sorted_nq(kb.statements_matching_with(pattern, false));
            let scanned = sorted_nq(naive_match(&kb, pattern));
            prop_assert_eq!(indexed, scanned);

            let one = kb.statements_matching_with(pattern, true);
            prop_assert!(one.len() <= 1);
            prop_assert_eq!(one.is_empty(), naive_match(&kb, pattern).is_empty());
        }
    }

    #[test]
    fn prop_match_without_merges_agrees_with_list(
        adds in prop::collection::vec((0..NODES, 0..3usize, 0..NODES + 3, 0..2usize), 0..40),
        pattern in pattern_strategy(),
    ) {
        let mut kb = IndexedFormula::with_features(&[]);
        let mut list = ListFormula::new();
        for (s, p, o, g) in adds {
            if kb.add_in(node(s), predicate(p), object(o), graph(g)).unwrap().is_inserted() {
                list.add(node(s), predicate(p), object(o), Some(graph(g))).unwrap();
            }
        }
        prop_assert_eq!(kb.len(), list.len());
        prop_assert_eq!(
            sorted_nq(kb.statements_matching_with(&pattern, false)),
            sorted_nq(list.statements_matching_with(&pattern, false))
        );
    }

    #[test]
    fn prop_add_is_idempotent(s in 0..NODES, p in 0..3usize, o in 0..NODES + 3) {
        let mut kb = IndexedFormula::new();
        kb.add(node(s), predicate(p), object(o)).unwrap();
        let before = kb.len();
        kb.add(node(s), predicate(p), object(o)).unwrap();
        prop_assert_eq!(kb.len(), before);
        prop_assert_eq!(kb.whether(Some(&node(s)), Some(&predicate(p)), Some(&object(o)), None), 1);
        prop_assert!(kb.check().is_ok());
    }

    #[test]
    fn prop_equate_order_independent(
        pairs in prop::collection::vec((0..NODES, 0..NODES), 1..6),
        adds in prop::collection::vec((0..NODES, 0..3usize, 0..NODES + 3), 0..20),
    ) {
        let build = |order: &[(usize, usize)]| {
            let mut kb = IndexedFormula::new();
            for (s, p, o) in &adds {
                kb.add(node(*s), predicate(*p), object(*o)).unwrap();
            }
            for (a, b) in order {
                kb.equate(&node(*a), &node(*b)).unwrap();
            }
            kb
        };
        let forward = build(pairs.as_slice());
        let reversed: Vec<(usize, usize)> = pairs.iter().rev().map(|(a, b)| (*b, *a)).collect();
        let backward = build(reversed.as_slice());

        for i in 0..NODES {
            prop_assert_eq!(forward.canon(&node(i)), backward.canon(&node(i)));
            let canonical = forward.canon(&node(i));
            prop_assert_eq!(forward.canon(&canonical), canonical);
        }
        for s in 0..NODES {
            prop_assert_eq!(
                forward.whether(Some(&node(s)), None, None, None),
                backward.whether(Some(&node(s)), None, None, None)
            );
        }
    }
}
