use rdfkb::namespace::{link, owl, rdf};
use rdfkb::{
    AddOutcome, CanonicalDataFactory, ClassAction, Fetcher, Formula, Indexable, IndexedFormula,
    InterningDataFactory, Literal, NamedNode, PropertyAction, SmushFeature, StoreError, Term,
};
use std::sync::{Arc, Mutex};

fn sym(iri: &str) -> Term {
    Term::NamedNode(NamedNode::new(iri).unwrap())
}

fn same_as() -> Term {
    Term::NamedNode(owl::same_as())
}

fn type_() -> Term {
    Term::NamedNode(rdf::type_())
}

/// Statements with every term replaced by its canonical form, as sorted
/// N-Quads lines
fn canonical_contents(kb: &IndexedFormula) -> Vec<String> {
    let mut lines: Vec<String> = kb
        .statements()
        .map(|st| {
            format!(
                "{} {} {} {}",
                kb.canon(&st.subject).to_nt(),
                kb.canon(&st.predicate).to_nt(),
                kb.canon(&st.object).to_nt(),
                kb.canon(&st.graph).to_nt()
            )
        })
        .collect();
    lines.sort();
    lines.dedup();
    lines
}

#[test]
fn test_same_as_merges_and_is_consumed() {
    let mut kb = IndexedFormula::new();
    let a = sym("ex:a");
    let a2 = sym("ex:a2");
    let age = sym("ex:age");

    let outcome = kb.add(a.clone(), same_as(), a2.clone()).unwrap();
    assert_eq!(outcome, AddOutcome::Consumed);
    assert!(kb
        .statements_matching(None, Some(&same_as()), None, None)
        .is_empty());

    kb.add(a2.clone(), age.clone(), Term::Literal(Literal::new_simple("30"))).unwrap();

    let found = kb.statements_matching(Some(&a), Some(&age), None, None);
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].object.value(), "30");
    assert_eq!(kb.canon(&a2), kb.canon(&a));
    // The smaller IRI survives
    assert_eq!(kb.canon(&a2), a);
    kb.check().unwrap();
}

#[test]
fn test_merge_moves_existing_statements() {
    let mut kb = IndexedFormula::new();
    let a = sym("ex:a");
    let b = sym("ex:b");
    kb.add(b.clone(), sym("ex:name"), "Bee").unwrap();
    kb.add(sym("ex:c"), sym("ex:knows"), b.clone()).unwrap();

    kb.add(b.clone(), same_as(), a.clone()).unwrap();

    assert_eq!(kb.statements_matching(Some(&a), Some(&sym("ex:name")), None, None).len(), 1);
    assert_eq!(kb.statements_matching(None, Some(&sym("ex:knows")), Some(&a), None).len(), 1);
    assert!(kb.same_things(&a, &b));
    assert_eq!(kb.uris(&b), vec!["ex:a".to_string(), "ex:b".to_string()]);

    // Bookkeeping link from the survivor to the absorbed IRI
    assert!(kb.holds(
        Some(&a),
        Some(&Term::NamedNode(link::uri())),
        Some(&Term::Literal(Literal::new_simple("ex:b"))),
        None
    ));
    kb.check().unwrap();
}

#[test]
fn test_inverse_functional_property_merges_subjects() {
    let mut kb = IndexedFormula::new();
    let mbox = sym("foaf:mbox");
    let mailbox = sym("mailto:joe@example.org");

    kb.add(mbox.clone(), type_(), Term::NamedNode(owl::inverse_functional_property())).unwrap();
    assert_eq!(kb.property_actions(&mbox).len(), 1);

    kb.add(sym("ex:joe"), mbox.clone(), mailbox.clone()).unwrap();
    let outcome = kb.add(sym("ex:joseph"), mbox.clone(), mailbox.clone()).unwrap();
    assert_eq!(outcome, AddOutcome::Duplicate);

    assert!(kb.same_things(&sym("ex:joe"), &sym("ex:joseph")));
    assert_eq!(kb.statements_matching(None, Some(&mbox), Some(&mailbox), None).len(), 1);
    kb.check().unwrap();
}

#[test]
fn test_functional_property_merges_objects() {
    let mut kb = IndexedFormula::new();
    let mother = sym("ex:mother");

    kb.add(sym("ex:kid"), mother.clone(), sym("ex:mum")).unwrap();
    kb.add(sym("ex:kid"), mother.clone(), sym("ex:mom")).unwrap();
    assert!(!kb.same_things(&sym("ex:mum"), &sym("ex:mom")));

    // Declaring the property functional replays it over stored statements
    kb.add(mother.clone(), type_(), Term::NamedNode(owl::functional_property())).unwrap();
    assert!(kb.same_things(&sym("ex:mum"), &sym("ex:mom")));
    assert_eq!(kb.canon(&sym("ex:mum")), sym("ex:mom"));

    // Re-declaring is a no-op
    kb.add(mother.clone(), type_(), Term::NamedNode(owl::functional_property())).unwrap();
    assert_eq!(kb.property_actions(&mother).len(), 1);
    kb.check().unwrap();
}

#[test]
fn test_features_gate_smushing() {
    let mut kb = IndexedFormula::with_features(&[SmushFeature::SameAs]);
    let mbox = sym("foaf:mbox");
    kb.add(mbox.clone(), type_(), Term::NamedNode(owl::inverse_functional_property())).unwrap();
    kb.add(sym("ex:x"), mbox.clone(), sym("mailto:x@example.org")).unwrap();
    kb.add(sym("ex:y"), mbox, sym("mailto:x@example.org")).unwrap();

    assert!(!kb.same_things(&sym("ex:x"), &sym("ex:y")));
    assert_eq!(kb.redirection_count(), 0);
}

#[test]
fn test_equate_order_independent() {
    let (a, b, c) = (sym("ex:a"), sym("ex:b"), sym("ex:c"));
    let seed = |kb: &mut IndexedFormula| {
        kb.add(a.clone(), sym("ex:p"), "A").unwrap();
        kb.add(b.clone(), sym("ex:p"), "B").unwrap();
        kb.add(c.clone(), sym("ex:q"), b.clone()).unwrap();
    };

    let mut first = IndexedFormula::new();
    seed(&mut first);
    first.equate(&a, &b).unwrap();
    first.equate(&b, &c).unwrap();

    let mut second = IndexedFormula::new();
    seed(&mut second);
    second.equate(&a, &c).unwrap();
    second.equate(&a, &b).unwrap();

    for term in [&a, &b, &c] {
        assert_eq!(first.canon(term), second.canon(term));
    }
    assert_eq!(canonical_contents(&first), canonical_contents(&second));
    first.check().unwrap();
    second.check().unwrap();
}

#[test]
fn test_canon_is_idempotent_after_chains() {
    let mut kb = IndexedFormula::new();
    // Each merge absorbs the previous survivor
    let terms: Vec<Term> = ["ex:e", "ex:d", "ex:c", "ex:b", "ex:a"]
        .iter()
        .map(|iri| sym(iri))
        .collect();
    for pair in terms.windows(2) {
        kb.equate(&pair[0], &pair[1]).unwrap();
    }
    for term in &terms {
        let once = kb.canon(term);
        assert_eq!(kb.canon(&once), once);
        assert_eq!(once, sym("ex:a"));
    }
    assert_eq!(kb.all_aliases(&sym("ex:e")).len(), 5);
}

#[test]
fn test_blank_node_absorbed_by_named_node() {
    let mut kb = IndexedFormula::new();
    let blank = kb.bnode(None);
    let named = sym("ex:someone");
    kb.add(blank.clone(), sym("ex:name"), "Someone").unwrap();
    kb.equate(&blank, &named).unwrap();

    // Named nodes sort before blank nodes
    assert_eq!(kb.canon(&blank), named);
    assert_eq!(kb.statements_matching(Some(&named), None, None, None).len(), 1);
}

#[derive(Debug, Clone, Default)]
struct Recorder {
    seen: Arc<Mutex<Vec<(String, String)>>>,
}

impl Fetcher for Recorder {
    fn app_node(&self) -> Option<Term> {
        Some(sym("http://example.org/app"))
    }

    fn now_known_as(&mut self, old: &Term, new: &Term) {
        self.seen
            .lock()
            .unwrap()
            .push((old.value().to_string(), new.value().to_string()));
    }
}

#[test]
fn test_fetcher_notified_and_supplies_graph() {
    let recorder = Recorder::default();
    let seen = Arc::clone(&recorder.seen);

    let mut kb = IndexedFormula::new();
    kb.set_fetcher(Box::new(recorder));
    assert_eq!(kb.default_graph(), sym("http://example.org/app"));

    kb.add(sym("ex:x"), sym("ex:p"), "v").unwrap();
    assert_eq!(kb.statements().next().unwrap().graph, sym("http://example.org/app"));

    kb.equate(&sym("ex:y"), &sym("ex:x")).unwrap();
    assert_eq!(
        seen.lock().unwrap().as_slice(),
        &[("ex:y".to_string(), "ex:x".to_string())]
    );
}

#[test]
fn test_custom_property_action() {
    let mut kb = IndexedFormula::new();
    let nick = sym("ex:nick");
    kb.add(sym("ex:a"), nick.clone(), "al").unwrap();

    let acted = kb
        .new_property_action(
            &nick,
            PropertyAction::custom(|store, st| {
                let tagged = sym("ex:hasNick");
                store.add(st.subject.clone(), tagged, Term::Literal(Literal::new_simple("yes")))?;
                Ok(true)
            }),
        )
        .unwrap();
    assert!(acted);

    // Custom actions never consume the statement
    let outcome = kb.add(sym("ex:b"), nick.clone(), "bee").unwrap();
    assert!(outcome.is_inserted());
    assert_eq!(kb.statements_matching(None, Some(&sym("ex:hasNick")), None, None).len(), 2);
    assert_eq!(kb.statements_matching(None, Some(&nick), None, None).len(), 2);
}

#[test]
fn test_failing_action_aborts_add() {
    let mut kb = IndexedFormula::new();
    kb.new_class_action(
        &sym("ex:Forbidden"),
        ClassAction::custom(|_, st| Err(StoreError::Action(format!("refused {}", st.subject)))),
    );
    let err = kb.add(sym("ex:x"), type_(), sym("ex:Forbidden")).unwrap_err();
    assert!(matches!(err, StoreError::Action(_)));
    assert!(kb.is_empty());
}

#[test]
fn test_actions_follow_merged_predicate() {
    let mut kb = IndexedFormula::new();
    let email = sym("ex:email");
    let mail = sym("ex:mail");
    kb.add(mail.clone(), type_(), Term::NamedNode(owl::inverse_functional_property())).unwrap();
    kb.equate(&email, &mail).unwrap();

    // ex:mail was absorbed, its action now sits on ex:email
    assert_eq!(kb.property_actions(&email).len(), 1);
    kb.add(sym("ex:p1"), mail.clone(), "p@example.org").unwrap();
    kb.add(sym("ex:p2"), email, "p@example.org").unwrap();
    assert!(kb.same_things(&sym("ex:p1"), &sym("ex:p2")));
}

#[test]
fn test_smushing_with_surrogate_ids() {
    let factory = Arc::new(InterningDataFactory::new(CanonicalDataFactory::new()));
    let mut kb = IndexedFormula::with_factory(factory, &SmushFeature::ALL);
    let (a, b) = (sym("http://example.org/a"), sym("http://example.org/b"));
    let mbox = sym("http://xmlns.com/foaf/0.1/mbox");
    kb.add(mbox.clone(), type_(), Term::NamedNode(owl::inverse_functional_property())).unwrap();

    kb.add(a.clone(), mbox.clone(), sym("mailto:ann@example.org")).unwrap();
    kb.add(b.clone(), sym("http://example.org/age"), 41i64).unwrap();
    kb.add(b.clone(), mbox, sym("mailto:ann@example.org")).unwrap();

    assert_eq!(kb.canon(&a), kb.canon(&b));
    assert_eq!(kb.canon(&b), a);
    assert!(matches!(kb.canon_id(&b), Indexable::Surrogate(_)));
    assert_eq!(
        kb.statements_matching(Some(&b), Some(&sym("http://example.org/age")), None, None).len(),
        1
    );
    assert!(kb.holds(Some(&a), Some(&sym("http://example.org/age")), None, None));
    kb.check().unwrap();
}
