//! RDFS backward chaining
//!
//! Hand-written lookups over the subclass, domain and range axioms. Class
//! sets are keyed by the N-Triples form of the class so blank-node classes
//! work too; the `*_uris` variants keep only named classes.

use super::Formula;
use crate::namespace::{owl, rdf, rdfs};
use crate::statement::Statement;
use crate::term::{NamedNode, Term};
use indexmap::IndexMap;
use rustc_hash::FxHashSet;

/// RDFS helpers available on every [`Formula`]
pub trait RdfsReasoning: Formula {
    /// Everything reachable from `seeds` along `predicate` (or against it
    /// when `inverse`), seeds included. Each reached key inherits the value
    /// of the seed it was reached from.
    fn transitive_closure<V: Clone>(
        &self,
        seeds: IndexMap<String, V>,
        predicate: &Term,
        inverse: bool,
    ) -> IndexMap<String, V> {
        let mut agenda = seeds;
        let mut done: IndexMap<String, V> = IndexMap::new();
        while let Some((key, value)) = agenda.shift_remove_index(0) {
            done.insert(key.clone(), value.clone());
            let Ok(node) = self.from_nt(&key) else {
                continue;
            };
            let next = if inverse {
                self.each(None, Some(predicate), Some(&node), None)
            } else {
                self.each(Some(&node), Some(predicate), None, None)
            };
            for term in next {
                let nt = term.to_nt();
                if done.contains_key(&nt) || agenda.contains_key(&nt) {
                    continue;
                }
                agenda.insert(nt, value.clone());
            }
        }
        done
    }

    /// Classes the subject can be inferred to belong to, each with the
    /// statement that gave it away
    fn find_types_nt(&self, subject: &Term) -> IndexMap<String, Statement> {
        let type_ = Term::NamedNode(rdf::type_());
        let domain = Term::NamedNode(rdfs::domain());
        let range = Term::NamedNode(rdfs::range());
        let mut types = IndexMap::new();

        for st in self.statements_matching(Some(subject), None, None, None) {
            if st.predicate == type_ {
                types.insert(st.object.to_nt(), st.clone());
            } else {
                for class in self.each(Some(&st.predicate), Some(&domain), None, None) {
                    types.insert(class.to_nt(), st.clone());
                }
            }
        }
        for st in self.statements_matching(None, None, Some(subject), None) {
            for class in self.each(Some(&st.predicate), Some(&range), None, None) {
                types.insert(class.to_nt(), st.clone());
            }
        }
        self.transitive_closure(types, &Term::NamedNode(rdfs::sub_class_of()), false)
    }

    fn find_type_uris(&self, subject: &Term) -> IndexMap<String, Statement> {
        nt_to_uri(self.find_types_nt(subject))
    }

    /// The class and all its stored superclasses
    fn find_super_classes_nt(&self, class: &Term) -> IndexMap<String, bool> {
        let seeds = IndexMap::from([(class.to_nt(), true)]);
        self.transitive_closure(seeds, &Term::NamedNode(rdfs::sub_class_of()), false)
    }

    /// The class and all its stored subclasses
    fn find_sub_classes_nt(&self, class: &Term) -> IndexMap<String, bool> {
        let seeds = IndexMap::from([(class.to_nt(), true)]);
        self.transitive_closure(seeds, &Term::NamedNode(rdfs::sub_class_of()), true)
    }

    /// Things that can be inferred to be members of the class or one of its
    /// subclasses: typed directly, or used with a property whose domain or
    /// range is such a class
    fn find_members_nt(&self, class: &Term) -> IndexMap<String, Statement> {
        let type_ = Term::NamedNode(rdf::type_());
        let domain = Term::NamedNode(rdfs::domain());
        let range = Term::NamedNode(rdfs::range());
        let mut members = IndexMap::new();

        for key in self.find_sub_classes_nt(class).into_keys() {
            let Ok(sub_class) = self.from_nt(&key) else {
                continue;
            };
            for st in self.statements_matching(None, Some(&type_), Some(&sub_class), None) {
                members.insert(st.subject.to_nt(), st.clone());
            }
            for property in self.each(None, Some(&domain), Some(&sub_class), None) {
                for st in self.statements_matching(None, Some(&property), None, None) {
                    members.insert(st.subject.to_nt(), st.clone());
                }
            }
            for property in self.each(None, Some(&range), Some(&sub_class), None) {
                for st in self.statements_matching(None, Some(&property), None, None) {
                    members.insert(st.object.to_nt(), st.clone());
                }
            }
        }
        members
    }

    fn find_member_uris(&self, class: &Term) -> IndexMap<String, Statement> {
        nt_to_uri(self.find_members_nt(class))
    }

    /// The types that have no stored superclass other than rdfs:Resource.
    /// rdfs:Resource and owl:Thing themselves are dropped.
    fn top_type_uris<V: Clone>(&self, types: &IndexMap<String, V>) -> IndexMap<String, V> {
        let sub_class_of = Term::NamedNode(rdfs::sub_class_of());
        types
            .iter()
            .filter(|(uri, _)| uri.as_str() != rdfs::RESOURCE && uri.as_str() != owl::THING)
            .filter(|(uri, _)| {
                let Ok(class) = NamedNode::new(uri.as_str()) else {
                    return true;
                };
                self.each(Some(&Term::NamedNode(class)), Some(&sub_class_of), None, None)
                    .iter()
                    .all(|sup| sup.value() == rdfs::RESOURCE)
            })
            .map(|(uri, v)| (uri.clone(), v.clone()))
            .collect()
    }

    /// The types none of whose stored subclasses are also in `types`
    fn bottom_type_uris<V: Clone>(&self, types: &IndexMap<String, V>) -> IndexMap<String, V> {
        let sub_class_of = Term::NamedNode(rdfs::sub_class_of());
        types
            .iter()
            .filter(|(uri, _)| {
                let Ok(class) = NamedNode::new(uri.as_str()) else {
                    return true;
                };
                self.each(None, Some(&sub_class_of), Some(&Term::NamedNode(class)), None)
                    .iter()
                    .all(|sub| !(sub.is_named_node() && types.contains_key(sub.value())))
            })
            .map(|(uri, v)| (uri.clone(), v.clone()))
            .collect()
    }

    /// Statements touching `subject`, directly or through chains of blank
    /// nodes, optionally limited to one graph. Statements whose predicate is
    /// in `exclude_predicates` are skipped.
    fn connected_statements(
        &self,
        subject: &Term,
        graph: Option<&Term>,
        exclude_predicates: &[&str],
    ) -> Vec<Statement> {
        let mut todo = vec![subject.clone()];
        let mut queued: FxHashSet<String> = FxHashSet::default();
        let mut seen_arcs: FxHashSet<String> = FxHashSet::default();
        let mut result = Vec::new();

        while !todo.is_empty() {
            let node = todo.remove(0);
            let incoming = self.statements_matching(None, None, Some(&node), graph);
            let outgoing = self.statements_matching(Some(&node), None, None, graph);
            for st in incoming.into_iter().chain(outgoing) {
                if st.predicate.is_named_node() && exclude_predicates.contains(&st.predicate.value()) {
                    continue;
                }
                if !seen_arcs.insert(st.to_nt()) {
                    continue;
                }
                for end in [&st.subject, &st.object] {
                    if end.is_blank_node() && queued.insert(end.value().to_string()) {
                        todo.push(end.clone());
                    }
                }
                result.push(st.clone());
            }
        }
        result
    }
}

impl<F: Formula + ?Sized> RdfsReasoning for F {}

/// Keep only named classes, keyed by bare IRI
fn nt_to_uri<V>(classes: IndexMap<String, V>) -> IndexMap<String, V> {
    classes
        .into_iter()
        .filter_map(|(nt, v)| {
            nt.strip_prefix('<')
                .and_then(|rest| rest.strip_suffix('>'))
                .map(|iri| (iri.to_string(), v))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formula::ListFormula;

    fn sym(iri: &str) -> Term {
        Term::NamedNode(NamedNode::new(iri).unwrap())
    }

    fn taxonomy() -> ListFormula {
        let sub = sym(rdfs::SUB_CLASS_OF);
        let mut f = ListFormula::new();
        f.add(sym("ex:Dog"), sub.clone(), sym("ex:Mammal"), None).unwrap();
        f.add(sym("ex:Mammal"), sub.clone(), sym("ex:Animal"), None).unwrap();
        f.add(sym("ex:Animal"), sub, sym("ex:Mammal"), None).unwrap();
        f.add(sym("ex:rex"), sym(rdf::TYPE), sym("ex:Dog"), None).unwrap();
        f.add(sym("ex:owns"), sym(rdfs::RANGE), sym("ex:Animal"), None).unwrap();
        f.add(sym("ex:ann"), sym("ex:owns"), sym("ex:tom"), None).unwrap();
        f
    }

    #[test]
    fn test_super_classes_survive_cycles() {
        let f = taxonomy();
        let supers = f.find_super_classes_nt(&sym("ex:Dog"));
        let keys: Vec<_> = supers.keys().cloned().collect();
        assert_eq!(keys, vec!["<ex:Dog>", "<ex:Mammal>", "<ex:Animal>"]);
    }

    #[test]
    fn test_sub_classes() {
        let f = taxonomy();
        let subs = f.find_sub_classes_nt(&sym("ex:Mammal"));
        assert!(subs.contains_key("<ex:Dog>"));
        assert!(subs.contains_key("<ex:Animal>"));
    }

    #[test]
    fn test_find_types_follows_range_and_subclass() {
        let f = taxonomy();
        let types = f.find_type_uris(&sym("ex:rex"));
        assert!(types.contains_key("ex:Dog"));
        assert!(types.contains_key("ex:Animal"));

        let tom = f.find_type_uris(&sym("ex:tom"));
        assert!(tom.contains_key("ex:Animal"));
        assert!(!tom.contains_key("ex:Dog"));
    }

    #[test]
    fn test_find_members() {
        let f = taxonomy();
        let members = f.find_member_uris(&sym("ex:Animal"));
        assert!(members.contains_key("ex:rex"));
        assert!(members.contains_key("ex:tom"));
        assert!(!members.contains_key("ex:ann"));
    }

    #[test]
    fn test_top_and_bottom_types() {
        let sub = sym(rdfs::SUB_CLASS_OF);
        let mut f = ListFormula::new();
        f.add(sym("ex:Dog"), sub.clone(), sym("ex:Mammal"), None).unwrap();
        f.add(sym("ex:Mammal"), sub, sym(rdfs::RESOURCE), None).unwrap();

        let types: IndexMap<String, bool> = [
            ("ex:Dog".to_string(), true),
            ("ex:Mammal".to_string(), true),
            (owl::THING.to_string(), true),
        ]
        .into_iter()
        .collect();

        let tops = f.top_type_uris(&types);
        assert_eq!(tops.keys().collect::<Vec<_>>(), vec!["ex:Mammal"]);

        let bottoms = f.bottom_type_uris(&types);
        assert!(bottoms.contains_key("ex:Dog"));
        assert!(!bottoms.contains_key("ex:Mammal"));
    }

    #[test]
    fn test_connected_statements_walks_blank_nodes() {
        let mut f = ListFormula::new();
        let b = Term::BlankNode(crate::term::BlankNode::new("addr"));
        f.add(sym("ex:ann"), sym("ex:address"), b.clone(), None).unwrap();
        f.add(b, sym("ex:city"), sym("ex:Paris"), None).unwrap();
        f.add(sym("ex:bob"), sym("ex:city"), sym("ex:Rome"), None).unwrap();
        f.add(sym("ex:ann"), sym("ex:secret"), sym("ex:x"), None).unwrap();

        let connected = f.connected_statements(&sym("ex:ann"), None, &["ex:secret"]);
        assert_eq!(connected.len(), 2);
    }
}
