use anyhow::{bail, Context, Result};
use rdfkb::namespace::{owl, rdf, rdfs};
use rdfkb::serialization::{self, RdfFormat};
use rdfkb::{Formula, IndexedFormula, RdfsReasoning, StoreConfig, Term};
use std::path::Path;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    println!("rdfkb v{}", rdfkb::version());
    println!("==========================================");
    println!();

    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.as_slice() {
        [] => {
            demo_smushing()?;
            demo_pattern_queries()?;
            demo_schema()?;
        }
        [data] => load_and_report(Path::new(data), None)?,
        [data, config] => load_and_report(Path::new(data), Some(Path::new(config)))?,
        _ => bail!("usage: rdfkb [DATA.nt|DATA.nq [CONFIG.json]]"),
    }
    Ok(())
}

fn load_and_report(data: &Path, config: Option<&Path>) -> Result<()> {
    let config = match config {
        Some(path) => StoreConfig::from_json_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => StoreConfig::default(),
    };
    let mut kb = IndexedFormula::with_config(&config)?;

    let format = RdfFormat::from_path(data)
        .with_context(|| format!("unknown RDF format for {}", data.display()))?;
    let input = std::fs::read_to_string(data)
        .with_context(|| format!("reading {}", data.display()))?;
    let inserted = match format {
        RdfFormat::NTriples => kb.load_ntriples(&input)?,
        RdfFormat::NQuads => kb.load_nquads(&input)?,
    };
    kb.check()?;

    println!("=== {} ===", data.display());
    println!("  Statements stored: {}", inserted);
    println!("  Statements held:   {}", kb.len());
    println!("  Terms merged:      {}", kb.redirection_count());
    Ok(())
}

fn demo_smushing() -> Result<()> {
    println!("=== Demo 1: Smushing ===");
    let mut kb = IndexedFormula::new();

    let alice = kb.sym("http://example.org/alice")?;
    let alice_home = kb.sym("http://alice.example.com/#me")?;
    let name = kb.sym("http://xmlns.com/foaf/0.1/name")?;
    let mbox = kb.sym("http://xmlns.com/foaf/0.1/mbox")?;
    let mailbox = kb.sym("mailto:alice@example.org")?;

    kb.add(
        mbox.clone(),
        Term::NamedNode(rdf::type_()),
        Term::NamedNode(owl::inverse_functional_property()),
    )?;
    kb.add(alice.clone(), mbox.clone(), mailbox.clone())?;
    println!("✓ {} has mailbox {}", alice, mailbox);

    kb.add(alice_home.clone(), mbox, mailbox)?;
    kb.add(alice_home.clone(), name, "Alice")?;
    println!("✓ {} shares that mailbox", alice_home);

    println!("  canon({}) = {}", alice_home, kb.canon(&alice_home));
    for statement in kb.statements_matching(Some(&alice), None, None, None) {
        println!("  {}", statement.to_nt());
    }
    println!();
    Ok(())
}

fn demo_pattern_queries() -> Result<()> {
    println!("=== Demo 2: Pattern queries ===");
    let mut kb = IndexedFormula::new();
    let input = r#"
<http://example.org/alice> <http://xmlns.com/foaf/0.1/knows> <http://example.org/bob> .
<http://example.org/alice> <http://xmlns.com/foaf/0.1/knows> <http://example.org/carol> .
<http://example.org/bob> <http://xmlns.com/foaf/0.1/knows> <http://example.org/carol> .
<http://example.org/carol> <http://xmlns.com/foaf/0.1/age> "35"^^<http://www.w3.org/2001/XMLSchema#integer> .
"#;
    let inserted = kb.load_ntriples(input)?;
    println!("✓ Loaded {} statements", inserted);

    let alice = kb.sym("http://example.org/alice")?;
    let knows = kb.sym("http://xmlns.com/foaf/0.1/knows")?;
    let carol = kb.sym("http://example.org/carol")?;
    let age = kb.sym("http://xmlns.com/foaf/0.1/age")?;

    let friends = kb.each(Some(&alice), Some(&knows), None, None);
    println!("  alice knows: {}", join(&friends));
    let fans = kb.each(None, Some(&knows), Some(&carol), None);
    println!("  who knows carol: {}", join(&fans));
    if let Some(value) = kb.any_native(Some(&carol), Some(&age), None, None) {
        println!("  carol's age: {:?}", value);
    }

    println!("\nAs N-Triples:");
    print!("{}", serialization::write_ntriples(kb.statements())?);
    println!();
    Ok(())
}

fn demo_schema() -> Result<()> {
    println!("=== Demo 3: RDFS types ===");
    let mut kb = IndexedFormula::new();
    let sub_class_of = Term::NamedNode(rdfs::sub_class_of());
    let type_ = Term::NamedNode(rdf::type_());

    let animal = kb.sym("http://example.org/Animal")?;
    let mammal = kb.sym("http://example.org/Mammal")?;
    let dog = kb.sym("http://example.org/Dog")?;
    let rex = kb.sym("http://example.org/rex")?;

    kb.add(mammal.clone(), sub_class_of.clone(), animal)?;
    kb.add(dog.clone(), sub_class_of, mammal)?;
    kb.add(rex.clone(), type_, dog)?;

    let types = kb.find_type_uris(&rex);
    println!("  rex is a: {}", types.keys().cloned().collect::<Vec<_>>().join(", "));
    let bottom = kb.bottom_type_uris(&types);
    println!("  most specific: {}", bottom.keys().cloned().collect::<Vec<_>>().join(", "));
    Ok(())
}

fn join(terms: &[Term]) -> String {
    terms.iter().map(|t| t.to_string()).collect::<Vec<_>>().join(", ")
}
