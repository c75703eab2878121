mod common;

use proptest::prelude::*;

use bel::Format;

const GENES: &[&str] = &["HGNC:AKT1", "HGNC:EGF", "HGNC:TP53", "EG:207", "SP:P01133", "HGNC:NOPE"];

fn abundance() -> impl Strategy<Value = String> {
    let protein = prop::sample::select(GENES).prop_map(|term| format!("p({term})"));
    protein.prop_recursive(2, 8, 3, |inner| {
        prop::collection::vec(inner, 1..4).prop_map(|args| format!("complex({})", args.join(", ")))
    })
}

fn statement() -> impl Strategy<Value = String> {
    (
        abundance(),
        prop::option::of((prop::sample::select(&["->", "-|", "increases"][..]), abundance())),
    )
        .prop_map(|(subject, rest)| match rest {
            Some((relation, object)) => format!("{subject} {relation} {object}"),
            None => subject,
        })
}

proptest! {
    #[test]
    fn canonicalize_is_idempotent(text in statement()) {
        let engine = common::engine("[canonicalize]\nHGNC = [\"EG\", \"SP\"]\nSP = [\"EG\"]\n");
        let mut statement = engine.parse(&text).unwrap();

        engine.canonicalize(&mut statement).unwrap();
        let once = engine.render(&statement, Format::Long);

        let rewrites = engine.canonicalize(&mut statement).unwrap();
        prop_assert_eq!(rewrites, 0);
        prop_assert_eq!(engine.render(&statement, Format::Long), once);
    }

    #[test]
    fn computed_edges_are_deterministic(text in statement()) {
        let engine = common::engine("");
        let statement = engine.parse(&text).unwrap();

        let first = engine.compute_edges(&statement, None, Format::Medium);
        let second = engine.compute_edges(&statement, None, Format::Medium);
        prop_assert_eq!(&first, &second);

        let complexes = statement
            .preorder()
            .into_iter()
            .filter(|&id| statement.function(id).is_some_and(|f| f.name() == "complexAbundance"))
            .map(|id| statement.args(id).len())
            .sum::<usize>();
        prop_assert_eq!(first.len(), complexes);
    }
}
