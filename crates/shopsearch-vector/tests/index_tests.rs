use shopsearch_core::types::CatalogItem;
use shopsearch_core::Error;
use shopsearch_vector::FlatIndex;

fn item(name: &str) -> CatalogItem {
    CatalogItem::new(name, "a product", 10.0)
}

#[test]
fn query_orders_by_ascending_distance() {
    let index = FlatIndex::build(vec![
        (item("far"), vec![0.0, 1.0]),
        (item("near"), vec![1.0, 0.0]),
        (item("middle"), vec![0.7, 0.7]),
    ])
    .expect("build");

    let hits = index.query(&[1.0, 0.0], 3).expect("query");
    let names: Vec<&str> = hits.iter().map(|(_, i)| i.name.as_str()).collect();
    assert_eq!(names, vec!["near", "middle", "far"]);

    for pair in hits.windows(2) {
        assert!(pair[0].0 <= pair[1].0, "distances non-decreasing");
    }
    assert!(hits[0].0.abs() < 1e-6, "exact match has zero distance");
}

#[test]
fn query_returns_at_most_k_and_clamps_oversized_k() {
    let index = FlatIndex::build(vec![
        (item("a"), vec![1.0, 0.0]),
        (item("b"), vec![0.0, 1.0]),
    ])
    .expect("build");

    assert_eq!(index.query(&[1.0, 0.0], 1).expect("k=1").len(), 1);
    assert_eq!(index.query(&[1.0, 0.0], 10).expect("k>size clamps").len(), 2);
}

#[test]
fn empty_index_is_valid_and_answers_empty() {
    let index = FlatIndex::build(Vec::new()).expect("empty build");
    assert!(index.is_empty());
    assert_eq!(index.dim(), 0);

    let hits = index.query(&[1.0, 0.0], 5).expect("query on empty index");
    assert!(hits.is_empty());
}

#[test]
fn dimension_mismatch_is_a_configuration_error() {
    let index = FlatIndex::build(vec![(item("a"), vec![1.0, 0.0])]).expect("build");

    let err = index.query(&[1.0, 0.0, 0.0], 1).expect_err("wrong query dim");
    assert!(matches!(err, Error::DimensionMismatch { expected: 2, got: 3 }));

    let err = FlatIndex::build(vec![
        (item("a"), vec![1.0, 0.0]),
        (item("b"), vec![1.0]),
    ])
    .expect_err("mixed dims rejected at build");
    assert!(matches!(err, Error::DimensionMismatch { .. }));
}

#[test]
fn equal_distances_keep_index_order() {
    let index = FlatIndex::build(vec![
        (item("first"), vec![0.0, 1.0]),
        (item("second"), vec![0.0, -1.0]),
    ])
    .expect("build");

    // Both entries are equidistant from the query.
    let hits = index.query(&[0.0, 0.0], 2).expect("query");
    let names: Vec<&str> = hits.iter().map(|(_, i)| i.name.as_str()).collect();
    assert_eq!(names, vec!["first", "second"]);
}
