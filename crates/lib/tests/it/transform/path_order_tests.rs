//! Ordering properties of wildcard paths.

use configtree::transform::{PathSegment, WildcardPath};

fn segments() -> Vec<PathSegment> {
    vec![
        PathSegment::Index(0),
        PathSegment::Index(2),
        PathSegment::from("a"),
        PathSegment::from("b"),
        PathSegment::Wildcard,
    ]
}

/// Every path of up to three segments drawn from [`segments`].
fn all_paths() -> Vec<WildcardPath> {
    let mut paths = vec![WildcardPath::default()];
    let mut frontier = vec![WildcardPath::default()];
    for _ in 0..3 {
        let mut next = Vec::new();
        for path in &frontier {
            for segment in segments() {
                next.push(path.child(segment));
            }
        }
        paths.extend(next.iter().cloned());
        frontier = next;
    }
    paths
}

fn is_strict_prefix(short: &WildcardPath, long: &WildcardPath) -> bool {
    short.len() < long.len() && long.segments().starts_with(short.segments())
}

#[test]
fn test_descendants_sort_before_ancestors() {
    let paths = all_paths();
    for short in &paths {
        for long in &paths {
            if is_strict_prefix(short, long) {
                assert!(long < short, "{long} should sort before {short}");
            }
        }
    }
}

#[test]
fn test_concrete_segments_sort_before_wildcard() {
    let paths = all_paths();
    for a in &paths {
        for b in &paths {
            let Some(split) = a
                .segments()
                .iter()
                .zip(b.segments())
                .position(|(x, y)| x != y)
            else {
                continue;
            };
            if b.segments()[split].is_wildcard() {
                assert!(a < b, "{a} should sort before {b}");
            }
        }
    }
}

#[test]
fn test_ordering_is_total_and_consistent() {
    let paths = all_paths();
    for a in &paths {
        for b in &paths {
            assert_eq!(a.cmp(b), b.cmp(a).reverse());
            assert_eq!(a.cmp(b).is_eq(), a == b);
        }
    }
}
