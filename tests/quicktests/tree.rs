use rank_bst::{Error, Key, Tree};
use quickcheck_macros::quickcheck;

use std::collections::{BTreeMap, BTreeSet, HashSet};

fn build(xs: &[i8]) -> Tree<i8, i8> {
    let mut tree = Tree::new();
    for x in xs {
        tree.put(*x, *x);
    }

    tree
}

#[quickcheck]
fn contains(xs: Vec<i8>) -> bool {
    let tree = build(&xs);

    xs.iter().all(|x| tree.get(&Key::new(*x)) == Ok(x))
}

#[quickcheck]
fn contains_not(xs: Vec<i8>, nots: Vec<i8>) -> bool {
    let tree = build(&xs);
    let added: HashSet<_> = xs.into_iter().collect();
    let nots: HashSet<_> = nots.into_iter().collect();
    let mut nots = nots.difference(&added);

    nots.all(|x| tree.get(&Key::new(*x)) == Err(Error::KeyNotFound))
}

#[quickcheck]
fn get_returns_latest_put(pairs: Vec<(i8, i8)>) -> bool {
    let mut tree = Tree::new();
    let mut latest = BTreeMap::new();
    for (k, v) in &pairs {
        tree.put(*k, *v);
        latest.insert(*k, *v);
    }

    tree.size() == latest.len()
        && latest
            .iter()
            .all(|(k, v)| tree.get(&Key::new(*k)) == Ok(v))
}

#[quickcheck]
fn select_inverts_rank(xs: Vec<i8>) -> bool {
    let tree = build(&xs);
    let sorted: Vec<i8> = xs.iter().copied().collect::<BTreeSet<_>>().into_iter().collect();

    let selects = sorted
        .iter()
        .enumerate()
        .all(|(i, x)| tree.select(i) == Ok(&Key::new(*x)) && tree.rank(&Key::new(*x)) == i);
    let out_of_range = tree.select(sorted.len())
        == Err(Error::IndexOutOfRange {
            index: sorted.len(),
            size: sorted.len(),
        });

    selects && out_of_range && tree.is_consistent()
}

#[quickcheck]
fn floor_is_greatest_key_not_above(xs: Vec<i8>, probe: i8) -> bool {
    let tree = build(&xs);
    let expected = xs.iter().copied().filter(|x| *x <= probe).max();

    match expected {
        Some(floor) => tree.floor(&Key::new(probe)) == Ok(&Key::new(floor)),
        None => tree.floor(&Key::new(probe)) == Err(Error::NoFloor),
    }
}

#[quickcheck]
fn ceiling_is_smallest_key_not_below(xs: Vec<i8>, probe: i8) -> bool {
    let tree = build(&xs);
    let expected = xs.iter().copied().filter(|x| *x >= probe).min();

    match expected {
        Some(ceiling) => tree.ceiling(&Key::new(probe)) == Ok(&Key::new(ceiling)),
        None => tree.ceiling(&Key::new(probe)) == Err(Error::NoCeiling),
    }
}

#[quickcheck]
fn keys_are_the_sorted_range(xs: Vec<i8>, lo: i8, hi: i8) -> bool {
    let tree = build(&xs);
    let expected: Vec<i8> = xs
        .iter()
        .copied()
        .filter(|x| lo <= *x && *x <= hi)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let keys: Vec<i8> = tree
        .keys(&Key::new(lo), &Key::new(hi))
        .into_iter()
        .map(|k| *k.get())
        .collect();

    keys == expected && tree.size_between(&Key::new(lo), &Key::new(hi)) == expected.len()
}

#[quickcheck]
fn delete_changes_size_by_presence(xs: Vec<i8>, deletes: Vec<i8>) -> bool {
    let mut tree = build(&xs);

    deletes.iter().all(|x| {
        let before = tree.size();
        let was_present = tree.contains(&Key::new(*x));
        let deleted = tree.delete(&Key::new(*x));

        let expected_size = if was_present { before - 1 } else { before };
        deleted.is_some() == was_present && tree.size() == expected_size && tree.is_consistent()
    })
}

#[quickcheck]
fn with_deletions(xs: Vec<i8>, deletes: Vec<i8>) -> bool {
    let mut tree = build(&xs);
    for delete in &deletes {
        tree.delete(&Key::new(*delete));
    }

    let mut still_present = xs;
    for delete in &deletes {
        // We may have inserted the same value multiple times - delete each one.
        while let Some(pos) = still_present.iter().position(|x| x == delete) {
            still_present.swap_remove(pos);
        }
    }

    deletes.iter().all(|x| !tree.contains(&Key::new(*x)))
        && still_present.iter().all(|x| tree.contains(&Key::new(*x)))
}

#[quickcheck]
fn iter_is_ascending(xs: Vec<i8>) -> bool {
    let tree = build(&xs);
    let keys: Vec<i8> = tree.iter().map(|(k, _)| *k.get()).collect();

    keys.len() == tree.size() && keys.windows(2).all(|w| w[0] < w[1])
}

#[quickcheck]
fn min_and_max_bracket_everything(xs: Vec<i8>) -> bool {
    let mut tree = build(&xs);

    match (xs.iter().min(), xs.iter().max()) {
        (Some(min), Some(max)) => {
            let bounds = tree.min() == Ok(&Key::new(*min)) && tree.max() == Ok(&Key::new(*max));
            let popped_min = tree.delete_min().map(|(k, _)| k.into_inner()) == Ok(*min);
            bounds && popped_min && !tree.contains(&Key::new(*min))
        }
        _ => tree.min() == Err(Error::EmptyTree) && tree.delete_min() == Err(Error::EmptyTree),
    }
}
