use proptest::prelude::*;
use vdom::DiffStrategy;
use vdom_test_support::keyed::run_reorder;
use vdom_test_support::{SweepRng, minimal_moves, sweep_rounds};

/// Random update: shuffle a prefix of the pool, drop some keys, add some new ones.
fn random_update(rng: &mut SweepRng, size: usize) -> (Vec<String>, Vec<String>) {
    let old: Vec<String> = (0..size).map(|i| format!("k{i}")).collect();
    let mut new = rng.survivors(&old, 5);
    rng.shuffle(&mut new);
    let fresh = rng.between(0, size / 3);
    for i in 0..fresh {
        let at = rng.between(0, new.len());
        new.insert(at, format!("n{i}"));
    }
    (old, new)
}

#[test]
fn random_permutations_keep_identity() {
    let rounds = sweep_rounds("VDOM_STRESS", 150, 2_000);
    let mut rng = SweepRng::new(0x5eed);
    for round in 0..rounds {
        let size = rng.below(24);
        let (old, new) = random_update(&mut rng, size);
        let minimum = minimal_moves(&old, &new);
        for strategy in DiffStrategy::KEYED {
            let outcome = run_reorder(strategy, &old, &new);
            let label = format!("round {round} [{}] {old:?} -> {new:?}", strategy.name());
            assert_eq!(outcome.order, new, "{label}");
            assert!(outcome.identity_breaks.is_empty(), "{label}");
            assert!(outcome.moves >= minimum, "{label}");
            if strategy == DiffStrategy::Fast {
                assert_eq!(outcome.moves, minimum, "{label}");
            }
        }
    }
}

fn permutation() -> impl Strategy<Value = (Vec<String>, Vec<String>)> {
    (0usize..16).prop_flat_map(|n| {
        let old: Vec<String> = (0..n).map(|i| format!("k{i}")).collect();
        (Just(old.clone()), Just(old).prop_shuffle())
    })
}

proptest! {
    #[test]
    fn keyed_strategies_agree_on_permutations((old, new) in permutation()) {
        for strategy in DiffStrategy::KEYED {
            let outcome = run_reorder(strategy, &old, &new);
            prop_assert_eq!(&outcome.order, &new);
            prop_assert!(outcome.identity_breaks.is_empty());
            prop_assert_eq!(outcome.inserts, 0);
            prop_assert_eq!(outcome.removes, 0);
        }
        let fast = run_reorder(DiffStrategy::Fast, &old, &new);
        prop_assert_eq!(fast.moves, minimal_moves(&old, &new));
    }

    #[test]
    fn unkeyed_diff_never_moves(old in proptest::collection::vec("[a-e]", 0..10),
                                new in proptest::collection::vec("[a-e]", 0..10)) {
        let outcome = run_reorder(DiffStrategy::Unkeyed, &old, &new);
        prop_assert_eq!(&outcome.order, &new);
        prop_assert_eq!(outcome.moves, 0);
    }
}
