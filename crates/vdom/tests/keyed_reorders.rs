use std::path::Path;
use vdom::DiffStrategy;
use vdom_test_support::keyed::run_reorder;
use vdom_test_support::load_reorder_cases;

fn fixture_path() -> &'static Path {
    Path::new(concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/reorders.toml"))
}

#[test]
fn every_keyed_strategy_reaches_the_new_order() {
    for case in load_reorder_cases(fixture_path()) {
        for strategy in DiffStrategy::KEYED {
            let outcome = run_reorder(strategy, &case.old, &case.new);
            let label = format!("{} [{}]", case.id, strategy.name());
            assert_eq!(outcome.order, case.new, "{label}: wrong order");
            assert!(
                outcome.identity_breaks.is_empty(),
                "{label}: host nodes replaced for {:?}",
                outcome.identity_breaks
            );
            assert!(
                outcome.moves >= case.min_moves,
                "{label}: {} moves is below the minimum {}",
                outcome.moves,
                case.min_moves
            );
            let added = case.new.iter().filter(|k| !case.old.contains(k)).count();
            let dropped = case.old.iter().filter(|k| !case.new.contains(k)).count();
            assert_eq!(outcome.inserts, added, "{label}: inserts");
            assert_eq!(outcome.removes, dropped, "{label}: removes");
        }
    }
}

#[test]
fn fast_diff_moves_the_minimum() {
    for case in load_reorder_cases(fixture_path()) {
        let outcome = run_reorder(DiffStrategy::Fast, &case.old, &case.new);
        assert_eq!(outcome.moves, case.min_moves, "{}: fast moves", case.id);
    }
}

#[test]
fn pinned_move_counts_hold() {
    for case in load_reorder_cases(fixture_path()) {
        for (name, expected) in &case.moves {
            let strategy = DiffStrategy::KEYED
                .into_iter()
                .find(|s| s.name() == name.as_str())
                .unwrap_or_else(|| panic!("{}: unknown strategy '{name}'", case.id));
            let outcome = run_reorder(strategy, &case.old, &case.new);
            assert_eq!(outcome.moves, *expected, "{} [{name}]: moves", case.id);
        }
    }
}

#[test]
fn reused_items_keep_their_text_untouched() {
    for case in load_reorder_cases(fixture_path()) {
        let added = case.new.iter().filter(|k| !case.old.contains(k)).count();
        for strategy in DiffStrategy::KEYED {
            let outcome = run_reorder(strategy, &case.old, &case.new);
            // One textContent write per freshly mounted item and nothing else.
            assert_eq!(
                outcome.set_props,
                added,
                "{} [{}]: prop writes",
                case.id,
                strategy.name()
            );
        }
    }
}
