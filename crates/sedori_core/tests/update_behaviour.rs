use std::sync::Once;
use std::time::{Duration, Instant};

use sedori_core::{update, Effect, InjectorState, Msg};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(sedori_logging::initialize_for_tests);
}

fn ms(value: u64) -> Duration {
    Duration::from_millis(value)
}

#[test]
fn page_load_triggers_initial_scan() {
    init_logging();
    let (_state, effects) = update(InjectorState::new(), Msg::PageLoaded);
    assert_eq!(effects, vec![Effect::ScanPage]);
}

#[test]
fn mutation_burst_coalesces_into_one_scan() {
    init_logging();
    let start = Instant::now();
    let mut state = InjectorState::with_debounce(ms(500));

    for offset in [0, 50, 120, 300] {
        let (next, effects) = update(state, Msg::DomMutated { at: start + ms(offset) });
        assert!(effects.is_empty());
        state = next;
    }
    assert!(state.view().debounce_pending);

    // Still inside the window of the last mutation.
    let (state, effects) = update(state, Msg::Tick { now: start + ms(700) });
    assert!(effects.is_empty());

    let (state, effects) = update(state, Msg::Tick { now: start + ms(800) });
    assert_eq!(effects, vec![Effect::ScanPage]);
    assert!(!state.view().debounce_pending);

    let (_state, effects) = update(state, Msg::Tick { now: start + ms(5_000) });
    assert!(effects.is_empty());
}

#[test]
fn ticks_without_mutations_do_nothing() {
    init_logging();
    let start = Instant::now();
    let (state, effects) = update(InjectorState::new(), Msg::Tick { now: start });
    assert!(effects.is_empty());
    let (_state, effects) = update(state, Msg::Tick { now: start + ms(10_000) });
    assert!(effects.is_empty());
}

#[test]
fn completed_scan_requests_exactly_one_drain() {
    init_logging();
    let (mut state, effects) = update(
        InjectorState::new(),
        Msg::ScanCompleted {
            annotated: 12,
            skipped: 3,
        },
    );
    assert_eq!(effects, vec![Effect::DrainQueue]);

    let view = state.view();
    assert_eq!(view.scans, 1);
    assert_eq!(view.annotated, 12);
    assert_eq!(view.skipped, 3);
    assert!(state.consume_dirty());
    assert!(!state.consume_dirty());
}

#[test]
fn drain_results_accumulate_across_runs() {
    init_logging();
    let (state, _) = update(
        InjectorState::new(),
        Msg::DrainFinished {
            succeeded: 2,
            failed: 1,
        },
    );
    let (mut state, effects) = update(
        state,
        Msg::DrainFinished {
            succeeded: 4,
            failed: 0,
        },
    );
    assert!(effects.is_empty());
    assert_eq!(state.view().succeeded, 6);
    assert_eq!(state.view().failed, 1);
    assert!(state.consume_dirty());
}

#[test]
fn empty_drain_leaves_state_clean() {
    init_logging();
    let (mut state, _) = update(
        InjectorState::new(),
        Msg::DrainFinished {
            succeeded: 0,
            failed: 0,
        },
    );
    assert!(!state.consume_dirty());
}
