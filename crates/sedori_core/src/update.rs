use crate::{Effect, InjectorState, Msg};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: InjectorState, msg: Msg) -> (InjectorState, Vec<Effect>) {
    let effects = match msg {
        Msg::PageLoaded => vec![Effect::ScanPage],
        Msg::DomMutated { at } => {
            state.record_mutation(at);
            Vec::new()
        }
        Msg::Tick { now } => {
            if state.scan_due(now) {
                vec![Effect::ScanPage]
            } else {
                Vec::new()
            }
        }
        Msg::ScanCompleted { annotated, skipped } => {
            state.record_scan(annotated, skipped);
            // One drain per pass, never one per item.
            vec![Effect::DrainQueue]
        }
        Msg::DrainFinished { succeeded, failed } => {
            state.record_drain(succeeded, failed);
            Vec::new()
        }
    };

    (state, effects)
}
