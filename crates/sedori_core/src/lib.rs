//! Sedori core: pure keyword, formatting and rendering helpers plus the
//! injector state machine.
mod debounce;
mod effect;
mod format;
mod keyword;
mod listing;
mod msg;
mod render;
mod state;
mod update;
mod view_model;

pub use debounce::{Debouncer, DEFAULT_DEBOUNCE};
pub use effect::Effect;
pub use format::{format_price, group_thousands, truncate_chars, PLACEHOLDER};
pub use keyword::{extract_keyword, fallback_keyword, model_number_from_title};
pub use listing::SearchResult;
pub use msg::Msg;
pub use render::{render_error, render_results, RenderOptions};
pub use state::InjectorState;
pub use update::update;
pub use view_model::{InjectorViewModel, PanelState, ResultPanelView, ResultRowView};
