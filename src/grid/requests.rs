//! Render Requests - Reactive outlet for redraw decisions.
//!
//! The grid never renders. It publishes its decisions through signals:
//! - `redraws` - bumped after value changes and row add/remove
//! - `rebuilds` - bumped when column visibility changes (structural)
//! - `view` - the latest [`GridView`] projection
//!
//! The view is published before the counter moves, so an effect reacting to a
//! counter reads the fresh projection without touching the grid itself.
//!
//! ```ignore
//! use spark_signals::effect;
//!
//! let requests = grid.requests().clone();
//! let _effect = effect(move || {
//!     let _ = requests.redraw_signal().get();
//!     paint(&requests.view());
//! });
//! ```

use spark_signals::{signal, Signal};

use super::view::GridView;

#[derive(Clone)]
pub struct RenderRequests {
    redraws: Signal<u64>,
    rebuilds: Signal<u64>,
    view: Signal<GridView>,
}

impl RenderRequests {
    pub fn new(initial: GridView) -> Self {
        Self {
            redraws: signal(0),
            rebuilds: signal(0),
            view: signal(initial),
        }
    }

    /// Replace the published view without requesting anything.
    pub fn publish(&self, view: GridView) {
        self.view.set(view);
    }

    /// Publish `view` and ask for a redraw.
    pub fn request_redraw(&self, view: GridView) {
        self.view.set(view);
        self.redraws.set(self.redraws.get() + 1);
    }

    /// Publish `view` and ask for a structural rebuild.
    pub fn request_rebuild(&self, view: GridView) {
        self.view.set(view);
        self.rebuilds.set(self.rebuilds.get() + 1);
    }

    pub fn redraw_count(&self) -> u64 {
        self.redraws.get()
    }

    pub fn rebuild_count(&self) -> u64 {
        self.rebuilds.get()
    }

    /// Latest published view.
    pub fn view(&self) -> GridView {
        self.view.get()
    }

    pub fn redraw_signal(&self) -> Signal<u64> {
        self.redraws.clone()
    }

    pub fn rebuild_signal(&self) -> Signal<u64> {
        self.rebuilds.clone()
    }

    pub fn view_signal(&self) -> Signal<GridView> {
        self.view.clone()
    }
}
