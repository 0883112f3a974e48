//! Window context tracker: per-session layout binding and switching

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tracing::{debug, info, warn};

use super::ports::{LayoutError, LayoutHandle, LayoutHost, OsThreadId, Sleeper, WindowHandle};

/// Wait after posting a layout change so the target can apply it
pub const LAYOUT_SETTLE: Duration = Duration::from_millis(50);

/// Target window, its owning thread and the layout active at session start
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutBinding {
    pub window: WindowHandle,
    pub thread: OsThreadId,
    pub original_layout: Option<LayoutHandle>,
}

/// Process-wide lock serializing layout changes across typing runs
#[derive(Debug, Clone, Default)]
pub struct LayoutLock(Arc<Mutex<()>>);

impl LayoutLock {
    fn acquire(&self) -> MutexGuard<'_, ()> {
        self.0.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[derive(Debug, Default)]
struct TrackerState {
    binding: Option<LayoutBinding>,
    degraded: bool,
    restored: bool,
}

/// Coordinates keyboard layout state with one target window.
///
/// All switching happens under the shared [`LayoutLock`], so a run that
/// outlived its session cannot interleave with the next one.
pub struct WindowContextTracker {
    host: Arc<dyn LayoutHost>,
    sleeper: Arc<dyn Sleeper>,
    layout_lock: LayoutLock,
    state: Mutex<TrackerState>,
}

impl WindowContextTracker {
    pub fn new(
        host: Arc<dyn LayoutHost>,
        sleeper: Arc<dyn Sleeper>,
        layout_lock: LayoutLock,
    ) -> Self {
        Self {
            host,
            sleeper,
            layout_lock,
            state: Mutex::new(TrackerState::default()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, TrackerState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Bind to the current foreground window
    pub fn bind_foreground(&self) -> Option<LayoutBinding> {
        match self.host.foreground_window() {
            Some(window) => self.bind(window),
            None => {
                warn!("No foreground window; layout switching disabled for this session");
                self.lock().degraded = true;
                None
            }
        }
    }

    /// Capture `window`'s thread and active layout as the session context
    pub fn bind(&self, window: WindowHandle) -> Option<LayoutBinding> {
        let _switching = self.layout_lock.acquire();
        let mut state = self.lock();
        *state = TrackerState::default();

        let Some(thread) = self.host.window_thread(window) else {
            warn!(window = window.0, "Could not resolve window thread; layout switching disabled");
            state.degraded = true;
            return None;
        };

        let binding = LayoutBinding {
            window,
            thread,
            original_layout: self.host.thread_layout(thread),
        };
        info!(
            window = window.0,
            thread = thread.0,
            original = ?binding.original_layout.map(|h| h.to_string()),
            "Bound target window"
        );
        state.binding = Some(binding);
        Some(binding)
    }

    /// Current binding, if any
    pub fn binding(&self) -> Option<LayoutBinding> {
        self.lock().binding
    }

    /// Whether layout switching was given up for this session
    pub fn is_degraded(&self) -> bool {
        self.lock().degraded
    }

    /// Make `layout` active in the target window.
    ///
    /// Returns false when nothing was switched. A failed activation stops
    /// all further switching for the session.
    pub fn activate_layout(&self, layout: LayoutHandle) -> bool {
        let _switching = self.layout_lock.acquire();
        let mut state = self.lock();
        if state.degraded {
            return false;
        }
        let Some(binding) = state.binding else {
            return false;
        };

        match self.switch(&binding, layout) {
            Ok(()) => true,
            Err(e) => {
                warn!(layout = %layout, error = %e, "Layout switch failed; no further switching this session");
                state.degraded = true;
                false
            }
        }
    }

    /// Put the original layout back. Runs at most once per binding.
    pub fn restore(&self) -> bool {
        self.restore_if(|| true)
    }

    /// Like [`restore`](Self::restore), but only while `still_owner` holds.
    ///
    /// `still_owner` is evaluated under the layout lock, so no other run can
    /// switch between the check and the restore.
    pub fn restore_if(&self, still_owner: impl FnOnce() -> bool) -> bool {
        let _switching = self.layout_lock.acquire();
        let mut state = self.lock();
        if state.restored {
            return false;
        }
        state.restored = true;

        if !still_owner() {
            debug!("Run no longer owns the session; original layout left alone");
            return false;
        }

        let Some(binding) = state.binding else {
            return false;
        };
        let Some(original) = binding.original_layout else {
            return false;
        };

        match self.switch(&binding, original) {
            Ok(()) => {
                debug!(layout = %original, "Restored original layout");
                true
            }
            Err(e) => {
                debug!(layout = %original, error = %e, "Could not restore original layout");
                false
            }
        }
    }

    /// Drop the binding
    pub fn release(&self) {
        let mut state = self.lock();
        state.binding = None;
    }

    fn switch(&self, binding: &LayoutBinding, layout: LayoutHandle) -> Result<(), LayoutError> {
        if let Some(current) = self.host.thread_layout(binding.thread) {
            if current.same_layout(&layout) {
                return Ok(());
            }
        }

        let me = self.host.current_thread();
        let attached = if me != binding.thread {
            if !self.host.attach_input(me, binding.thread, true) {
                return Err(LayoutError::ActivationFailed(
                    "could not attach thread input".to_string(),
                ));
            }
            true
        } else {
            false
        };

        let result = self
            .host
            .activate_layout(layout)
            .and_then(|()| self.host.request_layout_change(binding.window, layout));

        if result.is_ok() {
            self.sleeper.sleep(LAYOUT_SETTLE);
        }

        if attached {
            self.host.attach_input(me, binding.thread, false);
        }

        if result.is_ok() {
            debug!(layout = %layout, "Activated layout");
        }
        result
    }
}
