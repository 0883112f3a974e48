//! In-memory port implementations for unit tests

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::ports::{
    InjectError, InjectorFactory, KeyDirection, KeyInjector, LayoutError, LayoutHandle,
    LayoutHost, NamedKey, OsThreadId, Sleeper, WindowHandle,
};

/// One recorded injector call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyEvent {
    Unicode(char),
    Scan(NamedKey, KeyDirection),
    Virtual(NamedKey, KeyDirection),
}

/// Shared log of injected key events
#[derive(Debug, Clone, Default)]
pub struct KeyLog(Arc<Mutex<Vec<KeyEvent>>>);

impl KeyLog {
    pub fn events(&self) -> Vec<KeyEvent> {
        self.0.lock().unwrap().clone()
    }

    fn push(&self, event: KeyEvent) {
        self.0.lock().unwrap().push(event);
    }

    /// Logical keystrokes: unicode chars plus the press half of named keys
    pub fn strokes(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                KeyEvent::Unicode(c) => Some(c.to_string()),
                KeyEvent::Scan(k, KeyDirection::Press) => Some(format!("<{}>", k.as_str())),
                KeyEvent::Virtual(k, KeyDirection::Press) => Some(format!("<{}>", k.as_str())),
                _ => None,
            })
            .collect()
    }
}

/// Injector that records every call
#[derive(Debug, Default)]
pub struct RecordingInjector {
    log: KeyLog,
    scan_unsupported: bool,
    rejected_chars: HashSet<char>,
    disconnect_after: Option<usize>,
    disconnect_on: Option<NamedKey>,
    failing_scan_releases: usize,
    calls: usize,
}

impl RecordingInjector {
    pub fn new(log: KeyLog) -> Self {
        Self {
            log,
            ..Default::default()
        }
    }

    pub fn without_scan_codes(mut self) -> Self {
        self.scan_unsupported = true;
        self
    }

    pub fn rejecting(mut self, ch: char) -> Self {
        self.rejected_chars.insert(ch);
        self
    }

    pub fn disconnect_after(mut self, calls: usize) -> Self {
        self.disconnect_after = Some(calls);
        self
    }

    /// Any named-key call for `key` reports a lost connection
    pub fn disconnect_on(mut self, key: NamedKey) -> Self {
        self.disconnect_on = Some(key);
        self
    }

    /// The next `count` scan-code releases are rejected
    pub fn failing_scan_releases(mut self, count: usize) -> Self {
        self.failing_scan_releases = count;
        self
    }

    fn named(&mut self, key: NamedKey) -> Result<(), InjectError> {
        self.tick()?;
        if self.disconnect_on == Some(key) {
            return Err(InjectError::Disconnected(format!("lost while sending {}", key.as_str())));
        }
        Ok(())
    }

    fn tick(&mut self) -> Result<(), InjectError> {
        self.calls += 1;
        match self.disconnect_after {
            Some(limit) if self.calls > limit => {
                Err(InjectError::Disconnected("input server went away".into()))
            }
            _ => Ok(()),
        }
    }
}

impl KeyInjector for RecordingInjector {
    fn unicode_char(&mut self, ch: char) -> Result<(), InjectError> {
        self.tick()?;
        if self.rejected_chars.contains(&ch) {
            return Err(InjectError::Rejected(format!("char {ch:?}")));
        }
        self.log.push(KeyEvent::Unicode(ch));
        Ok(())
    }

    fn scan_code(&mut self, key: NamedKey, direction: KeyDirection) -> Result<(), InjectError> {
        self.named(key)?;
        if self.scan_unsupported {
            return Err(InjectError::Unsupported("scan codes".into()));
        }
        if direction == KeyDirection::Release && self.failing_scan_releases > 0 {
            self.failing_scan_releases -= 1;
            return Err(InjectError::Rejected("scan release".into()));
        }
        self.log.push(KeyEvent::Scan(key, direction));
        Ok(())
    }

    fn virtual_key(&mut self, key: NamedKey, direction: KeyDirection) -> Result<(), InjectError> {
        self.named(key)?;
        self.log.push(KeyEvent::Virtual(key, direction));
        Ok(())
    }

    fn name(&self) -> &'static str {
        "recording"
    }
}

/// Factory returning a plain recording injector writing to `log`
pub fn recording_factory(log: KeyLog) -> InjectorFactory {
    Arc::new(move || Ok(Box::new(RecordingInjector::new(log.clone())) as Box<dyn KeyInjector>))
}

/// Sleeper that only accumulates the requested time
#[derive(Debug, Default)]
pub struct InstantSleeper {
    total: Mutex<Duration>,
    calls: AtomicUsize,
}

impl InstantSleeper {
    pub fn total(&self) -> Duration {
        *self.total.lock().unwrap()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Sleeper for InstantSleeper {
    fn sleep(&self, duration: Duration) {
        *self.total.lock().unwrap() += duration;
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

/// Sleeper that really sleeps, capped per call
#[derive(Debug)]
pub struct CappedSleeper(pub Duration);

impl Sleeper for CappedSleeper {
    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration.min(self.0));
    }
}

const ENGINE_THREAD: OsThreadId = OsThreadId(1);
const TARGET_THREAD: OsThreadId = OsThreadId(7);
const TARGET_WINDOW: WindowHandle = WindowHandle(0xABC);

/// Layout host with one target window owned by another thread
#[derive(Debug)]
pub struct FakeLayoutHost {
    installed: Vec<LayoutHandle>,
    loadable: Option<LayoutHandle>,
    loaded: Mutex<Vec<String>>,
    foreground: Option<WindowHandle>,
    layouts: Mutex<HashMap<OsThreadId, LayoutHandle>>,
    attached: Mutex<Vec<bool>>,
    requests: Mutex<Vec<LayoutHandle>>,
    window_gone: AtomicBool,
}

impl FakeLayoutHost {
    pub fn new(installed: Vec<LayoutHandle>) -> Self {
        let mut layouts = HashMap::new();
        if let Some(first) = installed.first() {
            layouts.insert(TARGET_THREAD, *first);
        }
        Self {
            installed,
            loadable: None,
            loaded: Mutex::new(Vec::new()),
            foreground: Some(TARGET_WINDOW),
            layouts: Mutex::new(layouts),
            attached: Mutex::new(Vec::new()),
            requests: Mutex::new(Vec::new()),
            window_gone: AtomicBool::new(false),
        }
    }

    pub fn with_loadable(mut self, handle: LayoutHandle) -> Self {
        self.loadable = Some(handle);
        self
    }

    pub fn without_foreground(mut self) -> Self {
        self.foreground = None;
        self
    }

    pub fn with_target_layout(self, handle: LayoutHandle) -> Self {
        self.layouts.lock().unwrap().insert(TARGET_THREAD, handle);
        self
    }

    pub fn target_window() -> WindowHandle {
        TARGET_WINDOW
    }

    pub fn close_window(&self) {
        self.window_gone.store(true, Ordering::SeqCst);
    }

    pub fn loaded_klids(&self) -> Vec<String> {
        self.loaded.lock().unwrap().clone()
    }

    /// Layouts requested of the target window, in order
    pub fn requests(&self) -> Vec<LayoutHandle> {
        self.requests.lock().unwrap().clone()
    }

    /// Attach (true) / detach (false) calls, in order
    pub fn attach_calls(&self) -> Vec<bool> {
        self.attached.lock().unwrap().clone()
    }

    pub fn target_layout(&self) -> Option<LayoutHandle> {
        self.layouts.lock().unwrap().get(&TARGET_THREAD).copied()
    }
}

impl LayoutHost for FakeLayoutHost {
    fn installed_layouts(&self) -> Vec<LayoutHandle> {
        self.installed.clone()
    }

    fn load_layout(&self, klid: &str) -> Option<LayoutHandle> {
        self.loaded.lock().unwrap().push(klid.to_string());
        self.loadable
    }

    fn foreground_window(&self) -> Option<WindowHandle> {
        self.foreground
    }

    fn window_thread(&self, window: WindowHandle) -> Option<OsThreadId> {
        (window == TARGET_WINDOW).then_some(TARGET_THREAD)
    }

    fn thread_layout(&self, thread: OsThreadId) -> Option<LayoutHandle> {
        self.layouts.lock().unwrap().get(&thread).copied()
    }

    fn current_thread(&self) -> OsThreadId {
        ENGINE_THREAD
    }

    fn attach_input(&self, _from: OsThreadId, _to: OsThreadId, attach: bool) -> bool {
        self.attached.lock().unwrap().push(attach);
        true
    }

    fn activate_layout(&self, _layout: LayoutHandle) -> Result<(), LayoutError> {
        if self.window_gone.load(Ordering::SeqCst) {
            return Err(LayoutError::WindowGone);
        }
        Ok(())
    }

    fn request_layout_change(
        &self,
        window: WindowHandle,
        layout: LayoutHandle,
    ) -> Result<(), LayoutError> {
        if self.window_gone.load(Ordering::SeqCst) || window != TARGET_WINDOW {
            return Err(LayoutError::WindowGone);
        }
        self.requests.lock().unwrap().push(layout);
        self.layouts.lock().unwrap().insert(TARGET_THREAD, layout);
        Ok(())
    }
}
