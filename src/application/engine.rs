//! Typing engine: turns preprocessed text into timed key events

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, error, info, warn};

use crate::domain::config::DEFAULT_SPECIAL_KEY_DELAY_MS;
use crate::domain::session::{TypingPhase, TypingSession};
use crate::domain::typing::{Cadence, CharacterClass, TypingRequest, DEFAULT_TAB_WIDTH};

use super::cancel::CancellationToken;
use super::emitter::{EmitError, KeyEmitter, KeyTiming};
use super::layout::LayoutResolver;
use super::ports::{InjectorFactory, LayoutHost, NamedKey, Sleeper};
use super::window::{LayoutLock, WindowContextTracker};

/// Granularity of cancellable countdown waits
pub const COUNTDOWN_SLICE: Duration = Duration::from_millis(50);

/// Pause before the final Enter
pub const FINAL_ENTER_PAUSE: Duration = Duration::from_millis(200);

/// Pause before the Escape that precedes an indentation-mode Enter
const ESCAPE_LEAD: Duration = Duration::from_millis(50);

/// Tunables that are not part of a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineSettings {
    /// Tab expansion width in indentation mode (0 keeps tabs)
    pub tab_width: usize,
    /// Settle time after structural keys in indentation mode
    pub special_key_delay: Duration,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            tab_width: DEFAULT_TAB_WIDTH,
            special_key_delay: Duration::from_millis(DEFAULT_SPECIAL_KEY_DELAY_MS),
        }
    }
}

/// Host services one engine run needs
#[derive(Clone)]
pub struct EngineServices {
    pub injector_factory: InjectorFactory,
    pub layout_host: Arc<dyn LayoutHost>,
    pub resolver: Arc<LayoutResolver>,
    pub sleeper: Arc<dyn Sleeper>,
    pub settings: EngineSettings,
    /// Shared by every run so layout changes never interleave
    pub layout_lock: LayoutLock,
}

/// Why a run stopped early
enum Halt {
    Cancelled,
    Fatal(String),
}

impl From<EmitError> for Halt {
    fn from(e: EmitError) -> Self {
        Halt::Fatal(e.to_string())
    }
}

/// One typing run.
///
/// Owns the run from countdown to terminal phase and is the only writer of
/// progress and phase while it runs.
pub struct TypingEngine {
    session: Arc<Mutex<TypingSession>>,
    generation: u64,
    cancel: CancellationToken,
    services: EngineServices,
    tracker: WindowContextTracker,
    rng: StdRng,
    last_class: Option<CharacterClass>,
}

impl TypingEngine {
    /// Engine for the run started as `generation` of `session`
    pub fn new(
        services: EngineServices,
        session: Arc<Mutex<TypingSession>>,
        generation: u64,
        cancel: CancellationToken,
    ) -> Self {
        let tracker = WindowContextTracker::new(
            Arc::clone(&services.layout_host),
            Arc::clone(&services.sleeper),
            services.layout_lock.clone(),
        );
        Self {
            session,
            generation,
            cancel,
            services,
            tracker,
            rng: StdRng::from_entropy(),
            last_class: None,
        }
    }

    /// Use a fixed random seed for jitter
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Run to a terminal phase. `text` must already be preprocessed.
    ///
    /// Exit actions (layout restore, binding release, session finish) run on
    /// every path, including a panic inside the run.
    pub fn run(mut self, request: &TypingRequest, text: &str) -> TypingPhase {
        let result = panic::catch_unwind(AssertUnwindSafe(|| self.drive(request, text)))
            .unwrap_or_else(|payload| Err(Halt::Fatal(panic_message(payload))));

        if request.auto_switch_layout {
            // A run that outlived its session must not touch the next one's layout
            self.tracker.restore_if(|| self.owns_session());
        }
        self.tracker.release();

        self.update(|session| match &result {
            Ok(()) => session.complete(),
            Err(Halt::Cancelled) => session.abort(),
            Err(Halt::Fatal(message)) => session.fail(message),
        });

        match result {
            Ok(()) => {
                info!("Typing completed");
                TypingPhase::Completed
            }
            Err(Halt::Cancelled) => {
                info!("Typing aborted");
                TypingPhase::Aborted
            }
            Err(Halt::Fatal(message)) => {
                error!(error = %message, "Typing failed");
                TypingPhase::Error
            }
        }
    }

    fn drive(&mut self, request: &TypingRequest, text: &str) -> Result<(), Halt> {
        self.countdown(request.countdown_secs)?;
        self.checkpoint()?;

        let injector =
            (self.services.injector_factory)().map_err(|e| Halt::Fatal(e.to_string()))?;
        let mut emitter = KeyEmitter::new(injector, Arc::clone(&self.services.sleeper));

        let total = text.chars().count();
        self.update(|session| session.enter_typing(total));
        info!(
            total,
            injector = emitter.injector_name(),
            ide_mode = request.preserve_indentation,
            "Typing started"
        );

        if request.auto_switch_layout && self.services.resolver.has_layouts() {
            self.tracker.bind_foreground();
        }

        let cadence = Cadence::new(request.chars_per_second, request.jitter_percent);
        if request.preserve_indentation {
            self.type_preserving_indentation(&mut emitter, &cadence, request, text)?;
        } else {
            self.type_plain(&mut emitter, &cadence, request, text)?;
        }

        if request.send_enter_at_end {
            self.checkpoint()?;
            self.services.sleeper.sleep(FINAL_ENTER_PAUSE);
            if request.preserve_indentation {
                self.follow_layout(request, CharacterClass::Ascii);
                self.escape_enter(&mut emitter)?;
            } else {
                emitter.emit_named_key(NamedKey::Enter, KeyTiming::INSTANT)?;
            }
        }
        Ok(())
    }

    fn countdown(&mut self, seconds: u32) -> Result<(), Halt> {
        let slices = (Duration::from_secs(1).as_millis() / COUNTDOWN_SLICE.as_millis()) as u32;
        for remaining in (1..=seconds).rev() {
            self.checkpoint()?;
            self.update(|session| session.countdown(remaining));
            debug!(remaining, "Countdown");
            for _ in 0..slices {
                self.checkpoint()?;
                self.services.sleeper.sleep(COUNTDOWN_SLICE);
            }
        }
        Ok(())
    }

    fn type_preserving_indentation(
        &mut self,
        emitter: &mut KeyEmitter,
        cadence: &Cadence,
        request: &TypingRequest,
        text: &str,
    ) -> Result<(), Halt> {
        let settle = self.services.settings.special_key_delay;
        let trailing_break = text.ends_with('\n');
        let mut lines: Vec<&str> = text.split('\n').collect();
        if trailing_break {
            lines.pop();
        }
        let line_count = lines.len();

        for (index, line) in lines.into_iter().enumerate() {
            self.checkpoint()?;
            if index > 0 {
                emitter.clear_auto_indentation()?;
            }

            for ch in line.chars() {
                self.checkpoint()?;
                let class = CharacterClass::of(ch);
                self.follow_layout(request, class);
                match ch {
                    '\t' => {
                        emitter.emit_named_key(
                            NamedKey::Tab,
                            KeyTiming {
                                hold: KeyTiming::SCAN_DEFAULT.hold,
                                post: settle / 2,
                            },
                        )?;
                    }
                    ' ' => {
                        emitter.emit_named_key(NamedKey::Space, KeyTiming::from_millis(10, 0))?;
                    }
                    _ if class == CharacterClass::Control => {}
                    _ => {
                        emitter.emit_unicode_character(ch)?;
                    }
                }
                self.update(|session| session.advance(1));
                let delay = cadence.next_character_delay(&mut self.rng);
                self.services.sleeper.sleep(delay);
            }

            let newline_needed = index + 1 < line_count || trailing_break;
            if newline_needed {
                self.follow_layout(request, CharacterClass::Ascii);
                self.escape_enter(emitter)?;
                self.update(|session| session.advance(1));
                let delay = cadence.next_newline_delay(&mut self.rng);
                self.services.sleeper.sleep(delay);
            }
        }
        Ok(())
    }

    fn type_plain(
        &mut self,
        emitter: &mut KeyEmitter,
        cadence: &Cadence,
        request: &TypingRequest,
        text: &str,
    ) -> Result<(), Halt> {
        for ch in text.chars() {
            self.checkpoint()?;
            let class = CharacterClass::of(ch);
            self.follow_layout(request, class);
            match ch {
                '\n' => {
                    emitter.emit_named_key(NamedKey::Enter, KeyTiming::INSTANT)?;
                }
                '\t' => {
                    emitter.emit_named_key(NamedKey::Tab, KeyTiming::INSTANT)?;
                }
                ' ' => {
                    emitter.emit_named_key(NamedKey::Space, KeyTiming::INSTANT)?;
                }
                _ if class == CharacterClass::Control => {}
                _ => {
                    emitter.emit_unicode_character(ch)?;
                }
            }
            self.update(|session| session.advance(1));
            let delay = cadence.next_character_delay(&mut self.rng);
            self.services.sleeper.sleep(delay);
        }
        Ok(())
    }

    /// Escape (drops editor popups) then Enter, as used in indentation mode
    fn escape_enter(&mut self, emitter: &mut KeyEmitter) -> Result<(), Halt> {
        let settle = self.services.settings.special_key_delay;
        self.services.sleeper.sleep(ESCAPE_LEAD);
        emitter.emit_named_key(NamedKey::Escape, KeyTiming::from_millis(10, 50))?;
        emitter.emit_named_key(
            NamedKey::Enter,
            KeyTiming {
                hold: Duration::from_millis(20),
                post: settle.max(Duration::from_millis(150)),
            },
        )?;
        Ok(())
    }

    /// Switch layout when the character class changes
    fn follow_layout(&mut self, request: &TypingRequest, class: CharacterClass) {
        if !request.auto_switch_layout || !class.wants_layout() {
            return;
        }
        if self.last_class == Some(class) {
            return;
        }
        self.last_class = Some(class);

        match self.services.resolver.resolve_layout_for(class) {
            Some(layout) => {
                if !self.tracker.activate_layout(layout) && !self.tracker.is_degraded() {
                    debug!(class = class.as_str(), layout = %layout, "Layout not switched");
                }
            }
            None => debug!(class = class.as_str(), "No layout for class; keeping current"),
        }
    }

    fn checkpoint(&self) -> Result<(), Halt> {
        if self.cancel.is_cancelled() {
            return Err(Halt::Cancelled);
        }
        Ok(())
    }

    fn owns_session(&self) -> bool {
        let session = self
            .session
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        session.generation() == self.generation
    }

    /// Apply `f` if this run still owns the session
    fn update(&self, f: impl FnOnce(&mut TypingSession)) {
        let mut session = self
            .session
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if session.generation() == self.generation {
            f(&mut session);
        } else {
            warn!(
                run = self.generation,
                current = session.generation(),
                "Session superseded; dropping update"
            );
        }
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "engine panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{InjectError, KeyDirection, KeyInjector, LayoutHandle};
    use crate::application::testing::{
        recording_factory, FakeLayoutHost, InstantSleeper, KeyEvent, KeyLog, RecordingInjector,
    };
    use crate::domain::typing::{preprocess, PreprocessOptions};

    const EN: LayoutHandle = LayoutHandle(0x0409_0409);
    const ZH: LayoutHandle = LayoutHandle(0x0804_0804);

    struct Harness {
        log: KeyLog,
        host: Arc<FakeLayoutHost>,
        sleeper: Arc<InstantSleeper>,
        session: Arc<Mutex<TypingSession>>,
        services: EngineServices,
    }

    impl Harness {
        fn new() -> Self {
            Self::with_factory(None)
        }

        fn with_factory(factory: Option<InjectorFactory>) -> Self {
            let log = KeyLog::default();
            let host = Arc::new(FakeLayoutHost::new(vec![EN, ZH]));
            let sleeper = Arc::new(InstantSleeper::default());
            let resolver = Arc::new(LayoutResolver::discover(host.as_ref()));
            let services = EngineServices {
                injector_factory: factory.unwrap_or_else(|| recording_factory(log.clone())),
                layout_host: host.clone(),
                resolver,
                sleeper: sleeper.clone(),
                settings: EngineSettings::default(),
                layout_lock: LayoutLock::default(),
            };
            Self {
                log,
                host,
                sleeper,
                session: Arc::new(Mutex::new(TypingSession::new())),
                services,
            }
        }

        fn run_with_token(&self, request: &TypingRequest, cancel: CancellationToken) -> TypingPhase {
            let text = preprocess(
                &request.text,
                PreprocessOptions::new(request.preserve_indentation)
                    .with_tab_width(self.services.settings.tab_width),
            );
            let generation = self
                .session
                .lock()
                .unwrap()
                .begin(text.chars().count())
                .unwrap();
            TypingEngine::new(self.services.clone(), self.session.clone(), generation, cancel)
                .with_seed(7)
                .run(request, &text)
        }

        fn run(&self, request: &TypingRequest) -> TypingPhase {
            self.run_with_token(request, CancellationToken::new())
        }

        fn session(&self) -> TypingSession {
            self.session.lock().unwrap().clone()
        }
    }

    fn request(text: &str) -> TypingRequest {
        TypingRequest {
            countdown_secs: 0,
            jitter_percent: 0,
            chars_per_second: 10,
            send_enter_at_end: false,
            auto_switch_layout: false,
            ..TypingRequest::new(text)
        }
    }

    fn strokes(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn plain_mode_types_every_character() {
        let h = Harness::new();
        let phase = h.run(&request("a b\n\tc"));

        assert_eq!(phase, TypingPhase::Completed);
        assert_eq!(
            h.log.strokes(),
            strokes(&["a", "<space>", "b", "<enter>", "<tab>", "c"])
        );
        let session = h.session();
        assert_eq!(session.phase(), TypingPhase::Completed);
        assert_eq!(session.chars_typed(), 6);
        assert_eq!(session.total_chars(), 6);
        assert_eq!(session.last_event(), "MISSION_SUCCESS");
        assert!(!session.is_typing());
    }

    #[test]
    fn plain_mode_skips_control_characters_but_counts_them() {
        let h = Harness::new();
        h.run(&request("a\u{7}b"));

        assert_eq!(h.log.strokes(), strokes(&["a", "b"]));
        assert_eq!(h.session().chars_typed(), 3);
    }

    #[test]
    fn indentation_mode_counts_skipped_control_characters() {
        let h = Harness::new();
        let req = TypingRequest {
            preserve_indentation: true,
            ..request("a\u{7}b")
        };

        assert_eq!(h.run(&req), TypingPhase::Completed);
        assert_eq!(h.log.strokes(), strokes(&["a", "b"]));
        let session = h.session();
        assert_eq!(session.chars_typed(), session.total_chars());
        assert_eq!(session.chars_typed(), 3);
    }

    #[test]
    fn plain_mode_final_enter() {
        let h = Harness::new();
        let req = TypingRequest {
            send_enter_at_end: true,
            ..request("ok")
        };
        h.run(&req);

        assert_eq!(h.log.strokes(), strokes(&["o", "k", "<enter>"]));
    }

    #[test]
    fn indentation_mode_scenario_with_tab_key() {
        let mut h = Harness::new();
        h.services.settings.tab_width = 0;
        let req = TypingRequest {
            preserve_indentation: true,
            send_enter_at_end: true,
            ..request("Hi\n\tX")
        };
        let phase = h.run(&req);

        assert_eq!(phase, TypingPhase::Completed);
        assert_eq!(
            h.log.strokes(),
            strokes(&[
                "H", "i", "<escape>", "<enter>", // first line, no clear before it
                "<shift>", "<home>", "<delete>", // line clear
                "<tab>", "X", "<escape>", "<enter>", // final enter
            ])
        );
        assert!(h
            .log
            .events()
            .contains(&KeyEvent::Scan(NamedKey::Tab, KeyDirection::Press)));
    }

    #[test]
    fn indentation_mode_reproduces_leading_whitespace() {
        let h = Harness::new();
        let req = TypingRequest {
            preserve_indentation: true,
            ..request("a\n  b\n    c")
        };
        h.run(&req);

        let clear = ["<shift>", "<home>", "<delete>"];
        let mut expected = vec!["a", "<escape>", "<enter>"];
        expected.extend(clear);
        expected.extend(["<space>", "<space>", "b", "<escape>", "<enter>"]);
        expected.extend(clear);
        expected.extend(["<space>", "<space>", "<space>", "<space>", "c"]);
        assert_eq!(h.log.strokes(), strokes(&expected));

        let session = h.session();
        assert_eq!(session.chars_typed(), session.total_chars());
    }

    #[test]
    fn indentation_mode_expands_tabs_by_default() {
        let h = Harness::new();
        let req = TypingRequest {
            preserve_indentation: true,
            ..request("x\n\ty")
        };
        h.run(&req);

        let spaces = h.log.strokes().iter().filter(|s| *s == "<space>").count();
        assert_eq!(spaces, 4);
        assert!(!h.log.strokes().contains(&"<tab>".to_string()));
    }

    #[test]
    fn trailing_newline_types_one_enter_and_progress_stays_bounded() {
        let h = Harness::new();
        let req = TypingRequest {
            preserve_indentation: true,
            ..request("a\n")
        };
        h.run(&req);

        assert_eq!(h.log.strokes(), strokes(&["a", "<escape>", "<enter>"]));
        let session = h.session();
        assert_eq!(session.total_chars(), 2);
        assert_eq!(session.chars_typed(), 2);
    }

    #[test]
    fn countdown_sleeps_in_slices() {
        let h = Harness::new();
        let req = TypingRequest {
            countdown_secs: 2,
            ..request("a")
        };
        h.run(&req);

        // 2 seconds of countdown plus one character delay of 100 ms
        assert_eq!(h.sleeper.total(), Duration::from_millis(2100));
    }

    #[test]
    fn cancelled_before_start_aborts_without_typing() {
        let h = Harness::new();
        let token = CancellationToken::new();
        token.cancel();
        let req = TypingRequest {
            countdown_secs: 3,
            ..request("abc")
        };

        assert_eq!(h.run_with_token(&req, token), TypingPhase::Aborted);
        assert!(h.log.events().is_empty());
        let session = h.session();
        assert_eq!(session.phase(), TypingPhase::Aborted);
        assert_eq!(session.last_event(), "USER_HALT");
        assert!(!session.is_typing());
    }

    struct CancellingInjector {
        inner: RecordingInjector,
        token: CancellationToken,
        after: usize,
        count: usize,
    }

    impl KeyInjector for CancellingInjector {
        fn unicode_char(&mut self, ch: char) -> Result<(), InjectError> {
            self.count += 1;
            if self.count == self.after {
                self.token.cancel();
            }
            self.inner.unicode_char(ch)
        }

        fn scan_code(&mut self, key: NamedKey, dir: KeyDirection) -> Result<(), InjectError> {
            self.inner.scan_code(key, dir)
        }

        fn virtual_key(&mut self, key: NamedKey, dir: KeyDirection) -> Result<(), InjectError> {
            self.inner.virtual_key(key, dir)
        }

        fn name(&self) -> &'static str {
            "cancelling"
        }
    }

    #[test]
    fn cancellation_mid_text_stops_at_next_character() {
        let log = KeyLog::default();
        let token = CancellationToken::new();
        let factory: InjectorFactory = {
            let log = log.clone();
            let token = token.clone();
            Arc::new(move || {
                Ok(Box::new(CancellingInjector {
                    inner: RecordingInjector::new(log.clone()),
                    token: token.clone(),
                    after: 2,
                    count: 0,
                }) as Box<dyn KeyInjector>)
            })
        };
        let h = Harness::with_factory(Some(factory));
        let req = TypingRequest {
            send_enter_at_end: true,
            ..request("abcdef")
        };

        assert_eq!(h.run_with_token(&req, token), TypingPhase::Aborted);
        assert_eq!(log.strokes(), strokes(&["a", "b"]));
        assert_eq!(h.session().chars_typed(), 2);
    }

    #[test]
    fn fatal_injector_error_ends_in_error_phase() {
        let log = KeyLog::default();
        let factory: InjectorFactory = {
            let log = log.clone();
            Arc::new(move || {
                Ok(Box::new(RecordingInjector::new(log.clone()).disconnect_after(1))
                    as Box<dyn KeyInjector>)
            })
        };
        let h = Harness::with_factory(Some(factory));

        assert_eq!(h.run(&request("xyz")), TypingPhase::Error);
        let session = h.session();
        assert_eq!(session.phase(), TypingPhase::Error);
        assert!(session.last_event().starts_with("ERROR_"));
        assert!(session.last_event().len() <= "ERROR_".len() + 20);
        assert!(!session.is_typing());
    }

    #[test]
    fn injector_init_failure_ends_in_error_phase() {
        let factory: InjectorFactory = Arc::new(|| -> Result<Box<dyn KeyInjector>, InjectError> {
            Err(InjectError::InitFailed("no display".to_string()))
        });
        let h = Harness::with_factory(Some(factory));

        assert_eq!(h.run(&request("a")), TypingPhase::Error);
        assert_eq!(h.session().last_event(), "ERROR_Failed to initialize");
    }

    #[test]
    fn panic_in_run_is_contained() {
        let factory: InjectorFactory =
            Arc::new(|| -> Result<Box<dyn KeyInjector>, InjectError> { panic!("boom") });
        let h = Harness::with_factory(Some(factory));

        assert_eq!(h.run(&request("a")), TypingPhase::Error);
        assert_eq!(h.session().last_event(), "ERROR_boom");
    }

    #[test]
    fn transient_failures_are_skipped() {
        let log = KeyLog::default();
        let factory: InjectorFactory = {
            let log = log.clone();
            Arc::new(move || {
                Ok(Box::new(RecordingInjector::new(log.clone()).rejecting('b'))
                    as Box<dyn KeyInjector>)
            })
        };
        let h = Harness::with_factory(Some(factory));

        assert_eq!(h.run(&request("abc")), TypingPhase::Completed);
        assert_eq!(log.strokes(), strokes(&["a", "c"]));
        assert_eq!(h.session().chars_typed(), 3);
    }

    #[test]
    fn layout_follows_character_class_and_is_restored() {
        let h = Harness::new();
        let req = TypingRequest {
            auto_switch_layout: true,
            ..request("ab中文c")
        };
        h.run(&req);

        // EN starts active, so "ab" and the restore post nothing
        assert_eq!(h.host.requests(), vec![ZH, EN]);
        assert_eq!(h.host.target_layout(), Some(EN));
    }

    #[test]
    fn layout_restored_after_abort() {
        let mut h = Harness::new();
        let token = CancellationToken::new();
        let factory_token = token.clone();
        let log = h.log.clone();
        h.services.injector_factory = Arc::new(move || {
            Ok(Box::new(CancellingInjector {
                inner: RecordingInjector::new(log.clone()),
                token: factory_token.clone(),
                after: 1,
                count: 0,
            }) as Box<dyn KeyInjector>)
        });
        let req = TypingRequest {
            auto_switch_layout: true,
            ..request("中文")
        };

        assert_eq!(h.run_with_token(&req, token), TypingPhase::Aborted);
        assert_eq!(h.host.requests(), vec![ZH, EN]);
        assert_eq!(h.host.target_layout(), Some(EN));
    }

    #[test]
    fn no_switching_when_disabled() {
        let h = Harness::new();
        h.run(&request("中文"));

        assert!(h.host.requests().is_empty());
        assert_eq!(h.log.strokes(), strokes(&["中", "文"]));
    }

    #[test]
    fn superseded_run_does_not_touch_new_session() {
        let h = Harness::new();
        let text = "abc";
        let stale = h.session.lock().unwrap().begin(3).unwrap();
        {
            let mut session = h.session.lock().unwrap();
            session.abort();
            session.begin(10).unwrap();
        }

        TypingEngine::new(
            h.services.clone(),
            h.session.clone(),
            stale,
            CancellationToken::new(),
        )
        .run(&request(text), text);

        let session = h.session();
        assert_eq!(session.phase(), TypingPhase::Preparing);
        assert_eq!(session.chars_typed(), 0);
        assert!(session.is_typing());
    }
}
