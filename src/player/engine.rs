use super::traits::{AudioBackend, AudioHandle, PlaybackError, PlayerState};
use std::time::Duration;
use tracing::{debug, warn};

/// Owns the single audio handle of the process.
///
/// `play` always stops and drops the previous handle before the backend is asked
/// for a new one, so two streams are never alive at the same time.
pub struct PlaybackEngine {
    backend: Box<dyn AudioBackend>,
    handle: Option<Box<dyn AudioHandle>>,
    state: PlayerState,
}

impl PlaybackEngine {
    pub fn new(backend: Box<dyn AudioBackend>) -> Self {
        Self {
            backend,
            handle: None,
            state: PlayerState::Idle,
        }
    }

    pub fn state(&self) -> PlayerState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.handle.is_some()
    }

    pub fn play(&mut self, url: &str) -> Result<(), PlaybackError> {
        self.stop();
        let handle = self.backend.open(url)?;
        debug!(url, "stream opened");
        self.handle = Some(handle);
        self.state = PlayerState::Playing;
        Ok(())
    }

    /// Play/pause flip. Returns the new state; no-op without a handle.
    pub fn toggle(&mut self) -> PlayerState {
        if let Some(handle) = self.handle.as_mut() {
            self.state = match self.state {
                PlayerState::Playing => {
                    handle.pause();
                    PlayerState::Paused
                }
                _ => {
                    handle.resume();
                    PlayerState::Playing
                }
            };
        }
        self.state
    }

    pub fn stop(&mut self) {
        if let Some(mut handle) = self.handle.take() {
            handle.stop();
        }
        self.state = PlayerState::Idle;
    }

    pub fn position(&self) -> Option<Duration> {
        self.handle.as_ref().and_then(|h| h.position())
    }

    pub fn finished(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| h.finished())
    }

    /// Handle duration, or `fallback` when the stream cannot tell.
    pub fn duration_or(&self, fallback: Option<Duration>) -> Option<Duration> {
        self.handle
            .as_ref()
            .and_then(|h| h.duration())
            .or(fallback)
            .filter(|d| !d.is_zero())
    }

    /// Absolute seek to `fraction × duration`. Unknown or zero duration is a no-op.
    pub fn seek_fraction(&mut self, fraction: f64, fallback: Option<Duration>) -> Option<Duration> {
        let total = self.duration_or(fallback)?;
        let target = total.mul_f64(fraction.clamp(0.0, 1.0));
        let handle = self.handle.as_mut()?;
        match handle.seek(target) {
            Ok(()) => Some(target),
            Err(e) => {
                warn!("{}", e);
                None
            }
        }
    }
}

impl Drop for PlaybackEngine {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct Log {
        opened: Vec<String>,
        live: usize,
        seeks: Vec<Duration>,
    }

    struct FakeBackend(Rc<RefCell<Log>>);
    struct FakeHandle(Rc<RefCell<Log>>, bool);

    impl AudioBackend for FakeBackend {
        fn open(&self, url: &str) -> Result<Box<dyn AudioHandle>, PlaybackError> {
            if url.is_empty() {
                return Err(PlaybackError::Device("no sink".into()));
            }
            let mut log = self.0.borrow_mut();
            log.opened.push(url.to_string());
            log.live += 1;
            Ok(Box::new(FakeHandle(self.0.clone(), false)))
        }
    }

    impl AudioHandle for FakeHandle {
        fn pause(&mut self) {}
        fn resume(&mut self) {}
        fn stop(&mut self) {
            if !self.1 {
                self.1 = true;
                self.0.borrow_mut().live -= 1;
            }
        }
        fn seek(&mut self, position: Duration) -> Result<(), PlaybackError> {
            self.0.borrow_mut().seeks.push(position);
            Ok(())
        }
        fn position(&self) -> Option<Duration> {
            Some(Duration::ZERO)
        }
        fn duration(&self) -> Option<Duration> {
            None
        }
    }

    fn engine() -> (PlaybackEngine, Rc<RefCell<Log>>) {
        let log = Rc::new(RefCell::new(Log::default()));
        (PlaybackEngine::new(Box::new(FakeBackend(log.clone()))), log)
    }

    #[test]
    fn test_single_live_handle() {
        let (mut engine, log) = engine();
        engine.play("a").unwrap();
        engine.play("b").unwrap();

        assert_eq!(log.borrow().opened, vec!["a", "b"]);
        assert_eq!(log.borrow().live, 1);
        assert_eq!(engine.state(), PlayerState::Playing);
    }

    #[test]
    fn test_failed_open_leaves_idle() {
        let (mut engine, log) = engine();
        engine.play("a").unwrap();
        assert!(engine.play("").is_err());

        assert_eq!(log.borrow().live, 0);
        assert_eq!(engine.state(), PlayerState::Idle);
        assert!(!engine.is_active());
    }

    #[test]
    fn test_toggle() {
        let (mut engine, _) = engine();
        assert_eq!(engine.toggle(), PlayerState::Idle);
        engine.play("a").unwrap();
        assert_eq!(engine.toggle(), PlayerState::Paused);
        assert_eq!(engine.toggle(), PlayerState::Playing);
    }

    #[test]
    fn test_seek_needs_duration() {
        let (mut engine, log) = engine();
        engine.play("a").unwrap();

        assert_eq!(engine.seek_fraction(0.5, None), None);
        assert_eq!(engine.seek_fraction(0.5, Some(Duration::ZERO)), None);
        assert_eq!(
            engine.seek_fraction(0.25, Some(Duration::from_secs(200))),
            Some(Duration::from_secs(50))
        );
        assert_eq!(log.borrow().seeks, vec![Duration::from_secs(50)]);
    }
}
