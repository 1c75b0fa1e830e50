use super::traits::{AudioBackend, AudioHandle, PlaybackError};
use rodio::{Decoder, OutputStream, Sink, Source};
use std::io::Cursor;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{debug, warn};

/// Default output: one rodio sink per stream, fed from a worker thread.
pub struct RodioBackend {
    user_agent: String,
}

impl RodioBackend {
    pub fn new(user_agent: &str) -> Self {
        Self {
            user_agent: user_agent.to_string(),
        }
    }
}

pub struct RodioHandle {
    // Output device lives as long as the handle
    _stream: OutputStream,
    sink: Arc<Sink>,
    total: Arc<Mutex<Option<Duration>>>,
    loaded: Arc<AtomicBool>,
}

impl AudioBackend for RodioBackend {
    fn open(&self, url: &str) -> Result<Box<dyn AudioHandle>, PlaybackError> {
        let (stream, stream_handle) =
            OutputStream::try_default().map_err(|e| PlaybackError::Device(e.to_string()))?;
        let sink = Arc::new(Sink::try_new(&stream_handle).map_err(|e| PlaybackError::Device(e.to_string()))?);
        let total = Arc::new(Mutex::new(None));
        let loaded = Arc::new(AtomicBool::new(false));

        let source = url.to_string();
        let user_agent = self.user_agent.clone();
        let feed_sink = sink.clone();
        let feed_total = total.clone();
        let feed_loaded = loaded.clone();

        // Downloading blocks; keep it off the event loop
        std::thread::spawn(move || match fetch_bytes(&source, &user_agent) {
            Ok(bytes) => match Decoder::new(Cursor::new(bytes)) {
                Ok(decoder) => {
                    if let Ok(mut guard) = feed_total.lock() {
                        *guard = decoder.total_duration();
                    }
                    debug!(url = %source, "stream decoded");
                    feed_sink.append(decoder);
                    feed_loaded.store(true, Ordering::SeqCst);
                }
                Err(e) => warn!(url = %source, "undecodable stream: {}", e),
            },
            Err(e) => warn!(url = %source, "stream download failed: {}", e),
        });

        Ok(Box::new(RodioHandle {
            _stream: stream,
            sink,
            total,
            loaded,
        }))
    }
}

fn fetch_bytes(source: &str, user_agent: &str) -> anyhow::Result<Vec<u8>> {
    if source.starts_with("http://") || source.starts_with("https://") {
        let client = reqwest::blocking::Client::builder().user_agent(user_agent).build()?;
        let resp = client.get(source).send()?.error_for_status()?;
        Ok(resp.bytes()?.to_vec())
    } else {
        let path = source.strip_prefix("file://").unwrap_or(source);
        Ok(std::fs::read(path)?)
    }
}

impl AudioHandle for RodioHandle {
    fn pause(&mut self) {
        self.sink.pause();
    }

    fn resume(&mut self) {
        self.sink.play();
    }

    fn stop(&mut self) {
        self.sink.stop();
    }

    fn seek(&mut self, position: Duration) -> Result<(), PlaybackError> {
        self.sink
            .try_seek(position)
            .map_err(|e| PlaybackError::Seek(e.to_string()))
    }

    fn position(&self) -> Option<Duration> {
        Some(self.sink.get_pos())
    }

    fn duration(&self) -> Option<Duration> {
        self.total.lock().ok().and_then(|g| *g)
    }

    fn finished(&self) -> bool {
        self.loaded.load(Ordering::SeqCst) && self.sink.empty()
    }
}

impl Drop for RodioHandle {
    fn drop(&mut self) {
        self.sink.stop();
    }
}
