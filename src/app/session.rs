use crate::app::config::AppConfig;
use crate::app::events::{AppEvent, ArtworkTarget, MenuAction, Transport, UiEvent};
use crate::app::renderer::{ResultRenderer, Row};
use crate::app::state::{
    ArtworkState, NowPlaying, PlaybackSession, PlaylistPicker, ResultMode, ResultSet, SlideDirection, Toast,
    Viewport,
};
use crate::app::timers::{TimerFired, TimerKey, Timers};
use crate::catalog::{Catalog, CatalogError, Song};
use crate::library::PlaylistManager;
use crate::player::{AudioBackend, PlaybackEngine, PlaybackError, PlayerState};
use image::DynamicImage;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

pub const SPINNER: [&str; 8] = ["⣾", "⣽", "⣻", "⢿", "⡿", "⣟", "⣯", "⣷"];

/// The panel's brain 🧠
///
/// Every mutation happens inside `handle`, one event at a time, on the event loop.
/// Timers, searches and artwork downloads run as tasks that only post events back;
/// each answer is checked against the current state (timer id, search ticket,
/// render generation, playing song) before it is allowed to change anything.
pub struct Session {
    config: AppConfig,
    catalog: Arc<dyn Catalog>,
    engine: PlaybackEngine,
    library: PlaylistManager,
    tx: UnboundedSender<AppEvent>,
    timers: Timers,
    renderer: ResultRenderer,

    // Search
    results: ResultSet,
    last_search: Vec<Song>,
    query: String,
    busy: bool,
    spinner_frame: usize,
    viewport: Viewport,
    search_ticket: u64,
    search_task: Option<JoinHandle<()>>,
    artwork_tasks: Vec<JoinHandle<()>>,

    // Playback
    current_index: Option<usize>,
    playback: Option<PlaybackSession>,
    now_playing: Option<NowPlaying>,
    direction: SlideDirection,

    picker: Option<PlaylistPicker>,
    toast: Option<Toast>,
    closed: bool,
}

impl Session {
    pub fn new(
        config: AppConfig,
        catalog: Arc<dyn Catalog>,
        backend: Box<dyn AudioBackend>,
        library: PlaylistManager,
        tx: UnboundedSender<AppEvent>,
    ) -> Self {
        let renderer = ResultRenderer::new(config.timing.clone(), &config.thumbnail_quality);
        Self {
            timers: Timers::new(tx.clone()),
            engine: PlaybackEngine::new(backend),
            renderer,
            config,
            catalog,
            library,
            tx,
            results: ResultSet::default(),
            last_search: Vec::new(),
            query: String::new(),
            busy: false,
            spinner_frame: 0,
            viewport: Viewport::Collapsed,
            search_ticket: 0,
            search_task: None,
            artwork_tasks: Vec::new(),
            current_index: None,
            playback: None,
            now_playing: None,
            direction: SlideDirection::default(),
            picker: None,
            toast: None,
            closed: false,
        }
    }

    // --- Read side (for the panel and tests) ---

    pub fn results(&self) -> &ResultSet {
        &self.results
    }

    pub fn rows(&self) -> &[Row] {
        self.renderer.rows()
    }

    pub fn renderer(&self) -> &ResultRenderer {
        &self.renderer
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn spinner_glyph(&self) -> Option<&'static str> {
        self.busy.then(|| SPINNER[self.spinner_frame % SPINNER.len()])
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current_index
    }

    pub fn playback(&self) -> Option<&PlaybackSession> {
        self.playback.as_ref()
    }

    pub fn player_state(&self) -> PlayerState {
        self.engine.state()
    }

    pub fn now_playing(&self) -> Option<&NowPlaying> {
        self.now_playing.as_ref()
    }

    pub fn picker(&self) -> Option<&PlaylistPicker> {
        self.picker.as_ref()
    }

    pub fn toast(&self) -> Option<&Toast> {
        self.toast.as_ref()
    }

    pub fn library(&self) -> &PlaylistManager {
        &self.library
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.pending()
    }

    /// Fixed "Liked" tab followed by one tab per playlist, in saved order.
    pub fn tabs(&self) -> Vec<ResultMode> {
        std::iter::once(ResultMode::Liked)
            .chain(self.library.playlist_names().map(|n| ResultMode::Playlist(n.to_string())))
            .collect()
    }

    pub fn menu(&self) -> &'static [MenuAction] {
        MenuAction::for_mode(&self.results.mode)
    }

    // --- Write side ---

    pub fn handle(&mut self, event: AppEvent) {
        if self.closed {
            return;
        }
        match event {
            AppEvent::Input(_) => {}
            AppEvent::Ui(ui) => self.on_ui(ui),
            AppEvent::Timer(fired) => self.on_timer(fired),
            AppEvent::SearchFinished { ticket, result } => self.on_search_finished(ticket, result),
            AppEvent::ArtworkLoaded { target, image } => self.on_artwork_loaded(target, image),
        }
    }

    fn on_ui(&mut self, event: UiEvent) {
        match event {
            UiEvent::SearchChanged(text) => self.on_search_changed(&text),
            UiEvent::RowClicked(row) => {
                self.play_index(row);
            }
            UiEvent::Transport(Transport::PlayPause) => self.toggle_play_pause(),
            UiEvent::Transport(Transport::Next) => {
                self.step(SlideDirection::Next);
            }
            UiEvent::Transport(Transport::Previous) => {
                self.step(SlideDirection::Previous);
            }
            UiEvent::SeekReleased(fraction) => self.seek(fraction),
            UiEvent::LikeToggled(row) => self.toggle_like(row),
            UiEvent::Menu { row, action } => self.on_menu(row, action),
            UiEvent::PickerToggle(index) => {
                if let Some(picker) = self.picker.as_mut() {
                    if let Some(option) = picker.options.get_mut(index) {
                        option.1 = !option.1;
                        picker.cursor = index;
                    }
                }
            }
            UiEvent::PickerConfirm => self.confirm_picker(),
            UiEvent::PickerCancel => self.picker = None,
            UiEvent::CreatePlaylist(name) => match self.library.create(&name) {
                Ok(()) => self.notify(format!("Created \"{}\"", name.trim())),
                Err(e) => self.notify(e.to_string()),
            },
            UiEvent::DeletePlaylist(name) => self.delete_playlist(&name),
            UiEvent::SelectTab(mode) => self.select_tab(mode),
        }
    }

    fn on_timer(&mut self, fired: TimerFired) {
        if !self.timers.accept(fired) {
            return;
        }
        match fired.key {
            TimerKey::SearchDebounce => self.start_search(),
            TimerKey::Spinner => self.spinner_frame = (self.spinner_frame + 1) % SPINNER.len(),
            TimerKey::ProgressPoll => self.on_progress_tick(),
            TimerKey::OverlayFrame => self.renderer.advance_overlay(),
            TimerKey::RowEntrance(row) => self.renderer.on_entrance(row, &mut self.timers),
            TimerKey::RowArtwork(row) => {
                if let Some((target, url)) = self.renderer.on_artwork_due(row) {
                    self.fetch_artwork(target, &url);
                }
            }
            TimerKey::RowExit(_) => {
                let mode = self.results.mode.clone();
                self.show(mode);
            }
        }
    }

    // --- Search ---

    fn on_search_changed(&mut self, text: &str) {
        self.timers.cancel(TimerKey::SearchDebounce);
        self.invalidate_search();

        let query = text.trim();
        if query.is_empty() {
            self.query.clear();
            self.set_busy(false);
            self.last_search.clear();
            self.results = ResultSet::new(ResultMode::Search, Vec::new());
            self.current_index = None;
            self.renderer.clear(&mut self.timers);
            self.viewport = Viewport::Collapsed;
            return;
        }

        if self.results.mode != ResultMode::Search {
            self.picker = None;
            self.show(ResultMode::Search);
        }
        self.query = query.to_string();
        self.set_busy(true);
        self.viewport = Viewport::Loading;
        self.timers.once(TimerKey::SearchDebounce, self.config.timing.debounce());
    }

    fn start_search(&mut self) {
        self.invalidate_search();
        let ticket = self.search_ticket;
        let query = self.query.clone();
        let request = self.catalog.search(&query);
        let tx = self.tx.clone();

        debug!(query = %query, ticket, "search dispatched");
        self.search_task = Some(tokio::spawn(async move {
            let result = request.await;
            let _ = tx.send(AppEvent::SearchFinished { ticket, result });
        }));
    }

    /// Forget whatever search is in flight; its answer will carry an old ticket.
    fn invalidate_search(&mut self) {
        self.search_ticket += 1;
        if let Some(task) = self.search_task.take() {
            task.abort();
        }
    }

    fn on_search_finished(&mut self, ticket: u64, result: Result<Vec<Song>, CatalogError>) {
        if ticket != self.search_ticket {
            debug!(ticket, current = self.search_ticket, "stale search result dropped");
            return;
        }
        self.search_task = None;
        self.set_busy(false);

        match result {
            Ok(songs) => {
                info!(query = %self.query, hits = songs.len(), "search results");
                self.last_search = songs.clone();
                self.replace_results(ResultSet::new(ResultMode::Search, songs));
            }
            Err(e) => {
                warn!(query = %self.query, "search failed: {}", e);
                self.refresh_viewport();
            }
        }
    }

    fn set_busy(&mut self, busy: bool) {
        if busy && !self.busy {
            self.spinner_frame = 0;
            self.timers.every(TimerKey::Spinner, self.config.timing.spinner());
        } else if !busy {
            self.timers.cancel(TimerKey::Spinner);
        }
        self.busy = busy;
    }

    // --- Result set ---

    fn select_tab(&mut self, mode: ResultMode) {
        self.timers.cancel(TimerKey::SearchDebounce);
        self.invalidate_search();
        self.set_busy(false);
        self.picker = None;
        self.show(mode);
    }

    /// Rebuild the list for `mode` from its source of truth.
    fn show(&mut self, mode: ResultMode) {
        let songs = match &mode {
            ResultMode::Search => self.last_search.clone(),
            ResultMode::Liked => self.library.liked().to_vec(),
            ResultMode::Playlist(name) => match self.library.playlist(name) {
                Some(songs) => songs.to_vec(),
                None => {
                    self.notify(format!("No playlist named \"{}\"", name));
                    return;
                }
            },
        };
        self.replace_results(ResultSet::new(mode, songs));
    }

    fn replace_results(&mut self, set: ResultSet) {
        self.results = set;
        let playing = self.playback.as_ref().map(|p| p.song.id.clone());
        self.current_index = playing.as_deref().and_then(|id| self.results.position_of(id));

        let library = &self.library;
        self.renderer
            .render(&self.results, |id| library.is_liked(id), playing.as_deref(), &mut self.timers);
        self.refresh_viewport();
    }

    fn refresh_viewport(&mut self) {
        let rows = self.renderer.rows().len();
        self.viewport = if self.renderer.placeholder().is_some() {
            Viewport::Expanded(1)
        } else if rows == 0 {
            Viewport::Collapsed
        } else {
            Viewport::Expanded(rows.min(self.config.max_visible_rows.max(1)))
        };
    }

    // --- Playback ---

    fn is_playable(&self, index: usize) -> bool {
        self.results
            .songs
            .get(index)
            .is_some_and(|s| s.audio_url(&self.config.audio_quality).is_some())
    }

    /// Idle/Playing/Paused → Playing on `index`. Unplayable songs change nothing.
    fn play_index(&mut self, index: usize) -> bool {
        let Some(song) = self.results.songs.get(index).cloned() else {
            return false;
        };
        let url = match song.audio_url(&self.config.audio_quality) {
            Some(url) => url.to_string(),
            None => {
                let err = PlaybackError::Unplayable(song.id.clone());
                info!(quality = %self.config.audio_quality, "{}", err);
                self.notify(format!("\"{}\" can't be played", song.name));
                return false;
            }
        };

        self.timers.cancel(TimerKey::ProgressPoll);
        if let Err(e) = self.engine.play(&url) {
            warn!(song = %song.id, "playback failed: {}", e);
            // The previous stream is already gone
            self.release_playback();
            self.notify(format!("Playback failed: {}", e));
            return false;
        }

        info!(song = %song.id, index, "playing");
        self.current_index = Some(index);
        self.renderer.mark_now_playing(Some(index), &mut self.timers);
        self.show_now_playing(&song);
        self.playback = Some(PlaybackSession::new(song));
        self.timers.every(TimerKey::ProgressPoll, self.config.timing.poll());
        true
    }

    /// Next/previous with wrap-around, skipping songs without a stream.
    fn step(&mut self, direction: SlideDirection) -> bool {
        let len = self.results.len();
        if len == 0 {
            return false;
        }
        self.direction = direction;

        let mut cursor = self.current_index;
        for _ in 0..len {
            let target = match (direction, cursor) {
                (SlideDirection::Next, None) => 0,
                (SlideDirection::Next, Some(i)) => (i + 1) % len,
                (SlideDirection::Previous, None) | (SlideDirection::Previous, Some(0)) => len - 1,
                (SlideDirection::Previous, Some(i)) => i - 1,
            };
            if self.is_playable(target) {
                return self.play_index(target);
            }
            cursor = Some(target);
        }
        self.notify("Nothing playable in this list".to_string());
        false
    }

    fn toggle_play_pause(&mut self) {
        if !self.engine.is_active() {
            return;
        }
        let state = self.engine.toggle();
        debug!(?state, "transport toggled");
    }

    fn track_duration_hint(&self) -> Option<Duration> {
        self.playback.as_ref().map(|p| Duration::from_secs(p.song.duration))
    }

    fn on_progress_tick(&mut self) {
        if self.engine.state() != PlayerState::Playing {
            return;
        }
        if self.engine.finished() {
            debug!("stream ran dry");
            self.advance_after_end();
            return;
        }

        let hint = self.track_duration_hint();
        let (Some(position), Some(total)) = (self.engine.position(), self.engine.duration_or(hint)) else {
            return;
        };

        if position >= total.saturating_sub(self.config.timing.end_gap()) {
            debug!(?position, ?total, "track finished");
            self.advance_after_end();
            return;
        }

        if let Some(playback) = self.playback.as_mut() {
            playback.update(position, total);
        }
    }

    /// Auto-advance: drop the finished stream, then move on with wrap-around.
    fn advance_after_end(&mut self) {
        self.timers.cancel(TimerKey::ProgressPoll);
        self.engine.stop();
        if !self.step(SlideDirection::Next) {
            self.release_playback();
        }
    }

    /// Nothing is playing anymore: forget the song, its card and its overlay.
    fn release_playback(&mut self) {
        self.timers.cancel(TimerKey::ProgressPoll);
        self.playback = None;
        self.now_playing = None;
        self.current_index = None;
        self.renderer.mark_now_playing(None, &mut self.timers);
    }

    fn seek(&mut self, fraction: f64) {
        if !self.engine.is_active() {
            return;
        }
        let hint = self.track_duration_hint();
        let Some(target) = self.engine.seek_fraction(fraction, hint) else {
            return;
        };
        if let (Some(total), Some(playback)) = (self.engine.duration_or(hint), self.playback.as_mut()) {
            playback.update(target, total);
        }
    }

    fn show_now_playing(&mut self, song: &Song) {
        let cover = song.image_url(&self.config.cover_quality).map(str::to_string);
        self.now_playing = Some(NowPlaying {
            title: song.name.clone(),
            artist: song.artist().to_string(),
            artwork: if cover.is_some() { ArtworkState::Loading } else { ArtworkState::Idle },
            direction: self.direction,
            changed_at: std::time::Instant::now(),
        });
        if let Some(url) = cover {
            self.fetch_artwork(ArtworkTarget::NowPlaying { song_id: song.id.clone() }, &url);
        }
    }

    // --- Artwork ---

    fn fetch_artwork(&mut self, target: ArtworkTarget, url: &str) {
        let request = self.catalog.artwork(url);
        let tx = self.tx.clone();
        self.artwork_tasks.retain(|t| !t.is_finished());
        self.artwork_tasks.push(tokio::spawn(async move {
            let image = request.await;
            let _ = tx.send(AppEvent::ArtworkLoaded { target, image });
        }));
    }

    fn on_artwork_loaded(&mut self, target: ArtworkTarget, image: Result<DynamicImage, CatalogError>) {
        let image = image.map_err(|e| debug!(?target, "artwork unavailable: {}", e)).ok();
        match target {
            ArtworkTarget::Row { generation, row } => {
                self.renderer.apply_artwork(generation, row, image);
            }
            ArtworkTarget::NowPlaying { song_id } => {
                let current = self.playback.as_ref().map(|p| p.song_id());
                if current != Some(song_id.as_str()) {
                    return;
                }
                if let Some(panel) = self.now_playing.as_mut() {
                    panel.artwork = match image {
                        Some(img) => ArtworkState::Loaded(Arc::new(img)),
                        None => ArtworkState::Failed,
                    };
                }
            }
        }
    }

    // --- Library ---

    fn toggle_like(&mut self, row: usize) {
        let Some(song) = self.renderer.rows().get(row).map(|r| r.song.clone()) else {
            return;
        };
        let liked = self.library.toggle_liked(&song);
        self.renderer.set_liked(row, liked);
        if !liked && self.results.mode == ResultMode::Liked {
            self.renderer.begin_exit(row, &mut self.timers);
        }
    }

    fn on_menu(&mut self, row: usize, action: MenuAction) {
        let Some(song) = self.renderer.rows().get(row).map(|r| r.song.clone()) else {
            return;
        };
        match action {
            MenuAction::Like => self.toggle_like(row),
            MenuAction::AddToPlaylist => {
                let options = self.library.membership(&song.id);
                if options.is_empty() {
                    self.notify("Create a playlist first".to_string());
                    return;
                }
                self.picker = Some(PlaylistPicker { song, options, cursor: 0 });
            }
            MenuAction::RemoveFromPlaylist => {
                let ResultMode::Playlist(name) = self.results.mode.clone() else {
                    return;
                };
                match self.library.remove_song(&name, &song.id) {
                    Ok(true) => self.show(ResultMode::Playlist(name)),
                    Ok(false) => {}
                    Err(e) => self.notify(e.to_string()),
                }
            }
            MenuAction::Queue => {
                info!(song = %song.id, "queue requested");
                self.notify("Queue is not available yet".to_string());
            }
            MenuAction::Download => {
                info!(song = %song.id, "download requested");
                self.notify("Downloads are not available yet".to_string());
            }
        }
    }

    fn confirm_picker(&mut self) {
        let Some(picker) = self.picker.take() else {
            return;
        };
        let delta = self.library.apply_selection(&picker.song, &picker.selected());
        if delta.is_empty() {
            return;
        }
        if let ResultMode::Playlist(name) = self.results.mode.clone() {
            if delta.touches(&name) {
                self.show(ResultMode::Playlist(name));
            }
        }
        self.notify(format!(
            "Added to {}, removed from {}",
            delta.added.len(),
            delta.removed.len()
        ));
    }

    fn delete_playlist(&mut self, name: &str) {
        match self.library.delete(name) {
            Ok(()) => {
                self.notify(format!("Deleted \"{}\"", name));
                if self.results.mode == ResultMode::Playlist(name.to_string()) {
                    self.show(ResultMode::Liked);
                }
            }
            Err(e) => self.notify(e.to_string()),
        }
    }

    fn notify(&mut self, message: String) {
        self.toast = Some(Toast::new(message, Duration::from_secs(3)));
    }

    // --- Teardown ---

    /// Cancel every timer and task, release the player and the renderer frames.
    pub fn shutdown(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        self.timers.cancel_all();
        self.invalidate_search();
        for task in self.artwork_tasks.drain(..) {
            task.abort();
        }
        self.engine.stop();
        self.renderer.teardown(&mut self.timers);
        self.busy = false;
        self.picker = None;
        info!("session closed");
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.shutdown();
    }
}
