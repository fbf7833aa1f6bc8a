//! Asynchronous asset server
//!
//! Every request returns a handle at once. Loading runs on a worker thread
//! (or inline, for deterministic hosts) and the result is queued; nothing in
//! the server's tables changes until the owner drains the queue with
//! [`AssetServer::poll`]. All mutation therefore happens on the thread that
//! owns the server, between frames.
//!
//! A failed load is terminal: the slot stays [`LoadState::Failed`] for the
//! life of the process and readers fall back to untextured rendering.

use std::collections::HashMap;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::assets::{Asset, AssetError, AssetSource, Font, FontHandle, ImageData, TextureHandle};
use crate::foundation::collections::{DefaultKey, HandleMap, TypedHandle};

/// How requests are executed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadMode {
    /// One worker thread per request
    #[default]
    Background,
    /// Load on the calling thread; the result is still only visible after the next poll
    Inline,
}

/// Lifecycle of a requested asset
#[derive(Debug)]
pub enum LoadState<T> {
    /// Requested, not yet delivered
    Pending,
    /// Loaded and decoded
    Ready(T),
    /// Failed permanently; holds the error message
    Failed(String),
}

impl<T> LoadState<T> {
    /// The loaded value, if any
    pub fn ready(&self) -> Option<&T> {
        match self {
            Self::Ready(value) => Some(value),
            _ => None,
        }
    }

    /// Whether the load has finished, successfully or not
    pub fn is_settled(&self) -> bool {
        !matches!(self, Self::Pending)
    }

    /// Whether the load failed
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

/// Notification produced by [`AssetServer::poll`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetEvent {
    /// A texture finished loading
    TextureReady(TextureHandle),
    /// A texture failed to load
    TextureFailed(TextureHandle),
    /// A font finished loading
    FontReady(FontHandle),
    /// A font failed to load
    FontFailed(FontHandle),
}

struct Slot<T> {
    path: String,
    state: LoadState<T>,
}

enum Completion {
    Texture(DefaultKey, Result<ImageData, AssetError>),
    Font(DefaultKey, Result<Font, AssetError>),
}

/// Typed storage for one asset kind, with path de-duplication
struct Table<T> {
    slots: HandleMap<Slot<T>>,
    by_path: HashMap<String, DefaultKey>,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            slots: HandleMap::default(),
            by_path: HashMap::new(),
        }
    }
}

impl<T> Table<T> {
    /// Existing key for `path`, or a fresh pending slot
    fn request(&mut self, path: &str) -> (DefaultKey, bool) {
        if let Some(&key) = self.by_path.get(path) {
            return (key, false);
        }
        let key = self.slots.insert(Slot {
            path: path.to_string(),
            state: LoadState::Pending,
        });
        self.by_path.insert(path.to_string(), key);
        (key, true)
    }

    fn settle(&mut self, key: DefaultKey, result: Result<T, AssetError>, kind: &str) -> bool {
        let Some(slot) = self.slots.get_mut(key) else {
            return false;
        };
        match result {
            Ok(value) => {
                log::debug!("Loaded {kind} '{}'", slot.path);
                slot.state = LoadState::Ready(value);
                true
            }
            Err(error) => {
                log::warn!("Failed to load {kind} '{}': {error}; falling back to default", slot.path);
                slot.state = LoadState::Failed(error.to_string());
                false
            }
        }
    }
}

/// Loads textures and fonts off the frame cadence
pub struct AssetServer {
    source: Arc<dyn AssetSource>,
    mode: LoadMode,
    textures: Table<ImageData>,
    fonts: Table<Font>,
    sender: Sender<Completion>,
    receiver: Receiver<Completion>,
    pending: usize,
}

impl AssetServer {
    /// Create a server reading from `source`
    pub fn new(source: impl AssetSource + 'static, mode: LoadMode) -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            source: Arc::new(source),
            mode,
            textures: Table::default(),
            fonts: Table::default(),
            sender,
            receiver,
            pending: 0,
        }
    }

    /// Request a texture; repeated requests for one path share a handle
    pub fn load_texture(&mut self, path: &str) -> TextureHandle {
        let (key, fresh) = self.textures.request(path);
        if fresh {
            self.dispatch::<ImageData>(path, key, Completion::Texture);
        }
        TypedHandle::new(key)
    }

    /// Request a font; repeated requests for one path share a handle
    pub fn load_font(&mut self, path: &str) -> FontHandle {
        let (key, fresh) = self.fonts.request(path);
        if fresh {
            self.dispatch::<Font>(path, key, Completion::Font);
        }
        TypedHandle::new(key)
    }

    fn dispatch<T: Asset>(
        &mut self,
        path: &str,
        key: DefaultKey,
        wrap: fn(DefaultKey, Result<T, AssetError>) -> Completion,
    ) {
        self.pending += 1;
        log::debug!("Requested {} '{path}'", T::KIND);

        let load = {
            let source = Arc::clone(&self.source);
            let sender = self.sender.clone();
            let path = path.to_string();
            move || {
                let result = source.read(&path).and_then(|bytes| T::from_bytes(&bytes));
                // The receiver lives as long as the server; a send error means
                // the server was dropped and nobody wants the result.
                let _ = sender.send(wrap(key, result));
            }
        };

        match self.mode {
            LoadMode::Inline => load(),
            LoadMode::Background => {
                let spawned = std::thread::Builder::new()
                    .name(format!("asset-{}", T::KIND))
                    .spawn(load);
                if let Err(error) = spawned {
                    let _ = self.sender.send(wrap(key, Err(AssetError::IoError(error))));
                }
            }
        }
    }

    /// Apply every completed load and report what changed
    pub fn poll(&mut self) -> Vec<AssetEvent> {
        let mut events = Vec::new();
        while let Ok(completion) = self.receiver.try_recv() {
            events.push(self.apply(completion));
        }
        events
    }

    /// Block until every outstanding request has settled or `timeout` passes
    pub fn wait_idle(&mut self, timeout: Duration) -> Vec<AssetEvent> {
        let deadline = Instant::now() + timeout;
        let mut events = self.poll();
        while self.pending > 0 {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.receiver.recv_timeout(remaining) {
                Ok(completion) => events.push(self.apply(completion)),
                Err(_) => break,
            }
        }
        events
    }

    fn apply(&mut self, completion: Completion) -> AssetEvent {
        self.pending = self.pending.saturating_sub(1);
        match completion {
            Completion::Texture(key, result) => {
                let handle = TypedHandle::new(key);
                if self.textures.settle(key, result, ImageData::KIND) {
                    AssetEvent::TextureReady(handle)
                } else {
                    AssetEvent::TextureFailed(handle)
                }
            }
            Completion::Font(key, result) => {
                let handle = TypedHandle::new(key);
                if self.fonts.settle(key, result, Font::KIND) {
                    AssetEvent::FontReady(handle)
                } else {
                    AssetEvent::FontFailed(handle)
                }
            }
        }
    }

    /// Loaded texture pixels, if the texture is ready
    pub fn texture(&self, handle: TextureHandle) -> Option<&ImageData> {
        self.texture_state(handle)?.ready()
    }

    /// Full load state of a texture
    pub fn texture_state(&self, handle: TextureHandle) -> Option<&LoadState<ImageData>> {
        self.textures.slots.get(handle.key()).map(|slot| &slot.state)
    }

    /// Loaded font, if ready
    pub fn font(&self, handle: FontHandle) -> Option<&Font> {
        self.font_state(handle)?.ready()
    }

    /// Full load state of a font
    pub fn font_state(&self, handle: FontHandle) -> Option<&LoadState<Font>> {
        self.fonts.slots.get(handle.key()).map(|slot| &slot.state)
    }

    /// Path a texture was requested with
    pub fn texture_path(&self, handle: TextureHandle) -> Option<&str> {
        self.textures.slots.get(handle.key()).map(|slot| slot.path.as_str())
    }

    /// Number of requests not yet delivered through [`AssetServer::poll`]
    pub fn pending_count(&self) -> usize {
        self.pending
    }

    /// Number of distinct textures requested
    pub fn texture_count(&self) -> usize {
        self.textures.slots.len()
    }
}
