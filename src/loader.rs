//! Background model loading.
//!
//! Each request parses one model file on its own thread and sends the result
//! back over a channel. The event loop drains the channel with
//! [`AssetLoader::poll`] once per frame; GPU upload happens there, on the
//! thread that owns the device.

use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread;

use crate::geometry::{GeometryError, ModelData};
use crate::scene::SceneSlot;

/// A finished load, successful or not.
#[derive(Debug)]
pub struct LoadResult {
    pub slot: SceneSlot,
    pub path: PathBuf,
    pub result: Result<ModelData, GeometryError>,
}

pub struct AssetLoader {
    sender: Sender<LoadResult>,
    receiver: Receiver<LoadResult>,
    pending: usize,
}

impl Default for AssetLoader {
    fn default() -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            sender,
            receiver,
            pending: 0,
        }
    }
}

impl AssetLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start parsing `path` for the given scene.
    pub fn request(&mut self, slot: SceneSlot, path: impl AsRef<Path>) {
        let path = path.as_ref().to_path_buf();
        let sender = self.sender.clone();
        log::debug!("loading {} for {slot}", path.display());

        self.pending += 1;
        thread::spawn(move || {
            let result = ModelData::from_file(&path);
            // The receiver only disappears when the app is shutting down.
            let _ = sender.send(LoadResult { slot, path, result });
        });
    }

    /// Drain every load that has finished since the last call.
    pub fn poll(&mut self) -> Vec<LoadResult> {
        let mut finished = Vec::new();
        loop {
            match self.receiver.try_recv() {
                Ok(result) => {
                    self.pending = self.pending.saturating_sub(1);
                    finished.push(result);
                }
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => break,
            }
        }
        finished
    }

    /// Loads requested but not yet returned by [`AssetLoader::poll`].
    pub fn pending(&self) -> usize {
        self.pending
    }

    pub fn is_idle(&self) -> bool {
        self.pending == 0
    }
}
