//! Asynchronous delivery of model assets into the animated set.
//!
//! Loaders run off the frame loop and push finished models into an
//! [`AssetQueue`]; the frame loop drains it at the start of every tick. A model
//! that fails to load is logged and never delivered.

use crossbeam::channel::{self, Receiver, Sender, TryRecvError};
use glam::Vec3;

use crate::config::ModelConfig;
use crate::model::SpinningObject;

#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("asset {0} is empty")]
    Empty(String),
    #[error("fetching {path} failed with status {status}")]
    Http { path: String, status: u16 },
    #[error("fetching {path} failed: {message}")]
    Fetch { path: String, message: String },
}

/// A model whose data has arrived.
#[derive(Debug, Clone)]
pub struct LoadedModel {
    pub object: SpinningObject,
}

impl LoadedModel {
    pub fn from_config(model: &ModelConfig) -> Self {
        let object = SpinningObject::new(
            model.name.clone(),
            Vec3::from_array(model.position),
            model.axis,
            model.speed,
        )
        .with_color(model.color);
        Self { object }
    }
}

/// Sending half handed to loaders.
#[derive(Clone)]
pub struct AssetSender(Sender<LoadedModel>);

impl AssetSender {
    /// Returns false once the frame loop has gone away.
    pub fn deliver(&self, model: LoadedModel) -> bool {
        self.0.send(model).is_ok()
    }
}

pub struct AssetQueue {
    tx: Sender<LoadedModel>,
    rx: Receiver<LoadedModel>,
}

impl AssetQueue {
    pub fn new() -> Self {
        let (tx, rx) = channel::unbounded();
        Self { tx, rx }
    }

    pub fn sender(&self) -> AssetSender {
        AssetSender(self.tx.clone())
    }

    /// Take everything that has arrived so far without blocking.
    pub fn drain(&self) -> Vec<LoadedModel> {
        let mut arrived = Vec::new();
        loop {
            match self.rx.try_recv() {
                Ok(model) => arrived.push(model),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        arrived
    }
}

impl Default for AssetQueue {
    fn default() -> Self {
        Self::new()
    }
}

fn finish(model: &ModelConfig, result: Result<usize, AssetError>, sender: &AssetSender) {
    match result {
        Ok(byte_len) => {
            tracing::info!(name = %model.name, path = %model.path, byte_len, "model loaded");
            if !sender.deliver(LoadedModel::from_config(model)) {
                tracing::debug!(name = %model.name, "frame loop gone, dropping model");
            }
        }
        Err(e) => tracing::warn!(name = %model.name, "model skipped: {e}"),
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn read_model(path: &str) -> Result<usize, AssetError> {
    let bytes = std::fs::read(path).map_err(|source| AssetError::Io {
        path: path.to_string(),
        source,
    })?;
    if bytes.is_empty() {
        return Err(AssetError::Empty(path.to_string()));
    }
    Ok(bytes.len())
}

/// Start loading every model; each one arrives on its own background thread.
#[cfg(not(target_arch = "wasm32"))]
pub fn load_models(models: &[ModelConfig], sender: &AssetSender) {
    for model in models.iter().cloned() {
        let sender = sender.clone();
        let spawned = std::thread::Builder::new()
            .name(format!("load-{}", model.name))
            .spawn(move || finish(&model, read_model(&model.path), &sender));
        if let Err(e) = spawned {
            tracing::warn!("could not start asset loader thread: {e}");
        }
    }
}

#[cfg(target_arch = "wasm32")]
async fn fetch_model(path: &str) -> Result<usize, AssetError> {
    use wasm_bindgen::JsCast;
    use wasm_bindgen_futures::JsFuture;

    let fetch_err = |e: wasm_bindgen::JsValue| AssetError::Fetch {
        path: path.to_string(),
        message: format!("{e:?}"),
    };

    let window = web_sys::window().ok_or_else(|| AssetError::Fetch {
        path: path.to_string(),
        message: "no global `window`".into(),
    })?;
    let response = JsFuture::from(window.fetch_with_str(path)).await.map_err(fetch_err)?;
    let response: web_sys::Response = response.dyn_into().map_err(fetch_err)?;
    if !response.ok() {
        return Err(AssetError::Http { path: path.to_string(), status: response.status() });
    }
    let buffer = JsFuture::from(response.array_buffer().map_err(fetch_err)?)
        .await
        .map_err(fetch_err)?;
    let byte_len = js_sys::ArrayBuffer::from(buffer).byte_length() as usize;
    if byte_len == 0 {
        return Err(AssetError::Empty(path.to_string()));
    }
    Ok(byte_len)
}

/// Start loading every model; each fetch resolves on a later animation frame.
#[cfg(target_arch = "wasm32")]
pub fn load_models(models: &[ModelConfig], sender: &AssetSender) {
    for model in models.iter().cloned() {
        let sender = sender.clone();
        wasm_bindgen_futures::spawn_local(async move {
            let result = fetch_model(&model.path).await;
            finish(&model, result, &sender);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Axis;
    use std::io::Write;
    use std::time::{Duration, Instant};

    fn model(name: &str, path: &str) -> ModelConfig {
        ModelConfig {
            name: name.into(),
            path: path.into(),
            position: [1.0, 2.0, 3.0],
            color: [1, 2, 3],
            axis: Axis::X,
            speed: 0.1,
        }
    }

    #[test]
    fn test_drain_returns_arrivals_once() {
        let queue = AssetQueue::new();
        assert!(queue.drain().is_empty());

        let sender = queue.sender();
        assert!(sender.deliver(LoadedModel::from_config(&model("a", "a.stl"))));
        assert!(sender.deliver(LoadedModel::from_config(&model("b", "b.stl"))));

        let arrived = queue.drain();
        assert_eq!(arrived.len(), 2);
        assert_eq!(arrived[0].object.name, "a");
        assert_eq!(arrived[1].object.transform.position, Vec3::new(1.0, 2.0, 3.0));
        assert!(queue.drain().is_empty());
    }

    #[test]
    fn test_failed_load_is_omitted() {
        let dir = std::env::temp_dir().join(format!("flyscene-assets-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let good = dir.join("good.stl");
        std::fs::File::create(&good).unwrap().write_all(b"solid test").unwrap();
        let empty = dir.join("empty.stl");
        std::fs::File::create(&empty).unwrap();

        let queue = AssetQueue::new();
        load_models(
            &[
                model("good", good.to_str().unwrap()),
                model("missing", dir.join("missing.stl").to_str().unwrap()),
                model("empty", empty.to_str().unwrap()),
            ],
            &queue.sender(),
        );

        let deadline = Instant::now() + Duration::from_secs(5);
        let mut arrived = Vec::new();
        while arrived.is_empty() && Instant::now() < deadline {
            arrived.extend(queue.drain());
            std::thread::sleep(Duration::from_millis(10));
        }
        // give the failing loaders time to finish, then make sure nothing else showed up
        std::thread::sleep(Duration::from_millis(100));
        arrived.extend(queue.drain());

        assert_eq!(arrived.len(), 1);
        assert_eq!(arrived[0].object.name, "good");
        assert_eq!(arrived[0].object.color, [1, 2, 3]);
        std::fs::remove_dir_all(&dir).ok();
    }
}
