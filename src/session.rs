use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};

use egui::Pos2;

use crate::client::ApiError;
use crate::crop::CropRegion;
use crate::ops::{FilterIntensity, Operation};
use crate::screen::Feature;

/// Decoded RGBA pixels ready to upload as a texture.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    pub rgba: Vec<u8>,
    pub width: usize,
    pub height: usize,
}

/// Background work delivered back to the UI thread.
pub enum WorkMsg {
    ImageLoaded {
        path: PathBuf,
        bytes: Vec<u8>,
        decoded: DecodedImage,
        natural: (u32, u32),
    },
    ImageLoadFailed {
        path: PathBuf,
        message: String,
    },
    OperationFinished {
        epoch: u64,
        operation: Operation,
        outcome: Result<Vec<u8>, ApiError>,
    },
}

/// The user-selected file: encoded bytes for upload, plus preview data.
pub struct SourceImage {
    pub path: PathBuf,
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub natural_size: (u32, u32),
    pub texture: Option<egui::TextureHandle>,
}

/// The single live result. Replaced wholesale; dropping it releases the
/// texture.
pub struct OperationResult {
    pub operation: Operation,
    pub bytes: Vec<u8>,
    pub texture: Option<egui::TextureHandle>,
}

/// All state for one workflow visit. Created fresh whenever a workflow screen
/// is entered; dropped (textures included) when the user navigates away.
pub struct WorkflowSession {
    /// Identifies this visit. Requests carry it out, and outcomes tagged with
    /// an older epoch are dropped, so navigating away orphans in-flight work.
    pub epoch: u64,
    pub image: Option<SourceImage>,
    /// Set while a picked file is being read/decoded off-thread.
    pub pending_image: Option<PathBuf>,
    pub crop: CropRegion,
    pub intensity: FilterIntensity,
    pub result: Option<OperationResult>,
    pub error: Option<String>,
    pub is_loading: bool,
    /// Anchor of an in-progress crop drag; `Some` means drawing.
    pub drag_start: Option<Pos2>,
}

impl Default for WorkflowSession {
    fn default() -> Self {
        Self::new()
    }
}

impl WorkflowSession {
    pub fn new() -> Self {
        static NEXT_EPOCH: AtomicU64 = AtomicU64::new(0);
        Self {
            epoch: NEXT_EPOCH.fetch_add(1, Ordering::Relaxed),
            image: None,
            pending_image: None,
            crop: CropRegion::default(),
            intensity: FilterIntensity::default(),
            result: None,
            error: None,
            is_loading: false,
            drag_start: None,
        }
    }

    /// Drag gestures only apply with an image loaded, no request in flight,
    /// and cropping active.
    pub fn crop_interaction_enabled(&self, feature: Feature) -> bool {
        feature == Feature::Cropping && self.image.is_some() && !self.is_loading
    }

    pub fn clear_results(&mut self) {
        self.result = None;
    }

    /// Ran before every dispatch: one result slot, cleared up front.
    pub fn begin_operation(&mut self) {
        self.is_loading = true;
        self.error = None;
        self.clear_results();
    }

    /// A completed request, success or failure. Outcomes from an earlier
    /// session are dropped. Within a session they apply in arrival order, so
    /// with overlapping requests the last to resolve owns the result slot,
    /// and the first to finish drops the loading flag.
    pub fn apply_outcome(
        &mut self,
        epoch: u64,
        operation: Operation,
        outcome: Result<Vec<u8>, ApiError>,
    ) {
        if epoch != self.epoch {
            return;
        }
        self.is_loading = false;
        match outcome {
            Ok(bytes) => {
                self.result = Some(OperationResult {
                    operation,
                    bytes,
                    texture: None,
                });
            }
            Err(err) => {
                self.error = Some(err.to_string());
            }
        }
    }

    /// A background image load finished. Stale loads (the user picked another
    /// file meanwhile) are dropped.
    pub fn apply_image_loaded(&mut self, path: PathBuf, bytes: Vec<u8>, natural: (u32, u32)) {
        if self.pending_image.as_ref() != Some(&path) {
            return;
        }
        self.pending_image = None;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_owned());
        self.image = Some(SourceImage {
            path,
            file_name,
            bytes,
            natural_size: natural,
            texture: None,
        });
        // New selection: previous result is gone, crop covers the new image.
        self.clear_results();
        self.error = None;
        self.crop = CropRegion::full(natural.0, natural.1);
        self.drag_start = None;
    }

    pub fn apply_image_load_failed(&mut self, path: PathBuf, message: String) {
        if self.pending_image.as_ref() != Some(&path) {
            return;
        }
        self.pending_image = None;
        self.error = Some(message);
    }

    /// Reset action from the crop form: back to the image's full natural
    /// dimensions.
    pub fn reset_crop_to_full(&mut self) {
        if let Some(ref img) = self.image {
            self.crop = CropRegion::full(img.natural_size.0, img.natural_size.1);
        }
    }
}
