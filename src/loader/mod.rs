//! Image loading: source descriptors, decoding, placement and load tickets.
//!
//! ## Load lifecycle
//!
//! A host starts a load with [`LoadTracker::begin`], fetches and decodes the
//! bytes (synchronously, on the [`DecoderThread`], or in the browser) and
//! hands the result back with the ticket it was given. Only the newest ticket
//! is honoured; results for older tickets are dropped.

mod decode;
mod fetch;
#[cfg(not(target_arch = "wasm32"))]
mod worker;

pub use decode::{decode_image, sniff_format, DecodedImage};
pub use fetch::{FileFetcher, ImageFetcher};
#[cfg(not(target_arch = "wasm32"))]
pub use worker::{DecodeOutcome, DecoderThread};

use medview_api::MedicalImageSummary;

use crate::geometry::Point;

/// Errors that can occur while loading an image.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LoadError {
    /// The bytes could not be retrieved
    #[error("Failed to fetch '{url}': {reason}")]
    Fetch {
        /// Requested location
        url: String,
        /// Underlying failure
        reason: String,
    },

    /// The bytes are not a readable raster
    #[error("Failed to decode image: {0}")]
    Decode(String),

    /// The raster has no pixels
    #[error("Image has zero size ({width}x{height})")]
    EmptyImage { width: u32, height: u32 },

    /// No known image signature at the start of the data
    #[error("Unsupported image format")]
    UnsupportedFormat,
}

/// Descriptor of the image to display.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ImageSource {
    pub url: String,
    /// Shown in the export; falls back to a generic title
    pub title: Option<String>,
    pub pathology_type: Option<String>,
}

impl ImageSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Descriptor for an entry of the image library.
    pub fn from_summary(summary: &MedicalImageSummary, base: &str) -> Self {
        Self {
            url: summary.view_url(base),
            title: Some(summary.title.clone()),
            pathology_type: summary.pathology_type.clone(),
        }
    }
}

/// Pixel size of a decoded image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageDimensions {
    pub width: u32,
    pub height: u32,
}

impl ImageDimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Where a loaded image sits on the canvas (drawing space).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImagePlacement {
    pub dimensions: ImageDimensions,
    pub scale: f32,
    /// Image centre
    pub center: Point,
}

impl ImagePlacement {
    /// Top-left corner of the scaled image.
    pub fn origin(&self) -> Point {
        let (w, h) = self.scaled_size();
        Point::new(self.center.x - w / 2.0, self.center.y - h / 2.0)
    }

    pub fn scaled_size(&self) -> (f32, f32) {
        (
            self.dimensions.width as f32 * self.scale,
            self.dimensions.height as f32 * self.scale,
        )
    }
}

/// Scale an image to fit `margin` of the canvas, centred.
pub fn fit_image(
    dimensions: ImageDimensions,
    canvas_width: u32,
    canvas_height: u32,
    margin: f32,
) -> Result<ImagePlacement, LoadError> {
    if dimensions.is_empty() {
        return Err(LoadError::EmptyImage {
            width: dimensions.width,
            height: dimensions.height,
        });
    }
    let (cw, ch) = (canvas_width as f32, canvas_height as f32);
    let scale_x = cw / dimensions.width as f32;
    let scale_y = ch / dimensions.height as f32;

    Ok(ImagePlacement {
        dimensions,
        scale: scale_x.min(scale_y) * margin,
        center: Point::new(cw / 2.0, ch / 2.0),
    })
}

/// Handle identifying one load request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LoadTicket(u64);

impl LoadTicket {
    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Tracks the newest load request and the URL on screen.
#[derive(Debug, Default)]
pub struct LoadTracker {
    next_id: u64,
    pending: Option<(LoadTicket, ImageSource)>,
    displayed: Option<ImageSource>,
}

impl LoadTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start loading `source`, superseding any pending load.
    ///
    /// Returns None when `source` is already displayed or pending.
    pub fn begin(&mut self, source: ImageSource) -> Option<LoadTicket> {
        let pending_url = self.pending.as_ref().map(|(_, s)| s.url.as_str());
        if pending_url == Some(source.url.as_str()) {
            return None;
        }
        if pending_url.is_none()
            && self.displayed.as_ref().map(|s| s.url.as_str()) == Some(source.url.as_str())
        {
            return None;
        }

        self.next_id += 1;
        let ticket = LoadTicket(self.next_id);
        if let Some((old, _)) = self.pending.replace((ticket, source)) {
            log::debug!("Load {} superseded by {}", old.id(), ticket.id());
        }
        Some(ticket)
    }

    /// Close out `ticket`. Returns its source when it is the newest one.
    ///
    /// On success the source becomes the displayed image; on failure the
    /// previously displayed image stays.
    pub fn finish(&mut self, ticket: LoadTicket, succeeded: bool) -> Option<ImageSource> {
        match &self.pending {
            Some((current, _)) if *current == ticket => {}
            _ => return None,
        }
        let (_, source) = self.pending.take()?;
        if succeeded {
            self.displayed = Some(source.clone());
        }
        Some(source)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending_source(&self) -> Option<&ImageSource> {
        self.pending.as_ref().map(|(_, s)| s)
    }

    /// The image currently on the canvas.
    pub fn displayed(&self) -> Option<&ImageSource> {
        self.displayed.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_landscape_image() {
        let placement = fit_image(ImageDimensions::new(2000, 1000), 1000, 700, 0.9).unwrap();
        assert!((placement.scale - 0.45).abs() < 1e-6);
        assert_eq!(placement.center, Point::new(500.0, 350.0));
        let (w, h) = placement.scaled_size();
        assert!((w - 900.0).abs() < 1e-3);
        assert!((h - 450.0).abs() < 1e-3);
        let origin = placement.origin();
        assert!((origin.x - 50.0).abs() < 1e-3);
        assert!((origin.y - 125.0).abs() < 1e-3);
    }

    #[test]
    fn test_fit_portrait_image() {
        let placement = fit_image(ImageDimensions::new(350, 1400), 1000, 700, 0.9).unwrap();
        assert!((placement.scale - 0.45).abs() < 1e-6);
    }

    #[test]
    fn test_fit_rejects_empty() {
        assert_eq!(
            fit_image(ImageDimensions::new(0, 10), 1000, 700, 0.9),
            Err(LoadError::EmptyImage { width: 0, height: 10 })
        );
    }

    #[test]
    fn test_latest_ticket_wins() {
        let mut tracker = LoadTracker::new();
        let first = tracker.begin(ImageSource::new("a.png")).unwrap();
        let second = tracker.begin(ImageSource::new("b.png")).unwrap();

        assert_eq!(tracker.finish(first, true), None);
        assert!(tracker.is_pending());
        assert_eq!(tracker.finish(second, true).unwrap().url, "b.png");
        assert!(!tracker.is_pending());
        assert_eq!(tracker.displayed().unwrap().url, "b.png");
    }

    #[test]
    fn test_begin_is_idempotent_per_url() {
        let mut tracker = LoadTracker::new();
        let ticket = tracker.begin(ImageSource::new("a.png")).unwrap();
        assert_eq!(tracker.begin(ImageSource::new("a.png")), None);
        tracker.finish(ticket, true);
        assert_eq!(tracker.begin(ImageSource::new("a.png")), None);
        assert!(tracker.begin(ImageSource::new("b.png")).is_some());
    }

    #[test]
    fn test_failed_load_keeps_displayed_image() {
        let mut tracker = LoadTracker::new();
        let ok = tracker.begin(ImageSource::new("a.png")).unwrap();
        tracker.finish(ok, true);
        let bad = tracker.begin(ImageSource::new("broken.png")).unwrap();
        assert!(tracker.finish(bad, false).is_some());
        assert_eq!(tracker.displayed().unwrap().url, "a.png");
        // A failed URL may be retried by the user
        assert!(tracker.begin(ImageSource::new("broken.png")).is_some());
    }

    #[test]
    fn test_source_from_summary() {
        let summary: MedicalImageSummary = serde_json::from_value(serde_json::json!({
            "id": 7,
            "filename": "chest.png",
            "title": "Chest X-ray",
            "pathology_type": "pneumonia",
            "file_type": "png",
            "file_size": 1024,
            "created_at": "2024-01-01T00:00:00"
        }))
        .unwrap();
        let source = ImageSource::from_summary(&summary, "http://localhost:8000");
        assert_eq!(source.url, "http://localhost:8000/api/medical-images/view/7");
        assert_eq!(source.title.as_deref(), Some("Chest X-ray"));
        assert_eq!(source.pathology_type.as_deref(), Some("pneumonia"));
    }
}
