//! Annotation registry: the ordered list of committed annotations.
//!
//! Insertion order is z-order; the last annotation is drawn on top and is
//! the first one hit-tested.

use crate::error::ViewerError;
use crate::export::AnnotationExport;
use crate::geometry::Point;
use crate::model::{Annotation, AnnotationId, Drawable, DrawableId};
use crate::time;

/// Storage for all annotations of the current image.
#[derive(Debug, Default)]
pub struct AnnotationRegistry {
    annotations: Vec<Annotation>,
    /// Currently selected annotation ID.
    selected_id: Option<AnnotationId>,
    /// Last ID handed out, so IDs stay strictly increasing within a session
    last_id: u64,
    /// Set when annotations or selection change.
    dirty: bool,
}

impl AnnotationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if the registry has been modified since last clear_dirty().
    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Clear the dirty flag. Call after the host has re-rendered.
    #[inline]
    pub fn clear_dirty(&mut self) {
        self.dirty = false;
    }

    #[inline]
    fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    fn next_id(&mut self) -> AnnotationId {
        let id = time::now_millis().max(self.last_id.saturating_add(1));
        self.last_id = id;
        AnnotationId(id)
    }

    /// Wrap a finished drawable in a new annotation labelled `"<Kind> <n+1>"`.
    pub fn commit(&mut self, drawable: Drawable) -> AnnotationId {
        let id = self.next_id();
        let label = format!("{} {}", drawable.kind.display_name(), self.annotations.len() + 1);
        log::info!("📌 Committed annotation {} ({})", label, id);
        self.annotations.push(Annotation::new(id, label, drawable));
        self.mark_dirty();
        id
    }

    /// Append an already built annotation.
    ///
    /// Its ID must be unused and below `u64::MAX`, so later commits can
    /// still hand out a larger one.
    pub fn add(&mut self, annotation: Annotation) -> Result<(), ViewerError> {
        let id = annotation.id;
        if id.0 == u64::MAX || self.get(id).is_some() {
            log::warn!("Rejected annotation with ID {}", id);
            return Err(ViewerError::InvalidAnnotationId(id));
        }
        self.last_id = self.last_id.max(id.0);
        self.annotations.push(annotation);
        self.mark_dirty();
        Ok(())
    }

    /// Move an annotation's shape by `(dx, dy)` in drawing space.
    pub fn translate(&mut self, id: AnnotationId, dx: f32, dy: f32) -> Result<(), ViewerError> {
        let annotation = self
            .annotations
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or(ViewerError::UnknownAnnotation(id))?;
        annotation.drawable.translate(dx, dy);
        self.mark_dirty();
        Ok(())
    }

    /// Remove an annotation and its drawable.
    pub fn remove(&mut self, id: AnnotationId) -> Result<Annotation, ViewerError> {
        let index = self
            .annotations
            .iter()
            .position(|a| a.id == id)
            .ok_or(ViewerError::UnknownAnnotation(id))?;

        if self.selected_id == Some(id) {
            self.selected_id = None;
        }
        let removed = self.annotations.remove(index);
        log::info!("🗑️ Removed annotation {} ({})", removed.label, id);
        self.mark_dirty();
        Ok(removed)
    }

    /// Remove every annotation. Returns how many were removed.
    pub fn clear(&mut self) -> usize {
        let count = self.annotations.len();
        if count > 0 || self.selected_id.is_some() {
            self.mark_dirty();
        }
        self.annotations.clear();
        self.selected_id = None;
        count
    }

    /// Get an annotation by ID.
    pub fn get(&self, id: AnnotationId) -> Option<&Annotation> {
        self.annotations.iter().find(|a| a.id == id)
    }

    /// Annotations in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Annotation> {
        self.annotations.iter()
    }

    pub fn len(&self) -> usize {
        self.annotations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
    }

    /// Reverse lookup from a drawable to its owning annotation.
    pub fn find_by_drawable(&self, drawable: DrawableId) -> Option<AnnotationId> {
        self.annotations
            .iter()
            .find(|a| a.drawable_id() == drawable)
            .map(|a| a.id)
    }

    /// Topmost annotation whose shape contains `point` (drawing space).
    pub fn hit_test(&self, point: Point) -> Option<AnnotationId> {
        self.annotations
            .iter()
            .rev()
            .find(|a| a.drawable.contains_point(point))
            .map(|a| a.id)
    }

    /// Select an annotation, or clear the selection with None.
    ///
    /// Unknown IDs clear the selection.
    pub fn select(&mut self, id: Option<AnnotationId>) {
        let id = id.filter(|id| self.get(*id).is_some());
        if self.selected_id != id {
            self.selected_id = id;
            self.mark_dirty();
        }
    }

    /// Get the selected annotation ID.
    pub fn selected(&self) -> Option<AnnotationId> {
        self.selected_id
    }

    /// Snapshot of all annotations for download.
    pub fn export(&self, title: Option<&str>, millis: u64) -> AnnotationExport {
        AnnotationExport::new(title, &self.annotations, millis)
    }
}
