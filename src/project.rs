//! A drawing project: fixed canvas size, the shared brush and ordered layers.

#[cfg(test)]
#[path = "project_test.rs"]
mod project_test;

use std::rc::Rc;

use tracing::{info, warn};

use crate::brush::{Brush, SharedBrush};
use crate::color::Color;
use crate::config::EngineConfig;
use crate::error::{Error, Result};
use crate::geom::Size;
use crate::layer::{DrawingLayer, LayerHandle, LayerId};
use crate::observe::{Observable, SubscriptionId};
use crate::surface::Surface;

/// Layer membership change.
pub enum ProjectEvent<S: Surface> {
    LayerAdded(LayerHandle<S>),
    LayerRemoved(LayerHandle<S>),
}

impl<S: Surface + 'static> ProjectEvent<S> {
    /// The layer the event is about.
    #[must_use]
    pub fn layer(&self) -> &LayerHandle<S> {
        match self {
            Self::LayerAdded(layer) | Self::LayerRemoved(layer) => layer,
        }
    }
}

pub struct Project<S: Surface + 'static> {
    canvas_size: Size,
    config: EngineConfig,
    brush: SharedBrush,
    layers: Vec<LayerHandle<S>>,
    events: Observable<ProjectEvent<S>>,
}

impl<S: Surface + 'static> Project<S> {
    /// Project with the default engine configuration.
    #[must_use]
    pub fn new(canvas_size: Size, brush: SharedBrush) -> Self {
        Self::with_config(canvas_size, brush, EngineConfig::default())
    }

    #[must_use]
    pub fn with_config(canvas_size: Size, brush: SharedBrush, config: EngineConfig) -> Self {
        Self { canvas_size, config, brush, layers: Vec::new(), events: Observable::new() }
    }

    #[must_use]
    pub fn canvas_size(&self) -> Size {
        self.canvas_size
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The brush every layer of this project draws with.
    #[must_use]
    pub fn brush(&self) -> SharedBrush {
        Rc::clone(&self.brush)
    }

    /// Recolor the shared brush for the next stroke.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Reentrant`] if the brush is borrowed by an event in progress.
    pub fn set_brush_color(&self, color: Color) -> Result<()> {
        self.brush.try_borrow_mut().map_err(|_| Error::Reentrant("brush"))?.set_color(color);
        Ok(())
    }

    /// Resize the shared brush for the next stroke. The size is clamped.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Reentrant`] if the brush is borrowed by an event in progress.
    pub fn set_brush_size(&self, size: f64) -> Result<()> {
        self.brush.try_borrow_mut().map_err(|_| Error::Reentrant("brush"))?.set_size(size);
        Ok(())
    }

    /// Layers in stacking order, bottom first.
    #[must_use]
    pub fn layers(&self) -> &[LayerHandle<S>] {
        &self.layers
    }

    #[must_use]
    pub fn layer(&self, id: LayerId) -> Option<&LayerHandle<S>> {
        self.layers.iter().find(|layer| layer.id() == id)
    }

    /// Build a layer for this project on `surface`. It is not added yet.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Surface`] if the surface cannot hold the canvas.
    pub fn create_layer(&self, surface: S) -> Result<LayerHandle<S>> {
        let layer = DrawingLayer::new(surface, self.canvas_size, self.brush(), &self.config)?;
        Ok(LayerHandle::new(layer))
    }

    /// Append `layer` on top and announce it.
    ///
    /// # Errors
    ///
    /// Returns the first subscriber error. The layer stays added.
    pub fn add_layer(&mut self, layer: LayerHandle<S>) -> Result<()> {
        info!(layer = %layer.id(), index = self.layers.len(), "project: layer added");
        self.layers.push(layer.clone());
        self.events.notify(&ProjectEvent::LayerAdded(layer))
    }

    /// Add `layer`, then run `place` for host-side setup (mounting an element,
    /// wiring listeners). If either step fails the layer is removed again and
    /// that first error is returned.
    ///
    /// # Errors
    ///
    /// Returns the subscriber or placement error.
    pub fn add_layer_with<F>(&mut self, layer: LayerHandle<S>, place: F) -> Result<()>
    where
        F: FnOnce(&LayerHandle<S>) -> Result<()>,
    {
        let id = layer.id();
        let Err(e) = self.add_layer(layer.clone()).and_then(|()| place(&layer)) else {
            return Ok(());
        };
        warn!(layer = %id, error = %e, "project: layer setup failed, removing");
        if self.layer(id).is_some() {
            if let Err(undo) = self.remove_layer(id) {
                warn!(layer = %id, error = %undo, "project: rollback failed");
            }
        }
        Err(e)
    }

    /// Remove a layer and announce it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownLayer`] if `id` is not in the project, otherwise
    /// the first subscriber error.
    pub fn remove_layer(&mut self, id: LayerId) -> Result<LayerHandle<S>> {
        let index = self.layers.iter().position(|layer| layer.id() == id).ok_or(Error::UnknownLayer(id))?;
        let layer = self.layers.remove(index);
        info!(layer = %id, "project: layer removed");
        self.events.notify(&ProjectEvent::LayerRemoved(layer.clone()))?;
        Ok(layer)
    }

    /// Publisher of [`ProjectEvent`]s.
    #[must_use]
    pub fn events(&self) -> &Observable<ProjectEvent<S>> {
        &self.events
    }

    pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&ProjectEvent<S>) -> Result<()> + 'static,
    {
        self.events.subscribe(callback)
    }
}
