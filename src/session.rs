use crate::codec::{self, IdGenerator};
use crate::document::{LoadedDocument, SourceText};
use crate::error::{EncodeError, GridError, LoadError};
use crate::grid::{GridSize, GridState};
use crate::hints::GridHints;
use anyhow::Context;
use std::path::Path;
use tracing::{debug, info, warn};

/// Identifies one load request. Only the most recent ticket may complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded,
    /// A newer load was started after this one; the result was discarded.
    Stale,
}

/// Everything an edit session owns: the grid and, once loaded, the document.
/// Callers hold this and pass it through every operation.
#[derive(Debug, Default)]
pub struct Session {
    grid: GridState,
    document: Option<LoadedDocument>,
    load_generation: u64,
}

impl Session {
    pub fn new(active_size: GridSize) -> Self {
        Self {
            grid: GridState::new(active_size),
            ..Default::default()
        }
    }

    pub fn grid(&self) -> &GridState {
        &self.grid
    }

    pub fn document(&self) -> Option<&LoadedDocument> {
        self.document.as_ref()
    }

    pub fn is_dirty(&self) -> bool {
        self.document.as_ref().is_some_and(|d| d.dirty)
    }

    pub fn hints(&self) -> GridHints {
        GridHints::compute(&self.grid)
    }

    pub fn set_active_size(&mut self, size: GridSize) {
        debug!(%size, "active size changed");
        self.grid.set_active_size(size);
        self.mark_dirty();
    }

    pub fn toggle_cell(&mut self, col: usize, row: usize) -> Result<bool, GridError> {
        let value = self.grid.toggle(col, row)?;
        self.mark_dirty();
        Ok(value)
    }

    pub fn clear_grid(&mut self) {
        self.grid.clear();
        self.mark_dirty();
    }

    fn mark_dirty(&mut self) {
        if let Some(doc) = self.document.as_mut() {
            doc.mark_dirty();
        }
    }

    /// Start a load. Any load started earlier becomes stale.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.load_generation += 1;
        LoadTicket(self.load_generation)
    }

    /// Finish a load started with `ticket`.
    ///
    /// On success the document and a freshly decoded grid (at the current
    /// active size) replace the previous ones. On failure, or for a stale
    /// ticket, the session is left untouched.
    pub fn complete_load(
        &mut self,
        ticket: LoadTicket,
        read: Result<SourceText, LoadError>,
    ) -> Result<LoadOutcome, LoadError> {
        if ticket.0 != self.load_generation {
            debug!(ticket = ticket.0, current = self.load_generation, "discarding stale load");
            return Ok(LoadOutcome::Stale);
        }

        let document = LoadedDocument::parse(read?)?;
        let grid = codec::decode(&document.root, self.grid.active_size())?;
        info!(
            path = ?document.source_path,
            active = grid.active_count(),
            "loaded resource"
        );
        self.grid = grid;
        self.document = Some(document);
        Ok(LoadOutcome::Loaded)
    }

    /// Synchronous load, for callers without a background reader.
    pub fn load_path(&mut self, path: &Path) -> Result<LoadOutcome, LoadError> {
        let ticket = self.begin_load();
        self.complete_load(ticket, SourceText::read(path))
    }

    /// Write the grid into the loaded document.
    pub fn encode(&mut self) -> Result<(), EncodeError> {
        let document = self.document.as_mut().ok_or(EncodeError::NoDocumentLoaded)?;
        let mut ids = IdGenerator::for_document(&document.root);
        codec::encode(&mut document.root, &self.grid, &mut ids)?;
        Ok(())
    }

    /// Encode and return the serialized document.
    pub fn save_bytes(&mut self) -> Result<Vec<u8>, EncodeError> {
        self.encode()?;
        let document = self.document.as_ref().ok_or(EncodeError::NoDocumentLoaded)?;
        Ok(document.to_bytes())
    }

    pub fn save_to_path(&mut self, path: &Path) -> anyhow::Result<()> {
        self.encode().context("encoding grid")?;
        let document = self.document.as_mut().ok_or(EncodeError::NoDocumentLoaded)?;
        document.save_to_path(path).inspect_err(|e| {
            warn!("save failed: {e:#}");
        })
    }

    /// Name to pre-fill in a save dialog.
    pub fn suggested_file_name(&self) -> Option<String> {
        self.document.as_ref().map(LoadedDocument::file_name)
    }
}
