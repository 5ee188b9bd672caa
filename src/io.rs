use crate::collision::CollisionSynthesizer;
use crate::document::MapDocument;
use crate::error::{MapError, ValidationWarning};
use crate::grid::TileGrid;
use crate::loader::json_loader::{
    decode_document, decode_document_file, parse_document, validate_document, DecodedDocument,
};
use anyhow::Context;
use macroquad::logging::info;
use std::io;
use std::path::Path;

/// The runtime bundle handed to the game scene: the authoritative document,
/// the dense grid derived from it and the synthesized collision bodies.
#[derive(Debug)]
pub struct Map {
    pub document: MapDocument,
    pub grid: TileGrid,
    pub collision: CollisionSynthesizer,
    pub warnings: Vec<ValidationWarning>,
}

impl Map {
    /// Build the derived state from a document. Pure with respect to the
    /// document; may be re-run any number of times from the same input.
    pub fn from_document(mut document: MapDocument) -> Self {
        let warnings = document.validate();
        Self::from_decoded(DecodedDocument { document, warnings })
    }

    fn from_decoded(decoded: DecodedDocument) -> Self {
        let grid = TileGrid::from_document(&decoded.document);
        let mut collision = CollisionSynthesizer::new();
        collision.rebuild(&grid);
        Map {
            document: decoded.document,
            grid,
            collision,
            warnings: decoded.warnings,
        }
    }

    /// Decode, validate and assemble from raw JSON.
    pub fn load_from_str(json: &str, source: &str) -> Result<Self, MapError> {
        Ok(Self::from_decoded(decode_document(json, source)?))
    }

    /// Load from a local `.json` file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, MapError> {
        let map = Self::from_decoded(decode_document_file(path.as_ref())?);
        info!("loaded map '{}' from {}", map.document.metadata.name, path.as_ref().display());
        Ok(map)
    }

    /// Fetch a map by path or URL through macroquad's file layer (HTTP GET on
    /// wasm, filesystem read on native) and decode it.
    pub async fn load(path_or_url: &str) -> anyhow::Result<Self> {
        if !path_or_url.ends_with(".json") {
            return Err(MapError::UnsupportedFormat(path_or_url.to_owned()).into());
        }
        let txt = macroquad::file::load_string(path_or_url)
            .await
            .with_context(|| format!("Fetching map {path_or_url}"))?;
        let map = Self::load_from_str(&txt, path_or_url)?;
        info!("loaded map '{}' from {}", map.document.metadata.name, path_or_url);
        Ok(map)
    }
}

/// Serialize a document with stable key ordering. Struct-field declaration
/// order is the key order, so identical documents produce identical bytes.
pub fn document_to_json(doc: &MapDocument) -> Result<String, MapError> {
    serde_json::to_string_pretty(doc).map_err(|cause| MapError::MalformedDocument {
        source: "<serialize>".to_owned(),
        cause,
    })
}

/// Save a document to a `.json` file, re-emitting whatever schema version it
/// was loaded with.
pub fn save_document(doc: &MapDocument, path: &Path) -> Result<(), MapError> {
    if path.extension().and_then(|e| e.to_str()) != Some("json") {
        return Err(MapError::UnsupportedFormat(path.display().to_string()));
    }
    let json = document_to_json(doc)?;
    std::fs::write(path, json).map_err(|cause| MapError::SourceUnavailable {
        source: path.display().to_string(),
        cause,
    })?;
    info!("saved map '{}' to {}", doc.metadata.name, path.display());
    Ok(())
}

/// Keep only loadable entries from a collaborator-supplied file listing.
/// Contents are not validated until a file is actually loaded.
pub fn list_json_maps<I, S>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    names
        .into_iter()
        .map(Into::into)
        .filter(|n| n.ends_with(".json"))
        .collect()
}

/// Phases of one load request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Idle,
    Fetching,
    Parsing,
    Validating,
    Ready,
    Rejected,
}

/// Handle identifying one in-flight load request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(u64);

/// Tracks in-flight map loads with last-requested-wins ordering.
///
/// Each `begin` issues a ticket from a monotonically increasing sequence;
/// a completion whose ticket is no longer the newest is discarded, so a slow
/// earlier fetch can never clobber the result of a later one. The loader
/// never owns the live map: completions hand the result back to the caller,
/// and a failed or stale load leaves the previous session state untouched.
pub struct MapLoader {
    state: LoadState,
    next_seq: u64,
    latest: u64,
}

impl MapLoader {
    pub fn new() -> Self {
        MapLoader {
            state: LoadState::Idle,
            next_seq: 0,
            latest: 0,
        }
    }

    pub fn state(&self) -> LoadState {
        self.state
    }

    /// Register a new load request, superseding any still in flight.
    pub fn begin(&mut self) -> LoadTicket {
        self.next_seq += 1;
        self.latest = self.next_seq;
        self.state = LoadState::Fetching;
        LoadTicket(self.next_seq)
    }

    fn is_current(&self, ticket: LoadTicket) -> bool {
        ticket.0 == self.latest
    }

    /// Feed fetched bytes back in. Returns `None` when the ticket was
    /// superseded (the result is discarded); otherwise walks the document
    /// through parse and validation and reports the outcome.
    pub fn finish_fetch(
        &mut self,
        ticket: LoadTicket,
        json: &str,
        source: &str,
    ) -> Option<Result<Map, MapError>> {
        if !self.is_current(ticket) {
            return None;
        }
        self.state = LoadState::Parsing;
        let document = match parse_document(json, source) {
            Ok(doc) => doc,
            Err(e) => {
                self.state = LoadState::Rejected;
                return Some(Err(e));
            }
        };
        self.state = LoadState::Validating;
        let decoded = validate_document(document);
        let map = Map::from_decoded(decoded);
        self.state = LoadState::Ready;
        Some(Ok(map))
    }

    /// Report a fetch failure. Stale tickets are swallowed; a current one
    /// rejects the load with `SourceUnavailable`.
    pub fn fail_fetch(&mut self, ticket: LoadTicket, detail: io::Error) -> Option<MapError> {
        if !self.is_current(ticket) {
            return None;
        }
        self.state = LoadState::Rejected;
        Some(MapError::SourceUnavailable {
            source: "<fetch>".to_owned(),
            cause: detail,
        })
    }
}

impl Default for MapLoader {
    fn default() -> Self {
        Self::new()
    }
}
