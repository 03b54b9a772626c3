//! Editing session: the async shell around the synchronous editor core.
//!
//! DESIGN
//! ======
//! `EngineCore` owns all scene state and never awaits. The session adds what
//! needs I/O: asset fetch and decode, the placement-hint round-trip, and
//! background removal. It also publishes a `SceneSnapshot` on a watch
//! channel after every mutating action.
//!
//! Asset insertion is de-duplicated per asset reference. A ticket is taken
//! before the first await and released on completion or failure, so a second
//! request for the same reference while one is in flight is refused. During
//! `insert_asset` the ticket lives in a `PlacementGuard`, so a dropped
//! (cancelled or timed-out) insertion releases it too.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use canvas::doc::{ElementId, ElementKind, PartialElement, SceneSnapshot};
use canvas::engine::{Action, EngineCore};
use canvas::input::{Interaction, Key};
use canvas::placement::{Placement, PlacementEngine, PlacementHint};
use tokio::sync::watch;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::StudioConfig;
use crate::services::HttpBackend;
use crate::services::assets::{AssetBackend, aspect_ratio, decode_dimensions, to_data_url};
use crate::services::hint::{HintRequest, HintSource};
use crate::services::types::ServiceError;

/// Errors surfaced by session operations.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("placement already in flight for {0}")]
    DuplicatePlacement(String),

    #[error("failed to load asset {reference}: {source}")]
    AssetLoad {
        reference: String,
        #[source]
        source: ServiceError,
    },

    #[error("background removal failed for {id}: {source}")]
    BackgroundRemoval {
        id: ElementId,
        #[source]
        source: ServiceError,
    },

    #[error("element not found: {0}")]
    UnknownElement(ElementId),

    #[error("element {0} is not an image")]
    NotAnImage(ElementId),
}

/// Marker for an asset insertion that has not finished yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacementTicket {
    pub id: Uuid,
    pub asset_reference: String,
}

type TicketMap = HashMap<String, PlacementTicket>;
type InFlight = Arc<Mutex<TicketMap>>;

fn lock_in_flight(in_flight: &Mutex<TicketMap>) -> MutexGuard<'_, TicketMap> {
    in_flight.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Remove `ticket` if it is still the current one for its reference.
fn release(in_flight: &Mutex<TicketMap>, ticket: &PlacementTicket) -> bool {
    let mut map = lock_in_flight(in_flight);
    match map.get(&ticket.asset_reference) {
        Some(current) if current.id == ticket.id => {
            map.remove(&ticket.asset_reference);
            true
        }
        _ => false,
    }
}

/// Holds a ticket for the duration of an insertion. Dropping the guard
/// without calling [`PlacementGuard::complete`] abandons the ticket.
struct PlacementGuard {
    in_flight: InFlight,
    ticket: Option<PlacementTicket>,
}

impl PlacementGuard {
    fn new(in_flight: InFlight, ticket: PlacementTicket) -> Self {
        Self { in_flight, ticket: Some(ticket) }
    }

    fn complete(mut self) {
        if let Some(ticket) = self.ticket.take() {
            release(&self.in_flight, &ticket);
        }
    }
}

impl Drop for PlacementGuard {
    fn drop(&mut self) {
        if let Some(ticket) = self.ticket.take() {
            if release(&self.in_flight, &ticket) {
                debug!(ticket = %ticket.id, asset = %ticket.asset_reference, "session: placement abandoned");
            }
        }
    }
}

/// User-visible message raised by a failed operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
}

/// Result of a successful asset insertion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InsertedAsset {
    pub id: ElementId,
    pub placement: Placement,
}

pub struct EditingSession {
    core: EngineCore,
    assets: Arc<dyn AssetBackend>,
    hints: Option<Arc<dyn HintSource>>,
    in_flight: InFlight,
    snapshots: watch::Sender<SceneSnapshot>,
    notices: Vec<Notice>,
}

impl EditingSession {
    /// Session over an existing core. `hints` of `None` skips the hint
    /// round-trip and places with local strategies only.
    #[must_use]
    pub fn new(core: EngineCore, assets: Arc<dyn AssetBackend>, hints: Option<Arc<dyn HintSource>>) -> Self {
        let (snapshots, _) = watch::channel(core.snapshot());
        Self { core, assets, hints, in_flight: InFlight::default(), snapshots, notices: Vec::new() }
    }

    /// Session backed by the HTTP backend described by `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn from_config(config: &StudioConfig) -> Result<Self, ServiceError> {
        let backend = Arc::new(HttpBackend::from_config(config)?);
        let placement = config.placement_seed.map_or_else(PlacementEngine::new, PlacementEngine::with_seed);
        let hints: Option<Arc<dyn HintSource>> =
            (config.placement_hints && backend.base_url().is_some()).then(|| backend.clone() as Arc<dyn HintSource>);
        let mut session = Self::new(EngineCore::with_placement(placement), backend, hints);
        if config.background.is_some() {
            session.load_background(config.background.clone());
        }
        Ok(session)
    }

    // =========================================================================
    // CORE ACCESS
    // =========================================================================

    #[must_use]
    pub fn core(&self) -> &EngineCore {
        &self.core
    }

    #[must_use]
    pub fn snapshot(&self) -> SceneSnapshot {
        self.core.snapshot()
    }

    /// Receiver that always holds the latest published snapshot.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SceneSnapshot> {
        self.snapshots.subscribe()
    }

    /// Run a core operation and publish if it changed the scene.
    pub fn edit(&mut self, op: impl FnOnce(&mut EngineCore) -> Vec<Action>) -> Vec<Action> {
        let actions = op(&mut self.core);
        self.publish_if_mutated(&actions);
        actions
    }

    pub fn dispatch(&mut self, interaction: Interaction) -> Vec<Action> {
        self.edit(|core| core.dispatch(interaction))
    }

    pub fn key_down(&mut self, key: &Key) -> Vec<Action> {
        self.edit(|core| core.on_key_down(key))
    }

    pub fn load_background(&mut self, reference: Option<String>) -> Vec<Action> {
        self.edit(|core| core.load_background(reference))
    }

    fn publish_if_mutated(&self, actions: &[Action]) {
        if actions.iter().any(Action::is_mutation) {
            self.snapshots.send_replace(self.core.snapshot());
        }
    }

    // =========================================================================
    // NOTICES
    // =========================================================================

    #[must_use]
    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    fn notify(&mut self, message: impl Into<String>) {
        let message = message.into();
        warn!(%message, "session: notice");
        self.notices.push(Notice { message });
    }

    // =========================================================================
    // IN-FLIGHT PLACEMENTS
    // =========================================================================

    /// Claim the in-flight slot for `asset_reference`.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::DuplicatePlacement`] if the reference is already in flight.
    pub fn begin_placement(&mut self, asset_reference: &str) -> Result<PlacementTicket, SessionError> {
        let mut map = lock_in_flight(&self.in_flight);
        if map.contains_key(asset_reference) {
            return Err(SessionError::DuplicatePlacement(asset_reference.to_string()));
        }
        let ticket = PlacementTicket { id: Uuid::new_v4(), asset_reference: asset_reference.to_string() };
        map.insert(asset_reference.to_string(), ticket.clone());
        debug!(ticket = %ticket.id, asset = asset_reference, "session: placement started");
        Ok(ticket)
    }

    /// Release a ticket after its element was added. Returns `false` if no
    /// ticket matched.
    pub fn complete_placement(&mut self, ticket: &PlacementTicket) -> bool {
        release(&self.in_flight, ticket)
    }

    /// Release a ticket after a failed insertion. Returns `false` if no
    /// ticket matched.
    pub fn abandon_placement(&mut self, ticket: &PlacementTicket) -> bool {
        let released = release(&self.in_flight, ticket);
        if released {
            debug!(ticket = %ticket.id, asset = %ticket.asset_reference, "session: placement abandoned");
        }
        released
    }

    #[must_use]
    pub fn is_in_flight(&self, asset_reference: &str) -> bool {
        lock_in_flight(&self.in_flight).contains_key(asset_reference)
    }

    // =========================================================================
    // ASSET INSERTION
    // =========================================================================

    /// Fetch an asset, ask for a placement hint, and add it to the scene.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::DuplicatePlacement`] if the reference is
    /// already being inserted, or [`SessionError::AssetLoad`] if the asset
    /// cannot be fetched or decoded. Hint and metadata failures are not
    /// errors; placement falls back to local strategies.
    pub async fn insert_asset(&mut self, asset_reference: &str) -> Result<InsertedAsset, SessionError> {
        let ticket = self.begin_placement(asset_reference)?;
        let guard = PlacementGuard::new(Arc::clone(&self.in_flight), ticket);

        let aspect = match self.load_aspect(asset_reference).await {
            Ok(aspect) => aspect,
            Err(source) => {
                drop(guard);
                warn!(asset = asset_reference, error = %source, "session: asset load failed");
                return Err(SessionError::AssetLoad { reference: asset_reference.to_string(), source });
            }
        };

        let hint = self.request_hint(asset_reference).await;
        let (id, placement, actions) = self.core.insert_image(asset_reference.to_string(), aspect, hint.as_ref());
        self.publish_if_mutated(&actions);
        guard.complete();
        info!(%id, asset = asset_reference, strategy = ?placement.strategy, "session: asset inserted");
        Ok(InsertedAsset { id, placement })
    }

    async fn load_aspect(&self, asset_reference: &str) -> Result<f64, ServiceError> {
        let bytes = self.assets.fetch(asset_reference).await?;
        decode_dimensions(&bytes).map(aspect_ratio)
    }

    async fn request_hint(&self, asset_reference: &str) -> Option<PlacementHint> {
        let hints = self.hints.as_ref()?;
        let metadata = match self.assets.metadata(asset_reference).await {
            Ok(metadata) => Some(metadata),
            Err(e) => {
                debug!(asset = asset_reference, error = %e, "session: metadata unavailable");
                None
            }
        };
        let request = HintRequest::from_scene(&self.core.scene, asset_reference, metadata.as_ref());
        match hints.suggest(&request).await {
            Ok(hint) => Some(hint),
            Err(e) => {
                warn!(asset = asset_reference, error = %e, "session: placement hint unavailable");
                None
            }
        }
    }

    // =========================================================================
    // BACKGROUND REMOVAL
    // =========================================================================

    /// Replace an image's source with a background-removed PNG. Geometry is
    /// left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::UnknownElement`] or [`SessionError::NotAnImage`]
    /// for a bad target, and [`SessionError::BackgroundRemoval`] when the
    /// backend is unavailable or fails. Backend failures also raise a notice.
    pub async fn remove_background(&mut self, id: ElementId) -> Result<Vec<Action>, SessionError> {
        let src = match self.core.element(&id).map(|el| &el.kind) {
            None => return Err(SessionError::UnknownElement(id)),
            Some(ElementKind::Image { src, .. }) => src.clone(),
            Some(_) => return Err(SessionError::NotAnImage(id)),
        };

        if !self.assets.api_configured() {
            let source = ServiceError::NotConfigured;
            self.notify(source.to_string());
            return Err(SessionError::BackgroundRemoval { id, source });
        }

        let processed = match self.fetch_and_remove(&src).await {
            Ok(bytes) => bytes,
            Err(source) => {
                self.notify(format!("Background removal failed: {source}"));
                return Err(SessionError::BackgroundRemoval { id, source });
            }
        };

        let fields = PartialElement { src: Some(to_data_url("image/png", &processed)), ..Default::default() };
        info!(%id, bytes = processed.len(), "session: background removed");
        Ok(self.edit(|core| core.apply(id, fields)))
    }

    async fn fetch_and_remove(&self, src: &str) -> Result<Vec<u8>, ServiceError> {
        let bytes = self.assets.fetch(src).await?;
        self.assets.remove_background(bytes).await
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
