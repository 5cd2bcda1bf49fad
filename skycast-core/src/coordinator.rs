use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::watch;
use tracing::{debug, warn};

use crate::error::{FetchError, classify};
use crate::fetcher::ForecastFetcher;
use crate::model::{LocationQuery, ResolvedLocation, Status, Unit, UnitModel, ViewState};
use crate::provider::DevicePosition;
use crate::resolver::LocationResolver;

/// Orchestrates fetch triggers and owns the single authoritative [`ViewState`].
///
/// Triggers may overlap. Every fetch-issuing trigger takes a token from a
/// monotonically increasing counter, and a result (success or failure alike)
/// is committed only while its token is still the newest issued. Superseded
/// results are dropped silently on arrival; nothing is cancelled mid-flight.
#[derive(Debug)]
pub struct FetchCoordinator {
    resolver: LocationResolver,
    fetcher: ForecastFetcher,
    device: Arc<dyn DevicePosition>,
    unit: Mutex<UnitModel>,
    newest: AtomicU64,
    state: watch::Sender<ViewState>,
    keep_snapshot_on_unit_error: bool,
}

impl FetchCoordinator {
    pub fn new(
        resolver: LocationResolver,
        fetcher: ForecastFetcher,
        device: Arc<dyn DevicePosition>,
    ) -> Self {
        let (state, _) = watch::channel(ViewState::default());

        Self {
            resolver,
            fetcher,
            device,
            unit: Mutex::new(UnitModel::default()),
            newest: AtomicU64::new(0),
            state,
            keep_snapshot_on_unit_error: false,
        }
    }

    /// Keep the displayed snapshot when a unit-toggle re-fetch fails, rather
    /// than clearing it like any other error.
    pub fn keep_snapshot_on_unit_error(mut self, keep: bool) -> Self {
        self.keep_snapshot_on_unit_error = keep;
        self
    }

    /// Read-only subscription to the view state.
    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.state.subscribe()
    }

    /// The view state as of now.
    pub fn current(&self) -> ViewState {
        self.state.borrow().clone()
    }

    /// Manual search trigger.
    pub async fn search(&self, name: &str) {
        let unit = self.active_unit();
        let token = self.issue();
        debug!("trigger {token}: search '{name}'");
        self.commit(token, |state| state.status = Status::Loading);

        match self
            .resolver
            .resolve(LocationQuery::ByName(name.to_owned()))
            .await
        {
            Ok(location) => self.fetch_and_commit(token, location, unit, true).await,
            // A failed search must not keep showing the previous place.
            Err(error) => self.fail(token, &error, true),
        }
    }

    /// Geolocation trigger: fired once at startup and again on the explicit
    /// "use my location" action.
    pub async fn use_my_location(&self) {
        let unit = self.active_unit();
        let token = self.issue();
        debug!("trigger {token}: device location");
        self.commit(token, |state| state.status = Status::Loading);

        let (latitude, longitude) = match self.device.current_position().await {
            Ok(position) => position,
            // Denied or unsupported: error out without touching the fetcher.
            Err(error) => return self.fail(token, &error, true),
        };

        match self
            .resolver
            .resolve(LocationQuery::ByCoordinates {
                latitude,
                longitude,
            })
            .await
        {
            Ok(location) => self.fetch_and_commit(token, location, unit, true).await,
            Err(error) => self.fail(token, &error, true),
        }
    }

    /// Unit toggle trigger. Re-fetches the currently displayed location in
    /// the new unit; with nothing resolved yet it only flips the unit.
    pub async fn toggle_unit(&self) {
        let new_unit = self.unit.lock().expect("unit model lock poisoned").toggle();
        let location = self.state.borrow().location.clone();

        let Some(location) = location else {
            self.state.send_modify(|state| state.unit = new_unit);
            return;
        };

        let token = self.issue();
        debug!("trigger {token}: unit toggle to {new_unit}");
        // The displayed snapshot stays up while the re-fetch is in flight.
        self.commit(token, |state| {
            state.unit = new_unit;
            state.status = Status::Loading;
        });

        self.fetch_and_commit(token, location, new_unit, !self.keep_snapshot_on_unit_error)
            .await;
    }

    fn active_unit(&self) -> Unit {
        self.unit.lock().expect("unit model lock poisoned").get()
    }

    fn issue(&self) -> u64 {
        self.newest.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Commit a state mutation if `token` is still the newest issued trigger.
    /// The check and the mutation happen under the channel's internal lock,
    /// so a commit can never interleave with a newer trigger's issue.
    fn commit(&self, token: u64, apply: impl FnOnce(&mut ViewState)) -> bool {
        let committed = self.state.send_if_modified(|state| {
            if token != self.newest.load(Ordering::SeqCst) {
                return false;
            }
            apply(state);
            true
        });

        if !committed {
            debug!("trigger {token} superseded; result dropped");
        }
        committed
    }

    fn fail(&self, token: u64, error: &FetchError, clear: bool) {
        let kind = classify(error);
        warn!("trigger {token} failed: {error} ({kind:?})");

        self.commit(token, |state| {
            if clear {
                state.location = None;
                state.snapshot = None;
            }
            state.status = Status::Errored(kind);
        });
    }

    async fn fetch_and_commit(
        &self,
        token: u64,
        location: ResolvedLocation,
        unit: Unit,
        clear_on_error: bool,
    ) {
        match self.fetcher.fetch(&location, unit).await {
            Ok(snapshot) => {
                self.commit(token, move |state| {
                    *state = ViewState {
                        location: Some(location),
                        snapshot: Some(snapshot),
                        unit,
                        status: Status::Ready,
                    };
                });
            }
            Err(error) => self.fail(token, &error, clear_on_error),
        }
    }
}
