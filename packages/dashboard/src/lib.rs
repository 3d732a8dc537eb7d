#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Dashboard state: filter criteria snapshots, sorting and popularity
//! charts over fetched checkouts.
//!
//! A [`Dashboard`] owns the record set of the selected month and recomputes
//! the visible rows from explicit [`FilterCriteria`] and [`SortSpec`]
//! values. Changing the month is the only thing that triggers a network
//! fetch ([`Dashboard::refetch_period`]); every other criteria change only
//! re-filters what is already loaded ([`Dashboard::reapply_filters`]).
//!
//! Each period fetch is tagged with a generation number. A response that
//! arrives after a newer fetch has started is discarded.

pub mod view;

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::NaiveDate;
use library_checkouts_checkout_models::{
    CheckoutRecord, FilterCriteria, Period, PopularityChart, PopularitySeries, SortColumn,
    SortSpec,
};
use library_checkouts_engine::{
    EngineError, filter_records, material_types, popularity_series, sort_records,
};
use library_checkouts_source::{CheckoutGateway, SourceError};

pub use view::{Results, View, VisibleRow};

/// Errors returned by dashboard operations.
#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    /// A record could not be filtered, sorted or aggregated.
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// The requested month is outside the selectable window.
    #[error("{period} is outside the selectable range {earliest} to {latest}")]
    PeriodOutOfRange {
        /// Requested period.
        period: Period,
        /// Earliest selectable period.
        earliest: Period,
        /// Latest selectable period.
        latest: Period,
    },

    /// Filters were reapplied for a period whose rows are not loaded.
    #[error("rows for {period} are not loaded")]
    PeriodNotLoaded {
        /// Requested period.
        period: Period,
    },

    /// The popularity chart for a title could not be fetched. The caller
    /// may retry.
    #[error("popularity of {title:?} is unavailable: {source}")]
    PopularityUnavailable {
        /// Title whose chart was requested.
        title: String,
        /// Underlying transport failure.
        #[source]
        source: SourceError,
    },
}

/// Record set of the selected period.
enum RecordSet {
    Unloaded,
    Loading,
    Loaded(Arc<Vec<CheckoutRecord>>),
}

struct DashboardState {
    criteria: Option<FilterCriteria>,
    generation: u64,
    records: RecordSet,
    sort: SortSpec,
    filtered: Vec<CheckoutRecord>,
    visible: Vec<CheckoutRecord>,
    notice: Option<String>,
    failure: Option<String>,
    popularity: BTreeMap<String, PopularitySeries>,
}

impl DashboardState {
    fn new() -> Self {
        Self {
            criteria: None,
            generation: 0,
            records: RecordSet::Unloaded,
            sort: SortSpec::default(),
            filtered: Vec::new(),
            visible: Vec::new(),
            notice: None,
            failure: None,
            popularity: BTreeMap::new(),
        }
    }

    fn loaded(&self) -> Option<&Arc<Vec<CheckoutRecord>>> {
        match &self.records {
            RecordSet::Loaded(records) => Some(records),
            RecordSet::Unloaded | RecordSet::Loading => None,
        }
    }

    /// Re-filters the loaded set with the current criteria, then re-sorts.
    ///
    /// On failure the rows stay empty and the error is kept for [`Self::view`]
    /// until the next successful refilter.
    fn refilter(&mut self) -> Result<(), EngineError> {
        self.filtered.clear();
        self.visible.clear();
        self.failure = None;
        let sort = self.sort;
        let (Some(criteria), Some(records)) = (&self.criteria, self.loaded()) else {
            return Ok(());
        };
        let outcome = filter_records(records, criteria)
            .and_then(|filtered| Ok((sort_records(&filtered, sort)?, filtered)));

        match outcome {
            Ok((visible, filtered)) => {
                self.filtered = filtered;
                self.visible = visible;
                Ok(())
            }
            Err(e) => {
                self.failure = Some(format!("Could not display checkouts: {e}"));
                Err(e)
            }
        }
    }

    fn view(&self) -> View {
        let Some(criteria) = &self.criteria else {
            return View::AwaitingPeriod;
        };
        match &self.records {
            RecordSet::Unloaded => View::AwaitingPeriod,
            RecordSet::Loading => View::Loading {
                period: criteria.period,
            },
            RecordSet::Loaded(records) => View::Ready(Results {
                criteria: criteria.clone(),
                sort: self.sort,
                rows: self
                    .visible
                    .iter()
                    .cloned()
                    .enumerate()
                    .map(|(index, record)| VisibleRow::new(index, record))
                    .collect(),
                loaded: records.len(),
                notice: self.failure.clone().or_else(|| self.notice.clone()),
            }),
        }
    }
}

type Clock = Box<dyn Fn() -> NaiveDate + Send + Sync>;

/// Interactive state of the checkouts dashboard.
pub struct Dashboard {
    gateway: Arc<dyn CheckoutGateway>,
    state: Mutex<DashboardState>,
    today: Clock,
}

impl Dashboard {
    /// Creates a dashboard with no period selected.
    #[must_use]
    pub fn new(gateway: Arc<dyn CheckoutGateway>) -> Self {
        Self {
            gateway,
            state: Mutex::new(DashboardState::new()),
            today: Box::new(|| chrono::Local::now().date_naive()),
        }
    }

    /// Replaces the clock used to compute the selectable period window.
    #[must_use]
    pub fn with_clock(self, today: impl Fn() -> NaiveDate + Send + Sync + 'static) -> Self {
        Self {
            today: Box::new(today),
            ..self
        }
    }

    fn lock(&self) -> MutexGuard<'_, DashboardState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Applies a new criteria snapshot.
    ///
    /// Fetches the month's rows if its period differs from the current one,
    /// otherwise only re-filters the rows already loaded.
    ///
    /// # Errors
    ///
    /// * [`DashboardError::PeriodOutOfRange`] if the period cannot be
    ///   selected today. Nothing is fetched.
    /// * [`DashboardError::Engine`] if a loaded record is invalid.
    pub async fn update(&self, criteria: FilterCriteria) -> Result<View, DashboardError> {
        let today = (self.today)();
        if !criteria.period.is_selectable(today) {
            return Err(DashboardError::PeriodOutOfRange {
                period: criteria.period,
                earliest: Period::EARLIEST,
                latest: Period::latest_selectable(today),
            });
        }

        let period_changed = {
            let state = self.lock();
            state.criteria.as_ref().map(|c| c.period) != Some(criteria.period)
        };

        if period_changed {
            self.refetch_period(criteria).await
        } else {
            self.reapply_filters(criteria)
        }
    }

    /// Discards the current record set and fetches the rows of
    /// `criteria.period`.
    ///
    /// The material type constraint is reset to "all", since the available
    /// types depend on the new rows. A transport failure is logged and
    /// leaves an empty record set with a notice. If another fetch starts
    /// before this one completes, this one's rows are dropped.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::Engine`] if a fetched record is invalid.
    pub async fn refetch_period(&self, criteria: FilterCriteria) -> Result<View, DashboardError> {
        let period = criteria.period;
        let generation = {
            let mut state = self.lock();
            state.generation += 1;
            state.criteria = Some(criteria.with_all_types());
            state.records = RecordSet::Loading;
            state.filtered.clear();
            state.visible.clear();
            state.notice = None;
            state.failure = None;
            state.popularity.clear();
            state.generation
        };

        let (records, notice) = match self.gateway.fetch_by_period(period).await {
            Ok(records) => (records, None),
            Err(e) => {
                log::error!("Failed to fetch checkouts for {period}: {e}");
                (Vec::new(), Some(format!("Could not load checkouts for {period}: {e}")))
            }
        };

        let mut state = self.lock();
        if state.generation != generation {
            log::warn!(
                "Discarding {} stale rows for {period} (request {generation}, current {})",
                records.len(),
                state.generation
            );
            return Ok(state.view());
        }

        log::info!("Loaded {} rows for {period}", records.len());
        state.records = RecordSet::Loaded(Arc::new(records));
        state.notice = notice;
        state.refilter()?;
        Ok(state.view())
    }

    /// Re-filters the rows already loaded for `criteria.period`.
    ///
    /// While that period is still being fetched, the criteria are stored
    /// and applied once the rows arrive.
    ///
    /// # Errors
    ///
    /// * [`DashboardError::PeriodNotLoaded`] if `criteria.period` is not the
    ///   current period.
    /// * [`DashboardError::Engine`] if a loaded record is invalid.
    pub fn reapply_filters(&self, criteria: FilterCriteria) -> Result<View, DashboardError> {
        let mut state = self.lock();
        if state.criteria.as_ref().map(|c| c.period) != Some(criteria.period) {
            return Err(DashboardError::PeriodNotLoaded {
                period: criteria.period,
            });
        }

        state.criteria = Some(criteria);
        state.refilter()?;
        Ok(state.view())
    }

    /// Selects a sort column: the same column toggles its direction, a new
    /// column sorts descending.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::Engine`] if a visible record has a
    /// non-numeric checkout count. The previous sort and row order are kept.
    pub fn select_sort(&self, column: SortColumn) -> Result<View, DashboardError> {
        let mut state = self.lock();
        let next = state.sort.select(column);
        let visible = sort_records(&state.filtered, next)?;
        state.sort = next;
        state.visible = visible;
        Ok(state.view())
    }

    /// The current view.
    #[must_use]
    pub fn view(&self) -> View {
        self.lock().view()
    }

    /// Distinct material types of the loaded rows.
    #[must_use]
    pub fn material_types(&self) -> Vec<String> {
        self.lock()
            .loaded()
            .map(|records| material_types(records))
            .unwrap_or_default()
    }

    /// Popularity chart of `title`, with `highlight` marked.
    ///
    /// The series is fetched once per title and kept until the next period
    /// change. A failed fetch is not cached.
    ///
    /// # Errors
    ///
    /// * [`DashboardError::PopularityUnavailable`] if the title's rows
    ///   cannot be fetched.
    /// * [`DashboardError::Engine`] if a fetched record is invalid.
    pub async fn popularity(
        &self,
        title: &str,
        highlight: Option<Period>,
    ) -> Result<PopularityChart, DashboardError> {
        let generation = {
            let state = self.lock();
            if let Some(series) = state.popularity.get(title) {
                log::debug!("Popularity of {title:?} served from cache");
                return Ok(PopularityChart {
                    series: series.clone(),
                    highlight,
                });
            }
            state.generation
        };

        let records = self.gateway.fetch_by_title(title).await.map_err(|e| {
            log::error!("Could not build chart for {title:?}: {e}");
            DashboardError::PopularityUnavailable {
                title: title.to_string(),
                source: e,
            }
        })?;
        let series = popularity_series(title, &records)?;

        let mut state = self.lock();
        if state.generation == generation {
            state.popularity.insert(title.to_string(), series.clone());
        }

        Ok(PopularityChart { series, highlight })
    }
}
