//! Per-process dashboard session.
//!
//! A `Session` owns the table source for the lifetime of the process and
//! renders one view per call, loading only the tables that view needs.
//! Loaded tables may be reused for `cache_ttl`; with the default of zero
//! every render reads fresh data.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::store::{Dataset, StoreError, TableSource};
use crate::table::Table;
use crate::views::{
    ViewError, ViewKind, ViewPage, ViewParams, correlation, cumulative, monthly, sector,
    volatility,
};

struct CachedTable {
    table: Arc<Table>,
    loaded_at: Instant,
}

/// Owns a [`TableSource`] and renders views from it.
pub struct Session<S: TableSource> {
    source: S,
    cache: HashMap<Dataset, CachedTable>,
    cache_ttl: Duration,
}

impl<S: TableSource> Session<S> {
    /// Creates a session over an already-connected source.
    pub fn new(source: S) -> Self {
        Self {
            source,
            cache: HashMap::new(),
            cache_ttl: Duration::ZERO,
        }
    }

    /// Reuse loaded tables for `ttl`. Zero disables caching.
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Drops every cached table.
    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    fn load(&mut self, dataset: &Dataset) -> Result<Arc<Table>, StoreError> {
        if !self.cache_ttl.is_zero()
            && let Some(cached) = self.cache.get(dataset)
            && cached.loaded_at.elapsed() < self.cache_ttl
        {
            debug!(%dataset, "table cache hit");
            return Ok(Arc::clone(&cached.table));
        }

        let table = Arc::new(self.source.load(dataset)?);
        debug!(%dataset, rows = table.len(), "table loaded");
        if !self.cache_ttl.is_zero() {
            self.cache.insert(
                dataset.clone(),
                CachedTable {
                    table: Arc::clone(&table),
                    loaded_at: Instant::now(),
                },
            );
        }
        Ok(table)
    }

    /// Renders the view named by `view` (key or sidebar label).
    ///
    /// Returns `Ok(None)` for an unrecognized view; nothing is loaded.
    pub fn render(
        &mut self,
        view: &str,
        params: &ViewParams,
    ) -> Result<Option<ViewPage>, ViewError> {
        match ViewKind::parse(view) {
            Some(kind) => self.render_kind(kind, params).map(Some),
            None => Ok(None),
        }
    }

    /// Renders one view, loading only its tables.
    pub fn render_kind(
        &mut self,
        kind: ViewKind,
        params: &ViewParams,
    ) -> Result<ViewPage, ViewError> {
        match kind {
            ViewKind::Volatility => {
                let table = self.load(&Dataset::Volatility)?;
                volatility::render(&table)
            }
            ViewKind::CumulativeReturn => {
                let index = self.load(&Dataset::CumulativeIndex)?;
                let selection = cumulative::select(&index, params)?;
                let mut series = Vec::with_capacity(selection.tickers.len());
                for ticker in &selection.tickers {
                    let table = self.load(&Dataset::cumulative_series(ticker)?)?;
                    series.push((ticker.clone(), table));
                }
                cumulative::render(&selection, &series)
            }
            ViewKind::SectorReturn => {
                let sectors = self.load(&Dataset::SectorPerformance)?;
                let stocks = self.load(&Dataset::StockYearlyReturns)?;
                sector::render(&sectors, &stocks, params)
            }
            ViewKind::StockCorrelation => {
                let table = self.load(&Dataset::CorrelationMatrix)?;
                correlation::render(&table, params)
            }
            ViewKind::MonthlyMovers => {
                let all = self.load(&Dataset::MonthlyReturns)?;
                let gainers = self.load(&Dataset::MonthlyTopGainers)?;
                let losers = self.load(&Dataset::MonthlyTopLosers)?;
                monthly::render(&all, &gainers, &losers, params)
            }
        }
    }
}
