//! In-memory index of the reference tables.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::sync::OnceLock;

use super::cohort::{CohortKey, Sex, TableId};
use super::loader::{read_parameter_table, read_quantile_table};
use super::rows::{ParameterRow, ReferenceRow};
use crate::config::DataConfig;
use crate::error::{AnthroError, Result};

static GLOBAL: OnceLock<ReferenceStore> = OnceLock::new();

/// Immutable index of the height, weight and height-adjusted-weight tables,
/// keyed by [`CohortKey`].
///
/// Built once and shared read-only; every lookup is a hash probe. Safe to use
/// from many threads at once.
#[derive(Debug, Clone)]
pub struct ReferenceStore {
    height: HashMap<CohortKey, ReferenceRow>,
    weight: HashMap<CohortKey, ReferenceRow>,
    params: HashMap<CohortKey, ParameterRow>,
}

impl ReferenceStore {
    /// Loads the three tables from the files named by `config`.
    pub fn load(config: &DataConfig) -> Result<Self> {
        let open = |path: &Path| -> Result<BufReader<File>> {
            tracing::debug!(path = %path.display(), "opening reference table");
            Ok(BufReader::new(File::open(path)?))
        };
        let store = Self::from_readers(
            open(config.height_path().as_path())?,
            open(config.weight_path().as_path())?,
            open(config.params_path().as_path())?,
        )?;
        tracing::info!(
            data_dir = %config.data_dir.display(),
            height_cohorts = store.height.len(),
            weight_cohorts = store.weight.len(),
            haw_cohorts = store.params.len(),
            "loaded reference tables"
        );
        Ok(store)
    }

    /// Builds a store from any CSV sources.
    pub fn from_readers<H: Read, W: Read, P: Read>(height: H, weight: W, params: P) -> Result<Self> {
        Ok(Self {
            height: read_quantile_table(height, TableId::Height)?,
            weight: read_quantile_table(weight, TableId::Weight)?,
            params: read_parameter_table(params)?,
        })
    }

    /// Process-wide store, loaded from [`DataConfig::from_env`] on first use.
    ///
    /// A failed load is not cached; the next call retries.
    pub fn global() -> Result<&'static ReferenceStore> {
        if let Some(store) = GLOBAL.get() {
            return Ok(store);
        }
        let store = Self::load(&DataConfig::from_env())?;
        Ok(GLOBAL.get_or_init(|| store))
    }

    fn quantile_table(&self, table: TableId) -> Option<&HashMap<CohortKey, ReferenceRow>> {
        match table {
            TableId::Height => Some(&self.height),
            TableId::Weight => Some(&self.weight),
            TableId::HawParams => None,
        }
    }

    /// Reference row of a height or weight cohort.
    ///
    /// # Errors
    ///
    /// [`AnthroError::CohortNotFound`] if the cohort is absent, and
    /// [`AnthroError::InvalidInput`] if `table` is the parameter table.
    pub fn reference_row(&self, table: TableId, sex: Sex, age: u32) -> Result<&ReferenceRow> {
        let rows = self.quantile_table(table).ok_or_else(|| {
            AnthroError::InvalidInput(format!("{table} table has no quantile rows"))
        })?;
        rows.get(&CohortKey::new(sex, age))
            .ok_or(AnthroError::CohortNotFound { table, sex, age })
    }

    /// Height row of a cohort (values in meters).
    pub fn height_row(&self, sex: Sex, age: u32) -> Result<&ReferenceRow> {
        self.reference_row(TableId::Height, sex, age)
    }

    /// Weight row of a cohort (values in kilograms).
    pub fn weight_row(&self, sex: Sex, age: u32) -> Result<&ReferenceRow> {
        self.reference_row(TableId::Weight, sex, age)
    }

    /// Height-adjusted-weight coefficients of a cohort, sorted by quantile.
    pub fn parameter_row(&self, sex: Sex, age: u32) -> Result<&ParameterRow> {
        self.params
            .get(&CohortKey::new(sex, age))
            .ok_or(AnthroError::CohortNotFound {
                table: TableId::HawParams,
                sex,
                age,
            })
    }

    /// `(quantile, value)` pairs of a height or weight cohort, for charting.
    /// Height values are returned in centimeters.
    pub fn quantile_values(&self, table: TableId, sex: Sex, age: u32) -> Result<Vec<(f64, f64)>> {
        let row = self.reference_row(table, sex, age)?;
        let scale = if table == TableId::Height { 100.0 } else { 1.0 };
        Ok(row
            .quantile_values()
            .into_iter()
            .map(|(q, v)| (q, v * scale))
            .collect())
    }

    /// Cohorts available in `table`, sorted (females first, then by age).
    pub fn cohorts(&self, table: TableId) -> Vec<CohortKey> {
        let mut keys: Vec<CohortKey> = match table {
            TableId::Height => self.height.keys().copied().collect(),
            TableId::Weight => self.weight.keys().copied().collect(),
            TableId::HawParams => self.params.keys().copied().collect(),
        };
        keys.sort();
        keys
    }
}
