//! Output rows of the weather enrichment and the column naming scheme.

/// Name of the column holding `variable` observed `days_prior` days before the event.
pub fn value_column(variable: &str, days_prior: usize) -> String {
    format!("{variable}_{days_prior}_days_prior")
}

/// Name of the day-over-day change column for `variable` at `days_prior`.
pub fn delta_column(variable: &str, days_prior: usize) -> String {
    format!("{}_delta", value_column(variable, days_prior))
}

/// Whether a delta column exists at offset `n` of a `days_prior`-day window.
///
/// The delta at `n` is `value(n) - value(n + 1)`, the change from the previous
/// day. The event day (`n == 0`) carries no delta, and neither does the
/// earliest day of the window, which has no previous day inside the window.
pub(crate) fn has_delta(n: usize, days_prior: usize) -> bool {
    n > 0 && n + 1 < days_prior
}

/// All generated column names, in output order.
///
/// For every variable the offsets run from the earliest day (`days_prior - 1`)
/// down to the event day (`0`), each value column followed by its delta column
/// when `include_deltas` is set.
///
/// # Examples
///
/// ```
/// use stranding_context::feature_columns;
///
/// let columns = feature_columns(&["precipitation_sum".to_string()], 3, true);
/// assert_eq!(
///     columns,
///     [
///         "precipitation_sum_2_days_prior",
///         "precipitation_sum_1_days_prior",
///         "precipitation_sum_1_days_prior_delta",
///         "precipitation_sum_0_days_prior",
///     ]
/// );
/// ```
pub fn feature_columns(variables: &[String], days_prior: usize, include_deltas: bool) -> Vec<String> {
    let mut columns = Vec::new();
    for variable in variables {
        for n in (0..days_prior).rev() {
            columns.push(value_column(variable, n));
            if include_deltas && has_delta(n, days_prior) {
                columns.push(delta_column(variable, n));
            }
        }
    }
    columns
}

/// Weather features of one stranding record.
///
/// Values are stored in [`feature_columns`] order. `None` marks a value that
/// was missing from the API payload (or a delta with a missing operand).
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRow {
    record_id: usize,
    values: Vec<(String, Option<f64>)>,
}

impl FeatureRow {
    pub fn new(record_id: usize, values: Vec<(String, Option<f64>)>) -> Self {
        Self { record_id, values }
    }

    /// A row where every column in `columns` is missing.
    pub fn missing(record_id: usize, columns: &[String]) -> Self {
        Self::new(
            record_id,
            columns.iter().map(|c| (c.clone(), None)).collect(),
        )
    }

    /// Identifier of the [`crate::StrandingRecord`] this row belongs to.
    pub fn record_id(&self) -> usize {
        self.record_id
    }

    /// Looks up a column. The outer `Option` tells whether the column exists,
    /// the inner one whether it holds a value.
    pub fn get(&self, column: &str) -> Option<Option<f64>> {
        self.values
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| *value)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.values.iter().map(|(name, _)| name.as_str())
    }

    pub fn values(&self) -> &[(String, Option<f64>)] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
