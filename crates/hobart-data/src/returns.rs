//! Returns matrix construction.
//!
//! Turns per-symbol close-price histories into the date-aligned T x N
//! matrix of daily fractional returns the simulation core consumes:
//! per-symbol pct-change, inner join on trading date across all symbols,
//! rows with any missing value dropped.

use crate::error::{DataError, Result};
use crate::yahoo::YahooQuoteProvider;
use chrono::{NaiveDate, Utc};
use ndarray::Array2;
use polars::prelude::*;

/// Days from 0001-01-01 (CE) to the Unix epoch; polars Date columns count
/// days from the epoch.
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// A date-aligned panel of daily fractional returns.
///
/// Rows are trading dates common to every symbol (ascending), columns are
/// assets in the order the symbols were supplied.
#[derive(Debug, Clone)]
pub struct ReturnsPanel {
    symbols: Vec<String>,
    dates: Vec<NaiveDate>,
    returns: Array2<f64>,
}

impl ReturnsPanel {
    /// Build a panel from per-symbol close frames (columns: date, close).
    ///
    /// Each symbol's closes are reduced to daily fractional returns
    /// (`close / close.shift(1) - 1`), then all symbols are inner-joined on
    /// date. When `max_rows` is given and more aligned rows are available,
    /// only the most recent `max_rows` are kept.
    ///
    /// # Errors
    /// * [`DataError::MissingData`] when no symbols are supplied or the
    ///   aligned panel comes out empty
    /// * [`DataError::Polars`] on dataframe failures
    pub fn from_close_frames(
        frames: &[(String, DataFrame)],
        max_rows: Option<usize>,
    ) -> Result<Self> {
        if frames.is_empty() {
            return Err(DataError::MissingData {
                symbol: "panel".to_string(),
                reason: "No symbols supplied".to_string(),
            });
        }

        let mut joined: Option<LazyFrame> = None;
        for (symbol, closes) in frames {
            let lf = closes
                .clone()
                .lazy()
                .sort(["date"], SortMultipleOptions::default())
                .with_column(
                    (col("close") / col("close").shift(lit(1)) - lit(1.0))
                        .alias(symbol.as_str()),
                )
                .filter(col(symbol.as_str()).is_not_null())
                .select(&[col("date"), col(symbol.as_str())]);

            joined = Some(match joined {
                None => lf,
                Some(acc) => acc.join(
                    lf,
                    [col("date")],
                    [col("date")],
                    JoinArgs::new(JoinType::Inner),
                ),
            });
        }

        let df = joined
            .ok_or_else(|| DataError::MissingData {
                symbol: "panel".to_string(),
                reason: "No symbols supplied".to_string(),
            })?
            .sort(["date"], SortMultipleOptions::default())
            .collect()?;

        let df = match max_rows {
            Some(n) if df.height() > n => df.tail(Some(n)),
            _ => df,
        };

        if df.height() == 0 {
            return Err(DataError::MissingData {
                symbol: "panel".to_string(),
                reason: "No trading dates common to all symbols".to_string(),
            });
        }

        let symbols: Vec<String> = frames.iter().map(|(s, _)| s.clone()).collect();
        let dates = extract_dates(&df)?;

        let mut returns = Array2::<f64>::zeros((df.height(), symbols.len()));
        for (j, symbol) in symbols.iter().enumerate() {
            let column = df.column(symbol)?.as_materialized_series().clone();
            let values = column.f64()?;
            for (t, value) in values.into_no_null_iter().enumerate() {
                returns[[t, j]] = value;
            }
        }

        Ok(Self {
            symbols,
            dates,
            returns,
        })
    }

    /// Symbols in column order.
    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    /// Trading dates in row order (ascending).
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// The T x N returns matrix.
    pub const fn returns(&self) -> &Array2<f64> {
        &self.returns
    }

    /// Number of aligned observations T.
    pub fn n_obs(&self) -> usize {
        self.returns.nrows()
    }

    /// Number of assets N.
    pub fn n_assets(&self) -> usize {
        self.returns.ncols()
    }

    /// First and last trading date of the panel.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        match (self.dates.first(), self.dates.last()) {
            (Some(first), Some(last)) => Some((*first, *last)),
            _ => None,
        }
    }
}

/// Fetch close histories for every symbol and build the aligned panel.
///
/// The calendar window is padded to roughly 1.5x the requested number of
/// trading days (weekends and holidays), and the aligned panel is truncated
/// to the most recent `historical_days` rows.
///
/// # Errors
/// Fails on the first symbol with no data (the pipeline aborts rather than
/// simulating a partial universe).
pub async fn fetch_returns(
    provider: &YahooQuoteProvider,
    symbols: &[String],
    historical_days: usize,
) -> Result<ReturnsPanel> {
    let end = Utc::now();
    let calendar_days = (((historical_days as u64) * 3).div_ceil(2) as i64).max(30);
    let start = end - chrono::Duration::days(calendar_days);

    let mut frames = Vec::with_capacity(symbols.len());
    for symbol in symbols {
        let closes = provider.fetch_closes(symbol, start, end).await?;
        frames.push((symbol.clone(), closes));
    }

    ReturnsPanel::from_close_frames(&frames, Some(historical_days))
}

/// Extract the date column as chrono dates.
fn extract_dates(df: &DataFrame) -> Result<Vec<NaiveDate>> {
    let offsets = df
        .column("date")?
        .as_materialized_series()
        .cast(&DataType::Int32)?;
    let offsets = offsets.i32()?;

    let mut dates = Vec::with_capacity(df.height());
    for offset in offsets.into_no_null_iter() {
        let date = NaiveDate::from_num_days_from_ce_opt(offset + UNIX_EPOCH_DAYS_FROM_CE)
            .ok_or_else(|| DataError::TimeConversion(format!("day offset {offset} out of range")))?;
        dates.push(date);
    }
    Ok(dates)
}
