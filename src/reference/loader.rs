//! Reference Table Loading
//!
//! Reads the four WHO 0-to-5-years z-score tables with Polars. The WHO
//! exports use `;` as separator and `,` as decimal mark, and the
//! length/height tables label the age column `c` instead of `Month`.

use super::{Gender, GrowthReferenceRow, GrowthReferenceTable, Metric, ReferenceSeries};
use crate::error::{Result, ScreeningError};
use anyhow::{anyhow, Context};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// CSV dialect of the reference files
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CsvDialect {
    pub separator: char,
    pub decimal_comma: bool,
    /// Canonical age column name
    pub age_column: String,
    /// Alternate headers renamed to `age_column` on load
    pub age_column_aliases: Vec<String>,
}

impl Default for CsvDialect {
    fn default() -> Self {
        Self {
            separator: ';',
            decimal_comma: true,
            age_column: "Month".to_string(),
            age_column_aliases: vec!["c".to_string()],
        }
    }
}

/// Where the four reference files live
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableSources {
    pub data_dir: PathBuf,
    pub height_for_age_boys: String,
    pub height_for_age_girls: String,
    pub weight_for_age_boys: String,
    pub weight_for_age_girls: String,
    pub csv: CsvDialect,
}

impl Default for TableSources {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("dataset"),
            height_for_age_boys: who_file_name(Gender::Male, Metric::HeightForAge),
            height_for_age_girls: who_file_name(Gender::Female, Metric::HeightForAge),
            weight_for_age_boys: who_file_name(Gender::Male, Metric::WeightForAge),
            weight_for_age_girls: who_file_name(Gender::Female, Metric::WeightForAge),
            csv: CsvDialect::default(),
        }
    }
}

impl TableSources {
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Self::default()
        }
    }

    pub fn path_for(&self, gender: Gender, metric: Metric) -> PathBuf {
        let file = match (gender, metric) {
            (Gender::Male, Metric::HeightForAge) => &self.height_for_age_boys,
            (Gender::Female, Metric::HeightForAge) => &self.height_for_age_girls,
            (Gender::Male, Metric::WeightForAge) => &self.weight_for_age_boys,
            (Gender::Female, Metric::WeightForAge) => &self.weight_for_age_girls,
        };
        self.data_dir.join(file)
    }
}

/// File name as published by WHO, e.g. `lhfa_boys_0-to-5-years_zscores.csv`
pub fn who_file_name(gender: Gender, metric: Metric) -> String {
    format!(
        "{}_{}_0-to-5-years_zscores.csv",
        metric.who_prefix(),
        gender.who_group()
    )
}

/// Load all four series; the first failure aborts the load
pub fn load_table(sources: &TableSources) -> Result<GrowthReferenceTable> {
    tracing::info!("Loading WHO reference tables from {:?}", sources.data_dir);

    let mut series = Vec::with_capacity(4);
    for gender in Gender::ALL {
        for metric in Metric::ALL {
            let path = sources.path_for(gender, metric);
            let name = format!("{}_{}", metric.who_prefix(), gender.who_group());
            let rows = read_rows(&path, &sources.csv)
                .map_err(|e| ScreeningError::data_unavailable(name.as_str(), e))?;
            tracing::info!("  {}: {} rows", name, rows.len());
            series.push(((gender, metric), ReferenceSeries::new(&name, rows)?));
        }
    }

    GrowthReferenceTable::from_series(series)
}

/// Parse one reference file into rows (not yet validated for coverage)
pub fn read_rows(path: &Path, dialect: &CsvDialect) -> anyhow::Result<Vec<GrowthReferenceRow>> {
    let separator = u8::try_from(dialect.separator)
        .map_err(|_| anyhow!("Separator {:?} is not a single-byte character", dialect.separator))?;

    let parse_options = CsvParseOptions::default()
        .with_separator(separator)
        .with_decimal_comma(dialect.decimal_comma);

    let mut df = CsvReadOptions::default()
        .with_has_header(true)
        .with_parse_options(parse_options)
        .try_into_reader_with_file_path(Some(path.into()))
        .with_context(|| format!("Failed to create CSV reader: {}", path.display()))?
        .finish()
        .with_context(|| format!("Failed to parse reference CSV: {}", path.display()))?;

    normalize_age_column(&mut df, dialect)?;
    rows_from_frame(&df, &dialect.age_column)
}

/// Rename a known alternate age header to the canonical name
pub fn normalize_age_column(df: &mut DataFrame, dialect: &CsvDialect) -> anyhow::Result<()> {
    let names: Vec<String> = df
        .get_column_names()
        .into_iter()
        .map(|s| s.to_string())
        .collect();

    if names.iter().any(|n| n == &dialect.age_column) {
        return Ok(());
    }

    let alias = dialect
        .age_column_aliases
        .iter()
        .find(|alias| names.iter().any(|n| n == *alias))
        .ok_or_else(|| {
            anyhow!(
                "No age column '{}' (or aliases {:?}). Available columns: {:?}",
                dialect.age_column,
                dialect.age_column_aliases,
                names
            )
        })?;

    df.rename(alias, dialect.age_column.as_str().into())
        .with_context(|| format!("Failed to rename '{}' to '{}'", alias, dialect.age_column))?;
    Ok(())
}

/// Extract (age, L, M, S) rows from a frame with canonical column names
pub fn rows_from_frame(df: &DataFrame, age_column: &str) -> anyhow::Result<Vec<GrowthReferenceRow>> {
    let ages = float_column(df, age_column)?;
    let l_col = float_column(df, "L")?;
    let m_col = float_column(df, "M")?;
    let s_col = float_column(df, "S")?;

    let mut rows = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        let (Some(age), Some(l), Some(m), Some(s)) = (ages[idx], l_col[idx], m_col[idx], s_col[idx]) else {
            return Err(anyhow!("Row {} has an empty age/L/M/S cell", idx + 1));
        };
        if age < 0.0 || age.fract() != 0.0 {
            return Err(anyhow!("Row {}: age {} is not a whole month", idx + 1, age));
        }
        rows.push(GrowthReferenceRow::new(age as u32, l, m, s));
    }

    Ok(rows)
}

fn float_column(df: &DataFrame, name: &str) -> anyhow::Result<Vec<Option<f64>>> {
    let column = df
        .column(name)
        .with_context(|| format!("Column '{}' not found", name))?
        .cast(&DataType::Float64)
        .with_context(|| format!("Column '{}' is not numeric", name))?;

    let values = column
        .f64()
        .with_context(|| format!("Column '{}' is not float type", name))?
        .into_iter()
        .collect();

    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_who_file_names() {
        assert_eq!(
            who_file_name(Gender::Male, Metric::HeightForAge),
            "lhfa_boys_0-to-5-years_zscores.csv"
        );
        assert_eq!(
            who_file_name(Gender::Female, Metric::WeightForAge),
            "wfa_girls_0-to-5-years_zscores.csv"
        );
    }

    #[test]
    fn test_normalize_age_column_alias() {
        let mut df = df!(
            "c" => &[0.0, 1.0],
            "L" => &[1.0, 1.0],
            "M" => &[49.9, 54.7],
            "S" => &[0.038, 0.036],
        )
        .unwrap();

        normalize_age_column(&mut df, &CsvDialect::default()).unwrap();
        let rows = rows_from_frame(&df, "Month").unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].age_months, 1);
        assert_eq!(rows[1].lms.m, 54.7);
    }

    #[test]
    fn test_missing_age_column_is_error() {
        let mut df = df!(
            "Age" => &[0.0],
            "L" => &[1.0],
            "M" => &[49.9],
            "S" => &[0.038],
        )
        .unwrap();

        assert!(normalize_age_column(&mut df, &CsvDialect::default()).is_err());
    }

    #[test]
    fn test_fractional_age_row_is_error() {
        let df = df!(
            "Month" => &[0.5],
            "L" => &[1.0],
            "M" => &[49.9],
            "S" => &[0.038],
        )
        .unwrap();

        assert!(rows_from_frame(&df, "Month").is_err());
    }

    #[test]
    fn test_missing_file_is_data_unavailable() {
        let sources = TableSources::with_data_dir("/nonexistent/who");
        let err = load_table(&sources).unwrap_err();
        assert!(matches!(err, ScreeningError::DataUnavailable { .. }));
    }
}
