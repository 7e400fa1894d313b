//! CSV loading for match cards and historical results
//!
//! Files follow the football-data.co.uk layout: `HomeTeam`, `AwayTeam`,
//! average 1X2 odds in `AvgH`, `AvgD`, `AvgA`, and the full-time result
//! in `FTR` ("H", "D", "A").

use polars::prelude::*;
use std::path::Path;
use tracing::{info, warn};

use super::DataError;
use crate::models::{MatchInput, Outcome};

/// A played match with its actual result
#[derive(Debug, Clone)]
pub struct HistoricalMatch {
    pub input: MatchInput,
    pub result: Outcome,
}

fn read_csv(csv_path: &Path) -> Result<DataFrame, DataError> {
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(csv_path.to_path_buf()))?
        .finish()?;
    Ok(df)
}

fn string_column(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>, DataError> {
    let series = df
        .column(name)
        .map_err(|_| DataError::MissingColumn(name.to_string()))?
        .cast(&DataType::String)?;

    let values = series
        .str()?
        .into_iter()
        .map(|v| v.map(|s| s.trim().to_string()))
        .collect();
    Ok(values)
}

fn optional_f64_column(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>, DataError> {
    match df.column(name) {
        Ok(series) => {
            let series = series.cast(&DataType::Float64)?;
            let values = series.f64()?.into_iter().collect();
            Ok(values)
        }
        Err(_) => Ok(vec![None; df.height()]),
    }
}

fn dataframe_to_inputs(df: &DataFrame) -> Result<Vec<MatchInput>, DataError> {
    let home_col = string_column(df, "HomeTeam")?;
    let away_col = string_column(df, "AwayTeam")?;
    let avg_home_col = optional_f64_column(df, "AvgH")?;
    let avg_draw_col = optional_f64_column(df, "AvgD")?;
    let avg_away_col = optional_f64_column(df, "AvgA")?;

    let mut inputs = Vec::with_capacity(df.height());
    for i in 0..df.height() {
        inputs.push(MatchInput {
            home_team: home_col[i].clone().unwrap_or_default(),
            away_team: away_col[i].clone().unwrap_or_default(),
            avg_home: avg_home_col[i],
            avg_draw: avg_draw_col[i],
            avg_away: avg_away_col[i],
        });
    }

    Ok(inputs)
}

/// Load the matches of a coupon from CSV
pub fn load_match_card<P: AsRef<Path>>(csv_path: P) -> Result<Vec<MatchInput>, DataError> {
    let df = read_csv(csv_path.as_ref())?;
    let inputs = dataframe_to_inputs(&df)?;
    info!("Loaded {} matches from {:?}", inputs.len(), csv_path.as_ref());
    Ok(inputs)
}

/// Load played matches with results, in file order
///
/// Rows without a valid `FTR` value are skipped.
pub fn load_history<P: AsRef<Path>>(csv_path: P) -> Result<Vec<HistoricalMatch>, DataError> {
    let df = read_csv(csv_path.as_ref())?;
    let inputs = dataframe_to_inputs(&df)?;
    let results = string_column(&df, "FTR")?;

    let mut history = Vec::with_capacity(inputs.len());
    let mut skipped = 0;
    for (input, ftr) in inputs.into_iter().zip(results) {
        match ftr.as_deref().and_then(Outcome::from_full_time_result) {
            Some(result) => history.push(HistoricalMatch { input, result }),
            None => skipped += 1,
        }
    }

    if skipped > 0 {
        warn!("Skipped {} rows without a full-time result", skipped);
    }
    info!(
        "Loaded {} historical matches from {:?}",
        history.len(),
        csv_path.as_ref()
    );

    Ok(history)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_csv(dir: &tempfile::TempDir, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_match_card() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(
            &dir,
            "card.csv",
            "HomeTeam,AwayTeam,AvgH,AvgD,AvgA\n\
             Arsenal,Chelsea,2.10,3.40,3.60\n\
             Leeds,Everton,,,\n",
        );

        let matches = load_match_card(&path).unwrap();
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].home_team, "Arsenal");
        assert_eq!(matches[0].away_team, "Chelsea");
        assert_eq!(matches[0].avg_home, Some(2.10));
        assert_eq!(matches[0].avg_away, Some(3.60));
        assert_eq!(matches[1].home_team, "Leeds");
        assert!(matches[1].avg_draw.is_none());
    }

    #[test]
    fn test_load_match_card_without_odds_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(&dir, "card.csv", "HomeTeam,AwayTeam\nAIK,Hammarby\n");

        let matches = load_match_card(&path).unwrap();
        assert_eq!(matches.len(), 1);
        assert!(matches[0].avg_home.is_none());
    }

    #[test]
    fn test_missing_team_column() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(&dir, "card.csv", "Home,AwayTeam\nAIK,Hammarby\n");

        let err = load_match_card(&path).unwrap_err();
        assert!(matches!(err, DataError::MissingColumn(ref c) if c == "HomeTeam"));
    }

    #[test]
    fn test_load_history_skips_rows_without_result() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(
            &dir,
            "history.csv",
            "HomeTeam,AwayTeam,FTR,AvgH,AvgD,AvgA\n\
             Arsenal,Chelsea,H,2.10,3.40,3.60\n\
             Leeds,Everton,D,2.50,3.20,2.90\n\
             Fulham,Brentford,,2.30,3.30,3.10\n\
             Wolves,Burnley,A,1.90,3.50,4.20\n",
        );

        let history = load_history(&path).unwrap();
        assert_eq!(history.len(), 3);
        assert_eq!(history[0].result, Outcome::Home);
        assert_eq!(history[1].result, Outcome::Draw);
        assert_eq!(history[2].input.home_team, "Wolves");
        assert_eq!(history[2].result, Outcome::Away);
    }

    #[test]
    fn test_load_history_requires_result_column() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(&dir, "history.csv", "HomeTeam,AwayTeam\nAIK,Hammarby\n");

        assert!(matches!(
            load_history(&path),
            Err(DataError::MissingColumn(ref c)) if c == "FTR"
        ));
    }
}
