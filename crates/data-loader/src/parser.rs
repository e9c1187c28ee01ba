//! Parsers for the three startup artifacts.
//!
//! - model.json: fitted similarity index (metric, n_neighbors, fit_rows)
//! - data.json: catalog bundle (features, movie_mapper, movie_inv_mapper, movie_titles)
//! - predictions.csv: userId,movieId,prediction
//!
//! The CSV header is optional. When present, columns are located by name and
//! extra columns are ignored; without it the first three columns are used.

use crate::error::{DataLoadError, Result};
use crate::types::*;
use serde::de::DeserializeOwned;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

const USER_COLUMN: &str = "userId";
const MOVIE_COLUMN: &str = "movieId";
const SCORE_COLUMN: &str = "prediction";

/// Read a whole artifact, reporting a missing file as `FileNotFound`
fn read_artifact(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => DataLoadError::FileNotFound {
            path: path.display().to_string(),
        },
        _ => DataLoadError::IoError(e),
    })
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn parse_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = read_artifact(path)?;
    serde_json::from_str(&content).map_err(|source| DataLoadError::JsonError {
        file: file_name(path),
        source,
    })
}

/// Parse the fitted similarity index (`model.json`)
pub fn parse_model(path: &Path) -> Result<ModelArtifact> {
    parse_json(path)
}

/// Parse the catalog bundle (`data.json`)
pub fn parse_catalog(path: &Path) -> Result<CatalogArtifact> {
    parse_json(path)
}

/// Column positions of the three prediction fields
#[derive(Debug, Clone, Copy, PartialEq)]
struct Columns {
    user: usize,
    movie: usize,
    score: usize,
}

impl Columns {
    const POSITIONAL: Columns = Columns {
        user: 0,
        movie: 1,
        score: 2,
    };

    fn width(&self) -> usize {
        self.user.max(self.movie).max(self.score) + 1
    }
}

/// Recognise a header line; `Ok(None)` means the line is data
fn parse_header(fields: &[&str], file: &str) -> Result<Option<Columns>> {
    let position = |name: &str| fields.iter().position(|f| *f == name);
    let named = [USER_COLUMN, MOVIE_COLUMN, SCORE_COLUMN]
        .into_iter()
        .filter(|&name| position(name).is_some())
        .count();

    if named == 0 {
        return Ok(None);
    }
    match (position(USER_COLUMN), position(MOVIE_COLUMN), position(SCORE_COLUMN)) {
        (Some(user), Some(movie), Some(score)) => Ok(Some(Columns { user, movie, score })),
        _ => Err(DataLoadError::ParseError {
            file: file.to_string(),
            line: 1,
            reason: format!(
                "header must name {}, {} and {}",
                USER_COLUMN, MOVIE_COLUMN, SCORE_COLUMN
            ),
        }),
    }
}

/// Parse the prediction table (`predictions.csv`)
pub fn parse_predictions(path: &Path) -> Result<Vec<Prediction>> {
    let content = read_artifact(path)?;
    let file = file_name(path);
    let mut predictions = Vec::new();
    let mut columns: Option<Columns> = None;

    for (idx, line) in content.lines().enumerate() {
        let line_no = idx + 1;
        let line_trimmed = line.trim();
        if line_trimmed.is_empty() {
            continue;
        }

        let fields: Vec<&str> = line_trimmed.split(',').map(str::trim).collect();

        let cols = match columns {
            Some(cols) => cols,
            None => {
                // First non-empty line decides whether there is a header
                if let Some(header) = parse_header(&fields, &file)? {
                    columns = Some(header);
                    continue;
                }
                columns = Some(Columns::POSITIONAL);
                Columns::POSITIONAL
            }
        };

        if fields.len() < cols.width() {
            return Err(DataLoadError::FieldCountMismatch {
                expected: cols.width(),
                found: fields.len(),
                line: line_no,
            });
        }

        let prediction = Prediction {
            user_id: fields[cols.user].parse().map_err(|e| DataLoadError::ParseError {
                file: file.clone(),
                line: line_no,
                reason: format!("Invalid userId: {}", e),
            })?,
            movie_id: fields[cols.movie].parse().map_err(|e| DataLoadError::ParseError {
                file: file.clone(),
                line: line_no,
                reason: format!("Invalid movieId: {}", e),
            })?,
            score: fields[cols.score].parse().map_err(|e| DataLoadError::ParseError {
                file: file.clone(),
                line: line_no,
                reason: format!("Invalid prediction: {}", e),
            })?,
        };

        if !prediction.score.is_finite() {
            return Err(DataLoadError::InvalidValue {
                field: "prediction".to_string(),
                value: fields[cols.score].to_string(),
            });
        }

        predictions.push(prediction);
    }

    Ok(predictions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_temp(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_parse_predictions_with_header() {
        let file = write_temp("userId,movieId,prediction\n1,862,4.5\n\n2,710,3.25\n");
        let rows = parse_predictions(file.path()).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], Prediction { user_id: 1, movie_id: 862, score: 4.5 });
        assert_eq!(rows[1].movie_id, 710);
    }

    #[test]
    fn test_parse_predictions_reordered_header_with_extra_columns() {
        let file = write_temp(",prediction,movieId,userId\n0,4.0,862,7\n");
        let rows = parse_predictions(file.path()).unwrap();

        assert_eq!(rows, vec![Prediction { user_id: 7, movie_id: 862, score: 4.0 }]);
    }

    #[test]
    fn test_parse_predictions_without_header() {
        let file = write_temp("3,11,2.5\n");
        let rows = parse_predictions(file.path()).unwrap();
        assert_eq!(rows[0].user_id, 3);
    }

    #[test]
    fn test_parse_predictions_bad_number() {
        let file = write_temp("userId,movieId,prediction\n1,abc,4.5\n");
        let err = parse_predictions(file.path()).unwrap_err();
        assert!(matches!(err, DataLoadError::ParseError { line: 2, .. }));
    }

    #[test]
    fn test_parse_predictions_missing_field() {
        let file = write_temp("1,862\n");
        let err = parse_predictions(file.path()).unwrap_err();
        assert!(matches!(err, DataLoadError::FieldCountMismatch { expected: 3, found: 2, line: 1 }));
    }

    #[test]
    fn test_parse_predictions_rejects_nan() {
        let file = write_temp("1,862,NaN\n");
        let err = parse_predictions(file.path()).unwrap_err();
        assert!(matches!(err, DataLoadError::InvalidValue { .. }));
    }

    #[test]
    fn test_partial_header_rejected() {
        let file = write_temp("userId,movieId,score\n1,862,4.5\n");
        assert!(parse_predictions(file.path()).is_err());
    }

    #[test]
    fn test_missing_file() {
        let err = parse_model(Path::new("/definitely/not/here/model.json")).unwrap_err();
        assert!(matches!(err, DataLoadError::FileNotFound { .. }));
    }

    #[test]
    fn test_parse_model() {
        let file = write_temp(r#"{"metric":"euclidean","n_neighbors":6,"fit_rows":[[0.0,1.0]]}"#);
        let model = parse_model(file.path()).unwrap();

        assert_eq!(model.metric, Metric::Euclidean);
        assert_eq!(model.n_neighbors, 6);
        assert_eq!(model.fit_rows.len(), 1);
    }

    #[test]
    fn test_parse_catalog_integer_keys() {
        let file = write_temp(
            r#"{"features":[[1.0]],"movie_mapper":{"862":0},"movie_inv_mapper":{"0":862},"movie_titles":{"862":"Toy Story (1995)"}}"#,
        );
        let catalog = parse_catalog(file.path()).unwrap();

        assert_eq!(catalog.movie_mapper.get(&862), Some(&0));
        assert_eq!(catalog.movie_inv_mapper.get(&0), Some(&862));
    }

    #[test]
    fn test_malformed_json() {
        let file = write_temp("{not json");
        let err = parse_catalog(file.path()).unwrap_err();
        assert!(matches!(err, DataLoadError::JsonError { .. }));
    }
}
