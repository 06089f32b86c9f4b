use crate::error::{PrepError, Result};
use crate::literal::decode_literal;
use crate::record::{OutputRecord, RawGame, RawMovie, RecordId};
use crate::summary::{build_summary, phrase_name};
use serde::Deserialize;
use serde_json::Value;

/// What a batch does when one of its records cannot be mapped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InvalidPolicy {
    /// Stop at the first invalid record and report it
    #[default]
    Abort,
    /// Log the invalid record and carry on with the rest
    Skip,
}

#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub records: Vec<OutputRecord>,
    pub skipped: usize,
}

/// Map a raw movie: the summary is built from its keywords and the tags are
/// its genre names.
pub fn map_movie(raw: &Value, capacity: usize) -> Result<OutputRecord> {
    let movie = RawMovie::deserialize(raw)
        .map_err(|e| PrepError::invalid_input(format!("movie record: {e}")))?;
    let id = coerce_id(&movie.id)?;
    let keywords = nested_list(&movie.keywords, "keywords")?;
    let summary = build_summary(&keywords, capacity)?;
    let tags = tag_names(&nested_list(&movie.genres, "genres")?)?;
    Ok(OutputRecord { id, name: movie.title, summary, tags })
}

/// Map a raw game. Games already carry a prose summary, which is copied as is.
pub fn map_game(raw: &Value) -> Result<OutputRecord> {
    let game = RawGame::deserialize(raw)
        .map_err(|e| PrepError::invalid_input(format!("game record: {e}")))?;
    Ok(OutputRecord {
        id: game.id,
        name: game.name,
        summary: game.summary,
        tags: game.genres.into_iter().map(|g| g.name).collect(),
    })
}

/// Map every record with `map`, applying `policy` to failures.
pub fn map_batch<F>(raw: &[Value], policy: InvalidPolicy, mut map: F) -> Result<BatchOutcome>
where
    F: FnMut(&Value) -> Result<OutputRecord>,
{
    let mut outcome = BatchOutcome { records: Vec::with_capacity(raw.len()), skipped: 0 };
    for (index, value) in raw.iter().enumerate() {
        match map(value) {
            Ok(record) => {
                tracing::debug!(index, id = record.id, "mapped record");
                outcome.records.push(record);
            }
            Err(err) => match policy {
                InvalidPolicy::Abort => {
                    return Err(PrepError::Record { index, source: Box::new(err) });
                }
                InvalidPolicy::Skip => {
                    tracing::warn!(index, error = %err, "skipping invalid record");
                    outcome.skipped += 1;
                }
            },
        }
    }
    tracing::info!(mapped = outcome.records.len(), skipped = outcome.skipped, "batch mapped");
    Ok(outcome)
}

fn coerce_id(value: &Value) -> Result<RecordId> {
    match value {
        Value::Number(n) => {
            if let Some(id) = n.as_i64() {
                return Ok(id);
            }
            if n.is_u64() {
                return Err(PrepError::invalid_input(format!("id {n} is out of range")));
            }
            // i64::MAX as f64 rounds up to 2^63, which is already out of range
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64)
                .map(|f| f as i64)
                .ok_or_else(|| PrepError::invalid_input(format!("id {n} is not an integer in range")))
        }
        Value::String(s) => s
            .trim()
            .parse()
            .map_err(|_| PrepError::invalid_input(format!("id '{s}' is not numeric"))),
        other => Err(PrepError::invalid_input(format!("id has unsupported value {other}"))),
    }
}

/// A nested list field, either native or literal-encoded. A blank string is
/// an empty list.
fn nested_list(value: &Value, field: &str) -> Result<Vec<Value>> {
    match value {
        Value::Array(items) => Ok(items.clone()),
        Value::String(text) if text.trim().is_empty() => Ok(Vec::new()),
        Value::String(text) => match decode_literal(text)? {
            Value::Array(items) => Ok(items),
            other => Err(PrepError::invalid_input(format!("{field} decoded to a non-list value {other}"))),
        },
        other => Err(PrepError::invalid_input(format!("{field} must be a list, got {other}"))),
    }
}

fn tag_names(genres: &[Value]) -> Result<Vec<String>> {
    genres
        .iter()
        .enumerate()
        .map(|(i, g)| phrase_name(g, i, "genres").map(str::to_string))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn movie() -> Value {
        json!({
            "id": "19995",
            "title": "Avatar",
            "budget": 237000000,
            "genres": "[{'id': 28, 'name': 'Action'}, {'id': 878, 'name': 'Science Fiction'}]",
            "keywords": "[{'id': 1463, 'name': 'culture clash'}, {'id': 2964, 'name': 'future'}, {'id': 3386, 'name': 'space war'}]"
        })
    }

    #[test]
    fn maps_literal_encoded_movie() {
        let rec = map_movie(&movie(), 50).unwrap();
        assert_eq!(rec.id, 19995);
        assert_eq!(rec.name, "Avatar");
        assert_eq!(rec.summary, "culture clash future space war");
        assert_eq!(rec.tags, vec!["Action", "Science Fiction"]);
    }

    #[test]
    fn maps_native_movie_lists() {
        let raw = json!({
            "id": 5,
            "title": "Four Rooms",
            "genres": [{ "name": "Comedy" }],
            "keywords": [{ "name": "hotel" }, { "name": "hotel room" }]
        });
        let rec = map_movie(&raw, 50).unwrap();
        assert_eq!(rec.summary, "hotel room");
        assert_eq!(rec.tags, vec!["Comedy"]);
    }

    #[test]
    fn movie_capacity_applies() {
        assert_eq!(map_movie(&movie(), 2).unwrap().summary, "culture clash");
    }

    #[test]
    fn rejects_non_numeric_id() {
        let mut raw = movie();
        raw["id"] = json!("abc");
        assert!(matches!(map_movie(&raw, 50), Err(PrepError::InvalidInput(_))));
    }

    #[test]
    fn rejects_out_of_range_ids() {
        for id in [json!(18446744073709551615u64), json!(1e300), json!(-1e300), json!(12.5)] {
            let mut raw = movie();
            raw["id"] = id;
            assert!(matches!(map_movie(&raw, 50), Err(PrepError::InvalidInput(_))));
        }
        let mut raw = movie();
        raw["id"] = json!(12.0);
        assert_eq!(map_movie(&raw, 50).unwrap().id, 12);
    }

    #[test]
    fn rejects_non_list_nested_fields() {
        let mut raw = movie();
        raw["genres"] = json!(5);
        assert!(matches!(map_movie(&raw, 50), Err(PrepError::InvalidInput(_))));

        let mut raw = movie();
        raw["keywords"] = json!("{'id': 1, 'name': 'spy'}");
        assert!(matches!(map_movie(&raw, 50), Err(PrepError::InvalidInput(_))));
    }

    #[test]
    fn rejects_keyword_without_name() {
        let mut raw = movie();
        raw["keywords"] = json!("[{'id': 1}]");
        assert!(matches!(map_movie(&raw, 50), Err(PrepError::InvalidInput(_))));
    }

    #[test]
    fn maps_game_verbatim() {
        let raw = json!({
            "id": 1020,
            "name": "Grand Theft Auto V",
            "summary": "Three criminals.",
            "genres": [{ "id": 5, "name": "Shooter" }, { "id": 31, "name": "Adventure" }]
        });
        let rec = map_game(&raw).unwrap();
        assert_eq!(
            rec,
            OutputRecord {
                id: 1020,
                name: "Grand Theft Auto V".into(),
                summary: "Three criminals.".into(),
                tags: vec!["Shooter".into(), "Adventure".into()],
            }
        );
    }

    #[test]
    fn batch_abort_reports_index() {
        let raw = vec![movie(), json!({ "id": 1 })];
        let err = map_batch(&raw, InvalidPolicy::Abort, |v| map_movie(v, 50)).unwrap_err();
        assert!(matches!(err, PrepError::Record { index: 1, .. }));
    }

    #[test]
    fn batch_skip_continues() {
        let raw = vec![json!({ "id": 1 }), movie()];
        let out = map_batch(&raw, InvalidPolicy::Skip, |v| map_movie(v, 50)).unwrap();
        assert_eq!(out.skipped, 1);
        assert_eq!(out.records.len(), 1);
        assert_eq!(out.records[0].id, 19995);
    }
}
