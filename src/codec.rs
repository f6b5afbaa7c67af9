//! Mapping between [`GridState`] and the flag events of a resource document.
//!
//! Layout, relative to the document root:
//!
//! ```text
//! script[0].children.true[1]            flags group
//!   .children.true[col]                 column event (10 of them)
//!     .children.true[row]               flag event
//!       .children.true  / .false        branches; an EVENT_INC_VALUE in
//!                                       `true` marks the cell active
//! ```
//!
//! Only marker events are ever added, removed or moved. Every other event,
//! field and id is left exactly where it was.

use std::collections::HashSet;

use indexmap::IndexMap;

use crate::error::DecodeError;
use crate::grid::{GRID_CAPACITY, GridSize, GridState};
use crate::lens::{FALSE_BRANCH, FLAGS_GROUP, TRUE_BRANCH};
use crate::statics;
use crate::value::ResValue;

fn columns_location() -> String {
    TRUE_BRANCH.path_from(&FLAGS_GROUP.path_from(""))
}

fn column_location(col: usize) -> String {
    format!("{}[{col}]", columns_location())
}

fn flag_location(col: usize, row: usize) -> String {
    format!("{}[{row}]", TRUE_BRANCH.path_from(&column_location(col)))
}

pub fn is_marker(event: &ResValue) -> bool {
    event.get(statics::DOC_COMMAND).and_then(ResValue::as_str) == Some(statics::CMD_INC_VALUE)
}

fn column_events(document: &ResValue) -> Result<&[ResValue], DecodeError> {
    let columns = TRUE_BRANCH.array(FLAGS_GROUP.get(document, "")?, &FLAGS_GROUP.path_from(""))?;
    check_column_count(columns.len())?;
    Ok(columns)
}

fn column_events_mut(document: &mut ResValue) -> Result<&mut Vec<ResValue>, DecodeError> {
    let base = FLAGS_GROUP.path_from("");
    let columns = TRUE_BRANCH.array_mut(FLAGS_GROUP.get_mut(document, "")?, &base)?;
    check_column_count(columns.len())?;
    Ok(columns)
}

fn check_column_count(found: usize) -> Result<(), DecodeError> {
    if found < GRID_CAPACITY {
        return Err(DecodeError::MalformedStructure {
            location: columns_location(),
            expected: format!("at least {GRID_CAPACITY} column events, found {found}"),
        });
    }
    Ok(())
}

/// Read the grid out of `document`.
///
/// A cell is active when its flag event's `true` branch holds a marker.
/// The document is not modified; on error nothing is produced.
pub fn decode(document: &ResValue, active_size: GridSize) -> Result<GridState, DecodeError> {
    let columns = column_events(document)?;
    let mut grid = GridState::new(active_size);

    for (col, column) in columns.iter().take(GRID_CAPACITY).enumerate() {
        let flags = TRUE_BRANCH.array(column, &column_location(col))?;
        for (row, flag) in flags.iter().enumerate() {
            let base = flag_location(col, row);
            let on_true = TRUE_BRANCH.array(flag, &base)?;
            // Encode writes into both branches, so both must be present.
            FALSE_BRANCH.array(flag, &base)?;
            grid.set(col, row, on_true.iter().any(is_marker));
        }
    }

    Ok(grid)
}

/// Write `grid` back into `document` in place.
///
/// For every flag event, markers are pulled out of both branches and a single
/// one is appended to the branch matching the cell: the marker already on
/// that side if any, otherwise the one from the other side, otherwise a new
/// marker from `ids`. Extra duplicate markers are dropped.
pub fn encode(
    document: &mut ResValue,
    grid: &GridState,
    ids: &mut IdGenerator,
) -> Result<(), DecodeError> {
    let columns = column_events_mut(document)?;

    for (col, column) in columns.iter_mut().take(GRID_CAPACITY).enumerate() {
        let flags = TRUE_BRANCH.array_mut(column, &column_location(col))?;
        for (row, flag) in flags.iter_mut().take(GRID_CAPACITY).enumerate() {
            let base = flag_location(col, row);
            let on_true = take_markers(TRUE_BRANCH.array_mut(flag, &base)?);
            let on_false = take_markers(FALSE_BRANCH.array_mut(flag, &base)?);

            let active = grid.get(col, row);
            let (preferred, fallback, target) = if active {
                (on_true, on_false, TRUE_BRANCH)
            } else {
                (on_false, on_true, FALSE_BRANCH)
            };
            let marker = preferred
                .or(fallback)
                .unwrap_or_else(|| new_marker(ids.fresh(col, row)));
            target.array_mut(flag, &base)?.push(marker);
        }
    }

    Ok(())
}

/// Remove every marker from `branch`, keeping the others in order.
/// Returns the first marker that was removed.
fn take_markers(branch: &mut Vec<ResValue>) -> Option<ResValue> {
    let mut first = None;
    branch.retain(|event| {
        if !is_marker(event) {
            return true;
        }
        if first.is_none() {
            first = Some(event.clone());
        }
        false
    });
    first
}

pub fn new_marker(id: String) -> ResValue {
    let mut args = IndexMap::new();
    args.insert(
        statics::DOC_ARG_VARIABLE.to_string(),
        ResValue::String(statics::MARKER_VARIABLE.to_string()),
    );
    args.insert(statics::DOC_ARG_COLLAPSE.to_string(), ResValue::Bool(true));

    let mut event = IndexMap::new();
    event.insert(
        statics::DOC_COMMAND.to_string(),
        ResValue::String(statics::CMD_INC_VALUE.to_string()),
    );
    event.insert(statics::DOC_ARGS.to_string(), ResValue::Object(args));
    event.insert(statics::DOC_ID.to_string(), ResValue::String(id));
    ResValue::Object(event)
}

/// Produces ids for synthesized markers that do not clash with any id
/// already present in the document or handed out earlier.
#[derive(Debug, Default)]
pub struct IdGenerator {
    taken: HashSet<String>,
}

impl IdGenerator {
    pub fn for_document(document: &ResValue) -> Self {
        let mut taken = HashSet::new();
        document.for_each_id(&mut |id| {
            taken.insert(id.to_string());
        });
        Self { taken }
    }

    pub fn is_taken(&self, id: &str) -> bool {
        self.taken.contains(id)
    }

    pub fn fresh(&mut self, col: usize, row: usize) -> String {
        loop {
            let id = format!(
                "{}_{col}_{row}_{}",
                statics::GENERATED_ID_PREFIX,
                uuid::Uuid::new_v4().simple()
            );
            if self.taken.insert(id.clone()) {
                return id;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{IdGenerator, decode, encode, is_marker, new_marker, take_markers};
    use crate::error::DecodeError;
    use crate::grid::{GridSize, GridState};
    use crate::statics;
    use crate::value::ResValue;

    fn event(command: &str, id: &str) -> String {
        format!(r#"{{"command":"{command}","args":{{}},"id":"{id}"}}"#)
    }

    /// Ten columns of three flags; the marker for (c, r) sits in the true
    /// branch when `on(c, r)`, otherwise in the false branch.
    fn doc_with(on: impl Fn(usize, usize) -> bool) -> ResValue {
        let mut columns = Vec::new();
        for c in 0..10 {
            let mut flags = Vec::new();
            for r in 0..3 {
                let marker = event(statics::CMD_INC_VALUE, &format!("m{c}{r}"));
                let (t, f) = if on(c, r) {
                    (marker, String::new())
                } else {
                    (String::new(), marker)
                };
                flags.push(format!(
                    r#"{{"command":"EVENT_IF_FLAGS","id":"f{c}{r}","children":{{"true":[{t}],"false":[{f}]}}}}"#
                ));
            }
            columns.push(format!(
                r#"{{"command":"EVENT_GROUP","id":"c{c}","children":{{"true":[{}]}}}}"#,
                flags.join(",")
            ));
        }
        let text = format!(
            r#"{{"script":[{{"command":"EVENT_IF","children":{{"true":[{},{{"command":"EVENT_GROUP","children":{{"true":[{}]}}}}]}}}}]}}"#,
            event("EVENT_TEXT", "intro"),
            columns.join(",")
        );
        ResValue::parse(&text).unwrap()
    }

    #[test]
    fn decode_reads_true_branch_markers() {
        let doc = doc_with(|c, r| c == r);
        let grid = decode(&doc, GridSize::Ten).unwrap();
        assert!(grid.get(0, 0));
        assert!(grid.get(2, 2));
        assert!(!grid.get(1, 0));
        assert!(!grid.get(3, 3), "row 3 does not exist in the document");
        assert_eq!(grid.active_size(), GridSize::Ten);
    }

    #[test]
    fn decode_keeps_requested_active_size() {
        let doc = doc_with(|_, _| true);
        let grid = decode(&doc, GridSize::Three).unwrap();
        assert_eq!(grid.active_size(), GridSize::Three);
        assert!(grid.get(9, 2));
    }

    #[test]
    fn decode_rejects_missing_script() {
        let doc = ResValue::parse(r#"{"name":"x"}"#).unwrap();
        let err = decode(&doc, GridSize::Ten).unwrap_err();
        assert!(matches!(err, DecodeError::MalformedStructure { ref location, .. } if location == "script"));
    }

    #[test]
    fn decode_rejects_too_few_columns() {
        let doc = ResValue::parse(
            r#"{"script":[{"children":{"true":[{},{"children":{"true":[]}}]}}]}"#,
        )
        .unwrap();
        let err = decode(&doc, GridSize::Ten).unwrap_err();
        assert_eq!(
            err,
            DecodeError::MalformedStructure {
                location: "script[0].children.true[1].children.true".to_string(),
                expected: "at least 10 column events, found 0".to_string(),
            }
        );
    }

    #[test]
    fn decode_requires_false_branch() {
        let mut doc = doc_with(|_, _| false);
        let flag = doc
            .get_mut("script")
            .and_then(|s| s.as_array_mut())
            .and_then(|s| s[0].get_mut("children"))
            .and_then(|c| c.get_mut("true"))
            .and_then(|t| t.as_array_mut())
            .and_then(|t| t[1].get_mut("children"))
            .and_then(|c| c.get_mut("true"))
            .and_then(|cols| cols.as_array_mut())
            .and_then(|cols| cols[4].get_mut("children"))
            .and_then(|c| c.get_mut("true"))
            .and_then(|flags| flags.as_array_mut())
            .map(|flags| &mut flags[1])
            .unwrap();
        flag.get_mut("children")
            .and_then(ResValue::as_object_mut)
            .unwrap()
            .shift_remove("false");

        let err = decode(&doc, GridSize::Ten).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::MalformedStructure { ref location, .. }
                if location == "script[0].children.true[1].children.true[4].children.true[1].children.false"
        ));
    }

    #[test]
    fn encode_moves_existing_marker_between_branches() {
        let mut doc = doc_with(|_, _| false);
        let mut grid = decode(&doc, GridSize::Ten).unwrap();
        grid.toggle(2, 1).unwrap();

        let mut ids = IdGenerator::for_document(&doc);
        encode(&mut doc, &grid, &mut ids).unwrap();

        let again = decode(&doc, GridSize::Ten).unwrap();
        assert_eq!(again, grid);
        let text = doc.to_pretty_json();
        assert_eq!(text.matches("\"m21\"").count(), 1);
        assert!(!text.contains("gen_"), "no marker should be synthesized");
    }

    #[test]
    fn take_markers_keeps_other_events_in_order() {
        let mut branch = ResValue::parse(&format!(
            "[{},{},{},{}]",
            event("EVENT_A", "a"),
            event(statics::CMD_INC_VALUE, "m1"),
            event("EVENT_B", "b"),
            event(statics::CMD_INC_VALUE, "m2"),
        ))
        .unwrap();
        let branch = branch.as_array_mut().unwrap();
        let first = take_markers(branch).unwrap();

        assert_eq!(first.get("id").and_then(ResValue::as_str), Some("m1"));
        let ids: Vec<_> = branch
            .iter()
            .filter_map(|e| e.get("id").and_then(ResValue::as_str))
            .collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn non_object_events_are_not_markers() {
        assert!(!is_marker(&ResValue::Null));
        assert!(!is_marker(&ResValue::String(statics::CMD_INC_VALUE.to_string())));
        assert!(is_marker(&new_marker("x".to_string())));
    }

    #[test]
    fn new_marker_has_expected_shape() {
        let marker = new_marker("gen_1".to_string());
        assert_eq!(
            marker.to_pretty_json(),
            "{\n  \"command\": \"EVENT_INC_VALUE\",\n  \"args\": {\n    \"variable\": \"V1\",\n    \"__collapse\": true\n  },\n  \"id\": \"gen_1\"\n}"
        );
    }

    #[test]
    fn id_generator_avoids_existing_ids() {
        let doc = doc_with(|_, _| true);
        let mut ids = IdGenerator::for_document(&doc);
        assert!(ids.is_taken("m00"));
        assert!(ids.is_taken("c9"));

        let a = ids.fresh(0, 0);
        let b = ids.fresh(0, 0);
        assert_ne!(a, b);
        assert!(a.starts_with("gen_0_0_"));
        assert!(ids.is_taken(&a));
    }

    #[test]
    fn encode_fails_cleanly_on_reshaped_document() {
        let mut doc = ResValue::parse(r#"{"script":[]}"#).unwrap();
        let grid = GridState::new(GridSize::Ten);
        let mut ids = IdGenerator::default();
        assert!(encode(&mut doc, &grid, &mut ids).is_err());
    }
}
