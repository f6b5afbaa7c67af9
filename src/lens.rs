//! Fixed-path navigation into a resource document.
//!
//! A [`Lens`] is a static list of [`Segment`]s. Every step is checked for the
//! right container type and bounds, and a failure reports the rendered path
//! up to the step that failed instead of panicking.

use std::fmt::Write as _;

use crate::error::DecodeError;
use crate::statics;
use crate::value::ResValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment {
    Key(&'static str),
    Index(usize),
}

impl Segment {
    fn render(self, out: &mut String) {
        match self {
            Segment::Key(k) => {
                if !out.is_empty() {
                    out.push('.');
                }
                out.push_str(k);
            }
            Segment::Index(i) => {
                write!(out, "[{i}]").ok();
            }
        }
    }

    fn expected(self) -> String {
        match self {
            Segment::Key(k) => format!("an object with key `{k}`"),
            Segment::Index(i) => format!("an array with at least {} element(s)", i + 1),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lens {
    segments: &'static [Segment],
}

/// `script[0].children.true[1]`: the group holding the ten column events.
pub const FLAGS_GROUP: Lens = Lens::new(&[
    Segment::Key(statics::DOC_SCRIPT),
    Segment::Index(0),
    Segment::Key(statics::DOC_CHILDREN),
    Segment::Key(statics::DOC_BRANCH_TRUE),
    Segment::Index(1),
]);

/// `children.true`, relative to any event node.
pub const TRUE_BRANCH: Lens = Lens::new(&[
    Segment::Key(statics::DOC_CHILDREN),
    Segment::Key(statics::DOC_BRANCH_TRUE),
]);

/// `children.false`, relative to any event node.
pub const FALSE_BRANCH: Lens = Lens::new(&[
    Segment::Key(statics::DOC_CHILDREN),
    Segment::Key(statics::DOC_BRANCH_FALSE),
]);

impl Lens {
    pub const fn new(segments: &'static [Segment]) -> Self {
        Self { segments }
    }

    pub fn segments(&self) -> &'static [Segment] {
        self.segments
    }

    /// Render the path relative to `base` (an already rendered prefix).
    pub fn path_from(&self, base: &str) -> String {
        let mut out = base.to_string();
        for seg in self.segments {
            seg.render(&mut out);
        }
        out
    }

    fn failure(&self, base: &str, failed_at: usize, expected: String) -> DecodeError {
        let mut location = base.to_string();
        for seg in &self.segments[..=failed_at] {
            seg.render(&mut location);
        }
        DecodeError::MalformedStructure { location, expected }
    }

    pub fn get<'a>(&self, root: &'a ResValue, base: &str) -> Result<&'a ResValue, DecodeError> {
        let mut cur = root;
        for (i, seg) in self.segments.iter().enumerate() {
            let next = match *seg {
                Segment::Key(k) => cur.get(k),
                Segment::Index(idx) => cur.as_array().and_then(|a| a.get(idx)),
            };
            cur = next.ok_or_else(|| self.failure(base, i, seg.expected()))?;
        }
        Ok(cur)
    }

    pub fn get_mut<'a>(
        &self,
        root: &'a mut ResValue,
        base: &str,
    ) -> Result<&'a mut ResValue, DecodeError> {
        let mut cur = root;
        for (i, seg) in self.segments.iter().enumerate() {
            let next = match *seg {
                Segment::Key(k) => cur.get_mut(k),
                Segment::Index(idx) => cur.as_array_mut().and_then(|a| a.get_mut(idx)),
            };
            cur = next.ok_or_else(|| self.failure(base, i, seg.expected()))?;
        }
        Ok(cur)
    }

    /// Focus on the target and require it to be an array.
    pub fn array<'a>(&self, root: &'a ResValue, base: &str) -> Result<&'a [ResValue], DecodeError> {
        let target = self.get(root, base)?;
        target.as_array().ok_or_else(|| self.not_an_array(base, target))
    }

    pub fn array_mut<'a>(
        &self,
        root: &'a mut ResValue,
        base: &str,
    ) -> Result<&'a mut Vec<ResValue>, DecodeError> {
        let target = self.get_mut(root, base)?;
        let type_name = target.type_name();
        match target {
            ResValue::Array(values) => Ok(values),
            _ => Err(DecodeError::MalformedStructure {
                location: self.path_from(base),
                expected: format!("an array, found {type_name}"),
            }),
        }
    }

    fn not_an_array(&self, base: &str, found: &ResValue) -> DecodeError {
        DecodeError::MalformedStructure {
            location: self.path_from(base),
            expected: format!("an array, found {}", found.type_name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{FLAGS_GROUP, Lens, Segment, TRUE_BRANCH};
    use crate::error::DecodeError;
    use crate::value::ResValue;

    #[test]
    fn renders_paths_like_property_access() {
        assert_eq!(FLAGS_GROUP.path_from(""), "script[0].children.true[1]");
        assert_eq!(TRUE_BRANCH.path_from("x[3]"), "x[3].children.true");
    }

    #[test]
    fn get_follows_keys_and_indices() {
        let doc = ResValue::parse(
            r#"{"script":[{"children":{"true":[{"id":"a"},{"id":"flags"}]}}]}"#,
        )
        .unwrap();
        let group = FLAGS_GROUP.get(&doc, "").unwrap();
        assert_eq!(group.get("id").and_then(ResValue::as_str), Some("flags"));
    }

    #[test]
    fn missing_step_reports_location() {
        let doc = ResValue::parse(r#"{"script":[]}"#).unwrap();
        let err = FLAGS_GROUP.get(&doc, "").unwrap_err();
        assert_eq!(
            err,
            DecodeError::MalformedStructure {
                location: "script[0]".to_string(),
                expected: "an array with at least 1 element(s)".to_string(),
            }
        );
    }

    #[test]
    fn wrong_container_type_is_malformed() {
        let doc = ResValue::parse(r#"{"script":{"0":{}}}"#).unwrap();
        assert!(FLAGS_GROUP.get(&doc, "").is_err());

        let doc = ResValue::parse(r#"{"children":{"true":{}}}"#).unwrap();
        let err = TRUE_BRANCH.array(&doc, "node").unwrap_err();
        assert_eq!(
            err,
            DecodeError::MalformedStructure {
                location: "node.children.true".to_string(),
                expected: "an array, found object".to_string(),
            }
        );
    }

    #[test]
    fn array_mut_allows_in_place_edits() {
        let mut doc = ResValue::parse(r#"{"children":{"true":[1]}}"#).unwrap();
        TRUE_BRANCH
            .array_mut(&mut doc, "")
            .unwrap()
            .push(ResValue::Bool(true));
        assert_eq!(TRUE_BRANCH.array(&doc, "").unwrap().len(), 2);
    }

    #[test]
    fn segments_are_exposed() {
        const ROOT_ITEM: Lens = Lens::new(&[Segment::Index(0)]);
        assert_eq!(ROOT_ITEM.segments(), &[Segment::Index(0)]);
    }
}
