//! Data-driven sequence definitions.
//!
//! A JSON document maps sequence names to [`SequenceDef`]s:
//!
//! ```json
//! {
//!   "walk": { "frame_count": 8, "columns": 4, "rows": 2, "frame_duration_ms": 80,
//!             "frame_width": 32, "frame_height": 32, "texture": "hero" },
//!   "die":  { "frame_count": 5, "frame_duration_ms": 120, "looped": false }
//! }
//! ```
//!
//! Frame actions are code and are registered after loading.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::framesequence::{FrameSequence, LayoutDirection};
use crate::error::AnimationError;

fn default_looped() -> bool {
    true
}

/// Serializable description of a [`FrameSequence`] without its actions.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SequenceDef {
    pub frame_count: usize,
    /// Defaults to `frame_count` (a single row).
    #[serde(default)]
    pub columns: Option<u32>,
    /// Defaults to 1.
    #[serde(default)]
    pub rows: Option<u32>,
    #[serde(default)]
    pub layout: LayoutDirection,
    pub frame_duration_ms: i64,
    #[serde(default = "default_looped")]
    pub looped: bool,
    #[serde(default)]
    pub frame_width: u32,
    #[serde(default)]
    pub frame_height: u32,
    #[serde(default)]
    pub texture: Option<String>,
}

impl SequenceDef {
    /// Build a sequence with empty action lists.
    pub fn build<Ctx>(&self) -> Result<FrameSequence<Ctx>, AnimationError> {
        let columns = match self.columns {
            Some(c) => c,
            None => u32::try_from(self.frame_count).map_err(|_| {
                AnimationError::InvalidSequence(format!(
                    "{} frames do not fit in one row",
                    self.frame_count
                ))
            })?,
        };
        let mut seq = FrameSequence::new(
            self.frame_count,
            columns,
            self.rows.unwrap_or(1),
            self.layout,
            self.frame_duration_ms,
            self.looped,
        )?
        .with_frame_size(self.frame_width, self.frame_height);
        if let Some(tex) = &self.texture {
            seq = seq.with_texture(tex.clone());
        }
        Ok(seq)
    }

    /// Parse a JSON object of named definitions and build every sequence.
    pub fn load_map<Ctx>(json: &str) -> Result<FxHashMap<String, FrameSequence<Ctx>>, AnimationError> {
        let defs: FxHashMap<String, SequenceDef> = serde_json::from_str(json)?;
        defs.into_iter()
            .map(|(name, def)| -> Result<_, AnimationError> {
                let seq = def.build().map_err(|e| match e {
                    AnimationError::InvalidSequence(msg) => {
                        AnimationError::InvalidSequence(format!("{name}: {msg}"))
                    }
                    other => other,
                })?;
                Ok((name, seq))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = r#"{
        "walk": { "frame_count": 8, "columns": 4, "rows": 2, "frame_duration_ms": 80,
                  "frame_width": 32, "frame_height": 16, "texture": "hero" },
        "die":  { "frame_count": 5, "frame_duration_ms": 120, "looped": false,
                  "layout": "TopToBottom", "columns": 1, "rows": 5 }
    }"#;

    #[test]
    fn test_load_map_builds_all_sequences() {
        let map = SequenceDef::load_map::<()>(DOC).unwrap();
        assert_eq!(map.len(), 2);

        let walk = &map["walk"];
        assert_eq!(walk.frame_count(), 8);
        assert!(walk.is_looped());
        assert_eq!(walk.texture(), Some("hero"));
        assert_eq!(walk.region(5).x, 32);
        assert_eq!(walk.region(5).y, 16);

        let die = &map["die"];
        assert!(!die.is_looped());
        assert_eq!(die.layout(), LayoutDirection::TopToBottom);
        assert_eq!(die.frame_duration_millis(), 120);
    }

    #[test]
    fn test_defaults_to_single_row() {
        let def: SequenceDef =
            serde_json::from_str(r#"{ "frame_count": 3, "frame_duration_ms": 50 }"#).unwrap();
        let seq = def.build::<()>().unwrap();
        assert_eq!(seq.columns(), 3);
        assert_eq!(seq.rows(), 1);
        assert!(seq.is_looped());
    }

    #[test]
    fn test_invalid_definition_names_the_sequence() {
        let err = SequenceDef::load_map::<()>(r#"{ "bad": { "frame_count": 0, "frame_duration_ms": 10 } }"#)
            .unwrap_err();
        match err {
            AnimationError::InvalidSequence(msg) => assert!(msg.starts_with("bad:")),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            SequenceDef::load_map::<()>("{ not json"),
            Err(AnimationError::Definition(_))
        ));
    }
}
