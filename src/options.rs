use egui::{Rect, Vec2};

use crate::geometry::rect_from_limit;

/// What happens when a drag ends.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum DragMode {
    /// Move anywhere (inside the boundary, if any). Serialized as `"all"`.
    #[default]
    #[cfg_attr(feature = "serde", serde(rename = "all"))]
    Free,

    /// The drag must end over a declared target: dock into it, or go back to where the gesture
    /// started. Serialized as `"once"`, since the session ends after the first successful snap.
    #[cfg_attr(feature = "serde", serde(rename = "once"))]
    SnapToTarget,
}

/// Offset of the element inside a target zone after docking, relative to the target's top-left.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SnapOffset {
    pub top: f32,
    pub left: f32,
}

impl SnapOffset {
    pub fn to_vec2(self) -> Vec2 {
        Vec2::new(self.left, self.top)
    }
}

/// Movement boundary, relative to the draggable element's parent.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Limit {
    pub top: f32,
    pub left: f32,
    pub width: f32,
    pub height: f32,
}

impl Limit {
    pub fn to_rect(self) -> Rect {
        rect_from_limit(self.top, self.left, self.width, self.height)
    }
}

/// Target selectors with their snap offsets, in declaration order.
///
/// Order matters: when several targets are hit at once, the first declared one wins.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TargetSet {
    entries: Vec<(String, SnapOffset)>,
}

impl TargetSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a target. Re-declaring a selector replaces its offset and keeps its position.
    pub fn insert(&mut self, selector: impl Into<String>, offset: SnapOffset) {
        let selector = selector.into();
        if let Some(entry) = self.entries.iter_mut().find(|(s, _)| *s == selector) {
            entry.1 = offset;
        } else {
            self.entries.push((selector, offset));
        }
    }

    pub fn with(mut self, selector: impl Into<String>, offset: SnapOffset) -> Self {
        self.insert(selector, offset);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, SnapOffset)> + '_ {
        self.entries.iter().map(|(s, o)| (s.as_str(), *o))
    }
}

impl<S: Into<String>> FromIterator<(S, SnapOffset)> for TargetSet {
    fn from_iter<I: IntoIterator<Item = (S, SnapOffset)>>(iter: I) -> Self {
        let mut set = Self::new();
        for (selector, offset) in iter {
            set.insert(selector, offset);
        }
        set
    }
}

/// Options for [`crate::DragRegistry::activate`].
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DragOptions {
    pub mode: DragMode,

    /// Required (non-empty) when `mode` is [`DragMode::SnapToTarget`], ignored otherwise.
    pub targets: TargetSet,

    /// Movement boundary. A zero or negative area boundary is ignored.
    pub limit: Option<Limit>,

    /// In [`DragMode::Free`], animate back to the gesture origin on release instead of staying
    /// where the element was dropped.
    pub return_on_release: bool,
}

impl DragOptions {
    pub fn free() -> Self {
        Self::default()
    }

    pub fn snap_to(targets: TargetSet) -> Self {
        Self {
            mode: DragMode::SnapToTarget,
            targets,
            ..Default::default()
        }
    }

    pub fn with_limit(mut self, limit: Limit) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Options for [`crate::DragRegistry`] itself.
#[derive(Clone, Debug)]
pub struct RegistryOptions {
    /// If true, record lifecycle events (activate, cancel, gesture start/end) in a small ring
    /// buffer, see [`crate::DragRegistry::debug_log_text`].
    pub debug_event_log: bool,

    /// Maximum number of debug log lines to keep (ring buffer).
    pub debug_event_log_capacity: usize,
}

impl Default for RegistryOptions {
    fn default() -> Self {
        Self {
            debug_event_log: false,
            debug_event_log_capacity: 200,
        }
    }
}

#[cfg(feature = "serde")]
mod serde_impl {
    use std::fmt;

    use serde::de::{MapAccess, SeqAccess, Visitor};
    use serde::ser::SerializeMap as _;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use super::{SnapOffset, TargetSet};

    impl Serialize for TargetSet {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            let mut map = serializer.serialize_map(Some(self.entries.len()))?;
            for (selector, offset) in &self.entries {
                map.serialize_entry(selector, offset)?;
            }
            map.end()
        }
    }

    struct TargetSetVisitor;

    impl<'de> Visitor<'de> for TargetSetVisitor {
        type Value = TargetSet;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a map of selector to snap offset, or a list of selectors")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<TargetSet, A::Error> {
            let mut set = TargetSet::new();
            while let Some((selector, offset)) = access.next_entry::<String, SnapOffset>()? {
                set.insert(selector, offset);
            }
            Ok(set)
        }

        // A bare list of selectors docks every target at offset (0, 0).
        fn visit_seq<A: SeqAccess<'de>>(self, mut access: A) -> Result<TargetSet, A::Error> {
            let mut set = TargetSet::new();
            while let Some(selector) = access.next_element::<String>()? {
                set.insert(selector, SnapOffset::default());
            }
            Ok(set)
        }

        fn visit_unit<E: serde::de::Error>(self) -> Result<TargetSet, E> {
            Ok(TargetSet::new())
        }

        fn visit_none<E: serde::de::Error>(self) -> Result<TargetSet, E> {
            Ok(TargetSet::new())
        }
    }

    impl<'de> Deserialize<'de> for TargetSet {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            deserializer.deserialize_any(TargetSetVisitor)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redeclaring_a_target_keeps_its_position() {
        let set = TargetSet::new()
            .with("#a", SnapOffset::default())
            .with("#b", SnapOffset::default())
            .with(
                "#a",
                SnapOffset {
                    top: 4.0,
                    left: 2.0,
                },
            );
        let keys: Vec<&str> = set.iter().map(|(s, _)| s).collect();
        assert_eq!(keys, ["#a", "#b"]);
        assert_eq!(set.iter().next().map(|(_, o)| o.to_vec2()), Some(Vec2::new(2.0, 4.0)));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn json_options_keep_target_order() {
        let json = r##"{
            "mode": "once",
            "targets": { "#zeta": { "top": 5 }, "#alpha": {}, "#mid": { "left": 3 } },
            "limit": { "top": 0, "left": 0, "width": 200, "height": 200 }
        }"##;
        let options: DragOptions = serde_json::from_str(json).expect("valid options");
        assert_eq!(options.mode, DragMode::SnapToTarget);
        let keys: Vec<&str> = options.targets.iter().map(|(s, _)| s).collect();
        assert_eq!(keys, ["#zeta", "#alpha", "#mid"]);
        assert_eq!(
            options.targets.iter().next().map(|(_, o)| o),
            Some(SnapOffset {
                top: 5.0,
                left: 0.0
            })
        );
        assert_eq!(options.limit.map(Limit::to_rect).map(|r| r.width()), Some(200.0));
        assert!(!options.return_on_release);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn json_defaults_to_free_mode() {
        let options: DragOptions = serde_json::from_str("{}").expect("valid options");
        assert_eq!(options, DragOptions::default());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn json_accepts_plain_selector_list() {
        let options: DragOptions =
            serde_json::from_str(r##"{ "mode": "once", "targets": ["#bin", "#tray"] }"##)
                .expect("valid options");
        assert_eq!(options.targets.len(), 2);
        assert!(options.targets.iter().all(|(_, o)| o == SnapOffset::default()));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn ron_options() {
        let text = r##"(
            mode: once,
            targets: { "#bin": (top: 1.0, left: 2.0) },
            return_on_release: true,
        )"##;
        let options: DragOptions = ron::from_str(text).expect("valid options");
        assert_eq!(options.mode, DragMode::SnapToTarget);
        assert_eq!(options.targets.len(), 1);
        assert!(options.return_on_release);
    }
}
