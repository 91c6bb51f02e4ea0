//! Label catalog for frame description
//!
//! A static, ordered vocabulary of candidate labels grouped by
//! category. The catalog carries no logic; declaration order is
//! significant only for deterministic tie-breaking when affinity
//! scores are equal.


use serde::{Deserialize, Serialize};

use crate::core::error::ConfigError;

/// Category a label belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelCategory {
    /// Recurring subject of the video library
    Identity,
    /// Concrete objects visible in the frame
    Object,
    /// Scene and environment context
    Scene,
    /// Poses and activities
    Action,
    /// Phone and device usage
    DeviceUse,
    /// Shot framing and composition
    Composition,
}

/// One candidate label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Label {
    /// Label text as scored against the image
    pub text: String,
    /// Category the label belongs to
    pub category: LabelCategory,
}

impl Label {
    pub fn new(text: impl Into<String>, category: LabelCategory) -> Self {
        Self {
            text: text.into(),
            category,
        }
    }
}

/// Which builtin catalog to load
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogMode {
    /// Full vocabulary
    #[default]
    Full,
    /// Identity, basic scene, and device-use labels only (faster scoring)
    Compact,
}

/// Immutable ordered label vocabulary
#[derive(Debug, Clone)]
pub struct LabelCatalog {
    labels: Vec<Label>,
}

impl LabelCatalog {
    /// Create a catalog from an ordered label list
    ///
    /// An empty list is a fatal configuration error.
    pub fn new(labels: Vec<Label>) -> Result<Self, ConfigError> {
        if labels.is_empty() {
            return Err(ConfigError::EmptyCatalog);
        }
        Ok(Self { labels })
    }

    /// Builtin catalog for the given mode
    pub fn builtin(mode: CatalogMode) -> Self {
        match mode {
            CatalogMode::Full => Self::builtin_full(),
            CatalogMode::Compact => Self::builtin_compact(),
        }
    }

    /// Full builtin vocabulary
    pub fn builtin_full() -> Self {
        Self::from_static(&FULL_LABELS)
    }

    /// Compact builtin vocabulary for faster scoring
    pub fn builtin_compact() -> Self {
        Self::from_static(&COMPACT_LABELS)
    }

    fn from_static(entries: &[(&'static str, LabelCategory)]) -> Self {
        let labels = entries
            .iter()
            .map(|(text, category)| Label::new(*text, *category))
            .collect();
        // Builtin lists are non-empty by construction
        Self { labels }
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Labels in declaration order
    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    /// Label texts in declaration order
    pub fn texts(&self) -> Vec<&str> {
        self.labels.iter().map(|l| l.text.as_str()).collect()
    }

    /// Position of a label text in declaration order
    pub fn position(&self, text: &str) -> Option<usize> {
        self.labels.iter().position(|l| l.text == text)
    }
}

use LabelCategory::*;

/// Full vocabulary: subject identity, COCO-style objects, scene and
/// environment, actions and poses, device use, and shot composition.
static FULL_LABELS: [(&str, LabelCategory); 114] = [
    // Subject identity
    ("subject close-up", Identity),
    ("subject from distance", Identity),
    ("subject smiling", Identity),
    ("subject talking", Identity),
    ("subject walking", Identity),
    ("subject sitting", Identity),
    ("subject standing", Identity),
    ("subject holding phone", Identity),
    ("subject using phone", Identity),
    // Person and vehicles
    ("person", Object),
    ("bicycle", Object),
    ("car", Object),
    ("motorcycle", Object),
    ("airplane", Object),
    ("bus", Object),
    ("train", Object),
    ("truck", Object),
    ("boat", Object),
    ("traffic light", Object),
    ("fire hydrant", Object),
    ("stop sign", Object),
    ("parking meter", Object),
    ("bench", Object),
    // Indoor objects
    ("chair", Object),
    ("couch", Object),
    ("potted plant", Object),
    ("bed", Object),
    ("dining table", Object),
    ("toilet", Object),
    ("tv", Object),
    ("laptop", Object),
    ("mouse", Object),
    ("remote", Object),
    ("keyboard", Object),
    ("cell phone", Object),
    ("microwave", Object),
    ("oven", Object),
    ("toaster", Object),
    ("sink", Object),
    ("refrigerator", Object),
    ("book", Object),
    ("clock", Object),
    ("vase", Object),
    ("scissors", Object),
    ("teddy bear", Object),
    ("hair drier", Object),
    ("toothbrush", Object),
    // Outdoor objects
    ("umbrella", Object),
    ("handbag", Object),
    ("tie", Object),
    ("suitcase", Object),
    ("frisbee", Object),
    ("skis", Object),
    ("snowboard", Object),
    ("sports ball", Object),
    ("kite", Object),
    ("baseball bat", Object),
    ("baseball glove", Object),
    ("skateboard", Object),
    ("surfboard", Object),
    ("tennis racket", Object),
    // Scene and environment
    ("indoor scene", Scene),
    ("outdoor scene", Scene),
    ("urban environment", Scene),
    ("natural environment", Scene),
    ("daytime scene", Scene),
    ("nighttime scene", Scene),
    ("sunset scene", Scene),
    ("sunrise scene", Scene),
    ("crowded scene", Scene),
    ("empty scene", Scene),
    ("busy environment", Scene),
    ("quiet environment", Scene),
    ("street scene", Scene),
    ("park scene", Scene),
    ("office scene", Scene),
    ("home scene", Scene),
    ("restaurant scene", Scene),
    // Actions and poses
    ("person standing", Action),
    ("person sitting", Action),
    ("person walking", Action),
    ("person running", Action),
    ("person jumping", Action),
    ("person dancing", Action),
    ("person exercising", Action),
    ("person working", Action),
    ("person using laptop", Action),
    ("person reading", Action),
    ("person writing", Action),
    ("person talking", Action),
    ("person smiling", Action),
    ("person laughing", Action),
    ("person looking", Action),
    // Device use
    ("person holding smartphone", DeviceUse),
    ("person using mobile phone", DeviceUse),
    ("person looking at phone screen", DeviceUse),
    ("person texting on phone", DeviceUse),
    ("person taking selfie", DeviceUse),
    ("person recording video", DeviceUse),
    ("person scrolling phone", DeviceUse),
    ("person holding phone up", DeviceUse),
    ("person holding phone down", DeviceUse),
    ("person using phone while walking", DeviceUse),
    ("person using phone while sitting", DeviceUse),
    // Composition
    ("close-up shot", Composition),
    ("wide shot", Composition),
    ("medium shot", Composition),
    ("group shot", Composition),
    ("solo shot", Composition),
    ("candid moment", Composition),
    ("posed shot", Composition),
    ("action shot", Composition),
    ("portrait shot", Composition),
    ("landscape shot", Composition),
];

/// Compact vocabulary: identity, basic scene context, and device use.
static COMPACT_LABELS: [(&str, LabelCategory); 19] = [
    ("subject close-up", Identity),
    ("subject from distance", Identity),
    ("subject smiling", Identity),
    ("subject talking", Identity),
    ("subject walking", Identity),
    ("subject sitting", Identity),
    ("subject standing", Identity),
    ("subject holding phone", Identity),
    ("subject using phone", Identity),
    ("indoor scene", Scene),
    ("outdoor scene", Scene),
    ("daytime scene", Scene),
    ("nighttime scene", Scene),
    ("person holding smartphone", DeviceUse),
    ("person using mobile phone", DeviceUse),
    ("person looking at phone screen", DeviceUse),
    ("person texting on phone", DeviceUse),
    ("person taking selfie", DeviceUse),
    ("person recording video", DeviceUse),
];
