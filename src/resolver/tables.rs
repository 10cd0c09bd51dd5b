//! Static lookup tables.
//!
//! All tables are ordered slices: the first entry whose key is contained in
//! the text wins, so entry order is the matching priority.

/// English key phrase → topic slug. Aliases share a slug.
pub const TOPICS: &[(&str, &str)] = &[
    ("photosynthesis", "photosynthesis"),
    ("water cycle", "water-cycle"),
    ("water-cycle", "water-cycle"),
    ("newtons law", "newtons-law"),
    ("newton's law", "newtons-law"),
];

/// Lower-cased human language label → ISO code.
pub const LANGUAGE_LABELS: &[(&str, &str)] = &[
    ("english", "en"),
    ("us english", "en"),
    ("chinese", "zh"),
    ("malay", "ms"),
    ("tamil", "ta"),
];

pub const KNOWLEDGE: &[(&str, &str)] = &[
    (
        "photosynthesis",
        "Photosynthesis is the process where plants convert sunlight, water, and carbon dioxide into oxygen and glucose (sugar) using chlorophyll in their chloroplasts. This is essential for plant growth and oxygen production.",
    ),
    (
        "water cycle",
        "The water cycle describes the continuous movement of water on Earth through evaporation, condensation, precipitation, and collection. Water evaporates from surfaces, forms clouds, falls as rain/snow, and returns to oceans and rivers.",
    ),
    (
        "newton",
        "Newton's three laws of motion: 1) Objects at rest stay at rest, 2) Force equals mass times acceleration (F=ma), 3) Every action has an equal and opposite reaction. These laws form the foundation of classical mechanics.",
    ),
    (
        "math",
        "Mathematics is the study of numbers, quantities, shapes, and patterns. It includes algebra, calculus, geometry, statistics, and many other branches that help us understand and describe the world.",
    ),
    (
        "algebra",
        "Algebra is a branch of mathematics that uses symbols and letters to represent numbers and quantities in formulas and equations. It helps solve problems involving unknown variables.",
    ),
    (
        "physics",
        "Physics is the natural science that studies matter, energy, motion, and forces. It explains how the universe behaves through concepts like gravity, electromagnetism, and quantum mechanics.",
    ),
    (
        "chemistry",
        "Chemistry is the study of matter, its properties, composition, and changes. It involves elements, compounds, atoms, molecules, and chemical reactions.",
    ),
    (
        "biology",
        "Biology is the science of life and living organisms, including their structure, function, growth, evolution, and distribution. It covers cells, genetics, ecology, and more.",
    ),
];

pub const DEFAULT_KNOWLEDGE: &str = "I'd be happy to explain that concept! This AI tutor demonstrates full integration with AWS services including Lambda, API Gateway, S3, and translation services.";

/// ISO code → synthesis voice.
pub const VOICES: &[(&str, &str)] = &[("zh", "Zhiyu"), ("ms", "Amee"), ("ta", "Aditi")];

pub const DEFAULT_VOICE: &str = "Joanna";

fn first_contained<'a>(table: &'a [(&str, &str)], text: &str) -> Option<&'a str> {
    table
        .iter()
        .find(|(key, _)| text.contains(key))
        .map(|(_, value)| *value)
}

fn exact<'a>(table: &'a [(&str, &str)], key: &str) -> Option<&'a str> {
    table
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, value)| *value)
}

/// Topic slug for a lower-cased English message.
pub fn match_topic(english_lower: &str) -> Option<&'static str> {
    first_contained(TOPICS, english_lower)
}

/// Canned explanation for a lower-cased message, or the fallback text.
pub fn match_knowledge(message_lower: &str) -> &'static str {
    first_contained(KNOWLEDGE, message_lower).unwrap_or(DEFAULT_KNOWLEDGE)
}

pub fn language_code(label: &str) -> Option<&'static str> {
    exact(LANGUAGE_LABELS, &label.to_lowercase())
}

pub fn voice_for(language_code: &str) -> &'static str {
    exact(VOICES, language_code).unwrap_or(DEFAULT_VOICE)
}
