use std::fmt;

/// Canonical article categories.
///
/// Remote categories are free text ("Technology and Innovation",
/// "Sports & Athletics", ...), so both feed filtering and display labeling
/// go through the single `classify` function instead of each doing its own
/// string matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Technology,
    Business,
    Sports,
    National,
    Other,
}

/// Ordered keyword rules: first match wins. Kept ordered so that a string
/// like "National Business News" classifies deterministically.
const RULES: &[(Category, &[&str])] = &[
    (Category::Technology, &["tech", "innovation", "science", "digital"]),
    (Category::Business, &["business", "corporate", "econom", "finance", "market"]),
    (Category::Sports, &["sport", "athletic", "cricket", "football"]),
    (Category::National, &["national", "pakistan", "politic"]),
];

impl Category {
    /// Classify a noisy free-text category string into a canonical category.
    /// Matching is case-insensitive substring; unmatched strings fall into
    /// `Other`.
    pub fn classify(raw: &str) -> Category {
        let lowered = raw.to_lowercase();
        for (category, keywords) in RULES {
            if keywords.iter().any(|k| lowered.contains(k)) {
                return *category;
            }
        }
        Category::Other
    }

    /// Human-readable section heading
    pub fn display_name(&self) -> &'static str {
        match self {
            Category::Technology => "Technology & Innovation",
            Category::Business => "Business & Corporate",
            Category::Sports => "Sports & Athletics",
            Category::National => "National News",
            Category::Other => "Other News",
        }
    }

    /// Key used for feed filtering (substring-matched against the stored
    /// category field)
    pub fn feed_key(&self) -> &'static str {
        match self {
            Category::Technology => "technology",
            Category::Business => "business",
            Category::Sports => "sports",
            Category::National => "national",
            Category::Other => "other",
        }
    }

    /// All categories with a dedicated feed section
    pub fn all() -> &'static [Category] {
        &[
            Category::Sports,
            Category::Technology,
            Category::National,
            Category::Business,
        ]
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}
