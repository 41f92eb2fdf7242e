//! Keyword-based discovery of which activities a named effect applies to.
//!
//! Items and buildings carry free-form effect names such as
//! `woodcutting_speed` or `productivity`. An effect applies to an activity
//! when its name contains the activity id, or when it contains one of the
//! keywords in [`KEYWORDS`]. Matching is case-insensitive substring
//! matching, so it over-matches: `crafting_efficiency` also applies to
//! mining because `efficiency` is a keyword for every gathering trade. The
//! tests below pin that behaviour.

/// Which activities a keyword covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeywordScope {
    /// Only the listed activity ids.
    Activities(&'static [&'static str]),
    /// Every activity.
    All,
}

/// The fixed keyword table.
pub const KEYWORDS: &[(&str, KeywordScope)] = &[
    (
        "efficiency",
        KeywordScope::Activities(&["crafting", "woodcutting", "mining", "hunting", "fishing"]),
    ),
    ("bonus", KeywordScope::All),
    ("productivity", KeywordScope::All),
];

/// Why an effect does or does not apply to an activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectTarget {
    /// The effect name contains the activity id.
    Activity,
    /// A keyword in the name lists the activity.
    KeywordSet(&'static str),
    /// A keyword in the name covers every activity.
    AllActivities(&'static str),
    /// No match.
    Unrelated,
}

impl EffectTarget {
    /// Whether the effect applies.
    pub const fn applies(self) -> bool {
        !matches!(self, Self::Unrelated)
    }
}

/// Classify a named effect against an activity id.
pub fn classify(effect_name: &str, activity: &str) -> EffectTarget {
    let name = effect_name.to_ascii_lowercase();
    let activity = activity.to_ascii_lowercase();
    if !activity.is_empty() && name.contains(&activity) {
        return EffectTarget::Activity;
    }
    for (keyword, scope) in KEYWORDS {
        if !name.contains(keyword) {
            continue;
        }
        match scope {
            KeywordScope::All => return EffectTarget::AllActivities(keyword),
            KeywordScope::Activities(list) => {
                if list.iter().any(|a| *a == activity) {
                    return EffectTarget::KeywordSet(keyword);
                }
            }
        }
    }
    EffectTarget::Unrelated
}

/// Shorthand for `classify(effect_name, activity).applies()`.
pub fn applies_to(effect_name: &str, activity: &str) -> bool {
    classify(effect_name, activity).applies()
}
