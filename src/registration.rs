// ♟️ Registration Input - what the form hands to the core
// One immutable snapshot per submission attempt

use std::fmt;
use std::str::FromStr;

// ============================================================================
// EXPERIENCE LEVEL
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExperienceLevel {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

impl ExperienceLevel {
    pub const ALL: [ExperienceLevel; 4] = [
        ExperienceLevel::Beginner,
        ExperienceLevel::Intermediate,
        ExperienceLevel::Advanced,
        ExperienceLevel::Expert,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExperienceLevel::Beginner => "Beginner",
            ExperienceLevel::Intermediate => "Intermediate",
            ExperienceLevel::Advanced => "Advanced",
            ExperienceLevel::Expert => "Expert",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            ExperienceLevel::Beginner => ExperienceLevel::Intermediate,
            ExperienceLevel::Intermediate => ExperienceLevel::Advanced,
            ExperienceLevel::Advanced => ExperienceLevel::Expert,
            ExperienceLevel::Expert => ExperienceLevel::Beginner,
        }
    }

    pub fn previous(&self) -> Self {
        match self {
            ExperienceLevel::Beginner => ExperienceLevel::Expert,
            ExperienceLevel::Intermediate => ExperienceLevel::Beginner,
            ExperienceLevel::Advanced => ExperienceLevel::Intermediate,
            ExperienceLevel::Expert => ExperienceLevel::Advanced,
        }
    }
}

impl fmt::Display for ExperienceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExperienceLevel {
    type Err = UnknownChoice;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        ExperienceLevel::ALL
            .iter()
            .copied()
            .find(|level| level.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownChoice {
                kind: "experience level",
                value: s.to_string(),
            })
    }
}

// ============================================================================
// TOURNAMENT CATEGORY
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TournamentCategory {
    Open,
    Under18,
    Under16,
    Under14,
    Senior,
    Women,
}

impl TournamentCategory {
    pub const ALL: [TournamentCategory; 6] = [
        TournamentCategory::Open,
        TournamentCategory::Under18,
        TournamentCategory::Under16,
        TournamentCategory::Under14,
        TournamentCategory::Senior,
        TournamentCategory::Women,
    ];

    /// Label as shown in the form and written to the log
    pub fn as_str(&self) -> &'static str {
        match self {
            TournamentCategory::Open => "Open",
            TournamentCategory::Under18 => "Under 18",
            TournamentCategory::Under16 => "Under 16",
            TournamentCategory::Under14 => "Under 14",
            TournamentCategory::Senior => "Senior (50+)",
            TournamentCategory::Women => "Women's",
        }
    }
}

impl fmt::Display for TournamentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TournamentCategory {
    type Err = UnknownChoice;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        TournamentCategory::ALL
            .iter()
            .copied()
            .find(|category| category.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownChoice {
                kind: "tournament category",
                value: s.to_string(),
            })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: {value:?}")]
pub struct UnknownChoice {
    pub kind: &'static str,
    pub value: String,
}

// ============================================================================
// REGISTRATION INPUT
// ============================================================================

/// Raw field values of one submission attempt.
///
/// Empty or whitespace-only strings are the only signal of "not provided".
/// Callers must not forward placeholder hints as values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationInput {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub age_text: String,
    pub rating_text: String,
    pub experience_level: ExperienceLevel,
    /// Label of a [`TournamentCategory`]; empty when nothing was selected
    pub category: String,
    pub emergency_contact: String,
    pub notes: String,
}

impl RegistrationInput {
    /// Selected category, if the label is one of the fixed set
    pub fn tournament_category(&self) -> Option<TournamentCategory> {
        self.category.parse().ok()
    }
}

// ============================================================================
// TESTS
// ============================================================================
