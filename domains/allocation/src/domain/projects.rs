//! Project range parsing
//!
//! Turns operator input such as `"1,3,5-8"` into an ascending, de-duplicated
//! [`ProjectSet`]. Parsing is strict: one malformed token rejects the whole
//! expression. [`parse_projects_lenient`] keeps the skip-and-report behaviour
//! for importing legacy lines.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::error::AllocationError;
use super::limits::LineLimits;

/// Ascending sequence of distinct positive project numbers
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<u32>", into = "Vec<u32>")]
pub struct ProjectSet(Vec<u32>);

impl ProjectSet {
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.0.iter().copied()
    }

    pub fn contains(&self, project_no: u32) -> bool {
        self.0.binary_search(&project_no).is_ok()
    }

    fn from_set(set: BTreeSet<u32>) -> Self {
        Self(set.into_iter().collect())
    }
}

impl TryFrom<Vec<u32>> for ProjectSet {
    type Error = AllocationError;

    /// Accepts numbers in any order; zero is rejected
    fn try_from(numbers: Vec<u32>) -> Result<Self, Self::Error> {
        if numbers.contains(&0) {
            return Err(AllocationError::malformed_range(
                "0",
                "project numbers start at 1",
            ));
        }
        Ok(Self::from_set(numbers.into_iter().collect()))
    }
}

impl From<ProjectSet> for Vec<u32> {
    fn from(set: ProjectSet) -> Self {
        set.0
    }
}

/// Compact form: runs of three or more consecutive numbers collapse to `a-b`
impl std::fmt::Display for ProjectSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut parts = Vec::new();
        let mut i = 0;
        while i < self.0.len() {
            let start = self.0[i];
            let mut j = i;
            while j + 1 < self.0.len() && self.0[j + 1] == self.0[j] + 1 {
                j += 1;
            }
            match j - i {
                0 => parts.push(start.to_string()),
                1 => {
                    parts.push(start.to_string());
                    parts.push(self.0[j].to_string());
                }
                _ => parts.push(format!("{}-{}", start, self.0[j])),
            }
            i = j + 1;
        }
        f.write_str(&parts.join(","))
    }
}

/// Result of a lenient parse: what was understood and what was dropped
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LenientParse {
    pub projects: ProjectSet,
    pub rejected: Vec<String>,
}

/// Inclusive bounds of one comma-separated token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct TokenRange {
    start: u32,
    end: u32,
}

impl TokenRange {
    fn span(&self) -> u64 {
        u64::from(self.end - self.start) + 1
    }
}

/// Parse a project expression strictly.
///
/// Empty or whitespace-only input yields an empty set. Stray commas
/// (`"1,,3"`, `"1,2,"`) are ignored; anything else that is not a positive
/// integer or an ascending `start-end` range fails with `MalformedRange`.
pub fn parse_projects(text: &str) -> Result<ProjectSet, AllocationError> {
    let mut set = BTreeSet::new();
    for token in tokens(text) {
        let range = parse_token(token)?;
        set.extend(range.start..=range.end);
    }
    Ok(ProjectSet::from_set(set))
}

/// Parse strictly and apply the per-line policy.
///
/// A range wider than `max_range_span` is rejected before it is expanded.
pub fn parse_projects_with_limits(
    text: &str,
    limits: &LineLimits,
) -> Result<ProjectSet, AllocationError> {
    let mut set = BTreeSet::new();
    for token in tokens(text) {
        let range = parse_token(token)?;
        if range.span() > u64::from(limits.max_range_span) {
            return Err(AllocationError::malformed_range(
                token,
                &format!(
                    "a range may cover at most {} projects",
                    limits.max_range_span
                ),
            ));
        }
        set.extend(range.start..=range.end);
        limits.check_project_count(set.len())?;
    }
    Ok(ProjectSet::from_set(set))
}

/// Parse what can be parsed and report the rest.
pub fn parse_projects_lenient(text: &str) -> LenientParse {
    let mut set = BTreeSet::new();
    let mut rejected = Vec::new();
    for token in tokens(text) {
        match parse_token(token) {
            Ok(range) => set.extend(range.start..=range.end),
            Err(_) => rejected.push(token.to_string()),
        }
    }
    if !rejected.is_empty() {
        tracing::debug!(?rejected, "Skipped malformed project tokens");
    }
    LenientParse {
        projects: ProjectSet::from_set(set),
        rejected,
    }
}

fn tokens(text: &str) -> impl Iterator<Item = &str> {
    text.split(',').map(str::trim).filter(|t| !t.is_empty())
}

fn parse_token(token: &str) -> Result<TokenRange, AllocationError> {
    match token.split_once('-') {
        Some((start, end)) => {
            let start = parse_project_number(start.trim())
                .map_err(|reason| AllocationError::malformed_range(token, reason))?;
            let end = parse_project_number(end.trim())
                .map_err(|reason| AllocationError::malformed_range(token, reason))?;
            if start > end {
                return Err(AllocationError::malformed_range(
                    token,
                    "range start is greater than its end",
                ));
            }
            Ok(TokenRange { start, end })
        }
        None => {
            let n = parse_project_number(token)
                .map_err(|reason| AllocationError::malformed_range(token, reason))?;
            Ok(TokenRange { start: n, end: n })
        }
    }
}

fn parse_project_number(raw: &str) -> Result<u32, &'static str> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err("expected a positive whole number");
    }
    match raw.parse::<u32>() {
        Ok(0) => Err("project numbers start at 1"),
        Ok(n) => Ok(n),
        Err(_) => Err("project number is too large"),
    }
}
