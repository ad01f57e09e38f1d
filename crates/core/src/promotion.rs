//! Promotion entity, identity model and the overlap/identity resolver.
//!
//! Everything here is pure: the resolver never touches storage, it only looks
//! at the candidate being written and the population the caller hands it.
//! The service layer is responsible for fetching that population and for
//! holding the write lock while the check and the write happen.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{DbId, Timestamp};

/// Longest accepted promotion code.
pub const MAX_PROMOTION_CODE_LEN: usize = 64;

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

/// A stored promotion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Promotion {
    pub id: DbId,
    pub promotion_code: Option<String>,
    pub name: String,
    pub discount_type: String,
    pub discount_value: f64,
    pub start_date: Timestamp,
    pub end_date: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Promotion {
    pub fn window(&self) -> ActiveWindow {
        ActiveWindow::new(self.start_date, self.end_date)
    }

    /// Overwrite every mutable field with the payload's values.
    ///
    /// `id` and `promotion_code` are left untouched.
    fn apply(&mut self, input: PromotionInput) {
        self.name = input.name;
        self.discount_type = input.discount_type;
        self.discount_value = input.discount_value;
        self.start_date = input.start_date;
        self.end_date = input.end_date;
    }
}

/// Payload for creating a promotion or fully replacing its mutable fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromotionInput {
    #[serde(default)]
    pub promotion_code: Option<String>,
    pub name: String,
    pub discount_type: String,
    pub discount_value: f64,
    pub start_date: Timestamp,
    pub end_date: Timestamp,
}

impl PromotionInput {
    pub fn window(&self) -> ActiveWindow {
        ActiveWindow::new(self.start_date, self.end_date)
    }
}

// ---------------------------------------------------------------------------
// Active window
// ---------------------------------------------------------------------------

/// Inclusive `[start, end]` interval during which a promotion is in effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ActiveWindow {
    pub start: Timestamp,
    pub end: Timestamp,
}

impl ActiveWindow {
    pub fn new(start: Timestamp, end: Timestamp) -> Self {
        Self { start, end }
    }

    /// Inclusive intersection test. Windows that only touch at an endpoint
    /// still overlap.
    pub fn overlaps(&self, other: &ActiveWindow) -> bool {
        self.start <= other.end && self.end >= other.start
    }
}

impl fmt::Display for ActiveWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}, {}]",
            self.start.to_rfc3339(),
            self.end.to_rfc3339()
        )
    }
}

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

/// Which identity a deployment addresses promotions by.
///
/// The mode also decides the overlap scope: per promotion code for
/// `BusinessKey`, the whole table for `SurrogateId`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IdentityMode {
    #[default]
    BusinessKey,
    SurrogateId,
}

impl IdentityMode {
    pub fn as_str(self) -> &'static str {
        match self {
            IdentityMode::BusinessKey => "business_key",
            IdentityMode::SurrogateId => "surrogate_id",
        }
    }

    /// Interpret a raw path segment as a key in this mode.
    pub fn parse_key(self, raw: &str) -> Result<PromotionKey, CoreError> {
        match self {
            IdentityMode::BusinessKey => {
                if raw.trim().is_empty() {
                    return Err(CoreError::Validation(
                        "promotion_code must not be empty".into(),
                    ));
                }
                Ok(PromotionKey::Code(raw.to_string()))
            }
            IdentityMode::SurrogateId => raw
                .parse::<DbId>()
                .map(PromotionKey::Id)
                .map_err(|_| CoreError::Validation(format!("Invalid promotion ID: {raw}"))),
        }
    }
}

impl FromStr for IdentityMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "business_key" => Ok(IdentityMode::BusinessKey),
            "surrogate_id" => Ok(IdentityMode::SurrogateId),
            other => Err(format!(
                "unknown identity mode '{other}' (expected 'business_key' or 'surrogate_id')"
            )),
        }
    }
}

impl fmt::Display for IdentityMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A lookup key for a single promotion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromotionKey {
    Id(DbId),
    Code(String),
}

impl fmt::Display for PromotionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PromotionKey::Id(id) => write!(f, "id {id}"),
            PromotionKey::Code(code) => write!(f, "promotion_code {code}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Field-level checks shared by create and update.
pub fn validate_fields(input: &PromotionInput) -> Result<(), CoreError> {
    if input.name.trim().is_empty() {
        return Err(CoreError::Validation("name is required".into()));
    }
    if !input.discount_value.is_finite() || input.discount_value < 0.0 {
        return Err(CoreError::Validation(format!(
            "discount_value must be a non-negative number, got {}",
            input.discount_value
        )));
    }
    if input.start_date > input.end_date {
        return Err(CoreError::Validation(
            "start_date must not be after end_date".into(),
        ));
    }
    if let Some(code) = &input.promotion_code {
        if code.trim().is_empty() {
            return Err(CoreError::Validation(
                "promotion_code must not be empty".into(),
            ));
        }
        if code.chars().count() > MAX_PROMOTION_CODE_LEN {
            return Err(CoreError::Validation(format!(
                "promotion_code must be at most {MAX_PROMOTION_CODE_LEN} characters"
            )));
        }
    }
    Ok(())
}

/// Validate a create payload. Business-key deployments require a code.
pub fn validate_create(input: &PromotionInput, mode: IdentityMode) -> Result<(), CoreError> {
    validate_fields(input)?;
    if mode == IdentityMode::BusinessKey && input.promotion_code.is_none() {
        return Err(CoreError::Validation("promotion_code is required".into()));
    }
    Ok(())
}

/// Build the post-update record: `current` with every mutable field taken
/// from `input`. Partial updates are not supported.
///
/// The business key is immutable, so a payload code must either be absent or
/// equal to the stored one.
pub fn merge_update(current: &Promotion, input: PromotionInput) -> Result<Promotion, CoreError> {
    validate_fields(&input)?;
    if let Some(code) = &input.promotion_code {
        if current.promotion_code.as_deref() != Some(code.as_str()) {
            return Err(CoreError::Validation(
                "promotion_code cannot be changed".into(),
            ));
        }
    }
    let mut merged = current.clone();
    merged.apply(input);
    Ok(merged)
}

// ---------------------------------------------------------------------------
// Resolver
// ---------------------------------------------------------------------------

/// The record being written, as seen by the overlap check.
#[derive(Debug, Clone, Copy)]
pub struct Candidate<'a> {
    pub promotion_code: Option<&'a str>,
    pub window: ActiveWindow,
}

impl<'a> From<&'a PromotionInput> for Candidate<'a> {
    fn from(input: &'a PromotionInput) -> Self {
        Candidate {
            promotion_code: input.promotion_code.as_deref(),
            window: input.window(),
        }
    }
}

impl<'a> From<&'a Promotion> for Candidate<'a> {
    fn from(promotion: &'a Promotion) -> Self {
        Candidate {
            promotion_code: promotion.promotion_code.as_deref(),
            window: promotion.window(),
        }
    }
}

/// The stored record a candidate collides with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlapConflict {
    pub id: DbId,
    pub promotion_code: Option<String>,
    pub window: ActiveWindow,
}

impl fmt::Display for OverlapConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.promotion_code {
            Some(code) => write!(
                f,
                "promotion {} ({code}) is already active during {}",
                self.id, self.window
            ),
            None => write!(
                f,
                "promotion {} is already active during {}",
                self.id, self.window
            ),
        }
    }
}

impl From<OverlapConflict> for CoreError {
    fn from(conflict: OverlapConflict) -> Self {
        CoreError::Conflict(format!("Overlapping promotion found: {conflict}"))
    }
}

/// Decides whether a candidate's active window collides with another stored
/// promotion in the same identity scope.
#[derive(Debug, Clone, Copy, Default)]
pub struct PromotionConflictResolver {
    mode: IdentityMode,
}

impl PromotionConflictResolver {
    pub fn new(mode: IdentityMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> IdentityMode {
        self.mode
    }

    fn in_scope(&self, candidate: &Candidate<'_>, other: &Promotion) -> bool {
        match self.mode {
            IdentityMode::SurrogateId => true,
            IdentityMode::BusinessKey => matches!(
                (candidate.promotion_code, other.promotion_code.as_deref()),
                (Some(a), Some(b)) if a == b
            ),
        }
    }

    /// Return the first record in `existing` that shares the candidate's
    /// scope and whose window overlaps it. `exclude_id` is skipped, so an
    /// update never collides with its own stored state.
    pub fn check_overlap(
        &self,
        candidate: &Candidate<'_>,
        existing: &[Promotion],
        exclude_id: Option<DbId>,
    ) -> Option<OverlapConflict> {
        existing
            .iter()
            .filter(|p| Some(p.id) != exclude_id)
            .filter(|p| self.in_scope(candidate, p))
            .find(|p| candidate.window.overlaps(&p.window()))
            .map(|p| OverlapConflict {
                id: p.id,
                promotion_code: p.promotion_code.clone(),
                window: p.window(),
            })
    }

    /// [`check_overlap`](Self::check_overlap) as a `Result`.
    pub fn ensure_no_overlap(
        &self,
        candidate: &Candidate<'_>,
        existing: &[Promotion],
        exclude_id: Option<DbId>,
    ) -> Result<(), CoreError> {
        match self.check_overlap(candidate, existing, exclude_id) {
            Some(conflict) => {
                tracing::debug!(
                    conflicting_id = conflict.id,
                    window = %conflict.window,
                    "Promotion write rejected: overlapping window",
                );
                Err(conflict.into())
            }
            None => Ok(()),
        }
    }
}

/// First record whose code equals `key` exactly, in iteration order.
///
/// Codes are not assumed unique, so callers get whichever match comes first.
pub fn resolve_by_business_key<'a>(
    key: &str,
    existing: &'a [Promotion],
) -> Result<&'a Promotion, CoreError> {
    existing
        .iter()
        .find(|p| p.promotion_code.as_deref() == Some(key))
        .ok_or_else(|| CoreError::promotion_not_found(PromotionKey::Code(key.to_string())))
}

pub fn resolve_by_surrogate_id(id: DbId, existing: &[Promotion]) -> Result<&Promotion, CoreError> {
    existing
        .iter()
        .find(|p| p.id == id)
        .ok_or_else(|| CoreError::promotion_not_found(PromotionKey::Id(id)))
}

/// Presentation order: ascending `start_date`, ties broken by `id`.
pub fn sort_by_start_date(promotions: &mut [Promotion]) {
    promotions.sort_by(|a, b| a.start_date.cmp(&b.start_date).then(a.id.cmp(&b.id)));
}
