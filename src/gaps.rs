/*!
 * Gap analysis and establishment recommendations
 *
 * Operates only on `(city, specialty)` pairs with no coverage. Demand,
 * priority, investment and timeframe figures come from `GapPolicy`, a named
 * set of per-specialty lookup tables: policy constants, not values derived
 * from the registry. Deployments can override any table (e.g. via the
 * configuration file) without touching the algorithm.
 */

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::data_types::{CityKey, CoverageSnapshot};
use crate::error::{MatrixError, Result};

/// Establishment priority bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    /// Bucket a raw policy score: High above 0.7, Medium above 0.4, Low otherwise
    pub fn from_score(score: f64) -> Self {
        if score > 0.7 {
            Priority::High
        } else if score > 0.4 {
            Priority::Medium
        } else {
            Priority::Low
        }
    }

    /// The planning recommendation attached to this bucket
    pub fn recommendation(&self) -> &'static str {
        match self {
            Priority::High => "High Priority - Establish Service",
            Priority::Medium => "Medium Priority - Consider Partnership",
            Priority::Low => "Low Priority - Monitor Demand",
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Priority::High => write!(f, "High"),
            Priority::Medium => write!(f, "Medium"),
            Priority::Low => write!(f, "Low"),
        }
    }
}

/// Per-specialty planning policy tables with explicit defaults
///
/// Unlisted specialties fall back to the `default_*` figures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GapPolicy {
    #[serde(default)]
    pub demand_multipliers: IndexMap<String, f64>,
    #[serde(default = "default_demand_multiplier")]
    pub default_demand_multiplier: f64,

    #[serde(default)]
    pub priority_scores: IndexMap<String, f64>,
    #[serde(default = "default_priority_score")]
    pub default_priority_score: f64,

    #[serde(default)]
    pub investment_ranges: IndexMap<String, String>,
    #[serde(default = "default_investment_range")]
    pub default_investment_range: String,

    #[serde(default)]
    pub timeframes: IndexMap<String, String>,
    #[serde(default = "default_timeframe")]
    pub default_timeframe: String,
}

fn default_demand_multiplier() -> f64 {
    0.4
}

fn default_priority_score() -> f64 {
    0.4
}

fn default_investment_range() -> String {
    "₹30L - ₹1Cr".to_string()
}

fn default_timeframe() -> String {
    "6-12 months".to_string()
}

impl Default for GapPolicy {
    fn default() -> Self {
        let demand_multipliers: IndexMap<String, f64> = [
            ("General Medicine", 0.8),
            ("General Surgery", 0.7),
            ("Cardiology", 0.5),
            ("Neurology", 0.3),
            ("Oncology", 0.2),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();

        let priority_scores: IndexMap<String, f64> = [
            ("Emergency Medicine", 0.9),
            ("General Medicine", 0.8),
            ("General Surgery", 0.8),
            ("Cardiology", 0.7),
            ("Orthopedics", 0.6),
            ("Gynecology & Obstetrics", 0.7),
            ("Pediatrics", 0.7),
            ("Neurology", 0.5),
            ("Oncology", 0.4),
            ("Psychiatry", 0.5),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();

        let investment_ranges: IndexMap<String, String> = [
            ("Emergency Medicine", "₹50L - ₹1Cr"),
            ("General Medicine", "₹20L - ₹50L"),
            ("General Surgery", "₹30L - ₹80L"),
            ("Cardiology", "₹1Cr - ₹3Cr"),
            ("Neurology", "₹80L - ₹2Cr"),
            ("Oncology", "₹2Cr - ₹5Cr"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let timeframes: IndexMap<String, String> = [
            ("General Medicine", "3-6 months"),
            ("General Surgery", "6-9 months"),
            ("Emergency Medicine", "6-12 months"),
            ("Cardiology", "12-18 months"),
            ("Neurology", "12-24 months"),
            ("Oncology", "18-36 months"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        Self {
            demand_multipliers,
            default_demand_multiplier: default_demand_multiplier(),
            priority_scores,
            default_priority_score: default_priority_score(),
            investment_ranges,
            default_investment_range: default_investment_range(),
            timeframes,
            default_timeframe: default_timeframe(),
        }
    }
}

impl GapPolicy {
    pub fn demand_multiplier(&self, specialty: &str) -> f64 {
        self.demand_multipliers
            .get(specialty)
            .copied()
            .unwrap_or(self.default_demand_multiplier)
    }

    pub fn priority_score(&self, specialty: &str) -> f64 {
        self.priority_scores
            .get(specialty)
            .copied()
            .unwrap_or(self.default_priority_score)
    }

    pub fn investment_range(&self, specialty: &str) -> &str {
        self.investment_ranges
            .get(specialty)
            .map(String::as_str)
            .unwrap_or(&self.default_investment_range)
    }

    pub fn timeframe(&self, specialty: &str) -> &str {
        self.timeframes
            .get(specialty)
            .map(String::as_str)
            .unwrap_or(&self.default_timeframe)
    }
}

/// Planning recommendation for one coverage gap
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GapRecommendation {
    pub city: CityKey,
    pub specialty: String,
    /// Up to 3 cities where the specialty is offered, in index order; the
    /// registry has no real distance metric, so these are not geographically
    /// sorted.
    pub nearest_alternatives: Vec<CityKey>,
    /// First 2 of the nearest alternatives, suggested as referral partners
    pub partnership_opportunities: Vec<CityKey>,
    /// Estimated annual demand: hospitals in the city times the specialty's
    /// baseline multiplier, rounded to 2 decimals
    pub potential_demand: f64,
    pub priority_score: f64,
    pub priority: Priority,
    pub recommendation: String,
    pub estimated_investment: String,
    pub timeframe: String,
}

/// Compute the recommendation for a `(city, specialty)` coverage gap
///
/// Returns an error when the city or specialty is unknown to the snapshot,
/// or when the pair already has coverage; a covered cell must never produce
/// a misleading "gap" result.
pub fn gap_recommendation(
    snapshot: &CoverageSnapshot,
    city: &CityKey,
    specialty: &str,
    policy: &GapPolicy,
) -> Result<GapRecommendation> {
    let city_stats = snapshot
        .city(city)
        .ok_or_else(|| MatrixError::UnknownCity { key: city.to_string() })?;

    if snapshot.specialty(specialty).is_none() {
        return Err(MatrixError::UnknownSpecialty { name: specialty.to_string() });
    }

    if let Some(cell) = snapshot.cell(city, specialty) {
        if cell.count > 0 {
            return Err(MatrixError::coverage_exists(city.as_str(), specialty, cell.count));
        }
    }

    let nearest_alternatives: Vec<CityKey> = snapshot
        .cities
        .iter()
        .filter(|c| {
            snapshot
                .cell(&c.key, specialty)
                .map(|cell| cell.count > 0)
                .unwrap_or(false)
        })
        .take(3)
        .map(|c| c.key.clone())
        .collect();

    let partnership_opportunities: Vec<CityKey> =
        nearest_alternatives.iter().take(2).cloned().collect();

    let multiplier = policy.demand_multiplier(specialty);
    let potential_demand = round2(city_stats.hospital_count as f64 * multiplier);

    let priority_score = policy.priority_score(specialty);
    let priority = Priority::from_score(priority_score);

    Ok(GapRecommendation {
        city: city.clone(),
        specialty: specialty.to_string(),
        nearest_alternatives,
        partnership_opportunities,
        potential_demand,
        priority_score,
        priority,
        recommendation: priority.recommendation().to_string(),
        estimated_investment: policy.investment_range(specialty).to_string(),
        timeframe: policy.timeframe(specialty).to_string(),
    })
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
