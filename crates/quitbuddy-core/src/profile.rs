//! User profile and mascot companion.
//!
//! A [`UserProfile`] exists only once onboarding has completed. Profiles are
//! built from a [`ProfileDraft`], which is where zero or negative habit
//! figures are rejected; downstream arithmetic assumes validated values.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

pub const DEFAULT_CIGARETTES_PER_PACK: u32 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MascotType {
    Dragon,
    Fox,
    Sprout,
    Robot,
}

impl MascotType {
    /// Name given to a freshly hatched companion of this type.
    pub fn default_name(self) -> &'static str {
        match self {
            MascotType::Dragon => "Ember",
            MascotType::Fox => "Maple",
            MascotType::Sprout => "Bloom",
            MascotType::Robot => "Chip",
        }
    }

    pub fn personality(self) -> &'static str {
        match self {
            MascotType::Dragon => "Warm & motivating",
            MascotType::Fox => "Clever & supportive",
            MascotType::Sprout => "Calm & nurturing",
            MascotType::Robot => "Logical & encouraging",
        }
    }
}

impl std::str::FromStr for MascotType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dragon" => Ok(MascotType::Dragon),
            "fox" => Ok(MascotType::Fox),
            "sprout" => Ok(MascotType::Sprout),
            "robot" => Ok(MascotType::Robot),
            other => Err(ValidationError::invalid(
                "mascot.type",
                format!("unknown mascot '{other}'"),
            )),
        }
    }
}

/// Evolution stage. Ordered: a companion only ever moves forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MascotStage {
    Baby,
    Child,
    Teen,
    Adult,
}

impl MascotStage {
    /// Stage thresholds in consecutive smoke-free days.
    pub const THRESHOLDS: [(MascotStage, u32); 4] = [
        (MascotStage::Baby, 0),
        (MascotStage::Child, 7),
        (MascotStage::Teen, 30),
        (MascotStage::Adult, 90),
    ];

    /// Stage earned by a current streak of `days`.
    pub fn for_streak(days: u32) -> Self {
        Self::THRESHOLDS
            .iter()
            .rev()
            .find(|(_, min)| days >= *min)
            .map(|(stage, _)| *stage)
            .unwrap_or(MascotStage::Baby)
    }

    /// Days required to reach the next stage, if any.
    pub fn next_threshold(self) -> Option<(MascotStage, u32)> {
        Self::THRESHOLDS.iter().copied().find(|(stage, _)| *stage > self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MascotMood {
    Happy,
    Excited,
    Calm,
    Concerned,
    Celebrating,
    Sleeping,
}

impl Default for MascotMood {
    fn default() -> Self {
        MascotMood::Happy
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mascot {
    #[serde(rename = "type")]
    pub kind: MascotType,
    pub name: String,
    pub stage: MascotStage,
    pub mood: MascotMood,
    #[serde(default)]
    pub accessories: Vec<String>,
}

impl Mascot {
    pub fn hatch(kind: MascotType) -> Self {
        Self {
            kind,
            name: kind.default_name().to_string(),
            stage: MascotStage::Baby,
            mood: MascotMood::Happy,
            accessories: Vec::new(),
        }
    }

    /// Add an accessory id. Returns false when already worn.
    pub fn equip(&mut self, accessory: &str) -> bool {
        if self.accessories.iter().any(|a| a == accessory) {
            return false;
        }
        self.accessories.push(accessory.to_string());
        true
    }

    pub fn unequip(&mut self, accessory: &str) -> bool {
        let before = self.accessories.len();
        self.accessories.retain(|a| a != accessory);
        self.accessories.len() != before
    }
}

/// The singleton profile written at the end of onboarding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    pub cigarettes_per_day: u32,
    pub years_smoked: u32,
    pub cost_per_pack: f64,
    #[serde(default = "default_cigarettes_per_pack")]
    pub cigarettes_per_pack: u32,
    pub quit_date: NaiveDate,
    #[serde(default)]
    pub triggers: Vec<String>,
    #[serde(default)]
    pub motivations: Vec<String>,
    pub mascot: Mascot,
}

fn default_cigarettes_per_pack() -> u32 {
    DEFAULT_CIGARETTES_PER_PACK
}

impl UserProfile {
    /// Check the habit figures are all strictly positive.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.cigarettes_per_day == 0 {
            return Err(ValidationError::invalid("cigarettesPerDay", "must be greater than 0"));
        }
        if self.years_smoked == 0 {
            return Err(ValidationError::invalid("yearsSmoked", "must be greater than 0"));
        }
        if !(self.cost_per_pack.is_finite() && self.cost_per_pack > 0.0) {
            return Err(ValidationError::invalid("costPerPack", "must be greater than 0"));
        }
        if self.cigarettes_per_pack == 0 {
            return Err(ValidationError::invalid("cigarettesPerPack", "must be greater than 0"));
        }
        if self.mascot.name.trim().is_empty() {
            return Err(ValidationError::invalid("mascot.name", "must not be empty"));
        }
        Ok(())
    }
}

/// When the user intends to stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "mode", content = "date")]
pub enum QuitPlan {
    /// Quit today.
    Now,
    /// Quit on a chosen date, past or future.
    Later(NaiveDate),
}

/// Answers collected by the onboarding wizard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileDraft {
    #[serde(default)]
    pub age: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    pub cigarettes_per_day: u32,
    pub years_smoked: u32,
    pub cost_per_pack: f64,
    /// Pack size; `None` takes the configured default.
    #[serde(default)]
    pub cigarettes_per_pack: Option<u32>,
    pub quit_plan: QuitPlan,
    #[serde(default)]
    pub triggers: Vec<String>,
    #[serde(default)]
    pub motivations: Vec<String>,
    pub mascot: MascotType,
    /// Overrides the mascot's default name.
    #[serde(default)]
    pub mascot_name: Option<String>,
}

impl Default for ProfileDraft {
    fn default() -> Self {
        Self {
            age: None,
            gender: None,
            country: None,
            cigarettes_per_day: 10,
            years_smoked: 5,
            cost_per_pack: 12.0,
            cigarettes_per_pack: None,
            quit_plan: QuitPlan::Now,
            triggers: Vec::new(),
            motivations: Vec::new(),
            mascot: MascotType::Dragon,
            mascot_name: None,
        }
    }
}

impl ProfileDraft {
    /// Validate the draft and turn it into a profile.
    ///
    /// `today` resolves [`QuitPlan::Now`]; `default_pack_size` fills in a
    /// missing pack size and must itself be non-zero.
    pub fn build(self, today: NaiveDate, default_pack_size: u32) -> Result<UserProfile, ValidationError> {
        let cigarettes_per_pack = match self.cigarettes_per_pack {
            Some(n) => n,
            None if default_pack_size > 0 => default_pack_size,
            None => DEFAULT_CIGARETTES_PER_PACK,
        };
        let mut mascot = Mascot::hatch(self.mascot);
        if let Some(name) = self.mascot_name {
            mascot.name = name.trim().to_string();
        }
        let profile = UserProfile {
            id: uuid::Uuid::new_v4().to_string(),
            age: self.age,
            gender: self.gender,
            country: self.country,
            cigarettes_per_day: self.cigarettes_per_day,
            years_smoked: self.years_smoked,
            cost_per_pack: self.cost_per_pack,
            cigarettes_per_pack,
            quit_date: match self.quit_plan {
                QuitPlan::Now => today,
                QuitPlan::Later(date) => date,
            },
            triggers: dedup(self.triggers),
            motivations: dedup(self.motivations),
            mascot,
        };
        profile.validate()?;
        Ok(profile)
    }
}

/// Drop blanks and repeats, keeping first-seen order.
fn dedup(items: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(items.len());
    for item in items {
        let item = item.trim().to_string();
        if !item.is_empty() && !out.contains(&item) {
            out.push(item);
        }
    }
    out
}
