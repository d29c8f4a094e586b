//! Per-module payload schemas and module identity.
//!
//! # Responsibility
//! - Name every syncable module and map it to its remote document name and
//!   local slice keys.
//! - Define the versioned payload structs that travel between the local
//!   store and the remote module store.
//!
//! # Invariants
//! - Payloads always carry a schema `version`; absent fields in persisted
//!   JSON decode to version 1.
//! - JSON field names match the persisted layout exactly, so loading old
//!   data and writing it back is lossless.
//!
//! # See also
//! - docs/architecture/data-model.md

use crate::model::relationship::{Relationship, EVALUATION_CRITERIA};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Current payload schema version.
pub const PAYLOAD_VERSION: u32 = 1;

fn default_version() -> u32 {
    PAYLOAD_VERSION
}

/// Identity of one syncable module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModuleKind {
    People,
    Decisions,
    Career,
    Finance,
    Skills,
    TimeEnergy,
    Vocabulary,
}

impl ModuleKind {
    pub const ALL: [ModuleKind; 7] = [
        ModuleKind::People,
        ModuleKind::Decisions,
        ModuleKind::Career,
        ModuleKind::Finance,
        ModuleKind::Skills,
        ModuleKind::TimeEnergy,
        ModuleKind::Vocabulary,
    ];

    /// Name of the module's row in the remote document table.
    pub fn remote_name(self) -> &'static str {
        match self {
            Self::People => "people",
            Self::Decisions => "decisions",
            Self::Career => "career",
            Self::Finance => "finance",
            Self::Skills => "skills",
            Self::TimeEnergy => "time_energy",
            Self::Vocabulary => "vocabulary",
        }
    }

    /// Local slice keys the module owns. Module reset clears exactly these;
    /// backup shadows and the remote record stay untouched.
    pub fn primary_keys(self) -> &'static [&'static str] {
        match self {
            Self::People => &["peopleRelationships"],
            Self::Decisions => &["decisionsData", "decisionWins"],
            Self::Career => &[
                "careerPhases",
                "careerRituals",
                "careerWins",
                "careerSkillGaps",
                "careerGoal",
                "careerProgressLogs",
            ],
            Self::Finance => &["financeTransactions"],
            Self::Skills => &[
                "skillsData",
                "skillRituals",
                "skillWins",
                "skillFocusSprint",
                "skillCalendar",
            ],
            Self::TimeEnergy => &[
                "timeEnergyData",
                "timeEnergyRituals",
                "timeEnergyWeekly",
                "timeEnergyIntraday",
            ],
            Self::Vocabulary => &["vocabularyTopics"],
        }
    }

    /// Older key spellings probed when the primary slice is absent.
    pub fn legacy_keys(self) -> &'static [&'static str] {
        match self {
            Self::People => &["peopleData", "relationshipsData", "peopleRelationshipsBackup"],
            Self::Decisions => &["decisionData", "decisionLogs"],
            _ => &[],
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.remote_name() == name)
    }
}

impl Display for ModuleKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.remote_name())
    }
}

/// Shared shape for "win" journal entries across modules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinEntry {
    pub id: i64,
    pub date: String,
    pub highlight: String,
    pub impact: String,
}

/// Shared shape for checkable ritual items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RitualItem {
    pub id: i64,
    pub title: String,
    pub done: bool,
}

// ---------------------------------------------------------------------------
// People

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeoplePayload {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub relationships: Vec<Relationship>,
}

impl Default for PeoplePayload {
    fn default() -> Self {
        Self {
            version: PAYLOAD_VERSION,
            relationships: Vec::new(),
        }
    }
}

impl PeoplePayload {
    pub fn new(relationships: Vec<Relationship>) -> Self {
        Self {
            version: PAYLOAD_VERSION,
            relationships,
        }
    }

    /// Repairs records loaded from older layouts: the evaluation vector is
    /// resized to its canonical length.
    pub fn normalize_loaded(&mut self) {
        for rel in &mut self.relationships {
            if rel.scores.len() != EVALUATION_CRITERIA {
                rel.scores.resize(EVALUATION_CRITERIA, 0);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Decisions

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DecisionOutcome {
    Positive,
    Negative,
    Neutral,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Collaboration {
    Solo,
    Collaborative,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    pub id: i64,
    pub title: String,
    pub outcome: DecisionOutcome,
    #[serde(rename = "emotionBefore")]
    pub emotion_before: i32,
    #[serde(rename = "emotionAfter")]
    pub emotion_after: i32,
    pub risk: RiskLevel,
    #[serde(default)]
    pub expected: String,
    pub confidence: RiskLevel,
    #[serde(rename = "followUp", default)]
    pub follow_up: String,
    pub date: String,
    #[serde(rename = "reviewDue", default)]
    pub review_due: String,
    #[serde(default)]
    pub tags: String,
    #[serde(default)]
    pub learning: String,
    #[serde(default)]
    pub context: String,
    #[serde(default)]
    pub principles: String,
    #[serde(default)]
    pub goal: String,
    #[serde(default)]
    pub cost: String,
    #[serde(default)]
    pub upside: String,
    #[serde(default)]
    pub downside: String,
    #[serde(default)]
    pub alternatives: String,
    #[serde(default)]
    pub reversibility: String,
    #[serde(rename = "isUrgent", default, skip_serializing_if = "Option::is_none")]
    pub is_urgent: Option<bool>,
    #[serde(rename = "isImportant", default, skip_serializing_if = "Option::is_none")]
    pub is_important: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collaboration: Option<Collaboration>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionsPayload {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub decisions: Vec<Decision>,
    #[serde(default)]
    pub wins: Vec<WinEntry>,
}

impl Default for DecisionsPayload {
    fn default() -> Self {
        Self {
            version: PAYLOAD_VERSION,
            decisions: Vec::new(),
            wins: Vec::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Career

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PhaseHorizon {
    Current,
    #[serde(rename = "Short Term")]
    ShortTerm,
    #[serde(rename = "Medium Term")]
    MediumTerm,
    #[serde(rename = "Long Term")]
    LongTerm,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CareerPhase {
    pub id: i64,
    pub phase: PhaseHorizon,
    pub title: String,
    pub income: f64,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub focus: String,
    #[serde(rename = "targetYear", default)]
    pub target_year: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillGap {
    pub id: i64,
    pub skill: String,
    pub current: i32,
    pub target: i32,
    #[serde(default)]
    pub plan: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CareerGoal {
    pub vision: String,
    #[serde(rename = "northStar")]
    pub north_star: String,
    #[serde(rename = "nextMove")]
    pub next_move: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressLog {
    pub id: i64,
    pub date: String,
    #[serde(default)]
    pub focus: String,
    #[serde(default)]
    pub win: String,
    #[serde(default)]
    pub blocker: String,
    pub score: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CareerPayload {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub phases: Vec<CareerPhase>,
    #[serde(default)]
    pub rituals: Vec<RitualItem>,
    #[serde(default)]
    pub wins: Vec<WinEntry>,
    #[serde(rename = "skillGaps", default)]
    pub skill_gaps: Vec<SkillGap>,
    #[serde(rename = "careerGoal", default)]
    pub career_goal: CareerGoal,
    #[serde(rename = "progressLogs", default)]
    pub progress_logs: Vec<ProgressLog>,
}

impl Default for CareerPayload {
    fn default() -> Self {
        Self {
            version: PAYLOAD_VERSION,
            phases: Vec::new(),
            rituals: Vec::new(),
            wins: Vec::new(),
            skill_gaps: Vec::new(),
            career_goal: CareerGoal::default(),
            progress_logs: Vec::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Finance

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
    Investment,
    Debt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecurringFrequency {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialTransaction {
    pub id: String,
    pub user_id: String,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<String>,
    pub amount: f64,
    pub currency: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub date: String,
    pub recurring: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurring_frequency: Option<RecurringFrequency>,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancePayload {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub transactions: Vec<FinancialTransaction>,
}

impl Default for FinancePayload {
    fn default() -> Self {
        Self {
            version: PAYLOAD_VERSION,
            transactions: Vec::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Skills

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkillSource {
    Course,
    Meeting,
    Practice,
    Reading,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillLog {
    pub date: String,
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub note: String,
    pub rating: i32,
    #[serde(rename = "sourceType", default, skip_serializing_if = "Option::is_none")]
    pub source_type: Option<SkillSource>,
    #[serde(rename = "sourceName", default, skip_serializing_if = "Option::is_none")]
    pub source_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub takeaways: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillSchedule {
    pub id: i64,
    pub date: String,
    #[serde(rename = "timeBlock", default)]
    pub time_block: String,
    #[serde(rename = "skillId")]
    pub skill_id: i64,
    #[serde(default)]
    pub focus: String,
    #[serde(default)]
    pub note: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skill {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub category: String,
    pub level: i32,
    pub target: i32,
    #[serde(default)]
    pub focus: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub milestone: Option<String>,
    #[serde(rename = "nextAction", default, skip_serializing_if = "Option::is_none")]
    pub next_action: Option<String>,
    #[serde(rename = "lastPractice", default, skip_serializing_if = "Option::is_none")]
    pub last_practice: Option<String>,
    #[serde(default)]
    pub logs: Vec<SkillLog>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillsPayload {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub skills: Vec<Skill>,
    #[serde(default)]
    pub rituals: Vec<RitualItem>,
    #[serde(default)]
    pub wins: Vec<WinEntry>,
    #[serde(default)]
    pub schedule: Vec<SkillSchedule>,
    #[serde(rename = "focusSprint", default)]
    pub focus_sprint: String,
}

impl Default for SkillsPayload {
    fn default() -> Self {
        Self {
            version: PAYLOAD_VERSION,
            skills: Vec::new(),
            rituals: Vec::new(),
            wins: Vec::new(),
            schedule: Vec::new(),
            focus_sprint: String::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Time & Energy

/// One daily time/energy entry. Hour fields stay free-form text, matching
/// the persisted layout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeEnergyLog {
    pub date: String,
    pub sleep_hours: String,
    pub work_hours: String,
    pub learning_hours: String,
    pub family_hours: String,
    pub finance_hours: String,
    pub leisure_hours: String,
    pub energy_level: String,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeEnergyWeekly {
    pub id: i64,
    #[serde(rename = "weekOf")]
    pub week_of: String,
    #[serde(default)]
    pub win: String,
    #[serde(default)]
    pub blocker: String,
    #[serde(default)]
    pub focus: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnergySource {
    Skill,
    People,
    Work,
    Rest,
    Exercise,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnergyEffect {
    Boost,
    Drain,
    Neutral,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntradayEnergyLog {
    pub id: i64,
    pub date: String,
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub energy: String,
    #[serde(default)]
    pub activity: String,
    pub source: EnergySource,
    pub effect: EnergyEffect,
    #[serde(default)]
    pub note: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeEnergyPayload {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(rename = "formData", default)]
    pub form_data: TimeEnergyLog,
    #[serde(default)]
    pub rituals: Vec<RitualItem>,
    #[serde(rename = "weeklyLogs", default)]
    pub weekly_logs: Vec<TimeEnergyWeekly>,
    #[serde(rename = "intradayLogs", default)]
    pub intraday_logs: Vec<IntradayEnergyLog>,
    #[serde(default)]
    pub logs: Vec<TimeEnergyLog>,
}

impl Default for TimeEnergyPayload {
    fn default() -> Self {
        Self {
            version: PAYLOAD_VERSION,
            form_data: TimeEnergyLog::default(),
            rituals: Vec::new(),
            weekly_logs: Vec::new(),
            intraday_logs: Vec::new(),
            logs: Vec::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Vocabulary

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabularyItem {
    pub term: String,
    pub meaning: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogueLine {
    pub speaker: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicLog {
    pub id: i64,
    pub date: String,
    #[serde(default)]
    pub context: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub vocab: Vec<VocabularyItem>,
    #[serde(default)]
    pub dialogue: Vec<DialogueLine>,
    #[serde(default)]
    pub story: String,
    #[serde(default)]
    pub takeaway: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabularyTopic {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub logs: Vec<TopicLog>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabularyPayload {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub topics: Vec<VocabularyTopic>,
}

impl Default for VocabularyPayload {
    fn default() -> Self {
        Self {
            version: PAYLOAD_VERSION,
            topics: Vec::new(),
        }
    }
}
