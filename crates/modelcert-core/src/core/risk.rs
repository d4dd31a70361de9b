// modelcert-core/src/core/risk.rs
// ============================================================================
// Module: Modelcert Risk Scoring
// Description: Deterministic weighted risk scoring for AI/ML use cases.
// Purpose: Map use-case attributes to a risk tier and its required controls.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! The risk scoring engine is a pure, total function over validated enum
//! inputs: every combination of attributes resolves to a tier, a composite
//! score, and tier-indexed control tables (test suites, approver roles,
//! committee path, estimated duration). Risk-catalog derivation is flag-based
//! and independent of the score.
//!
//! # Invariants
//!
//! - Re-scoring identical inputs yields an identical score, tier, and factor
//!   ordering.
//! - Raising any single flag or the data classification never lowers the
//!   score or tier.
//! - Zero-weight factors are omitted from the factor list.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Input Enums
// ============================================================================

/// Sensitivity classification of the data a use case touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataClassification {
    /// Publicly available data.
    Public,
    /// Internal business data.
    Internal,
    /// Confidential business data.
    Confidential,
    /// Personally identifiable information.
    Pii,
    /// Restricted or regulated data.
    Restricted,
}

impl DataClassification {
    /// Returns the score contribution for this classification.
    #[must_use]
    pub const fn weight(self) -> u32 {
        match self {
            Self::Public => 0,
            Self::Internal => 10,
            Self::Confidential => 25,
            Self::Pii => 40,
            Self::Restricted => 50,
        }
    }

    /// Returns the stable string form of this classification.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Internal => "internal",
            Self::Confidential => "confidential",
            Self::Pii => "pii",
            Self::Restricted => "restricted",
        }
    }
}

/// Functional category of a use case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UseCaseCategory {
    /// Autonomous or semi-autonomous agent workflows.
    AgentWorkflow,
    /// Source code generation.
    CodeGeneration,
    /// Free-form content generation.
    ContentGeneration,
    /// Structured data extraction.
    DataExtraction,
    /// Document summarization.
    Summarization,
    /// Retrieval-augmented question answering.
    RagQa,
    /// Classification or labeling.
    Classification,
    /// Language translation.
    Translation,
    /// Anything not covered above.
    Other,
}

impl UseCaseCategory {
    /// Returns the score contribution for this category.
    ///
    /// Categories without an explicit table entry fall back to the default
    /// weight of 10 so the scoring function stays total.
    #[must_use]
    pub const fn weight(self) -> u32 {
        match self {
            Self::AgentWorkflow => 25,
            Self::CodeGeneration => 20,
            Self::ContentGeneration => 15,
            Self::DataExtraction => 15,
            Self::Summarization | Self::RagQa | Self::Other => 10,
            Self::Classification | Self::Translation => 5,
        }
    }

    /// Returns the stable string form of this category.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AgentWorkflow => "agent_workflow",
            Self::CodeGeneration => "code_generation",
            Self::ContentGeneration => "content_generation",
            Self::DataExtraction => "data_extraction",
            Self::Summarization => "summarization",
            Self::RagQa => "rag_qa",
            Self::Classification => "classification",
            Self::Translation => "translation",
            Self::Other => "other",
        }
    }
}

// ============================================================================
// SECTION: Risk Tier
// ============================================================================

/// Ordered risk tier gating the required controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskTier {
    /// Lowest risk tier.
    Minimal,
    /// Low risk tier.
    Low,
    /// Medium risk tier.
    Medium,
    /// High risk tier.
    High,
    /// Highest risk tier.
    Critical,
}

impl RiskTier {
    /// Maps a composite score to a tier via descending threshold bands.
    #[must_use]
    pub const fn from_score(score: u32) -> Self {
        if score >= 150 {
            Self::Critical
        } else if score >= 100 {
            Self::High
        } else if score >= 50 {
            Self::Medium
        } else if score >= 20 {
            Self::Low
        } else {
            Self::Minimal
        }
    }

    /// Returns the test suites required at this tier.
    #[must_use]
    pub const fn required_test_suites(self) -> &'static [TestSuite] {
        match self {
            Self::Critical => &[
                TestSuite::QualityCorrectness,
                TestSuite::RagGroundedness,
                TestSuite::SafetySecurity,
                TestSuite::RedTeamPromptfoo,
                TestSuite::RedTeamPyrit,
                TestSuite::VulnerabilityGarak,
                TestSuite::AgenticSafety,
                TestSuite::OperationalControls,
                TestSuite::Regression,
            ],
            Self::High => &[
                TestSuite::QualityCorrectness,
                TestSuite::RagGroundedness,
                TestSuite::SafetySecurity,
                TestSuite::RedTeamPromptfoo,
                TestSuite::VulnerabilityGarak,
                TestSuite::OperationalControls,
                TestSuite::Regression,
            ],
            Self::Medium => &[
                TestSuite::QualityCorrectness,
                TestSuite::SafetySecurity,
                TestSuite::RedTeamPromptfoo,
                TestSuite::OperationalControls,
            ],
            Self::Low => &[TestSuite::QualityCorrectness, TestSuite::OperationalControls],
            Self::Minimal => &[TestSuite::QualityCorrectness],
        }
    }

    /// Returns the approver roles required at this tier.
    #[must_use]
    pub const fn required_approvals(self) -> &'static [ApproverRole] {
        match self {
            Self::Critical => &[
                ApproverRole::ModelRiskOfficer,
                ApproverRole::ChiefRiskOfficer,
                ApproverRole::TechnologyRiskCommittee,
                ApproverRole::BusinessLineHead,
            ],
            Self::High => &[
                ApproverRole::ModelRiskOfficer,
                ApproverRole::TechnologyRiskCommittee,
                ApproverRole::BusinessLineHead,
            ],
            Self::Medium => &[ApproverRole::ModelRiskOfficer, ApproverRole::BusinessLineHead],
            Self::Low | Self::Minimal => &[ApproverRole::ModelControlAnalyst],
        }
    }

    /// Returns the committee escalation path for this tier.
    #[must_use]
    pub const fn committee_path(self) -> &'static str {
        match self {
            Self::Critical => {
                "WM Model Risk Committee -> Enterprise Risk Committee -> Board Risk Committee"
            }
            Self::High => "WM Model Risk Committee -> Enterprise Risk Committee",
            Self::Medium => "WM Model Risk Committee",
            Self::Low | Self::Minimal => "Model Control Review",
        }
    }

    /// Returns the estimated certification duration in days.
    #[must_use]
    pub const fn estimated_days(self) -> u32 {
        match self {
            Self::Critical => 30,
            Self::High => 21,
            Self::Medium => 14,
            Self::Low => 7,
            Self::Minimal => 3,
        }
    }

    /// Returns the approval wait timeout in days for this tier.
    #[must_use]
    pub const fn approval_timeout_days(self) -> i64 {
        match self {
            Self::Critical => 14,
            Self::High => 10,
            Self::Medium => 7,
            Self::Low => 3,
            Self::Minimal => 1,
        }
    }

    /// Returns the stable string form of this tier.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Minimal => "minimal",
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

// ============================================================================
// SECTION: Control Vocabulary
// ============================================================================

/// Evaluation test suite identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestSuite {
    /// Core quality and correctness evaluation.
    QualityCorrectness,
    /// Retrieval groundedness evaluation.
    RagGroundedness,
    /// Safety and security evaluation.
    SafetySecurity,
    /// Promptfoo-driven red team suite.
    RedTeamPromptfoo,
    /// PyRIT-driven red team suite.
    RedTeamPyrit,
    /// Garak vulnerability scan.
    VulnerabilityGarak,
    /// Agentic safety evaluation.
    AgenticSafety,
    /// Operational controls review.
    OperationalControls,
    /// Regression suite against prior certified behavior.
    Regression,
}

impl TestSuite {
    /// Returns the stable string form of this suite.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::QualityCorrectness => "quality_correctness",
            Self::RagGroundedness => "rag_groundedness",
            Self::SafetySecurity => "safety_security",
            Self::RedTeamPromptfoo => "red_team_promptfoo",
            Self::RedTeamPyrit => "red_team_pyrit",
            Self::VulnerabilityGarak => "vulnerability_garak",
            Self::AgenticSafety => "agentic_safety",
            Self::OperationalControls => "operational_controls",
            Self::Regression => "regression",
        }
    }
}

/// Approver role identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApproverRole {
    /// Model risk officer.
    ModelRiskOfficer,
    /// Chief risk officer.
    ChiefRiskOfficer,
    /// Technology risk committee.
    TechnologyRiskCommittee,
    /// Business line head.
    BusinessLineHead,
    /// Model control analyst.
    ModelControlAnalyst,
}

impl ApproverRole {
    /// Returns the stable string form of this role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ModelRiskOfficer => "model_risk_officer",
            Self::ChiefRiskOfficer => "chief_risk_officer",
            Self::TechnologyRiskCommittee => "technology_risk_committee",
            Self::BusinessLineHead => "business_line_head",
            Self::ModelControlAnalyst => "model_control_analyst",
        }
    }
}

// ============================================================================
// SECTION: Use Case Profile
// ============================================================================

/// Scored attributes of one use case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UseCaseProfile {
    /// Sensitivity classification of the data involved.
    pub data_classification: DataClassification,
    /// Functional category of the use case.
    pub category: UseCaseCategory,
    /// Whether the use case processes personally identifiable information.
    pub handles_pii: bool,
    /// Whether outputs reach clients directly.
    pub client_facing: bool,
    /// Whether the use case employs autonomous agents.
    pub uses_agents: bool,
    /// Whether the use case invokes external tools.
    pub uses_tools: bool,
    /// Whether the use case maintains persistent memory.
    pub uses_memory: bool,
    /// Whether the use case performs retrieval augmentation.
    pub uses_rag: bool,
}

/// Boolean flag weights, in declaration order.
const FLAG_WEIGHTS: &[(&str, u32)] = &[
    ("handles_pii", 30),
    ("client_facing", 35),
    ("uses_agents", 30),
    ("uses_tools", 20),
    ("uses_memory", 15),
    ("uses_rag", 10),
];

impl UseCaseProfile {
    /// Returns the boolean flags in table order.
    const fn flags(&self) -> [bool; 6] {
        [
            self.handles_pii,
            self.client_facing,
            self.uses_agents,
            self.uses_tools,
            self.uses_memory,
            self.uses_rag,
        ]
    }
}

// ============================================================================
// SECTION: Assessment Output
// ============================================================================

/// One scored input to the risk computation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskFactor {
    /// Factor name, e.g. `data_classification`.
    pub name: String,
    /// Observed value as a stable string.
    pub value: String,
    /// Weight contributed to the composite score.
    pub weight: u32,
}

/// Immutable result of one scoring call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskAssessment {
    /// Composite numeric score.
    pub score: u32,
    /// Resulting risk tier.
    pub tier: RiskTier,
    /// Contributing factors sorted by descending weight.
    pub factors: Vec<RiskFactor>,
    /// Test suites required at the resulting tier.
    pub required_test_suites: Vec<TestSuite>,
    /// Approver roles required at the resulting tier.
    pub required_approvals: Vec<ApproverRole>,
    /// Committee escalation path for the resulting tier.
    pub committee_path: String,
    /// Estimated certification duration in days.
    pub estimated_days: u32,
    /// Applicable LLM risk-catalog entries, sorted and deduplicated.
    pub llm_risks: Vec<String>,
    /// Applicable agentic risk-catalog entries, sorted; empty unless the use
    /// case employs agents.
    pub agentic_risks: Vec<String>,
}

// ============================================================================
// SECTION: Scoring
// ============================================================================

/// Computes the risk assessment for a use case profile.
///
/// Pure and total: every input combination resolves to a tier. Zero-weight
/// factors are omitted and the factor list is sorted by descending weight.
#[must_use]
pub fn compute_risk_rating(profile: &UseCaseProfile) -> RiskAssessment {
    let mut factors = Vec::with_capacity(8);
    push_factor(
        &mut factors,
        "data_classification",
        profile.data_classification.as_str(),
        profile.data_classification.weight(),
    );
    push_factor(&mut factors, "category", profile.category.as_str(), profile.category.weight());
    for ((name, weight), enabled) in FLAG_WEIGHTS.iter().zip(profile.flags()) {
        if enabled {
            push_factor(&mut factors, name, "true", *weight);
        }
    }

    let score: u32 = factors.iter().map(|factor| factor.weight).sum();
    factors.sort_by(|a, b| b.weight.cmp(&a.weight));

    let tier = RiskTier::from_score(score);
    RiskAssessment {
        score,
        tier,
        factors,
        required_test_suites: tier.required_test_suites().to_vec(),
        required_approvals: tier.required_approvals().to_vec(),
        committee_path: tier.committee_path().to_string(),
        estimated_days: tier.estimated_days(),
        llm_risks: derive_llm_risks(profile),
        agentic_risks: derive_agentic_risks(profile),
    }
}

/// Appends a factor when its weight is non-zero.
fn push_factor(factors: &mut Vec<RiskFactor>, name: &str, value: &str, weight: u32) {
    if weight > 0 {
        factors.push(RiskFactor {
            name: name.to_string(),
            value: value.to_string(),
            weight,
        });
    }
}

// ============================================================================
// SECTION: Risk Catalogs
// ============================================================================

/// Derives the applicable LLM risk-catalog entries from the profile flags.
///
/// A fixed baseline entry is always present; flag combinations add entries.
/// The result is sorted and deduplicated. This derivation never affects the
/// tier.
#[must_use]
pub fn derive_llm_risks(profile: &UseCaseProfile) -> Vec<String> {
    let mut risks = vec!["LLM01_Prompt_Injection".to_string()];
    if profile.uses_rag {
        risks.push("LLM08_Data_Model_Poisoning".to_string());
    }
    if profile.handles_pii {
        risks.push("LLM06_Sensitive_Information_Disclosure".to_string());
    }
    if profile.uses_agents || profile.uses_tools {
        risks.push("LLM06_Excessive_Agency".to_string());
        risks.push("LLM04_Output_Handling".to_string());
    }
    if profile.client_facing {
        risks.push("LLM09_Misinformation".to_string());
        risks.push("LLM02_Insecure_Output_Handling".to_string());
    }
    risks.sort();
    risks.dedup();
    risks
}

/// Derives the applicable agentic risk-catalog entries from the profile flags.
///
/// Empty unless the use case employs agents.
#[must_use]
pub fn derive_agentic_risks(profile: &UseCaseProfile) -> Vec<String> {
    if !profile.uses_agents {
        return Vec::new();
    }
    let mut risks = vec![
        "ASI01_Agent_Goal_Hijack".to_string(),
        "ASI08_Cascading_Failures".to_string(),
        "ASI10_Rogue_Agents".to_string(),
    ];
    if profile.uses_tools {
        risks.push("ASI02_Tool_Misuse".to_string());
        risks.push("ASI03_Identity_Privilege_Abuse".to_string());
        risks.push("ASI05_Unexpected_RCE".to_string());
    }
    if profile.uses_memory {
        risks.push("ASI06_Memory_Context_Poisoning".to_string());
    }
    risks.sort();
    risks
}
