//! Brief aggregate and the six component payloads users submit

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::error::{Result, StratosError};
use crate::types::ComponentKind;

/// Core facts about the business being marketed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusinessInformation {
    /// Legal or trading name of the company
    pub company_name: String,

    /// Industry or vertical the company operates in
    pub industry: String,

    /// Short description of what the company does
    pub description: String,

    /// The products or services being marketed
    pub products_services: String,

    /// What sets the company apart, if stated
    #[serde(default)]
    pub unique_value: Option<String>,

    /// Company website
    #[serde(default)]
    pub website: Option<String>,

    /// Upstream fields not modeled here, carried verbatim
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// What the marketing effort is trying to achieve
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketingGoal {
    /// The single most important objective
    pub primary_objective: String,

    /// Supporting objectives, in priority order
    #[serde(default)]
    pub secondary_objectives: Vec<String>,

    /// Horizon for the goal, e.g. "6 months"
    pub timeframe: String,

    /// How success will be measured
    #[serde(default)]
    pub success_metrics: Vec<String>,

    /// Budget earmarked for this goal, per month
    #[serde(default)]
    pub monthly_budget: Option<f64>,

    /// Upstream fields not modeled here, carried verbatim
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Who the marketing should reach
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetAudience {
    /// Free-text description of the audience
    pub description: String,

    /// Age bracket, e.g. "25-40"
    #[serde(default)]
    pub age_range: Option<String>,

    /// Geographic markets
    #[serde(default)]
    pub locations: Vec<String>,

    /// Interests and affinities
    #[serde(default)]
    pub interests: Vec<String>,

    /// Problems the audience wants solved
    #[serde(default)]
    pub pain_points: Vec<String>,

    /// Upstream fields not modeled here, carried verbatim
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// What the company can put behind the strategy
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketingResources {
    /// People available for marketing work
    #[serde(default)]
    pub team_size: Option<u32>,

    /// Overall monthly marketing budget
    #[serde(default)]
    pub monthly_budget: Option<f64>,

    /// Channels already in use
    #[serde(default)]
    pub existing_channels: Vec<String>,

    /// Tooling already in place
    #[serde(default)]
    pub tools: Vec<String>,

    /// Upstream fields not modeled here, carried verbatim
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A single named competitor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Competitor {
    /// Competitor name
    pub name: String,

    /// Where they are strong
    #[serde(default)]
    pub strengths: Option<String>,

    /// Where they are weak
    #[serde(default)]
    pub weaknesses: Option<String>,

    /// Competitor website
    #[serde(default)]
    pub website: Option<String>,
}

/// The competitive landscape
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Competitors {
    /// Known competitors; may be empty for a new category
    #[serde(default)]
    pub competitors: Vec<Competitor>,

    /// How the company differentiates against them
    #[serde(default)]
    pub differentiation: Option<String>,

    /// Upstream fields not modeled here, carried verbatim
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// User steering for the generated strategy
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StrategyAdjustments {
    /// Desired tone of voice
    #[serde(default)]
    pub tone: Option<String>,

    /// Themes to emphasize
    #[serde(default)]
    pub emphasis: Vec<String>,

    /// Themes or tactics to avoid
    #[serde(default)]
    pub avoid: Vec<String>,

    /// Anything else the strategist should know
    #[serde(default)]
    pub notes: Option<String>,

    /// Upstream fields not modeled here, carried verbatim
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One submitted brief component, tagged by kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BriefComponent {
    BusinessInformation(BusinessInformation),
    MarketingGoal(MarketingGoal),
    TargetAudience(TargetAudience),
    MarketingResources(MarketingResources),
    Competitors(Competitors),
    StrategyAdjustments(StrategyAdjustments),
}

impl BriefComponent {
    /// The kind tag of this component
    pub fn kind(&self) -> ComponentKind {
        match self {
            BriefComponent::BusinessInformation(_) => ComponentKind::BusinessInformation,
            BriefComponent::MarketingGoal(_) => ComponentKind::MarketingGoal,
            BriefComponent::TargetAudience(_) => ComponentKind::TargetAudience,
            BriefComponent::MarketingResources(_) => ComponentKind::MarketingResources,
            BriefComponent::Competitors(_) => ComponentKind::Competitors,
            BriefComponent::StrategyAdjustments(_) => ComponentKind::StrategyAdjustments,
        }
    }

    /// Checks the payload's mandatory fields
    pub fn validate(&self) -> Result<()> {
        match self {
            BriefComponent::BusinessInformation(info) => {
                if info.company_name.trim().is_empty() {
                    return Err(StratosError::ContentInvalid {
                        message: "company_name must not be empty".to_string(),
                    });
                }
                if info.description.trim().is_empty() {
                    return Err(StratosError::ContentInvalid {
                        message: "business description must not be empty".to_string(),
                    });
                }
            }
            BriefComponent::MarketingGoal(goal) => {
                if goal.primary_objective.trim().is_empty() {
                    return Err(StratosError::ContentInvalid {
                        message: "primary_objective must not be empty".to_string(),
                    });
                }
            }
            BriefComponent::TargetAudience(audience) => {
                if audience.description.trim().is_empty() {
                    return Err(StratosError::ContentInvalid {
                        message: "audience description must not be empty".to_string(),
                    });
                }
            }
            BriefComponent::Competitors(competitors) => {
                if competitors.competitors.iter().any(|c| c.name.trim().is_empty()) {
                    return Err(StratosError::ContentInvalid {
                        message: "competitor name must not be empty".to_string(),
                    });
                }
            }
            BriefComponent::MarketingResources(_) | BriefComponent::StrategyAdjustments(_) => {}
        }
        Ok(())
    }
}

/// The aggregate of everything a user has told us about one engagement.
///
/// Created empty and filled one component at a time; completeness is
/// recomputed from the slots on every query, never cached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Brief {
    /// Unique identifier
    pub id: Uuid,

    /// Owning user
    pub user_id: Uuid,

    /// When the brief was created
    pub created_at: DateTime<Utc>,

    /// When any component was last upserted
    pub updated_at: DateTime<Utc>,

    /// Business facts, once submitted
    pub business_information: Option<BusinessInformation>,

    /// Goal definition, once submitted
    pub marketing_goal: Option<MarketingGoal>,

    /// Audience definition, once submitted
    pub target_audience: Option<TargetAudience>,

    /// Resource inventory, once submitted
    pub marketing_resources: Option<MarketingResources>,

    /// Competitive landscape, once submitted
    pub competitors: Option<Competitors>,

    /// Strategy steering, once submitted
    pub strategy_adjustments: Option<StrategyAdjustments>,
}

impl Brief {
    /// Creates an empty brief for a user
    pub fn new(user_id: Uuid) -> Self {
        let now = Utc::now();
        Brief {
            id: Uuid::new_v4(),
            user_id,
            created_at: now,
            updated_at: now,
            business_information: None,
            marketing_goal: None,
            target_audience: None,
            marketing_resources: None,
            competitors: None,
            strategy_adjustments: None,
        }
    }

    /// Starts a fluent builder, mainly for tests and tooling
    pub fn builder(user_id: Uuid) -> BriefBuilder {
        BriefBuilder::new(user_id)
    }

    /// Validates and stores a component, overwriting that slot only
    pub fn apply(&mut self, component: BriefComponent) -> Result<()> {
        component.validate()?;
        match component {
            BriefComponent::BusinessInformation(c) => self.business_information = Some(c),
            BriefComponent::MarketingGoal(c) => self.marketing_goal = Some(c),
            BriefComponent::TargetAudience(c) => self.target_audience = Some(c),
            BriefComponent::MarketingResources(c) => self.marketing_resources = Some(c),
            BriefComponent::Competitors(c) => self.competitors = Some(c),
            BriefComponent::StrategyAdjustments(c) => self.strategy_adjustments = Some(c),
        }
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Whether the given component slot is populated
    pub fn has_component(&self, kind: ComponentKind) -> bool {
        match kind {
            ComponentKind::BusinessInformation => self.business_information.is_some(),
            ComponentKind::MarketingGoal => self.marketing_goal.is_some(),
            ComponentKind::TargetAudience => self.target_audience.is_some(),
            ComponentKind::MarketingResources => self.marketing_resources.is_some(),
            ComponentKind::Competitors => self.competitors.is_some(),
            ComponentKind::StrategyAdjustments => self.strategy_adjustments.is_some(),
        }
    }

    /// Exactly the required components still absent, in canonical order
    pub fn missing_components(&self) -> Vec<ComponentKind> {
        ComponentKind::REQUIRED
            .iter()
            .copied()
            .filter(|kind| !self.has_component(*kind))
            .collect()
    }

    /// Whether every required component is present
    pub fn is_complete(&self) -> bool {
        self.missing_components().is_empty()
    }
}

/// Fluent builder for assembling a brief in one expression
pub struct BriefBuilder {
    user_id: Uuid,
    components: Vec<BriefComponent>,
}

impl BriefBuilder {
    /// Creates a builder for the given user
    pub fn new(user_id: Uuid) -> Self {
        BriefBuilder {
            user_id,
            components: Vec::new(),
        }
    }

    /// Adds the business information component
    pub fn business_information(mut self, info: BusinessInformation) -> Self {
        self.components.push(BriefComponent::BusinessInformation(info));
        self
    }

    /// Adds the marketing goal component
    pub fn marketing_goal(mut self, goal: MarketingGoal) -> Self {
        self.components.push(BriefComponent::MarketingGoal(goal));
        self
    }

    /// Adds the target audience component
    pub fn target_audience(mut self, audience: TargetAudience) -> Self {
        self.components.push(BriefComponent::TargetAudience(audience));
        self
    }

    /// Adds the marketing resources component
    pub fn marketing_resources(mut self, resources: MarketingResources) -> Self {
        self.components.push(BriefComponent::MarketingResources(resources));
        self
    }

    /// Adds the competitors component
    pub fn competitors(mut self, competitors: Competitors) -> Self {
        self.components.push(BriefComponent::Competitors(competitors));
        self
    }

    /// Adds the strategy adjustments component
    pub fn strategy_adjustments(mut self, adjustments: StrategyAdjustments) -> Self {
        self.components.push(BriefComponent::StrategyAdjustments(adjustments));
        self
    }

    /// Validates every added component and assembles the brief
    pub fn build(self) -> Result<Brief> {
        let mut brief = Brief::new(self.user_id);
        for component in self.components {
            brief.apply(component)?;
        }
        Ok(brief)
    }
}
