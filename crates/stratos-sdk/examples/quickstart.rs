//! Quick Start Example
//!
//! Drives the full brief → generate → review → approve → deliver flow
//! against a locally running node (`cargo run -p stratos-node`).

use serde_json::Map;
use stratos_core::{
    BusinessInformation, Competitor, Competitors, MarketingGoal, MarketingResources,
    StrategyAdjustments, TargetAudience,
};
use stratos_sdk::prelude::*;
use uuid::Uuid;

#[tokio::main]
async fn main() -> Result<()> {
    // Connect to a Stratos node
    let client = StratosClient::connect("http://localhost:3000").await?;

    // 1. Open a brief and subscribe to its lifecycle events
    let brief = client.create_brief(Uuid::new_v4()).await?;
    let mut events = client.watch(brief.id).await?;
    println!("📋 Brief {} created", brief.id);

    // 2. Submit the six intake steps
    for component in demo_components() {
        let brief = client.submit_component(brief.id, &component).await?;
        println!(
            "   submitted {} step(s), {} missing",
            brief.submitted.len(),
            brief.missing.len()
        );
    }

    // 3. Generate a strategy
    let strategy = client.generate(brief.id, false).await?;
    println!(
        "🧠 Strategy {} generated with {} blocks",
        strategy.id,
        strategy.blocks.len()
    );

    // 4. Review: open, refine one section, approve
    let opened = client.open(strategy.id).await?;
    let first_section = opened.blocks[0].sections[0].id;
    client
        .edit_section(
            strategy.id,
            first_section,
            "Lead every campaign with the lifetime repair guarantee.",
        )
        .await?;
    client.approve(strategy.id).await?;
    println!("✅ Strategy approved");

    // 5. Deliver the approved document
    let receipt = client
        .deliver(strategy.id, "founder@example.com")
        .await?;
    println!("📬 Delivered via {} as {}", receipt.transport, receipt.message_id);

    // 6. Replay the lifecycle as the node observed it
    while let Some(event) = events.next().await {
        match event.kind {
            EventKind::GenerationStarted => println!("   ▶ generation started"),
            EventKind::GenerationFailed { message, .. } => {
                println!("   ✖ generation failed: {}", message);
                break;
            }
            EventKind::Committed { block_count } => {
                println!("   ▶ committed {} blocks", block_count)
            }
            EventKind::StatusChanged { from, to } => {
                println!("   ▶ status {:?} → {:?}", from, to)
            }
            EventKind::SectionEdited { section_id } => {
                println!("   ▶ section {} edited", section_id)
            }
            EventKind::BlocksReordered => println!("   ▶ blocks reordered"),
            EventKind::Delivered { receipt_id } => {
                println!("   ▶ delivered (receipt {})", receipt_id);
                break;
            }
        }
    }

    Ok(())
}

fn demo_components() -> Vec<BriefComponent> {
    vec![
        BriefComponent::BusinessInformation(BusinessInformation {
            company_name: "Harbor & Thread".to_string(),
            industry: "Sustainable apparel".to_string(),
            description: "Direct-to-consumer knitwear made from recycled fibers".to_string(),
            products_services: "Sweaters, accessories, repair service".to_string(),
            unique_value: Some("Lifetime repair guarantee".to_string()),
            website: Some("https://harborandthread.example".to_string()),
            extra: Map::new(),
        }),
        BriefComponent::MarketingGoal(MarketingGoal {
            primary_objective: "Grow online revenue 40%".to_string(),
            secondary_objectives: vec!["Build a repeat-purchase habit".to_string()],
            timeframe: "12 months".to_string(),
            success_metrics: vec!["online revenue".to_string(), "repeat rate".to_string()],
            monthly_budget: Some(6000.0),
            extra: Map::new(),
        }),
        BriefComponent::TargetAudience(TargetAudience {
            description: "Eco-conscious professionals aged 28-45".to_string(),
            age_range: Some("28-45".to_string()),
            locations: vec!["US".to_string(), "Canada".to_string()],
            interests: vec!["slow fashion".to_string(), "sustainability".to_string()],
            pain_points: vec!["fast fashion guilt".to_string()],
            extra: Map::new(),
        }),
        BriefComponent::MarketingResources(MarketingResources {
            team_size: Some(2),
            monthly_budget: Some(6000.0),
            existing_channels: vec!["instagram".to_string(), "email".to_string()],
            ..Default::default()
        }),
        BriefComponent::Competitors(Competitors {
            competitors: vec![Competitor {
                name: "Everlane".to_string(),
                strengths: Some("brand recognition".to_string()),
                weaknesses: Some("no repair program".to_string()),
                website: None,
            }],
            differentiation: Some("Repair-first lifetime guarantee".to_string()),
            ..Default::default()
        }),
        BriefComponent::StrategyAdjustments(StrategyAdjustments {
            tone: Some("warm and direct".to_string()),
            avoid: vec!["greenwashing claims".to_string()],
            ..Default::default()
        }),
    ]
}
