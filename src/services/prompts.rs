//! Prompt construction for the model backend.
//!
//! Everything here is pure: the service layer feeds the rendered text to
//! [`crate::clients::OllamaClient::chat`].

use crate::domain::InsightType;
use serde_json::{Map, Value};

pub const INSIGHT_SYSTEM_PROMPT: &str = "You are an expert market analyst specializing in \
e-commerce and marketplace insights. Your role is to provide actionable, data-driven insights \
about products in online marketplaces. Be concise, specific, and focus on actionable \
recommendations.";

pub const COMPARISON_SYSTEM_PROMPT: &str = "You are an expert product comparison analyst. \
Provide detailed, objective comparisons between products.";

pub const DEFAULT_COMPARISON_ASPECTS: [&str; 4] = ["price", "features", "quality", "value"];

/// Product attributes that feed the context block of an insight prompt.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProductContext<'a> {
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub category: Option<&'a str>,
    pub price: Option<f64>,
    pub marketplace: Option<&'a str>,
    pub additional_context: Option<&'a str>,
}

/// Instruction header plus the five points the model is asked to cover.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromptTemplate {
    pub header: &'static str,
    pub bullets: [&'static str; 5],
}

fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// One line per present field, in a fixed order. Blank strings count as absent.
#[must_use]
pub fn build_context(ctx: &ProductContext<'_>) -> String {
    let mut lines = vec![format!("Product: {}", ctx.name)];

    if let Some(description) = present(ctx.description) {
        lines.push(format!("Description: {description}"));
    }
    if let Some(category) = present(ctx.category) {
        lines.push(format!("Category: {category}"));
    }
    if let Some(price) = ctx.price {
        lines.push(format!("Price: ${price:.2}"));
    }
    if let Some(marketplace) = present(ctx.marketplace) {
        lines.push(format!("Marketplace: {marketplace}"));
    }
    if let Some(extra) = present(ctx.additional_context) {
        lines.push(format!("Additional Context: {extra}"));
    }

    lines.join("\n")
}

#[must_use]
pub const fn select_template(insight_type: InsightType) -> PromptTemplate {
    match insight_type {
        InsightType::TrendAnalysis => PromptTemplate {
            header: "Analyze the following product and provide trend insights:",
            bullets: [
                "Current market trends for this product",
                "Demand indicators",
                "Seasonal patterns (if applicable)",
                "Growth potential",
                "Key recommendations",
            ],
        },
        InsightType::PricingInsight => PromptTemplate {
            header: "Analyze the pricing strategy for this product:",
            bullets: [
                "Price competitiveness analysis",
                "Optimal pricing recommendations",
                "Price positioning in the market",
                "Discount opportunities",
                "Value proposition assessment",
            ],
        },
        InsightType::CompetitorAnalysis => PromptTemplate {
            header: "Analyze competitors for this product:",
            bullets: [
                "Competitive landscape overview",
                "Key differentiators",
                "Competitive advantages and disadvantages",
                "Market positioning",
                "Strategic recommendations",
            ],
        },
        InsightType::General => PromptTemplate {
            header: "Provide comprehensive insights about this product:",
            bullets: [
                "Market overview",
                "Key strengths and opportunities",
                "Potential challenges",
                "Recommendations for success",
                "Actionable next steps",
            ],
        },
    }
}

fn numbered(items: &[&str]) -> String {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| format!("{}. {item}", i + 1))
        .collect::<Vec<_>>()
        .join("\n")
}

#[must_use]
pub fn render_insight_prompt(template: &PromptTemplate, context: &str) -> String {
    format!(
        "{}\n\n{context}\n\nPlease provide:\n{}",
        template.header,
        numbered(&template.bullets)
    )
}

fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Renders products as numbered `key: value` blocks. Key order follows the input.
#[must_use]
pub fn render_products(products: &[Map<String, Value>]) -> String {
    products
        .iter()
        .enumerate()
        .map(|(i, product)| {
            let fields = product
                .iter()
                .map(|(key, value)| format!("{key}: {}", render_value(value)))
                .collect::<Vec<_>>()
                .join("\n");
            format!("Product {}:\n{fields}", i + 1)
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Falls back to [`DEFAULT_COMPARISON_ASPECTS`] when `aspects` is empty.
#[must_use]
pub fn render_comparison_prompt(products: &[Map<String, Value>], aspects: &[String]) -> String {
    let aspects_text = if aspects.is_empty() {
        DEFAULT_COMPARISON_ASPECTS.join(", ")
    } else {
        aspects.join(", ")
    };

    format!(
        "Compare the following products focusing on: {aspects_text}\n\n{}\n\nPlease provide:\n{}",
        render_products(products),
        numbered(&[
            "Side-by-side comparison",
            "Strengths and weaknesses of each product",
            "Best value recommendation",
            "Target audience for each product",
            "Final recommendation",
        ])
    )
}
