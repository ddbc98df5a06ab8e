/*!
 * Model discovery: which chat models an API key can use, in display order.
 */

use serde::Serialize;
use std::cmp::Ordering;

use crate::errors::ProviderError;
use crate::providers::Provider;
use crate::providers::openai::{OpenAI, OpenAIModel};

/// Id prefixes of models usable for translation
const CHAT_MODEL_PREFIXES: &[&str] = &["gpt-", "o1-", "o3-"];

/// Model families, newest first
const FAMILY_ORDER: &[&str] = &["gpt-5", "gpt-4", "gpt-3", "o3", "o1"];

/// A model offered for selection
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelInfo {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<i64>,
}

/// Human-readable model name: `gpt-4o-mini` becomes `GPT 4O Mini`
pub fn format_model_name(model_id: &str) -> String {
    model_id
        .split('-')
        .enumerate()
        .map(|(i, part)| {
            if i == 0 || part.chars().count() <= 2 {
                part.to_uppercase()
            } else {
                let mut chars = part.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect(),
                    None => String::new(),
                }
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Short description for well-known model ids
pub fn describe_model(model_id: &str) -> &'static str {
    if model_id.contains("gpt-5") {
        if model_id.contains("nano") {
            return "Ultra-fast GPT-5 variant";
        }
        if model_id.contains("mini") {
            return "Efficient GPT-5 model";
        }
        if model_id.contains("pro") {
            return "Ultimate performance model";
        }
        return "Next generation flagship model";
    }

    if model_id.contains("gpt-4o") {
        if model_id.contains("mini") {
            return "Balanced performance and cost";
        }
        return "Most capable GPT-4 model";
    }

    if model_id.contains("gpt-4-turbo") {
        return "Previous generation flagship model";
    }
    if model_id.contains("gpt-3.5") {
        return "Fast and economical option";
    }
    if model_id.contains("o1-preview") || model_id.contains("o1-mini") {
        return "Advanced reasoning model";
    }
    if model_id.contains("o3") {
        return "Latest reasoning model";
    }

    "OpenAI language model"
}

fn family_rank(model_id: &str) -> usize {
    FAMILY_ORDER
        .iter()
        .position(|prefix| model_id.starts_with(prefix))
        .unwrap_or(FAMILY_ORDER.len())
}

/// Keep chat models and order them by family, then id descending
pub fn filter_and_sort_models(models: Vec<OpenAIModel>) -> Vec<ModelInfo> {
    let mut models: Vec<OpenAIModel> = models
        .into_iter()
        .filter(|m| CHAT_MODEL_PREFIXES.iter().any(|p| m.id.starts_with(p)))
        .collect();

    models.sort_by(|a, b| match family_rank(&a.id).cmp(&family_rank(&b.id)) {
        Ordering::Equal => b.id.cmp(&a.id),
        other => other,
    });

    models
        .into_iter()
        .map(|m| ModelInfo {
            name: format_model_name(&m.id),
            description: describe_model(&m.id).to_string(),
            created: m.created,
            id: m.id,
        })
        .collect()
}

/// Chat models available to the client's API key
pub async fn fetch_available_models(client: &OpenAI) -> Result<Vec<ModelInfo>, ProviderError> {
    Ok(filter_and_sort_models(client.list_models().await?))
}

/// Check that the provider accepts its credentials
pub async fn validate_api_key<P: Provider>(provider: &P) -> Result<(), ProviderError> {
    provider.test_connection().await
}
