use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::suggestion::SuggestionTier;

/// A dispatcher's decision to hand an order to an agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assignment {
    pub id: Uuid,
    pub order_id: Uuid,
    pub agent_id: Uuid,
    pub tier: Option<SuggestionTier>,
    pub assigned_at: DateTime<Utc>,
}
