use std::cmp::Ordering;

use serde::Serialize;

use crate::geo::haversine_km;
use crate::models::agent::{AgentStatus, DeliveryAgent};
use crate::models::order::Order;
use crate::models::restaurant::PickupSite;
use crate::models::suggestion::{AgentSuggestion, SuggestionTier};

pub const MAX_SUGGESTIONS: usize = 3;

const FASTEST_MAX_KM: f64 = 2.0;
const NEARBY_MAX_KM: f64 = 5.0;
const MINUTES_PER_KM: f64 = 2.0;
const AVAILABLE_LEAD_MINUTES: f64 = 5.0;
const OCCUPIED_LEAD_MINUTES: f64 = 10.0;
const RATING_MARGIN: f64 = 0.5;

/// Why a ranking came back empty. Every cause has the same remedy for the
/// dispatcher, so callers that do not care can ignore it.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NoSuggestionReason {
    MissingDeliveryLocation,
    PickupUnresolved,
    NoEligibleAgents,
}

impl NoSuggestionReason {
    pub fn as_label(self) -> &'static str {
        match self {
            NoSuggestionReason::MissingDeliveryLocation => "missing_delivery_location",
            NoSuggestionReason::PickupUnresolved => "pickup_unresolved",
            NoSuggestionReason::NoEligibleAgents => "no_eligible_agents",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Ranking {
    pub suggestions: Vec<AgentSuggestion>,
    pub reason: Option<NoSuggestionReason>,
}

impl Ranking {
    fn empty(reason: NoSuggestionReason) -> Self {
        Self {
            suggestions: Vec::new(),
            reason: Some(reason),
        }
    }
}

/// Rank candidate agents for an order, best first, at most [`MAX_SUGGESTIONS`].
///
/// `pickup` is the order's restaurant as resolved by the caller; `None` means
/// it could not be resolved. Returns an empty list whenever no
/// recommendation is possible.
pub fn rank_agents(
    order: &Order,
    pickup: Option<&PickupSite>,
    agents: &[DeliveryAgent],
) -> Vec<AgentSuggestion> {
    rank_agents_explained(order, pickup, agents).suggestions
}

/// Same as [`rank_agents`], but tags an empty result with its cause.
pub fn rank_agents_explained(
    order: &Order,
    pickup: Option<&PickupSite>,
    agents: &[DeliveryAgent],
) -> Ranking {
    let Some(drop) = order.delivery_location else {
        return Ranking::empty(NoSuggestionReason::MissingDeliveryLocation);
    };
    let Some(pickup) = pickup else {
        return Ranking::empty(NoSuggestionReason::PickupUnresolved);
    };

    let distance_to_drop = haversine_km(&pickup.location, &drop);

    let mut suggestions: Vec<AgentSuggestion> = agents
        .iter()
        .filter(|agent| is_eligible(agent))
        .filter_map(|agent| {
            let location = agent.location?;
            let distance_to_pickup = haversine_km(&location, &pickup.location);
            let total_distance = distance_to_pickup + distance_to_drop;

            Some(AgentSuggestion {
                agent: agent.clone(),
                distance_to_pickup_km: distance_to_pickup,
                distance_to_drop_km: distance_to_drop,
                total_distance_km: total_distance,
                estimated_minutes: estimate_minutes(agent.status, total_distance),
                tier: tier_for(total_distance, agent.status),
                restaurant_name: pickup.name.clone(),
            })
        })
        .collect();

    if suggestions.is_empty() {
        return Ranking::empty(NoSuggestionReason::NoEligibleAgents);
    }

    insertion_sort_by(&mut suggestions, compare_suggestions);
    suggestions.truncate(MAX_SUGGESTIONS);

    for suggestion in &mut suggestions {
        suggestion.distance_to_pickup_km = round_km(suggestion.distance_to_pickup_km);
        suggestion.distance_to_drop_km = round_km(suggestion.distance_to_drop_km);
        suggestion.total_distance_km = round_km(suggestion.total_distance_km);
    }

    Ranking {
        suggestions,
        reason: None,
    }
}

pub fn is_eligible(agent: &DeliveryAgent) -> bool {
    agent.online && agent.location.is_some() && agent.status.is_dispatchable()
}

pub fn tier_for(total_distance_km: f64, status: AgentStatus) -> SuggestionTier {
    if total_distance_km <= FASTEST_MAX_KM && status == AgentStatus::Available {
        SuggestionTier::Fastest
    } else if total_distance_km <= NEARBY_MAX_KM {
        SuggestionTier::Nearby
    } else {
        SuggestionTier::Standard
    }
}

/// Linear travel model: a lead time by status plus a fixed cost per km.
pub fn estimate_minutes(status: AgentStatus, total_distance_km: f64) -> u32 {
    let lead = if status == AgentStatus::Available {
        AVAILABLE_LEAD_MINUTES
    } else {
        OCCUPIED_LEAD_MINUTES
    };

    // float-to-int casts saturate, NaN becomes 0
    (lead + total_distance_km * MINUTES_PER_KM).round() as u32
}

pub fn round_km(km: f64) -> f64 {
    (km * 100.0).round() / 100.0
}

/// Available agents first, then a clearly better rating, then shorter total
/// distance. Not transitive across the rating margin.
pub fn compare_suggestions(a: &AgentSuggestion, b: &AgentSuggestion) -> Ordering {
    let a_available = a.agent.status == AgentStatus::Available;
    let b_available = b.agent.status == AgentStatus::Available;
    if a_available != b_available {
        return if a_available {
            Ordering::Less
        } else {
            Ordering::Greater
        };
    }

    if let (Some(a_rating), Some(b_rating)) = (a.agent.rating, b.agent.rating) {
        if (a_rating - b_rating).abs() > RATING_MARGIN {
            return b_rating.total_cmp(&a_rating);
        }
    }

    a.total_distance_km.total_cmp(&b.total_distance_km)
}

// std's slice sorts may panic when the comparator is not a total order,
// which compare_suggestions is not.
fn insertion_sort_by<T, F>(items: &mut [T], mut compare: F)
where
    F: FnMut(&T, &T) -> Ordering,
{
    for i in 1..items.len() {
        let mut j = i;
        while j > 0 && compare(&items[j], &items[j - 1]) == Ordering::Less {
            items.swap(j, j - 1);
            j -= 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use uuid::Uuid;

    use super::*;
    use crate::geo::GeoPoint;
    use crate::models::order::{OrderItem, OrderStatus};

    fn agent(
        id_seed: u128,
        lat: f64,
        lng: f64,
        status: AgentStatus,
        rating: Option<f64>,
    ) -> DeliveryAgent {
        DeliveryAgent {
            id: Uuid::from_u128(id_seed),
            name: format!("agent-{id_seed}"),
            location: Some(GeoPoint::new(lat, lng)),
            online: true,
            status,
            vehicle_type: None,
            rating,
            phone: None,
            updated_at: Utc::now(),
        }
    }

    fn pickup() -> PickupSite {
        PickupSite {
            restaurant_id: Uuid::from_u128(900),
            name: "Spice Route".to_string(),
            location: GeoPoint::new(10.0, 76.0),
        }
    }

    fn order_at(delivery: Option<GeoPoint>) -> Order {
        Order {
            id: Uuid::from_u128(500),
            delivery_location: delivery,
            items: vec![OrderItem {
                restaurant_id: Uuid::from_u128(900),
                name: "Biryani".to_string(),
                quantity: 1,
            }],
            status: OrderStatus::Pending,
            assigned_agent: None,
            created_at: Utc::now(),
        }
    }

    fn order() -> Order {
        order_at(Some(GeoPoint::new(10.05, 76.05)))
    }

    // Order delivered to the restaurant itself so only the pickup leg counts.
    fn local_order() -> Order {
        order_at(Some(GeoPoint::new(10.0, 76.0)))
    }

    fn ids(suggestions: &[AgentSuggestion]) -> Vec<Uuid> {
        suggestions.iter().map(|s| s.agent.id).collect()
    }

    #[test]
    fn worked_example_puts_available_agent_first() {
        let agents = vec![
            agent(1, 10.01, 76.01, AgentStatus::Available, Some(4.9)),
            agent(2, 10.0, 76.0, AgentStatus::Busy, Some(5.0)),
        ];

        let suggestions = rank_agents(&order(), Some(&pickup()), &agents);

        assert_eq!(ids(&suggestions), vec![Uuid::from_u128(1), Uuid::from_u128(2)]);

        let first = &suggestions[0];
        assert_eq!(first.restaurant_name, "Spice Route");
        // ~1.56 km to pickup, ~7.8 km pickup to drop
        assert!(first.total_distance_km > 5.0);
        assert_eq!(first.tier, SuggestionTier::Standard);
        assert_eq!(first.estimated_minutes, 24);

        let second = &suggestions[1];
        assert_eq!(second.distance_to_pickup_km, 0.0);
        assert_eq!(second.distance_to_drop_km, first.distance_to_drop_km);

        for suggestion in &suggestions {
            for km in [
                suggestion.distance_to_pickup_km,
                suggestion.distance_to_drop_km,
                suggestion.total_distance_km,
            ] {
                assert_eq!(km, round_km(km));
            }
        }
    }

    #[test]
    fn ranking_is_deterministic() {
        let agents: Vec<DeliveryAgent> = (0..20)
            .map(|i| {
                let status = if i % 3 == 0 {
                    AgentStatus::Busy
                } else {
                    AgentStatus::Available
                };
                let rating = if i % 4 == 0 { None } else { Some(3.0 + (i % 5) as f64 * 0.4) };
                agent(i, 10.0 + i as f64 * 0.003, 76.0 - i as f64 * 0.002, status, rating)
            })
            .collect();

        let first = rank_agents(&order(), Some(&pickup()), &agents);
        let second = rank_agents(&order(), Some(&pickup()), &agents);

        assert_eq!(ids(&first), ids(&second));
        let first_totals: Vec<f64> = first.iter().map(|s| s.total_distance_km).collect();
        let second_totals: Vec<f64> = second.iter().map(|s| s.total_distance_km).collect();
        assert_eq!(first_totals, second_totals);
    }

    #[test]
    fn offline_agent_never_appears() {
        let mut offline = agent(1, 10.0, 76.0, AgentStatus::Available, Some(5.0));
        offline.online = false;
        let far = agent(2, 10.3, 76.3, AgentStatus::Busy, Some(1.0));

        let suggestions = rank_agents(&order(), Some(&pickup()), &[offline, far]);

        assert_eq!(ids(&suggestions), vec![Uuid::from_u128(2)]);
    }

    #[test]
    fn agent_without_location_never_appears() {
        let mut lost = agent(1, 10.0, 76.0, AgentStatus::Available, Some(5.0));
        lost.location = None;
        let other = agent(2, 10.1, 76.1, AgentStatus::Available, None);

        let suggestions = rank_agents(&order(), Some(&pickup()), &[lost, other]);

        assert_eq!(ids(&suggestions), vec![Uuid::from_u128(2)]);
    }

    #[test]
    fn offline_and_unknown_statuses_are_skipped() {
        let agents = vec![
            agent(1, 10.0, 76.0, AgentStatus::Offline, None),
            agent(2, 10.0, 76.0, AgentStatus::Unknown, None),
            agent(3, 10.0, 76.0, AgentStatus::Online, None),
        ];

        let suggestions = rank_agents(&order(), Some(&pickup()), &agents);

        assert_eq!(ids(&suggestions), vec![Uuid::from_u128(3)]);
    }

    #[test]
    fn output_is_capped_at_three() {
        let agents: Vec<DeliveryAgent> = (0..100)
            .map(|i| agent(i, 10.0 + i as f64 * 0.001, 76.0, AgentStatus::Available, None))
            .collect();

        let suggestions = rank_agents(&order(), Some(&pickup()), &agents);

        assert_eq!(suggestions.len(), MAX_SUGGESTIONS);
        assert_eq!(
            ids(&suggestions),
            vec![Uuid::from_u128(0), Uuid::from_u128(1), Uuid::from_u128(2)]
        );
    }

    #[test]
    fn fastest_tier_boundary_is_inclusive() {
        assert_eq!(tier_for(2.0, AgentStatus::Available), SuggestionTier::Fastest);
        assert_eq!(tier_for(2.01, AgentStatus::Available), SuggestionTier::Nearby);
        assert_eq!(tier_for(2.0, AgentStatus::Busy), SuggestionTier::Nearby);
        assert_eq!(tier_for(5.0, AgentStatus::Online), SuggestionTier::Nearby);
        assert_eq!(tier_for(5.01, AgentStatus::Available), SuggestionTier::Standard);
    }

    #[test]
    fn estimate_uses_status_lead_time() {
        assert_eq!(estimate_minutes(AgentStatus::Available, 0.0), 5);
        assert_eq!(estimate_minutes(AgentStatus::Busy, 0.0), 10);
        assert_eq!(estimate_minutes(AgentStatus::Online, 0.0), 10);
        assert_eq!(estimate_minutes(AgentStatus::Available, 3.3), 12);
        assert_eq!(estimate_minutes(AgentStatus::Busy, 7.8), 26);
    }

    #[test]
    fn available_beats_busy_at_equal_distance_regardless_of_rating() {
        let agents = vec![
            agent(1, 10.01, 76.0, AgentStatus::Busy, Some(5.0)),
            agent(2, 10.01, 76.0, AgentStatus::Available, Some(2.0)),
        ];

        let suggestions = rank_agents(&local_order(), Some(&pickup()), &agents);

        assert_eq!(ids(&suggestions), vec![Uuid::from_u128(2), Uuid::from_u128(1)]);
    }

    #[test]
    fn clearly_better_rating_outranks_shorter_distance() {
        let agents = vec![
            agent(1, 10.010, 76.0, AgentStatus::Available, Some(4.0)),
            agent(2, 10.012, 76.0, AgentStatus::Available, Some(4.8)),
        ];

        let suggestions = rank_agents(&local_order(), Some(&pickup()), &agents);

        assert_eq!(ids(&suggestions), vec![Uuid::from_u128(2), Uuid::from_u128(1)]);
    }

    #[test]
    fn small_rating_gap_falls_back_to_distance() {
        let agents = vec![
            agent(1, 10.012, 76.0, AgentStatus::Available, Some(4.8)),
            agent(2, 10.010, 76.0, AgentStatus::Available, Some(4.4)),
        ];

        let suggestions = rank_agents(&local_order(), Some(&pickup()), &agents);

        assert_eq!(ids(&suggestions), vec![Uuid::from_u128(2), Uuid::from_u128(1)]);
    }

    #[test]
    fn missing_rating_falls_back_to_distance() {
        let agents = vec![
            agent(1, 10.012, 76.0, AgentStatus::Available, Some(5.0)),
            agent(2, 10.010, 76.0, AgentStatus::Available, None),
        ];

        let suggestions = rank_agents(&local_order(), Some(&pickup()), &agents);

        assert_eq!(ids(&suggestions), vec![Uuid::from_u128(2), Uuid::from_u128(1)]);
    }

    #[test]
    fn ranks_before_rounding_distances() {
        // ~2 m apart: equal once rounded, still ordered by the raw value
        let agents = vec![
            agent(1, 10.01002, 76.0, AgentStatus::Available, None),
            agent(2, 10.01000, 76.0, AgentStatus::Available, None),
        ];

        let suggestions = rank_agents(&local_order(), Some(&pickup()), &agents);

        assert_eq!(ids(&suggestions), vec![Uuid::from_u128(2), Uuid::from_u128(1)]);
        assert_eq!(
            suggestions[0].total_distance_km,
            suggestions[1].total_distance_km
        );
    }

    #[test]
    fn cyclic_preferences_do_not_panic() {
        let agents: Vec<DeliveryAgent> = (0..100)
            .map(|i| {
                let rating = Some(3.5 + (i % 3) as f64 * 0.3);
                let lat = 10.0 + ((i * 7) % 13) as f64 * 0.002;
                agent(i, lat, 76.0, AgentStatus::Available, rating)
            })
            .collect();

        let suggestions = rank_agents(&order(), Some(&pickup()), &agents);

        assert_eq!(suggestions.len(), MAX_SUGGESTIONS);
    }

    #[test]
    fn missing_delivery_location_yields_empty() {
        let agents = vec![agent(1, 10.0, 76.0, AgentStatus::Available, None)];

        let ranking = rank_agents_explained(&order_at(None), Some(&pickup()), &agents);

        assert!(ranking.suggestions.is_empty());
        assert_eq!(
            ranking.reason,
            Some(NoSuggestionReason::MissingDeliveryLocation)
        );
    }

    #[test]
    fn unresolved_pickup_yields_empty() {
        let agents = vec![agent(1, 10.0, 76.0, AgentStatus::Available, None)];

        let ranking = rank_agents_explained(&order(), None, &agents);

        assert!(ranking.suggestions.is_empty());
        assert_eq!(ranking.reason, Some(NoSuggestionReason::PickupUnresolved));
    }

    #[test]
    fn no_agents_yields_empty() {
        let ranking = rank_agents_explained(&order(), Some(&pickup()), &[]);

        assert!(ranking.suggestions.is_empty());
        assert_eq!(ranking.reason, Some(NoSuggestionReason::NoEligibleAgents));
    }

    #[test]
    fn all_offline_yields_empty() {
        let agents: Vec<DeliveryAgent> = (0..5)
            .map(|i| {
                let mut a = agent(i, 10.0, 76.0, AgentStatus::Available, Some(4.5));
                a.online = false;
                a
            })
            .collect();

        assert!(rank_agents(&order(), Some(&pickup()), &agents).is_empty());
    }

    #[test]
    fn successful_ranking_has_no_reason() {
        let agents = vec![agent(1, 10.0, 76.0, AgentStatus::Available, None)];

        let ranking = rank_agents_explained(&local_order(), Some(&pickup()), &agents);

        assert_eq!(ranking.reason, None);
        assert_eq!(ranking.suggestions[0].tier, SuggestionTier::Fastest);
        assert_eq!(ranking.suggestions[0].estimated_minutes, 5);
    }
}
