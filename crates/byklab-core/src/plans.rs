//! Subscription plan catalog.
//!
//! Plans come from the backend's `GET /api/subscriptions/plans` as an ordered
//! list. [`PlanCatalog::default`] mirrors what the backend serves so the
//! client can work offline and in tests.

use serde::{Deserialize, Serialize};

use crate::tier::Tier;

/// One purchasable plan.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    /// Stable plan id (`free`, `basic`, ...).
    pub id: String,
    /// Display name, also the `plan_name` sent to payment activation.
    pub name: String,
    /// Monthly price in whole lira.
    pub price: u32,
    /// Marketing bullet points.
    #[serde(default)]
    pub features: Vec<String>,
    /// Unlocks the exercise browser.
    #[serde(default)]
    pub has_anatomy: bool,
    /// Unlocks the video carousel.
    #[serde(default)]
    pub has_video_swipe: bool,
}

impl Plan {
    /// The tier this plan activates, matched by id and then by name.
    pub fn tier(&self) -> Option<Tier> {
        self.id.parse::<Tier>().or_else(|_| self.name.parse()).ok()
    }

    /// Whether selecting this plan needs no payment.
    pub fn is_free(&self) -> bool {
        self.price == 0
    }
}

/// Ordered list of plans.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlanCatalog {
    plans: Vec<Plan>,
}

impl PlanCatalog {
    /// Wrap a plan list, keeping backend order.
    pub fn new(plans: Vec<Plan>) -> Self {
        Self { plans }
    }

    /// Plans in catalog order.
    pub fn plans(&self) -> &[Plan] {
        &self.plans
    }

    /// Look up a plan by id.
    pub fn get(&self, id: &str) -> Option<&Plan> {
        self.plans.iter().find(|p| p.id == id)
    }

    /// Look up a plan by display name.
    pub fn find_by_name(&self, name: &str) -> Option<&Plan> {
        self.plans.iter().find(|p| p.name == name)
    }

    /// The plan that activates `tier`.
    pub fn for_tier(&self, tier: Tier) -> Option<&Plan> {
        self.plans.iter().find(|p| p.tier() == Some(tier))
    }

    /// Number of plans.
    pub fn len(&self) -> usize {
        self.plans.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.plans.is_empty()
    }
}

impl Default for PlanCatalog {
    fn default() -> Self {
        let plan = |tier: Tier, price: u32, features: &[&str], anatomy: bool, video: bool| Plan {
            id: tier.id().to_string(),
            name: tier.display_name().to_string(),
            price,
            features: features.iter().map(ToString::to_string).collect(),
            has_anatomy: anatomy,
            has_video_swipe: video,
        };

        Self::new(vec![
            plan(
                Tier::Free,
                0,
                &["Blog erişimi", "Hakkımızda erişimi"],
                false,
                false,
            ),
            plan(
                Tier::Basic,
                100,
                &["Egzersiz modülü", "Kas seçim sistemi", "Temel analizler"],
                true,
                false,
            ),
            plan(
                Tier::Advanced,
                300,
                &[
                    "Video swipe modülü",
                    "Detaylı analizler",
                    "Dashboard erişimi",
                    "Diyet planları",
                ],
                true,
                true,
            ),
            plan(
                Tier::Comprehensive,
                500,
                &[
                    "Tüm özellikler",
                    "Kişisel antrenör desteği",
                    "AI öneriler",
                    "Öncelikli destek",
                    "3D kas animasyonları",
                ],
                true,
                true,
            ),
        ])
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entitlements::check;
    use crate::feature::Feature;

    #[test]
    fn default_catalog_is_in_tier_order() {
        let catalog = PlanCatalog::default();
        let tiers: Vec<_> = catalog.plans().iter().filter_map(Plan::tier).collect();
        assert_eq!(tiers, Tier::ALL.to_vec());
    }

    #[test]
    fn only_free_plan_costs_nothing() {
        let catalog = PlanCatalog::default();
        let free: Vec<_> = catalog.plans().iter().filter(|p| p.is_free()).collect();
        assert_eq!(free.len(), 1);
        assert_eq!(free[0].id, "free");
    }

    #[test]
    fn plan_flags_agree_with_entitlements() {
        for plan in PlanCatalog::default().plans() {
            let tier = plan.tier().unwrap();
            assert_eq!(plan.has_anatomy, check(tier, Feature::ExerciseBrowser), "{}", plan.id);
            assert_eq!(plan.has_video_swipe, check(tier, Feature::VideoCarousel), "{}", plan.id);
        }
    }

    #[test]
    fn lookups() {
        let catalog = PlanCatalog::default();
        assert_eq!(catalog.get("advanced").unwrap().price, 300);
        assert_eq!(catalog.find_by_name("Kapsamlı").unwrap().id, "comprehensive");
        assert_eq!(catalog.for_tier(Tier::Basic).unwrap().name, "Temel");
        assert!(catalog.get("platinum").is_none());
        assert_eq!(catalog.len(), 4);
    }

    #[test]
    fn tier_falls_back_to_name() {
        let plan = Plan {
            id: "promo-2025".to_string(),
            name: "Gelişmiş".to_string(),
            price: 250,
            features: vec![],
            has_anatomy: true,
            has_video_swipe: true,
        };
        assert_eq!(plan.tier(), Some(Tier::Advanced));
    }

    #[test]
    fn deserializes_backend_list() {
        let json = r#"[
            {"id":"free","name":"Ücretsiz","price":0,"features":["Blog erişimi"],"has_anatomy":false,"has_video_swipe":false},
            {"id":"basic","name":"Temel","price":100,"features":[],"has_anatomy":true,"has_video_swipe":false}
        ]"#;
        let catalog: PlanCatalog = serde_json::from_str(json).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.plans()[1].tier(), Some(Tier::Basic));
    }
}
