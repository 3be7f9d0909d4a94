//! Quiet news flow, positive earnings surprise, clean balance sheet.

use crate::domain::{HitDetails, HitEntry, MetricsBundle};

use super::{ScreenStrategy, LOW_BUZZ_HIGH_SURPRISE};

/// Passes when all of:
/// - `news_story_count <= max_news_stories`
/// - `latest_eps > 0` and `eps_surprise_pct > 0`
/// - `debt <= max_debt`
/// - `short_ratio < max_short_ratio`
#[derive(Debug, Clone, PartialEq)]
pub struct LowBuzzSurpriseScreen {
    pub max_news_stories: u32,
    pub max_debt: f64,
    pub max_short_ratio: f64,
}

impl Default for LowBuzzSurpriseScreen {
    fn default() -> Self {
        Self {
            max_news_stories: 1,
            max_debt: 0.0,
            max_short_ratio: 10.0,
        }
    }
}

impl ScreenStrategy for LowBuzzSurpriseScreen {
    fn name(&self) -> &str {
        LOW_BUZZ_HIGH_SURPRISE
    }

    fn description(&self) -> &str {
        "at most one news story, positive EPS surprise, no debt, short ratio under 10"
    }

    fn evaluate(&self, bundle: &MetricsBundle) -> Option<HitEntry> {
        let news_story_count = bundle
            .news_story_count()
            .filter(|&n| n <= self.max_news_stories)?;
        let latest_eps = bundle.latest_eps().filter(|&eps| eps > 0.0)?;
        let eps_surprise_pct = bundle.eps_surprise_pct().filter(|&s| s > 0.0)?;
        bundle.debt().filter(|&d| d <= self.max_debt)?;
        bundle.short_ratio().filter(|&r| r < self.max_short_ratio)?;

        Some(HitEntry::new(
            bundle.symbol(),
            HitDetails::EarningsSurprise {
                eps_surprise_pct,
                latest_eps,
                news_story_count,
            },
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn passing() -> crate::domain::MetricsBundleBuilder {
        MetricsBundle::builder("QUIET")
            .news_story_count(1)
            .latest_eps(0.8)
            .eps_surprise_pct(0.35)
            .debt(0.0)
            .short_ratio(3.2)
    }

    fn eval(b: crate::domain::MetricsBundleBuilder) -> Option<HitEntry> {
        LowBuzzSurpriseScreen::default().evaluate(&b.build().unwrap())
    }

    #[test]
    fn all_conditions_met() {
        let hit = eval(passing()).unwrap();
        assert_eq!(
            hit.details,
            HitDetails::EarningsSurprise {
                eps_surprise_pct: 0.35,
                latest_eps: 0.8,
                news_story_count: 1,
            }
        );
    }

    #[test]
    fn too_much_news() {
        assert!(eval(passing().news_story_count(2)).is_none());
    }

    #[test]
    fn any_debt_fails() {
        assert!(eval(passing().debt(1.0)).is_none());
        assert!(eval(passing().debt(-50.0)).is_some());
    }

    #[test]
    fn short_ratio_bound_is_strict() {
        assert!(eval(passing().short_ratio(10.0)).is_none());
        assert!(eval(passing().short_ratio(9.99)).is_some());
    }

    #[test]
    fn non_positive_surprise_or_eps_fails() {
        assert!(eval(passing().eps_surprise_pct(0.0)).is_none());
        assert!(eval(passing().latest_eps(-0.1)).is_none());
    }

    #[test]
    fn each_required_field_is_required() {
        let strip: [fn(&mut crate::domain::MetricsBundleBuilder); 5] = [
            |b| b.news_story_count = None,
            |b| b.latest_eps = None,
            |b| b.eps_surprise_pct = None,
            |b| b.debt = None,
            |b| b.short_ratio = None,
        ];
        for remove in strip {
            let mut b = passing();
            remove(&mut b);
            assert!(eval(b).is_none());
        }
    }
}
