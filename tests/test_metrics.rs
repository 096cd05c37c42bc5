//! Derived-metrics calculator tests.

mod common;

use common::{competitor, position, review, sales};
use market_analytics_sdk::metrics::{
    average_rating, competitor_price_gap, format_average_rating, keyword_ctr, percentage,
    sales_totals, sentiment_distribution, CtrFunnel, Direction, FunnelStage, PositionDelta,
    SentimentCounts,
};
use market_analytics_sdk::models::{CtrMetrics, Keyword, Sentiment};

// ---------------------------------------------------------------------------
// Ratings and sentiment
// ---------------------------------------------------------------------------

#[test]
fn average_rating_of_empty_set_is_zero() {
    assert_eq!(average_rating(&[]), 0.0);
    assert_eq!(format_average_rating(&[]), "0");
}

#[test]
fn average_rating_is_mean_of_scores() {
    let reviews = vec![
        review(1, 5, Sentiment::Positive),
        review(2, 4, Sentiment::Positive),
        review(3, 4, Sentiment::Neutral),
    ];
    let avg = average_rating(&reviews);
    assert!((avg - 13.0 / 3.0).abs() < 1e-9);
    assert_eq!(format_average_rating(&reviews), "4.3");
}

#[test]
fn average_rating_stays_within_bounds() {
    for n in 1..=5u8 {
        let reviews: Vec<_> = (1..=n as u64)
            .map(|i| review(i, ((i % 5) + 1) as u8, Sentiment::Neutral))
            .collect();
        let avg = average_rating(&reviews);
        assert!((1.0..=5.0).contains(&avg), "{avg}");
    }
}

#[test]
fn empty_sentiment_distribution_reports_all_buckets() {
    let counts = sentiment_distribution(&[]);
    assert_eq!(
        counts,
        SentimentCounts {
            positive: 0,
            negative: 0,
            neutral: 0
        }
    );
    let json = serde_json::to_value(counts).unwrap();
    assert_eq!(json, serde_json::json!({"positive": 0, "negative": 0, "neutral": 0}));
}

#[test]
fn sentiment_buckets_sum_to_review_count() {
    let reviews = vec![
        review(1, 5, Sentiment::Positive),
        review(2, 1, Sentiment::Negative),
        review(3, 3, Sentiment::Neutral),
        review(4, 2, Sentiment::Negative),
    ];
    let counts = sentiment_distribution(&reviews);
    assert_eq!(counts.positive, 1);
    assert_eq!(counts.negative, 2);
    assert_eq!(counts.neutral, 1);
    assert_eq!(counts.total(), reviews.len());
    assert_eq!(counts.get(Sentiment::Negative), 2);
    assert_eq!(counts.share(Sentiment::Negative), 50.0);
}

#[test]
fn sentiment_shares_cover_every_review() {
    let reviews = vec![
        review(1, 5, Sentiment::Positive),
        review(2, 1, Sentiment::Negative),
        review(3, 3, Sentiment::Neutral),
        review(4, 4, Sentiment::Positive),
    ];
    let counts = sentiment_distribution(&reviews);
    let total: f64 = Sentiment::ALL.iter().map(|s| counts.share(*s)).sum();
    assert!((total - 100.0).abs() < 1e-9);
    assert_eq!(counts.share(Sentiment::Positive), 50.0);
    assert_eq!(sentiment_distribution(&[]).share(Sentiment::Neutral), 0.0);
}

// ---------------------------------------------------------------------------
// Funnel
// ---------------------------------------------------------------------------

#[test]
fn funnel_is_empty_without_impressions() {
    assert!(CtrFunnel::from_metrics(&CtrMetrics::default()).is_none());

    let clicks_only = CtrMetrics {
        total_clicks: 10,
        ..CtrMetrics::default()
    };
    assert!(CtrFunnel::from_metrics(&clicks_only).is_none());
}

#[test]
fn funnel_orders_stages_and_rates() {
    let funnel = CtrFunnel::from_metrics(&CtrMetrics {
        total_impressions: 2000,
        total_clicks: 100,
        total_conversions: 5,
        ctr: 0.05,
    })
    .unwrap();

    let stages = funnel.stages();
    assert_eq!(stages[0], (FunnelStage::Impressions, 2000));
    assert_eq!(stages[1], (FunnelStage::Clicks, 100));
    assert_eq!(stages[2], (FunnelStage::Conversions, 5));
    assert_eq!(funnel.click_through_rate(), 0.05);
    assert_eq!(funnel.conversion_rate(), 0.05);
    assert_eq!(funnel.stage_percentage(FunnelStage::Impressions), 100.0);
    assert_eq!(funnel.stage_percentage(FunnelStage::Clicks), 5.0);
}

#[test]
fn conversion_rate_without_clicks_is_zero() {
    let funnel = CtrFunnel::from_metrics(&CtrMetrics {
        total_impressions: 10,
        ..CtrMetrics::default()
    })
    .unwrap();
    assert_eq!(funnel.conversion_rate(), 0.0);
}

// ---------------------------------------------------------------------------
// Position delta
// ---------------------------------------------------------------------------

#[test]
fn climbing_rank_is_an_improvement() {
    let delta = PositionDelta::between(15, 8);
    assert_eq!(delta.delta, 7);
    assert_eq!(delta.magnitude, 7);
    assert_eq!(delta.direction, Direction::Improved);
    assert_eq!(delta.label(), "+7");
}

#[test]
fn falling_rank_is_a_decline() {
    let delta = PositionDelta::between(18, 23);
    assert_eq!(delta.delta, -5);
    assert_eq!(delta.magnitude, 5);
    assert_eq!(delta.direction, Direction::Declined);
    assert_eq!(delta.label(), "-5");
}

#[test]
fn equal_ranks_are_unchanged() {
    let delta = PositionDelta::between(4, 4);
    assert_eq!(delta.delta, 0);
    assert_eq!(delta.direction, Direction::Unchanged);
    assert_eq!(delta.label(), "0");
}

#[test]
fn direction_is_improved_iff_previous_is_greater() {
    for previous in 1..=20u32 {
        for current in 1..=20u32 {
            let delta = PositionDelta::between(previous, current);
            assert_eq!(delta.direction == Direction::Improved, previous > current);
            assert_eq!(delta.delta, i64::from(previous) - i64::from(current));
        }
    }
}

#[test]
fn delta_from_history_uses_first_and_last_point() {
    let points = vec![position(1, 30), position(2, 22), position(3, 12)];
    let delta = PositionDelta::from_history(&points).unwrap();
    assert_eq!(delta.previous, 30);
    assert_eq!(delta.current, 12);
    assert_eq!(delta.direction, Direction::Improved);

    assert!(PositionDelta::from_history(&points[..1]).is_none());
    assert!(PositionDelta::from_history(&[]).is_none());
}

// ---------------------------------------------------------------------------
// Percentages and totals
// ---------------------------------------------------------------------------

#[test]
fn percentage_is_clamped() {
    assert_eq!(percentage(25.0, 200.0), 12.5);
    assert_eq!(percentage(300.0, 200.0), 100.0);
    assert_eq!(percentage(-5.0, 200.0), 0.0);
    assert_eq!(percentage(5.0, 0.0), 0.0);
}

#[test]
fn keyword_ctr_derives_from_counts() {
    let kw = Keyword {
        keyword: "phone case".into(),
        impressions: 400,
        clicks: 20,
        ctr: 0.05,
        position: Some(3),
    };
    assert_eq!(keyword_ctr(&kw), 0.05);

    let unseen = Keyword {
        impressions: 0,
        clicks: 0,
        ..kw
    };
    assert_eq!(keyword_ctr(&unseen), 0.0);
}

#[test]
fn sales_totals_sum_every_day() {
    let totals = sales_totals(&[sales(1, 3, 300.0), sales(2, 4, 450.5)]);
    assert_eq!(totals.sales, 7);
    assert_eq!(totals.orders, 7);
    assert_eq!(totals.revenue, 750.5);
    assert_eq!(sales_totals(&[]).sales, 0);
}

#[test]
fn price_gap_against_competitor_mean() {
    let rivals = vec![competitor(1, 900.0), competitor(2, 1100.0)];
    let gap = competitor_price_gap(800.0, &rivals).unwrap();
    assert!((gap + 0.2).abs() < 1e-9);

    assert!(competitor_price_gap(800.0, &[]).is_none());
    assert!(competitor_price_gap(800.0, &[competitor(3, 0.0)]).is_none());
}
