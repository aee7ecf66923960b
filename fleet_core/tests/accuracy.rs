//! Per-sample accuracy score: anchor points of the three bands and the
//! speed-dependent threshold boost.

use fleet_core::accuracy::speed_boost_m;
use fleet_core::{AccuracyCfg, score_sample, score_sample_with};
use rstest::rstest;

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[rstest]
#[case(Some(0.0), 0.0, 100.0)]
#[case(Some(12.0), 0.0, 100.0)]
#[case(Some(23.5), 0.0, 80.0)] // midpoint of green-yellow band
#[case(Some(35.0), 0.0, 60.0)]
#[case(Some(57.5), 0.0, 30.0)] // midpoint of yellow-red band
#[case(Some(80.0), 0.0, 0.0)]
#[case(Some(80.5), 0.0, 0.0)]
#[case(Some(20.0), 90.0, 100.0)] // g becomes 22
#[case(Some(22.0), 120.0, 100.0)]
#[case(Some(17.0), 50.0, 100.0)] // boost 5 at exactly 50 km/h
#[case(Some(19.5), 70.0, 100.0)] // boost 7.5 at 70 km/h
#[case(Some(42.5), 70.0, 60.0)]
#[case(Some(87.5), 70.0, 0.0)]
#[case(None, 0.0, 0.0)]
#[case(None, 120.0, 0.0)]
#[case(Some(f64::NAN), 0.0, 0.0)]
#[case(Some(f64::INFINITY), 0.0, 0.0)]
#[case(Some(f64::NEG_INFINITY), 0.0, 0.0)]
fn anchor_points(#[case] err: Option<f64>, #[case] speed: f64, #[case] expect: f64) {
    let got = score_sample(err, speed);
    assert!(close(got, expect), "err={err:?} speed={speed}: got {got}, want {expect}");
}

#[rstest]
fn boost_interpolates_between_bands() {
    let cfg = AccuracyCfg::STOCK;
    assert_eq!(speed_boost_m(0.0, &cfg), 0.0);
    assert!(close(speed_boost_m(60.0, &cfg), 6.25));
    assert!(close(speed_boost_m(80.0, &cfg), 8.75));
    assert_eq!(speed_boost_m(90.0, &cfg), 10.0);
}

#[rstest]
fn no_jump_at_fifty_kmh_inside_green_yellow_band() {
    // Just below 50 km/h there is no boost; at 50 the boost is 5 m.
    let below = score_sample(Some(20.0), 49.999_999);
    let at = score_sample(Some(20.0), 50.0);
    assert!(at >= below);
    assert!(close(at, 100.0 - (20.0 - 17.0) * 40.0 / 23.0));
}

#[rstest]
fn custom_thresholds_are_honored() {
    let cfg = AccuracyCfg {
        green_m: 5.0,
        yellow_m: 10.0,
        red_m: 20.0,
        ..AccuracyCfg::STOCK
    };
    assert_eq!(score_sample_with(&cfg, Some(5.0), 0.0), 100.0);
    assert!(close(score_sample_with(&cfg, Some(10.0), 0.0), 60.0));
    assert!(close(score_sample_with(&cfg, Some(15.0), 0.0), 30.0));
    assert_eq!(score_sample_with(&cfg, Some(20.0), 0.0), 0.0);
}
