// Integration tests (native) for the `shinchan-stage` crate.
// These tests avoid wasm-specific functionality and exercise pure Rust logic so
// they can run under `cargo test` on the host.

use rand::SeedableRng;
use rand::rngs::SmallRng;
use shinchan_stage::config::{CloudConfig, Span};
use shinchan_stage::stage::clouds::{CloudChange, CloudField, CloudParams, remaining_lifetime};
use shinchan_stage::stage::dodge::{DodgePositioner, Position, Size};

// Spawn a burst, tear down immediately, then let a very long time pass.
#[test]
fn teardown_stops_every_callback() {
    let mut rng = SmallRng::seed_from_u64(10);
    let mut field = CloudField::new(CloudConfig::default());
    let spawned = field.start(0.0, &mut rng);
    assert_eq!(spawned.len(), 10);
    let before: Vec<_> = field.clouds().to_vec();

    field.shutdown();
    let mut now = 0.0;
    for _ in 0..1_000 {
        now += 3_600_000.0;
        assert!(field.advance(now, &mut rng).is_empty());
    }
    assert_eq!(field.clouds(), before.as_slice());
    assert_eq!(field.removed_total(), 0);
    assert_eq!(field.pending_timers(), 0);
}

fn inside(p: Position, area: Size, sprite: Size) -> bool {
    let max_x = (area.w - sprite.w).max(0.0);
    let max_y = (area.h - sprite.h).max(0.0);
    (0.0..=max_x).contains(&p.x) && (0.0..=max_y).contains(&p.y)
}

// The window is dragged through a series of sizes while the cursor keeps
// chasing the mascot; every position written must stay inside the area.
#[test]
fn dodge_and_recenter_stay_in_bounds_across_resizes() {
    let mut rng = SmallRng::seed_from_u64(21);
    let sprite = Size::new(160.0, 160.0);
    let resizes = [
        Size::new(400.0, 580.0),
        Size::new(1280.0, 580.0),
        Size::new(320.0, 580.0),
        Size::new(170.0, 580.0),
        Size::new(160.0, 160.0),
        Size::new(120.0, 90.0),
        Size::new(800.0, 580.0),
    ];
    let mut d = DodgePositioner::new(6.0);
    for area in resizes {
        for _ in 0..200 {
            let p = d.dodge(Some(area), Some(sprite), &mut rng).unwrap();
            assert!(inside(p, area, sprite), "dodge {p:?} in {area:?}");
        }
        let c = d.recenter(Some(area), Some(sprite)).unwrap();
        assert!(inside(c, area, sprite), "recenter {c:?} in {area:?}");
        assert_eq!(d.position(), c);
        assert_eq!(c.x, ((area.w - sprite.w) / 2.0).max(0.0));
        assert_eq!(c.y, ((area.h - sprite.h) / 2.0).max(0.0));

        // Not laid out yet: nothing moves.
        assert!(d.dodge(None, Some(sprite), &mut rng).is_none());
        assert_eq!(d.position(), c);
    }
}

// A config that would give clouds zero or negative lifetimes still keeps
// every live cloud ahead of its expiry, and the field keeps draining.
#[test]
fn misconfigured_clouds_still_expire_cleanly() {
    let mut rng = SmallRng::seed_from_u64(33);
    let cfg = CloudConfig {
        duration_s: Span::new(-10.0, 0.0),
        delay_fraction: Span::new(-0.5, -0.5),
        min_lifetime_s: -5.0,
        spawn_interval_ms: -1.0,
        ..CloudConfig::default()
    };
    assert!(cfg.validate().is_err());
    let mut field = CloudField::new(cfg);
    field.start(0.0, &mut rng);
    let mut now = 0.0;
    while now < 120_000.0 {
        now += 16.0;
        field.advance(now, &mut rng);
        for c in field.clouds() {
            assert!(c.remaining_ms(now) > 0.0, "{c:?} at {now}");
        }
    }
    assert!(field.removed_total() > 0);
    // 10 up front plus one per default 5 s period.
    assert_eq!(field.spawned_total(), 10 + 24);
}

#[test]
fn negative_delay_lifetime_scenario() {
    assert_eq!(remaining_lifetime(-30.0, 40.0, 2.0), 10.0);
    assert_eq!(remaining_lifetime(-45.0, 40.0, 2.0), 2.0);
}

#[test]
fn expiry_timers_fire_in_order() {
    let mut rng = SmallRng::seed_from_u64(0);
    let cfg = CloudConfig {
        initial_burst: 0,
        spawn_interval_ms: 1.0e9,
        ..CloudConfig::default()
    };
    let mut field = CloudField::new(cfg);
    field.start(0.0, &mut rng);
    let mk = |delay: f64, duration: f64| CloudParams {
        size: 120.0,
        top: 20.0,
        duration,
        opacity: 0.4,
        delay,
    };
    let slow = field.insert(0.0, mk(0.0, 60.0)).unwrap();
    let fast = field.insert(0.0, mk(-35.0, 40.0)).unwrap();
    let changes = field.advance(60_000.0, &mut rng);
    assert_eq!(
        changes,
        vec![CloudChange::Removed(fast.id), CloudChange::Removed(slow.id)]
    );
    assert!(field.is_empty());
}

// Without a browser there is never a running stage; stopping is still safe.
#[test]
fn stop_without_stage_is_a_no_op() {
    assert!(!shinchan_stage::stage_running());
    shinchan_stage::stop_stage();
    shinchan_stage::stop_stage();
    assert!(!shinchan_stage::stage_running());
}
