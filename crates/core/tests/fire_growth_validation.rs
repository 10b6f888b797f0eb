//! End-to-end fire growth validation
//!
//! Runs the full engine (census, template cache, overlay walks) over multi
//! period simulations and checks the results against hand-verified arrival
//! times from the underlying ellipse model.
//!
//! The standard fixture is a 1000 x 1000 grid at 10 ft spacing burning under
//! constant conditions: fuel model 124, 25% slope with a north-west aspect,
//! and a 10 mi/h north-west wind, which produce a 50.39 ft/min head running
//! south-east with a length-to-width ratio of 3.58.
//!
//! Run with: cargo test --test fire_growth_validation

use std::sync::Once;

use firegrow_core::{
    BarrierKind, ConstantFireBehaviorProvider, ConstantFireInputProvider, FireStateGrid, GeoBounds,
};

static INIT: Once = Once::new();

fn init_tracing() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

fn standard_grid() -> FireStateGrid {
    let bounds = GeoBounds::new(1000.0, 5000.0, 2000.0, 4000.0, 10.0, 10.0).unwrap();
    FireStateGrid::new(
        bounds,
        Box::new(ConstantFireInputProvider::default()),
        Box::new(ConstantFireBehaviorProvider::default()),
    )
    .unwrap()
}

/// One two-minute period from a single ignition reproduces the ellipse
/// model's arrival time at the eastern neighbor
#[test]
fn test_single_period_arrival_times() {
    init_tracing();
    let mut fire = standard_grid();
    fire.ignite_at(1500.0, 4500.0, 0.0).unwrap();
    assert!(fire.advance_period(2.0).unwrap());

    let east = fire
        .status_at(1510.0, 4500.0)
        .unwrap()
        .ignition_time()
        .unwrap();
    assert!(
        (east - 1.596939267364341).abs() < 1e-9,
        "east neighbor arrival: expected 1.596939267364341, got {east:.15}"
    );

    // The head runs south-east, so the north-west (backing) side stays
    // unburned after two minutes
    assert!(fire.is_burned_at(1510.0, 4490.0, 2.0).unwrap());
    assert!(fire.is_unburned_at(1490.0, 4510.0, 2.0).unwrap());

    // Every ignition this period falls inside the window
    let census = fire.census_at(fire.period().ends());
    for point in &census.perimeter {
        assert!(point.time < fire.period().ends());
        assert!(point.time >= 0.0);
    }
}

/// Thirty one-minute periods grow the burned area monotonically and keep
/// the census categories summing to the grid size
#[test]
fn test_thirty_period_growth_is_monotonic() {
    init_tracing();
    let mut fire = standard_grid();
    fire.ignite_at(1500.0, 4500.0, 0.0).unwrap();

    let cells = fire.bounds().cells();
    let mut last_burned = 0;
    for _ in 0..30 {
        assert!(fire.advance_period(1.0).unwrap());
        let census = fire.census_at(fire.period().ends());
        assert!(
            census.burned > last_burned,
            "period {} did not grow the fire",
            fire.period().number()
        );
        assert_eq!(census.burned + census.unburned + census.unburnable, cells);
        last_burned = census.burned;

        let stats = fire.period_stats();
        assert_eq!(
            stats.current + stats.previous + stats.unburned + stats.unburnable,
            cells
        );
    }

    // Constant conditions and a constant duration build exactly one template
    assert_eq!(fire.template_cache().len(), 1);
    assert_eq!(fire.template_cache().misses(), 1);
    assert!(fire.template_cache().hits() > 0);
}

/// Ignition times never move later once set
#[test]
fn test_ignition_times_only_ever_decrease() {
    init_tracing();
    let mut fire = standard_grid();
    fire.ignite_at(1500.0, 4500.0, 0.0).unwrap();

    let mut recorded: Vec<Option<f64>> = Vec::new();
    for _ in 0..10 {
        fire.advance_period(1.0).unwrap();
    }
    let probes = [
        (1510.0, 4490.0),
        (1600.0, 4400.0),
        (1700.0, 4300.0),
        (1500.0, 4510.0),
    ];
    for &(x, y) in &probes {
        recorded.push(fire.status_at(x, y).unwrap().ignition_time());
    }
    for _ in 0..10 {
        fire.advance_period(1.0).unwrap();
    }
    for (i, &(x, y)) in probes.iter().enumerate() {
        let now = fire.status_at(x, y).unwrap().ignition_time();
        match (recorded[i], now) {
            (Some(before), Some(after)) => assert!(
                after <= before,
                "ignition at [{x}, {y}] moved later: {before} -> {after}"
            ),
            (Some(_), None) => panic!("ignition at [{x}, {y}] was lost"),
            _ => {}
        }
    }
}

/// A full-height control line stops the fire cold
#[test]
fn test_control_line_stops_the_spread() {
    init_tracing();
    let mut fire = standard_grid();
    fire.set_unburnable_col(1600.0, 5000.0, 4000.0, BarrierKind::ControlLine)
        .unwrap();
    fire.ignite_at(1500.0, 4500.0, 0.0).unwrap();

    for _ in 0..10 {
        fire.advance_period(1.0).unwrap();
    }
    let at = fire.period().ends();
    // West of the line the head has long since arrived
    assert!(fire.is_burned_at(1590.0, 4410.0, at).unwrap());
    // The line itself and everything east of it are untouched
    assert!(fire.is_unburnable(1600.0, 4500.0).unwrap());
    assert!(fire.is_unburned_at(1610.0, 4500.0, at).unwrap());
    assert!(fire.is_unburned_at(1800.0, 4300.0, at).unwrap());
}

/// On a small grid the simulation burns out and reports it by returning
/// FALSE from `advance_period`
#[test]
fn test_simulation_terminates_when_fully_burned() {
    init_tracing();
    let bounds = GeoBounds::new(0.0, 100.0, 100.0, 0.0, 10.0, 10.0).unwrap();
    let mut fire = FireStateGrid::new(
        bounds,
        Box::new(ConstantFireInputProvider::default()),
        Box::new(ConstantFireBehaviorProvider::default()),
    )
    .unwrap();
    fire.ignite_at(50.0, 50.0, 0.0).unwrap();

    let mut finished = false;
    for _ in 0..500 {
        if !fire.advance_period(1.0).unwrap() {
            finished = true;
            break;
        }
    }
    assert!(finished, "fire never burned out");

    let census = fire.census_at(fire.period().ends());
    assert_eq!(census.unburned, 0);
    assert_eq!(census.burned, bounds.cells());
    assert!(census.perimeter.is_empty());
    // With no interior left every burned point has zero open faces
    assert_eq!(census.open_faces[0], census.burned);
}

/// Resetting after a burn returns the grid to a fresh simulation
#[test]
fn test_reset_supports_a_second_run() {
    init_tracing();
    let mut fire = standard_grid();
    fire.ignite_at(1500.0, 4500.0, 0.0).unwrap();
    fire.advance_period(2.0).unwrap();
    let first = fire
        .status_at(1510.0, 4500.0)
        .unwrap()
        .ignition_time()
        .unwrap();

    fire.reset();
    assert_eq!(fire.period().number(), 0);
    assert_eq!(fire.census_at(f64::MAX).burned, 0);

    fire.ignite_at(1500.0, 4500.0, 0.0).unwrap();
    fire.advance_period(2.0).unwrap();
    let second = fire
        .status_at(1510.0, 4500.0)
        .unwrap()
        .ignition_time()
        .unwrap();
    assert_eq!(first, second);
}
