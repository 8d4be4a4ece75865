//! End-to-end isogon generation over synthetic grids.

use chrono::{TimeZone, Utc};
use isoband_common::feature::timestamp_value;
use isoband_common::{Feature, Geometry, Grid, Orientation, Properties, Quadrant, Ring};
use isobands::{EdgeMargins, IsobandConfig, IsobandPipeline, PassthroughSimplifier, SwapHalves};
use serde_json::json;
use test_utils::grid::{CONUS_40X20, GFS_GLOBAL, GLOBAL_36X18, SIMPLE_10X10};
use test_utils::grid::GridSpec;
use test_utils::{
    create_annulus_grid, create_constant_grid, create_plateau_grid, time::MRMS_SAMPLE_TIME,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

fn pipeline(config: IsobandConfig) -> IsobandPipeline {
    init_tracing();
    IsobandPipeline::new(config).with_simplifier(PassthroughSimplifier)
}

fn rings(feature: &Feature) -> Vec<Ring> {
    match feature.geometry.as_ref().expect("geometry") {
        Geometry::Polygon { coordinates } => coordinates
            .iter()
            .map(|r| Ring::new(r.iter().copied().map(Into::into).collect()))
            .collect(),
        other => panic!("unexpected geometry {other:?}"),
    }
}

/// Flip row order so the same field can sit on a south-up grid.
fn flip_rows(values: &[f64], width: usize) -> Vec<f64> {
    values
        .chunks_exact(width)
        .rev()
        .flatten()
        .copied()
        .collect()
}

#[test]
fn flat_grid_with_margins_yields_no_features() {
    let grid = SIMPLE_10X10
        .build(create_constant_grid(10, 10, 10.0))
        .unwrap();
    let out = pipeline(IsobandConfig::default())
        .isobands(&grid, Properties::new())
        .unwrap();
    assert_eq!(out.type_, "FeatureCollection");
    assert!(out.is_empty());
}

#[test]
fn collection_properties_pass_through() {
    let grid = CONUS_40X20
        .build(create_plateau_grid(40, 20, 0.0, (10, 5, 30, 15), 21.0))
        .unwrap();
    let at = Utc.with_ymd_and_hms(2025, 12, 11, 23, 59, 17).unwrap();
    let mut props = Properties::new();
    props.insert("measure".to_string(), json!("base-reflectivity"));
    props.insert("at".to_string(), timestamp_value(at));

    let out = pipeline(IsobandConfig::default())
        .isobands(&grid, props.clone())
        .unwrap();
    assert!(!out.is_empty());
    assert_eq!(out.properties, props);
    assert_eq!(out.properties["at"], json!(MRMS_SAMPLE_TIME));
}

#[test]
fn exteriors_ccw_holes_cw_and_holes_inside() {
    // A plateau with a pit in the middle: every level has a hole.
    let mut values = create_plateau_grid(40, 20, 0.0, (6, 3, 34, 17), 30.0);
    for y in 8..12 {
        for x in 17..23 {
            values[y * 40 + x] = 0.0;
        }
    }
    let grid = CONUS_40X20.build(values).unwrap();
    let out = pipeline(IsobandConfig::default()).isogons(&grid).unwrap();
    assert!(!out.is_empty());

    let mut saw_hole = false;
    for feature in &out.features {
        let rings = rings(feature);
        let (exterior, holes) = rings.split_first().unwrap();
        assert!(exterior.is_closed());
        assert!(exterior.len() >= 4);
        assert_eq!(exterior.orientation(), Orientation::CounterClockwise);
        for hole in holes {
            saw_hole = true;
            assert!(hole.is_closed());
            assert_eq!(hole.orientation(), Orientation::Clockwise);
            for p in hole.points() {
                assert!(exterior.contains(*p), "hole vertex {p:?} outside exterior");
            }
        }
    }
    assert!(saw_hole);
}

#[test]
fn bullseye_island_keeps_its_own_hole() {
    // Pit, island band, moat, outer band, all centred on (20, 20).
    let island = create_annulus_grid(41, 41, 0.0, 35.0, 3, 6);
    let outer = create_annulus_grid(41, 41, 0.0, 35.0, 11, 15);
    let values: Vec<f64> = island.iter().zip(&outer).map(|(a, b)| a.max(*b)).collect();
    let spec = GridSpec {
        width: 41,
        height: 41,
        ..SIMPLE_10X10
    };
    let config = IsobandConfig {
        step: 10.0,
        clip_quadrants: false,
        ..Default::default()
    };
    let out = pipeline(config).isogons(&spec.build(values).unwrap()).unwrap();

    assert_eq!(out.len(), 2);
    let outer_rings = rings(&out.features[0]);
    let island_rings = rings(&out.features[1]);
    assert_eq!(outer_rings.len(), 2, "outer band has the moat as its hole");
    assert_eq!(island_rings.len(), 2, "island has the pit as its hole");
    assert!(outer_rings[0].area() > island_rings[0].area());
    assert!(outer_rings[1].area() > island_rings[0].area());
    for p in island_rings[1].points() {
        assert!(island_rings[0].contains(*p));
    }
}

#[test]
fn row_order_does_not_change_output() {
    let north = create_plateau_grid(40, 20, 0.0, (8, 4, 28, 14), 27.0);
    let south = flip_rows(&north, 40);

    let north_grid = CONUS_40X20.build(north).unwrap();
    let south_grid = CONUS_40X20.build_south_up(south).unwrap();
    let p = pipeline(IsobandConfig::default());
    let a = p.isogons(&north_grid).unwrap();
    let b = p.isogons(&south_grid).unwrap();

    assert_eq!(a.len(), b.len());
    for (fa, fb) in a.features.iter().zip(&b.features) {
        assert_eq!(fa.properties, fb.properties);
        let ra = &rings(fa)[0];
        let rb = &rings(fb)[0];
        assert_eq!(rb.orientation(), Orientation::CounterClockwise);
        assert!((ra.area() - rb.area()).abs() < 1e-6);
    }
}

#[test]
fn storm_over_origin_is_split_into_quadrants() {
    let values = create_plateau_grid(36, 18, 0.0, (14, 5, 22, 13), 30.0);
    let grid = GLOBAL_36X18.build(values).unwrap();
    let out = pipeline(IsobandConfig::default()).isogons(&grid).unwrap();

    let mut seen = std::collections::HashSet::new();
    for feature in &out.features {
        let quadrant = feature.properties.quadrant.expect("quadrant");
        seen.insert(quadrant);
        let bounds = quadrant.bounds();
        for ring in rings(feature) {
            for p in ring.points() {
                assert!(bounds.contains_point(p.x, p.y), "{p:?} outside {quadrant}");
            }
            for pair in ring.points().windows(2) {
                assert!((pair[0].x - pair[1].x).abs() <= 180.0);
            }
        }
    }
    assert_eq!(seen.len(), 4);
}

#[test]
fn swap_halves_recentres_a_0_360_grid() {
    let lons: Vec<f64> = (0..36).map(|c| 5.0 + c as f64 * 10.0).collect();
    let lats = GLOBAL_36X18.row_latitudes();
    let mut values = vec![0.0; 36 * 18];
    for y in 6..12 {
        for x in [0usize, 1, 2, 33, 34, 35] {
            values[y * 36 + x] = 30.0;
        }
    }
    let grid = Grid::from_axes(36, 18, values, &lats, &lons).unwrap();

    let out = pipeline(IsobandConfig::default())
        .with_initial_transform(SwapHalves)
        .isogons(&grid)
        .unwrap();
    assert!(!out.is_empty());

    let level0: Vec<&Feature> = out
        .features
        .iter()
        .filter(|f| f.properties.level_index == 0)
        .collect();
    let quadrants: Vec<Quadrant> = level0.iter().filter_map(|f| f.properties.quadrant).collect();
    assert!(quadrants.contains(&Quadrant::Nw));
    assert!(quadrants.contains(&Quadrant::Ne));
    for feature in &out.features {
        for ring in rings(feature) {
            assert!(ring.points().iter().all(|p| (-180.0..=180.0).contains(&p.x)));
        }
    }
}

#[test]
fn gfs_layout_storm_on_the_seam_lands_in_all_quadrants() {
    // GFS layout at a tenth of the resolution.
    let spec = GridSpec {
        width: 144,
        height: 73,
        ..GFS_GLOBAL
    };
    let mut values = vec![0.0; spec.size()];
    for y in 30..44 {
        for x in (0..6).chain(138..144) {
            values[y * spec.width + x] = 30.0;
        }
    }
    let grid = spec.build(values).unwrap();

    let out = pipeline(IsobandConfig::default())
        .with_initial_transform(SwapHalves)
        .isogons(&grid)
        .unwrap();

    let quadrants: std::collections::HashSet<Quadrant> =
        out.features.iter().filter_map(|f| f.properties.quadrant).collect();
    assert_eq!(quadrants.len(), 4);
    for feature in &out.features {
        for ring in rings(feature) {
            assert!(ring.points().iter().all(|p| (-180.0..=180.0).contains(&p.x)));
            assert!(ring.points().iter().all(|p| p.x.abs() < 30.0), "storm stays near 0");
        }
    }
}

#[test]
fn ring_around_the_origin_has_no_edge_holes() {
    let values = create_annulus_grid(36, 18, 0.0, 30.0, 3, 7);
    let grid = GLOBAL_36X18.build(values).unwrap();
    let out = pipeline(IsobandConfig::default()).isogons(&grid).unwrap();

    let quadrants: std::collections::HashSet<Quadrant> =
        out.features.iter().filter_map(|f| f.properties.quadrant).collect();
    assert_eq!(quadrants.len(), 4);
    for feature in &out.features {
        let rings = rings(feature);
        assert_eq!(rings.len(), 1, "hole folded into the exterior");
        assert_eq!(rings[0].orientation(), Orientation::CounterClockwise);
    }
}

#[test]
fn geojson_shape() {
    let grid = CONUS_40X20
        .build(create_plateau_grid(40, 20, 0.0, (10, 5, 30, 15), 21.0))
        .unwrap();
    let config = IsobandConfig {
        margins: EdgeMargins::uniform(2),
        ..Default::default()
    };
    let out = pipeline(config).isogons(&grid).unwrap();
    let value = serde_json::to_value(&out).unwrap();

    assert_eq!(value["type"], "FeatureCollection");
    let feature = &value["features"][0];
    assert_eq!(feature["type"], "Feature");
    assert_eq!(feature["geometry"]["type"], "Polygon");
    assert_eq!(feature["properties"]["levelIndex"], 0);
    assert_eq!(feature["properties"]["floor"], 10.0);
    assert_eq!(feature["properties"]["ceiling"], 12.5);
    assert_eq!(feature["properties"]["quadrant"], "NW");
    assert!(feature["properties"].get("isHole").is_none());

    let ring = &feature["geometry"]["coordinates"][0];
    let first = &ring[0];
    assert!(first[0].as_f64().unwrap() < -60.0, "longitude first");
}
