//! End-to-end tests of the complete pipeline, stereo extension included.

mod common;

use approx::assert_relative_eq;
use common::{add_track, make_pool, TrackSpec, PLANE_Z, Z_REF};
use seedling::{Half, SeedFinder, SeedingParams};

#[test]
fn straight_3d_track_is_recovered_in_the_upper_half() {
    let mut pool = make_pool();
    let mut next_id = 0;
    let spec = TrackSpec {
        x0: 20.0,
        tx: 0.012,
        cx: 0.0,
        ty: 0.03,
    };
    add_track(&mut pool, Half::Upper, &spec, &[], &mut next_id);

    let finder = SeedFinder::new(SeedingParams::default());
    let tracks = finder.run(&mut pool);
    assert_eq!(tracks.len(), 1);

    let track = &tracks[0];
    assert_eq!(track.half(), Half::Upper);
    // six bend-plane hits plus a five-hit stereo window
    assert_eq!(track.hits().len(), 11);
    assert_eq!(track.ndof(), 11 - 5);
    assert_relative_eq!(track.y_slope(), spec.ty, epsilon = 1e-4);
    assert_relative_eq!(track.y(Z_REF), spec.y_at(Z_REF), epsilon = 0.5);
    for &z in &PLANE_Z {
        assert!((track.x(z) - spec.x_at(z)).abs() < 0.1, "z = {z}");
    }
}

#[test]
fn downward_track_is_recovered_in_the_lower_half() {
    let mut pool = make_pool();
    let mut next_id = 0;
    let spec = TrackSpec {
        x0: -60.0,
        tx: -0.02,
        cx: 0.0,
        ty: -0.025,
    };
    add_track(&mut pool, Half::Lower, &spec, &[], &mut next_id);

    let tracks = SeedFinder::new(SeedingParams::default()).run(&mut pool);
    assert_eq!(tracks.len(), 1);
    let track = &tracks[0];
    assert_eq!(track.half(), Half::Lower);
    assert!(track.hits().len() >= 10);
    assert_relative_eq!(track.y_slope(), spec.ty, epsilon = 1e-4);
}

#[test]
fn wrong_sign_stereo_coordinate_blocks_the_extension() {
    let mut pool = make_pool();
    let mut next_id = 0;
    // a particle heading down deposited in the upper half: the derived
    // stereo coordinate lands on the rejected side of the cut
    let spec = TrackSpec {
        x0: 20.0,
        tx: 0.012,
        cx: 0.0,
        ty: -0.03,
    };
    add_track(&mut pool, Half::Upper, &spec, &[], &mut next_id);

    let tracks = SeedFinder::new(SeedingParams::default()).run(&mut pool);
    assert!(tracks.is_empty());
}

#[test]
fn two_3d_tracks_share_no_more_than_two_hits() {
    let mut pool = make_pool();
    let mut next_id = 0;
    let specs = [
        TrackSpec {
            x0: -700.0,
            tx: -0.03,
            cx: 0.0,
            ty: 0.02,
        },
        TrackSpec {
            x0: 450.0,
            tx: 0.06,
            cx: 0.0,
            ty: 0.035,
        },
    ];
    for spec in &specs {
        add_track(&mut pool, Half::Upper, spec, &[], &mut next_id);
    }

    let tracks = SeedFinder::new(SeedingParams::default()).run(&mut pool);
    assert_eq!(tracks.len(), 2);

    let ids: Vec<Vec<_>> = tracks.iter().map(|t| t.hit_ids(&pool)).collect();
    let n_common = ids[0].iter().filter(|id| ids[1].contains(id)).count();
    assert!(n_common <= 2);

    let mut slopes: Vec<f64> = tracks.iter().map(|t| t.y_slope()).collect();
    slopes.sort_by(f64::total_cmp);
    assert_relative_eq!(slopes[0], 0.02, epsilon = 1e-3);
    assert_relative_eq!(slopes[1], 0.035, epsilon = 1e-3);
}

#[test]
fn accepted_tracks_satisfy_the_selection_bounds() {
    let mut pool = make_pool();
    let mut next_id = 0;
    for spec in [
        TrackSpec {
            x0: 100.0,
            tx: 0.01,
            cx: -3e-6,
            ty: 0.015,
        },
        TrackSpec {
            x0: -300.0,
            tx: -0.04,
            cx: 0.0,
            ty: 0.03,
        },
    ] {
        add_track(&mut pool, Half::Upper, &spec, &[], &mut next_id);
    }

    let params = SeedingParams::default();
    let tracks = SeedFinder::new(params.clone()).run(&mut pool);
    assert!(!tracks.is_empty());
    for track in &tracks {
        assert!(track.valid());
        assert!(track.hits().len() >= params.min_x_planes);
        assert!(track.ndof() > 0);
        let slope = track.x_slope(9000.0);
        let bound = params.max_chi2_per_dof + 6.0 * slope * slope;
        assert!(track.hits().len() > 9 || track.chi2_per_dof() < bound);
        // hit ids are unique within a track
        let ids = track.hit_ids(&pool);
        let mut dedup = ids.clone();
        dedup.dedup();
        assert_eq!(ids, dedup);
    }
}
