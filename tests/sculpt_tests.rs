use bevy::prelude::Vec3;
use terrain_sculpt::{
    GridCoord, HeightfieldMesh, MeshConsumer, MeshView, RaiseDirection, SculptError,
    SculptOutcome, SculptSettings, TerrainConfig, TerrainSculptor,
};

/// Counts hand-offs and keeps the last heights it saw.
#[derive(Default)]
struct Recorder {
    calls: usize,
    heights: Vec<f32>,
}

impl MeshConsumer for Recorder {
    fn consume(&mut self, view: MeshView<'_>) {
        self.calls += 1;
        self.heights = view.vertices.iter().map(|v| v.y).collect();
    }
}

fn sculptor(n: usize, cell_size: f32) -> TerrainSculptor {
    TerrainSculptor::from_mesh(HeightfieldMesh::new(n, cell_size).unwrap())
}

fn heights(sculptor: &TerrainSculptor) -> Vec<f32> {
    sculptor.emit().vertices.iter().map(|v| v.y).collect()
}

/// A world point that snaps to `(col, row)` on an `n`-wide grid with unit cells.
fn point_for(n: usize, col: i64, row: i64) -> Vec3 {
    Vec3::new(n as f32 - col as f32 - 0.5, 0., row as f32 - 0.5)
}

#[test]
fn snap_inverts_x_axis() {
    let s = sculptor(5, 1.);
    assert_eq!(s.snap_to_grid(Vec3::new(2.5, 0., 1.5)), GridCoord { col: 2, row: 2 });
    assert_eq!(s.snap_to_grid(Vec3::new(0.2, 0., 0.)), GridCoord { col: 4, row: 0 });
    assert_eq!(s.snap_to_grid(Vec3::new(-3., 0., -3.)), GridCoord { col: 8, row: -3 });

    let half = sculptor(10, 0.5);
    assert_eq!(half.snap_to_grid(Vec3::new(1.2, 3., 2.1)), GridCoord { col: 7, row: 5 });
}

#[test]
fn worked_example_on_five_by_five() {
    let mut s = sculptor(5, 1.);
    let mut recorder = Recorder::default();

    let outcome = s
        .raise(Vec3::new(2.5, 0., 1.5), RaiseDirection::Up, 1., 2, &mut recorder)
        .unwrap();
    assert_eq!(
        outcome,
        SculptOutcome::Applied {
            center: GridCoord { col: 2, row: 2 },
            touched: 9
        }
    );

    let map = s.mesh().height_map();
    assert_eq!(map.height_at(2, 2), -1.);
    for (row, col) in [(1, 1), (1, 2), (1, 3), (2, 1), (2, 3), (3, 1), (3, 2), (3, 3)] {
        assert_eq!(map.height_at(row, col), -0.5, "at row {row}, col {col}");
    }
    // Distance 2 falls to zero under the linear falloff.
    for row in 0..5usize {
        for col in 0..5usize {
            if row.abs_diff(2) == 2 || col.abs_diff(2) == 2 {
                assert_eq!(map.height_at(row, col), 0., "at row {row}, col {col}");
            }
        }
    }

    assert_eq!(recorder.calls, 1);
    assert_eq!(recorder.heights, heights(&s));
}

#[test]
fn radius_one_touches_only_center() {
    let mut s = sculptor(7, 1.);
    let point = point_for(7, 3, 4);

    let outcome = s
        .raise(point, RaiseDirection::Down, 0.25, 1, &mut Recorder::default())
        .unwrap();
    assert!(matches!(outcome, SculptOutcome::Applied { touched: 1, .. }));

    let h = heights(&s);
    for (index, height) in h.iter().enumerate() {
        let expected = if index == 4 * 7 + 3 { 0.25 } else { 0. };
        assert_eq!(*height, expected, "vertex {index}");
    }
}

#[test]
fn delta_shrinks_with_distance() {
    let n = 21;
    let mut s = sculptor(n, 1.);
    s.raise(point_for(n, 10, 10), RaiseDirection::Up, 0.8, 7, &mut Recorder::default())
        .unwrap();

    let map = s.mesh().height_map();
    let mut last = f32::INFINITY;
    for d in 0..7 {
        let magnitude = map.height_at(10, 10 + d).abs();
        assert!(magnitude > 0.);
        assert!(magnitude <= last, "distance {d}: {magnitude} > {last}");
        last = magnitude;
    }
    assert_eq!(map.height_at(10, 17), 0.);
    assert_eq!(map.height_at(3, 10), 0.);
}

#[test]
fn interior_stroke_is_symmetric() {
    use ndarray::s;

    let n = 15;
    let mut sc = sculptor(n, 1.);
    sc.raise(point_for(n, 7, 7), RaiseDirection::Up, 0.3, 5, &mut Recorder::default())
        .unwrap();

    let map = sc.mesh().height_map().0;
    assert_eq!(map.t(), map.view());
    assert_eq!(map.slice(s![..;-1, ..]), map.view());
    assert_eq!(map.slice(s![.., ..;-1]), map.view());
    assert_eq!(map.t().slice(s![..;-1, ..]), map.view());
}

#[test]
fn up_then_down_restores_heights() {
    let n = 12;
    let mut s = sculptor(n, 0.5);
    let point = Vec3::new(2.3, 0., 3.1);
    let mut recorder = Recorder::default();

    s.raise(point, RaiseDirection::Up, 0.37, 6, &mut recorder).unwrap();
    assert!(heights(&s).iter().any(|&h| h != 0.));

    s.raise(point, RaiseDirection::Down, 0.37, 6, &mut recorder).unwrap();
    assert!(heights(&s).iter().all(|&h| h == 0.));
    assert_eq!(recorder.calls, 2);
}

#[test]
fn snap_saturates_huge_coordinates() {
    let s = sculptor(5, 1.);
    assert_eq!(s.snap_to_grid(Vec3::new(-1e30, 0., 2.)).col, i64::MAX);
    assert_eq!(s.snap_to_grid(Vec3::new(f32::NEG_INFINITY, 0., 2.)).col, i64::MAX);
    assert_eq!(s.snap_to_grid(Vec3::new(1e30, 0., 2.)).col, i64::MIN);
    assert_eq!(s.snap_to_grid(Vec3::new(2.5, 0., 1e30)).row, i64::MAX);
}

#[test]
fn up_then_down_restores_sculpted_heights() {
    let n = 16;
    let mut s = sculptor(n, 0.5);
    let mut recorder = Recorder::default();

    s.raise(Vec3::new(4.1, 0., 3.3), RaiseDirection::Up, 0.61, 5, &mut recorder)
        .unwrap();
    s.raise(Vec3::new(2.7, 0., 5.2), RaiseDirection::Down, 0.13, 3, &mut recorder)
        .unwrap();
    let before = heights(&s);
    assert!(before.iter().any(|&h| h != 0.));

    let point = Vec3::new(3.4, 0., 4.1);
    s.raise(point, RaiseDirection::Up, 0.37, 6, &mut recorder).unwrap();
    assert_ne!(heights(&s), before);
    s.raise(point, RaiseDirection::Down, 0.37, 6, &mut recorder).unwrap();

    // Adding a delta back to an already non-zero f32 can round by an ulp.
    for (index, (after, before)) in heights(&s).iter().zip(&before).enumerate() {
        assert!((after - before).abs() < 1e-6, "vertex {index}: {after} vs {before}");
    }
}

#[test]
fn corners_and_edges_clip_cleanly() {
    let n = 6;
    let mut s = sculptor(n, 1.);
    let mut recorder = Recorder::default();

    for (col, row) in [(0, 0), (5, 0), (0, 5), (5, 5), (2, 0), (5, 3)] {
        let outcome = s
            .raise(point_for(n, col, row), RaiseDirection::Up, 0.1, 10, &mut recorder)
            .unwrap();
        assert!(matches!(outcome, SculptOutcome::Applied { .. }), "{col},{row}");
    }

    // A radius of 10 covers the whole 6x6 grid from any corner.
    let outcome = s
        .raise(point_for(n, 0, 0), RaiseDirection::Up, 0.1, 10, &mut recorder)
        .unwrap();
    assert_eq!(
        outcome,
        SculptOutcome::Applied {
            center: GridCoord { col: 0, row: 0 },
            touched: 36
        }
    );
}

#[test]
fn out_of_range_center_is_a_no_op() {
    let n = 5;
    let mut s = sculptor(n, 1.);
    let mut recorder = Recorder::default();

    for point in [
        Vec3::new(-2., 0., 2.),
        Vec3::new(2., 0., 9.),
        Vec3::new(9., 0., -4.),
        Vec3::new(f32::NAN, 0., 1.),
        Vec3::new(2.5, 0., f32::NAN),
        Vec3::new(2.5, 0., f32::INFINITY),
        Vec3::new(2.5, 0., f32::NEG_INFINITY),
        Vec3::new(-1e30, 0., 2.),
        Vec3::new(1e30, 0., 2.),
        Vec3::new(f32::NEG_INFINITY, 0., 2.),
        Vec3::new(f32::INFINITY, 0., 2.),
        Vec3::new(2.5, 0., -1e30),
    ] {
        let outcome = s
            .raise(point, RaiseDirection::Up, 1., 3, &mut recorder)
            .unwrap();
        assert!(matches!(outcome, SculptOutcome::OutOfRange(_)), "{point}");
    }

    assert_eq!(recorder.calls, 0);
    assert!(heights(&s).iter().all(|&h| h == 0.));
}

#[test]
fn invalid_parameters_leave_heights_alone() {
    let mut s = sculptor(5, 1.);
    let mut recorder = Recorder::default();
    let point = Vec3::new(2.5, 0., 1.5);

    for (amount, radius) in [(0., 2), (-0.5, 2), (f32::NAN, 2), (0.5, 0)] {
        let result = s.raise(point, RaiseDirection::Up, amount, radius, &mut recorder);
        assert!(
            matches!(result, Err(SculptError::InvalidParameter { .. })),
            "amount {amount}, radius {radius}"
        );
    }

    assert_eq!(recorder.calls, 0);
    assert!(heights(&s).iter().all(|&h| h == 0.));
}

#[test]
fn sculpt_uses_pick_and_settings() {
    let mut s = TerrainSculptor::new(&TerrainConfig {
        vertex_size: 9,
        cell_size: 1.,
        ..Default::default()
    })
    .unwrap();
    let settings = SculptSettings::new(0.4, 2).unwrap();
    let mut recorder = Recorder::default();

    let outcome = s
        .sculpt(&mut point_for(9, 4, 4), RaiseDirection::Down, &settings, &mut recorder)
        .unwrap();
    assert_eq!(
        outcome,
        SculptOutcome::Applied {
            center: GridCoord { col: 4, row: 4 },
            touched: 9
        }
    );
    assert_eq!(s.mesh().height(4 * 9 + 4), 0.4);
    assert_eq!(s.mesh().height(3 * 9 + 5), 0.2);

    let outcome = s
        .sculpt(&mut None::<Vec3>, RaiseDirection::Down, &settings, &mut recorder)
        .unwrap();
    assert_eq!(outcome, SculptOutcome::NoPick);
    assert_eq!(recorder.calls, 1);
}

#[test]
fn normals_follow_the_stroke() {
    let mut s = sculptor(9, 1.);
    let flat = s.emit().normals.to_vec();

    s.raise(point_for(9, 4, 4), RaiseDirection::Up, 1., 3, &mut Recorder::default())
        .unwrap();

    let normals = s.emit().normals;
    assert_ne!(normals[4 * 9 + 2], flat[4 * 9 + 2], "flank tilts");
}
