// End-to-end: zero a load, feed the angle to the tabulator, and check the
// table against the zero and against basic invariants.

use ballistics_models::{retardation, DragFunction};
use ballistics_pointmass::{
    solve_table, solve_zero, tabulate, zero_angle, Load, Phase, Shot, TableConfig, ZeroSearchConfig,
    ZeroTarget,
};

#[test]
fn g1_retardation_at_3000_fps() -> anyhow::Result<()> {
    let r = retardation(DragFunction::G1, 0.5, 3000.0)?;
    assert_eq!(r, 9.748073694078696e-04 * 3000f64.powf(1.725) / 0.5);
    Ok(())
}

#[test]
fn rifle_zero_at_100_yards() -> anyhow::Result<()> {
    let zero = zero_angle(DragFunction::G1, 0.5, 2800.0, 1.5, 100.0, 0.0)?;
    assert!(zero.converged);
    assert!(zero.angle_deg > 0.0 && zero.angle_deg < 1.0);

    let table = tabulate(DragFunction::G1, 0.5, 2800.0, 1.5, 0.0, zero.angle_deg, 0.0, 0.0)?;
    let row = table.record_at(100).expect("table reaches 100 yd");
    assert_eq!(row.range_yd, 100.0);
    assert!(row.path_in.abs() < 0.5, "path at 100 yd: {}", row.path_in);
    Ok(())
}

#[test]
fn zero_round_trips_for_every_family() -> anyhow::Result<()> {
    let cases = [(0.25, 2600.0, 200.0, 0.0), (0.5, 2800.0, 100.0, 1.5), (0.3, 3100.0, 300.0, -2.0)];
    for df in DragFunction::DEFINED {
        for (bc, vi, range_yd, y_intercept_in) in cases {
            let load = Load::new(df, bc, vi, 1.5);
            let target = ZeroTarget::new(range_yd, y_intercept_in);
            let zero = solve_zero(&load, &target, &ZeroSearchConfig::default())?;
            assert!(zero.converged, "{df} {bc} {vi}");

            let table = solve_table(&load, &Shot::level(zero.angle_deg), &TableConfig::default())?;
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let row = table.record_at(range_yd as usize).expect("table reaches zero range");
            assert!(
                (row.path_in - y_intercept_in).abs() < 0.25,
                "{df} bc={bc} vi={vi}: path {} at {range_yd} yd, wanted {y_intercept_in}",
                row.path_in
            );
        }
    }
    Ok(())
}

#[test]
fn calm_level_tables_have_no_windage() -> anyhow::Result<()> {
    for df in DragFunction::DEFINED {
        let zero = zero_angle(df, 0.4, 2900.0, 1.5, 100.0, 0.0)?;
        let table = tabulate(df, 0.4, 2900.0, 1.5, 0.0, zero.angle_deg, 0.0, 0.0)?;
        assert!(table.records.iter().all(|r| r.windage_in == 0.0), "{df}");
    }
    Ok(())
}

#[test]
fn ranges_are_contiguous_until_termination() -> anyhow::Result<()> {
    let zero = zero_angle(DragFunction::G7, 0.3, 2800.0, 1.5, 100.0, 0.0)?;
    let table = tabulate(DragFunction::G7, 0.3, 2800.0, 1.5, 0.0, zero.angle_deg, 5.0, 45.0)?;
    assert_eq!(table.termination, Phase::NearVertical);
    assert_eq!(table.records[0].range_yd, 0.0);
    for pair in table.records.windows(2) {
        assert_eq!(pair[1].range_yd - pair[0].range_yd, 1.0);
        assert!(pair[1].time_s > pair[0].time_s);
    }
    assert_eq!(table.max_valid_range(), table.records.len());
    Ok(())
}

#[test]
fn drop_grows_past_the_zero() -> anyhow::Result<()> {
    let zero = zero_angle(DragFunction::G1, 0.5, 2800.0, 1.5, 100.0, 0.0)?;
    let table = tabulate(DragFunction::G1, 0.5, 2800.0, 1.5, 0.0, zero.angle_deg, 0.0, 0.0)?;
    let path = |yd: usize| table.record_at(yd).map(|r| r.path_in).unwrap_or(f64::NAN);

    // Roughly -3.6 in at 200 yd and -13 in at 300 yd for this load.
    assert!((path(200) + 3.6).abs() < 0.5, "200 yd: {}", path(200));
    assert!((path(300) + 13.0).abs() < 1.0, "300 yd: {}", path(300));
    assert!(path(500) < path(300) && path(1000) < path(500));

    // Correction holds the other way: positive MOA to come up.
    let c = table.record_at(300).map(|r| r.correction_moa).unwrap_or(f64::NAN);
    assert!(c > 0.0);
    Ok(())
}
