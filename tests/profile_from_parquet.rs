use approx::assert_relative_eq;
use camino::Utf8Path;
use mond_profile::{
    constants::GRAV_CONSTANT,
    mond_errors::MondError,
    particles::ParticleTable,
    profile::{
        calc_gbar, calc_gobs, compute_profile, BaryonicAcceleration, ObservedAcceleration,
        RadialBin, RadialBins, RadialShells,
    },
};

mod common;
use common::{
    subhalo_5, subhalo_9, two_subhalos, write_dataset, write_raw_dataset, RawColumns,
};

#[test]
fn test_two_subhalo_scenario() {
    let dataset = two_subhalos();

    let g_obs = calc_gobs([1.5], vec![1.0], &dataset.manifest, Some(&[5, 9])).unwrap();
    assert_eq!(g_obs.shape(), (1, 2));
    assert_eq!(g_obs.radii(), &[1.5]);
    assert_eq!(g_obs.subhalo_ids(), &[5, 9]);
    assert_relative_eq!(g_obs.value(0, 5).unwrap(), 100.0);
    // subhalo 9 holds r = 1.2 in [1, 2)
    assert_relative_eq!(g_obs.value(0, 9).unwrap(), 60.0 * 60.0 / 1.2);

    let g_bar = calc_gbar([1.5], vec![1.0], &dataset.manifest, Some(&[5, 9])).unwrap();
    assert_eq!(g_bar.value(0, 5), Some(0.0));
    assert_relative_eq!(
        g_bar.value(0, 9).unwrap(),
        GRAV_CONSTANT * 5e8 / (1.2 * 1.2),
        max_relative = 1e-12
    );
}

#[test]
fn test_shape_follows_radii_and_selection() {
    let dataset = two_subhalos();
    let radii = [0.5, 1.0, 2.0, 3.0, 8.0];

    let all = calc_gobs(radii, 0.5, &dataset.manifest, None).unwrap();
    assert_eq!(all.shape(), (5, 2));
    assert_eq!(all.subhalo_ids(), &[5, 9]);

    let one = calc_gbar(radii, 0.5, &dataset.manifest, Some(&[9])).unwrap();
    assert_eq!(one.shape(), (5, 1));

    let nested = RadialBins::from_nested([[0.5, 1.0], [2.0, 3.0]], 0.5).unwrap();
    assert_eq!(
        compute_profile(
            &ObservedAcceleration,
            nested.centers(),
            0.5,
            &dataset.manifest,
            None
        )
        .unwrap()
        .shape(),
        (4, 2)
    );
}

#[test]
fn test_scalar_width_broadcasts() {
    let dataset = two_subhalos();
    let radii = [1.0, 2.5, 4.0];

    let scalar = calc_gbar(radii, 1.5, &dataset.manifest, None).unwrap();
    let array = calc_gbar(radii, vec![1.5; 3], &dataset.manifest, None).unwrap();
    assert_eq!(scalar.radii(), array.radii());
    for id in [5, 9] {
        let (a, b) = (scalar.column(id).unwrap(), array.column(id).unwrap());
        for (x, y) in a.iter().zip(b) {
            assert!(x == y || (x.is_nan() && y.is_nan()));
        }
    }
}

#[test]
fn test_width_length_mismatch_fails_for_both_models() {
    let dataset = two_subhalos();
    let expected = Err(MondError::BinWidthLengthMismatch {
        radii: 3,
        widths: 2,
    });

    assert_eq!(
        calc_gobs([1.0, 2.0, 3.0], vec![0.5, 0.5], &dataset.manifest, None),
        expected
    );
    assert_eq!(
        calc_gbar([1.0, 2.0, 3.0], vec![0.5, 0.5], &dataset.manifest, None),
        expected
    );
}

#[test]
fn test_unknown_subhalo_fails_without_table() {
    let dataset = two_subhalos();
    let result = calc_gobs([1.0], 1.0, &dataset.manifest, Some(&[5, 42]));
    assert_eq!(
        result,
        Err(MondError::SubhaloNotFound(dataset.manifest.to_string()))
    );
}

#[test]
fn test_unknown_subhalo_checked_before_particle_files() {
    let dataset = two_subhalos();
    std::fs::remove_file(
        dataset
            .root
            .join("Illustris-1_z=0.0_subhalo5.parquet.snappy"),
    )
    .unwrap();

    assert!(matches!(
        calc_gobs([1.0], 1.0, &dataset.manifest, Some(&[5, 42])),
        Err(MondError::SubhaloNotFound(_))
    ));
    assert!(matches!(
        calc_gobs([1.0], 1.0, &dataset.manifest, Some(&[5])),
        Err(MondError::IoError(_))
    ));
}

#[test]
fn test_empty_bin_is_nan_and_others_numeric() {
    let dataset = two_subhalos();
    let g_obs = calc_gobs([1.5, 50.0], 1.0, &dataset.manifest, Some(&[5])).unwrap();
    assert_relative_eq!(g_obs.value(0, 5).unwrap(), 100.0);
    assert!(g_obs.value(1, 5).unwrap().is_nan());

    let g_bar = calc_gbar([2.5, 50.0], 1.0, &dataset.manifest, Some(&[5])).unwrap();
    assert!(g_bar.value(0, 5).unwrap().is_finite());
    assert!(g_bar.value(1, 5).unwrap().is_nan());
}

#[test]
fn test_particle_order_does_not_matter() {
    let rows: Vec<_> = subhalo_9().iter().collect();
    let reversed: ParticleTable = rows.iter().rev().cloned().collect();
    let rotated: ParticleTable = rows[2..].iter().chain(&rows[..2]).cloned().collect();

    let dataset = write_dataset(&[(1, subhalo_9()), (2, reversed), (3, rotated)]);
    let radii = [0.5, 1.5, 3.0, 6.0];

    for table in [
        calc_gobs(radii, 1.4, &dataset.manifest, None).unwrap(),
        calc_gbar(radii, 1.4, &dataset.manifest, None).unwrap(),
    ] {
        let reference = table.column(1).unwrap();
        for id in [2, 3] {
            for (a, b) in reference.iter().zip(table.column(id).unwrap()) {
                if a.is_nan() {
                    assert!(b.is_nan());
                } else {
                    assert_relative_eq!(*a, *b, max_relative = 1e-12);
                }
            }
        }
    }
}

#[test]
fn test_enclosed_mass_is_monotonic() {
    let shells = RadialShells::new(&subhalo_9());
    let radii = [0.25, 1.0, 2.0, 3.0, 5.0, 9.0];

    let masses: Vec<f64> = radii
        .iter()
        .map(|&r| shells.enclosed_mass(RadialBin::new(r, 0.4).low))
        .collect();
    assert!(masses.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(masses[0], 0.0);
    assert_relative_eq!(*masses.last().unwrap(), subhalo_9().total_mass());

    // g_bar · r² recovers G · M_enc for a single-particle bin
    let dataset = write_dataset(&[(9, subhalo_9())]);
    let g_bar = compute_profile(
        &BaryonicAcceleration::default(),
        [1.2, 4.0],
        0.2,
        &dataset.manifest,
        None,
    )
    .unwrap();
    let m_inner = g_bar.value(0, 9).unwrap() * 1.2 * 1.2 / GRAV_CONSTANT;
    let m_outer = g_bar.value(1, 9).unwrap() * 4.0 * 4.0 / GRAV_CONSTANT;
    assert!(m_inner <= m_outer);
    assert_relative_eq!(m_outer, 5e8 + 2e8 + 1e9, max_relative = 1e-12);
}

#[test]
fn test_invalid_radius_rejected_before_io() {
    let missing = Utf8Path::new("no_such_dir/subhalo_list.parquet");
    assert_eq!(
        calc_gobs([1.0, -2.0], 1.0, missing, None),
        Err(MondError::InvalidRadius {
            index: 1,
            value: -2.0
        })
    );
    assert_eq!(
        calc_gbar(Vec::<f64>::new(), 1.0, missing, None),
        Err(MondError::EmptyRadii)
    );
    assert!(matches!(
        calc_gbar([1.0], 1.0, missing, None),
        Err(MondError::IoError(_))
    ));
}

#[test]
fn test_subhalo_5_fixture_values() {
    let dataset = write_dataset(&[(5, subhalo_5())]);
    // bin [1, 3): v²/r = 100, 200
    let g_obs = calc_gobs([2.0], 2.0, &dataset.manifest, None).unwrap();
    assert_relative_eq!(g_obs.value(0, 5).unwrap(), 150.0);
}

#[test]
fn test_type_tags_and_null_masses_do_not_drop_rows() {
    let dataset = write_raw_dataset(
        5,
        RawColumns {
            r: vec![Some(1.0), Some(2.0), Some(3.0)],
            mass: vec![Some(1e8), None, Some(1e8)],
            v: vec![Some(10.0), Some(20.0), Some(30.0)],
            kind: vec![Some("gas"), Some("Gas"), None],
        },
    );

    let g_obs = calc_gobs([1.5, 2.0], [1.0, 2.0], &dataset.manifest, None).unwrap();
    assert_relative_eq!(g_obs.value(0, 5).unwrap(), 100.0);
    // the null-mass row still contributes v²/r = 200
    assert_relative_eq!(g_obs.value(1, 5).unwrap(), 150.0);

    // M(< 3) skips the null mass
    let g_bar = calc_gbar([3.5], 1.0, &dataset.manifest, None).unwrap();
    assert_relative_eq!(
        g_bar.value(0, 5).unwrap(),
        GRAV_CONSTANT * 1e8 / (3.0 * 3.0),
        max_relative = 1e-12
    );
}
