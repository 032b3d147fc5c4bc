//! Compute g_obs and g_bar profiles of a dataset and print them.
//!
//!   cargo run --example compute_profiles -- <manifest> [id ...]
//!   cargo run --example compute_profiles                 (synthetic two-subhalo dataset)
//!
//! Log level follows `RUST_LOG` (default `info`).
use camino::{Utf8Path, Utf8PathBuf};
use mond_profile::{
    calc_gbar, calc_gobs,
    constants::{SubhaloId, MANIFEST_FILE_NAME},
    manifest::{subhalo_file_name, write_manifest},
    particles::{Particle, ParticleTable, ParticleType},
    MondError,
};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn setup_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact();
    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .init();
}

/// Two exponential-ish discs, subhalos 5 and 9.
fn write_synthetic_dataset(dir: &Utf8Path) -> Result<Utf8PathBuf, MondError> {
    let base = "Synthetic-1_z=0.0_";
    let mut names = Vec::new();
    for (id, scale, v_flat) in [(5u64, 2.0, 150.0), (9, 4.0, 220.0)] {
        let table: ParticleTable = (1..=400)
            .map(|k| {
                let r = scale * (k as f64 / 40.0);
                let v = v_flat * (1.0 - (-r / scale).exp());
                let kind = if k % 4 == 0 {
                    ParticleType::Star
                } else {
                    ParticleType::Gas
                };
                Particle::new(r, 1e7 * (-r / scale).exp(), v, kind)
            })
            .collect();
        let name = subhalo_file_name(base, id);
        table.write_parquet(&dir.join(&name))?;
        names.push(name);
    }
    let manifest = dir.join(MANIFEST_FILE_NAME);
    write_manifest(&names, &manifest)?;
    Ok(manifest)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    setup_logging();

    let mut args = std::env::args().skip(1);
    let tmp = tempfile::tempdir()?;
    let manifest = match args.next() {
        Some(path) => Utf8PathBuf::from(path),
        None => {
            let dir = Utf8Path::from_path(tmp.path()).ok_or_else(|| {
                MondError::Utf8PathError(tmp.path().display().to_string())
            })?;
            write_synthetic_dataset(dir)?
        }
    };
    let ids = args
        .map(|a| a.parse())
        .collect::<Result<Vec<SubhaloId>, _>>()?;
    let requested = (!ids.is_empty()).then_some(ids.as_slice());

    let radii: Vec<f64> = (1..=10).map(|i| i as f64).collect();

    let g_obs = calc_gobs(radii.iter().copied(), 1.0, &manifest, requested)?;
    println!("g_obs [(km/s)^2/kpc]\n{g_obs}");

    let g_bar = calc_gbar(radii, 1.0, &manifest, requested)?;
    println!("g_bar [(km/s)^2/kpc]\n{}", g_bar.display().value_precision(2));

    let csv_path = manifest.with_file_name("g_obs.csv");
    g_obs.write_csv(&csv_path)?;
    println!("g_obs written to {csv_path}");

    Ok(())
}
