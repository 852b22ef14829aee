use anyhow::{Result, bail};
use clap::Parser;
use playmap::{GenerationConfig, GenerationError, MapGenerator};
use rand_chacha::{
    ChaCha8Rng,
    rand_core::{Rng, SeedableRng},
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    /// Number of random configs to generate
    #[arg(short, long, default_value_t = 200)]
    runs: u32,
}

fn choose<T: Clone>(rng: &mut ChaCha8Rng, slice: &[T]) -> T {
    let p = rng.next_u64() as usize % slice.len();
    slice[p].clone()
}

fn main() -> Result<()> {
    let args = Args::parse();

    println!("Starting Fuzz harness on seed {} for {} maps...", args.seed, args.runs);
    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);
    let mut exhausted = 0_u32;

    for run in 0..args.runs {
        let map_seed = rng.next_u64().max(1);
        let width = choose(&mut rng, &[32, 48, 64, 100, 128]);
        let height = choose(&mut rng, &[32, 48, 64, 100, 128]);
        let config = GenerationConfig::new(width, height, map_seed);
        let generator = MapGenerator::new(&config);

        let map = match generator.generate() {
            Ok(map) => map,
            Err(GenerationError::RetriesExhausted { attempts, failures, .. }) => {
                // Small maps legitimately run out of attempts now and then.
                println!(
                    "run {run}: seed {map_seed} ({width}x{height}) gave up after {attempts} attempts: {failures:?}"
                );
                exhausted += 1;
                continue;
            }
        };

        // Assert invariants
        let report = generator.validator().validate(&map);
        assert!(report.passed(), "Invariant failed: accepted map fails validation on seed {map_seed}");
        assert!(
            map.height_field().cells().iter().all(|value| (0.0..=1.0).contains(value)),
            "Invariant failed: height outside [0, 1] on seed {map_seed}"
        );
        for point in map.resources() {
            let cell = map
                .terrain_at(point.position().x as usize, point.position().y as usize)
                .expect("resource inside the map");
            assert!(cell.is_resource_eligible(), "Invariant failed: resource on {cell:?}");
        }

        let replay = generator.generate()?;
        assert_eq!(replay.fingerprint(), map.fingerprint(), "Invariant failed: nondeterminism");
    }

    if exhausted * 4 > args.runs {
        bail!("{exhausted} of {} runs exhausted their attempts", args.runs);
    }
    println!("Fuzzing completed successfully ({exhausted} exhausted runs).");
    Ok(())
}
