use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use prime_keygen::primality::{Fermat, MillerRabin, PrimalityTest};
use prime_keygen::rng::{
    entropy_seed, BlumBlumShub, ChaCha20Source, MersenneTwister, NaorReingold, RandomSource,
};
use prime_keygen::{KeyGenConfig, KeyGenerator};
use std::time::Instant;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "prime-keygen", about = "Search for large probable primes for key material")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Find one probable prime and print it
    Gen {
        #[command(flatten)]
        search: SearchArgs,

        /// Seed for the random source (drawn from the OS when omitted)
        #[arg(long, env = "PRIME_KEYGEN_SEED")]
        seed: Option<u32>,

        /// Search on the calling thread instead of racing workers
        #[arg(long)]
        sequential: bool,

        /// Print the prime in hexadecimal
        #[arg(long)]
        hex: bool,
    },
    /// Time the concurrent search for each random source
    Bench {
        #[command(flatten)]
        search: SearchArgs,

        /// Searches per random source
        #[arg(long, default_value_t = 5)]
        runs: u32,

        /// Run i uses seed `seed_base + i`
        #[arg(long, default_value_t = 12_345)]
        seed_base: u32,
    },
}

#[derive(clap::Args, Debug)]
struct SearchArgs {
    /// Bit length of the prime
    #[arg(short, long, env = "PRIME_KEYGEN_BITS", default_value_t = prime_keygen::config::DEFAULT_KEY_BITS)]
    bits: u64,

    /// Witness rounds per primality test
    #[arg(short, long, env = "PRIME_KEYGEN_ITERATIONS", default_value_t = prime_keygen::config::DEFAULT_ITERATIONS)]
    iterations: u32,

    /// Race workers (default: half the logical CPUs)
    #[arg(short, long, env = "PRIME_KEYGEN_WORKERS")]
    workers: Option<usize>,

    /// Random source; repeat to compare several in `bench`
    #[arg(long = "rng", value_enum, default_values_t = [RngKind::Mt])]
    rngs: Vec<RngKind>,

    /// Primality test
    #[arg(long, value_enum, default_value_t = TestKind::MillerRabin)]
    test: TestKind,
}

impl SearchArgs {
    fn config(&self) -> KeyGenConfig {
        KeyGenConfig {
            key_bits: self.bits,
            iterations: self.iterations,
            workers: self.workers,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum RngKind {
    /// Mersenne Twister (MT19937)
    Mt,
    /// Blum-Blum-Shub
    Bbs,
    /// ChaCha20 keystream
    Chacha20,
    /// Naor-Reingold PRF
    NaorReingold,
}

impl RngKind {
    fn build(self) -> Box<dyn RandomSource> {
        match self {
            RngKind::Mt => Box::new(MersenneTwister::default()),
            RngKind::Bbs => Box::new(BlumBlumShub::new(0)),
            RngKind::Chacha20 => Box::new(ChaCha20Source::new(0)),
            RngKind::NaorReingold => Box::new(NaorReingold::new(0)),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum TestKind {
    Fermat,
    MillerRabin,
}

impl TestKind {
    fn build(self) -> Box<dyn PrimalityTest> {
        match self {
            TestKind::Fermat => Box::new(Fermat::new()),
            TestKind::MillerRabin => Box::new(MillerRabin::new()),
        }
    }
}

fn main() -> Result<()> {
    // LOG_FORMAT=json for machine-readable logs, human-readable otherwise
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if std::env::var("LOG_FORMAT").is_ok_and(|format| format == "json") {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .init();
    }

    match Cli::parse().command {
        Commands::Gen {
            search,
            seed,
            sequential,
            hex,
        } => run_gen(&search, seed, sequential, hex),
        Commands::Bench {
            search,
            runs,
            seed_base,
        } => run_bench(&search, runs, seed_base),
    }
}

fn run_gen(search: &SearchArgs, seed: Option<u32>, sequential: bool, hex: bool) -> Result<()> {
    let rng_kind = search.rngs.first().copied().unwrap_or(RngKind::Mt);
    let tester = search.test.build();
    let seed = seed.unwrap_or_else(entropy_seed);
    info!(seed, rng = ?rng_kind, test = ?search.test, "generating prime");

    let mut keygen = KeyGenerator::new(rng_kind.build(), tester.as_ref(), search.config())
        .context("invalid key generator configuration")?;

    let start = Instant::now();
    let prime = if sequential {
        keygen.generate_key(seed)?
    } else {
        keygen.generate_key_concurrent(seed)?
    };
    let duration = start.elapsed();

    println!("Generated prime ({} bits):", prime.bits());
    if hex {
        println!("{}", hex::encode(prime.to_bytes_be()));
    } else {
        println!("{prime}");
    }
    println!("Time taken: {duration:?}");
    Ok(())
}

fn run_bench(search: &SearchArgs, runs: u32, seed_base: u32) -> Result<()> {
    anyhow::ensure!(runs > 0, "--runs must be positive");
    let tester = search.test.build();

    for &rng_kind in &search.rngs {
        let keygen = KeyGenerator::new(rng_kind.build(), tester.as_ref(), search.config())
            .context("invalid key generator configuration")?;
        println!("\n=== {:?} / {} bits ===", rng_kind, search.bits);

        let mut total_ms = 0.0;
        for run in 0..runs {
            let start = Instant::now();
            keygen.generate_key_concurrent(seed_base.wrapping_add(run))?;
            let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;
            println!("Run {run}: {elapsed_ms:.2} ms");
            total_ms += elapsed_ms;
        }
        println!("Mean: {:.2} ms", total_ms / runs as f64);
    }
    Ok(())
}
