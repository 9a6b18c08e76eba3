//! Emit a synthetic claims book as CSV on stdout.
//!
//! usage: sample_claims [n_claims] [seed]

use std::io::{BufWriter, stdout};

use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use claimscope::claims::ClaimsTable;
use claimscope::export::{format_currency, write_claims_csv};
use claimscope::synth::{SampleConfig, generate_claims};

fn main() {
    let args: Vec<String> = std::env::args().collect();

    let mut config = SampleConfig::canonical();
    if let Some(arg) = args.get(1) {
        config.n_claims = arg.parse().expect("n_claims must be a positive integer");
    }
    if let Some(arg) = args.get(2) {
        config.seed = arg.parse().expect("seed must be a u64");
    }

    let mut rng = ChaCha20Rng::seed_from_u64(config.seed);
    let table = ClaimsTable::from_claims(generate_claims(&config, &mut rng));

    write_claims_csv(&table, BufWriter::new(stdout().lock())).expect("write csv to stdout");

    // Mix summary on stderr so the CSV stream stays clean.
    eprintln!("{} claims, seed {}", table.len(), config.seed);
    for profile in &config.causes {
        let rows: Vec<_> = table
            .rows()
            .iter()
            .filter(|c| c.loss_cause.as_deref() == Some(profile.cause))
            .collect();
        let total: u64 = rows.iter().map(|c| c.incurred).sum();
        eprintln!("  {:<24} {:>5} claims  {:>12}", profile.cause, rows.len(), format_currency(total));
    }
}
