use std::fs::File;
use std::io::{BufWriter, Write};

use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use claimscope::claims::ClaimsTable;
use claimscope::config::EngineConfig;
use claimscope::dimensions::{Dimension, GroupStat, group_by_dimension};
use claimscope::export::{
    format_currency, markdown_report, write_claims_csv, write_recommendations_csv,
};
use claimscope::ingest::load_claims_file;
use claimscope::pipeline::{AnalysisReport, run_analysis};
use claimscope::synth::{SampleConfig, generate_claims};

fn main() {
    let args: Vec<String> = std::env::args().collect();

    let mut input_path: Option<String> = None;
    let mut sample_size: Option<usize> = None;
    let mut seed_override: Option<u64> = None;
    let mut dimension_opt: Option<String> = None;
    let mut report_path: Option<String> = None;
    let mut json_path: Option<String> = None;
    let mut recs_csv_path: Option<String> = None;
    let mut claims_csv_path: Option<String> = None;
    let mut quiet = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--input" => {
                i += 1;
                input_path = Some(args[i].clone());
            }
            "--sample" => {
                i += 1;
                sample_size = Some(args[i].parse().expect("--sample requires a claim count"));
            }
            "--seed" => {
                i += 1;
                seed_override = Some(args[i].parse().expect("--seed requires a u64"));
            }
            "--dimension" => {
                i += 1;
                dimension_opt = Some(args[i].clone());
            }
            "--report" => {
                i += 1;
                report_path = Some(args[i].clone());
            }
            "--json" => {
                i += 1;
                json_path = Some(args[i].clone());
            }
            "--recs-csv" => {
                i += 1;
                recs_csv_path = Some(args[i].clone());
            }
            "--claims-csv" => {
                i += 1;
                claims_csv_path = Some(args[i].clone());
            }
            "--quiet" => quiet = true,
            "--help" | "-h" => {
                print_usage();
                return;
            }
            _ => {}
        }
        i += 1;
    }

    // ── Build the claims table: upload or synthetic book ─────────────────────
    let (table, source) = match (&input_path, sample_size) {
        (Some(path), _) => {
            let table = load_claims_file(path).unwrap_or_else(|e| {
                eprintln!("error: cannot load {path} — {e}");
                std::process::exit(1);
            });
            (table, path.clone())
        }
        (None, Some(n)) => {
            let mut config = SampleConfig::canonical();
            config.n_claims = n;
            if let Some(seed) = seed_override {
                config.seed = seed;
            }
            let mut rng = ChaCha20Rng::seed_from_u64(config.seed);
            let table = ClaimsTable::from_claims(generate_claims(&config, &mut rng));
            (table, format!("Sample Data (seed {})", config.seed))
        }
        (None, None) => {
            print_usage();
            std::process::exit(1);
        }
    };

    if !quiet {
        println!("Loaded {} claims from {source}", table.len());
    }

    // ── Fixed pipeline: summary → risk → recommendations ─────────────────────
    let config = EngineConfig::canonical();
    let report = run_analysis(&table, &config).unwrap_or_else(|e| {
        eprintln!("error: analysis failed — {e}");
        std::process::exit(1);
    });

    if !quiet {
        print_summary(&report);
        print_risk(&report);
        print_breakdown(&table, Dimension::LossCause);
        if let Some(ref name) = dimension_opt {
            match name.parse::<Dimension>() {
                Ok(dimension) => print_breakdown(&table, dimension),
                Err(e) => eprintln!("note: {e} — skipping breakdown"),
            }
        }
        print_recommendations(&report);
    }

    // ── Exports ──────────────────────────────────────────────────────────────
    if let Some(ref path) = report_path {
        let generated = chrono::Local::now().date_naive();
        let md = markdown_report(&report, &table, &source, generated);
        std::fs::write(path, md).unwrap_or_else(|e| panic!("failed to write {path}: {e}"));
        if !quiet {
            println!("Report written to {path}");
        }
    }

    if let Some(ref path) = json_path {
        let file = File::create(path).unwrap_or_else(|e| panic!("failed to create {path}: {e}"));
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, &report).expect("serialize report");
        writeln!(writer).expect("newline");
        if !quiet {
            println!("JSON bundle written to {path}");
        }
    }

    if let Some(ref path) = recs_csv_path {
        let file = File::create(path).unwrap_or_else(|e| panic!("failed to create {path}: {e}"));
        write_recommendations_csv(&report.recommendations, BufWriter::new(file))
            .expect("write recommendations csv");
        if !quiet {
            println!("Recommendations CSV written to {path}");
        }
    }

    if let Some(ref path) = claims_csv_path {
        let file = File::create(path).unwrap_or_else(|e| panic!("failed to create {path}: {e}"));
        write_claims_csv(&table, BufWriter::new(file)).expect("write claims csv");
        if !quiet {
            println!("Claims CSV written to {path}");
        }
    }
}

fn print_usage() {
    println!("claimscope — loss analysis for commercial claims portfolios");
    println!();
    println!("usage: claimscope --input <claims.csv> [options]");
    println!("       claimscope --sample <n> [--seed <u64>] [options]");
    println!();
    println!("options:");
    println!("  --dimension <name>   extra breakdown (loss_cause, state, line_of_business,");
    println!("                       policy_year, status, weekday)");
    println!("  --report <path>      write the Markdown executive report");
    println!("  --json <path>        write the full analysis bundle as JSON");
    println!("  --recs-csv <path>    write the recommendation list as CSV");
    println!("  --claims-csv <path>  write the normalized claims table as CSV");
    println!("  --quiet              suppress console tables");
}

fn print_summary(report: &AnalysisReport) {
    let s = &report.summary;
    println!("\n=== Portfolio Summary ===");
    println!("  Total claims:   {:>12}", s.total_claims);
    println!("  Total incurred: {:>12}", format_currency(s.total_incurred));
    println!("  Total paid:     {:>12}", format_currency(s.total_paid));
    println!("  Total reserve:  {:>12}", format_currency(s.total_reserve));
    println!("  Average claim:  {:>12}", format_currency(s.avg_claim.round() as u64));
    println!("  Open / closed:  {:>6} / {:<6}", s.open_claims, s.closed_claims);
    println!("  Average lag:    {:>9.1} days", s.avg_lag_time);
}

fn print_risk(report: &AnalysisReport) {
    let r = &report.risk_score;
    println!("\n=== Risk Score: {}/100 ({}) ===", r.total_score, r.level.as_str());
    for (name, value) in r.factors() {
        println!("  {name:<10} {value:>2}/25");
    }
}

fn print_breakdown(table: &ClaimsTable, dimension: Dimension) {
    let groups: Vec<GroupStat> = match group_by_dimension(table, dimension) {
        Ok(groups) => groups,
        Err(e) => {
            eprintln!("note: {e} — skipping breakdown");
            return;
        }
    };

    println!("\n=== Breakdown by {} ===", dimension.as_str());
    println!("{:<28} | {:>6} | {:>12} | {:>12}", "Value", "Count", "Total", "Average");
    println!("{}", "-".repeat(28 + 3 + 6 + 3 + 12 + 3 + 12));
    for g in groups.iter().take(10) {
        println!(
            "{:<28} | {:>6} | {:>12} | {:>12}",
            g.key,
            g.count,
            format_currency(g.total),
            format_currency(g.average.round() as u64),
        );
    }
}

fn print_recommendations(report: &AnalysisReport) {
    let recs = &report.recommendations;
    println!("\n=== Recommendations ===");
    if recs.items.is_empty() {
        println!("  No cause cleared the noise floors; no targeted actions generated.");
        return;
    }
    println!(
        "  Potential savings: {}   Average ROI: {:.0}%",
        format_currency(recs.total_savings),
        recs.avg_roi
    );
    println!(
        "{:<36} | {:>8} | {:<24} | {:>5} | {:>12} | {:>10} | {:>10} | {:>6} | {:>7}",
        "Strategy", "Priority", "Cause", "Freq", "Total Loss", "Cost", "Savings", "ROI", "Payback"
    );
    println!("{}", "-".repeat(140));
    for rec in &recs.items {
        println!(
            "{:<36} | {:>8} | {:<24} | {:>5} | {:>12} | {:>10} | {:>10} | {:>5.0}% | {:>4} mo",
            rec.strategy_name,
            rec.priority.as_str(),
            rec.cause,
            rec.frequency,
            format_currency(rec.total_loss),
            format_currency(rec.implementation_cost),
            format_currency(rec.potential_savings),
            rec.roi,
            rec.payback_months,
        );
    }
}
