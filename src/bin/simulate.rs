//! Monte Carlo simulator for Dedenne's crit-boost skill.
//!
//! Writes the CSV tables `dedenne-charts` reads: the paired layout (net gain
//! and value per trigger at a 70% cap) or the grouped layout (net gain and
//! rest rate for every cap level from 30% to 70%).
//!
//! Usage:
//!   cargo run --bin simulate -- --layout paired --out dedenne_data.csv
//!   cargo run --bin simulate -- --layout grouped --utf16 --out dedenne_data_cap.csv

use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow, ensure};
use clap::{Parser, ValueEnum};
use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Poisson;
use rayon::prelude::*;

// ---------------------------------------------------------------------------
// Model constants
// ---------------------------------------------------------------------------

const DAYS_PER_WEEK: usize = 7;
const MEALS_PER_DAY: usize = 3;
/// Simulation ticks between two meals.
const TICKS_BETWEEN_MEALS: usize = 100;
const TICKS_PER_DAY: usize = MEALS_PER_DAY * TICKS_BETWEEN_MEALS;

/// Crit chance added by one skill trigger.
const SKILL_BOOST: f64 = 0.10;
/// Cap used by the paired layout, in percent.
const DEFAULT_CAP: u32 = 70;
const CAP_LEVELS: [u32; 5] = [30, 40, 50, 60, 70];

/// Trigger rates are `i / 10` per day for `i` in this range.
const RATE_TENTHS: std::ops::RangeInclusive<u32> = 20..=60;

#[derive(Debug, Clone, Copy)]
struct MealCrit {
    base_chance: f64,
    multiplier: f64,
}

const WEEKDAY: MealCrit = MealCrit {
    base_chance: 0.10,
    multiplier: 2.0,
};
const SUNDAY: MealCrit = MealCrit {
    base_chance: 0.30,
    multiplier: 3.0,
};

fn meal_crit(day: usize) -> MealCrit {
    if day == DAYS_PER_WEEK - 1 { SUNDAY } else { WEEKDAY }
}

// ---------------------------------------------------------------------------
// CLI
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Layout {
    /// Net gain and value per trigger at a 70% cap.
    Paired,
    /// Net gain and rest rate for each cap level.
    Grouped,
}

#[derive(Debug, Parser)]
#[command(name = "simulate", about = "Simulate Dedenne skill triggers and write CSV")]
struct Args {
    #[arg(short, long, value_enum, default_value_t = Layout::Paired)]
    layout: Layout,

    /// Simulated weeks per table cell.
    #[arg(short, long, default_value_t = 100_000)]
    weeks: u32,

    /// Base RNG seed; row `i` uses `seed + i`. Random when omitted.
    #[arg(short, long)]
    seed: Option<u64>,

    /// Output file. Writes to stdout when omitted.
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Write UTF-16LE with a byte-order mark instead of UTF-8.
    #[arg(long)]
    utf16: bool,
}

// ---------------------------------------------------------------------------
// Simulation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
struct WeekOutcome {
    /// Sum of meal multipliers over the week.
    multiplier: f64,
    /// Fraction of ticks spent resting at the cap.
    rest_ratio: f64,
}

/// Play one week. `cap_steps` is the cap expressed in skill triggers.
fn simulate_week<R: Rng>(
    triggers: &Poisson<f64>,
    cap_steps: u32,
    rng: &mut R,
) -> WeekOutcome {
    let mut multiplier = 0.0;
    let mut boost_steps = 0u32;
    let mut rest_ticks = 0usize;

    for day in 0..DAYS_PER_WEEK {
        let crit = meal_crit(day);
        let mut hungry = false;

        for tick in 0..TICKS_PER_DAY {
            let phase = tick % TICKS_BETWEEN_MEALS;
            if phase == 0 {
                hungry = true;
            }

            if boost_steps >= cap_steps {
                rest_ticks += 1;
            } else {
                let fired = triggers.sample(rng) as u32;
                boost_steps = boost_steps.saturating_add(fired).min(cap_steps);
            }

            let capped = boost_steps >= cap_steps;
            if hungry && (capped || phase == TICKS_BETWEEN_MEALS - 1) {
                hungry = false;
                let chance = crit.base_chance + f64::from(boost_steps) * SKILL_BOOST;
                if rng.gen::<f64>() < chance {
                    multiplier += crit.multiplier;
                    boost_steps = 0;
                } else {
                    multiplier += 1.0;
                }
            }
        }
    }

    WeekOutcome {
        multiplier,
        rest_ratio: rest_ticks as f64 / (DAYS_PER_WEEK * TICKS_PER_DAY) as f64,
    }
}

/// Expected weekly multiplier with no skill at all.
fn baseline() -> f64 {
    let meals = |crit: MealCrit, days: usize| {
        let per_meal = crit.base_chance * crit.multiplier + (1.0 - crit.base_chance);
        per_meal * (MEALS_PER_DAY * days) as f64
    };
    meals(WEEKDAY, DAYS_PER_WEEK - 1) + meals(SUNDAY, 1)
}

/// Weekly averages for one (rate, cap) cell.
#[derive(Debug, Clone, Copy, PartialEq)]
struct CellAverage {
    net_gain: f64,
    rest_rate: f64,
}

fn simulate_cell<R: Rng>(
    rate: f64,
    cap_percent: u32,
    weeks: u32,
    rng: &mut R,
) -> Result<CellAverage> {
    let triggers = Poisson::new(rate / TICKS_PER_DAY as f64)
        .map_err(|e| anyhow!("invalid trigger rate {rate}: {e}"))?;
    let cap_steps = cap_percent / 10;

    let (mut multiplier, mut rest) = (0.0, 0.0);
    for _ in 0..weeks {
        let week = simulate_week(&triggers, cap_steps, rng);
        multiplier += week.multiplier;
        rest += week.rest_ratio;
    }

    let weeks = f64::from(weeks);
    Ok(CellAverage {
        net_gain: multiplier / weeks - baseline(),
        rest_rate: rest / weeks,
    })
}

fn header(layout: Layout) -> Vec<String> {
    let mut fields = vec!["Trigger/Day".to_string()];
    match layout {
        Layout::Paired => {
            fields.push("Net_Gain(Week)".into());
            fields.push("Value_Per_Trigger(Coeff)".into());
        }
        Layout::Grouped => {
            for cap in CAP_LEVELS {
                fields.push(format!("Net_Gain_{cap}%(Week)"));
                fields.push(format!("Rest_Rate_{cap}%"));
            }
        }
    }
    fields
}

/// One output row: the rate, then the layout's value cells.
fn simulate_row(layout: Layout, rate_tenths: u32, weeks: u32, seed: u64) -> Result<Vec<String>> {
    let rate = f64::from(rate_tenths) / 10.0;
    let mut rng = StdRng::seed_from_u64(seed.wrapping_add(u64::from(rate_tenths)));
    let mut fields = vec![format!("{rate:.1}")];

    match layout {
        Layout::Paired => {
            let cell = simulate_cell(rate, DEFAULT_CAP, weeks, &mut rng)?;
            let per_trigger = cell.net_gain / (rate * DAYS_PER_WEEK as f64);
            fields.push(format!("{:.4}", cell.net_gain));
            fields.push(format!("{per_trigger:.4}"));
        }
        Layout::Grouped => {
            for cap in CAP_LEVELS {
                let cell = simulate_cell(rate, cap, weeks, &mut rng)?;
                fields.push(format!("{:.4}", cell.net_gain));
                fields.push(format!("{:.4}", cell.rest_rate));
            }
        }
    }

    log::info!("Trigger rate {rate:.1}/day done");
    Ok(fields)
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

fn to_csv(header: &[String], rows: &[Vec<String>]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(header)?;
    for row in rows {
        writer.write_record(row)?;
    }
    writer
        .into_inner()
        .map_err(|e| anyhow!("failed to flush CSV buffer: {e}"))
}

fn to_utf16le(bytes: &[u8]) -> Result<Vec<u8>> {
    let text = std::str::from_utf8(bytes).context("CSV buffer is not UTF-8")?;
    let mut out = vec![0xFF, 0xFE];
    for unit in text.encode_utf16() {
        out.extend_from_slice(&unit.to_le_bytes());
    }
    Ok(out)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    ensure!(args.weeks > 0, "--weeks must be at least 1");

    let seed = args.seed.unwrap_or_else(rand::random);
    log::info!(
        "Simulating {:?} layout, {} weeks per cell, seed {seed}",
        args.layout,
        args.weeks
    );

    let rows = RATE_TENTHS
        .into_par_iter()
        .map(|tenths| simulate_row(args.layout, tenths, args.weeks, seed))
        .collect::<Result<Vec<_>>>()?;

    let mut bytes = to_csv(&header(args.layout), &rows)?;
    if args.utf16 {
        bytes = to_utf16le(&bytes)?;
    }

    match &args.out {
        Some(path) => {
            let mut file =
                File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
            file.write_all(&bytes)?;
            log::info!("Wrote {} rows to {}", rows.len(), path.display());
        }
        None => io::stdout().lock().write_all(&bytes)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn baseline_is_the_no_skill_expectation() {
        assert!((baseline() - 24.6).abs() < 1e-9);
    }

    #[test]
    fn week_outcome_stays_in_bounds() {
        let triggers = Poisson::new(4.0 / TICKS_PER_DAY as f64).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let week = simulate_week(&triggers, 3, &mut rng);
            assert!((0.0..=1.0).contains(&week.rest_ratio));
            // 21 meals, each worth between 1x and 3x.
            assert!(week.multiplier >= 21.0 && week.multiplier <= 63.0);
        }
    }

    #[test]
    fn rows_are_reproducible_per_seed() {
        let a = simulate_row(Layout::Grouped, 35, 20, 11).unwrap();
        let b = simulate_row(Layout::Grouped, 35, 20, 11).unwrap();
        assert_eq!(a, b);
        assert_eq!(a[0], "3.5");
        assert_eq!(a.len(), header(Layout::Grouped).len());
    }

    #[test]
    fn paired_rows_match_their_header() {
        let row = simulate_row(Layout::Paired, 20, 10, 1).unwrap();
        assert_eq!(row.len(), 3);
        assert_eq!(header(Layout::Paired)[2], "Value_Per_Trigger(Coeff)");
    }

    #[test]
    fn utf16_output_starts_with_a_bom() {
        let bytes = to_utf16le(b"a,b\n").unwrap();
        assert_eq!(&bytes[..4], &[0xFF, 0xFE, b'a', 0]);
    }
}
