//! Write small synthetic season files so analyses can run without the real
//! Statcast download.
//!
//! Usage: `generate_sample [OUTPUT_DIR] [FIRST_SEASON] [LAST_SEASON]`

use std::path::PathBuf;

use anyhow::{Context, Result};
use arrow::util::pretty::pretty_format_batches;
use log::info;

use statcast_core::catalog::{Column, PITCH_TYPES};
use statcast_core::data::writer::{to_record_batch, write_parquet};
use statcast_core::{LoaderConfig, Table, Value};

const GAMES_PER_SEASON: i64 = 40;
const PA_PER_GAME: i64 = 70;

/// SplitMix64: deterministic, seedable, good enough for fixtures.
struct SplitMix(u64);

impl SplitMix {
    fn next_u64(&mut self) -> u64 {
        self.0 = self.0.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    fn unit(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn below(&mut self, n: usize) -> usize {
        (self.unit() * n as f64) as usize
    }

    fn normal(&mut self, mean: f64, sd: f64) -> f64 {
        // sum of 12 uniforms, centred
        let s: f64 = (0..12).map(|_| self.unit()).sum();
        mean + sd * (s - 6.0)
    }
}

#[derive(Default)]
struct Columns {
    game_pk: Vec<Value>,
    at_bat_number: Vec<Value>,
    pitch_number: Vec<Value>,
    game_year: Vec<Value>,
    pitch_type: Vec<Value>,
    release_speed: Vec<Value>,
    description: Vec<Value>,
    zone: Vec<Value>,
    events: Vec<Value>,
    launch_speed: Vec<Value>,
    launch_angle: Vec<Value>,
    balls: Vec<Value>,
    strikes: Vec<Value>,
}

/// Simulate one plate appearance pitch by pitch.
fn simulate_pa(rng: &mut SplitMix, season: u16, game_pk: i64, ab: i64, cols: &mut Columns) {
    let (mut balls, mut strikes) = (0i64, 0i64);
    for pitch_number in 1.. {
        let zone = if rng.unit() < 0.48 {
            1 + rng.below(9) as i64
        } else {
            11 + rng.below(4) as i64
        };
        let in_zone = zone <= 9;
        let swing = rng.unit() < if in_zone { 0.66 } else { 0.29 };
        let (code, _) = PITCH_TYPES[rng.below(9)];

        let mut event: Option<&str> = None;
        let mut batted: Option<(f64, f64)> = None;
        let description = if !swing {
            if in_zone {
                strikes += 1;
                if strikes == 3 {
                    event = Some("strikeout");
                }
                "called_strike"
            } else {
                balls += 1;
                if balls == 4 {
                    event = Some("walk");
                }
                "ball"
            }
        } else {
            let r = rng.unit();
            if r < 0.22 {
                strikes += 1;
                if strikes == 3 {
                    event = Some("strikeout");
                }
                "swinging_strike"
            } else if r < 0.58 {
                strikes = (strikes + 1).min(2);
                "foul"
            } else {
                let ev = rng.normal(89.0, 12.0);
                let la = rng.normal(12.0, 22.0);
                event = Some(if ev > 103.0 && (22.0..38.0).contains(&la) {
                    "home_run"
                } else if rng.unit() < 0.31 {
                    "single"
                } else {
                    "field_out"
                });
                batted = Some((ev, la));
                "hit_into_play"
            }
        };

        cols.game_pk.push(Value::Integer(game_pk));
        cols.at_bat_number.push(Value::Integer(ab));
        cols.pitch_number.push(Value::Integer(pitch_number));
        cols.game_year.push(Value::Integer(season.into()));
        cols.pitch_type.push(Value::from(code));
        cols.release_speed.push(Value::Float(rng.normal(89.5, 5.0)));
        cols.description.push(Value::from(description));
        cols.zone.push(Value::Float(zone as f64));
        cols.events.push(Value::from(event));
        cols.launch_speed.push(Value::from(batted.map(|b| b.0)));
        cols.launch_angle.push(Value::from(batted.map(|b| b.1)));
        cols.balls.push(Value::Integer(balls.min(3)));
        cols.strikes.push(Value::Integer(strikes.min(2)));

        if event.is_some() {
            break;
        }
    }
}

fn season_table(season: u16) -> Result<Table> {
    let mut rng = SplitMix(u64::from(season));
    let mut cols = Columns::default();
    for game in 0..GAMES_PER_SEASON {
        let game_pk = i64::from(season) * 10_000 + game;
        for ab in 1..=PA_PER_GAME {
            simulate_pa(&mut rng, season, game_pk, ab, &mut cols);
        }
    }
    let table = Table::from_columns([
        (Column::GamePk, cols.game_pk),
        (Column::AtBatNumber, cols.at_bat_number),
        (Column::PitchNumber, cols.pitch_number),
        (Column::GameYear, cols.game_year),
        (Column::PitchType, cols.pitch_type),
        (Column::ReleaseSpeed, cols.release_speed),
        (Column::Description, cols.description),
        (Column::Zone, cols.zone),
        (Column::Events, cols.events),
        (Column::LaunchSpeed, cols.launch_speed),
        (Column::LaunchAngle, cols.launch_angle),
        (Column::Balls, cols.balls),
        (Column::Strikes, cols.strikes),
    ]
    .map(|(c, v)| (c.as_str(), v)))?;
    Ok(table)
}

fn main() -> Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let defaults = LoaderConfig::default();
    let out_dir = args.next().map_or(defaults.data_dir.clone(), PathBuf::from);
    let first: u16 = match args.next() {
        Some(s) => s.parse().context("parsing first season")?,
        None => 2023,
    };
    let last: u16 = match args.next() {
        Some(s) => s.parse().context("parsing last season")?,
        None => first + 1,
    };

    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;
    let config = defaults.with_data_dir(&out_dir);

    for season in first..=last {
        let table = season_table(season)?;
        let path = config.season_path(season);
        write_parquet(&table, &path).with_context(|| format!("writing {}", path.display()))?;
        info!("season {season}: {} pitches → {}", table.num_rows(), path.display());

        let preview = to_record_batch(&table.take(&[0, 1, 2, 3, 4]))?;
        println!("{}", pretty_format_batches(&[preview])?);
    }

    println!("Wrote seasons {first}-{last} to {}", out_dir.display());
    Ok(())
}
