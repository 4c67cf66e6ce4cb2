use std::path::Path;

use statcast_core::data::writer::write_parquet;
use statcast_core::{
    aggregate_pa_results, calculate_rate_stats, metrics, Column, LoaderConfig, SeasonLoader,
    SeasonSet, StatcastError, Table, Value,
};
use tempfile::TempDir;

/// Three plate appearances, the last one cut off without a terminal event.
fn season_rows(season: u16) -> Table {
    let game = i64::from(season) * 100;
    Table::from_columns([
        (
            "game_pk",
            vec![game, game, game, game + 1, game + 1]
                .into_iter()
                .map(Value::Integer)
                .collect::<Vec<_>>(),
        ),
        (
            "at_bat_number",
            [1, 1, 2, 1, 1].into_iter().map(Value::Integer).collect(),
        ),
        (
            "pitch_number",
            [1, 2, 1, 1, 2].into_iter().map(Value::Integer).collect(),
        ),
        (
            "description",
            ["swinging_strike", "swinging_strike", "hit_into_play", "ball", "foul"]
                .into_iter()
                .map(Value::from)
                .collect(),
        ),
        (
            "zone",
            [12.0, 5.0, 4.0, 13.0, 11.0].into_iter().map(Value::Float).collect(),
        ),
        (
            "events",
            vec![
                Value::Null,
                Value::from("strikeout"),
                Value::from("home_run"),
                Value::Null,
                Value::Null,
            ],
        ),
        (
            "launch_speed",
            vec![Value::Null, Value::Null, Value::Float(104.0), Value::Null, Value::Null],
        ),
        (
            "launch_angle",
            vec![Value::Null, Value::Null, Value::Float(28.0), Value::Null, Value::Null],
        ),
    ])
    .unwrap()
}

fn write_season(dir: &Path, season: u16) {
    write_parquet(&season_rows(season), &dir.join(format!("statcast_{season}.parquet"))).unwrap();
}

fn loader(dir: &TempDir) -> SeasonLoader {
    SeasonLoader::new(
        LoaderConfig::default()
            .with_data_dir(dir.path())
            .with_seasons(SeasonSet::range(2022, 2024)),
    )
}

#[test]
fn test_full_load_matches_schema() {
    let dir = TempDir::new().unwrap();
    write_season(dir.path(), 2023);
    let loader = loader(&dir);

    let table = loader.load_season(2023, None).unwrap();
    assert_eq!(table.column_names(), loader.schema(2023).unwrap().as_slice());
    assert_eq!(table.num_rows(), 5);
    assert_eq!(table.season_of(4), Some(2023));
    assert_eq!(
        table.column(Column::Events).unwrap()[1],
        Value::from("strikeout")
    );
}

#[test]
fn test_projection_keeps_rows_and_order() {
    let dir = TempDir::new().unwrap();
    write_season(dir.path(), 2023);
    let loader = loader(&dir);

    let cols = [Column::Zone, Column::GamePk];
    let projected = loader.load_season(2023, Some(&cols)).unwrap();
    let full = loader.load_season(2023, None).unwrap();
    assert_eq!(projected.column_names(), ["zone", "game_pk"]);
    assert_eq!(projected.num_rows(), full.num_rows());
    assert_eq!(projected, full.select(&cols).unwrap());
}

#[test]
fn test_projection_of_absent_column_names_it() {
    let dir = TempDir::new().unwrap();
    write_season(dir.path(), 2023);
    let err = loader(&dir)
        .load_season(2023, Some(&[Column::BatSpeed]))
        .unwrap_err();
    match err {
        StatcastError::MissingColumn { column, location } => {
            assert_eq!(column, "bat_speed");
            assert!(location.contains("2023"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_multi_season_concatenates_in_order() {
    let dir = TempDir::new().unwrap();
    write_season(dir.path(), 2022);
    write_season(dir.path(), 2023);
    let loader = loader(&dir);

    let cols = [Column::GamePk, Column::Events];
    let both = loader.load_seasons(&[2023, 2022], Some(&cols)).unwrap();
    let a = loader.load_season(2023, Some(&cols)).unwrap();
    let b = loader.load_season(2022, Some(&cols)).unwrap();
    assert_eq!(both.num_rows(), a.num_rows() + b.num_rows());
    assert_eq!(both.season_of(0), Some(2023));
    assert_eq!(both.season_of(5), Some(2022));
    assert_eq!(both.column(Column::GamePk).unwrap()[5], Value::Integer(202_200));
}

#[test]
fn test_partial_availability_fails() {
    let dir = TempDir::new().unwrap();
    write_season(dir.path(), 2022);
    let err = loader(&dir)
        .load_seasons(&[2022, 2023], None)
        .unwrap_err();
    assert!(matches!(err, StatcastError::DataUnavailable { season: 2023, .. }));
    assert!(err.to_string().contains("2023"));
}

#[test]
fn test_unknown_season() {
    let dir = TempDir::new().unwrap();
    let err = loader(&dir).load_season(2019, None).unwrap_err();
    assert!(matches!(err, StatcastError::UnknownSeason { season: 2019, .. }));
}

#[test]
fn test_monthly_partitions_are_concatenated() {
    let dir = TempDir::new().unwrap();
    let rows = season_rows(2024);
    write_parquet(&rows.take(&[0, 1, 2]), &dir.path().join("statcast_2024_04.parquet")).unwrap();
    write_parquet(&rows.take(&[3, 4]), &dir.path().join("statcast_2024_05.parquet")).unwrap();

    let loader = loader(&dir);
    assert_eq!(loader.partition_months(2024).unwrap(), vec![4, 5]);
    let loaded = loader.load_season(2024, None).unwrap();
    assert_eq!(loaded.num_rows(), 5);
    assert_eq!(
        loaded.column(Column::Description).unwrap(),
        rows.column(Column::Description).unwrap()
    );
}

#[test]
fn test_single_month_season_reports_its_month() {
    let dir = TempDir::new().unwrap();
    let rows = season_rows(2024);
    write_parquet(&rows.take(&[0, 1, 2]), &dir.path().join("statcast_2024_04.parquet")).unwrap();

    let loader = loader(&dir);
    assert_eq!(loader.partition_months(2024).unwrap(), vec![4]);
    assert_eq!(
        loader.partition_paths(2024).unwrap(),
        vec![dir.path().join("statcast_2024_04.parquet")]
    );
    let loaded = loader.load_season(2024, Some(&[Column::GamePk])).unwrap();
    assert_eq!(loaded.num_rows(), 3);
}

#[test]
fn test_missing_interior_month_fails() {
    let dir = TempDir::new().unwrap();
    let rows = season_rows(2024);
    write_parquet(&rows.take(&[0, 1, 2]), &dir.path().join("statcast_2024_04.parquet")).unwrap();
    write_parquet(&rows.take(&[3, 4]), &dir.path().join("statcast_2024_06.parquet")).unwrap();

    match loader(&dir).load_season(2024, None).unwrap_err() {
        StatcastError::DataUnavailable { season, path } => {
            assert_eq!(season, 2024);
            assert_eq!(path, dir.path().join("statcast_2024_05.parquet"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_single_file_has_no_partition_months() {
    let dir = TempDir::new().unwrap();
    write_season(dir.path(), 2023);
    assert!(loader(&dir).partition_months(2023).unwrap().is_empty());
}

#[test]
fn test_zero_batch_size_is_an_error_not_an_empty_season() {
    let dir = TempDir::new().unwrap();
    write_season(dir.path(), 2024);
    let mut config = LoaderConfig::default()
        .with_data_dir(dir.path())
        .with_seasons(SeasonSet::range(2024, 2024));
    config.batch_size = 0;

    let err = SeasonLoader::new(config.clone())
        .load_season(2024, Some(&[Column::GamePk]))
        .unwrap_err();
    assert!(matches!(err, StatcastError::InvalidSetting { field: "batch_size", .. }));

    let cfg_path = dir.path().join("loader.json");
    std::fs::write(&cfg_path, r#"{ "batch_size": 0 }"#).unwrap();
    assert!(matches!(
        LoaderConfig::from_json_file(&cfg_path),
        Err(StatcastError::InvalidSetting { field: "batch_size", .. })
    ));

    config.batch_size = 1;
    let table = SeasonLoader::new(config).load_season(2024, Some(&[Column::GamePk])).unwrap();
    assert_eq!(table.num_rows(), 5);
}

#[test]
fn test_loaded_season_through_metrics() {
    let dir = TempDir::new().unwrap();
    write_season(dir.path(), 2023);
    let table = loader(&dir).load_season(2023, None).unwrap();

    // swings: 2 whiffs, 1 in play, 1 foul
    assert_eq!(metrics::whiff_rate(&table).unwrap(), 0.5);
    // out of zone: 12, 13, 11; chased: 12 (whiff), 11 (foul)
    assert_eq!(metrics::chase_rate(&table).unwrap(), 2.0 / 3.0);
    assert_eq!(metrics::zone_rate(&table).unwrap(), 0.4);
    assert_eq!(metrics::hard_hit_rate(&table).unwrap(), 1.0);
    assert_eq!(metrics::barrel_rate(&table).unwrap(), 1.0);

    let agg = aggregate_pa_results(&table).unwrap();
    assert_eq!(agg.table.num_rows(), 2);
    assert_eq!(agg.incomplete_count(), 1);
    let stats = calculate_rate_stats(&agg.table).unwrap();
    assert_eq!(stats.k_pct, 0.5);
    assert_eq!(stats.hr_pct, 0.5);
}

#[test]
fn test_config_file_drives_loader() {
    let dir = TempDir::new().unwrap();
    write_season(dir.path(), 2024);
    let cfg_path = dir.path().join("loader.json");
    std::fs::write(
        &cfg_path,
        format!(
            r#"{{ "data_dir": {:?}, "seasons": [2024] }}"#,
            dir.path().display().to_string()
        ),
    )
    .unwrap();

    let cfg = LoaderConfig::from_json_file(&cfg_path).unwrap();
    let table = SeasonLoader::new(cfg).load_all(Some(&[Column::Events])).unwrap();
    assert_eq!(table.num_rows(), 5);
}
