use desklens_lib::commands::chart::build_chart_view;
use desklens_lib::commands::data::{open_data_dir, regenerate, set_date_range, set_mode, set_sample_size};
use desklens_lib::commands::filter::{select_bubble, toggle_category};
use desklens_lib::commands::playback::{tick, toggle_play};
use desklens_lib::models::bubble::Bubble;
use desklens_lib::models::state::{DataMode, Dataset};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn create_data_dir() -> (TempDir, PathBuf) {
    let temp_dir = tempfile::tempdir().expect("create temp dir");
    let dir = temp_dir.path().to_path_buf();

    fs::write(
        dir.join("config.json"),
        r#"{
            "dataSource": {
                "fileName": "issues.csv",
                "description": "Service desk ticket export",
                "totalCategories": 3
            },
            "severityTiers": [
                { "severity": "Low", "dailyImpact": 200, "probability": 0.6 },
                { "severity": "Medium", "dailyImpact": 1000, "probability": 0.3 },
                { "severity": "High", "dailyImpact": 5000, "probability": 0.1 }
            ],
            "ui": {
                "title": "Service Desk Issues: Business Impact vs Resolution Time",
                "methodology": "Bubble area tracks issue volume."
            }
        }"#,
    )
    .expect("write config.json");

    fs::write(
        dir.join("types.csv"),
        "Category,Subcategory,Effort_Per_Issue,Impact_Per_Day\n\
         Network,Outage,5000,2000\n\
         Network,Latency,1000,400\n\
         Hardware,Laptop,800,300\n",
    )
    .expect("write types.csv");

    fs::write(
        dir.join("summary.csv"),
        "Date,Category,Subcategory,Count,Days_To_Fix\n\
         2024-01-01,Network,Outage,3,2\n\
         2024-01-02,Network,Outage,5,4\n\
         2024-01-02,Network,Latency,7,1\n\
         2024-01-03,Hardware,Laptop,4,0.5\n",
    )
    .expect("write summary.csv");

    fs::write(
        dir.join("issues.csv"),
        "created_time,category,sub_category,est_per_day_cost_usd,resolution_hours,resolved_time,severity,RequestID,request_status\n\
         2024-01-01 08:00:00,Network,Outage,2500,4,2024-01-01 12:00:00,High,REQ-100,Closed\n\
         2024-01-02 09:30:00,Hardware,Laptop,600,,2024-01-02 21:30:00,Medium,REQ-101,Closed\n\
         2024-01-03 10:00:00,SAP,,1800,36,,Low,REQ-102,Open\n\
         2024-01-04 11:00:00,Network,Latency,900,8,,Medium,REQ-103,Open\n\
         2024-01-05 12:00:00,Hardware,Printer,400,2,,Low,REQ-104,Closed\n",
    )
    .expect("write issues.csv");

    fs::write(
        dir.join("excel_data.json"),
        r##"{
            "Summary": [
                {
                    "category": "Email Services",
                    "sub_category": "Outbound",
                    "# of issues": 42,
                    "est per-day business impact (USD)": 1200,
                    "avg time to resolve (hours)": 6.5,
                    "severity_mode": "High"
                },
                {
                    "category": "Login Issue",
                    "sub_category": "",
                    "# of issues": 310,
                    "est per-day business impact (USD)": 5400,
                    "avg time to resolve (hours)": 18.2,
                    "severity_mode": "Medium"
                }
            ]
        }"##,
    )
    .expect("write excel_data.json");

    (temp_dir, dir)
}

#[test]
fn open_data_dir_loads_every_source_contract() {
    let (_tmp, dir) = create_data_dir();
    let state = open_data_dir(&dir).expect("open data dir");

    assert_eq!(state.types.len(), 3);
    assert_eq!(state.summary.len(), 4);
    assert_eq!(state.issues.len(), 5);
    assert_eq!(state.sheet_rows.len(), 2);

    // Default mode is real, so the slider axis comes from the issue dates.
    assert_eq!(state.mode, DataMode::Real);
    assert_eq!(state.available_dates.len(), 5);
    assert_eq!(state.start_index, 0);
    assert_eq!(state.end_index, 4);
}

#[test]
fn missing_config_is_a_load_error() {
    let temp_dir = tempfile::tempdir().expect("create temp dir");
    let error = open_data_dir(temp_dir.path()).unwrap_err();
    assert!(error.contains("config.json"), "unexpected error: {error}");
}

#[test]
fn aggregated_mode_matches_worked_example() {
    let (_tmp, dir) = create_data_dir();
    let mut state = open_data_dir(&dir).expect("open data dir");
    let mut rng = StdRng::seed_from_u64(1);

    set_mode(&mut state, DataMode::Aggregated);
    regenerate(&mut state, &mut rng).expect("aggregate");

    let rollups = match &state.dataset {
        Dataset::Bubbles(rollups) => rollups.clone(),
        Dataset::Issues(_) => panic!("expected aggregated bubbles"),
    };
    assert_eq!(rollups.len(), 2);

    let network = rollups.iter().find(|r| r.category == "Network").expect("network rollup");
    let outage = network
        .subcategories
        .iter()
        .find(|s| s.subcategory == "Outage")
        .expect("outage group");

    // count = 3 + 5 = 8, total_days = 6 + 20 = 26
    assert_eq!(outage.count, 8);
    assert!((outage.avg_days_to_fix - 3.25).abs() < 1e-9);
    assert!((outage.total_effort - 40_000.0).abs() < 1e-9);
    assert!((outage.total_impact - 52_000.0).abs() < 1e-9);

    // Roll-up totals equal the sums over constituents.
    let count_sum: u64 = network.subcategories.iter().map(|s| s.count).sum();
    assert_eq!(network.count, count_sum);

    let view = build_chart_view(&state).expect("view");
    assert_eq!(view.bubbles.len(), 2);
    assert!(view.bubbles.iter().all(|b| b.expandable));
    assert!(view.stats.is_none());
}

#[test]
fn narrowing_the_date_window_shrinks_the_aggregate() {
    let (_tmp, dir) = create_data_dir();
    let mut state = open_data_dir(&dir).expect("open data dir");
    let mut rng = StdRng::seed_from_u64(2);

    set_mode(&mut state, DataMode::Aggregated);
    set_date_range(&mut state, 0, 0);
    regenerate(&mut state, &mut rng).expect("aggregate");

    match &state.dataset {
        Dataset::Bubbles(rollups) => {
            assert_eq!(rollups.len(), 1);
            assert_eq!(rollups[0].category, "Network");
            assert_eq!(rollups[0].count, 3);
        }
        Dataset::Issues(_) => panic!("expected aggregated bubbles"),
    }
}

#[test]
fn drill_down_expands_and_collapses() {
    let (_tmp, dir) = create_data_dir();
    let mut state = open_data_dir(&dir).expect("open data dir");
    let mut rng = StdRng::seed_from_u64(3);

    set_mode(&mut state, DataMode::Aggregated);
    regenerate(&mut state, &mut rng).expect("aggregate");

    let network = match &state.dataset {
        Dataset::Bubbles(rollups) => rollups
            .iter()
            .find(|rollup| rollup.category == "Network")
            .expect("network rollup")
            .clone(),
        Dataset::Issues(_) => panic!("expected aggregated bubbles"),
    };

    select_bubble(&mut state, &Bubble::Category(network.clone()));
    let expanded = build_chart_view(&state).expect("expanded view");
    assert_eq!(expanded.bubbles.len(), 2);
    assert!(expanded.bubbles.iter().all(|b| b.subcategory.is_some()));

    // Clicking a subcategory bubble collapses back to category level.
    let outage = network
        .subcategories
        .iter()
        .find(|s| s.subcategory == "Outage")
        .expect("outage group")
        .clone();
    select_bubble(&mut state, &Bubble::Subcategory(outage));
    let collapsed = build_chart_view(&state).expect("collapsed view");
    assert!(collapsed.bubbles.iter().all(|b| b.expandable));
}

#[test]
fn real_mode_sampling_respects_window_and_sample_size() {
    let (_tmp, dir) = create_data_dir();
    let mut state = open_data_dir(&dir).expect("open data dir");
    let mut rng = StdRng::seed_from_u64(4);

    set_sample_size(&mut state, 2);
    set_date_range(&mut state, 0, 2);
    regenerate(&mut state, &mut rng).expect("sample");

    match &state.dataset {
        Dataset::Issues(records) => {
            assert_eq!(records.len(), 2);
            // The window covers Jan 1-3, so Jan 4-5 categories cannot appear.
            assert!(records.iter().all(|r| r.request_id.as_deref() != Some("REQ-103")));
            assert!(records.iter().all(|r| r.request_id.as_deref() != Some("REQ-104")));
        }
        Dataset::Bubbles(_) => panic!("expected issue records"),
    }

    let view = build_chart_view(&state).expect("view");
    assert_eq!(view.bubbles.len(), 2);
    let stats = view.stats.expect("stats");
    assert_eq!(stats.group_count, 2);
    assert!(view.title.contains("Real CSV data"));
}

#[test]
fn synthetic_modes_honor_sample_size_and_floors() {
    let (_tmp, dir) = create_data_dir();
    let mut state = open_data_dir(&dir).expect("open data dir");
    let mut rng = StdRng::seed_from_u64(5);

    set_mode(&mut state, DataMode::Baseline);
    set_sample_size(&mut state, 40);
    regenerate(&mut state, &mut rng).expect("generate baseline");

    match &state.dataset {
        Dataset::Issues(records) => {
            assert_eq!(records.len(), 40);
            for record in records {
                assert!(record.num_issues >= 1);
                assert!(record.business_impact >= 500.0);
            }
        }
        Dataset::Bubbles(_) => panic!("expected issue records"),
    }

    set_mode(&mut state, DataMode::Enhanced);
    regenerate(&mut state, &mut rng).expect("generate enhanced");
    let view = build_chart_view(&state).expect("view");
    assert_eq!(view.bubbles.len(), 40);
    assert!(view.title.contains("enhanced data"));
    assert!(view.bubbles.iter().all(|b| b.stroke.is_some()));

    // The pool comes from the loaded data, not the config defaults.
    let loaded = ["Network", "Hardware", "SAP", "Email Services", "Login Issue"];
    assert!(view.bubbles.iter().all(|b| loaded.contains(&b.category.as_str())));
}

#[test]
fn filter_toggle_round_trips_through_the_view() {
    let (_tmp, dir) = create_data_dir();
    let mut state = open_data_dir(&dir).expect("open data dir");
    let mut rng = StdRng::seed_from_u64(6);
    regenerate(&mut state, &mut rng).expect("sample");

    toggle_category(&mut state, "Network");
    let filtered = build_chart_view(&state).expect("filtered view");
    assert!(filtered
        .legend
        .iter()
        .any(|entry| entry.category != "Network" && !entry.active));

    toggle_category(&mut state, "Network");
    let restored = build_chart_view(&state).expect("restored view");
    assert!(restored.legend.iter().all(|entry| entry.active));
    assert!(restored.bubbles.iter().all(|b| b.opacity > 0.5));
}

#[test]
fn playback_slides_the_window_and_stops_at_the_end() {
    let (_tmp, dir) = create_data_dir();
    let mut state = open_data_dir(&dir).expect("open data dir");
    state.playback.step = 1;
    set_date_range(&mut state, 0, 1);

    assert!(toggle_play(&mut state));

    let mut rng = StdRng::seed_from_u64(7);
    let mut advanced = 0;
    while tick(&mut state) {
        regenerate(&mut state, &mut rng).expect("regenerate during playback");
        advanced += 1;
        assert!(advanced < 100, "playback failed to terminate");
    }

    assert_eq!(state.end_index, state.max_date_index());
    assert!(!state.playback.playing);
    assert_eq!(advanced, 3);
}

#[test]
fn aggregation_fails_loudly_on_missing_reference_rows() {
    let (_tmp, dir) = create_data_dir();
    fs::write(
        dir.join("summary.csv"),
        "Date,Category,Subcategory,Count,Days_To_Fix\n\
         2024-01-01,Telephony,Desk Phone,3,2\n",
    )
    .expect("rewrite summary.csv");

    let mut state = open_data_dir(&dir).expect("open data dir");
    let mut rng = StdRng::seed_from_u64(8);

    set_mode(&mut state, DataMode::Aggregated);
    let error = regenerate(&mut state, &mut rng).unwrap_err();
    assert!(error.contains("Telephony"), "unexpected error: {error}");
}

#[test]
fn sheet_rows_back_real_mode_when_no_issue_export_exists() {
    let (_tmp, dir) = create_data_dir();
    fs::remove_file(dir.join("issues.csv")).expect("remove issues.csv");

    let mut state = open_data_dir(&dir).expect("open data dir");
    let mut rng = StdRng::seed_from_u64(9);
    regenerate(&mut state, &mut rng).expect("sample sheet rows");

    match &state.dataset {
        Dataset::Issues(records) => {
            assert_eq!(records.len(), 2);
            assert!(records.iter().any(|r| r.category == "Email Services"));
        }
        Dataset::Bubbles(_) => panic!("expected issue records"),
    }
}
