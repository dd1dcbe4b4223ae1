//! Simulation contract tests
//!
//! End-to-end checks through the public API:
//! 1. Outcome and scoreline counts sum to the trial count
//! 2. Same seed gives the same aggregates, whatever the thread count
//! 3. Probability clamp and Poisson floor hold in long runs
//! 4. Cancelled and timed-out runs keep only completed trials

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;
    use std::thread;
    use std::time::Duration;

    use crate::data::{KeeperRecord, PlayerRecord, TeamRecord};
    use crate::{
        DatasetProvider, MatchConfiguration, RunOptions, SeasonDataset, ShotRecord, Side, SimError,
        SimParams, SimulationMode, Simulator, StopReason, TrialBudget,
    };

    const SEASON: i32 = 2024;

    fn league() -> DatasetProvider {
        let mut dataset = SeasonDataset {
            season: SEASON,
            league_xga_per_game: Some(1.35),
            ..Default::default()
        };

        dataset.teams = vec![
            TeamRecord {
                name: Some("Arsenal".into()),
                abbreviation: Some("ARS".into()),
                average_shots_per_game: Some(14.0),
                xga_per_game: Some(0.95),
                goalkeeper: Some(KeeperRecord { xgoals_faced: 32.0, goals_minus_xgoals: -3.5 }),
                ..TeamRecord::new("ARS")
            },
            TeamRecord {
                name: Some("Chelsea".into()),
                abbreviation: Some("CHE".into()),
                average_shots_per_game: Some(12.0),
                xga_per_game: Some(1.45),
                goalkeeper: Some(KeeperRecord { xgoals_faced: 45.0, goals_minus_xgoals: 4.0 }),
                ..TeamRecord::new("CHE")
            },
        ];

        let ars = ["saka", "odegaard", "havertz", "rice", "martinelli"];
        let che = ["palmer", "jackson", "madueke", "enzo"];
        for game in 0..6 {
            let game_id = format!("g{game}");
            for (i, shooter) in ars.iter().enumerate() {
                let xg = 0.03 + 0.04 * ((game + i) % 5) as f64;
                dataset.shots.push(ShotRecord::new("ARS", shooter, xg).with_game(&game_id));
                dataset.shots.push(ShotRecord::new("ARS", shooter, xg / 2.0).with_game(&game_id));
            }
            for (i, shooter) in che.iter().enumerate() {
                let xg = 0.05 + 0.05 * ((game * 2 + i) % 4) as f64;
                dataset.shots.push(ShotRecord::new("CHE", shooter, xg).with_game(&game_id));
                dataset.shots.push(ShotRecord::new("CHE", shooter, xg / 3.0).with_game(&game_id));
            }
        }
        dataset.shots.push(
            ShotRecord::new("CHE", "palmer", 0.78).with_game("g0").with_pattern("Penalty"),
        );

        dataset.players = ars
            .iter()
            .chain(che.iter())
            .map(|id| PlayerRecord { player_id: id.to_string(), name: id.to_uppercase() })
            .collect();

        DatasetProvider::new(dataset)
    }

    fn config(mode: SimulationMode, seed: u64) -> MatchConfiguration {
        MatchConfiguration::new("ARS", "CHE", SEASON).with_mode(mode).with_seed(seed)
    }

    #[test]
    fn outcome_and_scoreline_counts_sum_to_trials() {
        let provider = league();
        for mode in [SimulationMode::Shot, SimulationMode::Poisson] {
            for n in [1u64, 17, 2_500] {
                let mut sim = Simulator::new(config(mode, 11), &provider).unwrap();
                sim.run_simulations(n).unwrap();

                let summary = sim.get_summary(&provider).unwrap();
                assert_eq!(summary.home_wins + summary.draws + summary.away_wins, n);
                assert!(
                    (summary.home_win_pct + summary.draw_pct + summary.away_win_pct - 1.0).abs() < 1e-9
                );
                assert!(summary.avg_home_goals >= 0.0 && summary.avg_away_goals >= 0.0);

                let dist = sim.get_scoreline_distribution().unwrap();
                assert_eq!(dist.iter().map(|e| e.count).sum::<u64>(), n);
                assert!(dist.windows(2).all(|w| w[0].count >= w[1].count));
            }
        }
    }

    #[test]
    fn fixed_seed_is_reproducible() {
        let provider = league();
        let mut a = Simulator::new(config(SimulationMode::Shot, 1234), &provider).unwrap();
        let mut b = Simulator::new(config(SimulationMode::Shot, 1234), &provider).unwrap();
        a.run_simulations(5_000).unwrap();
        b.run_simulations(5_000).unwrap();

        assert_eq!(a.aggregator(), b.aggregator());
        assert_eq!(a.get_scoreline_distribution(), b.get_scoreline_distribution());
    }

    #[test]
    fn parallel_and_sequential_runs_agree() {
        let provider = league();
        let params = SimParams { parallel_chunk_size: 97, ..Default::default() };

        let mut parallel =
            Simulator::with_params(config(SimulationMode::Shot, 77), params.clone(), &provider)
                .unwrap();
        let mut sequential =
            Simulator::with_params(config(SimulationMode::Shot, 77), params, &provider).unwrap();

        parallel.run_simulations_with(3_000, &RunOptions::default()).unwrap();
        sequential.run_simulations_with(3_000, &RunOptions::sequential()).unwrap();

        assert_eq!(parallel.aggregator(), sequential.aggregator());
    }

    #[test]
    fn different_seeds_diverge() {
        let provider = league();
        let mut a = Simulator::new(config(SimulationMode::Shot, 1), &provider).unwrap();
        let mut b = Simulator::new(config(SimulationMode::Shot, 2), &provider).unwrap();
        a.run_simulations(2_000).unwrap();
        b.run_simulations(2_000).unwrap();
        assert_ne!(a.aggregator(), b.aggregator());
    }

    #[test]
    fn certain_shot_converges_to_probability_ceiling() {
        let mut dataset = SeasonDataset { season: SEASON, ..Default::default() };
        dataset.teams = vec![TeamRecord {
            average_shots_per_game: Some(1.0),
            ..TeamRecord::new("HOME")
        }];
        dataset.shots = vec![ShotRecord::new("HOME", "striker", 1.0).with_game("g1")];
        let provider = DatasetProvider::new(dataset);

        let config = MatchConfiguration::new("HOME", "AWAY", SEASON).with_seed(42);
        let mut sim = Simulator::new(config, &provider).unwrap();
        assert_eq!(sim.plan(Side::Home).keeper_modifier(), 0.0);
        assert_eq!(sim.plan(Side::Home).defense_modifier(), 1.0);

        sim.run_simulations(10_000).unwrap();
        let rate = sim.aggregator().goals_total(Side::Home) as f64 / 10_000.0;
        assert!((rate - 0.95).abs() < 0.015, "scoring rate {rate} should sit near 0.95");

        let top = sim.get_top_scorers(Side::Home, 5, &provider);
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].player_id, "striker");
        assert_eq!(top[0].name, "striker");
    }

    #[test]
    fn zero_trials_then_summary_is_not_run() {
        let provider = league();
        let mut sim = Simulator::new(config(SimulationMode::Shot, 5), &provider).unwrap();

        assert!(matches!(sim.run_simulations(0), Err(SimError::Configuration(_))));
        assert_eq!(sim.get_summary(&provider), Err(SimError::NotRun));
    }

    #[test]
    fn poisson_mean_converges_to_lambda() {
        let mut dataset = SeasonDataset { season: SEASON, ..Default::default() };
        dataset.teams = vec![TeamRecord { average_xg_per_game: Some(2.0), ..TeamRecord::new("HOME") }];
        let provider = DatasetProvider::new(dataset);

        let config = MatchConfiguration::new("HOME", "AWAY", SEASON)
            .with_mode(SimulationMode::Poisson)
            .with_advantages(1.0, 1.0)
            .with_seed(8);
        let mut sim = Simulator::new(config, &provider).unwrap();
        assert!((sim.plan(Side::Home).lambda() - 2.0).abs() < 1e-12);

        sim.run_simulations(40_000).unwrap();
        let summary = sim.get_summary(&()).unwrap();
        assert!(
            (summary.avg_home_goals - 2.0).abs() < 0.05,
            "mean home goals {} should be near 2.0",
            summary.avg_home_goals
        );
        // The away side has no data at all and still plays at the floored rate.
        assert!((sim.plan(Side::Away).lambda() - 0.1).abs() < 1e-12);
        assert!(summary.avg_away_goals < 0.2);
    }

    #[test]
    fn top_scorers_are_bounded_and_sorted() {
        let provider = league();
        let mut sim = Simulator::new(config(SimulationMode::Shot, 3), &provider).unwrap();
        sim.run_simulations(4_000).unwrap();

        for side in [Side::Home, Side::Away] {
            let top = sim.get_top_scorers(side, 5, &provider);
            assert!(!top.is_empty() && top.len() <= 5);
            assert!(top.windows(2).all(|w| w[0].goals >= w[1].goals));
            assert_eq!(top[0].name, top[0].player_id.to_uppercase());
        }

        let home_total: u64 = sim.get_top_scorers(Side::Home, usize::MAX, &provider)
            .iter()
            .map(|s| s.goals)
            .sum();
        assert_eq!(home_total, sim.aggregator().goals_total(Side::Home));
    }

    #[test]
    fn excluded_shooters_and_penalties_never_score() {
        let provider = league();
        let config = config(SimulationMode::Shot, 21)
            .excluding_shooter("saka")
            .excluding_penalties(true);
        let mut sim = Simulator::new(config, &provider).unwrap();

        assert!(sim.profile(Side::Home).shots.iter().all(|s| s.shooter_id != "saka"));
        assert!(sim.profile(Side::Away).shots.iter().all(|s| s.pattern_of_play != "Penalty"));

        sim.run_simulations(3_000).unwrap();
        let scorers = sim.get_top_scorers(Side::Home, usize::MAX, &provider);
        assert!(scorers.iter().all(|s| s.player_id != "saka"));
    }

    #[test]
    fn post_shot_xg_bypasses_keeper_adjustment() {
        let mut dataset = SeasonDataset { season: SEASON, ..Default::default() };
        dataset.teams = vec![
            TeamRecord { average_shots_per_game: Some(1.0), ..TeamRecord::new("HOME") },
            TeamRecord {
                goalkeeper: Some(KeeperRecord { xgoals_faced: 10.0, goals_minus_xgoals: 9.0 }),
                ..TeamRecord::new("AWAY")
            },
        ];
        dataset.shots = vec![ShotRecord::new("HOME", "striker", 0.5).with_psxg(0.99)];
        let provider = DatasetProvider::new(dataset);

        // Pre-shot xG: 0.5 * (1 - 0.9) = 0.05
        let mut pre = Simulator::new(MatchConfiguration::new("HOME", "AWAY", SEASON).with_seed(4), &provider)
            .unwrap();
        let mut post = Simulator::new(
            MatchConfiguration::new("HOME", "AWAY", SEASON).with_seed(4).using_post_shot_xg(true),
            &provider,
        )
        .unwrap();

        pre.run_simulations(5_000).unwrap();
        post.run_simulations(5_000).unwrap();

        let pre_rate = pre.aggregator().goals_total(Side::Home) as f64 / 5_000.0;
        let post_rate = post.aggregator().goals_total(Side::Home) as f64 / 5_000.0;
        assert!((pre_rate - 0.05).abs() < 0.02, "pre-shot rate {pre_rate}");
        assert!((post_rate - 0.99).abs() < 0.01, "post-shot rate {post_rate}");
    }

    #[test]
    fn post_shot_mode_without_psxg_uses_pre_shot_xg() {
        let dataset = r#"{
            "season": 2024,
            "teams": [{"team_id": "HOME", "average_shots_per_game": 1.0}],
            "shots": [{"team_id": "HOME", "shooter_id": "striker", "game_id": "g1", "shot_xg": 0.6}]
        }"#;
        let provider = DatasetProvider::from_json(dataset).unwrap();

        let config = MatchConfiguration::new("HOME", "AWAY", SEASON)
            .with_seed(1)
            .using_post_shot_xg(true);
        let mut sim = Simulator::new(config, &provider).unwrap();
        sim.run_simulations(2_000).unwrap();

        let rate = sim.aggregator().goals_total(Side::Home) as f64 / 2_000.0;
        assert!((rate - 0.6).abs() < 0.05, "scoring rate {rate} should sit near 0.6");
    }

    #[test]
    fn most_likely_scoreline_heads_the_distribution() {
        let provider = league();
        let mut sim = Simulator::new(config(SimulationMode::Poisson, 13), &provider).unwrap();
        assert_eq!(sim.most_likely_scoreline(), Err(SimError::NotRun));

        sim.run_simulations(5_000).unwrap();
        let top = sim.most_likely_scoreline().unwrap();
        let dist = sim.get_scoreline_distribution().unwrap();
        assert_eq!(top, dist[0]);
        assert!(dist.iter().all(|e| e.count <= top.count));
        assert_eq!(
            top.count,
            sim.aggregator().scoreline_count(top.home_goals, top.away_goals)
        );
    }

    #[test]
    fn cancellation_keeps_only_completed_trials() {
        let provider = league();
        let mut sim = Simulator::new(config(SimulationMode::Shot, 9), &provider).unwrap();
        let budget = TrialBudget::unlimited();
        let handle = budget.cancel_handle();

        let canceller = thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            handle.store(true, Ordering::Relaxed);
        });

        let report = sim
            .run_simulations_with(50_000_000, &RunOptions::default().with_budget(budget))
            .unwrap();
        canceller.join().unwrap();

        assert_eq!(report.stop, StopReason::Cancelled);
        assert!(report.completed < report.requested);
        assert_eq!(report.completed, sim.n_simulations());

        if report.completed > 0 {
            let summary = sim.get_summary(&provider).unwrap();
            assert_eq!(summary.home_wins + summary.draws + summary.away_wins, report.completed);
            let dist = sim.get_scoreline_distribution().unwrap();
            assert_eq!(dist.iter().map(|e| e.count).sum::<u64>(), report.completed);
        }
    }

    #[test]
    fn timeout_aborts_cleanly() {
        let provider = league();
        let mut sim = Simulator::new(config(SimulationMode::Shot, 10), &provider).unwrap();

        let report = sim
            .run_simulations_with(
                50_000_000,
                &RunOptions::sequential().with_budget(TrialBudget::with_timeout(25)),
            )
            .unwrap();

        assert_eq!(report.stop, StopReason::TimedOut);
        assert!(report.completed < report.requested);
        assert_eq!(sim.aggregator().n_simulations(), report.completed);

        // The instance stays usable after an aborted run.
        let next = sim.run_simulations(100).unwrap();
        assert!(next.is_complete());
        assert_eq!(next.total_simulations, report.completed + 100);
    }

    #[test]
    fn missing_team_data_degrades_to_defaults() {
        let provider = league();
        let config = MatchConfiguration::new("ARS", "NEWLY_PROMOTED", SEASON).with_seed(6);
        let mut sim = Simulator::new(config, &provider).unwrap();

        assert_eq!(sim.plan(Side::Home).defense_modifier(), 1.0);
        assert_eq!(sim.plan(Side::Home).keeper_modifier(), 0.0);
        assert!(sim.profile(Side::Away).shots.is_empty());

        sim.run_simulations(1_000).unwrap();
        let summary = sim.get_summary(&provider).unwrap();
        assert_eq!(summary.away_team_name, "NEWLY_PROMOTED");
        assert_eq!(summary.avg_away_goals, 0.0);
    }
}
