//! Aggregates finished games into one row per enemy algorithm.

use std::fmt::Write as _;
use std::time::Duration;

use chase_core::{Algorithm, ChaseStatus, GameSummary};
use serde::Serialize;

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct AlgorithmReport {
    pub games: u32,
    pub captured: u32,
    pub stuck: u32,
    pub survived: u32,
    pub mean_score: f64,
    pub mean_steps: f64,
    /// Per fresh search; cache hits are not counted.
    pub mean_nodes_explored: f64,
    pub mean_millis: f64,
    #[serde(skip)]
    totals: Totals,
}

#[derive(Clone, Debug, Default, PartialEq)]
struct Totals {
    score: f64,
    steps: u64,
    nodes: u64,
    searches: u64,
    elapsed: Duration,
}

impl AlgorithmReport {
    pub fn record(&mut self, summary: &GameSummary, elapsed: Duration) {
        self.games += 1;
        match summary.status {
            ChaseStatus::EnemyCaptured => self.captured += 1,
            ChaseStatus::AgentStuck => self.stuck += 1,
            ChaseStatus::AgentSurvived => self.survived += 1,
            ChaseStatus::Running => {}
        }
        let fresh = summary.searches.iter().filter(|metric| !metric.reused);
        for metric in fresh {
            self.totals.nodes += u64::from(metric.nodes_explored);
            self.totals.searches += 1;
        }
        self.totals.score += summary.score;
        self.totals.steps += u64::from(summary.steps);
        self.totals.elapsed += elapsed;

        let games = f64::from(self.games);
        self.mean_score = self.totals.score / games;
        self.mean_steps = self.totals.steps as f64 / games;
        self.mean_millis = self.totals.elapsed.as_secs_f64() * 1000.0 / games;
        self.mean_nodes_explored = if self.totals.searches == 0 {
            0.0
        } else {
            self.totals.nodes as f64 / self.totals.searches as f64
        };
    }
}

/// Fixed-width text table, one line per algorithm.
pub fn render_table(rows: &[(Algorithm, AlgorithmReport)]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<10} {:>6} {:>8} {:>6} {:>8} {:>8} {:>8} {:>10} {:>9}",
        "algorithm", "games", "captured", "stuck", "survived", "score", "steps", "nodes", "ms/game"
    );
    for (algorithm, report) in rows {
        let _ = writeln!(
            out,
            "{:<10} {:>6} {:>8} {:>6} {:>8} {:>8.1} {:>8.1} {:>10.1} {:>9.3}",
            format!("{algorithm:?}"),
            report.games,
            report.captured,
            report.stuck,
            report.survived,
            report.mean_score,
            report.mean_steps,
            report.mean_nodes_explored,
            report.mean_millis
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use chase_core::{Role, SearchMetric};

    use super::*;

    fn summary(status: ChaseStatus, steps: u32, score: f64, nodes: &[(u32, bool)]) -> GameSummary {
        GameSummary {
            seed: 0,
            status,
            steps,
            good_steps: 0,
            score,
            searches: nodes
                .iter()
                .map(|&(nodes_explored, reused)| SearchMetric {
                    role: Role::Enemy,
                    algorithm: Algorithm::AStar,
                    algorithm_used: Algorithm::AStar,
                    nodes_explored,
                    path_len: Some(3),
                    reused,
                })
                .collect(),
        }
    }

    #[test]
    fn outcomes_and_means_accumulate() {
        let mut report = AlgorithmReport::default();
        report.record(
            &summary(ChaseStatus::EnemyCaptured, 40, 50.0, &[(10, false), (0, true)]),
            Duration::from_millis(2),
        );
        report.record(
            &summary(ChaseStatus::AgentSurvived, 60, 100.0, &[(30, false)]),
            Duration::from_millis(4),
        );

        assert_eq!((report.games, report.captured, report.stuck, report.survived), (2, 1, 0, 1));
        assert_eq!(report.mean_score, 75.0);
        assert_eq!(report.mean_steps, 50.0);
        assert_eq!(report.mean_nodes_explored, 20.0, "cache hits do not dilute the mean");
        assert!((report.mean_millis - 3.0).abs() < 1e-9);
    }

    #[test]
    fn table_has_a_header_and_one_row_per_algorithm() {
        let mut report = AlgorithmReport::default();
        report.record(&summary(ChaseStatus::AgentStuck, 5, 20.0, &[]), Duration::ZERO);
        let table = render_table(&[(Algorithm::Jps, report.clone()), (Algorithm::Bfs, report)]);
        let lines: Vec<_> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("Jps"));
        assert!(lines[2].contains("20.0"));
    }
}
