use std::fs;
use std::path::Path;

use jass_bench::config::BenchmarkConfig;
use jass_bench::tournament::{RunSummary, TournamentRunner};
use sha2::{Digest, Sha256};
use tempfile::tempdir;

fn load_config(output_dir: &Path) -> BenchmarkConfig {
    let yaml = format!(
        r#"
run_id: "test_smoke"
matches:
  seed: 4242
  count: 2
agents:
  - name: "mcts_north"
    kind: "mcts"
    params:
      iterations: 30
  - name: "random_east"
    kind: "random"
  - name: "mcts_south"
    kind: "mcts"
    params:
      iterations: 30
      exploration: 20.0
  - name: "random_west"
    kind: "random"
    params:
      log_hooks: true
outputs:
  jsonl: "{jsonl}"
logging:
  enable_structured: false
"#,
        jsonl = output_dir.join("{run_id}").join("matches.jsonl").display(),
    );

    let mut cfg: BenchmarkConfig = serde_yaml::from_str(&yaml).expect("valid yaml");
    cfg.validate().expect("config validates");
    cfg
}

fn run_once(output_dir: &Path) -> RunSummary {
    let config = load_config(output_dir);
    let outputs = config.resolved_outputs();
    let runner = TournamentRunner::new(config, outputs).expect("runner created");
    runner.run().expect("matches complete")
}

/// Hashes the results with the wall-clock block removed.
fn normalized_digest(path: &Path) -> (String, Vec<serde_json::Value>) {
    let jsonl = fs::read_to_string(path).expect("jsonl readable");
    let mut rows = Vec::new();
    let mut normalized = String::new();
    for line in jsonl.lines() {
        let mut value: serde_json::Value = serde_json::from_str(line).expect("row decodes to JSON");
        if let Some(obj) = value.as_object_mut() {
            obj.remove("timing");
        }
        normalized.push_str(&serde_json::to_string(&value).expect("re-serialize normalized row"));
        normalized.push('\n');
        rows.push(value);
    }

    let mut hasher = Sha256::new();
    hasher.update(normalized.as_bytes());
    (hex::encode(hasher.finalize()), rows)
}

#[test]
fn same_config_produces_identical_results() {
    let first_dir = tempdir().expect("temp dir");
    let second_dir = tempdir().expect("temp dir");

    let first = run_once(first_dir.path());
    let second = run_once(second_dir.path());

    assert_eq!(first.matches_played, 2);
    assert_eq!(first.rows_written, 2);
    assert_eq!(first.wins.iter().sum::<usize>(), 2);
    assert!(first.telemetry_path.is_none());
    assert!(first.jsonl_path.ends_with("test_smoke/matches.jsonl"));

    let (first_digest, rows) = normalized_digest(&first.jsonl_path);
    let (second_digest, _) = normalized_digest(&second.jsonl_path);
    assert_eq!(
        first_digest, second_digest,
        "the same seed must replay the same matches"
    );

    for row in &rows {
        let team1 = row["team1_points"].as_u64().expect("team1 points");
        let team2 = row["team2_points"].as_u64().expect("team2 points");
        let winner = row["winner"].as_str().expect("winner label");
        let (won, lost) = if winner == "team1" { (team1, team2) } else { (team2, team1) };
        assert!(won >= 1000, "winner has {won} points");
        assert!(lost < 1000, "loser has {lost} points");

        let seating = row["seating"].as_array().expect("seating");
        assert_eq!(seating.len(), 4);
        let decisions: u64 = seating
            .iter()
            .map(|seat| seat["decisions"].as_u64().expect("decisions"))
            .sum();
        assert_eq!(decisions, 4 * row["tricks"].as_u64().expect("tricks"));
    }
    assert_ne!(rows[0]["match_seed"], rows[1]["match_seed"]);
}

#[test]
fn invalid_agent_params_are_rejected_before_playing() {
    let dir = tempdir().expect("temp dir");
    let mut config = load_config(dir.path());
    config.agents[1].params = serde_yaml::from_str("iterations: -3").expect("yaml");
    config.agents[1].kind = jass_bench::config::AgentKind::Mcts;
    let outputs = config.resolved_outputs();

    assert!(TournamentRunner::new(config, outputs.clone()).is_err());
    assert!(!outputs.jsonl.exists());
}
