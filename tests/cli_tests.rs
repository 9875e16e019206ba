use regex::Regex;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

const ALPHABET: &str = "abcdefghijklmnopqrstuvwxyzñ";

struct TestContext {
    dir: TempDir,
    digraph_path: PathBuf,
    letter_path: PathBuf,
}

impl TestContext {
    fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let digraph_path = dir.path().join("digraphs_prob.txt");
        let letter_path = dir.path().join("single_char_prob.txt");

        // Digraphs as a dictionary literal
        let mut digraphs = File::create(&digraph_path).unwrap();
        writeln!(
            digraphs,
            "{{'de': 0.09, 'en': 0.08, 'qu': 0.06, 'ue': 0.06, 'la': 0.07, 'añ': 0.02, 'ño': 0.02}}"
        )
        .unwrap();

        // Letters as TSV counts
        let mut letters = File::create(&letter_path).unwrap();
        for (i, c) in ALPHABET.chars().enumerate() {
            writeln!(letters, "{}\t{}", c, 10 + (i * 7) % 13).unwrap();
        }

        Self {
            dir,
            digraph_path,
            letter_path,
        }
    }

    fn out_dir(&self) -> PathBuf {
        self.dir.path().join("annealing")
    }

    fn run(&self, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_fittsforge"))
            .args(args)
            .arg("-d")
            .arg(&self.digraph_path)
            .arg("-l")
            .arg(&self.letter_path)
            .output()
            .expect("Failed to execute binary")
    }

    fn search(&self, seed: &str) -> Output {
        let out_dir = self.out_dir();
        self.run(&[
            "search",
            "--temp-initial",
            "1.0",
            "--temp-final",
            "0.01",
            "--cooling-rate",
            "0.5",
            "--iterations-per-temp",
            "10",
            "--log-every",
            "7",
            "-S",
            seed,
            "-o",
            out_dir.to_str().unwrap(),
        ])
    }
}

fn read_json(path: &Path) -> serde_json::Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn test_cli_score_reports_known_layouts() {
    let ctx = TestContext::new();
    let output = ctx.run(&["score"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success(), "stdout:\n{}", stdout);

    let row = Regex::new(r"\|\s*(qwerty|alphabetical)\s*\|\s*([0-9.]+)\s*\|\s*([0-9.]+)\s*\|\s*([0-9.]+)\s*\|")
        .unwrap();
    let mut seen = Vec::new();
    for caps in row.captures_iter(&stdout) {
        let digraph: f64 = caps[2].parse().unwrap();
        let letter: f64 = caps[3].parse().unwrap();
        let total: f64 = caps[4].parse().unwrap();
        // Default weights: 1.0 * digraph + 0.1 * letter, printed to 6 places
        assert!((total - (digraph + 0.1 * letter)).abs() < 1e-5);
        seen.push(caps[1].to_string());
    }
    seen.sort();
    assert_eq!(seen, vec!["alphabetical", "qwerty"]);
}

#[test]
fn test_cli_score_filter() {
    let ctx = TestContext::new();
    let output = ctx.run(&["score", "--layout", "qwe"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success());
    assert!(stdout.contains("qwerty"));
    assert!(!stdout.contains("alphabetical"));
}

#[test]
fn test_cli_search_writes_run_artifacts() {
    let ctx = TestContext::new();
    let output = ctx.search("42");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success(), "stdout:\n{}", stdout);
    assert!(Regex::new(r"Best cost\s*\|\s*[0-9.]+").unwrap().is_match(&stdout));

    let out = ctx.out_dir();
    let progress = fs::read_to_string(out.join("progress_logs/annealing_progress1.csv")).unwrap();
    let lines: Vec<&str> = progress.lines().collect();
    assert!(lines[0].starts_with("iteration,elapsed_seconds,temperature"));
    assert_eq!(lines.len(), 11);

    let result = read_json(&out.join("result_log/results1.json"));
    assert_eq!(result["outer_steps"], 7);
    assert_eq!(result["cost_history"].as_array().unwrap().len(), 70);
    assert_eq!(result["best_layout"].as_object().unwrap().len(), 27);

    let snapshot = out.join("progress_logs/current_best_layout.json");
    if snapshot.exists() {
        let doc = read_json(&snapshot);
        assert_eq!(doc["best_cost"], result["best_cost"]);
        assert_eq!(doc["layout"], result["best_layout"]);
    }
}

#[test]
fn test_cli_search_seed_reproduces_and_numbers_runs() {
    let ctx = TestContext::new();
    assert!(ctx.search("7").status.success());
    assert!(ctx.search("7").status.success());

    let results = ctx.out_dir().join("result_log");
    let first = read_json(&results.join("results1.json"));
    let second = read_json(&results.join("results2.json"));
    assert_eq!(first["best_layout"], second["best_layout"]);
    assert_eq!(first["best_cost"], second["best_cost"]);
    assert_eq!(first["cost_history"], second["cost_history"]);
    assert!(ctx
        .out_dir()
        .join("progress_logs/annealing_progress2.csv")
        .exists());
}

#[test]
fn test_cli_missing_table_fails() {
    let ctx = TestContext::new();
    let output = Command::new(env!("CARGO_BIN_EXE_fittsforge"))
        .args(["score", "-d", "/no/such/digraphs.txt"])
        .arg("-l")
        .arg(&ctx.letter_path)
        .output()
        .unwrap();
    assert!(!output.status.success());
}

#[test]
fn test_cli_rejects_bad_schedule() {
    let ctx = TestContext::new();
    let output = ctx.run(&[
        "search",
        "--cooling-rate",
        "1.5",
        "-o",
        ctx.out_dir().to_str().unwrap(),
    ]);
    assert!(!output.status.success());
    assert!(!ctx.out_dir().join("result_log/results1.json").exists());
}
