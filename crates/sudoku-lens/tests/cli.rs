use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;

const PUZZLE: &str = "\
5 3 0 0 7 0 0 0 0
6 0 0 1 9 5 0 0 0
0 9 8 0 0 0 0 6 0
8 0 0 0 6 0 0 0 3
4 0 0 8 0 3 0 0 1
7 0 0 0 2 0 0 0 6
0 6 0 0 0 0 2 8 0
0 0 0 4 1 9 0 0 5
0 0 0 0 8 0 0 7 9
";

fn cli() -> Command {
    Command::cargo_bin("sudoku-lens").expect("binary built")
}

#[test]
fn solve_prints_the_completed_grid() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("puzzle.txt");
    fs::write(&path, PUZZLE).expect("written");

    cli()
        .arg("solve")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("5 3 4 6 7 8 9 1 2\n"))
        .stdout(predicate::str::contains("3 4 5 2 8 6 1 7 9\n"));
}

#[test]
fn solve_rejects_conflicting_puzzle() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("bad.txt");
    fs::write(&path, PUZZLE.replacen("5 3 0", "5 5 0", 1)).expect("written");

    cli()
        .arg("solve")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("repeats"));
}

#[test]
fn init_config_writes_defaults() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("cfg.json");
    cli().arg("init-config").arg(&path).assert().success();

    let cfg = sudoku_lens::PipelineConfig::load_json(&path).expect("valid config");
    assert_eq!(cfg, sudoku_lens::PipelineConfig::default());
}

#[test]
fn scan_without_model_reports_frames() {
    let dir = tempfile::tempdir().expect("tempdir");
    let frame = dir.path().join("f0.png");
    image::GrayImage::from_pixel(64, 64, image::Luma([255]))
        .save(&frame)
        .expect("png written");

    cli()
        .arg("scan")
        .arg(&frame)
        .assert()
        .success()
        .stdout(predicate::str::contains("frames: 1, puzzle found in 0"));
}

#[test]
fn train_rejects_unlabelled_sample_names() {
    let dir = tempfile::tempdir().expect("tempdir");
    let sample = dir.path().join("cell.png");
    image::GrayImage::from_pixel(40, 40, image::Luma([255]))
        .save(&sample)
        .expect("png written");

    cli()
        .args(["train", "--out"])
        .arg(dir.path().join("m.json"))
        .arg(&sample)
        .assert()
        .failure()
        .stderr(predicate::str::contains("must start with 1-9"));
}
