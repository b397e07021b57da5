extern crate assert_cmd;
extern crate predicates;
extern crate tempfile;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;

#[test]
fn mandel_renders_the_requested_file() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("seahorse.png");
    Command::cargo_bin("mandel")
        .unwrap()
        .args(&["-x", "-0.5", "-y", "-0.5", "-s", "0.2", "-W", "40", "-H", "30", "-m", "200", "-t", "4"])
        .arg("-o")
        .arg(&out)
        .assert()
        .success()
        .stderr(predicate::str::contains("mandel: x=-0.5 y=-0.5"));
    let img = image::open(&out).unwrap();
    assert_eq!(img.to_rgb8().dimensions(), (40, 30));
}

#[test]
fn mandel_rejects_a_non_positive_scale() {
    let dir = tempfile::tempdir().unwrap();
    Command::cargo_bin("mandel")
        .unwrap()
        .args(&["-s", "0", "-W", "10", "-H", "10"])
        .arg("-o")
        .arg(dir.path().join("never.png"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid configuration"));
    assert!(!dir.path().join("never.png").exists());
}

#[test]
fn mandel_rejects_garbage_numbers() {
    Command::cargo_bin("mandel")
        .unwrap()
        .args(&["-W", "wide"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Could not parse image width"));
}

#[test]
fn mandelmovie_writes_numbered_frames() {
    let dir = tempfile::tempdir().unwrap();
    Command::cargo_bin("mandelmovie")
        .unwrap()
        .args(&["-n", "3", "-f", "6", "-z", "0.1", "-W", "16", "-H", "16", "-m", "50", "-e", "png"])
        .arg("-d")
        .arg(dir.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("All frames generated successfully."));
    for i in 0..6 {
        assert!(dir.path().join(format!("frame_{:02}.png", i)).is_file());
    }
    assert!(!dir.path().join("frame_06.png").exists());
}

#[test]
fn mandelmovie_fails_when_frames_cannot_be_encoded() {
    let dir = tempfile::tempdir().unwrap();
    Command::cargo_bin("mandelmovie")
        .unwrap()
        .args(&["-f", "2", "-W", "8", "-H", "8", "-m", "10", "-e", "nope"])
        .arg("-d")
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("frame_01.nope"));
}

#[cfg(unix)]
#[test]
fn mandel_accepts_a_non_utf8_output_name() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join(OsStr::from_bytes(b"fr\xffme.png"));
    Command::cargo_bin("mandel")
        .unwrap()
        .args(&["-W", "12", "-H", "8", "-m", "20"])
        .arg("-o")
        .arg(&out)
        .assert()
        .success();
    assert!(out.is_file());
}

#[cfg(unix)]
#[test]
fn mandelmovie_accepts_a_non_utf8_directory() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let dir = tempfile::tempdir().unwrap();
    let frames = dir.path().join(OsStr::from_bytes(b"m\xfevie"));
    Command::cargo_bin("mandelmovie")
        .unwrap()
        .args(&["-f", "2", "-W", "8", "-H", "8", "-m", "10", "-e", "png"])
        .arg("-d")
        .arg(&frames)
        .assert()
        .success();
    assert!(frames.join("frame_00.png").is_file());
    assert!(frames.join("frame_01.png").is_file());
}
