// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, anyhow};
use smsview_testkit::{sample_export, write_export};
use std::path::Path;
use std::process::{Command, Output};
use std::thread;
use tiny_http::{Response, Server};

fn smsview(config_dir: &Path, args: &[&str]) -> Result<Output> {
    let output = Command::new(env!("CARGO_BIN_EXE_smsview"))
        .args(args)
        .env("SMSVIEW_CONFIG_PATH", config_dir.join("config.toml"))
        .env_remove("RUST_LOG")
        .output()?;
    Ok(output)
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn file_export_lists_conversations() -> Result<()> {
    let (dir, path) = write_export(&sample_export())?;
    let output = smsview(dir.path(), &["--file", &path.to_string_lossy()])?;

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let text = stdout(&output);
    assert!(text.contains("A  555  (2 messages)  [1 unread]"));
    assert!(text.contains("--conversation 555"));
    Ok(())
}

#[test]
fn conversation_flag_prints_thread_with_footer() -> Result<()> {
    let (dir, path) = write_export(&sample_export())?;
    let output = smsview(
        dir.path(),
        &[
            "--file",
            &path.to_string_lossy(),
            "--conversation",
            "555",
            "--json",
        ],
    )?;

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let value: serde_json::Value = serde_json::from_str(&stdout(&output))?;
    assert_eq!(value["total_count"], 2);
    assert_eq!(value["messages"][0]["message"], "hi");
    Ok(())
}

#[test]
fn empty_export_fails_with_message() -> Result<()> {
    let (dir, path) = write_export(&serde_json::json!([]))?;
    let output = smsview(dir.path(), &["--file", &path.to_string_lossy()])?;

    assert!(!output.status.success());
    assert!(stderr(&output).contains("No messages found in the JSON file"));
    Ok(())
}

#[test]
fn missing_input_is_reported() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let output = smsview(dir.path(), &[])?;
    assert!(!output.status.success());
    assert!(stderr(&output).contains("pass --file <path> or --url"));
    Ok(())
}

#[test]
fn url_export_is_fetched_and_searched() -> Result<()> {
    let server =
        Server::http("127.0.0.1:0").map_err(|error| anyhow!("start mock server: {error}"))?;
    let url = format!("http://{}/backup/messages.json", server.server_addr());
    let handle = thread::spawn(move || {
        let request = server.recv().expect("request expected");
        let body = serde_json::to_string(&sample_export()).expect("encode sample export");
        request
            .respond(Response::from_string(body))
            .expect("response should succeed");
    });

    let dir = tempfile::tempdir()?;
    let output = smsview(dir.path(), &["--url", &url, "--search", "hey"])?;
    handle.join().expect("server thread should join");

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let text = stdout(&output);
    assert!(text.starts_with("1 messages match \"hey\""));
    assert!(text.contains("[sent]"));
    assert!(text.contains("--jump 2"));
    Ok(())
}

#[test]
fn print_example_config_round_trips() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let output = smsview(dir.path(), &["--print-example-config"])?;
    assert!(output.status.success());

    let config_path = dir.path().join("config.toml");
    std::fs::write(&config_path, output.stdout)?;
    let (_export_dir, path) = write_export(&sample_export())?;
    let output = smsview(dir.path(), &["--file", &path.to_string_lossy()])?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    Ok(())
}
