//! # StarX CLI Chat Integration Tests
//!
//! File: cli/tests/chat.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Drives `starx chat` through piped stdin.
//!

mod common;
use common::*;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

#[test]
fn test_chat_purchase_flow() {
    let dir = tempdir().unwrap();
    let model = write_test_model(dir.path());

    starx_in(dir.path())
        .args(["chat", "--model"])
        .arg(&model)
        .write_stdin("I want to buy a car\nAsha\n40000, 1, 2015\nbye\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Chatbot for StarX"))
        .stdout(predicate::str::contains("separated by commas"))
        .stdout(predicate::str::contains(
            "StarX: This car will cost ₹90,000.00. Your order has been sent!",
        ))
        .stdout(predicate::str::contains("Goodbye!"));
}

#[test]
fn test_chat_best_deal_flow() {
    let dir = tempdir().unwrap();

    starx_in(dir.path())
        .arg("chat")
        .write_stdin("show me the best deal\nok\n60000-70000\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Here are some cars in your price range:"))
        .stdout(predicate::str::contains("Ford Ikon - 2008"));
}

#[test]
fn test_chat_history_and_reset() {
    let dir = tempdir().unwrap();

    starx_in(dir.path())
        .arg("chat")
        .write_stdin("hello\n/history\n/reset\n/history\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("1. You: hello"))
        .stdout(predicate::str::contains("2. Bot: Hi there! How can I assist you today?"))
        .stdout(predicate::str::contains("(no messages yet)"));
}

#[test]
fn test_chat_missing_model_keeps_session_usable() {
    let dir = tempdir().unwrap();

    starx_in(dir.path())
        .args(["chat", "--model", "missing.toml"])
        .write_stdin("I want to buy a car\nok\n40000, 1, 2015\nhello\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("There was an error processing your input."))
        .stdout(predicate::str::contains("Hi there! How can I assist you today?"));
}

#[test]
fn test_chat_uses_configured_name() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join(".starx.toml"),
        "[assistant]\nname = \"Nova\"\n",
    )
    .unwrap();

    starx_in(dir.path())
        .arg("chat")
        .write_stdin("hi\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Chatbot for Nova"))
        .stdout(predicate::str::contains("Nova: "));
}
