//! End-to-end command runs over the production adapters: the JSON flags
//! file, the reqwest client against a mockito server and the terminal
//! router writing into a shared buffer.

use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};

use mockito::{Matcher, Server};
use sarajod_lib::bootstrap::wire_services;
use sarajod_lib::cli::{run, Command, TriggerArg, WelcomeAction};
use sarajod_lib::TerminalScreenRouter;
use sj_core::config::AppConfig;
use tempfile::TempDir;

#[derive(Clone, Default)]
struct SharedOutput(Arc<Mutex<Vec<u8>>>);

impl SharedOutput {
    fn lines(&self) -> Vec<String> {
        let bytes = self.0.lock().unwrap().clone();
        String::from_utf8(bytes)
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }
}

impl Write for SharedOutput {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn config(server_url: String, data_dir: &Path) -> AppConfig {
    AppConfig {
        api_base_url: server_url,
        api_timeout_secs: 5,
        bootstrap_step_timeout_secs: 5,
        data_dir: data_dir.to_path_buf(),
    }
}

fn write_flags(data_dir: &Path, flags: serde_json::Value) {
    std::fs::write(data_dir.join("flags.json"), flags.to_string()).unwrap();
}

fn read_flags(data_dir: &Path) -> serde_json::Value {
    serde_json::from_str(&std::fs::read_to_string(data_dir.join("flags.json")).unwrap()).unwrap()
}

#[tokio::test]
async fn stored_session_bootstraps_unlocks_and_signs_out() {
    let mut server = Server::new_async().await;
    let user = server
        .mock("GET", "/user/details")
        .match_header("authorization", "Bearer abc123")
        .with_status(200)
        .with_body(
            r#"{"user_id":"u-1","user_name":"Asha","profile":[{"_id":"p-1","userId":"u-1","profileName":"Shop"}]}"#,
        )
        .expect(1)
        .create_async()
        .await;
    let master = server
        .mock("GET", "/auth/is-Master-Pass")
        .with_status(200)
        .with_body(r#"{"isSet":true}"#)
        .expect(1)
        .create_async()
        .await;
    let transactions = server
        .mock("POST", "/transaction/transactions")
        .match_body(Matcher::Json(serde_json::json!({ "profileId": "p-1" })))
        .with_status(200)
        .with_body(r#"{"success":true,"count":0,"data":[]}"#)
        .expect(1)
        .create_async()
        .await;
    let unlock = server
        .mock("POST", "/auth/validate-master-password")
        .match_body(Matcher::Json(serde_json::json!({ "masterPass": 123456 })))
        .with_status(200)
        .expect(1)
        .create_async()
        .await;

    let dir = TempDir::new().unwrap();
    write_flags(
        dir.path(),
        serde_json::json!({ "token": "abc123", "hasSeenWelcome": "true" }),
    );
    let output = SharedOutput::default();
    let services = wire_services(
        &config(server.url(), dir.path()),
        Arc::new(TerminalScreenRouter::with_writer(output.clone())),
    )
    .unwrap();

    run(
        Command::Bootstrap {
            trigger: TriggerArg::AppStart,
        },
        &services,
    )
    .await
    .unwrap();
    run(
        Command::Unlock {
            pin: "123456".into(),
        },
        &services,
    )
    .await
    .unwrap();
    run(Command::SignOut, &services).await.unwrap();

    user.assert_async().await;
    master.assert_async().await;
    transactions.assert_async().await;
    unlock.assert_async().await;
    assert_eq!(
        output.lines(),
        vec!["/masterPass/entryPass", "/home", "/login"]
    );
    let flags = read_flags(dir.path());
    assert!(flags.get("token").is_none());
    assert!(flags.get("cachedUserDetails").is_none());
    assert_eq!(flags["hasSeenWelcome"], "true");
}

#[tokio::test]
async fn no_session_never_touches_the_network() {
    let mut server = Server::new_async().await;
    let any_get = server
        .mock("GET", Matcher::Any)
        .expect(0)
        .create_async()
        .await;
    let any_post = server
        .mock("POST", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let dir = TempDir::new().unwrap();
    let output = SharedOutput::default();
    let services = wire_services(
        &config(server.url(), dir.path()),
        Arc::new(TerminalScreenRouter::with_writer(output.clone())),
    )
    .unwrap();

    run(
        Command::Bootstrap {
            trigger: TriggerArg::AppStart,
        },
        &services,
    )
    .await
    .unwrap();
    run(
        Command::Welcome {
            action: WelcomeAction::Leave,
        },
        &services,
    )
    .await
    .unwrap();
    run(
        Command::Bootstrap {
            trigger: TriggerArg::AppStart,
        },
        &services,
    )
    .await
    .unwrap();

    any_get.assert_async().await;
    any_post.assert_async().await;
    assert_eq!(output.lines(), vec!["/welcome", "/login"]);
}

#[tokio::test]
async fn rejected_pin_fails_the_command_without_routing() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/auth/validate-master-password")
        .with_status(400)
        .with_body(r#"{"message":"Invalid master password"}"#)
        .create_async()
        .await;

    let dir = TempDir::new().unwrap();
    write_flags(dir.path(), serde_json::json!({ "token": "abc123" }));
    let output = SharedOutput::default();
    let services = wire_services(
        &config(server.url(), dir.path()),
        Arc::new(TerminalScreenRouter::with_writer(output.clone())),
    )
    .unwrap();

    let err = run(
        Command::Unlock {
            pin: "000000".into(),
        },
        &services,
    )
    .await
    .unwrap_err();

    assert_eq!(err.to_string(), "Invalid master password");
    assert!(output.lines().is_empty());
    assert_eq!(read_flags(dir.path())["token"], "abc123");
}
