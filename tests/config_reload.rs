mod common;
use common::*;

use mchprs_chat::{ChatFormatPlugin, Services};
use std::fs;

fn rendered(plugin: &ChatFormatPlugin, message: &str) -> String {
    let server = TestServer::new();
    let (_, rendered) = chat(plugin, &server, steve(), message);
    rendered.unwrap().plain_text()
}

#[test]
fn enable_creates_missing_config() {
    init_logging();
    let config = TempConfig::new("create");
    let plugin = ChatFormatPlugin::enable(&config.path, Services::default()).unwrap();
    let written = fs::read_to_string(&config.path).unwrap();
    assert!(written.contains("[chat.filter]"));
    assert!(written.contains("blocked_keywords"));
    assert_eq!(plugin.settings().config.chat.time_zone, "server");
}

#[test]
fn missing_keys_are_written_back() {
    init_logging();
    let config = TempConfig::new("merge");
    fs::write(
        &config.path,
        "# my settings\n[chat]\nformat = \"A {player}: {message}\"\n",
    )
    .unwrap();

    let plugin = ChatFormatPlugin::enable(&config.path, Services::default()).unwrap();
    assert_eq!(rendered(&plugin, "hi"), "A Steve: hi");

    let written = fs::read_to_string(&config.path).unwrap();
    assert!(written.starts_with("# my settings\n"));
    assert!(written.contains("format = \"A {player}: {message}\""));
    assert!(written.contains("message_format"));
    assert!(written.contains("chat_filter_bypass"));
}

#[test]
fn reload_applies_to_next_message() {
    init_logging();
    let config = TempConfig::new("reload");
    fs::write(&config.path, "[chat]\nformat = \"A {player}: {message}\"\n").unwrap();
    let plugin = ChatFormatPlugin::enable(&config.path, Services::default()).unwrap();
    assert_eq!(rendered(&plugin, "hi"), "A Steve: hi");

    fs::write(
        &config.path,
        "[chat]\nformat = \"B {player}: {message}\"\n\n[chat.filter]\nblocked_keywords = [\"hi\"]\n",
    )
    .unwrap();
    plugin.reload().unwrap();
    assert_eq!(rendered(&plugin, "hello"), "B Steve: hello");

    let server = TestServer::new();
    let (event, _) = chat(&plugin, &server, steve(), "hi");
    assert!(event.is_cancelled());
}

#[test]
fn failed_reload_keeps_settings() {
    init_logging();
    let config = TempConfig::new("broken");
    fs::write(&config.path, "[chat]\nformat = \"A {player}: {message}\"\n").unwrap();
    let plugin = ChatFormatPlugin::enable(&config.path, Services::default()).unwrap();

    fs::write(&config.path, "[chat\nformat = ").unwrap();
    assert!(plugin.reload().is_err());
    assert_eq!(rendered(&plugin, "hi"), "A Steve: hi");
}

#[test]
fn enable_reports_invalid_config() {
    init_logging();
    let config = TempConfig::new("invalid");
    fs::write(&config.path, "[chat]\nenable_placeholder_hook = \"yes\"\n").unwrap();
    let err = ChatFormatPlugin::enable(&config.path, Services::default())
        .err()
        .unwrap();
    assert!(err.to_string().starts_with("failed to load"));
}

#[test]
fn invalid_clock_settings_fall_back() {
    init_logging();
    let config = TempConfig::new("clock");
    fs::write(
        &config.path,
        "[chat]\ntime_pattern = \"%Q\"\ntime_zone = \"Mars/Olympus\"\n",
    )
    .unwrap();
    let plugin = ChatFormatPlugin::enable(&config.path, Services::default()).unwrap();
    let settings = plugin.settings();
    assert_eq!(settings.clock.pattern(), "%H:%M:%S");
    assert_eq!(settings.config.chat.time_zone, "Mars/Olympus");
}
