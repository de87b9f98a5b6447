use super::*;

#[test]
fn test_defaults_match_stock_bot() {
    let cfg = Config::default();
    assert_eq!(cfg.bot.name, "Kurumi | Bot");
    assert_eq!(cfg.bot.prefix, ".");
    assert!(cfg.bot.dev_self, "self messages are admitted by default");
    assert_eq!(cfg.timeouts.text_render_secs, 20);
    assert_eq!(cfg.timeouts.image_generation_secs, 45);
    assert_eq!(cfg.timeouts.lookup_secs, 12);
    assert_eq!(cfg.timeouts.media_secs, 15);
    assert_eq!(cfg.endpoints.image_width, 768);
    assert_eq!(cfg.reconnect.max_attempts, 0);
}

#[test]
fn test_partial_toml_fills_defaults() {
    let cfg = parse(
        r#"
        [bot]
        prefix = "!"
        dev_self = false

        [timeouts]
        media_secs = 5
    "#,
    )
    .unwrap();
    assert_eq!(cfg.bot.prefix, "!");
    assert!(!cfg.bot.dev_self);
    assert_eq!(cfg.bot.name, "Kurumi | Bot");
    assert_eq!(cfg.timeouts.media(), Duration::from_secs(5));
    assert_eq!(cfg.timeouts.lookup(), Duration::from_secs(12));
    assert_eq!(cfg.commands.menu_video, "./assets/menu.mp4");
}

#[test]
fn test_disabled_commands_parsed() {
    let cfg = parse(
        r#"
        [commands]
        disabled = ["neko", "tagall"]
    "#,
    )
    .unwrap();
    assert_eq!(cfg.commands.disabled, vec!["neko", "tagall"]);
}

#[test]
fn test_empty_prefix_rejected() {
    let err = parse("[bot]\nprefix = \"\"\n").unwrap_err();
    assert!(matches!(err, KurumiError::Config(_)));
}

#[test]
fn test_whitespace_prefix_rejected() {
    assert!(parse("[bot]\nprefix = \"! \"\n").is_err());
}

#[test]
fn test_malformed_toml_is_config_error() {
    let err = parse("[bot\nname = 1").unwrap_err();
    assert!(err.to_string().starts_with("config error"));
}

#[test]
fn test_load_missing_file_uses_defaults() {
    let cfg = load("/definitely/not/here/kurumi.toml").unwrap();
    assert_eq!(cfg.bot.prefix, ".");
}

#[test]
fn test_load_file_reports_missing_file() {
    assert!(load_file("/definitely/not/here/kurumi.toml")
        .unwrap()
        .is_none());

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[bot]\nprefix = \"!\"\n").unwrap();
    let cfg = load_file(path.to_str().unwrap()).unwrap().unwrap();
    assert_eq!(cfg.bot.prefix, "!");
}

#[test]
fn test_load_file_surfaces_parse_errors() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[bot\n").unwrap();
    assert!(load_file(path.to_str().unwrap()).is_err());
}

#[test]
fn test_load_reads_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[bot]\nname = \"Test Bot\"\ndata_dir = \"/tmp/kurumi\"\n").unwrap();
    let cfg = load(path.to_str().unwrap()).unwrap();
    assert_eq!(cfg.bot.name, "Test Bot");
    assert_eq!(cfg.bot.session_dir(), PathBuf::from("/tmp/kurumi/session"));
    assert_eq!(cfg.bot.log_dir(), PathBuf::from("/tmp/kurumi/logs"));
}

#[test]
fn test_shellexpand_home() {
    if let Some(home) = std::env::var_os("HOME") {
        let expanded = shellexpand("~/kurumi");
        assert_eq!(expanded, format!("{}/kurumi", home.to_string_lossy()));
    }
    assert_eq!(shellexpand("/abs/path"), "/abs/path");
}

#[test]
fn test_example_config_parses() {
    let cfg = parse(include_str!("../../../../config.example.toml")).unwrap();
    assert_eq!(cfg.bot.prefix, ".");
    assert!(cfg.commands.disabled.is_empty());
    assert_eq!(cfg.timeouts.image_generation_secs, 45);
    assert_eq!(cfg.reconnect.max_attempts, 0);
}
