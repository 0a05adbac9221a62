use palette_core::model::{Command, Icon, ResultTemplate};
use palette_core::registry::{CommandRegistry, RegisteredCommand};

fn command(key: &str, scope: &str) -> Command {
    Command::new(key, scope, ResultTemplate::new(Icon::new("x"), format!("Run {key}")))
}

#[test]
fn scene_commands_are_removed_together() {
    let mut registry = CommandRegistry::new();
    registry.register(command("go-to", "global"));
    registry.register(command("insight-save", "Insights"));
    registry.register(command("insight-share", "Insights"));
    registry.register(command("events-export", "Events"));

    assert_eq!(registry.deregister_scope("Insights"), 2);
    assert_eq!(
        registry.keys().collect::<Vec<_>>(),
        vec!["go-to", "events-export"]
    );
    assert_eq!(registry.deregister_scope("Insights"), 0);
}

#[test]
fn registered_pattern_extracts_prefix_and_argument() {
    let entry =
        RegisteredCommand::new(command("open-urls", "global").with_prefixes(["open", "visit"]));
    let pattern = entry.pattern.as_ref().unwrap();

    let matched = pattern.matches("  Visit https://example.com").unwrap();
    assert_eq!(matched.prefix, "Visit");
    assert_eq!(matched.argument, Some("https://example.com"));

    let bare = pattern.matches("open").unwrap();
    assert_eq!(bare.argument, None);

    assert!(pattern.matches("opening").is_none());
    assert!(pattern.matches("reopen x").is_none());
}

#[test]
fn regex_metacharacters_in_prefixes_are_literal() {
    let entry = RegisteredCommand::new(command("calc", "global").with_prefixes(["=", "calc+"]));
    let pattern = entry.pattern.as_ref().unwrap();

    assert_eq!(pattern.matches("= 1+2").unwrap().argument, Some("1+2"));
    assert_eq!(pattern.matches("calc+ 3").unwrap().prefix, "calc+");
    assert!(pattern.matches("calcc 3").is_none());
}

#[test]
fn blank_prefix_list_has_no_pattern() {
    let entry = RegisteredCommand::new(command("blank", "global").with_prefixes(["", "   "]));
    assert!(entry.pattern.is_none());
}
