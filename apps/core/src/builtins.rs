use serde_json::json;

use crate::collaborators::Collaborators;
use crate::expression;
use crate::lookup::PersonRecord;
use crate::model::{Command, Flow, Icon, ResultTemplate};
use crate::ranking::GLOBAL_COMMAND_SCOPE;
use crate::resolver::Resolver;

pub const GO_TO_KEY: &str = "go-to";
pub const OPEN_URLS_KEY: &str = "open-urls";
pub const CALCULATOR_KEY: &str = "calculator";
pub const CREATE_PERSONAL_API_KEY_KEY: &str = "create-personal-api-key";
pub const CREATE_DASHBOARD_KEY: &str = "create-dashboard";
pub const SHARE_FEEDBACK_KEY: &str = "share-feedback";
pub const CUSTOM_DASHBOARDS_KEY: &str = "custom_dashboards";

pub const BUILTIN_COMMAND_KEYS: [&str; 6] = [
    GO_TO_KEY,
    OPEN_URLS_KEY,
    CALCULATOR_KEY,
    CREATE_PERSONAL_API_KEY_KEY,
    CREATE_DASHBOARD_KEY,
    SHARE_FEEDBACK_KEY,
];

pub const DOCS_URL: &str = "https://posthog.com/docs";
pub const FEEDBACK_CALL_URL: &str = "https://calendly.com/posthog-feedback";
pub const FEEDBACK_EMAIL_URL: &str = "mailto:hey@posthog.com";

pub mod icons {
    use crate::model::Icon;

    pub const AIM: Icon = Icon::new("aim");
    pub const CALCULATOR: Icon = Icon::new("calculator");
    pub const CHECK: Icon = Icon::new("check");
    pub const CLOCK_CIRCLE: Icon = Icon::new("clock-circle");
    pub const COMMENT: Icon = Icon::new("comment");
    pub const CONTAINER: Icon = Icon::new("container");
    pub const EXPERIMENT: Icon = Icon::new("experiment");
    pub const FUND: Icon = Icon::new("fund");
    pub const FUNNEL_PLOT: Icon = Icon::new("funnel-plot");
    pub const GATEWAY: Icon = Icon::new("gateway");
    pub const INTERACTION: Icon = Icon::new("interaction");
    pub const KEY: Icon = Icon::new("key");
    pub const LINE_CHART: Icon = Icon::new("line-chart");
    pub const LINK: Icon = Icon::new("link");
    pub const LOGOUT: Icon = Icon::new("logout");
    pub const MAIL: Icon = Icon::new("mail");
    pub const MESSAGE: Icon = Icon::new("message");
    pub const PLUS: Icon = Icon::new("plus");
    pub const RISE: Icon = Icon::new("rise");
    pub const SEND: Icon = Icon::new("send");
    pub const SETTING: Icon = Icon::new("setting");
    pub const SYNC: Icon = Icon::new("sync");
    pub const TAG: Icon = Icon::new("tag");
    pub const TEAM: Icon = Icon::new("team");
    pub const USER: Icon = Icon::new("user");
    pub const USERGROUP_ADD: Icon = Icon::new("usergroup-add");
    pub const VIDEO_CAMERA: Icon = Icon::new("video-camera");
}

struct Destination {
    icon: Icon,
    display: &'static str,
    path: &'static str,
    query: Option<&'static str>,
    synonyms: &'static [&'static str],
}

impl Destination {
    const fn new(icon: Icon, display: &'static str, path: &'static str) -> Self {
        Self {
            icon,
            display,
            path,
            query: None,
            synonyms: &[],
        }
    }

    const fn query(self, query: &'static str) -> Self {
        Self {
            query: Some(query),
            ..self
        }
    }

    const fn synonyms(self, synonyms: &'static [&'static str]) -> Self {
        Self { synonyms, ..self }
    }
}

const DESTINATIONS: &[Destination] = &[
    Destination::new(icons::FUND, "Go to Dashboards", "/dashboard"),
    Destination::new(icons::RISE, "Go to Insights", "/insights"),
    Destination::new(icons::RISE, "Go to Trends", "/insights").query("insight=TRENDS"),
    Destination::new(icons::CLOCK_CIRCLE, "Go to Sessions", "/insights").query("insight=SESSIONS"),
    Destination::new(icons::FUNNEL_PLOT, "Go to Funnels", "/insights").query("insight=FUNNELS"),
    Destination::new(icons::GATEWAY, "Go to Retention", "/insights").query("insight=RETENTION"),
    Destination::new(icons::INTERACTION, "Go to User Paths", "/insights").query("insight=PATHS"),
    Destination::new(icons::CONTAINER, "Go to Events", "/events"),
    Destination::new(icons::AIM, "Go to Actions", "/actions"),
    Destination::new(icons::SYNC, "Go to Live Actions", "/actions/live"),
    Destination::new(icons::CLOCK_CIRCLE, "Go to Live Sessions", "/sessions"),
    Destination::new(icons::USER, "Go to People", "/people").synonyms(&["people"]),
    Destination::new(icons::USERGROUP_ADD, "Go to Cohorts", "/people/cohorts"),
    Destination::new(icons::EXPERIMENT, "Go to Experiments", "/experiments/feature_flags")
        .synonyms(&["feature flags", "a/b tests"]),
    Destination::new(icons::SETTING, "Go to Setup", "/setup")
        .synonyms(&["settings", "configuration"]),
    Destination::new(icons::MESSAGE, "Go to Annotations", "/annotations"),
    Destination::new(icons::TEAM, "Go to Team", "/team"),
    Destination::new(icons::PLUS, "Create Action", "/action"),
];

/// The commands the palette registers when it mounts.
pub fn builtin_commands(collaborators: &Collaborators) -> Vec<Command> {
    vec![
        go_to_command(collaborators),
        open_urls_command(collaborators),
        calculator_command(collaborators),
        create_personal_api_key_command(collaborators),
        create_dashboard_command(collaborators),
        share_feedback_command(collaborators),
    ]
}

fn go_to_command(collaborators: &Collaborators) -> Command {
    let mut templates: Vec<ResultTemplate> = DESTINATIONS
        .iter()
        .map(|destination| {
            let navigator = collaborators.navigator.clone();
            let path = destination.path;
            let query = destination.query;
            ResultTemplate::new(destination.icon, destination.display)
                .with_synonyms(destination.synonyms.iter().copied())
                .executes(move || {
                    navigator.push(path, query, None);
                    None
                })
        })
        .collect();

    let navigator = collaborators.navigator.clone();
    templates.push(ResultTemplate::new(icons::LOGOUT, "Log Out").executes(move || {
        navigator.assign_location("/logout");
        None
    }));

    Command::new(GO_TO_KEY, GLOBAL_COMMAND_SCOPE, templates).with_prefixes(["open", "visit"])
}

fn open_url_template(collaborators: &Collaborators, url: &str) -> ResultTemplate {
    let navigator = collaborators.navigator.clone();
    let target = url.to_string();
    ResultTemplate::new(icons::LINK, format!("Open {url}"))
        .with_synonyms([format!("Visit {url}")])
        .executes(move || {
            navigator.open_url(&target);
            None
        })
}

fn open_urls_command(collaborators: &Collaborators) -> Command {
    let collaborators = collaborators.clone();
    let resolver = Resolver::dynamic(move |argument, _prefix| {
        let mut results: Vec<ResultTemplate> = collaborators
            .urls
            .app_urls()
            .into_iter()
            .chain(collaborators.urls.suggested_urls())
            .map(|url| open_url_template(&collaborators, &url))
            .collect();
        if let Some(argument) = argument.filter(|argument| is_url(argument)) {
            results.push(open_url_template(&collaborators, argument));
        }

        let navigator = collaborators.navigator.clone();
        results.push(
            ResultTemplate::new(icons::LINK, "Open PostHog Docs")
                .with_synonyms(["technical documentation"])
                .executes(move || {
                    navigator.open_url(DOCS_URL);
                    None
                }),
        );
        Ok(results)
    });

    Command::new(OPEN_URLS_KEY, GLOBAL_COMMAND_SCOPE, resolver).with_prefixes(["open", "visit"])
}

fn calculator_command(collaborators: &Collaborators) -> Command {
    let clipboard = collaborators.clipboard.clone();
    let resolver = Resolver::dynamic(move |argument, _prefix| {
        let Some(argument) = argument else {
            return Ok(Vec::new());
        };
        let trimmed = argument.trim();
        if trimmed.is_empty() || trimmed.parse::<f64>().is_ok() {
            return Ok(Vec::new());
        }

        let Some(value) = expression::evaluate(trimmed)
            .ok()
            .filter(|value| value.is_finite())
        else {
            return Ok(Vec::new());
        };
        let text = format_number(value);
        let clipboard = clipboard.clone();
        let copied = text.clone();
        Ok(vec![ResultTemplate::new(icons::CALCULATOR, format!("= {text}"))
            .guaranteed()
            .executes(move || {
                clipboard.copy(&copied, "calculation result");
                None
            })])
    });

    Command::new(CALCULATOR_KEY, GLOBAL_COMMAND_SCOPE, resolver)
}

fn create_personal_api_key_command(collaborators: &Collaborators) -> Command {
    let collaborators = collaborators.clone();
    let template = ResultTemplate::new(icons::KEY, "Create Personal API Key").executes(move || {
        let collaborators = collaborators.clone();
        Some(
            Flow::new(
                "Creating Personal API Key",
                Resolver::dynamic(move |argument, _prefix| {
                    let Some(label) = argument.filter(|label| !label.is_empty()) else {
                        return Ok(Vec::new());
                    };
                    let api_keys = collaborators.api_keys.clone();
                    let navigator = collaborators.navigator.clone();
                    let label = label.to_string();
                    Ok(vec![ResultTemplate::new(icons::KEY, format!("Create Key \"{label}\""))
                        .executes(move || {
                            api_keys.create_key(&label);
                            navigator.push("/setup", None, Some("personal-api-keys"));
                            None
                        })])
                }),
            )
            .with_instruction("Give your key a label")
            .with_icon(icons::TAG),
        )
    });

    Command::new(CREATE_PERSONAL_API_KEY_KEY, GLOBAL_COMMAND_SCOPE, template)
}

fn create_dashboard_command(collaborators: &Collaborators) -> Command {
    let dashboards = collaborators.dashboards.clone();
    let template = ResultTemplate::new(icons::FUND, "Create Dashboard").executes(move || {
        let dashboards = dashboards.clone();
        Some(
            Flow::new(
                "Creating Dashboard",
                Resolver::dynamic(move |argument, _prefix| {
                    let Some(name) = argument.filter(|name| !name.is_empty()) else {
                        return Ok(Vec::new());
                    };
                    let dashboards = dashboards.clone();
                    let name = name.to_string();
                    Ok(vec![ResultTemplate::new(
                        icons::FUND,
                        format!("Create Dashboard \"{name}\""),
                    )
                    .executes(move || {
                        dashboards.add_dashboard(&name);
                        None
                    })])
                }),
            )
            .with_instruction("Name your new dashboard")
            .with_icon(icons::TAG),
        )
    });

    Command::new(CREATE_DASHBOARD_KEY, GLOBAL_COMMAND_SCOPE, template)
}

fn share_feedback_command(collaborators: &Collaborators) -> Command {
    let collaborators = collaborators.clone();
    let template = ResultTemplate::new(icons::COMMENT, "Share Feedback")
        .with_synonyms(["send opinion", "ask question", "message posthog"])
        .executes(move || Some(feedback_flow(&collaborators)));

    Command::new(SHARE_FEEDBACK_KEY, GLOBAL_COMMAND_SCOPE, template)
}

fn feedback_flow(collaborators: &Collaborators) -> Flow {
    let collaborators = collaborators.clone();
    Flow::new(
        "Sharing Feedback",
        Resolver::dynamic(move |argument, _prefix| {
            let mut send = ResultTemplate::new(icons::SEND, "Send Message Directly to PostHog");
            if let Some(message) = argument.filter(|message| !message.is_empty()) {
                let analytics = collaborators.analytics.clone();
                let message = message.to_string();
                send = send.executes(move || {
                    analytics.capture("palette feedback", json!({ "message": message }));
                    Some(Flow::new(
                        "Sharing Feedback",
                        ResultTemplate::new(icons::CHECK, "Message Sent!").clears_input(),
                    ))
                });
            }

            let call_navigator = collaborators.navigator.clone();
            let mail_navigator = collaborators.navigator.clone();
            Ok(vec![
                send,
                ResultTemplate::new(icons::VIDEO_CAMERA, "Schedule Quick Call").executes(move || {
                    call_navigator.open_url(FEEDBACK_CALL_URL);
                    None
                }),
                ResultTemplate::new(icons::MAIL, "Email Core Team").executes(move || {
                    mail_navigator.open_url(FEEDBACK_EMAIL_URL);
                    None
                }),
            ])
        }),
    )
    .with_instruction("What's on your mind?")
    .with_icon(icons::COMMENT)
}

/// One "Go to Dashboard" result per known dashboard.
pub fn dashboards_command(collaborators: &Collaborators) -> Command {
    let templates: Vec<ResultTemplate> = collaborators
        .dashboards
        .dashboards()
        .into_iter()
        .map(|dashboard| {
            let navigator = collaborators.navigator.clone();
            let path = format!("/dashboard/{}", dashboard.id);
            ResultTemplate::new(icons::LINE_CHART, format!("Go to Dashboard {}", dashboard.name))
                .executes(move || {
                    navigator.push(&path, None, None);
                    None
                })
        })
        .collect();

    Command::new(CUSTOM_DASHBOARDS_KEY, GLOBAL_COMMAND_SCOPE, templates)
}

/// The command registered after a directory lookup finds someone.
pub fn person_command(
    collaborators: &Collaborators,
    input: &str,
    person: &PersonRecord,
) -> Option<Command> {
    let distinct_id = person.distinct_ids.first()?.clone();
    let navigator = collaborators.navigator.clone();
    let path = format!("/person/{distinct_id}");
    let template =
        ResultTemplate::new(icons::USER, format!("View person {input}")).executes(move || {
            navigator.push(&path, None, None);
            None
        });

    Some(Command::new(
        format!("person-{distinct_id}"),
        GLOBAL_COMMAND_SCOPE,
        vec![template],
    ))
}

pub fn is_url(text: &str) -> bool {
    let Some(rest) = text
        .strip_prefix("https://")
        .or_else(|| text.strip_prefix("http://"))
    else {
        return false;
    };
    !rest.is_empty() && !rest.chars().any(|ch| ch.is_whitespace() || ch == '"')
}

/// Plain decimals inside `[1e-6, 1e21)`, exponent form (`1e+21`, `1.5e-7`)
/// outside it.
fn format_number(value: f64) -> String {
    // Avoid printing "-0".
    if value == 0.0 {
        return "0".to_string();
    }
    let magnitude = value.abs();
    if (1e-6..1e21).contains(&magnitude) {
        return value.to_string();
    }
    let formatted = format!("{value:e}");
    match formatted.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{mantissa}e+{exponent}")
        }
        _ => formatted,
    }
}

#[cfg(test)]
mod tests {
    use super::{builtin_commands, format_number, is_url, BUILTIN_COMMAND_KEYS};
    use crate::collaborators::Collaborators;

    #[test]
    fn builtin_keys_match_commands() {
        let commands = builtin_commands(&Collaborators::default());
        let keys: Vec<&str> = commands.iter().map(|command| command.key.as_str()).collect();
        assert_eq!(keys, BUILTIN_COMMAND_KEYS);
    }

    #[test]
    fn recognizes_http_urls() {
        assert!(is_url("https://example.com/path?q=1"));
        assert!(is_url("http://localhost:8000"));
        assert!(!is_url("example.com"));
        assert!(!is_url("https://"));
        assert!(!is_url("https://exa mple.com"));
    }

    #[test]
    fn formats_numbers_like_the_display() {
        assert_eq!(format_number(7.0), "7");
        assert_eq!(format_number(0.5), "0.5");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(123_456_789.0), "123456789");
        assert_eq!(format_number(0.000001), "0.000001");
    }

    #[test]
    fn switches_to_exponent_form_at_the_extremes() {
        assert_eq!(format_number(1e21), "1e+21");
        assert_eq!(format_number(-2.5e30), "-2.5e+30");
        assert_eq!(format_number(1e-7), "1e-7");
        assert_eq!(format_number(1.5e-9), "1.5e-9");
        assert_eq!(format_number(999_999_999_999_999_900_000.0), "999999999999999900000");
    }
}
