use crate::registry::CommandRegistry;

/// The closed verb vocabulary. Names outside it resolve to `Custom` when
/// the registry knows them and `Unknown` otherwise, so dispatch is a plain
/// match instead of a string switch with an implicit default.
#[derive(Debug, Clone, PartialEq)]
pub enum Verb {
    Visit,
    Reload,
    Go,
    Get,
    Find,
    Contains,
    First,
    Last,
    Eq,
    Click,
    DblClick,
    Clear,
    Type,
    Check,
    Uncheck,
    Should,
    Wait,
    Request,
    Then,
    Within,
    Expect,
    Custom(String),
    Unknown(String),
}

/// Known names, used both for resolution and for misspelling suggestions.
const KNOWN_VERBS: &[(&str, Verb)] = &[
    ("visit", Verb::Visit),
    ("reload", Verb::Reload),
    ("go", Verb::Go),
    ("get", Verb::Get),
    ("find", Verb::Find),
    ("contains", Verb::Contains),
    ("first", Verb::First),
    ("last", Verb::Last),
    ("eq", Verb::Eq),
    ("click", Verb::Click),
    ("dblclick", Verb::DblClick),
    ("clear", Verb::Clear),
    ("type", Verb::Type),
    ("check", Verb::Check),
    ("uncheck", Verb::Uncheck),
    ("should", Verb::Should),
    ("wait", Verb::Wait),
    ("request", Verb::Request),
    ("then", Verb::Then),
    ("within", Verb::Within),
    ("expect", Verb::Expect),
];

impl Verb {
    pub fn resolve(name: &str, registry: &CommandRegistry) -> Verb {
        for (known, verb) in KNOWN_VERBS {
            if *known == name {
                return verb.clone();
            }
        }
        if registry.contains(name) {
            Verb::Custom(name.to_string())
        } else {
            Verb::Unknown(name.to_string())
        }
    }
}

/// Closest known verb by Jaro-Winkler similarity, for did-you-mean hints
/// on unknown verbs. Returns None when nothing is convincingly close.
pub fn suggest(name: &str) -> Option<String> {
    const THRESHOLD: f64 = 0.85;
    let mut best: Option<(&str, f64)> = None;
    for (known, _) in KNOWN_VERBS {
        let score = strsim::jaro_winkler(name, known);
        if score >= THRESHOLD && best.map_or(true, |(_, s)| score > s) {
            best = Some((known, score));
        }
    }
    best.map(|(known, _)| known.to_string())
}
