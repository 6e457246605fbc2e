//! Fixture data: unique names, emails and descriptions, plus the entries
//! every Tackle install ships with.

use rand::seq::SliceRandom;
use rand::Rng;

/// Tag types present on a fresh install, with their tags
pub const DEFAULT_TAGS: &[(&str, &[&str])] = &[
    ("Application Type", &["COTS", "In house", "SaaS"]),
    ("Data Center", &["Boston (USA)", "London (UK)", "Paris (FR)", "Sydney (AU)"]),
    ("Database", &["DB2", "MongoDB", "Oracle", "PostgreSQL", "SQL Server"]),
    ("Language", &["C#", "C++", "COBOL", "Go", "Java", "Javascript", "Python"]),
    ("Operating System", &["RHEL 8", "Windows Server 2016", "Z/OS"]),
    ("Runtime", &["EAP", "JWS", "Quarkus", "Spring Boot", "Tomcat"]),
];

/// Default tag type names, never deleted by cleanup
pub const DEFAULT_TAG_TYPES: &[&str] = &[
    "Application Type",
    "Data Center",
    "Database",
    "Language",
    "Operating System",
    "Runtime",
];

/// Whether `tag` is one of the tags shipped under `tag_type`
#[must_use]
pub fn is_default_tag(tag_type: &str, tag: &str) -> bool {
    DEFAULT_TAGS
        .iter()
        .any(|(t, tags)| *t == tag_type && tags.contains(&tag))
}

const WORDS: &[&str] = &[
    "amber", "basil", "cedar", "delta", "ember", "fjord", "garnet", "harbor", "indigo", "juniper",
    "kestrel", "lumen", "maple", "nimbus", "onyx", "pylon", "quartz", "raven", "sierra", "tundra",
    "umber", "vertex", "willow", "xenon", "yonder", "zephyr",
];

const FIRST_NAMES: &[&str] = &[
    "Alex", "Blair", "Casey", "Devon", "Emery", "Finley", "Harper", "Jordan", "Morgan", "Quinn",
    "Riley", "Sage",
];

const LAST_NAMES: &[&str] = &[
    "Archer", "Brooks", "Carver", "Dalton", "Ellis", "Foster", "Hayes", "Lane", "Mercer", "Porter",
];

const JOB_FUNCTIONS: &[&str] = &[
    "Architect", "Business analyst", "Consultant", "Developer", "Manager", "Operations",
];

const COLORS: &[&str] = &["Blue", "Cyan", "Green", "Orange", "Purple", "Red"];

fn pick(items: &'static [&'static str]) -> &'static str {
    items.choose(&mut rand::thread_rng()).copied().unwrap_or("item")
}

fn suffix() -> String {
    let id = uuid::Uuid::new_v4().simple().to_string();
    id[..8].to_string()
}

/// Random lowercase word
#[must_use]
pub fn random_word() -> String {
    pick(WORDS).to_string()
}

/// Unique entity name with a readable prefix, e.g. `service-maple-1a2b3c4d`
#[must_use]
pub fn unique_name(prefix: &str) -> String {
    format!("{prefix}-{}-{}", random_word(), suffix())
}

/// Unique person name
#[must_use]
pub fn person_name() -> String {
    format!("{} {} {}", pick(FIRST_NAMES), pick(LAST_NAMES), suffix())
}

/// Unique email address
#[must_use]
pub fn email() -> String {
    format!(
        "{}.{}@{}.example.com",
        pick(FIRST_NAMES).to_lowercase(),
        suffix(),
        random_word()
    )
}

/// A sentence of `words` random words
#[must_use]
pub fn sentence(words: usize) -> String {
    let words: Vec<&str> = (0..words.max(1)).map(|_| pick(WORDS)).collect();
    let mut text = words.join(" ");
    if let Some(first) = text.get_mut(0..1) {
        first.make_ascii_uppercase();
    }
    text.push('.');
    text
}

/// Description text tagged with a unique suffix
#[must_use]
pub fn description() -> String {
    format!("{} {}", sentence(4), suffix())
}

/// Random job function title
#[must_use]
pub fn job_title() -> String {
    format!("{} {}", pick(JOB_FUNCTIONS), suffix())
}

/// Rank between 1 and 1000
#[must_use]
pub fn rank() -> u32 {
    rand::thread_rng().gen_range(1..=1000)
}

/// One of the tag type colors
#[must_use]
pub fn color() -> &'static str {
    pick(COLORS)
}

/// Host name for proxy fixtures
#[must_use]
pub fn host() -> String {
    format!("{}.{}.example.com", random_word(), suffix())
}

/// Port for proxy fixtures
#[must_use]
pub fn port() -> u16 {
    rand::thread_rng().gen_range(1024..=65535)
}

/// A string guaranteed not to occur in any other generated value
#[must_use]
pub fn non_matching() -> String {
    format!("zz{}qq", uuid::Uuid::new_v4().simple())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_names_are_unique() {
        let names: HashSet<String> = (0..200).map(|_| unique_name("app")).collect();
        assert_eq!(names.len(), 200);
        assert!(names.iter().all(|n| n.starts_with("app-")));
    }

    #[test]
    fn test_email_shape() {
        let email = email();
        assert_eq!(email.matches('@').count(), 1);
        assert!(email.ends_with(".example.com"));
    }

    #[test]
    fn test_sentence_is_capitalized() {
        let s = sentence(3);
        assert!(s.chars().next().unwrap().is_ascii_uppercase());
        assert!(s.ends_with('.'));
        assert_eq!(s.split_whitespace().count(), 3);
    }

    #[test]
    fn test_default_tag_types_match_tags() {
        let names: Vec<&str> = DEFAULT_TAGS.iter().map(|(name, _)| *name).collect();
        assert_eq!(names, DEFAULT_TAG_TYPES);
        assert!(is_default_tag("Language", "Java"));
        assert!(!is_default_tag("Language", "Cobra"));
    }

    #[test]
    fn test_ranges() {
        for _ in 0..100 {
            assert!((1..=1000).contains(&rank()));
            assert!(port() >= 1024);
        }
    }
}
