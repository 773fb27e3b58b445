//! Front-matter schemas for blog posts and problem writeups
//!
//! Validation walks every field and collects all broken rules before
//! failing, so an author sees the whole list at once.

use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use serde_yaml::{Mapping, Value};
use std::collections::BTreeMap;
use std::fmt;

use super::error::{FieldViolation, Rule, ValidationError};

pub const SLUG_PATTERN: &str = "^[a-z0-9-]+$";
pub const BIG_O_PATTERN: &str = r"^O\(.+\)$";
pub const ISO_DATE_PATTERN: &str = r"^\d{4}-\d{2}-\d{2}$";

pub const MAX_EXCERPT_CHARS: usize = 200;
pub const MAX_TAGS: usize = 3;

lazy_static! {
    static ref SLUG_RE: Regex = Regex::new(SLUG_PATTERN).unwrap();
    static ref BIG_O_RE: Regex = Regex::new(BIG_O_PATTERN).unwrap();
    static ref ISO_DATE_RE: Regex = Regex::new(ISO_DATE_PATTERN).unwrap();
}

const BLOG_FIELDS: &[&str] = &[
    "title",
    "slug",
    "datePublished",
    "excerpt",
    "updatedAt",
    "tags",
    "status",
];

const PROBLEM_FIELDS: &[&str] = &[
    "title",
    "slug",
    "source",
    "difficulty",
    "datePublished",
    "timeComplexity",
    "spaceComplexity",
    "excerpt",
];

/// Output fields of the API records; header keys with these names are dropped
const RESERVED_FIELDS: &[&str] = &["content", "filePath", "html", "permalink"];

/// Whether `slug` is a well-formed slug
pub fn is_valid_slug(slug: &str) -> bool {
    SLUG_RE.is_match(slug)
}

/// Declares a closed set of lowercase string values
macro_rules! string_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
        #[serde(rename_all = "lowercase")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALLOWED: &'static [&'static str] = &[$($text),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }

            fn parse(s: &str) -> Option<Self> {
                match s {
                    $($text => Some($name::$variant),)+
                    _ => None,
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

string_enum! {
    /// Publication state of a blog post
    Status { Draft => "draft", Published => "published" }
}

string_enum! {
    /// Where a problem comes from
    Source { Leetcode => "leetcode", Dsa => "dsa", Custom => "custom" }
}

string_enum! {
    Difficulty { Easy => "easy", Medium => "medium", Hard => "hard" }
}

/// Validated blog post front-matter
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogFrontmatter {
    pub title: String,
    pub slug: String,
    pub date_published: NaiveDate,
    pub excerpt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,

    /// Keys the schema does not know about
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Validated problem writeup front-matter
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemFrontmatter {
    pub title: String,
    pub slug: String,
    pub source: Source,
    pub difficulty: Difficulty,
    pub date_published: NaiveDate,
    pub time_complexity: String,
    pub space_complexity: String,
    pub excerpt: String,

    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Validate blog post front-matter
pub fn validate_blog(raw: &Mapping) -> Result<BlogFrontmatter, ValidationError> {
    let mut fields = FieldReader::new(raw);

    let title = fields.required_text("title");
    let slug = fields.slug();
    let date_published = fields.required_date("datePublished");
    let excerpt = fields.excerpt();
    let updated_at = fields.optional_date("updatedAt");
    let tags = fields.tags();
    let status = fields.optional_choice("status", Status::ALLOWED, Status::parse);
    let extra = fields.extra(BLOG_FIELDS);

    match (title, slug, date_published, excerpt) {
        (Some(title), Some(slug), Some(date_published), Some(excerpt)) if fields.is_clean() => {
            Ok(BlogFrontmatter {
                title,
                slug,
                date_published,
                excerpt,
                updated_at,
                tags,
                status,
                extra,
            })
        }
        _ => Err(fields.into_error()),
    }
}

/// Validate problem writeup front-matter
pub fn validate_problem(raw: &Mapping) -> Result<ProblemFrontmatter, ValidationError> {
    let mut fields = FieldReader::new(raw);

    let title = fields.required_text("title");
    let slug = fields.slug();
    let source = fields.required_choice("source", Source::ALLOWED, Source::parse);
    let difficulty = fields.required_choice("difficulty", Difficulty::ALLOWED, Difficulty::parse);
    let date_published = fields.required_date("datePublished");
    let time_complexity = fields.big_o("timeComplexity");
    let space_complexity = fields.big_o("spaceComplexity");
    let excerpt = fields.excerpt();
    let extra = fields.extra(PROBLEM_FIELDS);

    match (
        title,
        slug,
        source,
        difficulty,
        date_published,
        time_complexity,
        space_complexity,
        excerpt,
    ) {
        (
            Some(title),
            Some(slug),
            Some(source),
            Some(difficulty),
            Some(date_published),
            Some(time_complexity),
            Some(space_complexity),
            Some(excerpt),
        ) if fields.is_clean() => Ok(ProblemFrontmatter {
            title,
            slug,
            source,
            difficulty,
            date_published,
            time_complexity,
            space_complexity,
            excerpt,
            extra,
        }),
        _ => Err(fields.into_error()),
    }
}

/// Reads fields out of a raw mapping while recording violations
struct FieldReader<'a> {
    raw: &'a Mapping,
    violations: Vec<FieldViolation>,
}

impl<'a> FieldReader<'a> {
    fn new(raw: &'a Mapping) -> Self {
        Self {
            raw,
            violations: Vec::new(),
        }
    }

    fn violation(&mut self, field: &str, rule: Rule) {
        self.hinted_violation(field, rule, None);
    }

    fn hinted_violation(&mut self, field: &str, rule: Rule, hint: Option<String>) {
        self.violations.push(FieldViolation {
            field: field.to_string(),
            rule,
            hint,
        });
    }

    /// Look up a key, treating an explicit null as absent
    fn lookup(&self, field: &str) -> Option<&'a Value> {
        match self.raw.get(field) {
            None | Some(Value::Null) => None,
            Some(value) => Some(value),
        }
    }

    fn string(&mut self, field: &str, value: &Value) -> Option<String> {
        match value {
            Value::String(s) => Some(s.clone()),
            _ => {
                self.violation(field, Rule::ExpectedString);
                None
            }
        }
    }

    fn required_string(&mut self, field: &str) -> Option<String> {
        match self.lookup(field) {
            Some(value) => self.string(field, value),
            None => {
                self.violation(field, Rule::Required);
                None
            }
        }
    }

    fn required_text(&mut self, field: &str) -> Option<String> {
        let text = self.required_string(field)?;
        if text.trim().is_empty() {
            self.violation(field, Rule::Empty);
            return None;
        }
        Some(text)
    }

    fn slug(&mut self) -> Option<String> {
        let slug = self.required_text("slug")?;
        if !is_valid_slug(&slug) {
            let suggestion = slug::slugify(&slug);
            let hint = (!suggestion.is_empty()).then_some(suggestion);
            self.hinted_violation("slug", Rule::Pattern(SLUG_PATTERN), hint);
            return None;
        }
        Some(slug)
    }

    fn excerpt(&mut self) -> Option<String> {
        let excerpt = self.required_text("excerpt")?;
        let chars = excerpt.chars().count();
        if chars > MAX_EXCERPT_CHARS {
            self.violation(
                "excerpt",
                Rule::MaxChars {
                    max: MAX_EXCERPT_CHARS,
                    actual: chars,
                },
            );
            return None;
        }
        Some(excerpt)
    }

    fn big_o(&mut self, field: &str) -> Option<String> {
        let value = self.required_text(field)?;
        if !BIG_O_RE.is_match(&value) {
            self.violation(field, Rule::Pattern(BIG_O_PATTERN));
            return None;
        }
        Some(value)
    }

    fn date(&mut self, field: &str, value: &Value) -> Option<NaiveDate> {
        let text = self.string(field, value)?;
        if !ISO_DATE_RE.is_match(&text) {
            self.violation(field, Rule::Pattern(ISO_DATE_PATTERN));
            return None;
        }
        match NaiveDate::parse_from_str(&text, "%Y-%m-%d") {
            Ok(date) => Some(date),
            Err(_) => {
                self.violation(field, Rule::InvalidDate);
                None
            }
        }
    }

    fn required_date(&mut self, field: &str) -> Option<NaiveDate> {
        match self.lookup(field) {
            Some(value) => self.date(field, value),
            None => {
                self.violation(field, Rule::Required);
                None
            }
        }
    }

    fn optional_date(&mut self, field: &str) -> Option<NaiveDate> {
        let value = self.lookup(field)?;
        self.date(field, value)
    }

    fn choice<T>(
        &mut self,
        field: &str,
        value: &Value,
        allowed: &'static [&'static str],
        parse: fn(&str) -> Option<T>,
    ) -> Option<T> {
        let text = self.string(field, value)?;
        let parsed = parse(&text);
        if parsed.is_none() {
            self.violation(field, Rule::OneOf(allowed));
        }
        parsed
    }

    fn required_choice<T>(
        &mut self,
        field: &str,
        allowed: &'static [&'static str],
        parse: fn(&str) -> Option<T>,
    ) -> Option<T> {
        match self.lookup(field) {
            Some(value) => self.choice(field, value, allowed, parse),
            None => {
                self.violation(field, Rule::Required);
                None
            }
        }
    }

    fn optional_choice<T>(
        &mut self,
        field: &str,
        allowed: &'static [&'static str],
        parse: fn(&str) -> Option<T>,
    ) -> Option<T> {
        let value = self.lookup(field)?;
        self.choice(field, value, allowed, parse)
    }

    /// Tags may be written as a single string or a list of strings
    fn tags(&mut self) -> Option<Vec<String>> {
        let tags = match self.lookup("tags")? {
            Value::String(tag) => vec![tag.clone()],
            Value::Sequence(items) => {
                let mut tags = Vec::with_capacity(items.len());
                for item in items {
                    match item {
                        Value::String(tag) => tags.push(tag.clone()),
                        _ => {
                            self.violation("tags", Rule::ExpectedList);
                            return None;
                        }
                    }
                }
                tags
            }
            _ => {
                self.violation("tags", Rule::ExpectedList);
                return None;
            }
        };

        let mut valid = true;
        if tags.iter().any(|tag| tag.trim().is_empty()) {
            self.violation("tags", Rule::Empty);
            valid = false;
        }
        if tags.len() > MAX_TAGS {
            self.violation(
                "tags",
                Rule::MaxItems {
                    max: MAX_TAGS,
                    actual: tags.len(),
                },
            );
            valid = false;
        }
        valid.then_some(tags)
    }

    /// Collect keys outside the schema, keeping their values verbatim
    fn extra(&self, known: &[&str]) -> BTreeMap<String, Value> {
        self.raw
            .iter()
            .filter_map(|(key, value)| {
                let key = key.as_str()?;
                if RESERVED_FIELDS.contains(&key) {
                    tracing::debug!("Ignoring reserved front-matter key '{}'", key);
                    return None;
                }
                (!known.contains(&key)).then(|| (key.to_string(), value.clone()))
            })
            .collect()
    }

    fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }

    fn into_error(self) -> ValidationError {
        ValidationError {
            violations: self.violations,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapping(yaml: &str) -> Mapping {
        serde_yaml::from_str(yaml).unwrap()
    }

    fn problem_yaml() -> String {
        r#"
title: Two Sum
slug: two-sum
source: leetcode
difficulty: easy
datePublished: 2024-03-02
timeComplexity: O(n)
spaceComplexity: O(n)
excerpt: One pass with a hash map of complements.
"#
        .to_string()
    }

    fn blog_yaml() -> String {
        r#"
title: Hello World
slug: hello-world
datePublished: 2024-01-15
excerpt: First post.
"#
        .to_string()
    }

    fn with_field(yaml: &str, key: &str, value: &str) -> Mapping {
        let mut map = mapping(yaml);
        map.insert(
            Value::String(key.to_string()),
            Value::String(value.to_string()),
        );
        map
    }

    #[test]
    fn test_valid_problem() {
        let fm = validate_problem(&mapping(&problem_yaml())).unwrap();
        assert_eq!(fm.title, "Two Sum");
        assert_eq!(fm.slug, "two-sum");
        assert_eq!(fm.source, Source::Leetcode);
        assert_eq!(fm.difficulty, Difficulty::Easy);
        assert_eq!(fm.date_published, NaiveDate::from_ymd_opt(2024, 3, 2).unwrap());
        assert_eq!(fm.time_complexity, "O(n)");
        assert!(fm.extra.is_empty());
    }

    #[test]
    fn test_valid_blog_with_optionals() {
        let raw = mapping(
            r#"
title: Shipping a Rust CLI
slug: shipping-a-rust-cli
datePublished: 2024-06-01
updatedAt: 2024-06-10
excerpt: Notes from the release.
tags: [rust, cli]
status: published
cover: /img/cli.png
"#,
        );
        let fm = validate_blog(&raw).unwrap();
        assert_eq!(fm.tags, Some(vec!["rust".to_string(), "cli".to_string()]));
        assert_eq!(fm.updated_at, NaiveDate::from_ymd_opt(2024, 6, 10));
        assert_eq!(fm.status, Some(Status::Published));
        assert_eq!(
            fm.extra.get("cover").and_then(Value::as_str),
            Some("/img/cli.png")
        );
    }

    #[test]
    fn test_single_string_tag() {
        let fm = validate_blog(&with_field(&blog_yaml(), "tags", "notes")).unwrap();
        assert_eq!(fm.tags, Some(vec!["notes".to_string()]));
    }

    #[test]
    fn test_header_round_trips_through_serialization() {
        let raw = mapping(
            r#"
title: Valid Anagram
slug: valid-anagram
source: leetcode
difficulty: easy
datePublished: 2023-12-31
timeComplexity: O(n)
spaceComplexity: O(1)
excerpt: Count letters in a fixed array.
"#,
        );
        let fm = validate_problem(&raw).unwrap();
        let back = serde_yaml::to_value(&fm).unwrap();
        let back = back.as_mapping().unwrap();

        assert_eq!(back.len(), raw.len());
        for (key, value) in &raw {
            assert_eq!(back.get(key), Some(value), "field {:?} changed", key);
        }
    }

    #[test]
    fn test_missing_fields_are_all_reported() {
        let err = validate_problem(&mapping("title: Only a title\n")).unwrap_err();
        for field in [
            "slug",
            "source",
            "difficulty",
            "datePublished",
            "timeComplexity",
            "spaceComplexity",
            "excerpt",
        ] {
            assert_eq!(err.rules_for(field), vec![&Rule::Required], "{}", field);
        }
        assert!(!err.has_field("title"));
    }

    #[test]
    fn test_missing_excerpt_fails() {
        let mut raw = mapping(&problem_yaml());
        raw.remove("excerpt");
        let err = validate_problem(&raw).unwrap_err();
        assert_eq!(err.violations.len(), 1);
        assert_eq!(err.rules_for("excerpt"), vec![&Rule::Required]);
    }

    #[test]
    fn test_excerpt_length_bound() {
        let exact = "a".repeat(200);
        assert!(validate_blog(&with_field(&blog_yaml(), "excerpt", &exact)).is_ok());

        let long = "a".repeat(201);
        let err = validate_blog(&with_field(&blog_yaml(), "excerpt", &long)).unwrap_err();
        assert_eq!(
            err.rules_for("excerpt"),
            vec![&Rule::MaxChars {
                max: 200,
                actual: 201
            }]
        );
    }

    #[test]
    fn test_excerpt_counts_characters_not_bytes() {
        let accented = "é".repeat(200);
        assert!(validate_blog(&with_field(&blog_yaml(), "excerpt", &accented)).is_ok());
    }

    #[test]
    fn test_slug_pattern() {
        assert!(validate_blog(&with_field(&blog_yaml(), "slug", "two-sum-ii")).is_ok());

        for bad in ["Two-Sum", "two_sum", "two sum"] {
            let err = validate_blog(&with_field(&blog_yaml(), "slug", bad)).unwrap_err();
            assert_eq!(
                err.rules_for("slug"),
                vec![&Rule::Pattern(SLUG_PATTERN)],
                "{}",
                bad
            );
        }
    }

    #[test]
    fn test_slug_violation_suggests_slugified_value() {
        let err = validate_blog(&with_field(&blog_yaml(), "slug", "Two_Sum")).unwrap_err();
        assert_eq!(err.violations[0].hint.as_deref(), Some("two-sum"));
    }

    #[test]
    fn test_big_o_pattern() {
        let raw = with_field(&problem_yaml(), "timeComplexity", "O(n log n)");
        assert!(validate_problem(&raw).is_ok());

        let raw = with_field(&problem_yaml(), "spaceComplexity", "linear");
        let err = validate_problem(&raw).unwrap_err();
        assert_eq!(
            err.rules_for("spaceComplexity"),
            vec![&Rule::Pattern(BIG_O_PATTERN)]
        );

        let raw = with_field(&problem_yaml(), "timeComplexity", " O(n) ");
        let err = validate_problem(&raw).unwrap_err();
        assert_eq!(
            err.rules_for("timeComplexity"),
            vec![&Rule::Pattern(BIG_O_PATTERN)]
        );
    }

    #[test]
    fn test_reserved_keys_stay_out_of_extra() {
        let mut raw = with_field(&blog_yaml(), "html", "<p>sneaky</p>");
        for key in ["content", "permalink", "filePath"] {
            raw.insert(Value::String(key.to_string()), Value::String("x".to_string()));
        }
        raw.insert(
            Value::String("series".to_string()),
            Value::String("rust".to_string()),
        );

        let fm = validate_blog(&raw).unwrap();
        assert_eq!(fm.extra.keys().collect::<Vec<_>>(), vec!["series"]);
    }

    #[test]
    fn test_enum_membership() {
        let mut raw = with_field(&problem_yaml(), "source", "hackerrank");
        raw.insert(
            Value::String("difficulty".to_string()),
            Value::String("Easy".to_string()),
        );
        let err = validate_problem(&raw).unwrap_err();
        assert_eq!(err.rules_for("source"), vec![&Rule::OneOf(Source::ALLOWED)]);
        assert_eq!(
            err.rules_for("difficulty"),
            vec![&Rule::OneOf(Difficulty::ALLOWED)]
        );
    }

    #[test]
    fn test_dates_must_be_iso_calendar_dates() {
        let err = validate_blog(&with_field(&blog_yaml(), "datePublished", "15/01/2024"))
            .unwrap_err();
        assert_eq!(
            err.rules_for("datePublished"),
            vec![&Rule::Pattern(ISO_DATE_PATTERN)]
        );

        let err = validate_blog(&with_field(&blog_yaml(), "updatedAt", "2024-02-30")).unwrap_err();
        assert_eq!(err.rules_for("updatedAt"), vec![&Rule::InvalidDate]);
    }

    #[test]
    fn test_updated_at_may_precede_date_published() {
        let fm = validate_blog(&with_field(&blog_yaml(), "updatedAt", "2020-01-01")).unwrap();
        assert_eq!(fm.updated_at, NaiveDate::from_ymd_opt(2020, 1, 1));
    }

    #[test]
    fn test_tag_bounds() {
        let mut raw = mapping(&blog_yaml());
        raw.insert(
            Value::String("tags".to_string()),
            serde_yaml::from_str("[a, b, c, d]").unwrap(),
        );
        let err = validate_blog(&raw).unwrap_err();
        assert_eq!(
            err.rules_for("tags"),
            vec![&Rule::MaxItems { max: 3, actual: 4 }]
        );

        raw.insert(
            Value::String("tags".to_string()),
            serde_yaml::from_str("[rust, '']").unwrap(),
        );
        let err = validate_blog(&raw).unwrap_err();
        assert_eq!(err.rules_for("tags"), vec![&Rule::Empty]);
    }

    #[test]
    fn test_non_string_values_are_rejected() {
        let raw = mapping(
            r#"
title: 2024
slug: year-in-review
datePublished: 2024-12-31
excerpt: ""
status: hidden
"#,
        );
        let err = validate_blog(&raw).unwrap_err();
        assert_eq!(err.rules_for("title"), vec![&Rule::ExpectedString]);
        assert_eq!(err.rules_for("excerpt"), vec![&Rule::Empty]);
        assert_eq!(err.rules_for("status"), vec![&Rule::OneOf(Status::ALLOWED)]);
    }
}
