//! Matchers: the predicate half of an eventually/consistently assertion.
//!
//! A matcher decides whether an observed value is acceptable and can explain
//! itself when it is not. Built-ins cover what platform checks need: equality,
//! substring, regular expression (log scanning), negation and composition.
//! Arbitrary closures are wrapped with [`predicate`].

use std::fmt::Debug;

use regex::Regex;

/// A predicate over observed values.
pub trait Matcher<T: ?Sized> {
    /// Check if the value matches.
    fn matches(&self, value: &T) -> bool;

    /// Describe what this matcher expects.
    fn describe(&self) -> String;

    /// Describe why a value didn't match.
    fn describe_mismatch(&self, value: &T) -> String;
}

impl<T: ?Sized, M: Matcher<T> + ?Sized> Matcher<T> for &M {
    fn matches(&self, value: &T) -> bool {
        (**self).matches(value)
    }

    fn describe(&self) -> String {
        (**self).describe()
    }

    fn describe_mismatch(&self, value: &T) -> String {
        (**self).describe_mismatch(value)
    }
}

impl<T: ?Sized, M: Matcher<T> + ?Sized> Matcher<T> for Box<M> {
    fn matches(&self, value: &T) -> bool {
        (**self).matches(value)
    }

    fn describe(&self) -> String {
        (**self).describe()
    }

    fn describe_mismatch(&self, value: &T) -> String {
        (**self).describe_mismatch(value)
    }
}

// ── Equality ─────────────────────────────────────────────────────────────────

/// Matches values equal to `expected`.
pub fn eq<T: PartialEq + Debug>(expected: T) -> EqMatcher<T> {
    EqMatcher { expected }
}

pub struct EqMatcher<T> {
    expected: T,
}

impl<T: PartialEq + Debug> Matcher<T> for EqMatcher<T> {
    fn matches(&self, value: &T) -> bool {
        value == &self.expected
    }

    fn describe(&self) -> String {
        format!("equals {:?}", self.expected)
    }

    fn describe_mismatch(&self, value: &T) -> String {
        format!("{value:?} does not equal {:?}", self.expected)
    }
}

// ── Text ─────────────────────────────────────────────────────────────────────

/// Matches text containing `needle`.
pub fn contains_substring(needle: impl Into<String>) -> ContainsSubstring {
    ContainsSubstring {
        needle: needle.into(),
    }
}

pub struct ContainsSubstring {
    needle: String,
}

impl<S: AsRef<str> + ?Sized> Matcher<S> for ContainsSubstring {
    fn matches(&self, value: &S) -> bool {
        value.as_ref().contains(&self.needle)
    }

    fn describe(&self) -> String {
        format!("contains {:?}", self.needle)
    }

    fn describe_mismatch(&self, value: &S) -> String {
        format!("{:?} does not contain {:?}", value.as_ref(), self.needle)
    }
}

/// Matches text in which `pattern` finds a match anywhere.
///
/// # Errors
///
/// Returns an error if `pattern` is not a valid regular expression.
pub fn matches_regex(pattern: &str) -> Result<RegexMatcher, regex::Error> {
    Ok(RegexMatcher {
        regex: Regex::new(pattern)?,
    })
}

pub struct RegexMatcher {
    regex: Regex,
}

impl<S: AsRef<str> + ?Sized> Matcher<S> for RegexMatcher {
    fn matches(&self, value: &S) -> bool {
        self.regex.is_match(value.as_ref())
    }

    fn describe(&self) -> String {
        format!("matches /{}/", self.regex.as_str())
    }

    fn describe_mismatch(&self, value: &S) -> String {
        let text = value.as_ref();
        // Logs can be long; the tail is where the interesting line usually is.
        let tail: String = text
            .chars()
            .rev()
            .take(200)
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect();
        let shown = if tail.len() < text.len() {
            format!("...{tail}")
        } else {
            tail
        };
        format!("{shown:?} has no match for /{}/", self.regex.as_str())
    }
}

// ── Closures ─────────────────────────────────────────────────────────────────

/// Wrap a closure as a matcher with a fixed description.
pub fn predicate<T: ?Sized, F>(description: impl Into<String>, f: F) -> PredicateMatcher<F>
where
    F: Fn(&T) -> bool,
{
    PredicateMatcher {
        description: description.into(),
        f,
    }
}

pub struct PredicateMatcher<F> {
    description: String,
    f: F,
}

impl<T: Debug + ?Sized, F: Fn(&T) -> bool> Matcher<T> for PredicateMatcher<F> {
    fn matches(&self, value: &T) -> bool {
        (self.f)(value)
    }

    fn describe(&self) -> String {
        self.description.clone()
    }

    fn describe_mismatch(&self, value: &T) -> String {
        format!("{value:?} does not satisfy: {}", self.description)
    }
}

// ── Combinators ──────────────────────────────────────────────────────────────

/// Invert a matcher.
pub fn not<M>(inner: M) -> NotMatcher<M> {
    NotMatcher { inner }
}

pub struct NotMatcher<M> {
    inner: M,
}

impl<T: Debug + ?Sized, M: Matcher<T>> Matcher<T> for NotMatcher<M> {
    fn matches(&self, value: &T) -> bool {
        !self.inner.matches(value)
    }

    fn describe(&self) -> String {
        format!("not ({})", self.inner.describe())
    }

    fn describe_mismatch(&self, value: &T) -> String {
        format!("{value:?} unexpectedly {}", self.inner.describe())
    }
}

/// Matches only if every inner matcher matches.
pub fn all_of<T: ?Sized>(matchers: Vec<Box<dyn Matcher<T>>>) -> AllOf<T> {
    AllOf { matchers }
}

pub struct AllOf<T: ?Sized> {
    matchers: Vec<Box<dyn Matcher<T>>>,
}

impl<T: ?Sized> Matcher<T> for AllOf<T> {
    fn matches(&self, value: &T) -> bool {
        self.matchers.iter().all(|m| m.matches(value))
    }

    fn describe(&self) -> String {
        join_descriptions(&self.matchers, " and ")
    }

    fn describe_mismatch(&self, value: &T) -> String {
        self.matchers
            .iter()
            .find(|m| !m.matches(value))
            .map_or_else(String::new, |m| m.describe_mismatch(value))
    }
}

/// Matches if at least one inner matcher matches.
pub fn any_of<T: ?Sized>(matchers: Vec<Box<dyn Matcher<T>>>) -> AnyOf<T> {
    AnyOf { matchers }
}

pub struct AnyOf<T: ?Sized> {
    matchers: Vec<Box<dyn Matcher<T>>>,
}

impl<T: ?Sized> Matcher<T> for AnyOf<T> {
    fn matches(&self, value: &T) -> bool {
        self.matchers.iter().any(|m| m.matches(value))
    }

    fn describe(&self) -> String {
        join_descriptions(&self.matchers, " or ")
    }

    fn describe_mismatch(&self, value: &T) -> String {
        let reasons: Vec<String> = self
            .matchers
            .iter()
            .map(|m| m.describe_mismatch(value))
            .collect();
        reasons.join("; ")
    }
}

fn join_descriptions<T: ?Sized>(matchers: &[Box<dyn Matcher<T>>], sep: &str) -> String {
    let parts: Vec<String> = matchers.iter().map(|m| m.describe()).collect();
    parts.join(sep)
}

// ── Unit tests ───────────────────────────────────────────────────────────────
