use argspec_spec_tables::ArgKind;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Decides whether an argument text is a valid value of a kind.
///
/// This is the validator's only view of value semantics. Implement it to
/// give [`ArgKind::Custom`] kinds meaning or to tighten the built-in ones.
pub trait KindCheck {
    /// Whether `text` is a valid value of `kind`.
    fn is_valid(&self, kind: &ArgKind, text: &str) -> bool;
}

impl<F> KindCheck for F
where
    F: Fn(&ArgKind, &str) -> bool,
{
    fn is_valid(&self, kind: &ArgKind, text: &str) -> bool {
        self(kind, text)
    }
}

/// Default predicates for the built-in kinds.
///
/// `Custom` kinds accept every value; register a predicate in a
/// [`KindRegistry`] to check them.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinKinds;

const TRUE_WORDS: &[&str] = &["true", "yes", "on", "1"];
const FALSE_WORDS: &[&str] = &["false", "no", "off", "0"];

impl KindCheck for BuiltinKinds {
    fn is_valid(&self, kind: &ArgKind, text: &str) -> bool {
        match kind {
            ArgKind::String | ArgKind::Custom { .. } => true,
            ArgKind::NonEmpty => !text.is_empty(),
            ArgKind::Int { range } => match text.parse::<i64>() {
                Ok(n) => range.is_none_or(|[min, max]| (min..=max).contains(&n)),
                Err(_) => false,
            },
            ArgKind::Float => text.parse::<f64>().is_ok_and(f64::is_finite),
            ArgKind::Bool => {
                let lower = text.to_ascii_lowercase();
                TRUE_WORDS.contains(&lower.as_str()) || FALSE_WORDS.contains(&lower.as_str())
            }
            ArgKind::Enum { values } => values.iter().any(|v| v == text),
            ArgKind::Path => !text.is_empty() && !text.contains('\0'),
        }
    }
}

type Predicate = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// Named predicates for [`ArgKind::Custom`] kinds, falling back to
/// [`BuiltinKinds`] for everything else.
///
/// ```
/// use argspec_core::{ArgKind, KindCheck, KindRegistry};
///
/// let kinds = KindRegistry::new().with("port", |s| s.parse::<u16>().is_ok());
/// let port = ArgKind::Custom { name: "port".into() };
/// assert!(kinds.is_valid(&port, "8080"));
/// assert!(!kinds.is_valid(&port, "http"));
/// ```
#[derive(Clone, Default)]
pub struct KindRegistry {
    custom: HashMap<String, Predicate>,
}

impl KindRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a predicate for the custom kind `name` (builder pattern).
    pub fn with(
        mut self,
        name: impl Into<String>,
        predicate: impl Fn(&str) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.register(name, predicate);
        self
    }

    /// Register a predicate for the custom kind `name`, replacing any
    /// previous one.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        predicate: impl Fn(&str) -> bool + Send + Sync + 'static,
    ) {
        self.custom.insert(name.into(), Arc::new(predicate));
    }

    /// Whether a predicate is registered for `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.custom.contains_key(name)
    }
}

impl fmt::Debug for KindRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.custom.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("KindRegistry")
            .field("custom", &names)
            .finish()
    }
}

impl KindCheck for KindRegistry {
    fn is_valid(&self, kind: &ArgKind, text: &str) -> bool {
        if let ArgKind::Custom { name } = kind
            && let Some(predicate) = self.custom.get(name)
        {
            return predicate(text);
        }
        BuiltinKinds.is_valid(kind, text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid(kind: &ArgKind, text: &str) -> bool {
        BuiltinKinds.is_valid(kind, text)
    }

    #[test]
    fn string_kinds() {
        assert!(valid(&ArgKind::String, ""));
        assert!(!valid(&ArgKind::NonEmpty, ""));
        assert!(valid(&ArgKind::NonEmpty, "bob"));
        assert!(valid(&ArgKind::Path, "out.log"));
        assert!(!valid(&ArgKind::Path, ""));
        assert!(!valid(&ArgKind::Path, "a\0b"));
    }

    #[test]
    fn numeric_kinds() {
        let int = ArgKind::Int { range: None };
        assert!(valid(&int, "-42"));
        assert!(!valid(&int, "4.2"));
        assert!(!valid(&int, "forty"));

        let ranged = ArgKind::Int {
            range: Some([1, 10]),
        };
        assert!(valid(&ranged, "1"));
        assert!(valid(&ranged, "10"));
        assert!(!valid(&ranged, "0"));
        assert!(!valid(&ranged, "11"));

        assert!(valid(&ArgKind::Float, "2.5e3"));
        assert!(!valid(&ArgKind::Float, "NaN"));
        assert!(!valid(&ArgKind::Float, "inf"));
    }

    #[test]
    fn bool_and_enum_kinds() {
        for word in ["true", "FALSE", "Yes", "off", "1", "0"] {
            assert!(valid(&ArgKind::Bool, word), "{word} should be a boolean");
        }
        assert!(!valid(&ArgKind::Bool, "maybe"));

        let color = ArgKind::Enum {
            values: vec!["auto".into(), "never".into()],
        };
        assert!(valid(&color, "auto"));
        assert!(!valid(&color, "Auto"));
    }

    #[test]
    fn custom_kinds_default_to_accept() {
        let host = ArgKind::Custom {
            name: "host".into(),
        };
        assert!(valid(&host, "anything"));
        let registry = KindRegistry::new().with("host", |s| s.contains('.'));
        assert!(registry.contains("host"));
        assert!(registry.is_valid(&host, "example.com"));
        assert!(!registry.is_valid(&host, "localhost"));
        // Non-custom kinds still use the built-ins.
        assert!(!registry.is_valid(&ArgKind::NonEmpty, ""));
    }

    #[test]
    fn closures_are_kind_checks() {
        let reject_all = |_: &ArgKind, _: &str| false;
        assert!(!reject_all.is_valid(&ArgKind::String, "x"));
    }

    #[test]
    fn registry_debug_lists_names() {
        let registry = KindRegistry::new().with("b", |_| true).with("a", |_| true);
        assert_eq!(
            format!("{registry:?}"),
            r#"KindRegistry { custom: ["a", "b"] }"#
        );
    }
}
