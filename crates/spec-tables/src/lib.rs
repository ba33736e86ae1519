//! Command specification tables.
//!
//! Defines the data structures describing a command's grammar: its options
//! (with aliases and argument arity), the positional arguments it expects,
//! and the argument kinds used to check values. Tables are deserialized
//! from JSON or JSONC and consumed by the resolver and the validator.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;
use thiserror::Error;

/// Current format version for the command table JSON schema.
pub const TABLE_FORMAT_VERSION: &str = "0.1.0";

/// Errors that can occur when loading command tables.
#[derive(Debug, Error)]
pub enum TablesError {
    /// JSON deserialization failed.
    #[error("invalid command tables JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// A command definition is structurally invalid.
    #[error("invalid command '{command}': {reason}")]
    InvalidCommand {
        /// Name of the offending command (may be empty).
        command: String,
        /// A human-readable explanation of the problem.
        reason: String,
    },
}

/// Top-level container for all known command specs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandTables {
    /// Table format version for compatibility checks.
    #[serde(default = "default_format_version")]
    pub format_version: String,
    /// All known commands, in declaration order.
    pub commands: Vec<CommandSpec>,

    /// Cached map from command name → index of its first declaration.
    #[serde(skip)]
    name_index: OnceLock<HashMap<String, usize>>,
}

fn default_format_version() -> String {
    TABLE_FORMAT_VERSION.to_string()
}

impl CommandTables {
    /// Create tables from a list of commands. The name index is built lazily.
    pub fn new(commands: Vec<CommandSpec>) -> Self {
        Self {
            format_version: default_format_version(),
            commands,
            name_index: OnceLock::new(),
        }
    }

    fn name_index(&self) -> &HashMap<String, usize> {
        self.name_index.get_or_init(|| {
            let mut m = HashMap::new();
            for (i, c) in self.commands.iter().enumerate() {
                // First declaration wins, same as a linear scan.
                m.entry(c.name.clone()).or_insert(i);
            }
            m
        })
    }

    /// Look up the first command declared with exactly `name`.
    pub fn command(&self, name: &str) -> Option<&CommandSpec> {
        self.name_index().get(name).map(|&i| &self.commands[i])
    }
}

impl PartialEq for CommandTables {
    fn eq(&self, other: &Self) -> bool {
        self.format_version == other.format_version && self.commands == other.commands
    }
}

/// Identity of an option within its command: its index in
/// [`CommandSpec::options`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OptionId(pub usize);

/// The grammar of one named command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandSpec {
    /// Command name as typed (e.g., `"grep"`).
    pub name: String,
    /// Declared options, in order. An option's index is its [`OptionId`].
    #[serde(default)]
    pub options: Vec<OptionSpec>,
    /// Positional arguments, by position.
    #[serde(default)]
    pub positional: Vec<PositionalSpec>,
    /// Short description of the command.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
}

impl CommandSpec {
    /// Create a command with no options and no positional arguments.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            options: Vec::new(),
            positional: Vec::new(),
            doc: None,
        }
    }

    /// Append an option (builder pattern).
    pub fn with_option(mut self, option: OptionSpec) -> Self {
        self.options.push(option);
        self
    }

    /// Append a positional argument (builder pattern).
    pub fn with_positional(mut self, positional: PositionalSpec) -> Self {
        self.positional.push(positional);
        self
    }

    /// The option with the given identity.
    pub fn option(&self, id: OptionId) -> Option<&OptionSpec> {
        self.options.get(id.0)
    }

    /// The option one of whose aliases is exactly `alias`.
    pub fn option_by_alias(&self, alias: &str) -> Option<(OptionId, &OptionSpec)> {
        self.options
            .iter()
            .enumerate()
            .find(|(_, o)| o.aliases.iter().any(|a| a == alias))
            .map(|(i, o)| (OptionId(i), o))
    }

    /// The positional descriptor at `index`, if the command declares one.
    pub fn positional_at(&self, index: usize) -> Option<&PositionalSpec> {
        self.positional.get(index)
    }

    /// Check structural invariants of this command.
    pub fn check(&self) -> Result<(), TablesError> {
        let invalid = |reason: String| TablesError::InvalidCommand {
            command: self.name.clone(),
            reason,
        };
        if self.name.trim().is_empty() {
            return Err(invalid("command name must not be empty".into()));
        }
        let mut seen: HashSet<&str> = HashSet::new();
        for (i, option) in self.options.iter().enumerate() {
            if option.aliases.is_empty() {
                return Err(invalid(format!("option #{i} declares no aliases")));
            }
            for alias in &option.aliases {
                if alias.is_empty() {
                    return Err(invalid(format!("option #{i} has an empty alias")));
                }
                if !seen.insert(alias) {
                    return Err(invalid(format!("alias '{alias}' is declared twice")));
                }
            }
            if let Some(arg) = &option.argument {
                arg.kind
                    .check()
                    .map_err(|r| invalid(format!("option '{}': {r}", option.canonical())))?;
            }
        }
        for p in &self.positional {
            p.kind
                .check()
                .map_err(|r| invalid(format!("argument '{}': {r}", p.name)))?;
        }
        Ok(())
    }
}

/// A named switch, possibly spelled several ways.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionSpec {
    /// All spellings of this option (e.g., `["-n", "--name"]`).
    pub aliases: Vec<String>,
    /// Values the option consumes. `None` means a bare flag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub argument: Option<OptionArgument>,
    /// Short description of the option.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
}

impl OptionSpec {
    /// A bare flag with the given aliases.
    pub fn flag<I, S>(aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            aliases: aliases.into_iter().map(Into::into).collect(),
            argument: None,
            doc: None,
        }
    }

    /// An option consuming `count` values of `kind`.
    pub fn with_values<I, S>(aliases: I, count: u32, kind: ArgKind) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            argument: Some(OptionArgument { count, kind }),
            ..Self::flag(aliases)
        }
    }

    /// Number of values this option consumes (0 for a bare flag).
    pub fn arity(&self) -> u32 {
        self.argument.as_ref().map_or(0, |a| a.count)
    }

    /// Kind of the values this option consumes.
    pub fn kind(&self) -> Option<&ArgKind> {
        self.argument.as_ref().map(|a| &a.kind)
    }

    /// The spelling used when reporting on this option: the longest alias.
    pub fn canonical(&self) -> &str {
        self.aliases
            .iter()
            .max_by_key(|a| a.len())
            .map(String::as_str)
            .unwrap_or_default()
    }
}

/// Arity and value kind of an option's arguments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionArgument {
    /// Number of values consumed. `0` declares a slot that takes no values.
    pub count: u32,
    /// Kind every value is checked against.
    pub kind: ArgKind,
}

/// Descriptor of one positional argument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionalSpec {
    /// Human-readable name (e.g., `"pattern"`).
    pub name: String,
    /// Kind the value is checked against.
    pub kind: ArgKind,
    /// Short description of the argument.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
}

impl PositionalSpec {
    /// Create a positional argument descriptor.
    pub fn new(name: impl Into<String>, kind: ArgKind) -> Self {
        Self {
            name: name.into(),
            kind,
            doc: None,
        }
    }
}

/// The kind of value an argument slot accepts.
///
/// This is data only; whether a given text is valid for a kind is decided
/// by the validator's kind predicate, so callers may substitute their own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ArgKind {
    /// Any text, including empty.
    String,
    /// Any non-empty text.
    NonEmpty,
    /// A signed integer, optionally within an inclusive range.
    Int {
        /// Inclusive `[min, max]` bounds.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        range: Option<[i64; 2]>,
    },
    /// A finite floating-point number.
    Float,
    /// A boolean spelling (`true`/`false`, `yes`/`no`, `on`/`off`, `1`/`0`).
    Bool,
    /// One of a fixed set of values.
    Enum {
        /// Allowed values, matched exactly.
        values: Vec<String>,
    },
    /// A filesystem path. Not checked for existence.
    Path,
    /// A kind whose predicate is supplied by the caller, looked up by name.
    Custom {
        /// Registry key of the predicate.
        name: String,
    },
}

impl ArgKind {
    /// Short human-readable description, used in diagnostics.
    pub fn describe(&self) -> String {
        match self {
            ArgKind::String => "a string".into(),
            ArgKind::NonEmpty => "a non-empty string".into(),
            ArgKind::Int { range: None } => "an integer".into(),
            ArgKind::Int {
                range: Some([min, max]),
            } => format!("an integer in {min}..={max}"),
            ArgKind::Float => "a number".into(),
            ArgKind::Bool => "a boolean".into(),
            ArgKind::Enum { values } => format!("one of {}", values.join("|")),
            ArgKind::Path => "a path".into(),
            ArgKind::Custom { name } => format!("a {name}"),
        }
    }

    fn check(&self) -> Result<(), String> {
        match self {
            ArgKind::Int {
                range: Some([min, max]),
            } if min > max => Err(format!("int range {min}..={max} is empty")),
            ArgKind::Enum { values } if values.is_empty() => {
                Err("enum kind declares no values".into())
            }
            ArgKind::Custom { name } if name.is_empty() => {
                Err("custom kind has an empty name".into())
            }
            _ => Ok(()),
        }
    }
}

impl std::fmt::Display for ArgKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.describe())
    }
}

/// Load and check command tables from JSON or JSONC text.
pub fn load_tables_from_str(s: &str) -> Result<CommandTables, TablesError> {
    let normalized = argspec_jsonc_strip::normalize_jsonc(s);
    let tables: CommandTables = serde_json::from_str(&normalized)?;
    for command in &tables.commands {
        command.check()?;
    }
    Ok(tables)
}

#[cfg(test)]
mod tests {
    use super::*;

    const GREP: &str = r#"
    {
      // minimal table
      "commands": [
        {
          "name": "grep",
          "options": [
            { "aliases": ["-n", "--name"], "argument": { "count": 1, "kind": { "type": "nonEmpty" } } },
            { "aliases": ["-v"] },
          ],
          "positional": [
            { "name": "pattern", "kind": { "type": "string" } },
            { "name": "file", "kind": { "type": "path" } }
          ]
        }
      ]
    }
    "#;

    #[test]
    fn load_jsonc_table() {
        let tables = load_tables_from_str(GREP).expect("valid tables");
        assert_eq!(tables.format_version, TABLE_FORMAT_VERSION);
        let grep = tables.command("grep").expect("grep present");
        assert_eq!(grep.options.len(), 2);
        assert_eq!(grep.options[0].arity(), 1);
        assert_eq!(grep.options[1].arity(), 0);
        assert_eq!(grep.options[0].kind(), Some(&ArgKind::NonEmpty));
        assert_eq!(
            grep.positional_at(1).map(|p| p.kind.clone()),
            Some(ArgKind::Path)
        );
        assert!(grep.positional_at(2).is_none());
    }

    #[test]
    fn first_declaration_wins() {
        let tables = CommandTables::new(vec![
            CommandSpec::new("ls").with_option(OptionSpec::flag(["-a"])),
            CommandSpec::new("ls"),
        ]);
        assert_eq!(tables.command("ls").unwrap().options.len(), 1);
        assert!(tables.command("cat").is_none());
    }

    #[test]
    fn option_by_alias_and_canonical() {
        let cmd = CommandSpec::new("cmd")
            .with_option(OptionSpec::flag(["-v"]))
            .with_option(OptionSpec::with_values(
                ["-n", "--name"],
                1,
                ArgKind::String,
            ));
        let (id, opt) = cmd.option_by_alias("--name").unwrap();
        assert_eq!(id, OptionId(1));
        assert_eq!(opt.canonical(), "--name");
        assert!(cmd.option_by_alias("-x").is_none());
    }

    #[test]
    fn kind_tags_deserialize() {
        let k: ArgKind =
            serde_json::from_str(r#"{"type":"int","range":[1,10]}"#).expect("int kind");
        assert_eq!(
            k,
            ArgKind::Int {
                range: Some([1, 10]),
            }
        );
        let k: ArgKind =
            serde_json::from_str(r#"{"type":"enum","values":["a","b"]}"#).expect("enum kind");
        assert_eq!(k.describe(), "one of a|b");
        let k: ArgKind = serde_json::from_str(r#"{"type":"custom","name":"host"}"#).unwrap();
        assert_eq!(
            k,
            ArgKind::Custom {
                name: "host".into(),
            }
        );
    }

    #[test]
    fn duplicate_alias_rejected() {
        let err = load_tables_from_str(
            r#"{"commands":[{"name":"x","options":[{"aliases":["-a"]},{"aliases":["-a","--all"]}]}]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, TablesError::InvalidCommand { .. }));
        assert!(err.to_string().contains("'-a' is declared twice"), "{err}");
    }

    #[test]
    fn option_without_aliases_rejected() {
        let err = load_tables_from_str(r#"{"commands":[{"name":"x","options":[{"aliases":[]}]}]}"#)
            .unwrap_err();
        assert!(err.to_string().contains("declares no aliases"), "{err}");
    }

    #[test]
    fn empty_command_name_rejected() {
        let err = load_tables_from_str(r#"{"commands":[{"name":"  "}]}"#).unwrap_err();
        assert!(err.to_string().contains("must not be empty"), "{err}");
    }

    #[test]
    fn bad_kinds_rejected() {
        let err = load_tables_from_str(
            r#"{"commands":[{"name":"x","positional":[{"name":"n","kind":{"type":"int","range":[5,1]}}]}]}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("is empty"), "{err}");
        let err = load_tables_from_str(
            r#"{"commands":[{"name":"x","options":[{"aliases":["-m"],"argument":{"count":1,"kind":{"type":"enum","values":[]}}}]}]}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("no values"), "{err}");
    }

    #[test]
    fn malformed_json_rejected() {
        let err = load_tables_from_str("{ not json").unwrap_err();
        assert!(matches!(err, TablesError::InvalidJson(_)));
    }

    #[test]
    fn tables_round_trip() {
        let tables = load_tables_from_str(GREP).unwrap();
        let json = serde_json::to_string(&tables).unwrap();
        let back = load_tables_from_str(&json).unwrap();
        assert_eq!(tables, back);
    }
}
