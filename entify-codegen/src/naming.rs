//! Naming conventions for generated Go identifiers.

use entify_core::{capitalize, lowercase_first, segments, to_pascal_case};

/// Capability turning a plural word into its singular form.
pub trait Singularize: Send + Sync {
    fn singularize(&self, word: &str) -> String;
}

/// English inflection backed by the `pluralizer` rule set.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnglishInflector;

impl Singularize for EnglishInflector {
    fn singularize(&self, word: &str) -> String {
        pluralizer::pluralize(word, 1, false)
    }
}

/// Language-specific naming rules.
///
/// Defines acronym overrides and how to handle reserved words.
#[derive(Debug, Clone, Copy)]
pub struct NamingRules {
    /// Segments rendered verbatim instead of capitalized (e.g., "id" -> "ID")
    pub acronyms: &'static [(&'static str, &'static str)],
    /// List of reserved words in the language
    pub reserved_words: &'static [&'static str],
    /// Exported names taken by methods generated next to the column fields
    pub reserved_members: &'static [&'static str],
    /// Names the generated entity methods use besides their receiver
    pub reserved_receivers: &'static [&'static str],
    /// Appended to a name colliding with a reserved word
    pub reserved_suffix: &'static str,
}

impl NamingRules {
    /// Check if a name is a reserved word.
    pub fn is_reserved(&self, name: &str) -> bool {
        self.reserved_words.contains(&name)
    }

    /// Get a safe name, escaping if necessary.
    pub fn safe_name(&self, name: String) -> String {
        if self.is_reserved(&name) {
            format!("{}{}", name, self.reserved_suffix)
        } else {
            name
        }
    }

    /// Escape a property name that would shadow a generated method.
    pub fn safe_member(&self, name: String) -> String {
        if self.reserved_members.contains(&name.as_str()) {
            format!("{}{}", name, self.reserved_suffix)
        } else {
            name
        }
    }

    /// Escape a receiver that is a keyword or would shadow a name the
    /// generated methods use.
    pub fn safe_receiver(&self, name: String) -> String {
        if self.reserved_receivers.contains(&name.as_str()) {
            format!("{}{}", name, self.reserved_suffix)
        } else {
            self.safe_name(name)
        }
    }

    /// Look up the acronym override for a segment, ignoring case.
    pub fn acronym(&self, segment: &str) -> Option<&'static str> {
        let lowered = segment.to_lowercase();
        self.acronyms
            .iter()
            .find(|(word, _)| *word == lowered)
            .map(|(_, acronym)| *acronym)
    }
}

/// Go naming rules.
pub const GO_NAMING: NamingRules = NamingRules {
    acronyms: &[("id", "ID"), ("url", "URL"), ("uri", "URI")],
    reserved_words: &[
        "break",
        "case",
        "chan",
        "const",
        "continue",
        "default",
        "defer",
        "else",
        "fallthrough",
        "for",
        "func",
        "go",
        "goto",
        "if",
        "import",
        "interface",
        "map",
        "package",
        "range",
        "return",
        "select",
        "struct",
        "switch",
        "type",
        "var",
    ],
    reserved_members: &["ChangedColumns", "ColumnValue", "Delete", "String", "Update"],
    reserved_receivers: &[
        "column", "columns", "err", "fmt", "idx", "json", "ok", "rows", "sql", "strings", "time",
        "value", "values",
    ],
    reserved_suffix: "_",
};

/// Derives Go identifiers from snake_case table and column names.
///
/// Every operation is a pure function of its input.
#[derive(Clone, Copy)]
pub struct NameTransformer<'a> {
    rules: &'a NamingRules,
    inflector: &'a dyn Singularize,
}

impl<'a> NameTransformer<'a> {
    pub fn new(rules: &'a NamingRules, inflector: &'a dyn Singularize) -> Self {
        Self { rules, inflector }
    }

    pub fn rules(&self) -> &NamingRules {
        self.rules
    }

    fn singular_segments(&self, name: &str) -> Vec<String> {
        segments(name)
            .map(|segment| self.inflector.singularize(segment))
            .collect()
    }

    /// "user_accounts" -> "UserAccount"
    pub fn struct_name(&self, name: &str) -> String {
        to_pascal_case(&self.singular_segments(name).join("_"))
    }

    /// "user_accounts" -> "user_account"
    pub fn file_name(&self, name: &str) -> String {
        self.singular_segments(name).join("_")
    }

    /// "user_accounts" -> "useraccount"
    pub fn package_name(&self, name: &str) -> String {
        self.rules.safe_name(self.singular_segments(name).concat())
    }

    /// "user_id" -> "UserID", "update" -> "Update_"
    pub fn property_name(&self, name: &str) -> String {
        let property: String = segments(name)
            .map(|segment| match self.rules.acronym(segment) {
                Some(acronym) => acronym.to_string(),
                None => capitalize(segment),
            })
            .collect();
        self.rules.safe_member(property)
    }

    /// "user_accounts" -> "userAccount"
    pub fn variable_name(&self, name: &str) -> String {
        self.unexported(name, true)
    }

    /// Like [`Self::variable_name`] but keeps plural segments: "tags" -> "tags"
    pub fn column_variable_name(&self, name: &str) -> String {
        self.unexported(name, false)
    }

    /// "user_accounts" -> "ua"
    ///
    /// Never equal to the entity's package name, which the methods reference.
    pub fn receiver_name(&self, name: &str) -> String {
        let receiver: String = segments(name)
            .filter_map(|segment| segment.chars().next())
            .flat_map(char::to_lowercase)
            .collect();
        let mut receiver = self.rules.safe_receiver(receiver);
        if receiver == self.package_name(name) {
            receiver.push_str(self.rules.reserved_suffix);
        }
        receiver
    }

    /// Segments are singularized before the acronym lookup, so "user_ids"
    /// gives "userID".
    fn unexported(&self, name: &str, singular: bool) -> String {
        let joined: String = segments(name)
            .enumerate()
            .map(|(i, segment)| {
                let segment = if singular {
                    self.inflector.singularize(segment)
                } else {
                    segment.to_string()
                };
                // the leading segment is never an acronym: "id" stays "id"
                match self.rules.acronym(&segment) {
                    Some(acronym) if i > 0 => acronym.to_string(),
                    _ => capitalize(&segment),
                }
            })
            .collect();
        self.rules.safe_name(lowercase_first(&joined))
    }
}

impl std::fmt::Debug for NameTransformer<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NameTransformer")
            .field("rules", self.rules)
            .finish_non_exhaustive()
    }
}
