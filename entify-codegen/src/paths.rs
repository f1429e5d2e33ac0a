//! Path and template name constants for generated files.
//!
//! Template names double as destination paths: placeholder tokens are
//! substituted and [`TEMPLATE_SUFFIX`] is stripped.

/// Default output root relative to the working directory.
pub const DEFAULT_OUTPUT: &str = "entify/entity";

/// Default name of the generated root package.
pub const DEFAULT_PACKAGE: &str = "entity";

/// Directory holding the shared predicate helpers.
pub const PREDICATE_DIR: &str = "predicate";

/// Directory of an entity's own package, relative to the output root.
pub const ENTITY_PACKAGE_DIR: &str = "__entity-package__";

/// Suffix every template name carries.
pub const TEMPLATE_SUFFIX: &str = ".tmpl";

/// Placeholder keys.
pub mod placeholder {
    pub const ENTITY_PACKAGE: &str = "entity-package";
    pub const ENTITY_FILE: &str = "entity-file";
}

/// Template names.
pub mod template {
    pub const CLIENT: &str = "client.go.tmpl";
    pub const PREDICATE: &str = "predicate/predicate.go.tmpl";

    /// Rendered once per entity into the entity's own package.
    pub const ENTITY_PACKAGE: &[&str] = &[
        "__entity-package__/__entity-file__.go.tmpl",
        "__entity-package__/where.go.tmpl",
    ];

    /// Rendered once per entity into the root package, in emission order.
    pub const ENTITY_ROOT: &[&str] = &[
        "__entity-file___client.go.tmpl",
        "__entity-file___create.go.tmpl",
        "__entity-file___delete.go.tmpl",
        "__entity-file___mutation.go.tmpl",
        "__entity-file___query.go.tmpl",
        "__entity-file___update.go.tmpl",
        "__entity-file__.go.tmpl",
    ];
}
