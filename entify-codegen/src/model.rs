//! Entity model construction from a parsed schema.

use std::{collections::HashSet, sync::Arc};

use entify_ir::{Data, Entity, Field, FieldTypeKind};
use entify_schema::{Column, Schema, Table};

use crate::{Error, ImportCollector, NameTransformer, Result, TypeMapper};

/// Names the root package declares once, whatever the schema.
const ROOT_NAMES: &[&str] = &[
    "Client",
    "IsNotFound",
    "NewClient",
    "NotFoundError",
    "assignNullable",
    "config",
    "dbDriver",
];

/// Members of an entity struct that are not column fields.
const STRUCT_MEMBERS: &[&str] = &["Delete", "String", "Update", "config", "scan"];

/// Members of a mutation that are not per-column accessors.
const MUTATION_MEMBERS: &[&str] = &["ChangedColumns", "ColumnValue", "apply", "assignments", "values"];

/// Names an entity package declares besides the per-column ones.
const PACKAGE_NAMES: &[&str] = &["And", "Columns", "Label", "Predicate", "Table", "ValidColumn"];

/// Generated Go names sharing one scope.
struct Scope {
    label: String,
    taken: HashSet<String>,
}

impl Scope {
    fn new(label: String, fixed: &[&str]) -> Self {
        Self {
            label,
            taken: fixed.iter().map(|name| name.to_string()).collect(),
        }
    }

    fn declare(&mut self, name: String) -> Result<()> {
        if self.taken.insert(name.clone()) {
            Ok(())
        } else {
            Err(Error::NameCollision {
                name,
                scope: self.label.clone(),
            })
        }
    }
}

/// Builds one [`Entity`] per table, in schema order.
#[derive(Debug, Clone, Copy)]
pub struct EntityModelBuilder<'a, M> {
    mapper: &'a M,
    names: NameTransformer<'a>,
}

impl<'a, M: TypeMapper> EntityModelBuilder<'a, M> {
    pub fn new(mapper: &'a M, names: NameTransformer<'a>) -> Self {
        Self { mapper, names }
    }

    /// Build the complete generation unit.
    ///
    /// Fails on the first column whose type has no mapping; no partial
    /// entity is produced.
    pub fn build(&self, schema: &Schema, package: &str, module: &str) -> Result<Data> {
        let mut data = Data::new(package, module);
        let mut root = Scope::new(format!("package {package}"), ROOT_NAMES);
        let mut packages = HashSet::new();

        for table in &schema.tables {
            let entity = self.build_entity(table, module)?;
            declare_entity(&mut root, &entity).map_err(|err| err.in_table(&table.name))?;
            if !packages.insert(entity.package_name.clone()) {
                return Err(Error::NameCollision {
                    name: entity.package_name,
                    scope: "the output directory".to_string(),
                }
                .in_table(&table.name));
            }
            data.entities.push(entity);
        }
        Ok(data)
    }

    /// Build the entity for a single table.
    pub fn build_entity(&self, table: &Table, module: &str) -> Result<Entity> {
        let mut imports = ImportCollector::new();
        let mut fields = Vec::with_capacity(table.columns.len());
        let mut primary_keys = Vec::new();

        for column in &table.columns {
            let field = self.build_field(table, column, &mut imports)?;
            if field.primary_key {
                primary_keys.push(Arc::clone(&field));
            }
            fields.push(field);
        }

        let struct_name = self.names.struct_name(&table.name);
        let package_name = self.names.package_name(&table.name);
        declare_fields(&struct_name, &package_name, table, &fields)?;

        let primary_key_auto_incr = matches!(
            primary_keys.as_slice(),
            [pk] if pk.type_kind == FieldTypeKind::Number
        );

        Ok(Entity {
            name: table.name.clone(),
            receiver: self.names.receiver_name(&table.name),
            module: module.to_string(),
            struct_name,
            package_name,
            file_name: self.names.file_name(&table.name),
            variable_name: self.names.variable_name(&table.name),
            imports: imports.into_vec(),
            fields_count: fields.len(),
            fields,
            primary_keys,
            primary_key_auto_incr,
        })
    }

    fn build_field(
        &self,
        table: &Table,
        column: &Column,
        imports: &mut ImportCollector,
    ) -> Result<Arc<Field>> {
        let ct = self
            .mapper
            .map_column(&column.sql_type, column.null)
            .map_err(|err| err.in_column(&table.name, &column.name))?;

        if let Some(package) = ct.package {
            imports.add(package);
        }

        Ok(Arc::new(Field {
            name: column.name.clone(),
            property_name: self.names.property_name(&column.name),
            variable_name: self.names.column_variable_name(&column.name),
            type_kind: ct.kind,
            ty: ct.base.to_string(),
            sql_type: ct.nullable_type.to_string(),
            nullable: ct.nullable,
            nullable_access: ct.nullable_access.to_string(),
            default_value: ct.default_value.to_string(),
            primary_key: table.is_primary_key(&column.name),
        }))
    }
}

/// Declare the root package names generated for `entity`.
fn declare_entity(root: &mut Scope, entity: &Entity) -> Result<()> {
    let name = &entity.struct_name;
    root.declare(name.clone())?;
    for suffix in [
        "Client", "Create", "Delete", "DeleteOne", "Mutation", "Query", "Update", "UpdateOne",
    ] {
        root.declare(format!("{name}{suffix}"))?;
    }
    root.declare(format!("New{name}Client"))?;
    root.declare(format!("new{name}Mutation"))?;
    root.declare(format!("{}PrimaryKey", entity.variable_name))
}

/// Check that the per-column names generated for a table are unique in
/// every scope they land in.
fn declare_fields(
    struct_name: &str,
    package_name: &str,
    table: &Table,
    fields: &[Arc<Field>],
) -> Result<()> {
    let mut scopes = [
        Scope::new(format!("struct {struct_name}"), STRUCT_MEMBERS),
        Scope::new(format!("struct {struct_name}Mutation"), MUTATION_MEMBERS),
        Scope::new(format!("package {package_name}"), PACKAGE_NAMES),
    ];

    for field in fields {
        let p = &field.property_name;
        let mut members = vec![p.clone(), format!("Get{p}")];
        let mut mutation = vec![p.clone(), format!("Set{p}")];
        let mut package = vec![format!("Field{p}")];
        if field.type_kind != FieldTypeKind::Json {
            package.extend([format!("{p}EQ"), format!("{p}NEQ"), format!("{p}In")]);
        }
        if field.nullable {
            mutation.extend([format!("Clear{p}"), format!("{p}Cleared")]);
            package.extend([format!("{p}IsNil"), format!("{p}NotNil")]);
        }

        for (scope, names) in scopes.iter_mut().zip([members, mutation, package]) {
            for name in names {
                scope
                    .declare(name)
                    .map_err(|err| err.in_column(&table.name, &field.name))?;
            }
        }
    }
    Ok(())
}
