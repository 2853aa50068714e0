//! Schema construction
//!
//! `SchemaBuilder` collects record descriptors and turns them into the
//! entity catalog: one entity per record plus the join entities created by
//! many-to-many references, the creation-order dependencies between them,
//! and the warnings for every field that was dropped along the way.

use crate::dependency::DependencyMap;
use crate::descriptor::{FieldDescriptor, RecordDescriptor};
use crate::entity::Entity;
use crate::field::{Field, FieldOutcome, FieldWarning, WarningReason, is_exported};
use crate::relationship::{self, KeyRef, RelationKind, Relationship};
use crate::relationship_helpers::{
    create_fk_field, create_join_field, generate_fk_field_name, generate_join_table_name,
    generate_owner_key_name,
};
use crate::tag::{DEFAULT_TAG_KEY, TagOptions};
use autotable_core::{ColumnTypeMapper, EngineError, EngineResult, ResultExt, Validatable};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Placeholder field name accepted when paired with an explicit column
const PLACEHOLDER_NAME: &str = "_";

// ============================================================================
// Schema
// ============================================================================

/// The built entity catalog
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    /// Entities keyed by catalog key
    pub entities: BTreeMap<String, Entity>,

    /// Creation-order prerequisites
    pub dependencies: DependencyMap,

    /// Fields dropped while building
    #[serde(skip)]
    pub warnings: Vec<FieldWarning>,
}

impl Schema {
    /// Get an entity by catalog key
    pub fn get(&self, name: &str) -> Option<&Entity> {
        self.entities.get(name)
    }

    /// Catalog keys in lexicographic order
    pub fn entity_names(&self) -> impl Iterator<Item = &str> {
        self.entities.keys().map(String::as_str)
    }

    /// Synthesized join entities
    pub fn join_tables(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values().filter(|e| e.join)
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

impl Validatable for Schema {
    /// Every foreign key must point at an existing column of a known entity
    fn validate(&self) -> EngineResult<()> {
        for entity in self.entities.values() {
            entity.validate()?;
            for (column, fk) in entity.foreign_keys() {
                let target = self
                    .entities
                    .get(&fk.table)
                    .ok_or_else(|| EngineError::EntityNotFound(fk.table.clone()))?;
                if !target.has_column(&fk.column) {
                    return Err(EngineError::entity_validation(
                        &entity.name,
                        format!(
                            "Foreign key '{}' references missing column '{}.{}'",
                            column, fk.table, fk.column
                        ),
                    ));
                }
            }
        }
        Ok(())
    }
}

// ============================================================================
// SchemaBuilder
// ============================================================================

/// Builds a `Schema` from record descriptors
#[derive(Debug, Clone)]
pub struct SchemaBuilder {
    auto_id: bool,
    tag_key: String,
    records: BTreeMap<String, RecordDescriptor>,
    entities: BTreeMap<String, Entity>,
    dependencies: DependencyMap,
    warnings: Vec<FieldWarning>,
}

impl Default for SchemaBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaBuilder {
    /// Create a builder with auto-ID inference on and the default tag key
    pub fn new() -> Self {
        Self {
            auto_id: true,
            tag_key: DEFAULT_TAG_KEY.to_string(),
            records: BTreeMap::new(),
            entities: BTreeMap::new(),
            dependencies: DependencyMap::new(),
            warnings: Vec::new(),
        }
    }

    /// Toggle primary-key inference for fields named `id`
    pub fn with_auto_id(mut self, auto_id: bool) -> Self {
        self.auto_id = auto_id;
        self
    }

    /// Set the struct tag key holding the option list
    pub fn with_tag_key(mut self, tag_key: impl Into<String>) -> Self {
        self.tag_key = tag_key.into();
        self
    }

    /// Add a record to the catalog.
    ///
    /// Fails if the record is invalid or its catalog key is already taken.
    pub fn add_record(&mut self, record: RecordDescriptor) -> EngineResult<()> {
        record.validate()?;
        let key = record.table_name();
        if self.records.contains_key(&key) {
            return Err(EngineError::DuplicateEntity(key));
        }
        self.records.insert(key, record);
        Ok(())
    }

    /// Add several records
    pub fn add_records(
        &mut self,
        records: impl IntoIterator<Item = RecordDescriptor>,
    ) -> EngineResult<()> {
        for record in records {
            self.add_record(record)?;
        }
        Ok(())
    }

    /// Number of records added so far
    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    /// Build every entity, consuming the builder.
    ///
    /// Records are processed in catalog-key order. Malformed annotations and
    /// structural violations abort the build; dropped fields are collected
    /// as warnings.
    pub fn build<M: ColumnTypeMapper + ?Sized>(mut self, mapper: &M) -> EngineResult<Schema> {
        let records = std::mem::take(&mut self.records);

        // Register every record up front so join names cannot shadow one
        for key in records.keys() {
            self.dependencies.register(key.as_str());
        }

        for (key, record) in &records {
            self.build_entity(key, record, &records, mapper)?;
        }

        tracing::info!(
            entities = self.entities.len(),
            warnings = self.warnings.len(),
            "Schema built"
        );

        Ok(Schema {
            entities: self.entities,
            dependencies: self.dependencies,
            warnings: self.warnings,
        })
    }

    fn build_entity<M: ColumnTypeMapper + ?Sized>(
        &mut self,
        key: &str,
        record: &RecordDescriptor,
        records: &BTreeMap<String, RecordDescriptor>,
        mapper: &M,
    ) -> EngineResult<()> {
        let mut entity = Entity::new(key).with_option(record.option.clone());
        let mut current_id: Option<KeyRef> = None;

        for descriptor in &record.fields {
            let outcome =
                self.process_field(&entity, current_id.as_ref(), descriptor, records, mapper)?;

            match outcome {
                FieldOutcome::Column(field) => {
                    if self.auto_id && field.name.eq_ignore_ascii_case(crate::ID_CANDIDATE) {
                        current_id = Some(KeyRef::from_field(key, &field));
                    }
                    entity.add_field(field);
                }
                FieldOutcome::Embedded => {
                    tracing::debug!(entity = key, "Skipping embedded field");
                }
                FieldOutcome::JoinTable(name) => {
                    tracing::debug!(entity = key, join = %name, "Join table created");
                }
                FieldOutcome::Warning(warning) => {
                    tracing::warn!("Dropping field {}", warning);
                    self.warnings.push(warning);
                }
            }
        }

        entity.validate()?;
        self.entities.insert(key.to_string(), entity);
        Ok(())
    }

    fn process_field<M: ColumnTypeMapper + ?Sized>(
        &mut self,
        entity: &Entity,
        current_id: Option<&KeyRef>,
        descriptor: &FieldDescriptor,
        records: &BTreeMap<String, RecordDescriptor>,
        mapper: &M,
    ) -> EngineResult<FieldOutcome> {
        let Some(name) = descriptor.name.as_deref() else {
            return Ok(FieldOutcome::Embedded);
        };
        let key = entity.name.as_str();
        let warn = |reason| Ok(FieldOutcome::Warning(FieldWarning::new(key, name, reason)));

        // ── Tag ──────────────────────────────────────────────────────────
        let mut options = TagOptions::from_tag(descriptor.tag.as_deref(), &self.tag_key)
            .with_context(format!("{}.{}", key, name))?;

        if options.ignore {
            return warn(WarningReason::Ignored);
        }
        if !is_exported(name) && !(name == PLACEHOLDER_NAME && options.column.is_some()) {
            return warn(WarningReason::Unexported);
        }

        // ── Primary key ──────────────────────────────────────────────────
        let is_id = self.auto_id && descriptor.is_id_candidate();
        if is_id && current_id.is_some() {
            return Err(EngineError::MultipleIds(key.to_string()));
        }
        if is_id {
            options.primary_key = true;
            if descriptor.type_ref.is_integer_kind() {
                options.auto_increment = true;
            }
        }

        // ── Relationships ────────────────────────────────────────────────
        let (field, edge) = match relationship::detect(key, &descriptor.type_ref, records) {
            Some(rel) if rel.kind == RelationKind::ManyToMany => {
                return self.build_join_table(&rel, name, current_id, mapper);
            }
            Some(rel) => {
                let Some(target) = self.target_key(&rel)? else {
                    return warn(WarningReason::MissingPrimaryKey(rel.target_key));
                };
                tracing::debug!(
                    entity = key,
                    field = name,
                    target = %rel.target_key,
                    kind = %rel.kind,
                    "Inferred relationship"
                );
                let field = create_fk_field(
                    name,
                    rel.pointer,
                    &target,
                    &options,
                    descriptor.comment.as_deref(),
                    mapper,
                );
                let edge = (rel.target_key != key).then_some(rel.target_key);
                (field, edge)
            }
            None => {
                let field = Field::build(
                    name,
                    descriptor.type_ref.clone(),
                    &options,
                    descriptor.comment.as_deref(),
                    mapper,
                );
                (field, None)
            }
        };

        if entity.has_column(&field.column) {
            return warn(WarningReason::DuplicateColumn(field.column));
        }

        // Only accepted columns order their owner after the target.
        if let Some(target_key) = edge {
            self.dependencies.add_edge(key, &target_key);
        }

        Ok(FieldOutcome::Column(field))
    }

    /// Key a reference to `rel.target` points at. Without automatic ids no
    /// record has a key to reference.
    fn target_key(&self, rel: &Relationship<'_>) -> EngineResult<Option<KeyRef>> {
        if !self.auto_id {
            return Ok(None);
        }
        KeyRef::of_record(&rel.target_key, rel.target, &self.tag_key)
    }

    fn build_join_table<M: ColumnTypeMapper + ?Sized>(
        &mut self,
        rel: &Relationship<'_>,
        field_name: &str,
        current_id: Option<&KeyRef>,
        mapper: &M,
    ) -> EngineResult<FieldOutcome> {
        let warn = |reason| {
            Ok(FieldOutcome::Warning(FieldWarning::new(
                &rel.from, field_name, reason,
            )))
        };

        let Some(owner) = current_id else {
            return warn(WarningReason::MissingPrimaryKey(rel.from.clone()));
        };
        let Some(target) = self.target_key(rel)? else {
            return warn(WarningReason::MissingPrimaryKey(rel.target_key.clone()));
        };

        let type_name = rel.target.name.as_str();
        let join_name = generate_join_table_name(&rel.from, type_name);
        if self.entities.contains_key(&join_name) || self.dependencies.contains(&join_name) {
            return warn(WarningReason::DuplicateJoinTable(join_name));
        }

        let owner_field = create_join_field(&generate_owner_key_name(&rel.from), owner, mapper);
        let target_field = create_join_field(
            &generate_fk_field_name(field_name, &target.field_name),
            &target,
            mapper,
        );
        if owner_field.column == target_field.column {
            return warn(WarningReason::DuplicateColumn(target_field.column));
        }

        let join = Entity::join_table(&join_name)
            .with_field(owner_field)
            .with_field(target_field);
        join.validate()?;

        self.dependencies.add_edge(&join_name, &rel.from);
        self.dependencies.add_edge(&join_name, &rel.target_key);
        self.entities.insert(join_name.clone(), join);

        tracing::debug!(
            entity = %rel.from,
            field = field_name,
            target = %rel.target_key,
            join = %join_name,
            kind = %rel.kind,
            "Inferred relationship"
        );

        Ok(FieldOutcome::JoinTable(join_name))
    }
}

// ============================================================================
// Tests
// ============================================================================
