//! MySQL type table
//!
//! Each group ties a family of column types to the semantic types stored in
//! it. The first column type of a group is the canonical one used when a
//! semantic type is mapped forward.

/// One family of interchangeable column types
#[derive(Debug, Clone, Copy)]
pub struct ColumnTypeGroup {
    /// Column types, canonical first
    pub column_types: &'static [&'static str],
    /// Signed / plain semantic types
    pub semantic_types: &'static [&'static str],
    /// Unsigned semantic types
    pub unsigned_types: &'static [&'static str],
    /// Semantic types that are nullable (pointer or nullable wrapper)
    pub nullable_types: &'static [&'static str],
}

impl ColumnTypeGroup {
    /// Every semantic type mapped by this group
    pub fn all_semantic_types(&self) -> impl Iterator<Item = &'static str> {
        self.semantic_types
            .iter()
            .chain(self.unsigned_types)
            .chain(self.nullable_types)
            .copied()
    }

    /// Nullable semantic types spelled without a pointer
    pub fn native_nullable_types(&self) -> impl Iterator<Item = &'static str> {
        self.nullable_types
            .iter()
            .copied()
            .filter(|t| !t.starts_with('*'))
    }

    /// Canonical column type, and whether the semantic type is unsigned
    pub fn find_column_type(&self, semantic_type: &str) -> (&'static str, bool) {
        (
            self.column_types[0],
            self.unsigned_types.contains(&semantic_type),
        )
    }

    /// Semantic type stored in `column_type`, if this group holds it
    pub fn find_semantic_type(
        &self,
        column_type: &str,
        nullable: bool,
        unsigned: bool,
    ) -> Option<&'static str> {
        if !self.column_types.contains(&column_type) {
            return None;
        }
        if unsigned && !self.unsigned_types.is_empty() {
            return Some(self.unsigned_types[0]);
        }
        if nullable && !self.nullable_types.is_empty() {
            return Some(self.nullable_types[0]);
        }
        self.semantic_types.first().copied()
    }
}

pub const MYSQL_COLUMN_TYPES: &[ColumnTypeGroup] = &[
    ColumnTypeGroup {
        column_types: &["VARCHAR", "TEXT", "MEDIUMTEXT", "LONGTEXT", "CHAR"],
        semantic_types: &["string"],
        unsigned_types: &[],
        nullable_types: &["*string", "sql.NullString"],
    },
    ColumnTypeGroup {
        column_types: &["VARBINARY", "BINARY"],
        semantic_types: &["[]byte"],
        unsigned_types: &[],
        nullable_types: &["[]byte"],
    },
    ColumnTypeGroup {
        column_types: &["INT", "MEDIUMINT"],
        semantic_types: &["int", "int32"],
        unsigned_types: &["uint", "uint32"],
        nullable_types: &[],
    },
    ColumnTypeGroup {
        column_types: &["TINYINT"],
        semantic_types: &["int8"],
        unsigned_types: &["uint8"],
        nullable_types: &[],
    },
    ColumnTypeGroup {
        column_types: &["TINYINT(1)"],
        semantic_types: &["bool"],
        unsigned_types: &[],
        nullable_types: &["*bool", "sql.NullBool"],
    },
    ColumnTypeGroup {
        column_types: &["SMALLINT"],
        semantic_types: &["int16"],
        unsigned_types: &["uint16"],
        nullable_types: &[],
    },
    ColumnTypeGroup {
        column_types: &["BIGINT"],
        semantic_types: &["int64"],
        unsigned_types: &["uint64"],
        nullable_types: &["*int64", "sql.NullInt64"],
    },
    ColumnTypeGroup {
        column_types: &["DOUBLE", "FLOAT", "DECIMAL"],
        semantic_types: &["float64", "float32"],
        unsigned_types: &[],
        nullable_types: &["*float64", "sql.NullFloat64"],
    },
    ColumnTypeGroup {
        column_types: &["DATETIME"],
        semantic_types: &["time.Time"],
        unsigned_types: &[],
        nullable_types: &["*time.Time", "mysql.NullTime", "gorp.NullTime"],
    },
];

/// Apply default sizing to bare column types
pub fn default_column_type(column_type: &str) -> String {
    let upper = column_type.to_uppercase();
    match upper.as_str() {
        "BIT" => "BIT(1)".to_string(),
        "DECIMAL" => "DECIMAL(10,0)".to_string(),
        "VARCHAR" => "VARCHAR(255)".to_string(),
        "VARBINARY" => "VARBINARY(255)".to_string(),
        "CHAR" => "CHAR(1)".to_string(),
        "BINARY" => "BINARY(1)".to_string(),
        "YEAR" => "YEAR(4)".to_string(),
        _ => upper,
    }
}

/// Remove the first parenthesised section (`VARCHAR(255)` → `VARCHAR`)
pub fn trim_parens(column_type: &str) -> String {
    match (column_type.find('('), column_type.find(')')) {
        (Some(start), Some(end)) if start < end => {
            format!("{}{}", &column_type[..start], &column_type[end + 1..])
        }
        _ => column_type.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_column_type() {
        assert_eq!(default_column_type("varchar"), "VARCHAR(255)");
        assert_eq!(default_column_type("DECIMAL"), "DECIMAL(10,0)");
        assert_eq!(default_column_type("text"), "TEXT");
        assert_eq!(default_column_type("decimal(8,2)"), "DECIMAL(8,2)");
    }

    #[test]
    fn test_trim_parens() {
        assert_eq!(trim_parens("VARCHAR(255)"), "VARCHAR");
        assert_eq!(trim_parens("DECIMAL(10,2) UNSIGNED"), "DECIMAL UNSIGNED");
        assert_eq!(trim_parens("TEXT"), "TEXT");
    }

    #[test]
    fn test_native_nullable_excludes_pointers() {
        let strings = &MYSQL_COLUMN_TYPES[0];
        assert_eq!(
            strings.native_nullable_types().collect::<Vec<_>>(),
            vec!["sql.NullString"]
        );
    }

    #[test]
    fn test_find_semantic_type_prefers_unsigned_then_nullable() {
        let bigint = &MYSQL_COLUMN_TYPES[6];
        assert_eq!(bigint.find_semantic_type("BIGINT", false, false), Some("int64"));
        assert_eq!(bigint.find_semantic_type("BIGINT", true, false), Some("*int64"));
        assert_eq!(bigint.find_semantic_type("BIGINT", false, true), Some("uint64"));
        assert_eq!(bigint.find_semantic_type("INT", false, false), None);
    }
}
