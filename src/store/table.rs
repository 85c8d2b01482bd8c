//! Closed set of table identifiers.
//!
//! Every dynamic identifier position in a query is filled from this enum,
//! never from a free-form string. Path parameters naming a table are parsed
//! through [`Table::from_record_name`], which only admits the ten academic
//! record tables; the four role tables are reachable exclusively through the
//! identity resolver and user services.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Table {
    Admin,
    Teacher,
    Parent,
    Student,
    Grade,
    Class,
    Subject,
    Lesson,
    Exam,
    Assignment,
    Result,
    Attendance,
    Event,
    Announcement,
}

/// The academic record tables, i.e. the allow-list for the dynamic
/// `/get-record/{table}/{id}` and `/delete-record/{table}/{id}` paths.
pub const RECORD_TABLES: [Table; 10] = [
    Table::Grade,
    Table::Class,
    Table::Subject,
    Table::Lesson,
    Table::Exam,
    Table::Assignment,
    Table::Result,
    Table::Attendance,
    Table::Event,
    Table::Announcement,
];

impl Table {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Table::Admin => "admin",
            Table::Teacher => "teacher",
            Table::Parent => "parent",
            Table::Student => "student",
            Table::Grade => "grade",
            Table::Class => "class",
            Table::Subject => "subject",
            Table::Lesson => "lesson",
            Table::Exam => "exam",
            Table::Assignment => "assignment",
            Table::Result => "result",
            Table::Attendance => "attendance",
            Table::Event => "event",
            Table::Announcement => "announcement",
        }
    }

    /// Column that scopes a row to its tenant. The admin table has no
    /// school_id column; an admin's own id anchors its school, so admin rows
    /// are scoped on `id`.
    pub const fn tenant_column(&self) -> &'static str {
        match self {
            Table::Admin => "id",
            _ => "school_id",
        }
    }

    /// Parses a path parameter against the record allow-list. Anything
    /// outside it, including the role tables, is an invalid table name.
    pub fn from_record_name(name: &str) -> Option<Table> {
        RECORD_TABLES
            .into_iter()
            .find(|table| table.as_str() == name)
    }

    pub fn is_record(&self) -> bool {
        RECORD_TABLES.contains(self)
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_allow_list_round_trips() {
        for table in RECORD_TABLES {
            assert_eq!(Table::from_record_name(table.as_str()), Some(table));
            assert!(table.is_record());
        }
    }

    #[test]
    fn test_role_tables_are_not_record_tables() {
        for name in ["admin", "teacher", "parent", "student"] {
            assert_eq!(Table::from_record_name(name), None);
        }
        assert!(!Table::Admin.is_record());
    }

    #[test]
    fn test_rejects_free_form_identifiers() {
        assert_eq!(Table::from_record_name("grade; DROP TABLE grade"), None);
        assert_eq!(Table::from_record_name(""), None);
        assert_eq!(Table::from_record_name("grades"), None);
    }

    #[test]
    fn test_admin_is_scoped_on_its_own_id() {
        assert_eq!(Table::Admin.tenant_column(), "id");
        assert_eq!(Table::Teacher.tenant_column(), "school_id");
        assert_eq!(Table::Grade.tenant_column(), "school_id");
    }
}
