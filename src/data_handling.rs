use std::path::{Path, PathBuf};

use chrono::prelude::*;
use rusqlite::{params, Connection, ErrorCode, OptionalExtension};
use thiserror::Error;
use tracing::{debug, info};

use crate::department::Department;

pub type Result<T> = std::result::Result<T, DataError>;

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS dept (
        deptno     INTEGER PRIMARY KEY,
        dname      TEXT NOT NULL,
        loc        TEXT NOT NULL DEFAULT '',
        updated_at TEXT NOT NULL
    );
"#;

/// DeptDatabase owns the connection to the department table and is the only place SQL is
/// issued.  It is opened once at startup and lives until the program exits.
pub struct DeptDatabase {
    conn: Connection,
}

impl DeptDatabase {
    /// Open (or create) the SQLite file at `path` and make sure the `dept` table exists.
    pub fn open<P: AsRef<Path>>(path: P) -> std::result::Result<Self, InitializationError> {
        let path = path.as_ref();

        info!("Opening department database at {:?}", path);

        let conn = Connection::open(path).map_err(|source| InitializationError::Open {
            path: path.to_path_buf(),
            source,
        })?;

        Self::init(conn)
    }

    pub fn open_in_memory() -> std::result::Result<Self, InitializationError> {
        let conn = Connection::open_in_memory().map_err(|source| InitializationError::Open {
            path: PathBuf::from(":memory:"),
            source,
        })?;

        Self::init(conn)
    }

    fn init(conn: Connection) -> std::result::Result<Self, InitializationError> {
        conn.execute_batch(SCHEMA).map_err(InitializationError::Schema)?;
        Ok(DeptDatabase { conn })
    }

    /// Store a new department stamped with the current time and return the stored row.  Fails
    /// with DuplicateDept if the number is taken.
    pub fn insert_dept(&self, dept: &Department) -> Result<Department> {
        let stored = Department::with_timestamp(
            dept.deptno(),
            dept.name(),
            dept.location(),
            Local::now().naive_local(),
        );
        stored.validate().map_err(DataError::InvalidField)?;

        let result = self.conn.execute(
            "INSERT INTO dept (deptno, dname, loc, updated_at) VALUES (?1, ?2, ?3, ?4)",
            params![stored.deptno(), stored.name(), stored.location(), stored.updated_at()],
        );

        match result {
            Ok(_) => {
                info!(deptno = stored.deptno(), "Inserted department");
                if let Ok(json) = serde_json::to_string(&stored) {
                    debug!("Row: {}", json);
                }
                Ok(stored)
            }
            Err(rusqlite::Error::SqliteFailure(e, _))
                if e.code == ErrorCode::ConstraintViolation =>
            {
                Err(DataError::DuplicateDept(stored.deptno()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Replace name and location of an existing department and refresh its timestamp.
    pub fn update_dept(&self, deptno: i64, dname: &str, loc: &str) -> Result<Department> {
        let updated = Department::with_timestamp(deptno, dname, loc, Local::now().naive_local());
        updated.validate().map_err(DataError::InvalidField)?;

        let changed = self.conn.execute(
            "UPDATE dept SET dname = ?2, loc = ?3, updated_at = ?4 WHERE deptno = ?1",
            params![deptno, updated.name(), updated.location(), updated.updated_at()],
        )?;

        if changed == 0 {
            return Err(DataError::NoSuchDept(deptno));
        }

        info!(deptno, "Updated department");
        Ok(updated)
    }

    pub fn delete_dept(&self, deptno: i64) -> Result<()> {
        let changed = self.conn.execute("DELETE FROM dept WHERE deptno = ?1", [deptno])?;

        if changed == 0 {
            return Err(DataError::NoSuchDept(deptno));
        }

        info!(deptno, "Deleted department");
        Ok(())
    }

    pub fn find_dept(&self, deptno: i64) -> Result<Option<Department>> {
        let dept = self
            .conn
            .query_row(
                "SELECT deptno, dname, loc, updated_at FROM dept WHERE deptno = ?1",
                [deptno],
                row_to_dept,
            )
            .optional()?;

        Ok(dept)
    }

    /// Every department, ordered by number.
    pub fn list_depts(&self) -> Result<Vec<Department>> {
        let mut stmt = self
            .conn
            .prepare("SELECT deptno, dname, loc, updated_at FROM dept ORDER BY deptno")?;

        let rows = stmt.query_map([], row_to_dept)?;

        let mut list = Vec::new();
        for row in rows {
            list.push(row?);
        }

        Ok(list)
    }

    pub fn count(&self) -> Result<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM dept", [], |row| row.get(0))?;

        Ok(count as u64)
    }
}

fn row_to_dept(row: &rusqlite::Row) -> rusqlite::Result<Department> {
    let deptno: i64 = row.get(0)?;
    let dname: String = row.get(1)?;
    let loc: String = row.get(2)?;
    let updated_at: NaiveDateTime = row.get(3)?;

    Ok(Department::with_timestamp(deptno, &dname, &loc, updated_at))
}

/// Raised when the database handle cannot be constructed.  Fatal: the menu never starts.
#[derive(Error, Debug)]
pub enum InitializationError {
    #[error("could not open department database at {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    #[error("could not prepare department schema: {0}")]
    Schema(#[source] rusqlite::Error),
}

#[derive(Error, Debug)]
pub enum DataError {
    #[error("Department {0} already exists")]
    DuplicateDept(i64),

    #[error("Could not find department {0}")]
    NoSuchDept(i64),

    #[error("Invalid field: {0}")]
    InvalidField(String),

    #[error("Database error: {0}")]
    Sql(#[from] rusqlite::Error),
}
