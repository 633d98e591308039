use std::collections::VecDeque;
use std::io::{self, prelude::*};
use std::str::FromStr;

use thiserror::Error;
use tracing::warn;

use crate::data_handling::{DataError, DeptDatabase};
use crate::department::Department;
use crate::menu::DeptHandle;

pub type Result<T> = std::result::Result<T, TextInterfaceError>;

/// Console wrapper shared by the menu and the department operations.  Input is consumed either
/// as whitespace separated tokens (menu choices) or as whole lines (field prompts).
pub struct TextIO<R, W> {
    input: R,
    output: W,
    pending: VecDeque<String>,
}

impl<R: BufRead, W: Write> TextIO<R, W> {
    pub fn new(input: R, output: W) -> Self {
        TextIO {
            input,
            output,
            pending: VecDeque::new(),
        }
    }

    /// Next whitespace separated token, reading more lines as needed.  None at end of input.
    pub fn next_token(&mut self) -> Result<Option<String>> {
        loop {
            if let Some(token) = self.pending.pop_front() {
                return Ok(Some(token));
            }

            let line = match self.read_line()? {
                Some(line) => line,
                None => return Ok(None),
            };

            self.pending
                .extend(line.split_whitespace().map(String::from));
        }
    }

    /// One raw line, decoded lossily so stray bytes end up as tokens the caller rejects.
    fn read_line(&mut self) -> Result<Option<String>> {
        let mut buf = Vec::new();
        if self.input.read_until(b'\n', &mut buf)? == 0 {
            return Ok(None);
        }

        Ok(Some(String::from_utf8_lossy(&buf).into_owned()))
    }

    /// Ask for a value.  Tokens left over on the current line answer the prompt before a new
    /// line is read.
    pub fn prompt(&mut self, label: &str) -> Result<String> {
        write!(self.output, "Enter {}: ", label)?;
        self.output.flush()?;

        if !self.pending.is_empty() {
            let rest: Vec<String> = self.pending.drain(..).collect();
            return Ok(rest.join(" "));
        }

        let line = self.read_line()?.ok_or(TextInterfaceError::EndOfInput)?;

        Ok(String::from(line.trim()))
    }

    pub fn say(&mut self, text: &str) -> Result<()> {
        writeln!(self.output, "{}", text)?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.output.flush()?;
        Ok(())
    }

    pub fn output(&self) -> &W {
        &self.output
    }

    pub fn into_output(self) -> W {
        self.output
    }
}

/// The database handle used by the program: each operation asks for its fields on the console
/// and runs against the department store.
pub struct DeptConsole {
    data: DeptDatabase,
}

impl DeptConsole {
    pub fn new(data: DeptDatabase) -> Self {
        DeptConsole { data }
    }

    pub fn data(&self) -> &DeptDatabase {
        &self.data
    }

    fn ask_deptno<R: BufRead, W: Write>(io: &mut TextIO<R, W>) -> Result<Option<i64>> {
        let entry = io.prompt("department number")?;

        match i64::from_str(&entry) {
            Ok(num) if num > 0 => Ok(Some(num)),
            _ => {
                io.say("Invalid department number.")?;
                Ok(None)
            }
        }
    }

    /// Data errors the user can fix are reported on the console.  Anything else goes back to
    /// the menu.
    fn report<R: BufRead, W: Write>(
        io: &mut TextIO<R, W>,
        result: std::result::Result<(), DataError>,
    ) -> Result<()> {
        match result {
            Ok(()) => Ok(()),
            Err(e @ DataError::DuplicateDept(_))
            | Err(e @ DataError::NoSuchDept(_))
            | Err(e @ DataError::InvalidField(_)) => {
                warn!("Rejected: {}", e);
                io.say(&format!("{}.", e))
            }
            Err(e) => Err(e.into()),
        }
    }
}

impl DeptHandle for DeptConsole {
    fn insert<R: BufRead, W: Write>(&mut self, io: &mut TextIO<R, W>) -> Result<()> {
        let deptno = match Self::ask_deptno(io)? {
            Some(num) => num,
            None => return Ok(()),
        };

        let dname = io.prompt("department name")?;
        let loc = io.prompt("location")?;

        let dept = Department::new(deptno, &dname, &loc);
        let result = self.data.insert_dept(&dept).map(|_| ());

        if result.is_ok() {
            io.say(&format!("Department {} registered.", deptno))?;
        }
        Self::report(io, result)
    }

    fn update<R: BufRead, W: Write>(&mut self, io: &mut TextIO<R, W>) -> Result<()> {
        let deptno = match Self::ask_deptno(io)? {
            Some(num) => num,
            None => return Ok(()),
        };

        let current = match self.data.find_dept(deptno)? {
            Some(dept) => dept,
            None => return Self::report(io, Err(DataError::NoSuchDept(deptno))),
        };

        let dname = io.prompt(&format!("department name [{}]", current.name()))?;
        let loc = io.prompt(&format!("location [{}]", current.location()))?;

        let dname = if dname.is_empty() {
            current.name().as_str()
        } else {
            dname.as_str()
        };
        let loc = if loc.is_empty() {
            current.location().as_str()
        } else {
            loc.as_str()
        };

        let result = self.data.update_dept(deptno, dname, loc).map(|_| ());

        if result.is_ok() {
            io.say(&format!("Department {} updated.", deptno))?;
        }
        Self::report(io, result)
    }

    fn delete<R: BufRead, W: Write>(&mut self, io: &mut TextIO<R, W>) -> Result<()> {
        let deptno = match Self::ask_deptno(io)? {
            Some(num) => num,
            None => return Ok(()),
        };

        let result = self.data.delete_dept(deptno);

        if result.is_ok() {
            io.say(&format!("Department {} deleted.", deptno))?;
        }
        Self::report(io, result)
    }

    fn display<R: BufRead, W: Write>(&mut self, io: &mut TextIO<R, W>) -> Result<()> {
        let list = self.data.list_depts()?;

        if list.is_empty() {
            return io.say("No departments found.");
        }

        for dept in &list {
            io.say(&dept.to_string())?;
        }

        io.say(&format!("{} department(s).", list.len()))
    }
}

#[derive(Error, Debug)]
pub enum TextInterfaceError {
    #[error("End of input")]
    EndOfInput,

    #[error("IO Error({0})")]
    IOError(#[from] io::Error),

    #[error(transparent)]
    Data(#[from] DataError),
}
