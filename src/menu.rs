//! The main menu: print the options, read a choice, dispatch it, repeat until Exit.

use std::fmt;
use std::io::prelude::*;
use std::str::FromStr;

use tracing::{debug, error, info};

use crate::textinterface::{Result, TextIO, TextInterfaceError};

pub const MENU_OPTIONS: [&str; 5] = [
    "## 1. Register department",
    "## 2. Modify department",
    "## 3. Delete department",
    "## 4. List departments",
    "## 5. Exit",
];

/// The four department operations the menu dispatches to.  Whatever each operation asks for or
/// prints goes through the shared console it is handed.
pub trait DeptHandle {
    fn insert<R: BufRead, W: Write>(&mut self, io: &mut TextIO<R, W>) -> Result<()>;
    fn update<R: BufRead, W: Write>(&mut self, io: &mut TextIO<R, W>) -> Result<()>;
    fn delete<R: BufRead, W: Write>(&mut self, io: &mut TextIO<R, W>) -> Result<()>;
    fn display<R: BufRead, W: Write>(&mut self, io: &mut TextIO<R, W>) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    Insert,
    Update,
    Delete,
    Display,
    Exit,
}

impl Choice {
    pub fn from_number(number: i64) -> Option<Self> {
        match number {
            1 => Some(Choice::Insert),
            2 => Some(Choice::Update),
            3 => Some(Choice::Delete),
            4 => Some(Choice::Display),
            5 => Some(Choice::Exit),
            _ => None,
        }
    }
}

impl FromStr for Choice {
    type Err = InvalidChoice;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        i64::from_str(s.trim())
            .ok()
            .and_then(Choice::from_number)
            .ok_or(InvalidChoice)
    }
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Choice::Insert => "insert",
            Choice::Update => "update",
            Choice::Delete => "delete",
            Choice::Display => "display",
            Choice::Exit => "exit",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidChoice;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuState {
    Running,
    Terminated,
}

/// Owns the database handle for as long as the program runs.
pub struct Menu<H> {
    handle: H,
    state: MenuState,
}

impl<H: DeptHandle> Menu<H> {
    pub fn new(handle: H) -> Self {
        Menu {
            handle,
            state: MenuState::Running,
        }
    }

    pub fn state(&self) -> MenuState {
        self.state
    }

    pub fn handle(&self) -> &H {
        &self.handle
    }

    pub fn into_handle(self) -> H {
        self.handle
    }

    /// Loop until Exit is chosen.  Failures inside an operation are reported and the menu
    /// keeps going; console failures end the loop.
    pub fn run<R: BufRead, W: Write>(&mut self, io: &mut TextIO<R, W>) -> Result<()> {
        info!("Menu started");

        while self.state == MenuState::Running {
            self.step(io)?;
        }

        info!("Menu terminated");
        Ok(())
    }

    /// One iteration: print the options, read a valid choice and dispatch it.
    pub fn step<R: BufRead, W: Write>(&mut self, io: &mut TextIO<R, W>) -> Result<MenuState> {
        for line in MENU_OPTIONS.iter() {
            io.say(line)?;
        }
        io.flush()?;

        let choice = read_choice(io)?;
        debug!(%choice, "Dispatching");

        let result = match choice {
            Choice::Insert => self.handle.insert(io),
            Choice::Update => self.handle.update(io),
            Choice::Delete => self.handle.delete(io),
            Choice::Display => self.handle.display(io),
            Choice::Exit => {
                self.state = MenuState::Terminated;
                Ok(())
            }
        };

        match result {
            Ok(()) => {}
            Err(TextInterfaceError::Data(e)) => {
                error!("{} failed: {}", choice, e);
                eprintln!("Error: {}", e);
            }
            Err(e) => return Err(e),
        }

        Ok(self.state)
    }
}

/// Read tokens until one names a menu option.  Anything else is skipped without a message.
pub fn read_choice<R: BufRead, W: Write>(io: &mut TextIO<R, W>) -> Result<Choice> {
    loop {
        let token = io.next_token()?.ok_or(TextInterfaceError::EndOfInput)?;

        match Choice::from_str(&token) {
            Ok(choice) => return Ok(choice),
            Err(InvalidChoice) => debug!("Ignoring menu input {:?}", token),
        }
    }
}
