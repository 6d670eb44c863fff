//! The engine's window on the outside world.
//!
//! Built-in functions never touch stdout, stdin or the file system directly.
//! They go through a [`Host`], so embedders and tests can capture output,
//! script input and serve sub-scripts from memory.

use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use crate::docs;

/// Where `HELP` looks for a topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HelpCategory {
    /// Keywords such as `IF` or `DEF`
    Statements,
    /// `Number`, `String` and `List`
    Types,
    /// Built-in function names
    Functions,
}

impl HelpCategory {
    /// Directory name used under a help directory.
    pub fn dir_name(self) -> &'static str {
        match self {
            HelpCategory::Statements => "STATEMENTS",
            HelpCategory::Types => "TYPES",
            HelpCategory::Functions => "FUNCTIONS",
        }
    }
}

impl fmt::Display for HelpCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

pub trait Host {
    fn write_line(&mut self, text: &str) -> io::Result<()>;

    fn read_line(&mut self) -> io::Result<String>;

    fn clear_screen(&mut self) -> io::Result<()>;

    fn load_script(&mut self, path: &str) -> io::Result<String>;

    /// Help text for `name`, one entry per line. Defaults to the texts
    /// compiled into the crate.
    fn load_help_text(&mut self, category: HelpCategory, name: &str) -> io::Result<Vec<String>> {
        embedded_help(category, name)
    }
}

fn embedded_help(category: HelpCategory, name: &str) -> io::Result<Vec<String>> {
    docs::help_text(category, name)
        .map(|text| text.lines().map(str::to_string).collect())
        .ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("no {category} help for {name}"),
            )
        })
}

/// Terminal host: stdout, stdin and the real file system.
#[derive(Debug, Default)]
pub struct StdHost {
    help_dir: Option<PathBuf>,
}

impl StdHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Help files are read from `<dir>/<CATEGORY>/<name>.txt` before falling
    /// back to the embedded texts.
    pub fn with_help_dir(help_dir: Option<PathBuf>) -> Self {
        StdHost { help_dir }
    }
}

impl Host for StdHost {
    fn write_line(&mut self, text: &str) -> io::Result<()> {
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{text}")?;
        stdout.flush()
    }

    fn read_line(&mut self) -> io::Result<String> {
        let mut line = String::new();
        io::stdin().lock().read_line(&mut line)?;
        let trimmed = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed);
        Ok(line)
    }

    fn clear_screen(&mut self) -> io::Result<()> {
        let mut stdout = io::stdout().lock();
        write!(stdout, "\x1B[2J\x1B[1;1H")?;
        stdout.flush()
    }

    fn load_script(&mut self, path: &str) -> io::Result<String> {
        fs::read_to_string(path)
    }

    fn load_help_text(&mut self, category: HelpCategory, name: &str) -> io::Result<Vec<String>> {
        if let Some(dir) = &self.help_dir {
            let path = dir.join(category.dir_name()).join(format!("{name}.txt"));
            if let Ok(text) = fs::read_to_string(&path) {
                return Ok(text.lines().map(str::to_string).collect());
            }
        }
        embedded_help(category, name)
    }
}

/// In-memory host for embedding and tests.
///
/// # Examples
///
/// ```
/// use chp_lang::{Engine, EngineOptions, MemoryHost};
///
/// let mut engine = Engine::with_host(MemoryHost::new(), EngineOptions::default());
/// engine.run("<test>", "PRINT(\"hi\")").unwrap();
/// assert_eq!(engine.host().output, vec!["hi".to_string()]);
/// ```
#[derive(Debug, Default)]
pub struct MemoryHost {
    /// Every line written, in order.
    pub output: Vec<String>,
    /// Lines handed out by `read_line`, front first.
    pub input: VecDeque<String>,
    /// Scripts served by `load_script`, keyed by path.
    pub scripts: HashMap<String, String>,
    /// Number of `clear_screen` calls.
    pub cleared: usize,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_input<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        MemoryHost {
            input: lines.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn add_script(&mut self, path: impl Into<String>, text: impl Into<String>) {
        self.scripts.insert(path.into(), text.into());
    }
}

impl Host for MemoryHost {
    fn write_line(&mut self, text: &str) -> io::Result<()> {
        self.output.push(text.to_string());
        Ok(())
    }

    fn read_line(&mut self) -> io::Result<String> {
        self.input
            .pop_front()
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "no more input"))
    }

    fn clear_screen(&mut self) -> io::Result<()> {
        self.cleared += 1;
        Ok(())
    }

    fn load_script(&mut self, path: &str) -> io::Result<String> {
        self.scripts.get(path).cloned().ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, format!("no such script: {path}"))
        })
    }
}
