use crate::clock::{Clock, SystemClock};
use crate::error::Error;
use crate::model::{Rules, Stats};
use crate::render;
use crate::session::Session;
use crate::sim::{Action, Advance};
use anyhow::Result;
use crossterm::{
    cursor, execute,
    terminal::{Clear, ClearType},
};
use rand::rngs::StdRng;
use std::io::{self, BufRead, IsTerminal, Write};
use std::sync::Arc;
use tracing::debug;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Act(Action),
    Status,
    Help,
    Quit,
    Empty,
    Unknown(String),
}

pub fn parse_command(line: &str) -> Command {
    let cmd = line.trim().to_ascii_lowercase();
    match cmd.as_str() {
        "" => Command::Empty,
        "status" => Command::Status,
        "help" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => match other.parse::<Action>() {
            Ok(action) => Command::Act(action),
            Err(_) => Command::Unknown(other.to_string()),
        },
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Stop,
}

pub struct PlayOptions {
    pub name: Option<String>,
    pub default_name: String,
    pub color: bool,
    pub rng: StdRng,
}

/// Line-oriented game loop over any reader/writer pair.
pub struct Repl<R, W> {
    input: R,
    out: W,
    session: Session,
    color: bool,
    last_shown: Option<Stats>,
}

impl<R: BufRead, W: Write> Repl<R, W> {
    pub fn new(input: R, out: W, session: Session, color: bool) -> Self {
        Self {
            input,
            out,
            session,
            color,
            last_shown: None,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    fn read_line(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line))
    }

    pub fn run(&mut self) -> Result<()> {
        while self.session.pet().is_alive {
            writeln!(self.out, "\n{}", "─".repeat(46))?;
            writeln!(
                self.out,
                "Commands: feed, play, rest, status, evolve, help, quit"
            )?;
            write!(
                self.out,
                "\n{} What would you like to do? > ",
                self.session.pet().stage().emoji
            )?;
            self.out.flush()?;

            let Some(line) = self.read_line()? else {
                writeln!(self.out)?;
                writeln!(self.out, "{}", render::goodbye(self.session.pet()))?;
                return Ok(());
            };
            if self.handle(parse_command(&line))? == Flow::Stop {
                return Ok(());
            }
        }
        writeln!(self.out, "\n{}", render::game_over(self.session.pet()))?;
        Ok(())
    }

    fn day_notice(&mut self, advance: Advance) -> Result<()> {
        if advance.days_passed > 0 && self.session.pet().is_alive {
            writeln!(
                self.out,
                "\n⏰ {} day(s) have passed! Total age: {} days",
                advance.days_passed,
                self.session.pet().age_days
            )?;
        }
        Ok(())
    }

    fn handle(&mut self, cmd: Command) -> Result<Flow> {
        debug!(?cmd, "command");
        match cmd {
            Command::Empty => {
                writeln!(
                    self.out,
                    "\nPlease enter a command. Type 'help' for available commands."
                )?;
            }
            Command::Unknown(what) => {
                writeln!(
                    self.out,
                    "\n❌ Unknown command: '{what}'. Type 'help' for available commands."
                )?;
            }
            Command::Help => {
                let text = render::help(self.session.rules());
                writeln!(self.out, "\n{text}")?;
            }
            Command::Quit => {
                writeln!(self.out, "\n{}", render::goodbye(self.session.pet()))?;
                return Ok(Flow::Stop);
            }
            Command::Status => {
                let snap = self.session.get_state();
                self.day_notice(snap.advance)?;
                if let Some(event) = &snap.event {
                    writeln!(self.out, "\n{} {}", event.emoji, event.message)?;
                }
                let panel = render::status_panel(&snap.state, self.last_shown.as_ref(), self.color);
                writeln!(self.out, "\n{panel}")?;
                self.last_shown = Some(snap.state.stats);
            }
            Command::Act(action) => match self.session.perform_action(action) {
                Ok(res) => {
                    self.day_notice(res.advance)?;
                    writeln!(self.out, "\n{}", res.message)?;
                }
                Err(Error::PetDeceased(_)) => {
                    writeln!(self.out, "\nYour spirit has already faded...")?;
                }
                Err(e) => writeln!(self.out, "\n❌ {e}")?,
            },
        }

        if self.session.pet().has_won(self.session.rules()) {
            writeln!(self.out, "\n{}", render::victory(self.session.pet()))?;
            return Ok(Flow::Stop);
        }
        Ok(Flow::Continue)
    }
}

pub fn prompt_name<R: BufRead, W: Write>(input: &mut R, out: &mut W, default: &str) -> Result<String> {
    write!(
        out,
        "What will you name your spirit animal? (Enter for '{default}'): "
    )?;
    out.flush()?;
    let mut line = String::new();
    input.read_line(&mut line)?;
    let name = line.trim();
    Ok(if name.is_empty() {
        default.to_string()
    } else {
        name.to_string()
    })
}

pub fn run(opts: PlayOptions) -> Result<()> {
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut out = io::stdout();

    if out.is_terminal() {
        execute!(out, Clear(ClearType::All), cursor::MoveTo(0, 0))?;
    }
    writeln!(out, "{}\n\nWelcome, Spirit Keeper!", render::banner())?;

    let name = match opts.name {
        Some(name) => name,
        None => prompt_name(&mut input, &mut out, &opts.default_name)?,
    };

    let rules = Rules::default();
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    writeln!(out, "\n{}", render::welcome(&name, &rules))?;
    write!(out, "\nPress Enter to begin your journey...")?;
    out.flush()?;
    let mut pause = String::new();
    input.read_line(&mut pause)?;

    // the pet hatches once the player is ready, not while they read
    let session = Session::new(&name, rules, clock, opts.rng);
    let mut repl = Repl::new(input, out, session, opts.color);
    repl.run()
}
