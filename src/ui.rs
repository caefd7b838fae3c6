// UI layer: the menu-driven session. Every prompt loops until the person
// model accepts the answer; only console failures (closed input, broken
// terminal) leave the loop with an error.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info, warn};

use crate::chart::{ChartRenderer, ChartSpec};
use crate::error::InvalidInput;
use crate::person::{Gender, Person};
use crate::reference::{Indicator, ReferenceStore};
use crate::term::Console;

const RULE: &str = "==============================";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Menu,
    HeightForAge,
    BmiForAge,
    Help,
    Exit,
}

impl State {
    /// Menu option -> next state. Unknown numbers map to `None`.
    pub fn from_option(option: i64) -> Option<State> {
        match option {
            1 => Some(State::HeightForAge),
            2 => Some(State::BmiForAge),
            3 => Some(State::Help),
            4 => Some(State::Exit),
            _ => None,
        }
    }
}

/// One interactive session: a person, the console it talks through and
/// the collaborators that turn the answers into a chart.
pub struct Session<C, R> {
    person: Person,
    console: C,
    renderer: R,
    store: ReferenceStore,
    plot_path: PathBuf,
}

impl<C: Console, R: ChartRenderer> Session<C, R> {
    pub fn new(console: C, renderer: R, store: ReferenceStore, plot_path: impl Into<PathBuf>) -> Self {
        Session {
            person: Person::default(),
            console,
            renderer,
            store,
            plot_path: plot_path.into(),
        }
    }

    pub fn person(&self) -> &Person {
        &self.person
    }

    pub fn into_parts(self) -> (C, R) {
        (self.console, self.renderer)
    }

    /// Runs the menu loop until the user picks "Exit".
    pub fn run(&mut self) -> Result<()> {
        let mut state = State::Menu;
        loop {
            debug!("state {:?}", state);
            state = match state {
                State::Menu => self.menu()?,
                State::HeightForAge => {
                    self.collect_height_for_age()?;
                    self.plot(Indicator::HeightForAge)?;
                    State::Menu
                }
                State::BmiForAge => {
                    self.collect_height_for_age()?;
                    self.ask_weight()?;
                    self.plot(Indicator::BmiForAge)?;
                    State::Menu
                }
                State::Help => {
                    self.help()?;
                    State::Menu
                }
                State::Exit => {
                    self.console.say("Program successfully closed")?;
                    return Ok(());
                }
            };
        }
    }

    fn menu(&mut self) -> Result<State> {
        self.console.say("")?;
        self.console.say(RULE)?;
        self.console.say("+-- GROWTH STANDARDS CALCULATOR (5 to 19 years) --+\n")?;
        self.console.say("1. Height for age")?;
        self.console.say("2. BMI for age")?;
        self.console.say("3. Help")?;
        self.console.say("4. Exit")?;
        self.console.say(RULE)?;

        let option = loop {
            let raw = self.console.read_line("Select an option: ")?;
            match raw.trim().parse::<i64>() {
                Ok(option) => break option,
                Err(_) => self.console.warn("Only use numbers")?,
            }
        };

        match State::from_option(option) {
            Some(state) => Ok(state),
            None => {
                self.console.warn("Only select a valid option from the menu")?;
                Ok(State::Menu)
            }
        }
    }

    fn collect_height_for_age(&mut self) -> io::Result<()> {
        self.ask_gender()?;
        self.ask_age()?;
        self.ask_height()
    }

    fn ask_gender(&mut self) -> io::Result<()> {
        let quoted: Vec<String> = Gender::VALID.iter().map(|g| format!("'{}'", g)).collect();
        let prompt = format!("Type gender [{}]: ", quoted.join(", "));
        self.prompt_until(&prompt, "gender", |person, raw| person.set_gender(raw))
    }

    fn ask_age(&mut self) -> io::Result<()> {
        self.prompt_until("Type age [5-19]: ", "age", |person, raw| {
            let age = raw.trim().parse::<i64>().map_err(|_| InvalidInput::NotANumber { field: "Age" })?;
            person.set_age(age)
        })
    }

    fn ask_height(&mut self) -> io::Result<()> {
        self.prompt_until("Type height in CM: ", "height", |person, raw| person.set_height(raw))
    }

    fn ask_weight(&mut self) -> io::Result<()> {
        self.prompt_until("Type weight in KG: ", "weight", |person, raw| person.set_weight(raw))
    }

    /// Keeps asking until `apply` accepts the answer. There is no retry
    /// limit; only a console error ends the loop early.
    fn prompt_until<F>(&mut self, prompt: &str, field: &str, mut apply: F) -> io::Result<()>
    where
        F: FnMut(&mut Person, &str) -> Result<(), InvalidInput>,
    {
        loop {
            let raw = self.console.read_line(prompt)?;
            match apply(&mut self.person, &raw) {
                Ok(()) => return Ok(()),
                Err(e) => {
                    debug!("rejected {} {:?}: {}", field, raw, e);
                    self.console.warn(&format!("{} Try again.", e))?;
                }
            }
        }
    }

    /// Loads the reference table for the person's sex and renders the
    /// chart. Failures are reported and the session carries on.
    fn plot(&mut self, indicator: Indicator) -> io::Result<()> {
        let sex = self.person.gender().sex();
        let value = match indicator {
            Indicator::HeightForAge => self.person.height(),
            Indicator::BmiForAge => {
                let bmi = self.person.compute_bmi();
                self.console.say(&format!("Your BMI is {:.2} kg/m^2", bmi))?;
                bmi
            }
        };

        let table = match self.store.load(indicator, sex) {
            Ok(table) => table,
            Err(e) => {
                warn!("{}", e);
                return self.console.warn(&format!("Couldn't load the reference data: {}", e));
            }
        };
        let chart = ChartSpec::new(&table, self.person.age(), value);

        let spinner = spinner("Creating plot...");
        let rendered = self.renderer.render(&chart, &self.plot_path);
        spinner.finish_and_clear();

        match rendered {
            Ok(()) => {
                info!("{} chart written to {}", table, self.plot_path.display());
                self.console.say("")?;
                self.console.say(&format!("Plot created successfully. Go to {}\n", self.plot_path.display()))
            }
            Err(e) => {
                warn!("{:#}", e);
                self.console.warn(&format!("Couldn't create the plot: {:#}", e))
            }
        }
    }

    fn help(&mut self) -> io::Result<()> {
        self.console.say("")?;
        self.console.say(RULE)?;
        self.console.say("+-- INSTRUCTIONS --+\n")?;
        self.console.say("Height/BMI for age\n")?;
        self.console.say("This program generates a plot using data from WHO,")?;
        self.console.say("based on your data generates a dot to compare it")?;
        self.console.say(&format!("the file generated is called {}\n", self.plot_path.display()))?;
        self.console.say("You can update WHO's info by editing the csv files")?;
        self.console.say(&format!("in {}", self.store.dir().display()))?;
        self.console.say(RULE)?;
        self.console.say("")?;

        loop {
            let answer = self.console.read_line("Continue? (Y): ")?;
            if matches!(answer.trim().to_lowercase().as_str(), "y" | "yes") {
                return Ok(());
            }
        }
    }
}

/// Spinner on stderr; hidden when stderr is not a terminal.
pub fn spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}
