//! Persona selector

use anyhow::{Context, Result};
use colored::{ColoredString, Colorize};
use dialoguer::{theme::ColorfulTheme, Select};

use crate::api::PersonaSummary;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectorState {
    Closed,
    Open,
}

/// Lists personas, marks the active one and reports the chosen mode
#[derive(Debug)]
pub struct PersonaSelector {
    personas: Vec<PersonaSummary>,
    state: SelectorState,
}

impl PersonaSelector {
    pub fn new(personas: Vec<PersonaSummary>) -> Self {
        Self {
            personas,
            state: SelectorState::Closed,
        }
    }

    pub fn find(&self, id: &str) -> Option<&PersonaSummary> {
        self.personas.iter().find(|p| p.id == id)
    }

    pub fn is_open(&self) -> bool {
        self.state == SelectorState::Open
    }

    pub fn open(&mut self) {
        self.state = SelectorState::Open;
    }

    pub fn close(&mut self) {
        self.state = SelectorState::Closed;
    }

    /// One line per persona, the active one marked with ✓
    pub fn labels(&self, active: &str) -> Vec<String> {
        self.personas
            .iter()
            .map(|p| {
                let marker = if p.id == active { " ✓" } else { "" };
                format!("{} ({}){}", p.name, p.tagline, marker)
            })
            .collect()
    }

    /// Invoke `on_select` with the persona at `index` and close.
    /// An out-of-range index changes nothing.
    pub fn choose(&mut self, index: usize, on_select: impl FnOnce(&str)) -> bool {
        let Some(persona) = self.personas.get(index) else {
            return false;
        };
        on_select(&persona.id);
        self.close();
        true
    }

    /// Interactive pick; Esc closes without selecting
    pub fn prompt(&mut self, active: &str, on_select: impl FnOnce(&str)) -> Result<bool> {
        if self.personas.is_empty() {
            return Ok(false);
        }

        self.open();
        let default = self
            .personas
            .iter()
            .position(|p| p.id == active)
            .unwrap_or(0);

        let picked = Select::with_theme(&ColorfulTheme::default())
            .with_prompt("Select Persona")
            .items(&self.labels(active))
            .default(default)
            .interact_opt()
            .context("Failed to read selection")?;

        match picked {
            Some(index) => Ok(self.choose(index, on_select)),
            None => {
                self.close();
                Ok(false)
            }
        }
    }
}

/// Terminal colour for a persona theme tag
pub fn paint(text: &str, theme: &str) -> ColoredString {
    match theme {
        "blue" => text.blue(),
        "pink" => text.magenta(),
        "slate" => text.bright_black(),
        _ => text.normal(),
    }
}
