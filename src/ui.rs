use colored::Colorize;
use std::io::{self, BufRead, Write};

/// Output and prompting seam for the presenter.
pub trait UserInterface {
    fn table(&self, headings: &[&str], rows: &[Vec<String>]) -> String {
        Table::new(headings, rows).render()
    }
    fn say(&mut self, text: &str);
    fn confirmed(&mut self, prompt: &str) -> bool;
}

/// Bordered text table.
pub struct Table<'a> {
    headings: &'a [&'a str],
    rows: &'a [Vec<String>],
}

impl<'a> Table<'a> {
    pub fn new(headings: &'a [&'a str], rows: &'a [Vec<String>]) -> Self {
        Self { headings, rows }
    }

    pub fn render(&self) -> String {
        let mut widths: Vec<usize> = self.headings.iter().map(|h| h.chars().count()).collect();
        for row in self.rows {
            for (i, cell) in row.iter().enumerate().take(widths.len()) {
                widths[i] = widths[i].max(cell.chars().count());
            }
        }

        let separator = {
            let mut line = String::from("+");
            for width in &widths {
                line.push_str(&"-".repeat(width + 2));
                line.push('+');
            }
            line
        };
        let mut out = vec![separator.clone()];
        out.push(render_row(&widths, self.headings.iter().copied()));
        out.push(separator.clone());
        if !self.rows.is_empty() {
            for row in self.rows {
                out.push(render_row(&widths, row.iter().map(String::as_str)));
            }
            out.push(separator);
        }
        out.join("\n")
    }
}

fn render_row<'c>(widths: &[usize], mut cells: impl Iterator<Item = &'c str>) -> String {
    let mut line = String::from("|");
    for width in widths {
        let cell = cells.next().unwrap_or("");
        let pad = width - cell.chars().count();
        line.push(' ');
        line.push_str(cell);
        line.push_str(&" ".repeat(pad + 1));
        line.push('|');
    }
    line
}

/// Terminal-backed UI: stdout for output, stdin for confirmations.
pub struct TerminalUi {
    non_interactive: bool,
}

impl TerminalUi {
    pub fn new(non_interactive: bool) -> Self {
        Self { non_interactive }
    }
}

impl UserInterface for TerminalUi {
    fn say(&mut self, text: &str) {
        println!("{}", text);
    }

    fn confirmed(&mut self, prompt: &str) -> bool {
        if self.non_interactive {
            return true;
        }
        print!("{} (type 'yes' to continue): ", prompt.yellow());
        if io::stdout().flush().is_err() {
            return false;
        }
        let mut answer = String::new();
        match io::stdin().lock().read_line(&mut answer) {
            Ok(_) => is_affirmative(&answer),
            Err(_) => false,
        }
    }
}

fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "yes" | "y")
}
