extern crate ansi_term;
extern crate ctrlc;
extern crate linefeed;
use crate::mach::{Event, Runtime};
use ansi_term::Style;
use linefeed::{Completer, Completion, Interface, Prompter, ReadResult, Terminal};
use std::io::Write;
use std::sync::atomic::Ordering;
use std::sync::Arc;

pub fn main() {
    if let Err(error) = main_loop() {
        eprintln!("{}", error);
    }
}

fn main_loop() -> std::io::Result<()> {
    let mut runtime = Runtime::default();
    let interrupted = runtime.interrupter();
    ctrlc::set_handler(move || {
        interrupted.store(true, Ordering::SeqCst);
    })
    .expect("Error setting Ctrl-C handler");

    let command = Interface::new("FORTH")?;
    command.write_fmt(format_args!("tensor FORTH\n"))?;

    'session: loop {
        command.set_completer(Arc::new(WordCompleter::new(runtime.glossary())));
        let string = match command.read_line()? {
            ReadResult::Input(string) => string,
            ReadResult::Signal(_) | ReadResult::Eof => break,
        };
        let mut failed = false;
        for event in runtime.enter(&string) {
            match event {
                Event::Print(s) => {
                    command.write_fmt(format_args!("{}", s))?;
                }
                Event::Errors(errors) => {
                    failed = true;
                    let mut fatal = false;
                    for error in errors.iter() {
                        command.write_fmt(format_args!(
                            "{}\n",
                            Style::new().bold().paint(error.to_string())
                        ))?;
                        fatal = fatal || error.is_fatal();
                    }
                    if fatal {
                        break 'session;
                    }
                }
                Event::Bye => break 'session,
            }
        }
        if !failed {
            command.write_fmt(format_args!("ok\n"))?;
            command.add_history_unique(string);
        }
    }
    Ok(())
}

struct WordCompleter {
    glossary: Vec<String>,
}

impl WordCompleter {
    fn new(glossary: Vec<String>) -> WordCompleter {
        WordCompleter { glossary }
    }
}

impl<Term: Terminal> Completer<Term> for WordCompleter {
    fn complete(
        &self,
        word: &str,
        _prompter: &Prompter<Term>,
        _start: usize,
        _end: usize,
    ) -> Option<Vec<Completion>> {
        if word.is_empty() {
            return None;
        }
        let matches: Vec<Completion> = self
            .glossary
            .iter()
            .filter(|name| name.to_ascii_lowercase().starts_with(&word.to_ascii_lowercase()))
            .map(|name| Completion::simple(name.clone()))
            .collect();
        if matches.is_empty() {
            None
        } else {
            Some(matches)
        }
    }
}
