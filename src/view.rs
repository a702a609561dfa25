//! Line-oriented terminal view.
//!
//! Renders whatever the controller reports and feeds typed answers back
//! through `update_field`/`advance`/`retreat`. Typing `back` at any prompt
//! goes to the previous step; an empty line keeps the current answer.
use crate::gateway::{Gateway, SubmissionReceipt};
use crate::survey::format::format_money;
use crate::survey::schema::{search_states, Field, InputKind, Role, COUNTRY_CODES};
use crate::survey::{Advance, StepView, SubmitOutcome, SurveyFlow};
use anyhow::{bail, Context, Result};
use std::io::{BufRead, Write};

const BACK: &str = "back";

enum Reply {
    Back,
    Line(String),
}

enum Collected {
    /// Answers applied; try to leave the step.
    Ready,
    /// Input was unusable; render the step again.
    Retry,
    Back,
}

pub struct TerminalView<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> TerminalView<R, W> {
    pub fn new(input: R, output: W) -> Self {
        TerminalView { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Drive `flow` until the gateway accepts the record.
    pub fn run<G: Gateway>(&mut self, flow: &mut SurveyFlow<G>) -> Result<SubmissionReceipt> {
        loop {
            if flow.is_submitted() {
                bail!("survey session already submitted");
            }
            let Some(step) = flow.step_view() else {
                bail!("no step to render at index {}", flow.step_index());
            };
            self.render(flow, &step)?;
            flow.dismiss_server_errors();
            flow.dismiss_server_error_message();

            match self.collect(flow, &step)? {
                Collected::Back => {
                    flow.retreat();
                    continue;
                }
                Collected::Retry => continue,
                Collected::Ready => {}
            }
            match flow.advance(step.key) {
                Advance::Submission(SubmitOutcome::Accepted(receipt)) => {
                    self.render_closing(&receipt)?;
                    return Ok(receipt);
                }
                Advance::Moved { .. } => {}
                outcome => tracing::debug!(step = %step.key, ?outcome, "step not left"),
            }
        }
    }

    fn render<G: Gateway>(&mut self, flow: &SurveyFlow<G>, step: &StepView) -> Result<()> {
        let out = &mut self.output;
        writeln!(out)?;
        if let Some(message) = flow.server_error_message() {
            writeln!(out, "!! {message}")?;
        }
        if let Some(errors) = flow.server_errors() {
            writeln!(out, "!! Please fix the following:")?;
            for error in errors {
                writeln!(out, "!!   {error}")?;
            }
        }
        match (step.position, step.total) {
            (Some(position), Some(total)) => {
                writeln!(out, "[{position}/{total}] {}", step.title)?
            }
            _ => writeln!(out, "{}", step.title)?,
        }
        if !step.subtitle.is_empty() {
            writeln!(out, "{}", step.subtitle)?;
        }
        for (idx, option) in step.options.iter().enumerate() {
            let label = match Role::parse(option) {
                Some(role) if step.fields.first() == Some(&Field::Role) => {
                    format!("{} - {}", role.label(), role.description())
                }
                _ => option.to_string(),
            };
            writeln!(out, "  {}. {label}", idx + 1)?;
        }
        if let (Some(errors), Some(current)) = (flow.field_errors(), flow.current_step()) {
            for field in current.edited_fields() {
                if let Some(message) = errors.get(field) {
                    writeln!(out, "  ! {message}")?;
                }
            }
        }
        Ok(())
    }

    fn render_closing(&mut self, receipt: &SubmissionReceipt) -> Result<()> {
        writeln!(self.output)?;
        writeln!(self.output, "Thank you! Your responses have been recorded.")?;
        if let Some(id) = &receipt.record_id {
            writeln!(self.output, "Reference: {id}")?;
        }
        Ok(())
    }

    fn collect<G: Gateway>(
        &mut self,
        flow: &mut SurveyFlow<G>,
        step: &StepView,
    ) -> Result<Collected> {
        let field = step.fields.first().copied();
        match (step.input, field) {
            (InputKind::Intro, _) => self.confirm("Press Enter to begin"),
            (InputKind::Terminal, _) => {
                self.confirm("Press Enter to submit, or type 'back' to review")
            }
            (InputKind::ContactPair, _) => self.contact(flow),
            (InputKind::SingleChoice, Some(field)) => self.choose(flow, step, field),
            (InputKind::Location, Some(field)) => self.locate(flow, field),
            (_, Some(field)) => self.free_text(flow, step.input, field),
            (input, None) => bail!("step {} ({input:?}) has no field to edit", step.key),
        }
    }

    fn confirm(&mut self, prompt: &str) -> Result<Collected> {
        match self.prompt(prompt)? {
            Reply::Back => Ok(Collected::Back),
            Reply::Line(_) => Ok(Collected::Ready),
        }
    }

    fn choose<G: Gateway>(
        &mut self,
        flow: &mut SurveyFlow<G>,
        step: &StepView,
        field: Field,
    ) -> Result<Collected> {
        let current = flow.record().value(field);
        let Reply::Line(line) = self.prompt(&with_current("Choose an option", &current))? else {
            return Ok(Collected::Back);
        };
        if line.is_empty() {
            return Ok(Collected::Ready);
        }
        let picked = match line.parse::<usize>() {
            Ok(number) => number.checked_sub(1).and_then(|idx| step.options.get(idx)),
            Err(_) => step
                .options
                .iter()
                .find(|option| option.eq_ignore_ascii_case(&line)),
        };
        let Some(option) = picked else {
            writeln!(self.output, "  ! Pick one of the numbered options")?;
            return Ok(Collected::Retry);
        };
        self.apply(flow, field, option)
    }

    fn locate<G: Gateway>(&mut self, flow: &mut SurveyFlow<G>, field: Field) -> Result<Collected> {
        let current = flow.record().value(field);
        let Reply::Line(term) = self.prompt(&with_current("Search for your state", &current))?
        else {
            return Ok(Collected::Back);
        };
        if term.is_empty() {
            return Ok(Collected::Ready);
        }
        let matches = search_states(&term);
        let exact = matches
            .iter()
            .find(|state| state.eq_ignore_ascii_case(&term));
        let state = match (exact, matches.as_slice()) {
            (Some(state), _) | (None, [state]) => *state,
            (None, []) => {
                writeln!(self.output, "  ! No state matches \"{term}\"")?;
                return Ok(Collected::Retry);
            }
            (None, several) => {
                for (idx, state) in several.iter().enumerate() {
                    writeln!(self.output, "  {}. {state}", idx + 1)?;
                }
                let Reply::Line(choice) = self.prompt("Choose a state")? else {
                    return Ok(Collected::Retry);
                };
                let picked = choice
                    .parse::<usize>()
                    .ok()
                    .and_then(|number| number.checked_sub(1))
                    .and_then(|idx| several.get(idx));
                let Some(state) = picked else {
                    writeln!(self.output, "  ! Pick one of the numbered states")?;
                    return Ok(Collected::Retry);
                };
                *state
            }
        };
        self.apply(flow, field, state)
    }

    fn free_text<G: Gateway>(
        &mut self,
        flow: &mut SurveyFlow<G>,
        input: InputKind,
        field: Field,
    ) -> Result<Collected> {
        let current = flow.record().value(field);
        let prompt = match input {
            InputKind::Currency => with_current("Amount in naira", &format_money(&current)),
            InputKind::Scale => with_current("1 to 5", &current),
            _ => with_current(field.label(), &current),
        };
        match self.prompt(&prompt)? {
            Reply::Back => Ok(Collected::Back),
            Reply::Line(line) if line.is_empty() => Ok(Collected::Ready),
            Reply::Line(line) => self.apply(flow, field, &line),
        }
    }

    fn contact<G: Gateway>(&mut self, flow: &mut SurveyFlow<G>) -> Result<Collected> {
        let email = flow.record().value(Field::Email);
        let Reply::Line(line) = self.prompt(&with_current("Email", &email))? else {
            return Ok(Collected::Back);
        };
        if !line.is_empty() {
            if let Collected::Retry = self.apply(flow, Field::Email, &line)? {
                return Ok(Collected::Retry);
            }
        }

        let codes: Vec<String> = COUNTRY_CODES
            .iter()
            .map(|entry| format!("{} {}", entry.code, entry.country))
            .collect();
        writeln!(self.output, "  Country codes: {}", codes.join(", "))?;
        let code = flow.record().value(Field::CountryCode);
        let Reply::Line(line) = self.prompt(&with_current("Country code", &code))? else {
            return Ok(Collected::Back);
        };
        if !line.is_empty() {
            if let Collected::Retry = self.apply(flow, Field::CountryCode, &line)? {
                return Ok(Collected::Retry);
            }
        }

        let number = flow.record().value(Field::Whatsapp);
        let Reply::Line(line) = self.prompt(&with_current("WhatsApp number", &number))? else {
            return Ok(Collected::Back);
        };
        if line.is_empty() {
            return Ok(Collected::Ready);
        }
        self.apply(flow, Field::Whatsapp, &line)
    }

    fn apply<G: Gateway>(
        &mut self,
        flow: &mut SurveyFlow<G>,
        field: Field,
        value: &str,
    ) -> Result<Collected> {
        match flow.update_field(field, value) {
            Ok(()) => Ok(Collected::Ready),
            Err(err) => {
                writeln!(self.output, "  ! {err}")?;
                Ok(Collected::Retry)
            }
        }
    }

    fn prompt(&mut self, label: &str) -> Result<Reply> {
        write!(self.output, "{label}: ")?;
        self.output.flush().context("flush prompt")?;
        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .context("read answer from input")?;
        if read == 0 {
            bail!("input closed before the survey was submitted");
        }
        let line = line.trim();
        if line.eq_ignore_ascii_case(BACK) {
            return Ok(Reply::Back);
        }
        Ok(Reply::Line(line.to_string()))
    }
}

fn with_current(label: &str, current: &str) -> String {
    if current.is_empty() {
        label.to_string()
    } else {
        format!("{label} [{current}]")
    }
}
