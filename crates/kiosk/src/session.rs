//! # Kiosk Session
//!
//! Line-oriented front end over the booking [`Wizard`]. Each input line is
//! one [`Command`]. Advisory availability checks and reservation submits run
//! as background tasks and report back over channels, so the prompt stays
//! responsive while either is in flight. Results for superseded selections are
//! dropped by the wizard; while a submit is pending the prompt reads
//! `[submitting]` and a second `confirm` is refused.

use std::{fmt::Write as _, str::FromStr, sync::Arc};

use chrono::NaiveDate;
use eyre::Result;
use roombook_core::{
    errors::{BookingError, BookingResult},
    grid::SlotGrid,
    models::{
        booking::{Availability, BookingOutcome, ReservationListing},
        reservation::{Reservation, UNKNOWN_CUSTOMER_NAME},
        time_slot::SlotTime,
    },
    services::BookingBackend,
    wizard::{CheckTicket, View, Wizard, WizardStep},
};
use tokio::{
    io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt},
    sync::mpsc,
};
use tracing::debug;

pub const HELP: &str = "\
Commands:
  date YYYY-MM-DD           choose the reservation date
  start HH:MM               choose the start time
  end HH:MM                 choose the end time
  times                     show the selectable start or end times
  next                      continue to customer details
  customer <id> <name>      enter student ID and name
  back                      return to the previous step
  confirm                   submit the reservation
  new                       start over with a new reservation
  list                      show all reservations
  book                      return to the booking form
  show                      show the current selection
  help                      show this help
  quit                      leave the kiosk";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Date(NaiveDate),
    Start(SlotTime),
    End(SlotTime),
    Times,
    Next,
    Customer { student_id: String, name: String },
    Back,
    Confirm,
    New,
    List,
    Book,
    Show,
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = BookingError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = line
            .split_once(char::is_whitespace)
            .map(|(word, rest)| (word, rest.trim()))
            .unwrap_or((line, ""));

        let command = match word.to_ascii_lowercase().as_str() {
            "date" => Command::Date(
                NaiveDate::parse_from_str(rest, "%Y-%m-%d").map_err(|_| {
                    BookingError::validation(format!("Invalid date {rest:?}, expected YYYY-MM-DD"))
                })?,
            ),
            "start" => Command::Start(rest.parse()?),
            "end" => Command::End(rest.parse()?),
            "times" => Command::Times,
            "next" => Command::Next,
            "customer" => {
                let (student_id, name) = rest
                    .split_once(char::is_whitespace)
                    .map(|(id, name)| (id.to_string(), name.trim().to_string()))
                    .unwrap_or_else(|| (rest.to_string(), String::new()));
                Command::Customer { student_id, name }
            }
            "back" => Command::Back,
            "confirm" => Command::Confirm,
            "new" => Command::New,
            "list" => Command::List,
            "book" => Command::Book,
            "show" => Command::Show,
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            other => {
                return Err(BookingError::validation(format!(
                    "Unknown command {other:?}. Type `help` for the list of commands."
                )));
            }
        };

        Ok(command)
    }
}

type CheckResult = (CheckTicket, Availability);

pub struct Session {
    wizard: Wizard,
    backend: Arc<dyn BookingBackend>,
    checks_tx: mpsc::UnboundedSender<CheckResult>,
    checks_rx: mpsc::UnboundedReceiver<CheckResult>,
    outcomes_tx: mpsc::UnboundedSender<BookingOutcome>,
    outcomes_rx: mpsc::UnboundedReceiver<BookingOutcome>,
}

impl Session {
    pub fn new(backend: Arc<dyn BookingBackend>, grid: SlotGrid) -> Self {
        let (checks_tx, checks_rx) = mpsc::unbounded_channel();
        let (outcomes_tx, outcomes_rx) = mpsc::unbounded_channel();
        Self {
            wizard: Wizard::new(grid),
            backend,
            checks_tx,
            checks_rx,
            outcomes_tx,
            outcomes_rx,
        }
    }

    pub fn wizard(&self) -> &Wizard {
        &self.wizard
    }

    /// Runs the check in the background; the result arrives on the channel.
    fn spawn_check(&self, ticket: CheckTicket) {
        let backend = self.backend.clone();
        let tx = self.checks_tx.clone();
        tokio::spawn(async move {
            let availability = backend
                .check_availability(ticket.date, ticket.start, ticket.end)
                .await;
            if tx.send((ticket, availability)).is_err() {
                debug!(seq = ticket.seq(), "session closed before check finished");
            }
        });
    }

    /// Applies a finished check. Returns the message to show, or `None` when
    /// the result was stale.
    pub fn apply_check(&mut self, ticket: CheckTicket, availability: &Availability) -> Option<String> {
        if !self.wizard.apply_check(ticket, availability) {
            return None;
        }

        Some(match self.wizard.warning() {
            Some(warning) => format!("! {warning}"),
            None => format!(
                "{} {}-{} is available. Type `next` to continue.",
                ticket.date, ticket.start, ticket.end
            ),
        })
    }

    /// Waits until no advisory check is in flight.
    pub async fn settle_checks(&mut self) -> Vec<String> {
        let mut messages = Vec::new();
        while self.wizard.is_checking() {
            let Some((ticket, availability)) = self.checks_rx.recv().await else {
                break;
            };
            messages.extend(self.apply_check(ticket, &availability));
        }
        messages
    }

    /// Submits the finalised draft in the background. The wizard stays busy
    /// until the outcome comes back on the channel.
    fn spawn_submit(&mut self) -> BookingResult<()> {
        let reservation = self.wizard.begin_confirm()?;
        let backend = self.backend.clone();
        let tx = self.outcomes_tx.clone();
        tokio::spawn(async move {
            let outcome = backend.create_reservation(&reservation).await;
            if tx.send(outcome).is_err() {
                debug!("session closed before the reservation submit finished");
            }
        });
        Ok(())
    }

    /// Applies a finished submit. Returns `None` when nothing was pending.
    pub fn apply_outcome(&mut self, outcome: BookingOutcome) -> Option<String> {
        if !self.wizard.is_busy() {
            return None;
        }

        self.wizard.finish_confirm(&outcome);
        Some(match outcome {
            BookingOutcome::Success(reservation) => format!(
                "Reservation complete!\n{}\nType `new` for another reservation or `list` to see all.",
                render_reservation(&reservation)
            ),
            BookingOutcome::Conflict(_) | BookingOutcome::Failure(_) => format!(
                "! {}",
                self.wizard.error().unwrap_or("Reservation failed.")
            ),
        })
    }

    /// Waits for a pending submit, if any, and applies its outcome.
    pub async fn settle_submit(&mut self) -> Option<String> {
        if !self.wizard.is_busy() {
            return None;
        }
        let outcome = self.outcomes_rx.recv().await?;
        self.apply_outcome(outcome)
    }

    pub async fn handle(&mut self, command: Command) -> String {
        match self.dispatch(command).await {
            Ok(reply) => reply,
            Err(BookingError::Validation(message)) => format!("! {message}"),
            Err(e) => format!("! {e}"),
        }
    }

    async fn dispatch(&mut self, command: Command) -> BookingResult<String> {
        if !matches!(command, Command::List | Command::Help | Command::Quit) {
            self.wizard.view_booking();
        }

        match command {
            Command::Date(date) => {
                self.wizard.select_date(date)?;
                Ok(format!("Date set to {date}. Choose a start time with `start HH:MM`."))
            }
            Command::Start(start) => {
                let ticket = self.wizard.select_start(start)?;
                let mut reply = format!("Start time set to {start}.");
                match ticket {
                    Some(ticket) => {
                        self.spawn_check(ticket);
                        reply.push_str(" Checking availability...");
                    }
                    None => {
                        let _ = write!(
                            reply,
                            " End times: {}",
                            join_times(&self.wizard.end_time_options())
                        );
                    }
                }
                Ok(reply)
            }
            Command::End(end) => {
                let ticket = self.wizard.select_end(end)?;
                let mut reply = format!("End time set to {end}.");
                match ticket {
                    Some(ticket) => {
                        self.spawn_check(ticket);
                        reply.push_str(" Checking availability...");
                    }
                    None => reply.push_str(" Choose a date with `date YYYY-MM-DD`."),
                }
                Ok(reply)
            }
            Command::Times => Ok(match self.wizard.selected_start() {
                Some(start) => format!(
                    "End times after {start}: {}",
                    join_times(&self.wizard.end_time_options())
                ),
                None => format!(
                    "Start times: {}",
                    join_times(&self.wizard.start_time_options())
                ),
            }),
            Command::Next => {
                let mut lines = self.settle_checks().await;
                self.wizard.submit_date_time()?;
                lines.push("Enter your details with `customer <student-id> <name>`.".to_string());
                Ok(lines.join("\n"))
            }
            Command::Customer { student_id, name } => {
                self.wizard.submit_customer(&name, &student_id)?;
                Ok(format!(
                    "{}\nType `confirm` to book or `back` to edit.",
                    render_summary(&self.wizard)
                ))
            }
            Command::Back => {
                self.wizard.back()?;
                Ok(describe_step(&self.wizard))
            }
            Command::Confirm => {
                self.spawn_submit()?;
                Ok("Submitting reservation...".to_string())
            }
            Command::New if self.wizard.is_busy() => {
                Err(BookingError::validation("Reservation is being submitted"))
            }
            Command::New => {
                self.wizard.new_reservation();
                Ok(format!("Starting a new reservation.\n{}", describe_step(&self.wizard)))
            }
            Command::List => {
                self.wizard.view_reservations();
                let listing = self.backend.list_reservations().await;
                Ok(format!(
                    "{}\nType `book` to return to the booking form.",
                    render_listing(&listing)
                ))
            }
            Command::Book => Ok(describe_step(&self.wizard)),
            Command::Show => Ok(render_summary(&self.wizard)),
            Command::Help => Ok(HELP.to_string()),
            Command::Quit => Ok("Goodbye.".to_string()),
        }
    }

    /// Reads commands until `quit` or end of input, printing advisory results
    /// and submit outcomes as they arrive.
    pub async fn run<R, W>(&mut self, input: R, mut output: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = input.lines();
        let welcome = format!(
            "Practice room booking. Type `help` for commands.\n{}",
            describe_step(&self.wizard)
        );
        write_block(&mut output, &welcome).await?;
        write_prompt(&mut output, &self.wizard).await?;

        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line? else { break };
                    if line.trim().is_empty() {
                        write_prompt(&mut output, &self.wizard).await?;
                        continue;
                    }

                    let command = line.parse::<Command>();
                    let quit = matches!(command, Ok(Command::Quit));
                    let reply = match command {
                        Ok(command) => self.handle(command).await,
                        Err(BookingError::Validation(message)) => format!("! {message}"),
                        Err(e) => format!("! {e}"),
                    };
                    write_block(&mut output, &reply).await?;
                    if quit {
                        break;
                    }
                    write_prompt(&mut output, &self.wizard).await?;
                }
                Some((ticket, availability)) = self.checks_rx.recv() => {
                    if let Some(message) = self.apply_check(ticket, &availability) {
                        write_block(&mut output, &message).await?;
                        write_prompt(&mut output, &self.wizard).await?;
                    }
                }
                Some(outcome) = self.outcomes_rx.recv() => {
                    if let Some(message) = self.apply_outcome(outcome) {
                        write_block(&mut output, &message).await?;
                        write_prompt(&mut output, &self.wizard).await?;
                    }
                }
            }
        }

        output.flush().await?;
        Ok(())
    }
}

async fn write_block<W: AsyncWrite + Unpin>(output: &mut W, text: &str) -> Result<()> {
    output.write_all(text.as_bytes()).await?;
    output.write_all(b"\n").await?;
    output.flush().await?;
    Ok(())
}

async fn write_prompt<W: AsyncWrite + Unpin>(output: &mut W, wizard: &Wizard) -> Result<()> {
    output.write_all(prompt(wizard).as_bytes()).await?;
    output.flush().await?;
    Ok(())
}

pub fn prompt(wizard: &Wizard) -> String {
    let label = match (wizard.view(), wizard.step()) {
        (View::Listing, _) => "reservations",
        (View::Booking, WizardStep::SelectingDateTime) => "date & time",
        (View::Booking, WizardStep::EnteringCustomerInfo) => "customer",
        (View::Booking, WizardStep::Confirming) if wizard.is_busy() => "submitting",
        (View::Booking, WizardStep::Confirming) => "confirm",
        (View::Booking, WizardStep::Succeeded) => "done",
    };
    format!("[{label}] > ")
}

pub fn describe_step(wizard: &Wizard) -> String {
    match wizard.step() {
        WizardStep::SelectingDateTime => {
            "Step 1 of 3: choose a date, start time and end time.".to_string()
        }
        WizardStep::EnteringCustomerInfo => {
            "Step 2 of 3: enter your details with `customer <student-id> <name>`.".to_string()
        }
        WizardStep::Confirming => format!(
            "Step 3 of 3: check your reservation.\n{}",
            render_summary(wizard)
        ),
        WizardStep::Succeeded => match wizard.completed() {
            Some(reservation) => format!("Reservation complete!\n{}", render_reservation(reservation)),
            None => "Reservation complete!".to_string(),
        },
    }
}

pub fn render_summary(wizard: &Wizard) -> String {
    let draft = wizard.draft();
    let or_dash = |value: Option<String>| value.unwrap_or_else(|| "-".to_string());

    let date = draft.date.or(wizard.selected_date()).map(|d| d.to_string());
    let time = match (&draft.time_slot, wizard.selected_start(), wizard.selected_end()) {
        (Some(slot), _, _) => Some(slot.label()),
        (None, Some(start), Some(end)) => Some(format!("{start}-{end}")),
        (None, Some(start), None) => Some(format!("{start}-")),
        _ => None,
    };
    let (name, student_id) = match &draft.customer {
        Some(customer) => (Some(customer.name.clone()), Some(customer.student_id.clone())),
        None => (None, None),
    };

    let mut summary = format!(
        "  Date:       {}\n  Time:       {}\n  Name:       {}\n  Student ID: {}",
        or_dash(date),
        or_dash(time),
        or_dash(name),
        or_dash(student_id)
    );
    if let Some(warning) = wizard.warning() {
        let _ = write!(summary, "\n! {warning}");
    }
    summary
}

pub fn render_reservation(reservation: &Reservation) -> String {
    let name = if reservation.customer.name.is_empty() {
        UNKNOWN_CUSTOMER_NAME
    } else {
        reservation.customer.name.as_str()
    };
    format!(
        "  {} {}  {} ({})  {}",
        reservation.date,
        reservation.time_slot.label(),
        name,
        reservation.customer.student_id,
        reservation.status
    )
}

pub fn render_listing(listing: &ReservationListing) -> String {
    if let Some(error) = &listing.error {
        return format!("! {error}");
    }
    if listing.reservations.is_empty() {
        return "No reservations yet.".to_string();
    }

    let mut lines = vec![format!("Reservations ({}):", listing.reservations.len())];
    lines.extend(listing.reservations.iter().map(render_reservation));
    lines.join("\n")
}

fn join_times(times: &[SlotTime]) -> String {
    if times.is_empty() {
        return "none".to_string();
    }
    times
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}
