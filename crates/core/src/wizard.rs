//! # Booking Wizard
//!
//! State machine behind the multi-step booking form:
//!
//! ```text
//! SelectingDateTime -> EnteringCustomerInfo -> Confirming -> Succeeded
//!         ^                    |    ^              |
//!         +------- back -------+    +---- back ----+
//! ```
//!
//! `Succeeded` is left only through [`Wizard::new_reservation`] or the side
//! trip to the listing view.
//!
//! ## Advisory checks
//!
//! Once date, start and end are all chosen, the wizard issues a
//! [`CheckTicket`]. The caller runs the check however it likes (possibly
//! concurrently with newer ones) and hands the result back through
//! [`Wizard::apply_check`]. Only the most recently issued ticket is accepted,
//! so a slow response for a superseded selection can never overwrite a newer
//! result.

use chrono::NaiveDate;
use tracing::debug;

use crate::{
    errors::{BookingError, BookingResult},
    grid::SlotGrid,
    models::{
        booking::{Availability, BookingOutcome},
        customer::NewCustomer,
        reservation::{ConflictDescriptor, NewReservation, Reservation, ReservationDraft},
        time_slot::{SlotTime, TimeSlot},
    },
    services::BookingBackend,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardStep {
    SelectingDateTime,
    EnteringCustomerInfo,
    Confirming,
    Succeeded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Booking,
    Listing,
}

/// Handle for one issued advisory check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckTicket {
    seq: u64,
    pub date: NaiveDate,
    pub start: SlotTime,
    pub end: SlotTime,
}

impl CheckTicket {
    pub fn seq(&self) -> u64 {
        self.seq
    }
}

#[derive(Debug, Clone)]
pub struct Wizard {
    grid: SlotGrid,
    step: WizardStep,
    view: View,
    draft: ReservationDraft,
    date: Option<NaiveDate>,
    start: Option<SlotTime>,
    end: Option<SlotTime>,
    warning: Option<String>,
    next_seq: u64,
    in_flight: Option<CheckTicket>,
    busy: bool,
    error: Option<String>,
    completed: Option<Reservation>,
}

impl Default for Wizard {
    fn default() -> Self {
        Self::new(SlotGrid::default())
    }
}

impl Wizard {
    pub fn new(grid: SlotGrid) -> Self {
        Self {
            grid,
            step: WizardStep::SelectingDateTime,
            view: View::Booking,
            draft: ReservationDraft::default(),
            date: None,
            start: None,
            end: None,
            warning: None,
            next_seq: 0,
            in_flight: None,
            busy: false,
            error: None,
            completed: None,
        }
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn grid(&self) -> &SlotGrid {
        &self.grid
    }

    pub fn draft(&self) -> &ReservationDraft {
        &self.draft
    }

    pub fn selected_date(&self) -> Option<NaiveDate> {
        self.date
    }

    pub fn selected_start(&self) -> Option<SlotTime> {
        self.start
    }

    pub fn selected_end(&self) -> Option<SlotTime> {
        self.end
    }

    /// Advisory overlap warning for the current selection.
    pub fn warning(&self) -> Option<&str> {
        self.warning.as_deref()
    }

    pub fn is_checking(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn completed(&self) -> Option<&Reservation> {
        self.completed.as_ref()
    }

    /// Start labels that still leave at least one end label.
    pub fn start_time_options(&self) -> Vec<SlotTime> {
        let mut options = self.grid.time_options();
        options.pop();
        options
    }

    pub fn end_time_options(&self) -> Vec<SlotTime> {
        self.start
            .map(|start| self.grid.valid_end_times(start))
            .unwrap_or_default()
    }

    pub fn select_date(&mut self, date: NaiveDate) -> BookingResult<()> {
        self.require_step(WizardStep::SelectingDateTime)?;
        self.date = Some(date);
        self.start = None;
        self.end = None;
        self.clear_advisory();
        Ok(())
    }

    /// Returns a ticket when the new selection needs an advisory check.
    pub fn select_start(&mut self, start: SlotTime) -> BookingResult<Option<CheckTicket>> {
        self.require_step(WizardStep::SelectingDateTime)?;
        if self.grid.valid_end_times(start).is_empty() {
            return Err(BookingError::validation(format!(
                "{start} is not a bookable start time"
            )));
        }

        self.start = Some(start);
        self.clear_advisory();

        match self.end {
            Some(end) if !self.grid.is_bookable(start, end) => {
                self.end = None;
                Ok(None)
            }
            Some(_) => Ok(self.issue_check()),
            None => Ok(None),
        }
    }

    pub fn select_end(&mut self, end: SlotTime) -> BookingResult<Option<CheckTicket>> {
        self.require_step(WizardStep::SelectingDateTime)?;
        let start = self
            .start
            .ok_or_else(|| BookingError::validation("Choose a start time first"))?;
        if !self.grid.is_bookable(start, end) {
            return Err(BookingError::validation(format!(
                "{end} is not a valid end time after {start}"
            )));
        }

        self.end = Some(end);
        self.clear_advisory();
        Ok(self.issue_check())
    }

    /// Applies an advisory result. Returns `false` when the ticket has been
    /// superseded and the result was discarded.
    pub fn apply_check(&mut self, ticket: CheckTicket, availability: &Availability) -> bool {
        if self.in_flight.map(|t| t.seq) != Some(ticket.seq) {
            debug!(seq = ticket.seq, "discarding stale availability result");
            return false;
        }

        self.in_flight = None;
        self.warning = match availability {
            Availability::Available => None,
            Availability::Conflicting(conflicts) => Some(advisory_message(conflicts)),
            Availability::Unverified(_) => Some(
                "Could not verify availability for this time. Please try again.".to_string(),
            ),
        };
        true
    }

    /// `SelectingDateTime -> EnteringCustomerInfo`.
    pub fn submit_date_time(&mut self) -> BookingResult<()> {
        self.require_step(WizardStep::SelectingDateTime)?;
        let (Some(date), Some(start), Some(end)) = (self.date, self.start, self.end) else {
            return Err(BookingError::validation(
                "Choose a date, start time and end time",
            ));
        };
        if !self.grid.is_bookable(start, end) {
            return Err(BookingError::validation(format!(
                "{start}-{end} is not a bookable slot"
            )));
        }
        if self.is_checking() {
            return Err(BookingError::validation("Availability check in progress"));
        }
        if let Some(warning) = &self.warning {
            return Err(BookingError::validation(warning.clone()));
        }

        self.draft.date = Some(date);
        self.draft.time_slot = Some(TimeSlot::new(start, end)?);
        self.error = None;
        self.step = WizardStep::EnteringCustomerInfo;
        Ok(())
    }

    /// `EnteringCustomerInfo -> Confirming`.
    pub fn submit_customer(&mut self, name: &str, student_id: &str) -> BookingResult<()> {
        self.require_step(WizardStep::EnteringCustomerInfo)?;
        let customer = NewCustomer::new(name, student_id)?;

        self.draft.customer = Some(customer);
        self.error = None;
        self.step = WizardStep::Confirming;
        Ok(())
    }

    pub fn back(&mut self) -> BookingResult<()> {
        match self.step {
            WizardStep::EnteringCustomerInfo => self.step = WizardStep::SelectingDateTime,
            WizardStep::Confirming if !self.busy => self.step = WizardStep::EnteringCustomerInfo,
            WizardStep::Confirming => {
                return Err(BookingError::validation("Reservation is being submitted"));
            }
            WizardStep::SelectingDateTime | WizardStep::Succeeded => {
                return Err(BookingError::validation("Cannot go back from this step"));
            }
        }
        self.error = None;
        Ok(())
    }

    /// Finalises the draft and marks the wizard busy until
    /// [`Wizard::finish_confirm`] is called.
    pub fn begin_confirm(&mut self) -> BookingResult<NewReservation> {
        self.require_step(WizardStep::Confirming)?;
        if self.busy {
            return Err(BookingError::validation("Reservation is being submitted"));
        }

        let reservation = match self.draft.finalize() {
            Ok(reservation) => reservation,
            Err(e) => {
                self.error = Some(e.to_string());
                return Err(e);
            }
        };

        self.busy = true;
        self.error = None;
        Ok(reservation)
    }

    pub fn finish_confirm(&mut self, outcome: &BookingOutcome) {
        self.busy = false;
        match outcome {
            BookingOutcome::Success(reservation) => {
                self.completed = Some(reservation.clone());
                self.error = None;
                self.step = WizardStep::Succeeded;
            }
            BookingOutcome::Conflict(conflicts) => {
                self.error = Some(conflict_message(conflicts));
            }
            BookingOutcome::Failure(reason) => {
                self.error = Some(reason.message().to_string());
            }
        }
    }

    pub async fn confirm(&mut self, backend: &dyn BookingBackend) -> BookingResult<BookingOutcome> {
        let reservation = self.begin_confirm()?;
        let outcome = backend.create_reservation(&reservation).await;
        self.finish_confirm(&outcome);
        Ok(outcome)
    }

    /// Back to the initial state with an empty draft.
    pub fn new_reservation(&mut self) {
        let next_seq = self.next_seq;
        *self = Self::new(self.grid);
        self.next_seq = next_seq;
    }

    pub fn view_reservations(&mut self) {
        if self.step == WizardStep::Succeeded {
            self.new_reservation();
        }
        self.view = View::Listing;
    }

    pub fn view_booking(&mut self) {
        self.view = View::Booking;
    }

    fn require_step(&self, expected: WizardStep) -> BookingResult<()> {
        if self.step != expected {
            return Err(BookingError::validation(format!(
                "Not allowed while in {:?}",
                self.step
            )));
        }
        Ok(())
    }

    fn clear_advisory(&mut self) {
        self.warning = None;
        self.in_flight = None;
    }

    fn issue_check(&mut self) -> Option<CheckTicket> {
        let (date, start, end) = (self.date?, self.start?, self.end?);
        self.next_seq += 1;
        let ticket = CheckTicket {
            seq: self.next_seq,
            date,
            start,
            end,
        };
        self.in_flight = Some(ticket);
        Some(ticket)
    }
}

pub fn advisory_message(conflicts: &[ConflictDescriptor]) -> String {
    let details = conflicts
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    format!("This time is already booked: {details}\nPlease choose another time.")
}

pub fn conflict_message(conflicts: &[ConflictDescriptor]) -> String {
    if conflicts.is_empty() {
        return "The selected time is already booked. Please choose another time.".to_string();
    }

    let details = conflicts
        .iter()
        .map(|c| format!("• {c}"))
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        "The selected time is already booked.\n\nExisting reservations:\n{details}\n\nPlease choose another time."
    )
}
