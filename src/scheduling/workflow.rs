use chrono::{DateTime, NaiveDate, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::scheduling::admission::BookingRequest;

/// Steps of the public booking flow, in order. `Success` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowStep {
    SelectSessionType,
    SelectDateTime,
    EnterDetails,
    Review,
    Success,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WorkflowError {
    #[error("{0} is required to continue")]
    MissingField(&'static str),

    #[error("step {actual:?} does not accept this action (expected {expected:?})")]
    WrongStep {
        expected: WorkflowStep,
        actual: WorkflowStep,
    },

    #[error("cannot navigate back from {0:?}")]
    CannotGoBack(WorkflowStep),
}

/// Client-held partial booking, accumulated across steps. Plain immutable
/// value; nothing here is trusted by the admission guard, which re-validates
/// every field.
#[derive(Debug, Clone, Default)]
pub struct BookingDraft {
    pub event_type_id: Option<Uuid>,
    pub slug: Option<String>,
    pub date: Option<NaiveDate>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub client_name: Option<String>,
    pub client_email: Option<String>,
    pub client_phone: Option<String>,
    pub notes: Option<String>,
    pub timezone: Option<String>,
}

/// The multi-step booking state machine.
///
/// Forward transitions are gated on the step's required fields; backward
/// navigation moves one step at a time from any non-terminal state. Only
/// [`BookingWorkflow::confirm`] produces an external effect — the
/// [`BookingRequest`] it returns is the single atomic call into the
/// admission guard. Dropping the workflow before `Success` leaves no
/// server-side trace.
#[derive(Debug, Clone)]
pub struct BookingWorkflow {
    step: WorkflowStep,
    draft: BookingDraft,
}

impl Default for BookingWorkflow {
    fn default() -> Self {
        Self::new()
    }
}

impl BookingWorkflow {
    pub fn new() -> Self {
        Self {
            step: WorkflowStep::SelectSessionType,
            draft: BookingDraft::default(),
        }
    }

    pub fn step(&self) -> WorkflowStep {
        self.step
    }

    pub fn draft(&self) -> &BookingDraft {
        &self.draft
    }

    fn expect_step(&self, expected: WorkflowStep) -> Result<(), WorkflowError> {
        if self.step == expected {
            Ok(())
        } else {
            Err(WorkflowError::WrongStep {
                expected,
                actual: self.step,
            })
        }
    }

    pub fn select_session_type(
        mut self,
        event_type_id: Uuid,
        slug: impl Into<String>,
    ) -> Result<Self, WorkflowError> {
        self.expect_step(WorkflowStep::SelectSessionType)?;
        let slug = slug.into();
        if slug.trim().is_empty() {
            return Err(WorkflowError::MissingField("slug"));
        }
        self.draft.event_type_id = Some(event_type_id);
        self.draft.slug = Some(slug);
        self.step = WorkflowStep::SelectDateTime;
        Ok(self)
    }

    pub fn select_slot(
        mut self,
        date: NaiveDate,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
        timezone: Option<String>,
    ) -> Result<Self, WorkflowError> {
        self.expect_step(WorkflowStep::SelectDateTime)?;
        self.draft.date = Some(date);
        self.draft.start_time = Some(start_time);
        self.draft.end_time = Some(end_time);
        self.draft.timezone = timezone;
        self.step = WorkflowStep::EnterDetails;
        Ok(self)
    }

    pub fn enter_details(
        mut self,
        name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
        notes: Option<String>,
    ) -> Result<Self, WorkflowError> {
        self.expect_step(WorkflowStep::EnterDetails)?;
        let (name, email, phone) = (name.into(), email.into(), phone.into());
        if name.trim().is_empty() {
            return Err(WorkflowError::MissingField("client_name"));
        }
        if email.trim().is_empty() {
            return Err(WorkflowError::MissingField("client_email"));
        }
        if phone.trim().is_empty() {
            return Err(WorkflowError::MissingField("client_phone"));
        }
        self.draft.client_name = Some(name);
        self.draft.client_email = Some(email);
        self.draft.client_phone = Some(phone);
        self.draft.notes = notes;
        self.step = WorkflowStep::Review;
        Ok(self)
    }

    /// One step back. Entered data is kept so going forward again does not
    /// start over.
    pub fn back(mut self) -> Result<Self, WorkflowError> {
        self.step = match self.step {
            WorkflowStep::SelectDateTime => WorkflowStep::SelectSessionType,
            WorkflowStep::EnterDetails => WorkflowStep::SelectDateTime,
            WorkflowStep::Review => WorkflowStep::EnterDetails,
            step @ (WorkflowStep::SelectSessionType | WorkflowStep::Success) => {
                return Err(WorkflowError::CannotGoBack(step))
            }
        };
        Ok(self)
    }

    /// Finalize the draft into the request handed to the admission guard.
    /// All fields are present by construction once `Review` is reached.
    pub fn confirm(mut self) -> Result<(Self, BookingRequest), WorkflowError> {
        self.expect_step(WorkflowStep::Review)?;

        let draft = &self.draft;
        let request = BookingRequest {
            event_type_id: draft
                .event_type_id
                .ok_or(WorkflowError::MissingField("event_type_id"))?,
            slug: draft
                .slug
                .clone()
                .ok_or(WorkflowError::MissingField("slug"))?,
            date: draft.date.ok_or(WorkflowError::MissingField("date"))?,
            start_time: draft
                .start_time
                .ok_or(WorkflowError::MissingField("start_time"))?,
            end_time: draft
                .end_time
                .ok_or(WorkflowError::MissingField("end_time"))?,
            client_name: draft
                .client_name
                .clone()
                .ok_or(WorkflowError::MissingField("client_name"))?,
            client_email: draft
                .client_email
                .clone()
                .ok_or(WorkflowError::MissingField("client_email"))?,
            client_phone: draft
                .client_phone
                .clone()
                .ok_or(WorkflowError::MissingField("client_phone"))?,
            notes: draft.notes.clone(),
            timezone: draft.timezone.clone(),
        };

        self.step = WorkflowStep::Success;
        Ok((self, request))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(time: &str) -> DateTime<Utc> {
        format!("2025-06-02T{time}:00Z").parse().unwrap()
    }

    fn through_details() -> BookingWorkflow {
        BookingWorkflow::new()
            .select_session_type(Uuid::now_v7(), "portrait")
            .unwrap()
            .select_slot("2025-06-02".parse().unwrap(), at("10:00"), at("10:30"), None)
            .unwrap()
            .enter_details("Ada", "ada@example.com", "+48123456789", None)
            .unwrap()
    }

    #[test]
    fn happy_path_reaches_success_with_a_complete_request() {
        let workflow = through_details();
        assert_eq!(workflow.step(), WorkflowStep::Review);

        let (workflow, request) = workflow.confirm().unwrap();
        assert_eq!(workflow.step(), WorkflowStep::Success);
        assert_eq!(request.slug, "portrait");
        assert_eq!(request.start_time, at("10:00"));
        assert_eq!(request.client_email, "ada@example.com");
    }

    #[test]
    fn steps_cannot_be_skipped() {
        let workflow = BookingWorkflow::new();
        let err = workflow
            .enter_details("Ada", "ada@example.com", "123", None)
            .unwrap_err();
        assert!(matches!(err, WorkflowError::WrongStep { .. }));

        let err = BookingWorkflow::new().confirm().unwrap_err();
        assert!(matches!(err, WorkflowError::WrongStep { .. }));
    }

    #[test]
    fn details_step_requires_contact_fields() {
        let workflow = BookingWorkflow::new()
            .select_session_type(Uuid::now_v7(), "portrait")
            .unwrap()
            .select_slot("2025-06-02".parse().unwrap(), at("10:00"), at("10:30"), None)
            .unwrap();

        let err = workflow
            .clone()
            .enter_details("", "ada@example.com", "123", None)
            .unwrap_err();
        assert_eq!(err, WorkflowError::MissingField("client_name"));

        let err = workflow
            .enter_details("Ada", "ada@example.com", "  ", None)
            .unwrap_err();
        assert_eq!(err, WorkflowError::MissingField("client_phone"));
    }

    #[test]
    fn back_navigation_is_one_step_and_keeps_data() {
        let workflow = through_details().back().unwrap();
        assert_eq!(workflow.step(), WorkflowStep::EnterDetails);
        assert_eq!(workflow.draft().client_name.as_deref(), Some("Ada"));

        let workflow = workflow.back().unwrap().back().unwrap();
        assert_eq!(workflow.step(), WorkflowStep::SelectSessionType);
        assert!(workflow.draft().slug.is_some());
        assert!(workflow.back().is_err());
    }

    #[test]
    fn terminal_state_rejects_navigation() {
        let (workflow, _) = through_details().confirm().unwrap();
        assert!(matches!(
            workflow.back(),
            Err(WorkflowError::CannotGoBack(WorkflowStep::Success))
        ));
    }
}
