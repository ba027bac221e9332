use shared::{
    domain::{Feature, UnknownFeature},
    protocol::{CropFeatures, PredictionResponse},
};
use tracing::{debug, error, info};

use crate::{error::PredictionError, form::FieldSet, PredictionClient};

/// What the service last told us about the submitted readings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmissionResult {
    pub predicted_crop: Option<String>,
    pub improvements: Vec<String>,
}

impl From<PredictionResponse> for SubmissionResult {
    fn from(response: PredictionResponse) -> Self {
        Self {
            predicted_crop: response.predicted_crop,
            improvements: response.improvements.unwrap_or_default(),
        }
    }
}

/// A submission that has been started but not yet completed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SubmissionTicket {
    pub id: u64,
    pub features: CropFeatures,
}

#[derive(Debug)]
pub enum SubmitOutcome {
    Applied,
    Failed(PredictionError),
    /// A newer submission or a clear happened while this one was in flight.
    Superseded,
}

impl SubmitOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, SubmitOutcome::Applied)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImprovementsView<'a> {
    Suggestions(&'a [String]),
    NoneNeeded,
}

/// The result area as a front end should draw it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultView<'a> {
    Editing,
    Submitted {
        /// Present only for a non-empty label.
        predicted_crop: Option<&'a str>,
        improvements: ImprovementsView<'a>,
    },
}

/// All mutable state of one form interaction.
#[derive(Debug, Default)]
pub struct FormSession {
    fields: FieldSet,
    result: Option<SubmissionResult>,
    has_submitted: bool,
    last_ticket: u64,
    pending: Option<u64>,
}

impl FormSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fields(&self) -> &FieldSet {
        &self.fields
    }

    pub fn result(&self) -> Option<&SubmissionResult> {
        self.result.as_ref()
    }

    pub fn has_submitted(&self) -> bool {
        self.has_submitted
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn update_field(&mut self, feature: Feature, value: impl Into<String>) {
        self.fields.set(feature, value);
    }

    pub fn update_field_by_name(
        &mut self,
        name: &str,
        value: impl Into<String>,
    ) -> Result<Feature, UnknownFeature> {
        self.fields.set_by_name(name, value)
    }

    pub fn clear(&mut self) {
        self.fields.clear();
        self.result = None;
        self.has_submitted = false;
        self.pending = None;
    }

    /// Marks the session as submitted and snapshots the coerced readings.
    pub fn begin_submission(&mut self) -> SubmissionTicket {
        self.has_submitted = true;
        self.last_ticket += 1;
        self.pending = Some(self.last_ticket);
        SubmissionTicket {
            id: self.last_ticket,
            features: self.fields.to_features(),
        }
    }

    /// Applies the response for `ticket_id` if it is still the one the
    /// session is waiting for. Failures are logged and leave state alone.
    pub fn complete_submission(
        &mut self,
        ticket_id: u64,
        response: Result<PredictionResponse, PredictionError>,
    ) -> SubmitOutcome {
        if self.pending != Some(ticket_id) {
            debug!(
                ticket_id,
                pending = ?self.pending,
                "discarding prediction for superseded submission"
            );
            return SubmitOutcome::Superseded;
        }
        self.pending = None;

        match response {
            Ok(response) => {
                let result = SubmissionResult::from(response);
                info!(
                    ticket_id,
                    predicted_crop = ?result.predicted_crop,
                    improvements = result.improvements.len(),
                    "prediction received"
                );
                self.result = Some(result);
                SubmitOutcome::Applied
            }
            Err(err) => {
                error!(
                    ticket_id,
                    error = %err,
                    "there was an error making the prediction request"
                );
                SubmitOutcome::Failed(err)
            }
        }
    }

    /// Releases a ticket whose request was never sent. Fields, result and
    /// `has_submitted` are left as they are.
    pub fn abandon_submission(&mut self, ticket_id: u64) {
        if self.pending == Some(ticket_id) {
            debug!(ticket_id, "submission abandoned before dispatch");
            self.pending = None;
        }
    }

    /// Runs one full submission against `client`.
    pub async fn submit(&mut self, client: &dyn PredictionClient) -> SubmitOutcome {
        let ticket = self.begin_submission();
        let response = client.predict(&ticket.features).await;
        self.complete_submission(ticket.id, response)
    }

    pub fn view(&self) -> ResultView<'_> {
        if !self.has_submitted {
            return ResultView::Editing;
        }

        let (predicted_crop, improvements) = match &self.result {
            Some(result) => (
                result.predicted_crop.as_deref().filter(|crop| !crop.is_empty()),
                result.improvements.as_slice(),
            ),
            None => (None, &[] as &[String]),
        };
        let improvements = if improvements.is_empty() {
            ImprovementsView::NoneNeeded
        } else {
            ImprovementsView::Suggestions(improvements)
        };

        ResultView::Submitted {
            predicted_crop,
            improvements,
        }
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
